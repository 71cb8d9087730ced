mod cli;

use tmdb_collections::{
    catalog::{CatalogService, CollectionResolver},
    config, manifest, server,
    tmdb::TmdbClient,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;
use std::time::Duration;

async fn start_server(
    host: String,
    port: u16,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config.server.host = host;
    config.server.port = port;

    let Some(api_key) = config.tmdb.resolved_api_key() else {
        anyhow::bail!("No TMDB API key configured (set [tmdb].api_key or TMDB_API_KEY)");
    };

    tracing::info!("Starting TMDB Collections addon");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let client: Arc<dyn tmdb_collections::tmdb::MetadataClient> =
        Arc::new(TmdbClient::new(api_key, config.tmdb.language.clone()));
    let resolver = Arc::new(CollectionResolver::new(
        client.clone(),
        Duration::from_secs(config.cache.detail_ttl_secs),
    ));
    let catalog = Arc::new(CatalogService::new(client, resolver, &config.cache));

    server::start_server(config, catalog).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tmdb_collections=trace,tower_http=debug".to_string()
        } else {
            "tmdb_collections=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            let config = config::load_config_or_default(path.as_deref())?;
            println!("Configuration is valid");
            println!("  server: {}:{}", config.server.host, config.server.port);
            println!("  language: {}", config.tmdb.language);
            println!(
                "  api key: {}",
                if config.tmdb.resolved_api_key().is_some() {
                    "configured"
                } else {
                    "missing"
                }
            );
            Ok(())
        }
        Commands::Manifest => {
            println!("{}", serde_json::to_string_pretty(&manifest::manifest())?);
            Ok(())
        }
        Commands::Version => {
            println!("tmdb-collections {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
