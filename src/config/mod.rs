mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./tmdb-collections.toml",
        "~/.config/tmdb-collections/config.toml",
        "/etc/tmdb-collections/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.tmdb.resolved_api_key().is_none() {
        tracing::warn!("No TMDB API key configured (set [tmdb].api_key or TMDB_API_KEY)");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_valid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[tmdb]
api_key = "abc123"
language = "de-DE"

[cache]
catalog_ttl_secs = 60
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.tmdb.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.tmdb.language, "de-DE");
        assert_eq!(config.cache.catalog_ttl_secs, 60);
        // Unspecified sections keep their defaults.
        assert_eq!(config.cache.detail_ttl_secs, 24 * 60 * 60);
    }

    #[test]
    fn rejects_port_zero() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 0").unwrap();

        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn defaults_when_no_file() {
        let config = Config::default();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.tmdb.language, "en-US");
    }
}
