use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

/// Path (without extension) of the optional configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

fn default_max_connections() -> u32 {
    8
}

/// Configuration options for the catalog service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// SQLite database path or URL.
    pub database_url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl CatalogConfig {
    /// Loads `.env`, then `config/default.yaml` if present, then `CATALOG_*`
    /// environment variables; later sources win.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {e}");
        }
        Self::from_file(File::with_name(DEFAULT_CONFIG_PATH).required(false))
    }

    /// Same as [`Self::load`] but reads the given file source instead of the
    /// default one and skips `.env`.
    pub fn from_file<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("CATALOG").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_yaml_file_and_applies_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(file, "database_url: \"/tmp/catalog-test.db\"").unwrap();

        let config = CatalogConfig::from_file(File::from(file.path())).unwrap();
        assert_eq!(config.database_url, "/tmp/catalog-test.db");
        assert_eq!(config.max_connections, 8);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(file, "max_connections: 2").unwrap();

        assert!(CatalogConfig::from_file(File::from(file.path())).is_err());
    }
}
