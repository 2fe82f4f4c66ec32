//! Application configuration
//!
//! Sources, in order of precedence: CLI flags (with env fallbacks handled by
//! clap), the JSON config file, built-in defaults. The datastore URL is the
//! only setting without a default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_DATASTORE_TIMEOUT_SECS, DEFAULT_HOST,
    DEFAULT_MAX_FACET_VALUES, DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_PORT,
    ENV_DATASTORE_URL,
};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatastoreConfig {
    /// Base URL of the datastore action API
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

/// Limits applied while serving view requests
#[derive(Debug, Clone, Copy)]
pub struct ViewConfig {
    pub max_page_size: u32,
    pub default_page_size: u32,
    pub max_facet_values: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub datastore: DatastoreConfig,
    pub view: ViewConfig,
}

/// On-disk config file shape; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    datastore_url: Option<String>,
    datastore_api_key: Option<String>,
    datastore_timeout_secs: Option<u64>,
    max_page_size: Option<u32>,
    default_page_size: Option<u32>,
    max_facet_values: Option<usize>,
}

impl AppConfig {
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let file = match resolve_config_path(cli) {
            Some(path) if path.exists() => read_config_file(&path)?,
            Some(path) => {
                if cli.config.is_some() {
                    bail!("Config file not found: {}", path.display());
                }
                FileConfig::default()
            }
            None => FileConfig::default(),
        };

        let Some(url) = cli.datastore_url.clone().or(file.datastore_url) else {
            bail!(
                "No datastore URL configured. Set {} or pass --datastore-url.",
                ENV_DATASTORE_URL
            );
        };

        let max_page_size = cli
            .max_page_size
            .or(file.max_page_size)
            .unwrap_or(DEFAULT_MAX_PAGE_SIZE)
            .max(1);
        let default_page_size = cli
            .default_page_size
            .or(file.default_page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, max_page_size);

        Ok(Self {
            server: ServerConfig {
                host: cli
                    .host
                    .clone()
                    .or(file.host)
                    .unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            },
            datastore: DatastoreConfig {
                url,
                api_key: cli.datastore_api_key.clone().or(file.datastore_api_key),
                timeout_secs: cli
                    .datastore_timeout_secs
                    .or(file.datastore_timeout_secs)
                    .unwrap_or(DEFAULT_DATASTORE_TIMEOUT_SECS)
                    .max(1),
            },
            view: ViewConfig {
                max_page_size,
                default_page_size,
                max_facet_values: cli
                    .max_facet_values
                    .or(file.max_facet_values)
                    .unwrap_or(DEFAULT_MAX_FACET_VALUES)
                    .max(1),
            },
        })
    }
}

fn resolve_config_path(cli: &CliConfig) -> Option<PathBuf> {
    if let Some(path) = &cli.config {
        return Some(path.clone());
    }
    dirs::home_dir().map(|home| home.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_with_url() -> CliConfig {
        CliConfig {
            datastore_url: Some("http://ckan.local".to_string()),
            ..CliConfig::default()
        }
    }

    #[test]
    fn defaults_apply_when_nothing_configured() {
        let config = AppConfig::load(&cli_with_url()).unwrap();

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.datastore.url, "http://ckan.local");
        assert_eq!(config.view.max_page_size, DEFAULT_MAX_PAGE_SIZE);
        assert_eq!(config.view.default_page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn missing_datastore_url_is_an_error() {
        let err = AppConfig::load(&CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("datastore URL"));
    }

    #[test]
    fn file_values_fill_in_and_cli_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"port": 8080, "datastore_url": "http://file.local", "max_page_size": 200}}"#
        )
        .unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            datastore_url: Some("http://cli.local".to_string()),
            ..CliConfig::default()
        };
        let config = AppConfig::load(&cli).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.datastore.url, "http://cli.local");
        assert_eq!(config.view.max_page_size, 200);
    }

    #[test]
    fn default_page_size_clamped_to_max() {
        let cli = CliConfig {
            max_page_size: Some(10),
            default_page_size: Some(100),
            ..cli_with_url()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.view.default_page_size, 10);
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/filterview.json")),
            ..cli_with_url()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"datastore_urll": "http://typo.local"}}"#).unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..cli_with_url()
        };
        assert!(AppConfig::load(&cli).is_err());
    }
}
