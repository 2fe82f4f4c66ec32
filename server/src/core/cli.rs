use std::path::PathBuf;

use clap::Parser;

use super::constants::{
    ENV_CONFIG, ENV_DATASTORE_API_KEY, ENV_DATASTORE_TIMEOUT_SECS, ENV_DATASTORE_URL,
    ENV_DEFAULT_PAGE_SIZE, ENV_HOST, ENV_MAX_FACET_VALUES, ENV_MAX_PAGE_SIZE, ENV_PORT,
};

#[derive(Parser, Debug, Default)]
#[command(name = "filterview")]
#[command(version, about = "Filterable table views over an external datastore", long_about = None)]
pub struct CliConfig {
    /// Server host address
    #[arg(long, short = 'H', env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Base URL of the datastore action API
    #[arg(long, env = ENV_DATASTORE_URL)]
    pub datastore_url: Option<String>,

    /// API key sent in the Authorization header of datastore calls
    #[arg(long, env = ENV_DATASTORE_API_KEY, hide_env_values = true)]
    pub datastore_api_key: Option<String>,

    /// Datastore request timeout in seconds
    #[arg(long, env = ENV_DATASTORE_TIMEOUT_SECS)]
    pub datastore_timeout_secs: Option<u64>,

    /// Hard ceiling on rows per page (requested limits are clamped, not rejected)
    #[arg(long, env = ENV_MAX_PAGE_SIZE)]
    pub max_page_size: Option<u32>,

    /// Rows per page when the request does not specify a limit
    #[arg(long, env = ENV_DEFAULT_PAGE_SIZE)]
    pub default_page_size: Option<u32>,

    /// Distinct facet values reported per column before truncation
    #[arg(long, env = ENV_MAX_FACET_VALUES)]
    pub max_facet_values: Option<usize>,
}

pub fn parse() -> CliConfig {
    CliConfig::parse()
}
