// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "FilterView";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "filterview";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".filterview";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "filterview.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FILTERVIEW_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "FILTERVIEW_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "FILTERVIEW_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FILTERVIEW_LOG";

// =============================================================================
// Environment Variables - Datastore
// =============================================================================

/// Environment variable for the datastore base URL
pub const ENV_DATASTORE_URL: &str = "FILTERVIEW_DATASTORE_URL";

/// Environment variable for the datastore API key
pub const ENV_DATASTORE_API_KEY: &str = "FILTERVIEW_DATASTORE_API_KEY";

/// Environment variable for the datastore request timeout in seconds
pub const ENV_DATASTORE_TIMEOUT_SECS: &str = "FILTERVIEW_DATASTORE_TIMEOUT_SECS";

// =============================================================================
// Environment Variables - View
// =============================================================================

/// Environment variable for the maximum page size
pub const ENV_MAX_PAGE_SIZE: &str = "FILTERVIEW_MAX_PAGE_SIZE";

/// Environment variable for the default page size
pub const ENV_DEFAULT_PAGE_SIZE: &str = "FILTERVIEW_DEFAULT_PAGE_SIZE";

/// Environment variable for the per-column facet value cap
pub const ENV_MAX_FACET_VALUES: &str = "FILTERVIEW_MAX_FACET_VALUES";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5410;

// =============================================================================
// Datastore Defaults
// =============================================================================

/// Default datastore request timeout in seconds
pub const DEFAULT_DATASTORE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// View Defaults
// =============================================================================

/// Hard ceiling on rows per page; requested limits are clamped to this
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 500;

/// Rows per page when the request does not specify a limit
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Distinct facet values reported per column before truncation
pub const DEFAULT_MAX_FACET_VALUES: usize = 50;

/// Maximum size of the filters query parameter in bytes (64KB)
pub const MAX_FILTER_PARAM_SIZE: u64 = 64 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Seconds to wait for background tasks during graceful shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
