//! Global constants and helpers: networking defaults, pagination, and the
//! environment-generated settings keys stripped from metadata snapshots.

/// Binary name used in user agents
pub const BINARY_NAME: &str = "indexmig";

/// Package version from Cargo.toml (set at compile time)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the user agent string for HTTP requests
pub fn user_agent() -> String {
    format!("{}/{}", BINARY_NAME, VERSION)
}

// ============================================================================
// Copy Pipeline Constants
// ============================================================================

/// Number of documents fetched per page during a copy
pub const PAGE_SIZE: usize = 100;

// ============================================================================
// Networking Constants
// ============================================================================

/// Default document-store URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:9200";

/// Default HTTP request timeout (seconds)
pub const HTTP_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Metadata Constants
// ============================================================================

/// Settings keys generated by the store when an index is created.
/// These identify the source index itself, so a snapshot must drop them
/// before it can be reapplied to create a new index.
pub const ENVIRONMENT_SETTINGS_KEYS: &[&str] =
    &["uuid", "creation_date", "version", "provided_name"];
