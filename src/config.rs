//! Configuration for the resolver and the document store.
//!
//! Endpoints and addresses are passed in explicitly so tests can point the
//! components at local servers.

use std::time::Duration;

use url::Url;

/// Default collection endpoint
pub const DEFAULT_COLLECTION_URL: &str = "https://swapi.info/api/starships";

/// Field holding the references on each item
pub const DEFAULT_REFERENCE_FIELD: &str = "pilots";

/// Applied to every HTTP request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "starwars";
pub const DEFAULT_COLLECTION: &str = "characters";

/// Resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Collection endpoint used by `Resolver::run_default`
    pub collection_url: String,
    /// Item field listing the references to resolve
    pub reference_field: String,
    /// Base for relative references; defaults to the collection endpoint
    pub base_url: Option<Url>,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            collection_url: DEFAULT_COLLECTION_URL.to_string(),
            reference_field: DEFAULT_REFERENCE_FIELD.to_string(),
            base_url: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ResolverConfig {
    /// Default configuration pointed at another collection endpoint
    pub fn with_collection_url(url: impl Into<String>) -> Self {
        Self {
            collection_url: url.into(),
            ..Self::default()
        }
    }
}

/// MongoDB connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string
    pub uri: String,
    /// Logical database name
    pub database: String,
    /// Collection within the database
    pub collection: String,
    /// Server selection and connect timeout
    pub timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}
