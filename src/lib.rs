//! Resolve a REST collection and the references each of its items declares.
//!
//! The resolver fetches a collection (by default the SWAPI starships list),
//! then dereferences every locator under a reference field (by default
//! `pilots`). A failed reference is recorded in its slot and never aborts the
//! run. The crate also provides a MongoDB point lookup by `name`.

mod config;
mod error;
mod reference;
mod resolver;
mod types;

pub mod database;
pub mod logging;
pub mod report;

pub use config::{
    DatabaseConfig,
    ResolverConfig,
    DEFAULT_COLLECTION_URL,
    DEFAULT_REFERENCE_FIELD,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use error::{FetchError, ReferenceFetchError, ResolutionError, StoreError};
pub use reference::Reference;
pub use resolver::{resolve_collection, Resolver};
pub use types::{
    Document,
    Item,
    ResolutionResult,
    ResolvedItem,
    ResolvedReference,
    RunMetadata,
};

/// Resolves a collection with the default configuration
///
/// # Arguments
/// * `endpoint` - The collection URL to fetch
///
/// # Example
/// ```no_run
/// use swapi_resolver::resolve;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let result = resolve("https://swapi.info/api/starships").await?;
///     println!("Resolved {} starships", result.items.len());
///     Ok(())
/// }
/// ```
pub async fn resolve(endpoint: &str) -> Result<ResolutionResult, ResolutionError> {
    resolve_collection(endpoint).await
}
