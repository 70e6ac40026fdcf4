//! Error types for collection resolution and document lookups.
//!
//! Collection-level failures surface as [`ResolutionError`]. Reference-level
//! failures never propagate: they are captured as [`ReferenceFetchError`]
//! values inside the resolution result.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that abort a resolution run
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The collection endpoint is empty or not an absolute URL
    #[error("Invalid endpoint: {0:?}")]
    InvalidEndpoint(String),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// The collection request failed at the transport level or returned non-2xx
    #[error("Error fetching collection {url}: {source}")]
    CollectionFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// The collection body was not a JSON array of objects
    #[error("Error decoding collection {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single HTTP GET
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport error, including timeouts and DNS failures
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}")]
    Status { status: StatusCode },

    /// The body was not valid JSON for the expected shape
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body was valid JSON but not an object
    #[error("expected a JSON object")]
    NotAnObject,
}

/// A reference that could not be resolved.
///
/// Stored in place of the resolved document; the run carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("error fetching {reference}: {reason}")]
pub struct ReferenceFetchError {
    /// The locator as it appeared on the item
    pub reference: String,
    /// Description of the underlying failure
    pub reason: String,
}

impl ReferenceFetchError {
    pub fn new(reference: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors from the document store
#[derive(Error, Debug)]
pub enum StoreError {
    /// MongoDB driver error (connection, server selection, query)
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}
