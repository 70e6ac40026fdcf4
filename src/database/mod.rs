//! Document store lookups.
//!
//! A [`DocumentStore`] answers point lookups by equality on the `name` field.
//! [`MongoStore`] talks to a MongoDB server; [`MemoryStore`] holds documents
//! in process.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::{find_by_name, with_collection, MongoStore};

use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::StoreError;

/// Point lookups against a stored collection
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the first document whose `name` equals `name`, if any.
    ///
    /// An empty or non-matching collection yields `Ok(None)`.
    async fn find_one_by_name(&self, name: &str) -> Result<Option<Document>, StoreError>;
}
