//! MongoDB-backed document store.

use std::future::Future;

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, info, instrument};

use super::DocumentStore;
use crate::config::DatabaseConfig;
use crate::error::StoreError;

/// A handle on one MongoDB collection
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<Document>,
}

impl MongoStore {
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }

    /// Name of the underlying collection
    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[instrument(skip(self))]
    async fn find_one_by_name(&self, name: &str) -> Result<Option<Document>, StoreError> {
        let found = self.collection.find_one(doc! { "name": name }).await?;
        debug!(found = found.is_some(), "Point lookup");
        Ok(found)
    }
}

async fn connect(config: &DatabaseConfig) -> Result<Client, StoreError> {
    let mut options = ClientOptions::parse(config.uri.as_str()).await?;
    options.server_selection_timeout = Some(config.timeout);
    options.connect_timeout = Some(config.timeout);
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

    Ok(Client::with_options(options)?)
}

/// Runs `f` against the configured collection.
///
/// The client is acquired once before `f` runs and shut down once after it
/// finishes, whether `f` succeeded or not.
pub async fn with_collection<F, Fut, T>(config: &DatabaseConfig, f: F) -> Result<T, StoreError>
where
    F: FnOnce(MongoStore) -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let client = connect(config).await?;
    info!(database = %config.database, collection = %config.collection, "MongoDB client ready");

    let store = MongoStore::new(
        client
            .database(&config.database)
            .collection::<Document>(&config.collection),
    );
    let outcome = f(store).await;

    client.shutdown().await;
    debug!("MongoDB client shut down");

    outcome
}

/// Looks up one document by name using a scoped connection
pub async fn find_by_name(config: &DatabaseConfig, name: &str) -> Result<Option<Document>, StoreError> {
    with_collection(config, |store| async move { store.find_one_by_name(name).await }).await
}
