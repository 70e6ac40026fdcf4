//! In-memory document store.

use async_trait::async_trait;
use mongodb::bson::Document;

use super::DocumentStore;
use crate::error::StoreError;

/// In-process document store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<Document>,
}

impl MemoryStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn insert(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one_by_name(&self, name: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .documents
            .iter()
            .find(|doc| doc.get_str("name").ok() == Some(name))
            .cloned())
    }
}
