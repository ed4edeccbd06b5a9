use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Collection, Filter, IdGenerator};
use crate::error::Result;
use crate::model::Document;

/// Ordered set of documents shared by the storage backends.
#[derive(Debug, Clone)]
pub(super) struct Documents<D> {
    items: Vec<D>,
}

impl<D: Document> Documents<D> {
    pub(super) fn new(items: Vec<D>) -> Self {
        Self { items }
    }

    pub(super) fn as_slice(&self) -> &[D] {
        &self.items
    }

    pub(super) fn get(&self, id: &str) -> Option<&D> {
        self.items.iter().find(|d| d.id() == id)
    }

    pub(super) fn find(&self, filter: Option<&Filter>) -> Result<Vec<D>> {
        let Some(filter) = filter else {
            return Ok(self.items.clone());
        };
        let mut found = Vec::new();
        for document in &self.items {
            if filter.matches(document)? {
                found.push(document.clone());
            }
        }
        Ok(found)
    }

    pub(super) fn insert(&mut self, ids: &IdGenerator, fields: D::Fields) -> D {
        let mut id = ids.generate();
        while self.get(&id).is_some() {
            id = ids.generate();
        }
        let document = D::from_fields(id, fields);
        self.items.push(document.clone());
        document
    }

    pub(super) fn replace(&mut self, id: &str, fields: D::Fields) -> Option<D> {
        let slot = self.items.iter_mut().find(|d| d.id() == id)?;
        *slot = D::from_fields(id.to_string(), fields);
        Some(slot.clone())
    }

    pub(super) fn remove(&mut self, id: &str) -> Option<D> {
        let pos = self.items.iter().position(|d| d.id() == id)?;
        Some(self.items.remove(pos))
    }
}

/// Collection held in process memory.
pub struct MemoryCollection<D> {
    documents: RwLock<Documents<D>>,
    ids: IdGenerator,
}

impl<D: Document> MemoryCollection<D> {
    pub fn new(ids: IdGenerator) -> Self {
        Self::with_documents(ids, Vec::new())
    }

    pub fn with_documents(ids: IdGenerator, documents: Vec<D>) -> Self {
        Self {
            documents: RwLock::new(Documents::new(documents)),
            ids,
        }
    }
}

#[async_trait]
impl<D: Document> Collection<D> for MemoryCollection<D> {
    async fn find_by_id(&self, id: &str) -> Result<Option<D>> {
        tracing::debug!(collection = D::KIND.collection(), id = %id, "Finding document");
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn find(&self, filter: Option<&Filter>) -> Result<Vec<D>> {
        tracing::debug!(collection = D::KIND.collection(), ?filter, "Finding documents");
        self.documents.read().await.find(filter)
    }

    async fn create(&self, fields: D::Fields) -> Result<D> {
        let document = self.documents.write().await.insert(&self.ids, fields);
        tracing::info!(collection = D::KIND.collection(), id = %document.id(), "Created document");
        Ok(document)
    }

    async fn find_by_id_and_update(&self, id: &str, fields: D::Fields) -> Result<Option<D>> {
        let updated = self.documents.write().await.replace(id, fields);
        if updated.is_some() {
            tracing::info!(collection = D::KIND.collection(), id = %id, "Updated document");
        }
        Ok(updated)
    }

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<D>> {
        let removed = self.documents.write().await.remove(id);
        if removed.is_some() {
            tracing::info!(collection = D::KIND.collection(), id = %id, "Deleted document");
        }
        Ok(removed)
    }
}
