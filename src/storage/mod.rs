//! Document storage for roster.
//!
//! Records live in collections, one per [`RecordKind`](crate::model::RecordKind).
//! The [`Collection`] trait is the whole interface the GraphQL layer consumes:
//!
//! | operation                                   | returns                      |
//! |---------------------------------------------|------------------------------|
//! | [`find_by_id`](Collection::find_by_id)       | the document, if any         |
//! | [`find`](Collection::find)                   | matching documents, in insertion order |
//! | [`create`](Collection::create)               | the new document             |
//! | [`find_by_id_and_update`](Collection::find_by_id_and_update) | the updated document, if any |
//! | [`find_by_id_and_delete`](Collection::find_by_id_and_delete) | the deleted document, if any |
//!
//! ## Backends
//!
//! - [`MemoryCollection`]: process-local, lost on exit
//! - [`FileCollection`]: one JSON array per collection under a data directory,
//!   read on every operation and rewritten atomically on every mutation

mod file;
mod memory;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::{RosterConfig, StorageBackend};
use crate::error::Result;
use crate::model::{Company, Document, User};

pub use file::FileCollection;
pub use memory::MemoryCollection;

/// Default length of generated document ids.
pub const DEFAULT_ID_LENGTH: usize = 12;

#[async_trait]
pub trait Collection<D: Document>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<D>>;

    /// Without a filter every document is returned.
    async fn find(&self, filter: Option<&Filter>) -> Result<Vec<D>>;

    async fn create(&self, fields: D::Fields) -> Result<D>;

    /// Replaces the writable fields and returns the document as stored afterwards.
    async fn find_by_id_and_update(&self, id: &str, fields: D::Fields) -> Result<Option<D>>;

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<D>>;
}

/// Field-equality conditions matched against the serialized document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn matches<D: Serialize>(&self, document: &D) -> Result<bool> {
        if self.conditions.is_empty() {
            return Ok(true);
        }
        let value = serde_json::to_value(document)?;
        Ok(self
            .conditions
            .iter()
            .all(|(field, expected)| value.get(field) == Some(expected)))
    }
}

/// Generates opaque document ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdGenerator {
    length: usize,
}

impl IdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn generate(&self) -> String {
        const ALPHABET: [char; 36] = [
            '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g',
            'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x',
            'y', 'z',
        ];
        nanoid::format(nanoid::rngs::default, &ALPHABET, self.length)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

/// Handle on the `users` and `companies` collections.
///
/// Cheap to clone; clones share the same underlying collections.
#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn Collection<User>>,
    pub companies: Arc<dyn Collection<Company>>,
}

impl Database {
    pub fn in_memory(ids: IdGenerator) -> Self {
        Self {
            users: Arc::new(MemoryCollection::<User>::new(ids)),
            companies: Arc::new(MemoryCollection::<Company>::new(ids)),
        }
    }

    /// Opens file-backed collections stored under `data_path`.
    pub fn open_dir(data_path: &Path, ids: IdGenerator) -> Result<Self> {
        Ok(Self {
            users: Arc::new(FileCollection::<User>::open(data_path, ids)?),
            companies: Arc::new(FileCollection::<Company>::open(data_path, ids)?),
        })
    }

    /// Opens the backend selected by the configuration.
    pub fn open(config: &RosterConfig, project_root: &Path) -> Result<Self> {
        let ids = IdGenerator::new(config.storage.id_length);
        match config.storage.backend {
            StorageBackend::Memory => {
                tracing::debug!("Using in-memory storage");
                Ok(Self::in_memory(ids))
            }
            StorageBackend::File => {
                let data_path = config.data_path(project_root);
                tracing::debug!(path = %data_path.display(), "Using file storage");
                Self::open_dir(&data_path, ids)
            }
        }
    }
}
