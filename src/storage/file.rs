use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use super::memory::Documents;
use super::{Collection, Filter, IdGenerator};
use crate::error::{Result, RosterError};
use crate::model::Document;

/// Collection persisted as a JSON array in `<data_path>/<collection>.json`.
///
/// The file is the source of truth: every operation reads it from disk, so
/// writes made by another process on the same project (say `roster mutate`
/// next to `roster serve`) are seen by the next request. Mutations within
/// one process are serialized and rewrite the whole file atomically; a
/// mutation only becomes visible once the file has been written.
pub struct FileCollection<D> {
    path: PathBuf,
    write_lock: Mutex<()>,
    ids: IdGenerator,
    _documents: PhantomData<fn() -> D>,
}

impl<D: Document> FileCollection<D> {
    pub fn open(data_path: &Path, ids: IdGenerator) -> Result<Self> {
        std::fs::create_dir_all(data_path)?;
        let path = data_path.join(format!("{}.json", D::KIND.collection()));

        let count = read_documents::<D>(&path)?.len();
        tracing::debug!(
            collection = D::KIND.collection(),
            path = %path.display(),
            count,
            "Opened collection"
        );

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            ids,
            _documents: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Documents<D>> {
        let path = self.path.clone();
        let items = blocking(move || read_documents::<D>(&path)).await?;
        Ok(Documents::new(items))
    }

    async fn persist(&self, documents: &Documents<D>) -> Result<()> {
        let content = serde_json::to_string_pretty(documents.as_slice())?;
        let path = self.path.clone();
        blocking(move || atomic_write(&path, &content)).await
    }
}

/// Run file IO off the async worker threads.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RosterError::Storage(format!("Storage task failed: {}", e)))?
}

/// A missing or empty file is an empty collection.
fn read_documents<D: Document>(path: &Path) -> Result<Vec<D>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content)
        .map_err(|e| RosterError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write content to a file atomically using write-to-temp-then-rename.
fn atomic_write(target_path: &Path, content: &str) -> Result<()> {
    // Temp file must live in the target directory for the rename to be atomic
    let target_dir = target_path
        .parent()
        .ok_or_else(|| RosterError::Storage("Target path has no parent directory".to_string()))?;

    let mut temp_file = NamedTempFile::new_in(target_dir)
        .map_err(|e| RosterError::Storage(format!("Failed to create temp file: {}", e)))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| RosterError::Storage(format!("Failed to write to temp file: {}", e)))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| RosterError::Storage(format!("Failed to sync temp file: {}", e)))?;

    temp_file
        .persist(target_path)
        .map_err(|e| RosterError::Storage(format!("Failed to persist temp file: {}", e)))?;

    Ok(())
}

#[async_trait]
impl<D: Document> Collection<D> for FileCollection<D> {
    async fn find_by_id(&self, id: &str) -> Result<Option<D>> {
        tracing::debug!(collection = D::KIND.collection(), id = %id, "Finding document");
        Ok(self.load().await?.get(id).cloned())
    }

    async fn find(&self, filter: Option<&Filter>) -> Result<Vec<D>> {
        tracing::debug!(collection = D::KIND.collection(), ?filter, "Finding documents");
        self.load().await?.find(filter)
    }

    async fn create(&self, fields: D::Fields) -> Result<D> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.load().await?;
        let document = documents.insert(&self.ids, fields);
        self.persist(&documents).await?;

        tracing::info!(collection = D::KIND.collection(), id = %document.id(), "Created document");
        Ok(document)
    }

    async fn find_by_id_and_update(&self, id: &str, fields: D::Fields) -> Result<Option<D>> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.load().await?;
        let Some(updated) = documents.replace(id, fields) else {
            return Ok(None);
        };
        self.persist(&documents).await?;

        tracing::info!(collection = D::KIND.collection(), id = %id, "Updated document");
        Ok(Some(updated))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<D>> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.load().await?;
        let Some(removed) = documents.remove(id) else {
            return Ok(None);
        };
        self.persist(&documents).await?;

        tracing::info!(collection = D::KIND.collection(), id = %id, "Deleted document");
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Company, CompanyFields, User, UserFields};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let ids = IdGenerator::default();

        let created = {
            let companies = FileCollection::<Company>::open(temp_dir.path(), ids).unwrap();
            companies
                .create(CompanyFields::new("Acme", "Go"))
                .await
                .unwrap()
        };

        let reopened = FileCollection::<Company>::open(temp_dir.path(), ids).unwrap();
        assert_eq!(reopened.find(None).await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_collection_file_is_named_after_collection() {
        let temp_dir = TempDir::new().unwrap();
        let users = FileCollection::<User>::open(temp_dir.path(), IdGenerator::default()).unwrap();
        users.create(UserFields::new("Ann", 30)).await.unwrap();

        assert_eq!(users.path(), temp_dir.path().join("users.json"));
        let content = std::fs::read_to_string(users.path()).unwrap();
        assert!(content.contains("\"firstName\": \"Ann\""));
        assert!(content.contains("\"_id\""));
    }

    #[tokio::test]
    async fn test_update_and_delete_are_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let ids = IdGenerator::default();
        let users = FileCollection::<User>::open(temp_dir.path(), ids).unwrap();

        let ann = users.create(UserFields::new("Ann", 30)).await.unwrap();
        let bob = users.create(UserFields::new("Bob", 40)).await.unwrap();

        users
            .find_by_id_and_update(&ann.id, UserFields::new("Ann", 0))
            .await
            .unwrap();
        users.find_by_id_and_delete(&bob.id).await.unwrap();

        let reopened = FileCollection::<User>::open(temp_dir.path(), ids).unwrap();
        let all = reopened.find(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, ann.id);
        assert_eq!(all[0].age, 0);
    }

    #[tokio::test]
    async fn test_missing_id_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let companies =
            FileCollection::<Company>::open(temp_dir.path(), IdGenerator::default()).unwrap();

        let deleted = companies.find_by_id_and_delete("missing").await.unwrap();
        assert_eq!(deleted, None);
        assert!(!companies.path().exists());
    }

    #[tokio::test]
    async fn test_handles_on_one_directory_see_each_others_writes() {
        let temp_dir = TempDir::new().unwrap();
        let ids = IdGenerator::default();
        let cli = FileCollection::<Company>::open(temp_dir.path(), ids).unwrap();
        let server = FileCollection::<Company>::open(temp_dir.path(), ids).unwrap();

        let from_cli = cli.create(CompanyFields::new("FromCli", "a")).await.unwrap();
        assert_eq!(server.find(None).await.unwrap(), vec![from_cli.clone()]);
        assert_eq!(
            server.find_by_id(&from_cli.id).await.unwrap(),
            Some(from_cli.clone())
        );

        let from_server = server
            .create(CompanyFields::new("FromServer", "b"))
            .await
            .unwrap();

        let reopened = FileCollection::<Company>::open(temp_dir.path(), ids).unwrap();
        let names: Vec<String> = reopened
            .find(None)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["FromCli", "FromServer"]);
        assert_eq!(cli.find(None).await.unwrap().len(), 2);
        assert!(cli.find_by_id(&from_server.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_sees_record_created_by_other_handle() {
        let temp_dir = TempDir::new().unwrap();
        let ids = IdGenerator::default();
        let first = FileCollection::<User>::open(temp_dir.path(), ids).unwrap();
        let second = FileCollection::<User>::open(temp_dir.path(), ids).unwrap();

        let ann = first.create(UserFields::new("Ann", 30)).await.unwrap();
        let updated = second
            .find_by_id_and_update(&ann.id, UserFields::new("Ann", 31))
            .await
            .unwrap();
        assert_eq!(updated.map(|u| u.age), Some(31));

        let deleted = first.find_by_id_and_delete(&ann.id).await.unwrap();
        assert_eq!(deleted.map(|u| u.age), Some(31));
        assert!(second.find(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_creates_in_one_process_are_all_kept() {
        let temp_dir = TempDir::new().unwrap();
        let companies = std::sync::Arc::new(
            FileCollection::<Company>::open(temp_dir.path(), IdGenerator::default()).unwrap(),
        );

        let mut tasks = Vec::new();
        for i in 0..8 {
            let companies = companies.clone();
            tasks.push(tokio::spawn(async move {
                companies
                    .create(CompanyFields::new(format!("Co{i}"), "s"))
                    .await
                    .unwrap()
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(companies.find(None).await.unwrap().len(), 8);
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("companies.json"), "{not json").unwrap();

        let result = FileCollection::<Company>::open(temp_dir.path(), IdGenerator::default());
        assert!(matches!(result, Err(RosterError::Storage(_))));
    }
}
