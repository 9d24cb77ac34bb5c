use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::errors::ServiceError;
use crate::storage::file_storage::FileStorage;

/// What a load found at the backing path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet; an empty collection is the correct state.
    Missing,
    Loaded { records: usize },
    /// A document exists but is not a JSON list of records.
    Corrupted { reason: String },
}

/// A JSON array of `T` persisted as one whole document through a
/// [`FileStorage`] provider.
pub struct JsonListDocument<T> {
    storage: Arc<dyn FileStorage>,
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonListDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(storage: Arc<dyn FileStorage>, path: P) -> Self {
        Self { storage, path: path.into(), _marker: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document.
    ///
    /// A missing document yields an empty list. Unparseable content also
    /// yields an empty list, reported as [`LoadOutcome::Corrupted`] so the
    /// caller decides whether that is acceptable. Only provider read faults
    /// are errors.
    pub async fn load(&self) -> Result<(Vec<T>, LoadOutcome), ServiceError> {
        if !self.storage.exists(&self.path).await {
            return Ok((Vec::new(), LoadOutcome::Missing));
        }

        let text = self
            .storage
            .read(&self.path)
            .await
            .map_err(|e| ServiceError::storage(&self.path, e))?;

        match serde_json::from_str::<Option<Vec<T>>>(&text) {
            Ok(items) => {
                let items = items.unwrap_or_default();
                let records = items.len();
                Ok((items, LoadOutcome::Loaded { records }))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "stored document is not a valid record list");
                Ok((Vec::new(), LoadOutcome::Corrupted { reason: e.to_string() }))
            }
        }
    }

    /// Serialize the full list, pretty-printed, and overwrite the document.
    pub async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let json = serde_json::to_string_pretty(items)?;
        self.storage
            .write(&self.path, &json)
            .await
            .map_err(|e| ServiceError::storage(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_storage::MemoryStorage;

    fn doc(storage: &Arc<MemoryStorage>) -> JsonListDocument<String> {
        let storage: Arc<dyn FileStorage> = storage.clone();
        JsonListDocument::new(storage, "doc.json")
    }

    #[tokio::test]
    async fn missing_document_loads_empty() -> Result<(), anyhow::Error> {
        let storage = Arc::new(MemoryStorage::new());
        let (items, outcome) = doc(&storage).load().await?;
        assert!(items.is_empty());
        assert_eq!(outcome, LoadOutcome::Missing);
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_round_trips() -> Result<(), anyhow::Error> {
        let storage = Arc::new(MemoryStorage::new());
        let d = doc(&storage);
        d.save(&["a".to_string(), "b".to_string()]).await?;

        let written = storage.contents(Path::new("doc.json")).unwrap();
        assert!(written.contains('\n'), "document should be pretty-printed");

        let (items, outcome) = d.load().await?;
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(outcome, LoadOutcome::Loaded { records: 2 });
        Ok(())
    }

    #[tokio::test]
    async fn null_document_is_an_empty_list() -> Result<(), anyhow::Error> {
        let storage = Arc::new(MemoryStorage::new());
        storage.insert("doc.json", "null");
        let (items, outcome) = doc(&storage).load().await?;
        assert!(items.is_empty());
        assert_eq!(outcome, LoadOutcome::Loaded { records: 0 });
        Ok(())
    }

    #[tokio::test]
    async fn garbage_is_reported_as_corrupted() -> Result<(), anyhow::Error> {
        let storage = Arc::new(MemoryStorage::new());
        storage.insert("doc.json", "{not json");
        let (items, outcome) = doc(&storage).load().await?;
        assert!(items.is_empty());
        assert!(matches!(outcome, LoadOutcome::Corrupted { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_is_a_storage_error() {
        let storage = Arc::new(MemoryStorage::new());
        storage.fail_writes(true);
        let err = doc(&storage).save(&["a".to_string()]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage { .. }));
    }
}
