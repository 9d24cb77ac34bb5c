use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use models::{Person, PersonId, PersonInput};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::errors::ServiceError;
use crate::repository::PersonRepository;
use crate::storage::{
    file_storage::FileStorage,
    json_document::{JsonListDocument, LoadOutcome},
    path_lock::{self, ResourceLock},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonRepositoryOptions {
    /// Refuse to open over a document that does not parse, instead of
    /// starting empty.
    pub strict_load: bool,
}

/// Person store persisted as one JSON document.
///
/// Every mutation rewrites the whole document. The new collection only
/// replaces the in-memory one after the write succeeds, so a failed write
/// leaves both the file and memory at the previous state.
pub struct JsonPersonRepository {
    document: JsonListDocument<Person>,
    people: Mutex<Vec<Person>>,
    lock: ResourceLock,
    load_outcome: LoadOutcome,
}

impl JsonPersonRepository {
    /// Open with lenient loading: a missing or unparseable document yields an
    /// empty store.
    pub async fn open<P: Into<PathBuf>>(path: P, storage: Arc<dyn FileStorage>) -> Result<Arc<Self>, ServiceError> {
        Self::open_with(path, storage, JsonRepositoryOptions::default()).await
    }

    pub async fn open_with<P: Into<PathBuf>>(
        path: P,
        storage: Arc<dyn FileStorage>,
        options: JsonRepositoryOptions,
    ) -> Result<Arc<Self>, ServiceError> {
        let document = JsonListDocument::new(storage, path);
        let lock = path_lock::lock_for(document.path());

        let (people, load_outcome) = {
            let _guard = lock.lock().await;
            document.load().await?
        };

        match &load_outcome {
            LoadOutcome::Corrupted { reason } if options.strict_load => {
                return Err(ServiceError::Corrupt { path: document.path().to_path_buf(), reason: reason.clone() });
            }
            LoadOutcome::Corrupted { reason } => {
                warn!(
                    path = %document.path().display(),
                    %reason,
                    "person store starting empty over an unreadable document; the next write will replace it"
                );
            }
            LoadOutcome::Missing => {
                info!(path = %document.path().display(), "person store starting empty: no document yet");
            }
            LoadOutcome::Loaded { records } => {
                info!(path = %document.path().display(), records, "person store loaded");
            }
        }

        Ok(Arc::new(Self { document, people: Mutex::new(people), lock, load_outcome }))
    }

    /// How the backing document looked when this store was opened.
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Write `next` and, only on success, make it the live collection.
    async fn persist(&self, live: &mut Vec<Person>, next: Vec<Person>) -> Result<(), ServiceError> {
        if let Err(e) = self.document.save(&next).await {
            error!(path = %self.document.path().display(), error = %e, "failed to persist person store; change discarded");
            return Err(e);
        }
        *live = next;
        Ok(())
    }
}

#[async_trait]
impl PersonRepository for JsonPersonRepository {
    async fn list(&self) -> Vec<Person> {
        let _guard = self.lock.lock().await;
        self.people.lock().await.clone()
    }

    async fn get(&self, id: PersonId) -> Option<Person> {
        let _guard = self.lock.lock().await;
        let people = self.people.lock().await;
        people.iter().find(|p| p.id == id).cloned()
    }

    async fn create(&self, input: PersonInput) -> Result<Person, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut people = self.people.lock().await;

        let id = match people.iter().map(|p| p.id).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or(ServiceError::IdsExhausted { last: max })?,
        };
        let person = input.into_person(id);

        let mut next = people.clone();
        next.push(person.clone());
        self.persist(&mut people, next).await?;

        info!(id, path = %self.document.path().display(), "person created");
        Ok(person)
    }

    async fn update(&self, person: Person) -> Result<bool, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut people = self.people.lock().await;

        let Some(index) = people.iter().position(|p| p.id == person.id) else {
            info!(id = person.id, "update ignored: no such person");
            return Ok(false);
        };

        let id = person.id;
        let mut next = people.clone();
        next[index] = person;
        self.persist(&mut people, next).await?;

        info!(id, "person updated");
        Ok(true)
    }

    async fn delete(&self, id: PersonId) -> Result<bool, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut people = self.people.lock().await;

        let mut next = people.clone();
        next.retain(|p| p.id != id);
        let existed = next.len() != people.len();
        self.persist(&mut people, next).await?;

        info!(id, existed, "person deleted");
        Ok(existed)
    }
}
