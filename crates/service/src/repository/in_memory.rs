use async_trait::async_trait;
use models::{Person, PersonId, PersonInput};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::ServiceError;
use crate::repository::PersonRepository;

struct State {
    people: Vec<Person>,
    next_id: PersonId,
}

/// Ephemeral person store. Nothing survives the process.
///
/// # Examples
/// ```
/// use models::PersonInput;
/// use service::repository::{InMemoryPersonRepository, PersonRepository};
///
/// tokio_test::block_on(async {
///     let repo = InMemoryPersonRepository::new();
///     let alice = repo.create(PersonInput::new("Alice", 30)).await.unwrap();
///     assert_eq!(alice.id, 1);
///     assert_eq!(repo.get(1).await, Some(alice));
/// });
/// ```
pub struct InMemoryPersonRepository {
    state: Mutex<State>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self { state: Mutex::new(State { people: Vec::new(), next_id: 1 }) }
    }
}

impl Default for InMemoryPersonRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn list(&self) -> Vec<Person> {
        let state = self.state.lock().await;
        state.people.clone()
    }

    async fn get(&self, id: PersonId) -> Option<Person> {
        let state = self.state.lock().await;
        state.people.iter().find(|p| p.id == id).cloned()
    }

    async fn create(&self, input: PersonInput) -> Result<Person, ServiceError> {
        let mut state = self.state.lock().await;
        let id = state.next_id;
        state.next_id = id.checked_add(1).ok_or(ServiceError::IdsExhausted { last: id })?;
        let person = input.into_person(id);
        state.people.push(person.clone());
        debug!(id, "person created in memory");
        Ok(person)
    }

    async fn update(&self, person: Person) -> Result<bool, ServiceError> {
        let mut state = self.state.lock().await;
        match state.people.iter_mut().find(|p| p.id == person.id) {
            Some(slot) => {
                *slot = person;
                Ok(true)
            }
            None => {
                debug!(id = person.id, "update ignored: no such person");
                Ok(false)
            }
        }
    }

    async fn delete(&self, id: PersonId) -> Result<bool, ServiceError> {
        let mut state = self.state.lock().await;
        let before = state.people.len();
        state.people.retain(|p| p.id != id);
        Ok(state.people.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PersonInput {
        PersonInput::new("Alice", 30)
    }

    #[tokio::test]
    async fn create_assigns_id_and_adds_person() -> Result<(), anyhow::Error> {
        let repo = InMemoryPersonRepository::new();
        let created = repo.create(alice()).await?;

        assert_eq!(created.id, 1);
        assert_eq!(repo.list().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn get_returns_what_was_created() -> Result<(), anyhow::Error> {
        let repo = InMemoryPersonRepository::new();
        let created = repo.create(PersonInput::new("Bob", 40)).await?;

        let found = repo.get(created.id).await.expect("created person is readable");
        assert_eq!(found, created);
        assert_eq!(found.name, "Bob");
        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() -> Result<(), anyhow::Error> {
        let repo = InMemoryPersonRepository::new();
        repo.create(alice()).await?;
        repo.create(PersonInput::new("Bob", 40)).await?;
        assert!(repo.get(99).await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_never_reused_after_delete() -> Result<(), anyhow::Error> {
        let repo = InMemoryPersonRepository::new();
        let a = repo.create(alice()).await?;
        let b = repo.create(PersonInput::new("Bob", 40)).await?;
        repo.delete(a.id).await?;
        let c = repo.create(PersonInput::new("Carol", 51)).await?;
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        repo.delete(b.id).await?;
        repo.delete(c.id).await?;
        let d = repo.create(PersonInput::new("Dan", 20)).await?;
        assert_eq!(d.id, 4);
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_person_data() -> Result<(), anyhow::Error> {
        let repo = InMemoryPersonRepository::new();
        let mut person = repo.create(PersonInput::new("Charlie", 25)).await?;

        person.name = "Charles".into();
        person.age = 26;
        assert!(repo.update(person.clone()).await?);

        assert_eq!(repo.get(person.id).await, Some(person));
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_id_is_silent_noop() -> Result<(), anyhow::Error> {
        let repo = InMemoryPersonRepository::new();
        repo.create(alice()).await?;
        let before = repo.list().await;

        let matched = repo.update(Person { id: 42, name: "Ghost".into(), age: 1 }).await?;
        assert!(!matched);
        assert_eq!(repo.list().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_person_and_is_idempotent() -> Result<(), anyhow::Error> {
        let repo = InMemoryPersonRepository::new();
        let person = repo.create(PersonInput::new("Daisy", 22)).await?;

        assert!(repo.delete(person.id).await?);
        assert!(repo.list().await.is_empty());
        assert!(!repo.delete(person.id).await?);
        assert!(repo.list().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn list_is_a_detached_copy() -> Result<(), anyhow::Error> {
        let repo = InMemoryPersonRepository::new();
        repo.create(alice()).await?;

        let mut snapshot = repo.list().await;
        snapshot[0].name = "Mallory".into();
        snapshot.clear();

        let again = repo.list().await;
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].name, "Alice");
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_counter_refuses_create_without_panicking() -> Result<(), anyhow::Error> {
        let repo = InMemoryPersonRepository::new();
        repo.state.lock().await.next_id = PersonId::MAX;

        let err = repo.create(alice()).await.unwrap_err();
        assert!(matches!(err, ServiceError::IdsExhausted { last } if last == PersonId::MAX));
        assert!(repo.list().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_sequential_ids() -> Result<(), anyhow::Error> {
        let repo = std::sync::Arc::new(InMemoryPersonRepository::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move { repo.create(PersonInput::new(format!("p{i}"), i)).await }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await??.id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=32).collect::<Vec<_>>());
        Ok(())
    }
}
