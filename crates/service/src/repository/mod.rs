//! Person store contract and its backends.
//!
//! Both backends serialize every operation (reads included) behind one
//! exclusive lock, hand out owned copies, and treat absence as a normal
//! outcome rather than an error. They deliberately differ in id policy:
//! - [`InMemoryPersonRepository`]: monotonic counter, ids never reused.
//! - [`JsonPersonRepository`]: `max(id) + 1`, so ids can be reused once the
//!   highest records are deleted.

use async_trait::async_trait;
use models::{Person, PersonId, PersonInput};

use crate::errors::ServiceError;

pub mod in_memory;
pub mod json;

pub use in_memory::InMemoryPersonRepository;
pub use json::{JsonPersonRepository, JsonRepositoryOptions};

/// Operations every person backend provides.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Snapshot of all records in insertion order.
    async fn list(&self) -> Vec<Person>;

    async fn get(&self, id: PersonId) -> Option<Person>;

    /// Assign a fresh id and insert. The returned record is the only place the
    /// assigned id is reported.
    async fn create(&self, input: PersonInput) -> Result<Person, ServiceError>;

    /// Replace the record with `person.id` wholesale.
    ///
    /// An unknown id is a silent no-op: `Ok(false)`, never an error.
    async fn update(&self, person: Person) -> Result<bool, ServiceError>;

    /// Remove the record with `id`; returns whether one existed.
    async fn delete(&self, id: PersonId) -> Result<bool, ServiceError>;
}
