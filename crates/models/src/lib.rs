//! Record types shared by the store backends and the HTTP layer.

pub mod errors;
pub mod person;

pub use person::{Person, PersonId, PersonInput};
