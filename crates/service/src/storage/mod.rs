//! Storage abstractions for the service layer
//!
//! The durable repository never touches the filesystem directly: it goes
//! through a [`FileStorage`] provider and serializes writers per file with a
//! shared [`path_lock`].

pub mod file_storage;
pub mod json_document;
pub mod path_lock;

pub use file_storage::{FileStorage, FsStorage, MemoryStorage};
pub use json_document::{JsonListDocument, LoadOutcome};
