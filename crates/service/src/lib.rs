//! Service layer for the persons API.
//! - `storage`: the file-like provider the durable store writes through.
//! - `repository`: the store contract and its in-memory and JSON backends.
//! - `auth`: the Basic credential gate run before every store operation.

pub mod auth;
pub mod errors;
pub mod repository;
pub mod storage;

pub use errors::ServiceError;
