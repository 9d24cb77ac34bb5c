//! Auth module: HTTP Basic credential gate.
//!
//! The gate is framework independent: it takes the raw `Authorization` header
//! bytes and answers with an identity or a rejection reason. Mapping every
//! rejection onto one opaque response is the web layer's job.

pub mod domain;
pub mod errors;
pub mod gate;

pub use domain::{AuthIdentity, ExpectedCredentials};
pub use errors::AuthRejection;
pub use gate::CredentialGate;
