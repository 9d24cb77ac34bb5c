use thiserror::Error;

/// Why a request was turned away. Internal only: callers must not expose
/// the variant to clients.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("missing credential")]
    MissingCredential,
    #[error("malformed credential")]
    MalformedCredential,
    #[error("authentication not configured")]
    NotConfigured,
    #[error("invalid credential")]
    InvalidCredential,
}

impl AuthRejection {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthRejection::MissingCredential => 1301,
            AuthRejection::MalformedCredential => 1302,
            AuthRejection::NotConfigured => 1303,
            AuthRejection::InvalidCredential => 1304,
        }
    }
}
