use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform JSON error body.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}
