//! Error taxonomy
//!
//! Every failure surfaced by the resolver, fetcher, dispatcher and projectors
//! is one of these variants. They bubble unmodified to the command layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpinupError {
    /// Malformed command-line input; no network call was made.
    #[error("{0}")]
    Input(String),

    /// Resource absent from every searched space, or a 404 from the backend.
    #[error("{0}")]
    NotFound(String),

    /// Non-2xx response to a GET.
    #[error("error getting resource details: {status}")]
    Fetch { status: String, endpoint: String },

    /// Non-2xx response to a PUT.
    #[error("error updating resource: {status}")]
    Update { status: String, endpoint: String },

    /// Response body (or a derived field) could not be decoded.
    #[error("failed decoding {what}: {message}")]
    Decode { what: String, message: String },

    /// Transport failure before any status was received.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unsupported resource kind: {0}")]
    UnsupportedKind(String),

    /// Duplicate name in an environment or secrets array.
    #[error("name collision mapping {field}: {name}")]
    NameCollision { field: &'static str, name: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Auth(String),
}

impl SpinupError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn decode(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            what: what.into(),
            message: err.to_string(),
        }
    }

    /// True for errors the user can fix by changing their input.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

pub type Result<T> = std::result::Result<T, SpinupError>;
