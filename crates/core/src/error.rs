//! Error kinds shared by the core and both front ends.

/// Everything that can go wrong between reading a query and rendering its results.
///
/// Malformed fields inside a station (for example an unparsable vote count)
/// are not represented here: the converter defaults them instead of failing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Missing or malformed query parameters. The caller can fix these.
    #[error("{0}")]
    InvalidArgument(String),

    /// The directory service could not be reached or answered with an error.
    #[error("{0}")]
    ExternalService(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Error::ExternalService(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
