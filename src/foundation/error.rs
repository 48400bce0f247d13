/// Result alias used across the crate.
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Errors raised at the crate boundary.
///
/// Strategy selection and per-pixel execution never fail; these cover buffer construction,
/// configuration parsing and backend availability.
#[derive(thiserror::Error, Debug)]
pub enum ViewerError {
    /// Invalid caller-provided data (buffer shapes, settings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Backend could not be created or failed while executing.
    #[error("backend error: {0}")]
    Backend(String),

    /// Configuration (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, with source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ViewerError {
    /// Build a [`ViewerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ViewerError::Backend`] value.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Build a [`ViewerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
