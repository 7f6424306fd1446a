use thiserror::Error;

/// The only failure the engine reports: an input outside its domain.
/// Raised before any computation, so no partial result is ever produced.
#[derive(Debug, Error)]
pub enum EmiError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl EmiError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        EmiError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
