use super::validation::ValidationErrors;
use crate::api::ApiError;
use thiserror::Error;

/// Why a submit did not save anything.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    /// Rejected before reaching the network.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// An edit form whose values match the loaded project.
    #[error("Nothing to save")]
    NothingToSave,

    /// Submit was called on a dialog that is not open.
    #[error("Dialog is closed")]
    Closed,

    #[error(transparent)]
    Api(#[from] ApiError),
}
