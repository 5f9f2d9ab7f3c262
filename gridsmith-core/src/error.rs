//! Error types for core operations.

use thiserror::Error;

use crate::ElementId;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// A project payload that does not match the project schema.
///
/// Validation is shallow: it checks the envelope and the identity/placement
/// fields of each element, nothing deeper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The payload is not valid JSON.
    #[error("malformed project JSON: {0}")]
    Malformed(String),
    /// The top-level payload is not a JSON object.
    #[error("project must be a JSON object")]
    NotAnObject,
    /// `elements` is missing or not an array.
    #[error("field `elements` must be an array")]
    ElementsNotAList,
    /// `columns` is missing, not a number, or outside `1..=12`.
    #[error("field `columns` must be a number between 1 and 12")]
    InvalidColumns,
    /// An entry of `elements` is not an object.
    #[error("elements[{index}] must be an object")]
    ElementNotAnObject {
        /// Position in the `elements` array.
        index: usize,
    },
    /// An element is missing a required field.
    #[error("elements[{index}] is missing field `{field}`")]
    MissingField {
        /// Position in the `elements` array.
        index: usize,
        /// Name of the absent field.
        field: &'static str,
    },
    /// An element id is neither a string nor a number.
    #[error("elements[{index}].id must be a string or a number")]
    InvalidId {
        /// Position in the `elements` array.
        index: usize,
    },
    /// An element coordinate is not numeric.
    #[error("elements[{index}].{field} must be a number")]
    NonNumeric {
        /// Position in the `elements` array.
        index: usize,
        /// Name of the offending field.
        field: &'static str,
    },
    /// Two elements share an id.
    #[error("elements[{index}] reuses id `{id}`")]
    DuplicateId {
        /// Position of the second occurrence.
        index: usize,
        /// The repeated id.
        id: String,
    },
    /// An element could not be decoded after validation.
    #[error("invalid element data: {0}")]
    InvalidElement(String),
}

impl ValidationError {
    /// Name of the top-level or element field this error points at.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::ElementsNotAList | Self::ElementNotAnObject { .. } => Some("elements"),
            Self::InvalidColumns => Some("columns"),
            Self::MissingField { field, .. } | Self::NonNumeric { field, .. } => Some(field),
            Self::InvalidId { .. } | Self::DuplicateId { .. } => Some("id"),
            Self::Malformed(_) | Self::NotAnObject | Self::InvalidElement(_) => None,
        }
    }
}

/// Failure of the key-value persistence collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure to read an externally supplied project file.
#[derive(Debug, Error)]
#[error("Failed to read project file: {0}")]
pub struct ReadError(#[from] pub std::io::Error);

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The payload failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Reading an external file failed.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// An element with this id is already in the store.
    #[error("Element already exists: {0}")]
    DuplicateElement(ElementId),

    /// A patch value does not fit the element schema.
    #[error("Invalid patch for element {id}: {reason}")]
    InvalidPatch {
        /// Target element.
        id: ElementId,
        /// Why the merged element failed to decode.
        reason: String,
    },

    /// A column count outside `1..=12`.
    #[error("Column count must be between 1 and 12, got {0}")]
    InvalidColumns(u32),

    /// Serialization of a project failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
