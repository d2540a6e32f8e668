//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A data type name could not be parsed.
    #[error("unknown data type: {0}")]
    UnknownDataType(String),

    /// A base element name is not part of the base model.
    #[error("unknown base element: {0}")]
    UnknownBaseElement(String),
}
