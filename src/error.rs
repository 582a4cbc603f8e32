//! Error types for schema derivation

use thiserror::Error;

use crate::model::ColumnType;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema derivation errors
///
/// Hard errors are raised at registration time so that a misconfigured
/// enhancement is caught close to its declaration. Generation itself only
/// fails with [`SchemaError::InvalidModel`] on an unregistered model.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("`{0}` is not a registered record model")]
    InvalidModel(String),

    #[error("`{field}` is not an attribute of model `{model}`")]
    UnknownField { model: String, field: String },

    #[error("invalid option `{keyword}` for `{field}`: {reason}")]
    InvalidOption {
        field: String,
        keyword: String,
        reason: String,
    },

    #[error("{keyword} value for `{field}` does not match type {expected}")]
    TypeMismatch {
        field: String,
        keyword: &'static str,
        expected: ColumnType,
    },

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
