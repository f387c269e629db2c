use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown dialect {name:?} (valid: \"legacy\", \"modern\")")]
    UnknownDialect { name: String },

    #[error("field not found: {path}")]
    FieldNotFound { path: String },

    #[error("type mismatch at {path}: expected {expected}")]
    TypeMismatch { path: String, expected: &'static str },

    #[error("{attribute} has {actual} elements, expected {expected}")]
    ArrayLengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{attribute} value does not fit the asset field width")]
    ValueOutOfRange { attribute: &'static str },

    #[error("unknown light type {value} (valid: 0=omni, 1=spot, 2=directional)")]
    UnknownLightType { value: i32 },

    #[error("definition index {index} out of range (document has {count} definitions)")]
    DefinitionIndexOutOfRange { index: i64, count: usize },

    #[error("asset unavailable: {message}")]
    AssetUnavailable { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
