use thiserror::Error;

use crate::coerce::TypeHint;
use crate::tag::TagKind;

/// Every failure the engine and its surfaces can report. None of these are
/// fatal; each is scoped to the single call that produced it.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed caller input: wrong field count, empty required field, bad path.
    #[error("invalid format: {0}")]
    Format(String),

    /// A write met a non-compound where a container was needed.
    #[error("path conflict at '{segment}': found {found}, expected compound")]
    PathConflict { segment: String, found: TagKind },

    /// Text could not be coerced to the requested type.
    #[error("cannot parse '{text}' as {hint}")]
    Parse { hint: TypeHint, text: String },

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// World identifier did not resolve to a tree.
    #[error("world not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backup archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}
