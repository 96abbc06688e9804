use thiserror::Error;

use crate::tree::Tag;

pub type Result<T> = std::result::Result<T, PathError>;

/// Everything that can go wrong while parsing a path or applying it to a tree.
///
/// Syntax-class errors (`Syntax`, `InvalidNode`) carry the cursor offset
/// relative to the start of the text being parsed. Evaluation errors are
/// raised before the offending parent is mutated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("{message} at position {offset}")]
    Syntax { message: String, offset: usize },

    #[error("Invalid NBT path element at position {offset}")]
    InvalidNode { offset: usize },

    #[error("Found no elements matching {path}")]
    NothingFound { path: String },

    #[error("Tag too deep")]
    TooDeep,

    #[error("Invalid index: {index}")]
    InvalidIndex { index: i64 },

    #[error("Expected list, got: {found}")]
    ExpectedList { found: Tag },

    #[error("json error: {0}")]
    Json(String),
}

impl PathError {
    pub fn syntax(message: impl Into<String>, offset: usize) -> Self {
        PathError::Syntax {
            message: message.into(),
            offset,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            PathError::Syntax { .. } => "path-parse-syntax-error",
            PathError::InvalidNode { .. } => "path-invalid-node",
            PathError::NothingFound { .. } => "path-nothing-found",
            PathError::TooDeep => "path-data-too-deep",
            PathError::InvalidIndex { .. } => "path-invalid-index",
            PathError::ExpectedList { .. } => "path-expected-list",
            PathError::Json(_) => "json-conversion-error",
        }
    }

    /// Cursor offset for errors raised while reading text.
    pub fn offset(&self) -> Option<usize> {
        match self {
            PathError::Syntax { offset, .. } | PathError::InvalidNode { offset } => Some(*offset),
            _ => None,
        }
    }
}
