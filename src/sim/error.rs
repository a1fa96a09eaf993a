//! Level data errors
//!
//! Everything here is fatal: a level that fails to load is never shown.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("no Player entity in level {level}")]
    MissingPlayer { level: usize },

    #[error("entity {entity} in level {level} has no {field} field")]
    MissingField {
        level: usize,
        entity: String,
        field: &'static str,
    },

    #[error("field {field} of {entity} in level {level} is not a number")]
    InvalidField {
        level: usize,
        entity: String,
        field: &'static str,
    },

    #[error("level {index} requested but the project has {count}")]
    NoSuchLevel { index: usize, count: usize },

    #[error("project contains no levels")]
    EmptyProject,

    #[error("malformed level project: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read level project: {0}")]
    Io(#[from] std::io::Error),
}
