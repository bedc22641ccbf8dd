use crate::model::{MAX_GOAL, MIN_GOAL};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Goal must be between {MIN_GOAL} and {MAX_GOAL}, got {0}")]
    InvalidGoal(i64),

    #[error("Count out of range: {0}")]
    InvalidCount(i64),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ReplyError>;
