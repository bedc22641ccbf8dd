//! # Message Protocol
//!
//! The owner of the counter understands five requests. They arrive as JSON
//! objects tagged by `type`, one per line in `serve` mode:
//!
//! | Message       | Input   | Response                          |
//! |---------------|---------|-----------------------------------|
//! | `REPLY_SENT`  | none    | `{"success": true}`               |
//! | `SYNC_COUNT`  | `count` | `{"success": true}`               |
//! | `GET_DATA`    | none    | [`DataView`]                      |
//! | `SET_GOAL`    | `goal`  | `{"success": true}` or rejection  |
//! | `RESET_COUNT` | none    | `{"success": true}`               |
//!
//! Failures of any kind answer `{"success": false, "error": "..."}`.
//!
//! The owner sends one message the other way, [`DependentMessage::ResetLocal`],
//! to dependents holding a mirror of the count.

use crate::display::DataView;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    ReplySent,
    SyncCount { count: i64 },
    GetData,
    SetGoal { goal: i64 },
    ResetCount,
}

impl Request {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Data(DataView),
    Ack(Ack),
}

impl Response {
    pub fn ok() -> Self {
        Response::Ack(Ack {
            success: true,
            error: None,
        })
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Response::Ack(Ack {
            success: false,
            error: Some(error.into()),
        })
    }

    pub fn is_success(&self) -> bool {
        match self {
            Response::Data(_) => true,
            Response::Ack(ack) => ack.success,
        }
    }
}

/// Owner → dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependentMessage {
    ResetLocal,
}
