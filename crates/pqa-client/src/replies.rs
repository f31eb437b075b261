//! Typed views of the server's replies.
//!
//! The client itself returns raw [`serde_json::Value`]s; these types are for
//! callers that want the known shapes. Decoding is structural only: unknown
//! fields are ignored and optional fields default.

use pqa_core::error::{PqaError, Result};
use pqa_core::references::parse_references;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status value the server uses for failed calls.
pub const ERROR_STATUS: &str = "error";

/// Turns an explicit `{"status": "error", "message": ...}` reply into
/// [`PqaError::Remote`]; every other value is returned unchanged.
pub fn check_reply(method: &str, value: Value) -> Result<Value> {
    let is_error = value.get("status").and_then(Value::as_str) == Some(ERROR_STATUS);
    if !is_error {
        return Ok(value);
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown server error");
    tracing::warn!("[RpcClient] {} returned an error status: {}", method, message);
    Err(PqaError::remote(method, message))
}

/// One evidence snippet backing an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerContext {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub text_name: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Reply to `ask`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskReply {
    #[serde(default)]
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub formatted_answer: String,
    /// Numbered reference list as one block of text.
    #[serde(default)]
    pub references: String,
    #[serde(default)]
    pub contexts: Vec<AnswerContext>,
}

impl AskReply {
    /// The references split into one string per entry.
    pub fn reference_list(&self) -> Vec<String> {
        parse_references(Some(&self.references))
    }
}

/// Reply to `get_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub paper_dir: Option<String>,
    #[serde(default)]
    pub llm: Option<String>,
    #[serde(default)]
    pub embedding: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
}

impl StatusReply {
    pub fn is_initialized(&self) -> bool {
        self.status == "initialized"
    }
}

/// Reply to `get_preset_names`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetNames {
    #[serde(default)]
    pub presets: Vec<String>,
}

/// Acknowledgement returned by `initialize` and `update_settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
