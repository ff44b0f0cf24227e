//! Response types for the messages service.

use serde::Deserialize;
use serde_json::Value;

/// Response from `chat.postMessage`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMessageResponse {
    /// Success indicator
    #[serde(default)]
    pub success: bool,
    /// Failure reason
    #[serde(default)]
    pub error: Option<String>,
    /// Channel the message landed in
    #[serde(default)]
    pub channel: Option<String>,
    /// Server timestamp of the message
    #[serde(default)]
    pub ts: Option<Value>,
}
