use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, UserId};
use crate::dice::{Pool, Results};

// --- DTOs (Data Transfer Objects) ---
#[derive(Debug, Deserialize, Serialize)]
pub struct RollRequest {
    pub notation: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RollResponse {
    pub pool: Pool,
    pub results: Results,
    pub skill_successes: usize,
    pub luck_successes: usize,
    pub rendered: String,
}

impl RollResponse {
    pub fn new(pool: Pool, results: Results) -> Self {
        Self {
            skill_successes: results.skill_successes(),
            luck_successes: results.luck_successes(),
            rendered: results.to_string(),
            pool,
            results,
        }
    }
}

// --- WebSocket frames ---
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    Message { content: String },
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// A member posted to the channel.
    Message(ChatMessage),
    /// The bot answered a command.
    Reply(ChatMessage),
    MemberJoined { user_id: UserId },
    Error { message: String },
}
