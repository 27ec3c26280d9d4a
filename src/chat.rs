//! Command handling for chat channels.
//!
//! Recognises the roll command in a posted message, runs it through the dice
//! engine and delivers the reply, mentioning the author, back to the channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DiceConfig;
use crate::dice::{self, SharedRoller};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Chat mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(Uuid);

impl ChannelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub channel_id: ChannelId,
    pub author: UserId,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("channel {0} has no connected members")]
    ChannelNotFound(ChannelId),

    #[error("channel {0} is closed")]
    ChannelClosed(ChannelId),
}

/// Delivers messages to every member of a channel.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    async fn send(&self, message: ChatMessage) -> Result<(), ChatError>;
}

/// Builds the reply text for `message`, or `None` when the message is not a
/// roll command addressed to the bot.
pub fn respond(settings: &DiceConfig, roller: &SharedRoller, message: &ChatMessage) -> Option<String> {
    if message.author == settings.bot_user_id || !message.content.starts_with(&settings.command_prefix) {
        return None;
    }

    tracing::info!(
        channel_id = %message.channel_id,
        author = %message.author,
        "{}",
        flatten(&message.content)
    );

    let body = match dice::parse(&message.content) {
        Ok(pool) => dice::render(&roller.roll(pool)),
        Err(e) => {
            tracing::warn!(channel_id = %message.channel_id, author = %message.author, error = %e, "Roll command rejected");
            e.to_string()
        }
    };

    Some(format!("{}\n{}", message.author.mention(), body))
}

/// Handle a posted message, sending the bot's reply through `transport`.
///
/// Returns the reply that was delivered, if any.
#[tracing::instrument(skip_all, fields(channel_id = %message.channel_id))]
pub async fn handle_message(
    transport: &dyn ChannelTransport,
    settings: &DiceConfig,
    roller: &SharedRoller,
    message: &ChatMessage,
) -> Result<Option<ChatMessage>, ChatError> {
    let Some(content) = respond(settings, roller, message) else {
        return Ok(None);
    };

    let reply = ChatMessage { channel_id: message.channel_id, author: settings.bot_user_id, content };

    match transport.send(reply.clone()).await {
        Ok(()) => {
            tracing::info!(channel_id = %reply.channel_id, "{}", flatten(&reply.content));
            Ok(Some(reply))
        }
        Err(e) => {
            tracing::error!(channel_id = %reply.channel_id, error = %e, "Failed to send reply");
            Err(e)
        }
    }
}

fn flatten(content: &str) -> String {
    content.replace('\n', " ")
}
