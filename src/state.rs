use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

use crate::chat::{ChannelId, ChannelTransport, ChatError, ChatMessage, UserId};
use crate::config::Config;
use crate::data::ServerMessage;
use crate::dice::SharedRoller;

pub type MemberSender = mpsc::UnboundedSender<ServerMessage>;

#[derive(Debug, Default)]
pub struct ChannelSession {
    // Maps UserId to their WebSocket sender channel
    pub members: RwLock<HashMap<UserId, MemberSender>>,
}

#[derive(Debug, Default)]
pub struct ChannelSessionManager {
    pub sessions: RwLock<HashMap<ChannelId, Arc<ChannelSession>>>,
}

impl ChannelSessionManager {
    /// Add a member to a channel, creating the channel on first join.
    pub async fn join(&self, channel_id: ChannelId, user_id: UserId, sender: MemberSender) {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(channel_id).or_insert_with(|| Arc::new(ChannelSession::default()));
        session.members.write().await.insert(user_id, sender);
    }

    /// Remove the connection registered with `sender`; the channel is dropped once empty.
    ///
    /// A newer connection for the same user keeps its entry.
    pub async fn leave(&self, channel_id: ChannelId, user_id: UserId, sender: &MemberSender) {
        let mut sessions = self.sessions.write().await;
        let now_empty = match sessions.get(&channel_id) {
            Some(session) => {
                let mut members = session.members.write().await;
                if members.get(&user_id).is_some_and(|current| current.same_channel(sender)) {
                    members.remove(&user_id);
                }
                members.is_empty()
            }
            None => false,
        };
        if now_empty {
            sessions.remove(&channel_id);
        }
    }

    /// Push `message` to every member of the channel. Returns how many members received it.
    pub async fn broadcast(&self, channel_id: ChannelId, message: ServerMessage) -> Result<usize, ChatError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&channel_id).ok_or(ChatError::ChannelNotFound(channel_id))?;

        let members = session.members.read().await;
        let mut delivered = 0;
        for (user_id, sender) in members.iter() {
            if sender.send(message.clone()).is_ok() {
                delivered += 1;
            }
            tracing::debug!(channel_id = %channel_id, to_user = %user_id, "Broadcasted message");
        }

        if delivered == 0 {
            return Err(ChatError::ChannelClosed(channel_id));
        }
        Ok(delivered)
    }

    /// Send `message` to one member only.
    pub async fn send_to(&self, channel_id: ChannelId, user_id: UserId, message: ServerMessage) {
        if let Some(session) = self.sessions.read().await.get(&channel_id) {
            if let Some(sender) = session.members.read().await.get(&user_id) {
                let _ = sender.send(message);
            }
        }
    }
}

#[async_trait]
impl ChannelTransport for ChannelSessionManager {
    async fn send(&self, message: ChatMessage) -> Result<(), ChatError> {
        let channel_id = message.channel_id;
        self.broadcast(channel_id, ServerMessage::Reply(message)).await.map(|_| ())
    }
}

pub struct AppState {
    pub roller: SharedRoller,
    pub session_manager: ChannelSessionManager,
    pub config: Arc<Config>,
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_reaches_every_member() {
        let manager = ChannelSessionManager::default();
        let channel_id = ChannelId::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        manager.join(channel_id, UserId::new(), tx1).await;
        manager.join(channel_id, UserId::new(), tx2).await;

        let msg = ServerMessage::Error { message: "hi".into() };
        assert_eq!(manager.broadcast(channel_id, msg.clone()).await.unwrap(), 2);
        assert_eq!(rx1.recv().await, Some(msg.clone()));
        assert_eq!(rx2.recv().await, Some(msg));
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_channel_fails() {
        let manager = ChannelSessionManager::default();
        let result = manager.broadcast(ChannelId::new(), ServerMessage::Error { message: "x".into() }).await;
        assert!(matches!(result, Err(ChatError::ChannelNotFound(_))));
    }

    #[tokio::test]
    async fn test_leave_drops_empty_channel() {
        let manager = ChannelSessionManager::default();
        let channel_id = ChannelId::new();
        let user_id = UserId::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        manager.join(channel_id, user_id, tx.clone()).await;

        manager.leave(channel_id, user_id, &tx).await;

        assert!(!manager.sessions.read().await.contains_key(&channel_id));
    }

    #[tokio::test]
    async fn test_stale_leave_keeps_reconnected_member() {
        let manager = ChannelSessionManager::default();
        let channel_id = ChannelId::new();
        let user_id = UserId::new();
        let (old_tx, _old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();
        manager.join(channel_id, user_id, old_tx.clone()).await;
        manager.join(channel_id, user_id, new_tx).await;

        // The first socket closes after the same user reconnected.
        manager.leave(channel_id, user_id, &old_tx).await;

        let msg = ServerMessage::Error { message: "still here".into() };
        assert_eq!(manager.broadcast(channel_id, msg.clone()).await.unwrap(), 1);
        assert_eq!(new_rx.recv().await, Some(msg));
    }

    #[tokio::test]
    async fn test_transport_send_wraps_reply() {
        let manager = ChannelSessionManager::default();
        let channel_id = ChannelId::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.join(channel_id, UserId::new(), tx).await;

        let reply = ChatMessage { channel_id, author: UserId::new(), content: "done".into() };
        manager.send(reply.clone()).await.unwrap();

        assert_eq!(rx.recv().await, Some(ServerMessage::Reply(reply)));
    }
}
