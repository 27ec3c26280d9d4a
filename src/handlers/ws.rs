use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::instrument;

use crate::{
    chat::{self, ChannelId, ChatMessage, UserId},
    data::{ClientMessage, ServerMessage},
    state::{MemberSender, SharedState},
};

// ==============================================================================
// === Websocket Handlers
// =============================================================================
#[derive(Deserialize, Debug)]
pub struct WebSocketParams {
    pub user_id: UserId,
}

#[instrument(skip(ws, state))]
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(channel_id): Path<ChannelId>,
    Query(params): Query<WebSocketParams>,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    tracing::info!(channel_id = %channel_id, user_id = %params.user_id, "WebSocket upgrade requested.");
    ws.on_upgrade(move |socket| handle_socket(socket, channel_id, params.user_id, state))
}

/// Orchestrates the WebSocket lifecycle: Connect -> Register -> Loop -> Disconnect
async fn handle_socket(mut socket: WebSocket, channel_id: ChannelId, user_id: UserId, state: SharedState) {
    tracing::info!(channel_id = %channel_id, user_id = %user_id, "WebSocket connected.");

    if user_id == state.config.dice.bot_user_id {
        tracing::warn!(channel_id = %channel_id, "Connection rejected: bot identity is reserved.");
        let _ = socket.close().await;
        return;
    }

    let (sender_tx, mut receiver_rx) = register_member(&state, channel_id, user_id).await;

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Server -> Client
    let send_task = tokio::spawn(async move {
        while let Some(msg) = receiver_rx.recv().await {
            let json_str = serde_json::to_string(&msg).unwrap_or_default();
            if ws_sender.send(Message::Text(json_str.into())).await.is_err() {
                break;
            }
        }
    });

    // Client -> Server
    while let Some(Ok(msg)) = ws_receiver.next().await {
        if let Message::Text(text) = msg {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => process_client_message(client_msg, channel_id, user_id, &state).await,
                Err(e) => {
                    tracing::debug!(channel_id = %channel_id, user_id = %user_id, error = %e, "Malformed frame");
                    state
                        .session_manager
                        .send_to(channel_id, user_id, ServerMessage::Error { message: format!("malformed message: {e}") })
                        .await;
                }
            }
        }
    }

    handle_disconnect(&state, channel_id, user_id, &sender_tx).await;
    send_task.abort();
}

/// Add member to the channel and return their sender handle and message receiver
async fn register_member(
    state: &SharedState,
    channel_id: ChannelId,
    user_id: UserId,
) -> (MemberSender, mpsc::UnboundedReceiver<ServerMessage>) {
    let (sender_tx, sender_rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.session_manager.join(channel_id, user_id, sender_tx.clone()).await;

    let _ = state.session_manager.broadcast(channel_id, ServerMessage::MemberJoined { user_id }).await;
    (sender_tx, sender_rx)
}

/// Echo the post to the channel, then let the bot answer it
async fn process_client_message(msg: ClientMessage, channel_id: ChannelId, user_id: UserId, state: &SharedState) {
    tracing::debug!(channel_id = %channel_id, user_id = %user_id, "Received message: {:?}", msg);
    let ClientMessage::Message { content } = msg;
    let posted = ChatMessage { channel_id, author: user_id, content };

    let _ = state.session_manager.broadcast(channel_id, ServerMessage::Message(posted.clone())).await;

    // Send failures are already logged by the handler.
    let _ = chat::handle_message(&state.session_manager, &state.config.dice, &state.roller, &posted).await;
}

async fn handle_disconnect(state: &SharedState, channel_id: ChannelId, user_id: UserId, sender: &MemberSender) {
    tracing::info!(channel_id = %channel_id, user_id = %user_id, "WebSocket disconnected.");
    state.session_manager.leave(channel_id, user_id, sender).await;
}
