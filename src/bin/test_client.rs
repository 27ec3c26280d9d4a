use futures::{SinkExt, StreamExt};
use serde::Serialize;
use six_d_six::chat::{ChannelId, UserId};
use six_d_six::data::RollResponse;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

// --- Re-definitions of DTOs ---
// The client only needs the outbound frame and request body.

#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
enum ClientMessage {
    Message { content: String },
}

#[derive(Debug, Serialize)]
struct RollRequest<'a> {
    notation: &'a str,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let notation = std::env::args().nth(1).unwrap_or_else(|| "2s1l".to_string());
    let channel_id = ChannelId::new();
    let user_id = UserId::new();
    let base_url = "http://127.0.0.1:3000";

    println!("--- 🎲 6D6 TEST CLIENT ---");
    println!("Channel ID: {}", channel_id);
    println!("User ID:    {}", user_id);

    println!("\n[1] Rolling {} over REST...", notation);
    let client = reqwest::Client::new();
    let resp = client.post(format!("{}/roll", base_url)).json(&RollRequest { notation: &notation }).send().await?;
    if resp.status().is_success() {
        let roll: RollResponse = resp.json().await?;
        println!("{}", roll.rendered);
    } else {
        println!("Server rejected roll: {}", resp.text().await?);
    }

    println!("\n[2] Rolling {} in a chat channel...", notation);
    let url = format!("ws://127.0.0.1:3000/ws/channel/{}?user_id={}", channel_id, user_id);
    let (ws_stream, _) = connect_async(url).await?;
    let (mut write, mut read) = ws_stream.split();

    let msg = serde_json::to_string(&ClientMessage::Message { content: format!("!6d6 {}", notation) })?;
    write.send(Message::Text(msg.into())).await?;

    // Joined, echo, reply.
    for _ in 0..3 {
        match read.next().await {
            Some(Ok(msg)) if msg.is_text() => println!("....[RX] {}", msg.to_text()?),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
            None => break,
        }
    }

    write.send(Message::Close(None)).await?;
    Ok(())
}
