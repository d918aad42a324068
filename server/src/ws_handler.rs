use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use common::protocol::Message;
use common::{RoomName, log};

use crate::room_registry::{PEER_CHANNEL_CAPACITY, RoomRegistry, message_line};

/// WebSocket peers pick their room in the upgrade URL; each text frame is
/// one protocol line.
pub async fn handle_websocket(socket: WebSocket, room: RoomName, registry: RoomRegistry, max_line_bytes: usize) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::channel::<String>(PEER_CHANNEL_CAPACITY);

    let send_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if ws_sender.send(WsMessage::Text(line.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    let seat = match registry.join(&room, tx.clone()).await {
        Ok(seat) => seat,
        Err(e) => {
            log!("[room:{}] Refused WebSocket peer: {}", room, e);
            let _ = tx.send(message_line(&Message::error(e.to_string()))).await;
            drop(tx);
            let _ = send_task.await;
            return;
        }
    };
    drop(tx);

    while let Some(result) = ws_receiver.next().await {
        let text = match result {
            Ok(WsMessage::Text(text)) => text.as_str().to_string(),
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                log!("[room:{}] WebSocket error: {}", room, e);
                break;
            }
        };

        let line = text.trim();
        if line.is_empty() || line.len() > max_line_bytes {
            continue;
        }
        registry.forward(&seat, line.to_string()).await;
    }

    registry.leave(&seat).await;
    let _ = send_task.await;
}
