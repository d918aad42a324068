use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use common::protocol::{LineReader, Message, write_line, write_message};
use common::{RoomName, log, log_warn};

use crate::room_registry::{PEER_CHANNEL_CAPACITY, RoomRegistry, message_line};

pub async fn run_tcp_listener(listener: TcpListener, registry: RoomRegistry, max_line_bytes: usize) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                log!("TCP peer connected from {}", addr);
                let registry = registry.clone();
                tokio::spawn(async move {
                    handle_tcp_peer(stream, registry, max_line_bytes).await;
                    log!("TCP peer {} disconnected", addr);
                });
            }
            Err(e) => log_warn!("Failed to accept TCP peer: {}", e),
        }
    }
}

/// A TCP peer names its room in its first line, then every further line is
/// relayed to the other seat.
pub async fn handle_tcp_peer(stream: TcpStream, registry: RoomRegistry, max_line_bytes: usize) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = LineReader::new(read_half, max_line_bytes);

    let room = match reader.next_message().await {
        Some(Message::Join { room }) => match RoomName::parse(&room) {
            Ok(room) => room,
            Err(e) => {
                let _ = write_message(&mut write_half, &Message::error(e)).await;
                return;
            }
        },
        Some(other) => {
            let error = Message::error(format!("Expected join, got {}", other.kind()));
            let _ = write_message(&mut write_half, &error).await;
            return;
        }
        None => return,
    };

    let (tx, mut rx) = mpsc::channel::<String>(PEER_CHANNEL_CAPACITY);
    let send_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = write_line(&mut write_half, &line).await {
                log!("Failed to write to TCP peer: {}", e);
                break;
            }
        }
    });

    let seat = match registry.join(&room, tx.clone()).await {
        Ok(seat) => seat,
        Err(e) => {
            log!("[room:{}] Refused TCP peer: {}", room, e);
            let _ = tx.send(message_line(&Message::error(e.to_string()))).await;
            drop(tx);
            let _ = send_task.await;
            return;
        }
    };
    drop(tx);

    while let Some(line) = reader.next_line().await {
        registry.forward(&seat, line).await;
    }

    registry.leave(&seat).await;
    let _ = send_task.await;
}
