use std::time::Duration;

use common::protocol::{DEFAULT_MAX_LINE_BYTES, LineReader, Message, write_message};
use common::{PeerRole, RoomName, log};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use super::p2p::connect;
use super::session::OnlineRole;

pub struct RelayConnection {
    pub role: OnlineRole,
    pub reader: LineReader<OwnedReadHalf>,
    pub writer: OwnedWriteHalf,
}

/// Joins `room` on the relay. The first peer in a room hosts as X, the
/// second joins as O.
pub async fn join_room(address: &str, room: &RoomName, timeout: Duration) -> Result<RelayConnection, String> {
    let stream = connect(address, timeout).await?;
    let (read_half, mut writer) = stream.into_split();

    let join = Message::Join {
        room: room.to_string(),
    };
    write_message(&mut writer, &join)
        .await
        .map_err(|e| format!("Failed to join room {}: {}", room, e))?;

    let mut reader = LineReader::new(read_half, DEFAULT_MAX_LINE_BYTES);
    let role = match reader.next_message().await {
        Some(Message::Hello {
            role: Some(PeerRole::A),
            ..
        }) => OnlineRole::Host,
        Some(Message::Hello {
            role: Some(PeerRole::B),
            ..
        }) => OnlineRole::Joiner,
        Some(Message::Error { message }) => return Err(message),
        Some(other) => return Err(format!("Unexpected {} from relay", other.kind())),
        None => return Err("Relay closed the connection".to_string()),
    };
    log!("Joined room {} as {:?}", room, role);

    Ok(RelayConnection { role, reader, writer })
}
