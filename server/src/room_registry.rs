use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, mpsc};

use common::protocol::{Message, encode};
use common::{PeerRole, RoomName, log, log_warn};

/// Outgoing lines for one peer, without the trailing newline.
pub type PeerSender = mpsc::Sender<String>;

pub const PEER_CHANNEL_CAPACITY: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    RoomFull,
    TooManyRooms,
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::RoomFull => write!(f, "Room is full"),
            JoinError::TooManyRooms => write!(f, "Too many rooms"),
        }
    }
}

/// A peer's seat in a room, returned by [`RoomRegistry::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub room: RoomName,
    pub role: PeerRole,
    pub peer_id: PeerId,
}

struct Peer {
    id: PeerId,
    sender: PeerSender,
}

#[derive(Default)]
struct Room {
    a: Option<Peer>,
    b: Option<Peer>,
}

impl Room {
    fn slot(&self, role: PeerRole) -> &Option<Peer> {
        match role {
            PeerRole::A => &self.a,
            PeerRole::B => &self.b,
        }
    }

    fn slot_mut(&mut self, role: PeerRole) -> &mut Option<Peer> {
        match role {
            PeerRole::A => &mut self.a,
            PeerRole::B => &mut self.b,
        }
    }

    fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none()
    }
}

#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<RoomName, Room>>>,
    next_peer_id: Arc<AtomicU64>,
    max_rooms: usize,
}

impl fmt::Debug for RoomRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomRegistry")
            .field("max_rooms", &self.max_rooms)
            .finish()
    }
}

pub fn message_line(message: &Message) -> String {
    match encode(message) {
        Ok(line) => line.trim_end().to_string(),
        Err(e) => {
            log_warn!("Failed to encode {} message: {}", message.kind(), e);
            String::new()
        }
    }
}

async fn send_line(sender: &PeerSender, line: String, target: &str) {
    if let Err(e) = sender.send(line).await {
        log!("[{}] Failed to queue message: {}", target, e);
    }
}

impl RoomRegistry {
    pub fn new(max_rooms: usize) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            next_peer_id: Arc::new(AtomicU64::new(1)),
            max_rooms,
        }
    }

    /// Seats a peer in `room`. The newcomer is greeted with its role and,
    /// once both seats are taken, both peers are told the room is ready.
    pub async fn join(&self, room: &RoomName, sender: PeerSender) -> Result<Seat, JoinError> {
        let peer_id = PeerId(self.next_peer_id.fetch_add(1, Ordering::Relaxed));

        let (role, other) = {
            let mut rooms = self.rooms.lock().await;
            if !rooms.contains_key(room) && rooms.len() >= self.max_rooms {
                return Err(JoinError::TooManyRooms);
            }
            let entry = rooms.entry(room.clone()).or_default();

            let role = if entry.a.is_none() {
                PeerRole::A
            } else if entry.b.is_none() {
                PeerRole::B
            } else {
                return Err(JoinError::RoomFull);
            };

            // The greeting must be queued before the peer is reachable from
            // other joins, or a partner's `ready` could overtake it.
            if let Err(e) = sender.try_send(message_line(&Message::hello_role(role))) {
                log!("[room:{}] Failed to queue greeting: {}", room, e);
            }

            *entry.slot_mut(role) = Some(Peer {
                id: peer_id,
                sender: sender.clone(),
            });
            let other = entry.slot(role.other()).as_ref().map(|peer| peer.sender.clone());
            (role, other)
        };

        log!("[room:{}] {} joined as {}", room, peer_id, role);

        if let Some(other) = other {
            log!("[room:{}] Room is ready", room);
            let ready = message_line(&Message::Ready);
            send_line(&other, ready.clone(), room.as_str()).await;
            send_line(&sender, ready, room.as_str()).await;
        }

        Ok(Seat {
            room: room.clone(),
            role,
            peer_id,
        })
    }

    /// Relays `line` verbatim to the other seat, if it is occupied.
    pub async fn forward(&self, seat: &Seat, line: String) -> bool {
        let target = {
            let rooms = self.rooms.lock().await;
            rooms
                .get(&seat.room)
                .and_then(|room| room.slot(seat.role.other()).as_ref())
                .map(|peer| peer.sender.clone())
        };

        match target {
            Some(sender) => {
                send_line(&sender, line, seat.room.as_str()).await;
                true
            }
            None => false,
        }
    }

    /// Frees the seat if it still belongs to this peer and drops the room once
    /// nobody is left.
    pub async fn leave(&self, seat: &Seat) {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get_mut(&seat.room) else {
            return;
        };

        let slot = room.slot_mut(seat.role);
        if slot.as_ref().is_some_and(|peer| peer.id == seat.peer_id) {
            *slot = None;
            log!("[room:{}] {} ({}) left", seat.room, seat.peer_id, seat.role);
        }

        if room.is_empty() {
            rooms.remove(&seat.room);
            log!("[room:{}] Room closed", seat.room);
        }
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::protocol::decode;

    fn channel() -> (PeerSender, mpsc::Receiver<String>) {
        mpsc::channel(PEER_CHANNEL_CAPACITY)
    }

    fn room(name: &str) -> RoomName {
        RoomName::parse(name).unwrap()
    }

    #[tokio::test]
    async fn test_two_peers_pair_and_third_is_refused() {
        let registry = RoomRegistry::new(8);
        let (a_tx, mut a_rx) = channel();
        let (b_tx, mut b_rx) = channel();
        let (c_tx, _c_rx) = channel();

        let seat_a = registry.join(&room("lobby"), a_tx).await.unwrap();
        assert_eq!(seat_a.role, PeerRole::A);
        assert_eq!(decode(&a_rx.recv().await.unwrap()).unwrap(), Message::hello_role(PeerRole::A));

        let seat_b = registry.join(&room("lobby"), b_tx).await.unwrap();
        assert_eq!(seat_b.role, PeerRole::B);
        assert_eq!(decode(&b_rx.recv().await.unwrap()).unwrap(), Message::hello_role(PeerRole::B));
        assert_eq!(decode(&a_rx.recv().await.unwrap()).unwrap(), Message::Ready);
        assert_eq!(decode(&b_rx.recv().await.unwrap()).unwrap(), Message::Ready);

        assert_eq!(registry.join(&room("lobby"), c_tx).await, Err(JoinError::RoomFull));
    }

    #[tokio::test]
    async fn test_forward_reaches_only_the_other_peer() {
        let registry = RoomRegistry::new(8);
        let (a_tx, mut a_rx) = channel();
        let (b_tx, mut b_rx) = channel();
        let seat_a = registry.join(&room("r"), a_tx).await.unwrap();
        let _seat_b = registry.join(&room("r"), b_tx).await.unwrap();
        a_rx.recv().await;
        a_rx.recv().await;
        b_rx.recv().await;
        b_rx.recv().await;

        assert!(registry.forward(&seat_a, "{\"type\":\"move\",\"row\":0,\"col\":1}".to_string()).await);
        assert_eq!(b_rx.recv().await.unwrap(), "{\"type\":\"move\",\"row\":0,\"col\":1}");
        assert!(a_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_forward_without_partner_is_dropped() {
        let registry = RoomRegistry::new(8);
        let (a_tx, _a_rx) = channel();
        let seat_a = registry.join(&room("solo"), a_tx).await.unwrap();
        assert!(!registry.forward(&seat_a, "{}".to_string()).await);
    }

    #[tokio::test]
    async fn test_leave_frees_seat_and_removes_empty_room() {
        let registry = RoomRegistry::new(8);
        let (a_tx, _a_rx) = channel();
        let (b_tx, _b_rx) = channel();
        let seat_a = registry.join(&room("r"), a_tx).await.unwrap();
        let seat_b = registry.join(&room("r"), b_tx).await.unwrap();

        registry.leave(&seat_a).await;
        assert_eq!(registry.room_count().await, 1);

        let (c_tx, _c_rx) = channel();
        let seat_c = registry.join(&room("r"), c_tx).await.unwrap();
        assert_eq!(seat_c.role, PeerRole::A);

        registry.leave(&seat_b).await;
        registry.leave(&seat_c).await;
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_stale_leave_does_not_evict_new_occupant() {
        let registry = RoomRegistry::new(8);
        let (a_tx, _a_rx) = channel();
        let seat_a = registry.join(&room("r"), a_tx).await.unwrap();
        registry.leave(&seat_a).await;

        let (b_tx, _b_rx) = channel();
        let seat_b = registry.join(&room("r"), b_tx).await.unwrap();
        assert_eq!(seat_b.role, PeerRole::A);

        registry.leave(&seat_a).await;
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_greeting_always_precedes_ready() {
        let registry = RoomRegistry::new(1024);
        for i in 0..200 {
            let name = room(&format!("race-{}", i));
            let (a_tx, mut a_rx) = channel();
            let (b_tx, mut b_rx) = channel();

            let first = tokio::spawn({
                let registry = registry.clone();
                let name = name.clone();
                async move { registry.join(&name, a_tx).await }
            });
            let second = tokio::spawn({
                let registry = registry.clone();
                let name = name.clone();
                async move { registry.join(&name, b_tx).await }
            });
            first.await.unwrap().unwrap();
            second.await.unwrap().unwrap();

            for rx in [&mut a_rx, &mut b_rx] {
                let greeting = decode(&rx.recv().await.unwrap()).unwrap();
                assert!(matches!(greeting, Message::Hello { role: Some(_), .. }));
                assert_eq!(decode(&rx.recv().await.unwrap()).unwrap(), Message::Ready);
            }
        }
    }

    #[tokio::test]
    async fn test_room_limit() {
        let registry = RoomRegistry::new(1);
        let (a_tx, _a_rx) = channel();
        let (b_tx, _b_rx) = channel();
        registry.join(&room("one"), a_tx).await.unwrap();
        assert_eq!(registry.join(&room("two"), b_tx).await, Err(JoinError::TooManyRooms));
    }
}
