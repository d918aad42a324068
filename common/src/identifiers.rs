use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ROOM: &str = "default";
pub const MAX_ROOM_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    /// Room names are 1..=64 ASCII letters, digits, `-` or `_`.
    pub fn parse(name: &str) -> Result<Self, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Room name must not be empty".to_string());
        }
        if name.len() > MAX_ROOM_NAME_LEN {
            return Err(format!("Room name must be at most {} characters", MAX_ROOM_NAME_LEN));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(format!("Room name '{}' contains invalid characters", name));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoomName {
    fn default() -> Self {
        Self(DEFAULT_ROOM.to_string())
    }
}

impl From<RoomName> for String {
    fn from(name: RoomName) -> Self {
        name.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arrival order inside a relay room. The first peer hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerRole {
    A,
    B,
}

impl PeerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeerRole::A => "a",
            PeerRole::B => "b",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            PeerRole::A => PeerRole::B,
            PeerRole::B => PeerRole::A,
        }
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
