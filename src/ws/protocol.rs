//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Enter the arena with a display name
    GameStart { nickname: String },

    /// Replace the buffered movement intent wholesale.
    /// Missing flags are treated as false, not merged.
    Movement {
        #[serde(default)]
        forward: bool,
        #[serde(default)]
        back: bool,
        #[serde(default)]
        left: bool,
        #[serde(default)]
        right: bool,
    },

    /// Fire a bullet this tick (silently ignored over the cap)
    Shoot,

    /// Leave the arena; also synthesized when the socket closes
    Disconnect,

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome {
        connection_id: Uuid,
        server_time: u64,
    },

    /// Full game state, broadcast every tick
    Snapshot {
        /// Server tick number
        tick: u64,
        players: Vec<PlayerSnapshot>,
        bullets: Vec<BulletSnapshot>,
        walls: Vec<WallSnapshot>,
    },

    /// Sent only to the connection whose player just reached 0 health
    Dead,

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}

/// Player state in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Facing in radians
    pub angle: f32,
    pub health: i32,
    pub max_health: i32,
    /// Accumulated score
    pub point: u32,
    pub nickname: String,
    /// Owning connection; None for bots
    pub connection_id: Option<Uuid>,
}

/// Bullet state in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletSnapshot {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

/// Wall state in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSnapshot {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}
