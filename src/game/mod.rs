//! Game simulation modules

pub mod bot;
pub mod combat;
pub mod entity;
pub mod physics;
pub mod snapshot;
pub mod world;

pub use world::{GameWorld, WorldHandle};

use crate::ws::protocol::ClientMsg;

use entity::ConnectionId;

/// Command received from a connection, consumed by the world task at
/// the top of the next tick
#[derive(Debug, Clone)]
pub struct PlayerCommand {
    pub conn: ConnectionId,
    pub msg: ClientMsg,
    pub received_at: u64,
}

/// Buffered directional flags for one player. Replaced wholesale by
/// each `movement` command (last-write-wins, never merged); the tick
/// loop reads whatever combination is set, without assuming the flags
/// are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}
