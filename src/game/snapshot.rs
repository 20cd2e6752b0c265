//! Snapshot building for broadcast

use crate::ws::protocol::{BulletSnapshot, PlayerSnapshot, ServerMsg, WallSnapshot};

use super::world::World;

/// Serialize the full world state for broadcast. Every tick produces a
/// complete snapshot; clients render raw state without interpolation.
pub fn build_snapshot(world: &World) -> ServerMsg {
    let players: Vec<PlayerSnapshot> = world
        .players()
        .values()
        .map(|p| PlayerSnapshot {
            id: p.id,
            x: p.body.x,
            y: p.body.y,
            width: p.body.width,
            height: p.body.height,
            angle: p.body.angle,
            health: p.health,
            max_health: p.max_health,
            point: p.score,
            nickname: p.nickname.clone(),
            connection_id: p.conn,
        })
        .collect();

    let bullets: Vec<BulletSnapshot> = world
        .bullets()
        .values()
        .map(|b| BulletSnapshot {
            id: b.id,
            x: b.body.x,
            y: b.body.y,
            width: b.body.width,
            height: b.body.height,
            angle: b.body.angle,
        })
        .collect();

    let walls: Vec<WallSnapshot> = world
        .walls()
        .values()
        .map(|w| WallSnapshot {
            id: w.id,
            x: w.body.x,
            y: w.body.y,
            width: w.body.width,
            height: w.body.height,
            angle: w.body.angle,
        })
        .collect();

    ServerMsg::Snapshot {
        tick: world.tick(),
        players,
        bullets,
        walls,
    }
}
