//! Entity kinds and shared geometry

use std::collections::HashSet;
use uuid::Uuid;

use super::MovementIntent;

/// Identifier for any live entity. Lookups are always registry-scoped,
/// so players, bullets and walls draw from the same id space.
pub type EntityId = Uuid;

/// Identifier for a client connection (assigned by the transport layer)
pub type ConnectionId = Uuid;

/// Axis-aligned rectangle shared by every entity kind:
/// top-left position, fixed size, and facing/travel angle in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            angle: 0.0,
        }
    }

    /// Closed-interval AABB overlap test: edge-touching counts as intersecting.
    pub fn intersects(&self, other: &Body) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Distinguishes removal policy on death: humans are dropped and their
/// connection notified, bots are rescheduled for respawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Bot,
}

/// Authoritative player state
#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    /// Owning connection; bots have none
    pub conn: Option<ConnectionId>,
    pub nickname: String,
    pub kind: PlayerKind,
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    /// Ids of this player's live bullets (|set| <= bullet cap)
    pub bullets: HashSet<EntityId>,
    /// Last buffered movement intent (last-write-wins)
    pub intent: MovementIntent,
    pub score: u32,
}

impl Player {
    pub fn new(
        conn: Option<ConnectionId>,
        nickname: String,
        kind: PlayerKind,
        body: Body,
        max_health: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            conn,
            nickname,
            kind,
            body,
            health: max_health,
            max_health,
            bullets: HashSet::new(),
            intent: MovementIntent::default(),
            score: 0,
        }
    }
}

/// A live bullet, owned by the player that fired it
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: EntityId,
    pub owner: EntityId,
    pub body: Body,
}

/// Static obstacle, placed once at world start
#[derive(Debug, Clone)]
pub struct Wall {
    pub id: EntityId,
    pub body: Body,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rectangles_intersect() {
        let a = Body::new(0.0, 0.0, 10.0, 10.0);
        let b = Body::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn edge_touching_counts_as_intersecting() {
        let a = Body::new(0.0, 0.0, 10.0, 10.0);
        let b = Body::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&b));

        let c = Body::new(0.0, 10.0, 10.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn separated_rectangles_do_not_intersect() {
        let a = Body::new(0.0, 0.0, 10.0, 10.0);
        let b = Body::new(10.1, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));

        let c = Body::new(0.0, 20.0, 10.0, 10.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn center_is_midpoint() {
        let a = Body::new(10.0, 20.0, 80.0, 80.0);
        assert_eq!(a.center(), (50.0, 60.0));
    }
}
