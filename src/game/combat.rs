//! Combat helpers - bullet spawning, damage, hit scanning

use std::collections::HashMap;

use super::entity::{Body, Bullet, EntityId, Player};

/// Build a bullet for `owner`: placed at the owner's center with the
/// owner's facing, then pushed out by half the owner's width so it does
/// not start inside the shooter. The push is plain displacement, not a
/// collision-checked move; a bullet born inside a wall dies on its first
/// advance instead.
pub fn spawn_bullet(owner: &Player, width: f32, height: f32) -> Bullet {
    let (cx, cy) = owner.body.center();
    let mut body = Body::new(cx, cy, width, height);
    body.angle = owner.body.angle;

    let offset = owner.body.width / 2.0;
    body.x += offset * body.angle.cos();
    body.y += offset * body.angle.sin();

    Bullet {
        id: uuid::Uuid::new_v4(),
        owner: owner.id,
        body,
    }
}

/// Find the first live player hit by `bullet`, excluding its owner.
/// At most one victim per bullet per tick.
pub fn find_victim(bullet: &Bullet, players: &HashMap<EntityId, Player>) -> Option<EntityId> {
    players
        .values()
        .find(|p| p.id != bullet.owner && bullet.body.intersects(&p.body))
        .map(|p| p.id)
}

/// Apply one point of damage, returns (new_health, died)
pub fn apply_damage(health: i32) -> (i32, bool) {
    let new_health = (health - 1).max(0);
    (new_health, new_health == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::PlayerKind;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(
            None,
            "p".to_string(),
            PlayerKind::Human,
            Body::new(x, y, 80.0, 80.0),
            10,
        )
    }

    #[test]
    fn bullet_spawns_at_center_offset_by_half_width() {
        let shooter = player_at(0.0, 0.0); // angle 0, center (40, 40)
        let bullet = spawn_bullet(&shooter, 15.0, 15.0);
        assert_eq!(bullet.owner, shooter.id);
        assert_eq!(bullet.body.angle, 0.0);
        // Center (40, 40) pushed 40 along angle 0
        assert_eq!(bullet.body.x, 80.0);
        assert_eq!(bullet.body.y, 40.0);
    }

    #[test]
    fn owner_is_never_its_own_victim() {
        let shooter = player_at(0.0, 0.0);
        let bullet = Bullet {
            id: uuid::Uuid::new_v4(),
            owner: shooter.id,
            body: shooter.body,
        };
        let players = HashMap::from([(shooter.id, shooter)]);
        assert_eq!(find_victim(&bullet, &players), None);
    }

    #[test]
    fn first_overlapping_non_owner_is_hit() {
        let shooter = player_at(0.0, 0.0);
        let target = player_at(200.0, 200.0);
        let target_id = target.id;
        let mut bullet = spawn_bullet(&shooter, 15.0, 15.0);
        bullet.body.x = 210.0;
        bullet.body.y = 210.0;
        let players = HashMap::from([(shooter.id, shooter), (target_id, target)]);
        assert_eq!(find_victim(&bullet, &players), Some(target_id));
    }

    #[test]
    fn damage_floors_at_zero() {
        assert_eq!(apply_damage(2), (1, false));
        assert_eq!(apply_damage(1), (0, true));
        assert_eq!(apply_damage(0), (0, true));
    }
}
