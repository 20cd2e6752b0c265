//! World state and authoritative tick loop

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::util::time::{millis_to_ticks, TICK_DURATION_MICROS};
use crate::ws::protocol::{ClientMsg, ServerMsg};
use crate::ws::ConnectionRegistry;

use super::bot::BotPolicy;
use super::combat;
use super::entity::{Body, Bullet, ConnectionId, EntityId, Player, PlayerKind, Wall};
use super::physics::{attempt_move, FieldBounds};
use super::snapshot::build_snapshot;
use super::{MovementIntent, PlayerCommand};

/// A deferred action evaluated by the tick loop. Keeping these on the
/// world's own clock means there are no free-running timers to race
/// against the simulation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ScheduledTask {
    due_tick: u64,
    action: TaskAction,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum TaskAction {
    /// Spawn a replacement bot carrying the dead bot's display name
    RespawnBot { nickname: String },
}

/// Observable outcome of a tick, consumed by the transport driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    PlayerDied {
        player_id: EntityId,
        /// Set for humans; the transport notifies this connection
        conn: Option<ConnectionId>,
    },
}

/// Authoritative simulation state: the three entity registries, the
/// task queue and the RNG. All mutation happens inside `run_tick` or a
/// command handler, both of which execute on the world task.
pub struct World {
    config: GameConfig,
    field: FieldBounds,
    tick: u64,
    players: HashMap<EntityId, Player>,
    bullets: HashMap<EntityId, Bullet>,
    walls: HashMap<EntityId, Wall>,
    /// Connection -> player binding for command dispatch
    conn_index: HashMap<ConnectionId, EntityId>,
    tasks: BinaryHeap<Reverse<ScheduledTask>>,
    rng: ChaCha8Rng,
}

impl World {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let field = FieldBounds {
            width: config.field_width,
            height: config.field_height,
        };

        let mut world = Self {
            field,
            tick: 0,
            players: HashMap::new(),
            bullets: HashMap::new(),
            walls: HashMap::new(),
            conn_index: HashMap::new(),
            tasks: BinaryHeap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        };

        world.place_walls();
        for i in 1..=world.config.bot_count {
            world.spawn_player(None, BotPolicy::nickname(i), PlayerKind::Bot);
        }
        world
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn players(&self) -> &HashMap<EntityId, Player> {
        &self.players
    }

    pub fn bullets(&self) -> &HashMap<EntityId, Bullet> {
        &self.bullets
    }

    pub fn walls(&self) -> &HashMap<EntityId, Wall> {
        &self.walls
    }

    /// Place the fixed set of walls. Walls may overlap each other;
    /// only players avoid walls at spawn time.
    fn place_walls(&mut self) {
        for _ in 0..self.config.wall_count {
            let x = self
                .rng
                .gen_range(0.0..self.config.field_width - self.config.wall_width);
            let y = self
                .rng
                .gen_range(0.0..self.config.field_height - self.config.wall_height);
            let wall = Wall {
                id: uuid::Uuid::new_v4(),
                body: Body::new(x, y, self.config.wall_width, self.config.wall_height),
            };
            self.walls.insert(wall.id, wall);
        }
    }

    /// Insert a new player, resampling its position until it overlaps
    /// no wall. Returns the new player's id.
    pub fn spawn_player(
        &mut self,
        conn: Option<ConnectionId>,
        nickname: String,
        kind: PlayerKind,
    ) -> EntityId {
        let body = loop {
            let x = self
                .rng
                .gen_range(0.0..self.config.field_width - self.config.player_width);
            let y = self
                .rng
                .gen_range(0.0..self.config.field_height - self.config.player_height);
            let candidate = Body::new(x, y, self.config.player_width, self.config.player_height);
            if !self.walls.values().any(|w| candidate.intersects(&w.body)) {
                break candidate;
            }
        };

        let player = Player::new(conn, nickname, kind, body, self.config.player_max_health);
        let id = player.id;
        if let Some(conn) = conn {
            self.conn_index.insert(conn, id);
        }
        self.players.insert(id, player);
        id
    }

    /// Remove a player together with everything that references it:
    /// its live bullets and its connection binding.
    pub fn remove_player(&mut self, id: EntityId) {
        if let Some(player) = self.players.remove(&id) {
            for bullet_id in &player.bullets {
                self.bullets.remove(bullet_id);
            }
            if let Some(conn) = player.conn {
                self.conn_index.remove(&conn);
            }
        }
        debug_assert!(self.bullets.values().all(|b| b.owner != id));
    }

    /// Fire a bullet for `owner`. Rejected (returns None) when the
    /// owner is gone or already at the bullet cap.
    pub fn spawn_bullet(&mut self, owner_id: EntityId) -> Option<EntityId> {
        let owner = self.players.get(&owner_id)?;
        if owner.bullets.len() >= self.config.bullet_cap {
            return None;
        }

        let bullet = combat::spawn_bullet(owner, self.config.bullet_width, self.config.bullet_height);
        let id = bullet.id;
        self.bullets.insert(id, bullet);
        if let Some(owner) = self.players.get_mut(&owner_id) {
            owner.bullets.insert(id);
        }
        Some(id)
    }

    /// Remove a bullet and discard it from its owner's owned set
    pub fn remove_bullet(&mut self, id: EntityId) {
        if let Some(bullet) = self.bullets.remove(&id) {
            if let Some(owner) = self.players.get_mut(&bullet.owner) {
                owner.bullets.remove(&id);
            }
        }
    }

    // ------------------------------------------------------------------
    // Command handlers. These run on the world task between ticks, so
    // they may touch the registries directly.
    // ------------------------------------------------------------------

    /// `game_start`: bind a player to this connection. No-op if the
    /// connection already has one.
    pub fn handle_game_start(&mut self, conn: ConnectionId, nickname: String) {
        if self.conn_index.contains_key(&conn) {
            debug!(conn_id = %conn, "game_start ignored, player already bound");
            return;
        }
        let id = self.spawn_player(Some(conn), nickname, PlayerKind::Human);
        info!(conn_id = %conn, player_id = %id, "Player entered the arena");
    }

    /// `movement`: replace the bound player's buffered intent wholesale.
    /// Ignored when no live player is bound.
    pub fn handle_movement(&mut self, conn: ConnectionId, intent: MovementIntent) {
        if let Some(id) = self.conn_index.get(&conn) {
            if let Some(player) = self.players.get_mut(id) {
                player.intent = intent;
            }
        }
    }

    /// `shoot`: policy rejections (no player, over the cap) are silent
    pub fn handle_shoot(&mut self, conn: ConnectionId) {
        if let Some(&id) = self.conn_index.get(&conn) {
            self.spawn_bullet(id);
        }
    }

    /// `disconnect`: drop the bound player immediately. Distinct from
    /// the death path; no respawn of any kind.
    pub fn handle_disconnect(&mut self, conn: ConnectionId) {
        if let Some(&id) = self.conn_index.get(&conn) {
            self.remove_player(id);
            info!(conn_id = %conn, player_id = %id, "Player disconnected");
        }
    }

    // ------------------------------------------------------------------
    // Tick pass
    // ------------------------------------------------------------------

    /// Advance the simulation by exactly one tick: apply buffered
    /// intents, drive bots, advance bullets and resolve combat, then
    /// fire due scheduled tasks. Returns the events observers need.
    pub fn run_tick(&mut self) -> Vec<WorldEvent> {
        self.tick += 1;

        self.apply_intents();
        self.drive_bots();
        let events = self.update_bullets();
        self.run_due_tasks();

        debug_assert!(self
            .players
            .values()
            .all(|p| p.health >= 1 && p.health <= p.max_health));

        events
    }

    /// Translate each player's buffered flags into moves, in a fixed
    /// order: forward, back, left, right. Forward and back both apply
    /// when both are set (they cancel); turning is unconditional.
    fn apply_intents(&mut self) {
        let ids: Vec<EntityId> = self.players.keys().copied().collect();
        for id in ids {
            let Some(player) = self.players.get_mut(&id) else {
                continue;
            };
            let intent = player.intent;
            if intent.forward {
                attempt_move(
                    &mut player.body,
                    self.config.walk_step,
                    self.field,
                    &self.walls,
                );
            }
            if intent.back {
                attempt_move(
                    &mut player.body,
                    -self.config.walk_step,
                    self.field,
                    &self.walls,
                );
            }
            if intent.left {
                player.body.angle -= self.config.turn_step;
            }
            if intent.right {
                player.body.angle += self.config.turn_step;
            }
        }
    }

    /// Per-tick bot policy: walk forward, pick a fresh heading when
    /// blocked, occasionally fire. Bots use the same resolver paths as
    /// humans.
    fn drive_bots(&mut self) {
        let bot_ids: Vec<EntityId> = self
            .players
            .values()
            .filter(|p| p.kind == PlayerKind::Bot)
            .map(|p| p.id)
            .collect();

        for id in bot_ids {
            let Some(bot) = self.players.get_mut(&id) else {
                continue;
            };
            let moved = attempt_move(
                &mut bot.body,
                self.config.walk_step,
                self.field,
                &self.walls,
            );
            if !moved {
                bot.body.angle = BotPolicy::random_heading(&mut self.rng);
            }

            let decision = BotPolicy::decide(&mut self.rng, self.config.bot_shoot_probability);
            if decision.shoot {
                self.spawn_bullet(id);
            }
        }
    }

    /// Advance every bullet and resolve hits. A bullet rejected by the
    /// resolver hit a wall or the field edge and is destroyed without
    /// scanning players. A successful move damages at most one victim.
    fn update_bullets(&mut self) -> Vec<WorldEvent> {
        let mut events = Vec::new();

        let ids: Vec<EntityId> = self.bullets.keys().copied().collect();
        for id in ids {
            let moved = {
                let Some(bullet) = self.bullets.get_mut(&id) else {
                    continue;
                };
                attempt_move(
                    &mut bullet.body,
                    self.config.bullet_step,
                    self.field,
                    &self.walls,
                )
            };
            if !moved {
                self.remove_bullet(id);
                continue;
            }

            let Some(bullet) = self.bullets.get(&id) else {
                continue;
            };
            let owner_id = bullet.owner;
            let Some(victim_id) = combat::find_victim(bullet, &self.players) else {
                continue;
            };

            let mut died = false;
            if let Some(target) = self.players.get_mut(&victim_id) {
                let (health, dead) = combat::apply_damage(target.health);
                target.health = health;
                died = dead;
            }

            self.remove_bullet(id);
            if let Some(owner) = self.players.get_mut(&owner_id) {
                owner.score += 1;
            }

            if died {
                if let Some(victim) = self.players.get(&victim_id) {
                    let conn = victim.conn;
                    let kind = victim.kind;
                    let nickname = victim.nickname.clone();
                    self.remove_player(victim_id);
                    events.push(WorldEvent::PlayerDied {
                        player_id: victim_id,
                        conn,
                    });
                    if kind == PlayerKind::Bot {
                        self.schedule_bot_respawn(nickname);
                    }
                }
            }
        }

        events
    }

    /// Queue a replacement bot with a fresh identity after the fixed
    /// respawn delay
    fn schedule_bot_respawn(&mut self, nickname: String) {
        let due_tick = self.tick + millis_to_ticks(self.config.bot_respawn_delay_ms);
        self.tasks.push(Reverse(ScheduledTask {
            due_tick,
            action: TaskAction::RespawnBot { nickname },
        }));
    }

    /// Fire every task whose due tick has arrived
    fn run_due_tasks(&mut self) {
        loop {
            match self.tasks.peek() {
                Some(Reverse(task)) if task.due_tick <= self.tick => {}
                _ => break,
            }
            let Some(Reverse(task)) = self.tasks.pop() else {
                break;
            };
            match task.action {
                TaskAction::RespawnBot { nickname } => {
                    info!(nickname = %nickname, "Respawning bot");
                    self.spawn_player(None, nickname, PlayerKind::Bot);
                }
            }
        }
    }
}

/// Buffered command intake capacity; commands beyond this are dropped
/// by backpressure on the transport side.
const COMMAND_QUEUE_DEPTH: usize = 256;

/// Snapshot fanout capacity per lagging client
const SNAPSHOT_QUEUE_DEPTH: usize = 64;

/// Handle for the transport layer to reach the running world
#[derive(Clone)]
pub struct WorldHandle {
    pub input_tx: mpsc::Sender<PlayerCommand>,
    pub snapshot_tx: broadcast::Sender<ServerMsg>,
    pub player_count: Arc<AtomicUsize>,
}

impl WorldHandle {
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }
}

/// Drives the world at the fixed tick rate and wires its inputs and
/// outputs to the transport layer. Owns the `World`; nothing else can
/// reach it, so command handling and simulation are serialized by
/// construction.
pub struct GameWorld {
    world: World,
    input_rx: mpsc::Receiver<PlayerCommand>,
    snapshot_tx: broadcast::Sender<ServerMsg>,
    connections: Arc<ConnectionRegistry>,
    player_count: Arc<AtomicUsize>,
}

impl GameWorld {
    pub fn new(config: GameConfig, connections: Arc<ConnectionRegistry>) -> (Self, WorldHandle) {
        let (input_tx, input_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_QUEUE_DEPTH);
        let player_count = Arc::new(AtomicUsize::new(0));

        let handle = WorldHandle {
            input_tx,
            snapshot_tx: snapshot_tx.clone(),
            player_count: player_count.clone(),
        };

        let game_world = Self {
            world: World::new(config, rand::random()),
            input_rx,
            snapshot_tx,
            connections,
            player_count,
        };

        (game_world, handle)
    }

    /// Run the authoritative tick loop. Never returns under normal
    /// operation; the world lives as long as the process.
    pub async fn run(mut self) {
        info!(
            walls = self.world.walls().len(),
            bots = self.world.players().len(),
            "World started"
        );

        let mut tick_interval = interval(Duration::from_micros(TICK_DURATION_MICROS));
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            self.process_commands();

            let events = self.world.run_tick();
            for event in events {
                match event {
                    WorldEvent::PlayerDied {
                        conn: Some(conn), ..
                    } => {
                        self.connections.send_to(conn, ServerMsg::Dead);
                    }
                    WorldEvent::PlayerDied { .. } => {}
                }
            }

            self.player_count
                .store(self.world.players().len(), Ordering::Relaxed);

            // Full snapshot every tick; clients render raw state
            let _ = self.snapshot_tx.send(build_snapshot(&self.world));
        }
    }

    /// Drain all commands buffered since the previous tick
    fn process_commands(&mut self) {
        while let Ok(cmd) = self.input_rx.try_recv() {
            match cmd.msg {
                ClientMsg::GameStart { nickname } => {
                    self.world.handle_game_start(cmd.conn, nickname);
                }
                ClientMsg::Movement {
                    forward,
                    back,
                    left,
                    right,
                } => {
                    self.world.handle_movement(
                        cmd.conn,
                        MovementIntent {
                            forward,
                            back,
                            left,
                            right,
                        },
                    );
                }
                ClientMsg::Shoot => {
                    self.world.handle_shoot(cmd.conn);
                }
                ClientMsg::Disconnect => {
                    self.world.handle_disconnect(cmd.conn);
                }
                ClientMsg::Ping { t } => {
                    self.connections.send_to(cmd.conn, ServerMsg::Pong { t });
                }
            }
        }
    }
}
