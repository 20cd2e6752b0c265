//! Configuration module - environment variable parsing and gameplay tuning

use std::env;
use std::net::SocketAddr;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Allowed client origin for CORS (comma-separated; empty = allow any)
    pub client_origin: Option<String>,
    /// Gameplay tuning constants
    pub game: GameConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        };

        let mut game = GameConfig::default();
        if let Ok(bots) = env::var("BOT_COUNT") {
            game.bot_count = bots
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("BOT_COUNT"))?;
        }

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            client_origin: env::var("CLIENT_ORIGIN").ok(),

            game,
        })
    }
}

/// Gameplay constants for the arena simulation.
///
/// These are deliberately plain data so tests can build a tuned world
/// without touching the environment.
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Playing field width
    pub field_width: f32,
    /// Playing field height
    pub field_height: f32,
    /// Player hitbox width
    pub player_width: f32,
    /// Player hitbox height
    pub player_height: f32,
    /// Player starting (and maximum) health
    pub player_max_health: i32,
    /// Bullet hitbox width
    pub bullet_width: f32,
    /// Bullet hitbox height
    pub bullet_height: f32,
    /// Max concurrent bullets per player
    pub bullet_cap: usize,
    /// Number of walls placed at world start
    pub wall_count: usize,
    /// Wall width
    pub wall_width: f32,
    /// Wall height
    pub wall_height: f32,
    /// Player displacement per tick while the forward/back flag is held
    pub walk_step: f32,
    /// Bullet displacement per tick
    pub bullet_step: f32,
    /// Angle change per tick while the left/right flag is held (radians)
    pub turn_step: f32,
    /// Per-tick probability that a bot fires
    pub bot_shoot_probability: f64,
    /// Delay before a dead bot respawns (milliseconds)
    pub bot_respawn_delay_ms: u64,
    /// Number of bots spawned at world start
    pub bot_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 1000.0,
            field_height: 1000.0,
            player_width: 80.0,
            player_height: 80.0,
            player_max_health: 10,
            bullet_width: 15.0,
            bullet_height: 15.0,
            bullet_cap: 3,
            wall_count: 3,
            wall_width: 200.0,
            wall_height: 50.0,
            walk_step: 5.0,
            bullet_step: 10.0,
            turn_step: 0.1,
            bot_shoot_probability: 0.03,
            bot_respawn_delay_ms: 3000,
            bot_count: 3,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server address format")]
    InvalidAddress,

    #[error("Environment variable {0} is not a valid number")]
    InvalidNumber(&'static str),
}
