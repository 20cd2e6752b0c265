//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::WorldHandle;
use crate::ws::ConnectionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub connections: Arc<ConnectionRegistry>,
    pub world: WorldHandle,
}

impl AppState {
    pub fn new(config: Arc<Config>, connections: Arc<ConnectionRegistry>, world: WorldHandle) -> Self {
        Self {
            config,
            connections,
            world,
        }
    }
}
