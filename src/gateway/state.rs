use std::sync::Arc;

use crate::arena::Arena;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub arena: Arc<Arena>,
}

impl AppState {
    /// Creates handler state over an arena.
    pub fn new(arena: Arc<Arena>) -> Self {
        Self { arena }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("arena", &self.arena)
            .finish()
    }
}
