use std::sync::Arc;

use quest_core::model::GameMode;
use services::GameLoopService;

pub trait UiApp: Send + Sync {
    fn game_loop(&self) -> Arc<GameLoopService>;

    /// Mode to start right away instead of showing the menu.
    fn launch_mode(&self) -> Option<GameMode> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    game_loop: Arc<GameLoopService>,
    launch_mode: Option<GameMode>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            game_loop: app.game_loop(),
            launch_mode: app.launch_mode(),
        }
    }

    #[must_use]
    pub fn game_loop(&self) -> Arc<GameLoopService> {
        Arc::clone(&self.game_loop)
    }

    #[must_use]
    pub fn launch_mode(&self) -> Option<GameMode> {
        self.launch_mode
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
