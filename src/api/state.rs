use crate::calculator::calculator::Calculator;
use crate::games::lifecycle::GameManager;
use crate::notify::asset_cache::AssetCache;
use crate::notify::scheduler::NotificationHandle;
use crate::theme::ThemeToggle;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the handlers share. Calculator and theme state live for the
/// lifetime of the process only.
pub struct AppState {
    pub games: Arc<Mutex<GameManager>>,
    pub notifications: NotificationHandle,
    pub calculator: Mutex<Calculator>,
    pub theme: Mutex<ThemeToggle>,
    pub assets: Arc<AssetCache>,
}

impl AppState {
    pub fn new(
        games: Arc<Mutex<GameManager>>,
        notifications: NotificationHandle,
        assets: Arc<AssetCache>,
    ) -> Self {
        AppState {
            games,
            notifications,
            calculator: Mutex::new(Calculator::new()),
            theme: Mutex::new(ThemeToggle::new()),
            assets,
        }
    }
}
