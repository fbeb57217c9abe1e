use crate::games::lifecycle::GameManager;
use crate::notify::message::WorkerMessage;
use crate::notify::scheduler::NotificationHandle;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub const TICK_PERIOD: Duration = Duration::from_millis(500);

/// Background pass that expires running games even when no timer page is
/// watching them. Stops once the manager is dropped.
pub struct GameTicker;

impl GameTicker {
    pub fn spawn(
        manager: &Arc<Mutex<GameManager>>,
        notifications: NotificationHandle,
        period: Duration,
    ) -> JoinHandle<()> {
        let manager_ref = Arc::downgrade(manager);

        tokio::spawn(async move {
            loop {
                let manager = match manager_ref.upgrade() {
                    None => break,
                    Some(manager) => manager,
                };

                let finished = manager.lock().await.tick_all();
                drop(manager);

                match finished {
                    Ok(records) => {
                        for record in records {
                            info!("Game {} ran out of time", record.id);
                            notifications.send(WorkerMessage::cancel(&record.id));
                        }
                    }
                    Err(e) => error!("Failed to expire games: {}", e),
                }

                tokio::time::sleep(period).await;
            }
        })
    }
}
