use crate::games::clock::Clock;
use crate::notify::message::WorkerMessage;
use crate::notify::notification::{Notification, Notifier};
use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub const WARNING_LEAD_MS: i64 = 5 * 60 * 1000;

/// Sending side of the worker's inbox.
#[derive(Clone)]
pub struct NotificationHandle {
    sender: UnboundedSender<WorkerMessage>,
}

impl NotificationHandle {
    pub fn new(sender: UnboundedSender<WorkerMessage>) -> Self {
        NotificationHandle { sender }
    }

    pub fn send(&self, message: WorkerMessage) {
        let game_id = message.game_id().to_string();
        if let Err(e) = self.sender.send(message) {
            error!("Notification worker is gone, dropped message for {}: {}", game_id, e);
        }
    }
}

/// Keeps the pending warning and completion timers of every game. Timers
/// live only as long as the worker does.
pub struct NotificationWorker {
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    scheduled: HashMap<String, JoinHandle<()>>,
}

impl NotificationWorker {
    pub fn new(notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        NotificationWorker {
            notifier,
            clock,
            scheduled: HashMap::new(),
        }
    }

    /// Moves the worker onto its own task and returns its inbox.
    pub fn spawn(mut self) -> (NotificationHandle, JoinHandle<()>) {
        let (sender, receiver) = unbounded_channel::<WorkerMessage>();

        let task = tokio::spawn(async move {
            self.run(receiver).await;
        });

        (NotificationHandle::new(sender), task)
    }

    async fn run(&mut self, mut receiver: UnboundedReceiver<WorkerMessage>) {
        while let Some(message) = receiver.recv().await {
            self.handle(message);
        }

        debug!("Notification inbox closed, cancelling {} timers", self.scheduled.len());
        for (_, timer) in self.scheduled.drain() {
            timer.abort();
        }
    }

    pub fn handle(&mut self, message: WorkerMessage) {
        self.scheduled.retain(|_, timer| !timer.is_finished());

        match message {
            WorkerMessage::ScheduleNotify {
                game_id,
                team_name,
                ends_at,
                ..
            } => self.schedule(&game_id, &team_name, ends_at),
            WorkerMessage::CancelNotify { game_id } => self.cancel(&game_id),
        }
    }

    fn schedule(&mut self, game_id: &str, team_name: &str, ends_at: i64) {
        self.cancel(game_id);

        let ms_left = ends_at - self.clock.now_millis();
        if ms_left <= 0 {
            debug!("Game {} already ended, nothing to schedule", game_id);
            return;
        }

        let warn_in = ms_left - WARNING_LEAD_MS;
        if warn_in > 0 {
            let notification = Notification::warning(game_id, team_name);
            let timer = self.fire_after(warn_in, notification);
            self.scheduled
                .insert(Notification::warning_tag(game_id), timer);
        }

        let notification = Notification::completion(game_id, team_name);
        let timer = self.fire_after(ms_left, notification);
        self.scheduled.insert(game_id.to_string(), timer);

        info!(
            "Notification scheduled for {} in {}s",
            team_name,
            (ms_left as f64 / 1000.0).round()
        );
    }

    fn fire_after(&self, delay_ms: i64, notification: Notification) -> JoinHandle<()> {
        let notifier = self.notifier.clone();
        let delay = Duration::from_millis(delay_ms.max(0) as u64);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.show(notification);
        })
    }

    fn cancel(&mut self, game_id: &str) {
        for key in [game_id.to_string(), Notification::warning_tag(game_id)] {
            if let Some(timer) = self.scheduled.remove(&key) {
                timer.abort();
                debug!("Cancelled notification timer {}", key);
            }
        }
    }

    /// Timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.scheduled
            .values()
            .filter(|timer| !timer.is_finished())
            .count()
    }
}
