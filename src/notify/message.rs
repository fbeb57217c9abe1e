use crate::games::game::{Game, Mode};
use serde::{Deserialize, Serialize};

/// Messages the pages post to the notification worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    #[serde(rename_all = "camelCase")]
    ScheduleNotify {
        game_id: String,
        #[serde(default)]
        team_name: String,
        ends_at: i64,
        mode: Mode,
    },
    #[serde(rename_all = "camelCase")]
    CancelNotify { game_id: String },
}

impl WorkerMessage {
    /// Schedule message for a running game, `None` while it is still pending.
    pub fn schedule(game: &Game) -> Option<WorkerMessage> {
        game.ends_at().map(|ends_at| WorkerMessage::ScheduleNotify {
            game_id: game.id.clone(),
            team_name: game.team_name.clone(),
            ends_at,
            mode: game.mode,
        })
    }

    pub fn cancel(game_id: &str) -> WorkerMessage {
        WorkerMessage::CancelNotify {
            game_id: game_id.to_string(),
        }
    }

    pub fn game_id(&self) -> &str {
        match self {
            WorkerMessage::ScheduleNotify { game_id, .. } => game_id,
            WorkerMessage::CancelNotify { game_id } => game_id,
        }
    }
}
