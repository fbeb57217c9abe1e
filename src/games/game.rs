use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Day,
    Night,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Day => "☀️ Kunduzgi",
            Mode::Night => "🌙 Kechki",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Running,
}

/// A field rental that has not been finished yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub mode: Mode,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub captain: String,
    #[serde(default)]
    pub phone: String,
    pub amount: i64,
    pub total_seconds: i64,
    pub start_time: Option<i64>,
    pub status: Status,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn new_id() -> String {
        format!("g_{}", Uuid::new_v4().simple())
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running && self.start_time.is_some()
    }

    /// Epoch milliseconds at which the allotted time runs out. `None` while
    /// pending or when the end does not fit in an `i64`.
    pub fn ends_at(&self) -> Option<i64> {
        let start = self.start_time?;
        self.total_seconds
            .checked_mul(1000)
            .and_then(|millis| start.checked_add(millis))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub mode: Mode,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub captain: String,
    #[serde(default)]
    pub phone: String,
    pub amount: i64,
    pub total_seconds: i64,
    pub start_time: Option<i64>,
    pub end_time: i64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub date: String,
}

impl HistoryRecord {
    /// Seconds actually played, falling back to the planned duration for
    /// games that never started.
    pub fn played_seconds(&self) -> i64 {
        match self.start_time {
            Some(start) if self.end_time > start => (self.end_time - start) / 1000,
            _ => self.total_seconds,
        }
    }
}
