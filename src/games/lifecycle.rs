use crate::errors::{GameError, Result};
use crate::games::clock::Clock;
use crate::games::format::{
    format_clock_time, format_date_time, format_duration, format_number, format_time,
};
use crate::games::game::{Game, HistoryRecord, Mode, Status};
use crate::games::game_store::GameStore;
use crate::games::rates;
use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, info, warn};
use num::Integer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const TIME_EXPIRED_REASON: &str = "Vaqt tugadi!";

pub const URGENT_THRESHOLD_SECS: i64 = 120;
pub const WARNING_THRESHOLD_SECS: i64 = 300;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub mode: Mode,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub captain: String,
    #[serde(default)]
    pub phone: String,
    /// Thousands of so'm, as typed into the creation form.
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Warning,
    Urgent,
}

impl Urgency {
    pub fn for_remaining(remaining: i64) -> Urgency {
        if remaining <= URGENT_THRESHOLD_SECS {
            Urgency::Urgent
        } else if remaining <= WARNING_THRESHOLD_SECS {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub game: Game,
    pub remaining: i64,
    pub display: String,
    pub urgency: Urgency,
    pub progress: f64,
    pub started_at: Option<String>,
    pub ends_at: Option<String>,
    pub ends_at_millis: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TickOutcome {
    Pending(TimerSnapshot),
    Running(TimerSnapshot),
    Finished(HistoryRecord),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCard {
    pub id: String,
    pub team_name: String,
    pub mode: Mode,
    pub mode_label: &'static str,
    pub amount: String,
    pub remaining: i64,
    pub display: String,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBoard {
    pub running: Vec<GameCard>,
    pub pending: Vec<GameCard>,
    pub running_count: usize,
    pub history_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    #[default]
    All,
    Day,
    Night,
}

impl HistoryFilter {
    fn accepts(&self, mode: Mode) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Day => mode == Mode::Day,
            HistoryFilter::Night => mode == Mode::Night,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_games: usize,
    pub total_amount: i64,
    pub total_seconds: i64,
    pub total_time: String,
    pub day_count: usize,
    pub night_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: HistoryRecord,
    pub mode_label: &'static str,
    pub played: String,
    pub planned: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub records: Vec<HistoryEntry>,
    pub stats: HistoryStats,
}

/// `max(0, total - floor(elapsed / 1000))` for running games, the full
/// allotment for pending ones.
pub fn remaining_seconds(game: &Game, now_millis: i64) -> i64 {
    match (game.status, game.start_time) {
        (Status::Running, Some(start)) => {
            let elapsed = Integer::div_floor(&(now_millis - start).max(0), &1000);
            (game.total_seconds - elapsed).max(0)
        }
        _ => game.total_seconds.max(0),
    }
}

pub fn stop_reason(remaining: i64) -> String {
    format!("To'xtatildi ({} qoldi)", format_time(remaining))
}

/// Owns every transition of a game. Each operation re-reads the store, so
/// edits made elsewhere are picked up (last writer wins).
pub struct GameManager {
    store: Arc<dyn GameStore>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl GameManager {
    pub fn new(store: Arc<dyn GameStore>, clock: Arc<dyn Clock>, offset: FixedOffset) -> Self {
        GameManager {
            store,
            clock,
            offset,
        }
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn create(&self, request: NewGame) -> Result<Game> {
        let amount = rates::amount_from_input(request.amount)
            .filter(|amount| *amount > 0)
            .ok_or(GameError::InvalidAmount)?;
        let total_seconds =
            rates::seconds_for_amount(request.mode, amount).ok_or(GameError::InvalidAmount)?;
        let now = self.clock.now_millis();

        let team_name = request.team_name.trim();
        let captain = request.captain.trim().to_string();
        let phone = request.phone.trim();

        let team_name = if !team_name.is_empty() {
            team_name.to_string()
        } else {
            match request.mode {
                Mode::Day => String::from("Kunduzgi Jamoa"),
                Mode::Night if !captain.is_empty() => captain.clone(),
                Mode::Night => String::from("Kechki Jamoa"),
            }
        };

        let game = Game {
            id: Game::new_id(),
            mode: request.mode,
            team_name,
            captain,
            phone: if phone.is_empty() {
                String::new()
            } else {
                format!("+998{phone}")
            },
            amount,
            total_seconds,
            start_time: None,
            status: Status::Pending,
            created_at: DateTime::from_timestamp_millis(now).unwrap_or_else(Utc::now),
        };

        let mut games = self.store.load_games();
        games.push(game.clone());
        self.store.save_games(&games).map_err(GameError::Storage)?;

        info!(
            "Created {:?} game {} for '{}' ({} so'm, {}s)",
            game.mode, game.id, game.team_name, game.amount, game.total_seconds
        );

        Ok(game)
    }

    /// Play time the creation form shows while the amount is being typed.
    pub fn preview(mode: Mode, amount_input: i64) -> Option<String> {
        let amount = rates::amount_from_input(amount_input)?;
        if amount <= 0 {
            return None;
        }

        let seconds = rates::seconds_for_amount(mode, amount)?;
        Some(format!("≈ {} o'yin vaqti", format_duration(seconds)))
    }

    pub fn find(&self, id: &str) -> Result<Game> {
        self.store
            .load_games()
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| GameError::NotFound(id.to_string()))
    }

    pub fn start(&self, id: &str, extra_minutes: i64) -> Result<Game> {
        let mut games = self.store.load_games();
        let game = games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| GameError::NotFound(id.to_string()))?;

        if game.status == Status::Running {
            return Err(GameError::AlreadyRunning(id.to_string()));
        }

        let total = extra_minutes
            .checked_mul(60)
            .and_then(|extra| game.total_seconds.checked_add(extra))
            .filter(|total| *total > 0)
            .ok_or(GameError::ZeroDuration)?;

        game.total_seconds = total;
        game.start_time = Some(self.clock.now_millis());
        game.status = Status::Running;
        let started = game.clone();

        // The end timestamp has to be representable for the timer and notifications.
        if started.ends_at().is_none() {
            return Err(GameError::ZeroDuration);
        }

        self.store.save_games(&games).map_err(GameError::Storage)?;

        info!("Started game {} for {}s", started.id, started.total_seconds);

        Ok(started)
    }

    pub fn extend(&self, id: &str, minutes: i64) -> Result<Game> {
        if minutes <= 0 {
            return Err(GameError::InvalidExtension);
        }

        let mut games = self.store.load_games();
        let game = games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| GameError::NotFound(id.to_string()))?;

        if !game.is_running() {
            return Err(GameError::NotRunning(id.to_string()));
        }

        let total = minutes
            .checked_mul(60)
            .and_then(|extra| game.total_seconds.checked_add(extra))
            .ok_or(GameError::InvalidExtension)?;

        game.total_seconds = total;
        let extended = game.clone();
        if extended.ends_at().is_none() {
            return Err(GameError::InvalidExtension);
        }

        self.store.save_games(&games).map_err(GameError::Storage)?;

        info!(
            "Extended game {} by {} min, now {}s",
            extended.id, minutes, extended.total_seconds
        );

        Ok(extended)
    }

    pub fn extension_preview(&self, id: &str, minutes: i64) -> Result<Option<String>> {
        let game = self.find(id)?;
        if minutes <= 0 {
            return Ok(None);
        }

        let cost = rates::extension_cost(game.mode, minutes).ok_or(GameError::InvalidExtension)?;
        Ok(Some(format!("≈ +{} so'm qo'shimcha", format_number(cost))))
    }

    pub fn snapshot(&self, game: Game, now_millis: i64) -> TimerSnapshot {
        let remaining = remaining_seconds(&game, now_millis);
        let progress = if game.total_seconds > 0 {
            (remaining as f64 / game.total_seconds as f64).min(1.0)
        } else {
            0.0
        };
        let ends_at_millis = game.ends_at();

        TimerSnapshot {
            remaining,
            display: format_time(remaining),
            urgency: Urgency::for_remaining(remaining),
            progress,
            started_at: game.start_time.map(|ts| format_clock_time(ts, self.offset)),
            ends_at: ends_at_millis.map(|ts| format_clock_time(ts, self.offset)),
            ends_at_millis,
            game,
        }
    }

    pub fn timer(&self, id: &str) -> Result<TimerSnapshot> {
        let game = self.find(id)?;
        Ok(self.snapshot(game, self.clock.now_millis()))
    }

    /// One timer-page tick: re-derives the remaining time and finishes the
    /// game once it reaches zero.
    pub fn tick(&self, id: &str) -> Result<TickOutcome> {
        let game = self.find(id)?;
        let now = self.clock.now_millis();

        if !game.is_running() {
            return Ok(TickOutcome::Pending(self.snapshot(game, now)));
        }

        if remaining_seconds(&game, now) == 0 {
            let record = self.finish(&game, TIME_EXPIRED_REASON)?;
            return Ok(TickOutcome::Finished(record));
        }

        debug!("Tick for game {}", game.id);
        Ok(TickOutcome::Running(self.snapshot(game, now)))
    }

    /// Finishes every running game whose time has run out.
    pub fn tick_all(&self) -> Result<Vec<HistoryRecord>> {
        let now = self.clock.now_millis();
        let expired: Vec<Game> = self
            .store
            .load_games()
            .into_iter()
            .filter(|g| g.is_running() && remaining_seconds(g, now) == 0)
            .collect();

        let mut finished = Vec::with_capacity(expired.len());
        for game in expired {
            match self.finish(&game, TIME_EXPIRED_REASON) {
                Ok(record) => finished.push(record),
                // Someone else archived it between our read and write.
                Err(GameError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(finished)
    }

    pub fn stop(&self, id: &str) -> Result<HistoryRecord> {
        let game = self.find(id)?;
        if !game.is_running() {
            return Err(GameError::NotRunning(id.to_string()));
        }

        let remaining = remaining_seconds(&game, self.clock.now_millis());
        self.finish(&game, &stop_reason(remaining))
    }

    /// Moves a game into history. The only place history is written; a game
    /// already archived by an earlier, partly failed finish is only removed
    /// from the active list.
    pub fn finish(&self, game: &Game, reason: &str) -> Result<HistoryRecord> {
        let games = self.store.load_games();
        if !games.iter().any(|g| g.id == game.id) {
            return Err(GameError::NotFound(game.id.clone()));
        }

        let archived = self
            .store
            .load_history()
            .into_iter()
            .find(|r| r.id == game.id);

        let record = match archived {
            Some(record) => {
                warn!("Game {} is already in history, removing it from active games", game.id);
                record
            }
            None => self.archive(game, reason)?,
        };

        let remaining: Vec<Game> = games.into_iter().filter(|g| g.id != game.id).collect();
        self.store
            .save_games(&remaining)
            .map_err(GameError::Storage)?;

        info!("Finished game {}: {}", record.id, record.reason);

        Ok(record)
    }

    fn archive(&self, game: &Game, reason: &str) -> Result<HistoryRecord> {
        let end_time = self.clock.now_millis();
        let record = HistoryRecord {
            id: game.id.clone(),
            mode: game.mode,
            team_name: game.team_name.clone(),
            captain: game.captain.clone(),
            phone: game.phone.clone(),
            amount: game.amount,
            total_seconds: game.total_seconds,
            start_time: game.start_time,
            end_time,
            reason: reason.to_string(),
            date: format_date_time(end_time, self.offset),
        };

        self.store
            .append_history(record.clone())
            .map_err(GameError::Storage)?;

        Ok(record)
    }

    pub fn active_board(&self) -> ActiveBoard {
        let now = self.clock.now_millis();
        let games = self.store.load_games();

        let card = |game: &Game| {
            let remaining = remaining_seconds(game, now);
            GameCard {
                id: game.id.clone(),
                team_name: game.team_name.clone(),
                mode: game.mode,
                mode_label: game.mode.label(),
                amount: format!("{} so'm", format_number(game.amount)),
                remaining,
                display: format_time(remaining),
                urgency: Urgency::for_remaining(remaining),
            }
        };

        let running: Vec<GameCard> = games
            .iter()
            .filter(|g| g.status == Status::Running)
            .map(card)
            .collect();
        let pending: Vec<GameCard> = games
            .iter()
            .filter(|g| g.status == Status::Pending)
            .map(card)
            .collect();

        ActiveBoard {
            running_count: running.len(),
            history_count: self.store.load_history().len(),
            running,
            pending,
        }
    }

    /// Newest first. Stats always cover the whole history.
    pub fn history(&self, filter: HistoryFilter) -> HistoryPage {
        let history = self.store.load_history();
        let stats = history_stats(&history);

        let records = history
            .into_iter()
            .rev()
            .filter(|r| filter.accepts(r.mode))
            .map(|record| HistoryEntry {
                mode_label: record.mode.label(),
                played: format_duration(record.played_seconds()),
                planned: format_duration(record.total_seconds),
                record,
            })
            .collect();

        HistoryPage { records, stats }
    }

    pub fn clear_history(&self) -> Result<()> {
        self.store.clear_history().map_err(GameError::Storage)?;
        info!("Cleared game history");

        Ok(())
    }
}

fn history_stats(records: &[HistoryRecord]) -> HistoryStats {
    let total_seconds: i64 = records.iter().map(|r| r.total_seconds).sum();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;

    HistoryStats {
        total_games: records.len(),
        total_amount: records.iter().map(|r| r.amount).sum(),
        total_seconds,
        total_time: if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes} daqiqa")
        },
        day_count: records.iter().filter(|r| r.mode == Mode::Day).count(),
        night_count: records.iter().filter(|r| r.mode == Mode::Night).count(),
    }
}
