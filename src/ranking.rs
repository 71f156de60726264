//! Local leaderboards
//!
//! Two boards, top 5 each: fastest catches (time ascending) and most
//! droppings (descending). A player name appears at most once per board;
//! a new result replaces that name's previous entry even if it's worse.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::consts::MAX_RANKING_ENTRIES;
use crate::platform::storage::{Storage, load_json, save_json};
use crate::sim::sanitize_player_name;

/// Shown for players who never entered a name
pub const GUEST_NAME: &str = "Guest";

/// What a board is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingKind {
    /// Seconds to catch the rabbit, lowest first
    Time,
    /// Droppings collected, highest first
    Droppings,
}

impl RankingKind {
    fn storage_key(self) -> &'static str {
        match self {
            RankingKind::Time => "rabbit_chase_time_ranking",
            RankingKind::Droppings => "rabbit_chase_dropping_ranking",
        }
    }
}

/// A single result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player_name: String,
    /// Seconds from start to catch
    pub time: u64,
    pub droppings: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// One sorted, capped board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub kind: RankingKind,
    pub entries: Vec<RankingEntry>,
}

impl Leaderboard {
    pub fn new(kind: RankingKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// A zero score never goes on the board
    fn has_score(&self, entry: &RankingEntry) -> bool {
        match self.kind {
            RankingKind::Time => entry.time > 0,
            RankingKind::Droppings => entry.droppings > 0,
        }
    }

    /// Insert a result. Returns its 0-based rank, or `None` if it didn't make the cut.
    pub fn add(&mut self, entry: RankingEntry) -> Option<usize> {
        if !self.has_score(&entry) {
            return None;
        }

        let name = entry.player_name.clone();
        self.entries.retain(|e| e.player_name != name);
        self.entries.push(entry);

        // Stable: on ties the older entry stays ahead
        match self.kind {
            RankingKind::Time => self.entries.sort_by_key(|e| e.time),
            RankingKind::Droppings => self.entries.sort_by(|a, b| b.droppings.cmp(&a.droppings)),
        }
        self.entries.truncate(MAX_RANKING_ENTRIES);

        // Names are unique on the board after the retain above
        self.entries.iter().position(|e| e.player_name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn best(&self) -> Option<&RankingEntry> {
        self.entries.first()
    }
}

/// Ranks achieved by one result, 0-based
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordedRanks {
    pub time: Option<usize>,
    pub droppings: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rankings {
    pub by_time: Leaderboard,
    pub by_droppings: Leaderboard,
}

impl Default for Rankings {
    fn default() -> Self {
        Self::new()
    }
}

impl Rankings {
    pub fn new() -> Self {
        Self {
            by_time: Leaderboard::new(RankingKind::Time),
            by_droppings: Leaderboard::new(RankingKind::Droppings),
        }
    }

    /// Record a victory on both boards
    pub fn record_result(
        &mut self,
        player_name: &str,
        time: u64,
        droppings: u32,
        timestamp: f64,
    ) -> RecordedRanks {
        let mut name = sanitize_player_name(player_name);
        if name.is_empty() {
            name = GUEST_NAME.to_string();
        }
        let entry = RankingEntry {
            player_name: name,
            time,
            droppings,
            timestamp,
        };
        let ranks = RecordedRanks {
            time: self.by_time.add(entry.clone()),
            droppings: self.by_droppings.add(entry),
        };
        log::info!(
            "Recorded {}s / {} droppings: time rank {:?}, droppings rank {:?}",
            time,
            droppings,
            ranks.time,
            ranks.droppings
        );
        ranks
    }

    /// Load both boards. Missing or corrupt data starts that board fresh.
    pub fn load(storage: &dyn Storage) -> Self {
        let mut rankings = Self::new();
        for board in [&mut rankings.by_time, &mut rankings.by_droppings] {
            match load_json::<Vec<RankingEntry>>(storage, board.kind.storage_key()) {
                Ok(Some(entries)) => {
                    board.entries = entries;
                    log::info!("Loaded {} {:?} ranking entries", board.len(), board.kind);
                }
                Ok(None) => {}
                Err(e) => log::warn!("Discarding {:?} ranking: {}", board.kind, e),
            }
        }
        rankings
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), Error> {
        for board in [&self.by_time, &self.by_droppings] {
            save_json(storage, board.kind.storage_key(), &board.entries)?;
        }
        Ok(())
    }
}

/// `MM:SS`
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a timestamp relative to `now_ms`
pub fn format_date(timestamp: f64, now_ms: f64) -> String {
    let diff_secs = ((now_ms - timestamp) / 1000.0).max(0.0);
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        match diff_days.floor() as i64 {
            1 => "Yesterday".to_string(),
            days => format!("{} days ago", days),
        }
    } else if diff_hours >= 1.0 {
        match diff_hours.floor() as i64 {
            1 => "1 hour ago".to_string(),
            hours => format!("{} hours ago", hours),
        }
    } else if diff_mins >= 1.0 {
        match diff_mins.floor() as i64 {
            1 => "1 min ago".to_string(),
            mins => format!("{} mins ago", mins),
        }
    } else {
        "Just now".to_string()
    }
}
