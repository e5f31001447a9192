//! Cook history store
//!
//! An ordered list of completed cooks, newest first, persisted as one JSON
//! file under the data directory. The countdown task appends exactly one
//! record per natural completion; the history endpoints browse and prune it.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::state::PresetId;
use super::storage;

/// File name under the data directory
pub const HISTORY_FILE: &str = "eggy_history.json";

/// One completed cook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Epoch milliseconds at completion, doubling as the record id
    pub id: i64,
    /// Display name of what was cooked ("Soft Boiled", "Custom", ...)
    pub egg_type: String,
    pub duration_seconds: u64,
    /// The preset that was cooking, or none for a custom time
    pub preset: Option<PresetId>,
    pub completed_at: DateTime<Utc>,
}

/// Aggregates for the history page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_eggs: usize,
    pub eggs_this_week: usize,
    pub favorite_type: Option<String>,
    pub egg_type_counts: BTreeMap<String, usize>,
}

/// JSON-file-backed history list
///
/// Loaded once at startup and written through on every change; a failed write
/// keeps the in-memory list authoritative.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Mutex<Vec<HistoryRecord>>,
}

impl HistoryStore {
    /// Open (or start) the history list stored under `dir`
    pub fn new(dir: &Path) -> Self {
        let path = dir.join(HISTORY_FILE);
        let entries: Vec<HistoryRecord> = storage::read_json(&path, Vec::new());
        info!("Loaded {} history entries from {}", entries.len(), path.display());
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Prepend one completed cook and persist
    pub fn append(
        &self,
        egg_type: String,
        duration_seconds: u64,
        preset: Option<PresetId>,
    ) -> Option<HistoryRecord> {
        let now = Utc::now();
        let record = HistoryRecord {
            id: now.timestamp_millis(),
            egg_type,
            duration_seconds,
            preset,
            completed_at: now,
        };

        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(0, record.clone());
                storage::write_json(&self.path, &*entries);
                Some(record)
            }
            Err(e) => {
                error!("Failed to lock history: {}", e);
                None
            }
        }
    }

    /// The full ordered list, newest first
    pub fn list(&self) -> Vec<HistoryRecord> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(e) => {
                error!("Failed to lock history: {}", e);
                Vec::new()
            }
        }
    }

    /// Remove one record by id; false when the id is unknown
    pub fn delete(&self, id: i64) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => {
                let initial = entries.len();
                entries.retain(|record| record.id != id);
                let removed = entries.len() != initial;
                if removed {
                    storage::write_json(&self.path, &*entries);
                }
                removed
            }
            Err(e) => {
                error!("Failed to lock history: {}", e);
                false
            }
        }
    }

    /// Drop every record
    pub fn clear(&self) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.clear();
                storage::write_json(&self.path, &*entries);
            }
            Err(e) => error!("Failed to lock history: {}", e),
        }
    }

    /// Totals, this-week count, and the favorite egg type
    ///
    /// The week starts Sunday 00:00 UTC. Favorite ties go to the type that
    /// appeared first in the list.
    pub fn stats(&self) -> HistoryStats {
        let entries = self.list();

        let now = Utc::now();
        let days_into_week = now.weekday().num_days_from_sunday() as i64;
        let start_of_week = (now.date_naive() - chrono::Duration::days(days_into_week))
            .and_time(NaiveTime::MIN)
            .and_utc();
        let eggs_this_week = entries
            .iter()
            .filter(|record| record.completed_at >= start_of_week)
            .count();

        let mut counts: Vec<(String, usize)> = Vec::new();
        for record in &entries {
            match counts.iter_mut().find(|(name, _)| *name == record.egg_type) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.egg_type.clone(), 1)),
            }
        }

        let mut favorite_type: Option<(String, usize)> = None;
        for (name, count) in &counts {
            if favorite_type.as_ref().map_or(true, |(_, best)| count > best) {
                favorite_type = Some((name.clone(), *count));
            }
        }

        HistoryStats {
            total_eggs: entries.len(),
            eggs_this_week,
            favorite_type: favorite_type.map(|(name, _)| name),
            egg_type_counts: counts.into_iter().collect(),
        }
    }
}
