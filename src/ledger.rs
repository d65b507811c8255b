//! Per-user score history with derived statistics and badges.

use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{
        game::SessionSummary,
        score::{percentage, Badge, ScoreRecord, Statistics},
    },
    storage::{read_json, write_json, KeyValueStore},
};

pub fn scores_key(user_id: &str) -> String {
    format!("quiz-scores-{}", user_id)
}

pub struct ScoreLedger<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> ScoreLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        ScoreLedger { store }
    }

    /// Appends a finished session to the user's log.
    pub fn record(
        &self,
        user_id: &str,
        summary: &SessionSummary,
        completed_at: DateTime<Utc>,
    ) -> Result<ScoreRecord, StoreError> {
        let key = scores_key(user_id);
        let mut records = self.stored(&key)?;

        let record = ScoreRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            score: summary.score,
            total_questions: summary.total_questions,
            completed_at,
            game_mode: summary.mode,
            continent: summary.continent.clone(),
        };
        records.push(record.clone());
        write_json(self.store, &key, &records)?;

        info!(
            "Recorded {}/{} for user {} ({} sessions)",
            record.score,
            record.total_questions,
            user_id,
            records.len()
        );
        Ok(record)
    }

    /// The user's sessions, most recent first.
    pub fn history(&self, user_id: &str) -> Result<Vec<ScoreRecord>, StoreError> {
        let records = self.stored(&scores_key(user_id))?;
        Ok(most_recent_first(records))
    }

    pub fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        let mut records = self.history(user_id)?;
        records.truncate(limit);
        Ok(records)
    }

    pub fn statistics(&self, user_id: &str) -> Result<Statistics, StoreError> {
        Ok(compute_statistics(&self.history(user_id)?))
    }

    fn stored(&self, key: &str) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(read_json(self.store, key)?.unwrap_or_default())
    }
}

/// Sorts by completion time, newest first. Records with the same timestamp keep the later
/// insertion ahead of the earlier one.
pub fn most_recent_first(mut records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
    records.reverse();
    records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    records
}

/// Aggregates over `records`, which must already be ordered most recent first.
pub fn compute_statistics(records: &[ScoreRecord]) -> Statistics {
    if records.is_empty() {
        return Statistics::default();
    }

    let total_correct: u32 = records.iter().map(|r| r.score).sum();
    let total_questions: u32 = records.iter().map(|r| r.total_questions).sum();
    let best_percentage = records
        .iter()
        .map(ScoreRecord::percentage)
        .fold(0.0, f64::max);
    let current_streak = records
        .iter()
        .take_while(|record| record.is_streak_worthy())
        .count();

    Statistics {
        total_sessions: records.len(),
        best_percentage,
        average_percentage: percentage(total_correct, total_questions),
        total_correct,
        total_questions,
        current_streak,
    }
}

pub fn badges(stats: &Statistics) -> Vec<Badge> {
    let thresholds = [
        (stats.total_sessions >= 1, Badge::FirstSteps),
        (stats.total_sessions >= 10, Badge::QuizMaster),
        (stats.best_percentage >= 90.0, Badge::GeographyExpert),
        (stats.current_streak >= 5, Badge::HotStreak),
        (stats.average_percentage >= 80.0, Badge::ConsistentPerformer),
    ];
    thresholds
        .into_iter()
        .filter_map(|(earned, badge)| earned.then_some(badge))
        .collect()
}
