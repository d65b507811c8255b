use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::game::GameMode;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: String,
    pub user_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub completed_at: DateTime<Utc>,
    pub game_mode: GameMode,
    #[serde(default)]
    pub continent: Option<String>,
}

impl ScoreRecord {
    pub fn percentage(&self) -> f64 {
        percentage(self.score, self.total_questions)
    }

    /// Sessions at 70% or better keep a streak alive.
    pub fn is_streak_worthy(&self) -> bool {
        self.total_questions > 0
            && u64::from(self.score) * 100 >= u64::from(self.total_questions) * 70
    }
}

pub fn percentage(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(correct) * 100.0 / f64::from(total)
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_sessions: usize,
    pub best_percentage: f64,
    pub average_percentage: f64,
    pub total_correct: u32,
    pub total_questions: u32,
    pub current_streak: usize,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Badge {
    FirstSteps,
    QuizMaster,
    GeographyExpert,
    HotStreak,
    ConsistentPerformer,
}

impl Badge {
    pub fn name(self) -> &'static str {
        match self {
            Badge::FirstSteps => "First Steps",
            Badge::QuizMaster => "Quiz Master",
            Badge::GeographyExpert => "Geography Expert",
            Badge::HotStreak => "Hot Streak",
            Badge::ConsistentPerformer => "Consistent Performer",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Badge::FirstSteps => "🎯",
            Badge::QuizMaster => "🏆",
            Badge::GeographyExpert => "🌟",
            Badge::HotStreak => "🔥",
            Badge::ConsistentPerformer => "💎",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Badge::FirstSteps => "Complete your first quiz",
            Badge::QuizMaster => "Complete 10 quizzes",
            Badge::GeographyExpert => "Score 90%+ on a quiz",
            Badge::HotStreak => "5 quiz winning streak",
            Badge::ConsistentPerformer => "Maintain 80%+ average score",
        }
    }
}
