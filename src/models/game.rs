use serde::{Deserialize, Serialize};

use super::country::CountryRecord;

pub const OPTION_COUNT: usize = 4;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Capital,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub country: CountryRecord,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

impl Question {
    /// Looks up an option by its 1-based position on screen.
    pub fn option_at(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.options.get(index))
            .map(String::as_str)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    World,
    Continent,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::World => write!(f, "world"),
            GameMode::Continent => write!(f, "continent"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    Feedback,
    Complete,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Correct,
    Incorrect,
    TimedOut,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub question: Question,
    pub given_answer: Option<String>,
    pub verdict: Verdict,
}

/// Final tally of a finished session, before it is written to the ledger.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub score: u32,
    pub total_questions: u32,
    pub mode: GameMode,
    pub continent: Option<String>,
}
