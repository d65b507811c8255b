use serde::{Deserialize, Serialize};

use super::{
    country::Coordinates,
    game::{GameMode, Verdict},
    score::ScoreRecord,
};

/// Inputs to a running game. Everything that can change the session arrives through
/// one queue of these, so two signals can never race each other into the state.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum GameEvent {
    Tick,
    Answer { text: String },
    Advance,
    Quit,
}

/// What a running game reports back to whoever is rendering it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "update", content = "data", rename_all = "camelCase")]
pub enum GameUpdate {
    #[serde(rename_all = "camelCase")]
    Question {
        index: u32,
        total: u32,
        country: String,
        flag: String,
        coordinates: Option<Coordinates>,
        options: Vec<String>,
        timer: u32,
    },
    Timer {
        timer: u32,
    },
    #[serde(rename_all = "camelCase")]
    Feedback {
        verdict: Verdict,
        correct_answer: String,
        score: u32,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        score: u32,
        total: u32,
        mode: GameMode,
        continent: Option<String>,
        record: Option<ScoreRecord>,
    },
    Unavailable {
        continent: Option<String>,
    },
    Aborted {
        score: u32,
    },
}
