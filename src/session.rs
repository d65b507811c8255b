//! The quiz session: Idle → Playing → Feedback → Playing or Complete → Idle.
//!
//! Each question gets its own time budget. Whichever of the answer or the expiry arrives
//! first moves the session into Feedback; anything after that is rejected until
//! [`QuizSession::advance`] is called.

use log::{debug, info};
use rand::Rng;

use crate::{
    error::SessionError,
    generator::generate_question,
    models::{
        country::Catalog,
        game::{AnsweredQuestion, GameMode, Phase, Question, SessionSummary, Verdict},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionRules {
    pub total_questions: u32,
    pub seconds_per_question: u32,
}

impl Default for SessionRules {
    fn default() -> Self {
        SessionRules {
            total_questions: 10,
            seconds_per_question: 30,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Advance<'a> {
    Next(&'a Question),
    Complete(SessionSummary),
}

pub struct QuizSession<R> {
    catalog: Catalog,
    rules: SessionRules,
    rng: R,
    phase: Phase,
    mode: Option<GameMode>,
    continent: Option<String>,
    question_index: u32,
    score: u32,
    time_left: u32,
    current: Option<Question>,
    history: Vec<AnsweredQuestion>,
}

impl<R: Rng> QuizSession<R> {
    /// Rules below one question or one second are raised to one.
    pub fn new(catalog: Catalog, rules: SessionRules, rng: R) -> Self {
        let rules = SessionRules {
            total_questions: rules.total_questions.max(1),
            seconds_per_question: rules.seconds_per_question.max(1),
        };
        QuizSession {
            catalog,
            rules,
            rng,
            phase: Phase::Idle,
            mode: None,
            continent: None,
            question_index: 0,
            score: 0,
            time_left: rules.seconds_per_question,
            current: None,
            history: Vec::new(),
        }
    }

    pub fn start_game(
        &mut self,
        mode: GameMode,
        continent: Option<&str>,
    ) -> Result<&Question, SessionError> {
        let continent = match mode {
            GameMode::World => None,
            GameMode::Continent => Some(continent.ok_or(SessionError::ContinentRequired)?),
        };

        self.reset();
        let question = generate_question(&self.catalog.countries, continent, &mut self.rng)
            .ok_or_else(|| SessionError::NoQuestionAvailable {
                continent: continent.map(str::to_string),
            })?;

        info!(
            "Game started: mode={} continent={:?} questions={}",
            mode, continent, self.rules.total_questions
        );
        self.mode = Some(mode);
        self.continent = continent.map(str::to_string);
        self.phase = Phase::Playing;
        Ok(&*self.current.insert(question))
    }

    /// Checks `answer` against the active question by exact string equality.
    pub fn submit_answer(&mut self, answer: &str) -> Result<Verdict, SessionError> {
        let correct = self.active_question()?.correct_answer == answer;
        let verdict = if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        Ok(self.conclude(Some(answer.to_string()), verdict))
    }

    /// Counts the active question as missed.
    pub fn time_expired(&mut self) -> Result<Verdict, SessionError> {
        self.active_question()?;
        self.time_left = 0;
        Ok(self.conclude(None, Verdict::TimedOut))
    }

    /// One unit of the per-question timer. Returns the verdict when this tick used up the
    /// remaining time; outside Playing it does nothing.
    pub fn tick(&mut self) -> Option<Verdict> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            return self.time_expired().ok();
        }
        None
    }

    pub fn advance(&mut self) -> Result<Advance<'_>, SessionError> {
        if self.phase != Phase::Feedback {
            return Err(SessionError::NotInFeedback(self.phase));
        }

        if self.question_index + 1 >= self.rules.total_questions {
            self.phase = Phase::Complete;
            self.current = None;
            let summary = SessionSummary {
                score: self.score,
                total_questions: self.rules.total_questions,
                mode: self.mode.unwrap_or(GameMode::World),
                continent: self.continent.clone(),
            };
            info!(
                "Game complete: {}/{}",
                summary.score, summary.total_questions
            );
            return Ok(Advance::Complete(summary));
        }

        let question = generate_question(
            &self.catalog.countries,
            self.continent.as_deref(),
            &mut self.rng,
        )
        .ok_or_else(|| SessionError::NoQuestionAvailable {
            continent: self.continent.clone(),
        })?;

        self.question_index += 1;
        self.time_left = self.rules.seconds_per_question;
        self.phase = Phase::Playing;
        Ok(Advance::Next(&*self.current.insert(question)))
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.mode = None;
        self.continent = None;
        self.question_index = 0;
        self.score = 0;
        self.time_left = self.rules.seconds_per_question;
        self.current = None;
        self.history.clear();
    }

    fn active_question(&self) -> Result<&Question, SessionError> {
        match (self.phase, self.current.as_ref()) {
            (Phase::Playing, Some(question)) => Ok(question),
            (phase, _) => Err(SessionError::NotAwaitingAnswer(phase)),
        }
    }

    fn conclude(&mut self, given_answer: Option<String>, verdict: Verdict) -> Verdict {
        if verdict.is_correct() {
            self.score += 1;
        }
        if let Some(question) = self.current.clone() {
            self.history.push(AnsweredQuestion {
                question,
                given_answer,
                verdict,
            });
        }
        self.phase = Phase::Feedback;
        debug!(
            "Question {} -> {:?}, score {}",
            self.question_index + 1,
            verdict,
            self.score
        );
        verdict
    }
}

impl<R> QuizSession<R> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    pub fn continent(&self) -> Option<&str> {
        self.continent.as_deref()
    }

    pub fn question_index(&self) -> u32 {
        self.question_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_questions(&self) -> u32 {
        self.rules.total_questions
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[AnsweredQuestion] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn session() -> QuizSession<StdRng> {
        QuizSession::new(
            Catalog::fallback(),
            SessionRules::default(),
            StdRng::seed_from_u64(42),
        )
    }

    fn correct(session: &QuizSession<StdRng>) -> String {
        session.current_question().unwrap().correct_answer.clone()
    }

    #[test]
    fn starts_playing_with_fresh_counters() {
        let mut session = session();
        assert_eq!(session.phase(), Phase::Idle);

        session.start_game(GameMode::World, None).unwrap();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.question_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_left(), 30);
        assert!(session.history().is_empty());
        assert_eq!(session.continent(), None);
    }

    #[test]
    fn world_mode_ignores_continent_and_continent_mode_requires_one() {
        let mut session = session();
        session.start_game(GameMode::World, Some("Europe")).unwrap();
        assert_eq!(session.continent(), None);

        assert_eq!(
            session.start_game(GameMode::Continent, None),
            Err(SessionError::ContinentRequired)
        );
    }

    #[test]
    fn unavailable_question_is_reported_and_leaves_session_idle() {
        let mut session = session();
        let result = session.start_game(GameMode::Continent, Some("Oceania"));
        assert_eq!(
            result,
            Err(SessionError::NoQuestionAvailable {
                continent: Some("Oceania".to_string())
            })
        );
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn correct_answer_scores_and_enters_feedback() {
        let mut session = session();
        session.start_game(GameMode::World, None).unwrap();
        let answer = correct(&session);

        assert_eq!(session.submit_answer(&answer), Ok(Verdict::Correct));
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), Phase::Feedback);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].given_answer.as_deref(), Some(answer.as_str()));
    }

    #[test]
    fn wrong_answer_does_not_score() {
        let mut session = session();
        session.start_game(GameMode::World, None).unwrap();

        assert_eq!(session.submit_answer("Atlantis"), Ok(Verdict::Incorrect));
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), Phase::Feedback);
    }

    #[test]
    fn second_signal_after_feedback_changes_nothing() {
        let mut session = session();
        session.start_game(GameMode::World, None).unwrap();
        let answer = correct(&session);
        session.submit_answer(&answer).unwrap();

        assert_eq!(
            session.submit_answer(&answer),
            Err(SessionError::NotAwaitingAnswer(Phase::Feedback))
        );
        assert_eq!(
            session.time_expired(),
            Err(SessionError::NotAwaitingAnswer(Phase::Feedback))
        );
        assert_eq!(session.tick(), None);
        assert_eq!(session.score(), 1);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn timer_expiry_counts_as_a_miss_exactly_once() {
        let mut session = QuizSession::new(
            Catalog::fallback(),
            SessionRules {
                total_questions: 3,
                seconds_per_question: 2,
            },
            StdRng::seed_from_u64(1),
        );
        session.start_game(GameMode::World, None).unwrap();

        assert_eq!(session.tick(), None);
        assert_eq!(session.time_left(), 1);
        assert_eq!(session.tick(), Some(Verdict::TimedOut));
        assert_eq!(session.phase(), Phase::Feedback);
        assert_eq!(session.tick(), None);

        let answer = session.history()[0].question.correct_answer.clone();
        assert!(session.submit_answer(&answer).is_err());
        assert_eq!(session.score(), 0);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].given_answer, None);
        assert_eq!(session.history()[0].verdict, Verdict::TimedOut);
    }

    #[test]
    fn advance_restarts_the_timer() {
        let mut session = session();
        session.start_game(GameMode::World, None).unwrap();
        for _ in 0..10 {
            session.tick();
        }
        assert_eq!(session.time_left(), 20);
        session.submit_answer("nope").unwrap();

        match session.advance().unwrap() {
            Advance::Next(_) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(session.question_index(), 1);
        assert_eq!(session.time_left(), 30);
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn advance_outside_feedback_is_rejected() {
        let mut session = session();
        assert_eq!(
            session.advance(),
            Err(SessionError::NotInFeedback(Phase::Idle))
        );
        session.start_game(GameMode::World, None).unwrap();
        assert_eq!(
            session.advance(),
            Err(SessionError::NotInFeedback(Phase::Playing))
        );
    }

    #[test]
    fn full_game_completes_with_summary() {
        let mut session = session();
        session.start_game(GameMode::World, None).unwrap();

        let mut summary = None;
        while summary.is_none() {
            let answer = correct(&session);
            session.submit_answer(&answer).unwrap();
            if let Advance::Complete(done) = session.advance().unwrap() {
                summary = Some(done);
            }
        }

        let summary = summary.unwrap();
        assert_eq!(summary.score, 10);
        assert_eq!(summary.total_questions, 10);
        assert_eq!(summary.mode, GameMode::World);
        assert_eq!(summary.continent, None);
        assert_eq!(session.phase(), Phase::Complete);
        assert!(session.current_question().is_none());
        assert_eq!(session.history().len(), 10);
    }

    #[test]
    fn reset_returns_to_idle_from_anywhere() {
        let mut session = session();
        session.start_game(GameMode::World, None).unwrap();
        session.submit_answer("nope").unwrap();

        session.reset();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.mode(), None);
        assert_eq!(session.score(), 0);
        assert!(session.current_question().is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn zero_question_rules_still_play_one_question() {
        let rules = SessionRules {
            total_questions: 0,
            seconds_per_question: 0,
        };
        let mut session = QuizSession::new(Catalog::fallback(), rules, StdRng::seed_from_u64(3));
        assert_eq!(session.total_questions(), 1);

        session.start_game(GameMode::World, None).unwrap();
        assert_eq!(session.time_left(), 1);
        let answer = correct(&session);
        session.submit_answer(&answer).unwrap();

        match session.advance().unwrap() {
            Advance::Complete(summary) => {
                assert_eq!(summary.score, 1);
                assert_eq!(summary.total_questions, 1);
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }
}
