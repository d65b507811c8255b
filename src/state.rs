//! The application state owned by the running process. Every change to the signed-in user
//! or the quiz goes through one of these methods.

use chrono::Utc;
use log::{info, warn};
use rand::Rng;

use crate::{
    accounts::Accounts,
    config::AppConfig,
    error::{AppError, SessionError},
    ledger::{badges, ScoreLedger},
    models::{
        country::Catalog,
        game::{GameMode, Question, SessionSummary, Verdict},
        lobby::{AuthSession, Registration, UserAccount},
        score::{Badge, ScoreRecord, Statistics},
    },
    session::{Advance, QuizSession, SessionRules},
    storage::KeyValueStore,
};

#[derive(Debug, PartialEq)]
pub enum Step {
    Next(Question),
    Complete {
        summary: SessionSummary,
        record: Option<ScoreRecord>,
    },
}

pub struct AppState<S, R> {
    store: S,
    config: AppConfig,
    session: QuizSession<R>,
    auth: Option<AuthSession>,
}

impl<S: KeyValueStore, R: Rng> AppState<S, R> {
    pub fn new(store: S, config: AppConfig, catalog: Catalog, rng: R) -> Self {
        let rules = SessionRules {
            total_questions: config.total_questions,
            seconds_per_question: config.seconds_per_question,
        };
        AppState {
            store,
            session: QuizSession::new(catalog, rules, rng),
            config,
            auth: None,
        }
    }

    fn accounts(&self) -> Accounts<'_, S> {
        Accounts::new(&self.store, &self.config.signing_key, self.config.token_ttl)
    }

    pub fn register(&mut self, email: &str, name: &str) -> Result<Registration, AppError> {
        let registration = self.accounts().register(email, name, Utc::now())?;
        if let Registration::Created(session) = &registration {
            self.auth = Some(session.clone());
        }
        Ok(registration)
    }

    pub fn login(&mut self, email: &str) -> Result<Option<&UserAccount>, AppError> {
        let auth = self.accounts().login(email, Utc::now())?;
        self.auth = auth;
        Ok(self.current_user())
    }

    pub fn logout(&mut self) -> Result<(), AppError> {
        self.accounts().logout()?;
        self.auth = None;
        self.session.reset();
        Ok(())
    }

    pub fn restore_session(&mut self) -> Result<Option<&UserAccount>, AppError> {
        let auth = self.accounts().restore(Utc::now())?;
        self.auth = auth;
        Ok(self.current_user())
    }

    pub fn current_user(&self) -> Option<&UserAccount> {
        self.auth.as_ref().map(|auth| &auth.user)
    }

    pub fn start_game(
        &mut self,
        mode: GameMode,
        continent: Option<&str>,
    ) -> Result<&Question, SessionError> {
        self.session.start_game(mode, continent)
    }

    pub fn submit_answer(&mut self, answer: &str) -> Result<Verdict, SessionError> {
        self.session.submit_answer(answer)
    }

    pub fn tick(&mut self) -> Option<Verdict> {
        self.session.tick()
    }

    pub fn time_expired(&mut self) -> Result<Verdict, SessionError> {
        self.session.time_expired()
    }

    /// Moves past the feedback pause. On the last question the result is written to the
    /// signed-in user's ledger.
    pub fn advance(&mut self) -> Result<Step, AppError> {
        let summary = match self.session.advance()? {
            Advance::Next(question) => return Ok(Step::Next(question.clone())),
            Advance::Complete(summary) => summary,
        };

        let record = match &self.auth {
            Some(auth) => Some(ScoreLedger::new(&self.store).record(
                &auth.user.id,
                &summary,
                Utc::now(),
            )?),
            None => {
                warn!(
                    "Game finished without a signed-in user, {}/{} not recorded",
                    summary.score, summary.total_questions
                );
                None
            }
        };
        Ok(Step::Complete { summary, record })
    }

    pub fn reset(&mut self) {
        info!("Game reset");
        self.session.reset();
    }

    pub fn history(&self) -> Result<Vec<ScoreRecord>, AppError> {
        let user = self.current_user().ok_or(AppError::NotSignedIn)?;
        Ok(ScoreLedger::new(&self.store).history(&user.id)?)
    }

    pub fn statistics(&self) -> Result<Statistics, AppError> {
        let user = self.current_user().ok_or(AppError::NotSignedIn)?;
        Ok(ScoreLedger::new(&self.store).statistics(&user.id)?)
    }

    pub fn badges(&self) -> Result<Vec<Badge>, AppError> {
        Ok(badges(&self.statistics()?))
    }
}

impl<S, R> AppState<S, R> {
    pub fn session(&self) -> &QuizSession<R> {
        &self.session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
