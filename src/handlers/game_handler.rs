use crate::{
    error::{AppError, SessionError},
    handlers::timeout_handler::{handle_feedback_pause, handle_ticks},
    helpers::resolve_answer,
    models::{
        communication::{GameEvent, GameUpdate},
        game::{GameMode, Phase, SessionSummary, Verdict},
        score::ScoreRecord,
    },
    session::QuizSession,
    state::{AppState, Step},
    storage::KeyValueStore,
};
use futures_channel::mpsc::{UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use log::{debug, info, warn};
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, PartialEq)]
pub enum GameOutcome {
    Completed {
        summary: SessionSummary,
        record: Option<ScoreRecord>,
    },
    Aborted {
        score: u32,
    },
    Unavailable {
        continent: Option<String>,
    },
}

/// Ticker of the question in play. Dropping it stops the ticks, so each question starts
/// counting from a fresh interval.
struct QuestionTimer(JoinHandle<()>);

impl QuestionTimer {
    fn start(tx: &UnboundedSender<GameEvent>, interval: Duration) -> Self {
        QuestionTimer(tokio::spawn(handle_ticks(tx.clone(), interval)))
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn publish(updates: &UnboundedSender<GameUpdate>, update: GameUpdate) {
    if updates.unbounded_send(update).is_err() {
        debug!("No listener for game updates");
    }
}

fn question_update<R>(session: &QuizSession<R>) -> Option<GameUpdate> {
    let question = session.current_question()?;
    Some(GameUpdate::Question {
        index: session.question_index(),
        total: session.total_questions(),
        country: question.country.name.common.clone(),
        flag: question.country.flag.clone(),
        coordinates: question.country.coordinates,
        options: question.options.clone(),
        timer: session.time_left(),
    })
}

/// Runs one game to completion. Timer ticks, answers, the end of each feedback pause and
/// quit requests all arrive on `rx` and are applied one at a time, so a question is
/// settled by whichever of its answer or its timeout comes first.
pub async fn handle_game<S, R>(
    app: &mut AppState<S, R>,
    mode: GameMode,
    continent: Option<String>,
    tx: UnboundedSender<GameEvent>,
    mut rx: UnboundedReceiver<GameEvent>,
    updates: UnboundedSender<GameUpdate>,
) -> Result<GameOutcome, AppError>
where
    S: KeyValueStore,
    R: Rng,
{
    match app.start_game(mode, continent.as_deref()) {
        Ok(_) => {}
        Err(SessionError::NoQuestionAvailable { continent }) => {
            warn!("No question available for {:?}", continent);
            publish(
                &updates,
                GameUpdate::Unavailable {
                    continent: continent.clone(),
                },
            );
            return Ok(GameOutcome::Unavailable { continent });
        }
        Err(error) => return Err(error.into()),
    }
    if let Some(update) = question_update(app.session()) {
        publish(&updates, update);
    }

    let interval = app.config().tick_interval;
    let pause = app.config().feedback_pause;
    let mut timer = Some(QuestionTimer::start(&tx, interval));

    let on_verdict = |app: &AppState<S, R>, verdict: Verdict| {
        let correct_answer = app
            .session()
            .current_question()
            .map(|question| question.correct_answer.clone())
            .unwrap_or_default();
        publish(
            &updates,
            GameUpdate::Feedback {
                verdict,
                correct_answer,
                score: app.session().score(),
            },
        );
        tokio::spawn(handle_feedback_pause(tx.clone(), pause));
    };

    while let Some(event) = rx.next().await {
        match event {
            GameEvent::Tick => match app.tick() {
                Some(verdict) => {
                    drop(timer.take());
                    on_verdict(&*app, verdict);
                }
                None if app.session().phase() == Phase::Playing => publish(
                    &updates,
                    GameUpdate::Timer {
                        timer: app.session().time_left(),
                    },
                ),
                None => {}
            },
            GameEvent::Answer { text } => {
                let answer = match app.session().current_question() {
                    Some(question) => resolve_answer(&text, question),
                    None => text,
                };
                match app.submit_answer(&answer) {
                    Ok(verdict) => {
                        drop(timer.take());
                        on_verdict(&*app, verdict);
                    }
                    Err(error) => debug!("Ignoring answer {:?}: {}", answer, error),
                }
            }
            GameEvent::Advance => match app.advance() {
                Ok(Step::Next(_)) => {
                    if let Some(update) = question_update(app.session()) {
                        publish(&updates, update);
                    }
                    timer = Some(QuestionTimer::start(&tx, interval));
                }
                Ok(Step::Complete { summary, record }) => {
                    publish(
                        &updates,
                        GameUpdate::Complete {
                            score: summary.score,
                            total: summary.total_questions,
                            mode: summary.mode,
                            continent: summary.continent.clone(),
                            record: record.clone(),
                        },
                    );
                    return Ok(GameOutcome::Completed { summary, record });
                }
                Err(AppError::Session(SessionError::NoQuestionAvailable { continent })) => {
                    app.reset();
                    publish(
                        &updates,
                        GameUpdate::Unavailable {
                            continent: continent.clone(),
                        },
                    );
                    return Ok(GameOutcome::Unavailable { continent });
                }
                Err(AppError::Session(error)) => debug!("Ignoring advance: {}", error),
                Err(error) => return Err(error),
            },
            GameEvent::Quit => break,
        }
    }

    let score = app.session().score();
    info!("Game aborted with score {}", score);
    app.reset();
    publish(&updates, GameUpdate::Aborted { score });
    Ok(GameOutcome::Aborted { score })
}
