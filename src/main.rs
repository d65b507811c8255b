use capital_quiz::{
    accounts::Accounts,
    catalog::CatalogLoader,
    config::AppConfig,
    error::AppError,
    generator::CONTINENTS,
    handlers::game_handler::handle_game,
    helpers::parse_input,
    ledger::{badges, ScoreLedger},
    loggers::file_logger::init_file_logger,
    models::{
        communication::{GameEvent, GameUpdate},
        game::{GameMode, Verdict},
        lobby::Registration,
    },
    state::AppState,
    storage::SqliteStore,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::io::BufRead;

#[derive(Parser)]
#[command(name = "capital-quiz", version, about = "Guess the capital city of countries around the world")]
struct Cli {
    /// Print game updates as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    /// Sign in with a registered email
    Login {
        #[arg(long)]
        email: String,
    },
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Play a round of questions
    Play {
        /// Restrict questions to one continent, e.g. "Europe"
        #[arg(long)]
        continent: Option<String>,
    },
    /// Show statistics, badges and recent scores
    Profile,
    /// List the continents that can be played
    Continents,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    if let Err(error) = init_file_logger(&config.log_dir, config.log_level) {
        eprintln!("Logging disabled: {}", error);
    }
    info!("App started!");

    let store = SqliteStore::open(&config.database_path)?;
    let accounts = Accounts::new(&store, &config.signing_key, config.token_ttl);

    match cli.command {
        Commands::Register { email, name } => match accounts.register(&email, &name, Utc::now())? {
            Registration::Created(session) => println!("Welcome, {}!", session.user.name),
            Registration::EmailTaken => println!("{} is already registered, try logging in", email),
        },
        Commands::Login { email } => match accounts.login(&email, Utc::now())? {
            Some(session) => println!("Signed in as {}", session.user.name),
            None => println!("No account for {}", email),
        },
        Commands::Logout => {
            accounts.logout()?;
            println!("Signed out");
        }
        Commands::Whoami => match accounts.restore(Utc::now())? {
            Some(session) => println!("{} <{}>", session.user.name, session.user.email),
            None => println!("Not signed in"),
        },
        Commands::Continents => {
            for continent in CONTINENTS {
                println!("{}", continent);
            }
        }
        Commands::Profile => {
            let session = accounts.restore(Utc::now())?.ok_or(AppError::NotSignedIn)?;
            print_profile(&store, &session.user.id, &session.user.name)?;
        }
        Commands::Play { continent } => {
            if accounts.restore(Utc::now())?.is_none() {
                return Err(AppError::NotSignedIn);
            }
            play(store, config, continent, cli.json).await?;
        }
    }

    Ok(())
}

async fn play(
    store: SqliteStore,
    config: AppConfig,
    continent: Option<String>,
    json: bool,
) -> Result<(), AppError> {
    let loader = CatalogLoader::new(config.countries_url.clone(), config.fetch_timeout);
    let catalog = loader.load().await;
    info!("Catalog ready: {} countries ({:?})", catalog.len(), catalog.source);

    let mode = match continent {
        Some(_) => GameMode::Continent,
        None => GameMode::World,
    };
    let mut app = AppState::new(store, config, catalog, StdRng::from_entropy());
    app.restore_session()?;

    let (tx, rx) = unbounded();
    let (updates_tx, updates_rx) = unbounded();
    read_answers(tx.clone());

    let game = handle_game(&mut app, mode, continent, tx, rx, updates_tx);
    let (outcome, ()) = tokio::join!(game, render(updates_rx, json));
    info!("Game finished: {:?}", outcome?);
    Ok(())
}

/// Reads answers on a plain thread; a blocked stdin read must not hold up runtime shutdown.
fn read_answers(tx: UnboundedSender<GameEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.unbounded_send(parse_input(&line)).is_err() {
                break;
            }
        }
    });
}

async fn render(mut updates: UnboundedReceiver<GameUpdate>, json: bool) {
    while let Some(update) = updates.next().await {
        if json {
            match serde_json::to_string(&update) {
                Ok(line) => println!("{}", line),
                Err(error) => warn!("Cannot serialize update: {}", error),
            }
            continue;
        }

        match update {
            GameUpdate::Question {
                index,
                total,
                country,
                flag,
                options,
                timer,
                ..
            } => {
                println!("\n[{}/{}] {} What is the capital of {}?", index + 1, total, flag, country);
                for (position, option) in options.iter().enumerate() {
                    println!("  {}) {}", position + 1, option);
                }
                println!("({}s, type a number or a name, q to quit)", timer);
            }
            GameUpdate::Timer { timer } => {
                if timer % 10 == 0 || timer <= 5 {
                    println!("  {}s left", timer);
                }
            }
            GameUpdate::Feedback {
                verdict,
                correct_answer,
                score,
            } => match verdict {
                Verdict::Correct => println!("Correct! Score: {}", score),
                Verdict::Incorrect => println!("Wrong, it was {}. Score: {}", correct_answer, score),
                Verdict::TimedOut => println!("Time's up, it was {}. Score: {}", correct_answer, score),
            },
            GameUpdate::Complete { score, total, .. } => {
                println!("\nFinished with {}/{} correct", score, total);
            }
            GameUpdate::Unavailable { continent } => println!(
                "Not enough countries to build a question for {}, pick another continent",
                continent.as_deref().unwrap_or("the world")
            ),
            GameUpdate::Aborted { score } => println!("Game abandoned with {} correct", score),
        }
    }
}

fn print_profile(store: &SqliteStore, user_id: &str, name: &str) -> Result<(), AppError> {
    let ledger = ScoreLedger::new(store);
    let stats = ledger.statistics(user_id)?;

    println!("{}", name);
    println!("  Quizzes played:  {}", stats.total_sessions);
    println!("  Best score:      {:.0}%", stats.best_percentage);
    println!("  Average score:   {:.0}%", stats.average_percentage);
    println!("  Correct answers: {}/{}", stats.total_correct, stats.total_questions);
    println!("  Current streak:  {}", stats.current_streak);

    let earned = badges(&stats);
    if !earned.is_empty() {
        println!("\nBadges");
        for badge in earned {
            println!("  {} {} - {}", badge.icon(), badge.name(), badge.description());
        }
    }

    let recent = ledger.recent(user_id, 5)?;
    if !recent.is_empty() {
        println!("\nRecent games");
        for record in recent {
            println!(
                "  {}  {}/{}  {}{}",
                record.completed_at.format("%Y-%m-%d %H:%M"),
                record.score,
                record.total_questions,
                record.game_mode,
                record
                    .continent
                    .map(|continent| format!(" ({})", continent))
                    .unwrap_or_default()
            );
        }
    }
    Ok(())
}
