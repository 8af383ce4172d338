use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{DEFAULT_FEEDBACK_DELAY, DEFAULT_QUESTIONS_AMOUNT, RoundSettings};
use services::{CatalogQuestionSource, Clock, QuestionSource, StatisticService};
use storage::Storage;
use tracing_subscriber::EnvFilter;
use ui::{QuizController, StartMode, UiContext, UiEvent};

mod terminal;

use terminal::TerminalPresenter;

const DEFAULT_DB_URL: &str = "sqlite://movie_quiz.sqlite3";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(value: String, flag: &'static str) -> Result<T, ArgsError> {
    value
        .trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw: value })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  movie-quiz [--db <sqlite_url>] [--catalog <movies.json>]");
    eprintln!("             [--questions <n>] [--feedback-ms <ms>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --questions {DEFAULT_QUESTIONS_AMOUNT}");
    eprintln!("  --feedback-ms {}", DEFAULT_FEEDBACK_DELAY.as_millis());
    eprintln!("  built-in movie list unless --catalog is given");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MOVIEQUIZ_DB_URL, MOVIEQUIZ_CATALOG, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
    catalog: Option<PathBuf>,
    questions: u32,
    feedback: Duration,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Play(Args),
    Help,
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Command, ArgsError> {
        let mut db_url = env("MOVIEQUIZ_DB_URL")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut catalog = env("MOVIEQUIZ_CATALOG")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut questions = DEFAULT_QUESTIONS_AMOUNT;
        let mut feedback = DEFAULT_FEEDBACK_DELAY;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--catalog" => {
                    catalog = Some(PathBuf::from(require_value(args, "--catalog")?));
                }
                "--questions" => {
                    questions = parse_number(require_value(args, "--questions")?, "--questions")?;
                }
                "--feedback-ms" => {
                    let millis =
                        parse_number(require_value(args, "--feedback-ms")?, "--feedback-ms")?;
                    feedback = Duration::from_millis(millis);
                }
                "--help" | "-h" => return Ok(Command::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Command::Play(Self {
            db_url,
            catalog,
            questions,
            feedback,
        }))
    }
}

/// Turns `sqlite:path` or a bare path into an absolute `sqlite://` URL.
///
/// `sqlite://` URLs and `sqlite::memory:` pass through untouched.
fn normalize_sqlite_url(raw: String) -> String {
    let raw = raw.trim();
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_owned();
    }

    let path = Path::new(raw.strip_prefix("sqlite:").unwrap_or(raw));
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("sqlite://{}", absolute.display())
}

/// Creates the directory the database file lives in; `SQLite` creates the file itself.
fn ensure_db_dir(db_url: &str) -> std::io::Result<()> {
    let Some(rest) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or(rest);
    match Path::new(file).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv, |key| std::env::var(key).ok()) {
        Ok(Command::Play(args)) => args,
        Ok(Command::Help) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };
    let settings = RoundSettings::new(parsed.questions, parsed.feedback)?;

    ensure_db_dir(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let statistics = StatisticService::load(Arc::clone(&storage.kv), Clock::system()).await;
    tracing::info!(
        db_url = %parsed.db_url,
        games = statistics.games_count(),
        "statistics ready"
    );

    let (source, mode): (Arc<dyn QuestionSource>, StartMode) = match parsed.catalog {
        Some(path) => (
            Arc::new(CatalogQuestionSource::from_file(path)),
            StartMode::LoadThenPlay,
        ),
        None => (
            Arc::new(CatalogQuestionSource::builtin()),
            StartMode::Immediate,
        ),
    };

    let (ctx, events) = UiContext::channel();
    let (presenter, input) = TerminalPresenter::new(ctx.clone());
    let controller =
        QuizController::new(ctx.clone(), presenter, source, statistics, settings, mode);

    tokio::spawn(input.run());
    ctx.post(UiEvent::Start);
    let controller = controller.run(events).await;
    tracing::debug!(?controller, "quiz finished");

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
