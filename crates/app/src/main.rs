use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use quiz_core::model::QuizId;
use services::{Applied, Clock, QuizBrowser, QuizService, RestQuestionProvider};
use storage::repository::{QuestionProvider, Storage};

mod db;
mod seed;
mod terminal;

use crate::db::{normalize_sqlite_url, prepare_sqlite_file};
use crate::terminal::{Outcome, print_quizzes, run_attempt};

#[derive(Parser, Debug)]
#[command(name = "quizdeck")]
#[command(version, about = "Take quizzes from the terminal.", long_about = None)]
struct Args {
    /// SQLite database URL.
    #[arg(long, env = "QUIZ_DB_URL", default_value = "sqlite:quizdeck.sqlite3")]
    db: String,
    /// Read quizzes from the remote data store (QUIZ_REMOTE_URL / QUIZ_REMOTE_KEY).
    #[arg(long)]
    remote: bool,
    /// Shuffle question order when starting a quiz.
    #[arg(long)]
    shuffle: bool,
    #[arg(long, env = "QUIZ_LOG", default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// List available quizzes.
    List,
    /// Take a quiz interactively.
    Take { quiz_id: QuizId },
    /// Store a sample quiz in the SQLite database.
    Seed,
}

async fn open_sqlite(raw_url: &str) -> Result<Storage, Box<dyn std::error::Error>> {
    let db_url = normalize_sqlite_url(raw_url);
    prepare_sqlite_file(&db_url)?;
    debug!("using database {db_url}");
    Ok(Storage::sqlite(&db_url).await?)
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.command == Command::Seed {
        if args.remote {
            return Err("seed writes to the SQLite database; drop --remote".into());
        }
        let storage = open_sqlite(&args.db).await?;
        let quiz = seed::seed(storage.catalog.as_ref()).await?;
        println!("Seeded quiz {}: {}", quiz.id(), quiz.title());
        return Ok(());
    }

    let provider: Arc<dyn QuestionProvider> = if args.remote {
        Arc::new(RestQuestionProvider::from_env()?)
    } else {
        open_sqlite(&args.db).await?.questions
    };
    let service =
        QuizService::new(Clock::system(), provider).with_shuffle_questions(args.shuffle);

    let mut browser = QuizBrowser::new();
    let quizzes = browser.refresh(&service).await?.to_vec();
    let mut out = io::stdout().lock();

    match args.command {
        Command::List => print_quizzes(&quizzes, &mut out)?,
        Command::Take { quiz_id } => {
            let quiz = quizzes
                .into_iter()
                .find(|q| *q.id() == quiz_id)
                .ok_or_else(|| format!("no quiz with id {quiz_id}"))?;

            if browser.open(&service, quiz).await? == Applied::Stale {
                return Err("quiz selection changed while loading".into());
            }
            let runner = browser
                .runner_mut()
                .ok_or("quiz did not start")?;

            let mut input = io::stdin().lock();
            if run_attempt(runner, &mut input, &mut out)? == Outcome::Finished {
                let result = runner.result()?;
                if result.overtime() {
                    writeln!(out, "Finished after the time limit.")?;
                }
            }
            browser.back_to_list();
        }
        Command::Seed => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    if let Err(err) = run(args).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
