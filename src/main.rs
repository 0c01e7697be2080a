use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use speech_coach::recognition::{stdin_lines, SharedLines};
use speech_coach::{
    AttemptOutcome, Config, ConsoleView, FileStore, FinalReportRequester, HttpBackend,
    PracticeSession, RecognizerFactory, RecognizerSource, SessionConfig, SessionPhase,
};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "speech-coach")]
#[command(about = "Guided speech practice against a fluency scoring service")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/speech-coach")]
    config: String,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read each prompt aloud and get per-dimension results
    Practice,
    /// Show the final fluency report of a session
    Final {
        /// Session token; defaults to the last practised session
        session_id: Option<String>,
    },
}

/// Wait for the start action. Returns false on end of input.
async fn wait_for_enter(lines: &SharedLines, message: &str) -> Result<bool> {
    println!("{}", message);
    let line = lines
        .lock()
        .await
        .next_line()
        .await
        .context("Failed to read from stdin")?;
    Ok(line.is_some())
}

async fn practice(cfg: &Config) -> Result<()> {
    let lines = stdin_lines();
    let source = RecognizerSource::from_config(&cfg.recognition)?;
    let recognizer = RecognizerFactory::create(source, Arc::clone(&lines))?;

    let view = Arc::new(ConsoleView::new());
    let store = Arc::new(FileStore::new(&cfg.storage.path));
    let backend = Arc::new(HttpBackend::new(&cfg.backend.base_url));

    let mut session = PracticeSession::new(
        SessionConfig::new(cfg.recognition.settings()),
        cfg.prompt_sequence()?,
        recognizer,
        backend,
        view,
        store,
    );
    info!("Practice session {}", session.session_id());
    session.open();

    loop {
        let message = match session.phase() {
            SessionPhase::Complete => "Press Enter to retry loading results",
            _ => "Press Enter to start recording",
        };
        if !wait_for_enter(&lines, message).await? {
            warn!("Input closed before the session completed");
            return Ok(());
        }

        let step = match session.phase() {
            SessionPhase::Complete => session.fetch_results().await.map(|_| None),
            _ => session.record_attempt().await.map(Some),
        };

        match step {
            Ok(Some(AttemptOutcome::Advanced { next_index, .. })) => {
                info!("Advanced to prompt {}", next_index);
            }
            Ok(Some(AttemptOutcome::Completed { .. })) | Ok(None) => return Ok(()),
            // Already shown; the session is back at a point the user can retry from
            Err(e) => warn!("Step failed: {}", e),
        }
    }
}

async fn final_report(cfg: &Config, session_id: Option<&str>) -> Result<()> {
    let view = Arc::new(ConsoleView::new());
    let store = Arc::new(FileStore::new(&cfg.storage.path));
    let backend = Arc::new(HttpBackend::new(&cfg.backend.base_url));

    let requester = FinalReportRequester::new(backend, view, store);
    let token = requester.resolve_token(session_id).await?;
    requester.run(&token).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::load(&args.config)?;
    info!("Loaded config: {}", cfg.service.name);
    info!("Scoring backend: {}", cfg.backend.base_url);

    match args.command {
        Command::Practice => practice(&cfg).await,
        Command::Final { session_id } => final_report(&cfg, session_id.as_deref()).await,
    }
}
