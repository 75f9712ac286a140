use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use interview_wizard::{
    create_router, AppState, CaptureOutcome, Config, FileRecorder, HttpSubmitter,
    InterviewSession, NatsForwarder, NotificationHub, Question, SessionConfig, Step,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "interview-wizard", version, about = "Interview recording wizard")]
struct Cli {
    /// Config file (extension optional)
    #[arg(long, default_value = "config/interview-wizard")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the wizard HTTP API
    Serve,

    /// Run a whole interview from pre-recorded clips and submit it
    Take {
        /// JSON file with the question list
        #[arg(long)]
        questions: PathBuf,

        /// Directory holding `<question_id>.<ext>` clips (defaults to recorder.clips_dir)
        #[arg(long)]
        clips: Option<PathBuf>,

        #[arg(long)]
        test_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let hub = NotificationHub::new();
    let forwarder_task = if cfg.nats.enabled {
        match NatsForwarder::connect(&cfg.nats.url).await {
            Ok(forwarder) => Some(forwarder.spawn(hub.subscribe())),
            Err(e) => {
                warn!("Notifications will not be forwarded: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    match cli.command {
        Command::Serve => serve(&cfg, hub).await?,
        Command::Take {
            questions,
            clips,
            test_id,
        } => {
            let clips = clips
                .or_else(|| cfg.recorder.clips_dir.as_ref().map(PathBuf::from))
                .context("No clips directory given (--clips or recorder.clips_dir)")?;
            take(&cfg, hub, &questions, clips, test_id).await?;
        }
    }

    if let Some(task) = forwarder_task {
        task.abort();
    }

    Ok(())
}

async fn serve(cfg: &Config, hub: NotificationHub) -> Result<()> {
    let submitter = Arc::new(HttpSubmitter::from_settings(&cfg.submission)?);
    let app = create_router(AppState::new(submitter, hub));

    let addr = cfg.http_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP API listening on {}", addr);
    info!("Submissions go to {}", cfg.submission.base_url);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

async fn take(
    cfg: &Config,
    hub: NotificationHub,
    questions_path: &Path,
    clips_dir: PathBuf,
    test_id: String,
) -> Result<()> {
    let raw = tokio::fs::read_to_string(questions_path)
        .await
        .with_context(|| format!("Failed to read {}", questions_path.display()))?;
    let questions: Vec<Question> =
        serde_json::from_str(&raw).context("Failed to parse question list")?;

    // Echo candidate-facing messages to the log
    let mut toasts = hub.subscribe();
    let toast_task = tokio::spawn(async move {
        while let Some(n) = toasts.recv().await {
            info!("[{:?}] {}: {}", n.level, n.title, n.message);
        }
    });

    let config = SessionConfig {
        retry_limit: cfg.recorder.retry_limit,
        ..SessionConfig::new(test_id)
    };
    let submitter = Arc::new(HttpSubmitter::from_settings(&cfg.submission)?);
    let mut session = InterviewSession::new(
        config,
        questions,
        Box::new(FileRecorder::new(clips_dir)),
        submitter,
        hub,
    )?;

    session.advance();

    while let Step::Question { index } = session.wizard().step() {
        match session.capture_answer(index).await {
            Ok(CaptureOutcome::Clip(_)) => {
                session.advance();
            }
            Ok(CaptureOutcome::NoClip) => {
                session.skip_answer(index)?;
            }
            Err(e) => {
                error!("Skipping question {}: {:#}", index + 1, e);
                session.skip_answer(index)?;
            }
        }
    }

    let receipt = session.submit().await?;
    let stats = session.stats();

    info!(
        "Submitted test {}: {} recorded, {} skipped (submission id: {})",
        receipt.test_id,
        stats.recorded,
        stats.skipped,
        receipt.submission_id.as_deref().unwrap_or("none")
    );

    // The session owns the last hub handle; dropping it closes the stream
    drop(session);
    if let Err(e) = toast_task.await {
        warn!("Notification log task failed: {}", e);
    }

    Ok(())
}
