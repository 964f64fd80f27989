// Pitchlog entry point.
//
// Startup sequence:
// 1. Load config (writing the defaults on first run)
// 2. Initialize tracing (log to file, not terminal)
// 3. Open the journal database and resolve the session id
// 4. Build the App and recover journalled events
// 5. Run the TUI until quit

use pitchlog_core::config;
use pitchlog_core::db::Database;
use pitchlog_tui::app::{self, App};
use pitchlog_tui::tui;

use anyhow::Context;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Load config. Tracing needs the data home, so this comes first.
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.log_dir())?;
    info!(
        "Pitchlog starting up: user={}, data home {}",
        config.user.id,
        config.data_home.display()
    );

    // 3. Open database
    let db_path = config.db_path();
    let db = Database::open(&db_path.to_string_lossy()).context("failed to open database")?;
    info!("Database opened at {}", db_path.display());

    let session_id = match db.get_session_id()? {
        Some(id) => {
            info!("Resuming session {id}");
            id
        }
        None => {
            let id = Database::generate_session_id();
            db.set_session_id(&id)?;
            info!("Started new session {id}");
            id
        }
    };

    // 4. Build app state and recover
    let mut app = App::new(config, db, session_id);
    match app::recover_from_db(&mut app) {
        Ok(true) => info!("Recovered {} events from journal", app.log.len()),
        Ok(false) => {}
        Err(e) => error!("Crash recovery failed, starting with an empty log: {e:#}"),
    }

    // 5. Run the TUI
    let result = tui::run(app).await;
    if let Err(e) = &result {
        error!("TUI exited with error: {e:#}");
    }
    info!("Pitchlog shut down");
    result
}

/// Initialize tracing to write to `pitchlog.log` under `log_dir`.
fn init_tracing(log_dir: &std::path::Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("pitchlog.log"))
        .context("failed to create log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pitchlog_tui=info,pitchlog_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
