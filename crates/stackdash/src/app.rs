//! Application entry point: wiring services, logging and the dashboard.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use stackdash_core::exit_codes;
use stackdash_service::{LogLayer, Logger, Services};
use stackdash_tui::app::restore_terminal;
use stackdash_tui::{register_all, App, Cache, Msg, Navigator, Theme};

use crate::config::AppConfig;
use crate::errors::AppError;

/// File receiving the message dump in debug mode.
pub const MESSAGE_DUMP_FILE: &str = "messages.log";

/// Run the application, returning the exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    if let Some(shell) = config.completion {
        generate_completion(shell, &mut io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    if !config.workdir.is_dir() {
        return Err(AppError::Config(format!(
            "workdir {} is not a directory",
            config.workdir.display()
        ))
        .into());
    }
    let theme = load_theme(config.theme.as_deref())?;

    let services = Services::new(&config.workdir);
    init_tracing(config, Arc::clone(&services.logger))?;
    services
        .discover_modules()
        .context("discovering modules")?;

    let mut cache = Cache::new();
    register_all(&mut cache, &services);
    let tasks = Arc::clone(&services.tasks);
    // The real size arrives with the first resize message.
    let navigator = Navigator::new(cache, theme, 80, 24).with_task_counter(move || tasks.counter());

    let mut app = App::new(navigator, Arc::clone(&services.broker));
    if config.debug {
        let dump = File::create(MESSAGE_DUMP_FILE)
            .with_context(|| format!("creating {MESSAGE_DUMP_FILE}"))?;
        app = app.with_message_dump(dump);
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    let tx = app.sender();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = tx.send(Msg::Quit);
    })
    .context("installing interrupt handler")?;
    install_panic_hook();

    app.run(config.first_page.kind()).map_err(AppError::Terminal)?;

    if interrupted.load(Ordering::SeqCst) {
        tracing::warn!("interrupted");
        Ok(exit_codes::ERROR_INTERRUPTED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// Generate a shell completion script.
pub fn generate_completion(shell: Shell, out: &mut dyn io::Write) {
    let mut cmd = AppConfig::command();
    generate(shell, &mut cmd, "stackdash", out);
}

fn load_theme(path: Option<&Path>) -> Result<Theme, AppError> {
    match path {
        Some(path) => Theme::from_file(path).map_err(|e| AppError::Config(e.to_string())),
        None => Ok(Theme::default()),
    }
}

/// Build the filter from `RUST_LOG` when set, else from `level`.
fn env_filter(level: &str) -> Result<EnvFilter, AppError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| AppError::Config(format!("invalid log level {level:?}: {e}"))),
    }
}

/// Record every event in the in-app log, and in the log file when one is
/// configured. The terminal belongs to the dashboard, so nothing is written
/// to stdout or stderr.
fn init_tracing(config: &AppConfig, logger: Arc<Logger>) -> Result<()> {
    let filter = env_filter(&config.log_level)?;
    let file_layer = match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(LogLayer::new(logger))
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}

/// Give the terminal back before the default hook prints the panic.
fn install_panic_hook() {
    let default = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default(info);
    }));
}
