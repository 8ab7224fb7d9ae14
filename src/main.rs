//! Library Admin - catalog administration client
//!
//! Restores the persisted session, checks it against the backend and
//! resolves the screen the app opens on.

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use library_admin::{config::LoggingConfig, shell::Navigator, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config.logging);

    tracing::info!("Starting Library Admin v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Backend API at {}", config.api.base_url);

    let state = AppState::from_config(config).context("Failed to initialise client")?;

    if state.session.is_authenticated() {
        if state.session.validate_token().await {
            if let Some(user) = state.session.current_user() {
                tracing::info!("Resuming session for {} ({})", user.display_name(), user.role);
            }
        } else {
            tracing::info!("Stored session is no longer valid");
        }
    } else {
        tracing::info!("No active session");
        if !state.session.api().ping().await {
            tracing::warn!("Backend at {} is not reachable", state.config.api.base_url);
        }
    }

    let start_path = state.route.current_path();
    let screen = state.navigate(&start_path);
    tracing::info!("Initial screen: {} ({})", screen, state.screen_path(screen));

    Ok(())
}

/// Install the global subscriber: console output plus an optional daily file
fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_admin={}", config.level).into());

    let (file_layer, guard) = match &config.file {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "library-admin.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if config.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    guard
}
