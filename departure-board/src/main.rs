use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use departure_board::config::ConfigFile;
use departure_board::controller::CycleController;
use departure_board::display::PreviewDisplay;
use departure_board::error::redact;
use departure_board::render::BoardRenderer;
use departure_board::sources::Sources;

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "BOARD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config_file = match ConfigFile::open(&path) {
        Ok(file) => file,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    let config = config_file.current();
    info!(path = %config_file.path().display(), "Loaded configuration");

    let sources = match Sources::from_config(&config.api) {
        Ok(sources) => sources,
        Err(e) => {
            error!(error = %redact(&e.to_string(), &config.secrets()), "Failed to create API clients");
            return ExitCode::FAILURE;
        }
    };

    let renderer = BoardRenderer::new(
        config.display.title.clone(),
        config.stations.avg_waiting_time,
    );
    let display = PreviewDisplay::new(config.display.output_dir.clone());
    let preview_dir = display.dir().display().to_string();
    info!(dir = %preview_dir, "Writing frames to preview directory");

    let mut controller = CycleController::new(config, sources, renderer, display);

    tokio::select! {
        err = controller.run() => {
            error!(kind = %err.kind(), "Departure board stopped");
            ExitCode::FAILURE
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            ExitCode::SUCCESS
        }
    }
}
