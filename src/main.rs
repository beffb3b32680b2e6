mod config;
mod error;
mod forecast;
mod indicator;
mod market;
mod model;
mod pipeline;
mod render;
mod series;

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use error::ForecastError;
use forecast::Forecaster;
use forecast::gemini::GeminiForecaster;
use render::{Renderer, TerminalRenderer};

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("configuration error")]
    Config,
    #[display("forecast client error")]
    Forecast,
    #[display("runtime error")]
    Runtime,
}

#[derive(Parser)]
#[command(name = "index-forecaster", about = "Index price forecast dashboard")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Skip the forecast call; show historical data and indicators only
    #[arg(long)]
    offline: bool,

    /// Override the configured forecast horizon in days
    #[arg(long)]
    horizon: Option<usize>,

    /// Start of the display window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the display window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[tokio::main]
async fn main() {
    if let Err(report) = run().await {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();
    let mut app_config = config::load(Path::new(&cli.config)).change_context(AppError::Config)?;

    init_tracing(&app_config);

    if let Some(horizon) = cli.horizon {
        app_config.forecast.horizon_days = horizon;
        config::validate(&app_config).change_context(AppError::Config)?;
    }

    let forecaster: Option<Box<dyn Forecaster>> = if cli.offline {
        info!("offline mode, skipping forecast");
        None
    } else {
        Some(build_forecaster(&app_config).change_context(AppError::Forecast)?)
    };

    let view = pipeline::run(&app_config, forecaster.as_deref(), cli.from, cli.to)
        .await
        .change_context(AppError::Runtime)?;

    TerminalRenderer.render(&view);

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(&config.general.log_level);
    match config.general.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}

fn build_forecaster(config: &AppConfig) -> Result<Box<dyn Forecaster>, Report<ForecastError>> {
    let var = &config.forecast.api_key_env;
    let api_key = std::env::var(var)
        .map_err(|_| Report::new(ForecastError::MissingApiKey { var: var.clone() }))?;

    let forecaster = GeminiForecaster::new(
        api_key,
        config.forecast.model.clone(),
        Duration::from_secs(config.forecast.timeout_secs),
    )?;
    Ok(Box::new(forecaster))
}
