use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::Deserialize;

use crate::error::ConfigError;

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_historical_days() -> usize {
    30
}

fn default_base_price() -> f64 {
    19_500.0
}

fn default_daily_volatility() -> f64 {
    0.02
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_horizon_days() -> usize {
    7
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_ma_period() -> usize {
    20
}

fn default_rsi_period() -> usize {
    14
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub indicators: IndicatorsConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_historical_days")]
    pub historical_days: usize,
    #[serde(default = "default_base_price")]
    pub base_price: f64,
    #[serde(default = "default_daily_volatility")]
    pub daily_volatility: f64,
    /// Fixed RNG seed for reproducible mock data.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            historical_days: default_historical_days(),
            base_price: default_base_price(),
            daily_volatility: default_daily_volatility(),
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: usize,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            horizon_days: default_horizon_days(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IndicatorsConfig {
    #[serde(default = "default_true")]
    pub sma_enabled: bool,
    #[serde(default = "default_ma_period")]
    pub sma_period: usize,
    #[serde(default = "default_true")]
    pub ema_enabled: bool,
    #[serde(default = "default_ma_period")]
    pub ema_period: usize,
    #[serde(default = "default_true")]
    pub rsi_enabled: bool,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
}

impl Default for IndicatorsConfig {
    fn default() -> Self {
        Self {
            sma_enabled: true,
            sma_period: default_ma_period(),
            ema_enabled: true,
            ema_period: default_ma_period(),
            rsi_enabled: true,
            rsi_period: default_rsi_period(),
        }
    }
}

/// Load and validate an `AppConfig` from a TOML file at `path`.
pub fn load(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .change_context(ConfigError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content).change_context(ConfigError::Parse {
        reason: "invalid TOML syntax or schema mismatch".into(),
    })?;

    validate(&config)?;

    Ok(config)
}

const MIN_PERIOD: usize = 2;
const MAX_PERIOD: usize = 100;
const MIN_HORIZON: usize = 3;
const MAX_HORIZON: usize = 15;

pub fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    validate_market(&config.market)?;
    validate_forecast(&config.forecast)?;
    validate_indicators(&config.indicators)?;
    Ok(())
}

fn validate_market(market: &MarketConfig) -> Result<(), Report<ConfigError>> {
    if market.historical_days == 0 {
        return Err(Report::new(ConfigError::Validation {
            field: "market.historical_days must be at least 1".into(),
        }));
    }
    if !market.base_price.is_finite() || market.base_price <= 0.0 {
        return Err(Report::new(ConfigError::Validation {
            field: "market.base_price must be a positive number".into(),
        }));
    }
    if !market.daily_volatility.is_finite()
        || market.daily_volatility <= 0.0
        || market.daily_volatility >= 1.0
    {
        return Err(Report::new(ConfigError::Validation {
            field: "market.daily_volatility must be between 0 and 1 exclusive".into(),
        }));
    }
    Ok(())
}

fn validate_forecast(forecast: &ForecastConfig) -> Result<(), Report<ConfigError>> {
    if !(MIN_HORIZON..=MAX_HORIZON).contains(&forecast.horizon_days) {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "forecast.horizon_days must be between {MIN_HORIZON} and {MAX_HORIZON}, got {}",
                forecast.horizon_days
            ),
        }));
    }
    if forecast.timeout_secs == 0 {
        return Err(Report::new(ConfigError::Validation {
            field: "forecast.timeout_secs must be at least 1".into(),
        }));
    }
    Ok(())
}

fn validate_indicators(indicators: &IndicatorsConfig) -> Result<(), Report<ConfigError>> {
    let periods = [
        ("indicators.sma_period", indicators.sma_period),
        ("indicators.ema_period", indicators.ema_period),
        ("indicators.rsi_period", indicators.rsi_period),
    ];
    for (name, period) in periods {
        if !(MIN_PERIOD..=MAX_PERIOD).contains(&period) {
            return Err(Report::new(ConfigError::Validation {
                field: format!("{name} must be between {MIN_PERIOD} and {MAX_PERIOD}, got {period}"),
            }));
        }
    }
    Ok(())
}
