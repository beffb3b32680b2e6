use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("failed to read config file")]
    ReadFile,
    #[display("failed to parse config: {reason}")]
    Parse { reason: String },
    #[display("invalid config: {field}")]
    Validation { field: String },
}

#[derive(Debug, Display, Error)]
pub enum ForecastError {
    #[display("api key environment variable {var} is not set")]
    MissingApiKey { var: String },
    #[display("forecast request to {provider} failed")]
    Request { provider: String },
    #[display("failed to parse forecast response from {provider}")]
    ResponseParse { provider: String },
    #[display("forecast payload rejected: {reason}")]
    InvalidPayload { reason: String },
}

#[derive(Debug, Display, Error)]
pub enum SeriesError {
    #[display("no historical points to anchor forecast dates")]
    InsufficientHistory,
    #[display("malformed forecast: {reason}")]
    MalformedForecast { reason: String },
    #[display("forecast date exceeds the supported calendar range")]
    DateOutOfRange,
}

#[derive(Debug, Display, Error)]
pub enum IndicatorError {
    #[display("invalid parameter: {name}")]
    InvalidParameter { name: String },
}

#[derive(Debug, Display, Error)]
pub enum PipelineError {
    #[display("forecast stage failed")]
    Forecast,
    #[display("series assembly failed")]
    Assembly,
    #[display("indicator construction failed")]
    Indicator,
}
