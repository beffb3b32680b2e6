use error_stack::{Report, ResultExt, bail};
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ForecastError;
use crate::forecast::Forecaster;
use crate::model::{ForecastOutcome, ForecastStep, SeriesPoint};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER: &str = "gemini";
const RESPONSE_TEMPERATURE: f64 = 0.5;

/// Forecast client backed by the Gemini `generateContent` API.
///
/// The API key is injected at construction; the client never reads
/// process-wide configuration itself.
pub struct GeminiForecaster {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Serializes calls: at most one forecast request outstanding at a time.
    in_flight: Mutex<()>,
}

impl GeminiForecaster {
    pub fn new(
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, Report<ForecastError>> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .change_context(ForecastError::Request {
                provider: PROVIDER.into(),
            })?;
        Ok(Self {
            client,
            api_key,
            model,
            in_flight: Mutex::new(()),
        })
    }
}

impl Forecaster for GeminiForecaster {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn forecast(
        &self,
        historical: &[SeriesPoint],
        horizon_days: usize,
    ) -> BoxFuture<'_, Result<ForecastOutcome, Report<ForecastError>>> {
        let historical = historical.to_vec();
        Box::pin(async move {
            let _guard = self.in_flight.lock().await;
            let request_id = Uuid::new_v4();

            let prompt = build_prompt(&historical, horizon_days)?;
            let url = format!("{}/models/{}:generateContent", GEMINI_BASE_URL, self.model);
            let body = json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "temperature": RESPONSE_TEMPERATURE,
                },
            });

            debug!(
                %request_id,
                model = %self.model,
                horizon_days,
                points = historical.len(),
                "sending forecast request"
            );

            let response = self
                .client
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
                .send()
                .await
                .change_context(ForecastError::Request {
                    provider: PROVIDER.into(),
                })?;

            if !response.status().is_success() {
                return Err(Report::new(ForecastError::Request {
                    provider: PROVIDER.into(),
                })
                .attach(format!("HTTP status: {}", response.status())));
            }

            let envelope: GenerateContentResponse =
                response
                    .json()
                    .await
                    .change_context(ForecastError::ResponseParse {
                        provider: PROVIDER.into(),
                    })?;

            let text = envelope.first_text().ok_or_else(|| {
                Report::new(ForecastError::ResponseParse {
                    provider: PROVIDER.into(),
                })
                .attach("no candidate text in response")
            })?;

            let outcome = parse_payload(&text, horizon_days)?;
            info!(%request_id, steps = outcome.steps.len(), "forecast received");
            Ok(outcome)
        })
    }
}

fn build_prompt(
    historical: &[SeriesPoint],
    horizon_days: usize,
) -> Result<String, Report<ForecastError>> {
    let series_json =
        serde_json::to_string(historical).change_context(ForecastError::InvalidPayload {
            reason: "failed to encode historical series".into(),
        })?;

    Ok(format!(
        "You are a financial analyst specializing in time series forecasting \
         for stock indices.\n\
         Given the following daily closing prices for the last {} trading days, \
         predict the closing prices for the next {} calendar days.\n\n\
         Historical data:\n{}\n\n\
         Respond with a single raw JSON object (no markdown fences) with keys:\n\
         1. 'forecast': an array of exactly {} objects, each with a 'price' \
         (predicted close), a 'high' and a 'low' (the bounds of a 90% \
         confidence interval, with low <= price <= high).\n\
         2. 'summary': a brief one-paragraph analysis of the expected trend \
         and key levels to watch.\n\
         3. 'predictedHigh': the highest 'high' across the forecast.\n\
         4. 'predictedLow': the lowest 'low' across the forecast.\n\
         5. 'percentageChange': the percentage change from the last \
         historical close to the last forecast price.",
        historical.len(),
        horizon_days,
        series_json,
        horizon_days,
    ))
}

/// Parse and validate the model's JSON payload.
///
/// Missing keys, wrong types, or a step count that does not match the
/// requested horizon all reject the payload as a whole.
fn parse_payload(
    text: &str,
    horizon_days: usize,
) -> Result<ForecastOutcome, Report<ForecastError>> {
    let payload: ForecastPayload =
        serde_json::from_str(text).change_context(ForecastError::InvalidPayload {
            reason: "schema mismatch".into(),
        })?;

    if payload.forecast.len() != horizon_days {
        bail!(ForecastError::InvalidPayload {
            reason: format!(
                "expected {horizon_days} forecast steps, got {}",
                payload.forecast.len()
            ),
        });
    }

    let steps = payload
        .forecast
        .into_iter()
        .map(|s| ForecastStep {
            price: s.price,
            high: s.high,
            low: s.low,
        })
        .collect();

    Ok(ForecastOutcome {
        steps,
        summary: payload.summary,
        predicted_high: Some(payload.predicted_high),
        predicted_low: Some(payload.predicted_low),
        percentage_change: Some(payload.percentage_change),
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .parts
            .first()
            .map(|part| part.text.clone())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastPayload {
    forecast: Vec<PayloadStep>,
    summary: String,
    predicted_high: f64,
    predicted_low: f64,
    percentage_change: f64,
}

#[derive(Debug, Deserialize)]
struct PayloadStep {
    price: f64,
    high: f64,
    low: f64,
}
