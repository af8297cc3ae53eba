use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Source of the central bank's daily UFV series.
#[async_trait]
pub trait UfvResolver: Send + Sync {
    async fn ufv_for(&self, date: NaiveDate) -> Result<f64, UfvError>;
}

#[derive(Debug, Error)]
pub enum UfvError {
    #[error("no UFV data for date {0}")]
    NotFound(NaiveDate),

    #[error("malformed UFV value `{value}` for date {date}")]
    Malformed { date: NaiveDate, value: String },

    #[error("UFV source unavailable for date {date}: {reason}")]
    Unavailable { date: NaiveDate, reason: String },
}

/// Queries `GET {base_url}?fecha=YYYY-MM-DD`.
///
/// The source answers `{ "fecha": "...", "ufv": <number or numeric string> }`,
/// a 404 or a null `ufv` means the series has no value for that day.
pub struct HttpUfvResolver {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UfvResponse {
    #[serde(default)]
    ufv: Value,
}

impl HttpUfvResolver {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl UfvResolver for HttpUfvResolver {
    #[instrument(skip(self))]
    async fn ufv_for(&self, date: NaiveDate) -> Result<f64, UfvError> {
        let unavailable = |e: reqwest::Error| UfvError::Unavailable { date, reason: e.to_string() };

        let response = self.client
            .get(&self.base_url)
            .query(&[("fecha", date.format("%Y-%m-%d").to_string())])
            .send().await
            .map_err(|e| {
                warn!(%date, error = %e, "UFV request failed");
                unavailable(e)
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(UfvError::NotFound(date));
        }

        let response = response.error_for_status().map_err(unavailable)?;
        let body: UfvResponse = response.json().await.map_err(unavailable)?;

        let value = parse_ufv(date, &body.ufv)?;
        debug!(%date, value, "UFV resolved");

        Ok(value)
    }
}

/// Accepts JSON numbers and numeric strings, with either `.` or `,` as decimal separator.
pub(crate) fn parse_ufv(date: NaiveDate, value: &Value) -> Result<f64, UfvError> {
    let malformed = || UfvError::Malformed { date, value: value.to_string() };

    let parsed = match value {
        Value::Null => return Err(UfvError::NotFound(date)),
        Value::Number(n) => n.as_f64().ok_or_else(malformed)?,
        Value::String(s) if s.trim().is_empty() => return Err(UfvError::NotFound(date)),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().map_err(|_| malformed())?,
        _ => return Err(malformed()),
    };

    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(malformed());
    }

    Ok(parsed)
}
