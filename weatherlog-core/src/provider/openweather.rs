use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    WeatherError,
    model::{ProviderPayload, status_code},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const SUCCESS_COD: u16 = 200;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProviderBuilder {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl OpenWeatherProviderBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overall request deadline. `None` leaves the call unbounded.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenWeatherProvider, WeatherError> {
        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| WeatherError::RequestError(e.without_url().to_string()))?;

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: impl Into<String>) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    async fn fetch_current(&self, city: &str) -> Result<ProviderPayload, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        debug!(%url, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::from_status(status.as_u16(), error_detail(&body)));
        }

        // Error bodies carry only `cod` and `message`, so check the status first.
        let envelope: OwEnvelope = serde_json::from_str(&body).map_err(parse_error)?;
        if envelope.cod != SUCCESS_COD {
            let detail = envelope
                .message
                .unwrap_or_else(|| format!("provider reported status {}", envelope.cod));
            return Err(WeatherError::from_status(envelope.cod, detail));
        }

        serde_json::from_str(&body).map_err(parse_error)
    }
}

/// Status fields present on every OpenWeather response, success or not.
#[derive(Debug, Deserialize)]
struct OwEnvelope {
    #[serde(deserialize_with = "status_code")]
    cod: u16,
    message: Option<String>,
}

/// Error body OpenWeather sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(provider = "openweather"))]
    async fn fetch(&self, city: &str) -> Result<ProviderPayload, WeatherError> {
        let result = self.fetch_current(city).await;
        if let Err(err) = &result {
            debug!(
                kind = err.kind(),
                provider_status = err.is_provider_status(),
                error = %err,
                "weather lookup failed"
            );
        }
        result
    }
}

fn parse_error(err: serde_json::Error) -> WeatherError {
    WeatherError::RequestError(format!("Failed to parse OpenWeather response: {err}"))
}

fn error_detail(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_trims_trailing_slash() {
        let provider = OpenWeatherProvider::builder("KEY")
            .base_url("http://localhost:1234/data/2.5/")
            .build()
            .unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234/data/2.5");
    }

    #[test]
    fn envelope_reads_error_shaped_body() {
        let envelope: OwEnvelope =
            serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();
        assert_eq!(envelope.cod, 404);
        assert_eq!(envelope.message.as_deref(), Some("city not found"));
    }

    #[test]
    fn error_detail_prefers_provider_message() {
        let body = r#"{"cod":"429","message":"rate limit exceeded"}"#;
        assert_eq!(error_detail(body), "rate limit exceeded");
    }

    #[test]
    fn error_detail_falls_back_to_truncated_body() {
        let body = "x".repeat(500);
        let detail = error_detail(&body);
        assert!(detail.ends_with("..."));
        assert_eq!(detail.chars().count(), 203);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert!(truncated.starts_with('é'));
    }
}
