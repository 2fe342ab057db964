use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the lookup history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: i64,
    pub location: String,
    pub temperature: f64,
    pub description: String,
    pub timestamp: String,
}

/// The fields of an OpenWeather current-weather response this crate reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderPayload {
    #[serde(deserialize_with = "status_code")]
    pub cod: u16,
    pub main: PayloadMain,
    pub weather: Vec<PayloadCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadMain {
    /// Kelvin.
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadCondition {
    pub id: i64,
    pub description: String,
}

/// Payload reduced to what gets displayed and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedWeather {
    pub celsius: f64,
    pub description: String,
    pub condition_id: i64,
}

/// Outcome of a successful fetch-and-record cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub id: i64,
    pub location: String,
    pub celsius: f64,
    pub description: String,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub records: usize,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

/// OpenWeather sends `cod` as a number on success and as a string on errors.
pub(crate) fn status_code<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cod {
        Number(u16),
        Text(String),
    }

    match Cod::deserialize(deserializer)? {
        Cod::Number(n) => Ok(n),
        Cod::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
