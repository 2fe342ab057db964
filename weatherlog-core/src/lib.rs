//! Core library for the `weatherlog` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather fetcher and payload classification
//! - The SQLite lookup history and its JSON/CSV export
//!
//! It is used by `weatherlog-cli`, but any other front-end can drive
//! [`WeatherService`] the same way.

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;

pub use classify::{emoji_for, normalize};
pub use config::Config;
pub use error::WeatherError;
pub use model::{ExportSummary, NormalizedWeather, ProviderPayload, WeatherRecord, WeatherReport};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use service::WeatherService;
pub use store::WeatherStore;
