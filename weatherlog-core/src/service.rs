//! Fetch-and-record: the one operation that spans provider and store.

use tracing::info;

use crate::{
    classify::{emoji_for, normalize},
    error::Result,
    model::WeatherReport,
    provider::WeatherProvider,
    store::WeatherStore,
};

#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    store: WeatherStore,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, store: WeatherStore) -> Self {
        Self { provider, store }
    }

    pub fn store(&self) -> &WeatherStore {
        &self.store
    }

    /// Look up `city`, store the result and return what should be displayed.
    ///
    /// Nothing is stored when the lookup fails.
    pub async fn fetch_and_record(&self, city: &str) -> Result<WeatherReport> {
        let payload = self.provider.fetch(city).await?;
        let weather = normalize(&payload)?;

        let id = self
            .store
            .insert(city, weather.celsius, &weather.description)?;
        info!(id, city, condition = weather.condition_id, "weather recorded");

        Ok(WeatherReport {
            id,
            location: city.to_string(),
            celsius: weather.celsius,
            emoji: emoji_for(weather.condition_id),
            description: weather.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        WeatherError,
        model::{PayloadCondition, PayloadMain, ProviderPayload},
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct CannedProvider(fn() -> Result<ProviderPayload>);

    #[async_trait]
    impl WeatherProvider for CannedProvider {
        async fn fetch(&self, _city: &str) -> Result<ProviderPayload> {
            (self.0)()
        }
    }

    fn service(provider: CannedProvider) -> (tempfile::TempDir, WeatherService) {
        let dir = tempfile::tempdir().unwrap();
        let store = WeatherStore::open(dir.path().join("weather_app.db")).unwrap();
        (dir, WeatherService::new(Box::new(provider), store))
    }

    #[tokio::test]
    async fn records_thunderstorm_lookup() {
        let (_dir, svc) = service(CannedProvider(|| {
            Ok(ProviderPayload {
                cod: 200,
                main: PayloadMain { temp: 300.0 },
                weather: vec![PayloadCondition {
                    id: 211,
                    description: "thunderstorm".into(),
                }],
            })
        }));

        let report = svc.fetch_and_record("Miami").await.unwrap();
        assert_eq!(report.emoji, "⛈️");
        assert!((report.celsius - 26.85).abs() < 1e-9);
        assert_eq!(svc.store().list_recent(1).unwrap()[0].temperature, 26.85);
    }

    #[tokio::test]
    async fn provider_failure_records_nothing() {
        let (_dir, svc) = service(CannedProvider(|| Err(WeatherError::Network)));

        let err = svc.fetch_and_record("Berlin").await.unwrap_err();
        assert!(matches!(err, WeatherError::Network));
        assert_eq!(svc.store().count().unwrap(), 0);
    }

    #[tokio::test]
    async fn payload_without_conditions_records_nothing() {
        let (_dir, svc) = service(CannedProvider(|| {
            Ok(ProviderPayload {
                cod: 200,
                main: PayloadMain { temp: 280.0 },
                weather: vec![],
            })
        }));

        assert!(svc.fetch_and_record("Nowhere").await.is_err());
        assert_eq!(svc.store().count().unwrap(), 0);
    }
}
