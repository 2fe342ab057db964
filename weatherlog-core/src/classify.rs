//! Turns raw provider payloads into displayable weather.

use crate::{
    WeatherError,
    error::Result,
    model::{NormalizedWeather, ProviderPayload},
};

const KELVIN_OFFSET: f64 = 273.15;

/// Convert a provider payload to Celsius plus the first reported condition.
pub fn normalize(payload: &ProviderPayload) -> Result<NormalizedWeather> {
    let condition = payload.weather.first().ok_or_else(|| {
        WeatherError::RequestError("provider response contained no weather conditions".into())
    })?;

    Ok(NormalizedWeather {
        celsius: kelvin_to_celsius(payload.main.temp),
        description: condition.description.clone(),
        condition_id: condition.id,
    })
}

fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Glyph for an OpenWeather condition code; empty when the code is unmapped.
pub fn emoji_for(condition_id: i64) -> &'static str {
    match condition_id {
        200..=232 => "⛈️",
        300..=321 => "⛅",
        500..=531 => "☔",
        600..=622 => "🌨️",
        701..=741 => "🌫️",
        762 => "🌋",
        771 => "💨",
        781 => "🌪️",
        800 => "☀️",
        801..=804 => "☁️",
        _ => "",
    }
}
