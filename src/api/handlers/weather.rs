//! Demo endpoint returning a randomly generated five-day forecast

use axum::Json;
use chrono::{Days, Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of days in a forecast
pub const FORECAST_DAYS: u64 = 5;

/// Possible forecast summaries
pub const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// A single day's forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    #[schema(value_type = String, format = Date, example = "2026-01-02")]
    pub date: NaiveDate,
    #[schema(example = 21)]
    pub temperature_c: i32,
    #[schema(example = 69)]
    pub temperature_f: i32,
    #[schema(example = "Mild")]
    pub summary: String,
}

impl WeatherForecast {
    pub fn new(date: NaiveDate, temperature_c: i32, summary: impl Into<String>) -> Self {
        Self { date, temperature_c, temperature_f: to_fahrenheit(temperature_c), summary: summary.into() }
    }
}

/// Celsius to Fahrenheit, truncated toward zero.
pub fn to_fahrenheit(temperature_c: i32) -> i32 {
    32 + (f64::from(temperature_c) / 0.5556) as i32
}

/// Forecasts for the [`FORECAST_DAYS`] days after `today`.
pub fn generate_forecasts<R: Rng>(rng: &mut R, today: NaiveDate) -> Vec<WeatherForecast> {
    (1..=FORECAST_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| {
            let temperature_c = rng.gen_range(-20..55);
            let summary = SUMMARIES[rng.gen_range(0..SUMMARIES.len())];
            WeatherForecast::new(date, temperature_c, summary)
        })
        .collect()
}

/// Weather forecast endpoint
#[utoipa::path(
    get,
    path = "/weatherforecast",
    tag = "weather",
    responses(
        (status = 200, description = "Five-day forecast", body = [WeatherForecast])
    )
)]
pub async fn weather_forecast_handler() -> Json<Vec<WeatherForecast>> {
    let today = Local::now().date_naive();
    Json(generate_forecasts(&mut rand::thread_rng(), today))
}
