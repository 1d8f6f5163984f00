//! HTTP request handlers

pub mod health;
pub mod weather;

pub use health::{health_handler, readiness_handler, HealthResponse};
pub use weather::{weather_forecast_handler, WeatherForecast};
