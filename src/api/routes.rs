use axum::{middleware, routing::get, Router};

use crate::config::HostEnvironment;
use crate::observability::trace_http_requests;
use crate::storage::DbPool;

use super::{
    docs,
    handlers::{health_handler, readiness_handler, weather_forecast_handler},
};

#[derive(Clone)]
pub struct ApiState {
    pub environment: HostEnvironment,
    pub pool: DbPool,
}

impl ApiState {
    pub fn new(environment: HostEnvironment, pool: DbPool) -> Self {
        Self { environment, pool }
    }
}

pub fn build_router(state: ApiState) -> Router {
    let expose_docs = state.environment.is_development();

    let router = Router::new()
        .route("/weatherforecast", get(weather_forecast_handler))
        .route("/health", get(health_handler))
        .route("/health/ready", get(readiness_handler))
        .with_state(state);

    // API documentation is only served in Development
    let router = if expose_docs { router.merge(docs::docs_router()) } else { router };

    router.layer(middleware::from_fn(trace_http_requests))
}
