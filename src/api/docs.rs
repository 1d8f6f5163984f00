use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Path of the generated OpenAPI document
pub const OPENAPI_PATH: &str = "/openapi/v1.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "stratus", description = "Stratus demo service"),
    paths(
        crate::api::handlers::weather::weather_forecast_handler,
        crate::api::handlers::health::health_handler,
        crate::api::handlers::health::readiness_handler
    ),
    components(
        schemas(
            crate::api::handlers::weather::WeatherForecast,
            crate::api::handlers::health::HealthResponse
        )
    ),
    tags(
        (name = "weather", description = "Demo weather forecast"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

pub fn docs_router() -> Router {
    SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()).into()
}
