use actix_web::{get, web, HttpResponse};

use crate::errors::ApiError;
use crate::models::HealthResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "monitoring",
    responses((status = 200, description = "Prometheus metrics", content_type = "text/plain"))
)]
#[get("/metrics")]
pub async fn metrics(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    state
        .metrics
        .loaded_versions
        .set(state.registry.len() as i64);
    let body = state.metrics.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "monitoring",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        versions: state.registry.len(),
    })
}
