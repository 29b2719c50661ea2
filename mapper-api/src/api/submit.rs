use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use mapper_core::Remapper;
use tracing::{debug, info};

use crate::errors::ApiError;
use crate::middleware::RequestId;
#[allow(unused_imports)] // named only inside the utoipa::path attribute
use crate::models::MessageResponse;
use crate::models::{SubmitRequest, SubmitResponse};
use crate::rate_limit::SubmitRateLimit;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/submit",
    tag = "mapping",
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Log remapped, or echoed with a message when the version is unknown", body = SubmitResponse),
        (status = 422, description = "Log is empty or invalid", body = MessageResponse),
        (status = 429, description = "Client exceeded the submission rate", body = MessageResponse)
    )
)]
pub async fn submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    rate_limit: web::Data<SubmitRateLimit>,
    request: web::Json<SubmitRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let Some(log) = request.log() else {
        state.metrics.rejected_submissions_total.inc();
        return Err(ApiError::InvalidLog);
    };
    rate_limit.check(req.peer_addr().map(|addr| addr.ip()))?;
    state.metrics.submissions_total.inc();

    let version = request.version.as_deref().unwrap_or_default();
    let Some(remapper) = Remapper::for_version(&state.registry, version) else {
        state.metrics.unknown_version_total.inc();
        debug!(version, "No mappings for submitted version");
        return Ok(HttpResponse::Ok().json(SubmitResponse {
            log: log.to_string(),
            message: Some(format!("Failed to find version information for {version}")),
        }));
    };

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let remapped = remapper.remap_counted(log);
    state
        .metrics
        .substitutions_total
        .inc_by(remapped.substitutions as u64);
    info!(
        request_id = %request_id,
        version,
        bytes = log.len(),
        substitutions = remapped.substitutions,
        "Remapped submitted log"
    );

    Ok(HttpResponse::Ok().json(SubmitResponse {
        log: remapped.text,
        message: None,
    }))
}
