use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse, HttpServer,
};
use std::time::Duration;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;

use crate::errors::json_error_handler;
use crate::middleware::RequestIdMiddleware;
use crate::rate_limit::SubmitRateLimit;
use crate::state::AppState;

pub mod monitoring;
pub mod openapi;
pub mod submit;
pub mod versions;

use self::openapi::ApiDoc;

/// Largest accepted submission body.
pub const MAX_SUBMISSION_BYTES: usize = 8 * 1024 * 1024;

/// Floor for how often expired rate-limit windows are dropped.
const MIN_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

pub fn create_app(
    state: AppState,
    rate_limit: SubmitRateLimit,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(MAX_SUBMISSION_BYTES)
        .error_handler(json_error_handler);

    App::new()
        .wrap(Cors::permissive())
        .wrap(RequestIdMiddleware)
        .wrap(TracingLogger::default())
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(rate_limit))
        .service(versions::index)
        .service(versions::list_versions)
        .service(
            web::resource("/submit")
                .app_data(json_config)
                .route(web::post().to(submit::submit)),
        )
        .service(monitoring::metrics)
        .service(monitoring::health)
        .route("/api-docs/openapi.json", web::get().to(openapi_json))
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

pub async fn start_server(
    bind_address: &str,
    state: AppState,
    submit_window: Duration,
) -> std::io::Result<()> {
    // Built once so every worker shares the same per-client windows.
    let rate_limit = SubmitRateLimit::new(submit_window);
    let _pruner = rate_limit.spawn_pruner(submit_window.max(MIN_PRUNE_INTERVAL));
    HttpServer::new(move || create_app(state.clone(), rate_limit.clone()))
        .bind(bind_address)?
        .run()
        .await
}
