use actix_web::{get, web, HttpResponse};

use crate::models::{MessageResponse, VersionsResponse};
use crate::state::AppState;

const WELCOME_MESSAGE: &str =
    "Welcome to the Minecraft Mapper API! POST a log to /submit or list versions at /versions.";

#[utoipa::path(
    get,
    path = "/",
    tag = "mapping",
    responses((status = 200, description = "Welcome message", body = MessageResponse))
)]
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// Every version with published mappings, sorted.
#[utoipa::path(
    get,
    path = "/versions",
    tag = "mapping",
    responses((status = 200, description = "Versions with published mappings", body = VersionsResponse))
)]
#[get("/versions")]
pub async fn list_versions(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(VersionsResponse {
        versions: state.registry.list_versions(),
    })
}
