use utoipa::OpenApi;

use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::versions::index,
        crate::api::versions::list_versions,
        crate::api::submit::submit,
        crate::api::monitoring::metrics,
        crate::api::monitoring::health
    ),
    components(
        schemas(
            SubmitRequest,
            SubmitResponse,
            VersionsResponse,
            MessageResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "mapping", description = "Log remapping operations"),
        (name = "monitoring", description = "Health and metrics")
    ),
    info(
        title = "Minecraft Mapper API",
        version = "0.1.0",
        description = "Translates intermediary names in Minecraft logs into Yarn names",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
