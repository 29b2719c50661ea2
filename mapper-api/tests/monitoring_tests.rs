mod common;

use actix_web::{http::StatusCode, test};
use common::{test_state, VERSION};
use mapper_api::api::create_app;
use mapper_api::rate_limit::SubmitRateLimit;
use mapper_api::models::HealthResponse;
use serde_json::json;

#[actix_web::test]
async fn test_health_reports_version_count() {
    let app = test::init_service(create_app(test_state(), SubmitRateLimit::disabled())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let health: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(health.status, "ok");
    assert_eq!(health.versions, 1);
}

#[actix_web::test]
async fn test_metrics_count_submissions() {
    let state = test_state();
    let metrics = state.metrics.clone();
    let app = test::init_service(create_app(state, SubmitRateLimit::disabled())).await;

    let submissions = [
        json!({ "data": "method_42 field_7", "version": VERSION }),
        json!({ "data": "class_1", "version": "0.0.1" }),
        json!({ "data": " ", "version": VERSION }),
    ];
    for body in submissions {
        let req = test::TestRequest::post()
            .uri("/submit")
            .set_json(&body)
            .to_request();
        test::call_service(&app, req).await;
    }

    assert_eq!(metrics.submissions_total.get(), 2);
    assert_eq!(metrics.unknown_version_total.get(), 1);
    assert_eq!(metrics.rejected_submissions_total.get(), 1);
    assert_eq!(metrics.substitutions_total.get(), 2);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.contains("mapper_submissions_total 2"));
    assert!(text.contains("mapper_loaded_versions 1"));
}
