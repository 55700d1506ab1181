use crate::infra::AppState;
use crate::render::{render_page, PageResult};
use crate::views::{submission_from_json, PredictionView};
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Json, Router};
use placement_advisor::error::AppError;
use placement_advisor::placement::{PlacementPipeline, RawSubmission};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;

/// Router exposing the applicant form and the JSON prediction endpoint.
pub(crate) fn placement_router(pipeline: PlacementPipeline) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/predict", post(predict_form))
        .route("/api/v1/predict", post(predict_json))
        .with_state(pipeline)
}

pub(crate) fn with_placement_routes(pipeline: PlacementPipeline) -> Router {
    placement_router(pipeline)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "model": state.model.kind })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn form_page() -> Html<String> {
    Html(render_page(None, PageResult::Empty))
}

pub(crate) async fn predict_form(
    State(pipeline): State<PlacementPipeline>,
    form: Result<Form<RawSubmission>, FormRejection>,
) -> Response {
    // Unreadable posts are treated as an empty form.
    let raw = match form {
        Ok(Form(raw)) => raw,
        Err(rejection) => {
            warn!(
                status = %rejection.status(),
                error = %rejection.body_text(),
                "form body rejected"
            );
            RawSubmission::new()
        }
    };

    match pipeline.evaluate(&raw) {
        Ok(assessment) => {
            let page = render_page(Some(&raw), PageResult::Assessment(&assessment));
            (StatusCode::OK, Html(page)).into_response()
        }
        Err(err) => {
            let err = AppError::from(err);
            let message = err.to_string();
            let page = render_page(Some(&raw), PageResult::Message(&message));
            (err.status(), Html(page)).into_response()
        }
    }
}

pub(crate) async fn predict_json(
    State(pipeline): State<PlacementPipeline>,
    payload: Result<Json<HashMap<String, Value>>, JsonRejection>,
) -> Result<Json<PredictionView>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(
            status = %rejection.status(),
            error = %rejection.body_text(),
            "json body rejected"
        );
        AppError::from(rejection)
    })?;
    let raw = submission_from_json(payload);
    let assessment = pipeline.evaluate(&raw)?;
    Ok(Json(PredictionView::from_assessment(assessment)))
}
