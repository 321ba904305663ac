use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use risk_profiler::error::AppError;
use risk_profiler::questionnaire::catalog::builtin;
use risk_profiler::questionnaire::rating::derive_rating;
use risk_profiler::questionnaire::{AnswerSelection, QuestionView};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Wire shape of a generation request, matching the original gateway
/// contract field for field.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateReportBody {
    #[serde(rename = "RiskRating")]
    pub(crate) risk_rating: String,
    #[serde(rename = "RiskAnswers")]
    pub(crate) risk_answers: Vec<AnswerSelection>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateReportResponse {
    pub(crate) url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RatingResponse {
    pub(crate) rating: u8,
}

pub(crate) fn router() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/questions", axum::routing::get(questions_endpoint))
        .route("/api/v1/rating", axum::routing::post(rating_endpoint))
        .route("/api/v1/report", axum::routing::post(report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
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
        json!({ "status": "ready" })
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

pub(crate) async fn questions_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<QuestionView>>, AppError> {
    let questions = state.catalog.questions().await?;
    Ok(Json(questions))
}

/// Derives a rating from the built-in catalog. Provider-sourced
/// questionnaires carry no local weights and are scored upstream, so this
/// endpoint always evaluates against the built-in question set regardless
/// of the configured catalog source.
pub(crate) async fn rating_endpoint(
    Json(selections): Json<Vec<AnswerSelection>>,
) -> Result<Json<RatingResponse>, AppError> {
    let rating = derive_rating(builtin(), &selections)?;
    Ok(Json(RatingResponse {
        rating: rating.value(),
    }))
}

pub(crate) async fn report_endpoint(
    Extension(state): Extension<AppState>,
    Json(body): Json<GenerateReportBody>,
) -> Result<Json<GenerateReportResponse>, AppError> {
    let report = state
        .generator
        .generate(risk_profiler::report::GenerateReportRequest {
            risk_rating: body.risk_rating,
            answers: body.risk_answers,
            display_date: None,
        })
        .await?;

    Ok(Json(GenerateReportResponse { url: report.url }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{CatalogHandle, InMemoryDocumentStore};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use axum_prometheus::PrometheusMetricLayer;
    use risk_profiler::questionnaire::catalog::fixtures;
    use risk_profiler::questionnaire::catalog_views;
    use risk_profiler::report::renderer::{PdfRenderer, RenderError};
    use risk_profiler::report::ReportGenerator;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    struct FakeRenderer;

    #[async_trait]
    impl PdfRenderer for FakeRenderer {
        async fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
            Ok(b"%PDF-1.7 fake".to_vec())
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl PdfRenderer for FailingRenderer {
        async fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Timeout(Duration::from_secs(300)))
        }
    }

    /// The Prometheus recorder is process-global and panics if installed
    /// twice, so all tests share a single handle.
    fn shared_metrics_handle() -> Arc<metrics_exporter_prometheus::PrometheusHandle> {
        static HANDLE: std::sync::OnceLock<Arc<metrics_exporter_prometheus::PrometheusHandle>> =
            std::sync::OnceLock::new();
        HANDLE
            .get_or_init(|| {
                let (_prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
                Arc::new(prometheus_handle)
            })
            .clone()
    }

    fn test_app(renderer: Arc<dyn PdfRenderer>) -> (axum::Router, InMemoryDocumentStore) {
        let store = InMemoryDocumentStore::default();
        let generator = Arc::new(ReportGenerator::new(
            renderer,
            Arc::new(store.clone()),
            catalog_views(builtin()),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: shared_metrics_handle(),
            catalog: CatalogHandle::Builtin,
            generator,
        };
        (router().layer(Extension(state)), store)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    fn post_json(uri: &str, payload: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let (app, _store) = test_app(Arc::new(FakeRenderer));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).expect("request builds"))
            .await
            .expect("handler responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn questions_endpoint_serves_the_builtin_catalog() {
        let (app, _store) = test_app(Arc::new(FakeRenderer));
        let response = app
            .oneshot(
                Request::get("/api/v1/questions")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("handler responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let questions = body.as_array().expect("catalog is a list");
        assert_eq!(questions.len(), 13);
        assert_eq!(questions[0]["id"], "1");
        assert!(questions[0]["answers"][0]["id"].is_string());
    }

    #[tokio::test]
    async fn rating_endpoint_derives_from_selections() {
        let (app, _store) = test_app(Arc::new(FakeRenderer));
        let payload = serde_json::to_value(fixtures::medium_risk_answers())
            .expect("selections serialize");
        let response = app
            .oneshot(post_json("/api/v1/rating", &payload))
            .await
            .expect("handler responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "rating": 3 }));
    }

    #[tokio::test]
    async fn rating_endpoint_rejects_incomplete_selections() {
        let (app, _store) = test_app(Arc::new(FakeRenderer));
        let mut selections = fixtures::medium_risk_answers();
        selections.retain(|s| s.question_id != 8);
        let payload = serde_json::to_value(selections).expect("selections serialize");

        let response = app
            .oneshot(post_json("/api/v1/rating", &payload))
            .await
            .expect("handler responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        let message = body["error"].as_str().expect("error message present");
        assert!(message.contains("question 8"));
    }

    #[tokio::test]
    async fn report_endpoint_returns_a_retrieval_url() {
        let (app, store) = test_app(Arc::new(FakeRenderer));
        let payload = json!({
            "RiskRating": "3",
            "RiskAnswers": fixtures::medium_risk_answers(),
        });

        let response = app
            .oneshot(post_json("/api/v1/report", &payload))
            .await
            .expect("handler responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let url = body["url"].as_str().expect("url present");
        assert!(url.starts_with("memory://reports/"));
        assert!(url.ends_with(".pdf"));

        let objects = store.objects();
        assert_eq!(objects.len(), 2);
        assert!(objects.keys().any(|key| key.ends_with("_debug.html")));
        let pdf = objects
            .iter()
            .find(|(key, _)| key.ends_with(".pdf"))
            .map(|(_, object)| object)
            .expect("pdf stored");
        assert_eq!(pdf.content_type, "application/pdf");
        assert_eq!(pdf.bytes, b"%PDF-1.7 fake".to_vec());
    }

    #[tokio::test]
    async fn report_endpoint_masks_internal_faults() {
        let (app, _store) = test_app(Arc::new(FailingRenderer));
        let payload = json!({
            "RiskRating": "3",
            "RiskAnswers": fixtures::medium_risk_answers(),
        });

        let response = app
            .oneshot(post_json("/api/v1/report", &payload))
            .await
            .expect("handler responds");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Unable to generate PDF. Please try again later." })
        );
    }
}
