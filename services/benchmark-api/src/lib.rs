// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark API service.
//!
//! Exposes the benchmark orchestrator over HTTP: submit jobs, poll their
//! progress, list and delete them, and check that the inference engine is
//! reachable.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub use config::{LogFormat, ServiceConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Assemble all routes with CORS, tracing and request metrics.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::models::routes())
        .merge(routes::benchmarks::routes())
        .route_layer(axum::middleware::from_fn(middleware::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(Arc::new(state))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("benchmark_api=info,llm_bench_engine=info,tower_http=info")
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use llm_bench_adapters::{OllamaClient, OllamaConfig};
    use llm_bench_engine::{BenchmarkOrchestrator, OrchestratorSettings};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn app_for(base_url: &str) -> Router {
        let engine = OllamaClient::new(OllamaConfig::new(base_url)).unwrap();
        let orchestrator = BenchmarkOrchestrator::new(
            Arc::new(engine.clone()),
            OrchestratorSettings::default(),
        );
        let metrics = PrometheusBuilder::new().build_recorder().handle();
        build_router(
            AppState::new(orchestrator, engine, metrics),
            &["http://localhost:3000".to_string()],
        )
    }

    async fn ollama_with(models: &[&str]) -> MockServer {
        let server = MockServer::start().await;
        let tags: Vec<Value> = models.iter().map(|m| json!({ "name": m })).collect();
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": tags })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "whatever",
                "message": { "role": "assistant", "content": "blue" },
                "done": true,
                "total_duration": 2_000_000_000u64,
                "load_duration": 100_000_000u64,
                "prompt_eval_count": 10,
                "prompt_eval_duration": 500_000_000u64,
                "eval_count": 40,
                "eval_duration": 1_000_000_000u64
            })))
            .mount(&server)
            .await;
        server
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn wait_for_terminal(app: &Router, id: &str) -> Value {
        for _ in 0..200 {
            let (status, body) = send(app, Method::GET, &format!("/benchmark/{}", id), None).await;
            assert_eq!(status, StatusCode::OK);
            if body["status"] == "completed" || body["status"] == "error" {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("benchmark {} did not finish", id);
    }

    #[tokio::test]
    async fn test_root_reports_version() {
        let app = app_for(UNREACHABLE);
        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "LLM Benchmark API");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_submit_then_poll_until_completed() {
        let server = ollama_with(&["A", "B"]).await;
        let app = app_for(&server.uri());

        let (status, body) = send(
            &app,
            Method::POST,
            "/benchmark",
            Some(json!({ "prompts": ["p1", "p2"] })),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "started");
        let id = body["benchmark_id"].as_str().unwrap().to_string();

        let job = wait_for_terminal(&app, &id).await;
        assert_eq!(job["status"], "completed");
        assert_eq!(job["progress"], 1.0);
        assert_eq!(job["benchmark_id"], id.as_str());
        assert_eq!(job["models_tested"], json!(["A", "B"]));
        assert_eq!(job["results"]["A"].as_array().unwrap().len(), 2);
        assert_eq!(job["results"]["B"].as_array().unwrap().len(), 2);
        assert_eq!(job["results"]["A"][0]["response_ts"], 40.0);

        let averages = job["averages"].as_array().unwrap();
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0]["model"], "A");
        assert_eq!(averages[0]["runs"], 2);
        assert_eq!(averages[0]["response_tokens"], 80);
    }

    #[tokio::test]
    async fn test_submit_uses_default_prompts() {
        let server = ollama_with(&["A"]).await;
        let app = app_for(&server.uri());

        let (status, body) = send(&app, Method::POST, "/benchmark", Some(json!({}))).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let id = body["benchmark_id"].as_str().unwrap().to_string();

        let job = wait_for_terminal(&app, &id).await;
        assert_eq!(job["config"]["prompts"].as_array().unwrap().len(), 2);
        assert_eq!(job["results"]["A"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_empty_prompts_is_bad_request() {
        let app = app_for(UNREACHABLE);
        let (status, body) =
            send(&app, Method::POST, "/benchmark", Some(json!({ "prompts": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");

        let (_, list) = send(&app, Method::GET, "/benchmarks", None).await;
        assert_eq!(list["total"], 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = app_for(UNREACHABLE);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/benchmark")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ prompts: "))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_engine_ends_in_error() {
        let app = app_for(UNREACHABLE);
        let (status, body) =
            send(&app, Method::POST, "/benchmark", Some(json!({ "prompts": ["p"] }))).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let id = body["benchmark_id"].as_str().unwrap().to_string();
        let job = wait_for_terminal(&app, &id).await;
        assert_eq!(job["status"], "error");
        assert!(job["error"].as_str().unwrap().contains("failed to list models"));
    }

    #[tokio::test]
    async fn test_unknown_benchmark_is_not_found() {
        let app = app_for(UNREACHABLE);
        let missing = llm_bench_core::JobId::new();

        let uri = format!("/benchmark/{}", missing);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "BENCHMARK_NOT_FOUND");
        assert_eq!(body["error"]["message"], "Benchmark not found");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/benchmark/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let server = ollama_with(&["A"]).await;
        let app = app_for(&server.uri());

        let mut ids = Vec::new();
        for _ in 0..2 {
            let (_, body) =
                send(&app, Method::POST, "/benchmark", Some(json!({ "prompts": ["p"] }))).await;
            ids.push(body["benchmark_id"].as_str().unwrap().to_string());
        }

        let (status, list) = send(&app, Method::GET, "/benchmarks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["total"], 2);

        let (status, body) =
            send(&app, Method::DELETE, &format!("/benchmark/{}", ids[0]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Benchmark deleted");

        let (_, list) = send(&app, Method::GET, "/benchmarks", None).await;
        assert_eq!(list["total"], 1);
        let kept = ids[1].clone();
        assert_eq!(list["benchmarks"], json!([kept]));

        let (status, _) = send(&app, Method::GET, &format!("/benchmark/{}", ids[0]), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_models_listing() {
        let server = ollama_with(&["llama3:8b", "mistral:7b"]).await;
        let (status, body) = send(&app_for(&server.uri()), Method::GET, "/models", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["models"], json!(["llama3:8b", "mistral:7b"]));

        let (status, body) = send(&app_for(UNREACHABLE), Method::GET, "/models", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["models"], json!([]));
    }

    #[tokio::test]
    async fn test_health_reports_engine_state() {
        let server = ollama_with(&["A", "B", "C"]).await;
        let (status, body) = send(&app_for(&server.uri()), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["ollama_connected"], true);
        assert_eq!(body["models_available"], 3);

        let (status, body) = send(&app_for(UNREACHABLE), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["ollama_connected"], false);
        assert!(body["error"].is_string());
        assert!(body.get("models_available").is_none());
    }

    #[tokio::test]
    async fn test_metrics_endpoint_is_text() {
        let app = app_for(UNREACHABLE);
        let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = app_for(UNREACHABLE);
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }
}
