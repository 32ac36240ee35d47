use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Deserialize;
use uuid::Uuid;

use trustrag_common::config::RequestLimits;
use trustrag_common::types::SourceChunk;
use trustrag_common::{ChunkId, DocumentId, TrustRagError};
use trustrag_engine::config;
use trustrag_engine::embeddings::EmbeddingClient;
use trustrag_engine::pipeline::{EvaluationRequest, TrustPipeline};

/// Shared application state accessible from axum handlers.
struct AppState {
    /// None when no embedding API key is configured — evaluation requests
    /// are rejected with 503 until one is provided.
    pipeline: Option<TrustPipeline>,
    limits: RequestLimits,
    metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("TrustRAG Engine starting");

    // Load configuration — fail loudly on misconfiguration.
    let config_dir = std::env::var("TRUSTRAG_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let engine_config = match config::load_config(&config_dir) {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration — refusing to start");
            std::process::exit(1);
        }
    };

    // Install Prometheus metrics recorder.
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // Embedding client (optional — gracefully handle missing API key).
    let pipeline = EmbeddingClient::new(
        engine_config.system.embeddings.clone(),
        engine_config.system.retry.embedding_api.clone(),
    )
    .map(|client| {
        TrustPipeline::new(
            Arc::new(client),
            engine_config.system.detection.clone(),
        )
    });

    let state = Arc::new(AppState {
        pipeline,
        limits: engine_config.system.limits.clone(),
        metrics_handle,
    });

    let app = Router::new()
        .route("/evaluate", post(evaluate_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    let port: u16 = std::env::var("ENGINE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind TCP listener");

    tracing::info!(port = port, "TrustRAG Engine listening");

    axum::serve(listener, app).await.expect("HTTP server error");
}

/// One retrieved chunk on the wire. Ids are optional — the pipeline only
/// needs stable ids within the request, so missing ones are minted here.
#[derive(Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    id: Option<Uuid>,
    text: String,
    #[serde(default)]
    origin_document: Option<Uuid>,
}

#[derive(Deserialize)]
struct EvaluatePayload {
    query: String,
    answer: String,
    #[serde(default)]
    chunks: Vec<ChunkPayload>,
}

/// Evaluate a generated answer against its retrieved context.
async fn evaluate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EvaluatePayload>,
) -> impl IntoResponse {
    let Some(pipeline) = state.pipeline.as_ref() else {
        return error_response(&TrustRagError::EmbeddingUnavailable);
    };

    if payload.chunks.len() > state.limits.max_chunks_per_request as usize {
        return error_response(&TrustRagError::Input(format!(
            "too many chunks: {} > {}",
            payload.chunks.len(),
            state.limits.max_chunks_per_request
        )));
    }
    if payload.answer.chars().count() > state.limits.max_answer_chars as usize {
        return error_response(&TrustRagError::Input(format!(
            "answer too long: limit is {} chars",
            state.limits.max_answer_chars
        )));
    }

    let chunks = payload
        .chunks
        .into_iter()
        .map(|c| SourceChunk {
            id: c.id.map(ChunkId::from_uuid).unwrap_or_default(),
            text: c.text,
            origin_document: c
                .origin_document
                .map(DocumentId::from_uuid)
                .unwrap_or_default(),
        })
        .collect();

    let request = EvaluationRequest {
        query: payload.query,
        answer: payload.answer,
        chunks,
    };

    match pipeline.evaluate(&request).await {
        Ok(result) => (StatusCode::OK, Json(serde_json::json!(result))),
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &TrustRagError) -> (StatusCode, Json<serde_json::Value>) {
    let status = if e.is_input_error() {
        StatusCode::BAD_REQUEST
    } else if matches!(e, TrustRagError::EmbeddingUnavailable) {
        StatusCode::SERVICE_UNAVAILABLE
    } else if e.is_collaborator_error() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    tracing::warn!(error = %e, status = %status, "Evaluation rejected");

    (
        status,
        Json(serde_json::json!({
            "error": e.to_string(),
        })),
    )
}

/// Health check endpoint. Reports whether the embedding client is wired.
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let embeddings_ok = state.pipeline.is_some();

    let status = if embeddings_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = serde_json::json!({
        "status": if embeddings_ok { "healthy" } else { "degraded" },
        "services": {
            "embeddings": if embeddings_ok { "configured" } else { "missing api key" },
        }
    });

    (status, Json(body))
}

/// Prometheus metrics endpoint.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
