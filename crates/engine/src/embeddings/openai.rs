use serde::{Deserialize, Serialize};

use trustrag_common::config::EmbeddingConfig;

use super::EmbeddingError;

const DEFAULT_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Endpoint override for OpenAI-compatible local servers.
fn embeddings_url() -> String {
    std::env::var("OPENAI_BASE_URL")
        .map(|base| format!("{}/v1/embeddings", base.trim_end_matches('/')))
        .unwrap_or_else(|_| DEFAULT_EMBEDDINGS_URL.to_string())
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: u32,
}

#[derive(Deserialize)]
struct WireResponse {
    data: Vec<WireVector>,
    usage: WireUsage,
}

#[derive(Deserialize)]
struct WireVector {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Deserialize)]
struct WireUsage {
    total_tokens: u64,
}

#[derive(Deserialize)]
struct WireError {
    error: WireErrorDetail,
}

#[derive(Deserialize)]
struct WireErrorDetail {
    message: String,
}

/// One call to an OpenAI-compatible /v1/embeddings endpoint.
pub async fn call_embeddings_api(
    http: &reqwest::Client,
    api_key: &str,
    config: &EmbeddingConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let start = std::time::Instant::now();

    let response = http
        .post(embeddings_url())
        .bearer_auth(api_key)
        .json(&WireRequest {
            model: &config.model,
            input: texts,
            dimensions: config.dimensions,
        })
        .send()
        .await
        .map_err(|e| EmbeddingError::Http(e.to_string()))?;

    let status = response.status();
    metrics::histogram!("embedding.api.latency").record(start.elapsed().as_secs_f64());

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        let body = response.text().await.unwrap_or_default();
        return Err(EmbeddingError::Auth(format!("{}: {}", status, body)));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        return Err(EmbeddingError::RateLimited { retry_after });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let msg = serde_json::from_str::<WireError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(EmbeddingError::Api(format!("{}: {}", status, msg)));
    }

    let body: WireResponse = response
        .json()
        .await
        .map_err(|e| EmbeddingError::Api(format!("Failed to parse response: {}", e)))?;

    metrics::counter!("embedding.api.tokens").increment(body.usage.total_tokens);

    // Providers may return vectors out of order; restore input order and
    // reject anything that does not match the configured width.
    let mut vectors = body.data;
    vectors.sort_by_key(|v| v.index);

    let expected = config.dimensions as usize;
    if let Some(bad) = vectors.iter().find(|v| v.embedding.len() != expected) {
        return Err(EmbeddingError::DimensionMismatch {
            expected: config.dimensions,
            got: bad.embedding.len(),
        });
    }

    Ok(vectors.into_iter().map(|v| v.embedding).collect())
}
