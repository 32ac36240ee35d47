use super::loader::{ConfigError, EngineConfig};

/// Validate the complete engine configuration.
///
/// Checks sane ranges on numeric parameters. The engine refuses to start
/// on validation failure.
pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_embeddings(config, &mut errors);
    validate_detection(config, &mut errors);
    validate_retry(config, &mut errors);
    validate_limits(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.join("; ")))
    }
}

fn validate_embeddings(config: &EngineConfig, errors: &mut Vec<String>) {
    let e = &config.system.embeddings;

    if e.provider.is_empty() {
        errors.push("embeddings.provider must not be empty".into());
    }
    if e.model.is_empty() {
        errors.push("embeddings.model must not be empty".into());
    }
    if e.dimensions == 0 {
        errors.push("embeddings.dimensions must be > 0".into());
    }
    if e.batch_size == 0 {
        errors.push("embeddings.batch_size must be > 0".into());
    }
    if e.timeout_ms == 0 {
        errors.push("embeddings.timeout_ms must be > 0".into());
    }
}

fn validate_detection(config: &EngineConfig, errors: &mut Vec<String>) {
    let d = &config.system.detection;

    if !(0.0..=1.0).contains(&d.similarity_threshold) {
        errors.push("detection.similarity_threshold must be between 0.0 and 1.0".into());
    }
}

fn validate_retry(config: &EngineConfig, errors: &mut Vec<String>) {
    let rc = &config.system.retry.embedding_api;

    if rc.max_attempts == 0 {
        errors.push("retry.embedding_api.max_attempts must be > 0".into());
    }
    if rc.initial_backoff_ms == 0 {
        errors.push("retry.embedding_api.initial_backoff_ms must be > 0".into());
    }
    if rc.max_backoff_ms < rc.initial_backoff_ms {
        errors.push("retry.embedding_api.max_backoff_ms must be >= initial_backoff_ms".into());
    }
    if rc.backoff_multiplier < 1.0 {
        errors.push("retry.embedding_api.backoff_multiplier must be >= 1.0".into());
    }
}

fn validate_limits(config: &EngineConfig, errors: &mut Vec<String>) {
    let l = &config.system.limits;

    if l.max_chunks_per_request == 0 {
        errors.push("limits.max_chunks_per_request must be > 0".into());
    }
    if l.max_answer_chars == 0 {
        errors.push("limits.max_answer_chars must be > 0".into());
    }
}
