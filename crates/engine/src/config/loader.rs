use std::path::{Path, PathBuf};

use trustrag_common::config::SystemConfig;

use super::validation;

/// Complete engine configuration loaded from the config directory.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Parsed system.toml.
    pub system: SystemConfig,
    /// Base config directory path (used for future config reload).
    #[allow(dead_code)]
    pub config_dir: PathBuf,
}

/// Load all configuration from the given config directory.
///
/// Fails loudly with clear error messages if anything is misconfigured.
/// The engine refuses to start on validation failure.
pub fn load_config(config_dir: &Path) -> Result<EngineConfig, ConfigError> {
    tracing::info!(config_dir = %config_dir.display(), "Loading configuration");

    let system_path = config_dir.join("system.toml");
    let system = load_system_config(&system_path)?;

    let config = EngineConfig {
        system,
        config_dir: config_dir.to_path_buf(),
    };

    validation::validate(&config)?;

    tracing::info!("Configuration loaded successfully");

    Ok(config)
}

fn load_system_config(path: &Path) -> Result<SystemConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_TOML: &str = r#"
        [embeddings]
        provider = "openai"
        model = "text-embedding-3-small"
        dimensions = 384
        batch_size = 64
        timeout_ms = 30000

        [detection]
        similarity_threshold = 0.5

        [retry.embedding_api]
        max_attempts = 3
        initial_backoff_ms = 500
        max_backoff_ms = 8000
        backoff_multiplier = 2.0
        jitter = true

        [limits]
        max_chunks_per_request = 50
        max_answer_chars = 20000
    "#;

    fn write_config(dir: &Path, toml: &str) {
        std::fs::write(dir.join("system.toml"), toml).expect("write system.toml");
    }

    #[test]
    fn loads_valid_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_config(dir.path(), VALID_TOML);

        let config = load_config(dir.path()).expect("load");
        assert_eq!(config.system.embeddings.dimensions, 384);
        assert_eq!(config.system.detection.similarity_threshold, 0.5);
        assert_eq!(config.system.limits.max_chunks_per_request, 50);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(dir.path()).expect_err("should fail");
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_config(dir.path(), "[embeddings\nprovider =");
        let err = load_config(dir.path()).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_config(
            dir.path(),
            &VALID_TOML.replace("similarity_threshold = 0.5", "similarity_threshold = 1.5"),
        );
        let err = load_config(dir.path()).expect_err("should fail");
        match err {
            ConfigError::Validation(msg) => assert!(msg.contains("similarity_threshold")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
