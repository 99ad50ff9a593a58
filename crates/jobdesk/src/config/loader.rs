use std::path::Path;

use crate::config::schema::{Config, StorageConfig};
use crate::error::ConfigError;

pub const SUPPORTED_VERSION: &str = "1.0";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != SUPPORTED_VERSION {
        return Err(invalid(format!(
            "Unsupported config version: {}",
            config.version
        )));
    }

    match &config.storage {
        StorageConfig::Local { base_path } if base_path.trim().is_empty() => {
            return Err(invalid("storage.basePath must not be empty"));
        }
        StorageConfig::S3 { bucket, .. } if bucket.trim().is_empty() => {
            return Err(invalid("storage.bucket must not be empty"));
        }
        _ => {}
    }

    if config.ingest.operation_timeout_secs == 0 {
        return Err(invalid("ingest.operationTimeoutSecs must be greater than 0"));
    }
    if let Some(pos) = config
        .ingest
        .allowed_mime_types
        .iter()
        .position(|m| m.trim().is_empty())
    {
        return Err(invalid(format!(
            "ingest.allowedMimeTypes[{}] must not be empty",
            pos
        )));
    }

    if matches!(&config.ocr.endpoint, Some(e) if e.trim().is_empty()) {
        return Err(invalid("ocr.endpoint must not be empty when set"));
    }

    let broadcast = &config.broadcast;
    if broadcast.channel.trim().is_empty() {
        return Err(invalid("broadcast.channel must not be empty"));
    }
    if broadcast.records_path.trim().is_empty() {
        return Err(invalid("broadcast.recordsPath must not be empty"));
    }
    if broadcast.telegram.token_env_var.trim().is_empty() {
        return Err(invalid("broadcast.telegram.tokenEnvVar must not be empty"));
    }

    Ok(())
}
