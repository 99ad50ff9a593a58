use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            storage: StorageConfig::default(),
            ingest: IngestConfig::default(),
            ocr: OcrConfig::default(),
            broadcast: BroadcastConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    Local {
        #[serde(rename = "basePath")]
        base_path: String,
    },
    S3 {
        bucket: String,
        #[serde(default)]
        prefix: String,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local {
            base_path: "data/blobs".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    #[serde(default)]
    pub allowed_mime_types: Vec<String>,
    #[serde(default = "default_true")]
    pub store_text: bool,
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,
    #[serde(default)]
    pub preserve_paragraphs: bool,
}

fn default_max_file_size() -> u64 {
    20 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_operation_timeout_secs() -> u64 {
    60
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            allowed_mime_types: Vec::new(),
            store_text: true,
            operation_timeout_secs: default_operation_timeout_secs(),
            preserve_paragraphs: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrConfig {
    /// HTTP OCR service. Takes precedence over local Tesseract.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_ocr_timeout_secs")]
    pub timeout_secs: u64,
    /// Local Tesseract languages; only used with the `tesseract` feature.
    #[serde(default)]
    pub languages: Option<Vec<String>>,
}

fn default_ocr_timeout_secs() -> u64 {
    30
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_ocr_timeout_secs(),
            languages: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastConfig {
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_records_path")]
    pub records_path: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub summariser: SummariserConfig,
}

fn default_channel() -> String {
    "#vacancies".to_string()
}

fn default_records_path() -> String {
    "data/broadcasts.json".to_string()
}

fn default_max_retries() -> u32 {
    3
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            records_path: default_records_path(),
            max_retries: default_max_retries(),
            dry_run: false,
            telegram: TelegramConfig::default(),
            summariser: SummariserConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Name of the environment variable holding the bot token.
    #[serde(default = "default_token_env_var")]
    pub token_env_var: String,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_token_env_var() -> String {
    "TELEGRAM_BOT_TOKEN".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env_var: default_token_env_var(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummariserConfig {
    /// Completion endpoint. Without one the deterministic summariser is used.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_summariser_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_summariser_timeout_secs() -> u64 {
    15
}

impl Default for SummariserConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_summariser_timeout_secs(),
        }
    }
}
