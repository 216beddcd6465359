//! Harness configuration
//!
//! Loaded from an optional TOML file, then `DOCQA__SECTION__KEY` environment
//! overrides, then the well-known provider variables (`OPENAI_API_KEY`,
//! `GOOGLE_CLOUD_PROJECT`, ...).

use crate::error::{EvalError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Top-level configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Directory holding the `receipts/`, `trucktickets/` and `aws/` fixtures
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Local `KEY=value` file consulted for API keys
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub google: GoogleConfig,

    #[serde(default)]
    pub textract: TextractConfig,
}

fn default_data_dir() -> PathBuf { PathBuf::from(".") }
fn default_env_file() -> PathBuf { PathBuf::from(".env") }
fn default_request_timeout() -> u64 { 120 }

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            env_file: default_env_file(),
            request_timeout_secs: default_request_timeout(),
            openai: OpenAiConfig::default(),
            google: GoogleConfig::default(),
            textract: TextractConfig::default(),
        }
    }
}

/// OpenAI vision chat configuration
#[derive(Debug, Deserialize)]
pub struct OpenAiConfig {
    /// API key (falls back to `OPENAI_API_KEY` in the env file)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_openai_model")]
    pub model: String,

    #[serde(default = "default_openai_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_openai_temperature")]
    pub temperature: f32,
}

fn default_openai_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_openai_model() -> String { "gpt-4-vision-preview".to_string() }
fn default_openai_max_tokens() -> u32 { 2048 }
fn default_openai_temperature() -> f32 { 0.1 }

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            max_tokens: default_openai_max_tokens(),
            temperature: default_openai_temperature(),
        }
    }
}

/// Vertex AI generative vision configuration
#[derive(Debug, Deserialize)]
pub struct GoogleConfig {
    /// GCP project id
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default = "default_google_location")]
    pub location: String,

    #[serde(default = "default_google_model")]
    pub model: String,

    /// Override for the regional `https://{location}-aiplatform.googleapis.com` host
    #[serde(default)]
    pub endpoint: Option<String>,

    /// OAuth access token; when unset `gcloud auth print-access-token` is used
    #[serde(default)]
    pub access_token: Option<SecretString>,
}

fn default_google_location() -> String { "us-central1".to_string() }
fn default_google_model() -> String { "gemini-1.0-pro-vision".to_string() }

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            project: None,
            location: default_google_location(),
            model: default_google_model(),
            endpoint: None,
            access_token: None,
        }
    }
}

impl GoogleConfig {
    /// Base URL of the Vertex AI REST API
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }
}

/// AWS Textract configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TextractConfig {
    /// Named profile from the local AWS config
    #[serde(default = "default_textract_profile")]
    pub profile: String,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_textract_profile() -> String { "default".to_string() }

impl Default for TextractConfig {
    fn default() -> Self {
        Self {
            profile: default_textract_profile(),
            region: None,
            endpoint_url: None,
        }
    }
}

impl Config {
    /// Load configuration from an optional file plus environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("DOCQA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config.from_env())
    }

    /// Override with well-known provider environment variables if present
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = Some(SecretString::new(val));
        }

        if let Ok(val) = std::env::var("GOOGLE_CLOUD_PROJECT") {
            self.google.project = Some(val);
        }

        if let Ok(val) = std::env::var("GOOGLE_ACCESS_TOKEN") {
            self.google.access_token = Some(SecretString::new(val));
        }

        if let Ok(val) = std::env::var("AWS_PROFILE") {
            self.textract.profile = val;
        }

        if let Ok(val) = std::env::var("AWS_REGION") {
            self.textract.region = Some(val);
        }

        self
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve the OpenAI API key from config, then the env file
    pub fn openai_api_key(&self) -> Result<SecretString> {
        if let Some(key) = &self.openai.api_key {
            return Ok(SecretString::new(key.expose_secret().clone()));
        }

        load_api_key(&self.env_file, "OPENAI_API_KEY")?
            .ok_or_else(|| EvalError::MissingCredential("OPENAI_API_KEY".to_string()))
    }
}

/// Read `key` from a local `KEY=value` file.
///
/// A missing file yields `Ok(None)`.
pub fn load_api_key(env_file: &Path, key: &str) -> Result<Option<SecretString>> {
    if !env_file.exists() {
        return Ok(None);
    }

    let entries = dotenvy::from_path_iter(env_file)
        .map_err(|e| EvalError::Configuration(format!("{}: {}", env_file.display(), e)))?;

    for entry in entries {
        let (name, value) = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unparseable line in {}: {}", env_file.display(), e);
                continue;
            }
        };
        if name == key {
            return Ok(Some(SecretString::new(value.trim().to_string())));
        }
    }

    Ok(None)
}
