//! Configuration for the DocBot service
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. The binary applies command-line flags last.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocbotConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Answer generation configuration
    pub llm: LlmConfig,
    /// Upload and registry limits
    pub limits: LimitsConfig,
}

impl DocbotConfig {
    /// Load configuration from a TOML file. Missing fields keep their defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML config: {}", e)))
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_lookup(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("DOCBOT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("DOCBOT_PORT") {
            self.server.port = parse_value("DOCBOT_PORT", &port)?;
        }
        if let Some(cors) = get("DOCBOT_ENABLE_CORS") {
            self.server.enable_cors = parse_value("DOCBOT_ENABLE_CORS", &cors)?;
        }

        if let Some(provider) = get("LLM_PROVIDER") {
            self.llm.provider = parse_value("LLM_PROVIDER", &provider)?;
        }
        if let Some(model) = get("LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(base_url) = get("LLM_BASE_URL") {
            self.llm.base_url = Some(base_url);
        }
        if let Some(timeout) = get("LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_value("LLM_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.openai_api_key = Some(key);
        }
        if let Some(key) = get("ANTHROPIC_API_KEY") {
            self.llm.anthropic_api_key = Some(key);
        }

        if let Some(mb) = get("MAX_UPLOAD_SIZE_MB") {
            self.limits.max_upload_size_mb = parse_value("MAX_UPLOAD_SIZE_MB", &mb)?;
        }
        if let Some(count) = get("MAX_DOCUMENTS") {
            self.limits.max_documents = parse_value("MAX_DOCUMENTS", &count)?;
        }
        if let Some(policy) = get("DOCUMENT_REFERENCE_POLICY") {
            self.limits.reference_policy = parse_value("DOCUMENT_REFERENCE_POLICY", &policy)?;
        }

        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_upload_size_mb == 0 {
            return Err(Error::Config("max_upload_size_mb must be at least 1".to_string()));
        }
        if self.limits.max_documents == 0 {
            return Err(Error::Config("max_documents must be at least 1".to_string()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: '{}' ({})", key, raw, e)))
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable permissive CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Which answer-generation backend serves chat and query requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Deterministic local reply, no model involved
    #[default]
    Placeholder,
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible chat completions API
    OpenAi,
    /// Anthropic messages API
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Ollama => "phi3",
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    /// Base URL used when none is configured
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Placeholder => "",
            Self::Ollama => "http://localhost:11434",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "placeholder" | "none" => Ok(Self::Placeholder),
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Answer generation configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider selector
    pub provider: ProviderKind,
    /// Model name (provider default when unset)
    pub model: Option<String>,
    /// API base URL (provider default when unset)
    pub base_url: Option<String>,
    /// OpenAI API key
    pub openai_api_key: Option<String>,
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate (Anthropic requires it)
    pub max_tokens: u32,
    /// Upper bound for one generation call in seconds
    pub timeout_secs: u64,
    /// Longest document excerpt placed in a prompt, in characters
    pub max_excerpt_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Placeholder,
            model: None,
            base_url: None,
            openai_api_key: None,
            anthropic_api_key: None,
            temperature: 0.3,
            max_tokens: 1024,
            timeout_secs: 60,
            max_excerpt_chars: 4000,
        }
    }
}

impl LlmConfig {
    /// Effective model name
    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Effective base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    /// API key for the selected provider, if it needs one
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::OpenAi => self.openai_api_key.as_deref(),
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderKind::Placeholder | ProviderKind::Ollama => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_excerpt_chars", &self.max_excerpt_chars)
            .finish()
    }
}

/// How chat requests treat document names that are not in the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Drop unknown names, report only how many resolved
    #[default]
    Lenient,
    /// Reject the request, listing every unknown name
    Strict,
}

impl FromStr for ReferencePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown reference policy '{}'", other)),
        }
    }
}

/// Upload and registry limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum size of a single upload in megabytes
    pub max_upload_size_mb: u64,
    /// Maximum number of documents held at once
    pub max_documents: usize,
    /// Unknown document reference handling
    pub reference_policy: ReferencePolicy,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: 10,
            max_documents: 100,
            reference_policy: ReferencePolicy::Lenient,
        }
    }
}

impl LimitsConfig {
    /// Upload limit in bytes
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_size_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}
