use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    pub http: HttpConfig,

    /// Summarization settings
    pub summary: SummaryConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// Accept-Language header, which steers the caption track list
    pub accept_language: String,

    /// Overall timeout per request in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Messages API endpoint
    pub endpoint: String,

    /// Default model used when none is given on the command line
    pub model: String,

    /// Maximum tokens in the generated summary
    pub max_tokens: u32,

    /// Transcript characters sent to the model
    pub max_transcript_chars: usize,

    /// Timeout for a summary request in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory files are written to when `--output-dir` is not given
    pub output_dir: Option<PathBuf>,

    /// Default output format
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                user_agent: DEFAULT_USER_AGENT.to_string(),
                accept_language: "en-US".to_string(),
                timeout_secs: Some(30),
            },
            summary: SummaryConfig {
                endpoint: "https://api.anthropic.com/v1/messages".to_string(),
                model: "claude-haiku-4-5-20251001".to_string(),
                max_tokens: 4096,
                max_transcript_chars: 100_000,
                timeout_secs: 120,
            },
            app: AppConfig {
                output_dir: None,
                default_output_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Read and validate a configuration file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-transcript").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            anyhow::bail!("HTTP user agent must not be empty");
        }

        url::Url::parse(&self.summary.endpoint)
            .with_context(|| format!("Invalid summary endpoint: {}", self.summary.endpoint))?;

        if self.summary.max_tokens == 0 {
            anyhow::bail!("summary.max_tokens must be greater than zero");
        }

        if self.summary.max_transcript_chars == 0 {
            anyhow::bail!("summary.max_transcript_chars must be greater than zero");
        }

        self.default_format()?;

        Ok(())
    }

    /// Output format used when `--format` is not given
    pub fn default_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.app.default_output_format, true)
            .map_err(|e| anyhow::anyhow!("Invalid default output format: {}", e))
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  User Agent: {}", self.http.user_agent);
        println!("  Accept-Language: {}", self.http.accept_language);
        match self.http.timeout_secs {
            Some(secs) => println!("  Request Timeout: {}s", secs),
            None => println!("  Request Timeout: none"),
        }
        println!("  Summary Model: {}", self.summary.model);
        println!("  Summary Endpoint: {}", self.summary.endpoint);
        println!("  Max Transcript Chars: {}", self.summary.max_transcript_chars);
        if let Some(dir) = &self.app.output_dir {
            println!("  Output Directory: {}", dir.display());
        }
        println!("  Default Format: {}", self.app.default_output_format);
    }
}
