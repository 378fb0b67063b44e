//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Inference provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat completions endpoint for OpenAI-compatible services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: default_model(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

/// Crawl behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Upper bound for every suspension point of a crawl.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Loaded and validated, but no retry loop consults it.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Characters of page markup sent for locator inference.
    #[serde(default = "default_sample_chars")]
    pub markup_sample_chars: usize,

    /// Quiet period with no in-flight requests that counts as settled.
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            markup_sample_chars: default_sample_chars(),
            network_idle_ms: default_network_idle_ms(),
            max_pages: None,
        }
    }
}

impl CrawlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_sample_chars() -> usize {
    2000
}

fn default_network_idle_ms() -> u64 {
    500
}

/// Browser launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit Chrome binary; searched in well-known locations when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// Profile directory; a temporary one is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: default_headless(),
            chrome_path: None,
            profile_dir: None,
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_headless() -> bool {
    true
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
