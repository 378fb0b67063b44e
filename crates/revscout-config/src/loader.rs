//! Configuration loader.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Default file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "revscout.toml";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        if let Some(dir) = config.browser.profile_dir.take() {
            config.browser.profile_dir = Some(Self::expand_path(&dir.to_string_lossy()).into());
        }
        Ok(config)
    }

    /// Load an explicit file, or `revscout.toml` if present, or defaults.
    ///
    /// Environment overrides are applied in every case.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No config file, using defaults");
                Config::default()
            }
        };
        Self::apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Override settings from the process environment.
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |name| std::env::var(name).ok())
    }

    /// Override settings from an arbitrary variable source.
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("OPENAI_API_KEY") {
            config.provider.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            config.provider.base_url = Some(url);
        }
        if let Some(model) = lookup("REVSCOUT_MODEL") {
            config.provider.model = model;
        }
        if let Some(value) = lookup("REVSCOUT_TIMEOUT") {
            config.crawl.timeout_seconds = parse_number("REVSCOUT_TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("REVSCOUT_MAX_RETRIES") {
            config.crawl.max_retries = parse_number("REVSCOUT_MAX_RETRIES", &value)?;
        }
        if let Some(value) = lookup("REVSCOUT_MAX_PAGES") {
            config.crawl.max_pages = Some(parse_number("REVSCOUT_MAX_PAGES", &value)?);
        }
        Ok(())
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_PLACEHOLDER.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.cache`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        message: format!("expected a non-negative integer, got '{}'", value),
    })
}
