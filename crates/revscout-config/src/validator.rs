//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_provider(config, &mut result);
        Self::validate_crawl(config, &mut result);
        Self::validate_browser(config, &mut result);

        result
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        if config.provider.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "provider.api_key",
                "API key is not set; set OPENAI_API_KEY or provider.api_key",
            ));
        }

        if config.provider.model.trim().is_empty() {
            result.add_error(ValidationError::new(
                "provider.model",
                "Model cannot be empty",
            ));
        }

        if let Some(ref url) = config.provider.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "provider.base_url",
                    "base_url must start with http:// or https://",
                ));
            }
        }
    }

    fn validate_crawl(config: &Config, result: &mut ValidationResult) {
        let crawl = &config.crawl;

        if crawl.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "crawl.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }

        if crawl.markup_sample_chars == 0 {
            result.add_error(ValidationError::new(
                "crawl.markup_sample_chars",
                "markup_sample_chars must be greater than 0",
            ));
        } else if crawl.markup_sample_chars > 50_000 {
            result.add_warning(ValidationWarning::new(
                "crawl.markup_sample_chars",
                "markup sample is very large (>50000 chars) and may exceed the model context",
            ));
        }

        if crawl.network_idle_ms >= crawl.timeout_seconds.saturating_mul(1000) {
            result.add_error(ValidationError::new(
                "crawl.network_idle_ms",
                "network_idle_ms must be shorter than timeout_seconds",
            ));
        }

        if crawl.max_pages == Some(0) {
            result.add_error(ValidationError::new(
                "crawl.max_pages",
                "max_pages must be at least 1 when set",
            ));
        }

        if crawl.max_retries > 0 {
            result.add_warning(ValidationWarning::new(
                "crawl.max_retries",
                "max_retries is accepted but crawls perform no retries",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if let Some(ref path) = config.browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome binary does not exist: {}", path.display()),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
