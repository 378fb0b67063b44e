use super::*;
use std::path::PathBuf;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.provider.api_key = Some("sk-test".to_string());
    config.crawl.max_retries = 0;
    config
}

#[test]
fn test_validate_valid_config_has_no_findings() {
    let result = ConfigValidator::validate(&valid_config());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_default_config_warns_but_is_valid() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "provider.api_key"));
    assert!(result.warnings.iter().any(|w| w.path == "crawl.max_retries"));
}

#[test]
fn test_validate_zero_timeout() {
    let mut config = valid_config();
    config.crawl.timeout_seconds = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "crawl.timeout_seconds"));
}

#[test]
fn test_validate_idle_longer_than_timeout() {
    let mut config = valid_config();
    config.crawl.timeout_seconds = 1;
    config.crawl.network_idle_ms = 1500;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "crawl.network_idle_ms"));
}

#[test]
fn test_validate_empty_model() {
    let mut config = valid_config();
    config.provider.model = " ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "provider.model"));
}

#[test]
fn test_validate_invalid_base_url() {
    let mut config = valid_config();
    config.provider.base_url = Some("api.openai.com".to_string());

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "provider.base_url"));
}

#[test]
fn test_validate_zero_sample() {
    let mut config = valid_config();
    config.crawl.markup_sample_chars = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "crawl.markup_sample_chars"));
}

#[test]
fn test_validate_large_sample_warning() {
    let mut config = valid_config();
    config.crawl.markup_sample_chars = 100_000;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "crawl.markup_sample_chars"));
}

#[test]
fn test_validate_zero_max_pages() {
    let mut config = valid_config();
    config.crawl.max_pages = Some(0);

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "crawl.max_pages"));
}

#[test]
fn test_validate_missing_chrome_binary() {
    let mut config = valid_config();
    config.browser.chrome_path = Some(PathBuf::from("/nonexistent/chrome"));

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "browser.chrome_path"));
}

#[test]
fn test_validation_error_new() {
    let err = ValidationError::new("crawl.timeout_seconds", "must be positive");
    assert_eq!(err.path, "crawl.timeout_seconds");
    assert_eq!(err.message, "must be positive");
}
