//! Config subcommand handlers.

use anyhow::bail;
use tracing::warn;

use revscout_config::{Config, ConfigValidator, ValidationResult};

use crate::cli::ConfigAction;

pub(crate) fn handle_config_command(action: ConfigAction, config: &Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Check => check(config),
    }
}

fn check(config: &Config) -> anyhow::Result<()> {
    println!("Model:            {}", config.provider.model);
    println!(
        "Endpoint:         {}",
        config
            .provider
            .base_url
            .as_deref()
            .unwrap_or(revscout_provider_openai::DEFAULT_API_URL)
    );
    println!(
        "API key:          {}",
        if config.provider.api_key.is_some() { "set" } else { "missing" }
    );
    println!("Timeout:          {}s", config.crawl.timeout_seconds);
    println!("Markup sample:    {} chars", config.crawl.markup_sample_chars);
    println!("Network idle:     {}ms", config.crawl.network_idle_ms);
    match config.crawl.max_pages {
        Some(max) => println!("Max pages:        {}", max),
        None => println!("Max pages:        unlimited"),
    }
    println!(
        "Browser:          port {}, {}",
        config.browser.debug_port,
        if config.browser.headless { "headless" } else { "headed" }
    );
    println!();

    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    ensure_valid(&result)?;
    println!("Configuration OK.");
    Ok(())
}

/// Log warnings and fail on errors.
pub(crate) fn ensure_valid(result: &ValidationResult) -> anyhow::Result<()> {
    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if result.is_valid() {
        return Ok(());
    }

    let problems: Vec<String> = result
        .errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect();
    bail!("Invalid configuration: {}", problems.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use revscout_config::ConfigLoader;

    #[test]
    fn test_default_config_is_valid() {
        let result = ConfigValidator::validate(&Config::default());
        assert!(ensure_valid(&result).is_ok());
    }

    #[test]
    fn test_invalid_config_lists_problems() {
        let config = ConfigLoader::load_str(
            r#"
            [crawl]
            timeout_seconds = 0
            "#,
        )
        .unwrap();
        let err = ensure_valid(&ConfigValidator::validate(&config)).unwrap_err();
        assert!(err.to_string().contains("crawl.timeout_seconds"));
    }

    #[test]
    fn test_check_loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revscout.toml");
        std::fs::write(
            &path,
            r#"
            [provider]
            api_key = "sk-test"
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert!(check(&config).is_ok());
    }
}
