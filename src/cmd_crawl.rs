//! Crawl subcommand handler.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use revscout_browser_cdp::{ChromeLauncher, ChromeLauncherConfig};
use revscout_config::{Config, ConfigValidator};
use revscout_core::{CrawlSettings, InferenceConfig, ReviewCrawler, ReviewSummary, SchemaInferrer};
use revscout_protocols::provider::LLMProvider;
use revscout_provider_openai::OpenAIProvider;

use crate::cli::{CrawlArgs, OutputFormat};
use crate::cmd_config::ensure_valid;
use crate::render;

/// Handle `revscout crawl`.
pub(crate) async fn handle_crawl_command(config: Config, args: CrawlArgs) -> anyhow::Result<()> {
    ensure_valid(&ConfigValidator::validate(&config))?;

    let provider = build_provider(&config)?;
    let crawler = ReviewCrawler::new(
        Arc::new(ChromeLauncher::new(launcher_config(&config))),
        SchemaInferrer::new(provider, inference_config(&config)),
        crawl_settings(&config, args.max_pages),
    );

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current step");
                cancel.cancel();
            }
        })
    };

    let result = execute(&crawler, &args, cancel).await;
    interrupt.abort();
    result
}

/// Crawl, render and write the output.
async fn execute(
    crawler: &ReviewCrawler,
    args: &CrawlArgs,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let progress = |message: &str| eprintln!("{}", message);
    let outcome = crawler
        .crawl_with_cancel(&args.url, Some(&progress), cancel)
        .await
        .with_context(|| format!("Crawl of {} failed", args.url))?;

    if outcome.records.is_empty() {
        eprintln!("No reviews found on the page.");
    } else {
        eprintln!("Extracted {} reviews.", outcome.records.len());
    }

    let summary = ReviewSummary::from_records(&outcome.records);
    let rendered = match args.format {
        OutputFormat::Table => render::table(&outcome, &summary),
        OutputFormat::Json => render::json(&outcome, &summary).context("Failed to encode results")?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Results written");
            eprintln!("Saved to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn LLMProvider>> {
    let api_key = config
        .provider
        .api_key
        .clone()
        .context("No API key configured: set OPENAI_API_KEY or provider.api_key")?;

    let provider = match &config.provider.base_url {
        Some(url) => OpenAIProvider::with_url(api_key, url.clone()),
        None => OpenAIProvider::new(api_key),
    };
    Ok(Arc::new(provider))
}

fn launcher_config(config: &Config) -> ChromeLauncherConfig {
    ChromeLauncherConfig {
        debug_port: config.browser.debug_port,
        headless: config.browser.headless,
        chrome_path: config.browser.chrome_path.clone(),
        profile_dir: config.browser.profile_dir.clone(),
        command_timeout: config.crawl.timeout(),
        network_idle: config.crawl.network_idle(),
    }
}

fn inference_config(config: &Config) -> InferenceConfig {
    InferenceConfig {
        model: config.provider.model.clone(),
        markup_sample_chars: config.crawl.markup_sample_chars,
        timeout: config.crawl.timeout(),
        ..Default::default()
    }
}

fn crawl_settings(config: &Config, max_pages: Option<u32>) -> CrawlSettings {
    CrawlSettings {
        timeout: config.crawl.timeout(),
        max_pages: max_pages.or(config.crawl.max_pages),
    }
}
