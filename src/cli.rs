//! CLI definitions for revscout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// revscout CLI.
#[derive(Parser)]
#[command(name = "revscout")]
#[command(about = "Extract product reviews from any page layout")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ./revscout.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Crawl every review page reachable from a product URL
    Crawl(CrawlArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone)]
pub(crate) struct CrawlArgs {
    /// Product page URL
    pub url: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop after this many pages (overrides crawl.max_pages)
    #[arg(long)]
    pub max_pages: Option<u32>,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Validate the effective configuration
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crawl_defaults() {
        let cli = Cli::try_parse_from(["revscout", "crawl", "https://shop.example/p/1"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Crawl(args) => {
                assert_eq!(args.url, "https://shop.example/p/1");
                assert_eq!(args.format, OutputFormat::Table);
                assert!(args.output.is_none());
                assert!(args.max_pages.is_none());
            }
            _ => panic!("Expected crawl"),
        }
    }

    #[test]
    fn test_parse_crawl_options() {
        let cli = Cli::try_parse_from([
            "revscout",
            "-v",
            "crawl",
            "https://shop.example/p/1",
            "--format",
            "json",
            "-o",
            "out.json",
            "--max-pages",
            "3",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Crawl(args) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
                assert_eq!(args.max_pages, Some(3));
            }
            _ => panic!("Expected crawl"),
        }
    }

    #[test]
    fn test_parse_config_check() {
        let cli = Cli::try_parse_from(["revscout", "config", "check", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Check
            }
        ));
    }

    #[test]
    fn test_crawl_requires_url() {
        assert!(Cli::try_parse_from(["revscout", "crawl"]).is_err());
        assert!(Cli::try_parse_from(["revscout", "crawl", "u", "--format", "xml"]).is_err());
    }
}
