//! feedmix CLI — the main entry point.
//!
//! Commands:
//! - `init`    — Write the default config file
//! - `serve`   — Start the HTTP gateway
//! - `feed`    — Assemble one feed and print it as JSON
//! - `import`  — Load content items from a JSON file into the store
//! - `status`  — Show config, store backend and item count

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "feedmix",
    about = "feedmix — hybrid organic/sponsored content feeds",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.feedmix/config.toml)
    #[arg(short, long, global = true, env = "FEEDMIX_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Assemble one feed against the configured store
    Feed {
        /// Only items from this company
        #[arg(long)]
        company: Option<String>,

        /// Only articles in this category (campaign-reviews are unaffected)
        #[arg(long)]
        category: Option<String>,

        /// Feed size, clamped to [1, 100]
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Organic items between sponsored slots
        #[arg(short, long, allow_negative_numbers = true)]
        interval: Option<i64>,
    },

    /// Import a JSON array of content items into the store
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Show system status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init { force } => commands::init::run(config_path, force).await?,
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
        Commands::Feed {
            company,
            category,
            limit,
            interval,
        } => {
            let args = commands::feed::FeedArgs {
                company,
                category,
                limit,
                interval,
            };
            commands::feed::run(config_path, args).await?
        }
        Commands::Import { file } => commands::import::run(config_path, &file).await?,
        Commands::Status => commands::status::run(config_path).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_feed_arguments() {
        let cli = Cli::parse_from([
            "feedmix", "--verbose", "feed", "--company", "acme", "--limit", "-3", "--interval", "2",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Feed {
                company,
                category,
                limit,
                interval,
            } => {
                assert_eq!(company.as_deref(), Some("acme"));
                assert_eq!(category, None);
                assert_eq!(limit, Some(-3));
                assert_eq!(interval, Some(2));
            }
            _ => panic!("expected feed command"),
        }
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::parse_from(["feedmix", "status", "--config", "/tmp/feedmix.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/feedmix.toml")));
        assert!(matches!(cli.command, Commands::Status));
    }
}
