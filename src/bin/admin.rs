//! CLI administration tool for url-reductio.
//!
//! Talks to the configured storage backend directly, without the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check storage connection
//! cargo run --bin admin -- check
//!
//! # Create a short URL
//! cargo run --bin admin -- shorten https://example.com --alias docs --expires 2030-01-01T00:00:00Z
//!
//! # Inspect a short code without recording a click
//! cargo run --bin admin -- resolve docs
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`url_reductio::config`].

use url_reductio::api::dto::shorten::ShortenUrlRequest;
use url_reductio::application::services::{RedirectService, ShortenService, StatsService};
use url_reductio::config::{self, Config};
use url_reductio::domain::repositories::UrlRepository;
use url_reductio::error::AppError;
use url_reductio::infrastructure::persistence;
use url_reductio::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;

/// CLI tool for managing url-reductio.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show URL and click counts
    Stats,

    /// Check storage connection
    Check,

    /// Create a short URL
    Shorten {
        /// Destination URL
        url: String,

        /// Custom alias used as the short code
        #[arg(short, long)]
        alias: Option<String>,

        /// Expiry timestamp (RFC 3339)
        #[arg(short, long)]
        expires: Option<String>,
    },

    /// Show the record behind a short code
    Resolve {
        /// Short code or alias
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;
    let repository = persistence::connect(&config)
        .await
        .context("Failed to connect to storage")?;

    let result = match cli.command {
        Commands::Stats => handle_stats(repository.clone()).await,
        Commands::Check => handle_check(repository.as_ref(), &config).await,
        Commands::Shorten {
            url,
            alias,
            expires,
        } => handle_shorten(repository.clone(), &config, url, alias, expires).await,
        Commands::Resolve { code } => handle_resolve(repository.clone(), code).await,
    };

    repository.close().await;
    result
}

/// Displays total URL and click counts.
async fn handle_stats(repository: Arc<dyn UrlRepository>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = StatsService::new(repository)
        .get_stats()
        .await
        .map_err(|e| anyhow::anyhow!("Storage error: {}", e))?;

    println!(
        "  URLs:   {}",
        stats.total_urls.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        stats.total_clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_check(repository: &dyn UrlRepository, config: &Config) -> Result<()> {
    println!(
        "{}",
        format!("🔍 Checking {} storage...", config.storage_backend).bright_blue()
    );

    if !repository.health_check().await {
        anyhow::bail!("Storage is unreachable");
    }

    println!("{}", "✅ Storage connection OK".green().bold());
    Ok(())
}

/// Creates a short URL through the same engine the HTTP API uses.
async fn handle_shorten(
    repository: Arc<dyn UrlRepository>,
    config: &Config,
    url: String,
    alias: Option<String>,
    expires: Option<String>,
) -> Result<()> {
    let request = ShortenUrlRequest {
        original: url,
        alias,
        expires,
    }
    .into_checked_request(&config.url_policy())
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    let service = ShortenService::new(
        repository,
        Arc::new(RandomCodeGenerator::new(config.short_code_length)),
        config.base_url.clone(),
        config.max_retries,
    );

    let shortened = service
        .shorten_url(request)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!("{}", "✅ Short URL created".green().bold());
    println!();
    println!("  Short URL: {}", shortened.short_url.cyan().bold());
    println!("  Code:      {}", shortened.record.short);
    println!("  Target:    {}", shortened.record.original.bright_white());
    if let Some(expires) = shortened.record.expires {
        println!("  Expires:   {}", expires.to_rfc3339().yellow());
    }
    println!();

    Ok(())
}

/// Prints the record a code resolves to. No click is recorded.
async fn handle_resolve(repository: Arc<dyn UrlRepository>, code: String) -> Result<()> {
    let service = RedirectService::new(repository);

    match service.resolve_short_code(&code).await {
        Ok(Some(record)) => {
            println!("  Code:    {}", record.short.cyan());
            println!("  Target:  {}", record.original.bright_white());
            println!("  Created: {}", record.created.to_rfc3339().bright_black());
            match record.expires {
                Some(expires) => println!("  Expires: {}", expires.to_rfc3339().yellow()),
                None => println!("  Expires: {}", "never".bright_black()),
            }
            Ok(())
        }
        Ok(None) => {
            println!("{}", format!("❌ No short URL uses '{}'", code).red());
            Ok(())
        }
        Err(e @ AppError::Gone { .. }) => {
            println!("{}", format!("⚠️  {}", e).yellow());
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Storage error: {}", e)),
    }
}
