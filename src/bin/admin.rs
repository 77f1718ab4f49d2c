//! CLI administration tool for the URL shortener.
//!
//! Talks to PostgreSQL directly, so short URLs can be created and inspected
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (prompts when the URL is omitted)
//! cargo run --bin admin -- shorten https://example.com/very/long/path
//!
//! # Resolve a short code
//! cargo run --bin admin -- resolve HkTRTCTy
//!
//! # Find the record for an original URL
//! cargo run --bin admin -- lookup https://example.com/very/long/path
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Uses the same variables as the server (`DATABASE_URL` or `DB_*`,
//! `BASE_URL`, `CODE_LENGTH`, `CODE_MAX_LENGTH`, `AUDIT_ACTOR`). The in-memory
//! backend is rejected since it lives only inside a server process.

use url_shortener_service::application::services::UrlService;
use url_shortener_service::config::{self, StorageBackend};
use url_shortener_service::domain::repositories::UrlRepository;
use url_shortener_service::error::AppError;
use url_shortener_service::infrastructure::persistence::PgUrlRepository;
use url_shortener_service::server::connect_pool;
use url_shortener_service::utils::code_generator::{CodeGenerator, collision_probability};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing the URL shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Shorten {
        /// URL to shorten (prompted for when omitted)
        url: Option<String>,
    },

    /// Resolve a short code to its original URL
    Resolve {
        /// Short code, e.g. "HkTRTCTy"
        id: String,
    },

    /// Find the short code for an original URL
    Lookup {
        /// Original URL, exactly as it was shortened
        url: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("admin requires STORAGE_BACKEND=postgres");
    }
    let pool = connect_pool(&config).await?;

    let repository: Arc<dyn UrlRepository> = Arc::new(PgUrlRepository::new(
        Arc::new(pool.clone()),
        config.audit_actor.clone(),
    ));
    let generator = CodeGenerator::new(config.code_length, config.code_max_length);
    let service = UrlService::new(repository, generator, config.base_url.clone());

    match cli.command {
        Commands::Shorten { url } => shorten(&service, url).await?,
        Commands::Resolve { id } => resolve(&service, &id).await?,
        Commands::Lookup { url } => lookup(&service, &url).await?,
        Commands::Stats => handle_stats(&service, config.expected_records).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Creates a short URL, prompting for the URL when not given.
async fn shorten(service: &UrlService<dyn UrlRepository>, url: Option<String>) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    let result = service
        .create_short_url(&url)
        .await
        .map_err(|e| describe(e, "Failed to shorten URL"))?;

    if result.created {
        println!("{}", "✅ Short URL created".green().bold());
    } else {
        println!("{}", "ℹ️  URL was already shortened".yellow());
    }
    println!();
    println!("  ID:        {}", result.id.cyan());
    println!("  Short URL: {}", result.short_url.bright_white().bold());
    println!("  Original:  {}", result.original_url.bright_black());
    println!();

    Ok(())
}

async fn resolve(service: &UrlService<dyn UrlRepository>, id: &str) -> Result<()> {
    match service.resolve_short_url(id).await {
        Ok(url) => {
            println!("  {} → {}", id.cyan(), url.bright_white());
            Ok(())
        }
        Err(AppError::NotFound { .. }) => {
            println!("{}", format!("❌ No short URL with id '{}'", id).red());
            Ok(())
        }
        Err(e) => Err(describe(e, "Failed to resolve short URL")),
    }
}

async fn lookup(service: &UrlService<dyn UrlRepository>, url: &str) -> Result<()> {
    let record = service
        .find_by_original_url(url)
        .await
        .map_err(|e| describe(e, "Lookup failed"))?;

    let Some(record) = record else {
        println!("{}", "❌ URL has not been shortened".red());
        return Ok(());
    };

    println!("  ID:         {}", record.id.cyan());
    println!(
        "  Short URL:  {}",
        service.short_url(&record.id).bright_white().bold()
    );
    println!(
        "  Created:    {} by {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black(),
        record.created_by
    );
    println!();

    Ok(())
}

/// Displays record count and the collision estimate at the current size.
async fn handle_stats(
    service: &UrlService<dyn UrlRepository>,
    expected_records: u64,
) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let count = service
        .record_count()
        .await
        .map_err(|e| describe(e, "Failed to count records"))?;
    let length = service.generator().length();
    let current = u64::try_from(count).unwrap_or(0);

    println!(
        "  Records:            {}",
        count.to_string().bright_green().bold()
    );
    println!("  Code length:        {}", length);
    println!(
        "  P(collision) now:   {:.2e}",
        collision_probability(current, length)
    );
    println!(
        "  P(collision) at {}: {:.2e}",
        expected_records,
        collision_probability(expected_records, length)
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let table_size: String =
                sqlx::query_scalar("SELECT pg_size_pretty(pg_total_relation_size('urls'))")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  urls table: {}", table_size.bright_white());
            println!();
        }
    }

    Ok(())
}

fn describe(error: AppError, context: &str) -> anyhow::Error {
    anyhow::anyhow!("{}: {} ({})", context, error, error.code())
}
