//! CLI administration tool for the shorturl service.
//!
//! Inspects the PostgreSQL store without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show mapping count and the next code to be handed out
//! cargo run --bin admin -- stats
//!
//! # Look up a mapping by short code
//! cargo run --bin admin -- lookup 42
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use shorturl::domain::repositories::MappingRepository;
use shorturl::infrastructure::persistence::PgMappingRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for inspecting the shorturl store.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show mapping statistics
    Stats,

    /// Print the mapping for a short code
    Lookup {
        /// Short code to look up
        code: i64,
    },

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

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Lookup { code } => handle_lookup(&pool, code).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Displays the number of mappings and the next code the sequence yields.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let repo = PgMappingRepository::new(Arc::new(pool.clone()));
    let count = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let (last_value, is_called): (i64, bool) =
        sqlx::query_as("SELECT last_value, is_called FROM url_mappings_short_code_seq")
            .fetch_one(pool)
            .await
            .context("Failed to read short code sequence")?;
    let next_code = if is_called { last_value + 1 } else { last_value };

    println!("  Mappings:  {}", count.to_string().bright_green().bold());
    println!("  Next code: {}", next_code.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Prints the mapping for `code`, if any.
async fn handle_lookup(pool: &PgPool, code: i64) -> Result<()> {
    let repo = PgMappingRepository::new(Arc::new(pool.clone()));

    let mapping = repo
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    match mapping {
        Some(mapping) => {
            println!("  Code:    {}", mapping.short_code.to_string().cyan());
            println!("  URL:     {}", mapping.original_url.bright_white());
            println!(
                "  Created: {}",
                mapping.created_at.to_rfc3339().bright_black()
            );
        }
        None => println!("{}", format!("No mapping for code {}", code).yellow()),
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
