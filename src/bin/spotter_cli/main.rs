// ABOUTME: Spotter CLI - command-line tool for accounts, catalog bootstrap, sync, and routine generation
// ABOUTME: Runs the same services as the REST API directly against the configured database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Create an account
//! spotter-cli user create --username alice --email alice@example.com --password secret123
//!
//! # Store the built-in catalog, or pull templates from Hevy
//! spotter-cli exercises bootstrap
//! spotter-cli exercises bootstrap --from-hevy --username alice
//!
//! # Import workouts
//! spotter-cli sync --username alice --since 2025-01-01
//!
//! # Draft a routine and print it as markdown
//! spotter-cli routine generate --username alice --day Monday --focus "Upper Body" --cardio
//!
//! # Plan, store, and print a routine folder
//! spotter-cli routine folder --username alice --split upper_lower --period week
//! ```
//!
//! Hevy keys stored by the server are only readable when `SPOTTER_ENCRYPTION_KEY`
//! is the same for both processes.

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spotter::config::{DatabaseUrl, ServerConfig};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "spotter-cli",
    about = "Spotter management CLI",
    long_about = "Command-line tool for Spotter accounts, the exercise catalog, Hevy sync, and routine generation."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Account management
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Exercise catalog management
    Exercises {
        #[command(subcommand)]
        action: ExercisesCommand,
    },

    /// Import workouts from Hevy
    Sync {
        /// Account to sync
        #[arg(long)]
        username: String,

        /// Import workouts started after this date (`YYYY-MM-DD` or RFC 3339)
        #[arg(long)]
        since: Option<String>,
    },

    /// Routine generation
    Routine {
        #[command(subcommand)]
        action: RoutineCommand,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    /// Create a new account
    Create {
        /// Unique username
        #[arg(long)]
        username: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Password, at least 8 characters
        #[arg(long)]
        password: String,

        /// Hevy API key to store with the account
        #[arg(long)]
        hevy_api_key: Option<String>,
    },
}

#[derive(Subcommand)]
enum ExercisesCommand {
    /// Store the built-in catalog, or pull exercise templates from Hevy
    Bootstrap {
        /// Pull templates with the account's Hevy key
        #[arg(long, requires = "username")]
        from_hevy: bool,

        /// Account whose Hevy key is used
        #[arg(long)]
        username: Option<String>,
    },
}

#[derive(Subcommand)]
enum RoutineCommand {
    /// Draft a single-day routine and print it as markdown
    Generate {
        /// Account to plan for
        #[arg(long)]
        username: String,

        /// Weekday being planned
        #[arg(long)]
        day: String,

        /// Session focus, e.g. "Upper Body"
        #[arg(long)]
        focus: String,

        /// Include cardio
        #[arg(long)]
        cardio: bool,

        /// Print imperial units
        #[arg(long)]
        imperial: bool,
    },

    /// Plan and store a routine folder, then print it as markdown
    Folder {
        /// Account to plan for
        #[arg(long)]
        username: String,

        /// `auto`, `full_body`, `upper_lower`, or `push_pull`
        #[arg(long)]
        split: Option<String>,

        /// `week` or `month`
        #[arg(long, default_value = "week")]
        period: String,

        /// Include cardio on every day
        #[arg(long)]
        cardio: bool,

        /// Push the stored folder to Hevy
        #[arg(long)]
        push: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = DatabaseUrl::parse_url(&url)?;
    }
    info!(
        "Using database {}",
        config.database_url.to_connection_string()
    );

    match cli.command {
        Command::User { action } => match action {
            UserCommand::Create {
                username,
                email,
                password,
                hevy_api_key,
            } => {
                commands::user::create(&config, &username, &email, &password, hevy_api_key)
                    .await?;
            }
        },
        Command::Exercises { action } => match action {
            ExercisesCommand::Bootstrap {
                from_hevy,
                username,
            } => {
                commands::exercises::bootstrap(config, from_hevy, username.as_deref()).await?;
            }
        },
        Command::Sync { username, since } => {
            commands::sync::run(config, &username, since.as_deref()).await?;
        }
        Command::Routine { action } => match action {
            RoutineCommand::Generate {
                username,
                day,
                focus,
                cardio,
                imperial,
            } => {
                commands::routine::generate(config, &username, day, focus, cardio, imperial)
                    .await?;
            }
            RoutineCommand::Folder {
                username,
                split,
                period,
                cardio,
                push,
            } => {
                commands::routine::folder(config, &username, split, &period, cardio, push).await?;
            }
        },
    }

    Ok(())
}
