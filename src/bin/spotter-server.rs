// ABOUTME: Spotter REST API server binary
// ABOUTME: Loads configuration, seeds and indexes the exercise catalog, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Spotter Server Binary
//!
//! Configuration comes from the environment; `--http-port` overrides `HTTP_PORT`.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use spotter::{config::ServerConfig, logging, resources::ServerResources, server};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "spotter-server")]
#[command(about = "Spotter - AI personal trainer API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    info!("Starting Spotter server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::initialize(config).await?);
    info!(
        exercises = resources.index.len().await,
        generation_enabled = resources.generator.is_some(),
        "Server resources ready"
    );

    if let Err(e) = server::serve(resources).await {
        error!("Server error: {e}");
        return Err(e.into());
    }
    Ok(())
}
