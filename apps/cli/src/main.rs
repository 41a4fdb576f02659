mod config;
mod download;
mod errors;
mod models;
mod service;
mod ui;
mod workflow;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::service::HttpTailorService;
use crate::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-agent v{}", env!("CARGO_PKG_VERSION"));
    info!("Using service at {}", config.api_base_url);

    let service = HttpTailorService::new(config.api_base_url.clone(), config.user_id.clone())?;

    let mut workflow = Workflow::new(
        Arc::new(service),
        config.display_name.clone(),
        config.output_dir.clone(),
    );

    ui::run(&mut workflow, &config).await
}
