// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use landscaper_provider_aws::{
    artifacts::{ArtifactResolver, ComponentDescriptorResolver},
    cluster::KubeconfigConnector,
    constants::{ENV_COMPONENT_DESCRIPTOR_PATH, ENV_IMPORTS_PATH, ENV_LOG_FORMAT, ENV_OPERATION},
    orchestrator::{ImportSource, Orchestrator},
    templates::TemplateStore,
};
use std::path::PathBuf;
use tracing::{debug, info};

/// Deploys or removes the Gardener AWS provider extension
#[derive(Parser, Debug)]
#[command(name = "landscaper-provider-aws", version, about, long_about = None)]
struct Cli {
    /// Path to the import document
    #[arg(long, env = ENV_IMPORTS_PATH)]
    imports_path: PathBuf,

    /// Operation to perform: `reconcile` or `delete`
    #[arg(long, env = ENV_OPERATION)]
    operation: String,

    /// Component descriptor (file path or http(s) URL) used to resolve images
    ///
    /// When omitted, the images of the bundled controller deployment are used.
    #[arg(long, env = ENV_COMPONENT_DESCRIPTOR_PATH)]
    component_descriptor: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    // One call in flight at a time, so a single thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .thread_name("landscaper-provider-aws")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn init_logging() {
    // Respects RUST_LOG if set, otherwise defaults to INFO level.
    // RUST_LOG_FORMAT=json switches to JSON output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    info!(
        operation = %cli.operation,
        imports = %cli.imports_path.display(),
        "Starting provider-aws deployer"
    );

    let resolver = cli.component_descriptor.map(|location| {
        debug!(location = %location, "Resolving images from component descriptor");
        ComponentDescriptorResolver::new(location)
    });
    let templates = TemplateStore::embedded();
    let connector = KubeconfigConnector;

    let mut orchestrator = Orchestrator::new(
        &connector,
        resolver.as_ref().map(|r| r as &dyn ArtifactResolver),
        &templates,
    );

    orchestrator
        .run(&ImportSource::File(cli.imports_path), &cli.operation)
        .await
        .with_context(|| format!("provider-aws {} failed", cli.operation))
}
