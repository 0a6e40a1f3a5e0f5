//! Shopfloor CLI Application
//!
//! Command-line interface for the shopfloor production-planning engine.

mod cli;
mod handlers;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use handlers::Handler;
use log::info;
use shopfloor_core::EngineBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Cli {
        database_file,
        actor,
        command,
    } = Cli::parse();

    let engine = EngineBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize engine")?;

    info!("Shopfloor started");

    let handler = Handler::new(engine, actor);

    match command {
        Commands::Template { command } => handler.handle_template_command(command).await,
        Commands::Plan { command } => handler.handle_plan_command(command).await,
        Commands::Stage { command } => handler.handle_stage_command(command).await,
        Commands::Task { command } => handler.handle_task_command(command).await,
    }
}
