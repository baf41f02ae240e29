//! Voyage CLI Application
//!
//! Command-line interface for the Voyage travel itinerary tool.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use voyage_core::PlannerBuilder;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args { database_file, no_color, command } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize planner")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Voyage started");

    let cli = Cli::new(planner, renderer);
    match command {
        Trip { command } => cli.handle_trip_command(command).await,
        Day { command } => cli.handle_day_command(command).await,
        Event { command } => cli.handle_event_command(command).await,
        Schedule(args) => cli.show_schedule(args).await,
        Progress(args) => cli.show_progress(args).await,
    }
}
