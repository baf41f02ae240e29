use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{DayCommands, EventCommands, ProgressArgs, ScheduleArgs, TripCommands};

/// Main command-line interface for the Voyage itinerary tool
///
/// Voyage composes travel itineraries out of trips, days, and scheduled
/// events, and projects them into client-shaped schedule views. The CLI
/// exposes the full write surface (trip/day/event management, ordering)
/// plus the read side (schedule assembly and progress aggregation).
#[derive(Parser)]
#[command(version, about, name = "vy")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/voyage/voyage.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Voyage CLI
///
/// The CLI is organized around the itinerary hierarchy:
/// - `trip`: Operations for managing trips (create, list, update, delete)
/// - `day`: Operations for managing days within a trip
/// - `event`: Operations for managing scheduled events within a day
/// - `schedule`: Assemble the projected schedule view for a trip
/// - `progress`: Compute the completion percentage for a trip
#[derive(Subcommand)]
pub enum Commands {
    /// Manage trips
    #[command(alias = "t")]
    Trip {
        #[command(subcommand)]
        command: TripCommands,
    },
    /// Manage days within a trip
    #[command(alias = "d")]
    Day {
        #[command(subcommand)]
        command: DayCommands,
    },
    /// Manage events within a day
    #[command(alias = "e")]
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Show the assembled schedule view for a trip
    #[command(alias = "s")]
    Schedule(ScheduleArgs),
    /// Show the completion percentage for a trip
    #[command(alias = "p")]
    Progress(ProgressArgs),
}
