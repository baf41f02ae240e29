//! Command-line interface definitions and handlers using clap
//!
//! This module defines the CLI argument structures using clap's derive API
//! and the [`Cli`] handler that executes parsed commands against the core
//! [`Planner`].
//!
//! ## Parameter Wrapper Pattern
//!
//! Argument structs are CLI-side wrappers over the core parameter types:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Business Logic
//! ```
//!
//! Each wrapper carries the clap-specific attributes (flags, help text,
//! value delimiters) and converts into its core counterpart via `From`,
//! keeping `voyage_core::params` free of framework derives. Commands that
//! accept loose JSON payloads (day and event bodies) parse the JSON in the
//! handler instead, since that conversion can fail.

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::{json, Value};
use voyage_core::params::{
    CreateTrip, DeleteEvent, GetProgress, GetSchedule, Id, ReorderEvents, UpdateTrip,
};
use voyage_core::{
    params, CreateResult, Days, DeleteResult, OperationStatus, Planner, Trips, UpdateResult,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// Trip commands
// ============================================================================

/// Create a new trip
///
/// CLI wrapper for CreateTrip that adds clap-specific argument handling
/// including short/long flags, help text generation, and input validation.
#[derive(Args)]
pub struct CreateTripArgs {
    /// Title of the trip
    pub title: String,
    /// Acting user who will own the trip
    #[arg(short, long, help = "User id that will own the trip")]
    pub user: String,
    /// Optional description providing more context about the trip
    #[arg(short, long)]
    pub description: Option<String>,
    /// First day of the trip as YYYY-MM-DD
    #[arg(long, help = "First day of the trip as YYYY-MM-DD")]
    pub start_date: Option<String>,
    /// Last day of the trip as YYYY-MM-DD
    #[arg(long, help = "Last day of the trip as YYYY-MM-DD")]
    pub end_date: Option<String>,
    /// Planned number of days
    #[arg(long)]
    pub days: Option<i64>,
    /// Cities visited on the trip - comma-separated list
    #[arg(long, value_delimiter = ',', help = "Cities as comma-separated list")]
    pub city: Vec<String>,
    /// Cover image URL
    #[arg(long)]
    pub cover_image: Option<String>,
    /// Editorial status (draft or published)
    #[arg(long, help = "Editorial status: draft or published")]
    pub status: Option<String>,
    /// Visibility (private, public, or link)
    #[arg(long, help = "Visibility: private, public, or link")]
    pub visibility: Option<String>,
}

impl From<CreateTripArgs> for CreateTrip {
    fn from(val: CreateTripArgs) -> Self {
        let city_list = if val.city.is_empty() {
            None
        } else {
            Some(json!(val.city))
        };
        CreateTrip {
            user_id: val.user,
            title: val.title,
            description: val.description,
            start_date: val.start_date,
            end_date: val.end_date,
            days: val.days,
            city_list,
            cover_image: val.cover_image,
            status: val.status,
            visibility: val.visibility,
        }
    }
}

/// List all trips owned by a user
#[derive(Args)]
pub struct ListTripsArgs {
    /// User whose trips to list
    #[arg(short, long, help = "User id whose trips to list")]
    pub user: String,
}

/// Show details of a specific trip
///
/// Displays the trip's title, status, visibility, date range, progress,
/// and timestamps. Non-owners can only see published public trips.
#[derive(Args)]
pub struct ShowTripArgs {
    /// ID of the trip to display
    #[arg(help = "Unique identifier of the trip to show details for")]
    pub id: String,
    /// Viewing user, if any (gates non-public trips)
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Update an existing trip
///
/// Only the provided fields are changed; everything else is left as-is.
/// The acting user must own the trip.
#[derive(Args)]
pub struct UpdateTripArgs {
    /// ID of the trip to update
    pub id: String,
    /// Acting user (must own the trip)
    #[arg(short, long)]
    pub user: String,
    /// Updated title
    #[arg(short, long)]
    pub title: Option<String>,
    /// Updated description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Updated start date as YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,
    /// Updated end date as YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,
    /// Updated day count
    #[arg(long)]
    pub days: Option<i64>,
    /// Updated city list - comma-separated
    #[arg(long, value_delimiter = ',')]
    pub city: Option<Vec<String>>,
    /// Updated cover image URL
    #[arg(long)]
    pub cover_image: Option<String>,
    /// Updated editorial status (draft or published)
    #[arg(long)]
    pub status: Option<String>,
    /// Updated visibility (private, public, or link)
    #[arg(long)]
    pub visibility: Option<String>,
}

impl UpdateTripArgs {
    /// Names of the fields this update touches, for change reporting.
    fn changed_fields(&self) -> Vec<String> {
        let mut changes = Vec::new();
        let fields: [(&str, bool); 9] = [
            ("title", self.title.is_some()),
            ("description", self.description.is_some()),
            ("start date", self.start_date.is_some()),
            ("end date", self.end_date.is_some()),
            ("days", self.days.is_some()),
            ("city list", self.city.is_some()),
            ("cover image", self.cover_image.is_some()),
            ("status", self.status.is_some()),
            ("visibility", self.visibility.is_some()),
        ];
        for (name, set) in fields {
            if set {
                changes.push(name.to_string());
            }
        }
        changes
    }
}

impl From<UpdateTripArgs> for UpdateTrip {
    fn from(val: UpdateTripArgs) -> Self {
        UpdateTrip {
            trip_id: val.id,
            user_id: val.user,
            title: val.title,
            description: val.description,
            start_date: val.start_date,
            end_date: val.end_date,
            days: val.days,
            city_list: val.city.map(|cities| json!(cities)),
            cover_image: val.cover_image,
            status: val.status,
            visibility: val.visibility,
        }
    }
}

/// Delete a trip (soft delete)
///
/// The trip disappears from all reads but its row is retained. The acting
/// user must own the trip.
#[derive(Args)]
pub struct DeleteTripArgs {
    /// ID of the trip to delete
    pub id: String,
    /// Acting user (must own the trip)
    #[arg(short, long)]
    pub user: String,
}

impl From<DeleteTripArgs> for Id {
    fn from(val: DeleteTripArgs) -> Self {
        Id {
            id: val.id,
            user_id: val.user,
        }
    }
}

#[derive(Subcommand)]
pub enum TripCommands {
    /// Create a new trip
    #[command(alias = "c")]
    Create(CreateTripArgs),
    /// List all trips owned by a user
    #[command(aliases = ["l", "ls"])]
    List(ListTripsArgs),
    /// Show details of a specific trip
    #[command(alias = "s")]
    Show(ShowTripArgs),
    /// Update an existing trip
    #[command(alias = "u")]
    Update(UpdateTripArgs),
    /// Delete a trip
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteTripArgs),
}

// ============================================================================
// Day commands
// ============================================================================

/// Create a day on a trip
///
/// The day can be given either as individual flags (--date, --title) or as
/// a raw JSON payload via --json, which may embed an `events` array that is
/// created along with the day. Creating a day for a date that already
/// exists is a no-op that reports the existing day.
#[derive(Args)]
pub struct CreateDayArgs {
    /// Trip the day belongs to
    pub trip_id: String,
    /// Acting user (must own the trip)
    #[arg(short, long)]
    pub user: String,
    /// Date of the day as YYYY-MM-DD
    #[arg(long, help = "Date of the day as YYYY-MM-DD")]
    pub date: Option<String>,
    /// Optional day title
    #[arg(short, long)]
    pub title: Option<String>,
    /// Raw JSON day payload (overrides the individual flags)
    #[arg(long, help = "Raw JSON day payload, may embed an events array")]
    pub json: Option<String>,
    /// Position to insert at (0-indexed; appended when omitted)
    #[arg(short, long)]
    pub position: Option<i64>,
}

impl CreateDayArgs {
    /// Builds the loose day payload, parsing --json when given.
    fn payload(&self) -> Result<Value> {
        if let Some(raw) = &self.json {
            return serde_json::from_str(raw).context("Invalid JSON day payload");
        }
        let mut body = serde_json::Map::new();
        if let Some(date) = &self.date {
            body.insert("date".to_string(), json!(date));
        }
        if let Some(title) = &self.title {
            body.insert("title".to_string(), json!(title));
        }
        Ok(Value::Object(body))
    }
}

/// List the days of a trip in itinerary order
#[derive(Args)]
pub struct ListDaysArgs {
    /// Trip whose days to list
    pub trip_id: String,
    /// Viewing user, if any (gates non-public trips)
    #[arg(short, long)]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum DayCommands {
    /// Create a day on a trip
    #[command(alias = "c")]
    Create(CreateDayArgs),
    /// List the days of a trip
    #[command(aliases = ["l", "ls"])]
    List(ListDaysArgs),
}

// ============================================================================
// Event commands
// ============================================================================

/// Create one or more events on a day
///
/// Each positional argument is a JSON event payload. The day can be
/// addressed by id, by 0-based index, or by YYYY-MM-DD date. A payload with
/// an `options` array creates a multi-option card whose children are
/// nested alternatives.
#[derive(Args)]
pub struct CreateEventsArgs {
    /// Trip the events belong to
    pub trip_id: String,
    /// Day to schedule on (id, 0-based index, or YYYY-MM-DD date)
    pub day_id: String,
    /// JSON event payloads, inserted in the given order
    #[arg(required = true, help = "JSON event payloads, inserted in order")]
    pub events: Vec<String>,
    /// Acting user (must own the trip)
    #[arg(short, long)]
    pub user: String,
    /// Position to insert at (0-indexed; appended when omitted)
    #[arg(short, long)]
    pub position: Option<i64>,
}

impl CreateEventsArgs {
    /// Parses the positional JSON payloads.
    fn payloads(&self) -> Result<Vec<Value>> {
        self.events
            .iter()
            .map(|raw| {
                serde_json::from_str(raw)
                    .with_context(|| format!("Invalid JSON event payload: {raw}"))
            })
            .collect()
    }
}

/// Update an event with a partial JSON payload
///
/// The payload is merged over the stored event; omitted fields keep their
/// values. An `options` array in the payload replaces the card's children
/// wholesale.
#[derive(Args)]
pub struct UpdateEventArgs {
    /// Trip the event belongs to
    pub trip_id: String,
    /// Event to update
    pub event_id: String,
    /// Partial JSON event payload to merge over the stored event
    pub event: String,
    /// Acting user (must own the trip)
    #[arg(short, long)]
    pub user: String,
}

/// Delete an event
///
/// Removes the event and closes the ordering gap it leaves behind.
/// Deleting an event that is already gone fails with a not-found error.
#[derive(Args)]
pub struct DeleteEventArgs {
    /// Trip the event belongs to
    pub trip_id: String,
    /// Event to delete
    pub event_id: String,
    /// Acting user (must own the trip)
    #[arg(short, long)]
    pub user: String,
}

impl From<DeleteEventArgs> for DeleteEvent {
    fn from(val: DeleteEventArgs) -> Self {
        DeleteEvent {
            trip_id: val.trip_id,
            user_id: val.user,
            event_id: val.event_id,
        }
    }
}

/// Overwrite the event order of a day
///
/// The id list must cover the day's top-level events exactly once each;
/// the new order is applied as given.
#[derive(Args)]
pub struct ReorderEventsArgs {
    /// Trip the day belongs to
    pub trip_id: String,
    /// Day whose events are reordered (id, index, or date)
    pub day_id: String,
    /// Complete new ordering of event ids - comma-separated
    #[arg(value_delimiter = ',', help = "Event ids in the new order, comma-separated")]
    pub order: Vec<String>,
    /// Acting user (must own the trip)
    #[arg(short, long)]
    pub user: String,
}

impl From<ReorderEventsArgs> for ReorderEvents {
    fn from(val: ReorderEventsArgs) -> Self {
        ReorderEvents {
            trip_id: val.trip_id,
            user_id: val.user,
            day_id: val.day_id,
            order: val.order,
        }
    }
}

/// Show details of a specific event
#[derive(Args)]
pub struct ShowEventArgs {
    /// Trip the event belongs to
    pub trip_id: String,
    /// Event to show
    pub event_id: String,
    /// Viewing user, if any (gates non-public trips)
    #[arg(short, long)]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// Create one or more events on a day
    #[command(alias = "c")]
    Create(CreateEventsArgs),
    /// Update an event with a partial JSON payload
    #[command(alias = "u")]
    Update(UpdateEventArgs),
    /// Delete an event
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteEventArgs),
    /// Overwrite the event order of a day
    #[command(alias = "r")]
    Reorder(ReorderEventsArgs),
    /// Show details of a specific event
    #[command(alias = "s")]
    Show(ShowEventArgs),
}

// ============================================================================
// Schedule and progress
// ============================================================================

/// Built-in projection templates for the schedule view
///
/// Converts between user-friendly command arguments and the template names
/// understood by the projection layer. Used with the `--template` flag.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum TemplateArg {
    /// Compact card fields with derived time and duration
    Card,
    /// Card fields plus descriptive detail
    Detail,
    /// Every stored field, for editing round trips
    Edit,
}

impl std::fmt::Display for TemplateArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateArg::Card => write!(f, "card"),
            TemplateArg::Detail => write!(f, "detail"),
            TemplateArg::Edit => write!(f, "edit"),
        }
    }
}

/// Assemble and print the schedule view for a trip
///
/// The schedule is projected per the requested field schema or template
/// and printed as JSON. Filters narrow the view to a single day or event;
/// a date filter that matches no stored day yields an empty virtual day.
#[derive(Args)]
pub struct ScheduleArgs {
    /// Trip to assemble
    pub trip_id: String,
    /// Viewing user, if any (gates non-public trips)
    #[arg(short, long)]
    pub user: Option<String>,
    /// Restrict to one day (id, 0-based index, or YYYY-MM-DD date)
    #[arg(long)]
    pub day: Option<String>,
    /// Restrict to one event
    #[arg(long)]
    pub event: Option<String>,
    /// Raw field-selection schema JSON (takes precedence over --template)
    #[arg(long, help = "Field-selection schema JSON, e.g. '{\"event\": [\"id\", \"title\"]}'")]
    pub schema: Option<String>,
    /// Built-in projection template
    #[arg(long)]
    pub template: Option<TemplateArg>,
    /// Include the projected trip object and day navigation list
    #[arg(long)]
    pub include_trip: bool,
}

impl From<ScheduleArgs> for GetSchedule {
    fn from(val: ScheduleArgs) -> Self {
        GetSchedule {
            trip_id: val.trip_id,
            user_id: val.user,
            day_id: val.day,
            event_id: val.event,
            schema: val.schema,
            template: val.template.map(|t| t.to_string()),
            include_trip: val.include_trip,
        }
    }
}

/// Show the completion percentage for a trip
#[derive(Args)]
pub struct ProgressArgs {
    /// Trip to aggregate
    pub trip_id: String,
    /// Viewing user, if any (gates non-public trips)
    #[arg(short, long)]
    pub user: Option<String>,
}

impl From<ProgressArgs> for GetProgress {
    fn from(val: ProgressArgs) -> Self {
        GetProgress {
            trip_id: val.trip_id,
            user_id: val.user,
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Executes parsed commands against the planner and renders the results.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn handle_trip_command(&self, command: TripCommands) -> Result<()> {
        match command {
            TripCommands::Create(args) => {
                let trip = self.planner.create_trip(&args.into()).await?;
                self.renderer.render(&CreateResult::new(trip).to_string())
            }
            TripCommands::List(args) => {
                let trips = self.planner.list_trips(&args.user).await?;
                self.renderer.render(&Trips(trips).to_string())
            }
            TripCommands::Show(args) => {
                let trip = self.planner.get_trip(&args.id, args.user.as_deref()).await?;
                self.renderer.render(&trip.to_string())
            }
            TripCommands::Update(args) => {
                let changes = args.changed_fields();
                let trip = self.planner.update_trip(&args.into()).await?;
                self.renderer
                    .render(&UpdateResult::with_changes(trip, changes).to_string())
            }
            TripCommands::Delete(args) => {
                // Fetch first so the confirmation can name the trip.
                let trip = self
                    .planner
                    .get_trip(&args.id, Some(args.user.as_str()))
                    .await?;
                self.planner.delete_trip(&args.into()).await?;
                self.renderer.render(&DeleteResult::new(trip).to_string())
            }
        }
    }

    pub async fn handle_day_command(&self, command: DayCommands) -> Result<()> {
        match command {
            DayCommands::Create(args) => {
                let params = params::CreateDay {
                    trip_id: args.trip_id.clone(),
                    user_id: args.user.clone(),
                    day: args.payload()?,
                    position: args.position,
                };
                let created = self.planner.create_day(&params).await?;
                self.renderer.render(&CreateResult::new(created).to_string())
            }
            DayCommands::List(args) => {
                let days = self
                    .planner
                    .list_days(&args.trip_id, args.user.as_deref())
                    .await?;
                self.renderer.render(&Days(days).to_string())
            }
        }
    }

    pub async fn handle_event_command(&self, command: EventCommands) -> Result<()> {
        match command {
            EventCommands::Create(args) => {
                let params = params::CreateEvents {
                    trip_id: args.trip_id.clone(),
                    user_id: args.user.clone(),
                    day_id: args.day_id.clone(),
                    events: args.payloads()?,
                    position: args.position,
                };
                let created = self.planner.create_events(&params).await?;
                for event in created {
                    self.renderer.render(&CreateResult::new(event).to_string())?;
                }
                Ok(())
            }
            EventCommands::Update(args) => {
                let payload: Value = serde_json::from_str(&args.event)
                    .context("Invalid JSON event payload")?;
                let params = params::UpdateEvent {
                    trip_id: args.trip_id,
                    user_id: args.user,
                    event_id: args.event_id,
                    event: payload,
                };
                let event = self.planner.update_event(&params).await?;
                self.renderer.render(&UpdateResult::new(event).to_string())
            }
            EventCommands::Delete(args) => {
                let event_id = args.event_id.clone();
                self.planner.delete_event(&args.into()).await?;
                self.renderer.render(
                    &OperationStatus::success(format!("Deleted event {event_id}")).to_string(),
                )
            }
            EventCommands::Reorder(args) => {
                let count = args.order.len();
                self.planner.reorder_events(&args.into()).await?;
                self.renderer.render(
                    &OperationStatus::success(format!("Reordered {count} events")).to_string(),
                )
            }
            EventCommands::Show(args) => {
                let event = self
                    .planner
                    .get_event(&args.trip_id, &args.event_id, args.user.as_deref())
                    .await?;
                self.renderer.render(&event.to_string())
            }
        }
    }

    pub async fn show_schedule(&self, args: ScheduleArgs) -> Result<()> {
        let schedule = self.planner.get_schedule(&args.into()).await?;

        let mut body = serde_json::Map::new();
        body.insert("tripId".to_string(), json!(schedule.trip_id));
        if let Some(trip) = schedule.trip {
            body.insert("trip".to_string(), trip);
        }
        body.insert("days".to_string(), Value::Array(schedule.days));
        if let Some(days_list) = schedule.days_list {
            body.insert("daysList".to_string(), Value::Array(days_list));
        }
        body.insert("locations".to_string(), Value::Array(schedule.locations));

        let rendered = serde_json::to_string_pretty(&Value::Object(body))
            .context("Failed to serialize schedule")?;
        println!("{rendered}");
        Ok(())
    }

    pub async fn show_progress(&self, args: ProgressArgs) -> Result<()> {
        let trip_id = args.trip_id.clone();
        let progress = self.planner.get_progress(&args.into()).await?;
        self.renderer
            .render(&format!("Trip {trip_id} progress: {progress}%\n"))
    }
}
