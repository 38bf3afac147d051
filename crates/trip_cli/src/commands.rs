use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use trip_planner::{
    BookingOutcome, BookingRequest, CampsiteId, CampsiteRequest, TripId, TripPlanner, TripRequest,
};

/// Top-level command groups
#[derive(Subcommand)]
pub enum Command {
    /// Campsite catalog commands
    #[command(subcommand)]
    Campsites(CampsiteCommand),

    /// Trip commands
    #[command(subcommand)]
    Trips(TripCommand),

    /// Add or remove campsite bookings on a trip
    #[command(subcommand)]
    Bookings(BookingCommand),
}

/// Campsite catalog commands
#[derive(Subcommand)]
pub enum CampsiteCommand {
    /// List all campsites
    List,
    /// Show a single campsite
    Show {
        /// Campsite id
        id: CampsiteId,
    },
    /// Create or edit a campsite from a JSON file
    Save {
        /// Path to a JSON campsite body (include "id" to edit)
        file: PathBuf,
    },
    /// Delete a campsite
    Delete {
        /// Campsite id
        id: CampsiteId,
    },
}

/// Trip commands
#[derive(Subcommand)]
pub enum TripCommand {
    /// List all trips
    List,
    /// Show a trip and its bookings
    Show {
        /// Trip id
        id: TripId,
    },
    /// Create an empty trip
    Create {
        /// Trip name
        name: String,
    },
    /// Rename a trip, keeping its bookings
    Rename {
        /// Trip id
        id: TripId,
        /// New name
        name: String,
    },
    /// Delete a trip and all of its bookings
    Delete {
        /// Trip id
        id: TripId,
    },
}

/// Booking commands
#[derive(Subcommand)]
pub enum BookingCommand {
    /// Book a campsite on a trip for a date range
    Add(AddBooking),
    /// Remove a campsite's booking from a trip
    Remove {
        /// Trip id
        trip_id: TripId,
        /// Campsite id
        campsite_id: CampsiteId,
    },
}

/// Arguments for `bookings add`
#[derive(Args)]
pub struct AddBooking {
    /// Trip id
    trip_id: TripId,
    /// Campsite id
    campsite_id: CampsiteId,
    /// Arrival day (YYYY-MM-DD)
    start_date: NaiveDate,
    /// Departure day (YYYY-MM-DD)
    end_date: NaiveDate,
    /// Free-text notes
    #[arg(long)]
    notes: Option<String>,
}

impl Command {
    /// Runs the command against `planner`
    pub async fn execute(self, planner: &TripPlanner) -> anyhow::Result<()> {
        match self {
            Command::Campsites(cmd) => cmd.execute(planner).await,
            Command::Trips(cmd) => cmd.execute(planner).await,
            Command::Bookings(cmd) => cmd.execute(planner).await,
        }
    }
}

impl CampsiteCommand {
    async fn execute(self, planner: &TripPlanner) -> anyhow::Result<()> {
        let catalog = &planner.campsites;

        match self {
            CampsiteCommand::List => print_json(&catalog.list().await?),
            CampsiteCommand::Show { id } => print_json(&catalog.get(id).await?),
            CampsiteCommand::Save { file } => {
                let raw = std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?;
                let request: CampsiteRequest = serde_json::from_str(&raw)
                    .with_context(|| format!("parsing campsite from {}", file.display()))?;
                print_json(&catalog.create_or_edit(&request).await?)
            }
            CampsiteCommand::Delete { id } => {
                let confirmation = catalog.delete(id).await?;
                println!(
                    "{}",
                    confirmation
                        .message
                        .unwrap_or_else(|| format!("Campsite {} deleted", id))
                );
                Ok(())
            }
        }
    }
}

impl TripCommand {
    async fn execute(self, planner: &TripPlanner) -> anyhow::Result<()> {
        let trips = &planner.trips;

        match self {
            TripCommand::List => print_json(&trips.list().await?),
            TripCommand::Show { id } => print_json(&trips.get(id).await?),
            TripCommand::Create { name } => match trips.create_or_edit(&TripRequest::create(name)).await? {
                Some(trip) => print_json(&trip),
                None => bail!("Trip name is required"),
            },
            TripCommand::Rename { id, name } => {
                let mut request = trips.get(id).await?.to_request();
                request.name = name;
                match trips.create_or_edit(&request).await? {
                    Some(trip) => print_json(&trip),
                    None => bail!("Trip name is required"),
                }
            }
            TripCommand::Delete { id } => {
                let confirmation = trips.delete(id).await?;
                println!(
                    "{}",
                    confirmation
                        .message
                        .unwrap_or_else(|| format!("Trip {} deleted", id))
                );
                Ok(())
            }
        }
    }
}

impl BookingCommand {
    async fn execute(self, planner: &TripPlanner) -> anyhow::Result<()> {
        let scheduler = &planner.bookings;

        match self {
            BookingCommand::Add(args) => {
                let request = BookingRequest::new(
                    args.campsite_id,
                    args.start_date,
                    args.end_date,
                    args.notes,
                );
                match scheduler.add_booking(args.trip_id, request).await? {
                    BookingOutcome::Committed(trip) => print_json(&trip),
                    BookingOutcome::Rejected(reason) => bail!("Booking rejected: {}", reason),
                }
            }
            BookingCommand::Remove {
                trip_id,
                campsite_id,
            } => print_json(&scheduler.remove_booking(trip_id, campsite_id).await?),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
