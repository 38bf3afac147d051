//! Adds and removes campsite bookings on trips.
//!
//! Adding a booking reads the trip, checks the candidate against the trip's
//! existing bookings and only then writes. Nothing guards the gap between the
//! read and the write: two concurrent `add_booking` calls on the same trip can
//! both pass the check. The remote store has the final say.

use std::fmt;

use chrono::NaiveDate;
use tracing::{info, warn};
use validator::Validate;

use crate::error::TripPlannerError;
use crate::gateway::{ResourcePath, decode, encode};
use crate::trip_store::TripStore;
use crate::types::*;

/// Why a candidate booking was not written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingRejection {
    /// The end date falls before the start date
    InvalidRange {
        /// Requested arrival day
        start: NaiveDate,
        /// Requested departure day
        end: NaiveDate,
    },

    /// The trip already books the same campsite on at least one of the days
    Overlap {
        /// The booking the candidate collides with
        existing: CampsiteBooking,
    },
}

impl fmt::Display for BookingRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingRejection::InvalidRange { start, end } => {
                write!(f, "end date {} is before start date {}", end, start)
            }
            BookingRejection::Overlap { existing } => write!(
                f,
                "campsite {} is already booked from {} to {}",
                existing.campsite_id, existing.start_date, existing.end_date
            ),
        }
    }
}

/// Result of [`BookingScheduler::add_booking`].
///
/// A `Rejected` outcome guarantees that no write reached the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// The booking was written; holds the trip as the remote store returned it
    Committed(Trip),
    /// The booking was refused locally
    Rejected(BookingRejection),
}

impl BookingOutcome {
    /// The updated trip, or `None` if the booking was rejected
    pub fn into_trip(self) -> Option<Trip> {
        match self {
            BookingOutcome::Committed(trip) => Some(trip),
            BookingOutcome::Rejected(_) => None,
        }
    }

    /// Whether the booking was written
    pub fn is_committed(&self) -> bool {
        matches!(self, BookingOutcome::Committed(_))
    }
}

/// First booking in `trip` that occupies `campsite_id` on any day of `range`
pub fn find_conflict<'a>(
    trip: &'a Trip,
    campsite_id: CampsiteId,
    range: &DateRange,
) -> Option<&'a CampsiteBooking> {
    trip.bookings
        .iter()
        .find(|booking| booking.conflicts_with(campsite_id, range))
}

/// Manages the association between trips and campsites
#[derive(Clone)]
pub struct BookingScheduler {
    trips: TripStore,
}

impl BookingScheduler {
    /// Creates a scheduler that reads trips through `trips` and writes
    /// through the same gateway
    pub fn new(trips: TripStore) -> Self {
        Self { trips }
    }

    /// Adds a booking to a trip unless it overlaps an existing booking of the
    /// same campsite.
    ///
    /// Inverted date ranges are rejected before any network call. Overlaps are
    /// detected after reading the current trip and are rejected without a
    /// write. Transport failures from either step are returned as errors.
    pub async fn add_booking(
        &self,
        trip_id: TripId,
        request: BookingRequest,
    ) -> Result<BookingOutcome, TripPlannerError> {
        let Some(range) = request.validate().ok().and_then(|()| request.range()) else {
            warn!(
                "Rejected booking of campsite {} on trip {}: {} is before {}",
                request.campsite_id, trip_id, request.end_date, request.start_date
            );
            return Ok(BookingOutcome::Rejected(BookingRejection::InvalidRange {
                start: request.start_date,
                end: request.end_date,
            }));
        };

        let trip = self.trips.get(trip_id).await?;

        if let Some(existing) = find_conflict(&trip, request.campsite_id, &range) {
            warn!(
                "Rejected booking of campsite {} on trip {} for {}: overlaps {}..{}",
                request.campsite_id, trip_id, range, existing.start_date, existing.end_date
            );
            return Ok(BookingOutcome::Rejected(BookingRejection::Overlap {
                existing: existing.clone(),
            }));
        }

        let path = ResourcePath::trip_bookings(trip_id);
        let body = encode(&request)?;
        let updated: Trip = decode(&path, self.trips.gateway().post(&path, body).await?)?;

        info!(
            "Booked campsite {} on trip {} for {} ({} nights)",
            request.campsite_id,
            trip_id,
            range,
            range.nights()
        );

        Ok(BookingOutcome::Committed(updated))
    }

    /// Removes the booking of `campsite_id` from a trip and returns the
    /// updated trip.
    ///
    /// Only the campsite id is sent. When the trip books that campsite more
    /// than once, the remote store decides which entry goes.
    pub async fn remove_booking(
        &self,
        trip_id: TripId,
        campsite_id: CampsiteId,
    ) -> Result<Trip, TripPlannerError> {
        let path = ResourcePath::trip_booking(trip_id, campsite_id);
        let trip: Trip = decode(&path, self.trips.gateway().delete(&path).await?)?;
        info!("Removed campsite {} from trip {}", campsite_id, trip_id);
        Ok(trip)
    }
}
