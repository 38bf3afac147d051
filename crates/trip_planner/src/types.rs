use std::borrow::Cow;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

record_id!(
    /// Server-assigned identifier of a trip
    TripId
);

record_id!(
    /// Server-assigned identifier of a campsite
    CampsiteId
);

/// Descriptive, editable attributes of a campsite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampsiteDetails {
    /// Display name
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Site classification, e.g. "State Park" or "Dispersed"
    pub campsite_type: String,
    /// Site label within the campground, e.g. "NB-12"
    #[serde(default)]
    pub campsite_identifier: Option<String>,
    /// Whether the site is visible to every user
    pub is_public: bool,
    /// RV dump station on site
    pub dump_available: bool,
    /// Electric hookup on site
    pub electric_hookup: bool,
    /// Potable water on site
    pub water_available: bool,
    /// Restrooms on site
    pub restroom_available: bool,
    /// Showers on site
    pub shower_available: bool,
    /// Pets allowed
    pub pets_allowed: bool,
    /// Wifi on site
    pub wifi_available: bool,
    /// Cellular carrier with coverage at the site
    #[serde(default)]
    pub cell_carrier: Option<String>,
    /// Signal quality rating for `cell_carrier`
    #[serde(default)]
    pub cell_quality: Option<u8>,
    /// Free text describing recreation nearby
    #[serde(default)]
    pub nearby_recreation: Option<String>,
}

/// A campsite record as stored by the remote catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campsite {
    /// Stable identifier assigned by the remote store
    pub id: CampsiteId,
    /// Editable attributes
    #[serde(flatten)]
    pub details: CampsiteDetails,
}

impl Campsite {
    /// Builds an edit request carrying this campsite's identity
    pub fn to_request(&self) -> CampsiteRequest {
        CampsiteRequest {
            id: Some(self.id),
            details: self.details.clone(),
        }
    }
}

/// Body of a create-or-edit campsite request
///
/// Without an `id` the remote store creates a new campsite; with one it
/// replaces the attributes of the existing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampsiteRequest {
    /// Identity of the campsite being edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CampsiteId>,
    /// Attributes to persist
    #[serde(flatten)]
    pub details: CampsiteDetails,
}

impl CampsiteRequest {
    /// Request that creates a new campsite
    pub fn create(details: CampsiteDetails) -> Self {
        Self { id: None, details }
    }
}

/// An inclusive range of calendar days with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `end` falls before `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// First day of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the two ranges share at least one calendar day.
    ///
    /// Boundaries are inclusive, so ranges that only touch on a single day
    /// overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        spans_overlap(self.start, self.end, other.start, other.end)
    }

    /// Number of nights spent, i.e. days between start and end
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

fn spans_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 <= e2 && s2 <= e1
}

/// A stay at a campsite, embedded in a trip's booking sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampsiteBooking {
    /// Campsite being stayed at (not checked for existence)
    pub campsite_id: CampsiteId,
    /// Arrival day
    pub start_date: NaiveDate,
    /// Departure day
    pub end_date: NaiveDate,
    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl CampsiteBooking {
    /// Whether this booking occupies `campsite_id` on any day of `range`.
    ///
    /// Works on the raw dates so that malformed records coming back from the
    /// remote store are still compared.
    pub fn conflicts_with(&self, campsite_id: CampsiteId, range: &DateRange) -> bool {
        self.campsite_id == campsite_id
            && spans_overlap(self.start_date, self.end_date, range.start, range.end)
    }
}

/// A named, ordered collection of campsite bookings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Identifier assigned by the remote store
    pub id: TripId,
    /// Display name
    pub name: String,
    /// Bookings in insertion order
    #[serde(default, alias = "campsites")]
    pub bookings: Vec<CampsiteBooking>,
}

impl Trip {
    /// Bookings that reference `campsite_id`
    pub fn bookings_for(&self, campsite_id: CampsiteId) -> impl Iterator<Item = &CampsiteBooking> {
        self.bookings
            .iter()
            .filter(move |booking| booking.campsite_id == campsite_id)
    }

    /// Builds an edit request carrying this trip's identity
    pub fn to_request(&self) -> TripRequest {
        TripRequest {
            id: Some(self.id),
            name: self.name.clone(),
            bookings: self.bookings.clone(),
        }
    }
}

/// Body of a create-or-edit trip request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_trip_bookings"))]
pub struct TripRequest {
    /// Identity of the trip being edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TripId>,

    /// Trip name; must contain at least one non-whitespace character
    #[validate(custom(function = "validate_trip_name"))]
    pub name: String,

    /// Initial bookings
    #[serde(default, alias = "campsites")]
    pub bookings: Vec<CampsiteBooking>,
}

impl TripRequest {
    /// Request that creates a trip with no bookings
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            bookings: Vec::new(),
        }
    }
}

/// Body of an add-booking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_booking_dates"))]
pub struct BookingRequest {
    /// Campsite to book
    pub campsite_id: CampsiteId,
    /// Arrival day
    pub start_date: NaiveDate,
    /// Departure day
    pub end_date: NaiveDate,
    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Creates a booking request
    pub fn new(
        campsite_id: CampsiteId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        notes: Option<String>,
    ) -> Self {
        Self {
            campsite_id,
            start_date,
            end_date,
            notes,
        }
    }

    /// Requested stay, or `None` if the dates are inverted
    pub fn range(&self) -> Option<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }
}

impl From<BookingRequest> for CampsiteBooking {
    fn from(request: BookingRequest) -> Self {
        CampsiteBooking {
            campsite_id: request.campsite_id,
            start_date: request.start_date,
            end_date: request.end_date,
            notes: request.notes,
        }
    }
}

/// Acknowledgement returned by delete operations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Confirmation {
    /// Human readable message, when the remote store sent one
    pub message: Option<String>,
    /// Raw response body (`Null` when the body was empty)
    pub body: Value,
}

impl Confirmation {
    /// Captures whatever the remote store answered with
    pub fn from_body(body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { message, body }
    }
}

/// Custom validation function for trip names
fn validate_trip_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank_trip_name")
            .with_message(Cow::Borrowed("Trip name is required")));
    }
    Ok(())
}

/// Custom validation function for the bookings carried by a trip request.
///
/// Every booking needs `start <= end`, and no two bookings of the same
/// campsite may share a day.
fn validate_trip_bookings(request: &TripRequest) -> Result<(), ValidationError> {
    let bookings = &request.bookings;

    if bookings
        .iter()
        .any(|booking| booking.start_date > booking.end_date)
    {
        return Err(ValidationError::new("invalid_date_range")
            .with_message(Cow::Borrowed("End date cannot be before start date")));
    }

    for (i, first) in bookings.iter().enumerate() {
        let clash = bookings[i + 1..].iter().any(|second| {
            first.campsite_id == second.campsite_id
                && spans_overlap(
                    first.start_date,
                    first.end_date,
                    second.start_date,
                    second.end_date,
                )
        });
        if clash {
            return Err(ValidationError::new("overlapping_bookings")
                .with_message(Cow::Borrowed("Campsite is booked twice on the same day")));
        }
    }

    Ok(())
}

/// Custom validation function for booking date ranges
fn validate_booking_dates(request: &BookingRequest) -> Result<(), ValidationError> {
    if request.range().is_none() {
        return Err(ValidationError::new("invalid_date_range")
            .with_message(Cow::Borrowed("End date cannot be before start date")));
    }
    Ok(())
}
