//! In-memory stand-in for the remote store, used by unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::error::TripPlannerError;
use crate::gateway::{Method, RemoteGateway, ResourcePath, decode, encode};
use crate::types::*;

#[derive(Default)]
struct StoreState {
    next_id: i64,
    campsites: BTreeMap<CampsiteId, Campsite>,
    trips: BTreeMap<TripId, Trip>,
}

impl StoreState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Gateway double that behaves like the remote store and records every call
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<StoreState>,
    calls: Mutex<Vec<(Method, String)>>,
    failures: Mutex<HashMap<(Method, String), TripPlannerError>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a trip as if the remote store already had it
    pub fn seed_trip(&self, trip: Trip) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(trip.id.0);
        state.trips.insert(trip.id, trip);
    }

    /// Store a campsite as if the remote store already had it
    pub fn seed_campsite(&self, campsite: Campsite) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(campsite.id.0);
        state.campsites.insert(campsite.id, campsite);
    }

    /// Make the next `method` call on `path` fail with `error`
    pub fn fail_next(&self, method: Method, path: &ResourcePath, error: TripPlannerError) {
        self.failures
            .lock()
            .unwrap()
            .insert((method, path.to_string()), error);
    }

    /// Number of calls made with `method`
    pub fn calls(&self, method: Method) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| *m == method)
            .count()
    }

    /// Number of POST and DELETE calls
    pub fn writes(&self) -> usize {
        self.calls(Method::Post) + self.calls(Method::Delete)
    }

    /// Every call in order, as `"METHOD /path"`
    pub fn call_log(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(method, path)| format!("{} {}", method, path))
            .collect()
    }

    fn record(&self, method: Method, path: &ResourcePath) -> Result<(), TripPlannerError> {
        self.calls.lock().unwrap().push((method, path.to_string()));
        match self
            .failures
            .lock()
            .unwrap()
            .remove(&(method, path.to_string()))
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn route(&self, method: Method, path: &ResourcePath, body: Value) -> Result<Value, TripPlannerError> {
        let segments: Vec<&str> = path.segments().collect();
        let mut state = self.state.lock().unwrap();

        match (method, segments.as_slice()) {
            (Method::Get, ["campsites"]) => encode(&state.campsites.values().collect::<Vec<_>>()),
            (Method::Get, ["campsites", id]) => {
                let id = parse_id(id)?;
                state
                    .campsites
                    .get(&CampsiteId(id))
                    .map(encode)
                    .unwrap_or(Err(TripPlannerError::NotFound))
            }
            (Method::Post, ["campsites"]) => {
                let request: CampsiteRequest = decode(path, body)?;
                let id = match request.id {
                    Some(id) if state.campsites.contains_key(&id) => id,
                    Some(_) => return Err(TripPlannerError::NotFound),
                    None => CampsiteId(state.allocate_id()),
                };
                let campsite = Campsite {
                    id,
                    details: request.details,
                };
                state.campsites.insert(id, campsite.clone());
                encode(&campsite)
            }
            (Method::Delete, ["campsites", id]) => {
                let id = parse_id(id)?;
                state
                    .campsites
                    .remove(&CampsiteId(id))
                    .map(|_| json!({"message": "Campsite deleted"}))
                    .ok_or(TripPlannerError::NotFound)
            }
            (Method::Get, ["trips"]) => encode(&state.trips.values().collect::<Vec<_>>()),
            (Method::Get, ["trips", id]) => {
                let id = parse_id(id)?;
                state
                    .trips
                    .get(&TripId(id))
                    .map(encode)
                    .unwrap_or(Err(TripPlannerError::NotFound))
            }
            (Method::Post, ["trips"]) => {
                let request: TripRequest = decode(path, body)?;
                let id = match request.id {
                    Some(id) if state.trips.contains_key(&id) => id,
                    Some(_) => return Err(TripPlannerError::NotFound),
                    None => TripId(state.allocate_id()),
                };
                let trip = Trip {
                    id,
                    name: request.name,
                    bookings: request.bookings,
                };
                state.trips.insert(id, trip.clone());
                encode(&trip)
            }
            (Method::Delete, ["trips", id]) => {
                let id = parse_id(id)?;
                state
                    .trips
                    .remove(&TripId(id))
                    .map(|_| json!({"message": "Trip deleted"}))
                    .ok_or(TripPlannerError::NotFound)
            }
            (Method::Post, ["trips", id, "campsites"]) => {
                let id = parse_id(id)?;
                let request: BookingRequest = decode(path, body)?;
                let trip = state
                    .trips
                    .get_mut(&TripId(id))
                    .ok_or(TripPlannerError::NotFound)?;
                trip.bookings.push(request.into());
                encode(&*trip)
            }
            (Method::Delete, ["trips", id, "campsites", campsite_id]) => {
                let id = parse_id(id)?;
                let campsite_id = CampsiteId(parse_id(campsite_id)?);
                let trip = state
                    .trips
                    .get_mut(&TripId(id))
                    .ok_or(TripPlannerError::NotFound)?;
                let position = trip
                    .bookings
                    .iter()
                    .position(|booking| booking.campsite_id == campsite_id)
                    .ok_or(TripPlannerError::NotFound)?;
                trip.bookings.remove(position);
                encode(&*trip)
            }
            _ => Err(TripPlannerError::from_status(405, None)),
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, TripPlannerError> {
    raw.parse().map_err(|_| TripPlannerError::NotFound)
}

#[async_trait::async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn get(&self, path: &ResourcePath) -> Result<Value, TripPlannerError> {
        self.record(Method::Get, path)?;
        self.route(Method::Get, path, Value::Null)
    }

    async fn post(&self, path: &ResourcePath, body: Value) -> Result<Value, TripPlannerError> {
        self.record(Method::Post, path)?;
        self.route(Method::Post, path, body)
    }

    async fn delete(&self, path: &ResourcePath) -> Result<Value, TripPlannerError> {
        self.record(Method::Delete, path)?;
        self.route(Method::Delete, path, Value::Null)
    }
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn booking(campsite_id: i64, start: &str, end: &str) -> CampsiteBooking {
    CampsiteBooking {
        campsite_id: CampsiteId(campsite_id),
        start_date: day(start),
        end_date: day(end),
        notes: Some("Notes here".to_string()),
    }
}

/// "Trip 1": one booking of campsite 1 from 2026-03-01 to 2026-03-03
pub fn sample_trip_1() -> Trip {
    Trip {
        id: TripId(1),
        name: "Trip 1".to_string(),
        bookings: vec![booking(1, "2026-03-01", "2026-03-03")],
    }
}

/// "Trip 2": no bookings
pub fn sample_trip_2() -> Trip {
    Trip {
        id: TripId(2),
        name: "Trip 2".to_string(),
        bookings: Vec::new(),
    }
}

pub fn sample_campsite_details() -> CampsiteDetails {
    CampsiteDetails {
        name: "Campsite 1".to_string(),
        latitude: 45.72,
        longitude: -123.94,
        campsite_type: "State Park".to_string(),
        campsite_identifier: Some("NB-12".to_string()),
        is_public: true,
        dump_available: true,
        electric_hookup: true,
        water_available: true,
        restroom_available: true,
        shower_available: false,
        pets_allowed: true,
        wifi_available: false,
        cell_carrier: Some("Verizon".to_string()),
        cell_quality: Some(3),
        nearby_recreation: Some("Hiking".to_string()),
    }
}
