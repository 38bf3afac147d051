use std::sync::Arc;

use tracing::{debug, info, warn};
use validator::Validate;

use crate::error::TripPlannerError;
use crate::gateway::{RemoteGateway, ResourcePath, decode, encode};
use crate::types::*;

/// CRUD access to trips and their embedded bookings
#[derive(Clone)]
pub struct TripStore {
    gateway: Arc<dyn RemoteGateway>,
}

impl TripStore {
    /// Creates a store backed by `gateway`
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self { gateway }
    }

    pub(crate) fn gateway(&self) -> &Arc<dyn RemoteGateway> {
        &self.gateway
    }

    /// Lists the current user's trips
    pub async fn list(&self) -> Result<Vec<Trip>, TripPlannerError> {
        let path = ResourcePath::trips();
        let trips: Vec<Trip> = decode(&path, self.gateway.get(&path).await?)?;
        debug!("Fetched {} trips", trips.len());
        Ok(trips)
    }

    /// Fetches a single trip with its bookings
    pub async fn get(&self, id: TripId) -> Result<Trip, TripPlannerError> {
        let path = ResourcePath::trip(id);
        decode(&path, self.gateway.get(&path).await?)
    }

    /// Creates a trip, or edits it when the request carries an id.
    ///
    /// Returns `Ok(None)` without contacting the remote store when the name is
    /// empty or only whitespace, or when the bookings carry an inverted range
    /// or book the same campsite twice on one day.
    pub async fn create_or_edit(
        &self,
        request: &TripRequest,
    ) -> Result<Option<Trip>, TripPlannerError> {
        if let Err(errors) = request.validate() {
            warn!("Rejected trip request: {}", errors);
            return Ok(None);
        }

        let path = ResourcePath::trips();
        let body = encode(request)?;
        let trip: Trip = decode(&path, self.gateway.post(&path, body).await?)?;

        match request.id {
            Some(_) => info!("Updated trip {} ({})", trip.id, trip.name),
            None => info!("Created trip {} ({})", trip.id, trip.name),
        }

        Ok(Some(trip))
    }

    /// Deletes a trip; the remote store drops its bookings with it
    pub async fn delete(&self, id: TripId) -> Result<Confirmation, TripPlannerError> {
        let path = ResourcePath::trip(id);
        let body = self.gateway.delete(&path).await?;
        info!("Deleted trip {}", id);
        Ok(Confirmation::from_body(body))
    }
}
