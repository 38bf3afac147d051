use std::sync::Arc;

use tracing::{debug, info};

use crate::error::TripPlannerError;
use crate::gateway::{RemoteGateway, ResourcePath, decode, encode};
use crate::types::*;

/// CRUD access to the campsite catalog.
///
/// Fields pass through as given; nothing here checks whether a campsite is
/// referenced by a trip.
#[derive(Clone)]
pub struct CampsiteCatalog {
    gateway: Arc<dyn RemoteGateway>,
}

impl CampsiteCatalog {
    /// Creates a catalog backed by `gateway`
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self { gateway }
    }

    /// Lists every campsite visible to the current user
    pub async fn list(&self) -> Result<Vec<Campsite>, TripPlannerError> {
        let path = ResourcePath::campsites();
        let campsites: Vec<Campsite> = decode(&path, self.gateway.get(&path).await?)?;
        debug!("Fetched {} campsites", campsites.len());
        Ok(campsites)
    }

    /// Fetches a single campsite
    pub async fn get(&self, id: CampsiteId) -> Result<Campsite, TripPlannerError> {
        let path = ResourcePath::campsite(id);
        decode(&path, self.gateway.get(&path).await?)
    }

    /// Creates a campsite, or edits it when the request carries an id
    pub async fn create_or_edit(
        &self,
        request: &CampsiteRequest,
    ) -> Result<Campsite, TripPlannerError> {
        let path = ResourcePath::campsites();
        let body = encode(request)?;
        let campsite: Campsite = decode(&path, self.gateway.post(&path, body).await?)?;

        match request.id {
            Some(_) => info!("Updated campsite {} ({})", campsite.id, campsite.details.name),
            None => info!("Created campsite {} ({})", campsite.id, campsite.details.name),
        }

        Ok(campsite)
    }

    /// Deletes a campsite. Trips that reference it are left untouched.
    pub async fn delete(&self, id: CampsiteId) -> Result<Confirmation, TripPlannerError> {
        let path = ResourcePath::campsite(id);
        let body = self.gateway.delete(&path).await?;
        info!("Deleted campsite {}", id);
        Ok(Confirmation::from_body(body))
    }
}
