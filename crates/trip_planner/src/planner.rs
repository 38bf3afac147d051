use std::sync::Arc;

use crate::booking_scheduler::BookingScheduler;
use crate::campsite_catalog::CampsiteCatalog;
use crate::config::GatewayConfig;
use crate::error::TripPlannerError;
use crate::gateway::{HttpGateway, RemoteGateway};
use crate::trip_store::TripStore;

/// The three components wired to one shared gateway
#[derive(Clone)]
pub struct TripPlanner {
    /// Campsite CRUD
    pub campsites: CampsiteCatalog,
    /// Trip CRUD
    pub trips: TripStore,
    /// Trip-to-campsite bookings
    pub bookings: BookingScheduler,
}

impl TripPlanner {
    /// Wires every component to `gateway`
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        let trips = TripStore::new(gateway.clone());
        Self {
            campsites: CampsiteCatalog::new(gateway),
            bookings: BookingScheduler::new(trips.clone()),
            trips,
        }
    }

    /// Builds an HTTP gateway from `config` and wires every component to it
    pub fn connect(config: GatewayConfig) -> Result<Self, TripPlannerError> {
        let gateway = HttpGateway::new(config)?;
        Ok(Self::new(Arc::new(gateway)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Method;
    use crate::test_support::*;
    use crate::types::*;

    #[tokio::test]
    async fn test_components_share_one_gateway() {
        let gateway = Arc::new(InMemoryGateway::new());
        let planner = TripPlanner::new(gateway.clone());

        let campsite = planner
            .campsites
            .create_or_edit(&CampsiteRequest::create(sample_campsite_details()))
            .await
            .unwrap();
        let trip = planner
            .trips
            .create_or_edit(&TripRequest::create("Coast"))
            .await
            .unwrap()
            .unwrap();

        let outcome = planner
            .bookings
            .add_booking(
                trip.id,
                BookingRequest::new(campsite.id, day("2026-03-01"), day("2026-03-03"), None),
            )
            .await
            .unwrap();
        assert!(outcome.is_committed());

        let trip = planner.trips.get(trip.id).await.unwrap();
        assert_eq!(trip.bookings.len(), 1);
        assert_eq!(trip.bookings[0].campsite_id, campsite.id);
        assert_eq!(gateway.calls(Method::Post), 3);
    }

    #[tokio::test]
    async fn test_deleting_trip_drops_its_bookings() {
        let gateway = Arc::new(InMemoryGateway::new());
        gateway.seed_trip(sample_trip_1());
        let planner = TripPlanner::new(gateway.clone());

        planner.trips.delete(TripId(1)).await.unwrap();

        assert_eq!(
            planner.trips.get(TripId(1)).await.unwrap_err(),
            TripPlannerError::NotFound
        );
        let err = planner
            .bookings
            .remove_booking(TripId(1), CampsiteId(1))
            .await
            .unwrap_err();
        assert_eq!(err, TripPlannerError::NotFound);
    }

    #[test]
    fn test_connect_with_default_config() {
        assert!(TripPlanner::connect(GatewayConfig::default()).is_ok());
    }
}
