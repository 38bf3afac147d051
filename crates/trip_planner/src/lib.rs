//! # Trip Planner
//!
//! This crate provides the client-side core of the trip planner: campsite and
//! trip CRUD against the remote data store, and the booking scheduler that
//! keeps a trip from booking the same campsite twice on overlapping dates.

/// Error type shared by every remote operation
mod error;
pub use error::*;

/// Records exchanged with the remote store
mod types;
pub use types::*;

/// Gateway connection settings
mod config;
pub use config::*;

/// Request/response channel to the remote store
mod gateway;
pub use gateway::*;

/// CRUD over campsite records
mod campsite_catalog;
pub use campsite_catalog::*;

/// CRUD over trip records
mod trip_store;
pub use trip_store::*;

/// Booking add/remove with overlap enforcement
mod booking_scheduler;
pub use booking_scheduler::*;

/// All components wired to one gateway
mod planner;
pub use planner::*;

#[cfg(test)]
mod test_support;
