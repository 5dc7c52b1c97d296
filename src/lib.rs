//! Pizzeria Hotspots - listing and proximity service for the Pizzeria Hotspots app
//!
//! The core is a pure proximity ranker: haversine distance from the user to
//! every venue, plus the three nearest in ascending order. Around it sit the
//! listing client, a settings store for favorites and display preferences,
//! and the HTTP routes.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{haversine_distance, rank_by_proximity, ProximityRanker, ProximityRanking, RankError};
pub use models::{Coordinate, FavoritesSet, RankedVenue, Venue};
