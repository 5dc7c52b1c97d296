// Service exports
pub mod cache;
pub mod catalog;
pub mod listing;
pub mod store;

pub use cache::{CacheKey, ListingCache};
pub use catalog::{CatalogError, NearbyVenues, VenueCatalog};
pub use listing::{ListingClient, ListingError};
pub use store::{SettingsStore, StoreError};
