// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    round_one_decimal, AppPreferences, Coordinate, FavoritesSet, Language, LocationSource,
    PreferenceError, RankedVenue, RatingBounds, Venue, VenueFilter,
};
pub use requests::{DeviceQuery, ListQuery, NearbyQuery, ToggleFavoriteRequest, UpdatePreferencesRequest};
pub use responses::{
    ErrorResponse, FavoritesResponse, HealthResponse, ListResponse, ListedVenue, NearbyResponse,
    NearbyVenue, PreferencesResponse,
};
