// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod ranker;
pub mod rating;

pub use distance::{distance_between, haversine_distance, EARTH_RADIUS_KM};
pub use filters::{filter_venues, matches_search};
pub use ranker::{rank_by_proximity, validate_coordinate, ProximityRanker, ProximityRanking, RankError};
pub use rating::{synthesize_rating, RatingSource, SeededSource, ThreadRngSource};
