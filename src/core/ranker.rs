use crate::core::distance::distance_between;
use crate::models::{Coordinate, RankedVenue, Venue};
use thiserror::Error;

/// Number of venues shown in the "nearby" section by default
pub const DEFAULT_NEAREST_LIMIT: usize = 3;

/// Errors raised for malformed ranking input
#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("Invalid {field} for {subject}: {value}")]
    InvalidCoordinate {
        subject: String,
        field: &'static str,
        value: f64,
    },
}

/// Output of a proximity ranking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityRanking {
    /// Every input venue with its distance, in input order
    pub all: Vec<RankedVenue>,
    /// The closest venues, ascending by distance
    pub nearest: Vec<RankedVenue>,
}

/// Ranks venues by great-circle distance from a user coordinate
///
/// Pure and stateless apart from the configured `nearest_limit`; safe to
/// share between workers.
#[derive(Debug, Clone, Copy)]
pub struct ProximityRanker {
    nearest_limit: usize,
}

impl ProximityRanker {
    pub fn new(nearest_limit: usize) -> Self {
        Self { nearest_limit }
    }

    pub fn nearest_limit(&self) -> usize {
        self.nearest_limit
    }

    /// Annotate every venue with its distance from `user` and pick the
    /// nearest ones
    ///
    /// Ordering uses the full-precision distance. Venues at exactly the same
    /// distance keep their input order.
    ///
    /// # Errors
    /// `RankError::InvalidCoordinate` if the user or any venue has a
    /// non-finite or out-of-range coordinate.
    pub fn rank(&self, user: Coordinate, venues: &[Venue]) -> Result<ProximityRanking, RankError> {
        validate_coordinate(&user, "user location")?;

        let all = venues
            .iter()
            .enumerate()
            .map(|(position, venue)| -> Result<RankedVenue, RankError> {
                let coordinate = venue.coordinate();
                validate_coordinate(&coordinate, &venue.name)?;
                Ok(RankedVenue {
                    venue: venue.clone(),
                    distance_km: distance_between(&user, &coordinate),
                    position,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // sort_by is stable, so equal distances stay in input order
        let mut order: Vec<usize> = (0..all.len()).collect();
        order.sort_by(|&a, &b| all[a].distance_km.total_cmp(&all[b].distance_km));

        let nearest = order
            .into_iter()
            .take(self.nearest_limit)
            .map(|idx| all[idx].clone())
            .collect();

        tracing::trace!(
            "Ranked {} venues from {} (nearest limit {})",
            all.len(),
            user,
            self.nearest_limit
        );

        Ok(ProximityRanking { all, nearest })
    }
}

impl Default for ProximityRanker {
    fn default() -> Self {
        Self::new(DEFAULT_NEAREST_LIMIT)
    }
}

/// Rank `venues` by distance from `user`, keeping the three nearest
pub fn rank_by_proximity(user: Coordinate, venues: &[Venue]) -> Result<ProximityRanking, RankError> {
    ProximityRanker::default().rank(user, venues)
}

/// Reject NaN, infinite and out-of-range latitude/longitude values
pub fn validate_coordinate(coordinate: &Coordinate, subject: &str) -> Result<(), RankError> {
    check_component(coordinate.latitude, 90.0, "latitude", subject)?;
    check_component(coordinate.longitude, 180.0, "longitude", subject)
}

fn check_component(value: f64, bound: f64, field: &'static str, subject: &str) -> Result<(), RankError> {
    if value.is_finite() && value.abs() <= bound {
        Ok(())
    } else {
        Err(RankError::InvalidCoordinate {
            subject: subject.to_string(),
            field,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(name: &str, lat: f64, lon: f64) -> Venue {
        Venue::new(name, lat, lon)
    }

    fn names(ranked: &[RankedVenue]) -> Vec<&str> {
        ranked.iter().map(|r| r.venue.name.as_str()).collect()
    }

    #[test]
    fn test_rank_picks_three_nearest() {
        let venues = vec![
            venue("Maastricht", 50.8514, 5.6910),
            venue("Amsterdam", 52.3676, 4.9041),
            venue("Rotterdam", 51.9244, 4.4777),
            venue("Utrecht", 52.0907, 5.1214),
        ];

        let ranking = rank_by_proximity(Coordinate::FALLBACK, &venues).unwrap();

        assert_eq!(names(&ranking.all), ["Maastricht", "Amsterdam", "Rotterdam", "Utrecht"]);
        assert_eq!(names(&ranking.nearest), ["Utrecht", "Amsterdam", "Rotterdam"]);
        assert_eq!(ranking.nearest[0].position, 3);
    }

    #[test]
    fn test_equal_distances_keep_input_order() {
        let venues = vec![
            venue("second", 52.0, 5.0),
            venue("first", 52.0, 5.0),
            venue("far", 40.0, 5.0),
            venue("third", 52.0, 5.0),
        ];

        let ranking = rank_by_proximity(Coordinate::new(52.5, 5.0), &venues).unwrap();
        assert_eq!(names(&ranking.nearest), ["second", "first", "third"]);
    }

    #[test]
    fn test_full_precision_breaks_display_ties() {
        // Both round to the same display distance; the closer one still wins.
        let user = Coordinate::new(0.0, 0.0);
        let venues = vec![venue("b", 0.0, 0.10004), venue("a", 0.0, 0.10001)];

        let ranking = rank_by_proximity(user, &venues).unwrap();
        assert_eq!(ranking.all[0].display_distance(), ranking.all[1].display_distance());
        assert_eq!(names(&ranking.nearest), ["a", "b"]);
    }

    #[test]
    fn test_custom_limit() {
        let venues: Vec<Venue> = (0..10)
            .map(|i| venue(&i.to_string(), 52.0 + i as f64 * 0.01, 5.0))
            .collect();

        let ranking = ProximityRanker::new(5).rank(Coordinate::new(52.0, 5.0), &venues).unwrap();
        assert_eq!(ranking.nearest.len(), 5);
        assert_eq!(names(&ranking.nearest), ["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_rejects_nan_user() {
        let err = rank_by_proximity(Coordinate::new(f64::NAN, 5.0), &[venue("a", 52.0, 5.0)])
            .unwrap_err();
        assert!(matches!(err, RankError::InvalidCoordinate { field: "latitude", .. }));
    }

    #[test]
    fn test_rejects_bad_venue() {
        let venues = vec![venue("ok", 52.0, 5.0), venue("broken", 52.0, f64::INFINITY)];
        let err = rank_by_proximity(Coordinate::FALLBACK, &venues).unwrap_err();
        match err {
            RankError::InvalidCoordinate { subject, field, .. } => {
                assert_eq!(subject, "broken");
                assert_eq!(field, "longitude");
            }
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(validate_coordinate(&Coordinate::new(91.0, 0.0), "x").is_err());
        assert!(validate_coordinate(&Coordinate::new(0.0, -180.5), "x").is_err());
        assert!(validate_coordinate(&Coordinate::new(-90.0, 180.0), "x").is_ok());
    }
}
