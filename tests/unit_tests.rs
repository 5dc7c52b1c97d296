// Unit tests for Pizzeria Hotspots

use pizzeria_hotspots::core::{
    distance::{distance_between, haversine_distance},
    filters::{filter_venues, matches_search},
    ranker::{rank_by_proximity, ProximityRanker, RankError},
    rating::{synthesize_rating, SeededSource},
};
use pizzeria_hotspots::models::{Coordinate, FavoritesSet, RatingBounds, Venue, VenueFilter};

fn create_test_venue(name: &str, lat: f64, lon: f64) -> Venue {
    Venue::new(name, lat, lon)
}

/// Venues spread around the Netherlands with a deterministic pattern
fn create_test_venues(count: usize) -> Vec<Venue> {
    (0..count)
        .map(|i| {
            let lat = 50.8 + ((i * 37) % 100) as f64 * 0.025;
            let lon = 3.4 + ((i * 53) % 100) as f64 * 0.035;
            create_test_venue(&format!("Pizzeria {}", i), lat, lon)
        })
        .collect()
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(52.1326, 5.2913, 52.1326, 5.2913);
    assert_eq!(distance, 0.0);
}

#[test]
fn test_haversine_distance_symmetric() {
    let pairs = [
        ((52.3676, 4.9041), (52.0907, 5.1214)),
        ((51.9244, 4.4777), (50.8514, 5.6910)),
        ((-33.8688, 151.2093), (40.7128, -74.0060)),
    ];

    for ((lat1, lon1), (lat2, lon2)) in pairs {
        let there = haversine_distance(lat1, lon1, lat2, lon2);
        let back = haversine_distance(lat2, lon2, lat1, lon1);
        assert!((there - back).abs() < 1e-9, "{} != {}", there, back);
    }
}

#[test]
fn test_haversine_amsterdam_to_utrecht() {
    let amsterdam = Coordinate::new(52.3676, 4.9041);
    let utrecht = Coordinate::new(52.0907, 5.1214);

    let distance = distance_between(&amsterdam, &utrecht);
    assert!((distance - 34.16).abs() < 0.05, "got {}", distance);
}

#[test]
fn test_rank_empty_list() {
    let ranking = rank_by_proximity(Coordinate::FALLBACK, &[]).unwrap();
    assert!(ranking.all.is_empty());
    assert!(ranking.nearest.is_empty());
}

#[test]
fn test_rank_single_venue_regardless_of_distance() {
    let venues = vec![create_test_venue("Sydney Slice", -33.8688, 151.2093)];
    let ranking = rank_by_proximity(Coordinate::FALLBACK, &venues).unwrap();

    assert_eq!(ranking.nearest.len(), 1);
    assert_eq!(ranking.nearest[0].venue.name, "Sydney Slice");
    assert!(ranking.nearest[0].distance_km > 16_000.0);
}

#[test]
fn test_same_coordinate_is_zero_km() {
    let venues = vec![create_test_venue("Centre", 52.1326, 5.2913)];
    let ranking = rank_by_proximity(Coordinate::FALLBACK, &venues).unwrap();

    assert_eq!(ranking.all[0].distance_km, 0.0);
    assert_eq!(ranking.all[0].display_distance(), 0.0);
}

#[test]
fn test_nearest_invariants_for_many_sizes() {
    let user = Coordinate::new(52.37, 4.89);

    for count in 0..25 {
        let venues = create_test_venues(count);
        let ranking = rank_by_proximity(user, &venues).unwrap();

        assert_eq!(ranking.all.len(), count);
        assert_eq!(ranking.nearest.len(), count.min(3));

        // Ascending
        assert!(ranking
            .nearest
            .windows(2)
            .all(|w| w[0].distance_km <= w[1].distance_km));

        // Subset of `all`, and nothing left out is closer
        for ranked in &ranking.nearest {
            assert_eq!(&ranking.all[ranked.position], ranked);
        }
        if let Some(farthest_kept) = ranking.nearest.last() {
            let kept: Vec<usize> = ranking.nearest.iter().map(|r| r.position).collect();
            for other in ranking.all.iter().filter(|r| !kept.contains(&r.position)) {
                assert!(other.distance_km >= farthest_kept.distance_km);
            }
        }

        // Non-negative
        assert!(ranking.all.iter().all(|r| r.distance_km >= 0.0));
    }
}

#[test]
fn test_all_keeps_input_order() {
    let venues = create_test_venues(8);
    let ranking = rank_by_proximity(Coordinate::FALLBACK, &venues).unwrap();

    let names: Vec<_> = ranking.all.iter().map(|r| r.venue.name.clone()).collect();
    let expected: Vec<_> = venues.iter().map(|v| v.name.clone()).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_rank_is_idempotent() {
    let venues = create_test_venues(12);
    let ranker = ProximityRanker::default();

    let first = ranker.rank(Coordinate::FALLBACK, &venues).unwrap();
    let second = ranker.rank(Coordinate::FALLBACK, &venues).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rank_rejects_non_finite_input() {
    let venues = vec![create_test_venue("ok", 52.0, 5.0)];

    for user in [
        Coordinate::new(f64::NAN, 5.0),
        Coordinate::new(52.0, f64::INFINITY),
        Coordinate::new(f64::NEG_INFINITY, f64::NAN),
    ] {
        let result = rank_by_proximity(user, &venues);
        assert!(matches!(result, Err(RankError::InvalidCoordinate { .. })));
    }

    let bad_venues = vec![create_test_venue("nan", f64::NAN, 5.0)];
    let err = rank_by_proximity(Coordinate::FALLBACK, &bad_venues).unwrap_err();
    assert!(err.to_string().contains("nan"));
}

#[test]
fn test_search_and_favorites_filter() {
    let mut venues = create_test_venues(3);
    venues[1].city = Some("Den Haag".to_string());

    assert!(matches_search(&venues[1], "haag"));
    assert!(!matches_search(&venues[0], "haag"));

    let mut favorites = FavoritesSet::new();
    favorites.toggle("Pizzeria 2");

    let filter = VenueFilter {
        query: "pizzeria".to_string(),
        favorites_only: true,
    };
    let result = filter_venues(&venues, &filter, &favorites);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "Pizzeria 2");
}

#[test]
fn test_favorites_toggle_twice_is_noop() {
    let mut favorites: FavoritesSet = vec!["A".to_string(), "B".to_string()].into_iter().collect();
    let before = favorites.clone();

    favorites.toggle("C");
    favorites.toggle("C");
    assert_eq!(favorites, before);
}

#[test]
fn test_seeded_ratings() {
    let bounds = RatingBounds::default();
    let a = SeededSource::new(2024);
    let b = SeededSource::new(2024);

    for _ in 0..50 {
        let x = synthesize_rating(&a, bounds);
        let y = synthesize_rating(&b, bounds);
        assert_eq!(x, y);
        assert!(x >= 3.5 && x < 5.0);
    }
}
