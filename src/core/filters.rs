use crate::models::{FavoritesSet, Venue, VenueFilter};

/// Check whether a venue matches a free-text search
///
/// Case-insensitive substring match on name, city and province. The query
/// is used as typed: an empty query matches everything, whitespace counts.
#[inline]
pub fn matches_search(venue: &Venue, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();

    let contains = |field: Option<&str>| {
        field
            .map(|value| value.to_lowercase().contains(&query))
            .unwrap_or(false)
    };

    contains(Some(venue.name.as_str())) || contains(venue.city.as_deref()) || contains(venue.province.as_deref())
}

/// Apply the favorites filter and then the search filter
///
/// Input order is preserved.
pub fn filter_venues<'a>(
    venues: &'a [Venue],
    filter: &VenueFilter,
    favorites: &FavoritesSet,
) -> Vec<&'a Venue> {
    venues
        .iter()
        .filter(|venue| !filter.favorites_only || favorites.contains(&venue.name))
        .filter(|venue| matches_search(venue, &filter.query))
        .collect()
}
