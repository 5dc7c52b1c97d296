use crate::core::{synthesize_rating, ProximityRanker, RankError, RatingSource};
use crate::models::{Coordinate, NearbyVenue, RankedVenue, RatingBounds, Venue};
use crate::services::cache::{CacheKey, ListingCache};
use crate::services::listing::{ListingClient, ListingError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Rank(#[from] RankError),
}

/// Venues ranked for one user location, with display ratings attached
#[derive(Debug, Clone)]
pub struct NearbyVenues {
    pub all: Vec<NearbyVenue>,
    pub nearest: Vec<NearbyVenue>,
}

/// Cached access to the venue listing plus proximity ranking
pub struct VenueCatalog {
    listing: ListingClient,
    cache: ListingCache,
    ranker: ProximityRanker,
    ratings: Arc<dyn RatingSource>,
    rating_bounds: RatingBounds,
}

impl VenueCatalog {
    pub fn new(
        listing: ListingClient,
        cache: ListingCache,
        ranker: ProximityRanker,
        ratings: Arc<dyn RatingSource>,
        rating_bounds: RatingBounds,
    ) -> Self {
        Self {
            listing,
            cache,
            ranker,
            ratings,
            rating_bounds,
        }
    }

    /// All venues in the listing, fetched through the cache
    pub async fn venues(&self) -> Result<Arc<Vec<Venue>>, ListingError> {
        let key = CacheKey::listing(self.listing.url());

        if let Some(venues) = self.cache.get(&key).await {
            return Ok(venues);
        }

        let venues = Arc::new(self.listing.fetch_venues().await?);
        self.cache.set(&key, venues.clone()).await;

        tracing::info!("Loaded {} venues from listing", venues.len());
        Ok(venues)
    }

    /// Drop the cached listing so the next call re-fetches it
    pub async fn invalidate(&self) {
        self.cache.delete(&CacheKey::listing(self.listing.url())).await;
    }

    /// Rank the listing against `user` and attach a rating to each venue
    ///
    /// A venue has the same rating in `all` and `nearest`.
    pub async fn nearby(&self, user: Coordinate) -> Result<NearbyVenues, CatalogError> {
        let venues = self.venues().await?;
        let ranking = self.ranker.rank(user, &venues)?;

        let ratings: Vec<f64> = ranking
            .all
            .iter()
            .map(|_| synthesize_rating(self.ratings.as_ref(), self.rating_bounds))
            .collect();

        let annotate = |ranked: RankedVenue| {
            let distance = ranked.display_distance();
            NearbyVenue::new(ranked.venue, distance, ratings[ranked.position])
        };

        let nearest = ranking.nearest.into_iter().map(annotate).collect();
        let all = ranking.all.into_iter().map(annotate).collect();

        Ok(NearbyVenues { all, nearest })
    }
}
