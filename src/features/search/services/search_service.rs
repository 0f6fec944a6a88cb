use std::sync::Arc;

use super::directory::{CandidateQuery, ShopDirectory};
use super::map_builder::build_map_view;
use super::ranking::{rank, RankCriteria};
use crate::core::config::SearchConfig;
use crate::features::airports::AirportService;
use crate::features::search::error::SearchError;
use crate::features::search::models::{DistanceUnit, MapView, SearchFilters, SearchResult};

/// Runs shop searches against a [`ShopDirectory`]
pub struct SearchService {
    directory: Arc<dyn ShopDirectory>,
    airports: Arc<AirportService>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(
        directory: Arc<dyn ShopDirectory>,
        airports: Arc<AirportService>,
        config: SearchConfig,
    ) -> Self {
        Self {
            directory,
            airports,
            config,
        }
    }

    /// Ranked shops matching `filters`. An unknown airport is an error,
    /// never an empty result.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<SearchResult>, SearchError> {
        if !filters.min_rating.is_finite() || !(0.0..=5.0).contains(&filters.min_rating) {
            return Err(SearchError::InvalidInput(
                "minRating must be between 0 and 5".to_string(),
            ));
        }

        let airport_code = filters
            .airport_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());

        let (origin, radius_meters) = match airport_code {
            Some(code) => {
                let airport = self
                    .airports
                    .resolve(code)
                    .ok_or_else(|| SearchError::NotFound(code.to_uppercase()))?;
                let radius = filters.radius.unwrap_or(self.config.default_radius);
                let radius_meters = self.radius_to_meters(radius, filters.unit)?;
                (Some(airport.location()), Some(radius_meters))
            }
            None => (None, None),
        };

        let airport_contains = filters
            .airport_contains
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty());

        let query = CandidateQuery {
            origin,
            radius_meters,
            aircraft_tags: filters.aircraft_tags.clone(),
            service_tags: filters.service_tags.clone(),
            airport_contains: airport_contains.map(str::to_string),
        };
        let candidates = self.directory.find_candidates(&query).await?;

        let shop_ids: Vec<_> = candidates.iter().map(|shop| shop.id).collect();
        let ratings = if shop_ids.is_empty() {
            Vec::new()
        } else {
            self.directory.review_ratings(&shop_ids).await?
        };

        let criteria = RankCriteria {
            origin,
            radius_meters,
            unit: filters.unit,
            aircraft_tags: &filters.aircraft_tags,
            service_tags: &filters.service_tags,
            min_rating: filters.min_rating,
            airport_contains,
        };
        let results = rank(candidates, &ratings, &criteria);

        tracing::debug!(
            "Search airport={:?} radius={:?} returned {} shops",
            airport_code,
            filters.radius,
            results.len()
        );
        Ok(results)
    }

    /// Same search, shaped for the map
    pub async fn map(&self, filters: &SearchFilters) -> Result<MapView, SearchError> {
        let results = self.search(filters).await?;
        Ok(build_map_view(&results))
    }

    fn radius_to_meters(&self, radius: f64, unit: DistanceUnit) -> Result<f64, SearchError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SearchError::InvalidInput(
                "radius must be a positive number".to_string(),
            ));
        }

        let meters = unit.to_meters(radius);
        if meters > DistanceUnit::Miles.to_meters(self.config.max_radius) {
            return Err(SearchError::InvalidInput(format!(
                "radius must not exceed {} miles",
                self.config.max_radius
            )));
        }
        Ok(meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shops::models::ShopTier;
    use crate::shared::test_helpers::{shop_at, tags, InMemoryShopDirectory};
    use crate::features::search::services::ReviewRating;

    fn service(directory: InMemoryShopDirectory) -> (SearchService, Arc<InMemoryShopDirectory>) {
        let directory = Arc::new(directory);
        let service = SearchService::new(
            directory.clone(),
            Arc::new(AirportService::embedded().unwrap()),
            SearchConfig::default(),
        );
        (service, directory)
    }

    fn at_kteb() -> SearchFilters {
        SearchFilters {
            airport_code: Some("KTEB".to_string()),
            radius: Some(50.0),
            ..SearchFilters::default()
        }
    }

    #[tokio::test]
    async fn test_teterboro_radius_search() {
        let nearby = shop_at("Hudson Aero", 40.80, -74.00);
        let far = shop_at("Capital Aviation", 38.8512, -77.0402);
        let (service, _) = service(InMemoryShopDirectory::new(vec![nearby.clone(), far]));

        let results = service.search(&at_kteb()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].shop.id, nearby.id);
        assert!(results[0].distance > 0.0 && results[0].distance <= 50.0);
    }

    #[tokio::test]
    async fn test_lowercase_airport_code_resolves() {
        let (service, _) = service(InMemoryShopDirectory::new(vec![shop_at(
            "Hudson Aero",
            40.80,
            -74.00,
        )]));
        let filters = SearchFilters {
            airport_code: Some(" kteb ".to_string()),
            ..at_kteb()
        };
        assert_eq!(service.search(&filters).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_airport_is_not_found() {
        let (service, directory) = service(InMemoryShopDirectory::new(vec![shop_at(
            "Hudson Aero",
            40.80,
            -74.00,
        )]));
        let filters = SearchFilters {
            airport_code: Some("ZZZZ".to_string()),
            ..SearchFilters::default()
        };

        let err = service.search(&filters).await.unwrap_err();
        assert!(matches!(err, SearchError::NotFound(code) if code == "ZZZZ"));
        assert_eq!(directory.candidate_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_filters_return_everything_by_tier() {
        let standard = shop_at("Alpha", 40.80, -74.00);
        let mut premium = shop_at("Bravo", 25.79, -80.28);
        premium.tier = ShopTier::Premium;
        let (service, _) = service(InMemoryShopDirectory::new(vec![standard, premium]));

        let filters = SearchFilters {
            airport_code: Some("".to_string()),
            radius: Some(-3.0),
            ..SearchFilters::default()
        };
        let results = service.search(&filters).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].shop.tier, ShopTier::Premium);
        assert!(results.iter().all(|r| r.distance == 0.0));
    }

    #[tokio::test]
    async fn test_zero_reviews_excluded_only_when_min_rating_positive() {
        let shop = shop_at("Quiet Hangar", 40.80, -74.00);
        let (service, _) = service(InMemoryShopDirectory::new(vec![shop]));

        let results = service.search(&at_kteb()).await.unwrap();
        assert_eq!(results[0].average_rating, 0.0);

        let filters = SearchFilters {
            min_rating: 0.5,
            ..at_kteb()
        };
        assert!(service.search(&filters).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ratings_fetched_once_per_search() {
        let a = shop_at("A", 40.80, -74.00);
        let b = shop_at("B", 40.81, -74.01);
        let ratings = vec![
            ReviewRating { shop_id: a.id, rating: 5 },
            ReviewRating { shop_id: b.id, rating: 2 },
        ];
        let (service, directory) =
            service(InMemoryShopDirectory::new(vec![a, b]).with_ratings(ratings));

        let filters = SearchFilters {
            min_rating: 3.0,
            ..at_kteb()
        };
        let results = service.search(&filters).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].average_rating, 5.0);
        assert_eq!(directory.rating_calls(), 1);
    }

    #[tokio::test]
    async fn test_no_candidates_skips_rating_lookup() {
        let (service, directory) = service(InMemoryShopDirectory::new(Vec::new()));
        assert!(service.search(&at_kteb()).await.unwrap().is_empty());
        assert_eq!(directory.rating_calls(), 0);
    }

    #[tokio::test]
    async fn test_tag_filters_are_passed_and_enforced() {
        let mut cirrus = shop_at("Cirrus Care", 40.80, -74.00);
        cirrus.specializations_aircraft = tags(&["Cirrus"]);
        let mut cessna = shop_at("Cessna Care", 40.80, -74.00);
        cessna.specializations_aircraft = tags(&["Cessna"]);
        let (service, _) = service(InMemoryShopDirectory::new(vec![cirrus, cessna]));

        let filters = SearchFilters {
            aircraft_tags: tags(&["Cirrus"]),
            ..at_kteb()
        };
        let results = service.search(&filters).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].shop.name, "Cirrus Care");
    }

    #[tokio::test]
    async fn test_wide_radius_keeps_shops_near_the_edge() {
        // Both just inside the radius, east of Teterboro where the
        // longitude span is widest
        let atlantic = shop_at("Atlantic Edge", 41.2, -54.843);
        let azores = shop_at("Azores Edge", 39.6, -26.093);
        let (service, _) = service(InMemoryShopDirectory::new(vec![
            atlantic.clone(),
            azores.clone(),
        ]));

        let filters = SearchFilters {
            radius: Some(1000.0),
            ..at_kteb()
        };
        let results = service.search(&filters).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].shop.id, atlantic.id);
        assert!(results[0].distance <= 1000.0);

        let filters = SearchFilters {
            radius: Some(2500.0),
            ..at_kteb()
        };
        let results = service.search(&filters).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.distance <= 2500.0));
    }

    #[tokio::test]
    async fn test_airport_substring_filter() {
        let teterboro = shop_at("Hudson Aero", 40.80, -74.00);
        let mut morristown = shop_at("Morris Aero", 40.80, -74.41);
        morristown.airport_code = "KMMU".to_string();
        let (service, _) = service(InMemoryShopDirectory::new(vec![teterboro, morristown]));

        let filters = SearchFilters {
            airport_contains: Some(" teb ".to_string()),
            ..SearchFilters::default()
        };
        let results = service.search(&filters).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].shop.name, "Hudson Aero");

        let filters = SearchFilters {
            airport_contains: Some("  ".to_string()),
            ..SearchFilters::default()
        };
        assert_eq!(service.search(&filters).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_inputs() {
        let (service, _) = service(InMemoryShopDirectory::new(Vec::new()));

        for radius in [0.0, -10.0, f64::NAN, f64::INFINITY, 2501.0] {
            let filters = SearchFilters {
                radius: Some(radius),
                ..at_kteb()
            };
            assert!(
                matches!(service.search(&filters).await, Err(SearchError::InvalidInput(_))),
                "radius {} accepted",
                radius
            );
        }

        for min_rating in [-0.1, 5.1, f64::NAN] {
            let filters = SearchFilters {
                min_rating,
                ..SearchFilters::default()
            };
            assert!(matches!(
                service.search(&filters).await,
                Err(SearchError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let (service, _) = service(InMemoryShopDirectory::failing());
        assert!(matches!(
            service.search(&at_kteb()).await,
            Err(SearchError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_map_uses_search_result() {
        let shop = shop_at("Hudson Aero", 40.80, -74.00);
        let (service, _) = service(InMemoryShopDirectory::new(vec![shop]));

        let view = service.map(&at_kteb()).await.unwrap();
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.center.lat, 40.80);
        assert!(view.bounds.is_some());
    }
}
