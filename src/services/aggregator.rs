use crate::config::PlannerConfig;
use crate::constants::THIN_FOOD_POOL_THRESHOLD;
use crate::models::{
    Anchor, AnchorKind, Candidate, Category, Coordinates, CulturePreference, PreferenceSpec,
    RawPlace,
};
use crate::services::classifier::classify;
use crate::services::events::EventProvider;
use crate::services::google_places::{NearbyQuery, PlaceSearch};
use crate::services::stations::StationDirectory;
use std::collections::HashSet;
use std::sync::Arc;

/// What to search for: a provider place type plus a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpec {
    pub place_type: String,
    pub keyword: String,
}

impl SearchSpec {
    pub fn new(place_type: impl Into<String>, keyword: impl Into<String>) -> Self {
        SearchSpec {
            place_type: place_type.into(),
            keyword: keyword.into(),
        }
    }
}

/// One relaxation level of the tiered search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTier {
    pub radius_m: f64,
    pub min_rating: f64,
    pub min_reviews: u32,
}

impl SearchTier {
    fn admits(&self, place: &RawPlace) -> bool {
        place.rating_or_zero() >= self.min_rating && place.review_count_or_zero() >= self.min_reviews
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Food,
    Culture,
    Events,
}

/// Per-dimension candidate pools for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePools {
    pub food: Vec<Candidate>,
    pub culture: Vec<Candidate>,
    pub events: Vec<Candidate>,
}

impl CandidatePools {
    pub fn dimension(&self, dimension: Dimension) -> &[Candidate] {
        match dimension {
            Dimension::Food => &self.food,
            Dimension::Culture => &self.culture,
            Dimension::Events => &self.events,
        }
    }

    /// Food, then culture, then events, first occurrence of each id wins
    pub fn combined(&self) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        [Dimension::Food, Dimension::Culture, Dimension::Events]
            .into_iter()
            .flat_map(|d| self.dimension(d).iter())
            .filter(|c| seen.insert(c.id.as_str()))
            .cloned()
            .collect()
    }

    pub fn total_len(&self) -> usize {
        self.food.len() + self.culture.len() + self.events.len()
    }
}

/// Gathers classified, deduplicated candidates from the place-search provider.
pub struct CandidateAggregator {
    search: Arc<dyn PlaceSearch>,
    events: Arc<dyn EventProvider>,
    stations: Arc<dyn StationDirectory>,
    config: PlannerConfig,
}

impl CandidateAggregator {
    pub fn new(
        search: Arc<dyn PlaceSearch>,
        events: Arc<dyn EventProvider>,
        stations: Arc<dyn StationDirectory>,
        config: PlannerConfig,
    ) -> Self {
        CandidateAggregator {
            search,
            events,
            stations,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Without credentials every search serves placeholders
    pub fn has_place_credentials(&self) -> bool {
        self.search.has_credentials()
    }

    /// Resolve the anchor for a request.
    ///
    /// Unknown station names fall back to the city centre with a warning.
    pub fn resolve_anchor(&self, station: Option<&str>) -> Anchor {
        let city_center = || self.city_center_anchor();

        let Some(name) = station.map(str::trim).filter(|s| !s.is_empty()) else {
            return city_center();
        };

        match self.stations.find_station(name) {
            Some(station) => {
                tracing::info!(
                    station = %station.name,
                    lat = station.coordinates.lat,
                    lng = station.coordinates.lng,
                    radius_m = self.config.station_radius_m,
                    "Anchoring search at station {} ({:.0}m radius)",
                    station.name, self.config.station_radius_m
                );
                Anchor::station(station.name, station.coordinates, self.config.station_radius_m)
            }
            None => {
                tracing::warn!(
                    station = %name,
                    "Unknown station '{}', falling back to city centre",
                    name
                );
                city_center()
            }
        }
    }

    /// City-wide anchor used by every broadened search, whatever the request anchor
    pub fn city_center_anchor(&self) -> Anchor {
        Anchor::city_center(
            Coordinates {
                lat: self.config.default_center_lat,
                lng: self.config.default_center_lng,
            },
            self.config.default_radius_m,
        )
    }

    /// The three relaxation tiers for an anchor, from strictest to loosest
    pub fn tiers(&self, anchor: &Anchor) -> [SearchTier; 3] {
        let base = anchor.radius_m;
        [
            SearchTier {
                radius_m: base,
                min_rating: self.config.base_min_rating,
                min_reviews: self.config.base_min_reviews,
            },
            SearchTier {
                radius_m: base * self.config.relaxed_radius_multiplier,
                min_rating: self.config.relaxed_min_rating,
                min_reviews: self.config.relaxed_min_reviews,
            },
            SearchTier {
                radius_m: base * self.config.very_relaxed_radius_multiplier,
                min_rating: self.config.very_relaxed_min_rating,
                min_reviews: self.config.very_relaxed_min_reviews,
            },
        ]
    }

    pub fn target_max(&self, desired_count: usize) -> usize {
        self.config
            .min_aggregate_target
            .max(desired_count * self.config.aggregate_target_multiplier)
    }

    /// Tiered search: relax radius and quality thresholds until enough
    /// candidates are found or all tiers are spent.
    pub async fn aggregate(
        &self,
        anchor: &Anchor,
        spec: &SearchSpec,
        desired_count: usize,
    ) -> Vec<Candidate> {
        if !self.search.has_credentials() {
            tracing::warn!(
                place_type = %spec.place_type,
                "Place search has no credentials, serving placeholders"
            );
            return placeholders(&spec.place_type);
        }

        let target_max = self.target_max(desired_count);
        let locality = match anchor.kind {
            AnchorKind::CityCenter => Some(self.config.locality_token.as_str()),
            AnchorKind::Station(_) => None,
        };

        let mut seen = HashSet::new();
        let mut aggregated = Vec::new();

        for (tier_idx, tier) in self.tiers(anchor).iter().enumerate() {
            let raw = self.query(anchor, spec, tier.radius_m).await;
            let added = admit(raw, tier, locality, &mut seen);
            let added_count = added.len();
            aggregated.extend(added);

            tracing::info!(
                tier = tier_idx + 1,
                radius_m = tier.radius_m,
                added = added_count,
                total = aggregated.len(),
                "Tier {} ({:.0}m, rating>={}, reviews>={}): +{} (total {})",
                tier_idx + 1, tier.radius_m, tier.min_rating, tier.min_reviews, added_count, aggregated.len()
            );

            if aggregated.len() >= target_max {
                break;
            }
        }

        aggregated.truncate(target_max);
        aggregated
    }

    /// Single query at the anchor radius with base thresholds and no locality filter
    pub async fn aggregate_near(
        &self,
        anchor: &Anchor,
        spec: &SearchSpec,
        desired_count: usize,
    ) -> Vec<Candidate> {
        if !self.search.has_credentials() {
            tracing::warn!(
                place_type = %spec.place_type,
                "Place search has no credentials, serving placeholders"
            );
            return placeholders(&spec.place_type);
        }

        let [base_tier, ..] = self.tiers(anchor);
        let raw = self.query(anchor, spec, base_tier.radius_m).await;
        let mut found = admit(raw, &base_tier, None, &mut HashSet::new());
        found.truncate(desired_count);

        tracing::debug!(
            place_type = %spec.place_type,
            keyword = %spec.keyword,
            found = found.len(),
            "Near search found {} candidates",
            found.len()
        );
        found
    }

    /// Near search around an explicit station, tiered search otherwise
    async fn search_for(&self, anchor: &Anchor, spec: &SearchSpec, desired: usize) -> Vec<Candidate> {
        if anchor.is_station() {
            self.aggregate_near(anchor, spec, desired).await
        } else {
            self.aggregate(anchor, spec, desired).await
        }
    }

    /// Provider errors degrade to an empty tier
    async fn query(&self, anchor: &Anchor, spec: &SearchSpec, radius_m: f64) -> Vec<RawPlace> {
        let query = NearbyQuery::new(
            anchor.coordinates,
            radius_m,
            spec.place_type.clone(),
            spec.keyword.clone(),
            self.config.search_language.clone(),
        );

        match self.search.search_nearby(&query).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(
                    place_type = %spec.place_type,
                    keyword = %spec.keyword,
                    radius_m,
                    "Place search failed, treating tier as empty: {}",
                    e
                );
                Vec::new()
            }
        }
    }

    /// Build the food, culture and event pools for a request.
    pub async fn collect_pools(&self, anchor: &Anchor, prefs: &PreferenceSpec) -> CandidatePools {
        let n = prefs.desired_count;
        let foods = if prefs.foods.is_empty() {
            vec![prefs.primary_food()]
        } else {
            prefs.foods.clone()
        };

        let city_wide = self.city_center_anchor();
        let mut seen_food = HashSet::new();
        let mut food = Vec::new();
        for pref in &foods {
            let spec = SearchSpec::new(pref.place_type(), pref.keyword());
            let found = self.search_for(anchor, &spec, n).await;
            extend_unique(&mut food, &mut seen_food, found);

            if food.len() < THIN_FOOD_POOL_THRESHOLD {
                tracing::info!(
                    food = %pref,
                    pool = food.len(),
                    "Food pool thin ({}), trying relaxed keywords",
                    food.len()
                );
                for keyword in pref.relaxed_keywords() {
                    let spec = SearchSpec::new(pref.place_type(), keyword);
                    let found = self.aggregate(&city_wide, &spec, (2 * n).max(12)).await;
                    extend_unique(&mut food, &mut seen_food, found);
                    if food.len() >= 2 * n {
                        break;
                    }
                }
            }
        }
        tracing::info!(count = food.len(), "Found {} food candidates", food.len());

        let primary_culture = prefs.primary_culture();
        let mut culture = Vec::new();
        if primary_culture == CulturePreference::Festival {
            tracing::info!("Festival requested, skipping culture search");
        } else {
            let cultures = if prefs.cultures.is_empty() {
                vec![primary_culture]
            } else {
                prefs.cultures.clone()
            };
            let mut seen_culture = HashSet::new();
            for pref in &cultures {
                for place_type in pref.place_types() {
                    let spec = SearchSpec::new(*place_type, pref.keyword());
                    let found = self.search_for(anchor, &spec, n).await;
                    extend_unique(&mut culture, &mut seen_culture, found);
                }
            }
            tracing::info!(count = culture.len(), "Found {} culture candidates", culture.len());
        }

        let radius_km = self.config.event_radius_km;
        let events: Vec<Candidate> = self
            .events
            .events_on(prefs.date)
            .await
            .into_iter()
            .filter(|e| e.coordinates.is_within_km(&anchor.coordinates, radius_km))
            .collect();
        tracing::info!(
            count = events.len(),
            date = %prefs.date,
            "Found {} events within {}km on {}",
            events.len(), radius_km, prefs.date
        );

        CandidatePools {
            food,
            culture,
            events,
        }
    }
}

/// Filter one tier's raw results and classify the survivors.
///
/// `seen` carries ids across tiers so the first occurrence of a place wins.
fn admit(
    raw: Vec<RawPlace>,
    tier: &SearchTier,
    locality: Option<&str>,
    seen: &mut HashSet<String>,
) -> Vec<Candidate> {
    raw.into_iter()
        .filter(|p| tier.admits(p))
        .filter(|p| locality.map_or(true, |token| p.address_contains(token)))
        .filter_map(|p| {
            let category = classify(&p.types);
            Candidate::from_raw(p, category)
        })
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}

fn extend_unique(pool: &mut Vec<Candidate>, seen: &mut HashSet<String>, found: Vec<Candidate>) {
    pool.extend(found.into_iter().filter(|c| seen.insert(c.id.clone())));
}

/// Fixed stand-ins served when the provider cannot be queried
pub fn placeholders(place_type: &str) -> Vec<Candidate> {
    let mut places = Vec::new();

    if place_type.contains("restaurant") || place_type.contains("cafe") {
        places.push(
            Candidate::new(
                "dummy-cafe-1",
                "안양 감성 카페",
                Category::Cafe,
                Coordinates {
                    lat: 37.3942,
                    lng: 126.9569,
                },
            )
            .with_rating(4.5)
            .with_address("안양시 만안구"),
        );
        places.push(
            Candidate::new(
                "dummy-restaurant-1",
                "안양 한식 맛집",
                Category::Restaurant,
                Coordinates {
                    lat: 37.4016,
                    lng: 126.9228,
                },
            )
            .with_rating(4.2)
            .with_address("안양시 동안구"),
        );
    }

    if place_type.contains("movie_theater") || place_type.contains("art_gallery") {
        places.push(
            Candidate::new(
                "dummy-movie-1",
                "안양 영화관",
                Category::Movie,
                Coordinates {
                    lat: 37.3980,
                    lng: 126.9300,
                },
            )
            .with_rating(4.0)
            .with_address("안양시 동안구"),
        );
    }

    places
}
