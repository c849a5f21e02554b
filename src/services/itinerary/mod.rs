pub mod scoring;
pub mod selection;
pub mod sequencer;

use crate::models::{Itinerary, PreferenceSpec};
use crate::services::aggregator::{CandidateAggregator, CandidatePools};
use crate::services::ranking::RankingAssist;
use rand::Rng;
use std::sync::Arc;

use selection::Selector;

/// Runs one itinerary request end to end: anchor, pools, assist, selection, route.
pub struct ItineraryPlanner {
    aggregator: CandidateAggregator,
    assist: Option<Arc<dyn RankingAssist>>,
}

impl ItineraryPlanner {
    pub fn new(aggregator: CandidateAggregator, assist: Option<Arc<dyn RankingAssist>>) -> Self {
        ItineraryPlanner { aggregator, assist }
    }

    pub fn aggregator(&self) -> &CandidateAggregator {
        &self.aggregator
    }

    pub fn has_assist(&self) -> bool {
        self.assist.is_some()
    }

    pub async fn plan<R: Rng + Send + ?Sized>(&self, prefs: &PreferenceSpec, rng: &mut R) -> Itinerary {
        let n = prefs.desired_count;
        tracing::info!(
            desired = n,
            foods = ?prefs.foods,
            cultures = ?prefs.cultures,
            station = ?prefs.station_name(),
            "Planning itinerary for {} places",
            n
        );

        let anchor = self.aggregator.resolve_anchor(prefs.station_name());
        let pools = self.aggregator.collect_pools(&anchor, prefs).await;
        tracing::info!(
            food = pools.food.len(),
            culture = pools.culture.len(),
            events = pools.events.len(),
            "Collected {} candidates",
            pools.total_len()
        );

        let assist_ids = self.ask_assist(&pools, prefs).await;
        let recommended = Selector::new(&self.aggregator, &pools, prefs, &assist_ids)
            .select()
            .await;

        tracing::info!(
            restaurants = recommended.restaurant_count(),
            non_restaurants = recommended.len() - recommended.restaurant_count(),
            requested = n,
            "Enforced composition: {} restaurants, {} others (N={})",
            recommended.restaurant_count(),
            recommended.len() - recommended.restaurant_count(),
            n
        );
        if recommended.is_short() {
            tracing::warn!(
                shortfall = recommended.shortfall(),
                "Candidate pool exhausted, returning {} of {} places",
                recommended.len(),
                n
            );
        }

        let mut route = sequencer::sequence(&recommended.candidates, rng);
        route.truncate(n);

        Itinerary {
            recommended,
            route,
            anchor,
        }
    }

    /// Assist failures of any kind leave the contribution empty
    async fn ask_assist(&self, pools: &CandidatePools, prefs: &PreferenceSpec) -> Vec<String> {
        let Some(assist) = &self.assist else {
            return Vec::new();
        };

        let combined = pools.combined();
        if combined.is_empty() {
            return Vec::new();
        }

        match assist.rank(&combined, prefs, prefs.desired_count).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Ranking assist unavailable, using pool order: {}", e);
                Vec::new()
            }
        }
    }
}
