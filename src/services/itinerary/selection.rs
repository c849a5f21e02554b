use super::scoring::PreferenceScorer;
use crate::constants::TWO_RESTAURANT_THRESHOLD;
use crate::models::{Anchor, Candidate, FoodPreference, PreferenceSpec, SelectionResult};
use crate::services::aggregator::{CandidateAggregator, CandidatePools, Dimension, SearchSpec};
use std::collections::HashSet;

/// How many of the `N` slots go to restaurants and how many to everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composition {
    pub restaurants: usize,
    pub non_restaurants: usize,
}

impl Composition {
    pub fn for_request(prefs: &PreferenceSpec) -> Self {
        let n = prefs.desired_count;
        let restaurants = if !prefs.is_restaurant_class() {
            0
        } else if n >= TWO_RESTAURANT_THRESHOLD {
            2
        } else {
            1
        };
        // N >= 1 keeps this from underflowing
        let restaurants = restaurants.min(n);
        Composition {
            restaurants,
            non_restaurants: n - restaurants,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Restaurant,
    NonRestaurant,
}

impl Slot {
    pub fn accepts(&self, candidate: &Candidate) -> bool {
        match self {
            Slot::Restaurant => candidate.is_restaurant(),
            Slot::NonRestaurant => !candidate.is_restaurant(),
        }
    }
}

/// One source of candidates in a fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FillStep {
    /// Ranking-assist picks, resolved against the combined pool
    Assist,
    Pool(Dimension),
    /// Fresh tiered search. Results of all `specs` are merged before ranking.
    Search {
        specs: Vec<SearchSpec>,
        cap: usize,
        ranked: bool,
    },
}

/// Partial result of filling one kind of slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotFill {
    slot: Slot,
    target: usize,
    picked: Vec<Candidate>,
}

impl SlotFill {
    pub fn empty(slot: Slot, target: usize) -> Self {
        SlotFill {
            slot,
            target,
            picked: Vec::new(),
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.picked.len() >= self.target
    }

    pub fn picked(&self) -> &[Candidate] {
        &self.picked
    }

    /// Take acceptable, unused candidates in offered order until the target is met.
    /// `taken` holds ids already committed by earlier stages.
    pub fn absorb<'a>(
        self,
        offered: impl IntoIterator<Item = &'a Candidate>,
        taken: &HashSet<String>,
    ) -> SlotFill {
        let SlotFill {
            slot,
            target,
            mut picked,
        } = self;

        for candidate in offered {
            if picked.len() >= target {
                break;
            }
            let already = taken.contains(&candidate.id) || picked.iter().any(|p| p.id == candidate.id);
            if slot.accepts(candidate) && !already {
                picked.push(candidate.clone());
            }
        }

        SlotFill {
            slot,
            target,
            picked,
        }
    }

    pub fn into_truncated(mut self) -> Vec<Candidate> {
        self.picked.truncate(self.target);
        self.picked
    }
}

pub fn restaurant_steps(prefs: &PreferenceSpec) -> Vec<FillStep> {
    let cap = prefs.desired_count.max(6);
    let primary = prefs.primary_food();

    let mut steps = vec![FillStep::Assist, FillStep::Pool(Dimension::Food)];
    steps.extend(
        FoodPreference::RESTAURANT_FALLBACKS
            .iter()
            .filter(|f| **f != primary)
            .map(|f| FillStep::Search {
                specs: vec![SearchSpec::new(f.place_type(), f.keyword())],
                cap,
                ranked: false,
            }),
    );
    steps
}

pub fn non_restaurant_steps(prefs: &PreferenceSpec) -> Vec<FillStep> {
    let n = prefs.desired_count;
    let culture = prefs.primary_culture();
    let sweep = |place_type: &str, keyword: &str, cap: usize| FillStep::Search {
        specs: vec![SearchSpec::new(place_type, keyword)],
        cap,
        ranked: false,
    };

    vec![
        FillStep::Assist,
        FillStep::Pool(Dimension::Culture),
        FillStep::Search {
            specs: culture
                .place_types()
                .iter()
                .map(|t| SearchSpec::new(*t, culture.keyword()))
                .collect(),
            cap: (3 * n).max(10),
            ranked: true,
        },
        sweep("movie_theater", "영화관", n),
        sweep("art_gallery", "전시관", n),
        sweep("museum", "전시관", n),
        sweep("tourist_attraction", "체험", n.max(6)),
        sweep("cafe", "카페", n.max(6)),
    ]
}

/// Composition-constrained selection over the request's pools.
pub struct Selector<'a> {
    aggregator: &'a CandidateAggregator,
    city_wide: Anchor,
    pools: &'a CandidatePools,
    prefs: &'a PreferenceSpec,
    scorer: PreferenceScorer,
    combined: Vec<Candidate>,
    assist: Vec<Candidate>,
}

impl<'a> Selector<'a> {
    /// Assist ids not present in the pools are dropped here.
    ///
    /// Fresh searches ignore the request anchor and run city-wide.
    pub fn new(
        aggregator: &'a CandidateAggregator,
        pools: &'a CandidatePools,
        prefs: &'a PreferenceSpec,
        assist_ids: &[String],
    ) -> Self {
        let combined = pools.combined();
        let assist: Vec<Candidate> = assist_ids
            .iter()
            .filter_map(|id| combined.iter().find(|c| &c.id == id))
            .cloned()
            .collect();

        if assist.len() < assist_ids.len() {
            tracing::debug!(
                requested = assist_ids.len(),
                resolved = assist.len(),
                "Dropped {} assist ids not found in the pool",
                assist_ids.len() - assist.len()
            );
        }

        Selector {
            aggregator,
            city_wide: aggregator.city_center_anchor(),
            pools,
            prefs,
            scorer: PreferenceScorer::new(prefs),
            combined,
            assist,
        }
    }

    pub async fn select(&self) -> SelectionResult {
        let n = self.prefs.desired_count;
        let composition = Composition::for_request(self.prefs);
        let mut taken: HashSet<String> = HashSet::new();

        let restaurants = self
            .fill_until_satisfied(
                &restaurant_steps(self.prefs),
                SlotFill::empty(Slot::Restaurant, composition.restaurants),
                &taken,
            )
            .await
            .into_truncated();
        taken.extend(restaurants.iter().map(|c| c.id.clone()));

        let non_restaurants = self
            .fill_until_satisfied(
                &non_restaurant_steps(self.prefs),
                SlotFill::empty(Slot::NonRestaurant, composition.non_restaurants),
                &taken,
            )
            .await
            .into_truncated();
        taken.extend(non_restaurants.iter().map(|c| c.id.clone()));

        let mut selected = restaurants;
        selected.extend(non_restaurants);

        if selected.len() < n {
            let backfill = self.backfill(n - selected.len(), &taken);
            tracing::debug!(
                added = backfill.len(),
                "Backfilled {} candidates from the combined pool",
                backfill.len()
            );
            selected.extend(backfill);
        }
        selected.truncate(n);

        SelectionResult::new(selected, n)
    }

    /// Offer each step's candidates to the fill in turn, stopping once satisfied.
    pub async fn fill_until_satisfied(
        &self,
        steps: &[FillStep],
        initial: SlotFill,
        taken: &HashSet<String>,
    ) -> SlotFill {
        let mut fill = initial;
        for step in steps {
            if fill.is_satisfied() {
                break;
            }
            let before = fill.picked().len();
            fill = match step {
                FillStep::Assist => fill.absorb(&self.assist, taken),
                FillStep::Pool(dimension) => fill.absorb(self.pools.dimension(*dimension), taken),
                FillStep::Search { specs, cap, ranked } => {
                    let found = self.fresh_search(specs, *cap, *ranked).await;
                    fill.absorb(&found, taken)
                }
            };
            tracing::debug!(
                step = ?step,
                added = fill.picked().len() - before,
                picked = fill.picked().len(),
                "Fill step added {}",
                fill.picked().len() - before
            );
        }
        fill
    }

    async fn fresh_search(&self, specs: &[SearchSpec], cap: usize, ranked: bool) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for spec in specs {
            let results = self.aggregator.aggregate(&self.city_wide, spec, cap).await;
            found.extend(results.into_iter().filter(|c| seen.insert(c.id.clone())));
        }
        if ranked {
            self.scorer.rank(&mut found);
        }
        found
    }

    /// Unused non-restaurants first, then unused restaurants, each best-scored first
    fn backfill(&self, needed: usize, taken: &HashSet<String>) -> Vec<Candidate> {
        let unused = |slot: Slot| {
            let mut pool: Vec<Candidate> = self
                .combined
                .iter()
                .filter(|c| slot.accepts(c) && !taken.contains(&c.id))
                .cloned()
                .collect();
            self.scorer.rank(&mut pool);
            pool
        };

        let mut filled: Vec<Candidate> = unused(Slot::NonRestaurant).into_iter().take(needed).collect();
        if filled.len() < needed {
            let remaining = needed - filled.len();
            filled.extend(unused(Slot::Restaurant).into_iter().take(remaining));
        }
        filled
    }
}
