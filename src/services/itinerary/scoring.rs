use crate::constants::*;
use crate::models::{Candidate, Category, CulturePreference, FoodPreference, PreferenceSpec};
use std::cmp::Ordering;

/// Fallback ranking score: the rating (0 when absent) plus category bonuses.
///
/// Restaurants get a flat bonus whatever the food preference.
pub fn score(
    candidate: &Candidate,
    _primary_food: FoodPreference,
    primary_culture: CulturePreference,
) -> f64 {
    let mut bonus = 0.0;

    if candidate.category == Category::Restaurant {
        bonus += SCORE_RESTAURANT_BONUS;
    }

    bonus += match (primary_culture, candidate.category) {
        (CulturePreference::Movie, Category::Movie) => SCORE_CULTURE_MATCH_BONUS,
        (CulturePreference::Experience, Category::Attraction) => SCORE_CULTURE_MATCH_BONUS,
        (CulturePreference::Festival, Category::Festival) => SCORE_FESTIVAL_MATCH_BONUS,
        (CulturePreference::Other, Category::Culture) => SCORE_GENERIC_CULTURE_BONUS,
        _ => 0.0,
    };

    if matches!(candidate.category, Category::Cafe | Category::Attraction) {
        bonus += SCORE_DIVERSITY_BONUS;
    }

    candidate.rating_or_zero() + bonus
}

/// Scores candidates against one request's primary preferences.
#[derive(Debug, Clone, Copy)]
pub struct PreferenceScorer {
    primary_food: FoodPreference,
    primary_culture: CulturePreference,
}

impl PreferenceScorer {
    pub fn new(prefs: &PreferenceSpec) -> Self {
        PreferenceScorer {
            primary_food: prefs.primary_food(),
            primary_culture: prefs.primary_culture(),
        }
    }

    pub fn score(&self, candidate: &Candidate) -> f64 {
        score(candidate, self.primary_food, self.primary_culture)
    }

    /// Stable sort, best first. Equal scores keep their pool order.
    pub fn rank(&self, candidates: &mut [Candidate]) {
        candidates.sort_by(|a, b| {
            self.score(b)
                .partial_cmp(&self.score(a))
                .unwrap_or(Ordering::Equal)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, TransportMode};
    use time::macros::date;

    fn cand(id: &str, category: Category, rating: Option<f64>) -> Candidate {
        let c = Candidate::new(id, id, category, Coordinates::new(37.39, 126.95).unwrap());
        match rating {
            Some(r) => c.with_rating(r),
            None => c,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_restaurant_bonus() {
        let c = cand("r", Category::Restaurant, Some(4.0));
        assert!(approx(
            score(&c, FoodPreference::Korean, CulturePreference::Movie),
            4.3
        ));
    }

    #[test]
    fn test_culture_match_bonuses() {
        let movie = cand("m", Category::Movie, Some(4.0));
        let attraction = cand("a", Category::Attraction, Some(4.0));
        let festival = cand("f", Category::Festival, Some(5.0));
        let culture = cand("c", Category::Culture, Some(4.0));
        let food = FoodPreference::Other;

        assert!(approx(score(&movie, food, CulturePreference::Movie), 4.6));
        assert!(approx(score(&movie, food, CulturePreference::Other), 4.0));
        // match bonus plus the attraction diversity bonus
        assert!(approx(
            score(&attraction, food, CulturePreference::Experience),
            4.75
        ));
        assert!(approx(
            score(&festival, food, CulturePreference::Festival),
            5.8
        ));
        assert!(approx(score(&culture, food, CulturePreference::Other), 4.4));
        assert!(approx(
            score(&culture, food, CulturePreference::Performance),
            4.0
        ));
    }

    #[test]
    fn test_cafe_bonus_and_missing_rating() {
        let cafe = cand("c", Category::Cafe, None);
        assert!(approx(
            score(&cafe, FoodPreference::Cafe, CulturePreference::Movie),
            0.15
        ));
    }

    #[test]
    fn test_rank_is_stable_and_descending() {
        let prefs = PreferenceSpec::new(
            3,
            vec![FoodPreference::Korean],
            vec![CulturePreference::Movie],
            TransportMode::Public,
            date!(2025 - 04 - 05),
        )
        .unwrap();
        let scorer = PreferenceScorer::new(&prefs);

        let mut pool = vec![
            cand("low", Category::Other, Some(3.0)),
            cand("tie-1", Category::Other, Some(4.0)),
            cand("movie", Category::Movie, Some(4.0)),
            cand("tie-2", Category::Other, Some(4.0)),
        ];
        scorer.rank(&mut pool);

        let ids: Vec<&str> = pool.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["movie", "tie-1", "tie-2", "low"]);
    }
}
