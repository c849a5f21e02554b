use crate::models::{Candidate, Route, RouteStop};
use rand::Rng;

/// Order candidates into a visiting sequence with the nearest-neighbour heuristic.
///
/// The start is drawn uniformly from `rng`; after that each hop goes to the closest
/// unvisited candidate, ties going to the one earlier in `candidates`.
pub fn sequence<R: Rng + ?Sized>(candidates: &[Candidate], rng: &mut R) -> Route {
    if candidates.is_empty() {
        return Route::default();
    }

    let mut visited = vec![false; candidates.len()];
    let mut current = rng.gen_range(0..candidates.len());
    let mut stops = Vec::with_capacity(candidates.len());

    loop {
        visited[current] = true;
        stops.push(RouteStop::from_candidate(stops.len() + 1, &candidates[current]));

        let here = &candidates[current].coordinates;
        let mut next: Option<(usize, f64)> = None;
        for (idx, candidate) in candidates.iter().enumerate() {
            if visited[idx] {
                continue;
            }
            let d = here.distance_to(&candidate.coordinates);
            if next.map_or(true, |(_, best)| d < best) {
                next = Some((idx, d));
            }
        }

        match next {
            Some((idx, _)) => current = idx,
            None => break,
        }
    }

    Route::new(stops)
}
