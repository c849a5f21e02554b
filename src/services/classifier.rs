use crate::models::Category;

/// Map provider type tags to a single [`Category`].
///
/// Tags are checked against a fixed priority order, not in input order, so a
/// place tagged both `cafe` and `restaurant` is always a restaurant.
pub fn classify<S: AsRef<str>>(raw_types: &[S]) -> Category {
    let has = |tag: &str| raw_types.iter().any(|t| t.as_ref() == tag);

    if has("restaurant") {
        Category::Restaurant
    } else if has("cafe") {
        Category::Cafe
    } else if has("movie_theater") {
        Category::Movie
    } else if has("art_gallery") || has("museum") {
        Category::Culture
    } else if has("tourist_attraction") {
        Category::Attraction
    } else {
        Category::Other
    }
}
