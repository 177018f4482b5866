pub mod data;
mod frequent;
mod geocode;
mod nominatim;
mod position;
mod routes;

pub use data::{AccessibilityMarker, MarkerKind, accessibility_markers};
pub use frequent::{FrequentDestination, FrequentDestinations, VisitedPlace};
pub use geocode::{
    DEFAULT_AREA_NAME, GeocodedPlace, geocode_address, lookup_known_place, reverse_geocode,
};
pub use nominatim::{DEFAULT_NOMINATIM_URL, NominatimClient, with_city_context};
pub use position::{
    FixedPositionProvider, POSITION_TIMEOUT, Position, PositionProvider,
    UnsupportedPositionProvider, get_current_location,
};
pub use routes::{
    AccessibilityFilters, RouteFeatures, RouteOption, accessibility_features,
    calculate_accessibility_score, generate_route_options,
};

use data::SUGGESTIONS;

pub const MAX_SUGGESTIONS: usize = 8;

/// Offers place names for what has been typed so far.
///
/// A name matches when it contains the whole query, or any query word longer
/// than two characters. The first eight matches (in table order) are kept and
/// then ranked: names starting with the query first, shorter names first.
/// A blank query yields the first eight names of the table.
pub fn get_location_suggestions(query: &str) -> Vec<&'static str> {
    let search_query = query.trim().to_lowercase();
    if search_query.is_empty() {
        return SUGGESTIONS.iter().take(MAX_SUGGESTIONS).copied().collect();
    }

    let words = search_query
        .split(' ')
        .filter(|word| word.chars().count() > 2)
        .collect::<Vec<_>>();

    let mut suggestions = SUGGESTIONS
        .iter()
        .copied()
        .filter(|location| {
            let location = location.to_lowercase();
            location.contains(&search_query) || words.iter().any(|word| location.contains(word))
        })
        .take(MAX_SUGGESTIONS)
        .collect::<Vec<_>>();

    suggestions.sort_by_key(|location| {
        (
            !location.to_lowercase().starts_with(&search_query),
            location.chars().count(),
        )
    });
    suggestions
}
