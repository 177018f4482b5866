use geo::{Intersects, Rect, coord};
use serde::Serialize;

use crate::utils::Coordinates;

use super::data::{AREAS, CHENNAI_CENTRE, GEOCODE_TABLE, KNOWN_PLACES};

pub const DEFAULT_AREA_NAME: &str = "Chennai";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

impl GeocodedPlace {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Resolves free text against the offline table. Never fails: unknown text is
/// placed at the city centre under its own name.
pub fn geocode_address(address: &str) -> GeocodedPlace {
    let search_key = address.to_lowercase();

    GEOCODE_TABLE
        .iter()
        .find(|(key, ..)| search_key.contains(key) || key.contains(search_key.as_str()))
        .map(|&(_, lat, lng, name)| GeocodedPlace {
            lat,
            lng,
            name: name.to_string(),
        })
        .unwrap_or_else(|| GeocodedPlace {
            lat: CHENNAI_CENTRE.lat,
            lng: CHENNAI_CENTRE.lng,
            name: address.to_string(),
        })
}

/// Names the area containing the point, or "Chennai" when no rectangle matches.
pub fn reverse_geocode(lat: f64, lng: f64) -> &'static str {
    let point = Coordinates::new(lat, lng).to_point();

    AREAS
        .iter()
        .find(|&&(lat_min, lat_max, lng_min, lng_max, _)| {
            Rect::new(
                coord! { x: lng_min, y: lat_min },
                coord! { x: lng_max, y: lat_max },
            )
            .intersects(&point)
        })
        .map(|&(.., name)| name)
        .unwrap_or(DEFAULT_AREA_NAME)
}

/// Exact lookup (case and surrounding blanks ignored) in the map's fallback table.
pub fn lookup_known_place(name: &str) -> Option<Coordinates> {
    let key = name.trim().to_lowercase();
    KNOWN_PLACES
        .iter()
        .find(|(known, ..)| *known == key)
        .map(|&(_, lat, lng)| Coordinates::new(lat, lng))
}
