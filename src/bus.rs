mod data;
mod fare;

use std::{
    sync::{Mutex, OnceLock},
    time::Duration,
};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::cache::{BoundedCache, TimedCell};
use crate::error::{AcError, AcResult};
use crate::utils::now_in_ist;

pub use data::{
    AREA_GROUPS, BUS_ROUTES, BUS_STOPS, BusRoute, BusStop, RouteFare, ServiceType, bus_route,
    bus_stop,
};
pub use fare::{BusFare, BusFareQuote, SpecialOffers, base_fare, calculate_fare};

pub const SEARCH_CACHE_CAPACITY: usize = 50;
pub const MAX_ROUTE_RESULTS: usize = 10;
pub const MAX_AREA_RESULTS: usize = 5;
pub const MAX_STOP_RESULTS: usize = 5;
pub const STATUS_TTL: Duration = Duration::from_secs(10 * 60);
pub const FLEET_SIZE: u32 = 3800;

pub const MINUTES_PER_KEY_STOP: u32 = 8;
pub const BOARDING_MINUTES: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteBetween {
    #[serde(flatten)]
    pub route: BusRoute,
    pub from_stop: &'static str,
    pub to_stop: &'static str,
    pub direction: Direction,
    /// Minutes.
    pub estimated_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concessions {
    pub women: &'static str,
    pub disabled: &'static str,
    pub transgender: &'static str,
    pub students: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusAccessibility {
    pub wheelchair_accessible: bool,
    pub low_floor: bool,
    pub ac_available: bool,
    pub digital_payment: bool,
    pub special_concessions: Concessions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub routes: Vec<BusRoute>,
    pub areas: Vec<&'static str>,
    pub stops: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialServices {
    pub women_free: bool,
    pub disabled_free: bool,
    pub transgender_free: bool,
    pub digital_payment: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusStatus {
    pub timestamp: DateTime<FixedOffset>,
    pub operational: bool,
    pub total_routes: usize,
    pub total_buses: u32,
    pub service_areas: usize,
    pub announcements: Vec<&'static str>,
    pub special_services: SpecialServices,
}

pub fn build_bus_status(now: DateTime<FixedOffset>) -> BusStatus {
    BusStatus {
        timestamp: now,
        operational: true,
        total_routes: BUS_ROUTES.len(),
        total_buses: FLEET_SIZE,
        service_areas: AREA_GROUPS.len(),
        announcements: vec![
            "Free travel for all women in ordinary city buses",
            "Free travel for physically challenged persons with attender",
            "Digital payment accepted - UPI, cards",
            "Low floor buses available on major routes",
            "Customer care: 9445030516",
        ],
        special_services: SpecialServices {
            women_free: true,
            disabled_free: true,
            transgender_free: true,
            digital_payment: true,
        },
    }
}

/// Every served area once, sorted. Built once per process.
pub fn all_areas() -> &'static [&'static str] {
    static ALL_AREAS: OnceLock<Vec<&'static str>> = OnceLock::new();

    ALL_AREAS.get_or_init(|| {
        let mut areas = AREA_GROUPS
            .iter()
            .flat_map(|(_, areas)| areas.iter().copied())
            .collect::<Vec<_>>();
        areas.sort_unstable();
        areas.dedup();
        areas
    })
}

/// Stops whose name or zone contains `area`, case-insensitively.
pub fn stops_near(area: &str) -> Vec<BusStop> {
    let area = area.to_lowercase();
    BUS_STOPS
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&area) || s.zone.to_lowercase().contains(&area))
        .copied()
        .collect()
}

pub fn accessibility_info(route_number: &str) -> AcResult<BusAccessibility> {
    let route = bus_route(route_number)
        .ok_or_else(|| AcError::BusRouteNotFound(route_number.to_string()))?;

    Ok(BusAccessibility {
        wheelchair_accessible: route.has_feature("Wheelchair Accessible"),
        low_floor: route.has_feature("Low Floor"),
        ac_available: route.has_feature("AC Available") || route.has_feature("AC"),
        digital_payment: true,
        special_concessions: Concessions {
            women: "Free travel in ordinary buses",
            disabled: "Free travel with attender",
            transgender: "Free travel",
            students: "Concession available with ID",
        },
    })
}

fn find_routes_between(from: &str, to: &str) -> Vec<RouteBetween> {
    BUS_ROUTES
        .iter()
        .filter_map(|route| {
            let stops = route
                .key_stops
                .iter()
                .map(|stop| stop.to_lowercase())
                .collect::<Vec<_>>();
            let from_index = stops.iter().position(|stop| stop.contains(from))?;
            let to_index = stops.iter().position(|stop| stop.contains(to))?;

            Some(RouteBetween {
                route: *route,
                from_stop: route.key_stops[from_index],
                to_stop: route.key_stops[to_index],
                direction: if from_index < to_index {
                    Direction::Forward
                } else {
                    Direction::Reverse
                },
                estimated_time: from_index.abs_diff(to_index) as u32 * MINUTES_PER_KEY_STOP
                    + BOARDING_MINUTES,
            })
        })
        .collect()
}

/// Route searches with memoised results and the cached service bulletin.
#[derive(Debug)]
pub struct BusService {
    search_cache: Mutex<BoundedCache<String, Vec<BusRoute>>>,
    between_cache: Mutex<BoundedCache<(String, String), Vec<RouteBetween>>>,
    status_cache: Mutex<TimedCell<BusStatus>>,
}

impl Default for BusService {
    fn default() -> Self {
        Self::new()
    }
}

impl BusService {
    pub fn new() -> Self {
        Self {
            search_cache: Mutex::new(BoundedCache::new(SEARCH_CACHE_CAPACITY)),
            between_cache: Mutex::new(BoundedCache::new(SEARCH_CACHE_CAPACITY)),
            status_cache: Mutex::new(TimedCell::new(STATUS_TTL)),
        }
    }

    /// Routes whose name, key stops or number contain the query. Needs at
    /// least two characters; at most ten results.
    pub fn search_routes(&self, query: &str) -> Vec<BusRoute> {
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let normalized = query.to_lowercase();
        self.search_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get_or_insert_with(normalized.clone(), || {
                BUS_ROUTES
                    .iter()
                    .filter(|route| route.search_text().contains(&normalized))
                    .take(MAX_ROUTE_RESULTS)
                    .copied()
                    .collect()
            })
    }

    /// Routes with a key stop matching each end. The first matching stop
    /// on the route is used for both.
    pub fn routes_between(&self, from: &str, to: &str) -> Vec<RouteBetween> {
        if from.is_empty() || to.is_empty() {
            return Vec::new();
        }

        let key = (from.to_lowercase(), to.to_lowercase());
        let mut cache = self
            .between_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(routes) = cache.get(&key) {
            return routes;
        }

        let routes = find_routes_between(&key.0, &key.1);
        log::debug!("{} bus routes between {from} and {to}", routes.len());
        cache.insert(key, routes.clone());
        routes
    }

    pub fn search_all(&self, query: &str) -> SearchResults {
        if query.chars().count() < 2 {
            return SearchResults::default();
        }

        let normalized = query.to_lowercase();
        SearchResults {
            routes: self.search_routes(query),
            areas: all_areas()
                .iter()
                .filter(|area| area.to_lowercase().contains(&normalized))
                .take(MAX_AREA_RESULTS)
                .copied()
                .collect(),
            stops: BUS_STOPS
                .iter()
                .filter(|stop| stop.name.to_lowercase().contains(&normalized))
                .take(MAX_STOP_RESULTS)
                .map(|stop| stop.name)
                .collect(),
        }
    }

    pub fn bus_status(&self) -> BusStatus {
        self.status_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get_or_refresh(|| build_bus_status(now_in_ist()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn numbers(routes: &[BusRoute]) -> Vec<&'static str> {
        routes.iter().map(|r| r.number).collect()
    }

    #[test]
    fn test_search_routes() {
        let service = BusService::new();
        assert!(service.search_routes("").is_empty());
        assert!(service.search_routes("a").is_empty());
        assert_eq!(numbers(&service.search_routes("tambaram")), vec!["12"]);
        assert_eq!(
            numbers(&service.search_routes("koyambedu")),
            vec!["42", "70", "100"]
        );
        // "broadway" is on all but two routes, capped at ten anyway.
        assert_eq!(service.search_routes("BROADWAY").len(), 8);
    }

    #[test]
    fn test_routes_between_direction_and_estimate() {
        let service = BusService::new();
        let routes = service.routes_between("Guindy", "Broadway");
        assert_eq!(
            routes
                .iter()
                .map(|r| (r.route.number, r.direction, r.estimated_time))
                .collect::<Vec<_>>(),
            vec![
                ("2", Direction::Reverse, 2 * 8 + 15),
                ("5", Direction::Reverse, 2 * 8 + 15),
                ("12", Direction::Reverse, 2 * 8 + 15),
            ]
        );

        let routes = service.routes_between("koyambedu", "velachery");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].from_stop, "Koyambedu");
        assert_eq!(routes[0].to_stop, "Velachery");
        assert_eq!(routes[0].direction, Direction::Forward);
        assert_eq!(routes[0].estimated_time, 4 * 8 + 15);

        assert!(service.routes_between("", "Adyar").is_empty());
        // Second call comes from the cache and agrees.
        assert_eq!(service.routes_between("koyambedu", "velachery"), routes);
    }

    #[test]
    fn test_all_areas_sorted_and_unique() {
        let areas = all_areas();
        assert_eq!(areas.len(), 47);
        assert_eq!(areas[0], "Adyar");
        assert!(areas.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_stops_near_matches_zone() {
        let south = stops_near("south");
        assert_eq!(south.len(), 5);
        let named = stops_near("egmore");
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].name, "Egmore");
    }

    #[test]
    fn test_accessibility_info() {
        let info = accessibility_info("27D").unwrap();
        assert!(info.ac_available);
        assert!(info.low_floor);
        assert!(!info.wheelchair_accessible);

        let info = accessibility_info("23A").unwrap();
        assert!(info.wheelchair_accessible);

        assert!(matches!(
            accessibility_info("0"),
            Err(AcError::BusRouteNotFound(_))
        ));
    }

    #[test]
    fn test_search_all() {
        let service = BusService::new();
        let results = service.search_all("nagar");
        assert_eq!(numbers(&results.routes), vec!["21", "23A", "70", "100"]);
        assert_eq!(
            results.areas,
            vec!["Anna Nagar", "Ashok Nagar", "Besant Nagar", "K.K.Nagar", "T.Nagar"]
        );
        assert_eq!(results.stops, vec!["T.Nagar", "Anna Nagar"]);
        assert_eq!(service.search_all("n"), SearchResults::default());
    }

    #[test]
    fn test_status_is_cached() {
        let service = BusService::new();
        let status = service.bus_status();
        assert_eq!(status.total_routes, 10);
        assert_eq!(status.service_areas, 6);
        assert_eq!(service.bus_status().timestamp, status.timestamp);
    }
}
