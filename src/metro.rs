mod fare;
mod live;
mod stations;

use std::{
    sync::{Mutex, OnceLock},
    time::Duration,
};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::cache::{BoundedCache, TimedCell};
use crate::error::{AcError, AcResult};
use crate::utils::now_in_ist;

pub use fare::{
    Fare, FareBand, FareClass, FareQuote, calculate_distance, calculate_fare,
    estimate_travel_time, format_price, station_count,
};
pub use live::{Arrival, LineStatus, LiveTimings, MetroStatus};
pub use stations::{Line, MetroStation, STATIONS, station_info};

pub const SEARCH_CACHE_CAPACITY: usize = 50;
pub const STATUS_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationAccessibility {
    /// Lifts at both ends.
    pub wheelchair_accessible: bool,
    pub escalators: bool,
    /// Parking at either end.
    pub parking: bool,
    pub facilities: EndpointFacilities,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointFacilities {
    pub from: &'static [&'static str],
    pub to: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Realtime {
    pub status: String,
    pub frequency: String,
    pub delay: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetroRoute {
    pub from: &'static str,
    pub to: &'static str,
    pub line: String,
    pub interchange: bool,
    pub duration: u32,
    pub distance: f64,
    pub fare: Fare,
    pub steps: Vec<String>,
    pub accessibility: StationAccessibility,
    pub realtime: Realtime,
}

pub fn metro_steps(from: &MetroStation, to: &MetroStation) -> Vec<String> {
    let mut steps = vec![format!("Board {} Line metro at {} station", from.line, from.name)];

    if from.line != to.line {
        steps.push("Travel to interchange station".to_string());
        steps.push(format!("Change to {} Line", to.line));
    }

    steps.push(format!("Travel towards {}", to.name));
    steps.push(format!("Alight at {} station", to.name));
    steps
}

pub fn accessibility_info(from: &MetroStation, to: &MetroStation) -> StationAccessibility {
    StationAccessibility {
        wheelchair_accessible: from.has_facility("Lift") && to.has_facility("Lift"),
        escalators: from.has_facility("Escalator") && to.has_facility("Escalator"),
        parking: from.has_facility("Parking") || to.has_facility("Parking"),
        facilities: EndpointFacilities {
            from: from.facilities,
            to: to.facilities,
        },
    }
}

/// Every station, Blue line first, then by name with case ignored. Built once
/// per process.
pub fn all_stations() -> &'static [MetroStation] {
    static ALL_STATIONS: OnceLock<Vec<MetroStation>> = OnceLock::new();

    ALL_STATIONS.get_or_init(|| {
        let mut stations = STATIONS.to_vec();
        stations.sort_by_cached_key(|s| (s.line, s.name.to_lowercase(), s.name));
        stations
    })
}

/// Station lookups plus the cached bits: search results and the service bulletin.
#[derive(Debug)]
pub struct MetroService {
    search_cache: Mutex<BoundedCache<String, Vec<MetroStation>>>,
    status_cache: Mutex<TimedCell<MetroStatus>>,
}

impl Default for MetroService {
    fn default() -> Self {
        Self::new()
    }
}

impl MetroService {
    pub fn new() -> Self {
        Self {
            search_cache: Mutex::new(BoundedCache::new(SEARCH_CACHE_CAPACITY)),
            status_cache: Mutex::new(TimedCell::new(STATUS_TTL)),
        }
    }

    /// Blank query: all stations. One character: nothing. Otherwise stations
    /// whose name or code contains the query, ordered like `all_stations`.
    pub fn search_stations(&self, query: &str) -> Vec<MetroStation> {
        if query.is_empty() {
            return all_stations().to_vec();
        }
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let normalized = query.to_lowercase();
        let mut cache = self
            .search_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        cache.get_or_insert_with(normalized.clone(), || {
            all_stations()
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&normalized)
                        || s.code.to_lowercase().contains(&normalized)
                })
                .copied()
                .collect()
        })
    }

    pub fn metro_status(&self) -> MetroStatus {
        self.status_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get_or_refresh(|| live::build_metro_status(now_in_ist()))
    }

    pub fn metro_route(&self, from_station: &str, to_station: &str) -> AcResult<MetroRoute> {
        let from = station_info(from_station)
            .ok_or_else(|| AcError::StationNotFound(from_station.to_string()))?;
        let to = station_info(to_station)
            .ok_or_else(|| AcError::StationNotFound(to_station.to_string()))?;

        let quote = fare::quote(from, to);
        let status = self.metro_status();
        let line_status = status.lines.get(&from.line);

        Ok(MetroRoute {
            from: from.name,
            to: to.name,
            line: quote.line,
            interchange: quote.interchange,
            duration: quote.duration,
            distance: quote.distance,
            fare: quote.fare,
            steps: metro_steps(from, to),
            accessibility: accessibility_info(from, to),
            realtime: Realtime {
                status: line_status.map_or_else(|| "Unknown".to_string(), |l| l.status.clone()),
                frequency: line_status
                    .map_or_else(|| "Unknown".to_string(), |l| l.frequency.clone()),
                delay: line_status.map_or(0, |l| l.delay),
            },
        })
    }

    pub fn live_timings(&self, station_name: &str) -> AcResult<LiveTimings> {
        self.live_timings_at(station_name, now_in_ist())
    }

    pub fn live_timings_at(
        &self,
        station_name: &str,
        now: DateTime<FixedOffset>,
    ) -> AcResult<LiveTimings> {
        let station = station_info(station_name)
            .ok_or_else(|| AcError::StationNotFound(station_name.to_string()))?;
        Ok(live::build_live_timings(station, now))
    }

    #[cfg(test)]
    fn cached_searches(&self) -> usize {
        self.search_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
