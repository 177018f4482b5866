use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::error::{AcError, AcResult};
use crate::utils::{haversine_distance_km, round_to_2_decimals};

use super::stations::{MetroStation, station_index, station_info};

pub const AVERAGE_SPEED_IN_KILOMETERS_PER_HOUR: f64 = 40.0;
pub const MINUTES_PER_STATION: u32 = 2;
pub const INTERCHANGE_MINUTES: u32 = 5;
pub const CURRENCY: &str = "INR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
pub enum FareClass {
    #[strum(serialize = "zone1_to_zone1")]
    #[serde(rename = "zone1_to_zone1")]
    Zone1ToZone1,
    #[strum(serialize = "zone1_to_zone2")]
    #[serde(rename = "zone1_to_zone2")]
    Zone1ToZone2,
    #[strum(serialize = "zone2_to_zone2")]
    #[serde(rename = "zone2_to_zone2")]
    Zone2ToZone2,
}

impl FareClass {
    pub fn between(from_zone: u8, to_zone: u8) -> Self {
        match (from_zone, to_zone) {
            (1, 1) => Self::Zone1ToZone1,
            (1, 2) | (2, 1) => Self::Zone1ToZone2,
            _ => Self::Zone2ToZone2,
        }
    }

    pub fn band(self) -> FareBand {
        match self {
            Self::Zone1ToZone1 => FareBand {
                min: 20,
                max: 30,
                token: 20,
                card: 18,
            },
            Self::Zone1ToZone2 => FareBand {
                min: 30,
                max: 50,
                token: 40,
                card: 36,
            },
            Self::Zone2ToZone2 => FareBand {
                min: 20,
                max: 30,
                token: 25,
                card: 22,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FareBand {
    pub min: u32,
    pub max: u32,
    pub token: u32,
    pub card: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fare {
    pub token: u32,
    pub card: u32,
    pub currency: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    pub from: &'static str,
    pub to: &'static str,
    /// Straight-line distance in km.
    pub distance: f64,
    pub fare: Fare,
    /// Minutes.
    pub duration: u32,
    /// The shared line's name, or "Interchange".
    pub line: String,
    pub interchange: bool,
}

/// Haversine distance in km, rounded to two decimals.
pub fn calculate_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    round_to_2_decimals(haversine_distance_km(lat1, lng1, lat2, lng2))
}

/// Number of stations between the two, counted in table order. This is not
/// the number of stops actually ridden when the table order differs from the
/// physical order of a line.
pub fn station_count(from: &MetroStation, to: &MetroStation) -> u32 {
    match (station_index(from), station_index(to)) {
        (Some(from), Some(to)) => from.abs_diff(to) as u32,
        _ => 0,
    }
}

/// Minutes: distance at 40 km/h, plus 2 per station in between, plus 5 for a line change.
pub fn estimate_travel_time(from: &MetroStation, to: &MetroStation) -> u32 {
    let distance = calculate_distance(from.lat, from.lng, to.lat, to.lng);
    let travel_time = distance / AVERAGE_SPEED_IN_KILOMETERS_PER_HOUR * 60.0;
    let station_time = station_count(from, to) * MINUTES_PER_STATION;
    let interchange_time = if from.line != to.line {
        INTERCHANGE_MINUTES
    } else {
        0
    };

    (travel_time + f64::from(station_time + interchange_time)).round() as u32
}

pub fn calculate_fare(from_station: &str, to_station: &str) -> AcResult<FareQuote> {
    let from = station_info(from_station)
        .ok_or_else(|| AcError::StationNotFound(from_station.to_string()))?;
    let to = station_info(to_station)
        .ok_or_else(|| AcError::StationNotFound(to_station.to_string()))?;

    Ok(quote(from, to))
}

pub fn quote(from: &'static MetroStation, to: &'static MetroStation) -> FareQuote {
    let band = FareClass::between(from.zone, to.zone).band();
    let interchange = from.line != to.line;

    FareQuote {
        from: from.name,
        to: to.name,
        distance: calculate_distance(from.lat, from.lng, to.lat, to.lng),
        fare: Fare {
            token: band.token,
            card: band.card,
            currency: CURRENCY,
        },
        duration: estimate_travel_time(from, to),
        line: if interchange {
            "Interchange".to_string()
        } else {
            from.line.to_string()
        },
        interchange,
    }
}

pub fn format_price(price: u32) -> String {
    format!("₹{price}")
}
