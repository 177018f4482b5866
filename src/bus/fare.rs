use serde::Serialize;

use crate::error::{AcError, AcResult};
use crate::utils::{haversine_distance_km, round_to_2_decimals};

use super::data::bus_stop;

pub const DELUXE_MULTIPLIER: f64 = 1.4;
pub const AC_MULTIPLIER: f64 = 1.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusFare {
    pub ordinary: u32,
    pub deluxe: u32,
    pub ac: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialOffers {
    pub women: &'static str,
    pub disabled: &'static str,
    pub transgender: &'static str,
}

impl Default for SpecialOffers {
    fn default() -> Self {
        Self {
            women: "Free in ordinary buses",
            disabled: "Free with attender",
            transgender: "Free",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusFareQuote {
    pub from: &'static str,
    pub to: &'static str,
    pub distance: f64,
    pub fare: BusFare,
    pub special_offers: SpecialOffers,
}

/// Ordinary fare for a straight-line distance in km.
pub fn base_fare(distance: f64) -> u32 {
    match distance {
        d if d > 30.0 => 25,
        d if d > 20.0 => 20,
        d if d > 10.0 => 15,
        d if d > 5.0 => 12,
        _ => 8,
    }
}

impl BusFare {
    pub fn from_base(base: u32) -> Self {
        Self {
            ordinary: base,
            deluxe: (f64::from(base) * DELUXE_MULTIPLIER).round() as u32,
            ac: (f64::from(base) * AC_MULTIPLIER).round() as u32,
        }
    }
}

pub fn calculate_fare(from_stop: &str, to_stop: &str) -> AcResult<BusFareQuote> {
    let from =
        bus_stop(from_stop).ok_or_else(|| AcError::BusStopNotFound(from_stop.to_string()))?;
    let to = bus_stop(to_stop).ok_or_else(|| AcError::BusStopNotFound(to_stop.to_string()))?;

    let distance = haversine_distance_km(from.lat, from.lng, to.lat, to.lng);

    Ok(BusFareQuote {
        from: from.name,
        to: to.name,
        distance: round_to_2_decimals(distance),
        fare: BusFare::from_base(base_fare(distance)),
        special_offers: SpecialOffers::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn test_distance_bands() {
        assert_eq!(base_fare(0.0), 8);
        assert_eq!(base_fare(5.0), 8);
        assert_eq!(base_fare(5.01), 12);
        assert_eq!(base_fare(10.5), 15);
        assert_eq!(base_fare(20.5), 20);
        assert_eq!(base_fare(31.0), 25);
    }

    #[test]
    fn test_multipliers_round() {
        assert_eq!(
            BusFare::from_base(12),
            BusFare {
                ordinary: 12,
                deluxe: 17,
                ac: 22
            }
        );
        assert_eq!(BusFare::from_base(8), BusFare { ordinary: 8, deluxe: 11, ac: 14 });
    }

    #[test]
    fn test_fare_between_stops() {
        // Broadway to Central is under a kilometre.
        let quote = calculate_fare("Broadway", "Central Railway Station").unwrap();
        assert_eq!(quote.fare.ordinary, 8);
        assert!(quote.distance < 1.5);

        // Broadway to Tambaram is well over 20 km.
        let quote = calculate_fare("Broadway", "Tambaram").unwrap();
        assert_eq!(quote.fare.ordinary, 20);
        assert_eq!(quote.special_offers.transgender, "Free");
    }

    #[test]
    fn test_unknown_stop() {
        assert!(matches!(
            calculate_fare("Broadway", "Mylapore"),
            Err(AcError::BusStopNotFound(stop)) if stop == "Mylapore"
        ));
    }
}
