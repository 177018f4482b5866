use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use geo::Point;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_IN_KILOMETERS: f64 = 6371.0;

/// UTC+05:30, the offset every displayed clock time uses.
pub const IST_OFFSET_IN_SECONDS: i32 = 5 * 3600 + 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Geo points are (x, y), so longitude goes first.
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    pub fn distance_km(self, other: Coordinates) -> f64 {
        haversine_distance_km(self.lat, self.lng, other.lat, other.lng)
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

pub fn haversine_distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_IN_KILOMETERS * c
}

pub fn round_to_2_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_IN_SECONDS).unwrap_or_else(|| Utc.fix())
}

pub fn now_in_ist() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&ist())
}

pub fn add_minutes(date_time: DateTime<FixedOffset>, minutes: i64) -> DateTime<FixedOffset> {
    date_time + Duration::minutes(minutes)
}

pub fn create_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn create_date_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::new(
        create_date(year, month, day)?,
        NaiveTime::from_hms_opt(hour, minute, 0)?,
    );
    ist().from_local_datetime(&naive).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_same_point_has_zero_distance() {
        assert_eq!(haversine_distance_km(13.0827, 80.2707, 13.0827, 80.2707), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = haversine_distance_km(13.0827, 80.2707, 12.9941, 80.1709);
        let b = haversine_distance_km(12.9941, 80.1709, 13.0827, 80.2707);
        assert!((a - b).abs() < 1e-9);
        // Central to the airport is a bit over 14 km as the crow flies.
        assert!(a > 14.0 && a < 15.0, "{a}");
    }

    #[test]
    fn test_round_to_2_decimals() {
        assert_eq!(round_to_2_decimals(1.23456), 1.23);
        assert_eq!(round_to_2_decimals(1.235001), 1.24);
        assert_eq!(round_to_2_decimals(0.0), 0.0);
    }

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(13.0, 80.0).is_valid());
        assert!(!Coordinates::new(91.0, 80.0).is_valid());
        assert!(!Coordinates::new(13.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_to_point_puts_longitude_first() {
        let p = Coordinates::new(13.0, 80.0).to_point();
        assert_eq!(p.x(), 80.0);
        assert_eq!(p.y(), 13.0);
    }

    #[test]
    fn test_add_minutes_crosses_midnight() {
        let dt = create_date_time(2026, 6, 15, 23, 55).unwrap();
        let later = add_minutes(dt, 7);
        assert_eq!(later, create_date_time(2026, 6, 16, 0, 2).unwrap());
    }
}
