use serde::Serialize;
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString,
)]
pub enum Line {
    Blue,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetroStation {
    pub name: &'static str,
    pub code: &'static str,
    pub line: Line,
    /// Fare zone, 1 (inner) or 2 (outer).
    pub zone: u8,
    pub lat: f64,
    pub lng: f64,
    pub facilities: &'static [&'static str],
    pub connections: &'static [&'static str],
}

impl MetroStation {
    pub fn has_facility(&self, facility: &str) -> bool {
        self.facilities.contains(&facility)
    }
}

#[allow(clippy::too_many_arguments)]
const fn station(
    name: &'static str,
    code: &'static str,
    line: Line,
    zone: u8,
    lat: f64,
    lng: f64,
    facilities: &'static [&'static str],
    connections: &'static [&'static str],
) -> MetroStation {
    MetroStation {
        name,
        code,
        line,
        zone,
        lat,
        lng,
        facilities,
        connections,
    }
}

const E: &str = "Escalator";
const L: &str = "Lift";
const P: &str = "Parking";

/// Every station in declaration order: the Blue line from Wimco Nagar to the
/// airport, then the Green line. Travel time estimates rely on this order.
#[rustfmt::skip]
pub static STATIONS: [MetroStation; 41] = [
    station("Wimco Nagar Depot", "WND", Line::Blue, 1, 13.1543, 80.3012, &[P], &[]),
    station("Wimco Nagar", "WN", Line::Blue, 1, 13.1487, 80.2987, &[P], &[]),
    station("Thiruvottriyur", "TVR", Line::Blue, 1, 13.1423, 80.2943, &[], &[]),
    station("Thiruvottriyur Theradi", "TVRT", Line::Blue, 1, 13.1376, 80.2898, &[], &[]),
    station("Kaladipet", "KLD", Line::Blue, 1, 13.1312, 80.2854, &[], &[]),
    station("Tollgate", "TG", Line::Blue, 1, 13.1254, 80.2812, &[], &[]),
    station("New Washermanpet", "NWP", Line::Blue, 1, 13.1198, 80.2776, &[], &[]),
    station("Tondiarpet", "TNP", Line::Blue, 1, 13.1143, 80.2734, &[], &[]),
    station("Sir Theagaraya College", "STC", Line::Blue, 1, 13.1087, 80.2689, &[], &[]),
    station("Washermanpet", "WMP", Line::Blue, 1, 13.1043, 80.2767, &[E, L, P], &[]),
    station("Mannadi", "MAN", Line::Blue, 1, 13.0947, 80.2826, &[E, L], &[]),
    station("High Court", "HC", Line::Blue, 1, 13.0884, 80.2854, &[E, L, P], &[]),
    station("MGR Central (Chennai Central)", "MS", Line::Blue, 1, 13.0827, 80.2707,
        &[E, L, P, "Food Court"], &["Railway Station", "Bus Terminal", "Green Line Interchange"]),
    station("Government Estate", "GE", Line::Blue, 1, 13.0732, 80.2609, &[E, L, P], &[]),
    station("LIC", "LIC", Line::Blue, 1, 13.0676, 80.2548, &[E, L], &[]),
    station("Thousand Lights", "TL", Line::Blue, 1, 13.0615, 80.2482, &[E, L, P], &[]),
    station("AG DMS", "AGDMS", Line::Blue, 1, 13.0565, 80.2425, &[E, L], &[]),
    station("Teynampet", "TNP", Line::Blue, 1, 13.0479, 80.2343, &[E, L, P], &[]),
    station("Nandanam", "NAN", Line::Blue, 1, 13.0398, 80.2275, &[E, L], &[]),
    station("Saidapet", "SAI", Line::Blue, 1, 13.0321, 80.2234, &[E, L, P], &["Bus Terminal"]),
    station("Little Mount", "LM", Line::Blue, 2, 13.0187, 80.2165, &[E, L, P], &[]),
    station("Guindy", "GUI", Line::Blue, 2, 13.0067, 80.2101, &[E, L, P], &["Railway Station"]),
    station("Arignar Anna Alandur", "ALA", Line::Blue, 2, 12.9954, 80.2067,
        &[E, L, P], &["Railway Station", "Bus Terminal", "Green Line Interchange"]),
    station("Nanganallur Road", "NGL", Line::Blue, 2, 12.9823, 80.1987, &[E, L], &[]),
    station("Meenambakkam", "MBM", Line::Blue, 2, 12.9765, 80.1865, &[E, L, P], &[]),
    station("Chennai International Airport", "AIR", Line::Blue, 2, 12.9941, 80.1709,
        &[E, L, P, "Airport Shuttle"], &["Chennai Airport Terminal 1", "Airport Terminal 3"]),

    station("Egmore", "EGM", Line::Green, 1, 13.0732, 80.2609, &[E, L, P], &["Railway Station"]),
    station("Nehru Park", "NP", Line::Green, 1, 13.0789, 80.2487, &[E, L], &[]),
    station("Kilpauk Medical College", "KMC", Line::Green, 1, 13.0834, 80.2398, &[E, L], &[]),
    station("Pachaiyappa College", "PC", Line::Green, 1, 13.0876, 80.2312, &[E, L], &[]),
    station("Shenoy Nagar", "SN", Line::Green, 1, 13.0732, 80.2234, &[E, L, P], &[]),
    station("Anna Nagar East", "ANE", Line::Green, 1, 13.0876, 80.2145, &[E, L], &[]),
    station("Anna Nagar Tower", "ANT", Line::Green, 1, 13.0934, 80.2087, &[E, L], &[]),
    station("Thirumangalam", "TM", Line::Green, 1, 13.0987, 80.2023, &[E, L], &[]),
    station("Koyambedu", "KYB", Line::Green, 1, 13.1043, 80.1954, &[E, L, P], &["Bus Terminal"]),
    station("CMBT", "CMBT", Line::Green, 1, 13.1098, 80.1887, &[E, L, P], &["Major Bus Terminal"]),
    station("Arumbakkam", "ABK", Line::Green, 1, 13.1154, 80.1823, &[E, L], &[]),
    station("Vadapalani", "VDP", Line::Green, 1, 13.1023, 80.1765, &[E, L], &[]),
    station("Ashok Nagar", "ASN", Line::Green, 1, 13.0967, 80.1698, &[E, L], &[]),
    station("Ekkattuthangal", "EKT", Line::Green, 2, 13.0021, 80.2054, &[E, L], &[]),
    station("St Thomas Mount", "STM", Line::Green, 2, 13.0021, 80.2054, &[E, L, P], &["Railway Station"]),
];

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Finds a station by exact name, then by loose containment of the names with
/// case and punctuation ignored ("central" finds "MGR Central (Chennai Central)").
pub fn station_info(name: &str) -> Option<&'static MetroStation> {
    if let Some(station) = STATIONS.iter().find(|s| s.name == name) {
        return Some(station);
    }

    let input = normalize(name);
    if input.is_empty() {
        return None;
    }

    STATIONS.iter().find(|s| {
        let candidate = normalize(s.name);
        candidate.contains(&input) || input.contains(&candidate)
    })
}

/// Position of the first station in `STATIONS` with the same code. Codes are
/// not unique: Teynampet resolves to Tondiarpet's row.
pub fn station_index(station: &MetroStation) -> Option<usize> {
    STATIONS.iter().position(|s| s.code == station.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_exact_and_fuzzy_lookup() {
        assert_eq!(station_info("Egmore").map(|s| s.code), Some("EGM"));
        assert_eq!(station_info("egmore").map(|s| s.code), Some("EGM"));
        assert_eq!(station_info("Chennai Central").map(|s| s.code), Some("MS"));
        assert_eq!(station_info("St. Thomas Mount").map(|s| s.code), Some("STM"));
        // The input may also contain the station name.
        assert_eq!(station_info("Guindy metro stop").map(|s| s.code), Some("GUI"));
    }

    #[test]
    fn test_unknown_and_blank_lookup() {
        assert!(station_info("Mumbai CST").is_none());
        assert!(station_info("").is_none());
        assert!(station_info(" - ").is_none());
    }

    #[test]
    fn test_station_index_uses_first_code_match() {
        // Tondiarpet and Teynampet share the code TNP.
        let tondiarpet = station_info("Tondiarpet").unwrap();
        let teynampet = station_info("Teynampet").unwrap();
        assert_eq!(station_index(tondiarpet), Some(7));
        assert_eq!(station_index(teynampet), Some(7));
        assert_eq!(station_index(station_info("Nandanam").unwrap()), Some(18));
    }

    #[test]
    fn test_table_shape() {
        assert!(STATIONS.iter().all(|s| s.zone == 1 || s.zone == 2));
        let blue = STATIONS.iter().filter(|s| s.line == Line::Blue).count();
        assert_eq!(blue, 26);
        assert_eq!(STATIONS.len() - blue, 15);
    }
}
