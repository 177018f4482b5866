use serde::Serialize;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
pub enum ServiceType {
    Express,
    Ordinary,
    Deluxe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteFare {
    pub ordinary: u32,
    pub deluxe: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusRoute {
    #[serde(rename = "routeNumber")]
    pub number: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub fare: RouteFare,
    pub frequency: &'static str,
    pub operating_hours: &'static str,
    pub key_stops: &'static [&'static str],
    pub accessibility: &'static [&'static str],
    pub distance: &'static str,
}

impl BusRoute {
    pub fn has_feature(&self, feature: &str) -> bool {
        self.accessibility.contains(&feature)
    }

    /// Text matched by route searches: name, key stops and number.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.key_stops.join(" "), self.number).to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BusStop {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub zone: &'static str,
    pub facilities: &'static [&'static str],
}

const LOW_FLOOR: &str = "Low Floor";
const WHEELCHAIR: &str = "Wheelchair Accessible";

#[rustfmt::skip]
pub static BUS_ROUTES: [BusRoute; 10] = [
    BusRoute {
        number: "1", name: "Broadway - Thiruvanmiyur", service_type: ServiceType::Express,
        fare: RouteFare { ordinary: 15, deluxe: 20 }, frequency: "10-15 minutes",
        operating_hours: "5:00 AM - 11:30 PM",
        key_stops: &["Broadway", "Mount Road", "Teynampet", "Adyar", "Thiruvanmiyur"],
        accessibility: &[LOW_FLOOR, WHEELCHAIR], distance: "25 km",
    },
    BusRoute {
        number: "2", name: "Broadway - Pallavaram", service_type: ServiceType::Express,
        fare: RouteFare { ordinary: 18, deluxe: 25 }, frequency: "8-12 minutes",
        operating_hours: "5:30 AM - 11:00 PM",
        key_stops: &["Broadway", "Central", "Guindy", "Pallavaram"],
        accessibility: &[LOW_FLOOR], distance: "30 km",
    },
    BusRoute {
        number: "5", name: "Broadway - Airport", service_type: ServiceType::Express,
        fare: RouteFare { ordinary: 20, deluxe: 30 }, frequency: "15-20 minutes",
        operating_hours: "4:30 AM - 12:00 AM",
        key_stops: &["Broadway", "Egmore", "Guindy", "Meenambakkam", "Airport"],
        accessibility: &[LOW_FLOOR, "AC Available"], distance: "35 km",
    },
    BusRoute {
        number: "12", name: "Broadway - Tambaram", service_type: ServiceType::Express,
        fare: RouteFare { ordinary: 22, deluxe: 32 }, frequency: "10-15 minutes",
        operating_hours: "5:00 AM - 11:30 PM",
        key_stops: &["Broadway", "Saidapet", "Guindy", "Chrompet", "Tambaram"],
        accessibility: &[LOW_FLOOR, WHEELCHAIR], distance: "40 km",
    },
    BusRoute {
        number: "21", name: "Broadway - Anna Nagar", service_type: ServiceType::Ordinary,
        fare: RouteFare { ordinary: 12, deluxe: 18 }, frequency: "8-12 minutes",
        operating_hours: "5:15 AM - 11:15 PM",
        key_stops: &["Broadway", "Egmore", "Kilpauk", "Anna Nagar"],
        accessibility: &["Standard"], distance: "20 km",
    },
    BusRoute {
        number: "23A", name: "Broadway - T.Nagar - Adyar", service_type: ServiceType::Ordinary,
        fare: RouteFare { ordinary: 14, deluxe: 20 }, frequency: "6-10 minutes",
        operating_hours: "5:00 AM - 11:45 PM",
        key_stops: &["Broadway", "Thousand Lights", "T.Nagar", "Saidapet", "Adyar"],
        accessibility: &[LOW_FLOOR, WHEELCHAIR], distance: "22 km",
    },
    BusRoute {
        number: "27D", name: "Broadway - OMR - Sholinganallur", service_type: ServiceType::Deluxe,
        fare: RouteFare { ordinary: 25, deluxe: 35 }, frequency: "15-20 minutes",
        operating_hours: "5:30 AM - 10:30 PM",
        key_stops: &["Broadway", "Adyar", "Thoraipakkam", "Sholinganallur"],
        accessibility: &["AC", LOW_FLOOR, "USB Charging"], distance: "45 km",
    },
    BusRoute {
        number: "42", name: "Koyambedu - Central - Beach", service_type: ServiceType::Ordinary,
        fare: RouteFare { ordinary: 10, deluxe: 15 }, frequency: "5-8 minutes",
        operating_hours: "5:00 AM - 12:00 AM",
        key_stops: &["Koyambedu", "Central", "Broadway", "High Court", "Beach"],
        accessibility: &["Standard"], distance: "18 km",
    },
    BusRoute {
        number: "70", name: "Koyambedu - Velachery", service_type: ServiceType::Express,
        fare: RouteFare { ordinary: 16, deluxe: 22 }, frequency: "10-15 minutes",
        operating_hours: "5:15 AM - 11:30 PM",
        key_stops: &["Koyambedu", "Vadapalani", "T.Nagar", "Guindy", "Velachery"],
        accessibility: &[LOW_FLOOR], distance: "28 km",
    },
    BusRoute {
        number: "100", name: "Koyambedu - Thiruvanmiyur", service_type: ServiceType::Express,
        fare: RouteFare { ordinary: 18, deluxe: 25 }, frequency: "12-18 minutes",
        operating_hours: "5:30 AM - 11:00 PM",
        key_stops: &["Koyambedu", "T.Nagar", "Adyar", "Besant Nagar", "Thiruvanmiyur"],
        accessibility: &[LOW_FLOOR, WHEELCHAIR], distance: "32 km",
    },
];

/// Served areas grouped by region.
pub const AREA_GROUPS: [(&str, &[&str]); 6] = [
    (
        "Central Chennai",
        &[
            "Broadway", "Central Railway Station", "Egmore", "Mount Road", "Anna Salai",
            "Thousand Lights", "T.Nagar", "Nungambakkam",
        ],
    ),
    (
        "North Chennai",
        &[
            "Koyambedu", "Anna Nagar", "Kilpauk", "Ambattur", "Avadi", "Red Hills", "Manali",
            "Ennore",
        ],
    ),
    (
        "South Chennai",
        &[
            "Adyar", "Velachery", "Tambaram", "Chrompet", "Pallavaram", "Thiruvanmiyur",
            "Besant Nagar", "Sholinganallur",
        ],
    ),
    (
        "West Chennai",
        &[
            "Porur", "Vadapalani", "Ashok Nagar", "K.K.Nagar", "Saidapet", "Guindy",
            "Kodambakkam", "Valasaravakkam",
        ],
    ),
    (
        "East Chennai",
        &[
            "Mylapore", "Triplicane", "Royapettah", "Mandaveli", "Foreshore Estate",
            "Tidel Park", "Perungudi", "Taramani",
        ],
    ),
    (
        "Special Destinations",
        &[
            "Chennai Airport", "Chennai Port", "Anna University", "IIT Madras",
            "Rajiv Gandhi Government Hospital", "Marina Beach", "Phoenix Mall",
        ],
    ),
];

const SHELTER: &str = "Shelter";
const METRO: &str = "Metro Connection";
const RAILWAY: &str = "Railway Connection";
const TERMINAL: &str = "Bus Terminal";

#[rustfmt::skip]
pub static BUS_STOPS: [BusStop; 12] = [
    BusStop { name: "Broadway", lat: 13.0878, lng: 80.2785, zone: "Central", facilities: &[SHELTER, "Digital Display"] },
    BusStop { name: "Central Railway Station", lat: 13.0827, lng: 80.2707, zone: "Central", facilities: &[METRO, SHELTER] },
    BusStop { name: "Egmore", lat: 13.0732, lng: 80.2609, zone: "Central", facilities: &[RAILWAY, SHELTER] },
    BusStop { name: "T.Nagar", lat: 13.0418, lng: 80.2341, zone: "Central", facilities: &["Shopping Hub", "Multiple Routes"] },
    BusStop { name: "Koyambedu", lat: 13.1043, lng: 80.1954, zone: "North", facilities: &[TERMINAL, METRO] },
    BusStop { name: "Anna Nagar", lat: 13.0876, lng: 80.2145, zone: "North", facilities: &[METRO, SHELTER] },
    BusStop { name: "Adyar", lat: 13.0067, lng: 80.2568, zone: "South", facilities: &[SHELTER, "Multiple Routes"] },
    BusStop { name: "Velachery", lat: 12.9749, lng: 80.2230, zone: "South", facilities: &[TERMINAL, SHELTER] },
    BusStop { name: "Thiruvanmiyur", lat: 12.9820, lng: 80.2707, zone: "South", facilities: &["Beach Access", SHELTER] },
    BusStop { name: "Guindy", lat: 13.0067, lng: 80.2101, zone: "West", facilities: &[RAILWAY, METRO] },
    BusStop { name: "Tambaram", lat: 12.9249, lng: 80.1000, zone: "South", facilities: &[RAILWAY, TERMINAL] },
    BusStop { name: "Airport", lat: 12.9941, lng: 80.1709, zone: "South", facilities: &["Airport Terminal", METRO] },
];

pub fn bus_route(number: &str) -> Option<&'static BusRoute> {
    BUS_ROUTES.iter().find(|r| r.number.eq_ignore_ascii_case(number.trim()))
}

/// Exact name first, then case-insensitive.
pub fn bus_stop(name: &str) -> Option<&'static BusStop> {
    BUS_STOPS
        .iter()
        .find(|s| s.name == name)
        .or_else(|| BUS_STOPS.iter().find(|s| s.name.eq_ignore_ascii_case(name.trim())))
}
