// ------------------------------------------------------------------------------------------------
// --- Static place tables for Chennai
// ------------------------------------------------------------------------------------------------

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::utils::Coordinates;

/// Chennai centre, the answer of last resort for every forward lookup.
pub const CHENNAI_CENTRE: Coordinates = Coordinates::new(13.0827, 80.2707);

/// Names offered while typing. The first eight double as the list shown for an empty query.
#[rustfmt::skip]
pub const SUGGESTIONS: &[&str] = &[
    // Metro stations
    "Chennai Central Metro Station",
    "Airport Metro Station",
    "Guindy Metro Station",
    "Anna Nagar Metro Station",
    "Thirumangalam Metro Station",
    "Koyambedu Metro Station",
    "Vadapalani Metro Station",
    "Ashok Nagar Metro Station",
    "Ekkattuthangal Metro Station",
    "Alandur Metro Station",
    "St. Thomas Mount Metro Station",
    "Meenambakkam Metro Station",

    // Railway stations
    "Chennai Central Railway Station",
    "Chennai Egmore Railway Station",
    "Tambaram Railway Station",
    "Chromepet Railway Station",
    "Pallavaram Railway Station",
    "Mambalam Railway Station",
    "Kodambakkam Railway Station",
    "Nungambakkam Railway Station",
    "Chetpet Railway Station",
    "Villivakkam Railway Station",

    // Hospitals
    "Apollo Hospital Greams Road",
    "Apollo Hospital Vanagaram",
    "Fortis Malar Hospital",
    "MIOT International Hospital",
    "Government General Hospital",
    "Stanley Medical College",
    "Voluntary Health Services Hospital",
    "Sri Ramachandra Medical Centre",
    "Global Health City",
    "Kauvery Hospital",

    // Shopping
    "Express Avenue Mall",
    "Phoenix MarketCity",
    "Forum Vijaya Mall",
    "Chennai Citi Centre",
    "Ampa Skywalk Mall",
    "VR Chennai Mall",
    "EA Mall",
    "Spencer Plaza",
    "The Forum Mall",

    // Sights
    "Marina Beach",
    "Kapaleeshwarar Temple",
    "San Thome Cathedral",
    "Fort St. George",
    "Government Museum",
    "Valluvar Kottam",
    "Elliot Beach",
    "Mahabalipuram",
    "Dakshinachitra",
    "Crocodile Bank",

    // Localities and roads
    "T. Nagar",
    "Anna Nagar",
    "Adyar",
    "Velachery",
    "Guindy",
    "Mylapore",
    "Triplicane",
    "Nungambakkam",
    "Alwarpet",
    "Kodambakkam",
    "Vadapalani",
    "Ashok Nagar",
    "Besant Nagar",
    "Thiruvanmiyur",
    "OMR",
    "ECR",
    "GST Road",
    "Mount Road",
    "Anna Salai",
    "Poonamallee High Road",
    "Grand Southern Trunk Road",
    "Rajiv Gandhi Salai",
    "East Coast Road",
    "Tambaram",
    "Chromepet",
    "Pallavaram",
    "Porur",
    "Perungudi",
    "Sholinganallur",
    "Thoraipakkam",
    "Taramani",
    "Royapettah",
    "Mandaveli",
    "Egmore",
    "Kilpauk",
    "Saidapet",
    "Teynampet",
    "Broadway",
    "Koyambedu",
    "Washermanpet",
    "Ambattur",
    "Avadi",
    "Valasaravakkam",
    "K.K. Nagar",

    // IT parks
    "Tidel Park",
    "DLF IT Park",
    "ELCOT IT Park",
    "Olympia Tech Park",
    "RMZ Millenia",
    "Brigade Magnum",
    "Prestige Palladium Bayan",
    "ASV Suntech Park",

    // Education
    "IIT Madras",
    "Anna University",
    "University of Madras",
    "Loyola College",
    "Stella Maris College",
    "Presidency College",
    "Ethiraj College",
    "Women Christian College",
    "Madras Christian College",
    "SRM University",
    "VIT Chennai",

    // Airport
    "Chennai International Airport",
    "Chennai Airport Terminal 1",
    "Chennai Airport Terminal 2",
    "Chennai Airport Terminal 3",
    "Chennai Airport Domestic",
    "Chennai Airport International",
];

/// Forward geocoding keys, matched by containment in either direction, first hit wins.
#[rustfmt::skip]
pub const GEOCODE_TABLE: &[(&str, f64, f64, &str)] = &[
    ("chennai central", 13.0836, 80.2750, "Chennai Central Railway Station"),
    ("airport",         13.0900, 80.1694, "Chennai International Airport"),
    ("marina beach",    13.0487, 80.2824, "Marina Beach"),
    ("anna nagar",      13.0878, 80.2088, "Anna Nagar"),
    ("guindy",          12.9965, 80.2209, "Guindy"),
    ("t nagar",         13.0418, 80.2341, "T. Nagar"),
    ("velachery",       12.9759, 80.2197, "Velachery"),
    ("adyar",           13.0067, 80.2206, "Adyar"),
];

/// Exact-name table the map falls back on when online geocoding has nothing.
#[rustfmt::skip]
pub const KNOWN_PLACES: &[(&str, f64, f64)] = &[
    ("chennai central",                  13.0827, 80.2707),
    ("central",                          13.0827, 80.2707),
    ("chennai central railway station",  13.0827, 80.2707),
    ("marina beach",                     13.0479, 80.2821),
    ("marina",                           13.0479, 80.2821),
    ("t nagar",                          13.0418, 80.2341),
    ("t.nagar",                          13.0418, 80.2341),
    ("tnagar",                           13.0418, 80.2341),
    ("velachery",                        12.9815, 80.2227),
    ("adyar",                            13.0067, 80.2514),
    ("mylapore",                         13.0339, 80.2619),
    ("triplicane",                       13.0569, 80.2707),
    ("anna nagar",                       13.0850, 80.2101),
    ("nungambakkam",                     13.0732, 80.2609),
    ("egmore",                           13.0732, 80.2609),
    ("chennai airport",                  12.9941, 80.1709),
    ("airport",                          12.9941, 80.1709),
    ("government estate metro station",  13.0732, 80.2609),
    ("government estate",                13.0732, 80.2609),
    ("high court metro station",         13.0732, 80.2609),
    ("high court",                       13.0732, 80.2609),
    ("express avenue",                   13.0732, 80.2609),
    ("spencer plaza",                    13.0732, 80.2609),
    ("phoenix marketcity",               12.9815, 80.2227),
    ("forum vijaya mall",                12.9815, 80.2227),
    ("omr",                              12.9202, 80.2316),
    ("old mahabalipuram road",           12.9202, 80.2316),
    ("sholinganallur",                   12.9010, 80.2279),
    ("perungudi",                        12.9165, 80.2430),
    ("thoraipakkam",                     12.9342, 80.2446),
];

/// Reverse geocoding rectangles: (lat_min, lat_max, lng_min, lng_max, name).
/// Checked in order, boundaries included.
#[rustfmt::skip]
pub const AREAS: &[(f64, f64, f64, f64, &str)] = &[
    (13.08,  13.09,  80.27,  80.28,  "Chennai Central"),
    (13.08,  13.10,  80.16,  80.18,  "Airport Area"),
    (13.04,  13.06,  80.28,  80.29,  "Marina Beach"),
    (13.08,  13.10,  80.20,  80.22,  "Anna Nagar"),
    (12.99,  13.01,  80.21,  80.23,  "Guindy"),
    (13.03,  13.05,  80.225, 80.245, "T. Nagar"),
    (12.965, 12.99,  80.21,  80.235, "Velachery"),
    (12.995, 13.015, 80.24,  80.265, "Adyar"),
    (13.025, 13.045, 80.255, 80.275, "Mylapore"),
    (13.05,  13.065, 80.265, 80.28,  "Triplicane"),
    (13.065, 13.08,  80.25,  80.265, "Egmore"),
    (13.06,  13.07,  80.235, 80.25,  "Nungambakkam"),
    (13.045, 13.06,  80.20,  80.22,  "Vadapalani"),
    (13.065, 13.08,  80.185, 80.20,  "Koyambedu"),
    (13.015, 13.03,  80.215, 80.23,  "Saidapet"),
    (12.91,  12.94,  80.09,  80.13,  "Tambaram"),
    (12.94,  12.96,  80.135, 80.155, "Chromepet"),
    (12.96,  12.975, 80.14,  80.16,  "Pallavaram"),
    (12.97,  12.985, 80.175, 80.195, "Meenambakkam"),
    (13.03,  13.045, 80.145, 80.17,  "Porur"),
    (12.89,  12.91,  80.215, 80.24,  "Sholinganallur"),
    (12.91,  12.925, 80.235, 80.255, "Perungudi"),
    (12.925, 12.945, 80.235, 80.255, "Thoraipakkam"),
    (12.975, 12.99,  80.26,  80.28,  "Thiruvanmiyur"),
    (12.995, 13.005, 80.265, 80.28,  "Besant Nagar"),
    (13.10,  13.115, 80.27,  80.285, "Washermanpet"),
    (13.13,  13.155, 80.285, 80.305, "Thiruvottriyur"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerKind {
    Wheelchair,
    Elevator,
    Audio,
    Braille,
    Hazard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityMarker {
    pub position: Coordinates,
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub title: &'static str,
    pub description: &'static str,
}

#[rustfmt::skip]
pub fn accessibility_markers() -> Vec<AccessibilityMarker> {
    vec![
        AccessibilityMarker {
            position: Coordinates::new(13.0836, 80.2750),
            kind: MarkerKind::Wheelchair,
            title: "Chennai Central - Wheelchair Access",
            description: "Ramps and lifts available. Accessible restrooms on platform 1.",
        },
        AccessibilityMarker {
            position: Coordinates::new(13.0847, 80.2745),
            kind: MarkerKind::Elevator,
            title: "Chennai Central - Elevator",
            description: "Main elevator connecting all platforms. Operating 24/7.",
        },
        AccessibilityMarker {
            position: Coordinates::new(13.0900, 80.1694),
            kind: MarkerKind::Wheelchair,
            title: "Airport Metro - Accessible",
            description: "Full wheelchair accessibility with tactile paths.",
        },
        AccessibilityMarker {
            position: Coordinates::new(13.0495, 80.2820),
            kind: MarkerKind::Audio,
            title: "Marina Beach - Audio Signals",
            description: "Audio crossing signals for visually impaired.",
        },
        AccessibilityMarker {
            position: Coordinates::new(13.0418, 80.2341),
            kind: MarkerKind::Braille,
            title: "T. Nagar - Braille Signage",
            description: "Braille maps and tactile indicators available.",
        },
        AccessibilityMarker {
            position: Coordinates::new(12.9965, 80.2209),
            kind: MarkerKind::Hazard,
            title: "Guindy - Construction",
            description: "Temporary accessibility barriers due to metro construction.",
        },
    ]
}
