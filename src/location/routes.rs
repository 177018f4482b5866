use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// --- Filters
// ------------------------------------------------------------------------------------------------

/// Accessibility needs the traveller asked for. Each unmet need costs points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityFilters {
    pub wheelchair: bool,
    pub elevator: bool,
    pub audio: bool,
    pub braille: bool,
}

impl AccessibilityFilters {
    pub fn any(&self) -> bool {
        self.wheelchair || self.elevator || self.audio || self.braille
    }
}

// ------------------------------------------------------------------------------------------------
// --- RouteFeatures
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteFeatures {
    pub wheelchair_accessible: bool,
    pub elevator_available: bool,
    pub audio_announcements: bool,
    pub braille_signage: bool,
    pub low_floor_vehicles: bool,
    pub tactile_paving: bool,
    pub assistance_available: bool,
}

const BONUS_POINTS: i32 = 10;

/// Starts at 100, loses a fixed weight per unmet requested need, gains 10 per
/// bonus feature, and is clamped to 0..=100.
pub fn calculate_accessibility_score(route: &RouteFeatures, filters: &AccessibilityFilters) -> u8 {
    let mut score = 100;

    if filters.wheelchair && !route.wheelchair_accessible {
        score -= 30;
    }
    if filters.elevator && !route.elevator_available {
        score -= 20;
    }
    if filters.audio && !route.audio_announcements {
        score -= 15;
    }
    if filters.braille && !route.braille_signage {
        score -= 15;
    }

    for bonus in [
        route.low_floor_vehicles,
        route.tactile_paving,
        route.assistance_available,
    ] {
        if bonus {
            score += BONUS_POINTS;
        }
    }

    score.clamp(0, 100) as u8
}

pub fn accessibility_features(route: &RouteFeatures) -> Vec<&'static str> {
    [
        (route.wheelchair_accessible, "Wheelchair accessible"),
        (route.elevator_available, "Elevator available"),
        (route.audio_announcements, "Audio announcements"),
        (route.braille_signage, "Braille signage"),
        (route.low_floor_vehicles, "Low-floor vehicles"),
        (route.tactile_paving, "Tactile paving"),
        (route.assistance_available, "Staff assistance"),
    ]
    .into_iter()
    .filter_map(|(present, label)| present.then_some(label))
    .collect()
}

// ------------------------------------------------------------------------------------------------
// --- RouteOption
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOption {
    pub id: u32,
    pub duration: String,
    pub distance: String,
    pub cost: String,
    pub mode: String,
    pub steps: Vec<String>,
    #[serde(flatten)]
    pub features: RouteFeatures,
    pub carbon_footprint: String,
    pub crowd_level: String,
    pub accessibility_score: u8,
    pub accessibility_features: Vec<&'static str>,
}

struct RouteTemplate {
    id: u32,
    duration: &'static str,
    distance: &'static str,
    cost: &'static str,
    mode: &'static str,
    steps: &'static [&'static str],
    features: RouteFeatures,
    carbon_footprint: &'static str,
    crowd_level: &'static str,
}

const ROUTE_TEMPLATES: [RouteTemplate; 3] = [
    RouteTemplate {
        id: 1,
        duration: "35 mins",
        distance: "12.5 km",
        cost: "₹25",
        mode: "Metro + Walk",
        steps: &[
            "Walk 3 mins to nearest metro station",
            "Blue Line to Central (18 mins)",
            "Transfer to Green Line (2 mins)",
            "Green Line to destination (10 mins)",
            "Walk 2 mins to final destination",
        ],
        features: RouteFeatures {
            wheelchair_accessible: true,
            elevator_available: true,
            audio_announcements: true,
            braille_signage: false,
            low_floor_vehicles: true,
            tactile_paving: true,
            assistance_available: true,
        },
        carbon_footprint: "Low",
        crowd_level: "Medium",
    },
    RouteTemplate {
        id: 2,
        duration: "42 mins",
        distance: "8.2 km",
        cost: "₹15",
        mode: "Bus Only",
        steps: &[
            "Walk 2 mins to bus stop",
            "Route 21G to T.Nagar (25 mins)",
            "Transfer to Route 5B (3 mins wait)",
            "Route 5B to destination (12 mins)",
        ],
        features: RouteFeatures {
            wheelchair_accessible: false,
            elevator_available: false,
            audio_announcements: true,
            braille_signage: false,
            low_floor_vehicles: true,
            tactile_paving: false,
            assistance_available: false,
        },
        carbon_footprint: "Medium",
        crowd_level: "High",
    },
    RouteTemplate {
        id: 3,
        duration: "28 mins",
        distance: "11.8 km",
        cost: "₹45",
        mode: "Auto + Metro",
        steps: &[
            "Auto to Central Metro (12 mins)",
            "Blue Line to destination area (14 mins)",
            "Walk 2 mins to final destination",
        ],
        features: RouteFeatures {
            wheelchair_accessible: false,
            elevator_available: true,
            audio_announcements: true,
            braille_signage: true,
            low_floor_vehicles: false,
            tactile_paving: true,
            assistance_available: true,
        },
        carbon_footprint: "High",
        crowd_level: "Low",
    },
];

/// Builds the three canned options for a trip and scores them. The order is
/// only changed (best score first, ties kept) when at least one filter is on.
pub fn generate_route_options(
    from: &str,
    to: &str,
    filters: &AccessibilityFilters,
) -> Vec<RouteOption> {
    log::info!("Generating route options from {from:?} to {to:?} with {filters:?}");

    let mut options = ROUTE_TEMPLATES
        .iter()
        .map(|template| RouteOption {
            id: template.id,
            duration: template.duration.to_string(),
            distance: template.distance.to_string(),
            cost: template.cost.to_string(),
            mode: template.mode.to_string(),
            steps: template.steps.iter().map(|s| s.to_string()).collect(),
            features: template.features,
            carbon_footprint: template.carbon_footprint.to_string(),
            crowd_level: template.crowd_level.to_string(),
            accessibility_score: calculate_accessibility_score(&template.features, filters),
            accessibility_features: accessibility_features(&template.features),
        })
        .collect::<Vec<_>>();

    if filters.any() {
        options.sort_by(|a, b| b.accessibility_score.cmp(&a.accessibility_score));
    }

    options
}
