use std::{net::Ipv4Addr, path::PathBuf};

use clap::{Parser, Subcommand};

use crate::backend::{AlertCategory, MessageType};
use crate::config::AppConfig;
use crate::location::{AccessibilityFilters, DEFAULT_NOMINATIM_URL, Position};
use crate::map::{MapProvider, TravelMode};
use crate::preferences::{InteractionMode, Language, PreferencesUpdate, Theme};

#[derive(Parser, Debug, Clone, Default)]
pub struct FiltersArgsBuilder {
    /// Require step-free wheelchair access
    #[arg(long, default_value_t = false)]
    wheelchair: bool,
    /// Require elevators
    #[arg(long, default_value_t = false)]
    elevator: bool,
    /// Require audio announcements
    #[arg(long, default_value_t = false)]
    audio: bool,
    /// Require braille signage
    #[arg(long, default_value_t = false)]
    braille: bool,
}

impl FiltersArgsBuilder {
    pub fn finalize(self) -> AccessibilityFilters {
        let Self {
            wheelchair,
            elevator,
            audio,
            braille,
        } = self;

        AccessibilityFilters {
            wheelchair,
            elevator,
            audio,
            braille,
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct PositionArgsBuilder {
    /// Latitude reported by the device
    #[arg(long)]
    lat: Option<f64>,
    /// Longitude reported by the device
    #[arg(long)]
    lng: Option<f64>,
    /// Accuracy of the fix in metres
    #[arg(long, default_value_t = 20.0)]
    accuracy: f64,
}

impl PositionArgsBuilder {
    /// `None` when the device gave no fix.
    pub fn finalize(self) -> Option<Position> {
        let Self { lat, lng, accuracy } = self;
        Some(Position {
            lat: lat?,
            lng: lng?,
            accuracy,
        })
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct PreferencesArgsBuilder {
    /// Interface language: en or ta
    #[arg(long)]
    language: Option<Language>,
    /// Colour theme: light, dark or high-contrast
    #[arg(long)]
    theme: Option<Theme>,
    /// Interaction mode: normal or voice
    #[arg(long)]
    mode: Option<InteractionMode>,
}

impl PreferencesArgsBuilder {
    /// `None` when nothing is to be changed.
    pub fn finalize(self) -> Option<PreferencesUpdate> {
        let Self {
            language,
            theme,
            mode,
        } = self;

        if language.is_none() && theme.is_none() && mode.is_none() {
            return None;
        }
        Some(PreferencesUpdate {
            language,
            theme,
            mode,
        })
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Serve mode to a given port
    Serve {
        /// Ipv4 served, defaults to 0.0.0.0
        #[arg(short, long, default_value_t = Ipv4Addr::new(0, 0, 0, 0))]
        address: Ipv4Addr,

        /// Port exposed on the server
        #[arg(short, long, default_value_t = 8100)]
        port: u16,
    },
    /// Remember a signed-in user locally
    Login {
        /// Id given by the account service
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the signed-in user
    Logout,
    /// Place names matching what has been typed so far
    Suggest {
        #[arg(default_value_t = String::new())]
        query: String,
    },
    /// Offline coordinates for an address
    Geocode { address: String },
    /// Area name for a coordinate
    Reverse {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
    },
    /// Accessibility features to show on the map
    Markers,
    /// Scored route options between two places
    Routes {
        from: String,
        to: String,
        #[command(flatten)]
        filters: FiltersArgsBuilder,
        /// Also store the search for the signed-in user
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    /// Route searches stored on the server
    SavedRoutes,
    /// Metro fare between two stations
    Fare { from: String, to: String },
    /// Metro journey with steps and accessibility details
    MetroRoute { from: String, to: String },
    /// Search the metro stations, all of them for an empty query
    Stations {
        #[arg(default_value_t = String::new())]
        query: String,
    },
    /// Network status
    Status {
        /// Bus network instead of metro
        #[arg(long, default_value_t = false)]
        bus: bool,
    },
    /// Next metro arrivals at a station
    Timings { station: String },
    /// Search bus routes, areas and stops
    BusSearch { query: String },
    /// Bus routes serving two places
    BusBetween { from: String, to: String },
    /// Bus fare between two stops
    BusFare { from: String, to: String },
    /// Show the preferences, or change the given ones
    Prefs {
        #[command(flatten)]
        preferences: PreferencesArgsBuilder,
    },
    /// CSS variables of the current preferences
    Theme,
    /// Where the device is
    Locate {
        #[command(flatten)]
        position: PositionArgsBuilder,
    },
    /// Route drawn on the map view
    MapRoute {
        from: String,
        to: String,
        /// Travel mode: walking, driving or transit
        #[arg(long, default_value_t = TravelMode::Walking)]
        mode: TravelMode,
        /// Map provider: google or openstreetmap, chosen from the key when absent
        #[arg(long)]
        provider: Option<MapProvider>,
        /// Print the straight-line route as a GeoJSON feature
        #[arg(long, default_value_t = false)]
        geojson: bool,
    },
    /// Record a visit to a place
    SaveDestination {
        name: String,
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
        #[arg(long)]
        address: Option<String>,
        /// Defaults to the signed-in user
        #[arg(long)]
        user_id: Option<i64>,
    },
    /// Most visited places
    Destinations {
        /// Defaults to the signed-in user
        #[arg(long)]
        user_id: Option<i64>,
    },
    /// Action asked for by a spoken phrase
    Voice {
        #[arg(required = true)]
        phrase: Vec<String>,
    },
    /// Travel alerts, newest first
    Alerts,
    /// Report a travel alert
    PostAlert {
        message: String,
        /// transport, accessibility, roadway, weather or emergency
        #[arg(long, default_value_t = AlertCategory::Transport)]
        category: AlertCategory,
        #[arg(long)]
        location: Option<String>,
    },
    /// Community posts, newest first
    Messages,
    /// Post to the community board
    PostMessage {
        message: String,
        /// chat, review, help, info or emergency
        #[arg(long = "type", default_value_t = MessageType::Chat)]
        kind: MessageType,
        #[arg(long)]
        location: Option<String>,
        /// Defaults to the signed-in user
        #[arg(long)]
        user_id: Option<i64>,
    },
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the local store, defaults to "./"
    #[arg(long, env = "AC_DATA_DIR", default_value = "./", global = true)]
    pub data_dir: PathBuf,
    /// Base URL of the preferences and routes API
    #[arg(long, env = "AC_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,
    /// Enables Google maps and directions
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", global = true, hide_env_values = true)]
    pub google_maps_key: Option<String>,
    /// Geocoding service
    #[arg(long, env = "AC_NOMINATIM_URL", default_value = DEFAULT_NOMINATIM_URL, global = true)]
    pub nominatim_url: String,
    /// What mode is used
    #[command(subcommand)]
    pub mode: Mode,
}

impl Cli {
    pub fn config(&self) -> AppConfig {
        AppConfig {
            data_dir: self.data_dir.clone(),
            backend_url: self.backend_url.clone(),
            google_maps_key: self.google_maps_key.clone(),
            nominatim_url: self.nominatim_url.clone(),
        }
    }
}
