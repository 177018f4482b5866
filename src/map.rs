mod directions;
mod sdk;
mod state;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub use directions::{
    DEFAULT_FROM, DEFAULT_TO, DirectRoute, DirectRouteResolver, GoogleDirectionsResolver,
    RouteResolver, parse_directions_response,
};
pub use sdk::{HttpSdkLoader, SDK_LOAD_TIMEOUT, SdkLoader};
pub use state::{DirectionStep, FallbackPanel, MapEvent, MapState, RouteSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum MapProvider {
    #[strum(serialize = "google")]
    #[serde(rename = "google")]
    Google,
    #[strum(serialize = "openstreetmap")]
    #[serde(rename = "openstreetmap")]
    OpenStreetMap,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Driving,
    Transit,
}

impl TravelMode {
    /// Rough pace used when only the straight-line distance is known.
    pub fn minutes_per_km(self) -> f64 {
        match self {
            Self::Walking => 12.0,
            Self::Driving => 3.0,
            Self::Transit => 8.0,
        }
    }
}

/// One map view: loads the provider's library, then shows routes on request.
/// Whatever fails, the state stays something that can be rendered.
pub struct MapSession<L: SdkLoader, R: RouteResolver> {
    provider: MapProvider,
    loader: L,
    resolver: R,
    load_timeout: Duration,
    state: MapState,
}

impl<L: SdkLoader, R: RouteResolver> MapSession<L, R> {
    pub fn new(provider: MapProvider, loader: L, resolver: R) -> Self {
        Self {
            provider,
            loader,
            resolver,
            load_timeout: SDK_LOAD_TIMEOUT,
            state: MapState::Loading,
        }
    }

    pub fn with_load_timeout(mut self, load_timeout: Duration) -> Self {
        self.load_timeout = load_timeout;
        self
    }

    // Getters/Setters

    pub fn provider(&self) -> MapProvider {
        self.provider
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    // Functions

    fn handle(&mut self, event: MapEvent) {
        let state = std::mem::replace(&mut self.state, MapState::Loading);
        self.state = state.next(self.provider, event);
    }

    /// Loads the library unless that already happened.
    pub async fn open(&mut self) -> &MapState {
        if self.state != MapState::Loading {
            return &self.state;
        }

        let event = match tokio::time::timeout(self.load_timeout, self.loader.load(self.provider))
            .await
        {
            Ok(Ok(())) => MapEvent::SdkLoaded,
            Ok(Err(e)) => MapEvent::SdkFailed(e.to_string()),
            Err(_) => MapEvent::SdkTimedOut,
        };
        self.handle(event);
        &self.state
    }

    pub async fn show_route(&mut self, from: &str, to: &str, mode: TravelMode) -> &MapState {
        self.handle(MapEvent::RouteRequested {
            from: from.to_string(),
            to: to.to_string(),
        });
        if !matches!(self.state, MapState::RouteLoading { .. }) {
            return &self.state;
        }

        let event = match self.resolver.resolve(from, to, mode).await {
            Ok(summary) => MapEvent::RouteResolved(summary),
            Err(e) => MapEvent::RouteFailed(e.to_string()),
        };
        self.handle(event);
        &self.state
    }
}
