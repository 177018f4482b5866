// ------------------------------------------------------------------------------------------------
// --- Map view lifecycle
//
// Loading ──SdkLoaded──▶ Ready ──RouteRequested──▶ RouteLoading ──RouteResolved──▶ RouteReady
//    │                                                  │
//    └─SdkFailed/SdkTimedOut─▶ Fallback                 └──RouteFailed──▶ RouteError
//
// Fallback is terminal. RouteReady and RouteError accept new route requests.
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use crate::utils::Coordinates;

use super::MapProvider;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionStep {
    pub instruction: String,
    pub distance: String,
    pub duration: String,
}

/// What the route card shows, with the line to draw when there is one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance: String,
    pub duration: String,
    pub start_address: String,
    pub end_address: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<DirectionStep>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Coordinates>,
}

/// Static panel shown in place of the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackPanel {
    pub title: String,
    pub message: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl FallbackPanel {
    pub fn sdk_unavailable(provider: MapProvider, reason: &str) -> Self {
        let (title, message) = match provider {
            MapProvider::Google => (
                "Google Maps API Required",
                "To see real Google Maps with live directions, please add a valid Google Maps API key to the project.",
            ),
            MapProvider::OpenStreetMap => (
                "Map Loading...",
                "The map could not be loaded. Route details are still available below.",
            ),
        };
        log::warn!("{provider} map unavailable: {reason}");

        Self {
            title: title.to_string(),
            message: message.to_string(),
            from: None,
            to: None,
        }
    }

    pub fn route_failed(from: &str, to: &str, reason: &str) -> Self {
        Self {
            title: "Route unavailable".to_string(),
            message: format!("Could not calculate a route: {reason}"),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum MapState {
    Loading,
    Fallback(FallbackPanel),
    Ready,
    RouteLoading { from: String, to: String },
    RouteReady(RouteSummary),
    RouteError(FallbackPanel),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    SdkLoaded,
    SdkFailed(String),
    SdkTimedOut,
    RouteRequested { from: String, to: String },
    RouteResolved(RouteSummary),
    RouteFailed(String),
}

impl MapState {
    /// Whether a route request would be acted on.
    pub fn accepts_route_request(&self) -> bool {
        matches!(self, Self::Ready | Self::RouteReady(_) | Self::RouteError(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn next(self, provider: MapProvider, event: MapEvent) -> Self {
        match (self, event) {
            (Self::Loading, MapEvent::SdkLoaded) => Self::Ready,
            (Self::Loading, MapEvent::SdkFailed(reason)) => {
                Self::Fallback(FallbackPanel::sdk_unavailable(provider, &reason))
            }
            (Self::Loading, MapEvent::SdkTimedOut) => {
                Self::Fallback(FallbackPanel::sdk_unavailable(provider, "timed out"))
            }
            // The panel keeps naming the latest request.
            (Self::Fallback(panel), MapEvent::RouteRequested { from, to }) => {
                Self::Fallback(FallbackPanel {
                    from: Some(from),
                    to: Some(to),
                    ..panel
                })
            }
            (state, MapEvent::RouteRequested { from, to }) if state.accepts_route_request() => {
                Self::RouteLoading { from, to }
            }
            (Self::RouteLoading { .. }, MapEvent::RouteResolved(summary)) => {
                Self::RouteReady(summary)
            }
            (Self::RouteLoading { from, to }, MapEvent::RouteFailed(reason)) => {
                log::error!("Route calculation error: {reason}");
                Self::RouteError(FallbackPanel::route_failed(&from, &to, &reason))
            }
            (state, event) => {
                log::debug!("Ignoring {event:?} while {state:?}");
                state
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn requested(from: &str, to: &str) -> MapEvent {
        MapEvent::RouteRequested {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    fn summary() -> RouteSummary {
        RouteSummary {
            distance: "1.2 km".to_string(),
            duration: "14 min".to_string(),
            start_address: "Guindy".to_string(),
            end_address: "Adyar".to_string(),
            steps: Vec::new(),
            path: Vec::new(),
        }
    }

    #[test]
    fn test_happy_path() {
        let provider = MapProvider::OpenStreetMap;
        let state = MapState::Loading
            .next(provider, MapEvent::SdkLoaded)
            .next(provider, requested("Guindy", "Adyar"));
        assert_eq!(
            state,
            MapState::RouteLoading {
                from: "Guindy".to_string(),
                to: "Adyar".to_string()
            }
        );
        let state = state.next(provider, MapEvent::RouteResolved(summary()));
        assert_eq!(state, MapState::RouteReady(summary()));
        // A new request from a shown route.
        assert!(state.accepts_route_request());
    }

    #[test]
    fn test_requests_before_ready_are_ignored() {
        let state = MapState::Loading.next(MapProvider::Google, requested("A", "B"));
        assert_eq!(state, MapState::Loading);
    }

    #[test]
    fn test_fallback_is_terminal() {
        let provider = MapProvider::Google;
        let state = MapState::Loading.next(provider, MapEvent::SdkTimedOut);
        assert!(state.is_fallback());

        let state = state
            .next(provider, MapEvent::SdkLoaded)
            .next(provider, requested("Egmore", "Guindy"));
        let MapState::Fallback(panel) = state else {
            panic!("left the fallback state");
        };
        assert_eq!(panel.title, "Google Maps API Required");
        assert_eq!(panel.from.as_deref(), Some("Egmore"));
        assert_eq!(panel.to.as_deref(), Some("Guindy"));
    }

    #[test]
    fn test_route_failure_shows_panel() {
        let provider = MapProvider::Google;
        let state = MapState::Ready
            .next(provider, requested("Egmore", "Guindy"))
            .next(provider, MapEvent::RouteFailed("ZERO_RESULTS".to_string()));
        let MapState::RouteError(panel) = &state else {
            panic!("expected a route error");
        };
        assert_eq!(panel.from.as_deref(), Some("Egmore"));
        assert!(panel.message.contains("ZERO_RESULTS"));
        assert!(state.accepts_route_request());
    }

    #[test]
    fn test_state_json_is_tagged() {
        let json = serde_json::to_value(MapState::RouteLoading {
            from: "A".to_string(),
            to: "B".to_string(),
        })
        .unwrap();
        assert_eq!(json["state"], "route-loading");
        assert_eq!(json["from"], "A");
    }
}
