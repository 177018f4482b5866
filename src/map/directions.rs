use std::future::Future;

use geo::LineString;
use serde::Deserialize;
use url::Url;

use crate::error::{AcError, AcResult};
use crate::location::{NominatimClient, lookup_known_place, with_city_context};
use crate::utils::Coordinates;

use super::TravelMode;
use super::state::{DirectionStep, RouteSummary};

/// Where an unknown start is placed: Chennai Central.
pub const DEFAULT_FROM: Coordinates = Coordinates::new(13.0827, 80.2707);
/// Where an unknown destination is placed: Broadway.
pub const DEFAULT_TO: Coordinates = Coordinates::new(13.0878, 80.2785);
/// Offset of the drawn midpoint, in degrees on both axes.
pub const MIDPOINT_BEND: f64 = 0.002;

pub const GOOGLE_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Turns a pair of place names into something the map can show.
pub trait RouteResolver {
    fn resolve(
        &self,
        from: &str,
        to: &str,
        mode: TravelMode,
    ) -> impl Future<Output = AcResult<RouteSummary>> + Send;
}

// ------------------------------------------------------------------------------------------------
// --- DirectRoute
// ------------------------------------------------------------------------------------------------

/// A straight line with a slight bend, for when no routing service is available.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectRoute {
    path: Vec<Coordinates>,
    distance_km: f64,
    duration_minutes: u32,
}

impl DirectRoute {
    pub fn between(from: Coordinates, to: Coordinates, mode: TravelMode) -> Self {
        let distance_km = from.distance_km(to);
        let midpoint = Coordinates::new(
            (from.lat + to.lat) / 2.0 + MIDPOINT_BEND,
            (from.lng + to.lng) / 2.0 + MIDPOINT_BEND,
        );

        Self {
            path: vec![from, midpoint, to],
            distance_km,
            duration_minutes: (distance_km * mode.minutes_per_km()).round() as u32,
        }
    }

    // Getters/Setters

    pub fn path(&self) -> &[Coordinates] {
        &self.path
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    // Functions

    pub fn summary(&self, from: &str, to: &str) -> RouteSummary {
        RouteSummary {
            distance: format!("{:.1} km", self.distance_km),
            duration: format!("{} min", self.duration_minutes),
            start_address: from.to_string(),
            end_address: to.to_string(),
            steps: Vec::new(),
            path: self.path.clone(),
        }
    }

    pub fn to_geojson(&self) -> geojson::Feature {
        let line = self
            .path
            .iter()
            .map(|c| (c.lng, c.lat))
            .collect::<LineString<f64>>();

        let mut feature = geojson::Feature::from(geojson::Geometry::new(geojson::Value::from(
            &line,
        )));
        feature.set_property("distance_km", self.distance_km);
        feature.set_property("duration_minutes", self.duration_minutes);
        feature
    }
}

// ------------------------------------------------------------------------------------------------
// --- DirectRouteResolver
// ------------------------------------------------------------------------------------------------

/// Geocodes both ends (online, then the offline table, then fixed defaults)
/// and joins them with a `DirectRoute`. Never fails.
#[derive(Debug, Clone, Default)]
pub struct DirectRouteResolver {
    nominatim: Option<NominatimClient>,
}

impl DirectRouteResolver {
    pub fn new(nominatim: Option<NominatimClient>) -> Self {
        Self { nominatim }
    }

    pub async fn locate(&self, place: &str, default: Coordinates) -> Coordinates {
        if let Some(nominatim) = &self.nominatim {
            match nominatim.search(place).await {
                Ok(Some(coordinates)) => return coordinates,
                Ok(None) => log::debug!("No geocoding result for {place:?}"),
                Err(e) => log::warn!("Geocoding error for {place:?}: {e}"),
            }
        }
        lookup_known_place(place).unwrap_or(default)
    }

    pub async fn direct_route(&self, from: &str, to: &str, mode: TravelMode) -> DirectRoute {
        let from_coordinates = self.locate(from, DEFAULT_FROM).await;
        let to_coordinates = self.locate(to, DEFAULT_TO).await;
        DirectRoute::between(from_coordinates, to_coordinates, mode)
    }
}

impl RouteResolver for DirectRouteResolver {
    async fn resolve(&self, from: &str, to: &str, mode: TravelMode) -> AcResult<RouteSummary> {
        Ok(self.direct_route(from, to, mode).await.summary(from, to))
    }
}

// ------------------------------------------------------------------------------------------------
// --- GoogleDirectionsResolver
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: TextValue,
    duration: TextValue,
    start_address: String,
    end_address: String,
    #[serde(default)]
    steps: Vec<DirectionsStep>,
}

#[derive(Debug, Deserialize)]
struct DirectionsStep {
    html_instructions: String,
    distance: TextValue,
    duration: TextValue,
    start_location: Option<LatLng>,
    end_location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<LatLng> for Coordinates {
    fn from(value: LatLng) -> Self {
        Coordinates::new(value.lat, value.lng)
    }
}

fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

/// Reads the first leg of the first route. Any status but `OK` is an error.
pub fn parse_directions_response(body: &str) -> AcResult<RouteSummary> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    if response.status != "OK" {
        return Err(AcError::DirectionsStatus(response.status));
    }

    let leg = response
        .routes
        .into_iter()
        .next()
        .and_then(|route| route.legs.into_iter().next())
        .ok_or_else(|| AcError::DirectionsStatus("ZERO_RESULTS".to_string()))?;

    let mut path = leg
        .steps
        .iter()
        .filter_map(|step| step.start_location)
        .map(Coordinates::from)
        .collect::<Vec<_>>();
    if let Some(end) = leg.steps.last().and_then(|step| step.end_location) {
        path.push(end.into());
    }

    Ok(RouteSummary {
        distance: leg.distance.text,
        duration: leg.duration.text,
        start_address: leg.start_address,
        end_address: leg.end_address,
        steps: leg
            .steps
            .into_iter()
            .map(|step| DirectionStep {
                instruction: strip_tags(&step.html_instructions),
                distance: step.distance.text,
                duration: step.duration.text,
            })
            .collect(),
        path,
    })
}

/// Google Directions web service.
#[derive(Debug, Clone)]
pub struct GoogleDirectionsResolver {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl GoogleDirectionsResolver {
    pub fn new(api_key: &str) -> AcResult<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: Url::parse(GOOGLE_DIRECTIONS_URL)?,
        })
    }

    pub fn directions_url(&self, from: &str, to: &str, mode: TravelMode) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("origin", &with_city_context(from))
            .append_pair("destination", &with_city_context(to))
            .append_pair("mode", &mode.to_string())
            .append_pair("units", "metric")
            .append_pair("key", &self.api_key);
        url
    }
}

impl RouteResolver for GoogleDirectionsResolver {
    async fn resolve(&self, from: &str, to: &str, mode: TravelMode) -> AcResult<RouteSummary> {
        let url = self.directions_url(from, to, mode);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AcError::HttpStatus(response.status().as_u16()));
        }
        parse_directions_response(&response.text().await?)
            .inspect_err(|e| log::error!("Directions request failed due to {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn test_direct_route_shape() {
        let from = Coordinates::new(13.0, 80.2);
        let to = Coordinates::new(13.01, 80.21);
        let route = DirectRoute::between(from, to, TravelMode::Walking);

        assert_eq!(route.path().len(), 3);
        let mid = route.path()[1];
        assert!((mid.lat - 13.007).abs() < 1e-9);
        assert!((mid.lng - 80.207).abs() < 1e-9);
        assert_eq!(
            route.duration_minutes(),
            (route.distance_km() * 12.0).round() as u32
        );

        let driving = DirectRoute::between(from, to, TravelMode::Driving);
        assert!(driving.duration_minutes() < route.duration_minutes());
    }

    #[test]
    fn test_direct_summary_text() {
        let route = DirectRoute::between(DEFAULT_FROM, DEFAULT_FROM, TravelMode::Transit);
        let summary = route.summary("Chennai Central", "Chennai Central");
        assert_eq!(summary.distance, "0.0 km");
        assert_eq!(summary.duration, "0 min");
        assert_eq!(summary.start_address, "Chennai Central");
    }

    #[test]
    fn test_geojson_is_lng_lat() {
        let route = DirectRoute::between(DEFAULT_FROM, DEFAULT_TO, TravelMode::Walking);
        let feature = route.to_geojson();
        let Some(geojson::Geometry {
            value: geojson::Value::LineString(points),
            ..
        }) = &feature.geometry
        else {
            panic!("expected a line string");
        };
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], vec![80.2707, 13.0827]);
        assert!(feature.contains_property("distance_km"));
    }

    #[test(tokio::test)]
    async fn test_offline_resolver_uses_table_then_defaults() {
        let resolver = DirectRouteResolver::default();
        assert_eq!(
            resolver.locate("Atlantis", DEFAULT_TO).await,
            DEFAULT_TO
        );

        let summary = resolver
            .resolve("Nowhere", "Atlantis", TravelMode::Walking)
            .await
            .unwrap();
        assert_eq!(summary.path.first(), Some(&DEFAULT_FROM));
        assert_eq!(summary.path.last(), Some(&DEFAULT_TO));
        assert_eq!(summary.end_address, "Atlantis");
    }

    #[test]
    fn test_directions_url() {
        let resolver = GoogleDirectionsResolver::new("k").unwrap();
        let url = resolver.directions_url("Guindy", "Chennai Central", TravelMode::Transit);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0].1, "Guindy, Chennai, Tamil Nadu, India");
        assert_eq!(pairs[1].1, "Chennai Central");
        assert_eq!(pairs[2].1, "transit");
    }

    #[test]
    fn test_parse_directions() {
        let body = r#"{
            "status": "OK",
            "routes": [{"legs": [{
                "distance": {"text": "5.3 km", "value": 5300},
                "duration": {"text": "18 mins", "value": 1080},
                "start_address": "Guindy, Chennai",
                "end_address": "Adyar, Chennai",
                "steps": [{
                    "html_instructions": "Head <b>east</b> on <div>Sardar Patel Rd</div>",
                    "distance": {"text": "5.3 km"},
                    "duration": {"text": "18 mins"},
                    "start_location": {"lat": 13.0067, "lng": 80.2101},
                    "end_location": {"lat": 13.0067, "lng": 80.2568}
                }]
            }]}]
        }"#;
        let summary = parse_directions_response(body).unwrap();
        assert_eq!(summary.distance, "5.3 km");
        assert_eq!(summary.end_address, "Adyar, Chennai");
        assert_eq!(summary.steps[0].instruction, "Head east on Sardar Patel Rd");
        assert_eq!(summary.path.len(), 2);
    }

    #[test]
    fn test_non_ok_status_is_an_error() {
        let err = parse_directions_response(r#"{"status": "REQUEST_DENIED", "routes": []}"#)
            .unwrap_err();
        assert!(matches!(err, AcError::DirectionsStatus(status) if status == "REQUEST_DENIED"));
        assert!(matches!(
            parse_directions_response(r#"{"status": "OK", "routes": []}"#),
            Err(AcError::DirectionsStatus(_))
        ));
    }
}
