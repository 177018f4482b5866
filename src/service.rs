use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::app::App;
use crate::backend::{Alert, AlertCategory, CommunityMessage, MessageType, NewAlert, NewMessage};
use crate::bus::{self, BusFareQuote, BusStatus, RouteBetween, SearchResults};
use crate::error::{AcError, AcResult};
use crate::location::{
    self, AccessibilityFilters, AccessibilityMarker, FrequentDestination, GeocodedPlace,
    RouteOption, VisitedPlace,
};
use crate::map::{MapProvider, MapState, TravelMode};
use crate::metro::{self, FareQuote, LiveTimings, MetroRoute, MetroStation, MetroStatus};
use crate::preferences::{Preferences, PreferencesUpdate};
use crate::utils::Coordinates;
use crate::voice::{self, VoiceCommand};

type AppState = State<Arc<App>>;

pub async fn run_service(app: App, ip_addr: Ipv4Addr, port: u16) -> AcResult<()> {
    log::info!("Starting the server...");

    let router = router(Arc::new(app));
    let address = SocketAddr::from((ip_addr, port));
    let listener = tokio::net::TcpListener::bind(address).await?;

    log::info!("Listening on {ip_addr}:{port}...");

    axum::serve(listener, router).await?;
    Ok(())
}

#[rustfmt::skip]
pub fn router(app: Arc<App>) -> Router {
    let cors = CorsLayer::new().allow_methods(Any).allow_origin(Any);

    Router::new()
        .route("/suggestions", get(suggestions))
        .route("/geocode", get(geocode))
        .route("/reverse-geocode", get(reverse_geocode))
        .route("/markers", get(markers))
        .route("/routes/options", get(route_options))
        .route("/destinations", get(destinations).post(save_destination))
        .route("/metro/stations", get(metro_stations))
        .route("/metro/fare", get(metro_fare))
        .route("/metro/route", get(metro_route))
        .route("/metro/status", get(metro_status))
        .route("/metro/timings", get(metro_timings))
        .route("/bus/search", get(bus_search))
        .route("/bus/between", get(bus_between))
        .route("/bus/fare", get(bus_fare))
        .route("/bus/status", get(bus_status))
        .route("/preferences", get(preferences).post(update_preferences))
        .route("/preferences/theme", get(theme))
        .route("/map/route", get(map_route))
        .route("/voice", get(voice_command))
        .route("/alerts", get(alerts).post(post_alert))
        .route("/community", get(community).post(post_message))
        .layer(cors)
        .with_state(app)
}

fn to_status_code(e: AcError) -> StatusCode {
    let status = match &e {
        AcError::StationNotFound(_)
        | AcError::BusStopNotFound(_)
        | AcError::BusRouteNotFound(_) => StatusCode::NOT_FOUND,
        AcError::InvalidCoordinates(..)
        | AcError::EmptyMessage
        | AcError::ParseFloatError(_)
        | AcError::ParseDate(_) => StatusCode::BAD_REQUEST,
        AcError::NotSignedIn => StatusCode::UNAUTHORIZED,
        AcError::HttpStatus(_)
        | AcError::ReqwestError(_)
        | AcError::DirectionsStatus(_)
        | AcError::SdkUnavailable(_)
        | AcError::Geolocation(_) => StatusCode::BAD_GATEWAY,
        AcError::NoBackend
        | AcError::IoError(_)
        | AcError::SerdeJsonError(_)
        | AcError::UrlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        log::error!("{e}");
    } else {
        log::debug!("{e}");
    }
    status
}

/// Runs local store work on the blocking pool, since every store write
/// rewrites the backing file.
async fn blocking<T, F>(app: &Arc<App>, work: F) -> Result<T, StatusCode>
where
    T: Send + 'static,
    F: FnOnce(&App) -> AcResult<T> + Send + 'static,
{
    let app = Arc::clone(app);
    tokio::task::spawn_blocking(move || work(&app))
        .await
        .map_err(|e| {
            log::error!("Store task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(to_status_code)
}

// ------------------------------------------------------------------------------------------------
// --- Places
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    q: String,
}

async fn suggestions(Query(params): Query<SearchRequest>) -> Json<Vec<&'static str>> {
    Json(location::get_location_suggestions(&params.q))
}

#[derive(Debug, Deserialize)]
struct GeocodeRequest {
    address: String,
}

async fn geocode(Query(params): Query<GeocodeRequest>) -> Json<GeocodedPlace> {
    Json(location::geocode_address(&params.address))
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeRequest {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
struct ReverseGeocodeResponse {
    name: &'static str,
}

async fn reverse_geocode(
    Query(params): Query<ReverseGeocodeRequest>,
) -> Result<Json<ReverseGeocodeResponse>, StatusCode> {
    if !Coordinates::new(params.lat, params.lng).is_valid() {
        return Err(to_status_code(AcError::InvalidCoordinates(params.lat, params.lng)));
    }
    Ok(Json(ReverseGeocodeResponse {
        name: location::reverse_geocode(params.lat, params.lng),
    }))
}

async fn markers() -> Json<Vec<AccessibilityMarker>> {
    Json(location::accessibility_markers())
}

// Flattening into the filters does not work with query strings, hence the copy.
#[derive(Debug, Deserialize)]
struct RouteOptionsRequest {
    from: String,
    to: String,
    #[serde(default)]
    wheelchair: bool,
    #[serde(default)]
    elevator: bool,
    #[serde(default)]
    audio: bool,
    #[serde(default)]
    braille: bool,
}

async fn route_options(Query(params): Query<RouteOptionsRequest>) -> Json<Vec<RouteOption>> {
    let filters = AccessibilityFilters {
        wheelchair: params.wheelchair,
        elevator: params.elevator,
        audio: params.audio,
        braille: params.braille,
    };
    Json(location::generate_route_options(&params.from, &params.to, &filters))
}

#[derive(Debug, Deserialize)]
struct DestinationsRequest {
    user_id: Option<i64>,
}

async fn destinations(
    State(app): AppState,
    Query(params): Query<DestinationsRequest>,
) -> Result<Json<Vec<FrequentDestination>>, StatusCode> {
    let user_id = app.user_id(params.user_id).map_err(to_status_code)?;
    Ok(Json(app.frequent_destinations().top(user_id)))
}

#[derive(Debug, Deserialize)]
struct SaveDestinationRequest {
    user_id: Option<i64>,
    #[serde(flatten)]
    place: VisitedPlace,
}

async fn save_destination(
    State(app): AppState,
    Json(body): Json<SaveDestinationRequest>,
) -> Result<Json<FrequentDestination>, StatusCode> {
    let user_id = app.user_id(body.user_id).map_err(to_status_code)?;
    if !Coordinates::new(body.place.lat, body.place.lng).is_valid() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let place = body.place;
    blocking(&app, move |app| app.frequent_destinations().save(user_id, &place))
        .await
        .map(Json)
}

// ------------------------------------------------------------------------------------------------
// --- Metro
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TripRequest {
    from: String,
    to: String,
}

async fn metro_stations(
    State(app): AppState,
    Query(params): Query<SearchRequest>,
) -> Json<Vec<MetroStation>> {
    Json(app.metro().search_stations(&params.q))
}

async fn metro_fare(Query(params): Query<TripRequest>) -> Result<Json<FareQuote>, StatusCode> {
    metro::calculate_fare(&params.from, &params.to)
        .map(Json)
        .map_err(to_status_code)
}

async fn metro_route(
    State(app): AppState,
    Query(params): Query<TripRequest>,
) -> Result<Json<MetroRoute>, StatusCode> {
    app.metro()
        .metro_route(&params.from, &params.to)
        .map(Json)
        .map_err(to_status_code)
}

async fn metro_status(State(app): AppState) -> Json<MetroStatus> {
    Json(app.metro().metro_status())
}

#[derive(Debug, Deserialize)]
struct TimingsRequest {
    station: String,
}

async fn metro_timings(
    State(app): AppState,
    Query(params): Query<TimingsRequest>,
) -> Result<Json<LiveTimings>, StatusCode> {
    app.metro()
        .live_timings(&params.station)
        .map(Json)
        .map_err(to_status_code)
}

// ------------------------------------------------------------------------------------------------
// --- Bus
// ------------------------------------------------------------------------------------------------

async fn bus_search(
    State(app): AppState,
    Query(params): Query<SearchRequest>,
) -> Json<SearchResults> {
    Json(app.bus().search_all(&params.q))
}

async fn bus_between(
    State(app): AppState,
    Query(params): Query<TripRequest>,
) -> Json<Vec<RouteBetween>> {
    Json(app.bus().routes_between(&params.from, &params.to))
}

async fn bus_fare(Query(params): Query<TripRequest>) -> Result<Json<BusFareQuote>, StatusCode> {
    bus::calculate_fare(&params.from, &params.to)
        .map(Json)
        .map_err(to_status_code)
}

async fn bus_status(State(app): AppState) -> Json<BusStatus> {
    Json(app.bus().bus_status())
}

// ------------------------------------------------------------------------------------------------
// --- Preferences and map
// ------------------------------------------------------------------------------------------------

async fn preferences(State(app): AppState) -> Json<Preferences> {
    let Some(merged) = app.preferences().fetch_merged().await else {
        return Json(app.preferences().local());
    };
    if let Err(e) = blocking(&app, move |app| app.preferences().store(&merged)).await {
        log::error!("Error storing merged preferences: {e}");
    }
    Json(merged)
}

async fn update_preferences(
    State(app): AppState,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>, StatusCode> {
    let updated = blocking(&app, move |app| app.preferences().store_update(&update)).await?;
    app.preferences().push(&updated).await;
    Ok(Json(updated))
}

async fn theme(State(app): AppState) -> ([(axum::http::HeaderName, &'static str); 1], String) {
    ([(CONTENT_TYPE, "text/css")], app.stylesheet().to_css())
}

#[derive(Debug, Deserialize)]
struct MapRouteRequest {
    from: String,
    to: String,
    #[serde(default)]
    mode: TravelMode,
    provider: Option<MapProvider>,
}

async fn map_route(
    State(app): AppState,
    Query(params): Query<MapRouteRequest>,
) -> Result<Json<MapState>, StatusCode> {
    app.map_route(&params.from, &params.to, params.mode, params.provider)
        .await
        .map(Json)
        .map_err(to_status_code)
}

// ------------------------------------------------------------------------------------------------
// --- Voice, alerts and community
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VoiceRequest {
    text: String,
}

async fn voice_command(Query(params): Query<VoiceRequest>) -> Json<VoiceCommand> {
    Json(voice::process_voice_command(&params.text))
}

async fn alerts(State(app): AppState) -> Result<Json<Vec<Alert>>, StatusCode> {
    app.alerts().await.map(Json).map_err(to_status_code)
}

#[derive(Debug, Deserialize)]
struct PostAlertRequest {
    #[serde(default)]
    category: AlertCategory,
    message: String,
    location: Option<String>,
}

async fn post_alert(
    State(app): AppState,
    Json(body): Json<PostAlertRequest>,
) -> Result<Json<NewAlert>, StatusCode> {
    app.post_alert(body.category, &body.message, body.location.as_deref())
        .await
        .map(Json)
        .map_err(to_status_code)
}

async fn community(State(app): AppState) -> Result<Json<Vec<CommunityMessage>>, StatusCode> {
    app.community_messages()
        .await
        .map(Json)
        .map_err(to_status_code)
}

#[derive(Debug, Deserialize)]
struct PostMessageRequest {
    user_id: Option<i64>,
    message: String,
    location: Option<String>,
    #[serde(rename = "type", default)]
    kind: MessageType,
}

async fn post_message(
    State(app): AppState,
    Json(body): Json<PostMessageRequest>,
) -> Result<Json<NewMessage>, StatusCode> {
    app.post_message(
        body.user_id,
        &body.message,
        body.location.as_deref(),
        body.kind,
    )
    .await
    .map(Json)
    .map_err(to_status_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::location::FrequentDestinations;
    use crate::preferences::{Language, PreferencesStore};
    use crate::storage::{LocalStore, StoredUser};
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn state() -> AppState {
        let app = App::with_store(AppConfig::default(), LocalStore::in_memory()).unwrap();
        State(Arc::new(app))
    }

    fn trip(from: &str, to: &str) -> Query<TripRequest> {
        Query(TripRequest {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            to_status_code(AcError::StationNotFound("X".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            to_status_code(AcError::InvalidCoordinates(100.0, 0.0)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(to_status_code(AcError::HttpStatus(500)), StatusCode::BAD_GATEWAY);
        assert_eq!(to_status_code(AcError::NotSignedIn), StatusCode::UNAUTHORIZED);
        assert_eq!(to_status_code(AcError::EmptyMessage), StatusCode::BAD_REQUEST);
    }

    #[test(tokio::test)]
    async fn test_metro_fare_handler() {
        let Json(quote) = metro_fare(trip("Chennai Central", "Guindy")).await.unwrap();
        assert_eq!(quote.from, "Chennai Central");

        assert_eq!(
            metro_fare(trip("Nowhere", "Guindy")).await.unwrap_err(),
            StatusCode::NOT_FOUND
        );
    }

    #[test(tokio::test)]
    async fn test_bus_fare_handler() {
        assert_eq!(
            bus_fare(trip("Nowhere", "Guindy")).await.unwrap_err(),
            StatusCode::NOT_FOUND
        );
    }

    #[test(tokio::test)]
    async fn test_reverse_geocode_validates() {
        let Json(response) = reverse_geocode(Query(ReverseGeocodeRequest {
            lat: 13.085,
            lng: 80.275,
        }))
        .await
        .unwrap();
        assert_eq!(response.name, "Chennai Central");

        let result = reverse_geocode(Query(ReverseGeocodeRequest {
            lat: 95.0,
            lng: 80.0,
        }))
        .await;
        assert_eq!(result.unwrap_err(), StatusCode::BAD_REQUEST);
    }

    #[test(tokio::test)]
    async fn test_destinations_need_a_user() {
        let state = state();
        let request = DestinationsRequest { user_id: None };
        let result = destinations(state.clone(), Query(request)).await;
        assert_eq!(result.unwrap_err(), StatusCode::UNAUTHORIZED);

        state
            .0
            .store()
            .sign_in(&StoredUser {
                user_id: 1,
                email: None,
            })
            .unwrap();
        let body = serde_json::from_value::<SaveDestinationRequest>(serde_json::json!({
            "name": "Marina Beach",
            "lat": 13.05,
            "lng": 80.2824
        }))
        .unwrap();
        let Json(saved) = save_destination(state.clone(), Json(body)).await.unwrap();
        assert_eq!(saved.visit_count, 1);

        let Json(top) = destinations(state, Query(DestinationsRequest { user_id: None }))
            .await
            .unwrap();
        assert_eq!(top, vec![saved]);
    }

    #[test(tokio::test)]
    async fn test_preferences_roundtrip() {
        let state = state();
        let Json(updated) = update_preferences(
            state.clone(),
            Json(serde_json::from_str(r#"{"theme": "high-contrast"}"#).unwrap()),
        )
        .await
        .unwrap();
        let Json(loaded) = preferences(state.clone()).await;
        assert_eq!(loaded, updated);

        let (_, css) = theme(state).await;
        assert!(css.starts_with(":root {"));
    }

    #[test(tokio::test)]
    async fn test_route_options_sorted_with_filters() {
        let Json(options) = route_options(Query(RouteOptionsRequest {
            from: "Egmore".to_string(),
            to: "Guindy".to_string(),
            wheelchair: true,
            elevator: false,
            audio: false,
            braille: false,
        }))
        .await;
        assert_eq!(options.len(), 3);
        assert!(
            options
                .windows(2)
                .all(|w| w[0].accessibility_score >= w[1].accessibility_score)
        );
    }

    #[test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
    async fn test_saves_reach_the_store_file() {
        let dir = std::env::temp_dir().join(format!("ac-service-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = AppConfig {
            data_dir: dir.clone(),
            ..Default::default()
        };
        let app = App::new(config).unwrap();
        let state = State(Arc::new(app));

        let body = serde_json::from_value::<SaveDestinationRequest>(serde_json::json!({
            "user_id": 5,
            "name": "Guindy",
            "lat": 13.0067,
            "lng": 80.2206
        }))
        .unwrap();
        save_destination(state.clone(), Json(body)).await.unwrap();
        update_preferences(
            state,
            Json(serde_json::from_str(r#"{"language": "ta"}"#).unwrap()),
        )
        .await
        .unwrap();

        let reopened = LocalStore::open(&dir);
        assert_eq!(
            PreferencesStore::local_only(&reopened).local().language,
            Language::Ta
        );
        assert_eq!(FrequentDestinations::new(&reopened).top(5).len(), 1);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test(tokio::test)]
    async fn test_voice_handler() {
        let Json(command) = voice_command(Query(VoiceRequest {
            text: "Second route".to_string(),
        }))
        .await;
        assert_eq!(command, VoiceCommand::SelectRoute { route_index: 1 });
    }

    #[test(tokio::test)]
    async fn test_alerts_and_community_without_backend() {
        let state = state();
        assert_eq!(
            alerts(state.clone()).await.unwrap_err(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            community(state.clone()).await.unwrap_err(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let body = serde_json::from_str::<PostMessageRequest>(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(body.kind, MessageType::Chat);
        assert_eq!(
            post_message(state, Json(body)).await.unwrap_err(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
