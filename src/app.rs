use std::error::Error;

use serde::Serialize;

use crate::backend::{
    Alert, AlertCategory, BackendClient, CommunityMessage, MessageType, NewAlert, NewMessage,
    RouteSearchRecord, SavedRoute,
};
use crate::bus::{self, BusService};
use crate::cli::Mode;
use crate::config::AppConfig;
use crate::error::{AcError, AcResult};
use crate::location::{
    self, AccessibilityFilters, FixedPositionProvider, FrequentDestinations, NominatimClient,
    POSITION_TIMEOUT, Position, RouteOption, UnsupportedPositionProvider, get_current_location,
};
use crate::map::{
    DirectRoute, DirectRouteResolver, GoogleDirectionsResolver, HttpSdkLoader, MapProvider,
    MapSession, MapState, RouteResolver, SdkLoader, TravelMode,
};
use crate::metro::{self, MetroService};
use crate::preferences::{PreferencesStore, StyleSheet};
use crate::storage::{LocalStore, StoredUser};
use crate::voice;

/// Everything the commands and the server share: configuration, the local
/// store, the outbound clients and the caching services.
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    store: LocalStore,
    backend: Option<BackendClient>,
    nominatim: NominatimClient,
    metro: MetroService,
    bus: BusService,
}

impl App {
    pub fn new(config: AppConfig) -> AcResult<Self> {
        let store = config.open_store();
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: LocalStore) -> AcResult<Self> {
        Ok(Self {
            backend: config.backend_client()?,
            nominatim: config.nominatim_client()?,
            config,
            store,
            metro: MetroService::new(),
            bus: BusService::new(),
        })
    }

    // Getters/Setters

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn metro(&self) -> &MetroService {
        &self.metro
    }

    pub fn bus(&self) -> &BusService {
        &self.bus
    }

    // Functions

    pub fn preferences(&self) -> PreferencesStore<'_> {
        PreferencesStore::new(&self.store, self.backend.as_ref())
    }

    pub fn frequent_destinations(&self) -> FrequentDestinations<'_> {
        FrequentDestinations::new(&self.store)
    }

    pub fn stylesheet(&self) -> StyleSheet {
        StyleSheet::for_preferences(&self.preferences().local())
    }

    /// The given user, or the signed-in one.
    pub fn user_id(&self, user_id: Option<i64>) -> AcResult<i64> {
        user_id
            .or_else(|| self.store.user().map(|user| user.user_id))
            .ok_or(AcError::NotSignedIn)
    }

    fn backend(&self) -> AcResult<&BackendClient> {
        self.backend.as_ref().ok_or(AcError::NoBackend)
    }

    pub async fn save_route_search(
        &self,
        from: &str,
        to: &str,
        filters: &AccessibilityFilters,
    ) -> AcResult<()> {
        let backend = self.backend()?;
        let record = RouteSearchRecord {
            user_id: self.user_id(None)?,
            start_location: from.to_string(),
            destination: to.to_string(),
            accessibility_filters: *filters,
        };
        backend.save_route(&record).await
    }

    pub async fn saved_routes(&self) -> AcResult<Vec<SavedRoute>> {
        self.backend()?.list_routes().await
    }

    pub async fn alerts(&self) -> AcResult<Vec<Alert>> {
        self.backend()?.fetch_alerts().await
    }

    pub async fn post_alert(
        &self,
        category: AlertCategory,
        message: &str,
        location: Option<&str>,
    ) -> AcResult<NewAlert> {
        let backend = self.backend()?;
        let alert = NewAlert::new(category, message, location)?;
        backend.post_alert(&alert).await?;
        Ok(alert)
    }

    pub async fn community_messages(&self) -> AcResult<Vec<CommunityMessage>> {
        self.backend()?.fetch_messages().await
    }

    /// Posts as the given user, or the signed-in one.
    pub async fn post_message(
        &self,
        user_id: Option<i64>,
        message: &str,
        location: Option<&str>,
        kind: MessageType,
    ) -> AcResult<NewMessage> {
        let backend = self.backend()?;
        let message = NewMessage::new(self.user_id(user_id)?, message, location, kind)?;
        backend.post_message(&message).await?;
        Ok(message)
    }

    /// Opens a map view and asks it for the route. Google is only used with
    /// a key; without one the view ends up on its fallback panel.
    pub async fn map_route(
        &self,
        from: &str,
        to: &str,
        mode: TravelMode,
        provider: Option<MapProvider>,
    ) -> AcResult<MapState> {
        let provider = provider.unwrap_or_else(|| self.config.default_map_provider());
        let key = self.config.google_maps_key();
        let loader = HttpSdkLoader::new(key.map(str::to_string));

        let state = match (provider, key) {
            (MapProvider::Google, Some(key)) => {
                let resolver = GoogleDirectionsResolver::new(key)?;
                show_route(MapSession::new(provider, loader, resolver), from, to, mode).await
            }
            _ => {
                let resolver = DirectRouteResolver::new(Some(self.nominatim.clone()));
                show_route(MapSession::new(provider, loader, resolver), from, to, mode).await
            }
        };
        Ok(state)
    }

    pub async fn direct_route(&self, from: &str, to: &str, mode: TravelMode) -> DirectRoute {
        DirectRouteResolver::new(Some(self.nominatim.clone()))
            .direct_route(from, to, mode)
            .await
    }
}

async fn show_route<L: SdkLoader, R: RouteResolver>(
    mut session: MapSession<L, R>,
    from: &str,
    to: &str,
    mode: TravelMode,
) -> MapState {
    session.open().await;
    session.show_route(from, to, mode).await.clone()
}

/// Where the device is, with the name of its area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedPosition {
    #[serde(flatten)]
    pub position: Position,
    pub area: &'static str,
}

pub async fn locate(position: Option<Position>) -> AcResult<LocatedPosition> {
    let position = match position {
        Some(position) => {
            get_current_location(&FixedPositionProvider(position), POSITION_TIMEOUT).await?
        }
        None => get_current_location(&UnsupportedPositionProvider, POSITION_TIMEOUT).await?,
    };
    if !position.coordinates().is_valid() {
        return Err(AcError::InvalidCoordinates(position.lat, position.lng));
    }

    Ok(LocatedPosition {
        position,
        area: location::reverse_geocode(position.lat, position.lng),
    })
}

/// Route options for a trip, stored for the signed-in user when asked to.
/// A failed save does not lose the options.
pub async fn plan_routes(
    app: &App,
    from: &str,
    to: &str,
    filters: &AccessibilityFilters,
    save: bool,
) -> Vec<RouteOption> {
    let options = location::generate_route_options(from, to, filters);
    if save && let Err(e) = app.save_route_search(from, to, filters).await {
        log::error!("Error saving route: {e}");
    }
    options
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs one command and prints its result as JSON.
pub async fn run_command(app: &App, mode: Mode) -> Result<(), Box<dyn Error>> {
    match mode {
        Mode::Serve { .. } => {
            log::warn!("The serve mode is handled by the server");
        }
        Mode::Login { user_id, email } => {
            let user = StoredUser { user_id, email };
            app.store().sign_in(&user)?;
            print_json(&user)?;
        }
        Mode::Logout => {
            app.store().sign_out()?;
            log::info!("Signed out");
        }
        Mode::Suggest { query } => print_json(&location::get_location_suggestions(&query))?,
        Mode::Geocode { address } => print_json(&location::geocode_address(&address))?,
        Mode::Reverse { lat, lng } => print_json(&location::reverse_geocode(lat, lng))?,
        Mode::Markers => print_json(&location::accessibility_markers())?,
        Mode::Routes {
            from,
            to,
            filters,
            save,
        } => {
            let filters = filters.finalize();
            print_json(&plan_routes(app, &from, &to, &filters, save).await)?;
        }
        Mode::SavedRoutes => print_json(&app.saved_routes().await?)?,
        Mode::Fare { from, to } => print_json(&metro::calculate_fare(&from, &to)?)?,
        Mode::MetroRoute { from, to } => print_json(&app.metro().metro_route(&from, &to)?)?,
        Mode::Stations { query } => print_json(&app.metro().search_stations(&query))?,
        Mode::Status { bus: true } => print_json(&app.bus().bus_status())?,
        Mode::Status { bus: false } => print_json(&app.metro().metro_status())?,
        Mode::Timings { station } => print_json(&app.metro().live_timings(&station)?)?,
        Mode::BusSearch { query } => print_json(&app.bus().search_all(&query))?,
        Mode::BusBetween { from, to } => print_json(&app.bus().routes_between(&from, &to))?,
        Mode::BusFare { from, to } => print_json(&bus::calculate_fare(&from, &to)?)?,
        Mode::Prefs { preferences } => match preferences.finalize() {
            Some(update) => print_json(&app.preferences().update(&update).await?)?,
            None => print_json(&app.preferences().load().await)?,
        },
        Mode::Theme => {
            app.preferences().load().await;
            print!("{}", app.stylesheet().to_css());
        }
        Mode::Locate { position } => print_json(&locate(position.finalize()).await?)?,
        Mode::MapRoute {
            from,
            to,
            mode,
            provider,
            geojson: true,
        } => {
            if provider == Some(MapProvider::Google) {
                log::warn!("GeoJSON output always uses the straight-line route");
            }
            print_json(&app.direct_route(&from, &to, mode).await.to_geojson())?
        }
        Mode::MapRoute {
            from,
            to,
            mode,
            provider,
            geojson: false,
        } => print_json(&app.map_route(&from, &to, mode, provider).await?)?,
        Mode::SaveDestination {
            name,
            lat,
            lng,
            address,
            user_id,
        } => {
            let user_id = app.user_id(user_id)?;
            let place = location::VisitedPlace {
                name,
                address,
                lat,
                lng,
            };
            print_json(&app.frequent_destinations().save(user_id, &place)?)?;
        }
        Mode::Destinations { user_id } => {
            let user_id = app.user_id(user_id)?;
            print_json(&app.frequent_destinations().top(user_id))?;
        }
        Mode::Voice { phrase } => print_json(&voice::process_voice_command(&phrase.join(" ")))?,
        Mode::Alerts => print_json(&app.alerts().await?)?,
        Mode::PostAlert {
            message,
            category,
            location,
        } => print_json(&app.post_alert(category, &message, location.as_deref()).await?)?,
        Mode::Messages => print_json(&app.community_messages().await?)?,
        Mode::PostMessage {
            message,
            kind,
            location,
            user_id,
        } => print_json(&app.post_message(user_id, &message, location.as_deref(), kind).await?)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{PreferencesUpdate, Theme};
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn app() -> App {
        App::with_store(AppConfig::default(), LocalStore::in_memory()).unwrap()
    }

    #[test]
    fn test_user_id_falls_back_to_signed_in_user() {
        let app = app();
        assert!(matches!(app.user_id(None), Err(AcError::NotSignedIn)));
        assert_eq!(app.user_id(Some(9)).unwrap(), 9);

        app.store()
            .sign_in(&StoredUser {
                user_id: 2,
                email: None,
            })
            .unwrap();
        assert_eq!(app.user_id(None).unwrap(), 2);
    }

    #[test(tokio::test)]
    async fn test_route_save_needs_a_backend() {
        let app = app();
        let result = app
            .save_route_search("Egmore", "Guindy", &AccessibilityFilters::default())
            .await;
        assert!(matches!(result, Err(AcError::NoBackend)));

        // The options survive the failed save.
        let filters = AccessibilityFilters::default();
        let options = plan_routes(&app, "Egmore", "Guindy", &filters, true).await;
        assert_eq!(options.len(), 3);
    }

    #[test(tokio::test)]
    async fn test_alerts_and_community_need_a_backend() {
        let app = app();
        assert!(matches!(app.alerts().await, Err(AcError::NoBackend)));
        assert!(matches!(
            app.community_messages().await,
            Err(AcError::NoBackend)
        ));
        assert!(matches!(
            app.post_alert(AlertCategory::Weather, "Flooding", None).await,
            Err(AcError::NoBackend)
        ));
    }

    #[test(tokio::test)]
    async fn test_post_message_checks_user_and_text() {
        let app = App::with_store(
            AppConfig {
                backend_url: Some("http://127.0.0.1:9/".to_string()),
                ..Default::default()
            },
            LocalStore::in_memory(),
        )
        .unwrap();

        assert!(matches!(
            app.post_message(None, "Ramp open", None, MessageType::Info).await,
            Err(AcError::NotSignedIn)
        ));
        assert!(matches!(
            app.post_message(Some(1), "  ", None, MessageType::Chat).await,
            Err(AcError::EmptyMessage)
        ));
    }

    #[test(tokio::test)]
    async fn test_google_without_key_shows_fallback() {
        let state = app()
            .map_route("Egmore", "Guindy", TravelMode::Walking, Some(MapProvider::Google))
            .await
            .unwrap();
        let MapState::Fallback(panel) = state else {
            panic!("expected the fallback panel, got {state:?}");
        };
        assert_eq!(panel.title, "Google Maps API Required");
        assert_eq!(panel.to.as_deref(), Some("Guindy"));
    }

    #[test(tokio::test)]
    async fn test_locate() {
        let located = locate(Some(Position {
            lat: 13.0418,
            lng: 80.2341,
            accuracy: 10.0,
        }))
        .await
        .unwrap();
        assert_eq!(located.area, "T. Nagar");

        assert!(matches!(
            locate(None).await,
            Err(AcError::Geolocation(
                crate::error::GeolocationError::Unsupported
            ))
        ));
        assert!(matches!(
            locate(Some(Position {
                lat: 91.0,
                lng: 80.0,
                accuracy: 1.0
            }))
            .await,
            Err(AcError::InvalidCoordinates(..))
        ));
    }

    #[test(tokio::test)]
    async fn test_stylesheet_follows_preferences() {
        let app = app();
        app.preferences()
            .update(&PreferencesUpdate {
                theme: Some(Theme::Dark),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(app.stylesheet().has_class("theme-dark"));
    }
}
