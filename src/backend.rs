// ------------------------------------------------------------------------------------------------
// --- Client of the companion REST API (preferences, saved routes, alerts and community posts)
// ------------------------------------------------------------------------------------------------

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{Display, EnumString};
use url::Url;

use crate::error::{AcError, AcResult};
use crate::location::AccessibilityFilters;
use crate::preferences::Preferences;

/// A route search as the API stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSearchRecord {
    pub user_id: i64,
    pub start_location: String,
    pub destination: String,
    #[serde(default)]
    pub accessibility_filters: AccessibilityFilters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRoute {
    pub id: i64,
    #[serde(flatten)]
    pub search: RouteSearchRecord,
    /// As formatted by the API.
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertCategory {
    #[default]
    Transport,
    Accessibility,
    Roadway,
    Weather,
    Emergency,
}

/// A travel alert as listed by the API. Categories are free text on the
/// server, so they are kept as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub category: String,
    pub message: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlert {
    pub category: AlertCategory,
    pub message: String,
    pub location: Option<String>,
}

impl NewAlert {
    /// A pinned location is also written in front of the message.
    pub fn new(category: AlertCategory, message: &str, location: Option<&str>) -> AcResult<Self> {
        let message = non_empty(message)?;
        let location = location.map(str::trim).filter(|l| !l.is_empty());
        Ok(Self {
            category,
            message: match location {
                Some(location) => format!("📍 {location}: {message}"),
                None => message.to_string(),
            },
            location: location.map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageType {
    #[default]
    Chat,
    Review,
    Help,
    Info,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityMessage {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub user_id: i64,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
}

impl NewMessage {
    pub fn new(
        user_id: i64,
        message: &str,
        location: Option<&str>,
        kind: MessageType,
    ) -> AcResult<Self> {
        let message = non_empty(message)?;
        Ok(Self {
            user_id,
            message: match location.map(str::trim).filter(|l| !l.is_empty()) {
                Some(location) => format!("{location}: {message}"),
                None => message.to_string(),
            },
            kind,
        })
    }
}

fn non_empty(message: &str) -> AcResult<&str> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AcError::EmptyMessage);
    }
    Ok(message)
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    client: reqwest::Client,
}

impl BackendClient {
    /// The base URL may carry a path prefix; it is kept when joining API paths.
    pub fn new(base_url: &str) -> AcResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    // Getters/Setters

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Functions

    pub fn preferences_url(&self, user_id: i64) -> AcResult<Url> {
        Ok(self
            .base_url
            .join(&format!("api/user/{user_id}/preferences"))?)
    }

    pub fn routes_url(&self) -> AcResult<Url> {
        Ok(self.base_url.join("api/routes")?)
    }

    pub fn alerts_url(&self) -> AcResult<Url> {
        Ok(self.base_url.join("api/alerts")?)
    }

    pub fn community_url(&self) -> AcResult<Url> {
        Ok(self.base_url.join("api/community")?)
    }

    async fn get(&self, url: Url) -> AcResult<String> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AcError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }

    async fn post(&self, url: Url, body: &Value) -> AcResult<()> {
        log::debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(body)?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AcError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }

    /// The stored preference object, which may be `null` for a new user.
    pub async fn fetch_preferences(&self, user_id: i64) -> AcResult<Value> {
        let body = self.get(self.preferences_url(user_id)?).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn save_preferences(&self, user_id: i64, preferences: &Preferences) -> AcResult<()> {
        self.post(
            self.preferences_url(user_id)?,
            &preferences_body(preferences)?,
        )
        .await
    }

    pub async fn save_route(&self, record: &RouteSearchRecord) -> AcResult<()> {
        self.post(self.routes_url()?, &serde_json::to_value(record)?)
            .await
    }

    /// Every saved search, newest first.
    pub async fn list_routes(&self) -> AcResult<Vec<SavedRoute>> {
        let body = self.get(self.routes_url()?).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Every alert, newest first.
    pub async fn fetch_alerts(&self) -> AcResult<Vec<Alert>> {
        let body = self.get(self.alerts_url()?).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn post_alert(&self, alert: &NewAlert) -> AcResult<()> {
        self.post(self.alerts_url()?, &serde_json::to_value(alert)?)
            .await
    }

    /// Every community post, newest first.
    pub async fn fetch_messages(&self) -> AcResult<Vec<CommunityMessage>> {
        let body = self.get(self.community_url()?).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn post_message(&self, message: &NewMessage) -> AcResult<()> {
        self.post(self.community_url()?, &serde_json::to_value(message)?)
            .await
    }
}

/// The API replaces the stored object with the `preferences` member of the body.
pub fn preferences_body(preferences: &Preferences) -> AcResult<Value> {
    Ok(json!({ "preferences": serde_json::to_value(preferences)? }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{Language, Theme};
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn test_urls() {
        let client = BackendClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            client.preferences_url(42).unwrap().as_str(),
            "http://localhost:5000/api/user/42/preferences"
        );
        assert_eq!(
            client.routes_url().unwrap().as_str(),
            "http://localhost:5000/api/routes"
        );
    }

    #[test]
    fn test_preferences_body_is_wrapped() {
        let preferences = Preferences {
            language: Language::Ta,
            theme: Theme::HighContrast,
            ..Default::default()
        };
        assert_eq!(
            preferences_body(&preferences).unwrap(),
            json!({
                "preferences": {
                    "language": "ta",
                    "theme": "high-contrast",
                    "mode": "normal",
                }
            })
        );
    }

    #[test]
    fn test_saved_routes_parse() {
        let body = r#"[
            {"id": 7, "user_id": 1, "start_location": "Chennai Central",
             "destination": "T Nagar",
             "accessibility_filters": {"wheelchair": true, "elevator": false},
             "created_at": "Mon, 02 Mar 2026 09:30:00 GMT"}
        ]"#;
        let routes: Vec<SavedRoute> = serde_json::from_str(body).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].search.destination, "T Nagar");
        assert!(routes[0].search.accessibility_filters.wheelchair);
        assert!(!routes[0].search.accessibility_filters.braille);
    }

    #[test]
    fn test_base_path_is_kept() {
        let client = BackendClient::new("http://example.in/app").unwrap();
        assert_eq!(client.base_url().as_str(), "http://example.in/app/");
        assert_eq!(
            client.routes_url().unwrap().as_str(),
            "http://example.in/app/api/routes"
        );
        assert_eq!(
            client.alerts_url().unwrap().as_str(),
            "http://example.in/app/api/alerts"
        );

        let client = BackendClient::new("http://example.in/app/").unwrap();
        assert_eq!(
            client.community_url().unwrap().as_str(),
            "http://example.in/app/api/community"
        );
    }

    #[test]
    fn test_new_alert_prefixes_location() {
        let alert = NewAlert::new(AlertCategory::Roadway, " Lift broken ", Some("Egmore")).unwrap();
        assert_eq!(
            serde_json::to_value(&alert).unwrap(),
            json!({
                "category": "roadway",
                "message": "📍 Egmore: Lift broken",
                "location": "Egmore",
            })
        );

        let alert = NewAlert::new(AlertCategory::default(), "Flooding", Some("  ")).unwrap();
        assert_eq!(alert.message, "Flooding");
        assert_eq!(alert.location, None);

        assert!(matches!(
            NewAlert::new(AlertCategory::Weather, "   ", None),
            Err(AcError::EmptyMessage)
        ));
    }

    #[test]
    fn test_new_message_body() {
        let message =
            NewMessage::new(3, "Ramp is open", Some("Guindy"), MessageType::Info).unwrap();
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"user_id": 3, "message": "Guindy: Ramp is open", "type": "info"})
        );
    }

    #[test]
    fn test_alerts_and_messages_parse() {
        let body = r#"[
            {"id": 2, "category": "transport", "message": "Bus 21G delayed",
             "created_at": "Mon, 02 Mar 2026 09:30:00 GMT", "location": null}
        ]"#;
        let alerts: Vec<Alert> = serde_json::from_str(body).unwrap();
        assert_eq!(alerts[0].category, "transport");
        assert_eq!(alerts[0].location, None);

        let body = r#"[
            {"id": 5, "user_id": 1, "message": "Need a hand at Egmore",
             "image_url": null, "created_at": null, "type": "help"}
        ]"#;
        let messages: Vec<CommunityMessage> = serde_json::from_str(body).unwrap();
        assert_eq!(messages[0].kind.as_deref(), Some("help"));
        assert_eq!(messages[0].user_id, Some(1));
    }
}
