use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{AcError, AcResult};
use crate::utils::Coordinates;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const USER_AGENT: &str = "Chennai-Accessibility-App";
/// Wait before each request. Nominatim's usage policy allows one request per second.
pub const REQUEST_DELAY: Duration = Duration::from_secs(1);

const CITY_SUFFIX: &str = ", Chennai, Tamil Nadu, India";

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Appends the city, state and country unless the text already names Chennai.
pub fn with_city_context(location: &str) -> String {
    if location.contains("Chennai") {
        location.to_string()
    } else {
        format!("{location}{CITY_SUFFIX}")
    }
}

/// Client for the public OpenStreetMap geocoder.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    base_url: Url,
    delay: Duration,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new(base_url: &str) -> AcResult<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            base_url: Url::parse(base_url)?,
            delay: REQUEST_DELAY,
            client,
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn search_url(&self, location: &str) -> AcResult<Url> {
        let query = with_city_context(location);
        let mut url = self.base_url.join("search")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", &query)
            .append_pair("limit", "1")
            .append_pair("countrycodes", "in");
        Ok(url)
    }

    /// Looks the text up online. `Ok(None)` means the geocoder knows no such place.
    pub async fn search(&self, location: &str) -> AcResult<Option<Coordinates>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let url = self.search_url(location)?;
        log::debug!("Geocoding {location:?} via {url}");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AcError::HttpStatus(response.status().as_u16()));
        }
        parse_search_response(&response.text().await?)
    }
}

pub fn parse_search_response(body: &str) -> AcResult<Option<Coordinates>> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)?;
    match hits.first() {
        Some(hit) => Ok(Some(Coordinates::new(hit.lat.parse()?, hit.lon.parse()?))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn test_search_url_appends_city() {
        let client = NominatimClient::new(DEFAULT_NOMINATIM_URL).unwrap();
        let url = client.search_url("Marina Beach").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(url.path(), "/search");
        assert_eq!(
            pairs,
            vec![
                ("format".to_string(), "json".to_string()),
                (
                    "q".to_string(),
                    "Marina Beach, Chennai, Tamil Nadu, India".to_string()
                ),
                ("limit".to_string(), "1".to_string()),
                ("countrycodes".to_string(), "in".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_keeps_explicit_city() {
        let client = NominatimClient::new(DEFAULT_NOMINATIM_URL).unwrap();
        let url = client.search_url("Chennai Central").unwrap();
        assert!(url.query_pairs().any(|(k, v)| k == "q" && v == "Chennai Central"));
    }

    #[test]
    fn test_parse_first_hit() {
        let body = r#"[
            {"lat": "13.0478", "lon": "80.2820", "display_name": "Marina"},
            {"lat": "0", "lon": "0"}
        ]"#;
        assert_eq!(
            parse_search_response(body).unwrap(),
            Some(Coordinates::new(13.0478, 80.2820))
        );
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert_eq!(parse_search_response("[]").unwrap(), None);
        assert!(parse_search_response("{\"error\":1}").is_err());
        assert!(parse_search_response(r#"[{"lat":"north","lon":"1"}]"#).is_err());
    }
}
