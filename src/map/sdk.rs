use std::{future::Future, time::Duration};

use url::Url;

use crate::error::{AcError, AcResult};

use super::MapProvider;

pub const SDK_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

pub const LEAFLET_SCRIPT_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
pub const GOOGLE_MAPS_SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";

/// Makes a map provider's client library available.
pub trait SdkLoader {
    fn load(&self, provider: MapProvider) -> impl Future<Output = AcResult<()>> + Send;
}

/// Checks that the provider's script can be fetched.
#[derive(Debug, Clone)]
pub struct HttpSdkLoader {
    client: reqwest::Client,
    google_maps_key: Option<String>,
}

impl HttpSdkLoader {
    pub fn new(google_maps_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            google_maps_key,
        }
    }

    pub fn script_url(&self, provider: MapProvider) -> AcResult<Url> {
        match provider {
            MapProvider::OpenStreetMap => Ok(Url::parse(LEAFLET_SCRIPT_URL)?),
            MapProvider::Google => {
                let key = self
                    .google_maps_key
                    .as_deref()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| {
                        AcError::SdkUnavailable(
                            "Google Maps API not loaded. Please add a valid API key.".to_string(),
                        )
                    })?;

                let mut url = Url::parse(GOOGLE_MAPS_SCRIPT_URL)?;
                url.query_pairs_mut()
                    .append_pair("key", key)
                    .append_pair("libraries", "places");
                Ok(url)
            }
        }
    }
}

impl SdkLoader for HttpSdkLoader {
    async fn load(&self, provider: MapProvider) -> AcResult<()> {
        let url = self.script_url(provider)?;
        log::info!("Loading the {provider} map library");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AcError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_leaflet_needs_no_key() {
        let loader = HttpSdkLoader::new(None);
        assert_eq!(
            loader.script_url(MapProvider::OpenStreetMap).unwrap().as_str(),
            LEAFLET_SCRIPT_URL
        );
    }

    #[test]
    fn test_google_needs_a_key() {
        assert!(matches!(
            HttpSdkLoader::new(None).script_url(MapProvider::Google),
            Err(AcError::SdkUnavailable(_))
        ));
        assert!(HttpSdkLoader::new(Some("  ".to_string()))
            .script_url(MapProvider::Google)
            .is_err());

        let url = HttpSdkLoader::new(Some("abc".to_string()))
            .script_url(MapProvider::Google)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/js?key=abc&libraries=places"
        );
    }

    #[test(tokio::test)]
    async fn test_google_without_key_fails_without_network() {
        let result = HttpSdkLoader::new(None).load(MapProvider::Google).await;
        assert!(matches!(result, Err(AcError::SdkUnavailable(_))));
    }
}
