use std::path::PathBuf;

use crate::backend::BackendClient;
use crate::error::AcResult;
use crate::location::{DEFAULT_NOMINATIM_URL, NominatimClient};
use crate::map::MapProvider;
use crate::storage::LocalStore;

/// Runtime settings, folded from the command line and the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend_url: Option<String>,
    pub google_maps_key: Option<String>,
    pub nominatim_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./"),
            backend_url: None,
            google_maps_key: None,
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
        }
    }
}

impl AppConfig {
    // Getters/Setters

    /// The key, unless it is missing or blank.
    pub fn google_maps_key(&self) -> Option<&str> {
        self.google_maps_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Google when a key is configured, OpenStreetMap otherwise.
    pub fn default_map_provider(&self) -> MapProvider {
        if self.google_maps_key().is_some() {
            MapProvider::Google
        } else {
            MapProvider::OpenStreetMap
        }
    }

    // Functions

    pub fn open_store(&self) -> LocalStore {
        LocalStore::open(&self.data_dir)
    }

    pub fn backend_client(&self) -> AcResult<Option<BackendClient>> {
        self.backend_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(BackendClient::new)
            .transpose()
    }

    pub fn nominatim_client(&self) -> AcResult<NominatimClient> {
        NominatimClient::new(&self.nominatim_url)
    }
}
