//! Runtime configuration.
//!
//! Defaults depend on the build mode: debug builds talk to a backend on
//! localhost, release builds to the deployed one. Environment variables
//! override either.

use std::env;

pub const DEV_API_URL: &str = "http://localhost:4000";
pub const PROD_API_URL: &str = "http://parcel-api-scfire.openshift-pousty-apps.gce-containers.crunchydata.com";

pub const TILES_BASE_URL: &str = "http://sc-tileserver-gl-scfire.openshift-pousty-apps.gce-containers.crunchydata.com";
pub const TILES_DATA_URL: &str = "http://tegola-scfire.openshift-pousty-apps.gce-containers.crunchydata.com";

pub const ENV_API_URL: &str = "PARCEL_API_URL";
pub const ENV_TILES_BASE_URL: &str = "PARCEL_TILES_BASE_URL";
pub const ENV_TILES_DATA_URL: &str = "PARCEL_TILES_DATA_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend serving geocode, distance search and fire-hazard endpoints.
    pub api_base_url: String,
    /// Tile server for the base map and its style document.
    pub tiles_base_url: String,
    /// Tile server for the parcel layer.
    pub tiles_data_url: String,
    /// Use the in-memory API instead of HTTP.
    pub mock: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::for_build(cfg!(debug_assertions))
    }
}

impl AppConfig {
    /// Defaults for a debug (`true`) or release (`false`) build, with
    /// environment overrides applied.
    pub fn for_build(debug: bool) -> AppConfig {
        let default_api = if debug { DEV_API_URL } else { PROD_API_URL };
        AppConfig {
            api_base_url: env_or(ENV_API_URL, default_api),
            tiles_base_url: env_or(ENV_TILES_BASE_URL, TILES_BASE_URL),
            tiles_data_url: env_or(ENV_TILES_DATA_URL, TILES_DATA_URL),
            mock: false,
        }
    }

    pub fn with_api_url(mut self, url: &str) -> AppConfig {
        self.api_base_url = url.trim_end_matches('/').to_owned();
        self
    }

    pub fn with_mock(mut self, mock: bool) -> AppConfig {
        self.mock = mock;
        self
    }

    /// Map style document, fetched once at startup.
    pub fn style_url(&self) -> String {
        format!("{}/styles/osm-bright/style.json", self.tiles_base_url)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim_end_matches('/').to_owned())
        .unwrap_or_else(|| default.to_owned())
}
