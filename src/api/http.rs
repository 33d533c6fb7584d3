use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::mock::simulated_search;
use super::{ApiError, ParcelApi};
use crate::config::AppConfig;
use crate::model::{FireHazardStatus, GeocodeResult, Parcel, SurroundingParcel};

#[derive(Serialize)]
struct FireHazardUpdate<'a> {
    firehazard: &'a str,
}

/// Blocking HTTP client for the parcel backend.
///
/// One request per call: no retries, no timeout.
#[derive(Debug)]
pub struct HttpParcelApi {
    client: Client,
    base_url: Url,
    style_url: String,
}

impl HttpParcelApi {
    pub fn new(config: &AppConfig) -> Result<HttpParcelApi, ApiError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.api_base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_base_url.clone()));
        }

        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(ApiError::Request)?;

        Ok(HttpParcelApi {
            client,
            base_url,
            style_url: config.style_url(),
        })
    }

    /// `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send(&self, method: Method, url: Url, body: Option<&FireHazardUpdate>) -> Result<Response, ApiError> {
        debug!("{} {}", method, url);
        let mut request = self.client.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            ApiError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned {}", url, status);
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.send(Method::GET, url, None)?
            .json()
            .map_err(ApiError::Decode)
    }
}

impl ParcelApi for HttpParcelApi {
    fn search(&self, query: &str) -> Result<Vec<Parcel>, ApiError> {
        // The backend has no free-text search yet.
        Ok(simulated_search(query))
    }

    fn geocode(&self, address: &str) -> Result<GeocodeResult, ApiError> {
        self.get_json(self.endpoint(&["geocode", address]))
    }

    fn surrounding_parcels(
        &self,
        parcel_id: &str,
        distance: f64,
    ) -> Result<Vec<SurroundingParcel>, ApiError> {
        let mut url = self.endpoint(&["notify", "parcel-and-distance"]);
        url.query_pairs_mut()
            .append_pair("parcelid", parcel_id)
            .append_pair("dist", &distance.to_string());
        self.get_json(url)
    }

    fn fire_hazard_status(&self, parcel_id: &str) -> Result<FireHazardStatus, ApiError> {
        self.get_json(self.endpoint(&["parcel", "firehazard", parcel_id]))
    }

    fn set_fire_hazard_status(
        &self,
        parcel_id: &str,
        firehazard: &str,
    ) -> Result<FireHazardStatus, ApiError> {
        let url = self.endpoint(&["parcel", "firehazard", parcel_id]);
        self.send(Method::PUT, url, Some(&FireHazardUpdate { firehazard }))?
            .json()
            .map_err(ApiError::Decode)
    }

    fn map_style(&self) -> Result<serde_json::Value, ApiError> {
        let url = Url::parse(&self.style_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.style_url, e)))?;
        self.get_json(url)
    }
}
