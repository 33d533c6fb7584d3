//! Client facade for the parcel backend.
//!
//! [`HttpParcelApi`] talks to the real endpoints; [`MockParcelApi`] serves
//! canned data from memory. The address search is simulated by both.

use failure::Fail;

use crate::model::{FireHazardStatus, GeocodeResult, Parcel, SurroundingParcel};

mod http;
mod mock;

pub use self::http::HttpParcelApi;
pub use self::mock::{simulated_search, MockParcelApi};

/// The only error text users ever see.
pub const USER_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Fail)]
pub enum ApiError {
    #[fail(display = "Invalid URL: {}", _0)]
    InvalidUrl(String),
    #[fail(display = "Request failed: {}", _0)]
    Request(reqwest::Error),
    #[fail(display = "{} returned HTTP {}", url, status)]
    Status { url: String, status: u16 },
    #[fail(display = "Cannot decode response: {}", _0)]
    Decode(reqwest::Error),
    #[fail(display = "Service unavailable")]
    Unavailable,
}

impl ApiError {
    /// Every failure looks the same to the user.
    pub fn user_message(&self) -> &'static str {
        USER_ERROR_MESSAGE
    }
}

pub trait ParcelApi {
    /// Free-text parcel search.
    fn search(&self, query: &str) -> Result<Vec<Parcel>, ApiError>;

    /// `GET /geocode/{address}`
    fn geocode(&self, address: &str) -> Result<GeocodeResult, ApiError>;

    /// `GET /notify/parcel-and-distance?parcelid=&dist=`
    fn surrounding_parcels(
        &self,
        parcel_id: &str,
        distance: f64,
    ) -> Result<Vec<SurroundingParcel>, ApiError>;

    /// `GET /parcel/firehazard/{parcelId}`
    fn fire_hazard_status(&self, parcel_id: &str) -> Result<FireHazardStatus, ApiError>;

    /// `PUT /parcel/firehazard/{parcelId}`
    fn set_fire_hazard_status(
        &self,
        parcel_id: &str,
        firehazard: &str,
    ) -> Result<FireHazardStatus, ApiError>;

    /// The base map's style document.
    fn map_style(&self) -> Result<serde_json::Value, ApiError>;
}
