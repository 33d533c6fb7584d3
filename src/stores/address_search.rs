use log::warn;

use crate::api::{ApiError, ParcelApi};
use crate::model::{GeocodeResult, Parcel};

/// State behind the address search box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressSearchStore {
    pub error_message: String,
    pub is_search_in_progress: bool,
    pub search_results: Vec<Parcel>,
    /// Parcel found by geocoding an address.
    pub search_result: Option<GeocodeResult>,
}

impl AddressSearchStore {
    pub fn begin_search(&mut self) {
        self.error_message.clear();
        self.is_search_in_progress = true;
        self.search_results.clear();
    }

    pub fn handle_search_results(&mut self, results: Result<Vec<Parcel>, ApiError>) {
        self.is_search_in_progress = false;
        match results {
            Ok(results) => self.search_results = results,
            Err(err) => {
                warn!("Parcel search failed: {}", err);
                self.error_message = err.user_message().to_owned();
            }
        }
    }

    pub fn search(&mut self, api: &dyn ParcelApi, query: &str) {
        self.begin_search();
        self.handle_search_results(api.search(query));
    }

    pub fn begin_geocode(&mut self) {
        self.error_message.clear();
        self.is_search_in_progress = true;
        self.search_result = None;
    }

    pub fn handle_geocode_result(&mut self, result: Result<GeocodeResult, ApiError>) {
        self.is_search_in_progress = false;
        match result {
            Ok(result) => self.search_result = Some(result),
            Err(err) => {
                warn!("Geocoding failed: {}", err);
                self.error_message = err.user_message().to_owned();
            }
        }
    }

    pub fn geocode(&mut self, api: &dyn ParcelApi, address: &str) {
        self.begin_geocode();
        self.handle_geocode_result(api.geocode(address));
    }

    pub fn clear_search_results(&mut self) {
        self.search_results.clear();
    }

    pub fn clear_search_result(&mut self) {
        self.search_result = None;
    }
}
