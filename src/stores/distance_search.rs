use log::{info, warn};

use crate::api::{ApiError, ParcelApi};
use crate::model::SurroundingParcel;

/// State of the "parcels within a distance" search around one parcel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceSearchStore {
    parcel_id: Option<String>,
    pub error_message: String,
    pub is_search_in_progress: bool,
    pub search_results: Vec<SurroundingParcel>,
}

impl DistanceSearchStore {
    pub fn new(parcel_id: Option<&str>) -> DistanceSearchStore {
        DistanceSearchStore {
            parcel_id: parcel_id.map(str::to_owned),
            ..DistanceSearchStore::default()
        }
    }

    pub fn parcel_id(&self) -> Option<&str> {
        self.parcel_id.as_ref().map(String::as_str)
    }

    pub fn set_parcel_id(&mut self, parcel_id: Option<&str>) {
        self.parcel_id = parcel_id.map(str::to_owned);
    }

    pub fn begin_search(&mut self) {
        self.error_message.clear();
        self.is_search_in_progress = true;
        self.search_results.clear();
    }

    pub fn handle_results(&mut self, results: Result<Vec<SurroundingParcel>, ApiError>) {
        self.is_search_in_progress = false;
        match results {
            Ok(results) => {
                info!("{} parcels found", results.len());
                self.search_results = results;
            }
            Err(err) => {
                warn!("Distance search failed: {}", err);
                self.error_message = err.user_message().to_owned();
            }
        }
    }

    /// Searches around the current parcel. Does nothing without one.
    pub fn search(&mut self, api: &dyn ParcelApi, distance: f64) {
        let parcel_id = match self.parcel_id.clone() {
            Some(id) if !id.is_empty() => id,
            _ => return,
        };

        self.begin_search();
        self.handle_results(api.surrounding_parcels(&parcel_id, distance));
    }

    pub fn clear_search_results(&mut self) {
        self.search_results.clear();
    }
}
