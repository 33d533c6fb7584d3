use log::info;

use crate::api::ParcelApi;
use crate::map::{MapError, ParcelMap};
use crate::model::ParcelFromMap;
use crate::stores::{AddressSearchStore, DistanceSearchStore};

/// The notification page: pick a parcel by clicking or by address, then find
/// the parcels within a distance of it.
#[derive(Debug, Clone, Default)]
pub struct NotifierView {
    parcel_from_map: Option<ParcelFromMap>,
    address: AddressSearchStore,
    distance: DistanceSearchStore,
}

impl NotifierView {
    pub fn new() -> NotifierView {
        NotifierView::default()
    }

    pub fn parcel_from_map(&self) -> Option<&ParcelFromMap> {
        self.parcel_from_map.as_ref()
    }

    pub fn address_store(&self) -> &AddressSearchStore {
        &self.address
    }

    pub fn distance_store(&self) -> &DistanceSearchStore {
        &self.distance
    }

    /// A geocoded address takes precedence over the clicked parcel.
    pub fn parcel_id(&self) -> Option<&str> {
        self.address
            .search_result
            .as_ref()
            .map(|result| result.parcelid.as_str())
            .or_else(|| self.parcel_from_map.as_ref().map(|p| p.id.as_str()))
    }

    fn refresh_parcel_id(&mut self) {
        let parcel_id = self.parcel_id().map(str::to_owned);
        self.distance.set_parcel_id(parcel_id.as_ref().map(String::as_str));
    }

    pub fn handle_parcel_click(&mut self, parcel: &ParcelFromMap) {
        self.reset_view();
        self.parcel_from_map = Some(parcel.clone());
        self.refresh_parcel_id();
    }

    pub fn search_address(&mut self, api: &dyn ParcelApi, query: &str) {
        self.address.search(api, query);
    }

    pub fn geocode(&mut self, api: &dyn ParcelApi, address: &str) {
        self.address.geocode(api, address);
        self.refresh_parcel_id();
    }

    pub fn search_distance(&mut self, api: &dyn ParcelApi, distance: f64) {
        self.distance.search(api, distance);
    }

    pub fn reset_view(&mut self) {
        self.parcel_from_map = None;
        self.address.clear_search_result();
        self.distance.clear_search_results();
        self.refresh_parcel_id();
    }

    pub fn notify(&mut self) {
        info!(
            "Notifying owners of {} parcels around {:?}",
            self.distance.search_results.len(),
            self.parcel_id()
        );
        self.reset_view();
    }

    /// Pushes the view's state to the map: focus on a geocoded parcel and
    /// overlay the distance results (an empty result set clears the overlay).
    pub fn sync_map(&self, map: &mut ParcelMap) -> Result<usize, MapError> {
        if let Some(result) = self.address.search_result.as_ref() {
            map.focus_geocode_result(result);
        }
        map.select_parcels(&self.distance.search_results)
    }
}
