use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use super::{ApiError, ParcelApi};
use crate::map::parcel_map::MAP_CENTER;
use crate::model::{
    FireHazardStatus, GeocodeResult, Parcel, ParcelId, SurroundingParcel, FIRE_HAZARD_NO,
};

/// Simulated network delay of the address search.
pub const SEARCH_DELAY: Duration = Duration::from_millis(500);

const SEARCH_RESULT_COUNT: u32 = 4;

const MOCK_SURROUNDING_JSON_STR: &str = include_str!("mock_surrounding_parcels.json");

/// Four made-up parcels with ids 1 to 4 and a coin-flip fire hazard flag.
/// The query is not looked at.
pub fn simulated_search(_query: &str) -> Vec<Parcel> {
    let mut rng = rand::rng();
    (1..=SEARCH_RESULT_COUNT)
        .map(|id| Parcel {
            id: id.to_string(),
            apn: (1000 + id).to_string(),
            address: format!("10{} Example St.", id),
            is_fire_hazard: rng.random_bool(0.5),
        })
        .collect()
}

/// In-memory stand-in for the parcel backend.
pub struct MockParcelApi {
    delay: Duration,
    failing: Cell<bool>,
    fire_hazards: RefCell<HashMap<String, String>>,
    surrounding: Vec<SurroundingParcel>,
}

impl Default for MockParcelApi {
    fn default() -> Self {
        MockParcelApi::new(SEARCH_DELAY)
    }
}

impl MockParcelApi {
    pub fn new(delay: Duration) -> MockParcelApi {
        // The bundled fixture is valid JSON; an empty list is the fallback
        // should it ever not be.
        let surrounding = serde_json::from_str(MOCK_SURROUNDING_JSON_STR).unwrap_or_default();
        MockParcelApi {
            delay,
            failing: Cell::new(false),
            fire_hazards: RefCell::new(HashMap::new()),
            surrounding,
        }
    }

    /// A mock without the artificial delay.
    pub fn instant() -> MockParcelApi {
        MockParcelApi::new(Duration::from_millis(0))
    }

    /// Makes every following call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    fn call(&self, what: &str) -> Result<(), ApiError> {
        debug!("Mock API call: {}", what);
        if self.failing.get() {
            info!("Mock API failing {}", what);
            return Err(ApiError::Unavailable);
        }
        Ok(())
    }
}

impl ParcelApi for MockParcelApi {
    fn search(&self, query: &str) -> Result<Vec<Parcel>, ApiError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.call("search")?;
        Ok(simulated_search(query))
    }

    fn geocode(&self, address: &str) -> Result<GeocodeResult, ApiError> {
        self.call("geocode")?;
        let parcelid = self
            .surrounding
            .first()
            .map(|p| p.parcelid.clone())
            .unwrap_or_else(|| ParcelId::from(address));
        Ok(GeocodeResult {
            lat: MAP_CENTER.1,
            lon: MAP_CENTER.0,
            parcelid,
        })
    }

    fn surrounding_parcels(
        &self,
        _parcel_id: &str,
        _distance: f64,
    ) -> Result<Vec<SurroundingParcel>, ApiError> {
        self.call("surrounding_parcels")?;
        Ok(self.surrounding.clone())
    }

    fn fire_hazard_status(&self, parcel_id: &str) -> Result<FireHazardStatus, ApiError> {
        self.call("fire_hazard_status")?;
        let firehazard = self
            .fire_hazards
            .borrow()
            .get(parcel_id)
            .cloned()
            .unwrap_or_else(|| FIRE_HAZARD_NO.to_owned());
        Ok(FireHazardStatus {
            firehazard,
            parcelid: parcel_id.into(),
        })
    }

    fn set_fire_hazard_status(
        &self,
        parcel_id: &str,
        firehazard: &str,
    ) -> Result<FireHazardStatus, ApiError> {
        self.call("set_fire_hazard_status")?;
        self.fire_hazards
            .borrow_mut()
            .insert(parcel_id.to_owned(), firehazard.to_owned());
        Ok(FireHazardStatus {
            firehazard: firehazard.to_owned(),
            parcelid: parcel_id.into(),
        })
    }

    fn map_style(&self) -> Result<serde_json::Value, ApiError> {
        self.call("map_style")?;
        Ok(serde_json::json!({ "version": 8, "sources": {}, "layers": [] }))
    }
}
