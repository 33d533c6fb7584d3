use log::{info, warn};

use crate::api::{ApiError, ParcelApi};
use crate::model::FireHazardStatus;

/// Fire-hazard status of one parcel, as shown in the edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FireHazardStore {
    parcel_id: String,
    pub error_message: String,
    /// Last status the backend confirmed, `""` until loaded.
    pub is_fire_hazard_str: String,
    pub is_fetching_status: bool,
    pub is_submitting_status: bool,
}

impl FireHazardStore {
    pub fn new(parcel_id: &str) -> FireHazardStore {
        FireHazardStore {
            parcel_id: parcel_id.to_owned(),
            ..FireHazardStore::default()
        }
    }

    pub fn parcel_id(&self) -> &str {
        &self.parcel_id
    }

    pub fn begin_fetch(&mut self) {
        self.error_message.clear();
        self.is_fetching_status = true;
    }

    pub fn handle_fetch(&mut self, status: Result<FireHazardStatus, ApiError>) {
        self.is_fetching_status = false;
        self.apply(status);
    }

    pub fn load(&mut self, api: &dyn ParcelApi) {
        self.begin_fetch();
        self.handle_fetch(api.fire_hazard_status(&self.parcel_id));
    }

    pub fn begin_submit(&mut self) {
        self.error_message.clear();
        self.is_submitting_status = true;
    }

    pub fn handle_submit(&mut self, status: Result<FireHazardStatus, ApiError>) {
        self.is_submitting_status = false;
        self.apply(status);
    }

    /// Writes the status; on failure the displayed status stays as it was.
    pub fn submit(&mut self, api: &dyn ParcelApi, firehazard: &str) {
        self.begin_submit();
        self.handle_submit(api.set_fire_hazard_status(&self.parcel_id, firehazard));
    }

    fn apply(&mut self, status: Result<FireHazardStatus, ApiError>) {
        match status {
            Ok(status) => {
                info!("Parcel {} fire hazard: {}", self.parcel_id, status.firehazard);
                self.is_fire_hazard_str = status.firehazard;
            }
            Err(err) => {
                warn!("Fire hazard request for {} failed: {}", self.parcel_id, err);
                self.error_message = err.user_message().to_owned();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockParcelApi;

    #[test]
    fn it_should_load_and_submit_status() {
        let api = MockParcelApi::instant();
        let mut store = FireHazardStore::new("70207");

        store.load(&api);
        assert_eq!(store.is_fire_hazard_str, "No");
        assert!(!store.is_fetching_status);

        store.submit(&api, "Yes");
        assert_eq!(store.is_fire_hazard_str, "Yes");
        assert!(!store.is_submitting_status);
        assert_eq!(store.error_message, "");
    }

    #[test]
    fn it_should_keep_the_status_when_the_put_fails() {
        let api = MockParcelApi::instant();
        let mut store = FireHazardStore::new("70207");
        store.load(&api);

        api.set_failing(true);
        store.submit(&api, "Yes");

        assert_eq!(store.is_fire_hazard_str, "No");
        assert_eq!(store.error_message, "An error occurred");
        assert!(!store.is_submitting_status);
    }

    #[test]
    fn it_should_clear_the_error_on_retry() {
        let api = MockParcelApi::instant();
        api.set_failing(true);
        let mut store = FireHazardStore::new("70207");
        store.load(&api);
        assert_eq!(store.is_fire_hazard_str, "");
        assert_eq!(store.error_message, "An error occurred");

        api.set_failing(false);
        store.load(&api);
        assert_eq!(store.error_message, "");
        assert_eq!(store.is_fire_hazard_str, "No");
    }
}
