use crate::api::ParcelApi;
use crate::model::ParcelFromMap;
use crate::stores::FireHazardStore;

/// The categories page: edit the fire-hazard flag of the clicked parcel.
///
/// Each selection starts from a fresh store, so the status shown is always
/// the one the backend reports at selection time.
#[derive(Debug, Clone, Default)]
pub struct CategoriesView {
    selected: Option<ParcelFromMap>,
    fire_hazard: Option<FireHazardStore>,
}

impl CategoriesView {
    pub fn new() -> CategoriesView {
        CategoriesView::default()
    }

    pub fn selected(&self) -> Option<&ParcelFromMap> {
        self.selected.as_ref()
    }

    pub fn fire_hazard_store(&self) -> Option<&FireHazardStore> {
        self.fire_hazard.as_ref()
    }

    pub fn select(&mut self, api: &dyn ParcelApi, parcel: &ParcelFromMap) {
        let mut store = FireHazardStore::new(&parcel.id);
        store.load(api);
        self.selected = Some(parcel.clone());
        self.fire_hazard = Some(store);
    }

    pub fn cancel(&mut self) {
        self.selected = None;
        self.fire_hazard = None;
    }

    /// Submits a new status for the selected parcel. Returns `false` when
    /// nothing is selected.
    pub fn save(&mut self, api: &dyn ParcelApi, firehazard: &str) -> bool {
        match self.fire_hazard.as_mut() {
            Some(store) => {
                store.submit(api, firehazard);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockParcelApi;

    fn parcel(id: &str) -> ParcelFromMap {
        ParcelFromMap {
            id: id.to_owned(),
            apn: Some("1001".to_owned()),
            address: None,
            is_fire_hazard: false,
        }
    }

    #[test]
    fn it_should_load_status_on_select() {
        let api = MockParcelApi::instant();
        let mut view = CategoriesView::new();

        view.select(&api, &parcel("70207"));

        let store = view.fire_hazard_store().unwrap();
        assert_eq!(store.parcel_id(), "70207");
        assert_eq!(store.is_fire_hazard_str, "No");
    }

    #[test]
    fn it_should_save_and_reload_on_reselect() {
        let api = MockParcelApi::instant();
        let mut view = CategoriesView::new();
        view.select(&api, &parcel("70207"));

        assert!(view.save(&api, "Yes"));
        view.cancel();
        assert_eq!(view.selected(), None);

        view.select(&api, &parcel("70207"));
        assert_eq!(view.fire_hazard_store().unwrap().is_fire_hazard_str, "Yes");
    }

    #[test]
    fn it_should_ignore_save_without_selection() {
        let api = MockParcelApi::instant();
        let mut view = CategoriesView::new();
        assert!(!view.save(&api, "Yes"));
    }

    #[test]
    fn it_should_keep_status_when_save_fails() {
        let api = MockParcelApi::instant();
        let mut view = CategoriesView::new();
        view.select(&api, &parcel("70207"));

        api.set_failing(true);
        view.save(&api, "Yes");

        let store = view.fire_hazard_store().unwrap();
        assert_eq!(store.is_fire_hazard_str, "No");
        assert_eq!(store.error_message, "An error occurred");
    }
}
