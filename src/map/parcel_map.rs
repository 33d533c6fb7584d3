use log::{debug, info};

use super::error::MapError;
use super::extent::Extent;
use super::feature::{Area, ATTR_ADDRESS, ATTR_APN, ATTR_FIRE_HAZARD};
use super::feature_index::FeatureIndex;
use super::highlight::HighlightState;
use super::layer::{DataLayer, RenderedFeature, SelectionLayer};
use super::popup::Popup;
use super::projection;
use super::tiles::TileSource;
use super::view::{Padding, View};
use super::wkt;
use crate::config::AppConfig;
use crate::model::{GeocodeResult, ParcelFromMap, SurroundingParcel, FIRE_HAZARD_YES};

/// Value of the `layer` attribute on parcel features.
pub const PARCEL_LAYER: &str = "parcels";

/// Initial view: downtown Santa Cruz, longitude/latitude.
pub const MAP_CENTER: (f64, f64) = (-122.0283, 37.0405);
pub const MAP_ZOOM: f64 = 16.0;

/// Padding kept around the selection when the view is fitted to it.
pub const FIT_PADDING: f64 = 50.0;

/// [`FIT_PADDING`] on each side, shrunk to a quarter of the surface on maps
/// too small to hold it.
pub fn fit_padding(view: &View) -> Padding {
    let (width, height) = view.size();
    let horizontal = FIT_PADDING.min(width as f64 / 4.0);
    let vertical = FIT_PADDING.min(height as f64 / 4.0);
    [vertical, horizontal, vertical, horizontal]
}

/// Not `Send`: the map is driven from a single thread.
pub type ParcelClickHandler = Box<dyn FnMut(&ParcelFromMap)>;

/// What a click on the map resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Selected(ParcelFromMap),
    Deselected,
}

/// Interactive parcel map: click to select a parcel, highlight it, show a
/// popup, and overlay the parcels surrounding a search.
pub struct ParcelMap {
    view: View,
    data_layer: DataLayer,
    selection: SelectionLayer,
    highlight: HighlightState,
    popup: Popup,
    base_tiles: TileSource,
    data_tiles: TileSource,
    on_parcel_click: Option<ParcelClickHandler>,
}

impl ParcelMap {
    pub fn new(view: View, parcels: FeatureIndex, base_tiles: TileSource, data_tiles: TileSource) -> ParcelMap {
        ParcelMap {
            view,
            data_layer: DataLayer::new(parcels),
            selection: SelectionLayer::default(),
            highlight: HighlightState::default(),
            popup: Popup::default(),
            base_tiles,
            data_tiles,
            on_parcel_click: None,
        }
    }

    /// Map of `width`x`height` pixels at the initial center and zoom.
    pub fn from_config(
        config: &AppConfig,
        width: u32,
        height: u32,
        parcels: FeatureIndex,
    ) -> Result<ParcelMap, MapError> {
        let view = View::from_lon_lat(MAP_CENTER.0, MAP_CENTER.1, MAP_ZOOM, width, height)?;
        Ok(ParcelMap::new(
            view,
            parcels,
            TileSource::base_map(&config.tiles_base_url),
            TileSource::parcels(&config.tiles_data_url),
        ))
    }

    /// Callback invoked once for every click that selects a parcel.
    pub fn set_on_parcel_click(&mut self, handler: ParcelClickHandler) {
        self.on_parcel_click = Some(handler);
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn selection(&self) -> &SelectionLayer {
        &self.selection
    }

    pub fn data_layer(&self) -> &DataLayer {
        &self.data_layer
    }

    pub fn base_tiles(&self) -> &TileSource {
        &self.base_tiles
    }

    pub fn data_tiles(&self) -> &TileSource {
        &self.data_tiles
    }

    /// Handles a single click at a pixel of the map surface.
    pub fn handle_click(&mut self, px: f64, py: f64) -> ClickOutcome {
        let coordinate = self.view.pixel_to_coordinate(px, py);

        let parcel = match self.parcel_at(coordinate) {
            Some(parcel) => parcel,
            None => {
                debug!("Click at {:?} hit no parcel", coordinate);
                self.close_popup();
                self.highlight_parcel(None, None);
                return ClickOutcome::Deselected;
            }
        };

        info!("Selected parcel {} (apn {:?})", parcel.id, parcel.apn);
        self.highlight_parcel(Some(&parcel.id), Some(coordinate));
        self.popup.show(coordinate, &parcel);

        if let Some(handler) = self.on_parcel_click.as_mut() {
            handler(&parcel);
        }

        ClickOutcome::Selected(parcel)
    }

    /// Descriptor of the topmost parcel drawn at a map coordinate.
    ///
    /// The selection overlay and non-parcel features hide whatever is drawn
    /// below them.
    fn parcel_at(&self, (x, y): (f64, f64)) -> Option<ParcelFromMap> {
        if self.selection.hit(x, y) {
            return None;
        }
        if !self.data_layer.is_visible_at(self.view.zoom()) {
            return None;
        }

        let feature = self.data_layer.topmost_at(x, y)?;
        if feature.layer() != Some(PARCEL_LAYER) {
            return None;
        }

        Some(ParcelFromMap {
            id: feature.id().unwrap_or_default().to_owned(),
            apn: feature.get(ATTR_APN).map(str::to_owned),
            address: feature.get(ATTR_ADDRESS).map(str::to_owned),
            is_fire_hazard: feature.get(ATTR_FIRE_HAZARD) == Some(FIRE_HAZARD_YES),
        })
    }

    /// Highlights a parcel (or clears the highlight with `None`), optionally
    /// recentering the view on a map coordinate, and re-styles the layer.
    pub fn highlight_parcel(&mut self, id: Option<&str>, coordinate: Option<(f64, f64)>) {
        self.highlight.set(id);
        if let Some(center) = coordinate {
            self.view.set_center(center);
        }
        self.data_layer.invalidate();
    }

    pub fn close_popup(&mut self) {
        self.popup.hide();
    }

    /// The popup's close control was pressed.
    pub fn click_popup_closer(&mut self) {
        self.close_popup();
        self.highlight_parcel(None, None);
    }

    /// Centers on a geocoded address and highlights its parcel.
    pub fn focus_geocode_result(&mut self, result: &GeocodeResult) {
        let center = projection::from_lon_lat(result.lon, result.lat);
        self.highlight_parcel(Some(result.parcelid.as_str()), Some(center));
    }

    /// Replaces the selection overlay with the given parcels and fits the
    /// view to them. An empty list clears the overlay and keeps the view.
    ///
    /// If any record's WKT is invalid nothing changes.
    pub fn select_parcels(&mut self, records: &[SurroundingParcel]) -> Result<usize, MapError> {
        let areas = records
            .iter()
            .map(|record| {
                wkt::read_feature_geometry(&record.geom)
                    .map_err(|cause| MapError::InvalidParcelGeometry {
                        parcel_id: record.parcelid.to_string(),
                        cause,
                    })
                    .and_then(|geometry| {
                        Area::from_geometry(geometry).ok_or_else(|| MapError::InvalidParcelGeometry {
                            parcel_id: record.parcelid.to_string(),
                            cause: wkt::WktError::UnsupportedType("GEOMETRY".to_owned()),
                        })
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut view = self.view;
        if let Some(extent) = Extent::union_all(areas.iter().filter_map(Area::extent)) {
            view.fit(&extent, fit_padding(&view))?;
        }

        self.selection.set_areas(areas);
        self.view = view;
        if !self.selection.is_empty() {
            info!(
                "Selected {} parcels, view fitted to zoom {:.2}",
                self.selection.len(),
                self.view.zoom()
            );
        }

        Ok(self.selection.len())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Re-styles the data layer if it was invalidated and returns the
    /// per-feature styles.
    pub fn render(&mut self) -> &[RenderedFeature] {
        self.data_layer.render(&self.highlight)
    }

    /// Tile URLs needed to draw the current view, base map first.
    pub fn tile_urls(&self) -> Vec<String> {
        let base = self.base_tiles.tiles_for_view(&self.view);
        let data = if self.data_layer.is_visible_at(self.view.zoom()) {
            self.data_tiles.tiles_for_view(&self.view)
        } else {
            Vec::new()
        };

        base.into_iter()
            .map(|t| self.base_tiles.tile_url(t))
            .chain(data.into_iter().map(|t| self.data_tiles.tile_url(t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::style::StyleKind;
    use crate::map::view::resolution_for_zoom;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::rc::Rc;

    const PARCELS_GEOJSON_STR: &str = include_str!("test_resources/parcels.geojson");
    const SURROUNDING_JSON_STR: &str = include_str!("test_resources/surrounding_parcels.json");

    const INSIDE_70207: (f64, f64) = (-122.0104063, 37.0051479);
    const INSIDE_70213: (f64, f64) = (-122.0103836, 37.0042672);
    const INSIDE_70240: (f64, f64) = (-122.0088852, 37.0042707);
    const INSIDE_WATER: (f64, f64) = (-122.0184375, 37.0115);

    fn map() -> ParcelMap {
        let index = FeatureIndex::from_geojson_str(PARCELS_GEOJSON_STR).unwrap();
        // Zoom 16 centered on the parcels so every fixture is on screen.
        let view = View::from_lon_lat(-122.012, 37.006, MAP_ZOOM, 2048, 2048).unwrap();
        ParcelMap::new(
            view,
            index,
            TileSource::base_map("http://base.example"),
            TileSource::parcels("http://data.example"),
        )
    }

    fn pixel_of(map: &ParcelMap, (lon, lat): (f64, f64)) -> (f64, f64) {
        let (x, y) = projection::from_lon_lat(lon, lat);
        map.view().coordinate_to_pixel(x, y)
    }

    fn click(map: &mut ParcelMap, lon_lat: (f64, f64)) -> ClickOutcome {
        let (px, py) = pixel_of(map, lon_lat);
        map.handle_click(px, py)
    }

    fn records() -> Vec<SurroundingParcel> {
        serde_json::from_str(SURROUNDING_JSON_STR).unwrap()
    }

    #[test]
    fn it_should_select_a_parcel_and_call_back_once() {
        let mut map = map();
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = clicked.clone();
        map.set_on_parcel_click(Box::new(move |parcel| sink.borrow_mut().push(parcel.clone())));

        let outcome = click(&mut map, INSIDE_70207);

        let expected = ParcelFromMap {
            id: "70207".to_owned(),
            apn: Some("1001".to_owned()),
            address: Some("101 Example St.".to_owned()),
            is_fire_hazard: true,
        };
        assert_eq!(outcome, ClickOutcome::Selected(expected.clone()));
        assert_eq!(*clicked.borrow(), vec![expected]);
        assert_eq!(map.highlight().get(), Some("70207"));
        assert!(map.popup().is_visible());
        assert_eq!(map.popup().content(), "<p><b>Parcel 70207</b></p> <p>APN: 1001</p>");
    }

    #[test]
    fn it_should_anchor_popup_and_center_on_the_click() {
        let mut map = map();
        let (px, py) = pixel_of(&map, INSIDE_70240);
        let coordinate = map.view().pixel_to_coordinate(px, py);

        map.handle_click(px, py);

        assert_eq!(map.popup().position(), Some(coordinate));
        assert_eq!(map.view().center(), coordinate);
    }

    #[test]
    fn it_should_pass_missing_attributes_through() {
        let mut map = map();
        match click(&mut map, INSIDE_70213) {
            ClickOutcome::Selected(parcel) => {
                assert_eq!(parcel.id, "70213");
                assert_eq!(parcel.apn, None);
                assert_eq!(parcel.address, None);
                assert!(!parcel.is_fire_hazard);
            }
            other => panic!("Wrong outcome: {:?}", other),
        }
        assert_eq!(map.popup().content(), "<p><b>Parcel 70213</b></p> <p>APN: undefined</p>");
    }

    #[test]
    fn it_should_deselect_on_empty_click() {
        let mut map = map();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        map.set_on_parcel_click(Box::new(move |_| *counter.borrow_mut() += 1));

        click(&mut map, INSIDE_70207);
        assert_eq!(click(&mut map, (-122.0, 37.1)), ClickOutcome::Deselected);

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(map.highlight().get(), None);
        assert!(!map.popup().is_visible());
    }

    #[test]
    fn it_should_treat_other_layers_as_empty() {
        let mut map = map();
        click(&mut map, INSIDE_70207);
        let center = map.view().center();

        assert_eq!(click(&mut map, INSIDE_WATER), ClickOutcome::Deselected);
        assert_eq!(map.highlight().get(), None);
        assert!(!map.popup().is_visible());
        // Deselecting does not move the view.
        assert_eq!(map.view().center(), center);
    }

    #[test]
    fn it_should_ignore_parcels_when_zoomed_out() {
        let mut map = map();
        let center = map.view().center();
        *map.view_mut() = View::new(center, resolution_for_zoom(12.0), 2048, 2048).unwrap();
        assert_eq!(click(&mut map, INSIDE_70207), ClickOutcome::Deselected);
    }

    #[test]
    fn it_should_restyle_after_each_click() {
        let mut map = map();
        let passes = {
            map.render();
            map.data_layer().render_passes()
        };

        click(&mut map, INSIDE_70240);
        let rendered = map.render().to_vec();
        assert_eq!(map.data_layer().render_passes(), passes + 1);

        let kind_of = |id: &str| {
            rendered
                .iter()
                .find(|r| r.id.as_ref().map(String::as_str) == Some(id))
                .map(|r| r.kind)
        };
        // 70240 is a fire hazard, but highlight wins.
        assert_eq!(kind_of("70240"), Some(StyleKind::Highlight));
        assert_eq!(kind_of("70207"), Some(StyleKind::Fire));
        assert_eq!(kind_of("70237"), Some(StyleKind::Parcel));

        click(&mut map, (-122.0, 37.1));
        let rendered = map.render().to_vec();
        assert!(rendered.iter().all(|r| r.kind != StyleKind::Highlight));
    }

    #[test]
    fn it_should_clear_highlight_from_the_popup_closer() {
        let mut map = map();
        click(&mut map, INSIDE_70207);
        map.click_popup_closer();
        assert!(!map.popup().is_visible());
        assert_eq!(map.highlight().get(), None);
    }

    #[test]
    fn it_should_keep_the_view_when_selecting_nothing() {
        let mut map = map();
        let before = *map.view();
        assert_eq!(map.select_parcels(&[]).unwrap(), 0);
        assert_eq!(*map.view(), before);
        assert!(map.selection().is_empty());
    }

    #[test]
    fn it_should_fit_the_view_to_selected_parcels() {
        let mut map = map();
        let records = records();

        assert_eq!(map.select_parcels(&records).unwrap(), records.len());
        assert_eq!(map.selection().len(), 6);

        let union = map.selection().extent().unwrap();
        let visible = map.view().visible_extent();
        let pad = FIT_PADDING * map.view().resolution();
        assert!(visible.contains_extent(&union));

        // One dimension is tight against the padding.
        let tight_x = (visible.width() - (union.width() + 2.0 * pad)).abs() < 1e-6;
        let tight_y = (visible.height() - (union.height() + 2.0 * pad)).abs() < 1e-6;
        assert!(tight_x || tight_y);
    }

    #[test]
    fn it_should_fit_a_small_map_with_reduced_padding() {
        let index = FeatureIndex::from_geojson_str(PARCELS_GEOJSON_STR).unwrap();
        let view = View::from_lon_lat(-122.012, 37.006, MAP_ZOOM, 100, 100).unwrap();
        let mut map = ParcelMap::new(
            view,
            index,
            TileSource::base_map("http://base.example"),
            TileSource::parcels("http://data.example"),
        );

        assert_eq!(map.select_parcels(&records()).unwrap(), 6);
        assert_eq!(map.selection().len(), 6);

        let union = map.selection().extent().unwrap();
        let visible = map.view().visible_extent();
        assert!(visible.contains_extent(&union));

        // 25 px on each side, a quarter of the surface.
        let pad = 25.0 * map.view().resolution();
        let tight_x = (visible.width() - (union.width() + 2.0 * pad)).abs() < 1e-6;
        let tight_y = (visible.height() - (union.height() + 2.0 * pad)).abs() < 1e-6;
        assert!(tight_x || tight_y);
    }

    #[test]
    fn it_should_replace_the_previous_selection() {
        let mut map = map();
        let records = records();
        map.select_parcels(&records).unwrap();
        map.select_parcels(&records[..2]).unwrap();
        assert_eq!(map.selection().len(), 2);

        map.select_parcels(&[]).unwrap();
        assert!(map.selection().is_empty());
    }

    #[test]
    fn it_should_reject_invalid_wkt_without_changes() {
        let mut map = map();
        let mut records = records();
        map.select_parcels(&records[..3]).unwrap();
        let view = *map.view();

        records[4].geom = "MULTIPOLYGON(((oops)))".to_owned();
        assert_matches!(
            map.select_parcels(&records),
            Err(MapError::InvalidParcelGeometry { ref parcel_id, .. }) if parcel_id == "70241"
        );
        assert_eq!(map.selection().len(), 3);
        assert_eq!(*map.view(), view);
    }

    #[test]
    fn it_should_let_the_selection_cover_parcels() {
        let mut map = map();
        map.select_parcels(&records()).unwrap();
        assert_eq!(click(&mut map, INSIDE_70207), ClickOutcome::Deselected);
    }

    #[test]
    fn it_should_focus_a_geocode_result() {
        let mut map = map();
        let result = GeocodeResult {
            lat: 37.0051479,
            lon: -122.0104063,
            parcelid: "70207".into(),
        };
        map.focus_geocode_result(&result);
        assert_eq!(map.highlight().get(), Some("70207"));
        assert_eq!(map.view().center(), projection::from_lon_lat(-122.0104063, 37.0051479));
    }

    #[test]
    fn it_should_list_tiles_for_both_sources() {
        let map = map();
        let urls = map.tile_urls();
        assert!(urls.iter().any(|u| u.starts_with("http://base.example/data/v3/14/")));
        assert!(urls.iter().any(|u| u.starts_with("http://data.example/maps/parcels/16/")));
    }
}
