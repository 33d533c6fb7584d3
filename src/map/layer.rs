use log::debug;

use super::extent::Extent;
use super::feature::{Area, MapFeature};
use super::feature_index::FeatureIndex;
use super::highlight::HighlightState;
use super::style::{self, StyleKind};

/// Zoom below which the parcel data layer is not drawn.
pub const DATA_LAYER_MIN_ZOOM: f64 = 15.0;

/// Style assignment of one feature after a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    pub id: Option<String>,
    pub kind: StyleKind,
}

/// The parcel data layer.
///
/// Styles are resolved lazily: [`invalidate`](DataLayer::invalidate) marks
/// the layer dirty and the next [`render`](DataLayer::render) re-evaluates
/// every feature against the current highlight.
pub struct DataLayer {
    index: FeatureIndex,
    min_zoom: f64,
    dirty: bool,
    passes: u64,
    rendered: Vec<RenderedFeature>,
}

impl DataLayer {
    pub fn new(index: FeatureIndex) -> DataLayer {
        DataLayer {
            index,
            min_zoom: DATA_LAYER_MIN_ZOOM,
            dirty: true,
            passes: 0,
            rendered: Vec::new(),
        }
    }

    pub fn index(&self) -> &FeatureIndex {
        &self.index
    }

    /// Replaces the layer's features.
    pub fn set_index(&mut self, index: FeatureIndex) {
        self.index = index;
        self.invalidate();
    }

    pub fn is_visible_at(&self, zoom: f64) -> bool {
        zoom >= self.min_zoom
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of full re-style passes so far.
    pub fn render_passes(&self) -> u64 {
        self.passes
    }

    pub fn render(&mut self, highlight: &HighlightState) -> &[RenderedFeature] {
        if self.dirty {
            self.rendered = self
                .index
                .features()
                .iter()
                .map(|feature| RenderedFeature {
                    id: feature.id().map(str::to_owned),
                    kind: style::resolve_kind(feature, highlight),
                })
                .collect();
            self.dirty = false;
            self.passes += 1;
            debug!("Re-styled {} parcel features", self.rendered.len());
        }
        &self.rendered
    }

    pub fn topmost_at(&self, x: f64, y: f64) -> Option<&MapFeature> {
        self.index.topmost_at(x, y)
    }
}

/// Vector source holding the surrounding-parcel selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionLayer {
    areas: Vec<Area>,
}

impl SelectionLayer {
    pub fn set_areas(&mut self, areas: Vec<Area>) {
        self.areas = areas;
    }

    pub fn clear(&mut self) {
        self.areas.clear();
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Union of the geometry extents, `None` when empty.
    pub fn extent(&self) -> Option<Extent> {
        Extent::union_all(self.areas.iter().filter_map(Area::extent))
    }

    /// Whether any selected geometry is drawn over the map coordinate.
    pub fn hit(&self, x: f64, y: f64) -> bool {
        let point = geo_types::Point::new(x, y);
        self.areas.iter().any(|area| area.contains_exact(&point))
    }

    pub fn style(&self) -> style::Style {
        style::style_for(StyleKind::Selected, None)
    }
}
