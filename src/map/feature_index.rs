use std::convert::TryFrom;
use std::fmt;
use std::fs;
use std::io;
use std::path;

use cgmath::Point2;
use failure::Fail;
use geo::algorithm::map_coords::MapCoords;
use geojson::Error as GeoJsonError;
use geojson::GeoJson;
use log::{debug, info};
use spade::rtree::RTree;

use super::extent::Extent;
use super::feature::{Area, MapFeature, PropertyMap};
use super::projection;

#[derive(Debug, Fail)]
pub enum FeatureIndexError {
    #[fail(display = "GeoJSON error: {}", _0)]
    Parse(GeoJsonError),
    #[fail(display = "Invalid feature")]
    InvalidFeature,
    #[fail(display = "Feature collection not found")]
    FeatureCollectionNotFound,
    #[fail(display = "Geometry not found")]
    GeometryNotFound,
    #[fail(display = "Invalid geometry: {}", _0)]
    InvalidGeometry(GeoJsonError),
    #[fail(display = "I/O error: {}", _0)]
    Io(io::Error),
}

impl From<GeoJsonError> for FeatureIndexError {
    fn from(err: GeoJsonError) -> FeatureIndexError {
        info!("Error parsing geo-json: {}", err);
        FeatureIndexError::Parse(err)
    }
}

/// R-tree entry: a feature's bounding box and its draw order.
#[derive(Clone)]
struct IndexedBox {
    bbox: spade::BoundingRect<Point2<f64>>,
    order: usize,
}

impl spade::SpatialObject for IndexedBox {
    type Point = Point2<f64>;

    #[inline]
    fn mbr(&self) -> spade::BoundingRect<Self::Point> {
        self.bbox
    }

    /// Distance to the bbox, not to the geometry.
    #[inline]
    fn distance2(&self, point: &Self::Point) -> f64 {
        self.bbox.distance2(point)
    }

    #[inline]
    fn contains(&self, point: &Self::Point) -> bool {
        self.bbox.contains_point(point)
    }
}

/// Features of one vector layer with a spatial index for hit detection.
///
/// Features are drawn in insertion order, so the last feature containing a
/// point is the topmost one.
pub struct FeatureIndex {
    features: Vec<MapFeature>,
    tree: RTree<IndexedBox>,
}

impl fmt::Debug for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FeatureIndex")
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

impl FeatureIndex {
    pub fn new(features: Vec<MapFeature>) -> FeatureIndex {
        let boxes: Vec<IndexedBox> = features
            .iter()
            .enumerate()
            .filter_map(|(order, feature)| {
                feature.area().extent().map(|ext| IndexedBox {
                    bbox: spade::BoundingRect::from_corners(
                        &Point2::new(ext.min_x, ext.min_y),
                        &Point2::new(ext.max_x, ext.max_y),
                    ),
                    order,
                })
            })
            .collect();

        debug!("Bulk loading {} feature boxes", boxes.len());
        let tree = RTree::bulk_load(boxes);

        FeatureIndex {
            features,
            tree,
        }
    }

    pub fn empty() -> FeatureIndex {
        FeatureIndex::new(Vec::new())
    }

    /// Loads a GeoJSON file whose coordinates are longitude/latitude.
    pub fn from_geojson_file<P: AsRef<path::Path>>(
        geojson_path: P,
    ) -> Result<FeatureIndex, FeatureIndexError> {
        let contents = fs::read_to_string(&geojson_path).map_err(FeatureIndexError::Io)?;
        FeatureIndex::from_geojson_str(&contents)
    }

    /// Parses a GeoJSON feature collection in EPSG:4326 and reprojects it to
    /// the map projection.
    pub fn from_geojson_str(geo_json_str: &str) -> Result<FeatureIndex, FeatureIndexError> {
        let geo_json = geo_json_str.parse::<GeoJson>()?;

        let feature_collection = if let GeoJson::FeatureCollection(ctn) = geo_json {
            ctn
        } else {
            return Err(FeatureIndexError::FeatureCollectionNotFound);
        };

        let features: Result<Vec<_>, _> = feature_collection
            .features
            .into_iter()
            .map(map_feature_from_geojson)
            .collect();

        let features = features?;
        info!("Loaded {} features", features.len());

        Ok(FeatureIndex::new(features))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in draw order.
    pub fn features(&self) -> &[MapFeature] {
        &self.features
    }

    pub fn extent(&self) -> Option<Extent> {
        Extent::union_all(self.features.iter().filter_map(|f| f.area().extent()))
    }

    /// All features containing the map coordinate, topmost first.
    pub fn features_at(&self, x: f64, y: f64) -> Vec<&MapFeature> {
        let tree_point = Point2::new(x, y);
        let point = geo_types::Point::new(x, y);

        // Boxes containing the point are tested against the exact geometry.
        let mut orders: Vec<usize> = self
            .tree
            .lookup_in_rectangle(&spade::BoundingRect::from_point(tree_point))
            .into_iter()
            .map(|candidate| candidate.order)
            .filter(|&order| self.features[order].area().contains_exact(&point))
            .collect();

        orders.sort_unstable_by(|a, b| b.cmp(a));
        orders.into_iter().map(|order| &self.features[order]).collect()
    }

    pub fn topmost_at(&self, x: f64, y: f64) -> Option<&MapFeature> {
        self.features_at(x, y).into_iter().next()
    }
}

fn map_feature_from_geojson(feature: geojson::Feature) -> Result<MapFeature, FeatureIndexError> {
    let id = feature.id.map(|id| match id {
        geojson::feature::Id::String(s) => s,
        geojson::feature::Id::Number(n) => n.to_string(),
    });

    let geometry = feature
        .geometry
        .ok_or(FeatureIndexError::GeometryNotFound)?;
    let geometry = geo_types::Geometry::<f64>::try_from(geometry)
        .map_err(FeatureIndexError::InvalidGeometry)?;
    let geometry = geometry.map_coords(|c| {
        let (x, y) = projection::from_lon_lat(c.x, c.y);
        geo_types::Coord { x, y }
    });
    let area = Area::from_geometry(geometry).ok_or(FeatureIndexError::InvalidFeature)?;

    let mut properties = PropertyMap::new();
    for (k, v) in feature.properties.unwrap_or_default() {
        match v {
            serde_json::Value::String(v_str) => {
                properties.insert(k, v_str);
            }
            serde_json::Value::Null => {}
            other => {
                properties.insert(k, other.to_string());
            }
        }
    }

    Ok(MapFeature::new(id, area, properties))
}
