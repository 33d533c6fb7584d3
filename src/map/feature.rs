use std::collections::HashMap;

use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::contains::Contains;
use geo_types::{Geometry, MultiPolygon, Point, Polygon};

use super::extent::Extent;

/// Feature attributes, kept as text the way the tile layer delivers them.
pub type PropertyMap = HashMap<String, String>;

/// Attribute naming the vector-tile layer a feature came from.
pub const ATTR_LAYER: &str = "layer";
pub const ATTR_APN: &str = "apn";
pub const ATTR_FIRE_HAZARD: &str = "firehazard";
pub const ATTR_ADDRESS: &str = "address";

/// Geometries a feature can be hit-tested against.
#[derive(Debug, Clone, PartialEq)]
pub enum Area {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
    Point(Point<f64>),
}

impl Area {
    /// `None` for geometry kinds the map does not draw.
    pub fn from_geometry(geometry: Geometry<f64>) -> Option<Area> {
        match geometry {
            Geometry::Polygon(p) => Some(Area::Polygon(p)),
            Geometry::MultiPolygon(p) => Some(Area::MultiPolygon(p)),
            Geometry::Point(p) => Some(Area::Point(p)),
            _ => None,
        }
    }

    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            Area::Polygon(p) => Geometry::Polygon(p.clone()),
            Area::MultiPolygon(p) => Geometry::MultiPolygon(p.clone()),
            Area::Point(p) => Geometry::Point(*p),
        }
    }

    /// Exact bounding box.
    #[inline]
    pub fn extent(&self) -> Option<Extent> {
        let rect = match self {
            Area::Polygon(p) => p.bounding_rect(),
            Area::MultiPolygon(p) => p.bounding_rect(),
            Area::Point(p) => Some(p.bounding_rect()),
        }?;
        Some(Extent::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Exact containment test; much slower than the bbox check.
    #[inline]
    pub fn contains_exact(&self, point: &Point<f64>) -> bool {
        match self {
            Area::Polygon(p) => p.contains(point),
            Area::MultiPolygon(p) => p.contains(point),
            Area::Point(p) => p.x() == point.x() && p.y() == point.y(),
        }
    }
}

/// A feature of a vector layer, in map coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    id: Option<String>,
    area: Area,
    properties: PropertyMap,
}

impl MapFeature {
    pub fn new(id: Option<String>, area: Area, properties: PropertyMap) -> MapFeature {
        MapFeature {
            id,
            area,
            properties,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().map(String::as_str)
    }

    pub fn area(&self) -> &Area {
        &self.area
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.properties.get(attribute).map(String::as_str)
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn layer(&self) -> Option<&str> {
        self.get(ATTR_LAYER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, polygon};

    fn square() -> Polygon<f64> {
        polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0), (x: 0.0, y: 0.0)]
    }

    #[test]
    fn it_should_test_containment_exactly() {
        let area = Area::Polygon(square());
        assert!(area.contains_exact(&Point::new(5.0, 5.0)));
        assert!(!area.contains_exact(&Point::new(15.0, 5.0)));

        let point = Area::Point(Point::new(1.0, 2.0));
        assert!(point.contains_exact(&Point::new(1.0, 2.0)));
        assert!(!point.contains_exact(&Point::new(1.0, 2.5)));
    }

    #[test]
    fn it_should_skip_holes() {
        let hole = line_string![(x: 2.0, y: 2.0), (x: 4.0, y: 2.0), (x: 4.0, y: 4.0), (x: 2.0, y: 4.0), (x: 2.0, y: 2.0)];
        let donut = Polygon::new(square().exterior().clone(), vec![hole]);
        let area = Area::Polygon(donut);
        assert!(!area.contains_exact(&Point::new(3.0, 3.0)));
        assert!(area.contains_exact(&Point::new(7.0, 7.0)));
    }

    #[test]
    fn it_should_compute_extent() {
        let area = Area::MultiPolygon(MultiPolygon(vec![square()]));
        assert_eq!(area.extent(), Some(Extent::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn it_should_reject_line_geometries() {
        let line: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into();
        assert_eq!(Area::from_geometry(line), None);
    }
}
