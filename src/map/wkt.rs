//! Reader for the Well-Known Text the parcel backend emits. Only `POINT`,
//! `POLYGON` and `MULTIPOLYGON` make it onto the map.

use ::wkt::TryFromWkt;
use failure::Fail;
use geo::algorithm::map_coords::MapCoords;
use geo_types::{Coord, Geometry};

use super::projection;

#[derive(Debug, Fail, PartialEq)]
pub enum WktError {
    #[fail(display = "Invalid WKT: {}", _0)]
    Parse(String),
    #[fail(display = "Unsupported geometry type: {}", _0)]
    UnsupportedType(String),
}

fn type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) => "LINE",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
    }
}

/// Parses a WKT string into a geometry, keeping the coordinates as written.
pub fn read_geometry(text: &str) -> Result<Geometry<f64>, WktError> {
    let geometry =
        Geometry::<f64>::try_from_wkt_str(text).map_err(|e| WktError::Parse(e.to_string()))?;

    match geometry {
        Geometry::Point(_) | Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Ok(geometry),
        other => Err(WktError::UnsupportedType(type_name(&other).to_owned())),
    }
}

/// Parses a WKT string in EPSG:4326 and reprojects it into the map's
/// EPSG:3857 coordinates.
pub fn read_feature_geometry(text: &str) -> Result<Geometry<f64>, WktError> {
    let geometry = read_geometry(text)?;
    Ok(geometry.map_coords(|c| {
        let (x, y) = projection::from_lon_lat(c.x, c.y);
        Coord { x, y }
    }))
}
