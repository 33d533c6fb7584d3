//! Conversions between geographic coordinates (EPSG:4326) and spherical web
//! mercator (EPSG:3857), the projection the map is drawn in.

use std::f64::consts::PI;

/// Sphere radius used by EPSG:3857, in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the projected world, in meters.
pub const HALF_WORLD: f64 = PI * EARTH_RADIUS;

/// Latitude past which mercator y diverges; inputs are clamped to it.
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Longitude/latitude in degrees to EPSG:3857 meters.
#[inline]
pub fn from_lon_lat(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.max(-MAX_LATITUDE).min(MAX_LATITUDE);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// EPSG:3857 meters to longitude/latitude in degrees.
#[inline]
pub fn to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * ((y / EARTH_RADIUS).exp().atan() - PI / 4.0)).to_degrees();
    (lon, lat)
}
