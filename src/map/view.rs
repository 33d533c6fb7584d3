use super::error::MapError;
use super::extent::Extent;
use super::projection::{self, HALF_WORLD};

/// Tile size the zoom levels are defined against, in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Deepest zoom the view will fit to.
pub const MAX_ZOOM: f64 = 28.0;

/// Padding in pixels, `[top, right, bottom, left]`.
pub type Padding = [f64; 4];

/// Map units per pixel at a zoom level.
#[inline]
pub fn resolution_for_zoom(zoom: f64) -> f64 {
    2.0 * HALF_WORLD / TILE_SIZE / 2f64.powf(zoom)
}

#[inline]
pub fn zoom_for_resolution(resolution: f64) -> f64 {
    (2.0 * HALF_WORLD / TILE_SIZE / resolution).log2()
}

/// The visible region of the map.
///
/// `center` is in EPSG:3857 meters and `resolution` is meters per pixel.
/// Pixel `(0, 0)` is the top-left corner of the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    center: (f64, f64),
    resolution: f64,
    width: u32,
    height: u32,
}

impl View {
    pub fn new(center: (f64, f64), resolution: f64, width: u32, height: u32) -> Result<View, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::InvalidView {
                reason: format!("dimensions must be > 0, got {}x{}", width, height),
            });
        }
        if resolution <= 0.0 || !resolution.is_finite() {
            return Err(MapError::InvalidView {
                reason: format!("resolution must be positive and finite, got {}", resolution),
            });
        }
        Ok(View {
            center,
            resolution,
            width,
            height,
        })
    }

    /// View centered on a longitude/latitude at a zoom level.
    pub fn from_lon_lat(lon: f64, lat: f64, zoom: f64, width: u32, height: u32) -> Result<View, MapError> {
        View::new(
            projection::from_lon_lat(lon, lat),
            resolution_for_zoom(zoom),
            width,
            height,
        )
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn set_center(&mut self, center: (f64, f64)) {
        self.center = center;
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn zoom(&self) -> f64 {
        zoom_for_resolution(self.resolution)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Map coordinate under a pixel.
    #[inline]
    pub fn pixel_to_coordinate(&self, px: f64, py: f64) -> (f64, f64) {
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        (
            self.center.0 + (px - half_w) * self.resolution,
            self.center.1 - (py - half_h) * self.resolution,
        )
    }

    /// Pixel a map coordinate is drawn at. May lie outside the surface.
    #[inline]
    pub fn coordinate_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        (
            (x - self.center.0) / self.resolution + half_w,
            half_h - (y - self.center.1) / self.resolution,
        )
    }

    /// Region of the map currently visible.
    pub fn visible_extent(&self) -> Extent {
        let half_w = self.width as f64 / 2.0 * self.resolution;
        let half_h = self.height as f64 / 2.0 * self.resolution;
        Extent::new(
            self.center.0 - half_w,
            self.center.1 - half_h,
            self.center.0 + half_w,
            self.center.1 + half_h,
        )
    }

    /// Centers and zooms the view so `extent` fills the surface minus
    /// `padding`. Resolution is not snapped to whole zoom levels.
    pub fn fit(&mut self, extent: &Extent, padding: Padding) -> Result<(), MapError> {
        let [top, right, bottom, left] = padding;
        let avail_w = self.width as f64 - left - right;
        let avail_h = self.height as f64 - top - bottom;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return Err(MapError::InvalidView {
                reason: format!(
                    "padding {:?} leaves no room in a {}x{} view",
                    padding, self.width, self.height
                ),
            });
        }

        let resolution = (extent.width() / avail_w)
            .max(extent.height() / avail_h)
            .max(resolution_for_zoom(MAX_ZOOM));

        let (cx, cy) = extent.center();
        self.center = (
            cx + (right - left) / 2.0 * resolution,
            cy + (top - bottom) / 2.0 * resolution,
        );
        self.resolution = resolution;
        Ok(())
    }
}
