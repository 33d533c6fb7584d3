//! XYZ vector-tile sources the map surface draws from.

use super::extent::Extent;
use super::projection::HALF_WORLD;
use super::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileSource {
    url_template: String,
    min_zoom: u32,
    max_zoom: u32,
}

impl TileSource {
    pub fn new(url_template: &str, min_zoom: u32, max_zoom: u32) -> TileSource {
        TileSource {
            url_template: url_template.to_owned(),
            min_zoom,
            max_zoom,
        }
    }

    /// OpenMapTiles base map served under `{base}/data/v3`.
    pub fn base_map(base_url: &str) -> TileSource {
        TileSource::new(&format!("{}/data/v3/{{z}}/{{x}}/{{y}}.pbf", base_url), 0, 14)
    }

    /// Parcel polygons, published at a single zoom level.
    pub fn parcels(data_url: &str) -> TileSource {
        TileSource::new(&format!("{}/maps/parcels/{{z}}/{{x}}/{{y}}.pbf", data_url), 16, 16)
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn tile_url(&self, tile: TileCoord) -> String {
        self.url_template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    /// Tile zoom used for a view zoom. Views deeper than `max_zoom` reuse
    /// the deepest tiles; views shallower than `min_zoom` load nothing.
    pub fn tile_zoom(&self, view_zoom: f64) -> Option<u32> {
        let z = view_zoom.round();
        if z < self.min_zoom as f64 {
            None
        } else {
            Some((z as u32).min(self.max_zoom))
        }
    }

    /// Tiles covering the visible extent of the view.
    pub fn tiles_for_view(&self, view: &View) -> Vec<TileCoord> {
        match self.tile_zoom(view.zoom()) {
            Some(z) => tiles_for_extent(&view.visible_extent(), z),
            None => Vec::new(),
        }
    }
}

/// Tile column/row containing an EPSG:3857 coordinate, clamped to the grid.
pub fn tile_for_coordinate(x: f64, y: f64, z: u32) -> (u32, u32) {
    let n = 2f64.powi(z as i32);
    let max = (n as u32).saturating_sub(1);
    let col = ((x + HALF_WORLD) / (2.0 * HALF_WORLD) * n).floor();
    let row = ((HALF_WORLD - y) / (2.0 * HALF_WORLD) * n).floor();
    (clamp_index(col, max), clamp_index(row, max))
}

fn clamp_index(value: f64, max: u32) -> u32 {
    if value <= 0.0 {
        0
    } else if value >= max as f64 {
        max
    } else {
        value as u32
    }
}

pub fn tiles_for_extent(extent: &Extent, z: u32) -> Vec<TileCoord> {
    let (min_col, min_row) = tile_for_coordinate(extent.min_x, extent.max_y, z);
    let (max_col, max_row) = tile_for_coordinate(extent.max_x, extent.min_y, z);

    let mut tiles = Vec::new();
    for x in min_col..=max_col {
        for y in min_row..=max_row {
            tiles.push(TileCoord { z, x, y });
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection;

    #[test]
    fn it_should_fill_url_templates() {
        let source = TileSource::parcels("http://tiles.example");
        assert_eq!(
            source.tile_url(TileCoord { z: 16, x: 10541, y: 25436 }),
            "http://tiles.example/maps/parcels/16/10541/25436.pbf"
        );
        assert_eq!(
            TileSource::base_map("http://base.example").url_template(),
            "http://base.example/data/v3/{z}/{x}/{y}.pbf"
        );
    }

    #[test]
    fn it_should_locate_tiles() {
        assert_eq!(tile_for_coordinate(0.0, 0.0, 1), (1, 1));
        assert_eq!(tile_for_coordinate(-HALF_WORLD, HALF_WORLD, 1), (0, 0));
        assert_eq!(tile_for_coordinate(HALF_WORLD, -HALF_WORLD, 1), (1, 1));

        // Santa Cruz at zoom 16.
        let (x, y) = projection::from_lon_lat(-122.0283, 37.0405);
        assert_eq!(tile_for_coordinate(x, y, 16), (10553, 25499));
    }

    #[test]
    fn it_should_clamp_zoom_to_the_source() {
        let parcels = TileSource::parcels("http://tiles.example");
        assert_eq!(parcels.tile_zoom(14.2), None);
        assert_eq!(parcels.tile_zoom(16.0), Some(16));
        assert_eq!(parcels.tile_zoom(18.0), Some(16));

        let base = TileSource::base_map("http://base.example");
        assert_eq!(base.tile_zoom(16.0), Some(14));
        assert_eq!(base.tile_zoom(3.4), Some(3));
    }

    #[test]
    fn it_should_cover_the_view() {
        let view = View::from_lon_lat(-122.0283, 37.0405, 16.0, 512, 512).unwrap();
        let tiles = TileSource::parcels("http://tiles.example").tiles_for_view(&view);
        // A 512 px view spans two tiles per axis, three when unaligned.
        assert!(tiles.len() >= 4 && tiles.len() <= 9);
        assert!(tiles.iter().all(|t| t.z == 16));
        assert!(tiles.contains(&TileCoord { z: 16, x: 10553, y: 25499 }));
    }
}
