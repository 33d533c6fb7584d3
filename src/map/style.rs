//! Per-feature style resolution for the parcel layers.

use std::fmt;

use super::feature::{MapFeature, ATTR_FIRE_HAZARD};
use super::highlight::HighlightState;
use crate::model::FIRE_HAZARD_YES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub font: Option<&'static str>,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub label: Option<Label>,
}

/// Which of the fixed styles applies to a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Highlight,
    Fire,
    Parcel,
    Selected,
}

const HIGHLIGHT_FILL: Color = Color::rgba(200, 200, 20, 51);
const HIGHLIGHT_STROKE: Color = Color::rgba(255, 255, 20, 255);
// Parcels need a non-transparent fill to be hit-detectable.
const PARCEL_FILL: Color = Color::rgba(0x80, 0xff, 0x80, 0x01);
const PARCEL_STROKE: Color = Color::rgba(0x00, 0x70, 0x00, 0xff);
const FIRE_FILL: Color = Color::rgba(0xff, 0x00, 0x00, 0x20);
const FIRE_STROKE: Color = Color::rgba(0xff, 0x00, 0x00, 0xff);
const SELECTED_FILL: Color = Color::rgba(0x85, 0x32, 0xa8, 0x30);
const SELECTED_STROKE: Color = Color::rgba(0x85, 0x32, 0xa8, 0xff);
const BLACK: Color = Color::rgba(0, 0, 0, 0xff);

/// Style kind for a feature of the parcel data layer.
///
/// The highlight wins over the fire-hazard flag.
pub fn resolve_kind(feature: &MapFeature, highlight: &HighlightState) -> StyleKind {
    if highlight.is_highlighted(feature.id()) {
        StyleKind::Highlight
    } else if feature.get(ATTR_FIRE_HAZARD) == Some(FIRE_HAZARD_YES) {
        StyleKind::Fire
    } else {
        StyleKind::Parcel
    }
}

pub fn resolve(feature: &MapFeature, highlight: &HighlightState) -> Style {
    style_for(resolve_kind(feature, highlight), feature.id())
}

/// Builds the style of a kind; data-layer styles are labelled with the
/// feature id.
pub fn style_for(kind: StyleKind, feature_id: Option<&str>) -> Style {
    let label = |font, fill| {
        Some(Label {
            text: feature_id.unwrap_or_default().to_owned(),
            font,
            fill,
        })
    };

    match kind {
        StyleKind::Highlight => Style {
            fill: HIGHLIGHT_FILL,
            stroke: HIGHLIGHT_STROKE,
            stroke_width: 3.0,
            label: label(Some("14px sans-serif"), BLACK),
        },
        StyleKind::Fire => Style {
            fill: FIRE_FILL,
            stroke: FIRE_STROKE,
            stroke_width: 2.0,
            label: label(None, BLACK),
        },
        StyleKind::Parcel => Style {
            fill: PARCEL_FILL,
            stroke: PARCEL_STROKE,
            stroke_width: 1.0,
            label: label(None, PARCEL_STROKE),
        },
        StyleKind::Selected => Style {
            fill: SELECTED_FILL,
            stroke: SELECTED_STROKE,
            stroke_width: 3.0,
            label: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::feature::{Area, PropertyMap};
    use geo_types::Point;

    fn feature(id: &str, fire_hazard: Option<&str>) -> MapFeature {
        let mut props = PropertyMap::new();
        if let Some(value) = fire_hazard {
            props.insert(ATTR_FIRE_HAZARD.to_owned(), value.to_owned());
        }
        MapFeature::new(Some(id.to_owned()), Area::Point(Point::new(0.0, 0.0)), props)
    }

    #[test]
    fn it_should_style_plain_parcels() {
        let highlight = HighlightState::default();
        assert_eq!(resolve_kind(&feature("1", None), &highlight), StyleKind::Parcel);
        assert_eq!(resolve_kind(&feature("1", Some("No")), &highlight), StyleKind::Parcel);
        // Only the exact string counts.
        assert_eq!(resolve_kind(&feature("1", Some("yes")), &highlight), StyleKind::Parcel);
    }

    #[test]
    fn it_should_style_fire_hazards() {
        let highlight = HighlightState::default();
        let style = resolve(&feature("7", Some("Yes")), &highlight);
        assert_eq!(style.stroke, FIRE_STROKE);
        assert_eq!(style.stroke_width, 2.0);
        assert_eq!(style.label.unwrap().text, "7");
    }

    #[test]
    fn it_should_prefer_highlight_over_fire() {
        let mut highlight = HighlightState::default();
        highlight.set(Some("7"));
        assert_eq!(resolve_kind(&feature("7", Some("Yes")), &highlight), StyleKind::Highlight);
        assert_eq!(resolve_kind(&feature("8", Some("Yes")), &highlight), StyleKind::Fire);
    }

    #[test]
    fn it_should_print_css_hex() {
        assert_eq!(PARCEL_FILL.to_string(), "#80ff8001");
        assert_eq!(SELECTED_FILL.to_string(), "#8532a830");
    }
}
