mod error;
pub mod extent;
pub mod feature;
pub mod feature_index;
pub mod highlight;
pub mod layer;
pub mod parcel_map;
pub mod popup;
pub mod projection;
pub mod style;
pub mod tiles;
pub mod view;
pub mod wkt;

pub use error::MapError;
pub use extent::Extent;
pub use feature::{Area, MapFeature, PropertyMap};
pub use feature_index::{FeatureIndex, FeatureIndexError};
pub use highlight::HighlightState;
pub use parcel_map::{ClickOutcome, ParcelClickHandler, ParcelMap};
pub use popup::Popup;
pub use view::View;
