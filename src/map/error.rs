use failure::Fail;

use super::feature_index::FeatureIndexError;
use super::wkt::WktError;

/// Errors raised by the map wrapper.
#[derive(Debug, Fail)]
pub enum MapError {
    #[fail(display = "Invalid view: {}", reason)]
    InvalidView { reason: String },
    #[fail(display = "Invalid parcel geometry for {}: {}", parcel_id, cause)]
    InvalidParcelGeometry { parcel_id: String, cause: WktError },
    #[fail(display = "Cannot load layer: {}", _0)]
    Layer(FeatureIndexError),
}

impl From<FeatureIndexError> for MapError {
    fn from(err: FeatureIndexError) -> MapError {
        MapError::Layer(err)
    }
}
