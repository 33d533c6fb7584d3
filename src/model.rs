use serde::{Deserialize, Serialize};

/// Attribute value the parcel layer uses for "is a fire hazard".
pub const FIRE_HAZARD_YES: &str = "Yes";
pub const FIRE_HAZARD_NO: &str = "No";

/// Parcel as returned by the address search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    pub id: String,
    pub apn: String,
    pub address: String,
    pub is_fire_hazard: bool,
}

/// Parcel descriptor built from the attributes of a clicked map feature.
///
/// Attributes are read as-is: a feature without an `apn` yields `apn: None`
/// and nothing is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelFromMap {
    pub id: String,
    pub apn: Option<String>,
    pub address: Option<String>,
    pub is_fire_hazard: bool,
}

/// Result of `GET /geocode/{address}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lon: f64,
    pub parcelid: ParcelId,
}

/// One record of `GET /notify/parcel-and-distance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurroundingParcel {
    pub acres: Option<f64>,
    pub address: Option<String>,
    /// Parcel outline as WKT in EPSG:4326.
    pub geom: String,
    pub parcelid: ParcelId,
}

/// Result of `GET`/`PUT /parcel/firehazard/{parcelId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireHazardStatus {
    pub firehazard: String,
    pub parcelid: ParcelId,
}

impl FireHazardStatus {
    pub fn is_fire_hazard(&self) -> bool {
        self.firehazard == FIRE_HAZARD_YES
    }
}

/// Parcel identifiers come back from the backend either as numbers or as
/// strings. Both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawParcelId", into = "String")]
pub struct ParcelId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawParcelId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawParcelId> for ParcelId {
    fn from(raw: RawParcelId) -> ParcelId {
        match raw {
            RawParcelId::Text(s) => ParcelId(s),
            RawParcelId::Number(n) => ParcelId(n.to_string()),
        }
    }
}

impl From<ParcelId> for String {
    fn from(id: ParcelId) -> String {
        id.0
    }
}

impl From<&str> for ParcelId {
    fn from(id: &str) -> ParcelId {
        ParcelId(id.to_owned())
    }
}

impl From<String> for ParcelId {
    fn from(id: String) -> ParcelId {
        ParcelId(id)
    }
}

impl ParcelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParcelId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
