//! View state stores.
//!
//! Every request is split into a `begin_*` step and a `handle_*` step. The
//! convenience methods run both back to back; callers that interleave
//! requests get last-write-wins, since each `handle_*` overwrites whatever
//! is there.

mod address_search;
mod distance_search;
mod fire_hazard;

pub use self::address_search::AddressSearchStore;
pub use self::distance_search::DistanceSearchStore;
pub use self::fire_hazard::FireHazardStore;
