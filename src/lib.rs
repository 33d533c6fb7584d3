//! Parcel viewer and annotator: search parcels, select them on a map, and
//! flag fire hazards.

pub mod api;
pub mod cli_utils;
pub mod config;
pub mod export;
pub mod map;
pub mod model;
pub mod stores;
pub mod views;
