//! Satellite catalog, visibility and ground tracks.
//!
//! The [`catalog::CatalogManager`] keeps per-category element sets fresh,
//! [`visibility::find_visible`] answers "what is above me right now", and
//! [`track::sample`] produces ground tracks. [`web`] serves all three over HTTP.

pub mod cancel;
pub mod catalog;
pub mod error;
pub mod geo;
pub mod orbit;
pub mod track;
pub mod visibility;
pub mod web;

#[cfg(test)]
mod fixtures;
