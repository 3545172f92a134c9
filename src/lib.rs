//! Search-and-filter core for a catalog of weather-radar stations.
//!
//! The catalog is a static JSON file produced offline; this crate loads it
//! once, builds a prefix token index over each record's tag string, and
//! answers debounced text queries combined with band / status / country
//! facet filters. Filtered results project into lightweight map points for
//! the presentation layer.

pub mod constants;
pub mod error;
pub mod filter;
pub mod index;
pub mod normalize;
pub mod record;
pub mod search;
pub mod state;
pub mod url;
pub mod view;
