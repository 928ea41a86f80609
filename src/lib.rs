//! Multi-resolution marker generation for a zoomable scatterplot.
//!
//! Takes a flat table of scored items and, per configured axis pair,
//! produces zoom levels of circular markers: level 0 holds one marker per
//! item; each coarser level merges spatially-close markers into larger
//! ones that still reference every item they subsume. Positions are
//! relaxed with a damped anchor-seeking force plus overlap separation so
//! markers never overlap while drifting as little as possible from their
//! data-derived spot.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod sim;

pub use error::{Error, Result};
