//! Read entities definitions.

pub mod address;
pub mod heatmap;
pub mod location;
pub mod property;
