//! Layout calculation modules
//!
//! This module handles all the geometric decisions for an album:
//! - Dimension resolution (pixels and resolution to centimeters)
//! - Scaling into a bounding box
//! - Page capacity checks and grouping
//! - Composition of each page into placement instructions

mod capacity;
mod compose;
mod group;
mod resolve;
mod scale;
mod types;

pub use capacity::*;
pub use compose::*;
pub use group::*;
pub use resolve::*;
pub use scale::*;
pub use types::*;
