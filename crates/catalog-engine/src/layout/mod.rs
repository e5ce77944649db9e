//! Layout calculation modules for the catalog
//!
//! This module handles the geometric calculations for content pages:
//! - Grid geometry (cell dimensions and origins)
//! - Card placement (image area, aspect-preserving image fit)

mod grid;
mod placement;
mod types;

pub use grid::*;
pub use placement::*;
pub use types::*;
