//! Surface module - helical tube geometry
//!
//! - Parametric sampling into a u/v grid
//! - Tessellation of the grid into a static triangle list

mod grid;
mod tessellate;

pub use grid::*;
pub use tessellate::*;
