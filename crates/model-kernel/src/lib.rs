//! Model-state arena and geometry operations for the patch-array builder.
//!
//! Shapes live in a [`ModelState`] keyed by name. Primitives create them,
//! booleans fold secondaries into a primary (consuming the secondaries), and
//! boundary assignment binds electromagnetic semantics to finished shapes.
//! Every successful operation is appended to the model's history so the
//! whole build can be replayed into a simulation engine.

pub mod boolean;
pub mod boundary;
pub mod error;
pub mod geometry;
pub mod history;
pub mod primitives;
pub mod store;

pub use boolean::{subtract, unite};
pub use boundary::{assign_conductor, assign_port, assign_radiation};
pub use error::ModelError;
pub use geometry::{Aabb, Region};
pub use history::ModelOp;
pub use primitives::{create_box, create_rect};
pub use store::*;

/// Tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Coordinates closer than this are considered coincident (model units).
    pub coincidence: f64,
    /// Slack allowed when testing whether a point lies on a sheet.
    pub containment: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            containment: 1e-9,
        }
    }
}

impl Tolerance {
    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() <= self.coincidence
    }
}
