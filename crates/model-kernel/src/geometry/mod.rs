//! Axis-aligned region algebra.
//!
//! Every shape's geometry is a [`Region`]: a set of pairwise-disjoint
//! axis-aligned cells. Sheets are regions whose cells all have zero extent
//! along one shared axis at one shared coordinate.

pub mod aabb;
pub mod region;

pub use aabb::Aabb;
pub use region::Region;
