pub mod boundary;
pub mod geometry;
pub mod material;
pub mod solve;

pub use boundary::*;
pub use geometry::*;
pub use material::*;
pub use solve::*;

pub use nalgebra::{Point3, Vector3};
