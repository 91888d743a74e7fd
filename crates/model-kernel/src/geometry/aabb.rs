use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box, possibly flat along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Box spanning `origin` to `origin + size`; negative size components are normalized.
    pub fn from_origin_size(origin: Point3<f64>, size: Vector3<f64>) -> Self {
        let far = origin + size;
        Self {
            min: origin.inf(&far),
            max: origin.sup(&far),
        }
    }

    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Product of the extents that exceed `tol`: area for a sheet, volume for a solid.
    pub fn measure(&self, tol: f64) -> f64 {
        self.extent()
            .iter()
            .filter(|&&e| e > tol)
            .product()
    }

    pub fn contains_point(&self, p: &Point3<f64>, tol: f64) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] - tol && p[i] <= self.max[i] + tol)
    }

    /// Smallest box enclosing both.
    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Whether the two boxes share material of positive measure.
    ///
    /// On an axis where either box is flat, touching counts; on every other
    /// axis the overlap must be longer than `tol`.
    pub fn overlaps(&self, other: &Aabb, tol: f64) -> bool {
        (0..3).all(|i| {
            let lo = self.min[i].max(other.min[i]);
            let hi = self.max[i].min(other.max[i]);
            let flat = self.max[i] - self.min[i] <= tol || other.max[i] - other.min[i] <= tol;
            if flat {
                hi >= lo - tol
            } else {
                hi - lo > tol
            }
        })
    }

    /// Closed intersection, if the boxes meet at all.
    pub fn intersection(&self, other: &Aabb, tol: f64) -> Option<Aabb> {
        let min = self.min.sup(&other.min);
        let max = self.max.inf(&other.max);
        if (0..3).all(|i| max[i] >= min[i] - tol) {
            Some(Aabb::new(min, max.sup(&min)))
        } else {
            None
        }
    }

    /// `self` minus `other`, as disjoint boxes covering the remainder.
    ///
    /// Slabs are peeled off axis by axis: x first, then y within the
    /// intersection's x range, then z. Axes on which `self` is flat are
    /// never split.
    pub fn subtract(&self, other: &Aabb, tol: f64) -> Vec<Aabb> {
        if !self.overlaps(other, tol) {
            return vec![*self];
        }
        let Some(cut) = self.intersection(other, tol) else {
            return vec![*self];
        };

        let mut pieces = Vec::new();
        let mut rest = *self;
        for axis in 0..3 {
            if rest.max[axis] - rest.min[axis] <= tol {
                continue;
            }
            if cut.min[axis] - rest.min[axis] > tol {
                let mut below = rest;
                below.max[axis] = cut.min[axis];
                pieces.push(below);
            }
            if rest.max[axis] - cut.max[axis] > tol {
                let mut above = rest;
                above.min[axis] = cut.max[axis];
                pieces.push(above);
            }
            rest.min[axis] = rest.min[axis].max(cut.min[axis]);
            rest.max[axis] = rest.max[axis].min(cut.max[axis]);
        }
        pieces
    }
}
