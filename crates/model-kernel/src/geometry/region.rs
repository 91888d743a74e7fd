use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// Geometry of a shape: disjoint axis-aligned cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    cells: Vec<Aabb>,
    /// Axis a sheet region is flat along; `None` for solids.
    flat_axis: Option<usize>,
}

impl Region {
    pub fn solid(cell: Aabb) -> Self {
        Self {
            cells: vec![cell],
            flat_axis: None,
        }
    }

    pub fn sheet(cell: Aabb, flat_axis: usize) -> Self {
        Self {
            cells: vec![cell],
            flat_axis: Some(flat_axis),
        }
    }

    pub fn cells(&self) -> &[Aabb] {
        &self.cells
    }

    pub fn flat_axis(&self) -> Option<usize> {
        self.flat_axis
    }

    pub fn is_sheet(&self) -> bool {
        self.flat_axis.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Coordinate of a sheet along its flat axis.
    pub fn plane_offset(&self) -> Option<f64> {
        let axis = self.flat_axis?;
        self.cells.first().map(|c| c.min[axis])
    }

    /// Whether a boolean between `self` and `other` is well defined:
    /// both solids, or both sheets on the same plane.
    pub fn compatible_with(&self, other: &Region, tol: f64) -> bool {
        match (self.flat_axis, other.flat_axis) {
            (None, None) => true,
            (Some(a), Some(b)) if a == b => match (self.plane_offset(), other.plane_offset()) {
                (Some(x), Some(y)) => (x - y).abs() <= tol,
                _ => true,
            },
            _ => false,
        }
    }

    /// Area for sheets, volume for solids.
    pub fn measure(&self, tol: f64) -> f64 {
        self.cells.iter().map(|c| c.measure(tol)).sum()
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut iter = self.cells.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, c| acc.merge(c)))
    }

    pub fn contains_point(&self, p: &Point3<f64>, tol: f64) -> bool {
        self.cells.iter().any(|c| c.contains_point(p, tol))
    }

    /// Whether any cell of `self` shares positive measure with any cell of `other`.
    pub fn overlaps(&self, other: &Region, tol: f64) -> bool {
        self.cells
            .iter()
            .any(|a| other.cells.iter().any(|b| a.overlaps(b, tol)))
    }

    /// Remove `other` from `self`.
    pub fn subtract(&mut self, other: &Region, tol: f64) {
        for cut in &other.cells {
            self.cells = self
                .cells
                .iter()
                .flat_map(|c| c.subtract(cut, tol))
                .collect();
        }
    }

    /// Merge `other` into `self`, keeping cells disjoint.
    pub fn unite(&mut self, other: &Region, tol: f64) {
        for cell in &other.cells {
            let mut fresh = vec![*cell];
            for existing in &self.cells {
                fresh = fresh
                    .iter()
                    .flat_map(|f| f.subtract(existing, tol))
                    .collect();
            }
            self.cells.extend(fresh);
        }
    }

    /// Number of connected pieces.
    ///
    /// Two cells of a sheet are joined when they share an edge segment of
    /// positive length; two cells of a solid when they share a face patch of
    /// positive area. Corner-only contact does not join.
    pub fn connected_components(&self, tol: f64) -> usize {
        let n = self.cells.len();
        let mut parent: Vec<usize> = (0..n).collect();

        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for i in 0..n {
            for j in (i + 1)..n {
                if self.cells_adjacent(&self.cells[i], &self.cells[j], tol) {
                    let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                    if ri != rj {
                        parent[ri] = rj;
                    }
                }
            }
        }

        (0..n).filter(|&i| find(&mut parent, i) == i).count()
    }

    fn cells_adjacent(&self, a: &Aabb, b: &Aabb, tol: f64) -> bool {
        let mut active = 0;
        let mut shared = 0;
        for axis in 0..3 {
            if Some(axis) == self.flat_axis {
                if (a.min[axis] - b.min[axis]).abs() > tol {
                    return false;
                }
                continue;
            }
            active += 1;
            let lo = a.min[axis].max(b.min[axis]);
            let hi = a.max[axis].min(b.max[axis]);
            if hi < lo - tol {
                return false;
            }
            if hi - lo > tol {
                shared += 1;
            }
        }
        shared + 1 >= active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-9;

    fn sheet(x0: f64, y0: f64, x1: f64, y1: f64) -> Region {
        Region::sheet(
            Aabb::new(Point3::new(x0, y0, 0.254), Point3::new(x1, y1, 0.254)),
            2,
        )
    }

    #[test]
    fn notch_then_feed_is_one_piece() {
        let mut patch = sheet(-1.74, 1.385, 1.74, 5.615);
        patch.subtract(&sheet(-1.74, 2.91, -0.69, 4.09), TOL);
        patch.unite(&sheet(-1.74, 3.11, -0.69, 3.89), TOL);

        assert_eq!(patch.connected_components(TOL), 1);
        assert!(patch.contains_point(&Point3::new(-1.5, 3.5, 0.254), TOL));
        // The two gaps beside the feed stay open.
        assert!(!patch.contains_point(&Point3::new(-1.5, 3.0, 0.254), TOL));
        assert!(!patch.contains_point(&Point3::new(-1.5, 4.0, 0.254), TOL));
    }

    #[test]
    fn feed_then_notch_loses_the_feed() {
        let mut patch = sheet(-1.74, 1.385, 1.74, 5.615);
        patch.unite(&sheet(-1.74, 3.11, -0.69, 3.89), TOL);
        patch.subtract(&sheet(-1.74, 2.91, -0.69, 4.09), TOL);

        assert!(!patch.contains_point(&Point3::new(-1.5, 3.5, 0.254), TOL));
    }

    #[test]
    fn unite_keeps_cells_disjoint() {
        let mut a = sheet(0.0, 0.0, 2.0, 2.0);
        a.unite(&sheet(1.0, 1.0, 3.0, 3.0), TOL);
        assert_relative_eq!(a.measure(TOL), 7.0, epsilon = 1e-12);
        assert_eq!(a.connected_components(TOL), 1);
    }

    #[test]
    fn separated_pieces_count_separately() {
        let mut a = sheet(0.0, 0.0, 1.0, 1.0);
        a.unite(&sheet(2.0, 0.0, 3.0, 1.0), TOL);
        assert_eq!(a.connected_components(TOL), 2);
    }

    #[test]
    fn corner_contact_does_not_connect() {
        let mut a = sheet(0.0, 0.0, 1.0, 1.0);
        a.unite(&sheet(1.0, 1.0, 2.0, 2.0), TOL);
        assert_eq!(a.connected_components(TOL), 2);
    }

    #[test]
    fn sheets_on_different_planes_are_incompatible() {
        let xy = sheet(0.0, 0.0, 1.0, 1.0);
        let lower = Region::sheet(
            Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0)),
            2,
        );
        let yz = Region::sheet(
            Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0)),
            0,
        );
        assert!(!xy.compatible_with(&lower, TOL));
        assert!(!xy.compatible_with(&yz, TOL));
        assert!(xy.compatible_with(&xy.clone(), TOL));
    }

    #[test]
    fn ground_with_two_slots() {
        let mut ground = Region::sheet(
            Aabb::new(Point3::new(-6.0, -7.0, 0.0), Point3::new(6.0, 7.0, 0.0)),
            2,
        );
        for cy in [3.5, -3.5] {
            let slot = Region::sheet(
                Aabb::new(
                    Point3::new(-2.0, cy - 0.25, 0.0),
                    Point3::new(2.0, cy + 0.25, 0.0),
                ),
                2,
            );
            ground.subtract(&slot, TOL);
        }
        assert_relative_eq!(ground.measure(TOL), 168.0 - 4.0, epsilon = 1e-9);
        assert_eq!(ground.connected_components(TOL), 1);
        assert!(!ground.contains_point(&Point3::new(0.0, 3.5, 0.0), TOL));
    }
}
