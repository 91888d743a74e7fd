use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Electromagnetic boundary condition attached to a finished shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoundaryKind {
    /// Perfect electric conductor on a sheet.
    PerfectConductor,
    /// Absorbing boundary on the outer faces of the enclosing air volume.
    Radiation,
    /// Lumped-port excitation on a sheet.
    LumpedPort,
}

impl std::fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BoundaryKind::PerfectConductor => "perfect conductor",
            BoundaryKind::Radiation => "radiation",
            BoundaryKind::LumpedPort => "lumped port",
        };
        f.write_str(s)
    }
}

/// Ordered pair of points giving a port's excitation field direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationLine {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl IntegrationLine {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn integration_line_length() {
        let line = IntegrationLine::new(Point3::new(-1.74, 3.5, 0.0), Point3::new(-1.74, 3.5, 0.254));
        assert_relative_eq!(line.length(), 0.254, epsilon = 1e-12);
    }
}
