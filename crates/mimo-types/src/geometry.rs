use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Drawing plane of a rectangle (sheet).
///
/// Sizes are given in the plane's own axis order: `XY` takes `[dx, dy]`,
/// `YZ` takes `[dy, dz]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Plane {
    XY,
    YZ,
}

impl Plane {
    /// Index of the axis the sheet has no thickness along.
    pub fn normal_axis(self) -> usize {
        match self {
            Plane::XY => 2,
            Plane::YZ => 0,
        }
    }

    /// Indices of the two in-plane axes, in size order.
    pub fn in_plane_axes(self) -> (usize, usize) {
        match self {
            Plane::XY => (0, 1),
            Plane::YZ => (1, 2),
        }
    }

    /// Lift a 2-D in-plane size into a 3-D extent with zero thickness along the normal.
    pub fn lift_size(self, size: [f64; 2]) -> Vector3<f64> {
        let (a, b) = self.in_plane_axes();
        let mut v = Vector3::zeros();
        v[a] = size[0];
        v[b] = size[1];
        v
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Plane::XY => "XY",
            Plane::YZ => "YZ",
        }
    }
}

impl std::fmt::Display for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of primitive a shape was created as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeKind {
    /// A solid axis-aligned box.
    Box,
    /// A zero-thickness rectangle drawn on a plane.
    Rectangle { plane: Plane },
}

impl ShapeKind {
    pub fn is_sheet(self) -> bool {
        matches!(self, ShapeKind::Rectangle { .. })
    }
}

/// Length unit every model coordinate is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LengthUnit {
    Um,
    #[default]
    Mm,
    Cm,
    Meter,
    Mil,
    In,
}

impl LengthUnit {
    /// Multiplier from this unit to metres.
    pub fn scale(self) -> f64 {
        match self {
            LengthUnit::Um => 1e-6,
            LengthUnit::Mm => 1e-3,
            LengthUnit::Cm => 1e-2,
            LengthUnit::Meter => 1.0,
            LengthUnit::Mil => 2.54e-5,
            LengthUnit::In => 2.54e-2,
        }
    }

    pub fn to_meters(self, value: f64) -> f64 {
        value * self.scale()
    }

    /// Unit token as a solver session spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Um => "um",
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::Meter => "meter",
            LengthUnit::Mil => "mil",
            LengthUnit::In => "in",
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lift_size_places_components_on_plane_axes() {
        let xy = Plane::XY.lift_size([2.0, 3.0]);
        assert_eq!(xy, Vector3::new(2.0, 3.0, 0.0));

        let yz = Plane::YZ.lift_size([0.78, 0.254]);
        assert_eq!(yz, Vector3::new(0.0, 0.78, 0.254));
    }

    #[test]
    fn normal_axis_is_the_zero_extent_axis() {
        for plane in [Plane::XY, Plane::YZ] {
            let lifted = plane.lift_size([1.0, 1.0]);
            assert_eq!(lifted[plane.normal_axis()], 0.0);
        }
    }

    #[test]
    fn millimetres_are_the_default_unit() {
        assert_eq!(LengthUnit::default(), LengthUnit::Mm);
        assert_eq!(LengthUnit::Mm.to_string(), "mm");
        assert!((LengthUnit::Mm.to_meters(12.0) - 0.012).abs() < 1e-15);
        assert!((LengthUnit::Mil.to_meters(1000.0) - LengthUnit::In.to_meters(1.0)).abs() < 1e-15);
    }
}
