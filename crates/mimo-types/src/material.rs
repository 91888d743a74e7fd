use serde::{Deserialize, Serialize};

/// Dielectric properties of a material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Relative permittivity (εr).
    pub permittivity: f64,
    /// Dielectric loss tangent (tan δ).
    pub loss_tangent: f64,
}

impl MaterialProperties {
    pub const VACUUM: Self = Self {
        permittivity: 1.0,
        loss_tangent: 0.0,
    };

    pub fn new(permittivity: f64, loss_tangent: f64) -> Self {
        Self {
            permittivity,
            loss_tangent,
        }
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self::VACUUM
    }
}

/// A named material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub name: String,
    pub properties: MaterialProperties,
}

impl MaterialSpec {
    /// Rogers RT/duroid 5880 as used by the 28 GHz design.
    pub fn rogers_5880() -> Self {
        Self {
            name: "Rogers_5880_Clean".to_string(),
            properties: MaterialProperties::new(2.2, 0.0009),
        }
    }
}
