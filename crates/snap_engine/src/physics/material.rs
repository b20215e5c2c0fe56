//! Physical material constants

use serde::{Serialize, Deserialize};

/// Density, elasticity and roughness of a body or of the play-area limits.
///
/// Elasticity scales the reflected velocity on boundary contact; roughness
/// damps acceleration every frame and, on the world material, on contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name, for diagnostics
    pub name: String,
    /// Density (carried, not used by the integrator)
    pub density: f64,
    /// Elasticity, 1.0 keeps the full bounce
    pub elasticity: f64,
    /// Roughness, 1.0 means no damping
    pub roughness: f64,
}

impl Material {
    /// Create a material from its constants
    pub fn new(name: impl Into<String>, density: f64, elasticity: f64, roughness: f64) -> Self {
        Self {
            name: name.into(),
            density,
            elasticity,
            roughness,
        }
    }
}

impl Default for Material {
    /// The neutral material: no damping, full bounce
    fn default() -> Self {
        Self::new("default", 1.0, 1.0, 1.0)
    }
}
