//! Simulation bounds and gravity

use crate::core::config::EngineConfig;
use crate::foundation::math::Rect;
use crate::physics::Material;
use crate::render::Color;

/// Global simulation context: play area, gravity and boundary material
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    /// World name, for diagnostics
    pub name: String,
    /// Play area; origin is expected at (0,0)
    pub play_area: Rect,
    /// Signed gravity scalar, flipping the sign is a supported runtime toggle
    pub gravity: f64,
    /// Material of the play-area limits
    pub material: Material,
    /// Fill color of the play area
    pub background: Color,
}

impl Default for World {
    fn default() -> Self {
        Self {
            name: "default_world".to_string(),
            play_area: Rect::from_size(640.0, 480.0),
            gravity: 0.981,
            material: Material::default(),
            background: Color::rgb(0.0, 0.0, 0.3),
        }
    }
}

impl World {
    /// Create a world with explicit bounds, gravity and limit material
    pub fn new(name: impl Into<String>, gravity: f64, play_area: Rect, material: Material) -> Self {
        Self {
            name: name.into(),
            play_area,
            gravity,
            material,
            ..Self::default()
        }
    }

    /// World sized and weighted from the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            "earth",
            config.gravity,
            Rect::from_size(f64::from(config.play_area.width), f64::from(config.play_area.height)),
            Material::default(),
        )
    }

    /// Invert gravity
    pub fn flip_gravity(&mut self) {
        self.gravity = -self.gravity;
    }
}
