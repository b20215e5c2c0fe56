//! Entity implementation
//!
//! An entity is a positioned, sized body with kinematic state, draw metadata,
//! an ordered behavior list and free-form attributes. Parent/child links are
//! store keys maintained by [`EntityStore`](crate::ecs::EntityStore).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ecs::attributes::{AttributeValue, Attributes};
use crate::ecs::behavior::Behavior;
use crate::ecs::kind::EntityKind;
use crate::ecs::EntityKey;
use crate::foundation::math::{Rect, Vec2};
use crate::physics::Material;
use crate::render::Color;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(0);

/// Simulated, drawable scene object
pub struct Entity {
    id: u64,
    name: String,
    /// Position and size
    pub bounds: Rect,
    /// Velocity in pixels per millisecond
    pub velocity: Vec2,
    /// Acceleration, accumulated across frames
    pub acceleration: Vec2,
    /// Forces applied during the next physics step
    pub forces: Vec<Vec2>,
    /// Mass, scales vertical velocity
    pub mass: f64,
    /// Physical material
    pub material: Material,
    /// Draw order key, lower values are drawn first
    pub priority: i32,
    /// Inactive entities are neither updated, drawn nor hit-tested
    pub active: bool,
    /// Fill color
    pub fill_color: Color,
    /// Border color
    pub border_color: Color,
    /// Drawn and updated in screen space, outside the camera transform
    pub relative_to_camera: bool,
    /// Position is an offset from the parent position
    pub relative_to_parent: bool,
    /// Receives pointer events
    pub interactive: bool,
    /// Variant and variant data
    pub kind: EntityKind,
    /// Named attributes shared between behaviors
    pub attributes: Attributes,
    pub(crate) behaviors: Vec<Box<dyn Behavior>>,
    pub(crate) parent: Option<EntityKey>,
    pub(crate) children: Vec<EntityKey>,
}

impl Entity {
    /// Create a rectangle-shaped entity with default state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            bounds: Rect::default(),
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            forces: Vec::new(),
            mass: 1.0,
            material: Material::default(),
            priority: 0,
            active: true,
            fill_color: Color::BLUE,
            border_color: Color::BLACK,
            relative_to_camera: false,
            relative_to_parent: false,
            interactive: false,
            kind: EntityKind::default(),
            attributes: Attributes::new(),
            behaviors: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Process-wide unique id, increasing in creation order
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Entity name, its key in the scene entity map
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent key, if attached
    pub fn parent(&self) -> Option<EntityKey> {
        self.parent
    }

    /// Child keys in attachment order
    pub fn children(&self) -> &[EntityKey] {
        &self.children
    }

    /// Number of attached behaviors
    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    /// Attached behaviors in attachment order
    pub fn behaviors(&self) -> &[Box<dyn Behavior>] {
        &self.behaviors
    }

    /// Append a behavior
    pub fn add_behavior(&mut self, behavior: impl Behavior + 'static) {
        self.behaviors.push(Box::new(behavior));
    }

    /// Center of the bounds
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Move the top-left corner
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.bounds.x = x;
        self.bounds.y = y;
    }

    /// Resize
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.bounds.width = width;
        self.bounds.height = height;
    }

    /// Queue a force for the next physics step
    pub fn apply_force(&mut self, force: Vec2) {
        self.forces.push(force);
    }

    /// Recompute variant geometry that derives from the bounds
    pub fn refresh_shape(&mut self) {
        if let EntityKind::Shape(shape) = &mut self.kind {
            shape.refresh(self.bounds);
        }
    }

    /// Builder: position
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.set_position(x, y);
        self
    }

    /// Builder: size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.set_size(width, height);
        self
    }

    /// Builder: velocity
    pub fn with_velocity(mut self, dx: f64, dy: f64) -> Self {
        self.velocity = Vec2::new(dx, dy);
        self
    }

    /// Builder: acceleration
    pub fn with_acceleration(mut self, ax: f64, ay: f64) -> Self {
        self.acceleration = Vec2::new(ax, ay);
        self
    }

    /// Builder: mass
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Builder: material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Builder: priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builder: fill color
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }

    /// Builder: border color
    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    /// Builder: screen-space placement
    pub fn with_relative_to_camera(mut self, relative: bool) -> Self {
        self.relative_to_camera = relative;
        self
    }

    /// Builder: parent-relative placement
    pub fn with_relative_to_parent(mut self, relative: bool) -> Self {
        self.relative_to_parent = relative;
        self
    }

    /// Builder: pointer interaction
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Builder: variant
    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: append a behavior
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.add_behavior(behavior);
        self
    }

    /// Builder: set an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.set(key, value);
        self
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("bounds", &self.bounds)
            .field("priority", &self.priority)
            .field("active", &self.active)
            .field("kind", &self.kind.tag())
            .field("behaviors", &self.behaviors.len())
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}
