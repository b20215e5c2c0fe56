//! Entities, behaviors and camera owned by one scene

use std::collections::HashMap;

use crate::ecs::attributes::Attributes;
use crate::ecs::behavior::Behavior;
use crate::ecs::{Entity, EntityKey, EntityStore};
use crate::foundation::math::Vec2;

/// Everything a scene builds in `create` and drops in `reset`.
///
/// The entity map is keyed by name; adding an entity under an existing name
/// replaces (and removes) the previous one. The camera lives in the store but
/// not in the entity map, so it is neither drawn nor updated as a regular
/// entity.
#[derive(Default)]
pub struct SceneContent {
    name: String,
    store: EntityStore,
    names: HashMap<String, EntityKey>,
    behaviors: Vec<Box<dyn Behavior>>,
    active_camera: Option<EntityKey>,
    pending_create: Vec<EntityKey>,
    /// Scene-wide attributes (score, lives, ...)
    pub attributes: Attributes,
}

impl SceneContent {
    /// Empty content for the scene `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Owning scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a root entity to the entity map.
    ///
    /// Its `on_create` hooks run once, when the engine flushes pending
    /// creations right after the current phase.
    pub fn add(&mut self, entity: Entity) -> EntityKey {
        let name = entity.name().to_string();
        let key = self.store.insert(entity);
        if let Some(previous) = self.names.insert(name, key) {
            log::debug!("Entity '{}' replaced in scene '{}'", self.store.get(key).map_or("", Entity::name), self.name);
            self.store.remove(previous);
            if self.active_camera == Some(previous) {
                self.active_camera = None;
            }
        }
        self.pending_create.push(key);
        key
    }

    /// Add `entity` as the last child of `parent`. Children are reached
    /// through their parent and are not part of the entity map.
    pub fn add_child(&mut self, parent: EntityKey, entity: Entity) -> Option<EntityKey> {
        let key = self.store.insert_child(parent, entity)?;
        self.pending_create.push(key);
        Some(key)
    }

    /// Append a scene-level behavior
    pub fn add_behavior(&mut self, behavior: impl Behavior + 'static) {
        self.behaviors.push(Box::new(behavior));
    }

    /// Number of scene-level behaviors
    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    pub(crate) fn take_behaviors(&mut self) -> Vec<Box<dyn Behavior>> {
        std::mem::take(&mut self.behaviors)
    }

    pub(crate) fn restore_behaviors(&mut self, behaviors: Vec<Box<dyn Behavior>>) {
        let added = std::mem::replace(&mut self.behaviors, behaviors);
        self.behaviors.extend(added);
    }

    /// Insert a camera entity and make it the active camera
    pub fn set_camera(&mut self, camera: Entity) -> EntityKey {
        if let Some(previous) = self.active_camera.take() {
            self.store.remove(previous);
        }
        let key = self.store.insert(camera);
        self.pending_create.push(key);
        self.active_camera = Some(key);
        key
    }

    /// Active camera key
    pub fn active_camera(&self) -> Option<EntityKey> {
        self.active_camera
    }

    /// Top-left corner of the active camera, zero without one
    pub fn camera_position(&self) -> Vec2 {
        self.active_camera
            .and_then(|key| self.store.get(key))
            .map_or_else(Vec2::zeros, |camera| camera.bounds.position())
    }

    /// Entity by key
    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.store.get(key)
    }

    /// Mutable entity by key
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.store.get_mut(key)
    }

    /// Key of a named entity
    pub fn key_of(&self, name: &str) -> Option<EntityKey> {
        self.names.get(name).copied()
    }

    /// Named entity
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.key_of(name).and_then(|key| self.store.get(key))
    }

    /// Mutable named entity
    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        let key = self.key_of(name)?;
        self.store.get_mut(key)
    }

    /// Remove a named entity and its subtree
    pub fn remove(&mut self, name: &str) -> Option<Entity> {
        let key = self.names.remove(name)?;
        self.store.remove(key)
    }

    /// Root entities (named, without parent), ordered by creation
    pub fn roots(&self) -> Vec<EntityKey> {
        let mut roots: Vec<(u64, EntityKey)> = self
            .names
            .values()
            .filter_map(|&key| {
                let entity = self.store.get(key)?;
                entity.parent().is_none().then_some((entity.id(), key))
            })
            .collect();
        roots.sort_unstable_by_key(|&(id, _)| id);
        roots.into_iter().map(|(_, key)| key).collect()
    }

    /// Entity arena, children and camera included
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Mutable entity arena
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Size of the entity map
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the entity map is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Active entities in the entity map
    pub fn active_count(&self) -> usize {
        self.names
            .values()
            .filter(|&&key| self.store.get(key).is_some_and(|e| e.active))
            .count()
    }

    /// Mark every owned entity inactive without removing anything
    pub fn deactivate_all(&mut self) {
        for (_, entity) in self.store.iter_mut() {
            entity.active = false;
        }
    }

    /// Drop entities, behaviors, camera and attributes
    pub fn reset(&mut self) {
        self.store.clear();
        self.names.clear();
        self.behaviors.clear();
        self.active_camera = None;
        self.pending_create.clear();
        self.attributes.clear();
    }

    pub(crate) fn take_pending_creates(&mut self) -> Vec<EntityKey> {
        std::mem::take(&mut self.pending_create)
    }

    /// Whether `on_create` hooks are waiting to run
    pub fn has_pending_creates(&self) -> bool {
        !self.pending_create.is_empty()
    }
}
