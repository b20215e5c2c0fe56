//! Entity arena
//!
//! Entities live in a slot map owned by their scene. Parents own their
//! children logically: removing a parent removes its whole subtree. Links are
//! keys, so there are no ownership cycles.

use slotmap::{new_key_type, SlotMap};

use crate::ecs::Entity;
use crate::foundation::math::{Rect, Vec2};

new_key_type! {
    /// Stable handle to an entity inside an [`EntityStore`]
    pub struct EntityKey;
}

/// Slot-map backed entity storage with parent/child bookkeeping
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: SlotMap<EntityKey, Entity>,
}

impl EntityStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached entity
    pub fn insert(&mut self, mut entity: Entity) -> EntityKey {
        entity.parent = None;
        entity.children.clear();
        entity.refresh_shape();
        self.entities.insert(entity)
    }

    /// Insert `entity` as the last child of `parent`.
    ///
    /// Returns `None`, dropping the entity, when `parent` does not exist.
    pub fn insert_child(&mut self, parent: EntityKey, entity: Entity) -> Option<EntityKey> {
        if !self.entities.contains_key(parent) {
            log::warn!("Cannot add '{}' to a missing parent", entity.name());
            return None;
        }
        let child = self.insert(entity);
        self.link(parent, child);
        Some(child)
    }

    /// Attach an existing entity to `parent`, detaching it from any previous
    /// parent. Both links change together.
    ///
    /// Returns `false` if either key is unknown or the link would create a
    /// cycle.
    pub fn attach_child(&mut self, parent: EntityKey, child: EntityKey) -> bool {
        if parent == child
            || !self.entities.contains_key(parent)
            || !self.entities.contains_key(child)
            || self.is_ancestor(child, parent)
        {
            return false;
        }
        self.detach(child);
        self.link(parent, child);
        true
    }

    /// Remove `child` from its parent's child list, keeping it in the store
    pub fn detach(&mut self, child: EntityKey) {
        let Some(parent) = self.entities.get_mut(child).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(parent) = self.entities.get_mut(parent) {
            parent.children.retain(|&c| c != child);
        }
    }

    /// Remove an entity and its whole subtree
    pub fn remove(&mut self, key: EntityKey) -> Option<Entity> {
        self.detach(key);
        let mut entity = self.entities.remove(key)?;
        for child in std::mem::take(&mut entity.children) {
            self.remove_subtree(child);
        }
        Some(entity)
    }

    fn remove_subtree(&mut self, key: EntityKey) -> Option<Entity> {
        let mut entity = self.entities.remove(key)?;
        for child in std::mem::take(&mut entity.children) {
            self.remove_subtree(child);
        }
        Some(entity)
    }

    fn link(&mut self, parent: EntityKey, child: EntityKey) {
        if let Some(c) = self.entities.get_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.entities.get_mut(parent) {
            p.children.push(child);
        }
    }

    /// Whether `ancestor` is `key` or one of its ancestors
    fn is_ancestor(&self, ancestor: EntityKey, key: EntityKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.entities.get(k).and_then(Entity::parent);
        }
        false
    }

    /// Entity by key
    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Mutable entity by key
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Whether the key is live
    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    /// Number of stored entities, children included
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over all entities
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    /// Iterate mutably over all entities
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityKey, &mut Entity)> {
        self.entities.iter_mut()
    }

    /// Children of `key`, copied so the store can be mutated while walking
    pub fn children_of(&self, key: EntityKey) -> Vec<EntityKey> {
        self.entities.get(key).map(|e| e.children.clone()).unwrap_or_default()
    }

    /// Drop every entity
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Absolute top-left corner, resolving parent-relative offsets
    pub fn absolute_position(&self, key: EntityKey) -> Option<Vec2> {
        let entity = self.entities.get(key)?;
        let own = entity.bounds.position();
        match entity.parent {
            Some(parent) if entity.relative_to_parent => {
                Some(self.absolute_position(parent).unwrap_or_else(Vec2::zeros) + own)
            }
            _ => Some(own),
        }
    }

    /// Bounds moved to the absolute position
    pub fn absolute_bounds(&self, key: EntityKey) -> Option<Rect> {
        let position = self.absolute_position(key)?;
        self.entities.get(key).map(|e| e.bounds.with_position(position))
    }

    /// `key` followed by all its descendants, depth first in child order
    pub fn subtree(&self, key: EntityKey) -> Vec<EntityKey> {
        let mut keys = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            let Some(entity) = self.entities.get(k) else { continue };
            keys.push(k);
            stack.extend(entity.children.iter().rev());
        }
        keys
    }

    /// Whether the entity and every ancestor up to its root are active.
    /// Only such entities are reached by the systems and drawn.
    pub fn is_active_in_tree(&self, key: EntityKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            match self.entities.get(k) {
                Some(entity) if entity.active => current = entity.parent,
                _ => return false,
            }
        }
        true
    }

    /// Set `active` on an entity and its whole subtree
    pub fn set_active_recursive(&mut self, key: EntityKey, active: bool) {
        for k in self.subtree(key) {
            if let Some(entity) = self.entities.get_mut(k) {
                entity.active = active;
            }
        }
    }
}
