//! Keyboard-driven selection menu

use std::fmt;

use crate::ecs::behavior::{Behavior, HookContext, HookResult};
use crate::ecs::kind::EntityKind;
use crate::ecs::{Entity, EntityKey};
use crate::input::{KeyCode, KeyEvent};
use crate::render::Color;
use crate::ui::widgets::TextData;

/// One menu entry
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Displayed label
    pub label: String,
    /// Value handed to the selection callback
    pub value: i64,
}

impl MenuItem {
    /// Create an item
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self { label: label.into(), value }
    }
}

/// Payload of [`EntityKind::Menu`]
#[derive(Debug, Clone, PartialEq)]
pub struct MenuData {
    /// Title drawn above the items; its font and color apply to the items
    pub title: TextData,
    /// Entries in display order
    pub items: Vec<MenuItem>,
    /// Color of the selected entry
    pub selected_color: Color,
    selected: usize,
}

impl MenuData {
    /// Empty menu under `title`
    pub fn new(title: TextData) -> Self {
        Self { title, items: Vec::new(), selected_color: Color::YELLOW, selected: 0 }
    }

    /// Builder: append an item
    pub fn with_item(mut self, label: impl Into<String>, value: i64) -> Self {
        self.items.push(MenuItem::new(label, value));
        self
    }

    /// Index of the selected item
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Selected item, `None` for an empty menu
    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.items.get(self.selected)
    }

    /// Move the selection down, wrapping to the first item
    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    /// Move the selection up, wrapping to the last item
    pub fn select_previous(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }
}

type SelectFn = Box<dyn FnMut(&mut HookContext<'_>, EntityKey, &MenuItem) -> HookResult>;

/// UP/DOWN move the selection; ENTER/SPACE hand the selected item to the
/// callback
pub struct MenuBehavior {
    on_select: SelectFn,
}

impl MenuBehavior {
    /// Behavior calling `on_select` with the chosen item
    pub fn new<F>(on_select: F) -> Self
    where
        F: FnMut(&mut HookContext<'_>, EntityKey, &MenuItem) -> HookResult + 'static,
    {
        Self { on_select: Box::new(on_select) }
    }
}

impl fmt::Debug for MenuBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuBehavior").finish_non_exhaustive()
    }
}

impl Behavior for MenuBehavior {
    fn name(&self) -> &str {
        "MenuBehavior"
    }

    fn on_key_released(&mut self, ctx: &mut HookContext<'_>, entity: Option<EntityKey>, key: &KeyEvent) -> HookResult {
        let Some(entity) = entity else {
            return Ok(());
        };
        let Some(menu) = ctx.require_mut(entity)?.kind.menu_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::UP => menu.select_previous(),
            KeyCode::DOWN => menu.select_next(),
            KeyCode::ENTER | KeyCode::SPACE => {
                let selected = menu.selected_item().cloned();
                if let Some(item) = selected {
                    log::debug!("Menu item '{}' selected", item.label);
                    return (self.on_select)(ctx, entity, &item);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Camera-relative menu entity driven by the keyboard
pub fn menu<F>(name: impl Into<String>, data: MenuData, on_select: F) -> Entity
where
    F: FnMut(&mut HookContext<'_>, EntityKey, &MenuItem) -> HookResult + 'static,
{
    Entity::new(name)
        .with_kind(EntityKind::Menu(data))
        .with_relative_to_camera(true)
        .with_behavior(MenuBehavior::new(on_select))
}
