//! Places buttons along the bottom edge of their container

use crate::ecs::behavior::{Behavior, HookContext, HookResult};
use crate::ecs::kind::EntityKind;
use crate::ecs::EntityKey;
use crate::foundation::math::{Rect, Vec2};
use crate::ui::{Align, MARGIN, PADDING};

/// On every update, moves the entity's button children inside its bottom
/// edge according to each button's alignment. Other children are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignBehavior;

/// Top-left corner of a `child` sized widget aligned inside `parent`.
/// `None` for alignments that do not place anything.
pub fn aligned_position(parent: Rect, child: Rect, align: Align) -> Option<Vec2> {
    let inset = MARGIN + PADDING;
    let y = parent.bottom() - (child.height + inset);
    let x = match align {
        Align::Left => parent.x + inset,
        Align::Right => parent.right() - (child.width + inset),
        // centered on the parent width, insets ignored
        Align::Center => parent.x + (parent.width - child.width) * 0.5,
        Align::Top | Align::Bottom => return None,
    };
    Some(Vec2::new(x, y))
}

impl Behavior for AlignBehavior {
    fn name(&self) -> &str {
        "AlignBehavior"
    }

    fn on_update(&mut self, ctx: &mut HookContext<'_>, entity: EntityKey, _elapsed: f64) -> HookResult {
        let store = ctx.scene.store_mut();
        let Some(parent) = store.absolute_bounds(entity) else {
            return Ok(());
        };
        for child in store.children_of(entity) {
            let Some(c) = store.get_mut(child) else { continue };
            let EntityKind::Button(button) = &c.kind else { continue };
            let Some(position) = aligned_position(parent, c.bounds, button.align) else { continue };
            let local = if c.relative_to_parent { position - parent.position() } else { position };
            c.set_position(local.x, local.y);
        }
        Ok(())
    }
}
