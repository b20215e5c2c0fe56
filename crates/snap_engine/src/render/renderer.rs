//! Frame renderer
//!
//! Draw order per frame:
//!
//! 1. clear, then translate by the camera position
//! 2. play-area background
//! 3. active world-space roots, ascending priority, each followed by its
//!    behaviors' draw hooks and its children
//! 4. translate back, then active camera-relative roots, ascending priority
//! 5. the active camera's draw hooks (screen overlays)
//! 6. debug overlay
//!
//! Equal priorities are drawn in creation order.

use std::collections::HashSet;

use crate::ecs::behavior::DrawContext;
use crate::ecs::kind::KindTag;
use crate::ecs::systems::dispatch::guarded;
use crate::ecs::EntityKey;
use crate::foundation::math::Rect;
use crate::render::plugins::{DrawPlugin, PluginRegistry};
use crate::render::surface::Surface;
use crate::render::Color;
use crate::scene::SceneContent;

/// Renders the active scene onto a [`Surface`]
pub struct Renderer {
    plugins: PluginRegistry,
    reported: HashSet<KindTag>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Renderer with the built-in plugins
    pub fn new() -> Self {
        Self {
            plugins: PluginRegistry::with_defaults(),
            reported: HashSet::new(),
        }
    }

    /// Register or replace the plugin for its tag
    pub fn register_plugin(&mut self, plugin: Box<dyn DrawPlugin>) {
        let tag = plugin.tag();
        self.plugins.register(plugin);
        self.reported.remove(&tag);
    }

    /// Registered plugins
    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// Size text-bearing entities from the surface font metrics
    pub fn layout(&self, scene: &mut SceneContent, surface: &dyn Surface) {
        for (_, entity) in scene.store_mut().iter_mut() {
            if !entity.active {
                continue;
            }
            if let Some(plugin) = self.plugins.get(entity.kind.tag()) {
                plugin.layout(entity, surface);
            }
        }
    }

    /// Draw one frame
    pub fn draw(&mut self, ctx: &DrawContext<'_>, surface: &mut dyn Surface) {
        let scene = ctx.scene;
        let camera = scene
            .active_camera()
            .filter(|&key| scene.get(key).is_some_and(|e| e.active))
            .map(|_| scene.camera_position());

        surface.clear(Color::BLACK);
        if let Some(position) = camera {
            surface.translate(-position.x, -position.y);
        }

        surface.set_color(ctx.world.background);
        surface.fill_rect(ctx.world.play_area);

        for key in sorted_roots(scene, false) {
            self.draw_entity(ctx, key, surface);
        }

        if ctx.runtime.is_debug_at_least(1) {
            surface.set_color(Color::YELLOW);
            surface.draw_rect(ctx.world.play_area);
        }

        if let Some(position) = camera {
            surface.translate(position.x, position.y);
        }

        for key in sorted_roots(scene, true) {
            self.draw_entity(ctx, key, surface);
        }

        if let Some(key) = camera.and(scene.active_camera()) {
            draw_behaviors(ctx, key, surface);
        }

        if ctx.runtime.is_debug_at_least(1) {
            self.draw_debug_overlay(ctx, surface);
        }
    }

    fn draw_entity(&mut self, ctx: &DrawContext<'_>, key: EntityKey, surface: &mut dyn Surface) {
        let store = ctx.scene.store();
        let Some(entity) = store.get(key).filter(|e| e.active) else {
            return;
        };
        let bounds = store.absolute_bounds(key).unwrap_or(entity.bounds);

        let tag = entity.kind.tag();
        match self.plugins.get(tag) {
            Some(plugin) => plugin.draw(ctx, entity, bounds, surface),
            None => {
                if self.reported.insert(tag) {
                    log::error!("No draw plugin for '{}' of kind {tag:?}", entity.name());
                }
            }
        }

        if !entity.relative_to_camera && ctx.runtime.is_debug_at_least(3) {
            surface.set_color(Color::ORANGE);
            surface.draw_rect(bounds);
        }

        draw_behaviors(ctx, key, surface);
        for &child in entity.children() {
            self.draw_entity(ctx, child, surface);
        }
    }

    fn draw_debug_overlay(&self, ctx: &DrawContext<'_>, surface: &mut dyn Surface) {
        let pointer = ctx.input.mouse();
        surface.set_color(Color::YELLOW);
        surface.fill_rect(Rect::new(pointer.x, pointer.y, 2.0, 2.0));

        let stats = &ctx.runtime.stats;
        let line = format!(
            "[ dbg:{:01} / fps:{:03} ups:{:03} ft:{:03} / obj:{:04} active:{:04} / scn:{} ]",
            ctx.runtime.debug_level(),
            stats.fps,
            stats.ups,
            stats.frame_time_ms as u64,
            ctx.scene.len(),
            ctx.scene.active_count(),
            ctx.scene.name(),
        );
        let (_, height) = surface.size();
        surface.set_font(None);
        surface.set_color(Color::ORANGE);
        surface.draw_text(&line, 10.0, f64::from(height) - 10.0);
    }
}

/// Active roots of one layer, by ascending priority then creation order
fn sorted_roots(scene: &SceneContent, relative_to_camera: bool) -> Vec<EntityKey> {
    let mut roots: Vec<(i32, u64, EntityKey)> = scene
        .roots()
        .into_iter()
        .filter_map(|key| {
            let entity = scene.get(key)?;
            (entity.active && entity.relative_to_camera == relative_to_camera)
                .then_some((entity.priority, entity.id(), key))
        })
        .collect();
    roots.sort_unstable_by_key(|&(priority, id, _)| (priority, id));
    roots.into_iter().map(|(_, _, key)| key).collect()
}

fn draw_behaviors(ctx: &DrawContext<'_>, key: EntityKey, surface: &mut dyn Surface) {
    let Some(entity) = ctx.scene.get(key) else { return };
    for behavior in entity.behaviors() {
        if let Err(error) = guarded(|| behavior.on_draw(ctx, key, surface)) {
            log::error!("{} failed in on_draw of '{}': {}", behavior.name(), entity.name(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RuntimeContext;
    use crate::ecs::behavior::{Behavior, BehaviorError, HookResult};
    use crate::ecs::kind::EntityKind;
    use crate::ecs::Entity;
    use crate::foundation::math::Vec2;
    use crate::input::InputState;
    use crate::physics::World;
    use crate::render::commands::{DrawCommand, RecordingSurface};
    use crate::scene::camera::camera;

    struct Frame {
        scene: SceneContent,
        world: World,
        input: InputState,
        runtime: RuntimeContext,
    }

    impl Frame {
        fn new() -> Self {
            Self {
                scene: SceneContent::new("test"),
                world: World::default(),
                input: InputState::default(),
                runtime: RuntimeContext::default(),
            }
        }

        fn render(&mut self, renderer: &mut Renderer) -> RecordingSurface {
            let mut surface = RecordingSurface::new(320, 240);
            renderer.layout(&mut self.scene, &surface);
            let ctx = DrawContext { scene: &self.scene, world: &self.world, input: &self.input, runtime: &self.runtime };
            renderer.draw(&ctx, &mut surface);
            surface
        }
    }

    fn rect_entity(name: &str, x: f64, priority: i32) -> Entity {
        Entity::new(name).with_position(x, 10.0).with_size(10.0, 10.0).with_priority(priority)
    }

    struct Overlay;

    impl Behavior for Overlay {
        fn on_draw(&self, _ctx: &DrawContext<'_>, _entity: EntityKey, surface: &mut dyn Surface) -> HookResult {
            surface.draw_text("overlay", 0.0, 0.0);
            Ok(())
        }
    }

    struct BrokenDraw;

    impl Behavior for BrokenDraw {
        fn on_draw(&self, _ctx: &DrawContext<'_>, _entity: EntityKey, _surface: &mut dyn Surface) -> HookResult {
            Err(BehaviorError::fault("no paint"))
        }
    }

    #[test]
    fn test_priority_order_with_creation_tie_break() {
        let mut frame = Frame::new();
        frame.scene.add(rect_entity("high", 1.0, 20));
        frame.scene.add(rect_entity("low", 2.0, 10));
        frame.scene.add(rect_entity("low_too", 3.0, 10));
        let surface = frame.render(&mut Renderer::new());

        let xs: Vec<f64> = surface.filled_rects().iter().skip(1).map(|r| r.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_camera_translation_wraps_world_layer() {
        let mut frame = Frame::new();
        let cam = frame.scene.set_camera(camera("cam", 320.0, 240.0, 0.1).with_behavior(Overlay));
        frame.scene.get_mut(cam).unwrap().set_position(50.0, 20.0);
        frame.scene.add(rect_entity("world", 100.0, 0));
        frame.scene.add(rect_entity("hud", 5.0, 0).with_relative_to_camera(true));
        let surface = frame.render(&mut Renderer::new());
        let commands = surface.commands();

        let translate_in = commands.iter().position(|c| *c == DrawCommand::Translate { dx: -50.0, dy: -20.0 });
        let world = commands.iter().position(|c| *c == DrawCommand::FillRect(Rect::new(100.0, 10.0, 10.0, 10.0)));
        let translate_out = commands.iter().position(|c| *c == DrawCommand::Translate { dx: 50.0, dy: 20.0 });
        let hud = commands.iter().position(|c| *c == DrawCommand::FillRect(Rect::new(5.0, 10.0, 10.0, 10.0)));
        assert!(translate_in < world && world < translate_out && translate_out < hud);
        assert_eq!(surface.texts().last().copied(), Some("overlay"));
        assert_eq!(surface.offset(), Vec2::zeros());
    }

    #[test]
    fn test_children_follow_parent_and_inactive_are_skipped() {
        let mut frame = Frame::new();
        let parent = frame.scene.add(rect_entity("parent", 1.0, 0));
        frame
            .scene
            .add_child(parent, rect_entity("child", 2.0, 0).with_relative_to_parent(true))
            .unwrap();
        frame.scene.add(rect_entity("hidden", 9.0, 0).with_active(false));
        let surface = frame.render(&mut Renderer::new());

        let xs: Vec<f64> = surface.filled_rects().iter().skip(1).map(|r| r.x).collect();
        assert_eq!(xs, vec![1.0, 3.0]);
    }

    #[test]
    fn test_faulty_draw_hooks_and_unknown_kinds_do_not_stop_the_frame() {
        let mut frame = Frame::new();
        frame.scene.add(Entity::new("custom").with_kind(EntityKind::Custom("particles")).with_behavior(BrokenDraw));
        frame.scene.add(rect_entity("after", 4.0, 1));
        let surface = frame.render(&mut Renderer::new());

        assert!(surface.filled_rects().contains(&Rect::new(4.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_debug_overlay_reports_stats() {
        let mut frame = Frame::new();
        frame.scene.add(rect_entity("a", 1.0, 0));
        frame.runtime.set_debug_level(1);
        frame.runtime.stats.fps = 60;
        frame.runtime.stats.ups = 59;
        frame.runtime.stats.frame_time_ms = 16.0;
        let surface = frame.render(&mut Renderer::new());

        assert_eq!(
            surface.texts().last().copied(),
            Some("[ dbg:1 / fps:060 ups:059 ft:016 / obj:0001 active:0001 / scn:test ]")
        );
    }
}
