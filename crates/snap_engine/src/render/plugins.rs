//! Draw plugins
//!
//! Each entity variant is drawn by the plugin registered for its
//! [`KindTag`]. Built-in variants get a default plugin; applications can
//! replace them or add plugins for their `Custom` tags.

use std::collections::HashMap;

use crate::ecs::behavior::DrawContext;
use crate::ecs::kind::{EntityKind, KindTag, PreciseShape, ShapeNature};
use crate::ecs::Entity;
use crate::foundation::math::{Rect, Vec2};
use crate::render::surface::Surface;
use crate::render::Color;
use crate::ui::{Align, MARGIN, PADDING};

/// Draws one entity variant
pub trait DrawPlugin {
    /// Variant handled
    fn tag(&self) -> KindTag;

    /// Size the entity from text metrics before the draw pass.
    ///
    /// Runs every frame for active entities of this variant.
    fn layout(&self, entity: &mut Entity, surface: &dyn Surface) {
        let _ = (entity, surface);
    }

    /// Draw the entity whose absolute bounds are `bounds`
    fn draw(&self, ctx: &DrawContext<'_>, entity: &Entity, bounds: Rect, surface: &mut dyn Surface);
}

/// Plugins by variant tag
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<KindTag, Box<dyn DrawPlugin>>,
}

impl PluginRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in plugins
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ShapePlugin));
        registry.register(Box::new(ImagePlugin));
        registry.register(Box::new(TextPlugin));
        registry.register(Box::new(ButtonPlugin));
        registry.register(Box::new(DialogPlugin));
        registry.register(Box::new(MenuPlugin));
        registry.register(Box::new(CameraPlugin));
        registry
    }

    /// Register a plugin, returning the one it replaces
    pub fn register(&mut self, plugin: Box<dyn DrawPlugin>) -> Option<Box<dyn DrawPlugin>> {
        let tag = plugin.tag();
        let previous = self.plugins.insert(tag, plugin);
        if previous.is_some() {
            log::debug!("Draw plugin for {tag:?} replaced");
        }
        previous
    }

    /// Plugin for `tag`
    pub fn get(&self, tag: KindTag) -> Option<&dyn DrawPlugin> {
        self.plugins.get(&tag).map(Box::as_ref)
    }

    /// Whether a plugin handles `tag`
    pub fn contains(&self, tag: KindTag) -> bool {
        self.plugins.contains_key(&tag)
    }

    /// Number of plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Dots, lines, rectangles, ellipses and polygons
pub struct ShapePlugin;

impl DrawPlugin for ShapePlugin {
    fn tag(&self) -> KindTag {
        KindTag::Shape
    }

    fn draw(&self, _ctx: &DrawContext<'_>, entity: &Entity, bounds: Rect, surface: &mut dyn Surface) {
        let EntityKind::Shape(shape) = &entity.kind else { return };
        // The precise shape is stored in local coordinates; shift it for
        // parent-relative entities.
        let offset = bounds.position() - entity.bounds.position();
        match shape.nature {
            ShapeNature::Dot => {
                surface.set_color(entity.border_color);
                surface.draw_line(bounds.position(), bounds.position());
            }
            ShapeNature::Line => {
                surface.set_color(entity.border_color);
                surface.draw_line(bounds.position(), bounds.position() + bounds.size());
            }
            ShapeNature::Rectangle | ShapeNature::Ellipse | ShapeNature::Polygon => match shape.shape() {
                PreciseShape::Rect(rect) => {
                    let rect = rect.with_position(rect.position() + offset);
                    surface.set_color(entity.fill_color);
                    surface.fill_rect(rect);
                    surface.set_color(entity.border_color);
                    surface.draw_rect(rect);
                }
                PreciseShape::Ellipse(rect) => {
                    let rect = rect.with_position(rect.position() + offset);
                    surface.set_color(entity.fill_color);
                    surface.fill_ellipse(rect);
                    surface.set_color(entity.border_color);
                    surface.draw_ellipse(rect);
                }
                PreciseShape::Polygon(points) => {
                    let points: Vec<Vec2> = points.iter().map(|p| p + offset).collect();
                    surface.set_color(entity.fill_color);
                    surface.fill_polygon(&points);
                    surface.set_color(entity.border_color);
                    surface.draw_polygon(&points);
                }
            },
        }
    }
}

/// Images stretched to the entity bounds; nothing without a handle
pub struct ImagePlugin;

impl DrawPlugin for ImagePlugin {
    fn tag(&self) -> KindTag {
        KindTag::Image
    }

    fn draw(&self, _ctx: &DrawContext<'_>, entity: &Entity, bounds: Rect, surface: &mut dyn Surface) {
        if let EntityKind::Image(data) = &entity.kind {
            if let Some(image) = &data.image {
                surface.draw_image(image, bounds);
            }
        }
    }
}

/// Free text; the entity position is the baseline anchor
pub struct TextPlugin;

impl DrawPlugin for TextPlugin {
    fn tag(&self) -> KindTag {
        KindTag::Text
    }

    fn layout(&self, entity: &mut Entity, surface: &dyn Surface) {
        let EntityKind::Text(text) = &entity.kind else { return };
        let metrics = surface.text_metrics(&text.display_text(), text.font.as_ref());
        entity.set_size(metrics.width, metrics.height);
    }

    fn draw(&self, ctx: &DrawContext<'_>, entity: &Entity, bounds: Rect, surface: &mut dyn Surface) {
        let EntityKind::Text(text) = &entity.kind else { return };
        let content = text.display_text();
        let metrics = surface.text_metrics(&content, text.font.as_ref());
        let offset = match text.align {
            Align::Center => -0.5 * metrics.width,
            Align::Right => -metrics.width,
            Align::Left | Align::Top | Align::Bottom => 0.0,
        };
        surface.set_font(text.font.as_ref());
        surface.set_color(text.color);
        surface.draw_text(&content, bounds.x + offset, bounds.y);

        if ctx.runtime.is_debug_at_least(3) {
            surface.set_color(Color::ORANGE);
            surface.draw_rect(Rect::new(
                bounds.x + metrics.descent + offset,
                bounds.y - bounds.height,
                bounds.width,
                bounds.height,
            ));
        }
    }
}

/// Raised button with a centered label
pub struct ButtonPlugin;

impl DrawPlugin for ButtonPlugin {
    fn tag(&self) -> KindTag {
        KindTag::Button
    }

    fn layout(&self, entity: &mut Entity, surface: &dyn Surface) {
        let EntityKind::Button(button) = &entity.kind else { return };
        let metrics = surface.text_metrics(&button.label.display_text(), button.label.font.as_ref());
        let width = entity.bounds.width.max(metrics.width + 2.0 * MARGIN);
        entity.set_size(width, metrics.height + 2.0 * MARGIN);
    }

    fn draw(&self, _ctx: &DrawContext<'_>, entity: &Entity, bounds: Rect, surface: &mut dyn Surface) {
        let EntityKind::Button(button) = &entity.kind else { return };
        draw_edge_rectangle(surface, entity, bounds);

        let label = button.label.display_text();
        let metrics = surface.text_metrics(&label, button.label.font.as_ref());
        surface.set_font(button.label.font.as_ref());
        surface.set_color(button.label.color);
        surface.draw_text(
            &label,
            bounds.x + (bounds.width - metrics.width) * 0.5,
            bounds.y + MARGIN + metrics.height - metrics.descent,
        );
    }
}

fn draw_edge_rectangle(surface: &mut dyn Surface, entity: &Entity, r: Rect) {
    surface.set_color(entity.fill_color);
    surface.fill_rect(r);

    let top_left = r.position();
    let top_right = Vec2::new(r.right(), r.y);
    let bottom_left = Vec2::new(r.x, r.bottom());
    let bottom_right = Vec2::new(r.right(), r.bottom());
    surface.set_color(Color::LIGHT_GRAY);
    surface.draw_line(top_left, top_right);
    surface.draw_line(top_left, bottom_left);
    surface.set_color(Color::DARK_GRAY);
    surface.draw_line(bottom_left, bottom_right);
    surface.draw_line(top_right, bottom_right);

    surface.set_color(entity.border_color);
    surface.draw_rect(Rect::new(r.x - 1.0, r.y - 1.0, r.width + 2.0, r.height + 2.0));
}

/// Framed message box
pub struct DialogPlugin;

impl DrawPlugin for DialogPlugin {
    fn tag(&self) -> KindTag {
        KindTag::Dialog
    }

    fn draw(&self, _ctx: &DrawContext<'_>, entity: &Entity, bounds: Rect, surface: &mut dyn Surface) {
        let EntityKind::Dialog(dialog) = &entity.kind else { return };
        surface.set_color(entity.fill_color);
        surface.fill_rect(bounds);
        surface.set_color(entity.border_color);
        surface.draw_rect(bounds);

        let message = dialog.label.display_text();
        let metrics = surface.text_metrics(&message, dialog.label.font.as_ref());
        surface.set_font(dialog.label.font.as_ref());
        surface.set_color(dialog.label.color);
        surface.draw_text(
            &message,
            bounds.x + (bounds.width - metrics.width) * 0.5,
            bounds.y + bounds.height * 0.3 + MARGIN + PADDING,
        );
    }
}

/// Title followed by one line per item, the selected one highlighted
pub struct MenuPlugin;

const MENU_CURSOR: &str = "> ";
const MENU_INDENT: &str = "  ";

fn menu_lines(entity: &Entity) -> Vec<(String, bool)> {
    let EntityKind::Menu(menu) = &entity.kind else { return Vec::new() };
    let mut lines = vec![(menu.title.display_text().into_owned(), false)];
    for (index, item) in menu.items.iter().enumerate() {
        let selected = index == menu.selected_index();
        let prefix = if selected { MENU_CURSOR } else { MENU_INDENT };
        lines.push((format!("{prefix}{}", item.label), selected));
    }
    lines
}

impl DrawPlugin for MenuPlugin {
    fn tag(&self) -> KindTag {
        KindTag::Menu
    }

    fn layout(&self, entity: &mut Entity, surface: &dyn Surface) {
        let EntityKind::Menu(menu) = &entity.kind else { return };
        let font = menu.title.font.clone();
        let lines = menu_lines(entity);
        let (width, height) = lines.iter().fold((0.0_f64, 0.0), |(w, h), (line, _)| {
            let metrics = surface.text_metrics(line, font.as_ref());
            (w.max(metrics.width), h + metrics.height)
        });
        entity.set_size(width, height);
    }

    fn draw(&self, _ctx: &DrawContext<'_>, entity: &Entity, bounds: Rect, surface: &mut dyn Surface) {
        let EntityKind::Menu(menu) = &entity.kind else { return };
        let font = menu.title.font.as_ref();
        surface.set_font(font);
        let mut baseline = bounds.y;
        for (line, selected) in menu_lines(entity) {
            let metrics = surface.text_metrics(&line, font);
            baseline += metrics.height;
            surface.set_color(if selected { menu.selected_color } else { menu.title.color });
            surface.draw_text(&line, bounds.x, baseline - metrics.descent);
        }
    }
}

/// Cameras have no body of their own, only their behaviors draw
pub struct CameraPlugin;

impl DrawPlugin for CameraPlugin {
    fn tag(&self) -> KindTag {
        KindTag::Camera
    }

    fn draw(&self, _ctx: &DrawContext<'_>, _entity: &Entity, _bounds: Rect, _surface: &mut dyn Surface) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RuntimeContext;
    use crate::ecs::kind::{ImageData, ShapeData};
    use crate::input::InputState;
    use crate::physics::World;
    use crate::render::commands::{DrawCommand, RecordingSurface};
    use crate::scene::SceneContent;
    use crate::ui::widgets::{button, text, TextData};

    fn draw_one(entity: &Entity, bounds: Rect) -> Vec<DrawCommand> {
        let scene = SceneContent::new("test");
        let world = World::default();
        let input = InputState::default();
        let runtime = RuntimeContext::default();
        let ctx = DrawContext { scene: &scene, world: &world, input: &input, runtime: &runtime };
        let registry = PluginRegistry::with_defaults();
        let mut surface = RecordingSurface::new(320, 240);
        if let Some(plugin) = registry.get(entity.kind.tag()) {
            plugin.draw(&ctx, entity, bounds, &mut surface);
        }
        surface.take_commands()
    }

    #[test]
    fn test_defaults_cover_builtin_variants() {
        let registry = PluginRegistry::with_defaults();
        assert_eq!(registry.len(), 7);
        assert!(registry.contains(KindTag::Dialog));
        assert!(!registry.contains(KindTag::Custom("particles")));
    }

    #[test]
    fn test_missing_image_draws_nothing() {
        let entity = Entity::new("bg").with_kind(EntityKind::Image(ImageData::default()));
        assert!(draw_one(&entity, Rect::from_size(320.0, 240.0)).is_empty());
    }

    #[test]
    fn test_ellipse_uses_absolute_bounds() {
        let mut entity = Entity::new("enemy")
            .with_position(10.0, 10.0)
            .with_size(8.0, 8.0)
            .with_kind(EntityKind::Shape(ShapeData::new(ShapeNature::Ellipse)));
        entity.refresh_shape();
        let commands = draw_one(&entity, Rect::new(30.0, 40.0, 8.0, 8.0));
        assert!(commands.contains(&DrawCommand::FillEllipse(Rect::new(30.0, 40.0, 8.0, 8.0))));
    }

    #[test]
    fn test_text_layout_and_alignment() {
        let surface = RecordingSurface::new(320, 240);
        let mut entity = text("title", TextData::new("Hello").with_align(Align::Center)).with_position(160.0, 40.0);
        TextPlugin.layout(&mut entity, &surface);
        // 5 chars at 6 px with the default font
        assert_eq!(entity.bounds.size(), Vec2::new(30.0, 14.0));

        let commands = draw_one(&entity, entity.bounds);
        assert!(commands.contains(&DrawCommand::Text { text: "Hello".into(), x: 145.0, y: 40.0 }));
    }

    #[test]
    fn test_button_height_follows_font() {
        let surface = RecordingSurface::new(320, 240);
        let mut entity = button("ok", "OK", Align::Left).with_size(40.0, 12.0);
        ButtonPlugin.layout(&mut entity, &surface);
        assert_eq!(entity.bounds.size(), Vec2::new(40.0, 18.0));
    }
}
