//! Demo scenes and the resources they share

pub mod play;
pub mod title;

pub use play::PlayScene;
pub use title::TitleScene;

use snap_engine::assets::MemoryLoader;

/// Font used for scores and titles
pub const SCORE_FONT: &str = "/fonts/upheavtt.ttf";
/// Font used for every other text
pub const TEXT_FONT: &str = "/fonts/Minecraftia-Regular.ttf";
/// Background of both scenes
pub const BACKGROUND: &str = "/images/backgrounds/forest.jpg";
/// Heart icon, a slice of the tile sheet
pub const HEART: &str = "/images/tiles01.png|0,96,16,16";

/// Register every resource the scenes ask for.
///
/// Nothing is decoded headlessly; the loader only knows the paths and sizes.
pub fn register_resources(loader: &mut MemoryLoader) {
    loader
        .register_font(SCORE_FONT, 18)
        .register_font(TEXT_FONT, 8)
        .register_image(BACKGROUND, 1008, 642)
        .register_image("/images/tiles01.png", 256, 256);
}
