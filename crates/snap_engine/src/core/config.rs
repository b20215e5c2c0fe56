//! # Engine Configuration
//!
//! All runtime settings the core reads: window and buffer sizes, play area,
//! gravity, frame pacing and debug level. Values come from three layers, in
//! increasing priority: defaults, a property set (or TOML/RON file), then
//! command-line `key=value` arguments.
//!
//! Malformed values never abort start-up. They fall back to the default and
//! are reported once through the log.

use serde::{Serialize, Deserialize};
use std::collections::HashSet;

use crate::config::{Config, ConfigError, Properties};

/// Pixel size as `(width, height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse `WIDTHxHEIGHT` (also accepts `,` as separator)
    pub fn parse(raw: &str) -> Option<Self> {
        let (w, h) = raw.trim().split_once(['x', 'X', ','])?;
        Some(Self::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window title, handed to the presentation layer
    pub title: String,
    /// Window size, handed to the presentation layer
    pub window: Size,
    /// Rendering buffer size; camera viewports and the pointer use this space
    pub buffer: Size,
    /// Play area size (origin at 0,0)
    pub play_area: Size,
    /// World gravity scalar
    pub gravity: f64,
    /// Target frames per second
    pub fps: u32,
    /// Target updates per second, paces the frame loop
    pub ups: u32,
    /// Debug level, 0..=5
    pub debug_level: u8,
    /// Debug output filter (comma separated level names)
    pub debug_filter: String,
    /// Stop after the first frame (test mode)
    pub exit: bool,
    /// Stop after this many frames (headless runs)
    pub max_frames: Option<u64>,
}

/// Highest debug level accepted
pub const MAX_DEBUG_LEVEL: u8 = 5;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Demo01".to_string(),
            window: Size::new(640, 480),
            buffer: Size::new(320, 240),
            play_area: Size::new(320, 240),
            gravity: 0.0981,
            fps: 60,
            ups: 60,
            debug_level: 0,
            debug_filter: "ERROR,WARN,INFO".to_string(),
            exit: false,
            max_frames: None,
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Build a configuration from a flat property set
    pub fn from_properties(props: &Properties) -> Self {
        let mut config = Self::default();
        config.apply_properties(props);
        config
    }

    /// Overlay a property set onto this configuration.
    ///
    /// Unknown keys are ignored; malformed values keep the current value and
    /// are logged once per key.
    pub fn apply_properties(&mut self, props: &Properties) {
        let mut reporter = FallbackReporter::default();

        if let Some(title) = props.get("app.window.title") {
            self.title = title.to_string();
        }
        self.window = read_size(props, "app.window", self.window, &mut reporter);
        self.buffer = read_size(props, "app.render.buffer", self.buffer, &mut reporter);

        let area_w = read(props, "app.world.play.area.width", self.play_area.width, &mut reporter);
        let area_h = read(props, "app.world.play.area.height", self.play_area.height, &mut reporter);
        self.play_area = Size::new(area_w, area_h);

        self.gravity = read(props, "app.world.gravity", self.gravity, &mut reporter);
        self.fps = read(props, "app.render.fps", self.fps, &mut reporter);
        self.ups = read(props, "app.update.ups", self.ups, &mut reporter);
        self.exit = read(props, "app.exit", self.exit, &mut reporter);
        if let Some(filter) = props.get("app.debug.filter") {
            self.debug_filter = filter.to_string();
        }
        let level = read(props, "app.debug.level", self.debug_level, &mut reporter);
        self.debug_level = level.min(MAX_DEBUG_LEVEL);
        if let Some(frames) = read_opt::<u64>(props, "app.max.frames", &mut reporter) {
            self.max_frames = Some(frames);
        }
    }

    /// Apply `key=value` command-line arguments.
    ///
    /// Accepted keys (with short aliases): `window|w`, `buffer|b`, `title|t`,
    /// `exit|x`, `debug|d`, `debugFilter|df`, `ups`, `fps`, `frames|f`.
    /// Unknown arguments are ignored with a warning.
    pub fn apply_cli_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut props = Properties::new();
        for arg in args {
            let arg = arg.as_ref();
            log::info!("Configuration|Argument: {arg}");
            let Some((key, value)) = arg.split_once('=') else {
                log::warn!("This argument {arg} is unknown, it is ignored.");
                continue;
            };
            let target = match key {
                "window" | "w" => "app.window.size",
                "buffer" | "b" => "app.render.buffer",
                "title" | "t" => "app.window.title",
                "exit" | "x" => "app.exit",
                "debug" | "d" => "app.debug.level",
                "debugFilter" | "df" => "app.debug.filter",
                "ups" => "app.update.ups",
                "fps" => "app.render.fps",
                "frames" | "f" => "app.max.frames",
                _ => {
                    log::warn!("This argument {arg} is unknown, it is ignored.");
                    continue;
                }
            };
            props.set(target, value);
        }
        self.apply_properties(&props);
    }

    /// Load a configuration file: `.properties` files use the flat format,
    /// anything else goes through [`Config::load_from_file`].
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".properties") {
            Ok(Self::from_properties(&Properties::load(path)?))
        } else {
            <Self as Config>::load_from_file(path)
        }
    }

    /// Whether the debug level is at least `level`
    pub fn is_debug_at_least(&self, level: u8) -> bool {
        self.debug_level >= level
    }
}

/// Logs each fallback key a single time per configuration pass
#[derive(Default)]
struct FallbackReporter {
    reported: HashSet<String>,
}

impl FallbackReporter {
    fn report(&mut self, error: &ConfigError, key: &str) {
        if self.reported.insert(key.to_string()) {
            log::warn!("{error}; keeping default");
        }
    }
}

fn read<T: std::str::FromStr>(
    props: &Properties,
    key: &str,
    current: T,
    reporter: &mut FallbackReporter,
) -> T {
    read_opt(props, key, reporter).unwrap_or(current)
}

fn read_opt<T: std::str::FromStr>(
    props: &Properties,
    key: &str,
    reporter: &mut FallbackReporter,
) -> Option<T> {
    match props.parse_value::<T>(key) {
        Ok(value) => value,
        Err(error) => {
            reporter.report(&error, key);
            None
        }
    }
}

/// Sizes come either as `<prefix>.size=WxH` or as separate
/// `<prefix>.width` / `<prefix>.height` keys; the latter win.
fn read_size(props: &Properties, prefix: &str, current: Size, reporter: &mut FallbackReporter) -> Size {
    let size_key = format!("{prefix}.size");
    let combined_key = if props.get(&size_key).is_some() { size_key } else { prefix.to_string() };
    let mut size = match props.get(&combined_key) {
        Some(raw) if !raw.is_empty() => Size::parse(raw).unwrap_or_else(|| {
            reporter.report(
                &ConfigError::InvalidValue { key: combined_key.clone(), value: raw.to_string() },
                &combined_key,
            );
            current
        }),
        _ => current,
    };
    size.width = read(props, &format!("{prefix}.width"), size.width, reporter);
    size.height = read(props, &format!("{prefix}.height"), size.height, reporter);
    size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.buffer, Size::new(320, 240));
        assert_eq!(config.play_area, Size::new(320, 240));
        assert_eq!(config.ups, 60);
        assert!((config.gravity - 0.0981).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_properties_with_fallback() {
        let props = Properties::parse(
            "app.window.title=Snap\n\
             app.render.buffer.width=400\n\
             app.render.buffer.height=300\n\
             app.world.play.area.width=1000\n\
             app.world.gravity=abc\n\
             app.update.ups=120\n\
             app.debug.level=9\n",
        );
        let config = EngineConfig::from_properties(&props);
        assert_eq!(config.title, "Snap");
        assert_eq!(config.buffer, Size::new(400, 300));
        assert_eq!(config.play_area, Size::new(1000, 240));
        // malformed gravity keeps the default
        assert!((config.gravity - 0.0981).abs() < f64::EPSILON);
        assert_eq!(config.ups, 120);
        assert_eq!(config.debug_level, MAX_DEBUG_LEVEL);
    }

    #[test]
    fn test_cli_args() {
        let mut config = EngineConfig::default();
        config.apply_cli_args(["w=800x600", "b=400x300", "t=Hello", "d=2", "x=true", "bogus", "zz=1"]);
        assert_eq!(config.window, Size::new(800, 600));
        assert_eq!(config.buffer, Size::new(400, 300));
        assert_eq!(config.title, "Hello");
        assert_eq!(config.debug_level, 2);
        assert!(config.exit);
    }

    #[test]
    fn test_size_parse() {
        assert_eq!(Size::parse("320x240"), Some(Size::new(320, 240)));
        assert_eq!(Size::parse("640,480"), Some(Size::new(640, 480)));
        assert_eq!(Size::parse("nope"), None);
    }

    #[test]
    fn test_toml_roundtrip_through_serde() {
        let config = EngineConfig { ups: 30, ..EngineConfig::default() };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
