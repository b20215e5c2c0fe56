//! Resource handles and the resource cache
//!
//! Decoding fonts and images is left to a [`ResourceLoader`] supplied by the
//! platform. The core only keeps opaque handles and tolerates their absence:
//! a missing image is simply not drawn.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Opaque font handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontHandle {
    id: u64,
    /// Nominal size in points
    pub size: u32,
}

impl FontHandle {
    /// Wrap a loader-specific id
    pub fn new(id: u64, size: u32) -> Self {
        Self { id, size }
    }

    /// Loader-specific id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Same font at another size
    pub fn with_size(&self, size: u32) -> Self {
        Self { id: self.id, size }
    }
}

/// Opaque drawable image handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    id: u64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageHandle {
    /// Wrap a loader-specific id
    pub fn new(id: u64, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Loader-specific id
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Resource loading errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// Nothing exists at that path
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The extension maps to no known resource kind
    #[error("Unsupported resource kind: {0}")]
    UnsupportedKind(String),

    /// The `|x,y,w,h` suffix could not be parsed
    #[error("Invalid image slice in '{0}'")]
    InvalidSlice(String),
}

/// Sub-rectangle of a source image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlice {
    /// Left
    pub x: u32,
    /// Top
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

/// Image path with an optional slice, written `path|x,y,w,h`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// File path without the slice suffix
    pub path: String,
    /// Requested sub-rectangle
    pub slice: Option<ImageSlice>,
}

impl ImageRequest {
    /// Parse a path, splitting off the slice suffix if any
    pub fn parse(raw: &str) -> Result<Self, ResourceError> {
        let Some((path, slice)) = raw.rsplit_once('|') else {
            return Ok(Self { path: raw.to_string(), slice: None });
        };
        let parts = slice
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ResourceError::InvalidSlice(raw.to_string()))?;
        let [x, y, width, height] = parts[..] else {
            return Err(ResourceError::InvalidSlice(raw.to_string()));
        };
        Ok(Self {
            path: path.to_string(),
            slice: Some(ImageSlice { x, y, width, height }),
        })
    }
}

/// Kind of resource a path designates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// TrueType font
    Font,
    /// PNG or JPEG image
    Image,
}

impl ResourceKind {
    /// Detect the kind from the extension, ignoring any slice suffix
    pub fn from_path(path: &str) -> Result<Self, ResourceError> {
        let file = path.rsplit_once('|').map_or(path, |(file, _)| file);
        let ext = file.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("ttf") => Ok(Self::Font),
            Some("png" | "jpg" | "jpeg") => Ok(Self::Image),
            _ => Err(ResourceError::UnsupportedKind(path.to_string())),
        }
    }
}

/// Turns paths into handles. Implemented by the platform layer.
pub trait ResourceLoader {
    /// Load a font
    fn load_font(&mut self, path: &str) -> Result<FontHandle, ResourceError>;

    /// Load an image, sliced if requested
    fn load_image(&mut self, request: &ImageRequest) -> Result<ImageHandle, ResourceError>;
}

/// Loader serving resources registered up front, with no file access.
///
/// Used by headless runs and tests.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    fonts: HashMap<String, u32>,
    images: HashMap<String, (u32, u32)>,
    next_id: u64,
}

impl MemoryLoader {
    /// Empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a font available
    pub fn register_font(&mut self, path: impl Into<String>, size: u32) -> &mut Self {
        self.fonts.insert(path.into(), size);
        self
    }

    /// Make an image available
    pub fn register_image(&mut self, path: impl Into<String>, width: u32, height: u32) -> &mut Self {
        self.images.insert(path.into(), (width, height));
        self
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl ResourceLoader for MemoryLoader {
    fn load_font(&mut self, path: &str) -> Result<FontHandle, ResourceError> {
        let size = *self.fonts.get(path).ok_or_else(|| ResourceError::NotFound(path.to_string()))?;
        Ok(FontHandle::new(self.next_id(), size))
    }

    fn load_image(&mut self, request: &ImageRequest) -> Result<ImageHandle, ResourceError> {
        let (width, height) = *self
            .images
            .get(&request.path)
            .ok_or_else(|| ResourceError::NotFound(request.path.clone()))?;
        let (width, height) = match request.slice {
            Some(slice) => {
                if slice.x + slice.width > width || slice.y + slice.height > height {
                    return Err(ResourceError::InvalidSlice(request.path.clone()));
                }
                (slice.width, slice.height)
            }
            None => (width, height),
        };
        Ok(ImageHandle::new(self.next_id(), width, height))
    }
}

/// A loaded resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Font handle
    Font(FontHandle),
    /// Image handle
    Image(ImageHandle),
}

/// Memoizing front of a [`ResourceLoader`].
///
/// Failed loads are remembered too, so each missing path is reported once
/// and then answered with `None`.
pub struct ResourceCache {
    loader: Box<dyn ResourceLoader>,
    loaded: HashMap<String, Resource>,
    failed: HashSet<String>,
}

impl ResourceCache {
    /// Cache in front of `loader`
    pub fn new(loader: Box<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Load (or fetch from the cache) whatever `path` designates
    pub fn get(&mut self, path: &str) -> Option<Resource> {
        if let Some(resource) = self.loaded.get(path) {
            return Some(resource.clone());
        }
        if self.failed.contains(path) {
            return None;
        }
        match self.load(path) {
            Ok(resource) => {
                log::debug!("Loaded resource {path}");
                self.loaded.insert(path.to_string(), resource.clone());
                Some(resource)
            }
            Err(error) => {
                log::warn!("Unable to load resource: {error}");
                self.failed.insert(path.to_string());
                None
            }
        }
    }

    /// Font at `path`, `None` if it is missing or not a font
    pub fn font(&mut self, path: &str) -> Option<FontHandle> {
        match self.get(path)? {
            Resource::Font(font) => Some(font),
            Resource::Image(_) => None,
        }
    }

    /// Image at `path`, `None` if it is missing or not an image
    pub fn image(&mut self, path: &str) -> Option<ImageHandle> {
        match self.get(path)? {
            Resource::Image(image) => Some(image),
            Resource::Font(_) => None,
        }
    }

    /// Number of successfully loaded resources
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether nothing has been loaded
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    fn load(&mut self, path: &str) -> Result<Resource, ResourceError> {
        match ResourceKind::from_path(path)? {
            ResourceKind::Font => self.loader.load_font(path).map(Resource::Font),
            ResourceKind::Image => {
                let request = ImageRequest::parse(path)?;
                self.loader.load_image(&request).map(Resource::Image)
            }
        }
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(Box::new(MemoryLoader::new()))
    }
}
