//! Optional decorative assets (institutional logo, municipal seal).
//!
//! Assets never abort a render: a reference that cannot be loaded or
//! decoded is logged and drawn as a blank placeholder.

use crate::error::{Error, Result};
use crate::writer::ImageData;
use std::path::PathBuf;

/// Resolves asset references to raw image bytes.
pub trait AssetLoader: Send + Sync {
    /// Load the bytes behind `reference`.
    fn load(&self, reference: &str) -> Result<Vec<u8>>;
}

/// Loader that has no assets; every reference is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetLoader for NoAssets {
    fn load(&self, reference: &str) -> Result<Vec<u8>> {
        Err(Error::AssetUnavailable(format!("no asset loader configured for '{}'", reference)))
    }
}

/// Loads assets from files below a base directory.
#[derive(Debug, Clone)]
pub struct FileAssetLoader {
    base_dir: PathBuf,
}

impl FileAssetLoader {
    /// Resolve references relative to `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl AssetLoader for FileAssetLoader {
    fn load(&self, reference: &str) -> Result<Vec<u8>> {
        let path = self.base_dir.join(reference);
        std::fs::read(&path)
            .map_err(|e| Error::AssetUnavailable(format!("{}: {}", path.display(), e)))
    }
}

/// Asset references for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderAssets {
    /// Institutional logo, top left
    pub logo: Option<String>,
    /// Municipal seal, top right
    pub seal: Option<String>,
}

impl RenderAssets {
    /// No logo and no seal.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the logo reference.
    pub fn with_logo(mut self, reference: impl Into<String>) -> Self {
        self.logo = Some(reference.into());
        self
    }

    /// Set the seal reference.
    pub fn with_seal(mut self, reference: impl Into<String>) -> Self {
        self.seal = Some(reference.into());
        self
    }

    /// Load and decode both assets.
    pub fn resolve(&self, loader: &dyn AssetLoader) -> ResolvedAssets {
        ResolvedAssets {
            logo: AssetSlot::resolve(loader, self.logo.as_deref()),
            seal: AssetSlot::resolve(loader, self.seal.as_deref()),
        }
    }
}

/// Outcome of resolving one asset reference.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSlot {
    /// No reference given; nothing is drawn
    Empty,
    /// Decoded image
    Loaded(ImageData),
    /// Reference given but unusable; a placeholder is drawn
    Unavailable,
}

impl AssetSlot {
    fn resolve(loader: &dyn AssetLoader, reference: Option<&str>) -> Self {
        let Some(reference) = reference else {
            return AssetSlot::Empty;
        };
        let image = loader
            .load(reference)
            .and_then(|bytes| ImageData::from_bytes(&bytes).map_err(Error::from));
        match image {
            Ok(image) => {
                log::debug!("Loaded asset '{}' ({}x{})", reference, image.width, image.height);
                AssetSlot::Loaded(image)
            },
            Err(e) => {
                let err = match e {
                    Error::AssetUnavailable(_) => e,
                    other => Error::AssetUnavailable(format!("'{}': {}", reference, other)),
                };
                log::warn!("{}; drawing placeholder", err);
                AssetSlot::Unavailable
            },
        }
    }
}

/// Both asset slots for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssets {
    /// Logo slot
    pub logo: AssetSlot,
    /// Seal slot
    pub seal: AssetSlot,
}

impl ResolvedAssets {
    /// True when either slot will put something on the page.
    pub fn any_drawn(&self) -> bool {
        !matches!((&self.logo, &self.seal), (AssetSlot::Empty, AssetSlot::Empty))
    }
}

impl Default for ResolvedAssets {
    fn default() -> Self {
        Self {
            logo: AssetSlot::Empty,
            seal: AssetSlot::Empty,
        }
    }
}
