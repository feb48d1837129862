//! Per-document state: the loaded manifest, the last browsed file and the
//! decoded environment image.

use iblkit_core::{Error, Manifest, Result};
use iblkit_lighting::EnvironmentImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Decodes environment images for a session.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<EnvironmentImage>;
}

/// Decodes from disk with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load(&self, path: &Path) -> Result<EnvironmentImage> {
        EnvironmentImage::open(path)
    }
}

/// The part of a session that hosts save with their document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub last_browsed_path: Option<PathBuf>,
    pub manifest: Option<Manifest>,
}

impl PersistedState {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Persist(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::Persist(e.to_string()))
    }
}

pub struct IblSession {
    last_browsed_path: Option<PathBuf>,
    manifest: Option<Manifest>,
    environment: Option<(PathBuf, EnvironmentImage)>,
    loader: Box<dyn ImageLoader>,
}

impl IblSession {
    pub fn new() -> Self {
        Self::with_loader(Box::new(FileImageLoader))
    }

    pub fn with_loader(loader: Box<dyn ImageLoader>) -> Self {
        Self {
            last_browsed_path: None,
            manifest: None,
            environment: None,
            loader,
        }
    }

    /// Loads `path` as the session's manifest. On failure the previous
    /// manifest is kept.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<&Manifest> {
        let path = path.as_ref();
        let manifest = Manifest::load(path)?;
        self.last_browsed_path = Some(path.to_path_buf());
        Ok(self.set_manifest(manifest))
    }

    pub fn set_manifest(&mut self, manifest: Manifest) -> &Manifest {
        self.environment = None;
        self.manifest.insert(manifest)
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    pub fn last_browsed_path(&self) -> Option<&Path> {
        self.last_browsed_path.as_deref()
    }

    /// Decoded image at `path`, loaded on first use and cached until a
    /// different path is requested or the manifest changes.
    pub fn environment_image(&mut self, path: &Path) -> Result<&EnvironmentImage> {
        let cached = matches!(&self.environment, Some((cached, _)) if cached == path);
        if !cached {
            let image = self.loader.load(path)?;
            self.environment = Some((path.to_path_buf(), image));
        }
        match &self.environment {
            Some((_, image)) => Ok(image),
            None => Err(Error::Image(format!("{} not loaded", path.display()))),
        }
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            last_browsed_path: self.last_browsed_path.clone(),
            manifest: self.manifest.clone(),
        }
    }

    pub fn persist(&self) -> Result<Vec<u8>> {
        self.persisted_state().to_bytes()
    }

    /// Replaces the browsed path and manifest with a saved state.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<()> {
        let state = PersistedState::from_bytes(bytes)?;
        self.last_browsed_path = state.last_browsed_path;
        self.manifest = state.manifest;
        self.environment = None;
        Ok(())
    }
}

impl Default for IblSession {
    fn default() -> Self {
        Self::new()
    }
}
