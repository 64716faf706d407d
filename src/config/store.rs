use super::{codec, Settings};
use crate::backend::{BackendFactory, IoBackend};
use crate::cli::IoMethod;
use crate::error::BackendError;
use std::path::{Path, PathBuf};

/// Loads and saves [`Settings`] at a fixed path through a chosen I/O method.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to the defaults on any failure.
    ///
    /// Failures are not reported here; use [`try_load`](Self::try_load) when
    /// the caller wants to log why the defaults were used.
    pub fn load(&self, method: IoMethod) -> Settings {
        self.try_load(method).unwrap_or_default()
    }

    /// Load settings, returning the backend error if the file could not be read.
    pub fn try_load(&self, method: IoMethod) -> anyhow::Result<Settings> {
        let backend = BackendFactory::create(method)?;
        let settings = self.load_with(backend.as_ref())?;
        Ok(settings)
    }

    /// Load through an explicit backend instance.
    pub fn load_with(&self, backend: &dyn IoBackend) -> Result<Settings, BackendError> {
        let bytes = backend.read(&self.path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(codec::decode(&text))
    }

    /// Encode and write the full settings file, replacing any previous content.
    pub fn save(&self, method: IoMethod, settings: &Settings) -> anyhow::Result<()> {
        let backend = BackendFactory::create(method)?;
        self.save_with(backend.as_ref(), settings)?;
        Ok(())
    }

    /// Save through an explicit backend instance.
    pub fn save_with(&self, backend: &dyn IoBackend, settings: &Settings) -> Result<(), BackendError> {
        let text = codec::encode(settings);
        backend.write(&self.path, text.as_bytes())
    }
}
