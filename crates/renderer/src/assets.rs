use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::RenderError;

/// Looks up named shader and image assets.
pub trait AssetSource {
    /// Returns the raw bytes for `name`, or [`RenderError::ResourceNotFound`]
    /// when no such asset exists.
    fn load(&self, name: &str) -> Result<Vec<u8>, RenderError>;

    /// Loads `name` as UTF-8 text.
    fn load_text(&self, name: &str) -> Result<String, RenderError> {
        let bytes = self.load(name)?;
        String::from_utf8(bytes).map_err(|err| RenderError::ResourceRead {
            name: name.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })
    }
}

/// Assets stored as files below a root directory.
#[derive(Clone, Debug)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl AssetSource for AssetDir {
    fn load(&self, name: &str) -> Result<Vec<u8>, RenderError> {
        let path = self.path_of(name);
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::trace!(path = %path.display(), bytes = bytes.len(), "loaded asset");
                Ok(bytes)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(RenderError::ResourceNotFound {
                    name: name.to_string(),
                })
            }
            Err(source) => Err(RenderError::ResourceRead {
                name: name.to_string(),
                source,
            }),
        }
    }
}

/// In-memory assets, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.insert(name.into(), bytes.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(name)
    }
}

impl AssetSource for MemoryAssets {
    fn load(&self, name: &str) -> Result<Vec<u8>, RenderError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::ResourceNotFound {
                name: name.to_string(),
            })
    }
}
