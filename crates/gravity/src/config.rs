use std::fs;
use std::io;
use std::path::Path;

use renderer::{SceneAssets, SurfaceConfig};
use serde::{Deserialize, Serialize};

/// Optional overrides looked up next to the bundled assets.
pub const CONFIG_FILE_NAME: &str = "gravity.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub window: WindowSection,
    pub assets: AssetSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub gl_major: u8,
    pub gl_minor: u8,
    pub vsync: bool,
}

impl Default for WindowSection {
    fn default() -> Self {
        let surface = SurfaceConfig::default();
        Self {
            width: surface.width,
            height: surface.height,
            title: surface.title,
            gl_major: surface.gl_version.0,
            gl_minor: surface.gl_version.1,
            vsync: surface.vsync,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetSection {
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub skymap: String,
    pub dustmap: String,
}

impl Default for AssetSection {
    fn default() -> Self {
        let assets = SceneAssets::default();
        Self {
            vertex_shader: assets.vertex_shader,
            fragment_shader: assets.fragment_shader,
            skymap: assets.skymap,
            dustmap: assets.dustmap,
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads [`CONFIG_FILE_NAME`] from `dir`, falling back to the defaults
    /// when the file does not exist.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loaded configuration overrides");
                Self::from_toml_str(&contents)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.window.gl_major < 3 || (self.window.gl_major == 3 && self.window.gl_minor < 2) {
            return Err(ConfigError::Invalid(format!(
                "core profile needs OpenGL 3.2 or newer, got {}.{}",
                self.window.gl_major, self.window.gl_minor
            )));
        }
        let names = [
            ("vertex_shader", &self.assets.vertex_shader),
            ("fragment_shader", &self.assets.fragment_shader),
            ("skymap", &self.assets.skymap),
            ("dustmap", &self.assets.dustmap),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("assets.{key} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn surface(&self) -> SurfaceConfig {
        SurfaceConfig {
            width: self.window.width,
            height: self.window.height,
            title: self.window.title.clone(),
            gl_version: (self.window.gl_major, self.window.gl_minor),
            vsync: self.window.vsync,
        }
    }

    pub fn scene_assets(&self) -> SceneAssets {
        SceneAssets {
            vertex_shader: self.assets.vertex_shader.clone(),
            fragment_shader: self.assets.fragment_shader.clone(),
            skymap: self.assets.skymap.clone(),
            dustmap: self.assets.dustmap.clone(),
        }
    }
}
