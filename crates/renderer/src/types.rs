use std::fmt;

/// Window size and title used when no configuration overrides them.
pub const DEFAULT_WINDOW_WIDTH: u32 = 960;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 540;
pub const DEFAULT_WINDOW_TITLE: &str = "Gravity";

/// Programmable pipeline stages compiled by [`crate::ShaderProgram`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// GL enum passed to `glCreateShader`.
    pub fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Parameters for the window and the GL context created by
/// [`crate::FrameSurface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Requested OpenGL version; the context always uses the core profile.
    pub gl_version: (u8, u8),
    /// Present with a swap interval of one frame.
    pub vsync: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            title: DEFAULT_WINDOW_TITLE.to_string(),
            gl_version: (3, 3),
            vsync: true,
        }
    }
}

/// Asset names the scene loads through an [`crate::AssetSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneAssets {
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub skymap: String,
    pub dustmap: String,
}

impl Default for SceneAssets {
    fn default() -> Self {
        Self {
            vertex_shader: "vsh.glsl".to_string(),
            fragment_shader: "fsh.glsl".to_string(),
            skymap: "skymap.png".to_string(),
            dustmap: "dust.png".to_string(),
        }
    }
}
