//! Renderer crate for Gravity, a raymarched-shader demo.
//!
//! The host side is a window with an OpenGL 3.3 core context, a full-screen
//! quad, two textures and one program whose fragment stage does all the
//! visual work. Everything else is lifecycle:
//!
//! ```text
//!   FrameSurface::acquire ──▶ glow::Context (Rc, single context)
//!          │                         │
//!          ▼                         ▼
//!   loop { begin_frame ──▶ SceneRenderer::render ──▶ end_frame }
//!                                    │
//!                                    └─▶ QuadMesh + ShaderProgram + 2 × GpuTexture
//! ```
//!
//! Every GPU or platform object implements [`ScopedResource`]; composition
//! goes through [`acquire_all`] / [`release_all`] / [`using`] so startup
//! failures release exactly what was already allocated, in reverse order.
//! GL calls go through the [`GlApi`] seam, implemented for `glow::Context`.

mod assets;
mod camera;
mod error;
mod gl;
mod mesh;
mod program;
mod scene;
mod scope;
mod surface;
mod texture;
mod types;

#[cfg(test)]
mod fake_gl;

pub use assets::{AssetDir, AssetSource, MemoryAssets};
pub use camera::CameraPose;
pub use error::RenderError;
pub use gl::{check_error, GlApi};
pub use mesh::{QuadMesh, QUAD_VERTICES};
pub use program::{ProgramState, ShaderProgram, UniformValue};
pub use scene::{aspect_uniform, FrameOutcome, SceneRenderer, SCENE_UNIFORMS};
pub use scope::{acquire_all, release_all, using, ScopedResource};
pub use surface::FrameSurface;
pub use texture::GpuTexture;
pub use types::{
    SceneAssets, ShaderStage, SurfaceConfig, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_TITLE,
    DEFAULT_WINDOW_WIDTH,
};
