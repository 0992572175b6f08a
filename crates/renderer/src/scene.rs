use std::rc::Rc;
use std::time::Instant;

use crate::assets::AssetSource;
use crate::camera::CameraPose;
use crate::error::RenderError;
use crate::gl::GlApi;
use crate::mesh::{QuadMesh, QUAD_VERTEX_COUNT};
use crate::program::{ShaderProgram, UniformValue};
use crate::scope::{acquire_all, release_all, ScopedResource};
use crate::texture::GpuTexture;
use crate::types::SceneAssets;

pub const SKYMAP_UNIT: u32 = 0;
pub const DUSTMAP_UNIT: u32 = 1;

/// Uniform names the fragment shader may read.
pub const SCENE_UNIFORMS: [&str; 7] = [
    "screenSize",
    "aspect",
    "skymap",
    "dustmap",
    "time",
    "cameraPos",
    "cameraDir",
];

/// Whether [`SceneRenderer::render`] reached the draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// The framebuffer has no area yet (minimised, or before the first
    /// `begin_frame`).
    Skipped,
}

/// `[width / height, 1.0]`; `[1.0, 1.0]` while the height is zero.
pub fn aspect_uniform(width: u32, height: u32) -> [f32; 2] {
    if height == 0 {
        return [1.0, 1.0];
    }
    [width as f32 / height as f32, 1.0]
}

/// The single full-screen pass: quad mesh, shader program and the sky and
/// dust textures.
pub struct SceneRenderer<G: GlApi> {
    gl: Rc<G>,
    mesh: QuadMesh<G>,
    program: ShaderProgram<G>,
    skymap: GpuTexture<G>,
    dustmap: GpuTexture<G>,
    started: Instant,
}

impl<G: GlApi> SceneRenderer<G> {
    pub fn new(gl: Rc<G>, assets: Rc<dyn AssetSource>, names: &SceneAssets) -> Self {
        Self {
            mesh: QuadMesh::new(gl.clone()),
            program: ShaderProgram::new(
                gl.clone(),
                assets.clone(),
                names.vertex_shader.as_str(),
                names.fragment_shader.as_str(),
                &SCENE_UNIFORMS,
            ),
            skymap: GpuTexture::new(gl.clone(), assets.clone(), names.skymap.as_str()),
            dustmap: GpuTexture::new(gl.clone(), assets, names.dustmap.as_str()),
            gl,
            started: Instant::now(),
        }
    }

    pub fn program(&self) -> &ShaderProgram<G> {
        &self.program
    }

    /// Seconds since this renderer was constructed.
    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Draws one frame into a `width` x `height` framebuffer.
    pub fn render(&mut self, width: u32, height: u32) -> Result<FrameOutcome, RenderError> {
        let seconds = self.elapsed();
        self.render_at(seconds, width, height)
    }

    /// Draws the frame for an explicit timestamp.
    pub fn render_at(
        &mut self,
        seconds: f32,
        width: u32,
        height: u32,
    ) -> Result<FrameOutcome, RenderError> {
        if width == 0 || height == 0 {
            tracing::trace!(width, height, "framebuffer has no area; skipping draw");
            return Ok(FrameOutcome::Skipped);
        }

        self.gl.viewport(0, 0, width as i32, height as i32);
        self.gl.clear_color_and_depth();
        self.gl.disable_face_culling();

        self.mesh.bind();
        self.program.bind();
        let drawn = self.draw_bound(seconds, width, height);
        let reset = self.unbind_all();
        drawn.and(reset)?;

        tracing::trace!(seconds, width, height, "drew frame");
        Ok(FrameOutcome::Drawn)
    }

    fn draw_bound(&self, seconds: f32, width: u32, height: u32) -> Result<(), RenderError> {
        self.skymap.bind(SKYMAP_UNIT)?;
        self.dustmap.bind(DUSTMAP_UNIT)?;

        let pose = CameraPose::at(seconds);
        let program = &self.program;
        program.set_uniform(
            "screenSize",
            UniformValue::Vec2([width as f32, height as f32]),
        );
        program.set_uniform("aspect", UniformValue::Vec2(aspect_uniform(width, height)));
        program.set_uniform("skymap", UniformValue::Int(SKYMAP_UNIT as i32));
        program.set_uniform("dustmap", UniformValue::Int(DUSTMAP_UNIT as i32));
        program.set_uniform("time", UniformValue::Float(seconds));
        program.set_uniform("cameraPos", UniformValue::Vec3(pose.position.to_array()));
        program.set_uniform("cameraDir", UniformValue::Mat3(pose.orientation_cols()));

        self.gl.draw_triangles(0, QUAD_VERTEX_COUNT);
        Ok(())
    }

    /// Runs every unbind step even when an earlier one fails; the first
    /// failure is returned.
    fn unbind_all(&self) -> Result<(), RenderError> {
        let dustmap = self.dustmap.unbind(DUSTMAP_UNIT);
        let skymap = self.skymap.unbind(SKYMAP_UNIT);
        self.program.unbind();
        self.mesh.unbind();
        dustmap.and(skymap)
    }
}

impl<G: GlApi> ScopedResource for SceneRenderer<G> {
    /// Acquires mesh, program, sky map and dust map in that order; release
    /// runs the other way round so buffers outlive their last bind.
    fn acquire(&mut self) -> Result<(), RenderError> {
        acquire_all(&mut [
            &mut self.mesh,
            &mut self.program,
            &mut self.skymap,
            &mut self.dustmap,
        ])?;
        tracing::info!(
            skymap = %self.skymap.name(),
            skymap_size = ?self.skymap.size(),
            dustmap = %self.dustmap.name(),
            dustmap_size = ?self.dustmap.size(),
            "scene resources ready"
        );
        Ok(())
    }

    fn release(&mut self) {
        release_all(&mut [
            &mut self.mesh,
            &mut self.program,
            &mut self.skymap,
            &mut self.dustmap,
        ]);
    }
}
