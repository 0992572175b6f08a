use std::collections::HashMap;
use std::rc::Rc;

use crate::assets::AssetSource;
use crate::error::RenderError;
use crate::gl::{GlApi, Program, Shader, UniformLocation};
use crate::scope::ScopedResource;
use crate::types::ShaderStage;

/// Lifecycle of the linked program object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramState {
    /// Nothing allocated.
    Empty,
    /// Program object exists; stages are being compiled and attached.
    Created,
    /// Linked and uniform locations resolved.
    Ready,
    /// Link failed. Terminal: the program is only good for release.
    LinkFailed,
}

/// A value uploaded to a named uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    /// Column-major 3x3 matrix.
    Mat3([f32; 9]),
}

/// Vertex + fragment program compiled from named text assets.
pub struct ShaderProgram<G: GlApi> {
    gl: Rc<G>,
    assets: Rc<dyn AssetSource>,
    sources: [(ShaderStage, String); 2],
    uniform_names: Vec<&'static str>,
    program: Option<Program>,
    stages: Vec<Shader>,
    uniforms: HashMap<&'static str, Option<UniformLocation>>,
    state: ProgramState,
}

impl<G: GlApi> ShaderProgram<G> {
    /// `uniform_names` lists every uniform the caller will set; their
    /// locations are resolved once after linking.
    pub fn new(
        gl: Rc<G>,
        assets: Rc<dyn AssetSource>,
        vertex: impl Into<String>,
        fragment: impl Into<String>,
        uniform_names: &[&'static str],
    ) -> Self {
        Self {
            gl,
            assets,
            sources: [
                (ShaderStage::Vertex, vertex.into()),
                (ShaderStage::Fragment, fragment.into()),
            ],
            uniform_names: uniform_names.to_vec(),
            program: None,
            stages: Vec::new(),
            uniforms: HashMap::new(),
            state: ProgramState::Empty,
        }
    }

    pub fn state(&self) -> ProgramState {
        self.state
    }

    /// Resolved location for `name`.
    ///
    /// `None` covers both names the driver optimised away and names that
    /// were never requested.
    pub fn uniform_location(&self, name: &str) -> Option<&UniformLocation> {
        self.uniforms.get(name).and_then(Option::as_ref)
    }

    pub fn bind(&self) {
        self.gl.use_program(self.program);
    }

    pub fn unbind(&self) {
        self.gl.use_program(None);
    }

    /// Uploads `value` to `name` on the program currently in use.
    ///
    /// Unresolved names are skipped without touching GL.
    pub fn set_uniform(&self, name: &str, value: UniformValue) {
        let Some(location) = self.uniform_location(name) else {
            return;
        };
        match value {
            UniformValue::Float(x) => self.gl.uniform_1_f32(location, x),
            UniformValue::Int(x) => self.gl.uniform_1_i32(location, x),
            UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(location, x, y),
            UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(location, x, y, z),
            UniformValue::Mat3(values) => self.gl.uniform_matrix_3_f32(location, &values),
        }
    }

    fn compile_stage(&self, stage: ShaderStage, name: &str) -> Result<Shader, RenderError> {
        let source = self.assets.load_text(name)?;
        let shader = self
            .gl
            .create_shader(stage)
            .map_err(RenderError::allocation("shader"))?;
        self.gl.shader_source(shader, &source);
        self.gl.compile_shader(shader);
        if !self.gl.shader_compile_status(shader) {
            let log = self.gl.shader_info_log(shader);
            self.gl.delete_shader(shader);
            return Err(RenderError::ShaderCompile {
                stage,
                name: name.to_string(),
                log,
            });
        }
        tracing::debug!(%stage, shader = name, "compiled shader stage");
        Ok(shader)
    }

    fn resolve_uniforms(&mut self, program: Program) {
        for &name in &self.uniform_names {
            let location = self.gl.uniform_location(program, name);
            if location.is_none() {
                tracing::debug!(uniform = name, "uniform not active; updates will be ignored");
            }
            self.uniforms.insert(name, location);
        }
    }
}

impl<G: GlApi> ScopedResource for ShaderProgram<G> {
    fn acquire(&mut self) -> Result<(), RenderError> {
        let program = self
            .gl
            .create_program()
            .map_err(RenderError::allocation("program"))?;
        self.program = Some(program);
        self.state = ProgramState::Created;

        for (stage, name) in &self.sources {
            let shader = self.compile_stage(*stage, name)?;
            self.stages.push(shader);
            self.gl.attach_shader(program, shader);
        }

        self.gl.link_program(program);
        if !self.gl.program_link_status(program) {
            self.state = ProgramState::LinkFailed;
            return Err(RenderError::ShaderLink {
                log: self.gl.program_info_log(program),
            });
        }

        self.resolve_uniforms(program);
        self.state = ProgramState::Ready;
        tracing::info!(
            vertex = %self.sources[0].1,
            fragment = %self.sources[1].1,
            "linked shader program"
        );
        Ok(())
    }

    fn release(&mut self) {
        for shader in self.stages.drain(..) {
            self.gl.delete_shader(shader);
        }
        if let Some(program) = self.program.take() {
            self.gl.delete_program(program);
        }
        self.uniforms.clear();
        self.state = ProgramState::Empty;
    }
}
