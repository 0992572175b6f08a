//! The slice of OpenGL the demo touches.
//!
//! Every draw and bind targets the one context made current by
//! [`crate::FrameSurface`]; nothing here generalises to multiple contexts.
//! [`GlApi`] is implemented for `glow::Context` and, in tests, for a
//! recording fake so the resource lifecycle can be exercised without a GPU.

use glow::HasContext;

use crate::error::RenderError;
use crate::types::ShaderStage;

pub type Texture = glow::NativeTexture;
pub type Shader = glow::NativeShader;
pub type Program = glow::NativeProgram;
pub type Buffer = glow::NativeBuffer;
pub type VertexArray = glow::NativeVertexArray;
pub type UniformLocation = glow::NativeUniformLocation;

/// GL entry points used by textures, programs, the quad mesh and the scene.
///
/// Implementations assume the owning context is current on the calling
/// thread.
pub trait GlApi {
    fn get_error(&self) -> u32;

    fn create_texture(&self) -> Result<Texture, String>;
    fn delete_texture(&self, texture: Texture);
    fn active_texture(&self, unit: u32);
    fn bind_texture_2d(&self, texture: Option<Texture>);
    fn tex_image_2d_rgba8(&self, width: i32, height: i32, pixels: &[u8]);
    fn tex_parameter_2d(&self, parameter: u32, value: i32);
    fn generate_mipmap_2d(&self);

    fn create_shader(&self, stage: ShaderStage) -> Result<Shader, String>;
    fn shader_source(&self, shader: Shader, source: &str);
    fn compile_shader(&self, shader: Shader);
    fn shader_compile_status(&self, shader: Shader) -> bool;
    fn shader_info_log(&self, shader: Shader) -> String;
    fn delete_shader(&self, shader: Shader);

    fn create_program(&self) -> Result<Program, String>;
    fn attach_shader(&self, program: Program, shader: Shader);
    fn link_program(&self, program: Program);
    fn program_link_status(&self, program: Program) -> bool;
    fn program_info_log(&self, program: Program) -> String;
    fn delete_program(&self, program: Program);
    fn use_program(&self, program: Option<Program>);
    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation>;

    fn uniform_1_f32(&self, location: &UniformLocation, x: f32);
    fn uniform_1_i32(&self, location: &UniformLocation, x: i32);
    fn uniform_2_f32(&self, location: &UniformLocation, x: f32, y: f32);
    fn uniform_3_f32(&self, location: &UniformLocation, x: f32, y: f32, z: f32);
    /// Uploads a column-major 3x3 matrix without transposing.
    fn uniform_matrix_3_f32(&self, location: &UniformLocation, values: &[f32; 9]);

    fn create_vertex_array(&self) -> Result<VertexArray, String>;
    fn delete_vertex_array(&self, vertex_array: VertexArray);
    fn bind_vertex_array(&self, vertex_array: Option<VertexArray>);
    fn create_buffer(&self) -> Result<Buffer, String>;
    fn delete_buffer(&self, buffer: Buffer);
    fn bind_array_buffer(&self, buffer: Option<Buffer>);
    fn array_buffer_data_static(&self, data: &[u8]);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color_and_depth(&self);
    fn disable_face_culling(&self);
    fn draw_triangles(&self, first: i32, count: i32);
}

/// Fails with [`RenderError::Gpu`] when the driver has an error queued.
///
/// Call it right after the operation under suspicion so the reported code
/// belongs to that call.
pub fn check_error<G: GlApi + ?Sized>(gl: &G) -> Result<(), RenderError> {
    match gl.get_error() {
        glow::NO_ERROR => Ok(()),
        code => Err(RenderError::Gpu { code }),
    }
}

// SAFETY (all blocks below): `glow::Context` is only constructed by
// `FrameSurface` after its context was made current on this thread, and the
// handles passed in were created by the same context.
impl GlApi for glow::Context {
    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn create_texture(&self) -> Result<Texture, String> {
        unsafe { HasContext::create_texture(self) }
    }

    fn delete_texture(&self, texture: Texture) {
        unsafe { HasContext::delete_texture(self, texture) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, glow::TEXTURE0 + unit) }
    }

    fn bind_texture_2d(&self, texture: Option<Texture>) {
        unsafe { self.bind_texture(glow::TEXTURE_2D, texture) }
    }

    fn tex_image_2d_rgba8(&self, width: i32, height: i32, pixels: &[u8]) {
        unsafe {
            self.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            )
        }
    }

    fn tex_parameter_2d(&self, parameter: u32, value: i32) {
        unsafe { self.tex_parameter_i32(glow::TEXTURE_2D, parameter, value) }
    }

    fn generate_mipmap_2d(&self) {
        unsafe { self.generate_mipmap(glow::TEXTURE_2D) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<Shader, String> {
        unsafe { HasContext::create_shader(self, stage.gl_kind()) }
    }

    fn shader_source(&self, shader: Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Program, shader: Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn uniform_1_f32(&self, location: &UniformLocation, x: f32) {
        unsafe { HasContext::uniform_1_f32(self, Some(location), x) }
    }

    fn uniform_1_i32(&self, location: &UniformLocation, x: i32) {
        unsafe { HasContext::uniform_1_i32(self, Some(location), x) }
    }

    fn uniform_2_f32(&self, location: &UniformLocation, x: f32, y: f32) {
        unsafe { HasContext::uniform_2_f32(self, Some(location), x, y) }
    }

    fn uniform_3_f32(&self, location: &UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { HasContext::uniform_3_f32(self, Some(location), x, y, z) }
    }

    fn uniform_matrix_3_f32(&self, location: &UniformLocation, values: &[f32; 9]) {
        unsafe { self.uniform_matrix_3_f32_slice(Some(location), false, values) }
    }

    fn create_vertex_array(&self) -> Result<VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array) }
    }

    fn create_buffer(&self) -> Result<Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn delete_buffer(&self, buffer: Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn bind_array_buffer(&self, buffer: Option<Buffer>) {
        unsafe { self.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data_static(&self, data: &[u8]) {
        unsafe { self.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(
                self,
                index,
                size,
                glow::FLOAT,
                false,
                stride,
                offset,
            )
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }

    fn clear_color_and_depth(&self) {
        unsafe { self.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT) }
    }

    fn disable_face_culling(&self) {
        unsafe { self.disable(glow::CULL_FACE) }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { self.draw_arrays(glow::TRIANGLES, first, count) }
    }
}
