//! Recording stand-in for a GL context used by the unit tests.
//!
//! Object names are handed out from a counter and tracked per kind so tests
//! can assert that nothing leaks. A shader "compiles" when its braces
//! balance, and a uniform resolves when an attached source declares it.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::num::NonZeroU32;

use crate::gl::{Buffer, GlApi, Program, Shader, Texture, UniformLocation, VertexArray};
use crate::types::ShaderStage;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum UniformWrite {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Mat3([f32; 9]),
}

#[derive(Default)]
struct FakeState {
    next_name: u32,
    live_textures: BTreeSet<u32>,
    live_shaders: BTreeSet<u32>,
    live_programs: BTreeSet<u32>,
    live_buffers: BTreeSet<u32>,
    live_vertex_arrays: BTreeSet<u32>,
    deleted: Vec<(&'static str, u32)>,
    shader_sources: BTreeMap<u32, String>,
    compiled: BTreeMap<u32, bool>,
    attachments: BTreeMap<u32, Vec<u32>>,
    linked: BTreeMap<u32, bool>,
    uniform_names: BTreeMap<u32, String>,
    uniform_writes: Vec<(String, UniformWrite)>,
    bound_texture_units: BTreeMap<u32, Option<u32>>,
    active_unit: u32,
    current_program: Option<u32>,
    current_vertex_array: Option<u32>,
    current_buffer: Option<u32>,
    uploads: Vec<(i32, i32, usize)>,
    buffer_bytes: usize,
    viewports: Vec<(i32, i32, i32, i32)>,
    draws: Vec<(i32, i32)>,
    pending_errors: Vec<u32>,
    fail_link: bool,
}

#[derive(Default)]
pub(crate) struct RecordingGl {
    state: RefCell<FakeState>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `get_error` report `code`.
    pub fn queue_error(&self, code: u32) {
        self.state.borrow_mut().pending_errors.push(code);
    }

    pub fn fail_next_link(&self) {
        self.state.borrow_mut().fail_link = true;
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().live_textures.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().live_shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().live_programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().live_buffers.len() + self.state.borrow().live_vertex_arrays.len()
    }

    pub fn live_objects(&self) -> usize {
        self.live_textures() + self.live_shaders() + self.live_programs() + self.live_buffers()
    }

    /// Object kinds in deletion order.
    pub fn deleted_kinds(&self) -> Vec<&'static str> {
        self.state.borrow().deleted.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn draws(&self) -> Vec<(i32, i32)> {
        self.state.borrow().draws.clone()
    }

    pub fn viewports(&self) -> Vec<(i32, i32, i32, i32)> {
        self.state.borrow().viewports.clone()
    }

    pub fn uploads(&self) -> Vec<(i32, i32, usize)> {
        self.state.borrow().uploads.clone()
    }

    pub fn buffer_bytes(&self) -> usize {
        self.state.borrow().buffer_bytes
    }

    pub fn uniform_writes(&self) -> Vec<(String, UniformWrite)> {
        self.state.borrow().uniform_writes.clone()
    }

    pub fn last_uniform(&self, name: &str) -> Option<UniformWrite> {
        self.state
            .borrow()
            .uniform_writes
            .iter()
            .rev()
            .find(|(written, _)| written == name)
            .map(|(_, value)| value.clone())
    }

    /// True when no program, vertex array, buffer or texture unit is bound.
    pub fn state_is_reset(&self) -> bool {
        let state = self.state.borrow();
        state.current_program.is_none()
            && state.current_vertex_array.is_none()
            && state.current_buffer.is_none()
            && state.bound_texture_units.values().all(Option::is_none)
    }

    fn allocate(&self, kind: fn(&mut FakeState) -> &mut BTreeSet<u32>) -> NonZeroU32 {
        let mut state = self.state.borrow_mut();
        state.next_name += 1;
        let name = state.next_name;
        kind(&mut state).insert(name);
        NonZeroU32::new(name).expect("names start at one")
    }

    fn free(&self, label: &'static str, kind: fn(&mut FakeState) -> &mut BTreeSet<u32>, name: u32) {
        let mut state = self.state.borrow_mut();
        assert!(kind(&mut state).remove(&name), "double delete of {label} {name}");
        state.deleted.push((label, name));
    }

    fn write_uniform(&self, location: &UniformLocation, value: UniformWrite) {
        let mut state = self.state.borrow_mut();
        assert!(state.current_program.is_some(), "uniform written with no program in use");
        let name = state.uniform_names[&location.0].clone();
        state.uniform_writes.push((name, value));
    }
}

fn braces_balance(source: &str) -> bool {
    let mut depth = 0i32;
    for ch in source.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

fn declares_uniform(source: &str, name: &str) -> bool {
    source.lines().any(|line| {
        let line = line.trim();
        line.starts_with("uniform ")
            && line
                .trim_end_matches(';')
                .split_whitespace()
                .last()
                .is_some_and(|declared| declared == name)
    })
}

impl GlApi for RecordingGl {
    fn get_error(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        if state.pending_errors.is_empty() {
            glow::NO_ERROR
        } else {
            state.pending_errors.remove(0)
        }
    }

    fn create_texture(&self) -> Result<Texture, String> {
        Ok(glow::NativeTexture(self.allocate(|s| &mut s.live_textures)))
    }

    fn delete_texture(&self, texture: Texture) {
        self.free("texture", |s| &mut s.live_textures, texture.0.get());
    }

    fn active_texture(&self, unit: u32) {
        self.state.borrow_mut().active_unit = unit;
    }

    fn bind_texture_2d(&self, texture: Option<Texture>) {
        let mut state = self.state.borrow_mut();
        let unit = state.active_unit;
        state
            .bound_texture_units
            .insert(unit, texture.map(|texture| texture.0.get()));
    }

    fn tex_image_2d_rgba8(&self, width: i32, height: i32, pixels: &[u8]) {
        self.state
            .borrow_mut()
            .uploads
            .push((width, height, pixels.len()));
    }

    fn tex_parameter_2d(&self, _parameter: u32, _value: i32) {}

    fn generate_mipmap_2d(&self) {}

    fn create_shader(&self, _stage: ShaderStage) -> Result<Shader, String> {
        Ok(glow::NativeShader(self.allocate(|s| &mut s.live_shaders)))
    }

    fn shader_source(&self, shader: Shader, source: &str) {
        self.state
            .borrow_mut()
            .shader_sources
            .insert(shader.0.get(), source.to_string());
    }

    fn compile_shader(&self, shader: Shader) {
        let mut state = self.state.borrow_mut();
        let ok = state
            .shader_sources
            .get(&shader.0.get())
            .is_some_and(|source| braces_balance(source));
        state.compiled.insert(shader.0.get(), ok);
    }

    fn shader_compile_status(&self, shader: Shader) -> bool {
        self.state
            .borrow()
            .compiled
            .get(&shader.0.get())
            .copied()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: Shader) -> String {
        format!("0:1(1): error: unbalanced braces in shader {}", shader.0)
    }

    fn delete_shader(&self, shader: Shader) {
        self.free("shader", |s| &mut s.live_shaders, shader.0.get());
    }

    fn create_program(&self) -> Result<Program, String> {
        Ok(glow::NativeProgram(self.allocate(|s| &mut s.live_programs)))
    }

    fn attach_shader(&self, program: Program, shader: Shader) {
        self.state
            .borrow_mut()
            .attachments
            .entry(program.0.get())
            .or_default()
            .push(shader.0.get());
    }

    fn link_program(&self, program: Program) {
        let mut state = self.state.borrow_mut();
        let ok = !std::mem::take(&mut state.fail_link);
        state.linked.insert(program.0.get(), ok);
    }

    fn program_link_status(&self, program: Program) -> bool {
        self.state
            .borrow()
            .linked
            .get(&program.0.get())
            .copied()
            .unwrap_or(false)
    }

    fn program_info_log(&self, _program: Program) -> String {
        "error: vertex output 'uv' not read by fragment shader".to_string()
    }

    fn delete_program(&self, program: Program) {
        self.free("program", |s| &mut s.live_programs, program.0.get());
    }

    fn use_program(&self, program: Option<Program>) {
        self.state.borrow_mut().current_program = program.map(|program| program.0.get());
    }

    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation> {
        let mut state = self.state.borrow_mut();
        let declared = state
            .attachments
            .get(&program.0.get())
            .into_iter()
            .flatten()
            .filter_map(|shader| state.shader_sources.get(shader))
            .any(|source| declares_uniform(source, name));
        if !declared {
            return None;
        }
        let location = state.uniform_names.len() as u32;
        state.uniform_names.insert(location, name.to_string());
        Some(glow::NativeUniformLocation(location))
    }

    fn uniform_1_f32(&self, location: &UniformLocation, x: f32) {
        self.write_uniform(location, UniformWrite::Float(x));
    }

    fn uniform_1_i32(&self, location: &UniformLocation, x: i32) {
        self.write_uniform(location, UniformWrite::Int(x));
    }

    fn uniform_2_f32(&self, location: &UniformLocation, x: f32, y: f32) {
        self.write_uniform(location, UniformWrite::Vec2([x, y]));
    }

    fn uniform_3_f32(&self, location: &UniformLocation, x: f32, y: f32, z: f32) {
        self.write_uniform(location, UniformWrite::Vec3([x, y, z]));
    }

    fn uniform_matrix_3_f32(&self, location: &UniformLocation, values: &[f32; 9]) {
        self.write_uniform(location, UniformWrite::Mat3(*values));
    }

    fn create_vertex_array(&self) -> Result<VertexArray, String> {
        Ok(glow::NativeVertexArray(
            self.allocate(|s| &mut s.live_vertex_arrays),
        ))
    }

    fn delete_vertex_array(&self, vertex_array: VertexArray) {
        self.free(
            "vertex array",
            |s| &mut s.live_vertex_arrays,
            vertex_array.0.get(),
        );
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArray>) {
        self.state.borrow_mut().current_vertex_array =
            vertex_array.map(|vertex_array| vertex_array.0.get());
    }

    fn create_buffer(&self) -> Result<Buffer, String> {
        Ok(glow::NativeBuffer(self.allocate(|s| &mut s.live_buffers)))
    }

    fn delete_buffer(&self, buffer: Buffer) {
        self.free("buffer", |s| &mut s.live_buffers, buffer.0.get());
    }

    fn bind_array_buffer(&self, buffer: Option<Buffer>) {
        self.state.borrow_mut().current_buffer = buffer.map(|buffer| buffer.0.get());
    }

    fn array_buffer_data_static(&self, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        assert!(state.current_buffer.is_some(), "buffer data with no buffer bound");
        state.buffer_bytes = data.len();
    }

    fn enable_vertex_attrib_array(&self, _index: u32) {}

    fn vertex_attrib_pointer_f32(&self, _index: u32, _size: i32, _stride: i32, _offset: i32) {}

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.state
            .borrow_mut()
            .viewports
            .push((x, y, width, height));
    }

    fn clear_color_and_depth(&self) {}

    fn disable_face_culling(&self) {}

    fn draw_triangles(&self, first: i32, count: i32) {
        let mut state = self.state.borrow_mut();
        assert!(state.current_program.is_some(), "draw with no program in use");
        assert!(state.current_vertex_array.is_some(), "draw with no vertex array bound");
        state.draws.push((first, count));
    }
}

/// Encodes a solid-colour RGBA image as PNG.
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([12, 34, 56, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
