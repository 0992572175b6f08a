use std::rc::Rc;

use crate::error::RenderError;
use crate::gl::{Buffer, GlApi, VertexArray};
use crate::scope::ScopedResource;

/// Two triangles covering the viewport in normalized device coordinates.
pub const QUAD_VERTICES: [[f32; 3]; 6] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
];

pub const QUAD_VERTEX_COUNT: i32 = QUAD_VERTICES.len() as i32;

const POSITION_ATTRIBUTE: u32 = 0;
const VERTEX_STRIDE: i32 = std::mem::size_of::<[f32; 3]>() as i32;

/// Static vertex buffer plus the vertex array describing its single
/// position attribute.
pub struct QuadMesh<G: GlApi> {
    gl: Rc<G>,
    vertex_array: Option<VertexArray>,
    buffer: Option<Buffer>,
}

impl<G: GlApi> QuadMesh<G> {
    pub fn new(gl: Rc<G>) -> Self {
        Self {
            gl,
            vertex_array: None,
            buffer: None,
        }
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(self.vertex_array);
        self.gl.bind_array_buffer(self.buffer);
    }

    pub fn unbind(&self) {
        self.gl.bind_array_buffer(None);
        self.gl.bind_vertex_array(None);
    }
}

impl<G: GlApi> ScopedResource for QuadMesh<G> {
    fn acquire(&mut self) -> Result<(), RenderError> {
        self.vertex_array = Some(
            self.gl
                .create_vertex_array()
                .map_err(RenderError::allocation("vertex array"))?,
        );
        self.buffer = Some(
            self.gl
                .create_buffer()
                .map_err(RenderError::allocation("vertex buffer"))?,
        );

        self.bind();
        self.gl
            .array_buffer_data_static(bytemuck::cast_slice(&QUAD_VERTICES));
        self.gl.enable_vertex_attrib_array(POSITION_ATTRIBUTE);
        self.gl
            .vertex_attrib_pointer_f32(POSITION_ATTRIBUTE, 3, VERTEX_STRIDE, 0);
        self.unbind();
        Ok(())
    }

    fn release(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.gl.delete_buffer(buffer);
        }
        if let Some(vertex_array) = self.vertex_array.take() {
            self.gl.delete_vertex_array(vertex_array);
        }
    }
}
