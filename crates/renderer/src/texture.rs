use std::rc::Rc;

use crate::assets::AssetSource;
use crate::error::RenderError;
use crate::gl::{check_error, GlApi, Texture};
use crate::scope::ScopedResource;

/// One 2D RGBA texture decoded from a named image asset.
pub struct GpuTexture<G: GlApi> {
    gl: Rc<G>,
    assets: Rc<dyn AssetSource>,
    name: String,
    handle: Option<Texture>,
    size: Option<(u32, u32)>,
}

impl<G: GlApi> GpuTexture<G> {
    pub fn new(gl: Rc<G>, assets: Rc<dyn AssetSource>, name: impl Into<String>) -> Self {
        Self {
            gl,
            assets,
            name: name.into(),
            handle: None,
            size: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> Option<Texture> {
        self.handle
    }

    /// Pixel dimensions of the uploaded image.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Binds this texture to `unit` (`GL_TEXTURE0 + unit`).
    pub fn bind(&self, unit: u32) -> Result<(), RenderError> {
        self.gl.active_texture(unit);
        self.gl.bind_texture_2d(self.handle);
        check_error(self.gl.as_ref())
    }

    /// Clears whatever texture is bound to `unit`.
    pub fn unbind(&self, unit: u32) -> Result<(), RenderError> {
        self.gl.active_texture(unit);
        self.gl.bind_texture_2d(None);
        check_error(self.gl.as_ref())
    }

    fn upload(&mut self) -> Result<(), RenderError> {
        let raw = self.assets.load(&self.name)?;
        let rgba = image::load_from_memory(&raw)
            .map_err(|source| RenderError::ImageDecode {
                name: self.name.clone(),
                source,
            })?
            .to_rgba8();
        drop(raw);
        let (width, height) = rgba.dimensions();

        self.bind(0)?;
        self.gl
            .tex_image_2d_rgba8(width as i32, height as i32, rgba.as_raw());
        self.gl
            .tex_parameter_2d(glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
        self.gl
            .tex_parameter_2d(glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        self.gl.generate_mipmap_2d();
        self.unbind(0)?;

        self.size = Some((width, height));
        tracing::debug!(texture = %self.name, width, height, "uploaded texture");
        Ok(())
    }
}

impl<G: GlApi> ScopedResource for GpuTexture<G> {
    fn acquire(&mut self) -> Result<(), RenderError> {
        let handle = self
            .gl
            .create_texture()
            .map_err(RenderError::allocation("texture"))?;
        self.handle = Some(handle);
        self.upload()
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.gl.delete_texture(handle);
            tracing::trace!(texture = %self.name, "deleted texture");
        }
        self.size = None;
    }
}
