use std::io;

use crate::types::ShaderStage;

/// Failures raised while acquiring or driving GPU and platform resources.
///
/// None of these are transient: each points at a broken asset, a missing
/// file or an incompatible driver, so callers propagate them instead of
/// retrying.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to initialise the windowing platform: {0}")]
    PlatformInit(String),
    #[error("failed to create window: {0}")]
    WindowCreate(String),
    #[error("no current GL context; acquire the frame surface first")]
    ContextUnavailable,
    #[error("resource '{name}' not found")]
    ResourceNotFound { name: String },
    #[error("failed to read resource '{name}'")]
    ResourceRead {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode image '{name}'")]
    ImageDecode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to compile {stage} shader '{name}':\n{log}")]
    ShaderCompile {
        stage: ShaderStage,
        name: String,
        log: String,
    },
    #[error("failed to link shader program:\n{log}")]
    ShaderLink { log: String },
    #[error("failed to allocate GL {object}: {message}")]
    GpuAllocation {
        object: &'static str,
        message: String,
    },
    #[error("GL error 0x{code:X}")]
    Gpu { code: u32 },
    #[error("failed to present frame: {0}")]
    Present(String),
}

impl RenderError {
    pub(crate) fn allocation(object: &'static str) -> impl FnOnce(String) -> Self {
        move |message| RenderError::GpuAllocation { object, message }
    }
}
