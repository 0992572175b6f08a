use std::ffi::CString;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Duration;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

use crate::error::RenderError;
use crate::scope::ScopedResource;
use crate::types::SurfaceConfig;

/// The platform window, its GL surface and the current GL context.
///
/// Only one `FrameSurface` may exist per process: winit refuses to create a
/// second event loop, and every GL call in the crate assumes this surface's
/// context is the current one.
pub struct FrameSurface {
    config: SurfaceConfig,
    // Field order is drop order: GL state goes before the window it renders
    // into, and the window before its event loop.
    gl: Option<Rc<glow::Context>>,
    context: Option<PossiblyCurrentContext>,
    gl_surface: Option<Surface<WindowSurface>>,
    window: Option<Window>,
    event_loop: Option<EventLoop<()>>,
    width: u32,
    height: u32,
    close_requested: bool,
}

impl FrameSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            gl: None,
            context: None,
            gl_surface: None,
            window: None,
            event_loop: None,
            width: 0,
            height: 0,
            close_requested: false,
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Framebuffer width captured by the last [`begin_frame`](Self::begin_frame).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Framebuffer height captured by the last [`begin_frame`](Self::begin_frame).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width / height`, or `1.0` until both dimensions are known.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    /// The loaded GL function table, shared with everything that issues GL
    /// calls against this surface's context.
    pub fn gl(&self) -> Result<Rc<glow::Context>, RenderError> {
        self.gl.clone().ok_or(RenderError::ContextUnavailable)
    }

    /// Captures the framebuffer size for this frame, resizing the GL surface
    /// when it changed.
    pub fn begin_frame(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let size = window.inner_size();
        if (size.width, size.height) != (self.width, self.height) {
            if let (Some(surface), Some(context), Some(width), Some(height)) = (
                self.gl_surface.as_ref(),
                self.context.as_ref(),
                NonZeroU32::new(size.width),
                NonZeroU32::new(size.height),
            ) {
                surface.resize(context, width, height);
            }
            tracing::debug!(width = size.width, height = size.height, "framebuffer resized");
        }
        self.width = size.width;
        self.height = size.height;
    }

    /// Presents the back buffer, then drains pending platform events.
    pub fn end_frame(&mut self) -> Result<(), RenderError> {
        if let (Some(surface), Some(context)) = (self.gl_surface.as_ref(), self.context.as_ref()) {
            surface
                .swap_buffers(context)
                .map_err(|err| RenderError::Present(err.to_string()))?;
        }
        self.pump_events();
        Ok(())
    }

    fn pump_events(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };
        let mut close_requested = false;
        let status = event_loop.pump_events(Some(Duration::ZERO), |event, _| {
            if let Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } = event
            {
                close_requested = true;
            }
        });
        if let PumpStatus::Exit(code) = status {
            tracing::debug!(code, "event loop exited");
            close_requested = true;
        }
        if close_requested && !self.close_requested {
            tracing::info!("close requested");
        }
        self.close_requested |= close_requested;
    }

    fn create_window(&mut self) -> Result<(), RenderError> {
        let event_loop = self
            .event_loop
            .as_ref()
            .ok_or_else(|| RenderError::PlatformInit("event loop missing".to_string()))?;

        let window_builder = WindowBuilder::new()
            .with_title(self.config.title.as_str())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|err| RenderError::WindowCreate(err.to_string()))?;
        let window = window
            .ok_or_else(|| RenderError::WindowCreate("display returned no window".to_string()))?;
        let raw_window_handle = window.raw_window_handle();
        let surface_attributes =
            window.build_surface_attributes(SurfaceAttributesBuilder::default());
        self.window = Some(window);

        let (major, minor) = self.config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_window_handle));
        let display = gl_config.display();
        // SAFETY: the raw window handle belongs to `self.window`, which
        // outlives the context (it is dropped after it in `release`).
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .map_err(|err| {
                RenderError::WindowCreate(format!("GL {major}.{minor} core context: {err}"))
            })?;

        // SAFETY: as above, the window outlives the surface.
        let gl_surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|err| RenderError::WindowCreate(format!("GL surface: {err}")))?;
        let context = not_current
            .make_current(&gl_surface)
            .map_err(|err| RenderError::WindowCreate(format!("make context current: {err}")))?;

        // SAFETY: the context was made current on this thread just above.
        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| {
                CString::new(symbol)
                    .map(|symbol| display.get_proc_address(symbol.as_c_str()))
                    .unwrap_or(std::ptr::null())
            })
        };

        if self.config.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(err) = gl_surface.set_swap_interval(&context, interval) {
                tracing::warn!(error = %err, "failed to enable vsync");
            }
        }

        self.gl_surface = Some(gl_surface);
        self.context = Some(context);
        self.gl = Some(Rc::new(gl));
        Ok(())
    }
}

/// Prefers the config with the most samples.
///
/// glutin reports "no matching config" as a build error before calling the
/// picker, so the iterator always yields at least one config.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    use glutin::config::GlConfig;

    configs
        .reduce(|best, candidate| {
            if candidate.num_samples() > best.num_samples() {
                candidate
            } else {
                best
            }
        })
        .expect("glutin passes at least one config to the picker")
}

impl ScopedResource for FrameSurface {
    fn acquire(&mut self) -> Result<(), RenderError> {
        let event_loop = EventLoop::new().map_err(|err| RenderError::PlatformInit(err.to_string()))?;
        self.event_loop = Some(event_loop);
        self.close_requested = false;
        self.create_window()?;

        tracing::info!(
            width = self.config.width,
            height = self.config.height,
            title = %self.config.title,
            gl_major = self.config.gl_version.0,
            gl_minor = self.config.gl_version.1,
            vsync = self.config.vsync,
            "window created"
        );
        Ok(())
    }

    fn release(&mut self) {
        self.gl = None;
        self.context = None;
        self.gl_surface = None;
        if self.window.take().is_some() {
            tracing::debug!("window destroyed");
        }
        self.event_loop = None;
        self.width = 0;
        self.height = 0;
    }
}
