/*!

Window and OpenGL context creation with glutin.

[`WindowBuilder`] opens a window, picks a config, creates an OpenGL context on it and makes it
current. The result is the winit window and the shared [`Context`].

[`build_headless`] creates a context on an offscreen pbuffer of the first EGL device, for
machines without a display server.

*/
use std::error::Error;
use std::fmt;
use std::num::NonZeroU32;
use std::rc::Rc;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use log::{info, warn};
use raw_window_handle::HasRawWindowHandle;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::Window;

use crate::context::{Context, ContextSurface};

/// The OpenGL version requested for the context.
pub const GL_VERSION: (u8, u8) = (3, 3);

/// Error that can happen while creating the window and its context.
#[derive(Debug)]
pub enum DisplayCreationError {
    /// The window couldn't be created, or no config matched the template.
    WindowCreation(Box<dyn Error>),
    /// glutin didn't hand back a window.
    NoWindow,
    /// The window has a zero-sized dimension.
    EmptyWindow,
    /// Neither the requested OpenGL context nor the default one could be created.
    ContextCreation(glutin::error::Error),
    /// The window surface couldn't be created.
    SurfaceCreation(glutin::error::Error),
    /// The context couldn't be made current on the surface.
    MakeCurrent(glutin::error::Error),
    /// The EGL devices or their display couldn't be queried.
    HeadlessDisplay(glutin::error::Error),
    /// There is no EGL device to create a headless context on.
    NoDevice,
    /// Looking up the configs of the display failed.
    ConfigSearch(glutin::error::Error),
    /// No config matched the template.
    NoConfig,
}

impl fmt::Display for DisplayCreationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayCreationError::WindowCreation(err) =>
                write!(fmt, "Failed to create the window: {}", err),
            DisplayCreationError::NoWindow =>
                fmt.write_str("The display builder didn't create a window"),
            DisplayCreationError::EmptyWindow =>
                fmt.write_str("The window has a zero-sized dimension"),
            DisplayCreationError::ContextCreation(err) =>
                write!(fmt, "Failed to create the OpenGL context: {}", err),
            DisplayCreationError::SurfaceCreation(err) =>
                write!(fmt, "Failed to create the window surface: {}", err),
            DisplayCreationError::MakeCurrent(err) =>
                write!(fmt, "Failed to make the OpenGL context current: {}", err),
            DisplayCreationError::HeadlessDisplay(err) =>
                write!(fmt, "Failed to open an EGL device display: {}", err),
            DisplayCreationError::NoDevice =>
                fmt.write_str("No EGL device available"),
            DisplayCreationError::ConfigSearch(err) =>
                write!(fmt, "Failed to look up the display configs: {}", err),
            DisplayCreationError::NoConfig =>
                fmt.write_str("No config matched the template"),
        }
    }
}

impl Error for DisplayCreationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayCreationError::WindowCreation(err) => Some(err.as_ref()),
            DisplayCreationError::ContextCreation(err) |
            DisplayCreationError::SurfaceCreation(err) |
            DisplayCreationError::MakeCurrent(err) |
            DisplayCreationError::HeadlessDisplay(err) |
            DisplayCreationError::ConfigSearch(err) => Some(err),
            DisplayCreationError::NoWindow |
            DisplayCreationError::EmptyWindow |
            DisplayCreationError::NoDevice |
            DisplayCreationError::NoConfig => None,
        }
    }
}

/// Builder for the window and its OpenGL context.
pub struct WindowBuilder {
    window_builder: winit::window::WindowBuilder,
    vsync: bool,
}

impl WindowBuilder {
    /// Initializes a new builder: a 640x480 window titled "Hello World", an OpenGL 3.3
    /// context and vsync.
    pub fn new() -> Self {
        Self {
            window_builder: winit::window::WindowBuilder::new()
                .with_title("Hello World")
                .with_inner_size(winit::dpi::PhysicalSize::new(640, 480)),
            vsync: true,
        }
    }

    /// Requests the window to be of a certain size.
    pub fn with_inner_size(mut self, width: u32, height: u32) -> Self {
        self.window_builder = self
            .window_builder
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));
        self
    }

    /// Set the initial title for the window.
    pub fn with_title(mut self, title: &str) -> Self {
        self.window_builder = self.window_builder.with_title(title);
        self
    }

    /// Hides the window, mostly useful for tests.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.window_builder = self.window_builder.with_visible(visible);
        self
    }

    /// Replace the used vsync configuration.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Creates the window and a context current on it.
    pub fn build<T>(self, event_loop: &EventLoopWindowTarget<T>)
                    -> Result<(Window, Rc<Context>), DisplayCreationError>
    {
        // First we open the window and pick a config for it
        let display_builder = DisplayBuilder::new().with_window_builder(Some(self.window_builder));
        let (window, gl_config) = display_builder
            .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(DisplayCreationError::WindowCreation)?;
        let window = window.ok_or(DisplayCreationError::NoWindow)?;

        // Then the context, falling back to whatever the platform offers by default
        let raw_window_handle = window.raw_window_handle();
        let (major, minor) = GL_VERSION;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_window_handle));
        let fallback_context_attributes = ContextAttributesBuilder::new()
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();
        let not_current_context = unsafe {
            match gl_display.create_context(&gl_config, &context_attributes) {
                Ok(context) => context,
                Err(err) => {
                    warn!("couldn't create an OpenGL {}.{} context ({}), using the default one",
                          major, minor, err);
                    gl_display.create_context(&gl_config, &fallback_context_attributes)
                        .map_err(DisplayCreationError::ContextCreation)?
                },
            }
        };

        // Now the surface, with the current window size
        let (width, height): (u32, u32) = window.inner_size().into();
        let (width, height) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(DisplayCreationError::EmptyWindow),
        };
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new()
            .build(raw_window_handle, width, height);
        let surface = unsafe {
            gl_display.create_window_surface(&gl_config, &attrs)
                .map_err(DisplayCreationError::SurfaceCreation)?
        };

        let current_context = not_current_context
            .make_current(&surface)
            .map_err(DisplayCreationError::MakeCurrent)?;

        let swap_interval = match NonZeroU32::new(1) {
            Some(interval) if self.vsync => SwapInterval::Wait(interval),
            _ => SwapInterval::DontWait,
        };
        if let Err(err) = surface.set_swap_interval(&current_context, swap_interval) {
            warn!("couldn't set the swap interval: {}", err);
        }

        let context = Context::new(current_context, ContextSurface::Window(surface));
        log_context_info(&context);

        Ok((window, context))
    }
}

impl Default for WindowBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a context that renders into an offscreen pbuffer of the first EGL device.
#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
pub fn build_headless(width: u32, height: u32) -> Result<Rc<Context>, DisplayCreationError> {
    use glutin::api::egl::device::Device;
    use glutin::config::{Api, ConfigSurfaceTypes};
    use glutin::surface::PbufferSurface;

    let (width, height) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(DisplayCreationError::EmptyWindow),
    };

    let device = Device::query_devices()
        .map_err(DisplayCreationError::HeadlessDisplay)?
        .next()
        .ok_or(DisplayCreationError::NoDevice)?;
    let egl_display = unsafe { glutin::api::egl::display::Display::with_device(&device, None) }
        .map_err(DisplayCreationError::HeadlessDisplay)?;
    let gl_display = glutin::display::Display::Egl(egl_display);

    let template = ConfigTemplateBuilder::new()
        .with_api(Api::OPENGL)
        .with_surface_type(ConfigSurfaceTypes::PBUFFER)
        .build();
    let gl_config = {
        let configs = unsafe { gl_display.find_configs(template) }
            .map_err(DisplayCreationError::ConfigSearch)?;
        best_config(configs).ok_or(DisplayCreationError::NoConfig)?
    };

    let (major, minor) = GL_VERSION;
    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
        .build(None);
    let not_current_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        .map_err(DisplayCreationError::ContextCreation)?;

    let attrs = SurfaceAttributesBuilder::<PbufferSurface>::new().build(width, height);
    let surface = unsafe { gl_display.create_pbuffer_surface(&gl_config, &attrs) }
        .map_err(DisplayCreationError::SurfaceCreation)?;

    let current_context = not_current_context
        .make_current(&surface)
        .map_err(DisplayCreationError::MakeCurrent)?;

    let context = Context::new(current_context, ContextSurface::Pbuffer(surface));
    log_context_info(&context);

    Ok(context)
}

/// Picks the config with the most samples.
fn best_config<I: Iterator<Item = Config>>(configs: I) -> Option<Config> {
    configs.reduce(|best, config| {
        if config.num_samples() > best.num_samples() { config } else { best }
    })
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    // glutin_winit only calls the picker with a non-empty list, it errors out otherwise
    best_config(configs).expect("glutin_winit passed an empty config list")
}

fn log_context_info(context: &Context) {
    info!("{}", context.get_opengl_version_string());
    info!("{} - {}", context.get_opengl_vendor_string(), context.get_opengl_renderer_string());
}
