//! The application: one value owning the window, the context and every GPU object, and the
//! event loop that draws it.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, error, info, warn};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopBuilder, EventLoopWindowTarget};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::Window;

use crate::animation::ColorPulse;
use crate::backend::{DisplayCreationError, WindowBuilder};
use crate::context::{Context, SwapBuffersError};
use crate::error::GlError;
use crate::geometry::{Quad, QuadCreationError};
use crate::gl;
use crate::program::{Program, ProgramCreationError};
use crate::source::{ShaderSource, SourceError};

/// Settings of the application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Title of the window.
    pub title: String,
    /// Inner size of the window, in pixels.
    pub size: (u32, u32),
    /// Whether swapping buffers waits for the vertical blank.
    pub vsync: bool,
    /// Whether the window is shown.
    pub visible: bool,
    /// File holding the vertex and fragment shaders.
    pub shader_path: PathBuf,
    /// Name of the `vec4` uniform that gets animated.
    pub color_uniform: String,
}

impl AppConfig {
    /// Default shader file, relative to the working directory.
    pub const DEFAULT_SHADER_PATH: &'static str = "res/shaders/Basic.shader";

    /// The default settings: a visible 640x480 "Hello World" window with vsync, drawing with
    /// `res/shaders/Basic.shader` and animating `u_Color`.
    pub fn new() -> AppConfig {
        AppConfig {
            title: "Hello World".to_owned(),
            size: (640, 480),
            vsync: true,
            visible: true,
            shader_path: PathBuf::from(AppConfig::DEFAULT_SHADER_PATH),
            color_uniform: "u_Color".to_owned(),
        }
    }

    /// Builds the settings from command line arguments, without the program name.
    ///
    /// The only argument is an optional path to the shader file.
    pub fn from_args<I, S>(args: I) -> AppConfig
        where I: IntoIterator<Item = S>, S: Into<PathBuf>
    {
        let mut config = AppConfig::new();
        if let Some(path) = args.into_iter().next() {
            config.shader_path = path.into();
        }
        config
    }

    /// Replaces the shader file.
    pub fn with_shader_path<P: AsRef<Path>>(mut self, path: P) -> AppConfig {
        self.shader_path = path.as_ref().to_owned();
        self
    }

    /// Shows or hides the window.
    pub fn with_visible(mut self, visible: bool) -> AppConfig {
        self.visible = visible;
        self
    }

    /// Returns the window builder matching these settings.
    pub fn window_builder(&self) -> WindowBuilder {
        WindowBuilder::new()
            .with_title(&self.title)
            .with_inner_size(self.size.0, self.size.1)
            .with_vsync(self.vsync)
            .with_visible(self.visible)
    }
}

impl Default for AppConfig {
    #[inline]
    fn default() -> AppConfig {
        AppConfig::new()
    }
}

/// Any error that stops the application.
#[derive(Debug)]
pub enum AppError {
    /// The window or its context couldn't be created.
    Display(DisplayCreationError),
    /// The shader file couldn't be read.
    Source(SourceError),
    /// The shaders couldn't be compiled or linked.
    Program(ProgramCreationError),
    /// The quad couldn't be uploaded.
    Quad(QuadCreationError),
    /// The program has no active uniform with this name.
    UniformNotFound(String),
    /// An OpenGL call failed.
    Gl(GlError),
    /// The frame couldn't be presented.
    SwapBuffers(SwapBuffersError),
}

impl fmt::Display for AppError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Display(err) => err.fmt(fmt),
            AppError::Source(err) => err.fmt(fmt),
            AppError::Program(err) => err.fmt(fmt),
            AppError::Quad(err) => err.fmt(fmt),
            AppError::UniformNotFound(name) =>
                write!(fmt, "The program has no active uniform named `{}`", name),
            AppError::Gl(err) => err.fmt(fmt),
            AppError::SwapBuffers(err) => err.fmt(fmt),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Display(err) => Some(err),
            AppError::Source(err) => Some(err),
            AppError::Program(err) => Some(err),
            AppError::Quad(err) => Some(err),
            AppError::UniformNotFound(_) => None,
            AppError::Gl(err) => Some(err),
            AppError::SwapBuffers(err) => Some(err),
        }
    }
}

impl From<DisplayCreationError> for AppError {
    fn from(err: DisplayCreationError) -> AppError {
        AppError::Display(err)
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> AppError {
        AppError::Source(err)
    }
}

impl From<ProgramCreationError> for AppError {
    fn from(err: ProgramCreationError) -> AppError {
        AppError::Program(err)
    }
}

impl From<QuadCreationError> for AppError {
    fn from(err: QuadCreationError) -> AppError {
        AppError::Quad(err)
    }
}

impl From<GlError> for AppError {
    fn from(err: GlError) -> AppError {
        AppError::Gl(err)
    }
}

impl From<SwapBuffersError> for AppError {
    fn from(err: SwapBuffersError) -> AppError {
        AppError::SwapBuffers(err)
    }
}

/// Owns everything the render loop needs.
///
/// Fields drop in declaration order: GPU objects first, then the context, then the window.
pub struct Application {
    program: Program,
    quad: Quad,
    color_location: gl::types::GLint,
    pulse: ColorPulse,
    context: Rc<Context>,
    window: Window,
}

impl Application {
    /// Opens the window, uploads the quad and builds the program.
    pub fn new<T>(event_loop: &EventLoopWindowTarget<T>, config: AppConfig)
                  -> Result<Application, AppError>
    {
        let (window, context) = config.window_builder().build(event_loop)?;

        let quad = Quad::new(&context)?;

        let source = ShaderSource::from_path(&config.shader_path)?;
        info!("VERTEX\n{}", source.vertex);
        info!("FRAGMENT\n{}", source.fragment);
        if !source.is_complete() {
            warn!("{} is missing a vertex or a fragment section", config.shader_path.display());
        }

        let program = Program::from_shader_source(&context, &source)?;
        let color_location = program.uniform_location(&config.color_uniform)
            .ok_or_else(|| AppError::UniformNotFound(config.color_uniform.clone()))?;
        debug!("{} is at location {}", config.color_uniform, color_location);

        Ok(Application {
            program,
            quad,
            color_location,
            pulse: ColorPulse::new(),
            context,
            window,
        })
    }

    /// Returns the shared context.
    #[inline]
    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    /// Returns the window.
    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Returns the linked program.
    #[inline]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Draws one frame and presents it.
    pub fn draw_frame(&mut self) -> Result<(), AppError> {
        self.context.clear_color(0.0, 0.0, 0.0, 1.0)?;

        let color = self.pulse.step();
        self.program.set_uniform_vec4(self.color_location, color)?;
        self.quad.draw()?;

        self.context.swap_buffers()?;
        Ok(())
    }

    /// Handles a window event. Returns `true` once the window should close.
    pub fn handle_window_event(&mut self, event: &WindowEvent<'_>) -> Result<bool, AppError> {
        match event {
            WindowEvent::CloseRequested => return Ok(true),
            WindowEvent::Resized(size) => self.context.resize((*size).into())?,
            _ => (),
        }
        Ok(false)
    }

    /// Runs the event loop on an existing application until the window is closed or an
    /// error happens.
    pub fn run_loop<T>(&mut self, event_loop: &mut EventLoop<T>) -> Result<(), AppError> {
        let mut result = Ok(());

        event_loop.run_return(|event, _, control_flow| {
            control_flow.set_poll();

            let step = match event {
                Event::WindowEvent { event, window_id } if window_id == self.window.id() =>
                    match self.handle_window_event(&event) {
                        Ok(true) => {
                            info!("window closed");
                            control_flow.set_exit();
                            Ok(())
                        },
                        Ok(false) => Ok(()),
                        Err(err) => Err(err),
                    },
                Event::MainEventsCleared => {
                    self.window.request_redraw();
                    Ok(())
                },
                Event::RedrawRequested(window_id) if window_id == self.window.id() =>
                    self.draw_frame(),
                _ => Ok(()),
            };

            if let Err(err) = step {
                error!("{}", err);
                result = Err(err);
                control_flow.set_exit_with_code(1);
            }
        });

        result
    }
}

/// Creates the event loop and the application, then runs until the window is closed.
///
/// Every GPU object and the window are released before this function returns, whether it
/// succeeds or not.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let mut event_loop = EventLoopBuilder::new().build();
    let mut app = Application::new(&event_loop, config)?;
    app.run_loop(&mut event_loop)
}
