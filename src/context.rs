//! The OpenGL context shared by every GPU object.

use std::error::Error;
use std::ffi::{CStr, CString};
use std::fmt;
use std::num::NonZeroU32;
use std::os::raw::c_char;
use std::ptr;
use std::rc::Rc;

use glutin::context::PossiblyCurrentContext;
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{PbufferSurface, Surface, WindowSurface};

use crate::error::GlError;
use crate::gl;

/// Error that can happen when swapping buffers.
#[derive(Debug)]
pub struct SwapBuffersError(glutin::error::Error);

impl fmt::Display for SwapBuffersError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Error while swapping buffers: {}", self.0)
    }
}

impl Error for SwapBuffersError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// The surface a context draws into.
pub enum ContextSurface {
    /// The surface of a window.
    Window(Surface<WindowSurface>),
    /// An offscreen buffer, for headless contexts.
    Pbuffer(Surface<PbufferSurface>),
}

/// The glutin context alongside the surface it is current on and the loaded GL functions.
///
/// Every object created on the GPU keeps an `Rc` to the context, so that it is always
/// deleted before the context goes away.
pub struct Context {
    gl: gl::Gl,
    context: PossiblyCurrentContext,
    surface: ContextSurface,
}

impl Context {
    /// Loads the GL functions of a context that has been made current on `surface`.
    pub fn new(context: PossiblyCurrentContext, surface: ContextSurface) -> Rc<Context> {
        let display = context.display();
        let gl = gl::Gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => display.get_proc_address(&symbol),
            Err(_) => ptr::null(),
        });

        Rc::new(Context { gl, context, surface })
    }

    /// Returns the loaded GL functions.
    #[inline]
    pub fn gl(&self) -> &gl::Gl {
        &self.gl
    }

    /// Presents the back buffer. Blocks on vsync if it was requested.
    pub fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        let result = match &self.surface {
            ContextSurface::Window(surface) => surface.swap_buffers(&self.context),
            ContextSurface::Pbuffer(surface) => surface.swap_buffers(&self.context),
        };
        result.map_err(SwapBuffersError)
    }

    /// Resizes the surface and the viewport. Zero-sized dimensions are ignored, and so is the
    /// surface of a headless context, which keeps its size.
    pub fn resize(&self, (width, height): (u32, u32)) -> Result<(), GlError> {
        let (w, h) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Ok(()),
        };

        if let ContextSurface::Window(surface) = &self.surface {
            surface.resize(&self.context, w, h);
        }
        unsafe { gl_call!(&self.gl, self.gl.Viewport(0, 0, width as _, height as _)) }
    }

    /// Clears the color buffer of the surface.
    pub fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<(), GlError> {
        unsafe {
            gl_call!(&self.gl, self.gl.ClearColor(red, green, blue, alpha))?;
            gl_call!(&self.gl, self.gl.Clear(gl::COLOR_BUFFER_BIT))
        }
    }

    /// Returns a string containing this GL version or release number used by this context.
    ///
    /// Vendor-specific information may follow the version number.
    pub fn get_opengl_version_string(&self) -> String {
        self.get_string(gl::VERSION)
    }

    /// Returns a string containing the company responsible for this GL implementation.
    pub fn get_opengl_vendor_string(&self) -> String {
        self.get_string(gl::VENDOR)
    }

    /// Returns a string containing the name of the GL renderer used by this context.
    ///
    /// This name is typically specific to a particular configuration of a hardware platform.
    pub fn get_opengl_renderer_string(&self) -> String {
        self.get_string(gl::RENDERER)
    }

    fn get_string(&self, name: gl::types::GLenum) -> String {
        unsafe {
            let s = self.gl.GetString(name);
            if s.is_null() {
                return String::new();
            }

            CStr::from_ptr(s as *const c_char).to_string_lossy().into_owned()
        }
    }
}
