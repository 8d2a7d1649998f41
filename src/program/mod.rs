//! Compilation of shaders and linking of programs.

use std::error::Error;
use std::fmt;

use crate::error::GlError;
use crate::gl;

pub use self::program::Program;
pub use self::shader::{build_shader, Shader};

mod program;
mod shader;

/// The pipeline step a shader is compiled for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Executed once per vertex.
    Vertex,
    /// Executed once per fragment.
    Fragment,
}

impl ShaderStage {
    /// Returns the value to pass to `glCreateShader`.
    #[inline]
    pub fn to_glenum(&self) -> gl::types::GLenum {
        match *self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(match *self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Error that can be triggered when creating a `Program`.
#[derive(Clone, Debug)]
pub enum ProgramCreationError {
    /// Error while compiling one of the shaders.
    ///
    /// Contains the log of the compiler and the stage that failed. Construction stops at the
    /// first stage that fails.
    CompilationError(String, ShaderStage),

    /// Error while linking the program.
    LinkingError(String),

    /// An OpenGL call failed while building the program.
    GlError(GlError),
}

impl fmt::Display for ProgramCreationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramCreationError::CompilationError(log, stage) =>
                write!(fmt, "Failed to compile {} shader: {}", stage, log),
            ProgramCreationError::LinkingError(log) =>
                write!(fmt, "Error while linking shaders together: {}", log),
            ProgramCreationError::GlError(err) =>
                write!(fmt, "OpenGL error while building the program: {}", err),
        }
    }
}

impl Error for ProgramCreationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProgramCreationError::GlError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GlError> for ProgramCreationError {
    #[inline]
    fn from(err: GlError) -> ProgramCreationError {
        ProgramCreationError::GlError(err)
    }
}

/// Turns a log filled by `glGetShaderInfoLog` or `glGetProgramInfoLog` into a string.
fn log_to_string(mut log: Vec<u8>, fallback: &str) -> String {
    while log.last() == Some(&0) {
        log.pop();
    }

    if log.is_empty() {
        return fallback.to_owned();
    }

    match String::from_utf8(log) {
        Ok(msg) => msg,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
