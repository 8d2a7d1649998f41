//! Errors reported by the OpenGL error queue.

use std::error::Error;
use std::fmt;

use log::error;

use crate::gl;

/// An error code read back from `glGetError` after a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlError {
    /// The raw error code.
    pub code: gl::types::GLenum,
    /// The call that produced the error, as written in the source.
    pub call: &'static str,
    /// File of the call site.
    pub file: &'static str,
    /// Line of the call site.
    pub line: u32,
}

impl GlError {
    /// Returns the symbolic name of the error code.
    #[inline]
    pub fn name(&self) -> &'static str {
        error_name(self.code)
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "[OpenGL Error] {} ({:#06x}) {}: {}: line {}",
               self.name(), self.code, self.file, self.call, self.line)
    }
}

impl Error for GlError {}

/// Returns the name of an error code returned by `glGetError`.
pub fn error_name(code: gl::types::GLenum) -> &'static str {
    match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        _ => "Unknown glGetError return value",
    }
}

/// Drains the error queue.
pub fn clear_errors(gl: &gl::Gl) {
    while unsafe { gl.GetError() } != gl::NO_ERROR {}
}

/// Reads the error queue and turns its first entry into a `GlError`.
///
/// Only the first error is reported; the rest of the queue is left to the next
/// `clear_errors`.
pub fn check_errors(gl: &gl::Gl, call: &'static str, file: &'static str, line: u32)
                    -> Result<(), GlError>
{
    match unsafe { gl.GetError() } {
        gl::NO_ERROR => Ok(()),
        code => {
            let err = GlError { code, call, file, line };
            error!("{}", err);
            Err(err)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_names() {
        assert_eq!(error_name(0x0500), "GL_INVALID_ENUM");
        assert_eq!(error_name(0x0501), "GL_INVALID_VALUE");
        assert_eq!(error_name(0x0502), "GL_INVALID_OPERATION");
        assert_eq!(error_name(0x0505), "GL_OUT_OF_MEMORY");
        assert_eq!(error_name(0x0506), "GL_INVALID_FRAMEBUFFER_OPERATION");
    }

    #[test]
    fn unknown_code() {
        assert_eq!(error_name(0x1234), "Unknown glGetError return value");
    }

    #[test]
    fn display_has_call_site() {
        let err = GlError {
            code: gl::INVALID_OPERATION,
            call: "gl.UseProgram(id)",
            file: "src/program.rs",
            line: 42,
        };

        let msg = err.to_string();
        assert!(msg.contains("GL_INVALID_OPERATION"));
        assert!(msg.contains("gl.UseProgram(id)"));
        assert!(msg.contains("src/program.rs"));
        assert!(msg.contains("line 42"));
    }
}
