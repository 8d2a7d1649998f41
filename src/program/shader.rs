use std::rc::Rc;

use log::error;

use crate::context::Context;
use crate::gl;
use crate::GlObject;

use super::{log_to_string, ProgramCreationError, ShaderStage};

/// A single, compiled but unlinked, shader.
pub struct Shader {
    context: Rc<Context>,
    id: gl::types::GLuint,
}

impl GlObject for Shader {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        let gl = self.context.gl();
        // errors can't be propagated out of a destructor, they are logged by `gl_call!`
        let _ = unsafe { gl_call!(gl, gl.DeleteShader(self.id)) };
    }
}

/// Builds an individual shader.
///
/// On failure the compiler log is logged and returned, and the shader object is deleted.
/// Source made only of whitespace is rejected before reaching the driver.
pub fn build_shader(context: &Rc<Context>, stage: ShaderStage, source_code: &str)
                    -> Result<Shader, ProgramCreationError>
{
    check_not_empty(stage, source_code)?;

    let gl = context.gl();

    let id = unsafe { gl_call!(gl, gl.CreateShader(stage.to_glenum()))? };
    if id == 0 {
        return Err(ProgramCreationError::CompilationError(
            "glCreateShader returned 0".to_owned(), stage));
    }

    // from now on the shader object is deleted on every return path
    let shader = Shader { context: context.clone(), id };

    unsafe {
        // passing the length explicitly, the source doesn't need a nul terminator
        let ptr = source_code.as_ptr() as *const gl::types::GLchar;
        let len = source_code.len() as gl::types::GLint;
        gl_call!(gl, gl.ShaderSource(id, 1, &ptr, &len))?;
        gl_call!(gl, gl.CompileShader(id))?;
    }

    // checking compilation success by reading a flag on the shader
    let compilation_success = unsafe {
        let mut compilation_success: gl::types::GLint = 0;
        gl_call!(gl, gl.GetShaderiv(id, gl::COMPILE_STATUS, &mut compilation_success))?;
        compilation_success
    };

    if compilation_success == gl::TRUE as gl::types::GLint {
        return Ok(shader);
    }

    let mut error_log_size: gl::types::GLint = 0;
    let mut error_log: Vec<u8>;

    unsafe {
        gl_call!(gl, gl.GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut error_log_size))?;
        error_log = Vec::with_capacity(error_log_size.max(0) as usize);
        gl_call!(gl, gl.GetShaderInfoLog(id, error_log_size, &mut error_log_size,
                                         error_log.as_mut_ptr() as *mut gl::types::GLchar))?;
        error_log.set_len(error_log_size.max(0) as usize);
    }

    let msg = log_to_string(error_log, "no compilation log available");
    error!("failed to compile {} shader!\n{}", stage, msg);

    Err(ProgramCreationError::CompilationError(msg, stage))
}

/// Empty sources are a compilation error for the stage, whatever the driver would do.
fn check_not_empty(stage: ShaderStage, source_code: &str) -> Result<(), ProgramCreationError> {
    if source_code.trim().is_empty() {
        error!("failed to compile {} shader!\nempty source", stage);
        return Err(ProgramCreationError::CompilationError("empty source".to_owned(), stage));
    }

    Ok(())
}
