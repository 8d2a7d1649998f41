use std::cell::RefCell;
use std::ffi::CString;
use std::fmt;
use std::rc::Rc;

use fnv::FnvHashMap;
use log::{debug, warn};
use smallvec::SmallVec;

use crate::context::Context;
use crate::error::GlError;
use crate::gl;
use crate::source::ShaderSource;
use crate::GlObject;

use super::shader::{build_shader, Shader};
use super::{log_to_string, ProgramCreationError, ShaderStage};

/// A vertex shader and a fragment shader linked together.
///
/// The program is deleted when this object is dropped.
pub struct Program {
    context: Rc<Context>,
    id: gl::types::GLuint,
    uniform_locations: RefCell<FnvHashMap<String, Option<gl::types::GLint>>>,
}

impl Program {
    /// Compiles both stages and links them.
    ///
    /// If one stage fails to compile, nothing is linked and the error of that stage is
    /// returned. The intermediate shader objects are deleted before this function returns.
    pub fn from_source(context: &Rc<Context>, vertex_shader: &str, fragment_shader: &str)
                       -> Result<Program, ProgramCreationError>
    {
        let shaders: SmallVec<[Shader; 2]> = SmallVec::from_buf([
            build_shader(context, ShaderStage::Vertex, vertex_shader)?,
            build_shader(context, ShaderStage::Fragment, fragment_shader)?,
        ]);

        let gl = context.gl();

        let id = unsafe { gl_call!(gl, gl.CreateProgram())? };
        if id == 0 {
            return Err(ProgramCreationError::LinkingError("glCreateProgram returned 0".to_owned()));
        }

        let program = Program {
            context: context.clone(),
            id,
            uniform_locations: RefCell::new(FnvHashMap::default()),
        };

        unsafe {
            for shader in shaders.iter() {
                gl_call!(gl, gl.AttachShader(id, shader.get_id()))?;
            }

            gl_call!(gl, gl.LinkProgram(id))?;
        }

        if !program.get_status(gl::LINK_STATUS)? {
            let log = program.get_info_log()?;
            return Err(ProgramCreationError::LinkingError(log));
        }

        // validation depends on the state at the time of the call, a failure isn't fatal
        unsafe { gl_call!(gl, gl.ValidateProgram(id))? };
        if !program.get_status(gl::VALIDATE_STATUS)? {
            warn!("program {} failed validation: {}", id, program.get_info_log()?);
        }

        // the linked program keeps the compiled code, the shader objects can go
        unsafe {
            for shader in shaders.iter() {
                gl_call!(gl, gl.DetachShader(id, shader.get_id()))?;
            }
        }
        drop(shaders);

        debug!("linked program {}", id);
        Ok(program)
    }

    /// Builds a program out of a loaded `ShaderSource`.
    #[inline]
    pub fn from_shader_source(context: &Rc<Context>, source: &ShaderSource)
                              -> Result<Program, ProgramCreationError>
    {
        Program::from_source(context, &source.vertex, &source.fragment)
    }

    /// Makes this program the current one.
    pub fn use_program(&self) -> Result<(), GlError> {
        let gl = self.context.gl();
        unsafe { gl_call!(gl, gl.UseProgram(self.id)) }
    }

    /// Returns the location of a uniform, or `None` if the program has no active uniform with
    /// this name.
    ///
    /// Locations are cached after the first lookup.
    pub fn uniform_location(&self, name: &str) -> Option<gl::types::GLint> {
        if let Some(location) = self.uniform_locations.borrow().get(name) {
            return *location;
        }

        let location = match CString::new(name) {
            Ok(c_name) => {
                let gl = self.context.gl();
                match unsafe { gl.GetUniformLocation(self.id, c_name.as_ptr()) } {
                    -1 => None,
                    location => Some(location),
                }
            },
            Err(_) => None,
        };

        self.uniform_locations.borrow_mut().insert(name.to_owned(), location);
        location
    }

    /// Binds the program and sets a `vec4` uniform.
    pub fn set_uniform_vec4(&self, location: gl::types::GLint, value: [f32; 4])
                            -> Result<(), GlError>
    {
        let gl = self.context.gl();
        let [x, y, z, w] = value;

        unsafe {
            gl_call!(gl, gl.UseProgram(self.id))?;
            gl_call!(gl, gl.Uniform4f(location, x, y, z, w))
        }
    }

    fn get_status(&self, pname: gl::types::GLenum) -> Result<bool, GlError> {
        let gl = self.context.gl();
        let mut status: gl::types::GLint = 0;
        unsafe { gl_call!(gl, gl.GetProgramiv(self.id, pname, &mut status))? };
        Ok(status == gl::TRUE as gl::types::GLint)
    }

    fn get_info_log(&self) -> Result<String, GlError> {
        let gl = self.context.gl();
        let mut log_size: gl::types::GLint = 0;
        let mut log: Vec<u8>;

        unsafe {
            gl_call!(gl, gl.GetProgramiv(self.id, gl::INFO_LOG_LENGTH, &mut log_size))?;
            log = Vec::with_capacity(log_size.max(0) as usize);
            gl_call!(gl, gl.GetProgramInfoLog(self.id, log_size, &mut log_size,
                                              log.as_mut_ptr() as *mut gl::types::GLchar))?;
            log.set_len(log_size.max(0) as usize);
        }

        Ok(log_to_string(log, "no log available"))
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(formatter, "Program #{}", self.id)
    }
}

impl GlObject for Program {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        let gl = self.context.gl();
        let _ = unsafe { gl_call!(gl, gl.DeleteProgram(self.id)) };
    }
}
