//! The quad drawn by the application.
//!
//! A vertex array object records the layout of the vertex buffer and the binding of the
//! index buffer, so drawing only needs to bind the vertex array.

use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::mem;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

use memoffset::offset_of;

use crate::context::Context;
use crate::error::GlError;
use crate::gl;
use crate::GlObject;

/// A vertex with a 2D position, read by the attribute at location 0.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    /// Position in normalized device coordinates.
    pub position: [f32; 2],
}

/// Corners of the quad, counter-clockwise starting at the bottom left.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex { position: [-0.5, -0.5] },
    Vertex { position: [ 0.5, -0.5] },
    Vertex { position: [ 0.5,  0.5] },
    Vertex { position: [-0.5,  0.5] },
];

/// The two triangles of the quad.
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

/// Error that can happen while uploading a `Quad`.
#[derive(Clone, Debug)]
pub enum QuadCreationError {
    /// More indices than `glDrawElements` can take in one call.
    TooManyIndices(usize),
    /// An OpenGL call failed during the upload.
    GlError(GlError),
}

impl fmt::Display for QuadCreationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadCreationError::TooManyIndices(count) =>
                write!(fmt, "{} indices don't fit in a single draw call", count),
            QuadCreationError::GlError(err) =>
                write!(fmt, "OpenGL error while uploading the quad: {}", err),
        }
    }
}

impl Error for QuadCreationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            QuadCreationError::GlError(err) => Some(err),
            QuadCreationError::TooManyIndices(_) => None,
        }
    }
}

impl From<GlError> for QuadCreationError {
    #[inline]
    fn from(err: GlError) -> QuadCreationError {
        QuadCreationError::GlError(err)
    }
}

fn index_count(len: usize) -> Result<gl::types::GLsizei, QuadCreationError> {
    gl::types::GLsizei::try_from(len).map_err(|_| QuadCreationError::TooManyIndices(len))
}

/// A vertex array with its vertex buffer and index buffer.
pub struct Quad {
    context: Rc<Context>,
    vao: gl::types::GLuint,
    vertex_buffer: gl::types::GLuint,
    index_buffer: gl::types::GLuint,
    index_count: gl::types::GLsizei,
}

impl Quad {
    /// Uploads `QUAD_VERTICES` and `QUAD_INDICES`.
    #[inline]
    pub fn new(context: &Rc<Context>) -> Result<Quad, QuadCreationError> {
        Quad::with_data(context, &QUAD_VERTICES, &QUAD_INDICES)
    }

    /// Uploads arbitrary vertices and triangle indices.
    pub fn with_data(context: &Rc<Context>, vertices: &[Vertex], indices: &[u32])
                     -> Result<Quad, QuadCreationError>
    {
        let index_count = index_count(indices.len())?;
        let gl = context.gl();

        // names stay at 0 until generated, deleting 0 is a no-op if we bail out early
        let mut quad = Quad {
            context: context.clone(),
            vao: 0,
            vertex_buffer: 0,
            index_buffer: 0,
            index_count,
        };

        unsafe {
            gl_call!(gl, gl.GenVertexArrays(1, &mut quad.vao))?;
            gl_call!(gl, gl.BindVertexArray(quad.vao))?;

            gl_call!(gl, gl.GenBuffers(1, &mut quad.vertex_buffer))?;
            gl_call!(gl, gl.BindBuffer(gl::ARRAY_BUFFER, quad.vertex_buffer))?;
            gl_call!(gl, gl.BufferData(gl::ARRAY_BUFFER,
                                       mem::size_of_val(vertices) as gl::types::GLsizeiptr,
                                       vertices.as_ptr() as *const c_void,
                                       gl::STATIC_DRAW))?;

            gl_call!(gl, gl.EnableVertexAttribArray(0))?;
            gl_call!(gl, gl.VertexAttribPointer(0, 2, gl::FLOAT, gl::FALSE,
                                                mem::size_of::<Vertex>() as gl::types::GLsizei,
                                                offset_of!(Vertex, position) as *const c_void))?;

            // bound while the vertex array is bound, so the vertex array remembers it
            gl_call!(gl, gl.GenBuffers(1, &mut quad.index_buffer))?;
            gl_call!(gl, gl.BindBuffer(gl::ELEMENT_ARRAY_BUFFER, quad.index_buffer))?;
            gl_call!(gl, gl.BufferData(gl::ELEMENT_ARRAY_BUFFER,
                                       mem::size_of_val(indices) as gl::types::GLsizeiptr,
                                       indices.as_ptr() as *const c_void,
                                       gl::STATIC_DRAW))?;

            gl_call!(gl, gl.BindVertexArray(0))?;
            gl_call!(gl, gl.BindBuffer(gl::ARRAY_BUFFER, 0))?;
            gl_call!(gl, gl.BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0))?;
        }

        Ok(quad)
    }

    /// Returns the number of indices drawn by `draw`.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.index_count as usize
    }

    /// Draws the triangles with whatever program is current.
    pub fn draw(&self) -> Result<(), GlError> {
        let gl = self.context.gl();

        unsafe {
            gl_call!(gl, gl.BindVertexArray(self.vao))?;
            gl_call!(gl, gl.DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT,
                                         ptr::null()))
        }
    }
}

impl GlObject for Quad {
    type Id = gl::types::GLuint;

    /// Returns the name of the vertex array.
    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.vao
    }
}

impl Drop for Quad {
    fn drop(&mut self) {
        let gl = self.context.gl();

        unsafe {
            let _ = gl_call!(gl, gl.DeleteVertexArrays(1, &self.vao));
            let _ = gl_call!(gl, gl.DeleteBuffers(1, &self.vertex_buffer));
            let _ = gl_call!(gl, gl.DeleteBuffers(1, &self.index_buffer));
        }
    }
}
