//! Defines useful macros for issuing OpenGL calls.

/// Issues an OpenGL call and checks the error queue afterwards.
///
/// Errors left over by earlier calls are discarded first, so that an error reported by this
/// macro can only come from the wrapped expression. The result is a
/// `Result<T, GlError>` holding the value of the expression; the error carries the stringified
/// call along with the file and line of the call site.
///
/// The expression is evaluated where the macro is invoked, so raw GL calls still need an
/// `unsafe` block around the macro.
///
/// ## Example
/// ```ignore rust
/// let vao = unsafe { gl_call!(gl, gl.BindVertexArray(id))? };
/// ```
macro_rules! gl_call {
    ($gl: expr, $call: expr) => {
        {
            let gl: &$crate::gl::Gl = $gl;
            $crate::error::clear_errors(gl);
            let value = $call;
            $crate::error::check_errors(gl, stringify!($call), file!(), line!()).map(|()| value)
        }
    };
}
