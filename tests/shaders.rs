//! These tests need an OpenGL 3.3 context. They use an offscreen EGL context when one is
//! available, a hidden window otherwise, and return early on machines with neither. Set
//! `HEADLESS_TESTS` to make a missing offscreen context a failure.

use megraphics::{GlObject, Program, ProgramCreationError, Quad, ShaderSource, ShaderStage};

mod support;

const VERTEX: &str = "
    #version 330 core

    layout(location = 0) in vec4 position;

    void main() {
        gl_Position = position;
    }
";

const FRAGMENT: &str = "
    #version 330 core

    layout(location = 0) out vec4 color;

    uniform vec4 u_Color;

    void main() {
        color = u_Color;
    }
";

#[test]
fn program_creation() {
    let display = match support::build_display() { Some(d) => d, None => return };

    let program = Program::from_source(&display.context, VERTEX, FRAGMENT).unwrap();
    assert!(program.get_id() != 0);
    program.use_program().unwrap();
}

#[test]
fn program_from_resource_file() {
    let display = match support::build_display() { Some(d) => d, None => return };

    let source = ShaderSource::from_path(support::resource("shaders/Basic.shader")).unwrap();
    let program = Program::from_shader_source(&display.context, &source).unwrap();

    let location = program.uniform_location("u_Color").unwrap();
    program.set_uniform_vec4(location, [0.5, 0.4, 0.6, 1.0]).unwrap();
}

#[test]
fn vertex_compilation_error() {
    let display = match support::build_display() { Some(d) => d, None => return };

    match Program::from_source(&display.context, "invalid glsl code", FRAGMENT) {
        Err(ProgramCreationError::CompilationError(log, ShaderStage::Vertex)) =>
            assert!(!log.is_empty()),
        other => panic!("{:?}", other),
    }
}

#[test]
fn fragment_compilation_error() {
    let display = match support::build_display() { Some(d) => d, None => return };

    match Program::from_source(&display.context, VERTEX, "invalid glsl code") {
        Err(ProgramCreationError::CompilationError(log, ShaderStage::Fragment)) =>
            assert!(!log.is_empty()),
        other => panic!("{:?}", other),
    }
}

#[test]
fn vertex_error_is_reported_first() {
    let display = match support::build_display() { Some(d) => d, None => return };

    match Program::from_source(&display.context, "invalid glsl code", "invalid glsl code") {
        Err(ProgramCreationError::CompilationError(_, stage)) =>
            assert_eq!(stage, ShaderStage::Vertex),
        other => panic!("{:?}", other),
    }
}

#[test]
fn empty_source_is_rejected() {
    let display = match support::build_display() { Some(d) => d, None => return };
    match Program::from_shader_source(&display.context, &ShaderSource::default()) {
        Err(ProgramCreationError::CompilationError(_, ShaderStage::Vertex)) => (),
        other => panic!("{:?}", other),
    }

    match Program::from_source(&display.context, VERTEX, "  \n") {
        Err(ProgramCreationError::CompilationError(_, ShaderStage::Fragment)) => (),
        other => panic!("{:?}", other),
    }
}

#[test]
fn unknown_uniform() {
    let display = match support::build_display() { Some(d) => d, None => return };

    let program = Program::from_source(&display.context, VERTEX, FRAGMENT).unwrap();
    assert_eq!(program.uniform_location("u_Missing"), None);
    // cached lookups give the same answer
    assert_eq!(program.uniform_location("u_Missing"), None);
    assert_eq!(program.uniform_location("u_Color"), program.uniform_location("u_Color"));
}

#[test]
fn draw_quad() {
    let display = match support::build_display() { Some(d) => d, None => return };

    let quad = Quad::new(&display.context).unwrap();
    assert_eq!(quad.index_count(), 6);
    assert!(quad.get_id() != 0);

    let program = Program::from_source(&display.context, VERTEX, FRAGMENT).unwrap();
    let location = program.uniform_location("u_Color").unwrap();

    display.context.clear_color(0.0, 0.0, 0.0, 1.0).unwrap();
    program.set_uniform_vec4(location, [1.0, 0.4, 0.6, 1.0]).unwrap();
    quad.draw().unwrap();
}
