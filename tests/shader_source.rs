use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use megraphics::{ShaderSource, SourceError};

mod support;

/// Writes `contents` to a file unique to this test process.
fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("megraphics-{}-{}", process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn example_file() {
    let path = write_temp("example.shader", "\
#shader vertex
void main(){ gl_Position = vec4(0,0,0,1); }
#shader fragment
void main(){ gl_FragColor = vec4(1,0,0,1); }
");

    let source = ShaderSource::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(source.vertex, "void main(){ gl_Position = vec4(0,0,0,1); }\n");
    assert_eq!(source.fragment, "void main(){ gl_FragColor = vec4(1,0,0,1); }\n");
}

#[test]
fn sections_keep_lines_in_order() {
    let path = write_temp("order.shader", "\
#shader vertex
v1

v2
#shader fragment
f1
f2

");

    let source = ShaderSource::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(source.vertex, "v1\n\nv2\n");
    assert_eq!(source.fragment, "f1\nf2\n\n");
}

#[test]
fn unknown_section_is_dropped() {
    let path = write_temp("unknown.shader", "\
#shader vertex
kept
#shader geometry
dropped
#shader fragment
also kept
");

    let source = ShaderSource::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(!source.vertex.contains("dropped"));
    assert!(!source.fragment.contains("dropped"));
    assert_eq!(source.vertex, "kept\n");
    assert_eq!(source.fragment, "also kept\n");
}

#[test]
fn text_before_first_marker_is_dropped() {
    let source = ShaderSource::parse("// header\n#shader vertex\nbody\n");
    assert_eq!(source.vertex, "body\n");
    assert_eq!(source.fragment, "");
}

#[test]
fn reentering_a_section_appends() {
    let source = ShaderSource::parse("\
#shader vertex
a
#shader fragment
b
#shader vertex
c
");

    assert_eq!(source.vertex, "a\nc\n");
    assert_eq!(source.fragment, "b\n");
}

#[test]
fn marker_anywhere_on_the_line() {
    let source = ShaderSource::parse("  // #shader fragment\nx\n");
    assert_eq!(source.fragment, "x\n");
}

#[test]
fn crlf_line_endings() {
    let source = ShaderSource::parse("#shader vertex\r\na\r\n#shader fragment\r\nb\r\n");
    assert_eq!(source.vertex, "a\n");
    assert_eq!(source.fragment, "b\n");
}

#[test]
fn missing_file_is_an_error() {
    let path = env::temp_dir().join(format!("megraphics-{}-missing.shader", process::id()));

    match ShaderSource::from_path(&path) {
        Err(SourceError::Io { path: err_path, source }) => {
            assert_eq!(err_path, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        },
        other => panic!("{:?}", other),
    }
}

#[test]
fn error_message_names_the_file() {
    let err = ShaderSource::from_path("no/such/file.shader").unwrap_err();
    assert!(err.to_string().contains("file.shader"));
}

#[test]
fn bundled_shader() {
    let source = ShaderSource::from_path(support::resource("shaders/Basic.shader")).unwrap();

    assert!(source.is_complete());
    assert!(source.vertex.starts_with("#version 330 core\n"));
    assert!(source.fragment.starts_with("#version 330 core\n"));
    assert!(source.fragment.contains("uniform vec4 u_Color;"));
    assert!(!source.vertex.contains("#shader"));
    assert!(!source.fragment.contains("#shader"));
}
