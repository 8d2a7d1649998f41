/*!
Small OpenGL learning program built on glutin and winit.

The program opens a window, reads a vertex and a fragment shader out of a single source
file, builds a program from them, uploads a quad and animates a color uniform until the
window is closed.

# Shader source files

Both stages live in the same file. A line containing `#shader` starts a section, and the
word `vertex` or `fragment` on that line selects which one:

```
use megraphics::ShaderSource;

let source = ShaderSource::parse("\
#shader vertex
void main(){ gl_Position = vec4(0,0,0,1); }
#shader fragment
void main(){ gl_FragColor = vec4(1,0,0,1); }
");

assert_eq!(source.vertex, "void main(){ gl_Position = vec4(0,0,0,1); }\n");
assert_eq!(source.fragment, "void main(){ gl_FragColor = vec4(1,0,0,1); }\n");
```

# Building a program

`Program::from_shader_source` compiles both stages and links them. A compilation failure
reports the stage that failed along with the driver's log.

```no_run
use megraphics::{AppConfig, Application, Program, ShaderSource};
use megraphics::winit::event_loop::EventLoopBuilder;

let event_loop = EventLoopBuilder::new().build();
let app = Application::new(&event_loop, AppConfig::new()).unwrap();

let source = ShaderSource::from_path("res/shaders/Basic.shader").unwrap();
let program = Program::from_shader_source(app.context(), &source).unwrap();
```

*/
#![warn(missing_docs)]

pub use crate::animation::ColorPulse;
pub use crate::app::{AppConfig, AppError, Application};
pub use crate::backend::{DisplayCreationError, WindowBuilder};
pub use crate::context::{Context, ContextSurface, SwapBuffersError};
pub use crate::error::GlError;
pub use crate::geometry::{Quad, QuadCreationError, Vertex};
pub use crate::program::{Program, ProgramCreationError, ShaderStage};
pub use crate::program::ProgramCreationError::{CompilationError, LinkingError};
pub use crate::source::{ShaderSource, SourceError};

pub use glutin;
pub use winit;

#[macro_use]
mod macros;

pub mod animation;
pub mod app;
pub mod backend;
pub mod context;
pub mod error;
pub mod geometry;
pub mod program;
pub mod source;

/// Raw OpenGL bindings generated at build time.
#[allow(missing_docs, clippy::all, non_upper_case_globals, non_snake_case, unused)]
pub mod gl {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

/// Trait for objects that are OpenGL objects.
pub trait GlObject {
    /// The type of identifier for this object.
    type Id;

    /// Returns the id of the object.
    fn get_id(&self) -> Self::Id;
}
