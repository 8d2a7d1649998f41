use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};

fn main() {
    let dest = PathBuf::from(env::var("OUT_DIR").unwrap());
    println!("cargo:rerun-if-changed=build/main.rs");

    let mut file = BufWriter::new(File::create(dest.join("gl_bindings.rs")).unwrap());

    // the quad and the shaders only need what a 3.3 core context offers
    Registry::new(Api::Gl, (3, 3), Profile::Core, Fallbacks::All, [])
        .write_bindings(StructGenerator, &mut file)
        .unwrap();
}
