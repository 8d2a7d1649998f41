//! Loading of vertex/fragment source pairs from a single tagged file.
//!
//! A line containing `#shader` is a marker. If the marker line also contains `vertex`, the
//! following lines go to the vertex stage; otherwise, if it contains `fragment`, they go to
//! the fragment stage. Any other marker discards the following lines until the next marker.
//! Lines before the first marker are discarded as well.
//!
//! Every kept line is re-terminated with `\n`, blank lines included.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;

const MARKER: &str = "#shader";

/// Source code of a vertex shader and a fragment shader.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderSource {
    /// Source code of the vertex shader.
    pub vertex: String,
    /// Source code of the fragment shader.
    pub fragment: String,
}

/// Error that can happen while loading a `ShaderSource`.
#[derive(Debug)]
pub enum SourceError {
    /// The file couldn't be opened or read.
    Io {
        /// The file that was being loaded.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, source } =>
                write!(fmt, "Could not read shader source {}: {}", path.display(), source),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SourceError::Io { source, .. } => Some(source),
        }
    }
}

/// The section that the following lines are appended to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Section {
    None,
    Vertex,
    Fragment,
}

impl Section {
    fn from_marker(line: &str) -> Section {
        if line.contains("vertex") {
            Section::Vertex
        } else if line.contains("fragment") {
            Section::Fragment
        } else {
            Section::None
        }
    }
}

impl ShaderSource {
    /// Splits already loaded text.
    pub fn parse(text: &str) -> ShaderSource {
        let mut source = ShaderSource::default();
        let mut section = Section::None;

        for line in text.lines() {
            source.push_line(&mut section, line);
        }

        source
    }

    /// Splits the lines produced by a reader.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<ShaderSource> {
        let mut source = ShaderSource::default();
        let mut section = Section::None;

        for line in reader.lines() {
            source.push_line(&mut section, &line?);
        }

        Ok(source)
    }

    /// Loads and splits a file.
    ///
    /// Unlike a missing section, which only leaves the corresponding string empty, a file
    /// that can't be read is an error.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ShaderSource, SourceError> {
        let path = path.as_ref();
        let to_err = |source| SourceError::Io { path: path.to_owned(), source };

        let file = File::open(path).map_err(to_err)?;
        let source = ShaderSource::from_reader(BufReader::new(file)).map_err(to_err)?;

        debug!("loaded {} ({} bytes of vertex source, {} bytes of fragment source)",
               path.display(), source.vertex.len(), source.fragment.len());

        Ok(source)
    }

    /// Returns true if both stages have some source code.
    #[inline]
    pub fn is_complete(&self) -> bool {
        !self.vertex.is_empty() && !self.fragment.is_empty()
    }

    fn push_line(&mut self, section: &mut Section, line: &str) {
        if line.contains(MARKER) {
            *section = Section::from_marker(line);
            return;
        }

        let dest = match *section {
            Section::Vertex => &mut self.vertex,
            Section::Fragment => &mut self.fragment,
            Section::None => return,
        };

        dest.push_str(line);
        dest.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sections() {
        let source = ShaderSource::parse("\
#shader vertex
void main(){ gl_Position = vec4(0,0,0,1); }
#shader fragment
void main(){ gl_FragColor = vec4(1,0,0,1); }
");

        assert_eq!(source.vertex, "void main(){ gl_Position = vec4(0,0,0,1); }\n");
        assert_eq!(source.fragment, "void main(){ gl_FragColor = vec4(1,0,0,1); }\n");
        assert!(source.is_complete());
    }

    #[test]
    fn unknown_keyword_drops_lines() {
        let source = ShaderSource::parse("\
#shader vertex
a
#shader geometry
b
c
#shader fragment
d
");

        assert_eq!(source.vertex, "a\n");
        assert_eq!(source.fragment, "d\n");
    }

    #[test]
    fn vertex_wins_over_fragment_on_the_same_line() {
        let source = ShaderSource::parse("#shader vertex fragment\nx\n");
        assert_eq!(source.vertex, "x\n");
        assert_eq!(source.fragment, "");
    }

    #[test]
    fn missing_trailing_newline() {
        let source = ShaderSource::parse("#shader fragment\nlast line");
        assert_eq!(source.fragment, "last line\n");
    }

    #[test]
    fn empty_text() {
        let source = ShaderSource::parse("");
        assert_eq!(source, ShaderSource::default());
        assert!(!source.is_complete());
    }

    #[test]
    fn reader_matches_parse() {
        let text = "#shader vertex\n\n  a\n#shader fragment\nb\n\n";
        let from_reader = ShaderSource::from_reader(text.as_bytes()).unwrap();
        assert_eq!(from_reader, ShaderSource::parse(text));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let bytes: &[u8] = b"#shader vertex\n\xff\xfe\n";
        assert!(ShaderSource::from_reader(bytes).is_err());
    }
}
