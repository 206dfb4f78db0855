//! Rendering of generated source files

pub mod go_root;
pub mod go_struct;
pub mod python;

pub use go_root::gen_go_root;
pub use go_struct::{gen_go_struct, GoImport, GoStruct};
pub use python::gen_python;

/// The marker `go generate` and linters use to recognize generated files
pub const GO_HEADER: &str = "// Code generated by schemagen. DO NOT EDIT.";

/// The lines of a generated file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Lines(Vec<String>);

impl Lines {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    #[inline]
    pub fn blank(&mut self) {
        self.0.push(String::new());
    }

    #[inline]
    pub fn append(&mut self, mut other: Lines) {
        self.0.append(&mut other.0);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Joins the lines into the final file contents, which always end with
    /// a newline
    pub fn render(&self) -> String {
        let mut text = self.0.join("\n");
        text.push('\n');
        text
    }
}

impl<S: Into<String>> Extend<S> for Lines {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// The method receiver name for a Go type, its lower-cased first letter
pub(crate) fn receiver(type_name: &str) -> String {
    type_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}
