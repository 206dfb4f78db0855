use crate::PathBuf;
use std::{
    collections::BTreeSet,
    fmt::{self, Display},
    ops::Range,
};

/// An error that aborts a generation run.
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    /// Where in a source file the error was detected, if it came from one
    pub location: Option<Location>,
}

/// A position inside an introspected source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Byte span of the offending line, excluding the newline
    pub span: Range<usize>,
}

/// Broad classes of failures, every one of them is fatal
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A schema file could not be read as a schema
    Content,
    /// An input broke one of the naming, defaulting or union conventions
    Convention,
    /// Something that was looked up does not exist
    NotFound,
    /// A line inside a struct body was neither a plain nor a union field
    Unclassifiable,
    /// The filesystem failed us
    Io,
}

#[derive(Debug)]
pub enum ErrorKind {
    /// The schema file is not valid JSON.
    InvalidJson {
        path: PathBuf,
        err: serde_json::Error,
    },
    /// The schema has no string `title`, so no type name can be derived.
    MissingTitle { url: String },
    /// The schema file's path could not be turned into a canonical url.
    InvalidUrl { path: PathBuf, err: url::ParseError },
    /// A schema file does not live beneath the schemas root, so it has no
    /// canonical url.
    OutsideRoot { path: PathBuf, root: PathBuf },
    /// A type name did not end in `V<digits>`.
    MissingVersionSuffix { type_name: String },
    /// A field with a schema default is not a pointer.
    DefaultOnNonPointer { tag: String, ty: String },
    /// A field with a schema default is a pointer to a pointer.
    DefaultOnDoublePointer { tag: String, ty: String },
    /// A struct has both union members and normal fields.
    MixedStruct { type_name: String },
    /// A union member is itself a union.
    NestedUnion { type_name: String },
    /// A field shared by every union member has differing types.
    CommonMemberMismatch {
        field: String,
        types: BTreeSet<String>,
        variants: Vec<String>,
    },
    /// No `type X struct` line follows the given line.
    NoStructAfterLine { path: PathBuf, line: usize },
    /// The struct definition was not found, or never closed.
    StructNotFound { path: PathBuf, type_name: String },
    /// No schema in the version directory produces the type name.
    SchemaNotFound { type_name: String, dir: PathBuf },
    /// A struct body line could not be classified.
    UnclassifiedLine { line: usize, text: String },
    /// A schema file's path is not valid utf-8.
    NonUtf8Path { path: std::path::PathBuf },
    Io(std::io::Error),
}

impl Error {
    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    #[inline]
    pub(crate) fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidJson { .. }
            | Self::MissingTitle { .. }
            | Self::InvalidUrl { .. }
            | Self::OutsideRoot { .. } => ErrorCategory::Content,
            Self::MissingVersionSuffix { .. }
            | Self::DefaultOnNonPointer { .. }
            | Self::DefaultOnDoublePointer { .. }
            | Self::MixedStruct { .. }
            | Self::NestedUnion { .. }
            | Self::CommonMemberMismatch { .. } => ErrorCategory::Convention,
            Self::NoStructAfterLine { .. }
            | Self::StructNotFound { .. }
            | Self::SchemaNotFound { .. } => ErrorCategory::NotFound,
            Self::UnclassifiedLine { .. } => ErrorCategory::Unclassifiable,
            Self::NonUtf8Path { .. } | Self::Io(_) => ErrorCategory::Io,
        }
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(err: std::io::Error) -> Self {
        ErrorKind::Io(err).into()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InvalidJson { path, .. } => {
                write!(f, "{path} is not a valid json file")
            }
            ErrorKind::MissingTitle { url } => {
                write!(f, "{url} does not declare a string `title`")
            }
            ErrorKind::InvalidUrl { path, .. } => {
                write!(f, "unable to build a schema url for {path}")
            }
            ErrorKind::OutsideRoot { path, root } => {
                write!(f, "{path} is not beneath the schemas root {root}")
            }
            ErrorKind::MissingVersionSuffix { type_name } => write!(
                f,
                "{type_name} is not a valid schema type name; it should end in Vx where x is a digit"
            ),
            ErrorKind::DefaultOnNonPointer { tag, ty } => write!(
                f,
                "{tag} type ({ty}) must be a pointer since it can be defaulted"
            ),
            ErrorKind::DefaultOnDoublePointer { tag, ty } => {
                write!(f, "{tag} type ({ty}) must not be a double pointer")
            }
            ErrorKind::MixedStruct { type_name } => {
                write!(f, "{type_name} has both union tags and normal fields")
            }
            ErrorKind::NestedUnion { type_name } => write!(
                f,
                "detected nested union; {type_name} is a union member and also a union itself"
            ),
            ErrorKind::CommonMemberMismatch {
                field,
                types,
                variants,
            } => {
                let types = types.iter().map(String::as_str).collect::<Vec<_>>();
                write!(
                    f,
                    ".{field} has multiple types ({}) among union members [{}]",
                    types.join(", "),
                    variants.join(", ")
                )
            }
            ErrorKind::NoStructAfterLine { path, line } => {
                write!(f, "did not find struct in {path} after line {line}")
            }
            ErrorKind::StructNotFound { path, type_name } => {
                write!(f, "failed to find struct definition for {type_name} in {path}")
            }
            ErrorKind::SchemaNotFound { type_name, dir } => {
                write!(f, "failed to find schema for {type_name} in {dir}")
            }
            ErrorKind::UnclassifiedLine { line, text } => {
                write!(f, "unsure how to handle line {line}: '{text}'")
            }
            ErrorKind::NonUtf8Path { path } => {
                write!(f, "{} is not a utf-8 path", path.display())
            }
            ErrorKind::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::InvalidJson { err, .. } => Some(err),
            ErrorKind::InvalidUrl { err, .. } => Some(err),
            _ => None,
        }
    }
}
