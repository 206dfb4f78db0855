//! Introspection of the Go struct definitions that code is generated for

pub mod decl;

use crate::{
    error::{Error, ErrorKind, Location},
    Path, PathBuf, Result,
};
use decl::GoType;
use std::ops::Range;

/// A plain field, eg. `Name *string \`json:"name"\``
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: GoType,
    /// The name portion of the `json` tag
    pub tag: String,
}

/// A union member, eg. `Shared *SharedFSConfigV0 \`union:"type,shared_fs"\``
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionSpec {
    pub name: String,
    pub ty: GoType,
}

/// The fields of a single struct definition, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructDescriptor {
    pub name: String,
    pub fields: Vec<FieldSpec>,
    pub unions: Vec<UnionSpec>,
}

/// What kind of code a struct gets
#[derive(Debug, Copy, Clone)]
pub enum StructKind<'d> {
    /// A struct of normal fields, or no fields at all
    Plain(&'d [FieldSpec]),
    /// A sum type, where exactly one member is expected to be populated
    Union(&'d [UnionSpec]),
}

impl StructDescriptor {
    /// Determines whether this is a plain struct or a union, a struct can't
    /// be both
    pub fn kind(&self) -> Result<StructKind<'_>> {
        match (self.fields.is_empty(), self.unions.is_empty()) {
            (false, false) => Err(ErrorKind::MixedStruct {
                type_name: self.name.clone(),
            }
            .into()),
            (true, false) => Ok(StructKind::Union(&self.unions)),
            _ => Ok(StructKind::Plain(&self.fields)),
        }
    }
}

struct Line<'s> {
    /// 1-based
    number: usize,
    span: Range<usize>,
    text: &'s str,
}

/// A Go source file
pub struct SourceFile {
    path: PathBuf,
    text: String,
}

impl SourceFile {
    #[inline]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path)?;
        Ok(Self { path, text })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        let mut offset = 0;
        self.text
            .split_inclusive('\n')
            .enumerate()
            .map(move |(i, raw)| {
                let start = offset;
                offset += raw.len();

                let text = raw.strip_suffix('\n').unwrap_or(raw);
                let text = text.strip_suffix('\r').unwrap_or(text);

                Line {
                    number: i + 1,
                    span: start..start + text.len(),
                    text,
                }
            })
    }

    /// The name of the first struct defined strictly after the given 1-based
    /// line, which is how a `//go:generate` directive identifies the struct
    /// it is attached to
    pub fn next_struct_name(&self, line: usize) -> Result<&str> {
        self.lines()
            .filter(|l| l.number > line)
            .find_map(|l| decl::struct_open(l.text).map(|open| open.name))
            .ok_or_else(|| {
                ErrorKind::NoStructAfterLine {
                    path: self.path.clone(),
                    line,
                }
                .into()
            })
    }

    /// Finds the definition of `type_name` and classifies every line of its
    /// body as either a plain field or a union member
    pub fn find_struct(&self, type_name: &str) -> Result<StructDescriptor> {
        let mut lines = self.lines();

        let opened = lines.by_ref().find_map(|l| {
            decl::struct_open(l.text).filter(|open| open.name == type_name)
        });

        let not_found = || -> Error {
            ErrorKind::StructNotFound {
                path: self.path.clone(),
                type_name: type_name.to_owned(),
            }
            .into()
        };

        let opened = opened.ok_or_else(not_found)?;

        let mut desc = StructDescriptor {
            name: type_name.to_owned(),
            ..Default::default()
        };

        if opened.closed {
            return Ok(desc);
        }

        for line in lines {
            let trimmed = line.text.trim();

            if trimmed == "}" {
                log::debug!(
                    "found {type_name} in {} with {} fields and {} union members",
                    self.path,
                    desc.fields.len(),
                    desc.unions.len()
                );
                return Ok(desc);
            }

            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }

            match classify(line.text) {
                Some(Member::Field(field)) => desc.fields.push(field),
                Some(Member::Union(union)) => desc.unions.push(union),
                None => {
                    return Err(Error::from(ErrorKind::UnclassifiedLine {
                        line: line.number,
                        text: line.text.trim_end().to_owned(),
                    })
                    .at(Location {
                        path: self.path.clone(),
                        line: line.number,
                        span: line.span,
                    }));
                }
            }
        }

        // Never saw the closing brace
        Err(not_found())
    }
}

enum Member {
    Field(FieldSpec),
    Union(UnionSpec),
}

fn classify(line: &str) -> Option<Member> {
    let field = decl::field(line)?;
    let tag = field.tag?;

    if tag.has("union") {
        return Some(Member::Union(UnionSpec {
            name: field.name.to_owned(),
            ty: field.ty,
        }));
    }

    let json = tag.get("json")?;
    let name = json.split(',').next().unwrap_or_default();

    if name.is_empty() {
        return None;
    }

    Some(Member::Field(FieldSpec {
        name: field.name.to_owned(),
        ty: field.ty,
        tag: name.to_owned(),
    }))
}
