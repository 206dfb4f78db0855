//! Accessors and helpers for a single config struct, generated by the
//! `//go:generate` directive placed above it

use super::{receiver, Lines, GO_HEADER};
use crate::{
    defaults::resolve_defaulted_type,
    resolve::SchemaResolver,
    schema::Schema,
    source::{FieldSpec, SourceFile, StructKind},
    union::{common_members, UnionDispatch},
    Config, Result,
};
use std::{fmt, str::FromStr};

/// An extra import for the generated file, written on the command line as
/// either `path` or `alias:path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoImport {
    pub alias: Option<String>,
    pub path: String,
}

impl FromStr for GoImport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (alias, path) = match s.split_once(':') {
            Some((alias, path)) => (Some(alias), path),
            None => (None, s),
        };

        if path.is_empty() {
            return Err(format!("import '{s}' does not specify a path"));
        }

        if alias.map_or(false, str::is_empty) {
            return Err(format!("import '{s}' has an empty alias"));
        }

        Ok(Self {
            alias: alias.map(String::from),
            path: path.to_owned(),
        })
    }
}

impl fmt::Display for GoImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias} \"{}\"", self.path),
            None => write!(f, "\"{}\"", self.path),
        }
    }
}

/// The generated code for one struct
#[derive(Debug)]
pub struct GoStruct {
    pub struct_name: String,
    /// `zgen_<snake_case name>.go`
    pub file_name: String,
    pub lines: Lines,
}

/// Generates the code for the first struct defined after `line` in `source`.
///
/// `package` is both the Go package the source file belongs to and the
/// name of the schema package the struct's schema is found in.
pub fn gen_go_struct(
    cfg: &Config,
    package: &str,
    source: &SourceFile,
    line: usize,
    imports: &[GoImport],
) -> Result<GoStruct> {
    let struct_name = source.next_struct_name(line)?.to_owned();
    let desc = source.find_struct(&struct_name)?;
    let kind = desc.kind()?;

    let resolver = SchemaResolver::new(cfg, package);
    let schema = resolver.resolve(&struct_name)?;

    let x = receiver(&struct_name);

    let mut lines = header(cfg, package, imports);

    match kind {
        StructKind::Plain(fields) => {
            lines.append(getters(&x, &struct_name, &schema, fields)?);
        }
        StructKind::Union(members) => {
            let dispatch = UnionDispatch::new(&struct_name, members);
            lines.append(unions(&x, &resolver, source, &dispatch)?);
        }
    }

    lines.append(helpers(&x, &struct_name));
    lines.append(schema_interface(&x, &struct_name, schema.url()));

    let file_name = format!("zgen_{}.go", schema.tool_name());
    log::debug!("generated {} lines for {struct_name}", lines.len());

    Ok(GoStruct {
        struct_name,
        file_name,
        lines,
    })
}

fn header(cfg: &Config, package: &str, imports: &[GoImport]) -> Lines {
    let mut lines = Lines::new();

    lines.push(GO_HEADER);
    lines.blank();
    lines.push(format!("package {package}"));
    lines.blank();
    lines.push("import (");
    // The generated code refers to these two by a fixed name, whatever the
    // last element of their import path is
    lines.push(format!("\tjsonschema \"{}\"", cfg.validator_import));
    lines.extend(imports.iter().map(|imp| format!("\t{imp}")));
    lines.blank();
    lines.push(format!("\tschemas \"{}\"", cfg.runtime_import));
    lines.push(")");
    lines.blank();

    lines
}

fn getters(x: &str, struct_name: &str, schema: &Schema, fields: &[FieldSpec]) -> Result<Lines> {
    let mut lines = Lines::new();

    for field in fields {
        let dt = resolve_defaulted_type(schema, &field.tag, &field.ty)?;
        let name = &field.name;

        if dt.has_default() {
            lines.extend([
                format!("func ({x} {struct_name}) Get{name}() {} {{", dt.ty),
                format!("\tif {x}.{name} == nil {{"),
                format!(
                    "\t\tpanic(\"You must call WithDefaults on {struct_name} before .Get{name}\")"
                ),
                "\t}".to_owned(),
                format!("\treturn *{x}.{name}"),
                "}".to_owned(),
                String::new(),
            ]);
        } else {
            lines.extend([
                format!("func ({x} {struct_name}) Get{name}() {} {{", field.ty),
                format!("\treturn {x}.{name}"),
                "}".to_owned(),
                String::new(),
            ]);
        }
    }

    Ok(lines)
}

fn unions(
    x: &str,
    resolver: &SchemaResolver<'_>,
    source: &SourceFile,
    dispatch: &UnionDispatch<'_>,
) -> Result<Lines> {
    let struct_name = dispatch.type_name();
    let mut lines = Lines::new();

    lines.push(format!(
        "func ({x} {struct_name}) GetUnionMember() interface{{}} {{"
    ));
    lines.append(dispatch_body(x, dispatch, |member| format!("{x}.{member}")));
    lines.blank();

    let common = common_members(resolver, source, &dispatch.variant_types())?;

    for cm in common {
        lines.push(format!(
            "func ({x} {struct_name}) Get{}() {} {{",
            cm.field, cm.ty
        ));
        lines.append(dispatch_body(x, dispatch, |member| {
            format!("{x}.{member}.Get{}()", cm.field)
        }));
        lines.blank();
    }

    Ok(lines)
}

/// The body of a method that forwards to the active union member, which is
/// the first non-nil one in declaration order
fn dispatch_body(x: &str, dispatch: &UnionDispatch<'_>, ret: impl Fn(&str) -> String) -> Lines {
    let mut lines = Lines::new();

    for member in dispatch.members() {
        lines.extend([
            format!("\tif {x}.{} != nil {{", member.name),
            format!("\t\treturn {}", ret(&member.name)),
            "\t}".to_owned(),
        ]);
    }
    lines.push(format!("\tpanic(\"{}\")", UnionDispatch::NO_MEMBER));
    lines.push("}");

    lines
}

/// Typed wrappers around the runtime's reflection based defaulting and merging
fn helpers(x: &str, struct_name: &str) -> Lines {
    let mut lines = Lines::new();

    lines.extend([
        format!("func ({x} {struct_name}) WithDefaults() {struct_name} {{"),
        format!("\treturn schemas.WithDefaults({x}).({struct_name})"),
        "}".to_owned(),
        String::new(),
        format!("func ({x} {struct_name}) Merge(other {struct_name}) {struct_name} {{"),
        format!("\treturn schemas.Merge({x}, other).({struct_name})"),
        "}".to_owned(),
    ]);

    lines
}

/// Binds the struct to its embedded schema and the validators built from it
fn schema_interface(x: &str, struct_name: &str, url: &str) -> Lines {
    let mut lines = Lines::new();

    lines.extend([
        String::new(),
        format!("func ({x} {struct_name}) ParsedSchema() interface{{}} {{"),
        format!("\treturn schemas.Parsed{struct_name}()"),
        "}".to_owned(),
        String::new(),
        format!("func ({x} {struct_name}) SanityValidator() *jsonschema.Schema {{"),
        format!("\treturn schemas.GetSanityValidator(\"{url}\")"),
        "}".to_owned(),
        String::new(),
        format!("func ({x} {struct_name}) CompletenessValidator() *jsonschema.Schema {{"),
        format!("\treturn schemas.GetCompletenessValidator(\"{url}\")"),
        "}".to_owned(),
    ]);

    lines
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_imports() {
        let imp: GoImport = "k8sV1:k8s.io/api/core/v1".parse().unwrap();
        assert_eq!(imp.alias.as_deref(), Some("k8sV1"));
        assert_eq!(imp.to_string(), "k8sV1 \"k8s.io/api/core/v1\"");

        let imp: GoImport = "time".parse().unwrap();
        assert!(imp.alias.is_none());
        assert_eq!(imp.to_string(), "\"time\"");

        assert!("".parse::<GoImport>().is_err());
        assert!("alias:".parse::<GoImport>().is_err());
        assert!(":path".parse::<GoImport>().is_err());
    }

    #[test]
    fn runtime_imports_are_aliased() {
        let mut cfg = Config::new(".");
        cfg.runtime_import = "example.com/config/runtime".to_owned();
        cfg.validator_import = "example.com/jsonschema/v5".to_owned();

        let imports = ["time".parse::<GoImport>().unwrap()];
        let lines = header(&cfg, "expconf", &imports);
        let imports = lines
            .iter()
            .skip_while(|line| *line != "import (")
            .collect::<Vec<_>>();

        assert_eq!(
            imports,
            [
                "import (",
                "\tjsonschema \"example.com/jsonschema/v5\"",
                "\t\"time\"",
                "",
                "\tschemas \"example.com/config/runtime\"",
                ")",
                "",
            ]
        );
    }

    #[test]
    fn union_members_are_checked_in_order() {
        let members = ["B", "A"]
            .into_iter()
            .map(|name| crate::source::UnionSpec {
                name: name.to_owned(),
                ty: crate::source::decl::field(&format!("\tX *{name}V0")).unwrap().ty,
            })
            .collect::<Vec<_>>();
        let dispatch = UnionDispatch::new("UV0", &members);

        let body = dispatch_body("u", &dispatch, |member| format!("u.{member}.GetName()"));
        assert_eq!(
            body.iter().collect::<Vec<_>>(),
            [
                "\tif u.B != nil {",
                "\t\treturn u.B.GetName()",
                "\t}",
                "\tif u.A != nil {",
                "\t\treturn u.A.GetName()",
                "\t}",
                "\tpanic(\"no union member defined\")",
                "}",
            ]
        );
    }

    #[test]
    fn helpers_end_without_blank_line() {
        let lines = helpers("f", "FooV1");
        assert_eq!(lines.iter().last(), Some("}"));
        assert_eq!(
            lines.iter().next(),
            Some("func (f FooV1) WithDefaults() FooV1 {")
        );
    }
}
