//! The aggregate module embedding every schema, which is what allows
//! validators for one schema to resolve references into any other

use super::{Lines, GO_HEADER};
use crate::schema::Schema;

/// Go raw strings can't contain backticks, so they are spliced in as an
/// interpreted string instead
fn raw_string(text: &str) -> String {
    format!("`{}`", text.replace('`', "` + \"`\" + `"))
}

pub fn gen_go_root(schemas: &[Schema]) -> Lines {
    let mut lines = Lines::new();

    lines.extend([
        GO_HEADER,
        "",
        "package schemas",
        "",
        "import (",
        "\t\"encoding/json\"",
        ")",
        "",
    ]);

    lines.push("var (");
    lines.extend(schemas.iter().map(|schema| {
        format!(
            "\ttext{} = []byte({})",
            schema.struct_name(),
            raw_string(schema.text())
        )
    }));
    for schema in schemas {
        lines.push(format!("\tschema{} interface{{}}", schema.struct_name()));
        lines.blank();
    }
    lines.push("\tcachedSchemaMap map[string]interface{}");
    lines.blank();
    lines.push("\tcachedSchemaBytesMap map[string][]byte");
    lines.push(")");
    lines.blank();

    for schema in schemas {
        let name = schema.struct_name();

        lines.extend([
            format!("func Parsed{name}() interface{{}} {{"),
            format!("\tif schema{name} != nil {{"),
            format!("\t\treturn schema{name}"),
            "\t}".to_owned(),
            format!("\terr := json.Unmarshal(text{name}, &schema{name})"),
            "\tif err != nil {".to_owned(),
            format!("\t\tpanic(\"invalid embedded json for {name}\")"),
            "\t}".to_owned(),
            format!("\treturn schema{name}"),
            "}".to_owned(),
            String::new(),
        ]);
    }

    lines.extend([
        "func schemaBytesMap() map[string][]byte {",
        "\tif cachedSchemaBytesMap != nil {",
        "\t\treturn cachedSchemaBytesMap",
        "\t}",
        "\tvar url string",
        "\tcachedSchemaBytesMap = map[string][]byte{}",
    ]);
    for schema in schemas {
        lines.push(format!("\turl = \"{}\"", schema.url()));
        lines.push(format!(
            "\tcachedSchemaBytesMap[url] = text{}",
            schema.struct_name()
        ));
    }
    lines.push("\treturn cachedSchemaBytesMap");
    lines.push("}");

    log::debug!("embedded {} schemas in the root module", schemas.len());
    lines
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splices_backticks() {
        assert_eq!(raw_string("{}"), "`{}`");
        assert_eq!(
            raw_string(r#"{"description": "use `x`"}"#),
            r#"`{"description": "use ` + "`" + `x` + "`" + `"}`"#
        );
    }

    #[test]
    fn empty_root() {
        let text = gen_go_root(&[]).render();
        assert!(text.starts_with(GO_HEADER));
        assert!(text.contains("var (\n\tcachedSchemaMap map[string]interface{}\n"));
        assert!(text.ends_with(
            "\tcachedSchemaBytesMap = map[string][]byte{}\n\treturn cachedSchemaBytesMap\n}\n"
        ));
    }
}
