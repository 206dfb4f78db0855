use super::Lines;
use crate::schema::Schema;

/// A python module holding every schema of a package, keyed by url
pub fn gen_python(schemas: &[Schema]) -> Lines {
    let mut lines = Lines::new();

    lines.extend([
        "# This is a generated file.  Editing it will make you sad.",
        "",
        "import json",
        "",
        "schemas = {",
    ]);

    for schema in schemas {
        lines.push(format!("    \"{}\": json.loads(", schema.url()));
        lines.push(format!("        r\"\"\"\n{}\n\"\"\"", schema.text()));
        lines.push("    ),");
    }

    lines.push("}");
    lines
}
