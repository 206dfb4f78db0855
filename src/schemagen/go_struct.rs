use anyhow::{Context, Error};
use schemagen::{
    emit::{self, GoImport},
    source::SourceFile,
    write_output, Config, PathBuf,
};

#[derive(clap::Parser, Debug)]
pub struct Args {
    /// The Go package the struct is in, which is also the schema package
    #[arg(long, env = "GOPACKAGE")]
    package: String,
    /// The Go file containing the struct
    #[arg(long, env = "GOFILE")]
    file: PathBuf,
    /// The line of the `//go:generate` directive, the struct is the first one
    /// defined after it
    #[arg(long, env = "GOLINE")]
    line: usize,
    /// Comma separated extra imports, each either `path` or `alias:path`,
    /// eg. `k8sV1:k8s.io/api/core/v1`
    #[arg(long)]
    imports: Option<String>,
    /// The file to write to, defaults to `zgen_<name>.go` next to the Go file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_imports(imports: Option<&str>) -> Result<Vec<GoImport>, Error> {
    imports
        .into_iter()
        .flat_map(|imports| imports.split(','))
        .filter(|imp| !imp.is_empty())
        .map(|imp| imp.parse::<GoImport>().map_err(Error::msg))
        .collect()
}

pub fn cmd(args: Args, cfg: &Config) -> Result<(), Error> {
    let imports = parse_imports(args.imports.as_deref())?;

    let source = SourceFile::load(args.file.clone())
        .with_context(|| format!("failed to read {}", args.file))?;

    let generated = emit::gen_go_struct(cfg, &args.package, &source, args.line, &imports)
        .with_context(|| {
            format!(
                "failed to generate code for the struct after {}:{}",
                args.file, args.line
            )
        })?;

    let output = args.output.unwrap_or_else(|| match args.file.parent() {
        Some(parent) => parent.join(&generated.file_name),
        None => PathBuf::from(&generated.file_name),
    });

    write_output(&generated.lines.render(), Some(&output))
        .with_context(|| format!("failed to write code for {}", generated.struct_name))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn skips_empty_imports() {
        let imports = parse_imports(Some("k8sV1:k8s.io/api/core/v1,,time,")).unwrap();
        let rendered = imports.iter().map(|i| i.to_string()).collect::<Vec<_>>();
        assert_eq!(rendered, ["k8sV1 \"k8s.io/api/core/v1\"", "\"time\""]);

        assert!(parse_imports(None).unwrap().is_empty());
        assert!(parse_imports(Some("bad:")).is_err());
    }
}
