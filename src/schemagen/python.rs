use anyhow::{Context, Error};
use schemagen::{emit, schema, write_output, Config, PathBuf};

#[derive(clap::Parser, Debug)]
pub struct Args {
    /// The schema package to generate the module for, eg. `expconf`
    #[arg(long)]
    package: String,
    /// The file to write the module to, stdout if not specified
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: Args, cfg: &Config) -> Result<(), Error> {
    let schemas = schema::load_packages(cfg, &[&args.package])
        .with_context(|| format!("failed to load schemas for package '{}'", args.package))?;

    let text = emit::gen_python(&schemas).render();

    write_output(&text, args.output.as_deref()).context("failed to write python module")?;
    Ok(())
}
