use anyhow::{Context, Error};
use schemagen::{emit, schema, write_output, Config, PathBuf};

#[derive(clap::Parser, Debug)]
pub struct Args {
    /// A schema package to embed, may be specified multiple times.
    ///
    /// Defaults to every known package.
    #[arg(long = "package")]
    packages: Vec<String>,
    /// The file to write the module to, stdout if not specified
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: Args, cfg: &Config) -> Result<(), Error> {
    let packages = if args.packages.is_empty() {
        &cfg.packages
    } else {
        &args.packages
    };

    let schemas = schema::load_packages(cfg, packages).context("failed to load schemas")?;

    let text = emit::gen_go_root(&schemas).render();

    write_output(&text, args.output.as_deref()).context("failed to write root module")?;
    Ok(())
}
