// BEGIN - Embark standard lints v0.4
// do not change or add/remove here, but one can add exceptions after this section
// for more info see: <https://github.com/EmbarkStudios/rust-ecosystem/issues/59>
#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::await_holding_lock,
    clippy::char_lit_as_u8,
    clippy::checked_conversions,
    clippy::dbg_macro,
    clippy::debug_assert_with_mut_call,
    clippy::doc_markdown,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::exit,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_deref_methods,
    clippy::explicit_into_iter_loop,
    clippy::fallible_impl_from,
    clippy::filter_map_next,
    clippy::float_cmp_const,
    clippy::fn_params_excessive_bools,
    clippy::if_let_mutex,
    clippy::implicit_clone,
    clippy::imprecise_flops,
    clippy::inefficient_to_string,
    clippy::invalid_upcast_comparisons,
    clippy::large_types_passed_by_value,
    clippy::let_unit_value,
    clippy::linkedlist,
    clippy::lossy_float_literal,
    clippy::macro_use_imports,
    clippy::manual_ok_or,
    clippy::map_err_ignore,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::match_on_vec_items,
    clippy::match_same_arms,
    clippy::match_wildcard_for_single_variants,
    clippy::mem_forget,
    clippy::mismatched_target_os,
    clippy::mut_mut,
    clippy::mutex_integer,
    clippy::needless_borrow,
    clippy::needless_continue,
    clippy::option_option,
    clippy::path_buf_push_overwrite,
    clippy::ptr_as_ptr,
    clippy::ref_option_ref,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_functions_in_if_condition,
    clippy::semicolon_if_nothing_returned,
    clippy::string_add_assign,
    clippy::string_add,
    clippy::string_lit_as_bytes,
    clippy::string_to_string,
    clippy::todo,
    clippy::trait_duplication_in_bounds,
    clippy::unimplemented,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::useless_transmute,
    clippy::verbose_file_reads,
    clippy::zero_sized_map_values,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms
)]
// END - Embark standard lints v0.4
#![allow(clippy::exit)]

use anyhow::{Context as _, Error};
use clap::{Parser, Subcommand, ValueEnum};
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use schemagen::{Config, PathBuf};

mod go_root;
mod go_struct;
mod python;

#[derive(Subcommand, Debug)]
enum Command {
    /// Generates the python module mapping each schema url of a package to
    /// the parsed schema
    #[command(name = "python")]
    Python(python::Args),
    /// Generates getters and schema bindings for the Go struct following a
    /// `//go:generate` directive
    #[command(name = "go-struct")]
    GoStruct(go_struct::Args),
    /// Generates the Go module embedding every schema
    #[command(name = "go-root")]
    GoRoot(go_root::Args),
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Auto,
    Always,
    Never,
}

fn parse_level(s: &str) -> Result<log::LevelFilter, Error> {
    s.parse::<log::LevelFilter>()
        .with_context(|| format!("failed to parse level '{s}'"))
}

/// Generates code from versioned JSON schemas
#[derive(Parser)]
#[command(author, version, about, long_about = None, rename_all = "kebab-case", max_term_width = 80)]
struct Opts {
    /// The log level for messages
    #[arg(
        short = 'L',
        long,
        default_value = "warn",
        value_parser = parse_level,
        global = true,
        long_help = "The log level for messages

Only log messages at or above the level will be emitted.

Possible values:
* off
* error
* warn
* info
* debug
* trace
"
    )]
    log_level: log::LevelFilter,
    /// Specify the format of log messages
    #[arg(long, default_value = "human", value_enum, global = true)]
    log_format: Format,
    /// Coloring of log messages and diagnostics
    #[arg(long, default_value = "auto", value_enum, global = true)]
    color: Color,
    /// The directory containing one subdirectory per schema package.
    ///
    /// Schema urls are built from paths relative to this directory.
    #[arg(long, env = "SCHEMAGEN_ROOT", default_value = ".", global = true)]
    schemas_root: PathBuf,
    /// The url that relative schema paths are joined onto
    #[arg(
        long,
        env = "SCHEMAGEN_URL_BASE",
        default_value = schemagen::cfg::DEFAULT_URL_BASE,
        global = true
    )]
    url_base: String,
    #[command(subcommand)]
    cmd: Command,
}

fn setup_logger(
    level: log::LevelFilter,
    format: Format,
    color: bool,
) -> Result<(), fern::InitError> {
    use log::Level::{Debug, Error, Info, Trace, Warn};
    use nu_ansi_term::Color::{Blue, Green, Purple, Red, Yellow};

    const HUMAN: &[time::format_description::FormatItem<'static>] =
        time::macros::format_description!("[hour]:[minute]:[second]");

    fn timestamp(fmt: &(impl time::formatting::Formattable + ?Sized)) -> String {
        time::OffsetDateTime::now_utc()
            .format(fmt)
            .unwrap_or_default()
    }

    match format {
        Format::Human => {
            if color {
                fern::Dispatch::new()
                    .level(level)
                    .format(move |out, message, record| {
                        out.finish(format_args!(
                            "{date} [{level}] {message}\x1B[0m",
                            date = timestamp(HUMAN),
                            level = match record.level() {
                                Error => Red.paint("ERROR"),
                                Warn => Yellow.paint("WARN"),
                                Info => Green.paint("INFO"),
                                Debug => Blue.paint("DEBUG"),
                                Trace => Purple.paint("TRACE"),
                            },
                        ));
                    })
                    .chain(std::io::stderr())
                    .apply()?;
            } else {
                fern::Dispatch::new()
                    .level(level)
                    .format(move |out, message, record| {
                        out.finish(format_args!(
                            "{date} [{level}] {message}",
                            date = timestamp(HUMAN),
                            level = match record.level() {
                                Error => "ERROR",
                                Warn => "WARN",
                                Info => "INFO",
                                Debug => "DEBUG",
                                Trace => "TRACE",
                            },
                        ));
                    })
                    .chain(std::io::stderr())
                    .apply()?;
            }
        }
        Format::Json => {
            fern::Dispatch::new()
                .level(level)
                .format(move |out, message, record| {
                    let level = match record.level() {
                        Error => "ERROR",
                        Warn => "WARN",
                        Info => "INFO",
                        Debug => "DEBUG",
                        Trace => "TRACE",
                    };

                    let line = serde_json::json!({
                        "type": "log",
                        "fields": {
                            "timestamp": timestamp(&time::format_description::well_known::Rfc3339),
                            "level": level,
                            "message": message.to_string(),
                        }
                    });

                    out.finish(format_args!("{line}"));
                })
                .chain(std::io::stderr())
                .apply()?;
        }
    }

    Ok(())
}

/// Renders errors that point into a source file as a diagnostic
fn report(err: &Error, color: bool) {
    let Some(err) = err
        .chain()
        .find_map(|e| e.downcast_ref::<schemagen::Error>())
    else {
        return;
    };

    let Some(loc) = &err.location else {
        return;
    };

    let source = match fs::read_to_string(&loc.path) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("unable to read source for diagnostic: {e}");
            return;
        }
    };

    let mut stderr = StandardStream::stderr(if color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    });

    if let Err(e) = schemagen::diag::emit(err, &source, &mut stderr) {
        log::warn!("failed to render diagnostic: {e}");
    }
}

fn real_main() -> Result<(), Error> {
    let args = Opts::parse();

    let color = match args.color {
        Color::Auto => {
            use std::io::IsTerminal;
            std::io::stderr().is_terminal()
        }
        Color::Always => true,
        Color::Never => false,
    };

    setup_logger(args.log_level, args.log_format, color)?;

    let cfg = Config::new(args.schemas_root)
        .with_url_base(&args.url_base)
        .with_context(|| format!("invalid url base '{}'", args.url_base))?;

    log::debug!("generating from schemas in {}", cfg.root);

    let res = match args.cmd {
        Command::Python(pargs) => python::cmd(pargs, &cfg),
        Command::GoStruct(gargs) => go_struct::cmd(gargs, &cfg),
        Command::GoRoot(rargs) => go_root::cmd(rargs, &cfg),
    };

    if let Err(err) = &res {
        report(err, color);
    }

    res
}

fn main() {
    match real_main() {
        Ok(_) => {}
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
