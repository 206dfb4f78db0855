#![doc = include_str!("../README.md")]

pub mod cfg;
pub mod defaults;
pub mod diag;
pub mod emit;
mod error;
pub mod output;
pub mod resolve;
pub mod schema;
pub mod source;
pub mod union;

pub use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
pub use cfg::Config;
pub use error::{Error, ErrorCategory, ErrorKind, Location};
pub use output::{write_output, WriteOutcome};
pub use schema::Schema;

pub type Result<T, E = Error> = std::result::Result<T, E>;
