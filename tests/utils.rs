#![allow(dead_code)]

use schemagen::{source::SourceFile, Config, PathBuf};

pub const TEST_DATA: &str = "./tests/test_data";

/// A config rooted at the schema fixtures, which must not be modified
pub fn fixture_config() -> Config {
    Config::new(PathBuf::from(TEST_DATA).join("schemas"))
}

/// Copies the schema fixtures into a scratch directory that tests are free
/// to modify
pub fn scratch_schemas() -> (tempfile::TempDir, Config) {
    let td = tempfile::tempdir().expect("failed to create scratch dir");

    let mut opts = fs_extra::dir::CopyOptions::new();
    opts.content_only = true;
    fs_extra::dir::copy(PathBuf::from(TEST_DATA).join("schemas"), td.path(), &opts)
        .expect("failed to copy schema fixtures");

    let root = PathBuf::from_path_buf(td.path().to_owned()).expect("non-utf8 temp dir");
    (td, Config::new(root))
}

pub fn go_source(name: &str) -> SourceFile {
    SourceFile::load(PathBuf::from(TEST_DATA).join("go").join(name))
        .expect("failed to load go fixture")
}

/// The line a `//go:generate` directive for `type_name` would be on, which
/// is the line just before its definition
pub fn directive_line(source: &SourceFile, type_name: &str) -> usize {
    let opening = format!("type {type_name} struct");
    source
        .text()
        .lines()
        .position(|line| line.starts_with(&opening))
        .unwrap_or_else(|| panic!("{type_name} is not defined in {}", source.path()))
}
