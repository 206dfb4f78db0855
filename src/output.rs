use crate::{Path, Result};
use std::io::Write;

/// What [`write_output`] did with the generated text
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No destination was given, the text went to stdout
    Stdout,
    /// The destination already held exactly this text and was left alone
    Unchanged,
    /// The destination was created or overwritten
    Written,
}

/// Writes `text` to `destination`, or stdout if there isn't one.
///
/// An existing file is only rewritten if its contents differ, so that its
/// modification time only changes when its contents do, and build tools
/// watching it don't do needless work.
pub fn write_output(text: &str, destination: Option<&Path>) -> Result<WriteOutcome> {
    let Some(path) = destination else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        return Ok(WriteOutcome::Stdout);
    };

    if path.is_file() && fs::read(path)? == text.as_bytes() {
        log::info!("{path} is unchanged");
        return Ok(WriteOutcome::Unchanged);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, text)?;
    log::info!("wrote {path}");
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::PathBuf;

    #[test]
    fn writes_only_on_change() {
        let td = tempfile::tempdir().unwrap();
        let root = PathBuf::from_path_buf(td.path().to_owned()).unwrap();
        let path = root.join("nested/dir/zgen_foo_v1.go");

        assert_eq!(
            write_output("one\n", Some(&path)).unwrap(),
            WriteOutcome::Written
        );
        assert_eq!(
            write_output("one\n", Some(&path)).unwrap(),
            WriteOutcome::Unchanged
        );
        assert_eq!(
            write_output("two\n", Some(&path)).unwrap(),
            WriteOutcome::Written
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "two\n");
    }
}
