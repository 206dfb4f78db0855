//! Rendering of errors that point into a source file

use crate::{Error, ErrorCategory, ErrorKind};
use codespan_reporting::{
    files::SimpleFile,
    term::{self, termcolor::WriteColor},
};

pub use codespan_reporting::diagnostic::Severity;

pub type FilesErr = codespan_reporting::files::Error;
pub type Diagnostic = codespan_reporting::diagnostic::Diagnostic<()>;
pub type Label = codespan_reporting::diagnostic::Label<()>;

impl ErrorCategory {
    /// A short, stable code identifying the category
    pub fn code(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Convention => "convention",
            Self::NotFound => "not-found",
            Self::Unclassifiable => "unclassifiable",
            Self::Io => "io",
        }
    }
}

/// Converts an error into a diagnostic, labeling its location if it has one
pub fn to_diagnostic(err: &Error) -> Diagnostic {
    let mut diag = Diagnostic::error()
        .with_code(err.category().code())
        .with_message(err.to_string());

    if let Some(loc) = &err.location {
        let label = Label::primary((), loc.span.clone());
        let label = match &err.kind {
            ErrorKind::UnclassifiedLine { .. } => label.with_message(
                "expected a single field with a `json` tag, or a `union` tagged member",
            ),
            _ => label,
        };

        diag = diag.with_labels(vec![label]);
    }

    diag
}

/// Renders the error as a diagnostic against `source`, the contents of the
/// file the error's location refers to. Errors without a location are
/// rendered as a plain message.
pub fn emit(err: &Error, source: &str, writer: &mut dyn WriteColor) -> Result<(), FilesErr> {
    let name = err
        .location
        .as_ref()
        .map_or_else(String::new, |loc| loc.path.to_string());
    let file = SimpleFile::new(name, source);

    let config = term::Config::default();
    term::emit(writer, &config, &file, &to_diagnostic(err))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::SourceFile;
    use codespan_reporting::term::termcolor::NoColor;

    #[test]
    fn points_at_the_line() {
        let src = SourceFile::new(
            "expconf/broken.go",
            "package expconf\n\ntype BrokenV0 struct {\n\tA, B int\n}\n",
        );
        let err = src.find_struct("BrokenV0").unwrap_err();

        let mut out = NoColor::new(Vec::new());
        emit(&err, src.text(), &mut out).unwrap();
        let rendered = String::from_utf8(out.into_inner()).unwrap();

        assert!(
            rendered.contains("error[unclassifiable]: unsure how to handle line 4"),
            "{rendered}"
        );
        assert!(rendered.contains("expconf/broken.go:4:1"), "{rendered}");
        assert!(rendered.contains("or a `union` tagged member"), "{rendered}");
    }

    #[test]
    fn unlocated_errors() {
        let err = Error::from(ErrorKind::MissingVersionSuffix {
            type_name: "Foo".to_owned(),
        });

        let diag = to_diagnostic(&err);
        assert!(diag.labels.is_empty());
        assert_eq!(diag.code.as_deref(), Some("convention"));
        assert_eq!(diag.severity, Severity::Error);
    }
}
