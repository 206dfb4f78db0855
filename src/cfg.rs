use crate::{error::ErrorKind, Path, PathBuf, Result};
use camino::Utf8Component;
use url::Url;

/// The base that schema paths are joined onto to form their canonical url
pub const DEFAULT_URL_BASE: &str = "http://determined.ai/schemas";
/// Import path of the Go package implementing defaulting, merging, and
/// validator lookup
pub const DEFAULT_RUNTIME_IMPORT: &str = "github.com/determined-ai/determined/master/pkg/schemas";
/// Import path of the Go json-schema implementation the validators come from
pub const DEFAULT_VALIDATOR_IMPORT: &str = "github.com/santhosh-tekuri/jsonschema/v2";

/// Settings shared by every generator
#[derive(Debug, Clone)]
pub struct Config {
    /// The directory containing one subdirectory per schema package.
    ///
    /// Canonical urls are computed relative to this directory.
    pub root: PathBuf,
    /// Always ends with a `/` so that relative paths are appended rather
    /// than replacing the last segment
    url_base: Url,
    /// The packages embedded in the root Go module
    pub packages: Vec<String>,
    pub runtime_import: String,
    pub validator_import: String,
}

impl Config {
    /// Creates a config rooted at `root`, with the default url base
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            url_base: base_url(DEFAULT_URL_BASE).expect("the default url base is valid"),
            packages: vec!["expconf".to_owned()],
            runtime_import: DEFAULT_RUNTIME_IMPORT.to_owned(),
            validator_import: DEFAULT_VALIDATOR_IMPORT.to_owned(),
        }
    }

    /// Overrides the url base canonical schema urls are built from
    pub fn with_url_base(mut self, base: &str) -> Result<Self, url::ParseError> {
        self.url_base = base_url(base)?;
        Ok(self)
    }

    #[inline]
    pub fn url_base(&self) -> &Url {
        &self.url_base
    }

    /// The directory holding all versions of a package's schemas
    #[inline]
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.root.join(package)
    }

    /// The canonical url of a schema file, which must reside under the root.
    ///
    /// Each path component becomes one url path segment, so characters such
    /// as spaces, `#` and `?` are percent-encoded rather than changing the
    /// meaning of the url.
    pub fn schema_url(&self, path: &Path) -> Result<Url> {
        let outside = || ErrorKind::OutsideRoot {
            path: path.to_owned(),
            root: self.root.clone(),
        };

        let relative = path.strip_prefix(&self.root).map_err(|_| outside())?;

        let mut segments = Vec::new();
        for comp in relative.components() {
            match comp {
                Utf8Component::Normal(seg) => segments.push(seg),
                Utf8Component::CurDir => {}
                _ => return Err(outside().into()),
            }
        }

        if segments.is_empty() {
            return Err(outside().into());
        }

        let mut url = self.url_base.clone();
        url.path_segments_mut()
            .map_err(|()| ErrorKind::InvalidUrl {
                path: path.to_owned(),
                err: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Schema paths are appended as path segments, which a base like
/// `mailto:` can't have
fn base_url(base: &str) -> Result<Url, url::ParseError> {
    let url = if base.ends_with('/') {
        Url::parse(base)?
    } else {
        Url::parse(&format!("{base}/"))?
    };

    if url.cannot_be_a_base() {
        return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
    }

    Ok(url)
}
