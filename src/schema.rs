//! Discovery and loading of the versioned JSON schema documents

pub mod naming;

use crate::{
    error::{Error, ErrorKind},
    Config, Path, PathBuf, Result,
};
use serde_json::Value;
use url::Url;

/// A single JSON schema document, along with the names derived from it
#[derive(Debug, Clone)]
pub struct Schema {
    url: Url,
    text: String,
    document: Value,
    struct_name: String,
    tool_name: String,
}

impl Schema {
    /// Parses a schema document that is identified by `url`.
    ///
    /// `path` is only used to identify the source when the document is malformed.
    pub fn new(url: Url, text: String, path: &Path) -> Result<Self> {
        let document: Value = serde_json::from_str(&text).map_err(|err| ErrorKind::InvalidJson {
            path: path.to_owned(),
            err,
        })?;

        let title = document
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| ErrorKind::MissingTitle {
                url: url.to_string(),
            })?;

        let struct_name = naming::struct_name(title, version_segment(&url));
        let tool_name = naming::camel_to_snake(&struct_name);

        Ok(Self {
            url,
            text,
            document,
            struct_name,
            tool_name,
        })
    }

    /// Reads and parses the schema file at `path`
    pub fn load(cfg: &Config, path: &Path) -> Result<Self> {
        let url = cfg.schema_url(path)?;
        let text = fs::read_to_string(path)?;

        Self::new(url, text, path)
    }

    /// The stable identifier of the schema, used for cross references and
    /// validator lookups
    #[inline]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// The name of the version directory the schema lives in, eg. `v1`
    #[inline]
    pub fn version(&self) -> &str {
        version_segment(&self.url)
    }

    /// The raw, unparsed text of the schema file
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The Go type name, `title` + upper-cased version, eg. `FooV1`
    #[inline]
    pub fn struct_name(&self) -> &str {
        &self.struct_name
    }

    /// The snake-cased form of [`Self::struct_name`], eg. `foo_v1`
    #[inline]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// The subschema for the property with the given json tag, if there is one
    pub fn property(&self, tag: &str) -> Option<&Value> {
        self.document.get("properties")?.get(tag)
    }

    /// The list of required properties.
    ///
    /// Falls back to `eventuallyRequired` when `required` is absent or empty.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        fn list<'d>(doc: &'d Value, key: &str) -> Option<&'d Vec<Value>> {
            doc.get(key)
                .and_then(Value::as_array)
                .filter(|list| !list.is_empty())
        }

        list(&self.document, "required")
            .or_else(|| list(&self.document, "eventuallyRequired"))
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }
}

fn version_segment(url: &Url) -> &str {
    url.path_segments()
        .and_then(|segs| segs.rev().nth(1))
        .unwrap_or_default()
}

/// Lists every `.json` file beneath a package's directory, sorted by path
pub fn list_files(cfg: &Config, package: &str) -> Result<Vec<PathBuf>> {
    let root = cfg.package_dir(package);
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let err = std::io::Error::from(err);
            Error::from(std::io::Error::new(
                err.kind(),
                format!("failed to walk {root}: {err}"),
            ))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(path) = json_file(entry.into_path())? {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Filters out files that aren't schemas, a schema whose path can't be
/// represented is an error rather than being skipped
pub(crate) fn json_file(path: std::path::PathBuf) -> Result<Option<PathBuf>> {
    if path.extension().map_or(true, |ext| ext != "json") {
        return Ok(None);
    }

    PathBuf::from_path_buf(path)
        .map(Some)
        .map_err(|path| ErrorKind::NonUtf8Path { path }.into())
}

/// Loads every schema file, sorted by canonical url so that output built
/// from them is deterministic
pub fn load_schemas<P: AsRef<Path>>(cfg: &Config, files: &[P]) -> Result<Vec<Schema>> {
    let mut schemas = files
        .iter()
        .map(|path| {
            let schema = Schema::load(cfg, path.as_ref())?;
            log::debug!("loaded {} as {}", schema.url(), schema.struct_name());
            Ok(schema)
        })
        .collect::<Result<Vec<_>>>()?;

    schemas.sort_by(|a, b| a.url().cmp(b.url()));
    Ok(schemas)
}

/// Lists and loads every schema for each of the packages
pub fn load_packages<S: AsRef<str>>(cfg: &Config, packages: &[S]) -> Result<Vec<Schema>> {
    let mut files = Vec::new();
    for package in packages {
        files.extend(list_files(cfg, package.as_ref())?);
    }

    let schemas = load_schemas(cfg, &files)?;
    log::info!("loaded {} schemas", schemas.len());
    Ok(schemas)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrorCategory;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn non_utf8_schema_paths_are_fatal() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let td = tempfile::tempdir().unwrap();
        let root = PathBuf::from_path_buf(td.path().to_owned()).unwrap();
        let version = root.join("expconf/v0");
        fs::create_dir_all(&version).unwrap();
        fs::write(version.join("a.json"), r#"{"title": "A"}"#).unwrap();

        // Files that aren't schemas are ignored no matter their name
        let odd = version.as_std_path().join(OsStr::from_bytes(b"notes-\xff.txt"));
        std::fs::write(odd, "notes").unwrap();

        let cfg = Config::new(root);
        assert_eq!(list_files(&cfg, "expconf").unwrap().len(), 1);

        let bad = version.as_std_path().join(OsStr::from_bytes(b"b-\xff.json"));
        std::fs::write(&bad, r#"{"title": "B"}"#).unwrap();

        let err = list_files(&cfg, "expconf").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(matches!(&err.kind, ErrorKind::NonUtf8Path { path } if *path == bad));

        let err = load_packages(&cfg, &["expconf"]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NonUtf8Path { .. }));
    }

    #[test]
    fn derives_names() {
        let schema = Schema::new(
            url("http://determined.ai/schemas/expconf/v3/foo.json"),
            r#"{"title": "Foo"}"#.to_owned(),
            Path::new("expconf/v3/foo.json"),
        )
        .unwrap();

        assert_eq!(schema.version(), "v3");
        assert_eq!(schema.struct_name(), "FooV3");
        assert_eq!(schema.tool_name(), "foo_v3");
    }

    #[test]
    fn malformed_json_names_the_file() {
        let err = Schema::new(
            url("http://determined.ai/schemas/expconf/v1/bad.json"),
            "{ not json".to_owned(),
            Path::new("expconf/v1/bad.json"),
        )
        .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Content);
        assert!(err.to_string().contains("expconf/v1/bad.json"));
    }

    #[test]
    fn title_is_required() {
        let err = Schema::new(
            url("http://determined.ai/schemas/expconf/v1/anon.json"),
            r#"{"properties": {}}"#.to_owned(),
            Path::new("expconf/v1/anon.json"),
        )
        .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::MissingTitle { .. }));
    }

    #[test]
    fn required_falls_back() {
        let load = |doc: &str| {
            Schema::new(
                url("http://determined.ai/schemas/p/v1/a.json"),
                doc.to_owned(),
                Path::new("p/v1/a.json"),
            )
            .unwrap()
        };

        let schema = load(r#"{"title": "A", "required": ["a"], "eventuallyRequired": ["b"]}"#);
        assert_eq!(schema.required().collect::<Vec<_>>(), ["a"]);

        let schema = load(r#"{"title": "A", "eventuallyRequired": ["b"]}"#);
        assert_eq!(schema.required().collect::<Vec<_>>(), ["b"]);

        let schema = load(r#"{"title": "A", "required": [], "eventuallyRequired": ["b"]}"#);
        assert_eq!(schema.required().collect::<Vec<_>>(), ["b"]);

        let schema = load(r#"{"title": "A"}"#);
        assert_eq!(schema.required().count(), 0);
    }
}
