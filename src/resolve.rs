//! Maps versioned Go type names back to the schema they were generated from

use crate::{
    error::ErrorKind,
    schema::{self, naming, Schema},
    Config, Path, PathBuf, Result,
};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Resolves type names to schemas within a single package.
///
/// Every version directory is read at most once over the lifetime of the
/// resolver, as resolving a union requires looking up each of its members.
pub struct SchemaResolver<'c> {
    cfg: &'c Config,
    package: String,
    versions: RefCell<HashMap<PathBuf, Rc<[Rc<Schema>]>>>,
}

impl<'c> SchemaResolver<'c> {
    pub fn new(cfg: &'c Config, package: impl Into<String>) -> Self {
        Self {
            cfg,
            package: package.into(),
            versions: RefCell::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Finds the schema whose derived type name is `type_name`, which must
    /// end with a `V<digits>` version suffix
    pub fn resolve(&self, type_name: &str) -> Result<Rc<Schema>> {
        let version =
            naming::version_of_type(type_name).ok_or_else(|| ErrorKind::MissingVersionSuffix {
                type_name: type_name.to_owned(),
            })?;

        let dir = self.cfg.package_dir(&self.package).join(version);
        let schemas = self.version_dir(&dir)?;

        let schema = schemas
            .iter()
            .find(|schema| schema.struct_name() == type_name)
            .ok_or_else(|| ErrorKind::SchemaNotFound {
                type_name: type_name.to_owned(),
                dir: dir.clone(),
            })?;

        log::debug!("resolved {type_name} to {}", schema.url());
        Ok(schema.clone())
    }

    fn version_dir(&self, dir: &Path) -> Result<Rc<[Rc<Schema>]>> {
        if let Some(schemas) = self.versions.borrow().get(dir) {
            return Ok(schemas.clone());
        }

        let schemas = load_dir(self.cfg, dir)?;
        self.versions
            .borrow_mut()
            .insert(dir.to_owned(), schemas.clone());
        Ok(schemas)
    }
}

/// Loads the `.json` files directly inside `dir`, a missing directory simply
/// has no schemas
fn load_dir(cfg: &Config, dir: &Path) -> Result<Rc<[Rc<Schema>]>> {
    if !dir.is_dir() {
        log::debug!("version directory {dir} does not exist");
        return Ok(Vec::new().into());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        if let Some(path) = schema::json_file(entry.path())? {
            files.push(path);
        }
    }

    files.sort();
    log::debug!("loading {} schemas from {dir}", files.len());

    let schemas = schema::load_schemas(cfg, &files)?;
    Ok(schemas.into_iter().map(Rc::new).collect())
}
