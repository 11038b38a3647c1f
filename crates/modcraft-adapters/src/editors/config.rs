//! `config/config.yml` editor backed by `serde_yaml_ng`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use modcraft_core::{
    application::{ApplicationError, ports::ConfigEditor},
    domain::{Value, ValueMap, values},
    error::CraftResult,
};

use super::atomic_write;
use crate::filesystem::map_io_error;

/// Project-relative location of the runtime config document.
pub const CONFIG_PATH: &str = "config/config.yml";

/// Merges module defaults into the project's YAML config.
///
/// Keys the document already has always win. A document that does not parse
/// as a mapping is left exactly as it is.
#[derive(Debug, Clone)]
pub struct YamlConfigEditor {
    path: PathBuf,
    catalog: BTreeMap<String, ValueMap>,
}

impl YamlConfigEditor {
    /// `catalog` maps module names to their defaults, usually
    /// `ModuleRegistry::defaults_catalog()`.
    pub fn new(project_root: impl AsRef<Path>, catalog: BTreeMap<String, ValueMap>) -> Self {
        Self {
            path: project_root.as_ref().join(CONFIG_PATH),
            catalog,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the document exists but is not a YAML mapping.
    fn load(&self) -> CraftResult<Option<ValueMap>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Some(ValueMap::new())),
            Err(e) => return Err(map_io_error(&self.path, e, "read config")),
        };
        if text.trim().is_empty() {
            return Ok(Some(ValueMap::new()));
        }
        match serde_yaml_ng::from_str::<ValueMap>(&text) {
            Ok(map) => Ok(Some(map)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "config is not a YAML mapping, leaving it alone");
                Ok(None)
            }
        }
    }

    fn store(&self, document: &ValueMap) -> CraftResult<()> {
        let text = serde_yaml_ng::to_string(document).map_err(|e| ApplicationError::ConfigDocument {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        atomic_write(&self.path, &text)
    }
}

impl ConfigEditor for YamlConfigEditor {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn ensure_defaults_for(&self, module: &str) -> CraftResult<()> {
        let Some(defaults) = self.catalog.get(module) else {
            debug!("module declares no defaults");
            return Ok(());
        };
        let Some(mut document) = self.load()? else {
            return Ok(());
        };

        let before = document.clone();
        values::merge_missing(&mut document, defaults);
        if document == before && self.path.exists() {
            debug!("defaults already present");
            return Ok(());
        }
        self.store(&document)
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, path: &str, value: Value) -> CraftResult<()> {
        let Some(mut document) = self.load()? else {
            return Ok(());
        };
        if values::get_path(&document, path) == Some(&value) {
            return Ok(());
        }
        values::set_path(&mut document, path, value)?;
        self.store(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn gorm_catalog() -> BTreeMap<String, ValueMap> {
        let mut defaults = ValueMap::new();
        values::set_path(&mut defaults, "gorm.driver", "sqlite".into()).unwrap();
        values::set_path(&mut defaults, "gorm.max_open_conns", Value::Integer(25)).unwrap();
        BTreeMap::from([("db:gorm".to_string(), defaults)])
    }

    fn read_yaml(path: &Path) -> ValueMap {
        serde_yaml_ng::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn creates_document_when_missing() {
        let dir = TempDir::new().unwrap();
        let editor = YamlConfigEditor::new(dir.path(), gorm_catalog());
        editor.ensure_defaults_for("db:gorm").unwrap();

        let doc = read_yaml(editor.path());
        assert_eq!(values::get_str(&doc, "gorm.driver"), Some("sqlite"));
        assert_eq!(
            values::get_path(&doc, "gorm.max_open_conns"),
            Some(&Value::Integer(25))
        );
    }

    #[test]
    fn existing_keys_win() {
        let dir = TempDir::new().unwrap();
        let editor = YamlConfigEditor::new(dir.path(), gorm_catalog());
        fs::create_dir_all(editor.path().parent().unwrap()).unwrap();
        fs::write(editor.path(), "app:\n  name: demo\ngorm:\n  driver: postgres\n").unwrap();

        editor.ensure_defaults_for("db:gorm").unwrap();

        let doc = read_yaml(editor.path());
        assert_eq!(values::get_str(&doc, "gorm.driver"), Some("postgres"));
        assert_eq!(values::get_str(&doc, "app.name"), Some("demo"));
        assert_eq!(
            values::get_path(&doc, "gorm.max_open_conns"),
            Some(&Value::Integer(25))
        );
    }

    #[test]
    fn unparsable_document_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let editor = YamlConfigEditor::new(dir.path(), gorm_catalog());
        fs::create_dir_all(editor.path().parent().unwrap()).unwrap();
        fs::write(editor.path(), "- just\n- a list\n").unwrap();

        editor.ensure_defaults_for("db:gorm").unwrap();
        editor.set("gorm.driver", "mysql".into()).unwrap();

        assert_eq!(
            fs::read_to_string(editor.path()).unwrap(),
            "- just\n- a list\n"
        );
    }

    #[test]
    fn unknown_module_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let editor = YamlConfigEditor::new(dir.path(), gorm_catalog());
        editor.ensure_defaults_for("http:gin").unwrap();
        assert!(!editor.path().exists());
    }

    #[test]
    fn set_overwrites_one_key() {
        let dir = TempDir::new().unwrap();
        let editor = YamlConfigEditor::new(dir.path(), gorm_catalog());
        editor.ensure_defaults_for("db:gorm").unwrap();
        editor.set("gorm.driver", "postgres".into()).unwrap();

        let doc = read_yaml(editor.path());
        assert_eq!(values::get_str(&doc, "gorm.driver"), Some("postgres"));
        assert_eq!(
            values::get_path(&doc, "gorm.max_open_conns"),
            Some(&Value::Integer(25))
        );
    }
}
