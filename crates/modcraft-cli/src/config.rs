//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `MODCRAFT_*` environment variables, `__` between segments
//!    (`MODCRAFT_HOOKS__ENABLED=false`)
//! 3. Config file: `--config <FILE>` or [`AppConfig::config_path`]
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use modcraft_adapters::editors::{DEFAULT_COMBINATOR, DEFAULT_ROOT_PATH};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for generated projects.
    pub project: ProjectConfig,
    /// Where modules register themselves.
    pub composition_root: CompositionRootConfig,
    /// Post-generation hooks.
    pub hooks: HooksConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Prefix for the Go module path when `--module` is not given.
    pub module_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionRootConfig {
    /// Path of the DI root, relative to the project.
    pub path: String,
    /// Call expression whose arguments list the modules.
    pub combinator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            module_prefix: "github.com/you".into(),
        }
    }
}

impl Default for CompositionRootConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_ROOT_PATH.into(),
            combinator: DEFAULT_COMBINATOR.into(),
        }
    }
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            composition_root: CompositionRootConfig::default(),
            hooks: HooksConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(config_file, Environment::with_prefix("MODCRAFT"))
    }

    fn load_from(config_file: Option<&PathBuf>, env: Environment) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("serialising defaults")?;

        let file = match config_file {
            Some(path) => toml_file(path).required(true),
            None => toml_file(&Self::config_path()).required(false),
        };

        Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .ignore_empty(true),
            )
            .build()
            .context("reading configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.modcraft.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "modcraft", "modcraft")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".modcraft.toml"))
    }
}

fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env() -> Environment {
        Environment::with_prefix("MODCRAFT").source(Some(HashMap::new()))
    }

    #[test]
    fn defaults_match_generated_layout() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.composition_root.path, "internal/platform/di/root.go");
        assert_eq!(cfg.composition_root.combinator, "fx.Options");
        assert!(cfg.hooks.enabled);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn missing_default_file_returns_defaults() {
        let cfg = AppConfig::load_from(None, no_env()).unwrap();
        assert_eq!(cfg.project.module_prefix, "github.com/you");
    }

    #[test]
    fn file_overrides_defaults_partially() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[project]\nmodule_prefix = \"github.com/acme\"\n\n[hooks]\nenabled = false").unwrap();
        let path = file.path().to_path_buf();

        let cfg = AppConfig::load_from(Some(&path), no_env()).unwrap();
        assert_eq!(cfg.project.module_prefix, "github.com/acme");
        assert!(!cfg.hooks.enabled);
        assert_eq!(cfg.composition_root.combinator, "fx.Options");
    }

    #[test]
    fn environment_beats_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[hooks]\nenabled = true").unwrap();
        let path = file.path().to_path_buf();

        let env = Environment::with_prefix("MODCRAFT").source(Some(HashMap::from([
            ("MODCRAFT_HOOKS__ENABLED".to_string(), "false".to_string()),
            (
                "MODCRAFT_PROJECT__MODULE_PREFIX".to_string(),
                "gitlab.com/team".to_string(),
            ),
        ])));
        let cfg = AppConfig::load_from(Some(&path), env).unwrap();
        assert!(!cfg.hooks.enabled);
        assert_eq!(cfg.project.module_prefix, "gitlab.com/team");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here/modcraft.toml");
        assert!(AppConfig::load_from(Some(&path), no_env()).is_err());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
