//! File-backed composition-root editor.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use modcraft_core::{
    application::{ApplicationError, ports::CompositionRootEditor},
    domain::CompositionDocument,
    error::CraftResult,
};

use super::atomic_write;
use crate::filesystem::map_io_error;

/// Where generated projects keep their DI root.
pub const DEFAULT_ROOT_PATH: &str = "internal/platform/di/root.go";

/// The call whose argument list aggregates module providers.
pub const DEFAULT_COMBINATOR: &str = "fx.Options";

/// Applies [`CompositionRootEditor::ensure`] to a Go source file.
///
/// The file is parsed into a [`CompositionDocument`], edited in memory and
/// written back only when something changed. A formatting failure after a
/// successful edit falls back to the unformatted text.
#[derive(Debug, Clone)]
pub struct CompositionRootFileEditor {
    root: PathBuf,
    relative: PathBuf,
    combinator: String,
}

impl CompositionRootFileEditor {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            root: project_root.into(),
            relative: PathBuf::from(DEFAULT_ROOT_PATH),
            combinator: DEFAULT_COMBINATOR.to_string(),
        }
    }

    pub fn with_path(mut self, relative: impl Into<PathBuf>) -> Self {
        self.relative = relative.into();
        self
    }

    pub fn with_combinator(mut self, combinator: impl Into<String>) -> Self {
        self.combinator = combinator.into();
        self
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(&self.relative)
    }

    fn read(&self, path: &Path) -> CraftResult<Option<String>> {
        match fs::read_to_string(path) {
            Ok(source) => Ok(Some(source)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(path, e, "read composition root")),
        }
    }
}

impl CompositionRootEditor for CompositionRootFileEditor {
    #[instrument(skip(self), fields(file = %self.relative.display()))]
    fn ensure(&self, alias: &str, import_path: &str, call_expr: &str) -> CraftResult<()> {
        for (what, value) in [
            ("alias", alias),
            ("import path", import_path),
            ("call expression", call_expr),
        ] {
            if value.trim().is_empty() {
                return Err(ApplicationError::invalid_argument(format!(
                    "composition root {what} must not be empty"
                ))
                .into());
            }
        }

        let path = self.path();
        let Some(source) = self.read(&path)? else {
            debug!("no composition root, nothing to wire");
            return Ok(());
        };

        let located = |e: modcraft_core::domain::DomainError| e.in_file(self.relative.display());
        let mut doc = CompositionDocument::parse(source).map_err(located)?;
        let import_added = doc.ensure_import(alias, import_path).map_err(located)?;
        let call_added = doc
            .ensure_call_argument(&self.combinator, call_expr)
            .map_err(located)?;

        if !import_added && !call_added {
            debug!("already wired");
            return Ok(());
        }

        let output = match doc.format() {
            Ok(formatted) => formatted,
            Err(e) => {
                warn!(error = %e, "formatting failed, writing unformatted source");
                doc.into_source()
            }
        };
        atomic_write(&path, &output)?;
        info!(import_added, call_added, "composition root updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modcraft_core::domain::DomainError;
    use modcraft_core::error::CraftError;
    use tempfile::TempDir;

    const ROOT: &str = "package di

import (
\t\"go.uber.org/fx\"

\t\"github.com/you/demo/internal/platform/config\"
)

func Root() fx.Option {
\treturn fx.Options(
\t\tconfig.Module(),
\t)
}
";

    fn project(source: &str) -> (TempDir, CompositionRootFileEditor) {
        let dir = TempDir::new().unwrap();
        let editor = CompositionRootFileEditor::new(dir.path());
        fs::create_dir_all(editor.path().parent().unwrap()).unwrap();
        fs::write(editor.path(), source).unwrap();
        (dir, editor)
    }

    #[test]
    fn ensure_wires_import_and_call() {
        let (_dir, editor) = project(ROOT);
        editor
            .ensure(
                "httpgin",
                "github.com/you/demo/internal/adapters/inbound/http/gin",
                "httpgin.Module()",
            )
            .unwrap();

        let expected = "package di

import (
\t\"go.uber.org/fx\"

\t\"github.com/you/demo/internal/platform/config\"
\thttpgin \"github.com/you/demo/internal/adapters/inbound/http/gin\"
)

func Root() fx.Option {
\treturn fx.Options(
\t\tconfig.Module(),
\t\thttpgin.Module(),
\t)
}
";
        assert_eq!(fs::read_to_string(editor.path()).unwrap(), expected);
    }

    #[test]
    fn second_ensure_is_byte_identical() {
        let (_dir, editor) = project(ROOT);
        let args = ("gormdb", "github.com/you/demo/internal/platform/db/gorm", "gormdb.Module()");
        editor.ensure(args.0, args.1, args.2).unwrap();
        let first = fs::read(editor.path()).unwrap();
        editor.ensure(args.0, args.1, args.2).unwrap();
        assert_eq!(fs::read(editor.path()).unwrap(), first);
    }

    #[test]
    fn empty_import_and_call_are_filled() {
        let (_dir, editor) = project("package di\n\nimport ()\n\nfunc Root() fx.Option {\n\treturn fx.Options()\n}\n");
        editor
            .ensure("grpcserver", "example.com/app/grpc/server", "grpcserver.Module()")
            .unwrap();

        let written = fs::read_to_string(editor.path()).unwrap();
        assert!(written.contains("\tgrpcserver \"example.com/app/grpc/server\"\n"));
        assert!(written.contains("return fx.Options(grpcserver.Module())"));
        CompositionDocument::parse(written).unwrap();
    }

    #[test]
    fn call_closed_on_last_argument_line() {
        let (_dir, editor) = project(
            "package di\n\nimport \"go.uber.org/fx\"\n\nfunc Root() fx.Option {\n\treturn fx.Options(a.Module(),\n\t\tb.Module())\n}\n",
        );
        editor.ensure("x", "example.com/x", "x.Module()").unwrap();

        let written = fs::read_to_string(editor.path()).unwrap();
        assert!(written.contains("\t\tb.Module(),\n\t\tx.Module(),\n\t)\n}\n"));
        let doc = CompositionDocument::parse(&written).unwrap();
        let call = doc.find_call("fx.Options").unwrap().unwrap();
        assert_eq!(call.canonical_args, ["a.Module()", "b.Module()", "x.Module()"]);

        editor.ensure("x", "example.com/x", "x.Module()").unwrap();
        assert_eq!(fs::read_to_string(editor.path()).unwrap(), written);
    }

    #[test]
    fn missing_file_is_success_and_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let editor = CompositionRootFileEditor::new(dir.path());
        editor.ensure("httpchi", "x/http/chi", "httpchi.Module()").unwrap();
        assert!(!editor.path().exists());
        assert!(!dir.path().join("internal").exists());
    }

    #[test]
    fn parse_error_leaves_file_untouched() {
        let broken = "package di\n\nfunc Root() fx.Option {\n\treturn fx.Options(\n";
        let (_dir, editor) = project(broken);

        let err = editor
            .ensure("httpgin", "x/http/gin", "httpgin.Module()")
            .unwrap_err();

        match err {
            CraftError::Domain(DomainError::SyntaxError { location, .. }) => {
                assert!(location.starts_with("internal/platform/di/root.go:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read_to_string(editor.path()).unwrap(), broken);
    }

    #[test]
    fn empty_arguments_are_rejected() {
        let (_dir, editor) = project(ROOT);
        let err = editor.ensure("httpgin", "", "httpgin.Module()").unwrap_err();
        assert!(matches!(
            err,
            CraftError::Application(ApplicationError::InvalidArgument { .. })
        ));
        assert_eq!(fs::read_to_string(editor.path()).unwrap(), ROOT);
    }

    #[test]
    fn missing_call_still_adds_import() {
        let (_dir, editor) = project("package di\n\nimport \"go.uber.org/fx\"\n\nvar Root = fx.Options()\n");
        editor.ensure("httpchi", "x/http/chi", "httpchi.Module()").unwrap();
        let written = fs::read_to_string(editor.path()).unwrap();
        assert!(written.contains("import (\n\t\"go.uber.org/fx\"\n\thttpchi \"x/http/chi\"\n)"));
        assert!(written.contains("var Root = fx.Options()"));
    }
}
