//! Composition-root source model.
//!
//! A composition root is a Go file whose function returns one aggregated
//! option set, e.g. `return fx.Options(env.Module(), logger.Module())`.
//! Modules wire themselves in by adding an import binding and an argument
//! to that call. [`CompositionDocument`] performs both edits structurally
//! and idempotently; the filesystem side lives in the adapters crate.

pub mod document;
pub mod format;
pub mod lexer;

pub use document::{CompositionDocument, ImportDecl, ImportSpec, ReturnCall, canonicalize};
pub use format::format_source;
