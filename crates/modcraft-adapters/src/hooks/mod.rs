//! Post-generation hooks.

mod git;

pub use git::GitInitHook;
