//! Domain value objects: module names.
//!
//! # Design
//!
//! A [`ModuleName`] is the sole identity of a module during resolution.
//! Labels, versions, summaries and tags are descriptive only and live on
//! [`ModuleDescriptor`](crate::domain::ModuleDescriptor).
//!
//! Names are namespaced as `category:variant`, e.g. `http:gin`, `db:gorm`,
//! `feature:gitignore`. Ordering is lexicographic on the full string, which
//! the resolution planner relies on for deterministic output.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

// ── ModuleName ───────────────────────────────────────────────────────────────

/// Validated, namespaced module identifier.
///
/// Invariant: exactly one `:`, both halves non-empty, and only lowercase
/// ASCII letters, digits, `-` and `_` on either side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    /// Create a module name.
    ///
    /// # Panics
    /// Panics if the name is invalid (use `parse` for fallible construction).
    /// Intended for built-in modules whose names are compile-time literals.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match Self::parse(&name) {
            Ok(valid) => valid,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible constructor.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidModuleName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }

        let (category, variant) = name
            .split_once(':')
            .ok_or_else(|| invalid("expected 'category:variant'"))?;

        if category.is_empty() || variant.is_empty() {
            return Err(invalid("category and variant must both be non-empty"));
        }
        if variant.contains(':') {
            return Err(invalid("only one ':' separator is allowed"));
        }

        let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_';
        if !category.chars().all(allowed) || !variant.chars().all(allowed) {
            return Err(invalid(
                "use lowercase letters, digits, '-' or '_' on either side of ':'",
            ));
        }

        Ok(Self(name.to_string()))
    }

    /// The part before `:` (e.g. `http`).
    pub fn category(&self) -> &str {
        self.0.split_once(':').map(|(c, _)| c).unwrap_or(&self.0)
    }

    /// The part after `:` (e.g. `gin`).
    pub fn variant(&self) -> &str {
        self.0.split_once(':').map(|(_, v)| v).unwrap_or("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModuleName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ModuleName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ModuleName> for String {
    fn from(name: ModuleName) -> Self {
        name.0
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ModuleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ModuleName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ModuleName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_names() {
        let name = ModuleName::parse("http:gin").unwrap();
        assert_eq!(name.category(), "http");
        assert_eq!(name.variant(), "gin");
        assert_eq!(name, "http:gin");
    }

    #[test]
    fn accepts_dashes_digits_and_underscores() {
        assert!(ModuleName::parse("feature:docker-file_2").is_ok());
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["", "http", ":gin", "http:", "a:b:c", "HTTP:gin", "http:g in"] {
            assert!(
                matches!(
                    ModuleName::parse(bad),
                    Err(DomainError::InvalidModuleName { .. })
                ),
                "accepted: {bad:?}"
            );
        }
    }

    #[test]
    #[should_panic]
    fn new_panics_on_invalid_literal() {
        ModuleName::new("not-namespaced");
    }

    #[test]
    fn orders_lexicographically() {
        let mut names = vec![
            ModuleName::new("platform:base"),
            ModuleName::new("db:gorm"),
            ModuleName::new("http:gin"),
        ];
        names.sort();
        let sorted: Vec<_> = names.iter().map(ModuleName::as_str).collect();
        assert_eq!(sorted, ["db:gorm", "http:gin", "platform:base"]);
    }

    #[test]
    fn serde_round_trip_validates() {
        let json = serde_json::to_string(&ModuleName::new("grpc:server")).unwrap();
        assert_eq!(json, "\"grpc:server\"");
        assert!(serde_json::from_str::<ModuleName>("\"nope\"").is_err());
    }
}
