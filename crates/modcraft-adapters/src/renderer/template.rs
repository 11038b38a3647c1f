//! `{{ .Key }}` template renderer.
//!
//! Supports exactly what the embedded module templates use:
//!
//! - field lookups: `{{ .Name }}`, `{{ .gorm.driver }}`
//! - one helper applied to a field: `{{ lower .Name }}`, `upper`, `snake`, `kebab`
//! - path tokens in file paths: `__name__`, `__module__`, `__name-kebab__`, `__name-snake__`
//!
//! A `.tmpl` suffix is stripped from output paths and CRLF is normalised.

use thiserror::Error;
use tracing::instrument;

use modcraft_core::{
    application::{ApplicationError, ports::Renderer},
    domain::{GeneratedFile, ModuleTemplate, RelativePath, Value, ValueMap, values},
    error::CraftResult,
};

#[derive(Debug, Error, PartialEq, Eq)]
enum TemplateError {
    #[error("unterminated action at line {0}")]
    Unterminated(usize),

    #[error("empty action at line {0}")]
    EmptyAction(usize),

    #[error("unknown function '{name}' at line {line}")]
    UnknownFunction { name: String, line: usize },

    #[error("'{text}' is not a field reference (line {line})")]
    NotAField { text: String, line: usize },

    #[error("no value for '.{key}' (line {line})")]
    MissingKey { key: String, line: usize },
}

/// Renderer used by all built-in modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TemplateRenderer {
    #[instrument(skip_all, fields(template = %template.name, files = template.files.len()))]
    fn render(&self, template: &ModuleTemplate, values: &ValueMap) -> CraftResult<Vec<GeneratedFile>> {
        let failed = |file: &str, e: TemplateError| ApplicationError::RenderingFailed {
            template: format!("{}/{}", template.name, file),
            reason: e.to_string(),
        };

        let mut out = Vec::with_capacity(template.files.len());
        for file in &template.files {
            let content = render_str(&file.content, values).map_err(|e| failed(&*file.path, e))?;

            let path = apply_path_tokens(&file.path, values);
            let path = path.strip_suffix(".tmpl").unwrap_or(&path);
            let mut generated = GeneratedFile::new(RelativePath::from_slash(path)?, content);
            generated.permissions = file.permissions;
            out.push(generated);
        }
        Ok(out)
    }
}

fn render_str(template: &str, values: &ValueMap) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut line = 1;

    while let Some(start) = rest.find("{{") {
        let (literal, tail) = rest.split_at(start);
        out.push_str(literal);
        line += literal.matches('\n').count();

        let end = tail.find("}}").ok_or(TemplateError::Unterminated(line))?;
        let action = &tail[2..end];
        out.push_str(&eval_action(action.trim(), values, line)?);
        line += action.matches('\n').count();
        rest = &tail[end + 2..];
    }
    out.push_str(rest);

    Ok(out.replace("\r\n", "\n"))
}

fn eval_action(action: &str, values: &ValueMap, line: usize) -> Result<String, TemplateError> {
    let words: Vec<&str> = action.split_whitespace().collect();
    match words.as_slice() {
        [] => Err(TemplateError::EmptyAction(line)),
        [field] => lookup(field, values, line),
        [function, field] => {
            let value = lookup(field, values, line)?;
            match *function {
                "lower" => Ok(value.to_lowercase()),
                "upper" => Ok(value.to_uppercase()),
                "snake" => Ok(to_snake(&value)),
                "kebab" => Ok(to_kebab(&value)),
                other => Err(TemplateError::UnknownFunction {
                    name: other.to_string(),
                    line,
                }),
            }
        }
        _ => Err(TemplateError::NotAField {
            text: action.to_string(),
            line,
        }),
    }
}

fn lookup(field: &str, values: &ValueMap, line: usize) -> Result<String, TemplateError> {
    let key = field
        .strip_prefix('.')
        .filter(|k| !k.is_empty())
        .ok_or_else(|| TemplateError::NotAField {
            text: field.to_string(),
            line,
        })?;
    match values::get_path(values, key) {
        Some(Value::Null) | None => Err(TemplateError::MissingKey {
            key: key.to_string(),
            line,
        }),
        Some(value) => Ok(value.to_string()),
    }
}

/// Replace `__name__`-style tokens; tokens with no backing value stay as is.
pub fn apply_path_tokens(path: &str, values: &ValueMap) -> String {
    let mut path = path.to_string();
    if let Some(name) = values::get_str(values, "Name").filter(|s| !s.is_empty()) {
        path = path
            .replace("__name-kebab__", &to_kebab(name))
            .replace("__name-snake__", &to_snake(name))
            .replace("__name__", name);
    }
    if let Some(module) = values::get_str(values, "Module").filter(|s| !s.is_empty()) {
        path = path.replace("__module__", module);
    }
    path
}

/// Split on non-alphanumerics, lower-to-upper transitions and letter/digit
/// transitions.
fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            let case_break = p.is_lowercase() && c.is_uppercase();
            let digit_break = p.is_ascii_digit() != c.is_ascii_digit();
            if case_break || digit_break {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub fn to_snake(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn to_kebab(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use modcraft_core::domain::{DomainError, Permissions, TemplateFile};
    use modcraft_core::error::CraftError;
    use std::path::Path;

    fn values() -> ValueMap {
        let mut v = ValueMap::new();
        values::set_path(&mut v, "Name", "OrderService".into()).unwrap();
        values::set_path(&mut v, "Module", "github.com/you/orders".into()).unwrap();
        values::set_path(&mut v, "gorm.driver", "postgres".into()).unwrap();
        v
    }

    #[test]
    fn renders_fields_and_helpers() {
        let out = render_str(
            "module {{ .Module }}\n// {{ snake .Name }} {{kebab .Name}} {{ upper .gorm.driver }}\n",
            &values(),
        )
        .unwrap();
        assert_eq!(
            out,
            "module github.com/you/orders\n// order_service order-service POSTGRES\n"
        );
    }

    #[test]
    fn go_braces_pass_through() {
        let src = "func f() map[string]any { return map[string]any{} }\r\n";
        assert_eq!(
            render_str(src, &values()).unwrap(),
            "func f() map[string]any { return map[string]any{} }\n"
        );
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = render_str("a\nb {{ .Nope }}", &values()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingKey {
                key: "Nope".into(),
                line: 2
            }
        );
    }

    #[test]
    fn unterminated_action_is_an_error() {
        assert!(matches!(
            render_str("{{ .Name ", &values()),
            Err(TemplateError::Unterminated(1))
        ));
    }

    #[test]
    fn unknown_function_is_an_error() {
        assert!(matches!(
            render_str("{{ title .Name }}", &values()),
            Err(TemplateError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn path_tokens_and_suffix() {
        let template = ModuleTemplate::new("platform:base")
            .with_file(TemplateFile::new("cmd/__name-kebab__/main.go.tmpl", "package main\n"))
            .with_file(
                TemplateFile::new("scripts/run.sh", "#!/bin/sh\n")
                    .with_permissions(Permissions::executable()),
            );
        let files = TemplateRenderer::new().render(&template, &values()).unwrap();
        assert_eq!(
            files[0].path.as_path(),
            Path::new("cmd").join("order-service").join("main.go")
        );
        assert!(files[1].permissions.executable_flag());
    }

    #[test]
    fn name_cannot_climb_out_of_the_project() {
        let mut v = values();
        values::set_path(&mut v, "Name", "../../escaped".into()).unwrap();
        let template = ModuleTemplate::new("platform:base")
            .with_file(TemplateFile::new("cmd/__name__/main.go.tmpl", "package main\n"));
        let err = TemplateRenderer::new().render(&template, &v).unwrap_err();
        assert!(matches!(
            err,
            CraftError::Domain(DomainError::PathEscapesRoot { .. })
        ));
    }

    #[test]
    fn rendering_failure_names_the_file() {
        let template = ModuleTemplate::new("http:gin")
            .with_file(TemplateFile::new("server.go.tmpl", "{{ .Missing }}"));
        let err = TemplateRenderer::new().render(&template, &values()).unwrap_err();
        assert!(err.to_string().contains("http:gin/server.go.tmpl"));
    }

    #[test]
    fn word_splitting() {
        assert_eq!(to_snake("my-app"), "my_app");
        assert_eq!(to_kebab("HTTPServer2go"), "httpserver-2-go");
        assert_eq!(to_snake("orderService"), "order_service");
    }
}
