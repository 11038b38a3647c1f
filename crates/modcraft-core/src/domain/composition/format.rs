//! Secondary formatting pass for composition-root files.
//!
//! Deliberately small: it normalises the layout noise that text splices can
//! leave behind and nothing else. Raw string contents are never touched.

use std::ops::Range;

use crate::domain::DomainError;
use crate::domain::composition::document::{CompositionDocument, ImportDecl};
use crate::domain::composition::lexer::{TokenKind, tokenize};

/// Reformat `source`.
///
/// - trailing whitespace is stripped
/// - runs of blank lines collapse to one, leading blank lines are dropped
/// - specs inside grouped imports are indented with one tab
/// - the file ends with exactly one newline
///
/// The result is re-parsed before it is returned; any failure means the
/// caller should keep the unformatted text.
pub fn format_source(source: &str) -> Result<String, DomainError> {
    let raw: Vec<Range<usize>> = tokenize(source)?
        .into_iter()
        .filter(|t| t.kind == TokenKind::RawString)
        .map(|t| t.span)
        .collect();
    let inside_raw = |offset: usize| raw.iter().any(|r| r.start < offset && offset < r.end);

    let document = CompositionDocument::parse(source)?;
    let grouped_specs: Vec<usize> = document
        .imports()
        .iter()
        .filter(|decl| matches!(decl, ImportDecl::Group { .. }))
        .flat_map(|decl| decl.specs().iter().map(|spec| spec.span.start))
        .collect();

    let mut out = String::with_capacity(source.len());
    let mut blank_run = 0usize;
    let mut offset = 0usize;

    for line in source.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let body = line.strip_suffix('\n').unwrap_or(line);
        let end = start + body.len();

        if inside_raw(start) {
            blank_run = 0;
            let kept = if inside_raw(end) { body } else { body.trim_end() };
            out.push_str(kept);
            out.push('\n');
            continue;
        }

        let trimmed = if inside_raw(end) { body } else { body.trim_end() };
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run > 1 || out.is_empty() {
                continue;
            }
            out.push('\n');
            continue;
        }
        blank_run = 0;

        let content_start = start + (trimmed.len() - trimmed.trim_start().len());
        if grouped_specs.contains(&content_start) {
            out.push('\t');
            out.push_str(trimmed.trim_start());
        } else {
            out.push_str(trimmed);
        }
        out.push('\n');
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }

    CompositionDocument::parse(out.as_str())?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_layout() {
        let src = "\n\npackage di   \n\n\n\nimport (\n  \"go.uber.org/fx\"\n\t\thttpgin \"example.com/gin\"\n)\n\nfunc Root() fx.Option {\n\treturn fx.Options(httpgin.Module())  \n}\n\n\n";
        let formatted = format_source(src).unwrap();
        assert_eq!(
            formatted,
            "package di\n\nimport (\n\t\"go.uber.org/fx\"\n\thttpgin \"example.com/gin\"\n)\n\nfunc Root() fx.Option {\n\treturn fx.Options(httpgin.Module())\n}\n"
        );
    }

    #[test]
    fn raw_strings_are_preserved() {
        let src = "package di\n\nvar banner = `line one   \n\n\n  line two  `  \n";
        let formatted = format_source(src).unwrap();
        assert_eq!(
            formatted,
            "package di\n\nvar banner = `line one   \n\n\n  line two  `\n"
        );
    }

    #[test]
    fn formatting_is_stable() {
        let src = "package di\nimport \"fmt\"\n\n\nfunc Root() {}\n";
        let once = format_source(src).unwrap();
        assert_eq!(format_source(&once).unwrap(), once);
    }

    #[test]
    fn unparsable_input_fails() {
        assert!(format_source("package di\nfunc Root() {\n").is_err());
    }
}
