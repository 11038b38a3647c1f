//! Structural view of a composition-root source file.
//!
//! The document keeps the original text and a parsed outline of it: the
//! package clause, import declarations, and every `return <callee>(...)`
//! call with its top-level arguments. Edits are splices into the text at
//! positions taken from the outline, after which the outline is rebuilt, so
//! unrelated code, comments and layout survive byte for byte.

use std::collections::HashMap;
use std::ops::Range;

use crate::domain::DomainError;
use crate::domain::composition::format::format_source;
use crate::domain::composition::lexer::{Token, TokenKind, canonical_text, tokenize};

/// One `alias "path"` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDecl {
    /// `import ( ... )`; `open` and `close` are the byte offsets of the parens.
    Group {
        open: usize,
        close: usize,
        specs: Vec<ImportSpec>,
    },
    /// `import alias "path"`; `span` covers the whole declaration.
    Single { span: Range<usize>, spec: ImportSpec },
}

impl ImportDecl {
    pub fn specs(&self) -> &[ImportSpec] {
        match self {
            Self::Group { specs, .. } => specs,
            Self::Single { spec, .. } => std::slice::from_ref(spec),
        }
    }
}

/// A `return callee(args...)` site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnCall {
    /// Enclosing function, if the return sits in a named declaration.
    pub function: Option<String>,
    /// Canonical callee text, e.g. `fx.Options`.
    pub callee: String,
    pub open: usize,
    pub close: usize,
    pub args: Vec<Range<usize>>,
    pub canonical_args: Vec<String>,
    pub trailing_comma: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Outline {
    package: String,
    package_end: usize,
    imports: Vec<ImportDecl>,
    calls: Vec<ReturnCall>,
}

/// Parsed composition-root file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionDocument {
    source: String,
    outline: Outline,
}

impl CompositionDocument {
    pub fn parse(source: impl Into<String>) -> Result<Self, DomainError> {
        let source = source.into();
        let outline = Parser::new(&source)?.outline()?;
        Ok(Self { source, outline })
    }

    pub fn package(&self) -> &str {
        &self.outline.package
    }

    pub fn imports(&self) -> &[ImportDecl] {
        &self.outline.imports
    }

    pub fn return_calls(&self) -> &[ReturnCall] {
        &self.outline.calls
    }

    pub fn has_import(&self, alias: &str, path: &str) -> bool {
        self.outline
            .imports
            .iter()
            .flat_map(ImportDecl::specs)
            .any(|spec| spec.path == path && spec.alias.as_deref() == Some(alias))
    }

    /// First `return` call whose callee matches `combinator` canonically.
    pub fn find_call(&self, combinator: &str) -> Result<Option<&ReturnCall>, DomainError> {
        let wanted = canonicalize(combinator)?;
        Ok(self.outline.calls.iter().find(|c| c.callee == wanted))
    }

    /// Make sure `alias "path"` is imported. Returns whether the text changed.
    pub fn ensure_import(&mut self, alias: &str, path: &str) -> Result<bool, DomainError> {
        if self.has_import(alias, path) {
            return Ok(false);
        }
        let spec = format!("{alias} \"{path}\"");

        let group = self.outline.imports.iter().find_map(|decl| match decl {
            ImportDecl::Group { close, .. } => Some(*close),
            ImportDecl::Single { .. } => None,
        });
        let edit = if let Some(close) = group {
            let line_start = line_start(&self.source, close);
            if self.source[line_start..close].trim().is_empty() {
                Edit::insert(line_start, format!("\t{spec}\n"))
            } else {
                Edit::insert(close, format!("\n\t{spec}\n"))
            }
        } else if let Some(ImportDecl::Single { span, spec: existing }) =
            self.outline.imports.first()
        {
            let existing = &self.source[existing.span.clone()];
            Edit::replace(
                span.clone(),
                format!("import (\n\t{existing}\n\t{spec}\n)"),
            )
        } else {
            Edit::insert(
                self.after_package_line(),
                format!("\n\nimport (\n\t{spec}\n)"),
            )
        };

        self.apply(vec![edit])?;
        Ok(true)
    }

    /// Make sure `expr` is an argument of the first `return combinator(...)`.
    ///
    /// Returns `false` without touching the text when an equivalent argument
    /// is already present or when no such call exists.
    pub fn ensure_call_argument(
        &mut self,
        combinator: &str,
        expr: &str,
    ) -> Result<bool, DomainError> {
        let candidate = canonicalize(expr)?;
        let Some(call) = self.find_call(combinator)? else {
            return Ok(false);
        };
        if call.canonical_args.iter().any(|arg| *arg == candidate) {
            return Ok(false);
        }

        let source = &self.source;
        let (open, close) = (call.open, call.close);
        let multiline = source[open..close].contains('\n');
        let last = call.args.last().cloned();
        let mut edits = Vec::new();

        if !multiline {
            match &last {
                None => edits.push(Edit::insert(close, expr.to_string())),
                Some(_) if call.trailing_comma => edits.push(Edit::insert(close, format!(" {expr}"))),
                Some(last) => edits.push(Edit::insert(last.end, format!(", {expr}"))),
            }
        } else {
            let close_line = line_start(source, close);
            let close_on_own_line = source[close_line..close].trim().is_empty();
            let close_indent = if close_on_own_line {
                indentation(source, close_line)
            } else {
                indentation(source, line_start(source, open))
            };
            let indent = match &last {
                Some(last) => indentation(source, line_start(source, last.start)).to_string(),
                None => format!("{close_indent}\t"),
            };
            let needs_comma = last.is_some() && !call.trailing_comma;
            // `b.Module())`: the comma and the new argument share one offset.
            let comma_at_close = needs_comma && last.as_ref().is_some_and(|l| l.end == close);
            if let Some(last) = last.as_ref().filter(|_| needs_comma && !comma_at_close) {
                edits.push(Edit::insert(last.end, ",".to_string()));
            }
            if close_on_own_line {
                edits.push(Edit::insert(close_line, format!("{indent}{expr},\n")));
            } else {
                let comma = if comma_at_close { "," } else { "" };
                edits.push(Edit::insert(
                    close,
                    format!("{comma}\n{indent}{expr},\n{close_indent}"),
                ));
            }
        }

        self.apply(edits)?;
        Ok(true)
    }

    /// End of the package clause's line when only a line comment follows
    /// the package name, else the end of the name itself.
    fn after_package_line(&self) -> usize {
        let end = self.outline.package_end;
        let line_end = self.source[end..].find('\n').map_or(self.source.len(), |i| end + i);
        let line = self.source[end..line_end].trim_end_matches('\r');
        let rest = line.trim();
        if rest.is_empty() || rest.starts_with("//") {
            end + line.len()
        } else {
            end
        }
    }

    /// The current text, edits included, without any formatting pass.
    pub fn render(&self) -> &str {
        &self.source
    }

    pub fn into_source(self) -> String {
        self.source
    }

    /// The current text after the secondary formatting pass.
    pub fn format(&self) -> Result<String, DomainError> {
        format_source(&self.source)
    }

    fn apply(&mut self, mut edits: Vec<Edit>) -> Result<(), DomainError> {
        // Later offsets first so earlier ones stay valid.
        edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));
        let mut source = self.source.clone();
        for edit in edits {
            source.replace_range(edit.range, &edit.text);
        }
        let outline = Parser::new(&source)?.outline()?;
        self.source = source;
        self.outline = outline;
        Ok(())
    }
}

/// Canonical form of an expression: its tokens without comments or layout.
pub fn canonicalize(expr: &str) -> Result<String, DomainError> {
    let tokens = tokenize(expr).map_err(|e| e.in_file("expression"))?;
    Ok(canonical_text(expr, &tokens))
}

#[derive(Debug)]
struct Edit {
    range: Range<usize>,
    text: String,
}

impl Edit {
    fn insert(at: usize, text: String) -> Self {
        Self {
            range: at..at,
            text,
        }
    }

    fn replace(range: Range<usize>, text: String) -> Self {
        Self { range, text }
    }
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |i| i + 1)
}

fn indentation(source: &str, line_start: usize) -> &str {
    let rest = &source[line_start..];
    let width = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    &rest[..width]
}

// ── Parser ──────────────────────────────────────────────────────────────────

struct Parser<'s> {
    source: &'s str,
    /// Tokens without comments.
    code: Vec<Token>,
    /// Opening bracket index -> closing bracket index.
    pairs: HashMap<usize, usize>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Result<Self, DomainError> {
        let code: Vec<Token> = tokenize(source)?
            .into_iter()
            .filter(|t| !t.is_trivia())
            .collect();
        let pairs = match_brackets(source, &code)?;
        Ok(Self {
            source,
            code,
            pairs,
        })
    }

    fn error_at(&self, index: usize, message: &str) -> DomainError {
        let location = self
            .code
            .get(index)
            .or_else(|| self.code.last())
            .map_or_else(|| "1:1".to_string(), |t| format!("{}:{}", t.line, t.column));
        DomainError::SyntaxError {
            location,
            message: message.to_string(),
        }
    }

    fn is_ident(&self, index: usize, ident: &str) -> bool {
        self.code
            .get(index)
            .is_some_and(|t| t.is_ident(self.source, ident))
    }

    fn is_punct(&self, index: usize, punct: char) -> bool {
        self.code
            .get(index)
            .is_some_and(|t| t.is_punct(self.source, punct))
    }

    fn kind(&self, index: usize) -> Option<TokenKind> {
        self.code.get(index).map(|t| t.kind)
    }

    fn skip_semicolons(&self, mut index: usize) -> usize {
        while self.is_punct(index, ';') {
            index += 1;
        }
        index
    }

    fn outline(&self) -> Result<Outline, DomainError> {
        if !self.is_ident(0, "package") || self.kind(1) != Some(TokenKind::Ident) {
            return Err(self.error_at(0, "expected package clause"));
        }
        let package = self.code[1].text(self.source).to_string();
        let package_end = self.code[1].span.end;

        let mut index = self.skip_semicolons(2);
        let mut imports = Vec::new();
        while self.is_ident(index, "import") {
            let (decl, next) = self.import_decl(index)?;
            imports.push(decl);
            index = self.skip_semicolons(next);
        }

        let calls = self.return_calls(index)?;
        Ok(Outline {
            package,
            package_end,
            imports,
            calls,
        })
    }

    fn import_decl(&self, keyword: usize) -> Result<(ImportDecl, usize), DomainError> {
        let open = keyword + 1;
        if self.is_punct(open, '(') {
            let close = self.pairs[&open];
            let mut specs = Vec::new();
            let mut index = self.skip_semicolons(open + 1);
            while index < close {
                let (spec, next) = self.import_spec(index)?;
                specs.push(spec);
                index = self.skip_semicolons(next);
            }
            let decl = ImportDecl::Group {
                open: self.code[open].span.start,
                close: self.code[close].span.start,
                specs,
            };
            return Ok((decl, close + 1));
        }

        let (spec, next) = self.import_spec(open)?;
        let span = self.code[keyword].span.start..spec.span.end;
        Ok((ImportDecl::Single { span, spec }, next))
    }

    fn import_spec(&self, index: usize) -> Result<(ImportSpec, usize), DomainError> {
        let is_path = |i: usize| {
            matches!(
                self.kind(i),
                Some(TokenKind::String) | Some(TokenKind::RawString)
            )
        };

        let (alias, path_index) = if is_path(index) {
            (None, index)
        } else if (self.kind(index) == Some(TokenKind::Ident) || self.is_punct(index, '.'))
            && is_path(index + 1)
        {
            (Some(self.code[index].text(self.source).to_string()), index + 1)
        } else {
            return Err(self.error_at(index, "malformed import spec"));
        };

        let token = &self.code[path_index];
        let quoted = token.text(self.source);
        let path = quoted[1..quoted.len() - 1].to_string();
        let spec = ImportSpec {
            alias,
            path,
            span: self.code[index].span.start..token.span.end,
        };
        Ok((spec, path_index + 1))
    }

    fn return_calls(&self, from: usize) -> Result<Vec<ReturnCall>, DomainError> {
        let mut calls = Vec::new();
        let mut index = from;
        while index < self.code.len() {
            if self.is_ident(index, "func") {
                if let Some((name, body_open)) = self.func_header(index) {
                    let body_close = self.pairs[&body_open];
                    self.collect_returns(body_open + 1, body_close, name.as_deref(), &mut calls);
                    index = body_close + 1;
                    continue;
                }
            }
            if let Some(&close) = self.pairs.get(&index) {
                self.collect_returns(index + 1, close, None, &mut calls);
                index = close + 1;
                continue;
            }
            index += 1;
        }
        Ok(calls)
    }

    /// Name and body-brace index of a top-level `func` declaration.
    fn func_header(&self, keyword: usize) -> Option<(Option<String>, usize)> {
        let mut index = keyword + 1;
        if self.is_punct(index, '(') {
            index = self.pairs[&index] + 1;
        }
        let name = (self.kind(index) == Some(TokenKind::Ident))
            .then(|| self.code[index].text(self.source).to_string());
        if name.is_some() {
            index += 1;
        }
        while index < self.code.len() {
            if self.is_punct(index, '{') {
                let after_type = index > 0
                    && (self.is_ident(index - 1, "interface") || self.is_ident(index - 1, "struct"));
                if !after_type {
                    return Some((name, index));
                }
            }
            if let Some(&close) = self.pairs.get(&index) {
                index = close + 1;
                continue;
            }
            if self.is_punct(index, ';') || self.is_punct(index, '}') {
                return None;
            }
            index += 1;
        }
        None
    }

    fn collect_returns(
        &self,
        from: usize,
        to: usize,
        function: Option<&str>,
        calls: &mut Vec<ReturnCall>,
    ) {
        for index in from..to {
            if !self.is_ident(index, "return") {
                continue;
            }
            // callee: ident ( '.' ident )* '('
            let mut cursor = index + 1;
            if self.kind(cursor) != Some(TokenKind::Ident) {
                continue;
            }
            cursor += 1;
            while self.is_punct(cursor, '.') && self.kind(cursor + 1) == Some(TokenKind::Ident) {
                cursor += 2;
            }
            if !self.is_punct(cursor, '(') || cursor >= to {
                continue;
            }
            let open = cursor;
            let close = self.pairs[&open];
            calls.push(self.return_call(function, index + 1..open, open, close));
        }
    }

    fn return_call(
        &self,
        function: Option<&str>,
        callee: Range<usize>,
        open: usize,
        close: usize,
    ) -> ReturnCall {
        let mut args = Vec::new();
        let mut canonical_args = Vec::new();
        let mut trailing_comma = false;

        let mut start = open + 1;
        let mut index = open + 1;
        while index <= close {
            if index == close || self.is_punct(index, ',') {
                if start < index {
                    let tokens = &self.code[start..index];
                    args.push(tokens[0].span.start..tokens[tokens.len() - 1].span.end);
                    canonical_args.push(canonical_text(self.source, tokens));
                    trailing_comma = false;
                } else if index == close && !args.is_empty() {
                    trailing_comma = true;
                }
                start = index + 1;
                index += 1;
                continue;
            }
            index = self.pairs.get(&index).map_or(index + 1, |&c| c + 1);
        }

        ReturnCall {
            function: function.map(str::to_string),
            callee: canonical_text(self.source, &self.code[callee]),
            open: self.code[open].span.start,
            close: self.code[close].span.start,
            args,
            canonical_args,
            trailing_comma,
        }
    }
}

fn match_brackets(source: &str, code: &[Token]) -> Result<HashMap<usize, usize>, DomainError> {
    let mut pairs = HashMap::new();
    let mut stack: Vec<(usize, char)> = Vec::new();
    let located = |token: &Token, message: String| DomainError::SyntaxError {
        location: format!("{}:{}", token.line, token.column),
        message,
    };

    for (index, token) in code.iter().enumerate() {
        if token.kind != TokenKind::Punct {
            continue;
        }
        let c = token.text(source).chars().next().unwrap_or(' ');
        match c {
            '(' | '[' | '{' => stack.push((index, c)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, opener)) if opener == expected => {
                        pairs.insert(open, index);
                    }
                    _ => return Err(located(token, format!("unexpected '{c}'"))),
                }
            }
            _ => {}
        }
    }

    if let Some((open, opener)) = stack.pop() {
        return Err(located(&code[open], format!("unclosed '{opener}'")));
    }
    Ok(pairs)
}
