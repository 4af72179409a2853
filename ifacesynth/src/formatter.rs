//! Formatting and import cleanup for generated Go code.
//!
//! [`GoFormatter`] parses the generated file, drops imports nothing refers to
//! and prints interfaces in canonical gofmt layout. Other declarations are
//! reproduced from their source text.

use std::collections::HashSet;

use itertools::Itertools;
use thiserror::Error;

use crate::ast::{
    ConstraintTerm, Decl, Field, ImportSpec, InterfaceElem, Signature, SourceFile, Span, TypeExpr,
    TypeKind, TypeSpec,
};
use crate::parser::{parse_source, ParseError};

/// Layout knobs for the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Indent with tabs rather than spaces.
    pub tab_indent: bool,
    /// Width of one indent level when indenting with spaces.
    pub tab_width: usize,
    /// Keep comments in the output.
    pub comments: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            tab_indent: true,
            tab_width: 8,
            comments: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("generated code does not parse: {0}")]
    Syntax(#[from] ParseError),
}

pub trait CodeFormatter {
    fn format(&self, code: &str, options: &ImportOptions) -> Result<String, FormatError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoFormatter;

impl CodeFormatter for GoFormatter {
    fn format(&self, code: &str, options: &ImportOptions) -> Result<String, FormatError> {
        let file = parse_source(code)?;
        let imports = retained_imports(code, &file);
        Ok(Printer::new(code, options).print(&file, &imports))
    }
}

/// Package name assumed for an import path imported without an explicit
/// name: the last path element, skipping a trailing major version such as
/// `v2`, without a `go-` prefix and cut at the first character that cannot
/// appear in an identifier.
pub fn assumed_package_name(path: &str) -> &str {
    let mut elements = path.rsplit('/');
    let mut base = elements.next().unwrap_or(path);
    if is_major_version(base) {
        if let Some(parent) = elements.next() {
            base = parent;
        }
    }
    let base = base.strip_prefix("go-").unwrap_or(base);
    let end = base
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(base.len());
    &base[..end]
}

fn is_major_version(element: &str) -> bool {
    element
        .strip_prefix('v')
        .map_or(false, |digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn used_qualifiers(file: &SourceFile) -> HashSet<String> {
    let mut used = HashSet::new();
    let mut visit = |expr: &TypeExpr| {
        if let TypeKind::Named {
            qualifier: Some(qualifier),
            ..
        } = &expr.kind
        {
            used.insert(qualifier.clone());
        }
    };
    for decl in &file.decls {
        match decl {
            Decl::Type(type_decl) => {
                for spec in &type_decl.specs {
                    spec.ty.walk(&mut visit);
                }
            }
            Decl::Func(func) => {
                for field in func.receiver.iter().flatten() {
                    field.ty.walk(&mut visit);
                }
                func.signature.walk(&mut visit);
            }
            Decl::Value(_) => {}
        }
    }
    used
}

// Source regions the syntax tree does not model: bodies, initialisers and
// type parameter lists.
fn opaque_regions<'s>(src: &'s str, file: &SourceFile) -> Vec<&'s str> {
    let mut regions = Vec::new();
    for decl in &file.decls {
        match decl {
            Decl::Type(type_decl) => regions.extend(
                type_decl
                    .specs
                    .iter()
                    .filter_map(|spec| spec.type_params.map(|span| span.text(src))),
            ),
            Decl::Func(func) => {
                regions.extend(func.type_params.map(|span| span.text(src)));
                regions.extend(func.body.map(|span| span.text(src)));
            }
            Decl::Value(value) => regions.push(value.span.text(src)),
        }
    }
    regions
}

fn mentions_qualifier(text: &str, name: &str) -> bool {
    text.match_indices(name).any(|(at, _)| {
        let standalone = text[..at]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '.'));
        standalone && text[at + name.len()..].starts_with('.')
    })
}

/// Imports still referenced by the file, deduplicated and sorted by path.
/// Blank and dot imports are always kept.
fn retained_imports<'f>(src: &str, file: &'f SourceFile) -> Vec<&'f ImportSpec> {
    let used = used_qualifiers(file);
    let opaque = opaque_regions(src, file);
    let mut seen = HashSet::new();

    let mut kept: Vec<&ImportSpec> = file
        .imports
        .iter()
        .filter(|import| {
            let name = match import.alias.as_deref() {
                Some("_") | Some(".") => return true,
                Some(alias) => alias,
                None => assumed_package_name(import.unquoted_path()),
            };
            name.is_empty()
                || used.contains(name)
                || opaque.iter().any(|text| mentions_qualifier(text, name))
        })
        .filter(|import| seen.insert(import.to_line()))
        .collect();

    kept.sort_by(|a, b| {
        a.unquoted_path()
            .cmp(b.unquoted_path())
            .then_with(|| a.alias.cmp(&b.alias))
    });
    kept
}

struct Printer<'a> {
    src: &'a str,
    indent: String,
    comments: bool,
    out: String,
}

impl<'a> Printer<'a> {
    fn new(src: &'a str, options: &ImportOptions) -> Self {
        let indent = if options.tab_indent {
            "\t".to_string()
        } else {
            " ".repeat(options.tab_width)
        };
        Printer {
            src,
            indent,
            comments: options.comments,
            out: String::new(),
        }
    }

    fn print(mut self, file: &SourceFile, imports: &[&ImportSpec]) -> String {
        self.header(file.package_span);
        self.line(0, &format!("package {}", file.package));

        if !imports.is_empty() {
            self.out.push('\n');
            self.line(0, "import (");
            for import in imports {
                self.line(1, &import.to_line());
            }
            self.line(0, ")");
        }

        for decl in &file.decls {
            self.out.push('\n');
            if self.comments {
                for line in decl.doc().map(|doc| doc.lines()).unwrap_or_default() {
                    self.line(0, &line);
                }
            }
            match decl {
                Decl::Type(type_decl) if !type_decl.grouped => match type_decl.specs.as_slice() {
                    [spec] if !spec.alias && matches!(spec.ty.kind, TypeKind::Interface(_)) => {
                        self.interface_decl(spec)
                    }
                    _ => self.verbatim(decl.span()),
                },
                _ => self.verbatim(decl.span()),
            }
        }
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(&self.indent);
        }
        self.out.push_str(text.trim_end());
        self.out.push('\n');
    }

    // Comments ahead of the package clause.
    fn header(&mut self, package: Span) {
        if !self.comments {
            return;
        }
        let lead = &self.src[..package.start];
        let body = lead.trim();
        if body.is_empty() {
            return;
        }
        for line in body.lines() {
            self.line(0, line);
        }
        let gap = &lead[lead.trim_end().len()..];
        if gap.matches('\n').count() > 1 {
            self.out.push('\n');
        }
    }

    fn verbatim(&mut self, span: Span) {
        let text = span.text(self.src);
        for line in text.lines() {
            self.out.push_str(line.trim_end());
            self.out.push('\n');
        }
    }

    fn interface_decl(&mut self, spec: &TypeSpec) {
        let TypeKind::Interface(elems) = &spec.ty.kind else {
            return;
        };
        let params = spec
            .type_params
            .map(|span| collapse_type_params(span.text(self.src)))
            .unwrap_or_default();
        self.line(0, &format!("type {}{} interface {{", spec.name, params));
        for elem in elems {
            if self.comments {
                for line in elem.doc().map(|doc| doc.lines()).unwrap_or_default() {
                    self.line(1, &line);
                }
            }
            self.line(1, &render_interface_elem(elem));
        }
        self.line(0, "}");
    }
}

fn collapse_type_params(text: &str) -> String {
    let collapsed = text.split_whitespace().join(" ");
    collapsed
        .replace("[ ", "[")
        .replace(", ]", "]")
        .replace(",]", "]")
        .replace(" ]", "]")
}

fn render_interface_elem(elem: &InterfaceElem) -> String {
    match elem {
        InterfaceElem::Method {
            name, signature, ..
        } => format!("{}{}", name, render_signature(signature)),
        InterfaceElem::Embedded { terms, .. } => render_terms(terms),
    }
}

fn render_terms(terms: &[ConstraintTerm]) -> String {
    terms
        .iter()
        .map(|term| {
            let tilde = if term.tilde { "~" } else { "" };
            format!("{}{}", tilde, render_type(&term.ty))
        })
        .join(" | ")
}

/// Canonical text of a signature. A single unnamed result is printed
/// without parentheses.
pub fn render_signature(signature: &Signature) -> String {
    let params = render_fields(&signature.params, ", ");
    match signature.results.as_slice() {
        [] => format!("({})", params),
        [single] if single.names.is_empty() => format!("({}) {}", params, render_type(&single.ty)),
        results => format!("({}) ({})", params, render_fields(results, ", ")),
    }
}

fn render_fields(fields: &[Field], separator: &str) -> String {
    fields.iter().map(render_field).join(separator)
}

fn render_field(field: &Field) -> String {
    let mut text = if field.names.is_empty() {
        render_type(&field.ty)
    } else {
        format!("{} {}", field.names.join(", "), render_type(&field.ty))
    };
    if let Some(tag) = &field.tag {
        text.push(' ');
        text.push_str(tag);
    }
    text
}

pub fn render_type(expr: &TypeExpr) -> String {
    match &expr.kind {
        TypeKind::Named {
            qualifier,
            name,
            args,
            ..
        } => {
            let mut text = match qualifier {
                Some(qualifier) => format!("{}.{}", qualifier, name),
                None => name.clone(),
            };
            if !args.is_empty() {
                text.push_str(&format!("[{}]", args.iter().map(render_type).join(", ")));
            }
            text
        }
        TypeKind::Pointer(inner) => format!("*{}", render_type(inner)),
        TypeKind::Slice(inner) => format!("[]{}", render_type(inner)),
        TypeKind::Array { len, elem } => format!("[{}]{}", len, render_type(elem)),
        TypeKind::Map { key, value } => format!("map[{}]{}", render_type(key), render_type(value)),
        TypeKind::Chan { dir, elem } => format!("{} {}", dir.keyword(), render_type(elem)),
        TypeKind::Variadic(inner) => format!("...{}", render_type(inner)),
        TypeKind::Func(signature) => format!("func{}", render_signature(signature)),
        TypeKind::Struct(fields) if fields.is_empty() => "struct{}".to_string(),
        TypeKind::Struct(fields) => format!("struct{{ {} }}", render_fields(fields, "; ")),
        TypeKind::Interface(elems) if elems.is_empty() => "interface{}".to_string(),
        TypeKind::Interface(elems) => format!(
            "interface{{ {} }}",
            elems.iter().map(render_interface_elem).join("; ")
        ),
        TypeKind::Paren(inner) => format!("({})", render_type(inner)),
    }
}
