//! Method extraction for one source file.

use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::debug;

use crate::ast::{is_exported, FuncDecl, TypeKind};
use crate::parser::{ParseError, ParsedFile};
use crate::scanner::DeclaredType;
use crate::type_ref::TypeRefFormatter;

/// A method signature ready to be placed inside an interface body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    /// `Name(params) (results)` with types already qualified.
    pub signature: String,
    /// Raw doc comment lines, markers kept.
    pub docs: Vec<String>,
}

impl Method {
    /// Doc lines followed by the signature.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.docs.clone();
        lines.push(self.signature.clone());
        lines
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions<'a> {
    pub copy_docs: bool,
    pub copy_type_doc: bool,
    pub dest_package: &'a str,
    pub known_types: &'a [DeclaredType],
    /// Module to import under `.` in the generated file.
    pub import_override: Option<&'a str>,
    pub include_unexported: bool,
    pub embedded_closure: Option<&'a IndexSet<String>>,
    pub include_promoted: bool,
}

/// What one file contributes to the interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Methods declared on the target type itself.
    pub direct: Vec<Method>,
    /// Methods declared on types the target embeds.
    pub promoted: Vec<Method>,
    pub imports: Vec<String>,
    pub type_doc: Option<String>,
    pub type_params: Option<String>,
}

impl Extraction {
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.direct.iter().chain(&self.promoted)
    }
}

/// Receiver base type name: `T`, `*T`, `T[K]` and `*T[K]` all yield `T`.
pub fn receiver_type_name(func: &FuncDecl) -> Option<&str> {
    let receiver = func.receiver.as_ref()?.first()?;
    let mut ty = &receiver.ty;
    loop {
        match &ty.kind {
            TypeKind::Pointer(inner) | TypeKind::Paren(inner) => ty = inner.as_ref(),
            TypeKind::Named {
                qualifier: None,
                name,
                ..
            } => return Some(name.as_str()),
            _ => return None,
        }
    }
}

pub fn extract_methods(parsed: &ParsedFile, target: &str, options: &ExtractOptions) -> Extraction {
    let file = &parsed.file;
    let src = parsed.source.as_str();
    let formatter = TypeRefFormatter::new(options.dest_package, options.known_types)
        .with_source_package(&file.package);

    let build = |func: &FuncDecl| -> Method {
        let params = formatter
            .format_field_list(src, &func.signature.params)
            .join(", ");
        let results = formatter.format_field_list(src, &func.signature.results);
        let signature = if results.is_empty() {
            format!("{}({})", func.name, params)
        } else {
            format!("{}({}) ({})", func.name, params, results.join(", "))
        };
        let docs = match (&func.doc, options.copy_docs) {
            (Some(doc), true) => doc.lines(),
            _ => Vec::new(),
        };
        Method {
            name: func.name.clone(),
            signature,
            docs,
        }
    };

    let mut extraction = Extraction::default();
    let mut seen: HashSet<&str> = HashSet::new();
    let candidates: Vec<(&FuncDecl, &str)> = file
        .funcs()
        .filter(|func| options.include_unexported || is_exported(&func.name))
        .filter_map(|func| receiver_type_name(func).map(|receiver| (func, receiver)))
        .collect();

    // Direct methods take precedence over promoted ones of the same name.
    for &(func, _) in candidates.iter().filter(|(_, receiver)| *receiver == target) {
        if seen.insert(func.name.as_str()) {
            extraction.direct.push(build(func));
        }
    }

    if options.include_promoted {
        if let Some(closure) = options.embedded_closure {
            for &(func, receiver) in candidates
                .iter()
                .filter(|(_, receiver)| *receiver != target && closure.contains(*receiver))
            {
                if seen.insert(func.name.as_str()) {
                    debug!("promoting {}.{} into {}", receiver, func.name, target);
                    extraction.promoted.push(build(func));
                }
            }
        }
    }

    extraction.imports = file.imports.iter().map(|import| import.to_line()).collect();
    if let Some(module) = options.import_override {
        extraction.imports.push(format!(". \"{}\"", module));
    }

    for (decl, spec) in file.type_specs().filter(|(_, spec)| spec.name == target) {
        if options.copy_type_doc && extraction.type_doc.is_none() {
            let text = spec
                .doc
                .as_ref()
                .or(decl.doc.as_ref())
                .map(|doc| doc.text())
                .unwrap_or_default();
            let text = text.strip_suffix('\n').unwrap_or(&text);
            if !text.is_empty() {
                extraction.type_doc = Some(text.to_string());
            }
        }
        if extraction.type_params.is_none() {
            extraction.type_params = spec.type_params.map(|span| span.text(src).to_string());
        }
    }

    extraction
}

pub fn extract_methods_from_source(
    src: &[u8],
    target: &str,
    options: &ExtractOptions,
) -> Result<Extraction, ParseError> {
    let parsed = ParsedFile::parse(src)?;
    Ok(extract_methods(&parsed, target, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SRC: &str = r#"package main

import (
	notmain "fmt"
)

// Person ...
// Second line.
type Person struct {
	name string
	*Base
}

type Base struct{}

// Name ...
func (p *Person) Name() string {
	return p.name
}

// SetName ...
func (p *Person) SetName(name string) {
	p.name = name
}

func (p *Person) secret() {}

func (b *Base) ID() (id int, err error) { return 0, nil }

func (b *Base) Name() string { return "" }

func (f notmain.Formatter) Ignored() {}

func Free() {}
"#;

    fn opts<'a>() -> ExtractOptions<'a> {
        ExtractOptions {
            copy_docs: true,
            dest_package: "main",
            ..Default::default()
        }
    }

    #[test]
    fn direct_methods_in_declaration_order() {
        let extraction = extract_methods_from_source(SRC.as_bytes(), "Person", &opts()).unwrap();
        let lines: Vec<String> = extraction.methods().flat_map(Method::lines).collect();
        assert_eq!(
            lines,
            vec!["// Name ...", "Name() (string)", "// SetName ...", "SetName(name string)"]
        );
        assert_eq!(extraction.imports, vec!["notmain \"fmt\""]);
        assert_eq!(extraction.type_doc, None);
    }

    #[test]
    fn docs_can_be_omitted() {
        let options = ExtractOptions {
            copy_docs: false,
            ..opts()
        };
        let extraction = extract_methods_from_source(SRC.as_bytes(), "Person", &options).unwrap();
        assert!(extraction.direct.iter().all(|m| m.docs.is_empty()));
    }

    #[test]
    fn unexported_methods_on_request() {
        let options = ExtractOptions {
            include_unexported: true,
            ..opts()
        };
        let extraction = extract_methods_from_source(SRC.as_bytes(), "Person", &options).unwrap();
        let names: Vec<&str> = extraction.direct.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "SetName", "secret"]);
    }

    #[test]
    fn promoted_methods_yield_to_direct_ones() {
        let closure: IndexSet<String> = ["Base".to_string()].into_iter().collect();
        let options = ExtractOptions {
            include_promoted: true,
            embedded_closure: Some(&closure),
            ..opts()
        };
        let extraction = extract_methods_from_source(SRC.as_bytes(), "Person", &options).unwrap();
        let promoted: Vec<&str> = extraction.promoted.iter().map(|m| m.signature.as_str()).collect();
        assert_eq!(promoted, vec!["ID() (id int, err error)"]);
    }

    #[test]
    fn promoted_methods_need_the_flag() {
        let closure: IndexSet<String> = ["Base".to_string()].into_iter().collect();
        let options = ExtractOptions {
            embedded_closure: Some(&closure),
            ..opts()
        };
        let extraction = extract_methods_from_source(SRC.as_bytes(), "Person", &options).unwrap();
        assert!(extraction.promoted.is_empty());
    }

    #[test]
    fn type_doc_and_import_override() {
        let options = ExtractOptions {
            copy_type_doc: true,
            import_override: Some("github.com/test/footest"),
            ..opts()
        };
        let extraction = extract_methods_from_source(SRC.as_bytes(), "Person", &options).unwrap();
        assert_eq!(extraction.type_doc.as_deref(), Some("Person ...\nSecond line."));
        assert_eq!(
            extraction.imports,
            vec!["notmain \"fmt\"", ". \"github.com/test/footest\""]
        );
    }

    #[test]
    fn generic_receivers_and_type_params() {
        let src = b"package p\n\ntype Box[T any] struct{ v T }\n\nfunc (b *Box[T]) Get() T { return b.v }\n";
        let extraction = extract_methods_from_source(src, "Box", &ExtractOptions::default()).unwrap();
        assert_eq!(extraction.type_params.as_deref(), Some("[T any]"));
        assert_eq!(extraction.direct[0].signature, "Get() (T)");
    }

    #[test]
    fn receiver_names() {
        let parsed = ParsedFile::parse(SRC.as_bytes()).unwrap();
        let names: Vec<Option<&str>> = parsed.file.funcs().map(receiver_type_name).collect();
        assert_eq!(
            names,
            vec![
                Some("Person"),
                Some("Person"),
                Some("Person"),
                Some("Base"),
                Some("Base"),
                None,
                None
            ]
        );
    }
}
