//! Assembly of the final interface source text.

use crate::formatter::{CodeFormatter, FormatError, ImportOptions};

/// Doc comments starting with this are tool directives and must stay
/// attached to `//` without a space.
pub const GENERATE_DIRECTIVE: &str = "go:generate";

/// Everything the generated file is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceDecl<'a> {
    pub header_comment: &'a str,
    pub package: &'a str,
    pub name: &'a str,
    pub doc: &'a str,
    pub type_params: &'a str,
    pub methods: &'a [String],
    pub imports: &'a [String],
}

/// Unformatted source of the generated file.
pub fn render(decl: &InterfaceDecl) -> String {
    let mut lines = vec![
        format!("// {}", decl.header_comment),
        String::new(),
        format!("package {}", decl.package),
        "import (".to_string(),
    ];
    lines.extend(decl.imports.iter().cloned());
    lines.push(")".to_string());
    lines.push(String::new());

    if !decl.doc.is_empty() {
        let marker = if decl.doc.starts_with(GENERATE_DIRECTIVE) {
            "//"
        } else {
            "// "
        };
        lines.push(format!("{}{}", marker, decl.doc.replace('\n', "\n// ")));
    }

    lines.push(format!("type {}{} interface {{", decl.name, decl.type_params));
    lines.extend(decl.methods.iter().cloned());
    lines.push("}".to_string());
    lines.join("\n")
}

pub fn emit(decl: &InterfaceDecl, formatter: &impl CodeFormatter) -> Result<String, FormatError> {
    formatter.format(&render(decl), &ImportOptions::default())
}
