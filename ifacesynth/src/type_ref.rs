//! Rendering of parameter and result types for the generated interface.
//!
//! Types are printed from their source text. When the base identifier of a
//! type names a struct declared in another package it gets that package as a
//! qualifier, and any qualifier equal to the destination package is removed,
//! since the interface lives in that package.

use regex::Regex;

use crate::ast::{Field, TypeExpr, TypeKind};
use crate::scanner::DeclaredType;

/// A type expression split around its base identifier: for `[]*pkg.Item`
/// the prefix is `[]*`, the qualifier `pkg`, the base `Item` and the suffix
/// empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub prefix: String,
    pub qualifier: Option<String>,
    pub base: String,
    pub suffix: String,
}

impl TypeRef {
    /// Returns `None` for types without a single base identifier, such as
    /// function, channel, struct or interface literals.
    pub fn from_expr(src: &str, expr: &TypeExpr) -> Option<TypeRef> {
        let named = base_named(expr)?;
        let TypeKind::Named {
            qualifier,
            name,
            name_span,
            ..
        } = &named.kind
        else {
            return None;
        };
        Some(TypeRef {
            prefix: src[expr.span.start..named.span.start].to_string(),
            qualifier: qualifier.clone(),
            base: name.clone(),
            suffix: src[name_span.end..expr.span.end].to_string(),
        })
    }

    pub fn is_qualified(&self) -> bool {
        self.qualifier.is_some()
    }

    pub fn render(&self) -> String {
        match &self.qualifier {
            Some(qualifier) => format!("{}{}.{}{}", self.prefix, qualifier, self.base, self.suffix),
            None => format!("{}{}{}", self.prefix, self.base, self.suffix),
        }
    }
}

// Pointer, slice, array, map value and variadic types are unwrapped.
fn base_named(expr: &TypeExpr) -> Option<&TypeExpr> {
    match &expr.kind {
        TypeKind::Named { .. } => Some(expr),
        TypeKind::Pointer(inner)
        | TypeKind::Slice(inner)
        | TypeKind::Variadic(inner)
        | TypeKind::Array { elem: inner, .. }
        | TypeKind::Map { value: inner, .. } => base_named(inner),
        _ => None,
    }
}

pub struct TypeRefFormatter<'a> {
    dest_package: &'a str,
    known_types: &'a [DeclaredType],
    source_package: Option<&'a str>,
    dest_qualifier: Option<Regex>,
}

impl<'a> TypeRefFormatter<'a> {
    pub fn new(dest_package: &'a str, known_types: &'a [DeclaredType]) -> Self {
        let dest_qualifier = if dest_package.is_empty() {
            None
        } else {
            Regex::new(&format!(r"(^|[^\w]){}\.", regex::escape(dest_package))).ok()
        };
        TypeRefFormatter {
            dest_package,
            known_types,
            source_package: None,
            dest_qualifier,
        }
    }

    /// Package of the file whose types are being formatted. A name declared
    /// in that package refers to the local declaration.
    pub fn with_source_package(mut self, package: &'a str) -> Self {
        self.source_package = Some(package);
        self
    }

    fn resolve(&self, name: &str) -> Option<&'a DeclaredType> {
        if let Some(package) = self.source_package {
            if let Some(local) = self
                .known_types
                .iter()
                .find(|dt| dt.name == name && dt.package == package)
            {
                return (local.package != self.dest_package).then_some(local);
            }
        }
        self.known_types
            .iter()
            .find(|dt| dt.name == name && dt.package != self.dest_package)
    }

    pub fn format_type(&self, src: &str, expr: &TypeExpr) -> String {
        let text = match TypeRef::from_expr(src, expr) {
            Some(mut type_ref) if !type_ref.is_qualified() => {
                if let Some(declared) = self.resolve(&type_ref.base) {
                    type_ref.qualifier = Some(declared.package.clone());
                }
                type_ref.render()
            }
            _ => expr.span.text(src).to_string(),
        };
        match &self.dest_qualifier {
            Some(pattern) => pattern.replace_all(&text, "${1}").into_owned(),
            None => text,
        }
    }

    /// One entry per field: `a, b T` when the field is named, the type alone
    /// otherwise.
    pub fn format_field_list(&self, src: &str, fields: &[Field]) -> Vec<String> {
        fields
            .iter()
            .map(|field| {
                let ty = self.format_type(src, &field.ty);
                if field.names.is_empty() {
                    ty
                } else {
                    format!("{} {}", field.names.join(", "), ty)
                }
            })
            .collect()
    }
}

pub fn format_type_ref(
    src: &str,
    expr: &TypeExpr,
    dest_package: &str,
    known_types: &[DeclaredType],
) -> String {
    TypeRefFormatter::new(dest_package, known_types).format_type(src, expr)
}

pub fn format_field_list(
    src: &str,
    fields: &[Field],
    dest_package: &str,
    known_types: &[DeclaredType],
) -> Vec<String> {
    TypeRefFormatter::new(dest_package, known_types).format_field_list(src, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedFile;
    use pretty_assertions::assert_eq;

    /// Parses `func F(<params>)` and returns the source and its parameters.
    fn params(list: &str) -> (String, Vec<Field>) {
        let parsed = ParsedFile::parse_str(&format!("package p\nfunc F({})\n", list)).unwrap();
        let func = parsed.file.funcs().next().unwrap().clone();
        (parsed.source, func.signature.params)
    }

    fn known(pairs: &[(&str, &str)]) -> Vec<DeclaredType> {
        pairs.iter().map(|(name, pkg)| DeclaredType::new(*name, *pkg)).collect()
    }

    #[test]
    fn splits_around_base_identifier() {
        let (src, fields) = params("a []*pkg.Item, b map[string]Value, c Box[int]");
        let refs: Vec<TypeRef> = fields
            .iter()
            .map(|f| TypeRef::from_expr(&src, &f.ty).unwrap())
            .collect();
        assert_eq!(refs[0].prefix, "[]*");
        assert_eq!(refs[0].qualifier.as_deref(), Some("pkg"));
        assert_eq!(refs[0].base, "Item");
        assert_eq!(refs[1].prefix, "map[string]");
        assert_eq!(refs[1].base, "Value");
        assert_eq!(refs[2].suffix, "[int]");
        assert_eq!(refs[2].render(), "Box[int]");
    }

    #[test]
    fn literals_have_no_base() {
        let (src, fields) = params("f func(), c chan int");
        assert!(fields.iter().all(|f| TypeRef::from_expr(&src, &f.ty).is_none()));
    }

    #[test]
    fn qualifies_types_from_other_packages() {
        let (src, fields) = params("u *User, v ...User, w []int");
        let known = known(&[("User", "footest")]);
        assert_eq!(
            format_field_list(&src, &fields, "gen", &known),
            vec!["u *footest.User", "v ...footest.User", "w []int"]
        );
    }

    #[test]
    fn strips_destination_qualifier() {
        let (src, fields) = params("t []bar.Type, x foobar.Type");
        assert_eq!(
            format_field_list(&src, &fields, "bar", &[]),
            vec!["t []Type", "x foobar.Type"]
        );
    }

    #[test]
    fn destination_types_stay_unqualified() {
        let (src, fields) = params("u User");
        let known = known(&[("User", "gen")]);
        assert_eq!(format_field_list(&src, &fields, "gen", &known), vec!["u User"]);
    }

    #[test]
    fn qualified_types_are_not_requalified() {
        let (src, fields) = params("s *other.Smiter");
        let known = known(&[("Smiter", "footest")]);
        assert_eq!(format_type_ref(&src, &fields[0].ty, "gen", &known), "*other.Smiter");
    }

    #[test]
    fn local_declaration_wins() {
        let (src, fields) = params("n Node");
        let known = known(&[("Node", "a"), ("Node", "b")]);
        let formatter = TypeRefFormatter::new("b", &known).with_source_package("b");
        assert_eq!(formatter.format_type(&src, &fields[0].ty), "Node");
        let formatter = TypeRefFormatter::new("c", &known).with_source_package("b");
        assert_eq!(formatter.format_type(&src, &fields[0].ty), "b.Node");
        let formatter = TypeRefFormatter::new("b", &known);
        assert_eq!(formatter.format_type(&src, &fields[0].ty), "a.Node");
    }

    #[test]
    fn result_type_before_body_ends_at_the_type() {
        let parsed =
            ParsedFile::parse_str("package p\n\nfunc (s *S) Get() *User {\n\treturn nil\n}\n")
                .unwrap();
        let func = parsed.file.funcs().next().unwrap();
        let result = &func.signature.results[0].ty;
        assert_eq!(parsed.text(result.span), "*User");

        let known = known(&[("User", "other")]);
        assert_eq!(
            format_type_ref(&parsed.source, result, "gen", &known),
            "*other.User"
        );
        assert_eq!(
            format_field_list(&parsed.source, &func.signature.results, "gen", &known),
            vec!["*other.User"]
        );
    }

    #[test]
    fn unnamed_fields_render_type_only() {
        let (src, fields) = params("string, int");
        assert_eq!(format_field_list(&src, &fields, "", &[]), vec!["string", "int"]);
    }
}
