//! Declaration-level syntax tree for Go source files.
//!
//! Only the parts of a file that describe types and signatures are modelled.
//! Function bodies and value initialisers are kept as spans into the source
//! text and never interpreted.

use crate::comments::CommentGroup;

/// Byte range into the source text a node was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: String,
    pub package_span: Span,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

impl SourceFile {
    /// Every type spec in the file, in declaration order, paired with the
    /// declaration that contains it.
    pub fn type_specs(&self) -> impl Iterator<Item = (&TypeDecl, &TypeSpec)> {
        self.decls.iter().flat_map(|decl| match decl {
            Decl::Type(type_decl) => type_decl
                .specs
                .iter()
                .map(|spec| (type_decl, spec))
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        })
    }

    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub span: Span,
    /// Explicit name: an identifier, `.` or `_`.
    pub alias: Option<String>,
    /// The import path literal, quotes included.
    pub path: String,
}

impl ImportSpec {
    pub fn unquoted_path(&self) -> &str {
        self.path.trim_matches(|c| c == '"' || c == '`')
    }

    /// Source form of the spec, e.g. `notmain "fmt"`.
    pub fn to_line(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} {}", alias, self.path),
            None => self.path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Type(TypeDecl),
    Func(FuncDecl),
    Value(ValueDecl),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Type(decl) => decl.span,
            Decl::Func(decl) => decl.span,
            Decl::Value(decl) => decl.span,
        }
    }

    pub fn doc(&self) -> Option<&CommentGroup> {
        match self {
            Decl::Type(decl) => decl.doc.as_ref(),
            Decl::Func(decl) => decl.doc.as_ref(),
            Decl::Value(decl) => decl.doc.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub span: Span,
    pub doc: Option<CommentGroup>,
    /// `type ( ... )` form.
    pub grouped: bool,
    pub specs: Vec<TypeSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub span: Span,
    /// Only populated inside grouped declarations.
    pub doc: Option<CommentGroup>,
    pub name: String,
    pub type_params: Option<Span>,
    pub alias: bool,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub span: Span,
    pub doc: Option<CommentGroup>,
    pub receiver: Option<Vec<Field>>,
    pub name: String,
    pub type_params: Option<Span>,
    pub signature: Signature,
    pub body: Option<Span>,
}

/// A `var` or `const` declaration, kept opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDecl {
    pub span: Span,
    pub doc: Option<CommentGroup>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

/// One entry of a parameter, result or struct field list. `names` is empty
/// for unnamed parameters and embedded fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub span: Span,
    pub names: Vec<String>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub span: Span,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

impl ChanDir {
    pub fn keyword(self) -> &'static str {
        match self {
            ChanDir::Both => "chan",
            ChanDir::Send => "chan<-",
            ChanDir::Recv => "<-chan",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Named {
        qualifier: Option<String>,
        name: String,
        name_span: Span,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array {
        len: String,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
    },
    Variadic(Box<TypeExpr>),
    Func(Signature),
    Struct(Vec<Field>),
    Interface(Vec<InterfaceElem>),
    Paren(Box<TypeExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method {
        span: Span,
        doc: Option<CommentGroup>,
        name: String,
        signature: Signature,
    },
    /// Embedded interface or type-set union such as `~int | ~string`.
    Embedded {
        span: Span,
        doc: Option<CommentGroup>,
        terms: Vec<ConstraintTerm>,
    },
}

impl InterfaceElem {
    pub fn doc(&self) -> Option<&CommentGroup> {
        match self {
            InterfaceElem::Method { doc, .. } | InterfaceElem::Embedded { doc, .. } => doc.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintTerm {
    pub tilde: bool,
    pub ty: TypeExpr,
}

impl TypeExpr {
    /// Visits this expression and every type expression nested in it.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TypeExpr)) {
        visit(self);
        match &self.kind {
            TypeKind::Named { args, .. } => args.iter().for_each(|arg| arg.walk(visit)),
            TypeKind::Pointer(inner)
            | TypeKind::Slice(inner)
            | TypeKind::Variadic(inner)
            | TypeKind::Paren(inner)
            | TypeKind::Array { elem: inner, .. }
            | TypeKind::Chan { elem: inner, .. } => inner.walk(visit),
            TypeKind::Map { key, value } => {
                key.walk(visit);
                value.walk(visit);
            }
            TypeKind::Func(signature) => signature.walk(visit),
            TypeKind::Struct(fields) => fields.iter().for_each(|field| field.ty.walk(visit)),
            TypeKind::Interface(elems) => {
                for elem in elems {
                    match elem {
                        InterfaceElem::Method { signature, .. } => signature.walk(visit),
                        InterfaceElem::Embedded { terms, .. } => {
                            terms.iter().for_each(|term| term.ty.walk(visit))
                        }
                    }
                }
            }
        }
    }
}

impl Signature {
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TypeExpr)) {
        for field in self.params.iter().chain(&self.results) {
            field.ty.walk(visit);
        }
    }
}

/// Reports whether a Go identifier is exported.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().map_or(false, char::is_uppercase)
}
