use pest::iterators::Pair;

use super::errors::{missing_token_error, unexpected_rule_error, ParseError};
use super::types::{build_signature, build_type_expr};
use super::{span_of, Rule};
use crate::ast::{Decl, FuncDecl, ImportSpec, SourceFile, TypeDecl, TypeSpec, ValueDecl};
use crate::comments::doc_comment_before;

pub fn build_source_file(pair: Pair<Rule>, src: &str) -> Result<SourceFile, ParseError> {
    let mut package = None;
    let mut imports = Vec::new();
    let mut decls = Vec::new();

    for item in pair.clone().into_inner() {
        match item.as_rule() {
            Rule::package_clause => {
                let name = item
                    .clone()
                    .into_inner()
                    .next()
                    .ok_or_else(|| missing_token_error("package name", &item))?;
                package = Some((name.as_str().to_string(), span_of(&item)));
            }
            Rule::import_decl => {
                for spec in item.into_inner() {
                    imports.push(build_import_spec(spec)?);
                }
            }
            Rule::type_decl => decls.push(Decl::Type(build_type_decl(item, src)?)),
            Rule::func_decl => decls.push(Decl::Func(build_func_decl(item, src)?)),
            Rule::var_decl | Rule::const_decl => {
                let span = span_of(&item);
                decls.push(Decl::Value(ValueDecl {
                    span,
                    doc: doc_comment_before(src, span.start),
                }));
            }
            Rule::EOI => {}
            _ => return Err(unexpected_rule_error("top-level declaration", &item)),
        }
    }

    let (package, package_span) =
        package.ok_or_else(|| missing_token_error("package clause", &pair))?;
    Ok(SourceFile {
        package,
        package_span,
        imports,
        decls,
    })
}

fn build_import_spec(pair: Pair<Rule>) -> Result<ImportSpec, ParseError> {
    let span = span_of(&pair);
    let mut alias = None;
    let mut path = None;
    for part in pair.clone().into_inner() {
        match part.as_rule() {
            Rule::import_alias => alias = Some(part.as_str().to_string()),
            Rule::string_lit => path = Some(part.as_str().to_string()),
            _ => return Err(unexpected_rule_error("import spec", &part)),
        }
    }
    let path = path.ok_or_else(|| missing_token_error("import path", &pair))?;
    Ok(ImportSpec { span, alias, path })
}

fn build_type_decl(pair: Pair<Rule>, src: &str) -> Result<TypeDecl, ParseError> {
    let span = span_of(&pair);
    let grouped = pair
        .as_str()
        .strip_prefix("type")
        .map_or(false, |rest| rest.trim_start().starts_with('('));

    let specs = pair
        .into_inner()
        .map(|spec| build_type_spec(spec, src, grouped))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypeDecl {
        span,
        doc: doc_comment_before(src, span.start),
        grouped,
        specs,
    })
}

fn build_type_spec(pair: Pair<Rule>, src: &str, grouped: bool) -> Result<TypeSpec, ParseError> {
    let span = span_of(&pair);
    let mut name = None;
    let mut type_params = None;
    let mut alias = false;
    let mut ty = None;

    for part in pair.clone().into_inner() {
        match part.as_rule() {
            Rule::ident => name = Some(part.as_str().to_string()),
            Rule::type_params => type_params = Some(span_of(&part)),
            Rule::alias_marker => alias = true,
            Rule::type_expr => ty = Some(build_type_expr(part, src)?),
            _ => return Err(unexpected_rule_error("type spec", &part)),
        }
    }

    Ok(TypeSpec {
        span,
        doc: if grouped {
            doc_comment_before(src, span.start)
        } else {
            None
        },
        name: name.ok_or_else(|| missing_token_error("type name", &pair))?,
        type_params,
        alias,
        ty: ty.ok_or_else(|| missing_token_error("type", &pair))?,
    })
}

fn build_func_decl(pair: Pair<Rule>, src: &str) -> Result<FuncDecl, ParseError> {
    let span = span_of(&pair);
    let mut receiver = None;
    let mut name = None;
    let mut type_params = None;
    let mut signature = None;
    let mut body = None;

    for part in pair.clone().into_inner() {
        match part.as_rule() {
            Rule::receiver => {
                let params = part
                    .clone()
                    .into_inner()
                    .next()
                    .ok_or_else(|| missing_token_error("receiver parameters", &part))?;
                receiver = Some(super::types::build_parameters(params, src)?);
            }
            Rule::ident => name = Some(part.as_str().to_string()),
            Rule::type_params => type_params = Some(span_of(&part)),
            Rule::signature => signature = Some(build_signature(part, src)?),
            Rule::func_body => body = Some(span_of(&part)),
            _ => return Err(unexpected_rule_error("function declaration", &part)),
        }
    }

    Ok(FuncDecl {
        span,
        doc: doc_comment_before(src, span.start),
        receiver,
        name: name.ok_or_else(|| missing_token_error("function name", &pair))?,
        type_params,
        signature: signature.ok_or_else(|| missing_token_error("signature", &pair))?,
        body,
    })
}
