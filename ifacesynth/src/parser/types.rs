use pest::iterators::Pair;

use super::errors::{missing_token_error, unexpected_rule_error, ParseError};
use super::{span_of, Rule};
use crate::ast::{ChanDir, ConstraintTerm, Field, InterfaceElem, Signature, TypeExpr, TypeKind};
use crate::comments::doc_comment_before;

fn next_inner<'i>(pair: &Pair<'i, Rule>, token: &str) -> Result<Pair<'i, Rule>, ParseError> {
    pair.clone()
        .into_inner()
        .next()
        .ok_or_else(|| missing_token_error(token, pair))
}

fn boxed(pair: Pair<Rule>, src: &str) -> Result<Box<TypeExpr>, ParseError> {
    build_type_expr(pair, src).map(Box::new)
}

// Build a type expression from `type_expr` or any of its alternatives
pub fn build_type_expr(pair: Pair<Rule>, src: &str) -> Result<TypeExpr, ParseError> {
    let actual = match pair.as_rule() {
        Rule::type_expr => next_inner(&pair, "type")?,
        _ => pair,
    };
    let span = span_of(&actual);

    let kind = match actual.as_rule() {
        Rule::type_name_expr => build_type_name(actual, src)?,
        Rule::pointer_type | Rule::pointer_embed => {
            TypeKind::Pointer(boxed(next_inner(&actual, "pointer base type")?, src)?)
        }
        Rule::slice_type => TypeKind::Slice(boxed(next_inner(&actual, "slice element type")?, src)?),
        Rule::variadic_type => {
            TypeKind::Variadic(boxed(next_inner(&actual, "variadic element type")?, src)?)
        }
        Rule::paren_type => TypeKind::Paren(boxed(next_inner(&actual, "parenthesized type")?, src)?),
        Rule::array_type => {
            let mut inner = actual.clone().into_inner();
            let len = inner
                .next()
                .ok_or_else(|| missing_token_error("array length", &actual))?;
            let elem = inner
                .next()
                .ok_or_else(|| missing_token_error("array element type", &actual))?;
            TypeKind::Array {
                len: len.as_str().trim().to_string(),
                elem: boxed(elem, src)?,
            }
        }
        Rule::map_type => {
            let mut inner = actual.clone().into_inner();
            let key = inner
                .next()
                .ok_or_else(|| missing_token_error("map key type", &actual))?;
            let value = inner
                .next()
                .ok_or_else(|| missing_token_error("map value type", &actual))?;
            TypeKind::Map {
                key: boxed(key, src)?,
                value: boxed(value, src)?,
            }
        }
        Rule::chan_type => {
            let mut inner = actual.clone().into_inner();
            let dir = inner
                .next()
                .ok_or_else(|| missing_token_error("channel direction", &actual))?;
            let elem = inner
                .next()
                .ok_or_else(|| missing_token_error("channel element type", &actual))?;
            let dir = match dir.as_str().split_whitespace().collect::<String>().as_str() {
                "chan<-" => ChanDir::Send,
                "<-chan" => ChanDir::Recv,
                _ => ChanDir::Both,
            };
            TypeKind::Chan {
                dir,
                elem: boxed(elem, src)?,
            }
        }
        Rule::func_type => TypeKind::Func(build_signature(next_inner(&actual, "signature")?, src)?),
        Rule::struct_type => TypeKind::Struct(
            actual
                .into_inner()
                .map(|field| build_struct_field(field, src))
                .collect::<Result<_, _>>()?,
        ),
        Rule::interface_type => TypeKind::Interface(
            actual
                .into_inner()
                .map(|elem| build_interface_elem(elem, src))
                .collect::<Result<_, _>>()?,
        ),
        _ => return Err(unexpected_rule_error("type expression", &actual)),
    };

    Ok(TypeExpr { span, kind })
}

fn build_type_name(pair: Pair<Rule>, src: &str) -> Result<TypeKind, ParseError> {
    let mut inner = pair.clone().into_inner();
    let qualified = inner
        .next()
        .ok_or_else(|| missing_token_error("type name", &pair))?;

    let mut qualifier = None;
    let mut name = None;
    for part in qualified.clone().into_inner() {
        match part.as_rule() {
            Rule::package_qualifier => qualifier = Some(part.as_str().to_string()),
            Rule::ident => name = Some((part.as_str().to_string(), span_of(&part))),
            _ => return Err(unexpected_rule_error("qualified identifier", &part)),
        }
    }
    let (name, name_span) = name.ok_or_else(|| missing_token_error("identifier", &qualified))?;

    let args = match inner.next() {
        Some(type_args) => type_args
            .into_inner()
            .map(|arg| build_type_expr(arg, src))
            .collect::<Result<_, _>>()?,
        None => Vec::new(),
    };

    Ok(TypeKind::Named {
        qualifier,
        name,
        name_span,
        args,
    })
}

pub fn build_ident_list(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner().map(|ident| ident.as_str().to_string()).collect()
}

pub fn build_signature(pair: Pair<Rule>, src: &str) -> Result<Signature, ParseError> {
    let mut inner = pair.clone().into_inner();
    let params = inner
        .next()
        .ok_or_else(|| missing_token_error("parameters", &pair))?;
    let params = build_parameters(params, src)?;

    let results = match inner.next() {
        None => Vec::new(),
        Some(result) => {
            let result_inner = next_inner(&result, "result")?;
            match result_inner.as_rule() {
                Rule::parameters => build_parameters(result_inner, src)?,
                _ => {
                    let ty = build_type_expr(result_inner, src)?;
                    vec![Field {
                        span: ty.span,
                        names: Vec::new(),
                        ty,
                        tag: None,
                    }]
                }
            }
        }
    };

    Ok(Signature { params, results })
}

pub fn build_parameters(pair: Pair<Rule>, src: &str) -> Result<Vec<Field>, ParseError> {
    pair.into_inner()
        .map(|decl| {
            let span = span_of(&decl);
            let mut names = Vec::new();
            let mut ty = None;
            for part in decl.clone().into_inner() {
                match part.as_rule() {
                    Rule::ident_list => names = build_ident_list(part),
                    _ => ty = Some(build_type_expr(part, src)?),
                }
            }
            let ty = ty.ok_or_else(|| missing_token_error("parameter type", &decl))?;
            Ok(Field {
                span,
                names,
                ty,
                tag: None,
            })
        })
        .collect()
}

fn build_struct_field(pair: Pair<Rule>, src: &str) -> Result<Field, ParseError> {
    let field = next_inner(&pair, "field")?;
    let span = span_of(&field);
    let mut names = Vec::new();
    let mut ty = None;
    let mut tag = None;

    for part in field.clone().into_inner() {
        match part.as_rule() {
            Rule::ident_list => names = build_ident_list(part),
            Rule::tag => tag = Some(part.as_str().to_string()),
            _ => ty = Some(build_type_expr(part, src)?),
        }
    }

    let ty = ty.ok_or_else(|| missing_token_error("field type", &field))?;
    Ok(Field {
        span,
        names,
        ty,
        tag,
    })
}

fn build_interface_elem(pair: Pair<Rule>, src: &str) -> Result<InterfaceElem, ParseError> {
    let elem = next_inner(&pair, "interface element")?;
    let span = span_of(&elem);
    let doc = doc_comment_before(src, span.start);

    match elem.as_rule() {
        Rule::method_elem => {
            let mut inner = elem.clone().into_inner();
            let name = inner
                .next()
                .ok_or_else(|| missing_token_error("method name", &elem))?;
            let signature = inner
                .next()
                .ok_or_else(|| missing_token_error("method signature", &elem))?;
            Ok(InterfaceElem::Method {
                span,
                doc,
                name: name.as_str().to_string(),
                signature: build_signature(signature, src)?,
            })
        }
        Rule::constraint => Ok(InterfaceElem::Embedded {
            span,
            doc,
            terms: build_constraint(elem, src)?,
        }),
        _ => Err(unexpected_rule_error("method or embedded type", &elem)),
    }
}

fn build_constraint(pair: Pair<Rule>, src: &str) -> Result<Vec<ConstraintTerm>, ParseError> {
    pair.into_inner()
        .map(|term| {
            let mut tilde = false;
            let mut ty = None;
            for part in term.clone().into_inner() {
                match part.as_rule() {
                    Rule::tilde => tilde = true,
                    _ => ty = Some(build_type_expr(part, src)?),
                }
            }
            let ty = ty.ok_or_else(|| missing_token_error("constraint type", &term))?;
            Ok(ConstraintTerm { tilde, ty })
        })
        .collect()
}
