//! Doc comment discovery and Go's comment-to-text conversion.

use lazy_static::lazy_static;
use regex::Regex;

use crate::ast::Span;

lazy_static! {
    // Tool directives such as `//go:generate` or `//line foo.go:1`.
    static ref DIRECTIVE: Regex = Regex::new(r"^(line |extern |export |[a-z0-9]+:[a-z0-9])")
        .expect("directive pattern is valid");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub span: Span,
    /// Raw comment text including the `//` or `/* */` markers.
    pub text: String,
}

/// A run of comments with no blank line between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    /// Raw source lines of the group, markers kept.
    pub fn lines(&self) -> Vec<String> {
        self.comments
            .iter()
            .flat_map(|comment| comment.text.lines().map(|line| line.trim().to_string()))
            .collect()
    }

    /// Comment text with markers removed.
    ///
    /// Directive lines are dropped, trailing whitespace is trimmed, runs of
    /// blank lines collapse to one and leading or trailing blank lines are
    /// removed. Non-empty results end in a newline.
    pub fn text(&self) -> String {
        let mut lines: Vec<&str> = Vec::new();
        for comment in &self.comments {
            let raw = comment.text.as_str();
            if let Some(body) = raw.strip_prefix("//") {
                match body.strip_prefix(' ') {
                    Some(stripped) => lines.push(stripped),
                    None if DIRECTIVE.is_match(body) => {}
                    None => lines.push(body),
                }
            } else if let Some(body) = raw.strip_prefix("/*") {
                let body = body.strip_suffix("*/").unwrap_or(body);
                lines.extend(body.split('\n'));
            }
        }

        let mut out: Vec<&str> = Vec::new();
        for line in lines.into_iter().map(str::trim_end) {
            if line.is_empty() && out.last().map_or(true, |last| last.is_empty()) {
                continue;
            }
            out.push(line);
        }
        while out.last().map_or(false, |last| last.is_empty()) {
            out.pop();
        }

        if out.is_empty() {
            return String::new();
        }
        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

/// Finds the comment group attached to the node starting at `offset`.
///
/// A doc comment is the run of comment-only lines immediately above the
/// node's line; a blank line or a line holding code ends it. Nodes that do
/// not start their line have no doc comment.
pub fn doc_comment_before(src: &str, offset: usize) -> Option<CommentGroup> {
    let node_line = line_start(src, offset);
    if !src[node_line..offset].trim().is_empty() {
        return None;
    }

    let mut comments = Vec::new();
    let mut cursor = node_line;
    while cursor > 0 {
        let prev_end = cursor - 1;
        let prev_start = line_start(src, prev_end);
        let line = &src[prev_start..prev_end];
        let trimmed = line.trim();
        let begin = prev_start + (line.len() - line.trim_start().len());
        let end = prev_start + line.trim_end().len();

        if trimmed.starts_with("//") {
            comments.push(Comment {
                span: Span::new(begin, end),
                text: src[begin..end].to_string(),
            });
            cursor = prev_start;
        } else if trimmed.ends_with("*/") {
            let Some(open) = src[..end - 2].rfind("/*") else {
                break;
            };
            let open_line = line_start(src, open);
            if !src[open_line..open].trim().is_empty() {
                break;
            }
            comments.push(Comment {
                span: Span::new(open, end),
                text: src[open..end].to_string(),
            });
            cursor = open_line;
        } else {
            break;
        }
    }

    if comments.is_empty() {
        return None;
    }
    comments.reverse();
    Some(CommentGroup { comments })
}

fn line_start(src: &str, offset: usize) -> usize {
    src[..offset].rfind('\n').map_or(0, |i| i + 1)
}
