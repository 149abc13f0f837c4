//! Inline mark scanner.
//!
//! Recognises `**bold**`, `*italic*`, `_italic_`, `~~strike~~`, `` `code` ``
//! and `[text](url)`. Anything that does not close properly stays literal.

use crate::model::{merge_adjacent, Mark, Node};

enum Span<'a> {
    Marked(Mark, &'a str),
    Code(&'a str),
    Link { text: &'a str, href: &'a str },
}

/// Parse a line of text into inline nodes.
///
/// Adjacent runs with identical marks are merged. Empty input yields no nodes.
pub fn parse_inline(text: &str) -> Vec<Node> {
    let mut out = Vec::new();
    scan(text, &[], &mut out);
    merge_adjacent(out)
}

fn scan(text: &str, marks: &[Mark], out: &mut Vec<Node>) {
    let bytes = text.as_bytes();
    let mut plain_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        // Delimiters are ASCII, so `i` is a char boundary whenever one matches.
        if !matches!(bytes[i], b'`' | b'*' | b'~' | b'_' | b'[') {
            i += 1;
            continue;
        }
        let Some((consumed, span)) = match_span(text, i) else {
            i += 1;
            continue;
        };

        push_text(&text[plain_start..i], marks, out);
        match span {
            Span::Code(code) => {
                let mut code_marks = marks.to_vec();
                code_marks.push(Mark::Code);
                push_text(code, &code_marks, out);
            }
            Span::Marked(mark, inner) => {
                let mut inner_marks = marks.to_vec();
                if !inner_marks.contains(&mark) {
                    inner_marks.push(mark);
                }
                scan(inner, &inner_marks, out);
            }
            Span::Link { text: label, href } => {
                let mut link_marks = marks.to_vec();
                link_marks.push(Mark::link(href));
                scan(label, &link_marks, out);
            }
        }
        i += consumed;
        plain_start = i;
    }

    push_text(&text[plain_start..], marks, out);
}

fn match_span(text: &str, i: usize) -> Option<(usize, Span<'_>)> {
    let rest = &text[i..];
    match *rest.as_bytes().first()? {
        b'`' => {
            let j = rest[1..].find('`')?;
            (j > 0).then(|| (j + 2, Span::Code(&rest[1..1 + j])))
        }
        b'*' if rest.starts_with("**") => {
            delimited(rest, "**").map(|(n, inner)| (n, Span::Marked(Mark::Bold, inner)))
        }
        b'~' if rest.starts_with("~~") => {
            delimited(rest, "~~").map(|(n, inner)| (n, Span::Marked(Mark::Strike, inner)))
        }
        b'*' => delimited(rest, "*").map(|(n, inner)| (n, Span::Marked(Mark::Italic, inner))),
        b'_' => {
            // Intra-word underscores (snake_case) are not emphasis.
            let prev = text[..i].chars().next_back();
            if prev.is_some_and(char::is_alphanumeric) {
                return None;
            }
            let (n, inner) = delimited(rest, "_")?;
            let next = rest[n..].chars().next();
            if next.is_some_and(char::is_alphanumeric) {
                return None;
            }
            Some((n, Span::Marked(Mark::Italic, inner)))
        }
        b'[' => {
            let close = rest.find("](")?;
            let label = &rest[1..close];
            let after = &rest[close + 2..];
            let end = after.find(')')?;
            let href = after[..end].trim();
            if label.is_empty() || href.is_empty() || label.contains('[') {
                return None;
            }
            Some((close + 2 + end + 1, Span::Link { text: label, href }))
        }
        _ => None,
    }
}

/// Find `delim inner delim` at the start of `rest`.
///
/// The inner text must be non-empty and must not start or end with whitespace.
fn delimited<'a>(rest: &'a str, delim: &str) -> Option<(usize, &'a str)> {
    let body = &rest[delim.len()..];
    let j = body.find(delim)?;
    let inner = &body[..j];
    if inner.is_empty()
        || inner.starts_with(char::is_whitespace)
        || inner.ends_with(char::is_whitespace)
    {
        return None;
    }
    Some((delim.len() * 2 + j, inner))
}

fn push_text(text: &str, marks: &[Mark], out: &mut Vec<Node>) {
    if !text.is_empty() {
        out.push(Node::marked_text(text, marks.to_vec()));
    }
}
