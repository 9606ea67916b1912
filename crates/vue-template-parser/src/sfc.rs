//! Single-file component splitting.
//!
//! Only the top-level `<template>` block matters to the converter. Script,
//! style and custom blocks are skipped without being parsed, so their
//! content can never be mistaken for markup.

use crate::error::{ErrorCode, ParseError, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use source_map::Span;

static LANG_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|\s)lang\s*=\s*["']?([\w-]+)"#).expect("valid regex"));

/// The blocks of a component file that the converter consumes.
#[derive(Debug, Clone, Default)]
pub struct Sfc {
    pub template: Option<TemplateBlock>,
}

/// The top-level `<template>` block.
#[derive(Debug, Clone)]
pub struct TemplateBlock {
    /// Raw markup between the opening and closing tags.
    pub content: String,
    /// Position of `content` within the file.
    pub content_span: Span,
    pub lang: Option<String>,
}

/// Locate the top-level template block of a component file.
pub fn parse_sfc(source: &str) -> ParseResult<Sfc> {
    let bytes = source.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let rest = &bytes[pos..];

        if rest.starts_with(b"<!--") {
            match find(bytes, pos, b"-->") {
                Some(end) => {
                    pos = end + 3;
                    continue;
                }
                None => break,
            }
        }

        let Some(name) = block_name(rest) else {
            pos += 1;
            continue;
        };

        let Some(open_end) = tag_end(bytes, pos) else {
            return Err(ParseError::unterminated(
                &format!("<{}> tag", name),
                Span::new(pos as u32, bytes.len() as u32),
            ));
        };
        let attrs = &source[pos + 1 + name.len()..open_end];
        let content_start = open_end + 1;

        if name == "template" {
            let lang = LANG_ATTR
                .captures(attrs)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
            if let Some(lang) = lang.as_deref().filter(|l| *l != "html") {
                return Err(ParseError::new(
                    format!("template language `{}` is not supported", lang),
                    Span::new(pos as u32, content_start as u32),
                    ErrorCode::UnsupportedLang,
                ));
            }

            let Some(content_end) = matching_template_close(bytes, content_start) else {
                return Err(ParseError::unclosed_element(
                    "template",
                    Span::new(pos as u32, content_start as u32),
                ));
            };
            return Ok(Sfc {
                template: Some(TemplateBlock {
                    content: source[content_start..content_end].to_string(),
                    content_span: Span::new(content_start as u32, content_end as u32),
                    lang,
                }),
            });
        }

        if attrs.trim_end().ends_with('/') {
            pos = content_start;
            continue;
        }
        let close = format!("</{}", name);
        match find(bytes, content_start, close.as_bytes()) {
            Some(at) => pos = tag_end(bytes, at).map_or(bytes.len(), |end| end + 1),
            None => break,
        }
    }

    Ok(Sfc::default())
}

/// Lowercased block name if `rest` starts with an opening tag.
fn block_name(rest: &[u8]) -> Option<String> {
    if rest.first() != Some(&b'<') || !rest.get(1).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let len = rest[1..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
        .count();
    Some(String::from_utf8_lossy(&rest[1..1 + len]).to_ascii_lowercase())
}

/// Index of the `>` closing the tag that starts at `start`, skipping quoted
/// attribute values.
fn tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Case-insensitive search for an ASCII needle.
fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|i| i + from)
}

/// Start of the `</template>` that balances the block opened before `from`.
fn matching_template_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = from;

    while pos < bytes.len() {
        let rest = &bytes[pos..];
        if rest.starts_with(b"<!--") {
            pos = find(bytes, pos, b"-->").map_or(bytes.len(), |end| end + 3);
        } else if starts_with_ignore_case(rest, b"</template") {
            depth -= 1;
            if depth == 0 {
                return Some(pos);
            }
            pos += b"</template".len();
        } else if starts_with_ignore_case(rest, b"<template")
            && rest
                .get(b"<template".len())
                .is_some_and(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/')
        {
            let end = tag_end(bytes, pos)?;
            if bytes[end - 1] != b'/' {
                depth += 1;
            }
            pos = end + 1;
        } else {
            pos += 1;
        }
    }
    None
}

fn starts_with_ignore_case(haystack: &[u8], prefix: &[u8]) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}
