//! Parser for Vue templates.

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use smol_str::SmolStr;
use source_map::Span;

/// Parse a Vue template into a raw syntax tree.
pub fn parse_template(source: &str) -> ParseResult<TemplateAst> {
    let mut parser = TemplateParser::new(source);
    parser.parse()
}

struct TemplateParser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> TemplateParser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn parse(&mut self) -> ParseResult<TemplateAst> {
        let children = self.parse_children(None)?;
        let span = Span::new(0, self.source.len() as u32);
        Ok(TemplateAst::with_children(children, span))
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        &self.source[start..self.pos]
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    /// Describe the next character for error messages.
    fn found(&self) -> String {
        match self.peek() {
            Some(c) => format!("`{}`", c),
            None => "end of input".to_string(),
        }
    }

    /// `<` followed by something that can start a tag.
    fn at_tag_start(&self) -> bool {
        let mut chars = self.remaining().chars();
        chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    }

    /// Parse children until the parent's closing tag or end of input.
    fn parse_children(&mut self, parent: Option<(&str, Span)>) -> ParseResult<Vec<TemplateNode>> {
        let mut children = Vec::new();

        while !self.is_eof() {
            if self.starts_with("</") {
                let name = self.remaining()[2..]
                    .split(|c: char| c.is_whitespace() || c == '>')
                    .next()
                    .unwrap_or_default();
                return match parent {
                    Some((tag, _)) if name.eq_ignore_ascii_case(tag) => Ok(children),
                    _ => Err(ParseError::unexpected_closing_tag(
                        name,
                        Span::new(self.pos as u32, (self.pos + 2 + name.len()) as u32),
                    )),
                };
            }
            children.push(self.parse_node()?);
        }

        match parent {
            Some((tag, span)) => Err(ParseError::unclosed_element(tag, span)),
            None => Ok(children),
        }
    }

    fn parse_node(&mut self) -> ParseResult<TemplateNode> {
        if self.starts_with("<!--") {
            return self.parse_comment().map(TemplateNode::Comment);
        }
        if self.at_tag_start() {
            return self.parse_element().map(TemplateNode::Element);
        }
        if self.starts_with("{{") {
            return self.parse_interpolation().map(TemplateNode::Interpolation);
        }
        Ok(TemplateNode::Text(self.parse_text()))
    }

    fn parse_comment(&mut self) -> ParseResult<CommentNode> {
        let start = self.pos;
        self.consume("<!--");
        let Some(end) = self.remaining().find("-->") else {
            return Err(ParseError::unterminated("comment", self.span_from(start)));
        };
        let content = self.remaining()[..end].to_string();
        self.pos += end + 3;
        Ok(CommentNode {
            content,
            span: self.span_from(start),
        })
    }

    fn parse_interpolation(&mut self) -> ParseResult<InterpolationNode> {
        let start = self.pos;
        self.consume("{{");
        let Some(end) = self.remaining().find("}}") else {
            return Err(ParseError::unterminated("interpolation", self.span_from(start)));
        };
        let raw = &self.remaining()[..end];
        let leading = raw.len() - raw.trim_start().len();
        let expr_start = self.pos + leading;
        let content = raw.trim();
        let expression = Expression::new(
            content,
            Span::new(expr_start as u32, (expr_start + content.len()) as u32),
        );
        self.pos += end + 2;
        Ok(InterpolationNode {
            expression,
            span: self.span_from(start),
        })
    }

    fn parse_text(&mut self) -> TextNode {
        let start = self.pos;
        while !self.is_eof() {
            if self.starts_with("{{") || self.starts_with("</") || self.at_tag_start() {
                break;
            }
            if self.starts_with("<!--") && self.pos > start {
                break;
            }
            self.advance();
        }
        TextNode {
            content: self.source[start..self.pos].to_string(),
            span: self.span_from(start),
        }
    }

    fn parse_element(&mut self) -> ParseResult<ElementNode> {
        let start = self.pos;
        self.consume("<");

        let tag_start = self.pos;
        let tag = SmolStr::from(self.read_while(is_tag_name_char));
        let tag_span = self.span_from(tag_start);

        let props = self.parse_attributes()?;

        self.skip_whitespace();
        let explicit_self_closing = self.consume("/>");
        if !explicit_self_closing && !self.consume(">") {
            return Err(ParseError::unexpected_token(
                "`>`",
                &self.found(),
                Span::empty(self.pos as u32),
            ));
        }
        let open_span = self.span_from(start);

        let is_void = is_void_element(&tag);
        let children = if explicit_self_closing || is_void {
            Vec::new()
        } else if is_raw_text_element(&tag) {
            self.parse_raw_text(&tag, open_span)?
        } else {
            let children = self.parse_children(Some((tag.as_str(), open_span)))?;
            self.consume_closing_tag();
            children
        };

        Ok(ElementNode {
            tag,
            props,
            children,
            self_closing: explicit_self_closing || is_void,
            span: self.span_from(start),
            tag_span,
        })
    }

    /// Content of `<script>`-like elements, up to and including the closing tag.
    fn parse_raw_text(&mut self, tag: &str, open_span: Span) -> ParseResult<Vec<TemplateNode>> {
        let close = format!("</{}", tag.to_ascii_lowercase());
        let Some(end) = self.remaining().to_ascii_lowercase().find(&close) else {
            return Err(ParseError::unclosed_element(tag, open_span));
        };
        let start = self.pos;
        self.pos += end;
        let text = &self.source[start..self.pos];
        self.consume_closing_tag();

        if text.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![TemplateNode::Text(TextNode {
            content: text.to_string(),
            span: Span::new(start as u32, (start + text.len()) as u32),
        })])
    }

    fn consume_closing_tag(&mut self) {
        if self.consume("</") {
            self.read_while(is_tag_name_char);
            self.skip_whitespace();
            self.consume(">");
        }
    }

    fn parse_attributes(&mut self) -> ParseResult<Vec<PropNode>> {
        let mut props = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }
            // A stray slash, as in `<div / >`.
            if self.starts_with("/") {
                self.advance();
                continue;
            }

            let attr_start = self.pos;
            let name = self.read_while(is_attr_name_char);
            if name.is_empty() {
                return Err(ParseError::unexpected_token(
                    "attribute name",
                    &self.found(),
                    Span::empty(self.pos as u32),
                ));
            }

            self.skip_whitespace();
            let value = if self.consume("=") {
                self.skip_whitespace();
                Some(self.parse_attribute_value()?)
            } else {
                None
            };
            let span = self.span_from(attr_start);

            let prop = match split_directive(name) {
                Some((directive, rest)) => {
                    let (arg, modifiers) = parse_directive_arg(rest);
                    PropNode::Directive(Directive {
                        name: directive.into(),
                        raw_name: name.into(),
                        arg,
                        modifiers,
                        exp: value.map(|(content, span)| Expression::new(content, span)),
                        span,
                    })
                }
                None => PropNode::Attribute(Attribute {
                    name: name.into(),
                    value: value.map(|(content, _)| content),
                    span,
                }),
            };
            props.push(prop);
        }

        Ok(props)
    }

    fn parse_attribute_value(&mut self) -> ParseResult<(String, Span)> {
        let start = self.pos;

        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let value_start = self.pos;
                let Some(len) = self.remaining().find(quote) else {
                    return Err(ParseError::unterminated("attribute value", self.span_from(start)));
                };
                self.pos += len;
                let span = self.span_from(value_start);
                let value = self.source[value_start..self.pos].to_string();
                self.advance();
                Ok((value, span))
            }
            _ => {
                let value = self
                    .read_while(|c| !c.is_whitespace() && c != '>')
                    .to_string();
                Ok((value, self.span_from(start)))
            }
        }
    }
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

fn is_attr_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'')
}

/// Split an attribute name into its directive name and the remainder that
/// holds the argument and modifiers. `None` for plain attributes.
fn split_directive(name: &str) -> Option<(&str, &str)> {
    if let Some(body) = name.strip_prefix("v-") {
        let end = body.find(|c| c == ':' || c == '.').unwrap_or(body.len());
        let rest = &body[end..];
        return Some((&body[..end], rest.strip_prefix(':').unwrap_or(rest)));
    }
    if let Some(rest) = name.strip_prefix(':') {
        return Some(("bind", rest));
    }
    if let Some(rest) = name.strip_prefix('@') {
        return Some(("on", rest));
    }
    name.strip_prefix('#').map(|rest| ("slot", rest))
}

/// Parse `arg.mod1.mod2` or `[dynamic].mod`.
fn parse_directive_arg(rest: &str) -> (Option<DirectiveArg>, Vec<SmolStr>) {
    let (arg, modifiers) = if let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => (
                Some(DirectiveArg::Dynamic(inner[..close].to_string())),
                &inner[close + 1..],
            ),
            None => (Some(DirectiveArg::Dynamic(inner.to_string())), ""),
        }
    } else {
        let end = rest.find('.').unwrap_or(rest.len());
        let arg = &rest[..end];
        (
            (!arg.is_empty()).then(|| DirectiveArg::Static(arg.into())),
            &rest[end..],
        )
    };

    let modifiers = modifiers
        .split('.')
        .filter(|m| !m.is_empty())
        .map(SmolStr::from)
        .collect();
    (arg, modifiers)
}
