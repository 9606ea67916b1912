//! Intermediate tree → Liquid text.

use crate::case::{hyphenate, snake_case};
use crate::error::{ConvertError, ConvertResult};
use crate::expression::quote;
use crate::ir::{IntermediateNode, NodeKind, PropValue};
use crate::ConvertOptions;

/// Render the template body, without a trailing newline.
pub fn emit(nodes: &[IntermediateNode], options: &ConvertOptions) -> ConvertResult<String> {
    let mut emitter = Emitter {
        lines: Vec::new(),
        options,
    };
    emitter.nodes(nodes, 0)?;
    Ok(emitter.lines.join("\n"))
}

struct Emitter<'o> {
    lines: Vec<String>,
    options: &'o ConvertOptions,
}

impl Emitter<'_> {
    fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.options.indent_width)
    }

    fn line(&mut self, level: usize, text: impl AsRef<str>) {
        let line = format!("{}{}", self.indent(level), text.as_ref());
        self.lines.push(line);
    }

    fn fits(&self, level: usize, text: &str) -> bool {
        level * self.options.indent_width + text.chars().count() <= self.options.line_width
    }

    fn nodes(&mut self, nodes: &[IntermediateNode], level: usize) -> ConvertResult<()> {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 && !nodes[i - 1].is_compact() {
                self.lines.push(String::new());
            }
            self.node(node, level)?;
        }
        Ok(())
    }

    fn node(&mut self, node: &IntermediateNode, level: usize) -> ConvertResult<()> {
        let mut inner = level;
        if let Some(block) = &node.liquid {
            if block.kind.is_branch() {
                self.close_previous_branch(&block.start)?;
            }
            for line in &block.prelude {
                self.line(level, line);
            }
            self.line(level, &block.start);
            for line in &block.extra {
                self.line(level + 1, line);
            }
            inner = level + 1;
        }

        for local in &node.locals {
            self.line(inner, local);
        }

        match node.kind {
            NodeKind::Fragment => self.nodes(&node.children, inner)?,
            NodeKind::Text | NodeKind::Slot => {
                if let Some(content) = &node.content {
                    self.line(inner, content);
                }
            }
            NodeKind::Element if node.snippet => self.render_call(node, inner),
            NodeKind::Element => self.element(node, inner)?,
        }

        if let Some(block) = &node.liquid {
            self.line(level, &block.end);
        }
        Ok(())
    }

    /// Drop the `{% endif %}` of the previous branch so the whole chain
    /// shares one.
    fn close_previous_branch(&mut self, start: &str) -> ConvertResult<()> {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        match self.lines.last() {
            Some(last) if last.trim() == "{% endif %}" => {
                self.lines.pop();
                Ok(())
            }
            _ => Err(ConvertError::emit(format!(
                "`{}` does not follow an if block",
                start
            ))),
        }
    }

    fn element(&mut self, node: &IntermediateNode, level: usize) -> ConvertResult<()> {
        self.open_tag(node, level);
        if node.self_closing {
            return Ok(());
        }

        let close = format!("</{}>", node.tag);
        if let Some(content) = &node.content {
            self.line(level + 1, content);
            self.line(level, close);
        } else if !node.children.is_empty() {
            self.nodes(&node.children, level + 1)?;
            self.line(level, close);
        } else if let Some(last) = self.lines.last_mut() {
            last.push_str(&close);
        }
        Ok(())
    }

    fn open_tag(&mut self, node: &IntermediateNode, level: usize) {
        let attrs: Vec<(&str, String)> = node
            .props
            .iter()
            .map(|(name, value)| {
                let rendered = match value {
                    PropValue::Flag => name.to_string(),
                    PropValue::Literal(v) | PropValue::Bound(v) => format!("{}=\"{}\"", name, v),
                };
                (name.as_str(), rendered)
            })
            .collect();

        match attrs.as_slice() {
            [] => self.line(level, format!("<{}>", node.tag)),
            [(name, attr)] => {
                let inline = format!("<{} {}>", node.tag, attr);
                if *name != "class" || self.fits(level, &inline) {
                    self.line(level, inline);
                } else {
                    self.multiline_tag(&node.tag, &attrs, level);
                }
            }
            _ => self.multiline_tag(&node.tag, &attrs, level),
        }
    }

    fn multiline_tag(&mut self, tag: &str, attrs: &[(&str, String)], level: usize) {
        self.line(level, format!("<{}", tag));
        for (name, attr) in attrs {
            if *name == "class" && !self.fits(level + 1, attr) {
                self.wrapped_class(attr, level + 1);
            } else {
                self.line(level + 1, attr);
            }
        }
        self.line(level, ">");
    }

    /// `class="` / one token per line / `"`.
    fn wrapped_class(&mut self, attr: &str, level: usize) {
        let value = attr
            .strip_prefix("class=\"")
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(attr);
        self.line(level, "class=\"");
        for token in class_tokens(value) {
            self.line(level + 1, token);
        }
        self.line(level, "\"");
    }

    fn render_call(&mut self, node: &IntermediateNode, level: usize) {
        let name = hyphenate(&node.tag);
        let args: Vec<String> = node
            .props
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    PropValue::Flag => "true".to_string(),
                    PropValue::Literal(v) => quote(v),
                    PropValue::Bound(v) => v.clone(),
                };
                format!("{}: {}", snake_case(key), value)
            })
            .collect();

        match args.as_slice() {
            [] => self.line(level, format!("{{% render '{}' %}}", name)),
            [arg] => self.line(level, format!("{{% render '{}', {} %}}", name, arg)),
            _ => {
                self.line(level, format!("{{% render '{}',", name));
                let last = args.len() - 1;
                for (i, arg) in args.iter().enumerate() {
                    let separator = if i < last { "," } else { "" };
                    self.line(level + 1, format!("{}{}", arg, separator));
                }
                self.line(level, "%}");
            }
        }
    }
}

/// Split a class value on whitespace, keeping Liquid tags, outputs and
/// whole `{% if %}…{% endif %}` blocks intact.
fn class_tokens(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut open_blocks = 0usize;
    let mut rest = value;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with("{%") || rest.starts_with("{{") {
            let close = if rest.starts_with("{%") { "%}" } else { "}}" };
            let end = rest.find(close).map_or(rest.len(), |i| i + close.len());
            let group = &rest[..end];
            if close == "%}" {
                let keyword = group[2..]
                    .trim_start_matches('-')
                    .split_whitespace()
                    .next()
                    .unwrap_or("");
                match keyword {
                    "if" | "unless" | "for" | "case" => open_blocks += 1,
                    "endif" | "endunless" | "endfor" | "endcase" => {
                        open_blocks = open_blocks.saturating_sub(1)
                    }
                    _ => {}
                }
            }
            current.push_str(group);
            rest = &rest[end..];
            continue;
        }
        if c.is_whitespace() && open_blocks == 0 {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
