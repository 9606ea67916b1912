//! Vue template parser.
//!
//! Splits a single-file component into blocks and parses the `<template>`
//! block into a raw tree of elements, text, interpolations and comments.
//! Directives are recorded as written; nothing is resolved here.

pub mod ast;
pub mod error;
pub mod parser;
pub mod sfc;

pub use ast::*;
pub use error::{ErrorCode, ParseError, ParseResult};
pub use parser::parse_template;
pub use sfc::{parse_sfc, Sfc, TemplateBlock};

/// Parse the template block of a component file.
///
/// Returns `Ok(None)` when the file has no `<template>`. Spans in the
/// returned tree and in errors are relative to the whole file.
pub fn parse_component(source: &str) -> ParseResult<Option<TemplateAst>> {
    let Some(block) = parse_sfc(source)?.template else {
        return Ok(None);
    };
    let offset = block.content_span.start;
    let mut ast = parse_template(&block.content).map_err(|e| e.shifted(offset))?;
    ast.span = block.content_span;
    shift_nodes(&mut ast.children, offset);
    Ok(Some(ast))
}

fn shift_nodes(nodes: &mut [TemplateNode], offset: u32) {
    for node in nodes {
        match node {
            TemplateNode::Element(el) => {
                el.span = el.span.shift(offset);
                el.tag_span = el.tag_span.shift(offset);
                for prop in &mut el.props {
                    match prop {
                        PropNode::Attribute(a) => a.span = a.span.shift(offset),
                        PropNode::Directive(d) => {
                            d.span = d.span.shift(offset);
                            if let Some(exp) = &mut d.exp {
                                exp.span = exp.span.shift(offset);
                            }
                        }
                    }
                }
                shift_nodes(&mut el.children, offset);
            }
            TemplateNode::Text(t) => t.span = t.span.shift(offset),
            TemplateNode::Interpolation(i) => {
                i.span = i.span.shift(offset);
                i.expression.span = i.expression.span.shift(offset);
            }
            TemplateNode::Comment(c) => c.span = c.span.shift(offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_component_shifts_spans() {
        let source = "<template>\n  <p>{{ name }}</p>\n</template>\n";
        let ast = parse_component(source).unwrap().unwrap();
        let TemplateNode::Element(p) = &ast.children[1] else {
            panic!("expected element, got {:?}", ast.children[1]);
        };
        assert_eq!(p.span.slice(source), "<p>{{ name }}</p>");
        let TemplateNode::Interpolation(i) = &p.children[0] else {
            panic!("expected interpolation");
        };
        assert_eq!(i.expression.span.slice(source).trim(), "name");
    }

    #[test]
    fn test_parse_component_without_template() {
        assert!(parse_component("<script>x</script>").unwrap().is_none());
    }

    #[test]
    fn test_parse_component_error_is_file_relative() {
        let source = "<template>\n<div>\n</template>";
        let err = parse_component(source).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnclosedElement);
        assert!(err.span.start >= 10);
    }
}
