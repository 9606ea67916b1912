//! Expression translation.
//!
//! Embedded expressions are parsed into a small syntax tree and lowered to
//! Liquid according to where they appear: a condition keeps full boolean
//! syntax, an output position can inline `{% if %}` tags, and a snippet
//! argument must be a plain value, so anything richer is hoisted into a
//! declaration and referenced by name.

pub mod ast;
pub mod lexer;
pub mod parser;
mod translate;

use crate::context::ConversionContext;
use crate::error::{ConvertError, ConvertResult};
use crate::ir::DirectiveKind;
use indexmap::IndexSet;
use smol_str::SmolStr;
use thiserror::Error;

pub use ast::Expr;
pub use parser::parse_expression;
pub use translate::Translator;
pub(crate) use translate::{is_quotable, quote};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    pub fn shifted(mut self, offset: usize) -> Self {
        self.offset += offset;
        self
    }
}

/// Where an expression sits in the template.
#[derive(Debug, Clone)]
pub struct ExpressionContext<'a> {
    /// Loop variables visible at this point.
    pub forloop_variables: &'a IndexSet<SmolStr>,
    pub is_snippet: bool,
    pub attribute: Option<&'a str>,
    pub tag: &'a str,
    pub directive: Option<DirectiveKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Condition,
    Output,
    SnippetArgument,
}

impl ExpressionContext<'_> {
    pub fn position(&self) -> Position {
        match self.directive {
            Some(DirectiveKind::If | DirectiveKind::ElseIf | DirectiveKind::Show) => {
                Position::Condition
            }
            _ if self.is_snippet && self.attribute.is_some() => Position::SnippetArgument,
            _ => Position::Output,
        }
    }
}

/// Translate an expression for its position.
///
/// The `is` attribute is returned unmodified.
pub fn translate(
    source: &str,
    scope: &ExpressionContext<'_>,
    ctx: &mut ConversionContext,
) -> ConvertResult<String> {
    if scope.attribute == Some("is") {
        return Ok(source.trim().to_string());
    }
    with_translator(source, scope, ctx, |t, expr| match scope.position() {
        Position::Condition => t.condition(expr),
        Position::SnippetArgument => t.snippet_argument(expr),
        Position::Output if scope.directive == Some(DirectiveKind::Text) => t.escaped_output(expr),
        Position::Output => t.output(expr),
    })
}

/// Translate an expression that must be a plain Liquid value, such as the
/// collection of a `for` tag.
pub fn translate_value(
    source: &str,
    scope: &ExpressionContext<'_>,
    ctx: &mut ConversionContext,
) -> ConvertResult<String> {
    with_translator(source, scope, ctx, |t, expr| t.operand(expr))
}

/// Class tokens for a `:class` binding, in string, object or array syntax.
pub fn translate_class(
    source: &str,
    scope: &ExpressionContext<'_>,
    ctx: &mut ConversionContext,
) -> ConvertResult<Vec<String>> {
    with_translator(source, scope, ctx, |t, expr| t.class_tokens(expr))
}

/// `property: value;` pairs for a `:style` binding.
pub fn translate_style(
    source: &str,
    scope: &ExpressionContext<'_>,
    ctx: &mut ConversionContext,
) -> ConvertResult<Vec<String>> {
    with_translator(source, scope, ctx, |t, expr| t.style_declarations(expr))
}

/// Which joined attribute a binding contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinedAttribute {
    Class,
    Style,
}

/// A snippet `class` or `style` argument: literal tokens plus a binding.
pub fn translate_joined(
    leading: &[String],
    source: &str,
    kind: JoinedAttribute,
    scope: &ExpressionContext<'_>,
    ctx: &mut ConversionContext,
) -> ConvertResult<String> {
    with_translator(source, scope, ctx, |t, expr| {
        t.joined_argument(leading, expr, kind)
    })
}

/// Hoist the resolution of a dynamic `<component :is>` tag into `name`.
pub fn translate_dynamic_tag(
    name: &str,
    source: &str,
    scope: &ExpressionContext<'_>,
    ctx: &mut ConversionContext,
) -> ConvertResult<()> {
    with_translator(source, scope, ctx, |t, expr| t.dynamic_tag(name, expr))
}

fn with_translator<T>(
    source: &str,
    scope: &ExpressionContext<'_>,
    ctx: &mut ConversionContext,
    f: impl FnOnce(&mut Translator<'_>, &Expr) -> ConvertResult<T>,
) -> ConvertResult<T> {
    let expr =
        parse_expression(source).map_err(|e| ConvertError::translate(e.to_string(), source))?;
    let mut translator = Translator::new(ctx, scope, source);
    f(&mut translator, &expr)
}
