//! Vue template to Liquid conversion.
//!
//! A parsed template is normalized into an intermediate tree, its
//! expressions are lowered to Liquid, and the result is printed with the
//! declarations that had to be hoisted out of the markup placed on top.
//!
//! ```text
//! TemplateAst ─normalize→ [IntermediateNode] ─emit→ body
//!                  └── ConversionContext (hoisted assigns/captures) ──┘
//! ```

pub mod case;
pub mod context;
pub mod emit;
pub mod error;
pub mod expression;
pub mod hoist;
pub mod ir;
pub mod normalize;
pub mod tags;

use source_map::LineIndex;
use vue_template_parser::{parse_component, TemplateAst};

pub use context::ConversionContext;
pub use error::{ConvertError, ConvertResult, Stage};
pub use ir::{DirectiveKind, IntermediateNode, NodeKind};

/// Output layout options.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Column at which long `class` attributes are wrapped.
    pub line_width: usize,
    /// Spaces per nesting level.
    pub indent_width: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            line_width: 80,
            indent_width: 2,
        }
    }
}

/// Convert a parsed template to Liquid.
///
/// The returned text always ends with a newline.
pub fn convert_template(ast: &TemplateAst, options: &ConvertOptions) -> ConvertResult<String> {
    let mut ctx = ConversionContext::new(options.clone());
    let nodes = normalize::normalize(ast, &mut ctx)?;
    let body = emit::emit(&nodes, options)?;

    let hoisted = ctx.hoisted().emit(options.indent_width);
    tracing::debug!(
        nodes = nodes.len(),
        hoisted = !hoisted.is_empty(),
        "template converted"
    );
    if hoisted.is_empty() {
        Ok(format!("{}\n", body))
    } else {
        Ok(format!("{}\n\n{}\n", hoisted, body))
    }
}

/// Convert the `<template>` block of a single-file component.
pub fn convert_sfc(source: &str, options: &ConvertOptions) -> ConvertResult<String> {
    let ast = parse_component(source).map_err(|source_error| {
        let location = LineIndex::new(source).locate(source_error.span.start);
        ConvertError::Parse {
            source: source_error,
            location,
        }
    })?;
    let ast = ast.ok_or(ConvertError::NoTemplate)?;
    convert_template(&ast, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(template: &str) -> String {
        let source = format!("<template>\n{}\n</template>\n", template);
        convert_sfc(&source, &ConvertOptions::default()).unwrap()
    }

    #[test]
    fn test_conditional_element() {
        assert_eq!(
            convert(r#"<div v-if="isVisible">{{ message }}</div>"#),
            "{% if is_visible %}\n  <div>\n    {{ message }}\n  </div>\n{% endif %}\n"
        );
    }

    #[test]
    fn test_branch_chain_shares_one_endif() {
        let output = convert(
            r#"<p v-if="a">A</p>
<p v-else-if="b">B</p>
<p v-else>C</p>"#,
        );
        assert_eq!(output.matches("{% endif %}").count(), 1);
        assert!(output.contains("{% elsif b %}"));
        assert!(output.contains("{% else %}"));
        assert!(output.ends_with("{% endif %}\n"));
    }

    #[test]
    fn test_translation_key_is_hoisted_once() {
        assert_eq!(
            convert(
                r#"<CartDrawer :title="$t('cart.title')" />
<CartIcon :label="$t('cart.title')" />"#
            ),
            "{% liquid\n  assign t_cart_title = 'cart.title' | t\n%}\n\n\
             {% render 'cart-drawer', title: t_cart_title %}\n\
             {% render 'cart-icon', label: t_cart_title %}\n"
        );
    }

    #[test]
    fn test_loop_with_index() {
        let output = convert(r#"<li v-for="(item, index) in items">{{ index }}</li>"#);
        assert!(output.starts_with(
            "{% for item in items %}\n  {% assign index = forloop.index0 %}\n"
        ));
        assert!(output.contains("{{ index }}"));
        assert!(output.ends_with("{% endfor %}\n"));
    }

    #[test]
    fn test_loop_bound_interpolation_declares_inside_loop() {
        let output = convert(r#"<ul><li v-for="p in products">{{ p.a + p.b * p.c }}</li></ul>"#);
        assert_eq!(
            output,
            "<ul>\n  {% for p in products %}\n    <li>\n      {% assign li_content = p.b | times: p.c %}\n      {{ p.a | plus: li_content }}\n    </li>\n  {% endfor %}\n</ul>\n"
        );
    }

    #[test]
    fn test_nested_interpolation_keeps_its_declaration() {
        let output = convert(
            r#"<ul><li v-for="p in products"><b>{{ p.a + p.b * p.c }}</b></li></ul><span class="x"></span>"#,
        );
        assert_eq!(
            output,
            "<ul>\n  {% for p in products %}\n    <li>\n      <b>\n        {% assign b_content = p.b | times: p.c %}\n        {{ p.a | plus: b_content }}\n      </b>\n    </li>\n  {% endfor %}\n</ul>\n\n<span class=\"x\"></span>\n"
        );
    }

    #[test]
    fn test_loop_bound_text_binding_declares_before_element() {
        let output = convert(r#"<li v-for="p in products" v-text="p.a + p.b * p.c"></li>"#);
        assert_eq!(
            output,
            "{% for p in products %}\n  {% assign li_content = p.b | times: p.c %}\n  <li>\n    {{ p.a | plus: li_content | escape }}\n  </li>\n{% endfor %}\n"
        );
    }

    #[test]
    fn test_elsif_declarations_precede_chain() {
        let output = convert(
            r#"<li v-for="p in products"><span v-if="p.sale">S</span><span v-else-if="!p.tags.includes('new')">N</span></li>"#,
        );
        assert_eq!(
            output,
            "{% for p in products %}\n  <li>\n    {% assign span_condition = false %}\n    {% if p.tags contains 'new' %}\n      {% assign span_condition = true %}\n    {% endif %}\n    {% if p.sale %}\n      <span>\n        S\n      </span>\n    {% elsif span_condition == false %}\n      <span>\n        N\n      </span>\n    {% endif %}\n  </li>\n{% endfor %}\n"
        );
    }

    #[test]
    fn test_void_and_unknown_tags() {
        assert_eq!(
            convert(r#"<ProductCard :product="product" />"#),
            "{% render 'product-card', product: product %}\n"
        );
        let output = convert(r#"<img :src="image">"#);
        assert_eq!(output, "<img src=\"{{ image }}\">\n");
    }

    #[test]
    fn test_missing_template() {
        let err = convert_sfc("<script>export default {}</script>", &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::NoTemplate));
    }

    #[test]
    fn test_parse_error_location() {
        let err = convert_sfc("<template>\n  <div>\n</template>", &ConvertOptions::default())
            .unwrap_err();
        match err {
            ConvertError::Parse { location, .. } => assert_eq!(location.line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }
}
