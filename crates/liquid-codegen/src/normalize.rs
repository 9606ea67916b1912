//! Raw template tree → intermediate tree.
//!
//! Directives are resolved here once: control flow becomes a
//! [`LiquidBlock`], text bindings become content, and every remaining
//! attribute is translated for the position it will be emitted in.

use crate::case::snake_case;
use crate::context::ConversionContext;
use crate::error::{ConvertError, ConvertResult};
use crate::expression::{
    is_quotable, translate, translate_class, translate_dynamic_tag, translate_joined,
    translate_style, translate_value, ExpressionContext, JoinedAttribute,
};
use crate::hoist::Declaration;
use crate::ir::{
    DirectiveKind, IntermediateNode, LiquidBlock, LoopScope, NodeKind, PropValue,
};
use crate::tags::{is_dropped_tag, is_fragment_tag, is_plain_tag, is_void_element};
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;
use std::rc::Rc;
use vue_template_parser::{Directive, DirectiveArg, ElementNode, PropNode, TemplateAst, TemplateNode};

/// `alias in source` / `(a, b) of source`.
static FOR_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*(.+?)\s+(?:in|of)\s+(.+?)\s*$").expect("valid regex"));

/// Normalize the root children of a template.
pub fn normalize(
    ast: &TemplateAst,
    ctx: &mut ConversionContext,
) -> ConvertResult<Vec<IntermediateNode>> {
    let scope: LoopScope = Rc::new(IndexSet::new());
    Normalizer { ctx }.children(&ast.children, "", &scope)
}

struct Normalizer<'c> {
    ctx: &'c mut ConversionContext,
}

/// Adjacent text and interpolations, merged into one text node.
#[derive(Default)]
struct TextRun {
    content: String,
    /// Loop-bound declarations raised by the interpolations.
    locals: Vec<String>,
}

impl TextRun {
    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if !c.is_whitespace() {
                self.content.push(c);
            } else if !self.content.ends_with(' ') {
                self.content.push(' ');
            }
        }
    }

    fn push_output(&mut self, output: &str, locals: Vec<String>) {
        self.content.push_str(output);
        self.locals.extend(locals);
    }

    fn finish(&mut self, scope: &LoopScope) -> Option<IntermediateNode> {
        let content = std::mem::take(&mut self.content);
        let content = content.trim();
        let locals = std::mem::take(&mut self.locals);
        if content.is_empty() && locals.is_empty() {
            return None;
        }
        let mut node = IntermediateNode::text(content.to_string(), scope.clone());
        if content.is_empty() {
            node.content = None;
        }
        node.locals = locals;
        Some(node)
    }
}

/// Control-flow directives of one element.
#[derive(Default)]
struct Directives<'e> {
    branch: Option<(DirectiveKind, &'e Directive)>,
    list: Option<&'e Directive>,
    show: Option<&'e Directive>,
    content: Option<(DirectiveKind, &'e Directive)>,
}

impl<'e> Directives<'e> {
    fn collect(el: &'e ElementNode) -> Self {
        let mut directives = Self::default();
        for d in el.directives() {
            match DirectiveKind::from_name(&d.name) {
                Some(kind @ (DirectiveKind::If | DirectiveKind::ElseIf | DirectiveKind::Else)) => {
                    directives.branch = Some((kind, d))
                }
                Some(DirectiveKind::For) => directives.list = Some(d),
                Some(DirectiveKind::Show) => directives.show = Some(d),
                Some(kind @ (DirectiveKind::Text | DirectiveKind::Html)) => {
                    directives.content = Some((kind, d))
                }
                None => {}
            }
        }
        directives
    }
}

fn expression_context<'a>(
    scope: &'a LoopScope,
    tag: &'a str,
    is_snippet: bool,
    attribute: Option<&'a str>,
    directive: Option<DirectiveKind>,
) -> ExpressionContext<'a> {
    ExpressionContext {
        forloop_variables: scope.as_ref(),
        is_snippet,
        attribute,
        tag,
        directive,
    }
}

impl Normalizer<'_> {
    fn children(
        &mut self,
        nodes: &[TemplateNode],
        parent_tag: &str,
        scope: &LoopScope,
    ) -> ConvertResult<Vec<IntermediateNode>> {
        let mut out: Vec<IntermediateNode> = Vec::new();
        let mut text = TextRun::default();
        // Index of the `if` node an `elsif`/`else` may attach to.
        let mut chain_head: Option<usize> = None;

        for node in nodes {
            let el = match node {
                TemplateNode::Comment(_) => continue,
                TemplateNode::Text(t) => {
                    text.push_text(&t.content);
                    continue;
                }
                TemplateNode::Interpolation(i) => {
                    let scope_ctx = expression_context(scope, parent_tag, false, None, None);
                    let output = translate(&i.expression.content, &scope_ctx, self.ctx)?;
                    text.push_output(&output, self.ctx.take_locals());
                    continue;
                }
                TemplateNode::Element(el) => el,
            };

            if let Some(text_node) = text.finish(scope) {
                out.push(text_node);
                chain_head = None;
            }

            let Some(mut node) = self.element(el, scope)? else {
                continue;
            };
            match node.directive() {
                Some(kind) if kind.is_branch() => {
                    let Some(head) = chain_head else {
                        return Err(ConvertError::normalize(format!(
                            "v-{} on <{}> has no preceding v-if or v-else-if",
                            if kind == DirectiveKind::Else { "else" } else { "else-if" },
                            el.tag
                        )));
                    };
                    // The chain is one statement, so its declarations go
                    // before the `if`.
                    let prelude = node
                        .liquid
                        .as_mut()
                        .map(|l| std::mem::take(&mut l.prelude))
                        .unwrap_or_default();
                    if let Some(head_block) = out[head].liquid.as_mut() {
                        head_block.prelude.extend(prelude);
                    }
                    if kind == DirectiveKind::Else {
                        chain_head = None;
                    }
                }
                Some(DirectiveKind::If) => chain_head = Some(out.len()),
                _ => chain_head = None,
            }
            out.push(node);
        }

        if let Some(text_node) = text.finish(scope) {
            out.push(text_node);
        }
        Ok(out)
    }

    fn element(
        &mut self,
        el: &ElementNode,
        scope: &LoopScope,
    ) -> ConvertResult<Option<IntermediateNode>> {
        let tag = el.tag.as_str();
        if is_dropped_tag(tag) {
            tracing::debug!(tag, "dropping element and its children");
            return Ok(None);
        }
        if tag == "template" && el.has_directive("slot") {
            tracing::debug!("dropping slot content outside a component");
            return Ok(None);
        }

        let directives = Directives::collect(el);
        let snippet = tag != "template"
            && tag != "slot"
            && tag != "component"
            && !is_fragment_tag(tag)
            && !is_plain_tag(tag);

        // `v-if` is evaluated before `v-for`, so the condition sees the
        // enclosing scope only.
        let mut blocks = Vec::new();
        if let Some((kind, d)) = directives.branch {
            blocks.push(self.branch_block(kind, d, tag, snippet, scope)?);
        }
        let inner_scope = match directives.list {
            Some(d) => {
                let (block, inner) = self.for_block(d, tag, scope)?;
                blocks.push(block);
                inner
            }
            None => scope.clone(),
        };
        if let Some(d) = directives.show {
            let scope_ctx =
                expression_context(&inner_scope, tag, snippet, None, Some(DirectiveKind::Show));
            let condition = translate(d.exp_content(), &scope_ctx, self.ctx)?;
            let mut block = LiquidBlock::new(
                DirectiveKind::Show,
                format!("{{% if {} %}}", condition),
                "{% endif %}",
            );
            block.prelude = self.ctx.take_locals();
            blocks.push(block);
        }

        let mut node = if tag == "slot" {
            slot(el, &inner_scope)
        } else if tag == "template" || is_fragment_tag(tag) {
            let children = self.children(&el.children, tag, &inner_scope)?;
            IntermediateNode::fragment(children, inner_scope.clone())
        } else {
            self.tag_node(el, &directives, snippet, &inner_scope)?
        };

        // Innermost block on the node, outer ones on wrapping fragments.
        if let Some(block) = blocks.pop() {
            node.liquid = Some(block);
        }
        while let Some(block) = blocks.pop() {
            let mut wrapper = IntermediateNode::fragment(vec![node], scope.clone());
            wrapper.liquid = Some(block);
            node = wrapper;
        }
        Ok(Some(node))
    }

    fn branch_block(
        &mut self,
        kind: DirectiveKind,
        d: &Directive,
        tag: &str,
        snippet: bool,
        scope: &LoopScope,
    ) -> ConvertResult<LiquidBlock> {
        let start = if kind == DirectiveKind::Else {
            "{% else %}".to_string()
        } else {
            let scope_ctx = expression_context(scope, tag, snippet, None, Some(kind));
            let condition = translate(d.exp_content(), &scope_ctx, self.ctx)?;
            let keyword = if kind == DirectiveKind::If { "if" } else { "elsif" };
            format!("{{% {} {} %}}", keyword, condition)
        };
        let mut block = LiquidBlock::new(kind, start, "{% endif %}");
        block.prelude = self.ctx.take_locals();
        Ok(block)
    }

    /// `{% for item in list %}` plus the index assignment, and the scope
    /// extended with the loop variables.
    fn for_block(
        &mut self,
        d: &Directive,
        tag: &str,
        scope: &LoopScope,
    ) -> ConvertResult<(LiquidBlock, LoopScope)> {
        let source = d.exp_content();
        let caps = FOR_HEADER
            .captures(source)
            .ok_or_else(|| ConvertError::translate("malformed v-for expression", source))?;
        let aliases = caps[1].trim();
        let list = caps[2].trim();

        let aliases = aliases
            .strip_prefix('(')
            .and_then(|a| a.strip_suffix(')'))
            .unwrap_or(aliases);
        if aliases.contains(|c: char| c == '{' || c == '[') {
            return Err(ConvertError::translate(
                "destructured loop variables are not supported",
                source,
            ));
        }
        let names: Vec<String> = aliases
            .split(',')
            .map(|alias| snake_case(alias.trim()))
            .collect();
        let (item, index) = match names.as_slice() {
            [item] if !item.is_empty() => (item.clone(), None),
            [item, index] => (item.clone(), Some(index.clone())),
            [item, key, index] => {
                tracing::warn!(key = %key, "object key alias in v-for is not supported");
                (item.clone(), Some(index.clone()))
            }
            _ => {
                return Err(ConvertError::translate(
                    "expected one to three loop variables",
                    source,
                ))
            }
        };

        let collection = if !list.is_empty() && list.chars().all(|c| c.is_ascii_digit()) {
            format!("(1..{})", list)
        } else {
            let scope_ctx = expression_context(scope, tag, false, None, Some(DirectiveKind::For));
            translate_value(list, &scope_ctx, self.ctx)?
        };

        let mut block = LiquidBlock::new(
            DirectiveKind::For,
            format!("{{% for {} in {} %}}", item, collection),
            "{% endfor %}",
        );
        block.prelude = self.ctx.take_locals();
        if let Some(index) = &index {
            block
                .extra
                .push(format!("{{% assign {} = forloop.index0 %}}", index));
        }

        let mut inner = scope.as_ref().clone();
        inner.insert(SmolStr::new(&item));
        if let Some(index) = index {
            inner.insert(SmolStr::new(index));
        }
        Ok((block, Rc::new(inner)))
    }

    /// Plain elements, snippets and dynamic components.
    fn tag_node(
        &mut self,
        el: &ElementNode,
        directives: &Directives<'_>,
        snippet: bool,
        scope: &LoopScope,
    ) -> ConvertResult<IntermediateNode> {
        let mut tag = el.tag.to_string();
        let mut snippet = snippet;
        let mut component_tag = false;

        if el.tag == "component" {
            if let Some(name) = el.attribute("is").and_then(|a| a.value.as_deref()) {
                tag = name.to_string();
                snippet = !is_plain_tag(name);
            } else if let Some(binding) = el.binding("is") {
                let base = el
                    .attribute("class")
                    .and_then(|a| a.value.as_deref())
                    .and_then(|c| c.split_whitespace().next())
                    .map_or_else(|| "component_tag".to_string(), |t| format!("{}_tag", snake_case(t)));
                let name = self.ctx.unique_name(&base);
                let scope_ctx = expression_context(scope, "component", false, None, None);
                translate_dynamic_tag(&name, binding.exp_content(), &scope_ctx, self.ctx)?;
                tag = format!("{{{{ {} }}}}", name);
                component_tag = true;
            } else {
                snippet = true;
            }
        }

        let mut node = IntermediateNode::new(NodeKind::Element, tag.clone(), scope.clone());
        node.snippet = snippet;
        node.component_tag = component_tag;
        node.self_closing = !snippet && is_void_element(&tag);
        node.props = self.props(el, &tag, snippet, scope)?;
        if snippet {
            self.capture_unquotable(&tag, &mut node.props);
        }

        if let Some((kind, d)) = directives.content {
            let scope_ctx = expression_context(scope, &tag, false, None, Some(kind));
            node.content = Some(translate(d.exp_content(), &scope_ctx, self.ctx)?);
        }
        node.locals = self.ctx.take_locals();

        if snippet {
            if !el.children.is_empty() {
                tracing::debug!(tag = %el.tag, "slot content of a snippet is not emitted");
            }
        } else if node.content.is_none() && !node.self_closing {
            node.children = self.children(&el.children, &tag, scope)?;
        }
        Ok(node)
    }

    /// Render arguments that cannot be written as a string literal are
    /// captured and passed by name.
    fn capture_unquotable(&mut self, tag: &str, props: &mut IndexMap<SmolStr, PropValue>) {
        for (key, value) in props.iter_mut() {
            let PropValue::Literal(text) = value else {
                continue;
            };
            if is_quotable(text) {
                continue;
            }
            let name = self
                .ctx
                .unique_name(&format!("{}_{}", snake_case(tag), snake_case(key)));
            self.ctx.declare(Declaration::capture(&name, text), false);
            *value = PropValue::Bound(name);
        }
    }

    fn props(
        &mut self,
        el: &ElementNode,
        tag: &str,
        snippet: bool,
        scope: &LoopScope,
    ) -> ConvertResult<IndexMap<SmolStr, PropValue>> {
        let is_component = el.tag == "component";
        let mut props = IndexMap::new();

        for prop in &el.props {
            match prop {
                PropNode::Attribute(a) => match a.name.as_str() {
                    "class" | "style" => {
                        props.entry(a.name.clone()).or_insert(PropValue::Flag);
                    }
                    "ref" | "key" | "slot" => {}
                    "is" if is_component => {}
                    _ => {
                        let value = a.value.clone().map_or(PropValue::Flag, PropValue::Literal);
                        props.insert(a.name.clone(), value);
                    }
                },
                PropNode::Directive(d) => match d.name.as_str() {
                    "bind" => match &d.arg {
                        Some(DirectiveArg::Static(arg)) => match arg.as_str() {
                            "key" | "ref" => {}
                            "is" if is_component => {}
                            "class" | "style" => {
                                props.entry(arg.clone()).or_insert(PropValue::Flag);
                            }
                            _ => {
                                let source = match d.exp_content().trim() {
                                    "" => snake_case(arg),
                                    exp => exp.to_string(),
                                };
                                let scope_ctx =
                                    expression_context(scope, tag, snippet, Some(arg.as_str()), None);
                                let value = translate(&source, &scope_ctx, self.ctx)?;
                                props.insert(arg.clone(), PropValue::Bound(value));
                            }
                        },
                        Some(DirectiveArg::Dynamic(arg)) => {
                            tracing::warn!(arg = %arg, tag, "dynamic attribute name dropped");
                        }
                        None => {
                            tracing::warn!(tag, "object v-bind dropped");
                        }
                    },
                    "model" => {
                        let name = d.arg_name().unwrap_or("value");
                        let scope_ctx = expression_context(scope, tag, snippet, Some(name), None);
                        let value = translate(d.exp_content(), &scope_ctx, self.ctx)?;
                        props.insert(SmolStr::new(name), PropValue::Bound(value));
                    }
                    "if" | "else-if" | "else" | "for" | "show" | "text" | "html" => {}
                    "on" | "slot" | "once" | "pre" | "cloak" | "memo" => {
                        tracing::debug!(directive = %d.raw_name, "directive dropped");
                    }
                    other => {
                        tracing::warn!(directive = other, tag, "custom directive dropped");
                    }
                },
            }
        }

        if props.contains_key("class") {
            match self.joined(el, "class", JoinedAttribute::Class, tag, snippet, scope)? {
                Some(value) => props.insert(SmolStr::new("class"), value),
                None => props.shift_remove("class"),
            };
        }
        if props.contains_key("style") {
            match self.joined(el, "style", JoinedAttribute::Style, tag, snippet, scope)? {
                Some(value) => props.insert(SmolStr::new("style"), value),
                None => props.shift_remove("style"),
            };
        }
        Ok(props)
    }

    /// Merge a static `class`/`style` attribute with its binding.
    fn joined(
        &mut self,
        el: &ElementNode,
        name: &str,
        kind: JoinedAttribute,
        tag: &str,
        snippet: bool,
        scope: &LoopScope,
    ) -> ConvertResult<Option<PropValue>> {
        let mut parts: Vec<String> = match (kind, el.attribute(name).and_then(|a| a.value.as_deref())) {
            (_, None) => Vec::new(),
            (JoinedAttribute::Class, Some(value)) => {
                value.split_whitespace().map(str::to_string).collect()
            }
            (JoinedAttribute::Style, Some(value)) => value
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| format!("{};", s))
                .collect(),
        };
        let binding = el.binding(name).map(Directive::exp_content);
        let scope_ctx = expression_context(scope, tag, snippet, Some(name), None);

        let value = match binding {
            None => PropValue::Literal(parts.join(" ")),
            Some(source) if snippet => {
                PropValue::Bound(translate_joined(&parts, source, kind, &scope_ctx, self.ctx)?)
            }
            Some(source) => {
                parts.extend(match kind {
                    JoinedAttribute::Class => translate_class(source, &scope_ctx, self.ctx)?,
                    JoinedAttribute::Style => translate_style(source, &scope_ctx, self.ctx)?,
                });
                PropValue::Bound(parts.join(" "))
            }
        };
        let empty = matches!(&value, PropValue::Literal(v) | PropValue::Bound(v) if v.is_empty());
        Ok((!empty).then_some(value))
    }
}

fn slot(el: &ElementNode, scope: &LoopScope) -> IntermediateNode {
    let name = el
        .attribute("name")
        .and_then(|a| a.value.as_deref())
        .unwrap_or("default");
    let mut node = IntermediateNode::new(NodeKind::Slot, "slot", scope.clone());
    node.content = Some(format!("{{{{ {} }}}}", snake_case(name)));
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConvertOptions;
    use pretty_assertions::assert_eq;
    use vue_template_parser::parse_template;

    fn run(source: &str) -> (Vec<IntermediateNode>, ConversionContext) {
        let ast = parse_template(source).unwrap();
        let mut ctx = ConversionContext::new(ConvertOptions::default());
        let nodes = normalize(&ast, &mut ctx).unwrap();
        (nodes, ctx)
    }

    fn run_err(source: &str) -> ConvertError {
        let ast = parse_template(source).unwrap();
        let mut ctx = ConversionContext::new(ConvertOptions::default());
        normalize(&ast, &mut ctx).unwrap_err()
    }

    #[test]
    fn test_text_and_interpolations_merge() {
        let (nodes, _) = run("<p>\n  Hello   {{ userName }}\n  !\n</p>");
        assert_eq!(
            nodes[0].children[0].content.as_deref(),
            Some("Hello {{ user_name }} !")
        );
        assert_eq!(nodes[0].children.len(), 1);
    }

    #[test]
    fn test_dropped_and_fragment_nodes() {
        let (nodes, _) = run(
            "<!-- note --><Teleport to=\"body\"><p>x</p></Teleport><Transition><span>a</span></Transition>",
        );
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::Fragment);
        assert_eq!(nodes[0].children[0].tag, "span");
    }

    #[test]
    fn test_classification_and_props() {
        let (nodes, _) = run(
            r#"<ProductCard :product="item" @click="go" ref="card" v-custom="x"><p>slot</p></ProductCard>"#,
        );
        let card = &nodes[0];
        assert!(card.snippet);
        assert!(card.children.is_empty());
        assert_eq!(
            card.props.get("product"),
            Some(&PropValue::Bound("item".to_string()))
        );
        assert_eq!(card.props.len(), 1);
    }

    #[test]
    fn test_class_merge() {
        let (nodes, _) = run(r#"<div class="card" :class="{ active: isActive }" hidden></div>"#);
        let keys: Vec<_> = nodes[0].props.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["class", "hidden"]);
        assert_eq!(
            nodes[0].props["class"],
            PropValue::Bound("card {% if is_active %}active{% endif %}".to_string())
        );
        assert_eq!(nodes[0].props["hidden"], PropValue::Flag);
    }

    #[test]
    fn test_snippet_class_is_captured() {
        let (nodes, ctx) = run(r#"<Badge class="badge" :class="{ sale: onSale }" />"#);
        assert_eq!(
            nodes[0].props["class"],
            PropValue::Bound("badge_class".to_string())
        );
        assert_eq!(
            ctx.hoisted().emit(2),
            "{% capture badge_class %}badge {% if on_sale %}sale{% endif %}{% endcapture %}"
        );
    }

    #[test]
    fn test_style_object() {
        let (nodes, _) = run(r#"<div style="display: flex" :style="{ maxWidth: width }"></div>"#);
        assert_eq!(
            nodes[0].props["style"],
            PropValue::Bound("display: flex; max-width: {{ width }};".to_string())
        );
    }

    #[test]
    fn test_for_with_index() {
        let (nodes, _) = run(r#"<li v-for="(item, index) in lineItems">{{ index }}</li>"#);
        let li = &nodes[0];
        let block = li.liquid.as_ref().unwrap();
        assert_eq!(block.start, "{% for item in line_items %}");
        assert_eq!(block.extra, vec!["{% assign index = forloop.index0 %}"]);
        assert!(li.forloop_variables.contains("item"));
        assert!(li.forloop_variables.contains("index"));
        assert!(li.children[0].forloop_variables.contains("index"));
    }

    #[test]
    fn test_for_range_and_three_aliases() {
        let (nodes, _) = run(r#"<i v-for="n in 5"></i><i v-for="(value, key, i) of settings"></i>"#);
        assert_eq!(nodes[0].liquid.as_ref().unwrap().start, "{% for n in (1..5) %}");
        let block = nodes[1].liquid.as_ref().unwrap();
        assert_eq!(block.start, "{% for value in settings %}");
        assert_eq!(block.extra, vec!["{% assign i = forloop.index0 %}"]);
    }

    #[test]
    fn test_destructured_alias_is_rejected() {
        let err = run_err(r#"<li v-for="{ id, name } in items">{{ name }}</li>"#);
        assert!(err.to_string().contains("destructured"));
    }

    #[test]
    fn test_if_wraps_for() {
        let (nodes, _) = run(r#"<li v-if="show" v-for="p in products">{{ p.title }}</li>"#);
        let outer = &nodes[0];
        assert_eq!(outer.kind, NodeKind::Fragment);
        assert_eq!(outer.directive(), Some(DirectiveKind::If));
        assert!(outer.forloop_variables.is_empty());
        let inner = &outer.children[0];
        assert_eq!(inner.directive(), Some(DirectiveKind::For));
        assert_eq!(inner.children[0].content.as_deref(), Some("{{ p.title }}"));
    }

    #[test]
    fn test_orphan_else_fails() {
        let err = run_err(r#"<p>a</p><p v-else>b</p>"#);
        assert!(matches!(
            err,
            ConvertError::Translation { stage: crate::Stage::Normalize, .. }
        ));
        let err = run_err(r#"<p v-if="a">a</p>text<p v-else-if="b">b</p>"#);
        assert!(err.to_string().contains("v-else-if"));
    }

    #[test]
    fn test_dynamic_component() {
        let (nodes, ctx) = run(r#"<component :is="href ? 'a' : 'button'" class="btn primary">Go</component>"#);
        let node = &nodes[0];
        assert_eq!(node.tag, "{{ btn_tag }}");
        assert!(node.component_tag);
        assert!(!node.snippet);
        assert!(!node.props.contains_key("is"));
        assert_eq!(
            ctx.hoisted().emit(2),
            "{% liquid\n  assign btn_tag = 'button'\n  if href\n    assign btn_tag = 'a'\n  endif\n%}"
        );
    }

    #[test]
    fn test_dynamic_component_without_ternary() {
        let (nodes, ctx) = run(r#"<component :is="tagName"></component>"#);
        assert_eq!(nodes[0].tag, "{{ component_tag }}");
        assert_eq!(
            ctx.hoisted().emit(2),
            "{% liquid\n  assign component_tag = 'div'\n  if tag_name\n    assign component_tag = 'TODO'\n  endif\n%}"
        );
    }

    #[test]
    fn test_slot_and_content_bindings() {
        let (nodes, _) = run(
            r#"<div><slot name="headerTitle">fallback</slot><p v-text="desc"></p><p v-html="body"></p></div>"#,
        );
        let children = &nodes[0].children;
        assert_eq!(children[0].kind, NodeKind::Slot);
        assert_eq!(children[0].content.as_deref(), Some("{{ header_title }}"));
        assert_eq!(children[1].content.as_deref(), Some("{{ desc | escape }}"));
        assert_eq!(children[2].content.as_deref(), Some("{{ body }}"));
    }

    #[test]
    fn test_model_and_shorthand_bindings() {
        let (nodes, _) = run(r#"<input v-model="query" :placeholder>"#);
        assert!(nodes[0].self_closing);
        assert_eq!(
            nodes[0].props["value"],
            PropValue::Bound("{{ query }}".to_string())
        );
        assert_eq!(
            nodes[0].props["placeholder"],
            PropValue::Bound("{{ placeholder }}".to_string())
        );
    }

    #[test]
    fn test_unquotable_snippet_literal_is_captured() {
        let (nodes, ctx) = run(r#"<ProductCard title=it's"new" badge="sale" />"#);
        assert_eq!(
            nodes[0].props["title"],
            PropValue::Bound("product_card_title".to_string())
        );
        assert_eq!(nodes[0].props["badge"], PropValue::Literal("sale".to_string()));
        assert_eq!(
            ctx.hoisted().emit(2),
            r#"{% capture product_card_title %}it's"new"{% endcapture %}"#
        );
    }

    #[test]
    fn test_loop_bound_snippet_argument_is_local() {
        let (nodes, ctx) =
            run(r#"<Card v-for="p in products" :label="p.sale ? 'Sale' : 'Full'" />"#);
        assert_eq!(
            nodes[0].locals,
            vec![
                "{% assign card_label = 'Full' %}",
                "{% if p.sale %}",
                "  {% assign card_label = 'Sale' %}",
                "{% endif %}",
            ]
        );
        assert!(ctx.hoisted().is_empty());
    }
}
