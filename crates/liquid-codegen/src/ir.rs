//! Intermediate tree between normalization and emission.

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;
use std::rc::Rc;

/// Loop variables in scope, shared with the parent until a node opens a
/// loop of its own.
pub type LoopScope = Rc<IndexSet<SmolStr>>;

/// Directives resolved by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    If,
    ElseIf,
    Else,
    For,
    Show,
    Text,
    Html,
}

impl DirectiveKind {
    /// Resolve a directive name as it appears after `v-`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "if" => Self::If,
            "else-if" => Self::ElseIf,
            "else" => Self::Else,
            "for" => Self::For,
            "show" => Self::Show,
            "text" => Self::Text,
            "html" => Self::Html,
            _ => return None,
        })
    }

    /// Continues a conditional chain.
    pub fn is_branch(self) -> bool {
        matches!(self, Self::ElseIf | Self::Else)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    /// `<slot>` placeholder.
    Slot,
    /// Renders children only.
    Fragment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    /// Attribute without a value.
    Flag,
    Literal(String),
    /// Already translated expression.
    Bound(String),
}

/// Control-flow tags around a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidBlock {
    pub kind: DirectiveKind,
    pub start: String,
    /// Lines right after `start`, one level deeper.
    pub extra: Vec<String>,
    pub end: String,
    /// Loop-bound declarations the condition depends on, emitted before
    /// `start`.
    pub prelude: Vec<String>,
}

impl LiquidBlock {
    pub fn new(kind: DirectiveKind, start: String, end: &str) -> Self {
        Self {
            kind,
            start,
            extra: Vec::new(),
            end: end.to_string(),
            prelude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntermediateNode {
    pub kind: NodeKind,
    /// Tag name, or a `{{ var }}` placeholder for dynamic tags.
    pub tag: String,
    pub props: IndexMap<SmolStr, PropValue>,
    pub children: Vec<IntermediateNode>,
    pub content: Option<String>,
    pub snippet: bool,
    pub component_tag: bool,
    /// Void element: no closing tag.
    pub self_closing: bool,
    pub liquid: Option<LiquidBlock>,
    pub forloop_variables: LoopScope,
    /// Loop-bound declarations emitted right before the node.
    pub locals: Vec<String>,
}

impl IntermediateNode {
    pub fn new(kind: NodeKind, tag: impl Into<String>, scope: LoopScope) -> Self {
        Self {
            kind,
            tag: tag.into(),
            props: IndexMap::new(),
            children: Vec::new(),
            content: None,
            snippet: false,
            component_tag: false,
            self_closing: false,
            liquid: None,
            forloop_variables: scope,
            locals: Vec::new(),
        }
    }

    pub fn text(content: String, scope: LoopScope) -> Self {
        let mut node = Self::new(NodeKind::Text, "", scope);
        node.content = Some(content);
        node
    }

    pub fn fragment(children: Vec<IntermediateNode>, scope: LoopScope) -> Self {
        let mut node = Self::new(NodeKind::Fragment, "", scope);
        node.children = children;
        node
    }

    pub fn directive(&self) -> Option<DirectiveKind> {
        self.liquid.as_ref().map(|l| l.kind)
    }

    /// Renders on a single line with nothing inside it.
    pub fn is_compact(&self) -> bool {
        self.props.len() == 1 && self.children.is_empty() && self.content.is_none()
    }
}
