//! Raw syntax tree for Vue templates.
//!
//! The tree is deliberately unresolved: directives stay in the element's
//! attribute list in source order, exactly as written. Interpreting them is
//! the converter's job.

use smol_str::SmolStr;
use source_map::Span;

/// The root of a parsed template.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateAst {
    pub children: Vec<TemplateNode>,
    pub span: Span,
}

impl TemplateAst {
    pub fn with_children(children: Vec<TemplateNode>, span: Span) -> Self {
        Self { children, span }
    }
}

/// A node in the template tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemplateNode {
    Element(ElementNode),
    Text(TextNode),
    /// `{{ expr }}`
    Interpolation(InterpolationNode),
    Comment(CommentNode),
}

impl TemplateNode {
    pub fn span(&self) -> Span {
        match self {
            Self::Element(n) => n.span,
            Self::Text(n) => n.span,
            Self::Interpolation(n) => n.span,
            Self::Comment(n) => n.span,
        }
    }

    /// Text consisting only of whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text(t) if t.content.trim().is_empty())
    }
}

/// An element: an HTML tag, a component, or a built-in like `<slot>`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementNode {
    /// The tag name as written.
    pub tag: SmolStr,
    /// Attributes and directives in source order.
    pub props: Vec<PropNode>,
    pub children: Vec<TemplateNode>,
    /// Written as `<tag />` or a void HTML element.
    pub self_closing: bool,
    pub span: Span,
    pub tag_span: Span,
}

impl ElementNode {
    /// Find a directive by its normalized name (`if`, `bind`, ...).
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives().find(|d| d.name == name)
    }

    /// Find a `v-bind` directive by its static argument.
    pub fn binding(&self, arg: &str) -> Option<&Directive> {
        self.directives()
            .find(|d| d.name == "bind" && d.arg_name() == Some(arg))
    }

    pub fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }

    /// Find a static attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.props.iter().find_map(|p| match p {
            PropNode::Attribute(a) if a.name == name => Some(a),
            _ => None,
        })
    }

    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.props.iter().filter_map(|p| match p {
            PropNode::Directive(d) => Some(d),
            PropNode::Attribute(_) => None,
        })
    }
}

/// One entry in an element's attribute list.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropNode {
    Attribute(Attribute),
    Directive(Directive),
}

impl PropNode {
    pub fn span(&self) -> Span {
        match self {
            Self::Attribute(a) => a.span,
            Self::Directive(d) => d.span,
        }
    }
}

/// A plain attribute such as `class="card"` or `hidden`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: SmolStr,
    /// `None` for attributes written without a value.
    pub value: Option<String>,
    pub span: Span,
}

/// A directive (`v-*`, `:`, `@`, `#`).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Directive {
    /// Name without the `v-` prefix; shorthands are expanded
    /// (`:` → `bind`, `@` → `on`, `#` → `slot`).
    pub name: SmolStr,
    /// The attribute name exactly as written.
    pub raw_name: SmolStr,
    pub arg: Option<DirectiveArg>,
    pub modifiers: Vec<SmolStr>,
    pub exp: Option<Expression>,
    pub span: Span,
}

impl Directive {
    /// The argument, if it is static.
    pub fn arg_name(&self) -> Option<&str> {
        self.arg.as_ref().and_then(DirectiveArg::as_static)
    }

    /// The expression source, or `""` when the directive has none.
    pub fn exp_content(&self) -> &str {
        self.exp.as_ref().map_or("", |e| e.content.as_str())
    }
}

/// A directive argument.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectiveArg {
    /// `v-bind:foo`
    Static(SmolStr),
    /// `v-bind:[foo]`
    Dynamic(String),
}

impl DirectiveArg {
    pub fn as_static(&self) -> Option<&str> {
        match self {
            Self::Static(s) => Some(s.as_str()),
            Self::Dynamic(_) => None,
        }
    }
}

/// Raw expression source embedded in the template.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expression {
    pub content: String,
    pub span: Span,
}

impl Expression {
    pub fn new(content: impl Into<String>, span: Span) -> Self {
        Self {
            content: content.into(),
            span,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextNode {
    pub content: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolationNode {
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommentNode {
    pub content: String,
    pub span: Span,
}

/// Elements whose content is not markup.
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag.to_ascii_lowercase().as_str(), "script" | "style")
}

/// HTML void elements (never have children or a closing tag).
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
