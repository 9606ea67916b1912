//! Tag classification tables.

use crate::case::hyphenate;

/// Tags rendered as markup. Anything else becomes a snippet render call.
pub fn is_plain_tag(tag: &str) -> bool {
    let lower = tag.to_ascii_lowercase();
    HTML_TAGS.contains(&lower.as_str()) || SVG_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Built-ins that render their children without a tag of their own.
pub fn is_fragment_tag(tag: &str) -> bool {
    matches!(
        hyphenate(tag).as_str(),
        "transition" | "transition-group" | "keep-alive" | "suspense" | "client-only"
    )
}

/// Tags dropped together with their children.
pub fn is_dropped_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "teleport" | "script" | "style"
    )
}

pub use vue_template_parser::is_void_element;

/// HTML tags.
const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col", "colgroup",
    "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt", "em", "embed",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd", "label",
    "legend", "li", "link", "main", "map", "mark", "math", "menu", "meta", "meter", "nav",
    "noscript", "object", "ol", "optgroup", "option", "output", "p", "param", "picture", "pre",
    "progress", "q", "rp", "rt", "ruby", "s", "samp", "search", "section", "select", "small",
    "source", "span", "strong", "sub", "summary", "sup", "svg", "table", "tbody", "td",
    "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "u", "ul", "var", "video",
    "wbr",
];

/// SVG tags.
const SVG_TAGS: &[&str] = &[
    "svg", "animate", "animateMotion", "animateTransform", "circle", "clipPath", "defs", "desc",
    "ellipse", "feBlend", "feColorMatrix", "feComponentTransfer", "feComposite",
    "feConvolveMatrix", "feDiffuseLighting", "feDisplacementMap", "feDistantLight", "feDropShadow",
    "feFlood", "feFuncA", "feFuncB", "feFuncG", "feFuncR", "feGaussianBlur", "feImage", "feMerge",
    "feMergeNode", "feMorphology", "feOffset", "fePointLight", "feSpecularLighting", "feSpotLight",
    "feTile", "feTurbulence", "filter", "foreignObject", "g", "image", "line", "linearGradient",
    "marker", "mask", "metadata", "mpath", "path", "pattern", "polygon", "polyline",
    "radialGradient", "rect", "set", "stop", "switch", "symbol", "text", "textPath", "tspan",
    "use", "view",
];
