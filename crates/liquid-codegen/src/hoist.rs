//! Declarations hoisted ahead of the template body.

use indexmap::{IndexMap, IndexSet};

/// One hoisted declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `assign name = value`
    Assign { name: String, value: String },
    /// Lines of an `if … endif` block inside `{% liquid %}`, nesting included.
    Conditional(Vec<String>),
    /// Complete `{% capture %}` tag lines.
    Capture(Vec<String>),
}

impl Declaration {
    pub fn assign(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Assign {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn capture(name: &str, body: &str) -> Self {
        Self::Capture(vec![format!(
            "{{% capture {} %}}{}{{% endcapture %}}",
            name, body
        )])
    }

    /// The declaration as standalone tag lines, for use inside the body.
    pub fn to_tag_lines(&self) -> Vec<String> {
        match self {
            Self::Assign { name, value } => vec![format!("{{% assign {} = {} %}}", name, value)],
            Self::Conditional(lines) => lines
                .iter()
                .map(|line| {
                    let body = line.trim_start();
                    let indent = &line[..line.len() - body.len()];
                    format!("{}{{% {} %}}", indent, body)
                })
                .collect(),
            Self::Capture(lines) => lines.clone(),
        }
    }
}

/// Ordered, deduplicated declarations for one conversion run.
#[derive(Debug, Default)]
pub struct HoistedDeclarations {
    assigns: IndexMap<String, String>,
    conditionals: IndexSet<Vec<String>>,
    captures: IndexSet<Vec<String>>,
}

impl HoistedDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an assign. The first value declared under a name wins.
    pub fn push_assign(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.assigns.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn push_conditional(&mut self, lines: Vec<String>) {
        self.conditionals.insert(lines);
    }

    pub fn push_capture(&mut self, lines: Vec<String>) {
        self.captures.insert(lines);
    }

    pub fn push(&mut self, declaration: Declaration) {
        match declaration {
            Declaration::Assign { name, value } => self.push_assign(name, value),
            Declaration::Conditional(lines) => self.push_conditional(lines),
            Declaration::Capture(lines) => self.push_capture(lines),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assigns.is_empty() && self.conditionals.is_empty() && self.captures.is_empty()
    }

    /// Render the declarations block.
    ///
    /// Assigns (sorted by name) and conditionals share one `{% liquid %}`
    /// tag; each capture follows as its own block after a blank line.
    /// Returns an empty string when nothing was hoisted.
    pub fn emit(&self, indent_width: usize) -> String {
        let indent = " ".repeat(indent_width);
        let mut sections = Vec::new();

        if !self.assigns.is_empty() || !self.conditionals.is_empty() {
            let mut assigns: Vec<_> = self.assigns.iter().collect();
            assigns.sort_by(|a, b| a.0.cmp(b.0));

            let mut block = vec!["{% liquid".to_string()];
            block.extend(
                assigns
                    .into_iter()
                    .map(|(name, value)| format!("{}assign {} = {}", indent, name, value)),
            );
            block.extend(
                self.conditionals
                    .iter()
                    .flatten()
                    .map(|line| format!("{}{}", indent, line)),
            );
            block.push("%}".to_string());
            sections.push(block.join("\n"));
        }

        sections.extend(self.captures.iter().map(|lines| lines.join("\n")));
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assigns_are_deduplicated_and_sorted() {
        let mut hoisted = HoistedDeclarations::new();
        hoisted.push_assign("t_title", "'title' | t");
        hoisted.push_assign("a_label", "'x'");
        hoisted.push_assign("t_title", "'other' | t");
        assert_eq!(
            hoisted.emit(2),
            "{% liquid\n  assign a_label = 'x'\n  assign t_title = 'title' | t\n%}"
        );
    }

    #[test]
    fn test_conditionals_follow_assigns() {
        let mut hoisted = HoistedDeclarations::new();
        let lines = vec![
            "if is_sale".to_string(),
            "  assign badge_label = 'Sale'".to_string(),
            "endif".to_string(),
        ];
        hoisted.push_conditional(lines.clone());
        hoisted.push_conditional(lines);
        hoisted.push_assign("badge_label", "'New'");
        assert_eq!(
            hoisted.emit(2),
            "{% liquid\n  assign badge_label = 'New'\n  if is_sale\n    assign badge_label = 'Sale'\n  endif\n%}"
        );
    }

    #[test]
    fn test_captures_are_separate_blocks() {
        let mut hoisted = HoistedDeclarations::new();
        hoisted.push_assign("a", "1");
        hoisted.push(Declaration::capture("card_title", "Hi {{ name }}"));
        hoisted.push(Declaration::capture("card_title", "Hi {{ name }}"));
        assert_eq!(
            hoisted.emit(2),
            "{% liquid\n  assign a = 1\n%}\n\n{% capture card_title %}Hi {{ name }}{% endcapture %}"
        );
    }

    #[test]
    fn test_empty() {
        let hoisted = HoistedDeclarations::new();
        assert!(hoisted.is_empty());
        assert_eq!(hoisted.emit(2), "");
    }

    #[test]
    fn test_declaration_tag_lines() {
        let conditional = Declaration::Conditional(vec![
            "if a".to_string(),
            "  assign x = 1".to_string(),
            "endif".to_string(),
        ]);
        assert_eq!(
            conditional.to_tag_lines(),
            vec!["{% if a %}", "  {% assign x = 1 %}", "{% endif %}"]
        );
    }
}
