//! Lowering of expression trees to Liquid.

use super::ast::{BinaryOp, Expr, LogicalOp, TemplatePart, UnaryOp};
use super::{ExpressionContext, JoinedAttribute};
use crate::case::{hyphenate, snake_case};
use crate::context::ConversionContext;
use crate::error::{ConvertError, ConvertResult};
use crate::hoist::Declaration;
use crate::ir::DirectiveKind;

/// Lowers one parsed expression.
///
/// Every method that renders a sub-expression records whether it touched
/// a loop variable, so that declarations hoisted from it can be kept next
/// to the node instead of at file scope.
pub struct Translator<'t> {
    ctx: &'t mut ConversionContext,
    scope: &'t ExpressionContext<'t>,
    source: &'t str,
    loop_bound: bool,
}

impl<'t> Translator<'t> {
    pub fn new(
        ctx: &'t mut ConversionContext,
        scope: &'t ExpressionContext<'t>,
        source: &'t str,
    ) -> Self {
        Self {
            ctx,
            scope,
            source,
            loop_bound: false,
        }
    }

    fn fail(&self, message: impl Into<String>) -> ConvertError {
        ConvertError::translate(message, self.source)
    }

    /// A boolean expression for `if`/`elsif`.
    pub fn condition(&mut self, expr: &Expr) -> ConvertResult<String> {
        match expr {
            Expr::Logical { op, left, right } => Ok(format!(
                "{} {} {}",
                self.condition(left)?,
                op.liquid(),
                self.condition(right)?
            )),
            Expr::Binary { op, left, right } if op.is_comparison() => Ok(format!(
                "{} {} {}",
                self.operand(left)?,
                op.liquid(),
                self.operand(right)?
            )),
            Expr::Unary {
                op: UnaryOp::Not,
                operand,
            } => self.negated_condition(operand),
            _ => match expr.as_includes() {
                Some((list, item)) => Ok(format!(
                    "{} contains {}",
                    self.operand(list)?,
                    self.operand(item)?
                )),
                None => self.operand(expr),
            },
        }
    }

    fn negated_condition(&mut self, expr: &Expr) -> ConvertResult<String> {
        match expr {
            Expr::Unary {
                op: UnaryOp::Not,
                operand,
            } => self.condition(operand),
            Expr::Binary { op, left, right } if op.negated().is_some() => {
                let negated = op.negated().map_or("!=", BinaryOp::liquid);
                Ok(format!(
                    "{} {} {}",
                    self.operand(left)?,
                    negated,
                    self.operand(right)?
                ))
            }
            Expr::Logical { op, left, right } => {
                let flipped = match op {
                    LogicalOp::And => LogicalOp::Or,
                    LogicalOp::Or => LogicalOp::And,
                };
                Ok(format!(
                    "{} {} {}",
                    self.negated_condition(left)?,
                    flipped.liquid(),
                    self.negated_condition(right)?
                ))
            }
            _ if expr.as_includes().is_some() => {
                let name = self.hoist_predicate(expr)?;
                Ok(format!("{} == false", name))
            }
            _ => Ok(format!("{} == blank", self.operand(expr)?)),
        }
    }

    /// Text for an output position: `{{ value }}`, raw string literals, or
    /// inline `{% if %}` tags.
    pub fn output(&mut self, expr: &Expr) -> ConvertResult<String> {
        match expr {
            Expr::Str(s) => Ok(s.clone()),
            Expr::Template(parts) => self.flatten_template(parts),
            Expr::Conditional { .. } => self.inline_conditional(expr),
            Expr::Logical {
                op: LogicalOp::Or,
                left,
                ..
            } => {
                tracing::warn!(expression = %self.source, "`or` in output keeps only its first operand");
                self.output(left)
            }
            Expr::Logical {
                op: LogicalOp::And,
                left,
                right,
            } => {
                tracing::warn!(expression = %self.source, "`and` in output is rendered as concatenation");
                Ok(format!(
                    "{{{{ {} | append: {} }}}}",
                    self.value(left)?,
                    self.operand(right)?
                ))
            }
            _ if expr.is_predicate() => Ok(format!(
                "{{% if {} %}}true{{% else %}}false{{% endif %}}",
                self.condition(expr)?
            )),
            _ => Ok(format!("{{{{ {} }}}}", self.value(expr)?)),
        }
    }

    /// Output for `v-text`: plain values pass through the `escape` filter.
    pub fn escaped_output(&mut self, expr: &Expr) -> ConvertResult<String> {
        match expr {
            Expr::Str(_)
            | Expr::Template(_)
            | Expr::Conditional { .. }
            | Expr::Logical { .. } => self.output(expr),
            _ if expr.is_predicate() => self.output(expr),
            _ => Ok(format!("{{{{ {} | escape }}}}", self.value(expr)?)),
        }
    }

    /// A value usable as a render argument.
    pub fn snippet_argument(&mut self, expr: &Expr) -> ConvertResult<String> {
        match expr {
            Expr::Logical { left, .. } => {
                tracing::warn!(expression = %self.source, "logical operator in snippet argument keeps only its first operand");
                self.snippet_argument(left)
            }
            Expr::Call { callee, args } if is_translation_call(callee) => match args.as_slice() {
                [Expr::Str(key)] => {
                    let key_value = self.string_literal(key);
                    let name = format!("t_{}", snake_case(key));
                    self.ctx
                        .declare(Declaration::assign(&name, format!("{} | t", key_value)), false);
                    Ok(name)
                }
                _ => self.operand(expr),
            },
            _ => self.operand(expr),
        }
    }

    /// A value without filters, hoisting a filtered value into an assign.
    pub fn operand(&mut self, expr: &Expr) -> ConvertResult<String> {
        let (value, bound) = self.tracked(|t| t.value(expr))?;
        if !has_filter(&value) {
            return Ok(value);
        }
        let name = self.fresh_name();
        self.ctx.declare(Declaration::assign(&name, value), bound);
        Ok(name)
    }

    /// A Liquid value expression, possibly ending in a filter chain.
    pub fn value(&mut self, expr: &Expr) -> ConvertResult<String> {
        match expr {
            Expr::Ident(name) => Ok(self.identifier(name)),
            Expr::Number(n) => Ok(n.clone()),
            Expr::Str(s) => Ok(self.string_literal(s)),
            Expr::Bool(b) => Ok(b.to_string()),
            Expr::Nil => Ok("nil".to_string()),
            Expr::Member { object, property } => self.member(object, property),
            Expr::Index { object, index } => Ok(format!(
                "{}[{}]",
                self.operand(object)?,
                self.operand(index)?
            )),
            Expr::Call { callee, args } => self.call(expr, callee, args),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand,
            } => Ok(format!("{} | times: -1", self.value(operand)?)),
            Expr::Binary { op, left, right } if !op.is_comparison() => {
                self.arithmetic(*op, left, right)
            }
            Expr::Logical { left, .. } => {
                tracing::warn!(expression = %self.source, "logical operator in value position keeps only its first operand");
                self.value(left)
            }
            Expr::Conditional { .. } => {
                let name = self.fresh_name();
                self.hoist_conditional(&name, expr)?;
                Ok(name)
            }
            Expr::Template(parts) => self.capture(parts),
            Expr::Array(_) | Expr::Object(_) => {
                Err(self.fail("array and object literals are not supported here"))
            }
            _ => self.hoist_predicate(expr),
        }
    }

    fn identifier(&mut self, name: &str) -> String {
        let name = snake_case(name);
        if name == "forloop" || self.scope.forloop_variables.contains(name.as_str()) {
            self.loop_bound = true;
        }
        name
    }

    fn member(&mut self, object: &Expr, property: &str) -> ConvertResult<String> {
        if matches!(object, Expr::Ident(o) if o == "this" || o == "$props") {
            return Ok(self.identifier(property));
        }
        let (object, bound) = self.tracked(|t| t.value(object))?;
        if property == "length" {
            return Ok(if has_filter(&object) {
                format!("{} | size", object)
            } else {
                format!("{}.size", object)
            });
        }
        if has_filter(&object) {
            let name = self.fresh_name();
            self.ctx.declare(Declaration::assign(&name, object), bound);
            return Ok(format!("{}.{}", name, snake_case(property)));
        }
        Ok(format!("{}.{}", object, snake_case(property)))
    }

    fn call(&mut self, expr: &Expr, callee: &Expr, args: &[Expr]) -> ConvertResult<String> {
        if expr.as_includes().is_some() {
            return self.hoist_predicate(expr);
        }
        match callee {
            _ if is_translation_call(callee) => self.translation(args),
            Expr::Ident(name) => match name.as_str() {
                "formatMoney" | "formatCurrency" | "money" => {
                    let amount = self.single_argument(name, args)?;
                    Ok(format!("{} | money", self.value(amount)?))
                }
                "raw" | "liquid" => match args {
                    [Expr::Str(path)] => Ok(path.clone()),
                    _ => Err(self.fail(format!("{}() expects a single string literal", name))),
                },
                "String" => {
                    let inner = self.single_argument(name, args)?;
                    self.value(inner)
                }
                _ => self.unknown_call(callee, args),
            },
            Expr::Member { object, property } => {
                let filter = match (property.as_str(), args) {
                    ("toUpperCase", []) => "upcase".to_string(),
                    ("toLowerCase", []) => "downcase".to_string(),
                    ("trim", []) => "strip".to_string(),
                    ("toString", []) => return self.value(object),
                    ("join", [separator]) => format!("join: {}", self.operand(separator)?),
                    ("join", []) => "join: ','".to_string(),
                    _ => return self.unknown_call(callee, args),
                };
                Ok(format!("{} | {}", self.value(object)?, filter))
            }
            _ => self.unknown_call(callee, args),
        }
    }

    fn single_argument<'e>(&self, name: &str, args: &'e [Expr]) -> ConvertResult<&'e Expr> {
        match args {
            [arg] => Ok(arg),
            _ => Err(self.fail(format!("{}() expects one argument", name))),
        }
    }

    fn unknown_call(&mut self, callee: &Expr, args: &[Expr]) -> ConvertResult<String> {
        tracing::warn!(expression = %self.source, "unsupported call, emitted as written");
        let callee = self.value(callee)?;
        let args = args
            .iter()
            .map(|arg| self.value(arg))
            .collect::<ConvertResult<Vec<_>>>()?;
        Ok(format!("{}({})", callee, args.join(", ")))
    }

    /// `t(key, { param: value })` → `'key' | t: param: value`.
    fn translation(&mut self, args: &[Expr]) -> ConvertResult<String> {
        let Some(key) = args.first() else {
            return Err(self.fail("t() expects a translation key"));
        };
        let key = match key {
            Expr::Str(k) => self.string_literal(k),
            other => self.operand(other)?,
        };
        match args.get(1) {
            None => Ok(format!("{} | t", key)),
            Some(Expr::Object(entries)) => {
                let params = entries
                    .iter()
                    .map(|(name, value)| {
                        Ok(format!("{}: {}", snake_case(name), self.operand(value)?))
                    })
                    .collect::<ConvertResult<Vec<_>>>()?;
                Ok(format!("{} | t: {}", key, params.join(", ")))
            }
            Some(_) => Err(self.fail("translation parameters must be an object literal")),
        }
    }

    fn arithmetic(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> ConvertResult<String> {
        let filter = if op == BinaryOp::Add && (is_string_like(left) || is_string_like(right)) {
            "append"
        } else {
            op.liquid()
        };
        Ok(format!(
            "{} | {}: {}",
            self.value(left)?,
            filter,
            self.operand(right)?
        ))
    }

    /// Render `f` and report whether it referenced a loop variable. The
    /// flag also propagates to the enclosing rendering.
    fn tracked<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ConvertResult<T>,
    ) -> ConvertResult<(T, bool)> {
        let outer = std::mem::replace(&mut self.loop_bound, false);
        let result = f(self);
        let bound = self.loop_bound;
        self.loop_bound = outer || bound;
        Ok((result?, bound))
    }

    /// A string value. Text with both quote kinds is captured instead.
    fn string_literal(&mut self, s: &str) -> String {
        if is_quotable(s) {
            return quote(s);
        }
        let name = self.fresh_name();
        self.ctx.declare(Declaration::capture(&name, s), false);
        name
    }

    fn fresh_name(&mut self) -> String {
        let base = self.base_name();
        self.ctx.unique_name(&base)
    }

    /// Hoisted variable base name: `<tag>_<attribute>`.
    fn base_name(&self) -> String {
        let suffix = match (self.scope.attribute, self.scope.directive) {
            (Some(attribute), _) => snake_case(attribute),
            (None, Some(DirectiveKind::If | DirectiveKind::ElseIf | DirectiveKind::Show)) => {
                "condition".to_string()
            }
            (None, Some(DirectiveKind::For)) => "list".to_string(),
            (None, _) => "content".to_string(),
        };
        let tag = snake_case(self.scope.tag);
        if tag.is_empty() {
            suffix
        } else {
            format!("{}_{}", tag, suffix)
        }
    }

    /// Declare `name` with a default assign and an `if`/`elsif` override
    /// chain built from a (nested) ternary.
    pub fn hoist_conditional(&mut self, name: &str, expr: &Expr) -> ConvertResult<()> {
        let ((branches, default), bound) = self.tracked(|t| {
            let mut branches = Vec::new();
            let mut current = expr;
            while let Expr::Conditional {
                test,
                consequent,
                alternate,
            } = current
            {
                branches.push((t.condition(test)?, t.value(consequent)?));
                current = alternate;
            }
            Ok((branches, t.value(current)?))
        })?;

        let indent = " ".repeat(self.ctx.options.indent_width);
        let mut lines = Vec::with_capacity(branches.len() * 2 + 1);
        for (i, (condition, value)) in branches.into_iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "elsif" };
            lines.push(format!("{} {}", keyword, condition));
            lines.push(format!("{}assign {} = {}", indent, name, value));
        }
        lines.push("endif".to_string());

        self.ctx.declare(Declaration::assign(name, default), bound);
        self.ctx.declare(Declaration::Conditional(lines), bound);
        Ok(())
    }

    fn hoist_predicate(&mut self, expr: &Expr) -> ConvertResult<String> {
        let (condition, bound) = self.tracked(|t| t.condition(expr))?;
        let name = self.fresh_name();
        let indent = " ".repeat(self.ctx.options.indent_width);
        self.ctx.declare(Declaration::assign(&name, "false"), bound);
        self.ctx.declare(
            Declaration::Conditional(vec![
                format!("if {}", condition),
                format!("{}assign {} = true", indent, name),
                "endif".to_string(),
            ]),
            bound,
        );
        Ok(name)
    }

    fn capture(&mut self, parts: &[TemplatePart]) -> ConvertResult<String> {
        let (body, bound) = self.tracked(|t| t.flatten_template(parts))?;
        let name = self.fresh_name();
        self.ctx.declare(Declaration::capture(&name, &body), bound);
        Ok(name)
    }

    fn flatten_template(&mut self, parts: &[TemplatePart]) -> ConvertResult<String> {
        let mut out = String::new();
        for part in parts {
            match part {
                TemplatePart::Text(text) => out.push_str(text),
                TemplatePart::Expr(expr) => out.push_str(&self.output(expr)?),
            }
        }
        Ok(out)
    }

    /// `{% if a %}x{% elsif b %}y{% else %}z{% endif %}`; an empty
    /// final branch drops its `else`.
    fn inline_conditional(&mut self, expr: &Expr) -> ConvertResult<String> {
        let mut out = String::new();
        let mut current = expr;
        let mut keyword = "if";
        while let Expr::Conditional {
            test,
            consequent,
            alternate,
        } = current
        {
            out.push_str(&format!("{{% {} {} %}}", keyword, self.condition(test)?));
            out.push_str(&self.output(consequent)?);
            current = alternate;
            keyword = "elsif";
        }
        let alternate = self.output(current)?;
        if !alternate.is_empty() {
            out.push_str("{% else %}");
            out.push_str(&alternate);
        }
        out.push_str("{% endif %}");
        Ok(out)
    }

    /// Class tokens from string, object and array syntax.
    pub fn class_tokens(&mut self, expr: &Expr) -> ConvertResult<Vec<String>> {
        match expr {
            Expr::Str(s) => Ok(s.split_whitespace().map(str::to_string).collect()),
            Expr::Object(entries) => entries
                .iter()
                .map(|(name, value)| match value {
                    Expr::Bool(true) => Ok(name.clone()),
                    _ => Ok(format!(
                        "{{% if {} %}}{}{{% endif %}}",
                        self.condition(value)?,
                        name
                    )),
                })
                .collect(),
            Expr::Array(items) => {
                let mut tokens = Vec::new();
                for item in items {
                    tokens.extend(self.class_tokens(item)?);
                }
                Ok(tokens)
            }
            _ => Ok(vec![self.output(expr)?]),
        }
    }

    /// `property: value;` pairs from object syntax.
    pub fn style_declarations(&mut self, expr: &Expr) -> ConvertResult<Vec<String>> {
        match expr {
            Expr::Object(entries) => entries
                .iter()
                .map(|(name, value)| {
                    let property = if name.starts_with("--") {
                        name.clone()
                    } else {
                        hyphenate(name)
                    };
                    Ok(format!("{}: {};", property, self.output(value)?))
                })
                .collect(),
            Expr::Array(items) => {
                let mut declarations = Vec::new();
                for item in items {
                    declarations.extend(self.style_declarations(item)?);
                }
                Ok(declarations)
            }
            _ => Ok(vec![self.output(expr)?]),
        }
    }

    /// A snippet argument built from literal tokens followed by a class or
    /// style binding. A value with Liquid markup in it is captured.
    pub fn joined_argument(
        &mut self,
        leading: &[String],
        expr: &Expr,
        kind: JoinedAttribute,
    ) -> ConvertResult<String> {
        let (parts, bound) = self.tracked(|t| match kind {
            JoinedAttribute::Class => t.class_tokens(expr),
            JoinedAttribute::Style => t.style_declarations(expr),
        })?;
        let body = leading
            .iter()
            .cloned()
            .chain(parts)
            .collect::<Vec<_>>()
            .join(" ");
        if !body.contains("{{") && !body.contains("{%") && is_quotable(&body) {
            return Ok(quote(&body));
        }
        let name = self.fresh_name();
        self.ctx.declare(Declaration::capture(&name, &body), bound);
        Ok(name)
    }

    /// Resolve a `<component :is>` expression into `name`.
    ///
    /// A ternary becomes a default plus overrides. Anything else defaults to
    /// `div` with a `TODO` override that has to be filled in by hand.
    pub fn dynamic_tag(&mut self, name: &str, expr: &Expr) -> ConvertResult<()> {
        if matches!(expr, Expr::Conditional { .. }) {
            return self.hoist_conditional(name, expr);
        }
        tracing::warn!(expression = %self.source, "dynamic tag needs manual resolution");
        let (condition, bound) = self.tracked(|t| t.condition(expr))?;
        let indent = " ".repeat(self.ctx.options.indent_width);
        self.ctx.declare(Declaration::assign(name, "'div'"), bound);
        self.ctx.declare(
            Declaration::Conditional(vec![
                format!("if {}", condition),
                format!("{}assign {} = 'TODO'", indent, name),
                "endif".to_string(),
            ]),
            bound,
        );
        Ok(())
    }
}

fn is_translation_call(callee: &Expr) -> bool {
    matches!(callee, Expr::Ident(name) if name == "t" || name == "$t")
}

fn is_string_like(expr: &Expr) -> bool {
    matches!(expr, Expr::Str(_) | Expr::Template(_))
}

/// A Liquid string literal, delimited by the quote `s` does not contain.
pub(crate) fn quote(s: &str) -> String {
    if s.contains('\'') {
        format!("\"{}\"", s)
    } else {
        format!("'{}'", s)
    }
}

/// Liquid has no escapes, so text with both quote kinds has no literal form.
pub(crate) fn is_quotable(s: &str) -> bool {
    !(s.contains('\'') && s.contains('"'))
}

/// Whether a rendered value contains a filter outside string literals.
fn has_filter(value: &str) -> bool {
    let mut quote = None;
    for c in value.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '|' => return true,
            None => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::super::{translate, translate_class, translate_style, ExpressionContext};
    use super::*;
    use crate::ConvertOptions;
    use indexmap::IndexSet;
    use pretty_assertions::assert_eq;
    use smol_str::SmolStr;

    struct Harness {
        ctx: ConversionContext,
        loops: IndexSet<SmolStr>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                ctx: ConversionContext::new(ConvertOptions::default()),
                loops: IndexSet::new(),
            }
        }

        fn in_loop(mut self, name: &str) -> Self {
            self.loops.insert(name.into());
            self
        }

        fn run(
            &mut self,
            source: &str,
            tag: &str,
            attribute: Option<&str>,
            is_snippet: bool,
            directive: Option<DirectiveKind>,
        ) -> String {
            let scope = ExpressionContext {
                forloop_variables: &self.loops,
                is_snippet,
                attribute,
                tag,
                directive,
            };
            translate(source, &scope, &mut self.ctx).unwrap()
        }

        fn condition(&mut self, source: &str) -> String {
            self.run(source, "div", None, false, Some(DirectiveKind::If))
        }

        fn output(&mut self, source: &str) -> String {
            self.run(source, "div", None, false, None)
        }

        fn argument(&mut self, source: &str, tag: &str, attribute: &str) -> String {
            self.run(source, tag, Some(attribute), true, None)
        }

        fn hoisted(&self) -> String {
            self.ctx.hoisted().emit(2)
        }
    }

    #[test]
    fn test_condition_operators() {
        let mut h = Harness::new();
        assert_eq!(h.condition("isVisible"), "is_visible");
        assert_eq!(
            h.condition("user?.isAdmin && items.length > 0"),
            "user.is_admin and items.size > 0"
        );
        assert_eq!(h.condition("a === 'x' || b !== null"), "a == 'x' or b != nil");
        assert_eq!(h.condition("!product.available"), "product.available == blank");
        assert_eq!(h.condition("!(count >= 3)"), "count < 3");
        assert_eq!(h.condition("tags.includes('sale')"), "tags contains 'sale'");
        assert_eq!(h.hoisted(), "");
    }

    #[test]
    fn test_output_positions() {
        let mut h = Harness::new();
        assert_eq!(h.output("message"), "{{ message }}");
        assert_eq!(h.output("product.title"), "{{ product.title }}");
        assert_eq!(
            h.output("isSale ? 'Sale' : 'Regular'"),
            "{% if is_sale %}Sale{% else %}Regular{% endif %}"
        );
        assert_eq!(h.output("open ? 'is-open' : ''"), "{% if open %}is-open{% endif %}");
        assert_eq!(
            h.output("a ? 'x' : b ? 'y' : 'z'"),
            "{% if a %}x{% elsif b %}y{% else %}z{% endif %}"
        );
        assert_eq!(
            h.output("count === 1"),
            "{% if count == 1 %}true{% else %}false{% endif %}"
        );
        assert_eq!(h.output("`${firstName} ${lastName}`"), "{{ first_name }} {{ last_name }}");
        assert_eq!(h.output("title || 'Untitled'"), "{{ title }}");
        assert_eq!(h.output("prefix && name"), "{{ prefix | append: name }}");
    }

    #[test]
    fn test_helpers() {
        let mut h = Harness::new();
        assert_eq!(h.output("t('cart.title')"), "{{ 'cart.title' | t }}");
        assert_eq!(
            h.output("$t('cart.items', { itemCount: count })"),
            "{{ 'cart.items' | t: item_count: count }}"
        );
        assert_eq!(h.output("formatMoney(product.price)"), "{{ product.price | money }}");
        assert_eq!(h.output("raw('settings.logoUrl')"), "{{ settings.logoUrl }}");
        assert_eq!(h.output("price * quantity"), "{{ price | times: quantity }}");
        assert_eq!(h.output("'Hi ' + name"), "{{ 'Hi ' | append: name }}");
        assert_eq!(h.output("title.toUpperCase()"), "{{ title | upcase }}");
    }

    #[test]
    fn test_filtered_operands_are_hoisted() {
        let mut h = Harness::new();
        assert_eq!(h.output("a + b * c"), "{{ a | plus: div_content }}");
        assert_eq!(
            h.hoisted(),
            "{% liquid\n  assign div_content = b | times: c\n%}"
        );
    }

    #[test]
    fn test_unknown_call_is_best_effort() {
        let mut h = Harness::new();
        assert_eq!(h.output("formatDate(createdAt)"), "{{ format_date(created_at) }}");
    }

    #[test]
    fn test_snippet_argument_ternary_is_hoisted() {
        let mut h = Harness::new();
        let name = h.argument("isSale ? 'Sale' : isNew ? 'New' : ''", "ProductBadge", "label");
        assert_eq!(name, "product_badge_label");
        assert_eq!(
            h.hoisted(),
            "{% liquid\n  assign product_badge_label = ''\n  if is_sale\n    assign product_badge_label = 'Sale'\n  elsif is_new\n    assign product_badge_label = 'New'\n  endif\n%}"
        );
    }

    #[test]
    fn test_snippet_argument_comparison_is_hoisted() {
        let mut h = Harness::new();
        assert_eq!(h.argument("count > 1", "ItemList", "plural"), "item_list_plural");
        assert_eq!(h.argument("count > 2", "ItemList", "plural"), "item_list_plural_2");
        assert_eq!(
            h.hoisted(),
            "{% liquid\n  assign item_list_plural = false\n  assign item_list_plural_2 = false\n  if count > 1\n    assign item_list_plural = true\n  endif\n  if count > 2\n    assign item_list_plural_2 = true\n  endif\n%}"
        );
    }

    #[test]
    fn test_translation_key_hoisted_once() {
        let mut h = Harness::new();
        assert_eq!(h.argument("t('products.addToCart')", "Button", "label"), "t_products_add_to_cart");
        assert_eq!(h.argument("$t('products.addToCart')", "Link", "title"), "t_products_add_to_cart");
        assert_eq!(h.argument("t('general.close')", "Button", "aria"), "t_general_close");
        assert_eq!(
            h.hoisted(),
            "{% liquid\n  assign t_general_close = 'general.close' | t\n  assign t_products_add_to_cart = 'products.addToCart' | t\n%}"
        );
    }

    #[test]
    fn test_snippet_argument_money_and_logical() {
        let mut h = Harness::new();
        assert_eq!(h.argument("formatMoney(price)", "PriceTag", "amount"), "price_tag_amount");
        assert_eq!(h.argument("title || fallback", "Card", "title"), "title");
        assert_eq!(h.argument("product", "Card", "product"), "product");
        assert_eq!(
            h.hoisted(),
            "{% liquid\n  assign price_tag_amount = price | money\n%}"
        );
    }

    #[test]
    fn test_snippet_argument_template_is_captured() {
        let mut h = Harness::new();
        assert_eq!(h.argument("`/products/${handle}`", "Card", "url"), "card_url");
        assert_eq!(
            h.hoisted(),
            "{% capture card_url %}/products/{{ handle }}{% endcapture %}"
        );
    }

    #[test]
    fn test_loop_bound_declarations_stay_local() {
        let mut h = Harness::new().in_loop("item");
        let name = h.argument("item.onSale ? 'Sale' : 'Full'", "Badge", "label");
        assert_eq!(name, "badge_label");
        assert_eq!(h.hoisted(), "");
        assert_eq!(
            h.ctx.take_locals(),
            vec![
                "{% assign badge_label = 'Full' %}",
                "{% if item.on_sale %}",
                "  {% assign badge_label = 'Sale' %}",
                "{% endif %}",
            ]
        );
    }

    #[test]
    fn test_member_of_unbound_filtered_value_is_hoisted() {
        let mut h = Harness::new().in_loop("item");
        assert_eq!(
            h.output("`${item.name} ${title.toUpperCase().first}`"),
            "{{ item.name }} {{ div_content.first }}"
        );
        assert_eq!(
            h.hoisted(),
            "{% liquid\n  assign div_content = title | upcase\n%}"
        );
        assert!(h.ctx.take_locals().is_empty());
    }

    #[test]
    fn test_string_literal_delimiters() {
        assert_eq!(quote("sale"), "'sale'");
        assert_eq!(quote("it's"), "\"it's\"");
        assert_eq!(quote(r#"say "hi""#), r#"'say "hi"'"#);

        let mut h = Harness::new();
        assert_eq!(h.argument(r#"'it\'s "new"'"#, "Card", "title"), "card_title");
        assert_eq!(
            h.hoisted(),
            r#"{% capture card_title %}it's "new"{% endcapture %}"#
        );
    }

    #[test]
    fn test_is_attribute_passes_through() {
        let mut h = Harness::new();
        assert_eq!(h.run("someThing", "tr", Some("is"), false, None), "someThing");
    }

    #[test]
    fn test_escaped_output() {
        let mut h = Harness::new();
        assert_eq!(
            h.run("product.description", "p", None, false, Some(DirectiveKind::Text)),
            "{{ product.description | escape }}"
        );
    }

    #[test]
    fn test_class_tokens() {
        let mut h = Harness::new();
        let loops = IndexSet::new();
        let scope = ExpressionContext {
            forloop_variables: &loops,
            is_snippet: false,
            attribute: Some("class"),
            tag: "div",
            directive: None,
        };
        assert_eq!(
            translate_class("{ active: isActive, 'is-open': open, static: true }", &scope, &mut h.ctx)
                .unwrap(),
            vec![
                "{% if is_active %}active{% endif %}",
                "{% if open %}is-open{% endif %}",
                "static",
            ]
        );
        assert_eq!(
            translate_class("['btn', size, { wide: full }]", &scope, &mut h.ctx).unwrap(),
            vec!["btn", "{{ size }}", "{% if full %}wide{% endif %}"]
        );
        assert_eq!(
            translate_style("{ fontSize: size + 'px', '--gap': gap }", &scope, &mut h.ctx).unwrap(),
            vec!["font-size: {{ size | append: 'px' }};", "--gap: {{ gap }};"]
        );
    }

    #[test]
    fn test_malformed_expression_fails() {
        let loops = IndexSet::new();
        let scope = ExpressionContext {
            forloop_variables: &loops,
            is_snippet: false,
            attribute: None,
            tag: "div",
            directive: None,
        };
        let mut ctx = ConversionContext::new(ConvertOptions::default());
        let err = translate("items[0", &scope, &mut ctx).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Translation { expression: Some(ref e), .. } if e == "items[0"
        ));
    }

    #[test]
    fn test_has_filter_ignores_strings() {
        assert!(has_filter("price | money"));
        assert!(!has_filter("'a | b'"));
    }
}
