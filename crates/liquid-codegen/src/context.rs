//! Per-run conversion state.

use crate::hoist::{Declaration, HoistedDeclarations};
use crate::ConvertOptions;
use rustc_hash::FxHashMap;

/// State threaded through one conversion.
///
/// A fresh context is created for every template, so concurrent
/// conversions never observe each other's declarations.
#[derive(Debug)]
pub struct ConversionContext {
    pub options: ConvertOptions,
    hoisted: HoistedDeclarations,
    /// Declarations bound to loop variables, waiting to be attached to the
    /// node being built.
    locals: Vec<String>,
    name_counts: FxHashMap<String, u32>,
}

impl ConversionContext {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            hoisted: HoistedDeclarations::new(),
            locals: Vec::new(),
            name_counts: FxHashMap::default(),
        }
    }

    /// Reserve a variable name, suffixing `_2`, `_3`, … on reuse.
    pub fn unique_name(&mut self, base: &str) -> String {
        let count = self.name_counts.entry(base.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base.to_string()
        } else {
            format!("{}_{}", base, count)
        }
    }

    /// Record a declaration at file scope, or next to the current node when
    /// it depends on a loop variable.
    pub fn declare(&mut self, declaration: Declaration, loop_bound: bool) {
        if loop_bound {
            self.locals.extend(declaration.to_tag_lines());
        } else {
            self.hoisted.push(declaration);
        }
    }

    /// Take the node-local declarations recorded so far.
    pub fn take_locals(&mut self) -> Vec<String> {
        std::mem::take(&mut self.locals)
    }

    pub fn hoisted(&self) -> &HoistedDeclarations {
        &self.hoisted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name() {
        let mut ctx = ConversionContext::new(ConvertOptions::default());
        assert_eq!(ctx.unique_name("card_title"), "card_title");
        assert_eq!(ctx.unique_name("card_title"), "card_title_2");
        assert_eq!(ctx.unique_name("card_title"), "card_title_3");
        assert_eq!(ctx.unique_name("other"), "other");
    }

    #[test]
    fn test_declare_routes_by_scope() {
        let mut ctx = ConversionContext::new(ConvertOptions::default());
        ctx.declare(Declaration::assign("a", "1"), false);
        ctx.declare(Declaration::assign("b", "item.x"), true);
        assert_eq!(ctx.take_locals(), vec!["{% assign b = item.x %}"]);
        assert!(ctx.take_locals().is_empty());
        assert!(!ctx.hoisted().is_empty());
    }
}
