//! Call-site size profiling.
//!
//! For every call through a plain name, each argument that resolves to an
//! integer (literal, or a name in the constant table) and does not fit in 32
//! unsigned bits raises the callee's required width to the value's exact
//! bit-length.

use std::collections::HashMap;

use num_bigint::BigInt;

use super::constants::ConstantTable;
use crate::ast::visit::{Visitor, walk_expr};
use crate::ast::{Expr, Span, Spanned, Stmt};

/// Widest value that needs no profiling
const U32_LIMIT: u32 = u32::MAX;

/// Width evidence for one function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileEntry {
    pub width: u64,
    /// Call site that produced `width`
    pub span: Span,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeProfile {
    entries: HashMap<String, ProfileEntry>,
}

impl SizeProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise `function`'s width to at least `width`. The first call site
    /// reaching the maximum is kept.
    pub fn record(&mut self, function: &str, width: u64, span: Span) {
        match self.entries.get_mut(function) {
            Some(entry) if entry.width >= width => {}
            Some(entry) => *entry = ProfileEntry { width, span },
            None => {
                self.entries
                    .insert(function.to_string(), ProfileEntry { width, span });
            }
        }
    }

    pub fn get(&self, function: &str) -> Option<&ProfileEntry> {
        self.entries.get(function)
    }

    pub fn width(&self, function: &str) -> Option<u64> {
        self.get(function).map(|e| e.width)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries sorted by function name
    pub fn sorted(&self) -> Vec<(&str, ProfileEntry)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Number of bits needed to represent the magnitude of `value`
pub fn bit_length(value: &BigInt) -> u64 {
    value.bits()
}

/// Profile every call in `block`, at any depth
pub fn profile_calls(block: &[Spanned<Stmt>], constants: &ConstantTable, profile: &mut SizeProfile) -> usize {
    let mut profiler = CallProfiler {
        constants,
        profile,
        threshold: BigInt::from(U32_LIMIT),
        calls: 0,
    };
    profiler.visit_block(block);
    profiler.calls
}

struct CallProfiler<'a> {
    constants: &'a ConstantTable,
    profile: &'a mut SizeProfile,
    threshold: BigInt,
    calls: usize,
}

impl CallProfiler<'_> {
    fn profile_call(&mut self, callee: &str, args: &[Spanned<Expr>], span: Span) {
        self.calls += 1;
        for arg in args {
            let Some(value) = self.constants.resolve(&arg.node) else {
                continue;
            };
            if *value > self.threshold {
                let width = bit_length(value);
                tracing::trace!(callee, width, %span, "wide argument");
                self.profile.record(callee, width, span);
            }
        }
    }
}

impl Visitor for CallProfiler<'_> {
    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        if let Expr::Call { func, args } = &expr.node {
            if let Some(callee) = func.node.as_name() {
                self.profile_call(callee, args, expr.span);
            }
        }
        walk_expr(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp<T>(node: T) -> Spanned<T> {
        Spanned::new(node, Span::default())
    }

    fn call(callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call {
            func: Box::new(sp(callee)),
            args: args.into_iter().map(sp).collect(),
        }
    }

    fn call_stmt(callee: &str, args: Vec<Expr>) -> Spanned<Stmt> {
        sp(Stmt::Expr(sp(call(Expr::name(callee), args))))
    }

    fn big(text: &str) -> Expr {
        Expr::int(text.parse::<BigInt>().unwrap())
    }

    fn run(block: &[Spanned<Stmt>], constants: &ConstantTable) -> SizeProfile {
        let mut profile = SizeProfile::new();
        profile_calls(block, constants, &mut profile);
        profile
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(&BigInt::from(0)), 0);
        assert_eq!(bit_length(&BigInt::from(1)), 1);
        assert_eq!(bit_length(&BigInt::from(u32::MAX)), 32);
        assert_eq!(bit_length(&(BigInt::from(u32::MAX) + 1)), 33);
    }

    #[test]
    fn test_u32_max_is_not_profiled() {
        let profile = run(&[call_stmt("f", vec![Expr::int(u32::MAX)])], &ConstantTable::new());
        assert!(profile.is_empty());
    }

    #[test]
    fn test_first_value_past_u32_is_33_bits() {
        let profile = run(&[call_stmt("f", vec![Expr::int(1u64 << 32)])], &ConstantTable::new());
        assert_eq!(profile.width("f"), Some(33));
    }

    #[test]
    fn test_maximum_across_call_sites_and_arguments() {
        let block = vec![
            call_stmt("f", vec![Expr::int(1u64 << 40), Expr::int(3)]),
            call_stmt("f", vec![Expr::int(1), big("18446744073709551616")]),
            call_stmt("f", vec![Expr::int(1u64 << 35)]),
        ];
        let profile = run(&block, &ConstantTable::new());
        assert_eq!(profile.width("f"), Some(65));
    }

    #[test]
    fn test_names_resolved_through_constant_table() {
        let mut constants = ConstantTable::new();
        constants.observe("p", &big("340282366920938463463374607431768211455"));
        let profile = run(&[call_stmt("g", vec![Expr::name("p"), Expr::name("q")])], &constants);
        assert_eq!(profile.width("g"), Some(128));
    }

    #[test]
    fn test_method_calls_not_profiled() {
        let method = call(
            Expr::Attribute {
                value: Box::new(sp(Expr::name("obj"))),
                attr: "f".to_string(),
            },
            vec![Expr::int(1u64 << 50)],
        );
        let profile = run(&[sp(Stmt::Expr(sp(method)))], &ConstantTable::new());
        assert!(profile.is_empty());
    }

    #[test]
    fn test_negative_values_not_profiled() {
        let profile = run(&[call_stmt("f", vec![Expr::int(-(1i64 << 40))])], &ConstantTable::new());
        assert!(profile.is_empty());
    }

    #[test]
    fn test_nested_calls_profiled() {
        let inner = call(Expr::name("h"), vec![Expr::int(1u64 << 40)]);
        let block = vec![sp(Stmt::Assign {
            target: sp("r".to_string()),
            value: sp(call(Expr::name("outer"), vec![inner])),
        })];
        let profile = run(&block, &ConstantTable::new());
        assert_eq!(profile.width("h"), Some(41));
        assert_eq!(profile.width("outer"), None);
    }

    #[test]
    fn test_record_keeps_first_maximal_site() {
        let mut profile = SizeProfile::new();
        profile.record("f", 40, Span::new(0, 1));
        profile.record("f", 40, Span::new(5, 6));
        profile.record("f", 39, Span::new(7, 8));
        assert_eq!(profile.get("f").unwrap().span, Span::new(0, 1));
        profile.record("f", 41, Span::new(9, 10));
        assert_eq!(profile.get("f").unwrap().span, Span::new(9, 10));
    }
}
