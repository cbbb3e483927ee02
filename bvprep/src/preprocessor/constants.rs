//! Module-wide table of integer constants.
//!
//! Flow-insensitive: the last literal assigned to a name wins, and a later
//! non-literal assignment does not invalidate it. Branches, loops and
//! function scopes are not distinguished.

use std::collections::HashMap;

use num_bigint::BigInt;

use crate::ast::{Expr, Spanned, Stmt};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantTable {
    values: HashMap<String, BigInt>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every literal-integer assignment among `block`'s own statements.
    /// Nested blocks are not entered.
    pub fn record_assignments(&mut self, block: &[Spanned<Stmt>]) {
        for stmt in block {
            match &stmt.node {
                Stmt::Assign { target, value } => self.observe(&target.node, &value.node),
                Stmt::AnnAssign {
                    target,
                    value: Some(value),
                    ..
                } => self.observe(&target.node, &value.node),
                _ => {}
            }
        }
    }

    /// Note an assignment `name = value`. Only integer literals are kept;
    /// anything else leaves the current entry alone.
    pub fn observe(&mut self, name: &str, value: &Expr) {
        if let Some(literal) = value.as_int() {
            self.values.insert(name.to_string(), literal.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&BigInt> {
        self.values.get(name)
    }

    /// Value of `expr` if it is an integer literal or a name with a known constant
    pub fn resolve<'a>(&'a self, expr: &'a Expr) -> Option<&'a BigInt> {
        match expr {
            Expr::Constant(_) => expr.as_int(),
            Expr::Name(id) => self.get(id),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BigInt)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
