//! Abstract Syntax Tree definitions
//!
//! The node set mirrors what the upstream Python front end hands over:
//! statements grouped into bodies, expressions hanging off statements.
//! Everything the pass does not interpret goes through the `Other`
//! variants, which are still traversed.

mod display;
mod expr;
mod span;
mod types;
pub mod visit;

pub use expr::*;
pub use span::*;
pub use types::*;

use serde::{Deserialize, Serialize};

/// A statement sequence (module body, function body, loop body, ...)
pub type Block = Vec<Spanned<Stmt>>;

/// A module is a sequence of top-level statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub body: Block,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// def name(params) -> returns: body
    FunctionDef(FunctionDef),

    /// target = value
    Assign {
        target: Spanned<String>,
        value: Spanned<Expr>,
    },

    /// target: annotation = value
    AnnAssign {
        target: Spanned<String>,
        annotation: Spanned<TypeAnnotation>,
        value: Option<Spanned<Expr>>,
    },

    /// for target in iter: body
    For {
        target: Spanned<Expr>,
        iter: Spanned<Expr>,
        body: Block,
    },

    /// while cond: body
    While { cond: Spanned<Expr>, body: Block },

    /// if cond: then_body else: else_body
    If {
        cond: Spanned<Expr>,
        then_body: Block,
        else_body: Block,
    },

    Return(Option<Spanned<Expr>>),

    /// Expression evaluated for its effect, usually a call
    Expr(Spanned<Expr>),

    Break,
    Continue,
    Pass,

    /// Any other statement (class bodies, with-blocks, try, ...).
    /// Its expressions and nested blocks are traversed.
    Other {
        kind: String,
        exprs: Vec<Spanned<Expr>>,
        blocks: Vec<Block>,
    },
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    #[serde(default)]
    pub returns: Option<Spanned<TypeAnnotation>>,
    pub body: Block,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: Spanned<String>,
    #[serde(default)]
    pub annotation: Option<Spanned<TypeAnnotation>>,
}

impl Param {
    /// Width attached to this parameter's annotation, if any
    pub fn width(&self) -> Option<u64> {
        self.annotation.as_ref().and_then(|ann| ann.node.width)
    }
}

impl FunctionDef {
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name.node == name)
    }
}

impl Module {
    pub fn new(body: Block) -> Self {
        Self { body }
    }

    /// Find a function definition by name anywhere in the module
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        fn find<'a>(block: &'a [Spanned<Stmt>], name: &str) -> Option<&'a FunctionDef> {
            block.iter().find_map(|stmt| match &stmt.node {
                Stmt::FunctionDef(def) if def.name.node == name => Some(def),
                Stmt::FunctionDef(def) => find(&def.body, name),
                Stmt::For { body, .. } | Stmt::While { body, .. } => find(body, name),
                Stmt::If {
                    then_body,
                    else_body,
                    ..
                } => find(then_body, name).or_else(|| find(else_body, name)),
                Stmt::Other { blocks, .. } => blocks.iter().find_map(|b| find(b, name)),
                _ => None,
            })
        }
        find(&self.body, name)
    }
}
