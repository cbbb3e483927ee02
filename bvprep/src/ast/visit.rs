//! Tree traversal.
//!
//! `Visitor` walks a tree by shared reference and `VisitorMut` by mutable
//! reference. Implementors override the hooks they care about and call the
//! matching `walk_*` function to keep descending. Structural rewrites that
//! replace one statement by several (loop desugaring) don't fit this shape
//! and are written as block-to-block folds instead.

use super::{Expr, Spanned, Stmt};

/// Remaining stack that triggers growth
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each newly allocated stack segment
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Run `f` with at least `STACK_RED_ZONE` bytes of stack available
pub fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, f)
}

pub trait Visitor {
    fn visit_block(&mut self, block: &[Spanned<Stmt>]) {
        for stmt in block {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    /// Name bound by an assignment statement
    fn visit_target(&mut self, _target: &Spanned<String>) {}
}

pub fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, stmt: &Spanned<Stmt>) {
    with_stack(|| match &stmt.node {
        Stmt::FunctionDef(def) => v.visit_block(&def.body),
        Stmt::Assign { target, value } => {
            v.visit_target(target);
            v.visit_expr(value);
        }
        Stmt::AnnAssign { target, value, .. } => {
            v.visit_target(target);
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        Stmt::For { target, iter, body } => {
            v.visit_expr(target);
            v.visit_expr(iter);
            v.visit_block(body);
        }
        Stmt::While { cond, body } => {
            v.visit_expr(cond);
            v.visit_block(body);
        }
        Stmt::If {
            cond,
            then_body,
            else_body,
        } => {
            v.visit_expr(cond);
            v.visit_block(then_body);
            v.visit_block(else_body);
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        Stmt::Expr(expr) => v.visit_expr(expr),
        Stmt::Break | Stmt::Continue | Stmt::Pass => {}
        Stmt::Other { exprs, blocks, .. } => {
            for expr in exprs {
                v.visit_expr(expr);
            }
            for block in blocks {
                v.visit_block(block);
            }
        }
    })
}

pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, expr: &Spanned<Expr>) {
    with_stack(|| match &expr.node {
        Expr::Name(_) | Expr::Constant(_) => {}
        Expr::Call { func, args } => {
            v.visit_expr(func);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Attribute { value, .. } => v.visit_expr(value),
        Expr::Compare { left, right, .. } | Expr::BinOp { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::UnaryOp { operand, .. } => v.visit_expr(operand),
        Expr::Other { operands, .. } => {
            for operand in operands {
                v.visit_expr(operand);
            }
        }
    })
}

pub trait VisitorMut {
    fn visit_block_mut(&mut self, block: &mut [Spanned<Stmt>]) {
        for stmt in block {
            self.visit_stmt_mut(stmt);
        }
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Spanned<Stmt>) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_mut(&mut self, expr: &mut Spanned<Expr>) {
        walk_expr_mut(self, expr);
    }

    fn visit_target_mut(&mut self, _target: &mut Spanned<String>) {}
}

pub fn walk_stmt_mut<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut Spanned<Stmt>) {
    with_stack(|| match &mut stmt.node {
        Stmt::FunctionDef(def) => v.visit_block_mut(&mut def.body),
        Stmt::Assign { target, value } => {
            v.visit_target_mut(target);
            v.visit_expr_mut(value);
        }
        Stmt::AnnAssign { target, value, .. } => {
            v.visit_target_mut(target);
            if let Some(value) = value {
                v.visit_expr_mut(value);
            }
        }
        Stmt::For { target, iter, body } => {
            v.visit_expr_mut(target);
            v.visit_expr_mut(iter);
            v.visit_block_mut(body);
        }
        Stmt::While { cond, body } => {
            v.visit_expr_mut(cond);
            v.visit_block_mut(body);
        }
        Stmt::If {
            cond,
            then_body,
            else_body,
        } => {
            v.visit_expr_mut(cond);
            v.visit_block_mut(then_body);
            v.visit_block_mut(else_body);
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                v.visit_expr_mut(value);
            }
        }
        Stmt::Expr(expr) => v.visit_expr_mut(expr),
        Stmt::Break | Stmt::Continue | Stmt::Pass => {}
        Stmt::Other { exprs, blocks, .. } => {
            for expr in exprs {
                v.visit_expr_mut(expr);
            }
            for block in blocks {
                v.visit_block_mut(block);
            }
        }
    })
}

pub fn walk_expr_mut<V: VisitorMut + ?Sized>(v: &mut V, expr: &mut Spanned<Expr>) {
    with_stack(|| match &mut expr.node {
        Expr::Name(_) | Expr::Constant(_) => {}
        Expr::Call { func, args } => {
            v.visit_expr_mut(func);
            for arg in args {
                v.visit_expr_mut(arg);
            }
        }
        Expr::Attribute { value, .. } => v.visit_expr_mut(value),
        Expr::Compare { left, right, .. } | Expr::BinOp { left, right, .. } => {
            v.visit_expr_mut(left);
            v.visit_expr_mut(right);
        }
        Expr::UnaryOp { operand, .. } => v.visit_expr_mut(operand),
        Expr::Other { operands, .. } => {
            for operand in operands {
                v.visit_expr_mut(operand);
            }
        }
    })
}
