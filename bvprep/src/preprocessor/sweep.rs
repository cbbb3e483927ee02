//! Final lowering sweep: one walk over the entire tree that desugars range
//! loops and normalizes byte-order tags, wherever they appear.

use super::byte_order;
use super::constants::ConstantTable;
use super::loops::{self, RangeLoop};
use crate::ast::visit::with_stack;
use crate::ast::{Block, Expr, Span, Spanned, Stmt};
use crate::config::PassConfig;
use crate::error::Result;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub loops_lowered: usize,
    pub byte_orders_rewritten: usize,
}

pub struct Sweep<'a> {
    config: &'a PassConfig,
    /// Consulted for range steps given by name
    constants: &'a ConstantTable,
    /// Range loops enclosing the statement being lowered, innermost last
    enclosing: Vec<String>,
    stats: SweepStats,
}

impl<'a> Sweep<'a> {
    pub fn new(config: &'a PassConfig, constants: &'a ConstantTable) -> Self {
        Self {
            config,
            constants,
            enclosing: Vec::new(),
            stats: SweepStats::default(),
        }
    }

    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    pub fn block(&mut self, block: Block) -> Result<Block> {
        let mut out = Vec::with_capacity(block.len());
        for stmt in block {
            self.stmt(stmt, &mut out)?;
        }
        Ok(out)
    }

    fn expr(&mut self, expr: &mut Spanned<Expr>) {
        self.stats.byte_orders_rewritten += byte_order::normalize(expr, self.config);
    }

    fn stmt(&mut self, stmt: Spanned<Stmt>, out: &mut Block) -> Result<()> {
        with_stack(|| self.stmt_inner(stmt, out))
    }

    fn stmt_inner(&mut self, stmt: Spanned<Stmt>, out: &mut Block) -> Result<()> {
        let span = stmt.span;
        let node = match stmt.node {
            Stmt::For {
                target,
                mut iter,
                body,
            } => {
                self.expr(&mut iter);
                if let Some(range) = loops::match_range_loop(&target, &iter, self.config, self.constants)? {
                    return self.range_loop(range, body, span, out);
                }
                Stmt::For {
                    target,
                    iter,
                    body: self.block(body)?,
                }
            }
            Stmt::FunctionDef(mut def) => {
                // A function body runs in its own frame; loops around the
                // definition don't enclose the loops inside it.
                let enclosing = std::mem::take(&mut self.enclosing);
                let body = self.block(std::mem::take(&mut def.body));
                self.enclosing = enclosing;
                def.body = body?;
                Stmt::FunctionDef(def)
            }
            Stmt::Assign { target, mut value } => {
                self.expr(&mut value);
                Stmt::Assign { target, value }
            }
            Stmt::AnnAssign {
                target,
                annotation,
                mut value,
            } => {
                if let Some(value) = &mut value {
                    self.expr(value);
                }
                Stmt::AnnAssign {
                    target,
                    annotation,
                    value,
                }
            }
            Stmt::While { mut cond, body } => {
                self.expr(&mut cond);
                Stmt::While {
                    cond,
                    body: self.block(body)?,
                }
            }
            Stmt::If {
                mut cond,
                then_body,
                else_body,
            } => {
                self.expr(&mut cond);
                Stmt::If {
                    cond,
                    then_body: self.block(then_body)?,
                    else_body: self.block(else_body)?,
                }
            }
            Stmt::Return(mut value) => {
                if let Some(value) = &mut value {
                    self.expr(value);
                }
                Stmt::Return(value)
            }
            Stmt::Expr(mut expr) => {
                self.expr(&mut expr);
                Stmt::Expr(expr)
            }
            Stmt::Other {
                kind,
                mut exprs,
                blocks,
            } => {
                for expr in &mut exprs {
                    self.expr(expr);
                }
                let blocks = blocks
                    .into_iter()
                    .map(|b| self.block(b))
                    .collect::<Result<Vec<_>>>()?;
                Stmt::Other {
                    kind,
                    exprs,
                    blocks,
                }
            }
            node @ (Stmt::Break | Stmt::Continue | Stmt::Pass) => node,
        };
        out.push(Spanned::new(node, span));
        Ok(())
    }

    fn range_loop(
        &mut self,
        mut range: RangeLoop,
        mut body: Block,
        span: Span,
        out: &mut Block,
    ) -> Result<()> {
        loops::check_body(&range, &body, self.config)?;
        let target = range.target.node.clone();

        // Both loops bind the same induction variable. Inside this one, the
        // enclosing loop's target is read from a slot that is restored
        // once this loop finishes.
        let saved = self.enclosing.last().cloned().map(|outer| {
            let slot = loops::saved_induction_name(self.config, self.enclosing.len());
            loops::rename_in_block(&mut body, &outer, &slot);
            range.rename(&outer, &slot);
            tracing::debug!(%outer, inner = %target, %slot, %span, "saving enclosing induction variable");
            (outer, slot)
        });

        self.enclosing.push(target.clone());
        let body = self.block(body);
        self.enclosing.pop();
        let mut body = body?;

        loops::rename_in_block(&mut body, &target, &self.config.induction_var);
        let fragment = loops::desugar(range, body, span, self.config);
        match saved {
            Some((outer, slot)) => {
                out.extend(loops::preserve_enclosing(fragment, &outer, &slot, span, self.config));
            }
            None => out.extend(fragment),
        }
        self.stats.loops_lowered += 1;
        tracing::trace!(%target, %span, "lowered range loop");
        Ok(())
    }
}
