//! `int.from_bytes(buf, order)` takes its byte order as a string tag; the
//! backend wants a flag. `"big"` becomes `True`, anything else `False`.

use crate::ast::visit::{VisitorMut, walk_expr_mut};
use crate::ast::{Constant, Expr, Spanned};
use crate::config::PassConfig;

/// Rewrite every from-bytes call inside `expr`. Returns the number rewritten.
pub fn normalize(expr: &mut Spanned<Expr>, config: &PassConfig) -> usize {
    let mut normalizer = ByteOrderNormalizer { config, rewritten: 0 };
    normalizer.visit_expr_mut(expr);
    normalizer.rewritten
}

struct ByteOrderNormalizer<'a> {
    config: &'a PassConfig,
    rewritten: usize,
}

impl ByteOrderNormalizer<'_> {
    fn is_from_bytes(&self, func: &Expr) -> bool {
        match func {
            Expr::Attribute { value, attr } => value
                .node
                .as_name()
                .is_some_and(|base| self.config.is_from_bytes(base, attr)),
            _ => false,
        }
    }
}

impl VisitorMut for ByteOrderNormalizer<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Spanned<Expr>) {
        // Children first so a from-bytes call nested in the buffer argument
        // is handled too.
        walk_expr_mut(self, expr);

        let Expr::Call { func, args } = &mut expr.node else {
            return;
        };
        if !self.is_from_bytes(&func.node) {
            return;
        }
        let Some(order) = args.get_mut(1) else {
            return;
        };
        let big_endian = order.node.as_str() == Some("big");
        order.node = Expr::Constant(Constant::Bool(big_endian));
        self.rewritten += 1;
    }
}
