//! Python-like text rendering of the tree, used by the driver's text output
//! and in tests.

use std::fmt::{self, Display, Formatter, Write};

use super::{Expr, Module, Spanned, Stmt};

const INDENT: &str = "    ";

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in &self.body {
            write_stmt(f, &stmt.node, 0)?;
        }
        Ok(())
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

fn write_block(f: &mut Formatter<'_>, block: &[Spanned<Stmt>], depth: usize) -> fmt::Result {
    if block.is_empty() {
        return writeln!(f, "{}pass", INDENT.repeat(depth));
    }
    for stmt in block {
        write_stmt(f, &stmt.node, depth)?;
    }
    Ok(())
}

fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    match stmt {
        Stmt::FunctionDef(def) => {
            write!(f, "{pad}def {}(", def.name.node)?;
            for (i, param) in def.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&param.name.node)?;
                if let Some(ann) = &param.annotation {
                    write!(f, ": {}", ann.node)?;
                }
            }
            f.write_char(')')?;
            if let Some(ret) = &def.returns {
                write!(f, " -> {}", ret.node)?;
            }
            writeln!(f, ":")?;
            write_block(f, &def.body, depth + 1)
        }
        Stmt::Assign { target, value } => writeln!(f, "{pad}{} = {}", target.node, value.node),
        Stmt::AnnAssign {
            target,
            annotation,
            value,
        } => match value {
            Some(value) => writeln!(f, "{pad}{}: {} = {}", target.node, annotation.node, value.node),
            None => writeln!(f, "{pad}{}: {}", target.node, annotation.node),
        },
        Stmt::For { target, iter, body } => {
            writeln!(f, "{pad}for {} in {}:", target.node, iter.node)?;
            write_block(f, body, depth + 1)
        }
        Stmt::While { cond, body } => {
            writeln!(f, "{pad}while {}:", cond.node)?;
            write_block(f, body, depth + 1)
        }
        Stmt::If {
            cond,
            then_body,
            else_body,
        } => {
            writeln!(f, "{pad}if {}:", cond.node)?;
            write_block(f, then_body, depth + 1)?;
            if !else_body.is_empty() {
                writeln!(f, "{pad}else:")?;
                write_block(f, else_body, depth + 1)?;
            }
            Ok(())
        }
        Stmt::Return(None) => writeln!(f, "{pad}return"),
        Stmt::Return(Some(value)) => writeln!(f, "{pad}return {}", value.node),
        Stmt::Expr(expr) => writeln!(f, "{pad}{}", expr.node),
        Stmt::Break => writeln!(f, "{pad}break"),
        Stmt::Continue => writeln!(f, "{pad}continue"),
        Stmt::Pass => writeln!(f, "{pad}pass"),
        Stmt::Other {
            kind,
            exprs,
            blocks,
        } => {
            write!(f, "{pad}{kind}")?;
            if !exprs.is_empty() {
                f.write_char(' ')?;
                write_list(f, exprs)?;
            }
            if blocks.is_empty() {
                return writeln!(f);
            }
            writeln!(f, ":")?;
            for block in blocks {
                write_block(f, block, depth + 1)?;
            }
            Ok(())
        }
    }
}

fn write_list(f: &mut Formatter<'_>, exprs: &[Spanned<Expr>]) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", expr.node)?;
    }
    Ok(())
}

/// Operand of an infix/prefix operator, parenthesized when it is itself one
struct Operand<'a>(&'a Expr);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Compare { .. } | Expr::BinOp { .. } | Expr::UnaryOp { .. } => write!(f, "({})", self.0),
            other => write!(f, "{other}"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(id) => f.write_str(id),
            Expr::Constant(value) => write!(f, "{value}"),
            Expr::Call { func, args } => {
                write!(f, "{}(", Operand(&func.node))?;
                write_list(f, args)?;
                f.write_char(')')
            }
            Expr::Attribute { value, attr } => write!(f, "{}.{attr}", Operand(&value.node)),
            Expr::Compare { left, op, right } => {
                write!(f, "{} {op} {}", Operand(&left.node), Operand(&right.node))
            }
            Expr::BinOp { left, op, right } => {
                write!(f, "{} {op} {}", Operand(&left.node), Operand(&right.node))
            }
            Expr::UnaryOp { op, operand } => write!(f, "{op}{}", Operand(&operand.node)),
            Expr::Other { kind, operands } => {
                write!(f, "{kind}(")?;
                write_list(f, operands)?;
                f.write_char(')')
            }
        }
    }
}
