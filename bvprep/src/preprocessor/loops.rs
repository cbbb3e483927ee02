//! Range-loop desugaring.
//!
//! ```text
//! for x in range(1, 5, 1):        start: int = 1
//!     print(x)                    has_next: bool = has_more(1, 5, 1)
//!                          =>     while has_next == True:
//!                                     print(start)
//!                                     start = advance(start, 1)
//!                                     has_next = has_more(start, 5, 1)
//! ```
//!
//! The induction variable is always bound to the configured fixed name, so
//! every reference to the loop target inside the body is renamed to it. A
//! range loop nested in another one copies the outer induction value into a
//! numbered slot (`start_1`, `start_2`, ...) for its duration and restores it
//! afterwards. Constructs that would make the rewritten loop behave
//! differently from the original are rejected here instead of being lowered.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use super::constants::ConstantTable;
use crate::ast::visit::{Visitor, VisitorMut, walk_expr, walk_expr_mut, walk_stmt, walk_stmt_mut};
use crate::ast::{Block, CmpOp, Expr, Span, Spanned, Stmt, TypeAnnotation, UnaryOp};
use crate::config::PassConfig;
use crate::error::{PassError, Result};

/// A for-loop recognized as iterating over `range(...)`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeLoop {
    pub target: Spanned<String>,
    pub start: Spanned<Expr>,
    pub end: Spanned<Expr>,
    pub step: Spanned<Expr>,
}

impl RangeLoop {
    /// Names read by the end and step expressions. The rewritten loop
    /// evaluates both on every iteration.
    pub fn bound_names(&self) -> Vec<String> {
        let mut collector = NameCollector::default();
        collector.visit_expr(&self.end);
        collector.visit_expr(&self.step);
        collector.names
    }

    /// Rename `from` to `to` in the start, end and step expressions
    pub fn rename(&mut self, from: &str, to: &str) {
        let mut renamer = Renamer { from, to };
        renamer.visit_expr_mut(&mut self.start);
        renamer.visit_expr_mut(&mut self.end);
        renamer.visit_expr_mut(&mut self.step);
    }
}

#[derive(Default)]
struct NameCollector {
    names: Vec<String>,
}

impl Visitor for NameCollector {
    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        if let Expr::Name(id) = &expr.node {
            if !self.names.contains(id) {
                self.names.push(id.clone());
            }
        }
        walk_expr(self, expr);
    }
}

/// Recognize `for target in range(...)`.
///
/// Returns `Ok(None)` when the iterable is not a range call; those loops are
/// left as they are.
pub fn match_range_loop(
    target: &Spanned<Expr>,
    iter: &Spanned<Expr>,
    config: &PassConfig,
    constants: &ConstantTable,
) -> Result<Option<RangeLoop>> {
    let Expr::Call { func, args } = &iter.node else {
        return Ok(None);
    };
    if func.node.as_name() != Some(config.range_fn.as_str()) {
        return Ok(None);
    }

    let Some(name) = target.node.as_name() else {
        return Err(PassError::loop_target(target.span));
    };

    let synthetic = |value: i64| Spanned::new(Expr::int(value), iter.span);
    let (start, end, step) = match args.as_slice() {
        [end] => (synthetic(0), end.clone(), synthetic(1)),
        [start, end] => (start.clone(), end.clone(), synthetic(1)),
        [start, end, step] => (start.clone(), end.clone(), step.clone()),
        _ => return Err(PassError::range_arity(args.len(), iter.span)),
    };
    check_step(&step, constants)?;

    Ok(Some(RangeLoop {
        target: Spanned::new(name.to_string(), target.span),
        start,
        end,
        step,
    }))
}

/// Reject steps that are zero or negative, looking literals and module
/// constants up. `has_more` only implements ascending iteration.
fn check_step(step: &Spanned<Expr>, constants: &ConstantTable) -> Result<()> {
    let value: Option<BigInt> = match &step.node {
        Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand,
        } => constants.resolve(&operand.node).map(|v| -v),
        other => constants.resolve(other).cloned(),
    };
    let Some(value) = value else {
        tracing::warn!(span = %step.span, step = %step.node, "range step is not a constant; assuming it is positive");
        return Ok(());
    };

    if value.is_zero() {
        Err(PassError::ZeroStep { span: step.span })
    } else if value.is_negative() {
        Err(PassError::DescendingRange {
            step: value.to_string(),
            span: step.span,
        })
    } else {
        Ok(())
    }
}

/// Slot holding the induction value of the range loop `depth` levels out
pub fn saved_induction_name(config: &PassConfig, depth: usize) -> String {
    format!("{}_{depth}", config.induction_var)
}

fn is_saved_induction_name(config: &PassConfig, name: &str) -> bool {
    name.strip_prefix(config.induction_var.as_str())
        .and_then(|rest| rest.strip_prefix('_'))
        .is_some_and(|depth| !depth.is_empty() && depth.bytes().all(|b| b.is_ascii_digit()))
}

/// Names the rewrite binds
fn is_reserved(config: &PassConfig, name: &str) -> bool {
    name == config.induction_var || name == config.has_next_var || is_saved_induction_name(config, name)
}

/// Check the original (not yet lowered) body of a range loop for constructs
/// the rewrite cannot preserve.
pub fn check_body(range: &RangeLoop, body: &[Spanned<Stmt>], config: &PassConfig) -> Result<()> {
    let target = range.target.node.as_str();
    if target == config.has_next_var || is_saved_induction_name(config, target) {
        return Err(PassError::NameCapture {
            name: target.to_string(),
            span: range.target.span,
        });
    }

    let bounds = range.bound_names();
    if let Some(name) = bounds.iter().find(|name| is_reserved(config, name.as_str())) {
        return Err(PassError::NameCapture {
            name: name.clone(),
            span: range.end.span,
        });
    }

    let mut checker = BodyChecker {
        target,
        bounds,
        config,
        loop_depth: 0,
        function_depth: 0,
        error: None,
    };
    checker.visit_block(body);
    match checker.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct BodyChecker<'a> {
    target: &'a str,
    /// Names the end and step expressions read
    bounds: Vec<String>,
    config: &'a PassConfig,
    /// Loops nested inside the body own their `continue`s
    loop_depth: usize,
    /// Nested functions are separate scopes for bindings and control flow
    function_depth: usize,
    error: Option<PassError>,
}

impl BodyChecker<'_> {
    fn fail(&mut self, err: PassError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn in_loop_scope(&self) -> bool {
        self.function_depth == 0
    }

    fn check_name(&mut self, name: &str, span: Span) {
        if name != self.target && is_reserved(self.config, name) {
            self.fail(PassError::NameCapture {
                name: name.to_string(),
                span,
            });
        }
    }

    fn check_binding(&mut self, name: &str, span: Span) {
        if !self.in_loop_scope() {
            return;
        }
        if name == self.target {
            self.fail(PassError::LoopTargetReassigned {
                name: name.to_string(),
                span,
            });
        } else if self.bounds.iter().any(|b| b == name) {
            self.fail(PassError::RangeBoundReassigned {
                name: name.to_string(),
                span,
            });
        }
    }
}

impl Visitor for BodyChecker<'_> {
    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        if self.error.is_some() {
            return;
        }
        match &stmt.node {
            Stmt::Continue if self.loop_depth == 0 && self.in_loop_scope() => {
                self.fail(PassError::ContinueInRangeLoop { span: stmt.span });
            }
            Stmt::For { target, .. } => {
                if let Some(name) = target.node.as_name() {
                    if self.in_loop_scope() && name == self.target {
                        self.fail(PassError::shadowed_loop_target(self.target, target.span));
                        return;
                    }
                    self.check_binding(name, target.span);
                }
                self.loop_depth += 1;
                walk_stmt(self, stmt);
                self.loop_depth -= 1;
            }
            Stmt::While { .. } => {
                self.loop_depth += 1;
                walk_stmt(self, stmt);
                self.loop_depth -= 1;
            }
            Stmt::FunctionDef(_) => {
                self.function_depth += 1;
                walk_stmt(self, stmt);
                self.function_depth -= 1;
            }
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        if let Expr::Name(id) = &expr.node {
            self.check_name(id, expr.span);
        }
        walk_expr(self, expr);
    }

    fn visit_target(&mut self, target: &Spanned<String>) {
        self.check_binding(&target.node, target.span);
        self.check_name(&target.node, target.span);
    }
}

/// Rename every reference to `from` in `block` to `to`.
///
/// Nested function definitions that bind `from` as a parameter introduce a
/// new scope and are skipped.
pub fn rename_in_block(block: &mut [Spanned<Stmt>], from: &str, to: &str) {
    if from == to {
        return;
    }
    let mut renamer = Renamer { from, to };
    renamer.visit_block_mut(block);
}

struct Renamer<'a> {
    from: &'a str,
    to: &'a str,
}

impl VisitorMut for Renamer<'_> {
    fn visit_stmt_mut(&mut self, stmt: &mut Spanned<Stmt>) {
        if let Stmt::FunctionDef(def) = &stmt.node {
            if def.param(self.from).is_some() {
                return;
            }
        }
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_mut(&mut self, expr: &mut Spanned<Expr>) {
        if let Expr::Name(id) = &mut expr.node {
            if *id == self.from {
                *id = self.to.to_string();
            }
        }
        walk_expr_mut(self, expr);
    }

    fn visit_target_mut(&mut self, target: &mut Spanned<String>) {
        if target.node == self.from {
            target.node = self.to.to_string();
        }
    }
}

/// Build the three statements replacing a range loop. `body` must already be
/// lowered and renamed.
pub fn desugar(range: RangeLoop, mut body: Block, span: Span, config: &PassConfig) -> Block {
    let RangeLoop { start, end, step, .. } = range;
    let sp = |node: Expr| Spanned::new(node, span);
    let induction = || sp(Expr::name(&config.induction_var));
    let call = |callee: &str, args: Vec<Spanned<Expr>>| {
        sp(Expr::Call {
            func: Box::new(sp(Expr::name(callee))),
            args,
        })
    };

    let start_assign = Stmt::AnnAssign {
        target: Spanned::new(config.induction_var.clone(), span),
        annotation: Spanned::new(TypeAnnotation::named(&config.int_type), span),
        value: Some(start.clone()),
    };
    let has_next_assign = Stmt::AnnAssign {
        target: Spanned::new(config.has_next_var.clone(), span),
        annotation: Spanned::new(TypeAnnotation::named(&config.bool_type), span),
        value: Some(call(
            config.has_more_fn.as_str(),
            vec![start, end.clone(), step.clone()],
        )),
    };

    body.push(Spanned::new(
        Stmt::Assign {
            target: Spanned::new(config.induction_var.clone(), span),
            value: call(config.advance_fn.as_str(), vec![induction(), step.clone()]),
        },
        span,
    ));
    body.push(Spanned::new(
        Stmt::Assign {
            target: Spanned::new(config.has_next_var.clone(), span),
            value: call(config.has_more_fn.as_str(), vec![induction(), end, step]),
        },
        span,
    ));

    let cond = sp(Expr::Compare {
        left: Box::new(sp(Expr::name(&config.has_next_var))),
        op: CmpOp::Eq,
        right: Box::new(sp(Expr::bool(true))),
    });

    vec![
        Spanned::new(start_assign, span),
        Spanned::new(has_next_assign, span),
        Spanned::new(Stmt::While { cond, body }, span),
    ]
}

/// Surround the fragment of a nested range loop with a copy of the enclosing
/// loop's target into `slot` and the restore of it afterwards.
pub fn preserve_enclosing(fragment: Block, outer: &str, slot: &str, span: Span, config: &PassConfig) -> Block {
    let save = Stmt::AnnAssign {
        target: Spanned::new(slot.to_string(), span),
        annotation: Spanned::new(TypeAnnotation::named(&config.int_type), span),
        value: Some(Spanned::new(Expr::name(outer), span)),
    };
    let restore = Stmt::Assign {
        target: Spanned::new(outer.to_string(), span),
        value: Spanned::new(Expr::name(slot), span),
    };

    let mut out = Vec::with_capacity(fragment.len() + 2);
    out.push(Spanned::new(save, span));
    out.extend(fragment);
    out.push(Spanned::new(restore, span));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp<T>(node: T) -> Spanned<T> {
        Spanned::new(node, Span::default())
    }

    fn range_call(args: Vec<Expr>) -> Spanned<Expr> {
        Spanned::new(
            Expr::Call {
                func: Box::new(sp(Expr::name("range"))),
                args: args.into_iter().map(sp).collect(),
            },
            Span::new(9, 20),
        )
    }

    fn recognize(target: &str, iter: &Spanned<Expr>, constants: &ConstantTable) -> Result<Option<RangeLoop>> {
        match_range_loop(&sp(Expr::name(target)), iter, &PassConfig::default(), constants)
    }

    fn matched(args: Vec<Expr>) -> RangeLoop {
        recognize("i", &range_call(args), &ConstantTable::new()).unwrap().unwrap()
    }

    fn rejected(args: Vec<Expr>) -> PassError {
        recognize("i", &range_call(args), &ConstantTable::new()).unwrap_err()
    }

    fn print(arg: Expr) -> Spanned<Stmt> {
        sp(Stmt::Expr(sp(Expr::Call {
            func: Box::new(sp(Expr::name("print"))),
            args: vec![sp(arg)],
        })))
    }

    fn assign(target: &str, value: Expr, span: Span) -> Spanned<Stmt> {
        sp(Stmt::Assign {
            target: Spanned::new(target.to_string(), span),
            value: sp(value),
        })
    }

    fn neg(operand: Expr) -> Expr {
        Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand: Box::new(sp(operand)),
        }
    }

    #[test]
    fn test_arity_defaults() {
        let one = matched(vec![Expr::name("n")]);
        assert_eq!(
            (one.start.node, one.end.node, one.step.node),
            (Expr::int(0), Expr::name("n"), Expr::int(1))
        );

        let two = matched(vec![Expr::int(2), Expr::int(9)]);
        assert_eq!(
            (two.start.node, two.end.node, two.step.node),
            (Expr::int(2), Expr::int(9), Expr::int(1))
        );

        let three = matched(vec![Expr::int(2), Expr::int(9), Expr::int(3)]);
        assert_eq!(three.step.node, Expr::int(3));
        assert_eq!(three.target.node, "i");
    }

    #[test]
    fn test_non_range_iterable_not_matched() {
        let iter = sp(Expr::Call {
            func: Box::new(sp(Expr::name("enumerate"))),
            args: vec![sp(Expr::name("xs"))],
        });
        assert_eq!(recognize("i", &iter, &ConstantTable::new()), Ok(None));
        assert_eq!(recognize("i", &sp(Expr::name("xs")), &ConstantTable::new()), Ok(None));
    }

    #[test]
    fn test_empty_range_rejected() {
        assert_eq!(rejected(vec![]), PassError::range_arity(0, Span::new(9, 20)));
    }

    #[test]
    fn test_four_arguments_rejected() {
        let err = rejected(vec![Expr::int(0), Expr::int(1), Expr::int(1), Expr::int(1)]);
        assert!(matches!(err, PassError::RangeArity { found: 4, .. }));
    }

    #[test]
    fn test_tuple_target_rejected() {
        let target = Spanned::new(
            Expr::Other {
                kind: "tuple".to_string(),
                operands: vec![sp(Expr::name("a")), sp(Expr::name("b"))],
            },
            Span::new(4, 8),
        );
        let err = match_range_loop(
            &target,
            &range_call(vec![Expr::int(3)]),
            &PassConfig::default(),
            &ConstantTable::new(),
        )
        .unwrap_err();
        assert_eq!(err, PassError::loop_target(Span::new(4, 8)));
    }

    #[test]
    fn test_descending_and_zero_steps_rejected() {
        let negative = rejected(vec![Expr::int(10), Expr::int(0), Expr::int(-1)]);
        assert!(matches!(negative, PassError::DescendingRange { .. }));

        let negated = rejected(vec![Expr::int(10), Expr::int(0), neg(Expr::int(2))]);
        assert!(matches!(negated, PassError::DescendingRange { ref step, .. } if step == "-2"));

        let zero = rejected(vec![Expr::int(0), Expr::int(5), Expr::int(0)]);
        assert!(matches!(zero, PassError::ZeroStep { .. }));
    }

    #[test]
    fn test_step_resolved_through_constants() {
        let mut constants = ConstantTable::new();
        constants.observe("down", &Expr::int(-1));
        constants.observe("up", &Expr::int(2));
        constants.observe("none", &Expr::int(0));

        let iter = range_call(vec![Expr::int(10), Expr::int(0), Expr::name("down")]);
        assert!(matches!(
            recognize("i", &iter, &constants),
            Err(PassError::DescendingRange { ref step, .. }) if step == "-1"
        ));

        let iter = range_call(vec![Expr::int(10), Expr::int(0), neg(Expr::name("up"))]);
        assert!(matches!(
            recognize("i", &iter, &constants),
            Err(PassError::DescendingRange { ref step, .. }) if step == "-2"
        ));

        let iter = range_call(vec![Expr::int(0), Expr::int(10), Expr::name("none")]);
        assert!(matches!(recognize("i", &iter, &constants), Err(PassError::ZeroStep { .. })));

        let iter = range_call(vec![Expr::int(0), Expr::int(10), Expr::name("up")]);
        assert!(recognize("i", &iter, &constants).unwrap().is_some());
    }

    #[test]
    fn test_symbolic_step_accepted() {
        let range = matched(vec![Expr::int(0), Expr::name("n"), Expr::name("k")]);
        assert_eq!(range.step.node, Expr::name("k"));

        let range = matched(vec![Expr::int(0), Expr::name("n"), neg(Expr::name("k"))]);
        assert_eq!(range.step.node, neg(Expr::name("k")));
    }

    #[test]
    fn test_bound_names_and_rename() {
        let mut range = matched(vec![Expr::name("i0"), Expr::name("n"), Expr::name("k")]);
        assert_eq!(range.bound_names(), vec!["n".to_string(), "k".to_string()]);

        range.rename("n", "start_1");
        assert_eq!(range.end.node, Expr::name("start_1"));
        assert_eq!(range.start.node, Expr::name("i0"));
    }

    #[test]
    fn test_rename_is_scope_local() {
        let mut body = vec![print(Expr::name("i")), assign("j", Expr::name("i"), Span::default())];
        rename_in_block(&mut body, "i", "start");
        assert_eq!(body[0], print(Expr::name("start")));
        assert_eq!(body[1], assign("j", Expr::name("start"), Span::default()));

        let once = body.clone();
        rename_in_block(&mut body, "i", "start");
        assert_eq!(body, once);
    }

    #[test]
    fn test_rename_skips_function_rebinding_name() {
        let inner = sp(Stmt::FunctionDef(crate::ast::FunctionDef {
            name: sp("g".to_string()),
            params: vec![crate::ast::Param {
                name: sp("i".to_string()),
                annotation: None,
            }],
            returns: None,
            body: vec![print(Expr::name("i"))],
        }));
        let mut body = vec![inner.clone()];
        rename_in_block(&mut body, "i", "start");
        assert_eq!(body[0], inner);
    }

    #[test]
    fn test_continue_rejected_but_inner_loop_continue_allowed() {
        let range = matched(vec![Expr::int(3)]);
        let config = PassConfig::default();

        let body = vec![Spanned::new(Stmt::Continue, Span::new(30, 38))];
        assert_eq!(
            check_body(&range, &body, &config),
            Err(PassError::ContinueInRangeLoop {
                span: Span::new(30, 38)
            })
        );

        let body = vec![sp(Stmt::While {
            cond: sp(Expr::name("c")),
            body: vec![sp(Stmt::Continue)],
        })];
        assert_eq!(check_body(&range, &body, &config), Ok(()));
    }

    #[test]
    fn test_reassigning_target_rejected() {
        let range = matched(vec![Expr::int(3)]);
        let body = vec![assign("i", Expr::int(10), Span::default())];
        assert!(matches!(
            check_body(&range, &body, &PassConfig::default()),
            Err(PassError::LoopTargetReassigned { .. })
        ));
    }

    #[test]
    fn test_reassigning_range_bound_rejected() {
        let range = matched(vec![Expr::name("n")]);
        let grow = Expr::BinOp {
            left: Box::new(sp(Expr::name("n"))),
            op: crate::ast::BinOp::Add,
            right: Box::new(sp(Expr::int(1))),
        };
        let body = vec![assign("n", grow, Span::new(21, 22)), print(Expr::name("i"))];
        assert_eq!(
            check_body(&range, &body, &PassConfig::default()),
            Err(PassError::RangeBoundReassigned {
                name: "n".to_string(),
                span: Span::new(21, 22),
            })
        );

        let step_bound = matched(vec![Expr::int(0), Expr::int(9), Expr::name("k")]);
        let body = vec![sp(Stmt::For {
            target: Spanned::new(Expr::name("k"), Span::new(30, 31)),
            iter: sp(Expr::name("ks")),
            body: vec![],
        })];
        assert!(matches!(
            check_body(&step_bound, &body, &PassConfig::default()),
            Err(PassError::RangeBoundReassigned { ref name, .. }) if name == "k"
        ));
    }

    #[test]
    fn test_range_bound_rebound_in_nested_function_allowed() {
        let range = matched(vec![Expr::name("n")]);
        let body = vec![sp(Stmt::FunctionDef(crate::ast::FunctionDef {
            name: sp("g".to_string()),
            params: vec![],
            returns: None,
            body: vec![assign("n", Expr::int(0), Span::default())],
        }))];
        assert_eq!(check_body(&range, &body, &PassConfig::default()), Ok(()));
    }

    #[test]
    fn test_same_target_nested_rejected() {
        let range = matched(vec![Expr::int(3)]);
        let body = vec![sp(Stmt::For {
            target: Spanned::new(Expr::name("i"), Span::new(44, 45)),
            iter: range_call(vec![Expr::int(2)]),
            body: vec![],
        })];
        assert_eq!(
            check_body(&range, &body, &PassConfig::default()),
            Err(PassError::shadowed_loop_target("i", Span::new(44, 45)))
        );
    }

    #[test]
    fn test_reserved_names_in_body_rejected() {
        let range = matched(vec![Expr::int(3)]);
        for reserved in ["start", "has_next", "start_1", "start_12"] {
            let body = vec![print(Expr::name(reserved))];
            assert!(matches!(
                check_body(&range, &body, &PassConfig::default()),
                Err(PassError::NameCapture { ref name, .. }) if name == reserved
            ));
        }

        let body = vec![print(Expr::name("start_x")), print(Expr::name("starts"))];
        assert_eq!(check_body(&range, &body, &PassConfig::default()), Ok(()));
    }

    #[test]
    fn test_target_named_like_induction_variable_allowed() {
        let range = recognize("start", &range_call(vec![Expr::int(3)]), &ConstantTable::new())
            .unwrap()
            .unwrap();
        let body = vec![print(Expr::name("start"))];
        assert_eq!(check_body(&range, &body, &PassConfig::default()), Ok(()));
    }

    #[test]
    fn test_bound_reading_induction_variable_rejected() {
        let range = recognize("i", &range_call(vec![Expr::name("start")]), &ConstantTable::new())
            .unwrap()
            .unwrap();
        assert!(matches!(
            check_body(&range, &[], &PassConfig::default()),
            Err(PassError::NameCapture { ref name, .. }) if name == "start"
        ));

        let from_start = matched(vec![Expr::name("start"), Expr::int(10)]);
        assert_eq!(check_body(&from_start, &[], &PassConfig::default()), Ok(()));
    }

    #[test]
    fn test_target_named_like_synthesized_flag_rejected() {
        for name in ["has_next", "start_2"] {
            let range = recognize(name, &range_call(vec![Expr::int(3)]), &ConstantTable::new())
                .unwrap()
                .unwrap();
            assert!(matches!(
                check_body(&range, &[], &PassConfig::default()),
                Err(PassError::NameCapture { .. })
            ));
        }
    }

    #[test]
    fn test_desugar_shape() {
        let config = PassConfig::default();
        let range = matched(vec![Expr::int(1), Expr::int(5), Expr::int(1)]);
        let stmts = desugar(range, vec![print(Expr::name("start"))], Span::new(0, 30), &config);
        assert_eq!(stmts.len(), 3);
        assert!(stmts.iter().all(|s| s.span == Span::new(0, 30)));

        let Stmt::While { cond, body } = &stmts[2].node else {
            panic!("expected while, got {:?}", stmts[2].node);
        };
        assert_eq!(cond.node.to_string(), "has_next == True");
        assert_eq!(body.len(), 3);
        assert_eq!(body[1].node.to_string(), "start = ESBMC_range_next_(start, 1)\n");
        assert_eq!(
            body[2].node.to_string(),
            "has_next = ESBMC_range_has_next_(start, 5, 1)\n"
        );
        assert_eq!(stmts[0].node.to_string(), "start: int = 1\n");
        assert_eq!(
            stmts[1].node.to_string(),
            "has_next: bool = ESBMC_range_has_next_(1, 5, 1)\n"
        );
    }

    #[test]
    fn test_preserve_enclosing_wraps_fragment() {
        let config = PassConfig::default();
        let fragment = vec![sp(Stmt::Pass)];
        let stmts = preserve_enclosing(fragment, "i", "start_1", Span::new(3, 9), &config);
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0].node.to_string(), "start_1: int = i\n");
        assert_eq!(stmts[1].node, Stmt::Pass);
        assert_eq!(stmts[2].node.to_string(), "i = start_1\n");
        assert_eq!(saved_induction_name(&config, 1), "start_1");
    }
}
