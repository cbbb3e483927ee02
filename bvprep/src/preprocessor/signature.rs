//! Signature annotation: attach an inferred width to every integer-typed
//! parameter of every function definition in the tree.

use super::profile::SizeProfile;
use crate::ast::visit::{VisitorMut, walk_stmt_mut};
use crate::ast::{FunctionDef, Spanned, Stmt};
use crate::config::PassConfig;
use crate::error::{PassError, Result};

/// Annotate all function definitions in `block`, including nested ones.
/// Returns the number of parameters that received a width.
pub fn annotate(block: &mut [Spanned<Stmt>], profile: &SizeProfile, config: &PassConfig) -> Result<usize> {
    let mut annotator = SignatureAnnotator {
        profile,
        config,
        annotated: 0,
        error: None,
    };
    annotator.visit_block_mut(block);
    match annotator.error {
        Some(err) => Err(err),
        None => Ok(annotator.annotated),
    }
}

/// Width the parameters of `function` should carry
pub fn inferred_width(function: &str, profile: &SizeProfile, config: &PassConfig) -> u64 {
    profile.width(function).unwrap_or(config.default_width)
}

struct SignatureAnnotator<'a> {
    profile: &'a SizeProfile,
    config: &'a PassConfig,
    annotated: usize,
    error: Option<PassError>,
}

impl SignatureAnnotator<'_> {
    fn annotate_function(&mut self, def: &mut FunctionDef) -> Result<()> {
        let function = def.name.node.as_str();
        let width = inferred_width(function, self.profile, self.config);

        let mut int_params = def
            .params
            .iter_mut()
            .filter_map(|p| p.annotation.as_mut())
            .filter(|ann| ann.node.is(&self.config.int_type))
            .peekable();
        if int_params.peek().is_none() {
            return Ok(());
        }

        if let Some(ceiling) = self.config.max_width {
            if width > ceiling {
                let span = self.profile.get(function).map_or(def.name.span, |e| e.span);
                return Err(PassError::width_ceiling(function, width, ceiling, span));
            }
        }

        for ann in int_params {
            ann.node.width = Some(width);
            self.annotated += 1;
        }
        tracing::trace!(function, width, "annotated signature");
        Ok(())
    }
}

impl VisitorMut for SignatureAnnotator<'_> {
    fn visit_stmt_mut(&mut self, stmt: &mut Spanned<Stmt>) {
        if self.error.is_some() {
            return;
        }
        if let Stmt::FunctionDef(def) = &mut stmt.node {
            if let Err(err) = self.annotate_function(def) {
                self.error = Some(err);
                return;
            }
        }
        walk_stmt_mut(self, stmt);
    }
}
