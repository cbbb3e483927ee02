//! Verification preprocessor
//!
//! Rewrites a module so a fixed-width bounded model checker can consume it:
//! - `for x in range(...)` loops become while-loops over two runtime
//!   stepping primitives
//! - integer parameters get a bit-width inferred from the constants passed
//!   to them anywhere in the module (32 without evidence)
//! - `int.from_bytes(buf, "big")` byte-order tags become booleans
//!
//! The work runs in four phases that must not be reordered: constants are
//! collected before calls are profiled, and every call in the module is
//! profiled before any signature is annotated, so a call that textually
//! follows a definition still widens it.

mod byte_order;
mod constants;
mod loops;
mod profile;
mod signature;
mod sweep;

pub use constants::ConstantTable;
pub use loops::{RangeLoop, match_range_loop, rename_in_block};
pub use profile::{ProfileEntry, SizeProfile, bit_length, profile_calls};
pub use signature::{annotate, inferred_width};
pub use sweep::{Sweep, SweepStats};

use crate::ast::Module;
use crate::config::PassConfig;
use crate::error::Result;

/// Everything one run of the pass produced
#[derive(Debug, Clone)]
pub struct PassOutput {
    pub module: Module,
    pub constants: ConstantTable,
    pub profile: SizeProfile,
    pub stats: PassStats,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    pub calls_profiled: usize,
    pub params_annotated: usize,
    pub loops_lowered: usize,
    pub byte_orders_rewritten: usize,
}

/// Preprocessor state
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PassConfig,
}

impl Preprocessor {
    pub fn new(config: PassConfig) -> Self {
        Self { config }
    }

    /// Run all four phases over `module`.
    ///
    /// Either the whole module is rewritten or an error locating the first
    /// offending construct is returned.
    #[tracing::instrument(level = "debug", skip_all, fields(stmts = module.body.len()))]
    pub fn run(&self, mut module: Module) -> Result<PassOutput> {
        self.config.validate()?;

        // Phase 1: literal assignments at module level
        let mut constants = ConstantTable::new();
        constants.record_assignments(&module.body);
        tracing::debug!(constants = constants.len(), "collected constants");

        // Phase 2: every call site in the module
        let mut profile = SizeProfile::new();
        let calls_profiled = profile_calls(&module.body, &constants, &mut profile);
        tracing::debug!(calls = calls_profiled, wide = profile.len(), "profiled call sites");

        // Phase 3: signatures, now that all evidence is in
        let params_annotated = annotate(&mut module.body, &profile, &self.config)?;
        tracing::debug!(params = params_annotated, "annotated signatures");

        // Phase 4: structural lowering over the whole tree
        let mut sweep = Sweep::new(&self.config, &constants);
        module.body = sweep.block(std::mem::take(&mut module.body))?;
        let swept = sweep.stats();
        tracing::debug!(
            loops = swept.loops_lowered,
            byte_orders = swept.byte_orders_rewritten,
            "lowered module"
        );

        Ok(PassOutput {
            module,
            constants,
            profile,
            stats: PassStats {
                calls_profiled,
                params_annotated,
                loops_lowered: swept.loops_lowered,
                byte_orders_rewritten: swept.byte_orders_rewritten,
            },
        })
    }
}

/// Convenience function to run the pass with the default configuration
pub fn preprocess(module: Module) -> Result<Module> {
    Preprocessor::default().run(module).map(|out| out.module)
}

/// Run the pass with an explicit configuration
pub fn preprocess_with(module: Module, config: &PassConfig) -> Result<Module> {
    Preprocessor::new(config.clone()).run(module).map(|out| out.module)
}
