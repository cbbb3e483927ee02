//! Pass configuration
//!
//! Names of the constructs the pass recognizes and emits, plus the width
//! policy. Defaults match the Python front end and the stepping primitives
//! its verification runtime provides; a TOML file can override any field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PassError, Result};

/// Width given to integer parameters without evidence of larger values
pub const DEFAULT_WIDTH: u64 = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassConfig {
    /// Callee that produces an iterable range
    pub range_fn: String,
    /// `advance(current, step) -> current + step`
    pub advance_fn: String,
    /// `has_more(current, end, step) -> current + step <= end`
    pub has_more_fn: String,
    /// Name the desugared loop binds its induction variable to
    pub induction_var: String,
    /// Name of the loop-continuation flag
    pub has_next_var: String,
    /// Declared type name that marks integer parameters
    pub int_type: String,
    /// Declared type name used for the loop-continuation flag
    pub bool_type: String,
    /// Base of the `int.from_bytes` style conversion
    pub from_bytes_base: String,
    /// Conversion members whose byte-order argument is normalized
    pub from_bytes_methods: Vec<String>,
    /// Width used when no call site provides evidence
    pub default_width: u64,
    /// Largest width the backend can encode, if it has a limit
    pub max_width: Option<u64>,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            range_fn: "range".to_string(),
            advance_fn: "ESBMC_range_next_".to_string(),
            has_more_fn: "ESBMC_range_has_next_".to_string(),
            induction_var: "start".to_string(),
            has_next_var: "has_next".to_string(),
            int_type: "int".to_string(),
            bool_type: "bool".to_string(),
            from_bytes_base: "int".to_string(),
            from_bytes_methods: vec!["from_bytes".to_string()],
            default_width: DEFAULT_WIDTH,
            max_width: None,
        }
    }
}

impl PassConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PassConfig = toml::from_str(text).map_err(|e| PassError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PassError::io_error(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Set the backend width ceiling
    pub fn max_width(mut self, ceiling: Option<u64>) -> Self {
        self.max_width = ceiling;
        self
    }

    /// Set the fallback width
    pub fn default_width(mut self, width: u64) -> Self {
        self.default_width = width;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_width == 0 {
            return Err(PassError::config("default_width must be positive"));
        }
        if let Some(ceiling) = self.max_width {
            if ceiling < self.default_width {
                return Err(PassError::config(format!(
                    "max_width ({ceiling}) is smaller than default_width ({})",
                    self.default_width
                )));
            }
        }
        if self.induction_var == self.has_next_var {
            return Err(PassError::config(
                "induction_var and has_next_var must be different names",
            ));
        }
        Ok(())
    }

    pub fn is_from_bytes(&self, base: &str, method: &str) -> bool {
        base == self.from_bytes_base && self.from_bytes_methods.iter().any(|m| m == method)
    }
}
