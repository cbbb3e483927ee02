//! bvprep: verification preprocessing for Python syntax trees
//!
//! Lowers range-based `for` loops to while-loops over runtime stepping
//! primitives and infers a bit-width for every integer parameter, so a
//! fixed-width bounded model checker can consume the module.

pub mod ast;
pub mod config;
pub mod error;
pub mod preprocessor;

pub use ast::{Module, Span};
pub use config::PassConfig;
pub use error::{PassError, Result};
pub use preprocessor::{PassOutput, Preprocessor, preprocess, preprocess_with};
