//! Error types and reporting

use crate::ast::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PassError>;

/// A construct the pass cannot lower soundly.
///
/// Any of these aborts the whole module; the caller never sees a
/// partially rewritten tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PassError {
    #[error("range() takes 1 to 3 positional arguments, found {found}")]
    RangeArity { found: usize, span: Span },

    #[error("for-loop target over a range must be a simple name")]
    LoopTarget { span: Span },

    #[error("range() step must not be zero")]
    ZeroStep { span: Span },

    #[error("descending range (step {step}) is not supported")]
    DescendingRange { step: String, span: Span },

    #[error("loop variable '{name}' shadows the variable of an enclosing range loop")]
    ShadowedLoopTarget { name: String, span: Span },

    #[error("'continue' inside a range loop would skip the induction step")]
    ContinueInRangeLoop { span: Span },

    #[error("assigning to loop variable '{name}' would change the iteration of the rewritten loop")]
    LoopTargetReassigned { name: String, span: Span },

    #[error("assigning to '{name}' inside the loop would change the bounds of the rewritten range")]
    RangeBoundReassigned { name: String, span: Span },

    #[error("'{name}' is reserved for the rewritten loop and cannot be used in its body")]
    NameCapture { name: String, span: Span },

    #[error(
        "function '{function}' needs {width}-bit integer parameters but the backend supports at most {ceiling} bits"
    )]
    WidthCeiling {
        function: String,
        width: u64,
        ceiling: u64,
        span: Span,
    },

    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl PassError {
    pub fn range_arity(found: usize, span: Span) -> Self {
        Self::RangeArity { found, span }
    }

    pub fn loop_target(span: Span) -> Self {
        Self::LoopTarget { span }
    }

    pub fn shadowed_loop_target(name: impl Into<String>, span: Span) -> Self {
        Self::ShadowedLoopTarget {
            name: name.into(),
            span,
        }
    }

    pub fn width_ceiling(function: impl Into<String>, width: u64, ceiling: u64, span: Span) -> Self {
        Self::WidthCeiling {
            function: function.into(),
            width,
            ceiling,
            span,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::RangeArity { span, .. }
            | Self::LoopTarget { span }
            | Self::ZeroStep { span }
            | Self::DescendingRange { span, .. }
            | Self::ShadowedLoopTarget { span, .. }
            | Self::ContinueInRangeLoop { span }
            | Self::LoopTargetReassigned { span, .. }
            | Self::RangeBoundReassigned { span, .. }
            | Self::NameCapture { span, .. }
            | Self::WidthCeiling { span, .. } => Some(*span),
            Self::Config { .. } | Self::Io { .. } => None,
        }
    }

    /// Short category used as the report headline
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RangeArity { .. }
            | Self::LoopTarget { .. }
            | Self::ZeroStep { .. }
            | Self::DescendingRange { .. }
            | Self::ShadowedLoopTarget { .. }
            | Self::ContinueInRangeLoop { .. }
            | Self::LoopTargetReassigned { .. }
            | Self::RangeBoundReassigned { .. }
            | Self::NameCapture { .. } => "Loop lowering",
            Self::WidthCeiling { .. } => "Width inference",
            Self::Config { .. } => "Config",
            Self::Io { .. } => "IO",
        }
    }
}

impl From<std::io::Error> for PassError {
    fn from(e: std::io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

/// Report error with ariadne against the source the tree was parsed from
pub fn report_error(filename: &str, source: &str, error: &PassError) -> std::io::Result<()> {
    build_report(filename, error, true).eprint((filename, ariadne::Source::from(source)))
}

/// Render the same report without colors into `out`
pub fn write_error(
    filename: &str,
    source: &str,
    error: &PassError,
    out: &mut impl std::io::Write,
) -> std::io::Result<()> {
    build_report(filename, error, false).write((filename, ariadne::Source::from(source)), out)
}

fn build_report<'a>(
    filename: &'a str,
    error: &PassError,
    color: bool,
) -> ariadne::Report<'a, (&'a str, std::ops::Range<usize>)> {
    use ariadne::{Color, Config, Label, Report, ReportKind};

    let kind = error.kind();
    let config = Config::default().with_color(color);

    match error.span() {
        Some(span) => Report::build(ReportKind::Error, (filename, span.into()))
            .with_config(config)
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, span.into()))
                    .with_message(error.to_string())
                    .with_color(Color::Red),
            )
            .finish(),
        None => Report::build(ReportKind::Error, (filename, 0..0))
            .with_config(config)
            .with_message(format!("{kind} error: {error}"))
            .finish(),
    }
}
