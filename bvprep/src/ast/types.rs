//! Type annotations

use serde::{Deserialize, Serialize};

/// Declared type of a parameter or annotated assignment.
///
/// `width` is only ever set by the signature annotator, and only on
/// integer-typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAnnotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
}

impl TypeAnnotation {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: None,
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

impl std::fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.width {
            Some(width) => write!(f, "{}<{width}>", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
