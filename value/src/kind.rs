use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Declared kind of a native record field.
///
/// `Integer` and `Bool` are declarable but not mappable: the engine rejects
/// them when the schema is derived instead of assigning text into them like
/// the reflection-based mappers this replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    DateTime,
    Decimal,
    Integer,
    Bool,
}

impl FieldKind {
    pub fn is_mappable(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::DateTime | FieldKind::Decimal)
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::DateTime => "datetime",
            FieldKind::Decimal => "decimal",
            FieldKind::Integer => "integer",
            FieldKind::Bool => "bool",
        };
        write!(f, "{}", name)
    }
}
