use thiserror::Error;

/// Boxed low-level cause kept on the error chain for diagnosis.
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single field while mapping a record. Every variant names the
/// offending field; the whole enclosing operation aborts on the first one.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("could not convert field {field}")]
    Conversion { field: String, source: Cause },

    #[error("field {field} was rejected by the record")]
    Rejected { field: String, source: Cause },

    #[error("unknown failure while mapping field {field}")]
    Unclassified { field: String, source: Cause },

    #[error("unsupported field kind {kind} for field {field}")]
    UnsupportedKind { field: String, kind: String },
}

impl MapError {
    pub fn conversion(field: &str, source: impl Into<Cause>) -> MapError {
        MapError::Conversion {
            field: field.to_string(),
            source: source.into(),
        }
    }

    pub fn rejected(field: &str, source: impl Into<Cause>) -> MapError {
        MapError::Rejected {
            field: field.to_string(),
            source: source.into(),
        }
    }

    pub fn unclassified(field: &str, source: impl Into<Cause>) -> MapError {
        MapError::Unclassified {
            field: field.to_string(),
            source: source.into(),
        }
    }

    pub fn unsupported_kind(field: &str, kind: &str) -> MapError {
        MapError::UnsupportedKind {
            field: field.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Name of the field that caused the failure.
    pub fn field(&self) -> &str {
        match self {
            MapError::Conversion { field, .. }
            | MapError::Rejected { field, .. }
            | MapError::Unclassified { field, .. }
            | MapError::UnsupportedKind { field, .. } => field,
        }
    }
}
