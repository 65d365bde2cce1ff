use std::collections::BTreeMap;
use thiserror::Error;
use value::Value;

/// Failure surfaced by a structure's accessors. `UnknownField` and
/// `IncompatibleValue` are capability rejections, everything else lands in
/// `Other`.
#[derive(Debug, Error, PartialEq)]
pub enum StructureError {
    #[error("no field named {0}")]
    UnknownField(String),

    #[error("field {0} cannot hold the given value")]
    IncompatibleValue(String),

    #[error("{0}")]
    Other(String),
}

impl StructureError {
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StructureError::UnknownField(_) | StructureError::IncompatibleValue(_)
        )
    }
}

/// A single row-like record owned by the middleware, accessed by field name
/// only. The mapper reads and writes through these three accessors and never
/// iterates the record's own schema.
pub trait Structure {
    fn get_value(&self, field: &str) -> Result<Value, StructureError>;

    fn get_string(&self, field: &str) -> Result<String, StructureError>;

    fn set_value(&mut self, field: &str, value: Value) -> Result<(), StructureError>;
}

/// In-memory row with a fixed field set. Stands in for middleware rows in
/// tests and caller smoke setups; reads and writes against undeclared names
/// are rejected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStructure {
    values: BTreeMap<String, Value>,
}

impl MemoryStructure {
    pub fn new<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        MemoryStructure {
            values: fields
                .into_iter()
                .map(|field| (field.to_string(), Value::Null))
                .collect(),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        MemoryStructure {
            values: pairs
                .into_iter()
                .map(|(field, value)| (field.to_string(), value))
                .collect(),
        }
    }
}

impl Structure for MemoryStructure {
    fn get_value(&self, field: &str) -> Result<Value, StructureError> {
        self.values
            .get(field)
            .cloned()
            .ok_or_else(|| StructureError::UnknownField(field.to_string()))
    }

    fn get_string(&self, field: &str) -> Result<String, StructureError> {
        self.get_value(field).map(|value| value.to_string())
    }

    fn set_value(&mut self, field: &str, value: Value) -> Result<(), StructureError> {
        match self.values.get_mut(field) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StructureError::UnknownField(field.to_string())),
        }
    }
}
