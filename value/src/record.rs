use crate::kind::FieldKind;
use crate::value::Value;
use std::fmt::{Debug, Formatter};

/// One entry of a record type's schema table: a named field, its declared
/// kind and the accessor pair the mapping engine drives.
pub struct FieldDescriptor<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub get: fn(&T) -> Value,
    pub set: fn(&mut T, Value),
}

impl<T> Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldDescriptor<T> {}

/// A native record type that can take part in mapping. The schema table is
/// re-derived on every call to `fields` and never cached across calls.
///
/// Usually generated with `#[derive(Record)]`, but hand-written impls are
/// equally valid.
pub trait Record: Default {
    fn fields() -> Vec<FieldDescriptor<Self>>
    where
        Self: Sized;
}
