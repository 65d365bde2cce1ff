pub use datetime::parse_datetime;
pub use decimal::{Decimal, ParseDecimalError};
pub use kind::FieldKind;
pub use macros::Record;
pub use record::{FieldDescriptor, Record};
pub use value::Value;

mod datetime;
mod decimal;
mod kind;
mod record;
pub(crate) mod value;
