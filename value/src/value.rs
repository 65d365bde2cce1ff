use crate::datetime::parse_datetime;
use crate::decimal::Decimal;
use crate::kind::FieldKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A raw field value as handed over by, or handed to, an external record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Decimal(Decimal),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
    Null,
}

impl Value {
    pub fn text(string: &str) -> Value {
        Value::Text(string.to_string())
    }

    pub fn int(int: i64) -> Value {
        Value::Int(int)
    }

    pub fn bool(bool: bool) -> Value {
        Value::Bool(bool)
    }

    pub fn decimal(number: i64, shift: u8) -> Value {
        Value::Decimal(Decimal::from_parts(number, shift))
    }

    pub fn datetime(datetime: NaiveDateTime) -> Value {
        Value::DateTime(datetime)
    }

    pub fn null() -> Value {
        Value::Null
    }

    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Value::Int(_) => Some(FieldKind::Integer),
            Value::Decimal(_) => Some(FieldKind::Decimal),
            Value::Bool(_) => Some(FieldKind::Bool),
            Value::Text(_) => Some(FieldKind::Text),
            Value::DateTime(_) => Some(FieldKind::DateTime),
            Value::Null => None,
        }
    }

    pub fn as_decimal(&self) -> Result<Decimal, String> {
        match self {
            Value::Int(i) => Ok(Decimal::from_parts(*i, 0)),
            Value::Decimal(d) => Ok(*d),
            Value::Bool(b) => Ok(Decimal::from_parts(*b as i64, 0)),
            Value::Text(t) => t.parse::<Decimal>().map_err(|err| err.to_string()),
            Value::DateTime(_) => Err(String::from("DateTime cannot be converted")),
            Value::Null => Err(String::from("Null cannot be converted")),
        }
    }

    pub fn as_datetime(&self) -> Result<NaiveDateTime, String> {
        match self {
            Value::DateTime(dt) => Ok(*dt),
            Value::Text(t) => {
                parse_datetime(t).ok_or_else(|| format!("no date or time in `{}`", t))
            }
            Value::Int(_) => Err(String::from("Int cannot be converted")),
            Value::Decimal(_) => Err(String::from("Decimal cannot be converted")),
            Value::Bool(_) => Err(String::from("Bool cannot be converted")),
            Value::Null => Err(String::from("Null cannot be converted")),
        }
    }

    pub fn as_text(&self) -> Result<String, String> {
        match self {
            Value::Null => Err(String::from("Null cannot be converted")),
            other => Ok(other.to_string()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(t) => write!(f, "{}", t),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Value::Null => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(int: i64) -> Self {
        Value::Int(int)
    }
}

impl From<bool> for Value {
    fn from(bool: bool) -> Self {
        Value::Bool(bool)
    }
}

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Value::text(string)
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Value::Text(string)
    }
}

impl From<Decimal> for Value {
    fn from(decimal: Decimal) -> Self {
        Value::Decimal(decimal)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(datetime: NaiveDateTime) -> Self {
        Value::DateTime(datetime)
    }
}

impl From<Option<NaiveDateTime>> for Value {
    fn from(datetime: Option<NaiveDateTime>) -> Self {
        match datetime {
            Some(dt) => Value::DateTime(dt),
            None => Value::Null,
        }
    }
}
