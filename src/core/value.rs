/// Value Module
///
/// Dynamic values exchanged between row cursors, parameter sinks and records.
use crate::core::record::Record;
use crate::core::{FlashError, Result};
use crate::table::Table;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Runtime type tag of a [`Value`], also used as the declared type of a member
/// or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    Text,
    Bytes,
    DateTime,
    Date,
    Uuid,
    Enum,
    List,
    Record,
    Table,
}

impl ValueType {
    /// Whether values of this type are tabulized item-valued: integral and
    /// floating primitives, text, date/time and fixed-point decimal.
    pub fn is_simple(self) -> bool {
        matches!(
            self,
            ValueType::Bool
                | ValueType::I16
                | ValueType::I32
                | ValueType::I64
                | ValueType::F32
                | ValueType::F64
                | ValueType::Decimal
                | ValueType::Text
                | ValueType::DateTime
                | ValueType::Date
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::Decimal => "decimal",
            ValueType::Text => "text",
            ValueType::Bytes => "bytes",
            ValueType::DateTime => "datetime",
            ValueType::Date => "date",
            ValueType::Uuid => "uuid",
            ValueType::Enum => "enum",
            ValueType::List => "list",
            ValueType::Record => "record",
            ValueType::Table => "table",
        };
        f.write_str(name)
    }
}

/// A single dynamically-typed value.
///
/// `List` is any enumerable other than text and raw bytes, which have their own
/// variants. `Record` shares a composite object so that collections of records
/// can be carried as parameter values.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Uuid(Uuid),
    /// Canonical variant name of an enumeration member
    Enum(&'static str),
    List(Vec<Value>),
    Record(Arc<dyn Record>),
    Table(Table),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::I16(_) => ValueType::I16,
            Value::I32(_) => ValueType::I32,
            Value::I64(_) => ValueType::I64,
            Value::F32(_) => ValueType::F32,
            Value::F64(_) => ValueType::F64,
            Value::Decimal(_) => ValueType::Decimal,
            Value::Text(_) => ValueType::Text,
            Value::Bytes(_) => ValueType::Bytes,
            Value::DateTime(_) => ValueType::DateTime,
            Value::Date(_) => ValueType::Date,
            Value::Uuid(_) => ValueType::Uuid,
            Value::Enum(_) => ValueType::Enum,
            Value::List(_) => ValueType::List,
            Value::Record(_) => ValueType::Record,
            Value::Table(_) => ValueType::Table,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Wraps a record so it can travel inside a list parameter.
    pub fn record<R: Record + 'static>(record: R) -> Self {
        Value::Record(Arc::new(record))
    }

    /// Builds a list value from anything convertible into values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            (Value::Table(a), Value::Table(b)) => a == b,
            _ => false,
        }
    }
}

/// Conversion from a dynamic [`Value`] into a concrete Rust type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(FlashError::Conversion {
                            expected: ValueType::$variant,
                            found: other.value_type(),
                        }),
                    }
                }
            }
        )*
    };
}

value_conversions! {
    bool => Bool,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => Text,
    Vec<u8> => Bytes,
    NaiveDateTime => DateTime,
    NaiveDate => Date,
    Uuid => Uuid,
    Table => Table,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_types() {
        assert!(ValueType::I32.is_simple());
        assert!(ValueType::Text.is_simple());
        assert!(ValueType::Decimal.is_simple());
        assert!(ValueType::DateTime.is_simple());
        assert!(!ValueType::Bytes.is_simple());
        assert!(!ValueType::Uuid.is_simple());
        assert!(!ValueType::Record.is_simple());
        assert!(!ValueType::Enum.is_simple());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(i32::from_value(Value::I32(7)).unwrap(), 7);
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<String>::from_value("x".into()).unwrap(), Some("x".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);

        match i64::from_value(Value::I32(1)) {
            Err(FlashError::Conversion { expected, found }) => {
                assert_eq!(expected, ValueType::I64);
                assert_eq!(found, ValueType::I32);
            }
            other => panic!("Expected conversion error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_builder() {
        let list = Value::list([1, 2, 3]);
        assert_eq!(list, Value::List(vec![Value::I32(1), Value::I32(2), Value::I32(3)]));
        assert_eq!(list.value_type(), ValueType::List);
    }
}
