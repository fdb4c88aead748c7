//! Row cursors, row materialization and the row pump.
use crate::core::{FlashError, FromValue, Record, Result, Value, ValueType};
use crate::path;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::trace;
use uuid::Uuid;

/// Sequential reader over one query result.
///
/// Field accessors refer to the row the cursor was last advanced onto.
pub trait RowCursor {
    /// Moves to the next row; `false` once the result is exhausted.
    fn advance(&mut self) -> Result<bool>;

    fn field_count(&self) -> usize;

    fn field_name(&self, index: usize) -> Option<&str>;

    fn field_type(&self, index: usize) -> ValueType;

    fn is_null(&self, index: usize) -> bool;

    fn value(&self, index: usize) -> Result<Value>;

    fn field_index(&self, name: &str) -> Option<usize> {
        (0..self.field_count()).find(|&i| self.field_name(i) == Some(name))
    }
}

/// Types that can be materialized from the current row of a cursor.
pub trait FromRow: Sized {
    fn from_row(row: &dyn RowCursor) -> Result<Self>;
}

impl<T: Record + Default> FromRow for T {
    fn from_row(row: &dyn RowCursor) -> Result<Self> {
        bind_record(row)
    }
}

/// Binds every non-null field of the current row onto a default `T`, using the
/// field name as a property path.
pub fn bind_record<T: Record + Default>(row: &dyn RowCursor) -> Result<T> {
    let mut target = T::default();
    for index in 0..row.field_count() {
        if row.is_null(index) {
            continue;
        }
        let Some(name) = row.field_name(index) else {
            trace!("Skipping unnamed field {}", index);
            continue;
        };
        let value = row.value(index)?;
        path::bind(&mut target, name, value)?;
    }
    Ok(target)
}

/// Returns the only field of the row when its declared type is `ty`;
/// otherwise the default value of `T`.
fn bind_scalar<T: FromValue + Default>(row: &dyn RowCursor, ty: ValueType) -> Result<T> {
    if row.field_count() == 1 && row.field_type(0) == ty && !row.is_null(0) {
        return T::from_value(row.value(0)?);
    }
    Ok(T::default())
}

macro_rules! scalar_rows {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromRow for $ty {
                fn from_row(row: &dyn RowCursor) -> Result<Self> {
                    bind_scalar(row, ValueType::$variant)
                }
            }
        )*
    };
}

scalar_rows! {
    bool => Bool,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => Text,
    Vec<u8> => Bytes,
}

// chrono and uuid types have no meaningful default, so these require the
// single-column shortcut to apply.
macro_rules! strict_scalar_rows {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromRow for $ty {
                fn from_row(row: &dyn RowCursor) -> Result<Self> {
                    if row.field_count() == 1 && row.field_type(0) == ValueType::$variant {
                        return <$ty>::from_value(row.value(0)?);
                    }
                    Err(FlashError::Conversion {
                        expected: ValueType::$variant,
                        found: row.field_type(0),
                    })
                }
            }
        )*
    };
}

strict_scalar_rows! {
    NaiveDateTime => DateTime,
    NaiveDate => Date,
    Uuid => Uuid,
}

/// Materializes the current row as `T`.
pub fn bind<T: FromRow>(row: &dyn RowCursor) -> Result<T> {
    T::from_row(row)
}

/// Drives `cursor` to completion, calling `f` on each row. The first error from
/// `f` stops the pump and is returned as raised.
pub fn process_rows<C, F, E>(cursor: &mut C, mut f: F) -> std::result::Result<(), E>
where
    C: RowCursor + ?Sized,
    F: FnMut(&C) -> std::result::Result<(), E>,
    E: From<FlashError>,
{
    while cursor.advance()? {
        f(&*cursor)?;
    }
    Ok(())
}

/// Binds every remaining row of `cursor`.
pub fn bind_all<T: FromRow, C: RowCursor>(cursor: &mut C) -> Result<Vec<T>> {
    let mut results = Vec::new();
    process_rows(cursor, |row: &C| {
        results.push(bind::<T>(row)?);
        Ok::<(), FlashError>(())
    })?;
    Ok(results)
}
