/// SQLite Execution Module
///
/// Connects the binding engine to `rusqlite`: a row cursor over statement
/// results, `ToSql` for dynamic values, and an executor offering the usual
/// execute / list / single / scalar commands.
use crate::config::BindingConfig;
use crate::core::{FlashError, FromValue, Result, Value, ValueType};
use crate::params::{Direction, ParameterBinder, ParameterList, Parameters};
use crate::row::{bind, process_rows, FromRow, RowCursor};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Batch, Connection, Rows, Statement};
use tracing::debug;

/// Row cursor over the rows of an executing statement.
pub struct SqliteCursor<'stmt> {
    rows: Rows<'stmt>,
    names: Vec<String>,
    current: Vec<Value>,
}

impl<'stmt> SqliteCursor<'stmt> {
    pub fn new(rows: Rows<'stmt>, names: Vec<String>) -> Self {
        SqliteCursor {
            rows,
            names,
            current: Vec::new(),
        }
    }
}

impl RowCursor for SqliteCursor<'_> {
    fn advance(&mut self) -> Result<bool> {
        match self.rows.next()? {
            Some(row) => {
                let mut values = Vec::with_capacity(self.names.len());
                for i in 0..self.names.len() {
                    values.push(from_value_ref(row.get_ref(i)?));
                }
                self.current = values;
                Ok(true)
            }
            None => {
                self.current.clear();
                Ok(false)
            }
        }
    }

    fn field_count(&self) -> usize {
        self.names.len()
    }

    fn field_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    fn field_type(&self, index: usize) -> ValueType {
        self.current
            .get(index)
            .map_or(ValueType::Null, Value::value_type)
    }

    fn is_null(&self, index: usize) -> bool {
        self.current.get(index).map_or(true, Value::is_null)
    }

    fn value(&self, index: usize) -> Result<Value> {
        self.current
            .get(index)
            .cloned()
            .ok_or_else(|| FlashError::Cursor(format!("no field {} on the current row", index)))
    }
}

/// Converts a SQLite value into a dynamic value.
fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::I64(i),
        ValueRef::Real(f) => Value::F64(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let output = match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Bool(b) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*b))),
            Value::I16(n) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*n))),
            Value::I32(n) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*n))),
            Value::I64(n) => ToSqlOutput::Owned(SqlValue::Integer(*n)),
            Value::F32(f) => ToSqlOutput::Owned(SqlValue::Real(f64::from(*f))),
            Value::F64(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            Value::Decimal(d) => ToSqlOutput::Owned(SqlValue::Text(d.to_string())),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Bytes(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            Value::DateTime(dt) => {
                ToSqlOutput::Owned(SqlValue::Text(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()))
            }
            Value::Date(d) => ToSqlOutput::Owned(SqlValue::Text(d.format("%Y-%m-%d").to_string())),
            Value::Uuid(u) => ToSqlOutput::Owned(SqlValue::Text(u.hyphenated().to_string())),
            Value::Enum(name) => ToSqlOutput::Borrowed(ValueRef::Text(name.as_bytes())),
            Value::List(_) | Value::Record(_) | Value::Table(_) => {
                return Err(rusqlite::Error::ToSqlConversionFailure(Box::new(
                    FlashError::Parameter(format!(
                        "{} values cannot be bound to a SQLite statement",
                        self.value_type()
                    )),
                )));
            }
        };
        Ok(output)
    }
}

/// Binds the input parameters of `params` to the placeholders of `stmt` with
/// the same name. Parameters without a placeholder are skipped.
///
/// # Errors
///
/// Returns `FlashError::Parameter` for structured or output parameters,
/// neither of which SQLite supports.
pub fn bind_parameters(stmt: &mut Statement<'_>, params: &ParameterList) -> Result<()> {
    for param in params.iter() {
        if param.direction == Direction::Output {
            return Err(FlashError::Parameter(format!(
                "SQLite has no output parameters (`{}`)",
                param.name
            )));
        }
        if param.structured {
            return Err(FlashError::Parameter(format!(
                "SQLite has no table-valued parameters (`{}`)",
                param.name
            )));
        }
        match stmt.parameter_index(&param.name)? {
            Some(index) => stmt.raw_bind_parameter(index, &param.value)?,
            None => debug!("No placeholder named {} in statement", param.name),
        }
    }
    Ok(())
}

/// Command execution over a SQLite connection with bound parameters and
/// typed results.
pub struct SqliteExecutor<'a> {
    connection: &'a Connection,
    binder: ParameterBinder,
}

impl<'a> SqliteExecutor<'a> {
    /// Creates a new SqliteExecutor for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        SqliteExecutor {
            connection,
            binder: ParameterBinder::default(),
        }
    }

    /// Creates a SqliteExecutor using the configured parameter sigil and
    /// projection settings
    pub fn with_config(connection: &'a Connection, config: &BindingConfig) -> Self {
        SqliteExecutor {
            connection,
            binder: ParameterBinder::new(config),
        }
    }

    fn prepare_bound<'p>(
        &self,
        sql: &str,
        params: impl Into<Parameters<'p>>,
    ) -> Result<Statement<'a>> {
        let mut stmt = self.connection.prepare(sql)?;
        let mut list = ParameterList::new();
        self.binder.apply(&mut list, params)?;
        bind_parameters(&mut stmt, &list)?;
        debug!("Prepared statement with {} parameters", list.len());
        Ok(stmt)
    }

    /// Executes a statement and returns the number of changed rows.
    pub fn execute<'p>(&self, sql: &str, params: impl Into<Parameters<'p>>) -> Result<usize> {
        let mut stmt = self.prepare_bound(sql, params)?;
        Ok(stmt.raw_execute()?)
    }

    /// Runs a query and calls `f` on each row. The first error from `f` stops
    /// the query and is returned unchanged.
    pub fn for_each<'p, E, F>(
        &self,
        sql: &str,
        params: impl Into<Parameters<'p>>,
        mut f: F,
    ) -> std::result::Result<(), E>
    where
        F: FnMut(&dyn RowCursor) -> std::result::Result<(), E>,
        E: From<FlashError>,
    {
        let mut stmt = self.prepare_bound(sql, params)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut cursor = SqliteCursor::new(stmt.raw_query(), names);
        process_rows(&mut cursor, |row| f(row))
    }

    /// Runs each statement of `sql` in order with the same parameters.
    /// Statements returning columns are pumped through the next unused
    /// callback; the rest are executed. Once the callbacks run out, the
    /// remaining statements are not run.
    pub fn for_each_many<'p, E>(
        &self,
        sql: &str,
        params: impl Into<Parameters<'p>>,
        callbacks: &mut [&mut dyn FnMut(&dyn RowCursor) -> std::result::Result<(), E>],
    ) -> std::result::Result<(), E>
    where
        E: From<FlashError>,
    {
        let mut list = ParameterList::new();
        self.binder.apply(&mut list, params)?;
        let mut callbacks = callbacks.iter_mut();
        let mut batch = Batch::new(self.connection, sql);
        while let Some(mut stmt) = batch.next().map_err(FlashError::from)? {
            bind_parameters(&mut stmt, &list)?;
            if stmt.column_count() == 0 {
                stmt.raw_execute().map_err(FlashError::from)?;
                continue;
            }
            let Some(callback) = callbacks.next() else {
                debug!("No callback left; skipping the remaining statements");
                break;
            };
            let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let mut cursor = SqliteCursor::new(stmt.raw_query(), names);
            process_rows(&mut cursor, |row| (*callback)(row))?;
        }
        Ok(())
    }

    /// Runs a query and binds every row as `T`.
    pub fn list<'p, T: FromRow>(
        &self,
        sql: &str,
        params: impl Into<Parameters<'p>>,
    ) -> Result<Vec<T>> {
        let mut results = Vec::new();
        self.for_each(sql, params, |row| {
            results.push(bind::<T>(row)?);
            Ok::<(), FlashError>(())
        })?;
        Ok(results)
    }

    /// Binds the first row of a query, if any.
    pub fn single<'p, T: FromRow>(
        &self,
        sql: &str,
        params: impl Into<Parameters<'p>>,
    ) -> Result<Option<T>> {
        Ok(self.list(sql, params)?.into_iter().next())
    }

    /// Returns the first column of the first row, or `T::default()` when the
    /// query yields no row or a NULL.
    pub fn scalar<'p, T: FromValue + Default>(
        &self,
        sql: &str,
        params: impl Into<Parameters<'p>>,
    ) -> Result<T> {
        let mut stmt = self.prepare_bound(sql, params)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut cursor = SqliteCursor::new(stmt.raw_query(), names);
        if !cursor.advance()? || cursor.field_count() == 0 || cursor.is_null(0) {
            return Ok(T::default());
        }
        T::from_value(cursor.value(0)?)
    }
}
