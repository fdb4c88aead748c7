//! Flashbind binds database rows and parameters to strongly-typed records.
//!
//! Rows are read through the [`RowCursor`] capability and materialized with
//! [`bind`] / [`bind_all`]; outgoing values are appended to a
//! [`ParameterSink`] with [`apply_parameters`], collections becoming
//! table-valued parameters. Types opt in by implementing [`Record`] and
//! [`Describe`] over a static member descriptor.

// Core infrastructure modules
pub mod config;
pub mod core;

// Binding engine
pub mod flatten;
pub mod naming;
pub mod params;
pub mod path;
pub mod row;
pub mod table;

// Execution context
pub mod sqlite;

#[cfg(test)]
mod test_utils;

pub use crate::core::{
    Describe, Descriptor, FlashError, FromValue, Member, Record, Result, Value, ValueType,
};
pub use flatten::{flatten, ParameterMap};
pub use params::{
    apply_parameters, declare_outputs, sync_outputs, Direction, Parameter, ParameterBinder,
    ParameterList, ParameterSink, Parameters,
};
pub use row::{bind, bind_all, process_rows, FromRow, RowCursor};
pub use sqlite::{SqliteCursor, SqliteExecutor};
pub use table::{tabulize, tabulize_values, Cell, Column, Table, Tabulizer};
