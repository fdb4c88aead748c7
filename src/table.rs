//! Tabular projections of collections, used as structured (table-valued)
//! parameter values.
use crate::config::BindingConfig;
use crate::core::{Describe, FlashError, Member, Record, Result, Value, ValueType};
use crate::row::RowCursor;
use tracing::{debug, trace};

/// Column name of an item-valued projection.
pub const ITEM_COLUMN: &str = "item";

/// Declared length of text item columns.
pub const TEXT_MAX_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: ValueType,
    pub max_length: Option<usize>,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Column {
            name: name.into(),
            ty,
            max_length: None,
        }
    }
}

/// One cell of a projection row. `Missing` marks an absent value and is never
/// replaced by a default.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Value(Value),
    Missing,
}

impl Cell {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Cell::Value(value) => Some(value),
            Cell::Missing => None,
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Cell::Missing,
            value => Cell::Value(value),
        }
    }
}

/// A column schema plus rows of cells aligned with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|cells| cells.get(index))
    }

    /// Appends a row; short rows are padded with `Cell::Missing`.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Missing);
        self.rows.push(cells);
    }

    /// Reads the projection back through the row cursor interface.
    pub fn reader(&self) -> TableReader<'_> {
        TableReader {
            table: self,
            position: None,
        }
    }
}

/// Row cursor over a [`Table`].
#[derive(Debug)]
pub struct TableReader<'a> {
    table: &'a Table,
    position: Option<usize>,
}

impl TableReader<'_> {
    fn cell(&self, index: usize) -> Option<&Cell> {
        let row = self.position?;
        self.table.rows.get(row).and_then(|cells| cells.get(index))
    }
}

impl RowCursor for TableReader<'_> {
    fn advance(&mut self) -> Result<bool> {
        let next = self.position.map_or(0, |p| p + 1);
        if next < self.table.rows.len() {
            self.position = Some(next);
            Ok(true)
        } else {
            self.position = Some(self.table.rows.len());
            Ok(false)
        }
    }

    fn field_count(&self) -> usize {
        self.table.columns.len()
    }

    fn field_name(&self, index: usize) -> Option<&str> {
        self.table.columns.get(index).map(|c| c.name.as_str())
    }

    fn field_type(&self, index: usize) -> ValueType {
        self.table
            .columns
            .get(index)
            .map_or(ValueType::Null, |c| c.ty)
    }

    fn is_null(&self, index: usize) -> bool {
        !matches!(self.cell(index), Some(Cell::Value(value)) if !value.is_null())
    }

    fn value(&self, index: usize) -> Result<Value> {
        match self.cell(index) {
            Some(Cell::Value(value)) => Ok(value.clone()),
            Some(Cell::Missing) => Ok(Value::Null),
            None => Err(FlashError::Cursor(format!(
                "no field {} on the current row",
                index
            ))),
        }
    }
}

/// Tabulization strategy, decided once per collection from its first element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Simple(ValueType),
    Composite,
}

impl ElementKind {
    pub fn classify(first: &Value) -> Self {
        let ty = first.value_type();
        if ty.is_simple() {
            ElementKind::Simple(ty)
        } else {
            ElementKind::Composite
        }
    }
}

/// Converts collections into item-valued or property-valued projections.
#[derive(Debug, Clone)]
pub struct Tabulizer {
    item_column: String,
    text_max_length: Option<usize>,
}

impl Default for Tabulizer {
    fn default() -> Self {
        Tabulizer {
            item_column: ITEM_COLUMN.to_string(),
            text_max_length: Some(TEXT_MAX_LENGTH),
        }
    }
}

impl Tabulizer {
    pub fn new(config: &BindingConfig) -> Self {
        Tabulizer {
            item_column: config.item_column.clone(),
            text_max_length: config.text_max_length,
        }
    }

    /// Tabulizes an untyped collection, choosing the strategy from the first
    /// element. An empty collection yields an empty schema.
    pub fn values(&self, items: &[Value]) -> Table {
        let Some(first) = items.first() else {
            return Table::default();
        };
        match ElementKind::classify(first) {
            ElementKind::Simple(_) => self.items(items),
            ElementKind::Composite => {
                let Value::Record(record) = first else {
                    debug!(
                        "Element type {} exposes no members; projecting without columns",
                        first.value_type()
                    );
                    return project(&[], items.iter().map(|_| None));
                };
                let members = record.descriptor().tabulated();
                let records = items.iter().filter_map(|item| match item {
                    Value::Record(record) => Some(Some(record.as_ref())),
                    other => {
                        trace!("Excluding {} element from a record projection", other.value_type());
                        None
                    }
                });
                project(&members, records)
            }
        }
    }

    /// Item-valued projection: a single column typed by the first element.
    /// Elements of any other type are left out.
    pub fn items(&self, items: &[Value]) -> Table {
        let Some(first) = items.first() else {
            return Table::default();
        };
        let ty = first.value_type();
        if !ty.is_simple() {
            debug!("Cannot project {} items into a single column", ty);
            return Table::default();
        }

        let mut column = Column::new(self.item_column.as_str(), ty);
        if ty == ValueType::Text {
            column.max_length = self.text_max_length;
        }
        let mut table = Table::new(vec![column]);

        for item in items {
            if item.value_type() != ty {
                trace!("Excluding {} item from a {} column", item.value_type(), ty);
                continue;
            }
            table.push_row(vec![Cell::Value(item.clone())]);
        }
        table
    }

    /// Property-valued projection of a typed collection. The schema comes from
    /// `T` and is present even when `items` is empty.
    pub fn records<T: Record + Describe>(&self, items: &[T]) -> Table {
        let members = T::describe().tabulated();
        project(&members, items.iter().map(|item| Some(item as &dyn Record)))
    }
}

fn project<'a>(
    members: &[&'static Member],
    records: impl Iterator<Item = Option<&'a dyn Record>>,
) -> Table {
    let columns = members
        .iter()
        .map(|member| Column::new(member.name, member.ty))
        .collect();
    let mut table = Table::new(columns);

    for record in records {
        let cells = members
            .iter()
            .map(|member| match record {
                Some(record) => Cell::from(record.get(member.name)),
                None => Cell::Missing,
            })
            .collect();
        table.push_row(cells);
    }
    table
}

/// Property-valued projection of a typed collection with default settings.
pub fn tabulize<T: Record + Describe>(items: &[T]) -> Table {
    Tabulizer::default().records(items)
}

/// Projection of an untyped collection with default settings.
pub fn tabulize_values(items: &[Value]) -> Table {
    Tabulizer::default().values(items)
}
