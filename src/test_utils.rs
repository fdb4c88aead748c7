/// # Test Utilities Module
///
/// Fixture records and single-row tables shared by the unit tests.
use crate::core::{Describe, Descriptor, FlashError, FromValue, Member, Record, Result, Value, ValueType};
use crate::table::{Cell, Column, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

pub const STATUS_VARIANTS: &[&str] = &["Active", "Inactive"];

impl Status {
    pub fn name(self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Inactive => "Inactive",
        }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Enum("Active") => Ok(Status::Active),
            Value::Enum("Inactive") => Ok(Status::Inactive),
            other => Err(FlashError::Conversion {
                expected: ValueType::Enum,
                found: other.value_type(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

static DEPARTMENT: Descriptor = Descriptor::new(
    "Department",
    &[
        Member::new("Id", ValueType::I64),
        Member::new("Name", ValueType::Text),
    ],
);

impl Describe for Department {
    fn describe() -> &'static Descriptor {
        &DEPARTMENT
    }
}

impl Record for Department {
    fn descriptor(&self) -> &'static Descriptor {
        &DEPARTMENT
    }

    fn get(&self, member: &str) -> Value {
        match member {
            "Id" => self.id.into(),
            "Name" => self.name.clone().into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, member: &str, value: Value) -> Result<()> {
        match member {
            "Id" => self.id = i64::from_value(value)?,
            "Name" => self.name = String::from_value(value)?,
            _ => {}
        }
        Ok(())
    }
}

/// Employee with a nested department, an enum, an optional member and one
/// member of each ignore kind. `Badge` is a record slot that can never be
/// constructed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub first_name: String,
    pub dept_id: Option<i32>,
    pub status: Status,
    pub dept: Option<Department>,
    pub secret: String,
    pub notes: String,
}

static EMPLOYEE: Descriptor = Descriptor::new(
    "Employee",
    &[
        Member::new("Id", ValueType::I32),
        Member::new("Name", ValueType::Text),
        Member::new("FirstName", ValueType::Text),
        Member::new("DeptId", ValueType::I32).optional(),
        Member::enumeration("Status", STATUS_VARIANTS),
        Member::new("Dept", ValueType::Record).optional().ignore_tabulate(),
        Member::new("Badge", ValueType::Record).optional().ignore_tabulate(),
        Member::new("Secret", ValueType::Text).ignore_bind(),
        Member::new("Notes", ValueType::Text).ignore_tabulate(),
    ],
);

impl Describe for Employee {
    fn describe() -> &'static Descriptor {
        &EMPLOYEE
    }
}

impl Record for Employee {
    fn descriptor(&self) -> &'static Descriptor {
        &EMPLOYEE
    }

    fn get(&self, member: &str) -> Value {
        match member {
            "Id" => self.id.into(),
            "Name" => self.name.clone().into(),
            "FirstName" => self.first_name.clone().into(),
            "DeptId" => self.dept_id.into(),
            "Status" => Value::Enum(self.status.name()),
            "Dept" => self.dept.clone().map_or(Value::Null, Value::record),
            "Secret" => self.secret.clone().into(),
            "Notes" => self.notes.clone().into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, member: &str, value: Value) -> Result<()> {
        match member {
            "Id" => self.id = i32::from_value(value)?,
            "Name" => self.name = String::from_value(value)?,
            "FirstName" => self.first_name = String::from_value(value)?,
            "DeptId" => self.dept_id = Option::<i32>::from_value(value)?,
            "Status" => self.status = Status::from_value(value)?,
            "Secret" => self.secret = String::from_value(value)?,
            "Notes" => self.notes = String::from_value(value)?,
            _ => {}
        }
        Ok(())
    }

    fn nested_mut(&mut self, member: &str) -> Option<&mut dyn Record> {
        match member {
            "Dept" => Some(self.dept.get_or_insert_with(Department::default)),
            _ => None,
        }
    }
}

/// Builds a one-row table whose column types come from the values.
pub fn single_row(fields: &[(&str, Value)]) -> Table {
    let columns = fields
        .iter()
        .map(|(name, value)| Column::new(*name, value.value_type()))
        .collect();
    let mut table = Table::new(columns);
    table.push_row(fields.iter().map(|(_, value)| Cell::from(value.clone())).collect());
    table
}
