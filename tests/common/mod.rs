//! Shared record types for the integration tests.
#![allow(dead_code)]

use flashbind::{Describe, Descriptor, FlashError, FromValue, Member, Record, Result, Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Junior,
    Senior,
}

impl Level {
    pub fn name(self) -> &'static str {
        match self {
            Level::Junior => "Junior",
            Level::Senior => "Senior",
        }
    }
}

impl FromValue for Level {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Enum("Junior") => Ok(Level::Junior),
            Value::Enum("Senior") => Ok(Level::Senior),
            other => Err(FlashError::Conversion {
                expected: ValueType::Enum,
                found: other.value_type(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub id: i64,
    pub title: String,
}

static TEAM: Descriptor = Descriptor::new(
    "Team",
    &[
        Member::new("Id", ValueType::I64),
        Member::new("Title", ValueType::Text),
    ],
);

impl Describe for Team {
    fn describe() -> &'static Descriptor {
        &TEAM
    }
}

impl Record for Team {
    fn descriptor(&self) -> &'static Descriptor {
        &TEAM
    }

    fn get(&self, member: &str) -> Value {
        match member {
            "Id" => self.id.into(),
            "Title" => self.title.clone().into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, member: &str, value: Value) -> Result<()> {
        match member {
            "Id" => self.id = i64::from_value(value)?,
            "Title" => self.title = String::from_value(value)?,
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub age: Option<i64>,
    pub level: Level,
    pub team: Option<Team>,
    pub token: String,
    pub cache: String,
}

static PERSON: Descriptor = Descriptor::new(
    "Person",
    &[
        Member::new("Id", ValueType::I64),
        Member::new("FirstName", ValueType::Text),
        Member::new("Age", ValueType::I64).optional(),
        Member::enumeration("Level", &["Junior", "Senior"]),
        Member::new("Team", ValueType::Record).optional().ignore_tabulate(),
        Member::new("Token", ValueType::Text).ignore_bind(),
        Member::new("Cache", ValueType::Text).ignore_tabulate(),
    ],
);

impl Describe for Person {
    fn describe() -> &'static Descriptor {
        &PERSON
    }
}

impl Record for Person {
    fn descriptor(&self) -> &'static Descriptor {
        &PERSON
    }

    fn get(&self, member: &str) -> Value {
        match member {
            "Id" => self.id.into(),
            "FirstName" => self.first_name.clone().into(),
            "Age" => self.age.into(),
            "Level" => Value::Enum(self.level.name()),
            "Team" => self.team.clone().map_or(Value::Null, Value::record),
            "Token" => self.token.clone().into(),
            "Cache" => self.cache.clone().into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, member: &str, value: Value) -> Result<()> {
        match member {
            "Id" => self.id = i64::from_value(value)?,
            "FirstName" => self.first_name = String::from_value(value)?,
            "Age" => self.age = Option::<i64>::from_value(value)?,
            "Level" => self.level = Level::from_value(value)?,
            "Token" => self.token = String::from_value(value)?,
            "Cache" => self.cache = String::from_value(value)?,
            _ => {}
        }
        Ok(())
    }

    fn nested_mut(&mut self, member: &str) -> Option<&mut dyn Record> {
        match member {
            "Team" => Some(self.team.get_or_insert_with(Team::default)),
            _ => None,
        }
    }
}

/// Output parameters of a stored call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub row_count: i64,
    pub label: Option<String>,
}

static TOTALS: Descriptor = Descriptor::new(
    "Totals",
    &[
        Member::new("RowCount", ValueType::I64),
        Member::new("Label", ValueType::Text).optional(),
    ],
);

impl Record for Totals {
    fn descriptor(&self) -> &'static Descriptor {
        &TOTALS
    }

    fn get(&self, member: &str) -> Value {
        match member {
            "RowCount" => self.row_count.into(),
            "Label" => self.label.clone().into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, member: &str, value: Value) -> Result<()> {
        match member {
            "RowCount" => self.row_count = i64::from_value(value)?,
            "Label" => self.label = Option::<String>::from_value(value)?,
            _ => {}
        }
        Ok(())
    }
}
