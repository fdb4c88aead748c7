//! Parameter binding: appends named values to a parameter sink, turns
//! collections into structured parameters and copies output values back onto
//! a record after execution.
use crate::config::BindingConfig;
use crate::core::{FlashError, Record, Result, Value, ValueType};
use crate::flatten::{flatten_with, ParameterMap, PARAMETER_SIGIL};
use crate::naming;
use crate::table::{Table, Tabulizer};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// One entry of a parameter sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Value,
    pub direction: Direction,
    pub declared: ValueType,
    /// Transmit `value` as a table-valued parameter
    pub structured: bool,
}

/// Destination for the named values of one database call.
pub trait ParameterSink {
    fn add_input(&mut self, name: &str, value: Value) -> Result<()>;

    fn add_structured(&mut self, name: &str, table: Table) -> Result<()>;

    fn add_output(&mut self, name: &str, declared: ValueType) -> Result<()>;

    /// Value reported for an output parameter after execution.
    fn read_output(&self, name: &str) -> Option<Value>;
}

/// Ordered in-memory parameter sink with unique names.
#[derive(Debug, Clone, Default)]
pub struct ParameterList {
    params: Vec<Parameter>,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Records the value an execution produced for an output parameter.
    pub fn set_output(&mut self, name: &str, value: Value) -> Result<()> {
        match self
            .params
            .iter_mut()
            .find(|p| p.name == name && p.direction == Direction::Output)
        {
            Some(param) => {
                param.value = value;
                Ok(())
            }
            None => Err(FlashError::Parameter(format!(
                "no output parameter named `{}`",
                name
            ))),
        }
    }

    fn push(&mut self, param: Parameter) -> Result<()> {
        if self.get(&param.name).is_some() {
            return Err(FlashError::Parameter(format!(
                "parameter `{}` is already defined",
                param.name
            )));
        }
        self.params.push(param);
        Ok(())
    }
}

impl ParameterSink for ParameterList {
    fn add_input(&mut self, name: &str, value: Value) -> Result<()> {
        self.push(Parameter {
            name: name.to_string(),
            declared: value.value_type(),
            value,
            direction: Direction::Input,
            structured: false,
        })
    }

    fn add_structured(&mut self, name: &str, table: Table) -> Result<()> {
        self.push(Parameter {
            name: name.to_string(),
            value: Value::Table(table),
            direction: Direction::Input,
            declared: ValueType::Table,
            structured: true,
        })
    }

    fn add_output(&mut self, name: &str, declared: ValueType) -> Result<()> {
        self.push(Parameter {
            name: name.to_string(),
            value: Value::Null,
            direction: Direction::Output,
            declared,
            structured: false,
        })
    }

    fn read_output(&self, name: &str) -> Option<Value> {
        self.get(name)
            .filter(|p| p.direction == Direction::Output)
            .map(|p| p.value.clone())
    }
}

/// The accepted shapes of outgoing parameters.
#[derive(Debug)]
pub enum Parameters<'a> {
    None,
    /// Keyed values, applied in name order
    Map(BTreeMap<String, Value>),
    Pairs(ParameterMap),
    Object(&'a dyn Record),
}

impl From<()> for Parameters<'_> {
    fn from(_: ()) -> Self {
        Parameters::None
    }
}

impl From<BTreeMap<String, Value>> for Parameters<'_> {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Parameters::Map(map)
    }
}

impl From<HashMap<String, Value>> for Parameters<'_> {
    fn from(map: HashMap<String, Value>) -> Self {
        Parameters::Map(map.into_iter().collect())
    }
}

impl From<ParameterMap> for Parameters<'_> {
    fn from(pairs: ParameterMap) -> Self {
        Parameters::Pairs(pairs)
    }
}

impl<'a, R: Record> From<&'a R> for Parameters<'a> {
    fn from(record: &'a R) -> Self {
        Parameters::Object(record)
    }
}

impl<'a, R: Record> From<Option<&'a R>> for Parameters<'a> {
    fn from(record: Option<&'a R>) -> Self {
        record.map_or(Parameters::None, |r| Parameters::Object(r))
    }
}

/// Applies parameters to sinks using a configured sigil and tabulizer.
#[derive(Debug, Clone)]
pub struct ParameterBinder {
    sigil: String,
    tabulizer: Tabulizer,
}

impl Default for ParameterBinder {
    fn default() -> Self {
        ParameterBinder {
            sigil: PARAMETER_SIGIL.to_string(),
            tabulizer: Tabulizer::default(),
        }
    }
}

impl ParameterBinder {
    pub fn new(config: &BindingConfig) -> Self {
        ParameterBinder {
            sigil: config.parameter_sigil.clone(),
            tabulizer: Tabulizer::new(config),
        }
    }

    pub fn sigil(&self) -> &str {
        &self.sigil
    }

    /// Normalizes any parameter shape into name/value pairs.
    pub fn normalize(&self, params: Parameters<'_>) -> ParameterMap {
        match params {
            Parameters::None => Vec::new(),
            Parameters::Map(map) => map.into_iter().collect(),
            Parameters::Pairs(pairs) => pairs,
            Parameters::Object(record) => {
                flatten_with(Some(record), &self.sigil).unwrap_or_default()
            }
        }
    }

    /// Appends every parameter to `sink`. Tables and non-empty lists become
    /// structured parameters; empty lists are left out.
    pub fn apply<'p, S>(&self, sink: &mut S, params: impl Into<Parameters<'p>>) -> Result<()>
    where
        S: ParameterSink + ?Sized,
    {
        for (name, value) in self.normalize(params.into()) {
            match value {
                Value::Table(table) => sink.add_structured(&name, table)?,
                Value::List(items) => {
                    if items.is_empty() {
                        debug!("Skipping empty collection parameter {}", name);
                        continue;
                    }
                    sink.add_structured(&name, self.tabulizer.values(&items))?;
                }
                value => sink.add_input(&name, value)?,
            }
        }
        Ok(())
    }

    /// Declares one output parameter per readable member of `target` and
    /// returns the declared names.
    pub fn declare_outputs<S>(&self, sink: &mut S, target: &dyn Record) -> Result<Vec<String>>
    where
        S: ParameterSink + ?Sized,
    {
        let mut names = Vec::new();
        for member in target.descriptor().readable() {
            let name = format!("{}{}", self.sigil, member.name);
            sink.add_output(&name, member.ty)?;
            names.push(name);
        }
        Ok(names)
    }

    /// Copies non-null output values onto the members of `target` they name.
    /// Values are assigned as reported; unresolved names and values whose type
    /// differs from the member's are skipped.
    pub fn sync_outputs<S>(&self, sink: &S, names: &[String], target: &mut dyn Record) -> Result<()>
    where
        S: ParameterSink + ?Sized,
    {
        let descriptor = target.descriptor();
        for name in names {
            let Some(value) = sink.read_output(name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let bare = name.trim_start_matches(self.sigil.as_str());
            let Some(member) = naming::resolve(descriptor, bare) else {
                continue;
            };
            if !member.writable || value.value_type() != member.ty {
                debug!(
                    "Dropping output {} ({}) for {}.{}",
                    name,
                    value.value_type(),
                    descriptor.type_name,
                    member.name
                );
                continue;
            }
            target.set(member.name, value)?;
        }
        Ok(())
    }
}

pub fn apply_parameters<'p, S>(sink: &mut S, params: impl Into<Parameters<'p>>) -> Result<()>
where
    S: ParameterSink + ?Sized,
{
    ParameterBinder::default().apply(sink, params)
}

pub fn declare_outputs<S>(sink: &mut S, target: &dyn Record) -> Result<Vec<String>>
where
    S: ParameterSink + ?Sized,
{
    ParameterBinder::default().declare_outputs(sink, target)
}

pub fn sync_outputs<S>(sink: &S, names: &[String], target: &mut dyn Record) -> Result<()>
where
    S: ParameterSink + ?Sized,
{
    ParameterBinder::default().sync_outputs(sink, names, target)
}
