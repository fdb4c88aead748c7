/// Record Module
///
/// Static member descriptors and the object-safe `Record` trait through which
/// the engine reads and writes members by name.
use crate::core::value::{Value, ValueType};
use crate::core::Result;
use std::fmt;

/// Metadata for one public member of a bindable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub name: &'static str,
    /// Declared type; for optional members this is the wrapped type
    pub ty: ValueType,
    /// Variant names when `ty` is `ValueType::Enum`
    pub variants: &'static [&'static str],
    pub optional: bool,
    pub readable: bool,
    pub writable: bool,
    /// Excluded from row binding
    pub ignore_bind: bool,
    /// Excluded from tabular projections
    pub ignore_tabulate: bool,
}

impl Member {
    pub const fn new(name: &'static str, ty: ValueType) -> Self {
        Member {
            name,
            ty,
            variants: &[],
            optional: false,
            readable: true,
            writable: true,
            ignore_bind: false,
            ignore_tabulate: false,
        }
    }

    pub const fn enumeration(name: &'static str, variants: &'static [&'static str]) -> Self {
        Member {
            variants,
            ..Member::new(name, ValueType::Enum)
        }
    }

    pub const fn optional(self) -> Self {
        Member {
            optional: true,
            ..self
        }
    }

    pub const fn read_only(self) -> Self {
        Member {
            writable: false,
            ..self
        }
    }

    pub const fn write_only(self) -> Self {
        Member {
            readable: false,
            ..self
        }
    }

    pub const fn ignore_bind(self) -> Self {
        Member {
            ignore_bind: true,
            ..self
        }
    }

    pub const fn ignore_tabulate(self) -> Self {
        Member {
            ignore_tabulate: true,
            ..self
        }
    }
}

/// Member list of a bindable type, usually stored in a `static`.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub type_name: &'static str,
    pub members: &'static [Member],
}

impl Descriptor {
    pub const fn new(type_name: &'static str, members: &'static [Member]) -> Self {
        Descriptor { type_name, members }
    }

    pub fn readable(&self) -> impl Iterator<Item = &'static Member> {
        self.members.iter().filter(|m| m.readable)
    }

    /// Readable, non-ignored members ordered by name.
    pub fn tabulated(&self) -> Vec<&'static Member> {
        let mut members: Vec<&'static Member> = self
            .members
            .iter()
            .filter(|m| m.readable && !m.ignore_tabulate)
            .collect();
        members.sort_by(|a, b| a.name.cmp(b.name));
        members
    }
}

/// A bindable object graph node.
///
/// Member names passed to `get`, `set` and `nested_mut` are always the exact
/// names from the descriptor; name resolution happens before these calls.
pub trait Record: fmt::Debug + Send + Sync {
    fn descriptor(&self) -> &'static Descriptor;

    /// Current value of a member; `Value::Null` when absent.
    fn get(&self, member: &str) -> Value;

    /// Assigns an already type-checked value to a member.
    fn set(&mut self, member: &str, value: Value) -> Result<()>;

    /// Returns the child record stored in `member`, constructing a default
    /// instance first when the slot is empty. `None` when the member holds no
    /// record or its type cannot be default-constructed.
    fn nested_mut(&mut self, _member: &str) -> Option<&mut dyn Record> {
        None
    }
}

/// Static access to a type's descriptor, for use without an instance.
pub trait Describe {
    fn describe() -> &'static Descriptor;
}
