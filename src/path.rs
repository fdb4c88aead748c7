//! Property path binding: assigns a value to a possibly nested member of a
//! record, constructing intermediate records on demand.
use crate::core::{FlashError, Member, Record, Result, Value, ValueType};
use crate::naming;
use tracing::trace;

/// A dotted member path such as `Dept.Name`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> PropertyPath<'a> {
    pub fn parse(path: &'a str) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(PropertyPath {
            segments: path.split('.').collect(),
        })
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }
}

/// Binds `value` at `path` under `target`.
///
/// Unresolved names, ignored members and intermediate records that cannot be
/// constructed are skipped silently. Enum parse failures and type mismatches
/// are returned as errors.
pub fn bind(target: &mut dyn Record, path: &str, value: Value) -> Result<()> {
    match PropertyPath::parse(path) {
        Some(path) => bind_segments(target, path.segments(), value),
        None => Ok(()),
    }
}

fn bind_segments(target: &mut dyn Record, segments: &[&str], value: Value) -> Result<()> {
    match segments {
        [] => Ok(()),
        [name] => bind_member(target, name, value),
        [head, rest @ ..] => {
            let descriptor = target.descriptor();
            let Some(member) = naming::resolve(descriptor, head) else {
                return Ok(());
            };
            match target.nested_mut(member.name) {
                Some(child) => bind_segments(child, rest, value),
                None => {
                    trace!(
                        "Cannot construct {}.{}; dropping nested value",
                        descriptor.type_name,
                        member.name
                    );
                    Ok(())
                }
            }
        }
    }
}

fn bind_member(target: &mut dyn Record, name: &str, value: Value) -> Result<()> {
    let descriptor = target.descriptor();
    let Some(member) = naming::resolve(descriptor, name) else {
        return Ok(());
    };
    if member.ignore_bind || !member.writable {
        trace!("Not binding {}.{}", descriptor.type_name, member.name);
        return Ok(());
    }
    let value = coerce(member, value)?;
    target.set(member.name, value)
}

/// Checks `value` against the member's declared type. Enumerations accept
/// text naming a variant in any case; every other type must match exactly.
fn coerce(member: &Member, value: Value) -> Result<Value> {
    if member.ty == ValueType::Enum {
        return match value {
            Value::Text(text) => member
                .variants
                .iter()
                .find(|variant| naming::same_name(variant, &text))
                .map(|variant| Value::Enum(*variant))
                .ok_or_else(|| FlashError::EnumParse {
                    member: member.name.to_string(),
                    value: text,
                }),
            Value::Enum(_) => Ok(value),
            other => Err(FlashError::TypeMismatch {
                member: member.name.to_string(),
                expected: ValueType::Text,
                found: other.value_type(),
            }),
        };
    }

    let found = value.value_type();
    if found != member.ty {
        return Err(FlashError::TypeMismatch {
            member: member.name.to_string(),
            expected: member.ty,
            found,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Department, Employee, Status};

    #[test]
    fn test_parse_path() {
        assert!(PropertyPath::parse("").is_none());
        let path = PropertyPath::parse("Dept.Name").unwrap();
        assert_eq!(path.segments(), &["Dept", "Name"]);
    }

    #[test]
    fn test_bind_leaf() {
        let mut employee = Employee::default();
        bind(&mut employee, "name", "Ann".into()).unwrap();
        bind(&mut employee, "DeptId", Value::I32(3)).unwrap();
        assert_eq!(employee.name, "Ann");
        assert_eq!(employee.dept_id, Some(3));
    }

    #[test]
    fn test_bind_creates_intermediate() {
        let mut employee = Employee::default();
        bind(&mut employee, "dept.name", "Ops".into()).unwrap();
        assert_eq!(
            employee.dept,
            Some(Department {
                id: 0,
                name: "Ops".to_string()
            })
        );

        bind(&mut employee, "dept.id", Value::I64(5)).unwrap();
        assert_eq!(employee.dept.as_ref().map(|d| d.id), Some(5));
        assert_eq!(employee.dept.as_ref().map(|d| d.name.as_str()), Some("Ops"));
    }

    #[test]
    fn test_unconstructible_intermediate_is_skipped() {
        let mut employee = Employee::default();
        bind(&mut employee, "badge.number", Value::I32(1)).unwrap();
        assert_eq!(employee, Employee::default());
    }

    #[test]
    fn test_unresolved_names_are_skipped() {
        let mut employee = Employee::default();
        bind(&mut employee, "missing", Value::I32(1)).unwrap();
        bind(&mut employee, "missing.name", "x".into()).unwrap();
        bind(&mut employee, "dept.missing", "x".into()).unwrap();
        assert_eq!(employee.name, "");
        // the intermediate is still constructed before the leaf misses
        assert_eq!(employee.dept, Some(Department::default()));
    }

    #[test]
    fn test_ignore_bind_member() {
        let mut employee = Employee::default();
        bind(&mut employee, "secret", "pw".into()).unwrap();
        assert_eq!(employee.secret, "");
        bind(&mut employee, "notes", "kept".into()).unwrap();
        assert_eq!(employee.notes, "kept");
    }

    #[test]
    fn test_enum_coercion() {
        let mut employee = Employee::default();
        bind(&mut employee, "status", "INACTIVE".into()).unwrap();
        assert_eq!(employee.status, Status::Inactive);

        match bind(&mut employee, "status", "retired".into()) {
            Err(FlashError::EnumParse { member, value }) => {
                assert_eq!(member, "Status");
                assert_eq!(value, "retired");
            }
            other => panic!("Expected enum parse error, got {:?}", other),
        }

        let result = bind(&mut employee, "status", Value::I32(1));
        assert!(matches!(result, Err(FlashError::TypeMismatch { .. })));
    }

    #[test]
    fn test_no_implicit_conversion() {
        let mut employee = Employee::default();
        let result = bind(&mut employee, "id", "12".into());
        assert!(matches!(
            result,
            Err(FlashError::TypeMismatch {
                expected: ValueType::I32,
                found: ValueType::Text,
                ..
            })
        ));
    }
}
