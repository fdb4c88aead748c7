//! Naming-convention fallback between database field names and record members.
use crate::core::{Descriptor, Member};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

/// Separator used by database naming conventions.
pub const SEPARATOR: char = '_';

static CASE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{Ll})(\p{Lu})").expect("case boundary pattern is valid"));

/// Rewrites `FirstName` as `first_name`: a separator goes between a lowercase
/// letter and the uppercase letter after it, and the result is lowercased.
pub fn separated(name: &str) -> String {
    CASE_BOUNDARY
        .replace_all(name, |caps: &Captures| {
            format!("{}{}{}", &caps[1], SEPARATOR, &caps[2])
        })
        .to_lowercase()
}

/// Removes every separator, so `first_name` becomes `firstname`.
pub fn unseparated(name: &str) -> String {
    name.chars().filter(|c| *c != SEPARATOR).collect()
}

/// Case-insensitive comparison used for member names and enum variants.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Finds the member `name` refers to, trying in order the name as given, its
/// separated form and its unseparated form, each compared case-insensitively.
pub fn resolve(descriptor: &'static Descriptor, name: &str) -> Option<&'static Member> {
    let candidates = [name.to_string(), separated(name), unseparated(name)];
    let found = candidates.iter().find_map(|candidate| {
        descriptor
            .members
            .iter()
            .find(|member| same_name(member.name, candidate))
    });
    if found.is_none() {
        trace!("No member of {} matches `{}`", descriptor.type_name, name);
    }
    found
}
