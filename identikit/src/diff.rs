//! Field-level difference reporting.
use std::fmt;

use crate::{format::append_default_value, value::Value};

/// One differing property between two compared instances.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDifference {
    pub property: String,
    pub left: Value,
    pub right: Value,
}

impl fmt::Display for ValueDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut left = String::new();
        let mut right = String::new();
        append_default_value(&mut left, &self.left);
        append_default_value(&mut right, &self.right);
        write!(f, "{}: {{{}}} versus {{{}}}", self.property, left, right)
    }
}

/// Outcome of a diff: either every equality property matched, or the full
/// collection of differing properties. Diff never stops at the first
/// difference.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffResult {
    NoDifferences,
    PropertyDifferences(Vec<ValueDifference>),
}

impl DiffResult {
    pub fn are_equal(&self) -> bool {
        matches!(self, DiffResult::NoDifferences)
    }

    pub fn differences(&self) -> &[ValueDifference] {
        match self {
            DiffResult::NoDifferences => &[],
            DiffResult::PropertyDifferences(differences) => differences,
        }
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffResult::NoDifferences => f.write_str("no differences"),
            DiffResult::PropertyDifferences(differences) => {
                f.write_str("[")?;
                for (index, difference) in differences.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{difference}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_each_difference() {
        let result = DiffResult::PropertyDifferences(vec![
            ValueDifference {
                property: "s".to_string(),
                left: Value::from("this"),
                right: Value::from("THIS"),
            },
            ValueDifference {
                property: "n".to_string(),
                left: Value::from(1_i32),
                right: Value::Null,
            },
        ]);
        assert_eq!(
            result.to_string(),
            "[s: {this} versus {THIS}, n: {1} versus {null}]"
        );
        assert_eq!(DiffResult::NoDifferences.to_string(), "no differences");
    }
}
