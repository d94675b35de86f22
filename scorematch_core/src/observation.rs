//! Rows flowing between the extraction stages.

use crate::role::{Role, RoleTag};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter placed between several warnings on one row.
pub const WARNING_DELIMITER: &str = "||";

/// The four role values of one observation, any of which may be absent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ScoreValues {
    pub primary: Option<u8>,
    pub secondary: Option<u8>,
    pub tertiary: Option<u8>,
    pub aggregate: Option<u8>,
}

impl ScoreValues {
    #[must_use]
    pub const fn new(
        primary: Option<u8>,
        secondary: Option<u8>,
        tertiary: Option<u8>,
        aggregate: Option<u8>,
    ) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
            aggregate,
        }
    }

    #[must_use]
    pub const fn get(&self, role: Role) -> Option<u8> {
        match role {
            Role::Primary => self.primary,
            Role::Secondary => self.secondary,
            Role::Tertiary => self.tertiary,
            Role::Aggregate => self.aggregate,
        }
    }

    pub const fn slot(&mut self, role: Role) -> &mut Option<u8> {
        match role {
            Role::Primary => &mut self.primary,
            Role::Secondary => &mut self.secondary,
            Role::Tertiary => &mut self.tertiary,
            Role::Aggregate => &mut self.aggregate,
        }
    }

    pub const fn set(&mut self, role: Role, value: u8) {
        *self.slot(role) = Some(value);
    }

    /// Number of roles carrying a value.
    #[must_use]
    pub fn count(&self) -> usize {
        Role::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_some())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The only role carrying a value, if exactly one does.
    #[must_use]
    pub fn sole_role(&self) -> Option<Role> {
        let mut present = Role::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_some());
        let first = present.next()?;
        present.next().is_none().then_some(first)
    }

    /// True when primary, secondary and aggregate are all present and
    /// `primary + secondary != aggregate`. The tertiary grade is not part of
    /// the sum.
    #[must_use]
    pub fn sum_mismatch(&self) -> bool {
        match (self.primary, self.secondary, self.aggregate) {
            (Some(a), Some(b), Some(c)) => u16::from(a) + u16::from(b) != u16::from(c),
            _ => false,
        }
    }
}

/// A data anomaly attached to an observation. Never an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A role the pattern's tag promises was not found in the extracted text.
    MissingRole { tag: RoleTag, role: Role },
    /// `primary + secondary != aggregate`.
    SumMismatch,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRole { tag, role } => write!(f, "!`{tag}` missing {role}"),
            Self::SumMismatch => f.write_str("a + b != c"),
        }
    }
}

/// Appends `warning` unless an equal one is already present.
pub fn push_warning(warnings: &mut Vec<Warning>, warning: Warning) {
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}

/// Renders warnings into the single delimited output string.
#[must_use]
pub fn render_warnings(warnings: &[Warning]) -> Option<String> {
    if warnings.is_empty() {
        return None;
    }
    Some(
        warnings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(WARNING_DELIMITER),
    )
}

/// One value span found by a pattern rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawMatch {
    /// Index of the source text in the batch (0 for single-text calls).
    pub source_position: usize,
    pub pattern_name: String,
    pub role_tag: RoleTag,
    /// The `value` group of the match, taken from the input text.
    pub extracted_text: String,
    /// Byte offset of the whole match in the input text.
    pub start: usize,
    pub end: usize,
}

/// Role values decoded from one extracted string.
///
/// One [`RawMatch`] yields several of these when its text holds alternate
/// value sequences such as `3 + 4 / 4 + 3`; they share `match_index` and
/// differ by `sequence`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedObservation {
    pub source_position: usize,
    pub pattern_name: String,
    pub role_tag: RoleTag,
    /// Appearance rank of the originating match within its text.
    pub match_index: usize,
    pub sequence: usize,
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub values: ScoreValues,
    pub warnings: Vec<Warning>,
}

impl ParsedObservation {
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        render_warnings(&self.warnings)
    }
}

/// A final output row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextObservation {
    pub text_id: i64,
    /// Dense per-text counter starting at 1, in order of appearance.
    pub observation_id: u32,
    pub primary: Option<u8>,
    pub secondary: Option<u8>,
    pub tertiary: Option<u8>,
    pub aggregate: Option<u8>,
    pub warning: Option<String>,
}

impl TextObservation {
    #[must_use]
    pub fn new(
        text_id: i64,
        observation_id: u32,
        values: ScoreValues,
        warning: Option<String>,
    ) -> Self {
        Self {
            text_id,
            observation_id,
            primary: values.primary,
            secondary: values.secondary,
            tertiary: values.tertiary,
            aggregate: values.aggregate,
            warning,
        }
    }

    #[must_use]
    pub const fn values(&self) -> ScoreValues {
        ScoreValues::new(self.primary, self.secondary, self.tertiary, self.aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sole_role() {
        let mut values = ScoreValues::default();
        assert_eq!(values.sole_role(), None);
        values.set(Role::Secondary, 4);
        assert_eq!(values.sole_role(), Some(Role::Secondary));
        values.set(Role::Aggregate, 7);
        assert_eq!(values.sole_role(), None);
        assert_eq!(values.count(), 2);
    }

    #[test]
    fn test_sum_mismatch_ignores_tertiary() {
        let ok = ScoreValues::new(Some(3), Some(4), Some(5), Some(7));
        assert!(!ok.sum_mismatch());
        let bad = ScoreValues::new(Some(4), Some(4), None, Some(7));
        assert!(bad.sum_mismatch());
        let partial = ScoreValues::new(Some(4), None, None, Some(7));
        assert!(!partial.sum_mismatch());
    }

    #[test]
    fn test_render_warnings_deduplicates() {
        let mut warnings = Vec::new();
        assert_eq!(render_warnings(&warnings), None);

        push_warning(
            &mut warnings,
            Warning::MissingRole {
                tag: RoleTag::PrimarySecondaryAggregate,
                role: Role::Secondary,
            },
        );
        push_warning(&mut warnings, Warning::SumMismatch);
        push_warning(&mut warnings, Warning::SumMismatch);

        assert_eq!(
            render_warnings(&warnings).as_deref(),
            Some("!`a + b = c` missing b||a + b != c")
        );
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_text_observation_serializes_nulls() {
        let row = TextObservation::new(
            7,
            1,
            ScoreValues::new(None, None, None, Some(8)),
            None,
        );
        let json = serde_json::to_value(&row).expect("row should serialize");
        assert_eq!(json["aggregate"], 8);
        assert!(json["primary"].is_null());
        assert!(json["warning"].is_null());
        assert_eq!(row.values().sole_role(), Some(Role::Aggregate));
    }
}
