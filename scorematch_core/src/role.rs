//! Score roles and the role combinations a pattern rule can declare.
//!
//! A composite score is written `a + b (+ t) = c`: primary grade `a`,
//! secondary grade `b`, optional tertiary grade `t` and the aggregate `c`.
//! Each pattern rule carries a [`RoleTag`] naming which of these it is
//! expected to capture.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One component of a composite score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Role {
    /// Most prevalent grade (`a`).
    Primary = 0,
    /// Second most prevalent grade (`b`).
    Secondary = 1,
    /// Tertiary grade (`t`).
    Tertiary = 2,
    /// Sum of primary and secondary (`c`).
    Aggregate = 3,
}

impl Role {
    /// All roles in column order.
    pub const ALL: [Self; 4] = [
        Self::Primary,
        Self::Secondary,
        Self::Tertiary,
        Self::Aggregate,
    ];

    /// Single-letter code used by role sequences and warnings.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Primary => 'a',
            Self::Secondary => 'b',
            Self::Tertiary => 't',
            Self::Aggregate => 'c',
        }
    }

    /// Returns the string representation of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
            Self::Aggregate => "aggregate",
        }
    }

    /// Whether `value` lies in the closed value domain of this role.
    ///
    /// Grades take 3..=5, the aggregate 6..=10.
    #[must_use]
    pub const fn accepts(self, value: u8) -> bool {
        match self {
            Self::Primary | Self::Secondary | Self::Tertiary => value >= 3 && value <= 5,
            Self::Aggregate => value >= 6 && value <= 10,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Role {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "primary" => Ok(Self::Primary),
            "b" | "secondary" => Ok(Self::Secondary),
            "t" | "tertiary" => Ok(Self::Tertiary),
            "c" | "aggregate" => Ok(Self::Aggregate),
            _ => Err("unknown role"),
        }
    }
}

/// The combination of roles a pattern rule is expected to capture.
///
/// Serialized with the symbolic names of the registry tables
/// (`"a + b = c"`, `"kw_all_a"`, ...); the descriptive names
/// (`"primary+secondary+aggregate"`, `"monograde"`, ...) are accepted too.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoleTag {
    #[serde(rename = "a + b + t = c", alias = "primary+secondary+tertiary+aggregate")]
    PrimarySecondaryTertiaryAggregate,
    #[serde(rename = "a + b = c", alias = "primary+secondary+aggregate")]
    PrimarySecondaryAggregate,
    #[serde(rename = "a + b + t", alias = "primary+secondary+tertiary")]
    PrimarySecondaryTertiary,
    #[serde(rename = "a + b", alias = "primary+secondary")]
    PrimarySecondary,
    /// A single grade stated for the whole sample; implies `a == b`.
    #[serde(rename = "kw_all_a", alias = "monograde")]
    Monograde,
    #[serde(rename = "a", alias = "primary")]
    Primary,
    #[serde(rename = "b", alias = "secondary")]
    Secondary,
    #[serde(rename = "t", alias = "tertiary")]
    Tertiary,
    #[serde(rename = "c", alias = "aggregate")]
    Aggregate,
}

impl RoleTag {
    /// Every tag, most roles first.
    pub const ALL: [Self; 9] = [
        Self::PrimarySecondaryTertiaryAggregate,
        Self::PrimarySecondaryAggregate,
        Self::PrimarySecondaryTertiary,
        Self::PrimarySecondary,
        Self::Monograde,
        Self::Primary,
        Self::Secondary,
        Self::Tertiary,
        Self::Aggregate,
    ];

    /// Symbolic name, as used in pattern tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrimarySecondaryTertiaryAggregate => "a + b + t = c",
            Self::PrimarySecondaryAggregate => "a + b = c",
            Self::PrimarySecondaryTertiary => "a + b + t",
            Self::PrimarySecondary => "a + b",
            Self::Monograde => "kw_all_a",
            Self::Primary => "a",
            Self::Secondary => "b",
            Self::Tertiary => "t",
            Self::Aggregate => "c",
        }
    }

    /// Descriptive name, accepted as an alias when parsing.
    #[must_use]
    pub const fn descriptive_name(self) -> &'static str {
        match self {
            Self::PrimarySecondaryTertiaryAggregate => "primary+secondary+tertiary+aggregate",
            Self::PrimarySecondaryAggregate => "primary+secondary+aggregate",
            Self::PrimarySecondaryTertiary => "primary+secondary+tertiary",
            Self::PrimarySecondary => "primary+secondary",
            Self::Monograde => "monograde",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
            Self::Aggregate => "aggregate",
        }
    }

    /// Roles an observation of this tag must end up with.
    #[must_use]
    pub const fn required_roles(self) -> &'static [Role] {
        match self {
            Self::PrimarySecondaryTertiaryAggregate => &[
                Role::Primary,
                Role::Secondary,
                Role::Tertiary,
                Role::Aggregate,
            ],
            Self::PrimarySecondaryAggregate => &[Role::Primary, Role::Secondary, Role::Aggregate],
            Self::PrimarySecondaryTertiary => &[Role::Primary, Role::Secondary, Role::Tertiary],
            Self::PrimarySecondary | Self::Monograde => &[Role::Primary, Role::Secondary],
            Self::Primary => &[Role::Primary],
            Self::Secondary => &[Role::Secondary],
            Self::Tertiary => &[Role::Tertiary],
            Self::Aggregate => &[Role::Aggregate],
        }
    }

    /// Grade roles read, in order, from one additive chain such as `3 + 4 + 5`.
    ///
    /// Empty for tags that do not describe an addition.
    #[must_use]
    pub const fn chain_roles(self) -> &'static [Role] {
        match self {
            Self::PrimarySecondaryTertiaryAggregate | Self::PrimarySecondaryTertiary => {
                &[Role::Primary, Role::Secondary, Role::Tertiary]
            }
            Self::PrimarySecondaryAggregate | Self::PrimarySecondary => {
                &[Role::Primary, Role::Secondary]
            }
            Self::Monograde
            | Self::Primary
            | Self::Secondary
            | Self::Tertiary
            | Self::Aggregate => &[],
        }
    }

    /// The role captured by a single-role tag.
    #[must_use]
    pub const fn solitary_role(self) -> Option<Role> {
        match self {
            Self::Primary => Some(Role::Primary),
            Self::Secondary => Some(Role::Secondary),
            Self::Tertiary => Some(Role::Tertiary),
            Self::Aggregate => Some(Role::Aggregate),
            _ => None,
        }
    }

    /// Whether observations of this tag carry the aggregate.
    #[must_use]
    pub const fn expects_aggregate(self) -> bool {
        matches!(
            self,
            Self::PrimarySecondaryTertiaryAggregate
                | Self::PrimarySecondaryAggregate
                | Self::Aggregate
        )
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleTag {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == wanted || tag.descriptive_name() == wanted)
            .ok_or("unknown role tag")
    }
}
