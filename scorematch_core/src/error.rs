use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Got {texts} texts but {ids} text ids")]
    LengthMismatch { texts: usize, ids: usize },

    #[error("Duplicate text id: {0}")]
    DuplicateTextId(i64),

    #[error("Invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("Pattern `{pattern}` has unknown role tag `{tag}`")]
    UnknownRoleTag { pattern: String, tag: String },

    #[error("Duplicate pattern name: {0}")]
    DuplicatePatternName(String),

    #[error("Pattern `{name}` does not compile: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Group {group} has two members supplying role {role}")]
    ConflictingGroupMember { group: usize, role: crate::Role },

    #[error("Observation {index} does not carry exactly one role value")]
    NotSolitary { index: usize },
}
