#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod normalize;
pub mod observation;
pub mod role;

pub use error::{Error, Result};
pub use normalize::{IdentityNormalizer, TextNormalizer};
pub use observation::{
    ParsedObservation, RawMatch, ScoreValues, TextObservation, Warning, push_warning,
    render_warnings,
};
pub use role::{Role, RoleTag};
