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

pub mod extraction;
pub mod normalize;
pub mod orchestrator;
pub mod parse;
pub mod resolve;

/// Compiled size limit applied to every rule regex unless configured.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 64 << 20;

pub use extraction::engine::ContextAffixedExtractor;
pub use extraction::patterns::{CompiledPattern, PatternDef, default_patterns};
pub use normalize::{NormalizerConfig, RegistryNormalizer};
pub use orchestrator::{ExtractionConfig, ScoreExtractor};
pub use parse::{ParsedValues, RoleValueParser};
pub use resolve::ElementCombinationResolver;
