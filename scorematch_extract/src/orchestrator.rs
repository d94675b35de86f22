//! Batch score extraction.
//!
//! Per text: normalize, extract matches, decode them, group the solitary
//! values and number the resulting rows in order of appearance.

use rayon::prelude::*;
use scorematch_core::{
    Error, ParsedObservation, Result, ScoreValues, TextNormalizer, TextObservation, Warning,
    push_warning, render_warnings,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use crate::DEFAULT_REGEX_SIZE_LIMIT;
use crate::extraction::engine::ContextAffixedExtractor;
use crate::extraction::patterns::{PatternDef, default_patterns};
use crate::normalize::{NormalizerConfig, RegistryNormalizer};
use crate::parse::RoleValueParser;
use crate::resolve::{DEFAULT_MAX_REPEAT, ElementCombinationResolver};

/// Default cap on matches per rule and text.
pub const DEFAULT_MAX_TRIES_PER_PATTERN: usize = 100;

/// Configuration for the score extractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Hard cap on matches of one rule in one text.
    pub max_tries_per_pattern: usize,

    /// Largest repeat count tried when grouping solitary values.
    pub max_repeat: usize,

    /// Process texts on the rayon thread pool.
    pub parallel: bool,

    /// Compiled size limit for each rule's regex, in bytes.
    pub regex_size_limit: usize,

    pub normalizer: NormalizerConfig,

    /// Rule table in priority order.
    #[serde(skip_serializing_if = "is_default_table")]
    pub patterns: Vec<PatternDef>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_tries_per_pattern: DEFAULT_MAX_TRIES_PER_PATTERN,
            max_repeat: DEFAULT_MAX_REPEAT,
            parallel: false,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            normalizer: NormalizerConfig::default(),
            patterns: default_patterns(),
        }
    }
}

fn is_default_table(patterns: &[PatternDef]) -> bool {
    patterns == default_patterns().as_slice()
}

/// A row being assembled, keyed by where it appears in the text.
#[derive(Debug)]
struct Assembled {
    match_index: usize,
    sequence: usize,
    values: ScoreValues,
    warnings: Vec<Warning>,
}

impl From<ParsedObservation> for Assembled {
    fn from(observation: ParsedObservation) -> Self {
        Self {
            match_index: observation.match_index,
            sequence: observation.sequence,
            values: observation.values,
            warnings: observation.warnings,
        }
    }
}

/// Extracts score observations from texts.
pub struct ScoreExtractor {
    extractor: ContextAffixedExtractor,
    parser: RoleValueParser,
    resolver: ElementCombinationResolver,
    normalizer: Box<dyn TextNormalizer>,
    parallel: bool,
}

impl std::fmt::Debug for ScoreExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreExtractor")
            .field("patterns", &self.extractor.patterns().len())
            .field("resolver", &self.resolver)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl ScoreExtractor {
    /// Build an extractor using the registry normalizer.
    ///
    /// # Errors
    /// Fails on an invalid setting or rule table.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        validate_size_limit(config.regex_size_limit)?;
        let normalizer = RegistryNormalizer::new(config.normalizer, config.regex_size_limit)?;
        Self::with_normalizer(config, normalizer)
    }

    /// Build an extractor with a caller-supplied normalizer.
    pub fn with_normalizer(
        config: ExtractionConfig,
        normalizer: impl TextNormalizer + 'static,
    ) -> Result<Self> {
        let ExtractionConfig {
            max_tries_per_pattern,
            max_repeat,
            parallel,
            regex_size_limit,
            patterns,
            ..
        } = config;
        validate_size_limit(regex_size_limit)?;
        let resolver = ElementCombinationResolver::new(max_repeat)?;
        let extractor =
            ContextAffixedExtractor::new(&patterns, max_tries_per_pattern, regex_size_limit)?;

        info!(
            "Score extractor ready with {} pattern rules",
            extractor.patterns().len()
        );
        Ok(Self {
            extractor,
            parser: RoleValueParser::new(),
            resolver,
            normalizer: Box::new(normalizer),
            parallel,
        })
    }

    /// Create an extractor with the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ExtractionConfig::default())
    }

    #[must_use]
    pub const fn extractor(&self) -> &ContextAffixedExtractor {
        &self.extractor
    }

    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Extract rows for a batch of texts.
    ///
    /// `texts[i]` is identified by `text_ids[i]`; ids must be unique. A
    /// `None` text yields no rows. Rows are ordered by
    /// `(text_id, observation_id)`.
    ///
    /// # Errors
    /// Usage faults (length mismatch, duplicate ids) reject the whole call
    /// before any text is processed.
    #[tracing::instrument(skip_all, fields(texts = texts.len()))]
    pub fn extract_scores<S>(
        &self,
        texts: &[Option<S>],
        text_ids: &[i64],
    ) -> Result<Vec<TextObservation>>
    where
        S: AsRef<str> + Sync,
    {
        if texts.len() != text_ids.len() {
            return Err(Error::LengthMismatch {
                texts: texts.len(),
                ids: text_ids.len(),
            });
        }
        let mut seen = HashSet::with_capacity(text_ids.len());
        for id in text_ids {
            if !seen.insert(*id) {
                return Err(Error::DuplicateTextId(*id));
            }
        }

        let process = |(position, (text, text_id)): (usize, (&Option<S>, &i64))| {
            self.process_text(*text_id, text.as_ref().map(AsRef::as_ref), position)
        };
        let per_text: Vec<Vec<TextObservation>> = if self.parallel {
            texts
                .par_iter()
                .zip(text_ids.par_iter())
                .enumerate()
                .map(process)
                .collect::<Result<_>>()?
        } else {
            texts
                .iter()
                .zip(text_ids)
                .enumerate()
                .map(process)
                .collect::<Result<_>>()?
        };

        let mut rows: Vec<TextObservation> = per_text.into_iter().flatten().collect();
        rows.sort_by_key(|row| (row.text_id, row.observation_id));
        info!("Extracted {} observations", rows.len());
        Ok(rows)
    }

    /// Extract rows from one text, reported with `text_id` 0.
    pub fn extract_text(&self, text: &str) -> Result<Vec<TextObservation>> {
        self.process_text(0, Some(text), 0)
    }

    /// All steps for one text.
    ///
    /// # Errors
    /// Only on an internal inconsistency while merging groups.
    pub fn process_text(
        &self,
        text_id: i64,
        text: Option<&str>,
        position: usize,
    ) -> Result<Vec<TextObservation>> {
        let Some(text) = text else {
            return Ok(Vec::new());
        };

        let normalized = self.normalizer.normalize(text);
        let matches = self.extractor.extract(&normalized, position);

        let parsed: Vec<ParsedObservation> = matches
            .iter()
            .enumerate()
            .flat_map(|(match_index, raw)| self.parser.parse_match(raw, match_index))
            .collect();

        let (solitary, complete): (Vec<_>, Vec<_>) = parsed
            .into_iter()
            .partition(|observation| observation.values.count() == 1);

        let groups = self.resolver.resolve_observations(&solitary)?;
        let mut rows = merge_groups(solitary, &groups)?;
        rows.extend(complete.into_iter().map(Assembled::from));
        rows.sort_by_key(|row| (row.match_index, row.sequence));

        debug!(
            text_id,
            matches = matches.len(),
            rows = rows.len(),
            "Processed text"
        );

        Ok(rows
            .into_iter()
            .zip(1_u32..)
            .map(|(mut row, observation_id)| {
                if row.values.sum_mismatch() {
                    push_warning(&mut row.warnings, Warning::SumMismatch);
                }
                TextObservation::new(
                    text_id,
                    observation_id,
                    row.values,
                    render_warnings(&row.warnings),
                )
            })
            .collect())
    }
}

fn validate_size_limit(size_limit: usize) -> Result<()> {
    if size_limit == 0 {
        return Err(Error::InvalidSetting {
            name: "regex_size_limit",
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

/// Combine each group's solitary rows into one row placed at its first
/// member.
fn merge_groups(solitary: Vec<ParsedObservation>, groups: &[usize]) -> Result<Vec<Assembled>> {
    let mut merged: BTreeMap<usize, Assembled> = BTreeMap::new();
    for (observation, group) in solitary.into_iter().zip(groups.iter().copied()) {
        let Some(row) = merged.get_mut(&group) else {
            merged.insert(group, Assembled::from(observation));
            continue;
        };
        for role in scorematch_core::Role::ALL {
            if let Some(value) = observation.values.get(role) {
                let slot = row.values.slot(role);
                if slot.is_some() {
                    return Err(Error::ConflictingGroupMember { group, role });
                }
                *slot = Some(value);
            }
        }
        for warning in observation.warnings {
            push_warning(&mut row.warnings, warning);
        }
    }
    Ok(merged.into_values().collect())
}
