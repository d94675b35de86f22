//! The registry's text normalizer.

use regex::{Regex, RegexBuilder};
use scorematch_core::{Error, Result, TextNormalizer};
use serde::{Deserialize, Serialize};

use crate::extraction::patterns::{GLEASON_WORD, base_gleason_regex};

/// Passes are repeated until the text stops changing, at most this often.
const MAX_PASSES: usize = 16;

const ROMAN_NUMERALS: [(&str, &str); 10] = [
    (" I ", " 1 "),
    (" II ", " 2 "),
    (" III ", " 3 "),
    (" IV ", " 4 "),
    (" V ", " 5 "),
    (" VI ", " 6 "),
    (" VII ", " 7 "),
    (" VIII ", " 8 "),
    (" IX ", " 9 "),
    (" X ", " 10 "),
];

/// Normalizer settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Remove field names and other known false positives such as
    /// `(gleason score 9-10)`.
    pub remove_false_positives: bool,

    /// Rewrite upper-case roman numerals (` IV `) as digits.
    ///
    /// Off by default: it introduces digits the input did not have.
    pub convert_roman_numerals: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            remove_false_positives: true,
            convert_roman_numerals: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Rewrite {
    regex: Regex,
    replacement: &'static str,
}

impl Rewrite {
    fn new(name: &str, pattern: &str, replacement: &'static str, size_limit: usize) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .size_limit(size_limit)
            .build()
            .map_err(|source| Error::InvalidPattern {
                name: format!("normalizer:{name}"),
                source,
            })?;
        Ok(Self { regex, replacement })
    }

    fn apply(&self, text: &str) -> String {
        self.regex.replace_all(text, self.replacement).into_owned()
    }
}

/// Lower-cases, collapses whitespace and punctuation runs, and removes
/// known false positives.
#[derive(Debug, Clone)]
pub struct RegistryNormalizer {
    config: NormalizerConfig,
    cleanup: Vec<Rewrite>,
    whitespace: Rewrite,
    false_positives: Vec<Rewrite>,
}

impl RegistryNormalizer {
    pub fn new(config: NormalizerConfig, size_limit: usize) -> Result<Self> {
        let cleanup = vec![
            Rewrite::new("line_breaks", r"\n|\r", " ", size_limit)?,
            Rewrite::new("colons", "[: ]+", " ", size_limit)?,
            Rewrite::new("ellipses", r"\.{2,}", " ", size_limit)?,
            Rewrite::new("underscores", "_+", " ", size_limit)?,
            Rewrite::new("dashes", "-{2,}", " ", size_limit)?,
            Rewrite::new(
                "digit_letter",
                "([0-9])([a-zåäöA-ZÅÄÖ])",
                "${1} ${2}",
                size_limit,
            )?,
        ];
        let whitespace = Rewrite::new("whitespace", r"\s+", " ", size_limit)?;

        let field_name_range = format!(
            r"[(][ ]*{GLEASON_WORD}[^0-9]*[5-9][ ]*[-][ ]*([6-9]|(10))[ ]*[)]"
        );
        let false_positives = vec![
            Rewrite::new(
                "four_or_five",
                &format!("{}[ ]?4[ ](ja|tai|or|och|eller)[ ]5", base_gleason_regex()),
                "",
                size_limit,
            )?,
            Rewrite::new("focal_cancer", r"fokaalinen syöpä \([^)]*\)", "", size_limit)?,
            Rewrite::new(
                "six_or_less",
                r"\(gleason score 6 tai alle\)",
                "",
                size_limit,
            )?,
            Rewrite::new("wordy_parenthesis", r"\([^0-9]+\)", " ", size_limit)?,
            Rewrite::new("percentage", r"\([ ]*[0-9]+[ ]*%[ ]*\)", " ", size_limit)?,
            Rewrite::new("field_name_range", &field_name_range, " ", size_limit)?,
            Rewrite::new("spaces", "[ ]+", " ", size_limit)?,
        ];

        Ok(Self {
            config,
            cleanup,
            whitespace,
            false_positives,
        })
    }

    /// Normalizer with default settings and the default regex size limit.
    pub fn with_defaults() -> Result<Self> {
        Self::new(NormalizerConfig::default(), crate::DEFAULT_REGEX_SIZE_LIMIT)
    }

    #[must_use]
    pub const fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Case, whitespace and punctuation normalization.
    #[must_use]
    pub fn normalise_text(&self, text: &str) -> String {
        let mut text = text.to_string();
        for rewrite in &self.cleanup {
            text = rewrite.apply(&text);
        }
        if self.config.convert_roman_numerals {
            for (numeral, digits) in ROMAN_NUMERALS {
                text = text.replace(numeral, digits);
            }
        }
        self.whitespace.apply(&text).to_lowercase()
    }

    /// [`Self::normalise_text`] followed by false-positive removal.
    #[must_use]
    pub fn prepare_text(&self, text: &str) -> String {
        let mut text = self.normalise_text(text);
        if self.config.remove_false_positives {
            for rewrite in &self.false_positives {
                text = rewrite.apply(&text);
            }
        }
        text
    }
}

impl TextNormalizer for RegistryNormalizer {
    fn normalize(&self, text: &str) -> String {
        let mut current = self.prepare_text(text);
        for _ in 1..MAX_PASSES {
            let next = self.prepare_text(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}
