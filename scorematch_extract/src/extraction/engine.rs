//! Ordered greedy matching with masking.
//!
//! Rules run in table order against a working copy of the text. Every match
//! is replaced by a mask token carrying its discovery index, so later rules
//! cannot match the same span. Once all rules are done the tokens are read
//! back left to right, which yields the matches in order of appearance
//! rather than rule order.

use scorematch_core::{Error, RawMatch, Result};
use std::collections::HashSet;
use tracing::debug;

use crate::extraction::patterns::{CompiledPattern, PatternDef};

const MASK_PAD: char = '\u{E000}';
const MASK_OPEN: char = '\u{E001}';
const MASK_CLOSE: char = '\u{E002}';
const MASK_DIGIT_ZERO: u32 = 0xE010;
const MASK_PAD_LEN: usize = 20;

/// Input characters that collide with the mask alphabet become this.
const MASK_COLLISION_REPLACEMENT: char = '\u{FFFD}';

/// Byte range of the input text a working-text byte stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

/// A match before its appearance order is known.
#[derive(Debug)]
struct Discovery {
    pattern: usize,
    value: String,
    span: Span,
}

/// Runs a compiled rule table against texts.
#[derive(Debug, Clone)]
pub struct ContextAffixedExtractor {
    patterns: Vec<CompiledPattern>,
    max_tries_per_pattern: usize,
}

impl ContextAffixedExtractor {
    /// Compile `patterns` in table order.
    ///
    /// # Errors
    /// Fails on a duplicate rule name, an unknown role tag, a pattern that
    /// does not compile, or a zero `max_tries_per_pattern`.
    pub fn new(
        patterns: &[PatternDef],
        max_tries_per_pattern: usize,
        size_limit: usize,
    ) -> Result<Self> {
        if max_tries_per_pattern == 0 {
            return Err(Error::InvalidSetting {
                name: "max_tries_per_pattern",
                reason: "must be at least 1".to_string(),
            });
        }

        let mut names = HashSet::new();
        let mut compiled = Vec::with_capacity(patterns.len());
        for def in patterns {
            if !names.insert(def.name.as_str()) {
                return Err(Error::DuplicatePatternName(def.name.clone()));
            }
            compiled.push(def.build(size_limit)?);
        }

        debug!("Compiled {} pattern rules", compiled.len());
        Ok(Self {
            patterns: compiled,
            max_tries_per_pattern,
        })
    }

    #[must_use]
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Extract all rule matches from `text`, in order of appearance.
    ///
    /// `start`/`end` of each match are byte offsets into `text`.
    #[must_use]
    pub fn extract(&self, text: &str, source_position: usize) -> Vec<RawMatch> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut working = sanitize(text);
        let mut origin: Vec<Span> = (0..working.len())
            .map(|i| Span {
                start: i,
                end: i + 1,
            })
            .collect();
        let mut discoveries: Vec<Discovery> = Vec::new();

        for (pattern_index, pattern) in self.patterns.iter().enumerate() {
            for _ in 0..self.max_tries_per_pattern {
                let Some(caps) = pattern.regex.captures(&working) else {
                    break;
                };
                let Some(whole) = caps.get(0) else {
                    break;
                };
                if whole.is_empty() {
                    debug!("Pattern `{}` matched an empty span, skipping", pattern.name);
                    break;
                }

                let (start, end) = (whole.start(), whole.end());
                let span = Span {
                    start: origin[start].start,
                    end: origin[end - 1].end,
                };
                let value = caps
                    .name("value")
                    .map_or_else(String::new, |m| m.as_str().to_string());

                let token = mask_token(discoveries.len());
                working.replace_range(start..end, &token);
                origin.splice(start..end, std::iter::repeat_n(span, token.len()));

                discoveries.push(Discovery {
                    pattern: pattern_index,
                    value,
                    span,
                });
            }
        }

        let order = mask_order(&working);
        if order.len() < discoveries.len() {
            debug!(
                "{} of {} matches were swallowed by later matches",
                discoveries.len() - order.len(),
                discoveries.len()
            );
        }

        order
            .into_iter()
            .filter_map(|index| discoveries.get(index))
            .map(|found| {
                let pattern = &self.patterns[found.pattern];
                RawMatch {
                    source_position,
                    pattern_name: pattern.name.clone(),
                    role_tag: pattern.role_tag,
                    extracted_text: found.value.clone(),
                    start: found.span.start,
                    end: found.span.end,
                }
            })
            .collect()
    }
}

const fn is_mask_char(c: char) -> bool {
    matches!(c, '\u{E000}'..='\u{E01F}')
}

/// Replace characters of the mask alphabet. Both sides encode to three
/// bytes, so byte offsets are unchanged.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if is_mask_char(c) {
                MASK_COLLISION_REPLACEMENT
            } else {
                c
            }
        })
        .collect()
}

fn mask_token(index: usize) -> String {
    let mut token = String::new();
    token.extend(std::iter::repeat_n(MASK_PAD, MASK_PAD_LEN));
    token.push(MASK_OPEN);
    for digit in index.to_string().bytes() {
        let code = MASK_DIGIT_ZERO + u32::from(digit - b'0');
        token.push(char::from_u32(code).unwrap_or(MASK_PAD));
    }
    token.push(MASK_CLOSE);
    token.extend(std::iter::repeat_n(MASK_PAD, MASK_PAD_LEN));
    token
}

/// Discovery indices of the tokens still present, left to right.
fn mask_order(working: &str) -> Vec<usize> {
    let mut order = Vec::new();
    let mut current: Option<usize> = None;
    for c in working.chars() {
        match c {
            MASK_OPEN => current = Some(0),
            MASK_CLOSE => {
                if let Some(index) = current.take() {
                    order.push(index);
                }
            }
            _ => {
                let code = u32::from(c);
                if let Some(index) = current.as_mut() {
                    if (MASK_DIGIT_ZERO..MASK_DIGIT_ZERO + 10).contains(&code) {
                        *index = *index * 10 + (code - MASK_DIGIT_ZERO) as usize;
                    }
                }
            }
        }
    }
    order
}
