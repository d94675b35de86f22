//! Decoding extracted strings into role values.
//!
//! An extracted string such as `3 + 4 (+5) = 7` is read as digit tokens.
//! Tokens separated only by `+` or `,` form an additive chain whose
//! positions are the primary, secondary and tertiary grades; a token outside
//! any chain is an aggregate. A string holding several alternate sequences
//! (`3 + 4 / 4 + 3`) yields one row per sequence: the k-th chain is paired
//! with the k-th aggregate.

use regex::Regex;
use scorematch_core::{
    ParsedObservation, RawMatch, Role, RoleTag, ScoreValues, Warning, push_warning,
};
use std::sync::OnceLock;
use tracing::debug;

/// Upper bound on rows decoded from one extracted string.
pub const MAX_SEQUENCES: usize = 10;

static DIGIT_RUN: OnceLock<Regex> = OnceLock::new();

#[expect(clippy::expect_used, reason = "Literal pattern always compiles")]
fn digit_run() -> &'static Regex {
    DIGIT_RUN.get_or_init(|| Regex::new("[0-9]+").expect("digit pattern should compile"))
}

/// One decoded value sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedValues {
    pub sequence: usize,
    pub values: ScoreValues,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    /// `None` when the digits do not fit any role.
    value: Option<u8>,
    start: usize,
    end: usize,
}

impl Token {
    fn fits(&self, role: Role) -> Option<u8> {
        self.value.filter(|value| role.accepts(*value))
    }
}

/// Decodes extracted strings according to their role tag.
#[derive(Debug, Clone, Copy)]
pub struct RoleValueParser {
    max_sequences: usize,
}

impl Default for RoleValueParser {
    fn default() -> Self {
        Self {
            max_sequences: MAX_SEQUENCES,
        }
    }
}

impl RoleValueParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `extracted_text` as `role_tag` describes.
    ///
    /// Rows where nothing could be decoded are left out. Never fails:
    /// missing roles and broken sums become warnings.
    #[must_use]
    pub fn parse(&self, extracted_text: &str, role_tag: RoleTag) -> Vec<ParsedValues> {
        let scratch = extracted_text.replace(['(', ')'], " ");
        let tokens = tokenize(&scratch);

        let rows = match role_tag {
            RoleTag::Monograde => monograde(&tokens),
            RoleTag::Primary | RoleTag::Secondary | RoleTag::Tertiary | RoleTag::Aggregate => {
                solitary(&tokens, role_tag)
            }
            RoleTag::PrimarySecondaryTertiaryAggregate
            | RoleTag::PrimarySecondaryAggregate
            | RoleTag::PrimarySecondaryTertiary
            | RoleTag::PrimarySecondary => additive(&scratch, &tokens, role_tag),
        };

        let decoded = rows.len();
        let parsed: Vec<ParsedValues> = rows
            .into_iter()
            .filter(|values| !values.is_empty())
            .take(self.max_sequences)
            .enumerate()
            .map(|(sequence, values)| ParsedValues {
                sequence,
                warnings: check(&values, role_tag),
                values,
            })
            .collect();

        if parsed.len() < decoded {
            debug!(
                "Kept {} of {decoded} sequences decoded from `{extracted_text}`",
                parsed.len()
            );
        }
        parsed
    }

    /// Decode one extracted match into observations carrying its position.
    #[must_use]
    pub fn parse_match(&self, raw: &RawMatch, match_index: usize) -> Vec<ParsedObservation> {
        self.parse(&raw.extracted_text, raw.role_tag)
            .into_iter()
            .map(|parsed| ParsedObservation {
                source_position: raw.source_position,
                pattern_name: raw.pattern_name.clone(),
                role_tag: raw.role_tag,
                match_index,
                sequence: parsed.sequence,
                start: raw.start,
                end: raw.end,
                values: parsed.values,
                warnings: parsed.warnings,
            })
            .collect()
    }
}

fn tokenize(scratch: &str) -> Vec<Token> {
    digit_run()
        .find_iter(scratch)
        .map(|m| Token {
            value: m.as_str().parse::<u8>().ok(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

fn check(values: &ScoreValues, role_tag: RoleTag) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for role in role_tag.required_roles() {
        if values.get(*role).is_none() {
            push_warning(
                &mut warnings,
                Warning::MissingRole {
                    tag: role_tag,
                    role: *role,
                },
            );
        }
    }
    if values.sum_mismatch() {
        push_warning(&mut warnings, Warning::SumMismatch);
    }
    warnings
}

fn monograde(tokens: &[Token]) -> Vec<ScoreValues> {
    tokens
        .iter()
        .find_map(|token| token.fits(Role::Primary))
        .map(|grade| vec![ScoreValues::new(Some(grade), Some(grade), None, None)])
        .unwrap_or_default()
}

fn solitary(tokens: &[Token], role_tag: RoleTag) -> Vec<ScoreValues> {
    let Some(role) = role_tag.solitary_role() else {
        return Vec::new();
    };
    tokens
        .iter()
        .filter_map(|token| token.fits(role))
        .map(|value| {
            let mut values = ScoreValues::default();
            values.set(role, value);
            values
        })
        .collect()
}

/// Whether the text between two tokens joins them into one addition.
fn is_link(gap: &str) -> bool {
    matches!(gap.trim(), "+" | ",")
}

fn additive(scratch: &str, tokens: &[Token], role_tag: RoleTag) -> Vec<ScoreValues> {
    let mut chains: Vec<Vec<Token>> = Vec::new();
    let mut aggregates: Vec<u8> = Vec::new();

    let mut run: Vec<Token> = Vec::new();
    for token in tokens {
        let linked = run
            .last()
            .is_some_and(|prev| is_link(&scratch[prev.end..token.start]));
        if !linked {
            close_run(&mut run, &mut chains, &mut aggregates);
        }
        run.push(*token);
    }
    close_run(&mut run, &mut chains, &mut aggregates);

    if !role_tag.expects_aggregate() {
        aggregates.clear();
    }

    let chain_roles = role_tag.chain_roles();
    let rows = chains.len().max(aggregates.len());
    (0..rows)
        .map(|k| {
            let mut values = ScoreValues::default();
            if let Some(chain) = chains.get(k) {
                for (role, token) in chain_roles.iter().zip(chain) {
                    if let Some(value) = token.fits(*role) {
                        values.set(*role, value);
                    }
                }
            }
            if let Some(aggregate) = aggregates.get(k) {
                values.set(Role::Aggregate, *aggregate);
            }
            values
        })
        .collect()
}

/// A run of two or more linked tokens is a chain; a lone token may be an
/// aggregate.
fn close_run(run: &mut Vec<Token>, chains: &mut Vec<Vec<Token>>, aggregates: &mut Vec<u8>) {
    match run.len() {
        0 => {}
        1 => {
            if let Some(aggregate) = run[0].fits(Role::Aggregate) {
                aggregates.push(aggregate);
            }
            run.clear();
        }
        _ => chains.push(std::mem::take(run)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str, tag: RoleTag) -> Vec<(Option<u8>, Option<u8>, Option<u8>, Option<u8>)> {
        RoleValueParser::new()
            .parse(text, tag)
            .into_iter()
            .map(|p| {
                (
                    p.values.primary,
                    p.values.secondary,
                    p.values.tertiary,
                    p.values.aggregate,
                )
            })
            .collect()
    }

    #[test]
    fn test_addition_forms() {
        let abc = RoleTag::PrimarySecondaryAggregate;
        assert_eq!(rows("3 + 4 = 7", abc), vec![(Some(3), Some(4), None, Some(7))]);
        assert_eq!(rows("3 + 4 (7)", abc), vec![(Some(3), Some(4), None, Some(7))]);
        assert_eq!(rows("7 (3 + 4)", abc), vec![(Some(3), Some(4), None, Some(7))]);
        assert_eq!(rows("7 (3, 4)", abc), vec![(Some(3), Some(4), None, Some(7))]);
        assert_eq!(
            rows("3 + 4 gleason score 7", abc),
            vec![(Some(3), Some(4), None, Some(7))]
        );
        assert_eq!(
            rows("3 + 4", RoleTag::PrimarySecondary),
            vec![(Some(3), Some(4), None, None)]
        );
    }

    #[test]
    fn test_tertiary_forms() {
        let abtc = RoleTag::PrimarySecondaryTertiaryAggregate;
        let abt = RoleTag::PrimarySecondaryTertiary;
        assert_eq!(
            rows("3 + 4 (+5) = 7", abtc),
            vec![(Some(3), Some(4), Some(5), Some(7))]
        );
        assert_eq!(rows("3 + 4 (+5)", abt), vec![(Some(3), Some(4), Some(5), None)]);
        assert_eq!(rows("3+4+5", abt), vec![(Some(3), Some(4), Some(5), None)]);
        assert_eq!(
            rows("4+3+5, gleason score 7", abtc),
            vec![(Some(4), Some(3), Some(5), Some(7))]
        );
    }

    #[test]
    fn test_solitary_and_monograde() {
        assert_eq!(rows("7", RoleTag::Aggregate), vec![(None, None, None, Some(7))]);
        assert_eq!(
            rows("5 4", RoleTag::Primary),
            vec![(Some(5), None, None, None), (Some(4), None, None, None)]
        );
        assert_eq!(rows("3", RoleTag::Monograde), vec![(Some(3), Some(3), None, None)]);
        assert_eq!(rows("3 4", RoleTag::Monograde), vec![(Some(3), Some(3), None, None)]);
        assert!(rows("8", RoleTag::Tertiary).is_empty());
    }

    #[test]
    fn test_alternate_sequences() {
        assert_eq!(
            rows("3 + 4 / 4 + 3", RoleTag::PrimarySecondary),
            vec![(Some(3), Some(4), None, None), (Some(4), Some(3), None, None)]
        );
        let parsed = RoleValueParser::new().parse("3 + 4 = 7 tai 4 + 3 = 7", RoleTag::PrimarySecondaryAggregate);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].sequence, 1);
        assert_eq!(parsed[1].values, ScoreValues::new(Some(4), Some(3), None, Some(7)));
    }

    #[test]
    fn test_sequences_are_capped() {
        let text = vec!["3"; 15].join(" ");
        assert_eq!(rows(&text, RoleTag::Primary).len(), MAX_SEQUENCES);
    }

    #[test]
    fn test_warnings() {
        let parser = RoleValueParser::new();

        let mismatch = parser.parse("4 + 4 = 7", RoleTag::PrimarySecondaryAggregate);
        assert_eq!(mismatch[0].warnings, vec![Warning::SumMismatch]);

        let missing = parser.parse("4 + 4", RoleTag::PrimarySecondaryAggregate);
        assert_eq!(
            missing[0].warnings,
            vec![Warning::MissingRole {
                tag: RoleTag::PrimarySecondaryAggregate,
                role: Role::Aggregate,
            }]
        );

        let tertiary_not_summed = parser.parse("3 + 4 + 5 = 7", RoleTag::PrimarySecondaryTertiaryAggregate);
        assert!(tertiary_not_summed[0].warnings.is_empty());
    }

    #[test]
    fn test_out_of_domain_values_are_not_assigned() {
        let parsed = RoleValueParser::new().parse("3 + 7 = 9", RoleTag::PrimarySecondaryAggregate);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].values, ScoreValues::new(Some(3), None, None, Some(9)));
        assert!(parsed[0].warnings.contains(&Warning::MissingRole {
            tag: RoleTag::PrimarySecondaryAggregate,
            role: Role::Secondary,
        }));
    }

    #[test]
    fn test_parse_match_keeps_position() {
        let raw = RawMatch {
            source_position: 2,
            pattern_name: "a + b".to_string(),
            role_tag: RoleTag::PrimarySecondary,
            extracted_text: "3 + 3 / 3 + 4".to_string(),
            start: 10,
            end: 30,
        };
        let parsed = RoleValueParser::new().parse_match(&raw, 5);
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|p| p.match_index == 5 && p.start == 10));
        assert_eq!(parsed[1].sequence, 1);
        assert_eq!(parsed[1].pattern_name, "a + b");
    }
}
