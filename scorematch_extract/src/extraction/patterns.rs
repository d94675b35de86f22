//! Pattern rules and the registry's default rule table.
//!
//! A rule is three regex fragments (`prefix`, `value`, `suffix`) and a role
//! tag. Only the `value` span is kept; the affixes are the context that must
//! surround it. The default table is assembled from the small building blocks
//! below so other tables can reuse them.

use regex::{Regex, RegexBuilder};
use scorematch_core::{Error, Result, RoleTag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Definition of a single pattern rule, as read from configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternDef {
    /// Unique name within a table.
    pub name: String,

    /// Role combination the rule captures, e.g. `"a + b = c"` or `"kw_all_a"`.
    pub role_tag: String,

    /// Context that must precede the value.
    pub prefix: String,

    /// The value itself.
    pub value: String,

    /// Context that must follow the value.
    pub suffix: String,
}

/// A rule with its role tag resolved and its full regex compiled.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: String,
    pub role_tag: RoleTag,
    pub regex: Regex,
}

impl PatternDef {
    pub fn new(
        name: impl Into<String>,
        role_tag: RoleTag,
        prefix: impl Into<String>,
        value: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role_tag: role_tag.as_str().to_string(),
            prefix: prefix.into(),
            value: value.into(),
            suffix: suffix.into(),
        }
    }

    /// `prefix`, `value` and `suffix` joined into one pattern with named
    /// groups of the same names.
    #[must_use]
    pub fn full_pattern(&self) -> String {
        format!(
            "(?P<prefix>{})(?P<value>{})(?P<suffix>{})",
            self.prefix, self.value, self.suffix
        )
    }

    /// Resolve the role tag and compile the full pattern.
    pub fn build(&self, size_limit: usize) -> Result<CompiledPattern> {
        let role_tag = RoleTag::from_str(&self.role_tag).map_err(|_| Error::UnknownRoleTag {
            pattern: self.name.clone(),
            tag: self.role_tag.clone(),
        })?;

        let regex = RegexBuilder::new(&self.full_pattern())
            .size_limit(size_limit)
            .build()
            .map_err(|source| Error::InvalidPattern {
                name: self.name.clone(),
                source,
            })?;

        Ok(CompiledPattern {
            name: self.name.clone(),
            role_tag,
            regex,
        })
    }
}

// word elements

/// What must separate words.
pub const WORD_SEP: &str = "[ ,-]{1,3}";

/// What may separate words.
pub const OPTIONAL_WORD_SEP: &str = "[ ,-]{0,2}";

/// Characters an inflected or abbreviated word may continue with
/// (`gradus` -> `gradusta`, `yht.pist.`).
pub const WORD_SUFFICES: &str = "[.a-zåäö]*";

/// Zero to three arbitrary words.
pub const ZERO_TO_THREE_WORDS: &str = "([.a-zåäö]*[ ,-]{0,2}){0,3}";

// other basic elements

pub const PLUS: &str = "[ ]?[+][ ]?";
pub const EQUALS: &str = "[ ]?[=][ ]?";
pub const NUMBER_RANGE: &str = "[0-9]+[ ]?[-][ ]?[0-9]+";
/// A number range in parentheses, e.g. `( 2-10 )`.
pub const NUMBER_RANGE_IN_PARENTHESIS: &str = r"\([ ]?[0-9]+[ ]?[-][ ]?[0-9]+[ ]?\)";
pub const OPTIONAL_NONDIGIT_BUFFER_5: &str = "[^0-9]{0,5}";
pub const OPTIONAL_NONDIGIT_BUFFER_20: &str = "[^0-9]{0,20}";
/// Default right-hand context of a value.
pub const DEFAULT_SUFFIX: &str = "([^0-9]|$)";
pub const ARBITRARY_EXPRESSION_IN_PARENTHESIS: &str = r"\([^)]*\)";

/// What may separate whitelist entries.
pub const WHITELIST_SEP: &str = "([ ,-]{0,2}| ja | tai | och | eller )";

/// Separators allowed between alternate values, e.g. `3 + 4 / 4 + 3`.
pub const ALTERNATE_VALUE_SEP: &str = "( | / |/| tai | ja | eller | och | and | or |[ ]?-[ ]?)";

// values

/// A grade: primary, secondary or tertiary.
pub const SCORE_ABT: &str = "[3-5]";
/// An aggregate.
pub const SCORE_C: &str = "(10|[6-9])";

// vocabularies

/// Roots of words referring to the score or a grade.
pub const SCOREWORDS: [&str; 10] = [
    "pist",
    "tyyp",
    "luok",
    "score",
    "gr",
    "lk",
    "kl",
    "mö",
    "kuvio",
    "arkkitehtuuri",
];

/// Spelling variants of "gleason", typos included.
pub const GLEASON_WORD: &str = "gl[aei]{1,2}s{1,2}[oi]n[a-zåäö]*";

/// Roots of words marking the primary grade.
pub static PRIMARY_WORDS: [&str; 10] = [
    "prim[aä]{1,2}",
    "pääluok",
    "hufvudkl",
    "valtaos",
    "enimm",
    "tavalli",
    "vallits",
    "ylei",
    "hallits",
    "vanlig",
];

/// "or most aggressive" after a primary or secondary keyword.
pub const OPTIONAL_OR_AGGRESSIVE: &str = "([ ]?(/|tai|eller)[ ]?aggres[.a-zåäö]*)?";

/// Roots of words marking the aggregate.
pub const SCORESUM_WORDS: [&str; 6] = ["yh", "pist", "poäng", "sum", "score", "gradus"];

/// Roots of words marking the result of an addition, besides [`SCORESUM_WORDS`].
pub const TOTAL_WORDS: [&str; 8] = [
    "eli",
    "yht",
    "yhtä kuin",
    "pist",
    "sum",
    "total",
    "=",
    "sammanlag",
];

/// Roots of words saying the whole sample has one grade.
pub const MONOGRADE_WORDS: [&str; 5] = ["yksinom", "ainoas", "pelk", "endast", "enbart"];

/// Roots of words that may follow an aggregate, besides [`SCOREWORDS`].
pub const SCORESUM_SUFFIX_WORDS: [&str; 6] = [
    "tauti",
    "syö",
    "prostata",
    "karsino{1,2}ma",
    "eturauhassyö",
    "adeno",
];

/// Letter addition shown as a reading guide, e.g. `(a + b)`.
pub const ADDITION_GUIDE: &str = r"\(?[ ]?(a|x)[ ]?[+][ ]?(b|y)[ ]?\)?";

/// Repetition applied to a whitelist group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// `*`
    Any,
    /// `+`
    AtLeastOnce,
    /// `?`
    AtMostOnce,
}

impl Repeat {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "*",
            Self::AtLeastOnce => "+",
            Self::AtMostOnce => "?",
        }
    }
}

/// Alternatives, each followed by [`WHITELIST_SEP`], repeated `repeat` times.
#[must_use]
pub fn whitelist_regex<S: AsRef<str>>(alternatives: &[S], repeat: Repeat) -> String {
    format!(
        "(({}){WHITELIST_SEP}){}",
        join_alternatives(alternatives),
        repeat.as_str()
    )
}

/// Like [`whitelist_regex`] but each word may inflect with [`WORD_SUFFICES`].
#[must_use]
pub fn word_whitelist_regex<S: AsRef<str>>(words: &[S], repeat: Repeat) -> String {
    format!(
        "(({}){WORD_SUFFICES}{WHITELIST_SEP}){}",
        join_alternatives(words),
        repeat.as_str()
    )
}

/// Turns a value pattern into one that also captures alternate values
/// following it, e.g. `4 5` or `3 + 4 / 4 + 3`.
#[must_use]
pub fn multiple_alternative_value_matches(value: &str) -> String {
    format!("{value}({ALTERNATE_VALUE_SEP}{value})*")
}

fn join_alternatives<S: AsRef<str>>(alternatives: &[S]) -> String {
    let mut joined = String::new();
    for (i, alternative) in alternatives.iter().enumerate() {
        if i > 0 {
            joined.push('|');
        }
        joined.push_str(alternative.as_ref());
    }
    joined
}

/// Deduplicated words, longest first, so alternation prefers the longest.
fn longest_first<'a>(words: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut words: Vec<&str> = words.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    words.sort_by_key(|word| std::cmp::Reverse(word.chars().count()));
    words
}

#[must_use]
pub fn scoreword_regex() -> String {
    word_whitelist_regex(&SCOREWORDS, Repeat::AtLeastOnce)
}

fn base_optional_alternatives() -> Vec<String> {
    vec![
        scoreword_regex(),
        format!("n{WORD_SUFFICES}"),
        NUMBER_RANGE_IN_PARENTHESIS.to_string(),
        ARBITRARY_EXPRESSION_IN_PARENTHESIS.to_string(),
    ]
}

/// Filler that may sit between "gleason" and a value:
/// score words, `n.`, ranges and parentheses.
#[must_use]
pub fn base_optional_regex() -> String {
    whitelist_regex(base_optional_alternatives().as_slice(), Repeat::Any)
}

/// "gleason" followed by optional filler.
#[must_use]
pub fn base_gleason_regex() -> String {
    format!("{GLEASON_WORD}{OPTIONAL_WORD_SEP}{}", base_optional_regex())
}

/// "gleason" and its filler in any order, all optional.
#[must_use]
pub fn optional_base_gleason_regex() -> String {
    let mut alternatives = base_optional_alternatives();
    alternatives.push(GLEASON_WORD.to_string());
    whitelist_regex(alternatives.as_slice(), Repeat::Any)
}

#[must_use]
pub fn primary_regex() -> String {
    format!(
        "{}{OPTIONAL_OR_AGGRESSIVE}",
        word_whitelist_regex(&PRIMARY_WORDS, Repeat::AtLeastOnce)
    )
}

/// The primary keywords that also build secondary and tertiary keywords
/// ("toiseksi yleisin", "3. yleisin").
fn ordinal_grade_words() -> &'static [&'static str] {
    &PRIMARY_WORDS[PRIMARY_WORDS.len() - 5..]
}

#[must_use]
pub fn secondary_regex() -> String {
    let ordinal = format!(
        "((2[.])|toise|näst){WORD_SUFFICES}[ ]?{}",
        word_whitelist_regex(ordinal_grade_words(), Repeat::AtLeastOnce)
    );
    let named = word_whitelist_regex(&["sekund", "second"], Repeat::AtLeastOnce);
    format!("({ordinal}|{named}){OPTIONAL_OR_AGGRESSIVE}")
}

#[must_use]
pub fn tertiary_regex() -> String {
    let mut words = vec!["terti".to_string()];
    words.extend(
        ordinal_grade_words()
            .iter()
            .map(|word| format!(r"((3\.)|(kolmann)|(trädj)){word}")),
    );
    word_whitelist_regex(words.as_slice(), Repeat::AtLeastOnce)
}

#[must_use]
pub fn scoresum_regex() -> String {
    word_whitelist_regex(&SCORESUM_WORDS, Repeat::AtLeastOnce)
}

/// Words marking the result of an addition (`=`, `eli`, `yht.`, ...).
#[must_use]
pub fn total_regex() -> String {
    let words = longest_first(TOTAL_WORDS.into_iter().chain(SCORESUM_WORDS));
    word_whitelist_regex(words.as_slice(), Repeat::AtLeastOnce)
}

/// Left-hand context of an aggregate introduced by a keyword, e.g.
/// `gleason score, summa a+b (2-10) `.
#[must_use]
pub fn kw_c_prefix() -> String {
    let mut alternatives: Vec<String> = SCOREWORDS
        .iter()
        .map(|word| format!("{word}{WORD_SUFFICES}"))
        .collect();
    alternatives.extend([
        ADDITION_GUIDE.to_string(),
        NUMBER_RANGE_IN_PARENTHESIS.to_string(),
        ARBITRARY_EXPRESSION_IN_PARENTHESIS.to_string(),
    ]);
    let c_optional = whitelist_regex(alternatives.as_slice(), Repeat::Any);
    format!(
        "{c_optional}{}{c_optional}{}{c_optional}{OPTIONAL_WORD_SEP}{OPTIONAL_NONDIGIT_BUFFER_5}",
        base_gleason_regex(),
        scoresum_regex()
    )
}

// additions

#[must_use]
pub fn a_plus_b() -> String {
    format!("{SCORE_ABT}{PLUS}{SCORE_ABT}")
}

/// E.g. `3,4` in `gleason 7 (3,4)`.
#[must_use]
pub fn a_comma_b() -> String {
    format!("{SCORE_ABT},[ ]?{SCORE_ABT}")
}

/// E.g. `3 + 4 + 5` or `3+4(+5)`.
#[must_use]
pub fn a_plus_b_plus_t() -> String {
    format!("{}[ (]*[+][ ]?{SCORE_ABT}[ )]*", a_plus_b())
}

#[must_use]
pub fn a_comma_b_comma_t() -> String {
    format!("{},[ ]?{SCORE_ABT}", a_comma_b())
}

/// The six written forms of an addition, most specific first:
/// `a+b = c`, `c = a+b`, `c (a+b)`, `c (a,b)`, `a+b (c)` and a bare `a+b`.
fn addition_forms(addition: &str, comma_form: &str) -> [String; 6] {
    let optional_base = optional_base_gleason_regex();
    let total = total_regex();
    [
        format!(
            "({addition}{OPTIONAL_WORD_SEP}{optional_base}{total}{optional_base}{OPTIONAL_WORD_SEP}{SCORE_C})"
        ),
        format!("({SCORE_C}{EQUALS}{addition})"),
        format!(r"({SCORE_C}[ ]?\({addition}[ ]?\))"),
        format!(r"({SCORE_C}[ ]?\({comma_form}[ ]?\))"),
        format!(r"({addition}[ ]?\({SCORE_C}[ ]?\))"),
        format!("({addition})"),
    ]
}

#[must_use]
pub fn addition_values() -> [String; 6] {
    addition_forms(&a_plus_b(), &a_comma_b())
}

#[must_use]
pub fn tertiary_addition_values() -> [String; 6] {
    addition_forms(&a_plus_b_plus_t(), &a_comma_b_comma_t())
}

// the default table

/// The registry's default rule table.
///
/// Order is priority: tertiary additions, additions, an aggregate near the
/// end of the text, then keyword rules. Every value fragment is wrapped by
/// [`multiple_alternative_value_matches`].
#[must_use]
pub fn default_patterns() -> Vec<PatternDef> {
    let mut patterns = Vec::new();
    patterns.extend(tertiary_addition_patterns());
    patterns.extend(addition_patterns());
    patterns.extend(minor_patterns());
    patterns.extend(keyword_patterns());
    for pattern in &mut patterns {
        pattern.value = multiple_alternative_value_matches(&pattern.value);
    }
    patterns
}

fn addition_table(
    names: [&str; 6],
    values: [String; 6],
    full: RoleTag,
    partial: RoleTag,
) -> Vec<PatternDef> {
    let prefix = format!("{}{ZERO_TO_THREE_WORDS}", base_gleason_regex());
    names
        .into_iter()
        .zip(values)
        .enumerate()
        .map(|(i, (name, value))| {
            let tag = if i == 5 { partial } else { full };
            PatternDef::new(name, tag, prefix.clone(), value, DEFAULT_SUFFIX)
        })
        .collect()
}

fn tertiary_addition_patterns() -> Vec<PatternDef> {
    addition_table(
        [
            "a + b + t = c",
            "c = a + b + t",
            "c (a + b + t)",
            "c (a, b, t)",
            "a + b + t (c)",
            "a + b + t",
        ],
        tertiary_addition_values(),
        RoleTag::PrimarySecondaryTertiaryAggregate,
        RoleTag::PrimarySecondaryTertiary,
    )
}

fn addition_patterns() -> Vec<PatternDef> {
    addition_table(
        ["a + b = c", "c = a + b", "c (a + b)", "c (a, b)", "a + b (c)", "a + b"],
        addition_values(),
        RoleTag::PrimarySecondaryAggregate,
        RoleTag::PrimarySecondary,
    )
}

fn minor_patterns() -> Vec<PatternDef> {
    vec![PatternDef::new(
        "sum_near_end",
        RoleTag::Aggregate,
        format!("{}[ ]?", base_gleason_regex()),
        SCORE_C,
        "[^0-9]{0,30}$",
    )]
}

fn keyword_patterns() -> Vec<PatternDef> {
    let base_gleason = base_gleason_regex();
    let optional_base = optional_base_gleason_regex();

    let kw_t = PatternDef::new(
        "kw_t",
        RoleTag::Tertiary,
        format!(
            "{}{OPTIONAL_WORD_SEP}{optional_base}{OPTIONAL_WORD_SEP}",
            tertiary_regex()
        ),
        SCORE_ABT,
        DEFAULT_SUFFIX,
    );

    let kw_b = PatternDef::new(
        "kw_b",
        RoleTag::Secondary,
        format!(
            "{}{WORD_SEP}((tai|/|eller) (pahin|korkein|högst)){{0,1}}{OPTIONAL_WORD_SEP}{optional_base}{OPTIONAL_WORD_SEP}{OPTIONAL_NONDIGIT_BUFFER_5}",
            secondary_regex()
        ),
        SCORE_ABT,
        DEFAULT_SUFFIX,
    );

    let kw_a = PatternDef::new(
        "kw_a",
        RoleTag::Primary,
        format!(
            "{}{OPTIONAL_WORD_SEP}{optional_base}{OPTIONAL_WORD_SEP}{OPTIONAL_NONDIGIT_BUFFER_5}",
            primary_regex()
        ),
        SCORE_ABT,
        DEFAULT_SUFFIX,
    );

    let a_kw = PatternDef::new(
        "a_kw",
        RoleTag::Primary,
        format!("{base_gleason}{OPTIONAL_NONDIGIT_BUFFER_5}"),
        SCORE_ABT,
        format!("{OPTIONAL_WORD_SEP}{}", primary_regex()),
    );

    let kw_c = PatternDef::new(
        "kw_c",
        RoleTag::Aggregate,
        kw_c_prefix(),
        SCORE_C,
        DEFAULT_SUFFIX,
    );

    let suffix_words = longest_first(SCORESUM_SUFFIX_WORDS.into_iter().chain(SCOREWORDS));
    let c_kw = PatternDef::new(
        "c_kw",
        RoleTag::Aggregate,
        format!("{base_gleason}{OPTIONAL_WORD_SEP}{OPTIONAL_NONDIGIT_BUFFER_20}"),
        SCORE_C,
        format!(
            "{WORD_SEP}{}",
            word_whitelist_regex(suffix_words.as_slice(), Repeat::AtLeastOnce)
        ),
    );

    let kw_all_a = PatternDef::new(
        "kw_all_a",
        RoleTag::Monograde,
        format!(
            "{}{OPTIONAL_WORD_SEP}{base_gleason}{OPTIONAL_WORD_SEP}",
            word_whitelist_regex(&MONOGRADE_WORDS, Repeat::AtLeastOnce)
        ),
        SCORE_ABT,
        DEFAULT_SUFFIX,
    );

    vec![kw_t, kw_b, kw_a, a_kw, kw_c, c_kw, kw_all_a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn re(pattern: &str) -> Regex {
        RegexBuilder::new(pattern)
            .size_limit(64 << 20)
            .build()
            .expect("building block should compile")
    }

    fn found<'a>(pattern: &str, text: &'a str) -> Option<&'a str> {
        re(pattern).find(text).map(|m| m.as_str())
    }

    #[test]
    fn test_whitelist_regex() {
        let regex = re(&whitelist_regex(&["hi", "yo"], Repeat::AtLeastOnce));
        assert_eq!(regex.replace_all("hi yo hi hi yo", ""), "");
        assert_eq!(regex.replace("hi yo hiya yoman ho", ""), "ya yoman ho");
    }

    #[test]
    fn test_word_whitelist_regex() {
        let regex = re(&word_whitelist_regex(&["hi", "yo"], Repeat::AtLeastOnce));
        assert_eq!(regex.replace_all("hi yo hi hi yo", ""), "");
        assert_eq!(regex.replace_all("hi yo hiya yoman ho", ""), "ho");
    }

    #[test]
    fn test_multiple_alternative_value_matches() {
        let pattern = multiple_alternative_value_matches("[0-9]");
        assert_eq!(
            found(&pattern, "primääri gleason gradus (oikea, vasen): 4 5"),
            Some("4 5")
        );
        assert_eq!(
            found(&pattern, "primääri gleason gradus (oikea, vasen): 4 5 sana"),
            Some("4 5")
        );
    }

    #[test]
    fn test_gleason_words_and_filler() {
        assert_eq!(
            re(ZERO_TO_THREE_WORDS).replace("one two three four", "_"),
            "_four"
        );
        assert_eq!(found(GLEASON_WORD, "gleason"), Some("gleason"));
        assert_eq!(found(GLEASON_WORD, "gliisonin"), Some("gliisonin"));
        assert_eq!(
            found(&base_optional_regex(), "gleason gradus (3-5) n. 8"),
            Some("")
        );

        let base_gleason = base_gleason_regex();
        assert_eq!(
            found(&base_gleason, "gleason gradus (3-5) n. 8"),
            Some("gleason gradus (3-5) n. ")
        );
        assert_eq!(
            re(&base_gleason).replace_all("gleason lk (1-5) (jotain muuta)", ""),
            ""
        );
        assert_eq!(
            re(&base_gleason).replace_all("gleason gradus (2-5) (gleasongr2)", ""),
            ""
        );
        assert_eq!(
            found(&optional_base_gleason_regex(), "gradus gleason (3-5) n. 8"),
            Some("gradus gleason (3-5) n. ")
        );
    }

    #[test]
    fn test_primary_and_secondary_keywords() {
        let primary = re(&primary_regex());
        for text in [
            "tavallisin/aggressiivisin",
            "yleisin / aggressiivisin",
            "yleisin",
            "tavallisin",
            "primääri",
            "primary",
        ] {
            assert_eq!(primary.replace_all(text, ""), "", "primary: {text}");
        }

        let secondary = re(&secondary_regex());
        for text in [
            "toiseksi tavallisin/aggressiivisin",
            "2. tavallisin/aggressiivisin",
            "2. yleisin / aggressiivisin",
            "2. yleisin",
            "toiseksi tavallisin",
            "sekundääri",
            "secondary",
        ] {
            assert_eq!(secondary.replace_all(text, ""), "", "secondary: {text}");
        }
    }

    #[test]
    fn test_scoresum_words() {
        let scoresum = scoresum_regex();
        assert_eq!(found(&scoresum, "yht.pist."), Some("yht.pist."));
        assert_eq!(found(&scoresum, "pistesumma"), Some("pistesumma"));
    }

    #[test]
    fn test_total_words_longest_first() {
        let words = longest_first(TOTAL_WORDS.into_iter().chain(SCORESUM_WORDS));
        assert_eq!(words.first(), Some(&"sammanlag"));
        assert_eq!(words.last(), Some(&"="));
        assert_eq!(words.iter().filter(|word| **word == "pist").count(), 1);
    }

    #[test]
    fn test_additions() {
        assert_eq!(found(&a_plus_b(), "3 + 3"), Some("3 + 3"));
        assert_eq!(found(&a_plus_b(), "3+5"), Some("3+5"));
        assert_eq!(found(&a_plus_b(), "3 ja 3"), None);
        assert_eq!(found(&a_comma_b(), "gleason 7 (3,4)"), Some("3,4"));
        assert_eq!(found(&a_plus_b_plus_t(), "3 + 3 + 3"), Some("3 + 3 + 3"));
        assert_eq!(found(&a_plus_b_plus_t(), "3+5(+4)"), Some("3+5(+4)"));
        assert_eq!(found(&a_plus_b_plus_t(), "3 + 5 4"), None);
        assert_eq!(
            found(&a_comma_b_comma_t(), "gleason 7 (3,4,4)"),
            Some("3,4,4")
        );
        assert_eq!(re(&addition_values()[1]).replace_all("7 = 3 + 4", ""), "");
    }

    #[test]
    fn test_keyword_building_blocks() {
        assert_eq!(re(ADDITION_GUIDE).replace_all("(a + b)", ""), "");
        assert_eq!(re(ADDITION_GUIDE).replace_all("x + y", ""), "");

        let kw_c = kw_c_prefix();
        assert_eq!(found(&kw_c, "gleason yht.pist."), Some("gleason yht.pist."));
        assert_eq!(found(&kw_c, "gleason pistesumma"), Some("gleason pistesumma"));
        assert_eq!(found(&kw_c, "pelkästään gleason 1"), None);
        assert_eq!(
            found(&kw_c, "gleason score, summa a+b (2-10) 7"),
            Some("gleason score, summa a+b (2-10) ")
        );

        assert_eq!(
            found(&tertiary_regex(), "3.tblyleisin gleason-gradus (1-5) 5"),
            None
        );
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_default_patterns_build() {
        let patterns = default_patterns();
        assert_eq!(patterns.len(), 20);
        assert_eq!(patterns[0].name, "a + b + t = c");
        assert_eq!(patterns[12].name, "sum_near_end");
        assert_eq!(patterns[19].name, "kw_all_a");

        for def in &patterns {
            let compiled = def.build(64 << 20).expect("default pattern should build");
            assert_eq!(compiled.name, def.name);
        }
    }

    #[test]
    fn test_build_rejects_unknown_role_tag() {
        let def = PatternDef {
            name: "odd".to_string(),
            role_tag: "a + c".to_string(),
            prefix: "x".to_string(),
            value: "[0-9]".to_string(),
            suffix: String::new(),
        };
        assert!(matches!(
            def.build(1 << 20),
            Err(Error::UnknownRoleTag { .. })
        ));
    }

    #[test]
    fn test_build_rejects_invalid_regex() {
        let def = PatternDef::new("broken", RoleTag::Aggregate, "(", "[0-9]", "");
        assert!(matches!(
            def.build(1 << 20),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_pattern_def_serialization() {
        let def = PatternDef::new("kw", RoleTag::Primary, "primary ", "[3-5]", "");
        let json = serde_json::to_string(&def).expect("pattern should serialize");
        assert!(json.contains("\"role_tag\":\"a\""));
        let back: PatternDef = serde_json::from_str(&json).expect("valid JSON should deserialize");
        assert_eq!(back, def);
    }
}
