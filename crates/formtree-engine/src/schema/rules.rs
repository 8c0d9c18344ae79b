//! # Rule Sets
//!
//! Declared rules per entity kind, and their resolved counterparts.
//!
//! Every kind carries the [`CommonRules`] (`disabled`, `invalid`, `required`,
//! `requires`); text, number, select, and list schemas add their own. A
//! declared rule set holds [`Rule`]s; calling `resolve` against a live entity
//! evaluates each one and yields plain values. Resolution happens on every
//! read and is never cached.
//!
//! A rule that is present is always honored, so `min: 0` or `maxlength: 0`
//! constrain exactly as written.

use std::sync::{Arc, OnceLock};

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use super::rule::Rule;
use crate::entity::EntityRef;
use crate::requirement::Requirement;

fn resolve<T: Clone>(rule: &Option<Rule<T>>, entity: EntityRef<'_>) -> Option<T> {
    rule.as_ref().map(|rule| rule.apply(entity))
}

// ─── Declared Rules ─────────────────────────────────────────────────

/// Rules shared by every entity kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommonRules {
    pub disabled: Option<Rule<bool>>,
    pub invalid: Option<Rule<bool>>,
    pub required: Option<Rule<bool>>,
    /// Cross-entity condition; an entity whose requirement fails is disabled.
    pub requires: Option<Rule<Requirement>>,
}

impl CommonRules {
    pub fn resolve(&self, entity: EntityRef<'_>) -> ResolvedCommon {
        ResolvedCommon {
            disabled: resolve(&self.disabled, entity).unwrap_or(false),
            invalid: resolve(&self.invalid, entity).unwrap_or(false),
            required: resolve(&self.required, entity).unwrap_or(false),
            requires: resolve(&self.requires, entity),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextRules {
    #[serde(flatten)]
    pub common: CommonRules,
    pub minlength: Option<Rule<usize>>,
    pub maxlength: Option<Rule<usize>>,
    pub fixedlength: Option<Rule<usize>>,
    pub pattern: Option<Rule<Pattern>>,
}

impl TextRules {
    pub fn resolve(&self, entity: EntityRef<'_>) -> ResolvedTextRules {
        ResolvedTextRules {
            common: self.common.resolve(entity),
            minlength: resolve(&self.minlength, entity),
            maxlength: resolve(&self.maxlength, entity),
            fixedlength: resolve(&self.fixedlength, entity),
            pattern: resolve(&self.pattern, entity),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NumberRules {
    #[serde(flatten)]
    pub common: CommonRules,
    pub min: Option<Rule<Bound>>,
    pub max: Option<Rule<Bound>>,
    /// Granularity measured from the resolved `min` (or 0 without one).
    pub step: Option<Rule<f64>>,
}

impl NumberRules {
    pub fn resolve(&self, entity: EntityRef<'_>) -> ResolvedNumberRules {
        ResolvedNumberRules {
            common: self.common.resolve(entity),
            min: resolve(&self.min, entity),
            max: resolve(&self.max, entity),
            step: resolve(&self.step, entity),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectRules {
    #[serde(flatten)]
    pub common: CommonRules,
    pub minselected: Option<Rule<usize>>,
    pub maxselected: Option<Rule<usize>>,
    pub fixedselected: Option<Rule<usize>>,
}

impl SelectRules {
    pub fn resolve(&self, entity: EntityRef<'_>) -> ResolvedSelectRules {
        ResolvedSelectRules {
            common: self.common.resolve(entity),
            minselected: resolve(&self.minselected, entity),
            maxselected: resolve(&self.maxselected, entity),
            fixedselected: resolve(&self.fixedselected, entity),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListRules {
    #[serde(flatten)]
    pub common: CommonRules,
    pub minitems: Option<Rule<usize>>,
    pub maxitems: Option<Rule<usize>>,
    pub fixeditems: Option<Rule<usize>>,
}

impl ListRules {
    pub fn resolve(&self, entity: EntityRef<'_>) -> ResolvedListRules {
        ResolvedListRules {
            common: self.common.resolve(entity),
            minitems: resolve(&self.minitems, entity),
            maxitems: resolve(&self.maxitems, entity),
            fixeditems: resolve(&self.fixeditems, entity),
        }
    }
}

// ─── Rule Values ────────────────────────────────────────────────────

/// A numeric threshold, inclusive unless `exclusive`.
///
/// Deserializes from a bare number (inclusive) or `{value, exclusive}`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "BoundRepr")]
pub struct Bound {
    pub value: f64,
    pub exclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Bound { value, exclusive: false }
    }

    pub fn exclusive(value: f64) -> Self {
        Bound { value, exclusive: true }
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Bound::inclusive(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoundRepr {
    Threshold(f64),
    Explicit {
        value: f64,
        #[serde(default)]
        exclusive: bool,
    },
}

impl From<BoundRepr> for Bound {
    fn from(repr: BoundRepr) -> Self {
        match repr {
            BoundRepr::Threshold(value) => Bound::inclusive(value),
            BoundRepr::Explicit { value, exclusive } => Bound { value, exclusive },
        }
    }
}

/// A regular expression a text value must match somewhere.
///
/// Deserializes from `"source"` or `["source", "flags"]`. Flags `i`, `m`
/// and `s` set case-insensitive, multi-line and dot-matches-newline; other
/// flags do not affect matching and are ignored.
///
/// The expression is compiled on first use and shared by every clone, so a
/// literal pattern compiles once per schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "PatternRepr")]
pub struct Pattern {
    source: String,
    flags: String,
    compiled: Arc<OnceLock<Result<Regex, regex::Error>>>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Pattern::with_flags(source, String::new())
    }

    pub fn with_flags(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Pattern { source: source.into(), flags: flags.into(), compiled: Arc::default() }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// The compiled expression, built on the first call.
    pub fn compile(&self) -> Result<&Regex, &regex::Error> {
        self.compiled
            .get_or_init(|| {
                let mut builder = RegexBuilder::new(&self.source);
                for flag in self.flags.chars() {
                    match flag {
                        'i' => builder.case_insensitive(true),
                        'm' => builder.multi_line(true),
                        's' => builder.dot_matches_new_line(true),
                        _ => &mut builder,
                    };
                }
                let built = builder.build();
                if let Err(err) = &built {
                    tracing::warn!(pattern = %self.source, error = %err, "text pattern does not compile");
                }
                built
            })
            .as_ref()
    }

    /// True iff the pattern compiles and matches `text`. A pattern that does
    /// not compile matches nothing.
    pub fn is_match(&self, text: &str) -> bool {
        self.compile().is_ok_and(|regex| regex.is_match(text))
    }

    #[cfg(test)]
    fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for Pattern {}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::new(source)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternRepr {
    Source(String),
    WithFlags(String, String),
}

impl From<PatternRepr> for Pattern {
    fn from(repr: PatternRepr) -> Self {
        match repr {
            PatternRepr::Source(source) => Pattern::new(source),
            PatternRepr::WithFlags(source, flags) => Pattern::with_flags(source, flags),
        }
    }
}

// ─── Resolved Rules ─────────────────────────────────────────────────

/// Common rules after evaluation. Absent boolean rules resolve to `false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedCommon {
    pub disabled: bool,
    pub invalid: bool,
    pub required: bool,
    pub requires: Option<Requirement>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTextRules {
    pub common: ResolvedCommon,
    pub minlength: Option<usize>,
    pub maxlength: Option<usize>,
    pub fixedlength: Option<usize>,
    pub pattern: Option<Pattern>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedNumberRules {
    pub common: ResolvedCommon,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    pub step: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSelectRules {
    pub common: ResolvedCommon,
    pub minselected: Option<usize>,
    pub maxselected: Option<usize>,
    pub fixedselected: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedListRules {
    pub common: ResolvedCommon,
    pub minitems: Option<usize>,
    pub maxitems: Option<usize>,
    pub fixeditems: Option<usize>,
}

impl ResolvedListRules {
    /// Item count the list never shrinks below: `fixeditems`, else
    /// `minitems`, else 0.
    pub fn floor(&self) -> usize {
        self.fixeditems.or(self.minitems).unwrap_or(0)
    }

    /// Whether a list holding `len` items may grow by one.
    pub fn admits_push(&self, len: usize) -> bool {
        !self.maxitems.is_some_and(|max| len >= max) && !self.fixeditems.is_some_and(|fixed| len >= fixed)
    }

    /// Whether a list holding `len` items may shrink by one.
    pub fn admits_pop(&self, len: usize) -> bool {
        !self.minitems.is_some_and(|min| len <= min) && !self.fixeditems.is_some_and(|fixed| len <= fixed)
    }
}

/// Resolved rules of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedRules {
    Group(ResolvedCommon),
    List(ResolvedListRules),
    Text(ResolvedTextRules),
    Number(ResolvedNumberRules),
    Select(ResolvedSelectRules),
}

impl ResolvedRules {
    pub fn common(&self) -> &ResolvedCommon {
        match self {
            ResolvedRules::Group(common) => common,
            ResolvedRules::List(rules) => &rules.common,
            ResolvedRules::Text(rules) => &rules.common,
            ResolvedRules::Number(rules) => &rules.common,
            ResolvedRules::Select(rules) => &rules.common,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_deserializes_from_both_shapes() {
        let bare: Bound = serde_json::from_str("3").expect("bare threshold");
        assert_eq!(bare, Bound::inclusive(3.0));
        let explicit: Bound =
            serde_json::from_str(r#"{"value": 3, "exclusive": true}"#).expect("explicit");
        assert_eq!(explicit, Bound::exclusive(3.0));
        let implicit: Bound = serde_json::from_str(r#"{"value": 1.5}"#).expect("explicit");
        assert_eq!(implicit, Bound::inclusive(1.5));
    }

    #[test]
    fn pattern_deserializes_from_both_shapes() {
        let plain: Pattern = serde_json::from_str(r#""^a+$""#).expect("plain");
        assert_eq!(plain, Pattern::new("^a+$"));
        let flagged: Pattern = serde_json::from_str(r#"["^a+$", "i"]"#).expect("pair");
        assert_eq!(flagged, Pattern::with_flags("^a+$", "i"));
    }

    #[test]
    fn pattern_flags_change_matching() {
        assert!(!Pattern::new("^geno$").is_match("GENO"));
        assert!(Pattern::with_flags("^geno$", "gi").is_match("GENO"));
        assert!(Pattern::with_flags("^b$", "m").is_match("a\nb"));
        assert!(Pattern::with_flags("a.b", "s").is_match("a\nb"));
    }

    #[test]
    fn pattern_matches_anywhere() {
        assert!(Pattern::new("geno").is_match("xgenox"));
    }

    #[test]
    fn broken_pattern_matches_nothing() {
        assert!(!Pattern::new("(unclosed").is_match("(unclosed"));
    }

    #[test]
    fn pattern_compiles_once_for_all_clones() {
        let pattern = Pattern::new("^a+$");
        let copy = pattern.clone();
        assert!(!copy.is_compiled());
        assert!(pattern.is_match("aaa"));
        assert!(copy.is_compiled());
        let first = pattern.compile().expect("compiles");
        let second = copy.compile().expect("compiles");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn text_rules_flatten_common_rules() {
        let rules: TextRules =
            serde_json::from_str(r#"{"required": true, "minlength": 2, "pattern": "x"}"#)
                .expect("rules");
        assert!(matches!(rules.common.required, Some(Rule::Literal(true))));
        assert!(matches!(rules.minlength, Some(Rule::Literal(2))));
        assert!(rules.maxlength.is_none());
    }

    #[test]
    fn list_floor_prefers_fixed_items() {
        let rules = ResolvedListRules {
            minitems: Some(2),
            fixeditems: Some(4),
            ..Default::default()
        };
        assert_eq!(rules.floor(), 4);
        assert_eq!(ResolvedListRules::default().floor(), 0);
    }

    #[test]
    fn list_bounds_gate_push_and_pop() {
        let rules = ResolvedListRules {
            minitems: Some(1),
            maxitems: Some(3),
            ..Default::default()
        };
        assert!(rules.admits_push(2));
        assert!(!rules.admits_push(3));
        assert!(rules.admits_pop(2));
        assert!(!rules.admits_pop(1));

        let fixed = ResolvedListRules { fixeditems: Some(2), ..Default::default() };
        assert!(!fixed.admits_push(2));
        assert!(!fixed.admits_pop(2));
        assert!(fixed.admits_push(1));
    }
}
