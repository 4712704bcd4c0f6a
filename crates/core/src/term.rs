//! Curriculum terms.
//!
//! A [`Term`] keeps the exact text it was written with (the grouping key for
//! statistics) next to its numeric value (the sort key). Intermediate terms
//! such as `"5.5"` sit between two ordinary terms.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Errors produced while parsing a term.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TermError {
    /// The text is empty or not a number
    #[error("invalid term '{0}': expected a number such as 3 or 5.5")]
    Invalid(String),

    /// The number is NaN or infinite
    #[error("invalid term '{0}': value must be finite")]
    NotFinite(String),
}

/// An ordered curriculum period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTerm", into = "String")]
pub struct Term {
    repr: String,
    value: f64,
}

impl Term {
    /// Parse a term from its textual form.
    pub fn parse(text: &str) -> Result<Self, TermError> {
        let repr = text.trim();
        if repr.is_empty() {
            return Err(TermError::Invalid(text.to_string()));
        }
        let value: f64 = repr
            .parse()
            .map_err(|_| TermError::Invalid(text.to_string()))?;
        if !value.is_finite() {
            return Err(TermError::NotFinite(text.to_string()));
        }
        Ok(Self {
            repr: repr.to_string(),
            value,
        })
    }

    /// An ordinary (integral) term.
    pub fn ordinal(n: u32) -> Self {
        Self {
            repr: n.to_string(),
            value: f64::from(n),
        }
    }

    /// Build from trusted parts; `repr` must spell `value`.
    pub(crate) fn from_parts(repr: &str, value: f64) -> Self {
        Self {
            repr: repr.to_string(),
            value,
        }
    }

    /// Exact representation, used as the grouping key.
    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// Numeric value, used for ordering.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether this term has a non-zero fractional part.
    pub fn is_intermediate(&self) -> bool {
        self.value.fract() != 0.0
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        if self.is_intermediate() {
            format!("Intermediate term {}", self.repr)
        } else {
            format!("Term {}", self.repr)
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Term {}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    /// Numeric order; equal values fall back to the representation so that
    /// `"5"` and `"5.0"` stay distinct but ordered deterministically.
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| self.repr.cmp(&other.repr))
    }
}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.repr.hash(state);
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr)
    }
}

impl std::str::FromStr for Term {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u32> for Term {
    fn from(n: u32) -> Self {
        Self::ordinal(n)
    }
}

impl From<i32> for Term {
    fn from(n: i32) -> Self {
        Self {
            repr: n.to_string(),
            value: f64::from(n),
        }
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        term.repr
    }
}

/// Stored terms may be JSON numbers or numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTerm {
    Int(i64),
    Float(f64),
    Text(String),
}

impl TryFrom<RawTerm> for Term {
    type Error = TermError;

    fn try_from(raw: RawTerm) -> Result<Self, Self::Error> {
        match raw {
            RawTerm::Int(n) => Self::parse(&n.to_string()),
            RawTerm::Float(x) => Self::parse(&x.to_string()),
            RawTerm::Text(s) => Self::parse(&s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Term {
        Term::parse(s).unwrap()
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        assert!(t("5.5") > t("5"));
        assert!(t("10") > t("9"));
        assert!(t("7.5") < t("8"));

        let mut terms = vec![t("10"), t("2"), t("5.5"), t("1"), t("5")];
        terms.sort();
        let reprs: Vec<_> = terms.iter().map(Term::as_str).collect();
        assert_eq!(reprs, vec!["1", "2", "5", "5.5", "10"]);
    }

    #[test]
    fn test_intermediate_detection() {
        assert!(t("5.5").is_intermediate());
        assert!(!t("5").is_intermediate());
        assert!(!t("5.0").is_intermediate());
        assert_eq!(t("7.5").label(), "Intermediate term 7.5");
        assert_eq!(Term::ordinal(3).label(), "Term 3");
    }

    #[test]
    fn test_same_value_distinct_representation() {
        assert_ne!(t("5"), t("5.0"));
        assert!(t("5") < t("5.0"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Term::parse(""), Err(TermError::Invalid(_))));
        assert!(matches!(Term::parse("fifth"), Err(TermError::Invalid(_))));
        assert!(matches!(Term::parse("inf"), Err(TermError::NotFinite(_))));
        assert_eq!(t(" 3 ").as_str(), "3");
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let terms: Vec<Term> = serde_json::from_str(r#"[1, "5.5", 7.5, "10"]"#).unwrap();
        let reprs: Vec<_> = terms.iter().map(Term::as_str).collect();
        assert_eq!(reprs, vec!["1", "5.5", "7.5", "10"]);

        let json = serde_json::to_string(&t("5.5")).unwrap();
        assert_eq!(json, "\"5.5\"");
    }
}
