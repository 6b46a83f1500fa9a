//! Tokenizer and parser for constraint specs.

use super::spec::{ConstraintTerm, ValueConstraintSpec};
use crate::error::GrammarError;

const EQUALS_MARKER: char = '=';
const NEGATION_MARKER: char = '~';
const RANGE_SEPARATOR: &str = "..";

/// A single classified token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Plain candidate value
    Value(String),
    /// Constraint term
    Term(ConstraintTerm),
}

/// Parse a single whitespace-delimited string into a spec.
pub fn parse_spec_str(raw: &str) -> Result<ValueConstraintSpec, GrammarError> {
    parse_spec(raw.split(' ').filter(|t| !t.is_empty()))
}

/// Parse already-split tokens into a spec.
pub fn parse_spec<S: AsRef<str>>(
    tokens: impl IntoIterator<Item = S>,
) -> Result<ValueConstraintSpec, GrammarError> {
    let mut spec = ValueConstraintSpec::default();
    for token in tokens {
        match parse_token(token.as_ref())? {
            Token::Value(v) => spec.values.push(v),
            Token::Term(t) => spec.constraints.push(t),
        }
    }
    Ok(spec)
}

/// Classify one token.
pub fn parse_token(token: &str) -> Result<Token, GrammarError> {
    let (negated, rest) = if let Some(rest) = token.strip_prefix(EQUALS_MARKER) {
        (false, rest)
    } else if let Some(rest) = token.strip_prefix(NEGATION_MARKER) {
        (true, rest)
    } else {
        return Ok(Token::Value(token.to_string()));
    };

    if rest.is_empty() {
        return Err(GrammarError::EmptyConstraint {
            token: token.to_string(),
        });
    }
    if rest.starts_with(EQUALS_MARKER) || rest.starts_with(NEGATION_MARKER) {
        return Err(GrammarError::MixedMarkers {
            token: token.to_string(),
        });
    }

    let term = match rest.split_once(RANGE_SEPARATOR) {
        Some((low, high)) => {
            let (low, high) = parse_range(token, low, high)?;
            if negated {
                ConstraintTerm::NotInRange { low, high }
            } else {
                ConstraintTerm::InRange { low, high }
            }
        }
        None if negated => ConstraintTerm::NotEquals(rest.to_string()),
        None => ConstraintTerm::Equals(rest.to_string()),
    };
    Ok(Token::Term(term))
}

fn parse_range(token: &str, low: &str, high: &str) -> Result<(f64, f64), GrammarError> {
    if low.is_empty() || high.is_empty() {
        return Err(GrammarError::EmptyRangeBound {
            token: token.to_string(),
        });
    }
    let bound = |text: &str| {
        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| GrammarError::InvalidRangeBound {
                token: token.to_string(),
                bound: text.to_string(),
            })
    };
    let (low, high) = (bound(low)?, bound(high)?);
    if low > high {
        return Err(GrammarError::InvertedRange {
            token: token.to_string(),
        });
    }
    Ok((low, high))
}
