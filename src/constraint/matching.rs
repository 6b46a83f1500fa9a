//! Evaluation of constraint terms against candidate values.

use super::spec::ConstraintTerm;

/// Outcome of matching one parameter between a take and a give pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMatch {
    /// The take side states no terms for this parameter
    Unconstrained,
    /// Every term is met by the offered values
    Satisfied,
    /// Some term is not met
    Contradiction,
}

/// Check a single term against a single value.
///
/// Equality compares the raw text, falling back to numeric comparison when
/// both sides parse as numbers. Values that are not numbers never fall
/// inside a range.
pub fn term_matches(term: &ConstraintTerm, value: &str) -> bool {
    match term {
        ConstraintTerm::Equals(expected) => values_equal(expected, value),
        ConstraintTerm::NotEquals(excluded) => !values_equal(excluded, value),
        ConstraintTerm::InRange { low, high } => in_range(*low, *high, value),
        ConstraintTerm::NotInRange { low, high } => !in_range(*low, *high, value),
    }
}

/// Evaluate the take side's `terms` against the give side's `values`.
///
/// Positive terms require at least one offered value to match. Negated
/// terms require every offered value to match, so an offered value that a
/// negated term rejects is a contradiction.
pub fn evaluate(terms: &[ConstraintTerm], values: &[String]) -> ParamMatch {
    if terms.is_empty() {
        return ParamMatch::Unconstrained;
    }
    if values.is_empty() {
        return ParamMatch::Contradiction;
    }

    let all_met = terms.iter().all(|term| {
        if term.is_negated() {
            values.iter().all(|v| term_matches(term, v))
        } else {
            values.iter().any(|v| term_matches(term, v))
        }
    });

    if all_met {
        ParamMatch::Satisfied
    } else {
        ParamMatch::Contradiction
    }
}

fn values_equal(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

fn in_range(low: f64, high: f64, value: &str) -> bool {
    value
        .parse::<f64>()
        .map(|v| low <= v && v <= high)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::parse_spec_str;

    fn check(terms: &str, values: &str) -> ParamMatch {
        let terms = parse_spec_str(terms).unwrap().constraints;
        let values = parse_spec_str(values).unwrap().values;
        evaluate(&terms, &values)
    }

    #[test]
    fn test_equality() {
        assert_eq!(check("=gpio", "gpio"), ParamMatch::Satisfied);
        assert_eq!(check("=gpio", "uart gpio"), ParamMatch::Satisfied);
        assert_eq!(check("=gpio", "uart"), ParamMatch::Contradiction);
        assert_eq!(check("=3.3", "3.30"), ParamMatch::Satisfied);
    }

    #[test]
    fn test_unconstrained() {
        assert_eq!(check("", "anything"), ParamMatch::Unconstrained);
    }

    #[test]
    fn test_no_values_offered() {
        assert_eq!(check("~uart", ""), ParamMatch::Contradiction);
    }

    #[test]
    fn test_negation_rejects_any_excluded_value() {
        assert_eq!(check("~5", "3.3"), ParamMatch::Satisfied);
        assert_eq!(check("~5", "3.3 5"), ParamMatch::Contradiction);
    }

    #[test]
    fn test_terms_are_anded() {
        assert_eq!(check("=gpio =pwm", "gpio pwm"), ParamMatch::Satisfied);
        assert_eq!(check("=gpio =pwm", "gpio"), ParamMatch::Contradiction);
        assert_eq!(check("=gpio ~uart", "gpio uart"), ParamMatch::Contradiction);
    }

    #[test]
    fn test_range_bounds_inclusive() {
        assert_eq!(check("=1.8..3.3", "1.8"), ParamMatch::Satisfied);
        assert_eq!(check("=1.8..3.3", "3.3"), ParamMatch::Satisfied);
        assert_eq!(check("=1.8..3.3", "3.31"), ParamMatch::Contradiction);
        assert_eq!(check("=1.8..3.3", "1.79"), ParamMatch::Contradiction);
        assert_eq!(check("=1.8..3.3", "5 2.5"), ParamMatch::Satisfied);
    }

    #[test]
    fn test_negated_range_bounds_inclusive() {
        assert_eq!(check("~0..1", "1"), ParamMatch::Contradiction);
        assert_eq!(check("~0..1", "0"), ParamMatch::Contradiction);
        assert_eq!(check("~0..1", "1.01"), ParamMatch::Satisfied);
        assert_eq!(check("~0..1", "-0.01 2"), ParamMatch::Satisfied);
    }

    #[test]
    fn test_non_numeric_never_in_range() {
        assert_eq!(check("=0..10", "fast"), ParamMatch::Contradiction);
        assert_eq!(check("~0..10", "fast"), ParamMatch::Satisfied);
    }
}
