//! Total predicates over [`Value`].
//!
//! Every predicate returns a [`Decision`] for every variant it can be handed, so a rule never
//! has to guess what a missing, null, unknown, or oddly shaped attribute means:
//!
//! - `Unknown` always decides `Unverifiable` (never a violation).
//! - `Null` decides whatever the caller passes as `on_null`; each rule states its own policy.
//! - Any other shape the predicate was not written for decides `NotApplicable`.

use crate::model::{ShapeMismatch, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Compliant,
    Violation,
    /// The deciding value is computed at apply time.
    Unverifiable,
    /// The attribute has a shape the rule does not handle.
    NotApplicable,
}

impl Decision {
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Decision::Compliant
        } else {
            Decision::Violation
        }
    }

    pub fn is_violation(self) -> bool {
        self == Decision::Violation
    }

    /// Either side satisfies. Precedence: compliant, unverifiable, not applicable, violation.
    pub fn or(self, other: Decision) -> Decision {
        if or_rank(other) < or_rank(self) {
            other
        } else {
            self
        }
    }

    /// Both sides must satisfy. Precedence: violation, unverifiable, not applicable, compliant.
    pub fn and(self, other: Decision) -> Decision {
        if and_rank(other) < and_rank(self) {
            other
        } else {
            self
        }
    }
}

fn or_rank(d: Decision) -> u8 {
    match d {
        Decision::Compliant => 0,
        Decision::Unverifiable => 1,
        Decision::NotApplicable => 2,
        Decision::Violation => 3,
    }
}

fn and_rank(d: Decision) -> u8 {
    match d {
        Decision::Violation => 0,
        Decision::Unverifiable => 1,
        Decision::NotApplicable => 2,
        Decision::Compliant => 3,
    }
}

/// Folds with [`Decision::or`]; an empty input is a violation (nothing satisfied it).
pub fn any_of(decisions: impl IntoIterator<Item = Decision>) -> Decision {
    decisions
        .into_iter()
        .reduce(Decision::or)
        .unwrap_or(Decision::Violation)
}

/// Folds with [`Decision::and`]; an empty input is compliant.
pub fn all_of(decisions: impl IntoIterator<Item = Decision>) -> Decision {
    decisions
        .into_iter()
        .reduce(Decision::and)
        .unwrap_or(Decision::Compliant)
}

/// Applies `pred` to a looked-up attribute, routing shape mismatches to `NotApplicable`.
pub fn at(attr: Result<&Value, ShapeMismatch>, pred: impl FnOnce(&Value) -> Decision) -> Decision {
    match attr {
        Ok(v) => pred(v),
        Err(_) => Decision::NotApplicable,
    }
}

pub fn is_true(v: &Value, on_null: Decision) -> Decision {
    match v {
        Value::Bool(b) => Decision::from_bool(*b),
        Value::Unknown => Decision::Unverifiable,
        Value::Null => on_null,
        Value::Number(_) | Value::String(_) | Value::List(_) | Value::Object(_) => {
            Decision::NotApplicable
        }
    }
}

/// `v >= threshold`; the boundary itself is compliant.
pub fn at_least(v: &Value, threshold: f64, on_null: Decision) -> Decision {
    match v {
        Value::Number(n) => Decision::from_bool(*n >= threshold),
        Value::Unknown => Decision::Unverifiable,
        Value::Null => on_null,
        Value::Bool(_) | Value::String(_) | Value::List(_) | Value::Object(_) => {
            Decision::NotApplicable
        }
    }
}

/// Non-blank string, non-empty list, or non-empty object.
pub fn non_empty(v: &Value, on_null: Decision) -> Decision {
    match v {
        Value::String(s) => Decision::from_bool(!s.trim().is_empty()),
        Value::List(items) => Decision::from_bool(!items.is_empty()),
        Value::Object(map) => Decision::from_bool(!map.is_empty()),
        Value::Unknown => Decision::Unverifiable,
        Value::Null => on_null,
        Value::Bool(_) | Value::Number(_) => Decision::NotApplicable,
    }
}

pub fn string_in(v: &Value, allowed: &[&str], on_null: Decision) -> Decision {
    match v {
        Value::String(s) => Decision::from_bool(allowed.contains(&s.as_str())),
        Value::Unknown => Decision::Unverifiable,
        Value::Null => on_null,
        Value::Bool(_) | Value::Number(_) | Value::List(_) | Value::Object(_) => {
            Decision::NotApplicable
        }
    }
}

/// Some element of a list satisfies `pred`. An empty list is a violation.
pub fn any_element(v: &Value, on_null: Decision, pred: impl Fn(&Value) -> Decision) -> Decision {
    match v {
        Value::List(items) => any_of(items.iter().map(pred)),
        Value::Unknown => Decision::Unverifiable,
        Value::Null => on_null,
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_) => {
            Decision::NotApplicable
        }
    }
}

/// Every element of a list satisfies `pred`. An empty list is compliant.
pub fn every_element(v: &Value, on_null: Decision, pred: impl Fn(&Value) -> Decision) -> Decision {
    match v {
        Value::List(items) => all_of(items.iter().map(pred)),
        Value::Unknown => Decision::Unverifiable,
        Value::Null => on_null,
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_) => {
            Decision::NotApplicable
        }
    }
}
