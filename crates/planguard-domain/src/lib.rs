//! Pure compliance evaluation (no IO).
//!
//! Input: a plan model constructed elsewhere and a named rule set.
//! Output: violations + verdict + summary data.

#![forbid(unsafe_code)]

pub mod model;
pub mod policy;
pub mod report;
pub mod rules;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{evaluate, evaluate_with};
