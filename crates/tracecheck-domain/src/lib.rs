//! Pure structured-logging call validation (no IO).
//!
//! Input: resolved syntax model of source files, constructed elsewhere.
//! Output: diagnostics with suggested fixes + verdict + summary data.

#![forbid(unsafe_code)]

pub mod checks;
pub mod classify;
pub mod edits;
pub mod fingerprint;
pub mod fix;
pub mod model;
pub mod policy;
pub mod printer;
pub mod registry;
pub mod report;
pub mod rules;
pub mod visit;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{Analyzer, evaluate};
