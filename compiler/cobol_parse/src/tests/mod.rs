//! Whole-program tests: several divisions, nested units and error limits.

pub(crate) mod support;
