//! One-shot maintenance jobs, run from the CLI.

pub mod reconcile;
pub mod seed;
