//! Shared utilities.

pub mod csv;
pub mod receipt;
