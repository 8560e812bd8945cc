//! Command implementations for export-diff-cli

pub mod compare;
pub mod entry;

pub use compare::run_compare;
pub use entry::run_entry;
