//! Shared test utilities for the export-diff workspace.
//!
//! This crate provides standardised archive fixtures so the core and CLI
//! test suites build export trees the same way. It is a dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`export`]: [`TestExport`] builder for extracted archive trees
//! - [`samples`]: canonical metadata and catalog documents

pub mod export;
pub mod samples;

pub use export::TestExport;
