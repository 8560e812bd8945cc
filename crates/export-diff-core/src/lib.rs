//! Structural comparison of extracted PuppetDB export archives
//!
//! Classifies the entries of two extracted archives, normalizes the known
//! entry types into canonical values, and diffs them recursively. The result
//! is a report of missing, extra, unrecognized, and divergent entries, used to
//! check that an export/import round trip preserved the data.

pub mod classify;
pub mod compare;
pub mod diff;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod report;
pub mod value;

pub use classify::{Entry, EntryKind};
pub use compare::{ArchiveTree, compare_archives, compare_entry};
pub use diff::{Counterpart, Diff, Divergence, DivergencePoint, Operand, diff};
pub use error::{Error, Result};
pub use normalize::normalize;
pub use report::{
    ComparisonReport, ContentFinding, Side, StructuralFinding, render_divergence, render_text,
};
pub use value::{Number, Scalar, Value, ValueKind};
