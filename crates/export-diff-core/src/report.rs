//! Comparison report types and renderers
//!
//! Findings are split into two groups: structural findings describe the
//! shape of the archives (missing, extra, or unrecognized entries), content
//! findings describe what was found inside matched entries.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;

use crate::classify::EntryKind;
use crate::diff::{Divergence, DivergencePoint};

/// Which of the two archives a finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Path-set asymmetries and unknown archive contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "finding", rename_all = "snake_case")]
pub enum StructuralFinding {
    /// Present in the left archive, absent from the right one.
    MissingEntry { path: String },
    /// Present in the right archive, absent from the left one.
    ExtraEntry { path: String },
    /// Matches no classification rule. Never silently accepted.
    UnrecognizedEntry { path: String },
}

impl StructuralFinding {
    pub fn path(&self) -> &str {
        match self {
            Self::MissingEntry { path }
            | Self::ExtraEntry { path }
            | Self::UnrecognizedEntry { path } => path,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::MissingEntry { .. } => "missing",
            Self::ExtraEntry { .. } => "extra",
            Self::UnrecognizedEntry { .. } => "unrecognized",
        }
    }
}

/// Problems found inside entries present in both archives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFinding {
    /// Both sides normalized but their canonical values differ.
    Divergent {
        path: String,
        kind: EntryKind,
        divergence: Divergence,
    },
    /// One side could not be read or normalized.
    Invalid {
        path: String,
        side: Side,
        message: String,
    },
}

impl ContentFinding {
    pub fn path(&self) -> &str {
        match self {
            Self::Divergent { path, .. } | Self::Invalid { path, .. } => path,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Divergent {
                path,
                kind,
                divergence,
            } => json!({
                "finding": "divergent_entry",
                "path": path,
                "kind": kind,
                "diff": divergence.to_json(),
            }),
            Self::Invalid {
                path,
                side,
                message,
            } => json!({
                "finding": "invalid_entry",
                "path": path,
                "side": side,
                "message": message,
            }),
        }
    }
}

/// Result of comparing two extracted archives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonReport {
    pub left_root: PathBuf,
    pub right_root: PathBuf,
    /// Number of entries present on both sides that were normalized and diffed.
    pub entries_compared: usize,
    pub structural: Vec<StructuralFinding>,
    pub content: Vec<ContentFinding>,
}

impl ComparisonReport {
    pub fn new(left_root: impl Into<PathBuf>, right_root: impl Into<PathBuf>) -> Self {
        Self {
            left_root: left_root.into(),
            right_root: right_root.into(),
            entries_compared: 0,
            structural: Vec::new(),
            content: Vec::new(),
        }
    }

    /// The run passes iff there are no findings of any kind.
    pub fn passed(&self) -> bool {
        self.structural.is_empty() && self.content.is_empty()
    }

    pub fn finding_count(&self) -> usize {
        self.structural.len() + self.content.len()
    }

    /// Divergent entries only, in discovery order.
    pub fn divergent(&self) -> impl Iterator<Item = (&str, &Divergence)> {
        self.content.iter().filter_map(|finding| match finding {
            ContentFinding::Divergent {
                path, divergence, ..
            } => Some((path.as_str(), divergence)),
            ContentFinding::Invalid { .. } => None,
        })
    }

    /// Render as a JSON document for scripting.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "passed": self.passed(),
            "left_root": self.left_root.display().to_string(),
            "right_root": self.right_root.display().to_string(),
            "entries_compared": self.entries_compared,
            "structural": self.structural,
            "content": self.content.iter().map(ContentFinding::to_json).collect::<Vec<_>>(),
        })
    }
}

/// Human-readable rendering of a report.
pub fn render_text(report: &ComparisonReport) -> String {
    report.to_string()
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Compared {} against {}",
            self.left_root.display(),
            self.right_root.display()
        )?;
        writeln!(f, "Entries compared: {}", self.entries_compared)?;
        if self.passed() {
            writeln!(f, "Verdict: PASS")?;
            return Ok(());
        }
        writeln!(f, "Verdict: FAIL ({} findings)", self.finding_count())?;

        if !self.structural.is_empty() {
            writeln!(f)?;
            writeln!(f, "Structural findings ({}):", self.structural.len())?;
            for finding in &self.structural {
                writeln!(f, "  {:<13} {}", finding.label(), finding.path())?;
            }
        }

        if !self.content.is_empty() {
            writeln!(f)?;
            writeln!(f, "Content findings ({}):", self.content.len())?;
            for finding in &self.content {
                match finding {
                    ContentFinding::Divergent {
                        path,
                        kind,
                        divergence,
                    } => {
                        writeln!(f, "  {:<13} {} ({})", "divergent", path, kind)?;
                        write!(f, "{}", DivergenceDisplay::new(divergence, 6))?;
                    }
                    ContentFinding::Invalid {
                        path,
                        side,
                        message,
                    } => {
                        writeln!(f, "  {:<13} {} ({}): {}", "invalid", path, side, message)?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Human-readable rendering of a divergence tree, one line per point.
pub fn render_divergence(divergence: &Divergence) -> String {
    DivergenceDisplay::new(divergence, 0).to_string()
}

struct DivergenceDisplay<'a> {
    divergence: &'a Divergence,
    indent: usize,
}

impl<'a> DivergenceDisplay<'a> {
    fn new(divergence: &'a Divergence, indent: usize) -> Self {
        Self { divergence, indent }
    }
}

impl fmt::Display for DivergenceDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in self.divergence.points() {
            write_point(f, &point, self.indent)?;
        }
        Ok(())
    }
}

fn write_point(
    f: &mut fmt::Formatter<'_>,
    point: &DivergencePoint<'_>,
    indent: usize,
) -> fmt::Result {
    let path = if point.path.is_empty() {
        "(root)"
    } else {
        point.path.as_str()
    };

    match point.divergence {
        Divergence::Scalar { left, right } => {
            writeln!(f, "{:indent$}{}: {} -> {}", "", path, left, right)
        }
        Divergence::Mismatch { left, right } => {
            writeln!(f, "{:indent$}{}: {} -> {}", "", path, left, right)
        }
        Divergence::Set {
            left_only,
            right_only,
        } => {
            writeln!(
                f,
                "{:indent$}{}: {} left-only, {} right-only",
                "",
                path,
                left_only.len(),
                right_only.len()
            )?;
            for value in left_only {
                writeln!(f, "{:indent$}  < {}", "", value)?;
            }
            for value in right_only {
                writeln!(f, "{:indent$}  > {}", "", value)?;
            }
            for counterpart in point.divergence.counterparts() {
                writeln!(f, "{:indent$}  closest match for {}:", "", counterpart.left)?;
                for inner in counterpart.divergence.points() {
                    write_point(f, &inner, indent + 4)?;
                }
            }
            Ok(())
        }
        Divergence::Map(_) | Divergence::Sequence(_) => {
            unreachable!("divergence points are always leaves")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use crate::value::Value;
    use serde_json::json;

    fn divergence(left: serde_json::Value, right: serde_json::Value) -> Divergence {
        diff(&Value::from(left), &Value::from(right))
            .into_divergence()
            .unwrap()
    }

    #[test]
    fn test_empty_report_passes() {
        let report = ComparisonReport::new("a", "b");
        assert!(report.passed());
        assert_eq!(report.finding_count(), 0);
        assert!(render_text(&report).contains("Verdict: PASS"));
    }

    #[test]
    fn test_render_separates_structural_and_content() {
        let mut report = ComparisonReport::new("a", "b");
        report.structural.push(StructuralFinding::MissingEntry {
            path: "puppetdb-bak/catalogs/x.json".to_string(),
        });
        report.content.push(ContentFinding::Divergent {
            path: "puppetdb-bak/export-metadata.json".to_string(),
            kind: EntryKind::Metadata,
            divergence: divergence(json!({"version": 1}), json!({"version": 2})),
        });

        let text = render_text(&report);
        assert!(text.contains("Verdict: FAIL (2 findings)"));
        assert!(text.contains("Structural findings (1):"));
        assert!(text.contains("missing       puppetdb-bak/catalogs/x.json"));
        assert!(text.contains("Content findings (1):"));
        assert!(text.contains("version: 1 -> 2"));
    }

    #[test]
    fn test_render_set_lists_both_sides_and_counterparts() {
        let mut report = ComparisonReport::new("a", "b");
        let left = Value::set([Value::from(json!({"title": "motd", "mode": "0644"}))]);
        let right = Value::set([Value::from(json!({"title": "motd", "mode": "0755"}))]);
        report.content.push(ContentFinding::Divergent {
            path: "c.json".to_string(),
            kind: EntryKind::DataRecord,
            divergence: diff(&left, &right).into_divergence().unwrap(),
        });

        let text = render_text(&report);
        assert!(text.contains("(root): 1 left-only, 1 right-only"));
        assert!(text.contains(r#"< {"mode":"0644","title":"motd"}"#));
        assert!(text.contains(r#"> {"mode":"0755","title":"motd"}"#));
        assert!(text.contains(r#"mode: "0644" -> "0755""#));
    }

    #[test]
    fn test_render_absent_side() {
        let mut report = ComparisonReport::new("a", "b");
        report.content.push(ContentFinding::Divergent {
            path: "m.json".to_string(),
            kind: EntryKind::Metadata,
            divergence: divergence(json!({"extra": null}), json!({})),
        });

        assert!(render_text(&report).contains("extra: null -> (absent)"));
    }

    #[test]
    fn test_render_divergence_lists_points() {
        let text = render_divergence(&divergence(
            json!({"a": 1, "b": [true]}),
            json!({"a": 2, "b": [false]}),
        ));
        assert_eq!(text, "a: 1 -> 2\nb[0]: true -> false\n");
    }

    #[test]
    fn test_to_json_shape() {
        let mut report = ComparisonReport::new("a", "b");
        report.structural.push(StructuralFinding::ExtraEntry {
            path: "p".to_string(),
        });
        report.content.push(ContentFinding::Invalid {
            path: "q".to_string(),
            side: Side::Right,
            message: "bad".to_string(),
        });

        let json = report.to_json();
        assert_eq!(json["passed"], json!(false));
        assert_eq!(json["structural"][0], json!({"finding": "extra_entry", "path": "p"}));
        assert_eq!(json["content"][0]["side"], json!("right"));
        assert_eq!(json["content"][0]["finding"], json!("invalid_entry"));
    }
}
