//! Structural diff over canonical values
//!
//! [`diff`] compares two [`Value`]s recursively and returns a [`Diff`] that
//! holds only the points that actually diverge. Maps are compared by key,
//! sequences by position (no alignment), sets by membership, and scalars by
//! value. Values of different variant cases never reconcile.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::value::{Scalar, Value};

/// Outcome of comparing two values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diff {
    Equal,
    Divergent(Divergence),
}

impl Diff {
    pub fn is_equal(&self) -> bool {
        matches!(self, Self::Equal)
    }

    pub fn divergence(&self) -> Option<&Divergence> {
        match self {
            Self::Equal => None,
            Self::Divergent(divergence) => Some(divergence),
        }
    }

    pub fn into_divergence(self) -> Option<Divergence> {
        match self {
            Self::Equal => None,
            Self::Divergent(divergence) => Some(divergence),
        }
    }
}

/// One side of a divergent pair. `Absent` is distinct from an explicit null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Present(Value),
    Absent,
}

impl Operand {
    fn from_option(value: Option<&Value>) -> Self {
        value.map_or(Self::Absent, |v| Self::Present(v.clone()))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(value) => write!(f, "{value}"),
            Self::Absent => f.write_str("(absent)"),
        }
    }
}

/// A non-empty difference between two values.
///
/// Every leaf of the tree is an actual point of divergence; subtrees that
/// compare equal are never included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divergence {
    /// Different variant cases, or a value compared against nothing.
    Mismatch { left: Operand, right: Operand },
    /// Diverging keys only.
    Map(BTreeMap<String, Divergence>),
    /// Diverging indices only, up to the longer of the two sequences.
    Sequence(BTreeMap<usize, Divergence>),
    Set {
        left_only: BTreeSet<Value>,
        right_only: BTreeSet<Value>,
    },
    Scalar { left: Scalar, right: Scalar },
}

/// A leaf of a [`Divergence`] tree together with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivergencePoint<'a> {
    /// Dotted key path with bracketed indices, e.g. `data.edges[3]`.
    /// Empty for the document root.
    pub path: String,
    pub divergence: &'a Divergence,
}

/// A left-only set element paired with its most similar right-only element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterpart<'a> {
    pub left: &'a Value,
    pub right: &'a Value,
    pub divergence: Divergence,
}

/// Compare two values.
pub fn diff(left: &Value, right: &Value) -> Diff {
    match compare(left, right) {
        Some(divergence) => Diff::Divergent(divergence),
        None => Diff::Equal,
    }
}

fn compare(left: &Value, right: &Value) -> Option<Divergence> {
    match (left, right) {
        (Value::Map(l), Value::Map(r)) => compare_maps(l, r),
        (Value::Sequence(l), Value::Sequence(r)) => compare_sequences(l, r),
        (Value::Set(l), Value::Set(r)) => compare_sets(l, r),
        (Value::Scalar(l), Value::Scalar(r)) => (l != r).then(|| Divergence::Scalar {
            left: l.clone(),
            right: r.clone(),
        }),
        _ => Some(Divergence::Mismatch {
            left: Operand::Present(left.clone()),
            right: Operand::Present(right.clone()),
        }),
    }
}

fn compare_slots(left: Option<&Value>, right: Option<&Value>) -> Option<Divergence> {
    match (left, right) {
        (Some(l), Some(r)) => compare(l, r),
        (None, None) => None,
        _ => Some(Divergence::Mismatch {
            left: Operand::from_option(left),
            right: Operand::from_option(right),
        }),
    }
}

fn compare_maps(
    left: &BTreeMap<String, Value>,
    right: &BTreeMap<String, Value>,
) -> Option<Divergence> {
    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
    let divergent: BTreeMap<String, Divergence> = keys
        .into_iter()
        .filter_map(|key| {
            compare_slots(left.get(key), right.get(key)).map(|d| (key.clone(), d))
        })
        .collect();

    (!divergent.is_empty()).then_some(Divergence::Map(divergent))
}

fn compare_sequences(left: &[Value], right: &[Value]) -> Option<Divergence> {
    let len = left.len().max(right.len());
    let divergent: BTreeMap<usize, Divergence> = (0..len)
        .filter_map(|index| compare_slots(left.get(index), right.get(index)).map(|d| (index, d)))
        .collect();

    (!divergent.is_empty()).then_some(Divergence::Sequence(divergent))
}

fn compare_sets(left: &BTreeSet<Value>, right: &BTreeSet<Value>) -> Option<Divergence> {
    let left_only: BTreeSet<Value> = left.difference(right).cloned().collect();
    let right_only: BTreeSet<Value> = right.difference(left).cloned().collect();

    if left_only.is_empty() && right_only.is_empty() {
        None
    } else {
        Some(Divergence::Set {
            left_only,
            right_only,
        })
    }
}

impl Divergence {
    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Map(children) => children.values().map(Divergence::leaf_count).sum(),
            Self::Sequence(children) => children.values().map(Divergence::leaf_count).sum(),
            Self::Mismatch { .. } | Self::Set { .. } | Self::Scalar { .. } => 1,
        }
    }

    /// Flatten the tree into its leaves, in key and index order.
    pub fn points(&self) -> Vec<DivergencePoint<'_>> {
        let mut points = Vec::new();
        self.collect_points(String::new(), &mut points);
        points
    }

    fn collect_points<'a>(&'a self, path: String, points: &mut Vec<DivergencePoint<'a>>) {
        match self {
            Self::Map(children) => {
                for (key, child) in children {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    child.collect_points(child_path, points);
                }
            }
            Self::Sequence(children) => {
                for (index, child) in children {
                    child.collect_points(format!("{}[{}]", path, index), points);
                }
            }
            leaf => points.push(DivergencePoint {
                path,
                divergence: leaf,
            }),
        }
    }

    /// Pair left-only map elements of a set divergence with the closest
    /// right-only map element.
    ///
    /// Right-only maps are indexed by their `(key, value)` fields, so a pair
    /// is only formed when the two maps agree on at least one field. Only the
    /// candidates sharing the most fields are diffed; among those, fewer
    /// divergence points win and ties go to the element that sorts first.
    /// Each right-only element is paired at most once. Returns nothing for
    /// non-set divergences.
    pub fn counterparts(&self) -> Vec<Counterpart<'_>> {
        let Self::Set {
            left_only,
            right_only,
        } = self
        else {
            return Vec::new();
        };

        let candidates: Vec<(&Value, &BTreeMap<String, Value>)> = right_only
            .iter()
            .filter_map(|value| value.as_map().map(|fields| (value, fields)))
            .collect();

        let mut by_field: HashMap<(&str, &Value), Vec<usize>> = HashMap::new();
        for (index, (_, fields)) in candidates.iter().enumerate() {
            for (key, value) in fields.iter() {
                by_field.entry((key.as_str(), value)).or_default().push(index);
            }
        }

        let mut taken = vec![false; candidates.len()];
        let mut pairs = Vec::new();

        for left in left_only {
            let Some(fields) = left.as_map() else {
                continue;
            };

            let mut shared: BTreeMap<usize, usize> = BTreeMap::new();
            for (key, value) in fields {
                for &index in by_field.get(&(key.as_str(), value)).into_iter().flatten() {
                    if !taken[index] {
                        *shared.entry(index).or_default() += 1;
                    }
                }
            }
            let Some(&most) = shared.values().max() else {
                continue;
            };

            let best = shared
                .iter()
                .filter(|(_, count)| **count == most)
                .filter_map(|(&index, _)| {
                    compare(left, candidates[index].0)
                        .map(|divergence| (divergence.leaf_count(), index, divergence))
                })
                .min_by_key(|(leaves, index, _)| (*leaves, *index));

            if let Some((_, index, divergence)) = best {
                taken[index] = true;
                pairs.push(Counterpart {
                    left,
                    right: candidates[index].0,
                    divergence,
                });
            }
        }

        pairs
    }

    /// Explicit JSON rendering of every case.
    ///
    /// Maps render as objects of their diverging keys, sequences as objects
    /// keyed `[i]`, sets as `left_only`/`right_only` lists, and leaf pairs as
    /// `left`/`right` with any absent side omitted and named under `absent`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{Map, Value as Json};

        match self {
            Self::Map(children) => Json::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_json()))
                    .collect(),
            ),
            Self::Sequence(children) => Json::Object(
                children
                    .iter()
                    .map(|(index, child)| (format!("[{}]", index), child.to_json()))
                    .collect(),
            ),
            Self::Set {
                left_only,
                right_only,
            } => {
                let mut out = Map::new();
                out.insert(
                    "left_only".to_string(),
                    Json::Array(left_only.iter().map(Value::to_json).collect()),
                );
                out.insert(
                    "right_only".to_string(),
                    Json::Array(right_only.iter().map(Value::to_json).collect()),
                );
                Json::Object(out)
            }
            Self::Scalar { left, right } => {
                let mut out = Map::new();
                out.insert("left".to_string(), Value::Scalar(left.clone()).to_json());
                out.insert("right".to_string(), Value::Scalar(right.clone()).to_json());
                Json::Object(out)
            }
            Self::Mismatch { left, right } => {
                let mut out = Map::new();
                for (side, operand) in [("left", left), ("right", right)] {
                    match operand {
                        Operand::Present(value) => {
                            out.insert(side.to_string(), value.to_json());
                        }
                        Operand::Absent => {
                            out.insert("absent".to_string(), Json::String(side.to_string()));
                        }
                    }
                }
                Json::Object(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_equal_maps() {
        let left = v(json!({"a": 1, "b": [1, 2]}));
        let right = v(json!({"b": [1, 2], "a": 1}));
        assert!(diff(&left, &right).is_equal());
    }

    #[test]
    fn test_map_reports_only_divergent_keys() {
        let result = diff(
            &v(json!({"same": 1, "changed": "x"})),
            &v(json!({"same": 1, "changed": "y"})),
        );

        let expected = Divergence::Map(BTreeMap::from([(
            "changed".to_string(),
            Divergence::Scalar {
                left: Scalar::String("x".into()),
                right: Scalar::String("y".into()),
            },
        )]));
        assert_eq!(result, Diff::Divergent(expected));
    }

    #[test]
    fn test_missing_key_is_absent_not_null() {
        let result = diff(&v(json!({"a": null})), &v(json!({})));

        let Some(Divergence::Map(children)) = result.divergence() else {
            panic!("Expected map divergence, got {result:?}");
        };
        assert_eq!(
            children["a"],
            Divergence::Mismatch {
                left: Operand::Present(Value::null()),
                right: Operand::Absent,
            }
        );
    }

    #[test]
    fn test_sequence_is_positional() {
        let result = diff(&v(json!([1, 2, 3])), &v(json!([1, 3, 2])));

        let Some(Divergence::Sequence(children)) = result.divergence() else {
            panic!("Expected sequence divergence, got {result:?}");
        };
        assert_eq!(children.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_sequence_pads_to_longer_side() {
        let result = diff(&v(json!([1])), &v(json!([1, 2, 3])));

        let Some(Divergence::Sequence(children)) = result.divergence() else {
            panic!("Expected sequence divergence, got {result:?}");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(
            children[&2],
            Divergence::Mismatch {
                left: Operand::Absent,
                right: Operand::Present(Value::integer(3)),
            }
        );
    }

    #[test]
    fn test_set_ignores_order() {
        let left = Value::set([Value::string("a"), Value::string("b")]);
        let right = Value::set([Value::string("b"), Value::string("a")]);
        assert!(diff(&left, &right).is_equal());
    }

    #[test]
    fn test_set_reports_both_differences() {
        let left = Value::set([Value::string("a"), Value::string("b")]);
        let right = Value::set([Value::string("b"), Value::string("c")]);

        assert_eq!(
            diff(&left, &right),
            Diff::Divergent(Divergence::Set {
                left_only: BTreeSet::from([Value::string("a")]),
                right_only: BTreeSet::from([Value::string("c")]),
            })
        );
    }

    #[test]
    fn test_different_variants_do_not_reconcile() {
        let seq = Value::sequence([Value::integer(1)]);
        let set = Value::set([Value::integer(1)]);

        assert_eq!(
            diff(&seq, &set),
            Diff::Divergent(Divergence::Mismatch {
                left: Operand::Present(seq.clone()),
                right: Operand::Present(set.clone()),
            })
        );
    }

    #[test]
    fn test_points_paths() {
        let result = diff(
            &v(json!({"config": {"host": "a"}, "items": [1, 2]})),
            &v(json!({"config": {"host": "b"}, "items": [1, 3]})),
        );
        let divergence = result.into_divergence().unwrap();
        let paths: Vec<String> = divergence.points().into_iter().map(|p| p.path).collect();

        assert_eq!(paths, vec!["config.host", "items[1]"]);
        assert_eq!(divergence.leaf_count(), 2);
    }

    #[test]
    fn test_root_scalar_point_has_empty_path() {
        let divergence = diff(&Value::integer(1), &Value::integer(2))
            .into_divergence()
            .unwrap();
        let points = divergence.points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].path, "");
    }

    #[test]
    fn test_counterparts_pair_closest_maps() {
        let left = Value::set([
            v(json!({"title": "a", "mode": "0644"})),
            v(json!({"title": "b", "mode": "0600"})),
        ]);
        let right = Value::set([
            v(json!({"title": "a", "mode": "0755"})),
            v(json!({"title": "b", "mode": "0700"})),
        ]);

        let divergence = diff(&left, &right).into_divergence().unwrap();
        let pairs = divergence.counterparts();

        assert_eq!(pairs.len(), 2);
        for pair in &pairs {
            assert_eq!(pair.left.get("title"), pair.right.get("title"));
            assert_eq!(pair.divergence.leaf_count(), 1);
        }
        let b = pairs
            .iter()
            .find(|p| p.left.get("title") == Some(&Value::string("b")))
            .unwrap();
        assert_eq!(b.right.get("mode"), Some(&Value::string("0700")));
    }

    #[test]
    fn test_counterparts_prefer_most_shared_fields() {
        let left = Value::set([v(json!({
            "type": "File", "title": "/etc/motd", "exported": false, "mode": "0644"
        }))]);
        let right = Value::set([
            v(json!({"type": "Service", "title": "sshd", "exported": false})),
            v(json!({"type": "File", "title": "/etc/motd", "exported": false, "mode": "0755"})),
        ]);

        let divergence = diff(&left, &right).into_divergence().unwrap();
        let pairs = divergence.counterparts();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].right.get("title"), Some(&Value::string("/etc/motd")));
        let points = pairs[0].divergence.points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].path, "mode");
    }

    #[test]
    fn test_counterparts_pair_each_right_element_once() {
        let left = Value::set([
            v(json!({"title": "a", "mode": "1"})),
            v(json!({"title": "a", "mode": "2"})),
        ]);
        let right = Value::set([v(json!({"title": "a", "mode": "3"}))]);

        let divergence = diff(&left, &right).into_divergence().unwrap();
        assert_eq!(divergence.counterparts().len(), 1);
    }

    #[test]
    fn test_points_are_always_leaves() {
        let divergence = diff(
            &v(json!({"a": {"b": [1, {"c": 2}]}, "d": [[true]]})),
            &v(json!({"a": {"b": [1, {"c": 3}]}, "d": [[false]]})),
        )
        .into_divergence()
        .unwrap();

        let points = divergence.points();
        assert_eq!(points.len(), 2);
        for point in &points {
            assert!(!matches!(
                point.divergence,
                Divergence::Map(_) | Divergence::Sequence(_)
            ));
        }
        assert_eq!(points[0].path, "a.b[1].c");
        assert_eq!(points[1].path, "d[0][0]");
    }

    #[test]
    fn test_counterparts_skip_unrelated_maps() {
        let left = Value::set([v(json!({"a": 1}))]);
        let right = Value::set([v(json!({"b": 2}))]);

        let divergence = diff(&left, &right).into_divergence().unwrap();
        assert!(divergence.counterparts().is_empty());
    }

    #[test]
    fn test_to_json_set_and_absent() {
        let result = diff(&v(json!({"gone": 1})), &v(json!({})));
        assert_eq!(
            result.divergence().unwrap().to_json(),
            json!({"gone": {"left": 1, "absent": "right"}})
        );

        let sets = diff(
            &Value::set([Value::string("x")]),
            &Value::set([Value::string("y")]),
        );
        assert_eq!(
            sets.divergence().unwrap().to_json(),
            json!({"left_only": ["x"], "right_only": ["y"]})
        );
    }

    #[test]
    fn test_to_json_sequence_keys() {
        let result = diff(&v(json!([1, 2])), &v(json!([1, 5])));
        assert_eq!(
            result.divergence().unwrap().to_json(),
            json!({"[1]": {"left": 2, "right": 5}})
        );
    }
}
