//! Entry normalization
//!
//! Loads the content of a classified entry into a [`Value`] and rewrites the
//! substructures whose order or presence is an artifact of the producing
//! export: the metadata `timestamp` is dropped, catalog resources and each
//! resource's `tags` become sets. Everything else keeps its shape, so
//! sequence order stays significant wherever it is not rewritten here.

use std::collections::BTreeSet;

use crate::classify::EntryKind;
use crate::error::{Error, Result};
use crate::layout::{RESOURCES_PATH, TAGS_KEY, VOLATILE_METADATA_KEY};
use crate::value::{Scalar, Value, ValueKind};

/// Normalize the raw `content` of an entry of the given `kind`.
///
/// Only [`EntryKind::Metadata`] and [`EntryKind::DataRecord`] entries can be
/// normalized; other kinds yield [`Error::NotNormalizable`].
pub fn normalize(kind: EntryKind, content: &str) -> Result<Value> {
    match kind {
        EntryKind::Metadata => normalize_metadata(parse_document(kind, content)?),
        EntryKind::DataRecord => normalize_catalog(parse_document(kind, content)?),
        other => Err(Error::NotNormalizable(other)),
    }
}

fn parse_document(kind: EntryKind, content: &str) -> Result<Value> {
    let json: serde_json::Value =
        serde_json::from_str(content).map_err(|e| Error::parse(kind, e.to_string()))?;
    let value = Value::from(json);
    if value.kind() != ValueKind::Map {
        return Err(Error::shape(kind, "(root)", "a map"));
    }
    Ok(value)
}

fn normalize_metadata(mut value: Value) -> Result<Value> {
    if let Some(map) = value.as_map_mut() {
        map.remove(VOLATILE_METADATA_KEY);
    }
    Ok(value)
}

fn normalize_catalog(mut value: Value) -> Result<Value> {
    let kind = EntryKind::DataRecord;
    let [data_key, resources_key] = RESOURCES_PATH;
    let resources_path = RESOURCES_PATH.join(".");

    let data = value
        .as_map_mut()
        .and_then(|root| root.get_mut(data_key))
        .and_then(Value::as_map_mut)
        .ok_or_else(|| Error::shape(kind, data_key, "a map"))?;

    let Some(Value::Sequence(resources)) = data.remove(resources_key) else {
        return Err(Error::shape(kind, resources_path, "a sequence of resources"));
    };

    let resources = resources
        .into_iter()
        .enumerate()
        .map(|(index, resource)| normalize_resource(resource, &resources_path, index))
        .collect::<Result<BTreeSet<_>>>()?;

    data.insert(resources_key.to_string(), Value::Set(resources));
    Ok(value)
}

fn normalize_resource(mut resource: Value, resources_path: &str, index: usize) -> Result<Value> {
    let kind = EntryKind::DataRecord;
    let resource_path = format!("{resources_path}[{index}]");

    let fields = resource
        .as_map_mut()
        .ok_or_else(|| Error::shape(kind, &resource_path, "a map"))?;

    let tags = match fields.remove(TAGS_KEY) {
        None | Some(Value::Scalar(Scalar::Null)) => Value::set([]),
        Some(tags @ Value::Sequence(_)) => tags.into_set(),
        Some(_) => {
            return Err(Error::shape(
                kind,
                format!("{resource_path}.{TAGS_KEY}"),
                "a sequence of tags",
            ));
        }
    };
    fields.insert(TAGS_KEY.to_string(), tags);

    Ok(resource)
}
