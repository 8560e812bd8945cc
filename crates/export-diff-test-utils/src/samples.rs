//! Canonical export documents for tests.
//!
//! Shapes follow the export command's output: metadata carries a generation
//! timestamp, catalogs wrap a `data.resources` list whose entries carry
//! `tags`.

use serde_json::{Value, json};

/// Export metadata generated at `timestamp`.
pub fn metadata(timestamp: &str) -> Value {
    json!({
        "timestamp": timestamp,
        "command-versions": {
            "replace-catalog": 2
        }
    })
}

/// A small catalog for `certname` with three resources.
pub fn catalog(certname: &str) -> Value {
    json!({
        "metadata": {
            "api_version": 1
        },
        "data": {
            "name": certname,
            "version": "1359666434",
            "edges": [
                {
                    "source": {"type": "Class", "title": "Main"},
                    "target": {"type": "File", "title": "/etc/motd"},
                    "relationship": "contains"
                },
                {
                    "source": {"type": "Class", "title": "Main"},
                    "target": {"type": "Service", "title": "sshd"},
                    "relationship": "contains"
                }
            ],
            "resources": [
                {
                    "type": "Class",
                    "title": "Main",
                    "exported": false,
                    "tags": ["class", "main"],
                    "parameters": {}
                },
                {
                    "type": "File",
                    "title": "/etc/motd",
                    "exported": false,
                    "file": "/etc/puppet/manifests/site.pp",
                    "line": 3,
                    "tags": ["file", "class", "main", "node"],
                    "parameters": {
                        "ensure": "file",
                        "mode": "0644",
                        "content": "Welcome"
                    }
                },
                {
                    "type": "Service",
                    "title": "sshd",
                    "exported": false,
                    "file": "/etc/puppet/manifests/site.pp",
                    "line": 9,
                    "tags": ["service", "sshd", "class", "main"],
                    "parameters": {
                        "ensure": "running",
                        "enable": true
                    }
                }
            ]
        }
    })
}

fn resources_mut(catalog: &mut Value) -> &mut Vec<Value> {
    catalog["data"]["resources"]
        .as_array_mut()
        .expect("catalog has data.resources")
}

/// Reverse the `tags` list of every resource.
pub fn reverse_tags(catalog: &mut Value) {
    for resource in resources_mut(catalog) {
        if let Some(tags) = resource["tags"].as_array_mut() {
            tags.reverse();
        }
    }
}

/// Reverse the order of the resources list.
pub fn reverse_resources(catalog: &mut Value) {
    resources_mut(catalog).reverse();
}

/// Set `parameters.<key>` on the resource titled `title`.
pub fn set_parameter(catalog: &mut Value, title: &str, key: &str, value: Value) {
    let resource = resources_mut(catalog)
        .iter_mut()
        .find(|r| r["title"] == title)
        .unwrap_or_else(|| panic!("no resource titled {title}"));
    resource["parameters"][key] = value;
}
