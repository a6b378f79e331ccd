//! Label injection
//!
//! Built-in decision function that stamps a fixed set of labels onto every
//! admitted object. Labels already present with the same value are left
//! alone; differing values are replaced.

use std::collections::BTreeMap;

use kube::core::admission::AdmissionRequest;
use kube::core::DynamicObject;
use serde_json::Value;

use super::admit::{AdmitFunc, AdmitResult};
use super::patch::{self, AddOperation, PatchOperation, ReplaceOperation};

/// Adds configured labels to admitted objects
#[derive(Clone, Debug, Default)]
pub struct LabelInjector {
    labels: BTreeMap<String, String>,
}

impl LabelInjector {
    /// Create an injector for `labels`
    pub fn new(labels: BTreeMap<String, String>) -> Self {
        Self { labels }
    }

    /// Whether there is nothing to inject
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Operations bringing `existing` labels in line with the configured ones
    fn operations(&self, existing: Option<&BTreeMap<String, String>>) -> Vec<PatchOperation> {
        let Some(existing) = existing else {
            // No labels map yet: adding individual keys would fail to apply.
            let map = self
                .labels
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            return vec![PatchOperation::Add(AddOperation {
                path: patch::pointer(["metadata", "labels"]),
                value: Value::Object(map),
            })];
        };

        self.labels
            .iter()
            .filter_map(|(key, value)| {
                let path = patch::pointer(["metadata", "labels", key.as_str()]);
                match existing.get(key) {
                    Some(current) if current == value => None,
                    Some(_) => Some(PatchOperation::Replace(ReplaceOperation {
                        path,
                        value: Value::String(value.clone()),
                    })),
                    None => Some(PatchOperation::Add(AddOperation {
                        path,
                        value: Value::String(value.clone()),
                    })),
                }
            })
            .collect()
    }
}

impl AdmitFunc for LabelInjector {
    fn admit(&self, request: &AdmissionRequest<DynamicObject>) -> AdmitResult {
        if self.labels.is_empty() {
            return Ok(Vec::new());
        }
        let Some(object) = &request.object else {
            return Ok(Vec::new());
        };
        Ok(self.operations(object.metadata.labels.as_ref()))
    }
}

/// Parse a `key=value` label argument
pub fn parse_label(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("label '{s}' must be in key=value form"))?;
    if key.is_empty() {
        return Err(format!("label '{s}' has an empty key"));
    }
    Ok((key.to_string(), value.to_string()))
}
