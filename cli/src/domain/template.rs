//! CloudFormation template model.
//!
//! The provisioning engine consumes this document; `devfleet` only builds it.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

pub const FORMAT_VERSION: &str = "2010-09-09";

/// What CloudFormation does with a resource when it leaves the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemovalPolicy {
    Retain,
    Delete,
}

/// One entry under `Resources`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub kind: String,
    pub properties: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<RemovalPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<RemovalPolicy>,
}

impl Resource {
    #[must_use]
    pub fn new(kind: &str, properties: Value) -> Self {
        Self {
            kind: kind.to_string(),
            properties,
            depends_on: Vec::new(),
            deletion_policy: None,
            update_replace_policy: None,
        }
    }

    /// Apply the same policy on stack deletion and on replacement.
    #[must_use]
    pub fn removal(mut self, policy: RemovalPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self.update_replace_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn depends_on(mut self, logical_id: &str) -> Self {
        self.depends_on.push(logical_id.to_string());
        self
    }
}

/// One entry under `Outputs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub description: String,
    pub value: Value,
}

/// A complete template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    pub description: String,
    pub resources: BTreeMap<String, Resource>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, StackOutput>,
}

impl Template {
    #[must_use]
    pub fn new(description: &str) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            description: description.to_string(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Declare a resource and return a `Ref` to it.
    pub fn add(&mut self, logical_id: &str, resource: Resource) -> Value {
        self.resources.insert(logical_id.to_string(), resource);
        reference(logical_id)
    }

    pub fn output(&mut self, key: &str, description: &str, value: Value) {
        self.outputs.insert(
            key.to_string(),
            StackOutput {
                description: description.to_string(),
                value,
            },
        );
    }

    #[must_use]
    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Logical ids of every resource of the given type.
    #[must_use]
    pub fn ids_of_kind(&self, kind: &str) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|(_, r)| r.kind == kind)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

// ── Intrinsic functions ───────────────────────────────────────────────────────

#[must_use]
pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

#[must_use]
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

#[must_use]
pub fn sub(text: &str) -> Value {
    json!({ "Fn::Sub": text })
}

#[must_use]
pub fn join(parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": ["", parts] })
}

/// Render a value for humans: literals verbatim, intrinsics as a
/// placeholder naming what CloudFormation resolves at deploy time.
#[must_use]
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get("Ref") {
                return format!("<{id}>");
            }
            if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
                let parts: Vec<_> = parts.iter().filter_map(Value::as_str).collect();
                return format!("<{}>", parts.join("."));
            }
            if let Some(Value::String(text)) = map.get("Fn::Sub") {
                return text.clone();
            }
            if let Some(Value::Array(args)) = map.get("Fn::Join") {
                if let Some(Value::Array(parts)) = args.get(1) {
                    return parts.iter().map(describe_value).collect();
                }
            }
            value.to_string()
        }
        other => other.to_string(),
    }
}
