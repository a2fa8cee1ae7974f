use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::category::Category;
use super::properties::NodeProperties;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PayloadNode {
    pub id: NodeId,
    pub labels: Vec<String>,
    pub category: Category,
    pub properties: NodeProperties,
}

#[derive(Clone, Debug)]
pub struct PayloadRelationship {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: String,
}

#[derive(Clone, Debug, Default)]
pub struct GraphPayload {
    pub nodes: Vec<PayloadNode>,
    pub relationships: Vec<PayloadRelationship>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawRelationship {
    from: NodeId,
    to: NodeId,
    #[serde(default, rename = "type")]
    kind: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawPayload {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    relationships: Vec<RawRelationship>,
}

impl GraphPayload {
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed: Value = serde_json::from_str(raw).context("invalid JSON in graph payload")?;
        let object = unwrap_payload(parsed, 0)?;
        let payload = RawPayload::deserialize(Value::Object(object))
            .context("graph payload does not match {nodes, relationships}")?;

        Ok(Self::from_raw(payload))
    }

    fn from_raw(raw: RawPayload) -> Self {
        let nodes = raw
            .nodes
            .into_iter()
            .map(|node| PayloadNode {
                category: Category::from_labels(&node.labels),
                properties: NodeProperties::from_map(node.properties),
                labels: node.labels,
                id: node.id,
            })
            .collect();

        let relationships = raw
            .relationships
            .into_iter()
            .map(|relationship| PayloadRelationship {
                from: relationship.from,
                to: relationship.to,
                kind: relationship.kind,
            })
            .collect();

        Self {
            nodes,
            relationships,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// Tool results arrive either as the object itself, as a JSON-encoded string, or wrapped
// under `result`.
fn unwrap_payload(value: Value, depth: usize) -> Result<Map<String, Value>> {
    if depth > 2 {
        return Err(anyhow!("graph payload is nested too deeply"));
    }

    match value {
        Value::String(inner) => {
            let parsed: Value = serde_json::from_str(&inner)
                .context("graph payload string does not contain JSON")?;
            unwrap_payload(parsed, depth + 1)
        }
        Value::Object(mut object) => {
            if object.contains_key("nodes") || object.contains_key("relationships") {
                return Ok(object);
            }
            match object.remove("result") {
                Some(inner) => unwrap_payload(inner, depth + 1),
                None => Err(anyhow!("graph payload has no `nodes` or `relationships`")),
            }
        }
        _ => Err(anyhow!("unexpected JSON type for graph payload")),
    }
}

pub fn load_graph_payload(path: &Path) -> Result<GraphPayload> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph payload {}", path.display()))?;
    let payload = GraphPayload::parse(&raw)
        .with_context(|| format!("failed to parse graph payload {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        nodes = payload.nodes.len(),
        relationships = payload.relationships.len(),
        "loaded graph payload"
    );
    Ok(payload)
}
