use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_EDGE_LABEL: &str = "RELATES_TO";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditorNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "subType", default)]
    pub sub_type: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl EditorNode {
    pub fn description(&self) -> &str {
        self.properties
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditorEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Owner of the editor's nodes and edges. The canvas only proposes changes; this type
/// applies them and assigns identities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorDocument {
    #[serde(default)]
    pub nodes: Vec<EditorNode>,
    #[serde(default)]
    pub edges: Vec<EditorEdge>,
}

impl EditorDocument {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid editor document JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read editor document {}", path.display()))?;
        let document = Self::parse(&raw)
            .with_context(|| format!("failed to parse editor document {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "loaded editor document"
        );
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("failed to encode editor document")?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write editor document {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved editor document");
        Ok(())
    }

    pub fn replace_nodes(&mut self, nodes: Vec<EditorNode>) {
        self.nodes = nodes;
    }

    pub fn create_edge(&mut self, source: &str, target: &str) -> &EditorEdge {
        let taken = self
            .edges
            .iter()
            .map(|edge| edge.id.as_str())
            .collect::<HashSet<_>>();
        let mut serial = self.edges.len() + 1;
        let id = loop {
            let candidate = format!("edge-{serial}");
            if !taken.contains(candidate.as_str()) {
                break candidate;
            }
            serial += 1;
        };

        tracing::debug!(%id, source, target, "created edge");
        self.edges.push(EditorEdge {
            id,
            source: source.to_owned(),
            target: target.to_owned(),
            label: Some(DEFAULT_EDGE_LABEL.to_owned()),
        });
        &self.edges[self.edges.len() - 1]
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|edge| edge.id != id);
        before != self.edges.len()
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id != id);
        if before == self.nodes.len() {
            return false;
        }
        self.edges
            .retain(|edge| edge.source != id && edge.target != id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "nodes": [
            { "id": "a", "type": "source", "subType": "table", "label": "orders",
              "x": 10, "y": 20, "properties": { "description": "Raw orders" } },
            { "id": "b", "type": "semantic", "label": "revenue", "x": 300, "y": 20 }
        ],
        "edges": [
            { "id": "edge-1", "source": "a", "target": "b", "label": "FEEDS" },
            { "id": "edge-3", "source": "a", "target": "b" }
        ]
    }"#;

    #[test]
    fn parses_editor_document() {
        let document = EditorDocument::parse(SAMPLE).expect("document parses");

        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.nodes[0].description(), "Raw orders");
        assert_eq!(document.nodes[1].sub_type, "");
        assert_eq!(document.nodes[1].description(), "");
        assert_eq!(document.edges[1].label, None);
    }

    #[test]
    fn created_edges_get_fresh_ids_and_default_label() {
        let mut document = EditorDocument::parse(SAMPLE).expect("document parses");

        let edge = document.create_edge("b", "a").clone();
        assert_eq!(edge.id, "edge-4");
        assert_eq!(edge.label.as_deref(), Some(DEFAULT_EDGE_LABEL));

        let next = document.create_edge("b", "a").clone();
        assert_eq!(next.id, "edge-5");
    }

    #[test]
    fn removing_a_node_drops_incident_edges() {
        let mut document = EditorDocument::parse(SAMPLE).expect("document parses");

        assert!(document.remove_node("a"));
        assert!(document.edges.is_empty());
        assert!(!document.remove_node("a"));
    }

    #[test]
    fn removes_single_parallel_edge() {
        let mut document = EditorDocument::parse(SAMPLE).expect("document parses");

        assert!(document.remove_edge("edge-3"));
        assert_eq!(document.edges.len(), 1);
        assert_eq!(document.edges[0].id, "edge-1");
    }
}
