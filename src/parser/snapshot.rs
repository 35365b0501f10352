//! JSON snapshot reader and writer.
//!
//! A snapshot is delivered wholesale: `{"nodes": [...], "edges": [...]}`.
//! Type, status and relation strings are normalized here, once, so nothing
//! downstream compares raw strings.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::graph::model::{Edge, Graph, Node, NodeType, Relation};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SnapshotDoc {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RawEdge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub relation: String,
}

/// Parse snapshot JSON into a normalized `Graph`.
pub fn parse(input: &str) -> Result<Graph> {
    let doc: SnapshotDoc = serde_json::from_str(input).context("invalid snapshot JSON")?;
    to_graph(doc)
}

/// Read and parse a snapshot file.
pub fn load(path: &Path) -> Result<Graph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to load snapshot {}", path.display()))
}

pub fn to_graph(doc: SnapshotDoc) -> Result<Graph> {
    let mut graph = Graph::new();
    for (i, raw) in doc.nodes.into_iter().enumerate() {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            bail!("node #{} has an empty id", i + 1);
        }
        if graph.contains(&id) {
            bail!("duplicate node id '{}' (node #{})", id, i + 1);
        }
        let title = if !raw.title.trim().is_empty() {
            raw.title.trim().to_string()
        } else if !raw.identifier.trim().is_empty() {
            raw.identifier.trim().to_string()
        } else {
            id.clone()
        };
        let mut node = Node::new(id, NodeType::parse(&raw.kind), title).with_status(&raw.status);
        node.description = raw.description;
        node.priority = raw.priority;
        node.labels = dedup_labels(raw.labels);
        node.project = raw.project;
        node.url = raw.url;
        node.identifier = raw.identifier;
        graph.add_node(node);
    }
    for raw in doc.edges {
        graph.add_edge(Edge::new(
            raw.from.trim(),
            raw.to.trim(),
            Relation::parse(&raw.relation),
        ));
    }
    Ok(graph)
}

pub fn from_graph(graph: &Graph) -> SnapshotDoc {
    SnapshotDoc {
        nodes: graph
            .nodes
            .iter()
            .map(|n| RawNode {
                id: n.id.clone(),
                kind: n.kind.label().to_string(),
                title: n.title.clone(),
                description: n.description.clone(),
                status: n.status_text.clone(),
                priority: n.priority,
                labels: n.labels.clone(),
                project: n.project.clone(),
                url: n.url.clone(),
                identifier: n.identifier.clone(),
            })
            .collect(),
        edges: graph
            .edges
            .iter()
            .map(|e| RawEdge {
                from: e.from.clone(),
                to: e.to.clone(),
                relation: e.relation.label().to_string(),
            })
            .collect(),
    }
}

pub fn serialize(graph: &Graph) -> Result<String> {
    let mut out = serde_json::to_string_pretty(&from_graph(graph))?;
    out.push('\n');
    Ok(out)
}

fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim().to_string();
        if !label.is_empty() && !out.contains(&label) {
            out.push(label);
        }
    }
    out
}
