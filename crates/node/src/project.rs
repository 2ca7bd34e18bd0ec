//! The project record that owns a workflow's nodes and connections.

use crate::{Connection, ConnectionId, Node, NodeId, ProjectId};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A workflow project.
///
/// `updated_at` is refreshed by [`Project::touch`] whenever the node or
/// connection collections change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Project {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Mark the project as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// The connection running from `source` to `target`, if any.
    pub fn connection_between(&self, source: NodeId, target: NodeId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.links(source, target))
    }

    /// Remove a node together with every connection that references it.
    ///
    /// Both collections are rebuilt before either is observed again, so no
    /// dangling connection is ever visible. Returns the removed node and the
    /// ids of the removed connections, or `None` if the node was absent.
    pub fn remove_node_cascade(&mut self, id: NodeId) -> Option<(Node, Vec<ConnectionId>)> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let (kept, dropped): (Vec<Connection>, Vec<Connection>) =
            std::mem::take(&mut self.connections)
                .into_iter()
                .partition(|c| !c.touches(id));
        self.connections = kept;
        let node = self.nodes.remove(index);
        Some((node, dropped.into_iter().map(|c| c.id).collect()))
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        Some(self.connections.remove(index))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid project JSON")
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a project handed over by the host as a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file: {}", path.display()))?;
        let project = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse project file: {}", path.display()))?;
        log::debug!(
            "Loaded project '{}' with {} nodes and {} connections",
            project.name,
            project.nodes.len(),
            project.connections.len()
        );
        Ok(project)
    }

    /// Write the project back out as JSON for the host.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write project file: {}", path.display()))?;
        Ok(())
    }
}
