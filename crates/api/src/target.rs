//! References to nodes and connections.
//!
//! Scripts rarely know the random ids the canvas hands out, so commands can
//! also address nodes by label, by list index, or through the current
//! selection.

use canvas::Canvas;
use node::{ConnectionId, NodeId};
use serde::{Deserialize, Serialize};

/// Specifies which node a command targets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRef {
    /// The selected node (most common for user actions).
    #[default]
    Selection,

    /// Specific node by ID.
    Id(NodeId),

    /// First node whose label matches exactly.
    Label(String),

    /// Position in the node list (render order).
    Index(usize),
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl NodeRef {
    /// Resolve to a node currently on the canvas.
    pub fn resolve(&self, canvas: &Canvas) -> Result<NodeId, String> {
        let found = match self {
            NodeRef::Selection => {
                return canvas
                    .selected()
                    .ok_or_else(|| "No node is selected".to_string())
            }
            NodeRef::Id(id) => canvas.node(*id).map(|n| n.id),
            NodeRef::Label(label) => canvas
                .nodes()
                .iter()
                .find(|n| n.label() == label)
                .map(|n| n.id),
            NodeRef::Index(index) => canvas.nodes().get(*index).map(|n| n.id),
        };
        found.ok_or_else(|| format!("No node matches {}", self.describe()))
    }

    fn describe(&self) -> String {
        match self {
            NodeRef::Selection => "the selection".to_string(),
            NodeRef::Id(id) => format!("id {}", id.to_uuid_string()),
            NodeRef::Label(label) => format!("label {label:?}"),
            NodeRef::Index(index) => format!("index {index}"),
        }
    }
}

/// Specifies which connection a command targets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRef {
    Id(ConnectionId),

    /// The connection from `source` to `target`.
    Between { source: NodeRef, target: NodeRef },

    /// Position in the connection list.
    Index(usize),
}

impl From<ConnectionId> for ConnectionRef {
    fn from(id: ConnectionId) -> Self {
        Self::Id(id)
    }
}

impl ConnectionRef {
    pub fn resolve(&self, canvas: &Canvas) -> Result<ConnectionId, String> {
        match self {
            ConnectionRef::Id(id) => canvas
                .project()
                .connection(*id)
                .map(|c| c.id)
                .ok_or_else(|| format!("No connection with id {}", id.to_uuid_string())),
            ConnectionRef::Between { source, target } => {
                let source = source.resolve(canvas)?;
                let target = target.resolve(canvas)?;
                canvas
                    .project()
                    .connection_between(source, target)
                    .map(|c| c.id)
                    .ok_or_else(|| format!("No connection from {source} to {target}"))
            }
            ConnectionRef::Index(index) => canvas
                .connections()
                .get(*index)
                .map(|c| c.id)
                .ok_or_else(|| format!("No connection at index {index}")),
        }
    }
}
