//! Flowboard queries - read-only access to canvas state.
//!
//! Queries allow inspecting the canvas without modifying it.
//! Useful for scripts to check the graph before issuing commands.

use crate::NodeRef;
use glam::Vec2;
use node::{ConnectionId, Node, NodeId, NodeKind, Project};
use serde::{Deserialize, Serialize};

/// A query for canvas state (read-only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// The whole project, as the host would persist it.
    GetProject,

    /// Get all nodes in render order.
    GetNodes,

    /// Get a single node.
    GetNode { node: NodeRef },

    /// Get the topmost node under a canvas point.
    GetNodeAt { position: Vec2 },

    /// Get all connections with their connector geometry.
    GetConnections,

    /// Get the selected node id.
    GetSelection,

    /// Get selection, connecting-mode, drag and palette state together.
    GetState,

    /// Get the current viewport state.
    GetViewport,

    /// Get the palette catalog.
    GetPalette,

    /// Get node and connection counts.
    GetCount,
}

/// Response to a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Project { project: Box<Project> },

    Nodes { nodes: Vec<Node> },

    Node { node: Option<Node> },

    Connections { connections: Vec<ConnectionInfo> },

    Selection { id: Option<NodeId> },

    State(StateInfo),

    Viewport { offset: Vec2, zoom: f32 },

    Palette { categories: Vec<CategoryInfo> },

    Count { nodes: usize, connections: usize },

    Error { message: String },
}

/// A connection plus the points its connector is drawn through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
    pub start: Vec2,
    pub end: Vec2,
    /// Where the delete affordance sits.
    pub midpoint: Vec2,
    /// SVG path data for the connector.
    pub path: String,
}

/// Transient interaction state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateInfo {
    pub selected: Option<NodeId>,
    pub connecting_from: Option<NodeId>,
    pub dragging: Option<NodeId>,
    pub palette_open: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub title: String,
    pub templates: Vec<TemplateInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub kind: NodeKind,
    pub label: String,
    pub icon: String,
    pub description: String,
}
