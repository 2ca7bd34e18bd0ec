use crate::coords::CanvasPoint;
use crate::{CanvasSize, NodeConfig, NodeId};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Ordered port names. Nodes have at most one port per side in practice.
pub type Ports = SmallVec<[String; 1]>;

pub const INPUT_PORT: &str = "input";
pub const OUTPUT_PORT: &str = "output";

/// The kind of workflow node.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Agent,
    Tool,
    Trigger,
    Action,
}

impl NodeKind {
    /// Input ports a palette-created node of this kind gets. Triggers start a flow.
    pub fn default_inputs(self) -> Ports {
        match self {
            NodeKind::Trigger => SmallVec::new(),
            _ => smallvec![INPUT_PORT.to_string()],
        }
    }

    /// Output ports a palette-created node of this kind gets. Actions end a flow.
    pub fn default_outputs(self) -> Ports {
        match self {
            NodeKind::Action => SmallVec::new(),
            _ => smallvec![OUTPUT_PORT.to_string()],
        }
    }
}

/// Display data for a node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon tag, e.g. "Bot" or "Database".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A node on the workflow canvas.
///
/// The node's kind is derived from its configuration, so the two can never
/// disagree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Top-left corner in canvas space.
    pub position: CanvasPoint,
    pub data: NodeData,
    pub config: NodeConfig,
    #[serde(default)]
    pub inputs: Ports,
    #[serde(default)]
    pub outputs: Ports,
}

impl Node {
    /// Create a node of `kind` with default config and the kind's port rule.
    pub fn new(kind: NodeKind, position: CanvasPoint, label: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            position,
            data: NodeData {
                label: label.into(),
                description: None,
                icon: None,
            },
            config: NodeConfig::default_for(kind),
            inputs: kind.default_inputs(),
            outputs: kind.default_outputs(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.data.icon = Some(icon.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.data.description = Some(description.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }

    /// Description shown on the card, falling back to "<kind> node".
    pub fn display_description(&self) -> String {
        match self.data.description.as_deref() {
            Some(description) if !description.is_empty() => description.to_string(),
            _ => format!("{} node", self.kind()),
        }
    }

    /// Get the bounding box (min, max) in canvas space for a card of `size`.
    pub fn bounds(&self, size: CanvasSize) -> (CanvasPoint, CanvasPoint) {
        let min = self.position;
        let max = CanvasPoint(self.position.0 + size.0);
        (min, max)
    }

    /// Check if a canvas point is inside the node card. Edges count as inside.
    pub fn contains_point(&self, point: CanvasPoint, size: CanvasSize) -> bool {
        let (min, max) = self.bounds(size);
        point.0.cmpge(min.0).all() && point.0.cmple(max.0).all()
    }
}
