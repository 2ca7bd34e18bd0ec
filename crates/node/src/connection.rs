use crate::{ConnectionId, NodeId};
use serde::{Deserialize, Serialize};

/// A directed edge from one node to another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: ConnectionId::new(),
            source,
            target,
            source_handle: None,
            target_handle: None,
        }
    }

    /// True if either endpoint is `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// True if this connection runs from `source` to `target`.
    pub fn links(&self, source: NodeId, target: NodeId) -> bool {
        self.source == source && self.target == target
    }
}
