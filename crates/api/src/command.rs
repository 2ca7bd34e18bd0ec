//! Flowboard commands - all operations that modify canvas state.
//!
//! Commands are intent-based: they describe what the user did (pressed a key,
//! clicked a node, picked a palette entry), and the canvas decides what that
//! means for selection, connecting-mode and the node graph.

use crate::{ConnectionRef, NodeRef};
use glam::Vec2;
use node::{ActionKind, ConnectionId, NodeId, NodeKind, TriggerKind};
use serde::{Deserialize, Serialize};

/// A command that modifies canvas state.
///
/// Positions are canvas coordinates unless a field says otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Nodes ===
    /// Add a node. Without a position it spawns in the configured region.
    AddNode {
        kind: NodeKind,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Vec2>,
    },

    /// Add a node from the palette catalog, by template label.
    AddFromPalette { label: String },

    /// Delete a node and every connection touching it.
    DeleteNode {
        #[serde(default)]
        node: NodeRef,
    },

    /// Edit node properties. Config fields must exist for the node's kind;
    /// numeric values are clamped to their allowed ranges.
    UpdateNode {
        #[serde(default)]
        node: NodeRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        system_prompt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_secs: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trigger_type: Option<TriggerKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cron_expression: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action_type: Option<ActionKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email_template: Option<String>,
    },

    /// Move a node's top-left corner to a position.
    MoveNode {
        #[serde(default)]
        node: NodeRef,
        position: Vec2,
    },

    // === Dragging ===
    /// Grab a node at a cursor position.
    BeginDrag {
        #[serde(default)]
        node: NodeRef,
        cursor: Vec2,
    },

    /// Move the grabbed node with the cursor.
    UpdateDrag { cursor: Vec2 },

    /// Release the grabbed node.
    EndDrag,

    // === Pointer (screen coordinates) ===
    PointerDown {
        #[serde(default)]
        node: NodeRef,
        position: Vec2,
    },

    PointerMove { position: Vec2 },

    PointerUp,

    /// Click a node: completes a pending connection or selects it.
    ClickNode {
        #[serde(default)]
        node: NodeRef,
    },

    // === Connections ===
    /// Enter connecting-mode from a node.
    StartConnection {
        #[serde(default)]
        node: NodeRef,
    },

    CancelConnection,

    /// Connect two nodes directly.
    Connect { source: NodeRef, target: NodeRef },

    DeleteConnection { connection: ConnectionRef },

    // === Selection ===
    Select { node: NodeRef },

    ClearSelection,

    // === Keyboard & palette ===
    /// Press a key, written as shortcut notation ("ctrl-a", "escape").
    Key { keys: String },

    OpenPalette,

    ClosePalette,

    // === Canvas ===
    /// Pan the viewport by a screen-space delta.
    Pan { delta: Vec2 },

    /// Zoom the viewport around a screen point (origin by default).
    Zoom {
        factor: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        center: Option<Vec2>,
    },

    /// Reset viewport to default.
    ResetView,

    // === Batch ===
    /// Execute multiple commands in sequence.
    Batch { commands: Vec<Command> },
}

/// Id of anything a command can create, modify or delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    Node(NodeId),
    Connection(ConnectionId),
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    /// Command succeeded.
    Success {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<ItemId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<ItemId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<ItemId>,
    },
    /// Command failed.
    Error { message: String },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn created(&self) -> &[ItemId] {
        match self {
            Self::Success { created, .. } => created,
            Self::Error { .. } => &[],
        }
    }

    pub fn deleted(&self) -> &[ItemId] {
        match self {
            Self::Success { deleted, .. } => deleted,
            Self::Error { .. } => &[],
        }
    }

    /// First node created by the command, if any.
    pub fn created_node(&self) -> Option<NodeId> {
        self.created().iter().find_map(|item| match item {
            ItemId::Node(id) => Some(*id),
            ItemId::Connection(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_node_serializes_with_type_field() {
        let cmd = Command::AddNode {
            kind: NodeKind::Agent,
            label: "AI Assistant".into(),
            icon: Some("Bot".into()),
            position: None,
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "add_node");
        assert_eq!(json["kind"], "agent");
        assert!(json.get("position").is_none());
    }

    #[test]
    fn position_serializes_as_array() {
        let cmd = Command::MoveNode {
            node: NodeRef::Index(0),
            position: Vec2::new(100.0, 200.0),
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["position"], serde_json::json!([100.0, 200.0]));
        assert_eq!(json["node"], serde_json::json!({ "index": 0 }));
    }

    #[test]
    fn node_ref_defaults_to_selection() {
        let cmd: Command = serde_json::from_str(r#"{ "type": "delete_node" }"#).unwrap();
        assert_eq!(
            cmd,
            Command::DeleteNode {
                node: NodeRef::Selection
            }
        );
    }

    #[test]
    fn update_node_parses_config_fields() {
        let cmd: Command = serde_json::from_str(
            r#"{ "type": "update_node", "node": { "label": "Schedule" }, "trigger_type": "schedule", "cron_expression": "*/5 * * * *" }"#,
        )
        .unwrap();
        let Command::UpdateNode {
            trigger_type,
            cron_expression,
            label,
            ..
        } = cmd
        else {
            panic!("expected update_node");
        };
        assert_eq!(trigger_type, Some(TriggerKind::Schedule));
        assert_eq!(cron_expression.as_deref(), Some("*/5 * * * *"));
        assert_eq!(label, None);
    }

    #[test]
    fn result_shape() {
        let id = NodeId::from_u128(1);
        let result = CommandResult::Success {
            created: vec![ItemId::Node(id)],
            modified: vec![],
            deleted: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["created"][0]["node"], id.to_uuid_string());
        assert!(json.get("modified").is_none());

        let json = serde_json::to_value(CommandResult::error("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "error", "message": "nope" }));
    }
}
