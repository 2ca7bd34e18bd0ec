//! Workflow node types for Flowboard.
//!
//! This crate provides the flat graph model the canvas edits: nodes with typed
//! configuration, directed connections between them, and the project that owns
//! both. Nodes render in list order.

pub mod config;
pub mod connection;
pub mod coords;
pub mod geometry;
mod ids;
mod node;
pub mod project;

pub use config::{ActionKind, ActionTarget, AgentConfig, NodeConfig, ToolConfig, TriggerConfig};
pub use config::{TriggerKind, TriggerSource};
pub use connection::Connection;
pub use coords::{CanvasDelta, CanvasPoint, CanvasSize, ScreenPoint};
pub use geometry::{ConnectorPath, NODE_HEIGHT, NODE_SIZE, NODE_WIDTH};
pub use ids::{ConnectionId, NodeId, ProjectId};
pub use node::{Node, NodeData, NodeKind, Ports};
pub use project::Project;
