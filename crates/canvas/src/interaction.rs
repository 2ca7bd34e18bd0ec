//! Transient pointer/connect state layered over the node collection.

use node::{CanvasDelta, CanvasPoint, NodeId};

/// An in-progress node drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub node: NodeId,
    /// Cursor minus node origin at drag start; kept fixed while moving.
    pub offset: CanvasDelta,
    /// Cursor position when the press began.
    pub origin: CanvasPoint,
    /// Whether the node has moved since the press.
    pub moved: bool,
}

impl DragState {
    pub fn new(node: NodeId, node_position: CanvasPoint, cursor: CanvasPoint) -> Self {
        Self {
            node,
            offset: cursor - node_position,
            origin: cursor,
            moved: false,
        }
    }

    /// Node origin that keeps the grip point under `cursor`.
    pub fn target_position(&self, cursor: CanvasPoint) -> CanvasPoint {
        cursor - self.offset
    }
}

/// The active gesture.
///
/// A press on a node always starts a drag. A connection pending at that
/// moment is parked in `pending_source` and comes back when the drag ends,
/// so the click that follows a motionless press can still complete it.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Connecting {
        source: NodeId,
    },
    Dragging {
        drag: DragState,
        pending_source: Option<NodeId>,
    },
}

impl Gesture {
    /// The node a new connection would start from, if one is pending.
    pub fn connecting_source(&self) -> Option<NodeId> {
        match self {
            Gesture::Idle => None,
            Gesture::Connecting { source } => Some(*source),
            Gesture::Dragging { pending_source, .. } => *pending_source,
        }
    }

    pub fn drag(&self) -> Option<&DragState> {
        match self {
            Gesture::Dragging { drag, .. } => Some(drag),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Gesture::Dragging { .. })
    }

    /// Replace the pending connection source, keeping any drag in progress.
    pub fn set_connecting_source(&mut self, source: Option<NodeId>) {
        match self {
            Gesture::Dragging { pending_source, .. } => *pending_source = source,
            _ => {
                *self = match source {
                    Some(source) => Gesture::Connecting { source },
                    None => Gesture::Idle,
                }
            }
        }
    }

    /// Start dragging, parking any pending connection.
    pub fn begin_drag(&mut self, drag: DragState) {
        let pending_source = self.connecting_source();
        *self = Gesture::Dragging {
            drag,
            pending_source,
        };
    }

    /// Finish the drag, restoring a parked connection. Returns the finished
    /// drag, or `None` (leaving the gesture untouched) if none was active.
    pub fn end_drag(&mut self) -> Option<DragState> {
        let Gesture::Dragging {
            drag,
            pending_source,
        } = *self
        else {
            return None;
        };
        *self = match pending_source {
            Some(source) => Gesture::Connecting { source },
            None => Gesture::Idle,
        };
        Some(drag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag_of(node: NodeId) -> DragState {
        DragState::new(node, CanvasPoint::new(100.0, 100.0), CanvasPoint::new(150.0, 130.0))
    }

    #[test]
    fn test_drag_offset_and_target() {
        let drag = drag_of(NodeId::from_u128(1));
        assert_eq!(drag.offset, CanvasDelta::new(50.0, 30.0));
        assert_eq!(drag.target_position(CanvasPoint::new(450.0, 330.0)), CanvasPoint::new(400.0, 300.0));
    }

    #[test]
    fn test_drag_parks_pending_connection() {
        let source = NodeId::from_u128(1);
        let mut gesture = Gesture::Connecting { source };

        gesture.begin_drag(drag_of(NodeId::from_u128(2)));
        assert!(gesture.is_dragging());
        assert_eq!(gesture.connecting_source(), Some(source));

        let finished = gesture.end_drag().unwrap();
        assert_eq!(finished.node, NodeId::from_u128(2));
        assert_eq!(gesture, Gesture::Connecting { source });
    }

    #[test]
    fn test_end_drag_without_drag_keeps_state() {
        let source = NodeId::from_u128(1);
        let mut gesture = Gesture::Connecting { source };
        assert!(gesture.end_drag().is_none());
        assert_eq!(gesture, Gesture::Connecting { source });
    }

    #[test]
    fn test_clearing_source_during_drag_keeps_drag() {
        let mut gesture = Gesture::Connecting {
            source: NodeId::from_u128(1),
        };
        gesture.begin_drag(drag_of(NodeId::from_u128(2)));
        gesture.set_connecting_source(None);
        assert!(gesture.is_dragging());
        gesture.end_drag();
        assert_eq!(gesture, Gesture::Idle);
    }
}
