use crate::interaction::{DragState, Gesture};
use crate::keymap::{self, EditorAction, Keystroke};
use crate::{CanvasConfig, Viewport};
use glam::Vec2;
use node::{
    CanvasPoint, Connection, ConnectionId, ConnectorPath, Node, NodeId, NodeKind, Project,
    ScreenPoint,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Events emitted by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    NodeAdded(NodeId),
    NodeRemoved {
        id: NodeId,
        connections: Vec<ConnectionId>,
    },
    NodeMoved(NodeId),
    NodeUpdated(NodeId),
    ConnectionAdded(ConnectionId),
    ConnectionRemoved(ConnectionId),
    SelectionChanged(Option<NodeId>),
    ConnectingChanged(Option<NodeId>),
    PaletteVisibilityChanged(bool),
    /// Nodes or connections changed; the project passed alongside carries a
    /// fresh `updated_at`.
    ProjectUpdated,
}

type Listener = Box<dyn FnMut(&CanvasEvent, &Project)>;

/// The workflow canvas: owns the open project's nodes and connections and
/// the interaction state layered on top of them.
///
/// Every operation is total. Ids that no longer resolve turn the call into a
/// no-op.
pub struct Canvas {
    project: Project,

    /// Active pointer/connect gesture.
    gesture: Gesture,

    /// Node shown in the properties editor. Independent of any drag.
    selected: Option<NodeId>,

    /// Whether the node palette overlay is shown.
    palette_open: bool,

    /// Viewport (pan/zoom) state.
    pub viewport: Viewport,

    config: CanvasConfig,

    /// Source of spawn positions for new nodes.
    rng: StdRng,

    listeners: Vec<Listener>,
}

impl Canvas {
    pub fn new(project: Project) -> Self {
        Self::with_config(project, CanvasConfig::default())
    }

    pub fn with_config(project: Project, config: CanvasConfig) -> Self {
        Self {
            project,
            gesture: Gesture::Idle,
            selected: None,
            palette_open: false,
            viewport: Viewport::new(),
            config,
            rng: StdRng::from_os_rng(),
            listeners: Vec::new(),
        }
    }

    /// Use a seeded generator for spawn positions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Register a listener for canvas events.
    pub fn subscribe(&mut self, listener: impl FnMut(&CanvasEvent, &Project) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Hand the project back to the host, ending the editing session.
    pub fn into_project(self) -> Project {
        self.project
    }

    // === Accessors ===

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn nodes(&self) -> &[Node] {
        &self.project.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.project.connections
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.project.node(id)
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.gesture.drag()
    }

    pub fn connecting_source(&self) -> Option<NodeId> {
        self.gesture.connecting_source()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.and_then(|id| self.project.node(id))
    }

    pub fn is_palette_open(&self) -> bool {
        self.palette_open
    }

    /// Find the topmost node at a canvas point.
    pub fn node_at_point(&self, point: CanvasPoint) -> Option<NodeId> {
        let size = self.config.node_size;
        // Iterate in reverse for z-order (top to bottom)
        self.project
            .nodes
            .iter()
            .rev()
            .find(|n| n.contains_point(point, size))
            .map(|n| n.id)
    }

    /// Position of a node, or the canvas origin if it no longer exists.
    pub fn node_position(&self, id: NodeId) -> CanvasPoint {
        self.project
            .node(id)
            .map(|n| n.position)
            .unwrap_or_default()
    }

    /// Connector geometry for a connection.
    pub fn connector_path(&self, connection: &Connection) -> ConnectorPath {
        ConnectorPath::between_sized(
            self.node_position(connection.source),
            self.node_position(connection.target),
            self.config.node_size,
        )
    }

    // === Nodes ===

    /// Add a node at a pseudo-random spot in the spawn region and close the
    /// palette.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        label: impl Into<String>,
        icon: impl Into<String>,
    ) -> NodeId {
        let offset = Vec2::new(
            spawn_offset(&mut self.rng, self.config.spawn_extent.x),
            spawn_offset(&mut self.rng, self.config.spawn_extent.y),
        );
        let position = CanvasPoint(self.config.spawn_origin.0 + offset);
        self.add_node_at(kind, label, icon, position)
    }

    /// Add a node at an explicit position and close the palette.
    pub fn add_node_at(
        &mut self,
        kind: NodeKind,
        label: impl Into<String>,
        icon: impl Into<String>,
        position: CanvasPoint,
    ) -> NodeId {
        let node = Node::new(kind, position, label).with_icon(icon);
        let id = node.id;
        log::debug!("Adding {} node {} at {:?}", kind, id, position.0);
        self.project.nodes.push(node);
        self.emit(CanvasEvent::NodeAdded(id));
        self.close_palette();
        self.content_changed();
        id
    }

    /// Remove a node and every connection touching it.
    ///
    /// Clears the selection, a drag, or a pending connection that referred to
    /// the node. Returns the removed connection ids, or `None` if the node was
    /// already gone.
    pub fn delete_node(&mut self, id: NodeId) -> Option<Vec<ConnectionId>> {
        let (_, removed) = self.project.remove_node_cascade(id)?;
        log::debug!(
            "Deleted node {} and {} connection(s)",
            id,
            removed.len()
        );

        if self.selected == Some(id) {
            self.selected = None;
            self.emit(CanvasEvent::SelectionChanged(None));
        }

        if self.drag().is_some_and(|drag| drag.node == id) {
            self.gesture.end_drag();
        }
        if self.connecting_source() == Some(id) {
            self.gesture.set_connecting_source(None);
            self.emit(CanvasEvent::ConnectingChanged(None));
        }

        self.emit(CanvasEvent::NodeRemoved {
            id,
            connections: removed.clone(),
        });
        self.content_changed();
        Some(removed)
    }

    /// Replace the node with the same id. Selection keeps pointing at it.
    pub fn update_node_data(&mut self, updated: Node) -> bool {
        let id = updated.id;
        let Some(node) = self.project.node_mut(id) else {
            return false;
        };
        if *node == updated {
            return false;
        }
        *node = updated;
        log::debug!("Updated node {}", id);
        self.emit(CanvasEvent::NodeUpdated(id));
        self.content_changed();
        true
    }

    // === Dragging ===

    /// Start dragging a node, remembering where on the node it was gripped.
    pub fn begin_drag(&mut self, id: NodeId, cursor: CanvasPoint) {
        let Some(node) = self.project.node(id) else {
            return;
        };
        let drag = DragState::new(id, node.position, cursor);
        log::trace!("Begin drag of {} with offset {:?}", id, drag.offset.0);
        self.gesture.begin_drag(drag);
    }

    /// Move the dragged node so the grip point stays under the cursor.
    pub fn update_drag(&mut self, cursor: CanvasPoint) {
        let Gesture::Dragging { drag, .. } = &mut self.gesture else {
            return;
        };
        let id = drag.node;
        let position = drag.target_position(cursor);

        let Some(node) = self.project.node_mut(id) else {
            return;
        };
        if node.position == position {
            return;
        }
        drag.moved = true;
        node.position = position;
        log::trace!("Moved {} to {:?}", id, position.0);
        self.emit(CanvasEvent::NodeMoved(id));
        self.content_changed();
    }

    /// Stop dragging. Positions are left where the last update put them.
    pub fn end_drag(&mut self) -> Option<DragState> {
        self.gesture.end_drag()
    }

    // === Pointer events ===

    /// Pointer pressed on a node.
    pub fn pointer_down(&mut self, id: NodeId, position: ScreenPoint) {
        let cursor = self.viewport.screen_to_canvas(position);
        self.begin_drag(id, cursor);
    }

    /// Pointer moved anywhere over the canvas. The pressed node stays put
    /// until the cursor leaves the click threshold.
    pub fn pointer_move(&mut self, position: ScreenPoint) {
        let cursor = self.viewport.screen_to_canvas(position);
        if let Some(drag) = self.drag() {
            if !drag.moved && (cursor - drag.origin).length() <= self.config.click_threshold {
                return;
            }
        }
        self.update_drag(cursor);
    }

    /// Pointer released. A press whose node never moved is a click on it.
    pub fn pointer_up(&mut self) {
        if let Some(drag) = self.end_drag() {
            if !drag.moved {
                self.handle_node_click(drag.node);
            }
        }
    }

    // === Selection & connecting ===

    /// Click on a node: completes a pending connection, otherwise selects.
    pub fn handle_node_click(&mut self, id: NodeId) {
        match self.connecting_source() {
            Some(source) if source != id => {
                self.connect(source, id);
            }
            Some(_) => self.cancel_connection(),
            None => self.select(id),
        }
    }

    pub fn select(&mut self, id: NodeId) {
        if self.selected == Some(id) || !self.project.contains_node(id) {
            return;
        }
        self.selected = Some(id);
        self.emit(CanvasEvent::SelectionChanged(Some(id)));
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.emit(CanvasEvent::SelectionChanged(None));
        }
    }

    /// Make `id` the source of the next connection.
    pub fn start_connection(&mut self, id: NodeId) {
        if !self.project.contains_node(id) || self.connecting_source() == Some(id) {
            return;
        }
        log::debug!("Connecting from {}", id);
        self.gesture.set_connecting_source(Some(id));
        self.emit(CanvasEvent::ConnectingChanged(Some(id)));
    }

    pub fn cancel_connection(&mut self) {
        if self.connecting_source().is_some() {
            self.gesture.set_connecting_source(None);
            self.emit(CanvasEvent::ConnectingChanged(None));
        }
    }

    /// Connect `source` to `target`.
    ///
    /// Self-connections, duplicates of an existing ordered pair, and missing
    /// endpoints are ignored. Connecting-mode is cleared either way.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Option<ConnectionId> {
        let created = if source == target
            || !self.project.contains_node(source)
            || !self.project.contains_node(target)
            || self.project.connection_between(source, target).is_some()
        {
            log::debug!("Ignoring connection {} -> {}", source, target);
            None
        } else {
            let connection = Connection::new(source, target);
            let id = connection.id;
            self.project.connections.push(connection);
            Some(id)
        };

        self.cancel_connection();

        if let Some(id) = created {
            log::debug!("Connected {} -> {} as {}", source, target, id);
            self.emit(CanvasEvent::ConnectionAdded(id));
            self.content_changed();
        }
        created
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        if self.project.remove_connection(id).is_none() {
            return false;
        }
        log::debug!("Deleted connection {}", id);
        self.emit(CanvasEvent::ConnectionRemoved(id));
        self.content_changed();
        true
    }

    // === Palette ===

    pub fn open_palette(&mut self) {
        if !self.palette_open {
            self.palette_open = true;
            self.emit(CanvasEvent::PaletteVisibilityChanged(true));
        }
    }

    pub fn close_palette(&mut self) {
        if self.palette_open {
            self.palette_open = false;
            self.emit(CanvasEvent::PaletteVisibilityChanged(false));
        }
    }

    // === Keyboard ===

    /// Handle a keystroke while the canvas has focus. Returns whether it was
    /// bound to an action.
    pub fn handle_key(&mut self, keystroke: &Keystroke) -> bool {
        match keymap::resolve(keystroke) {
            Some(action) => {
                self.perform(action);
                true
            }
            None => false,
        }
    }

    pub fn perform(&mut self, action: EditorAction) {
        log::debug!("Performing {:?}", action);
        match action {
            EditorAction::OpenPalette => self.open_palette(),
            EditorAction::DeleteSelected => {
                if let Some(id) = self.selected {
                    self.delete_node(id);
                }
            }
            EditorAction::Cancel => {
                self.clear_selection();
                self.cancel_connection();
                self.close_palette();
            }
            EditorAction::Save => self.emit(CanvasEvent::ProjectUpdated),
        }
    }

    // === Events ===

    fn content_changed(&mut self) {
        self.project.touch();
        self.emit(CanvasEvent::ProjectUpdated);
    }

    fn emit(&mut self, event: CanvasEvent) {
        for listener in &mut self.listeners {
            listener(&event, &self.project);
        }
    }
}

fn spawn_offset(rng: &mut StdRng, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}
