//! Command and query execution against a Canvas.
//!
//! This module connects the abstract Command/Query types to the actual
//! Canvas implementation, executing operations and returning results.

use crate::{
    CategoryInfo, Command, CommandResult, ConnectionInfo, ItemId, Query, QueryResult, StateInfo,
    TemplateInfo,
};
use canvas::{Canvas, Keystroke};
use glam::Vec2;
use node::{CanvasPoint, NodeKind, Project, ScreenPoint};
use ui::node_palette;
use ui::PropertiesEditor;

/// Execute a command against a canvas.
///
/// The result lists every node and connection the command created, changed
/// or removed, found by comparing the project before and after.
pub fn execute_command(canvas: &mut Canvas, command: Command) -> CommandResult {
    let before = canvas.project().clone();
    match apply_command(canvas, command) {
        Ok(()) => diff_projects(&before, canvas.project()),
        Err(message) => {
            log::warn!("Command failed: {}", message);
            CommandResult::error(message)
        }
    }
}

fn apply_command(canvas: &mut Canvas, command: Command) -> Result<(), String> {
    log::debug!("Executing {:?}", command);
    match command {
        Command::AddNode {
            kind,
            label,
            icon,
            position,
        } => {
            let icon = icon.unwrap_or_else(|| default_icon(kind).to_string());
            match position {
                Some(position) => canvas.add_node_at(kind, label, icon, CanvasPoint(position)),
                None => canvas.add_node(kind, label, icon),
            };
        }

        Command::AddFromPalette { label } => {
            let template = node_palette::find(&label)
                .ok_or_else(|| format!("No palette entry named {label:?}"))?;
            node_palette::instantiate(template, canvas);
        }

        Command::DeleteNode { node } => {
            let id = node.resolve(canvas)?;
            canvas.delete_node(id);
        }

        Command::UpdateNode {
            node,
            label,
            description,
            system_prompt,
            temperature,
            endpoint,
            timeout_secs,
            trigger_type,
            cron_expression,
            action_type,
            email_template,
        } => {
            let id = node.resolve(canvas)?;
            let Some(target) = canvas.node(id) else {
                return Err(format!("Node {id} disappeared"));
            };
            let kind = target.kind();
            let mut editor = PropertiesEditor::new(target);

            if let Some(label) = label {
                editor.set_label(label);
            }
            if let Some(description) = description {
                editor.set_description(description);
            }

            let field = |applied: bool, name: &str| {
                if applied {
                    Ok(())
                } else {
                    Err(format!("{kind} node {id} has no {name} field"))
                }
            };
            if let Some(prompt) = system_prompt {
                field(editor.set_system_prompt(prompt), "system_prompt")?;
            }
            if let Some(temperature) = temperature {
                field(editor.set_temperature(temperature), "temperature")?;
            }
            if let Some(endpoint) = endpoint {
                field(editor.set_endpoint(endpoint), "endpoint")?;
            }
            if let Some(secs) = timeout_secs {
                field(editor.set_timeout_secs(secs), "timeout_secs")?;
            }
            // Type switches go first so their dependent fields exist.
            if let Some(trigger_type) = trigger_type {
                field(editor.set_trigger_kind(trigger_type), "trigger_type")?;
            }
            if let Some(expression) = cron_expression {
                field(editor.set_cron_expression(expression), "cron_expression")?;
            }
            if let Some(action_type) = action_type {
                field(editor.set_action_kind(action_type), "action_type")?;
            }
            if let Some(template) = email_template {
                field(editor.set_email_template(template), "email_template")?;
            }

            editor.apply(canvas);
        }

        Command::MoveNode { node, position } => {
            let id = node.resolve(canvas)?;
            let grip = canvas.node_position(id);
            canvas.begin_drag(id, grip);
            canvas.update_drag(CanvasPoint(position));
            canvas.end_drag();
        }

        Command::BeginDrag { node, cursor } => {
            let id = node.resolve(canvas)?;
            canvas.begin_drag(id, CanvasPoint(cursor));
        }

        Command::UpdateDrag { cursor } => canvas.update_drag(CanvasPoint(cursor)),

        Command::EndDrag => {
            canvas.end_drag();
        }

        Command::PointerDown { node, position } => {
            let id = node.resolve(canvas)?;
            canvas.pointer_down(id, ScreenPoint(position));
        }

        Command::PointerMove { position } => canvas.pointer_move(ScreenPoint(position)),

        Command::PointerUp => canvas.pointer_up(),

        Command::ClickNode { node } => {
            let id = node.resolve(canvas)?;
            canvas.handle_node_click(id);
        }

        Command::StartConnection { node } => {
            let id = node.resolve(canvas)?;
            canvas.start_connection(id);
        }

        Command::CancelConnection => canvas.cancel_connection(),

        Command::Connect { source, target } => {
            let source = source.resolve(canvas)?;
            let target = target.resolve(canvas)?;
            canvas.connect(source, target);
        }

        Command::DeleteConnection { connection } => {
            let id = connection.resolve(canvas)?;
            canvas.delete_connection(id);
        }

        Command::Select { node } => {
            let id = node.resolve(canvas)?;
            canvas.select(id);
        }

        Command::ClearSelection => canvas.clear_selection(),

        Command::Key { keys } => {
            if !canvas.handle_key(&Keystroke::parse(&keys)) {
                return Err(format!("No binding for {keys:?}"));
            }
        }

        Command::OpenPalette => canvas.open_palette(),

        Command::ClosePalette => canvas.close_palette(),

        Command::Pan { delta } => canvas.viewport.pan(delta),

        Command::Zoom { factor, center } => {
            let center = ScreenPoint(center.unwrap_or(Vec2::ZERO));
            canvas.viewport.zoom_at(center, factor);
        }

        Command::ResetView => canvas.viewport.reset(),

        Command::Batch { commands } => {
            for command in commands {
                apply_command(canvas, command).map_err(|message| format!("Batch failed: {}", message))?;
            }
        }
    }
    Ok(())
}

/// Icon of the first palette template of a kind.
fn default_icon(kind: NodeKind) -> &'static str {
    node_palette::templates()
        .find(|t| t.kind == kind)
        .map(|t| t.icon)
        .unwrap_or_default()
}

fn diff_projects(before: &Project, after: &Project) -> CommandResult {
    let mut created = Vec::new();
    let mut modified = Vec::new();
    let mut deleted = Vec::new();

    for node in &after.nodes {
        match before.node(node.id) {
            None => created.push(ItemId::Node(node.id)),
            Some(previous) if previous != node => modified.push(ItemId::Node(node.id)),
            Some(_) => {}
        }
    }
    for node in &before.nodes {
        if !after.contains_node(node.id) {
            deleted.push(ItemId::Node(node.id));
        }
    }

    for connection in &after.connections {
        if before.connection(connection.id).is_none() {
            created.push(ItemId::Connection(connection.id));
        }
    }
    for connection in &before.connections {
        if after.connection(connection.id).is_none() {
            deleted.push(ItemId::Connection(connection.id));
        }
    }

    CommandResult::Success {
        created,
        modified,
        deleted,
    }
}

/// Execute a query against a canvas.
pub fn execute_query(canvas: &Canvas, query: Query) -> QueryResult {
    match query {
        Query::GetProject => QueryResult::Project {
            project: Box::new(canvas.project().clone()),
        },

        Query::GetNodes => QueryResult::Nodes {
            nodes: canvas.nodes().to_vec(),
        },

        Query::GetNode { node } => match node.resolve(canvas) {
            Ok(id) => QueryResult::Node {
                node: canvas.node(id).cloned(),
            },
            Err(message) => QueryResult::Error { message },
        },

        Query::GetNodeAt { position } => QueryResult::Node {
            node: canvas
                .node_at_point(CanvasPoint(position))
                .and_then(|id| canvas.node(id))
                .cloned(),
        },

        Query::GetConnections => QueryResult::Connections {
            connections: canvas
                .connections()
                .iter()
                .map(|connection| {
                    let path = canvas.connector_path(connection);
                    ConnectionInfo {
                        id: connection.id,
                        source: connection.source,
                        target: connection.target,
                        start: path.start.0,
                        end: path.end.0,
                        midpoint: path.midpoint.0,
                        path: path.to_svg_path(),
                    }
                })
                .collect(),
        },

        Query::GetSelection => QueryResult::Selection {
            id: canvas.selected(),
        },

        Query::GetState => QueryResult::State(StateInfo {
            selected: canvas.selected(),
            connecting_from: canvas.connecting_source(),
            dragging: canvas.drag().map(|drag| drag.node),
            palette_open: canvas.is_palette_open(),
        }),

        Query::GetViewport => QueryResult::Viewport {
            offset: canvas.viewport.offset,
            zoom: canvas.viewport.zoom,
        },

        Query::GetPalette => QueryResult::Palette {
            categories: node_palette::categories()
                .iter()
                .map(|category| CategoryInfo {
                    title: category.title.to_string(),
                    templates: category
                        .templates
                        .iter()
                        .map(|t| TemplateInfo {
                            kind: t.kind,
                            label: t.label.to_string(),
                            icon: t.icon.to_string(),
                            description: t.description.to_string(),
                        })
                        .collect(),
                })
                .collect(),
        },

        Query::GetCount => QueryResult::Count {
            nodes: canvas.nodes().len(),
            connections: canvas.connections().len(),
        },
    }
}

/// Process one JSON message (a command or a query) and return the JSON
/// response.
pub fn process_message(canvas: &mut Canvas, json: &str) -> String {
    if let Ok(cmd) = serde_json::from_str::<Command>(json) {
        let result = execute_command(canvas, cmd);
        return serde_json::to_string(&result).unwrap_or_else(|e| {
            format!(r#"{{"status": "error", "message": "Serialization error: {}"}}"#, e)
        });
    }

    if let Ok(query) = serde_json::from_str::<Query>(json) {
        let result = execute_query(canvas, query);
        return serde_json::to_string(&result).unwrap_or_else(|e| {
            format!(r#"{{"type": "error", "message": "Serialization error: {}"}}"#, e)
        });
    }

    log::warn!("Unrecognized message: {}", json);
    r#"{"status": "error", "message": "Invalid JSON: expected a command or query"}"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConnectionRef, NodeRef};
    use node::{NodeConfig, TriggerSource};

    fn canvas() -> Canvas {
        Canvas::new(Project::new("Api", "")).with_seed(3)
    }

    fn run(canvas: &mut Canvas, json: &str) -> CommandResult {
        let command: Command = serde_json::from_str(json).unwrap();
        execute_command(canvas, command)
    }

    #[test]
    fn test_scenario_delete_cascades() {
        let mut canvas = canvas();
        let agent = run(&mut canvas, r#"{ "type": "add_from_palette", "label": "AI Assistant" }"#)
            .created_node()
            .unwrap();
        let action = run(&mut canvas, r#"{ "type": "add_from_palette", "label": "Send Email" }"#)
            .created_node()
            .unwrap();

        let connect = execute_command(
            &mut canvas,
            Command::Connect {
                source: agent.into(),
                target: action.into(),
            },
        );
        let connection = canvas.connections()[0].id;
        assert_eq!(connect.created(), [ItemId::Connection(connection)]);

        let delete = execute_command(
            &mut canvas,
            Command::DeleteNode {
                node: agent.into(),
            },
        );
        assert_eq!(
            delete.deleted(),
            [ItemId::Node(agent), ItemId::Connection(connection)]
        );
        assert!(canvas.connections().is_empty());
        assert_eq!(canvas.nodes().len(), 1);
        assert_eq!(canvas.nodes()[0].id, action);
    }

    #[test]
    fn test_add_node_defaults_icon_and_honours_position() {
        let mut canvas = canvas();
        let id = run(
            &mut canvas,
            r#"{ "type": "add_node", "kind": "trigger", "label": "Hook", "position": [10, 20] }"#,
        )
        .created_node()
        .unwrap();
        let node = canvas.node(id).unwrap();
        assert_eq!(node.position, CanvasPoint::new(10.0, 20.0));
        assert_eq!(node.data.icon.as_deref(), Some("Zap"));
        assert!(node.inputs.is_empty());
    }

    #[test]
    fn test_unknown_palette_entry_is_error() {
        let mut canvas = canvas();
        let result = run(&mut canvas, r#"{ "type": "add_from_palette", "label": "Teleporter" }"#);
        assert!(!result.is_success());
        assert!(canvas.nodes().is_empty());
    }

    #[test]
    fn test_unresolved_reference_is_error() {
        let mut canvas = canvas();
        let result = run(&mut canvas, r#"{ "type": "delete_node" }"#);
        assert_eq!(result, CommandResult::error("No node is selected"));
    }

    #[test]
    fn test_update_node_through_editor() {
        let mut canvas = canvas();
        run(&mut canvas, r#"{ "type": "add_from_palette", "label": "Schedule" }"#);

        let result = run(
            &mut canvas,
            r#"{ "type": "update_node", "node": { "index": 0 }, "label": "Nightly",
                 "trigger_type": "schedule", "cron_expression": "0 2 * * *" }"#,
        );
        assert!(result.created().is_empty());
        let node = &canvas.nodes()[0];
        assert_eq!(node.label(), "Nightly");
        assert_eq!(
            node.config,
            NodeConfig::Trigger(node::TriggerConfig {
                source: TriggerSource::Schedule {
                    cron_expression: "0 2 * * *".into()
                }
            })
        );
        let CommandResult::Success { modified, .. } = result else {
            panic!("expected success");
        };
        assert_eq!(modified, [ItemId::Node(node.id)]);
    }

    #[test]
    fn test_update_node_rejects_foreign_fields() {
        let mut canvas = canvas();
        run(&mut canvas, r#"{ "type": "add_from_palette", "label": "Web Scraper" }"#);
        let result = run(
            &mut canvas,
            r#"{ "type": "update_node", "node": { "index": 0 }, "label": "X", "temperature": 0.2 }"#,
        );
        assert!(!result.is_success());
        // Nothing is applied when any field is rejected.
        assert_eq!(canvas.nodes()[0].label(), "Web Scraper");
    }

    #[test]
    fn test_update_node_clamps_timeout() {
        let mut canvas = canvas();
        run(&mut canvas, r#"{ "type": "add_from_palette", "label": "Web Scraper" }"#);
        run(
            &mut canvas,
            r#"{ "type": "update_node", "node": { "label": "Web Scraper" }, "timeout_secs": 9000 }"#,
        );
        let NodeConfig::Tool(tool) = &canvas.nodes()[0].config else {
            panic!("expected tool config");
        };
        assert_eq!(tool.timeout_secs, 300);
    }

    #[test]
    fn test_click_flow_connects() {
        let mut canvas = canvas();
        let a = canvas.add_node_at(NodeKind::Trigger, "Webhook", "Zap", CanvasPoint::new(0.0, 0.0));
        let b = canvas.add_node_at(NodeKind::Action, "Send Email", "Mail", CanvasPoint::new(300.0, 0.0));

        let result = execute_command(
            &mut canvas,
            Command::Batch {
                commands: vec![
                    Command::StartConnection { node: a.into() },
                    Command::PointerDown {
                        node: b.into(),
                        position: Vec2::new(310.0, 10.0),
                    },
                    Command::PointerUp,
                ],
            },
        );
        assert_eq!(result.created().len(), 1);
        assert!(canvas.project().connection_between(a, b).is_some());
    }

    #[test]
    fn test_move_node_keeps_pending_connection() {
        let mut canvas = canvas();
        let a = canvas.add_node(NodeKind::Agent, "A", "Bot");
        canvas.start_connection(a);
        run(&mut canvas, r#"{ "type": "move_node", "node": { "index": 0 }, "position": [5, 6] }"#);
        assert_eq!(canvas.node(a).unwrap().position, CanvasPoint::new(5.0, 6.0));
        assert_eq!(canvas.connecting_source(), Some(a));
        assert!(canvas.drag().is_none());
    }

    #[test]
    fn test_batch_stops_at_first_error() {
        let mut canvas = canvas();
        let result = run(
            &mut canvas,
            r#"{ "type": "batch", "commands": [
                { "type": "add_from_palette", "label": "Webhook" },
                { "type": "select", "node": { "label": "Missing" } },
                { "type": "add_from_palette", "label": "Send Email" }
            ] }"#,
        );
        let CommandResult::Error { message } = result else {
            panic!("expected error");
        };
        assert!(message.starts_with("Batch failed: "));
        assert_eq!(canvas.nodes().len(), 1);
    }

    #[test]
    fn test_keys() {
        let mut canvas = canvas();
        assert!(run(&mut canvas, r#"{ "type": "key", "keys": "ctrl-a" }"#).is_success());
        assert!(canvas.is_palette_open());
        assert!(run(&mut canvas, r#"{ "type": "key", "keys": "escape" }"#).is_success());
        assert!(!canvas.is_palette_open());
        assert!(!run(&mut canvas, r#"{ "type": "key", "keys": "q" }"#).is_success());
    }

    #[test]
    fn test_delete_connection_by_index() {
        let mut canvas = canvas();
        let a = canvas.add_node(NodeKind::Agent, "A", "Bot");
        let b = canvas.add_node(NodeKind::Action, "B", "Mail");
        let id = canvas.connect(a, b).unwrap();

        let result = execute_command(
            &mut canvas,
            Command::DeleteConnection {
                connection: ConnectionRef::Index(0),
            },
        );
        assert_eq!(result.deleted(), [ItemId::Connection(id)]);
        assert!(canvas.connections().is_empty());
    }

    #[test]
    fn test_queries() {
        let mut canvas = canvas();
        let a = canvas.add_node_at(NodeKind::Agent, "A", "Bot", CanvasPoint::new(100.0, 100.0));
        let b = canvas.add_node_at(NodeKind::Action, "B", "Mail", CanvasPoint::new(400.0, 100.0));
        canvas.connect(a, b);
        canvas.select(b);

        let QueryResult::Connections { connections } = execute_query(&canvas, Query::GetConnections)
        else {
            panic!("expected connections");
        };
        assert_eq!(connections[0].start, Vec2::new(292.0, 140.0));
        assert_eq!(connections[0].midpoint, Vec2::new(346.0, 140.0));

        assert_eq!(
            execute_query(&canvas, Query::GetCount),
            QueryResult::Count {
                nodes: 2,
                connections: 1
            }
        );
        assert_eq!(
            execute_query(&canvas, Query::GetState),
            QueryResult::State(StateInfo {
                selected: Some(b),
                connecting_from: None,
                dragging: None,
                palette_open: false,
            })
        );
        let QueryResult::Node { node: Some(hit) } = execute_query(
            &canvas,
            Query::GetNodeAt {
                position: Vec2::new(410.0, 150.0),
            },
        ) else {
            panic!("expected a node");
        };
        assert_eq!(hit.id, b);
        assert!(matches!(
            execute_query(&canvas, Query::GetNode { node: NodeRef::Label("Z".into()) }),
            QueryResult::Error { .. }
        ));

        let QueryResult::Palette { categories } = execute_query(&canvas, Query::GetPalette) else {
            panic!("expected palette");
        };
        assert_eq!(categories.len(), 4);
    }

    #[test]
    fn test_process_message() {
        let mut canvas = canvas();
        let response = process_message(&mut canvas, r#"{"type": "add_from_palette", "label": "Webhook"}"#);
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["status"], "success");

        let response = process_message(&mut canvas, r#"{"type": "get_count"}"#);
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value, serde_json::json!({ "type": "count", "nodes": 1, "connections": 0 }));

        let response = process_message(&mut canvas, "not json");
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["status"], "error");
    }
}
