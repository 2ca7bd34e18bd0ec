//! Properties editor for the selected node.
//!
//! Edits are staged on a [`PropertiesEditor`] and only reach the canvas when
//! [`PropertiesEditor::apply`] is called, so cancelling is just dropping the
//! editor.

use canvas::Canvas;
use node::config::{
    ActionConfig, TEMPERATURE_MAX, TEMPERATURE_MIN, TEMPERATURE_STEP, TIMEOUT_MAX_SECS,
    TIMEOUT_MIN_SECS,
};
use node::{ActionKind, ActionTarget, Node, NodeConfig, TriggerKind, TriggerSource};
use strum::IntoEnumIterator;

/// The input widget backing a form field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldInput {
    Text {
        value: String,
        placeholder: &'static str,
    },
    TextArea {
        value: String,
        placeholder: &'static str,
    },
    Url {
        value: String,
        placeholder: &'static str,
    },
    Range {
        value: f32,
        min: f32,
        max: f32,
        step: f32,
    },
    Number {
        value: u32,
        min: u32,
        max: u32,
    },
    Select {
        value: String,
        /// `(value, label)` pairs.
        options: Vec<(String, &'static str)>,
    },
}

/// One visible row of the properties form.
#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
}

impl FormField {
    fn new(key: &'static str, label: &'static str, input: FieldInput) -> Self {
        Self { key, label, input }
    }
}

pub fn trigger_kind_label(kind: TriggerKind) -> &'static str {
    match kind {
        TriggerKind::Webhook => "Webhook",
        TriggerKind::Schedule => "Schedule",
        TriggerKind::Email => "Email",
        TriggerKind::File => "File Upload",
    }
}

pub fn action_kind_label(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Email => "Send Email",
        ActionKind::Database => "Save to Database",
        ActionKind::Notification => "Send Notification",
        ActionKind::Webhook => "Call Webhook",
    }
}

/// Staged edits to a single node.
#[derive(Clone, Debug)]
pub struct PropertiesEditor {
    original: Node,
    label: String,
    description: String,
    config: NodeConfig,
}

impl PropertiesEditor {
    pub fn new(node: &Node) -> Self {
        Self {
            original: node.clone(),
            label: node.data.label.clone(),
            description: node.data.description.clone().unwrap_or_default(),
            config: node.config.clone(),
        }
    }

    /// Open an editor on the canvas selection, if any.
    pub fn for_selection(canvas: &Canvas) -> Option<Self> {
        canvas.selected_node().map(Self::new)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    // Config setters return false when the field does not exist for the
    // node's kind.

    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) -> bool {
        match &mut self.config {
            NodeConfig::Agent(agent) => {
                agent.system_prompt = prompt.into();
                true
            }
            _ => false,
        }
    }

    /// Clamped to [0, 1] and snapped to 0.1.
    pub fn set_temperature(&mut self, temperature: f32) -> bool {
        match &mut self.config {
            NodeConfig::Agent(agent) => {
                agent.set_temperature(temperature);
                true
            }
            _ => false,
        }
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) -> bool {
        match &mut self.config {
            NodeConfig::Tool(tool) => {
                tool.endpoint = endpoint.into();
                true
            }
            _ => false,
        }
    }

    /// Clamped to [1, 300].
    pub fn set_timeout_secs(&mut self, secs: u32) -> bool {
        match &mut self.config {
            NodeConfig::Tool(tool) => {
                tool.set_timeout_secs(secs);
                true
            }
            _ => false,
        }
    }

    /// Switch the trigger type. Re-selecting the current type keeps its data.
    pub fn set_trigger_kind(&mut self, kind: TriggerKind) -> bool {
        match &mut self.config {
            NodeConfig::Trigger(trigger) => {
                if trigger.source.kind() != kind {
                    trigger.source = TriggerSource::from_kind(kind);
                }
                true
            }
            _ => false,
        }
    }

    /// Only schedule triggers carry a cron expression.
    pub fn set_cron_expression(&mut self, expression: impl Into<String>) -> bool {
        match &mut self.config {
            NodeConfig::Trigger(trigger) => match &mut trigger.source {
                TriggerSource::Schedule { cron_expression } => {
                    *cron_expression = expression.into();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Switch the action type. Re-selecting the current type keeps its data.
    pub fn set_action_kind(&mut self, kind: ActionKind) -> bool {
        match &mut self.config {
            NodeConfig::Action(action) => {
                if action.target.kind() != kind {
                    *action = ActionConfig {
                        target: ActionTarget::from_kind(kind),
                    };
                }
                true
            }
            _ => false,
        }
    }

    /// Only email actions carry a template.
    pub fn set_email_template(&mut self, body: impl Into<String>) -> bool {
        match &mut self.config {
            NodeConfig::Action(action) => match &mut action.target {
                ActionTarget::Email { template } => {
                    *template = body.into();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Fields to show for the current staged state.
    pub fn form(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::new(
                "label",
                "Label",
                FieldInput::Text {
                    value: self.label.clone(),
                    placeholder: "",
                },
            ),
            FormField::new(
                "description",
                "Description",
                FieldInput::TextArea {
                    value: self.description.clone(),
                    placeholder: "Enter description...",
                },
            ),
        ];

        match &self.config {
            NodeConfig::Agent(agent) => {
                fields.push(FormField::new(
                    "system_prompt",
                    "System Prompt",
                    FieldInput::TextArea {
                        value: agent.system_prompt.clone(),
                        placeholder: "Enter system prompt for the AI agent...",
                    },
                ));
                fields.push(FormField::new(
                    "temperature",
                    "Temperature",
                    FieldInput::Range {
                        value: agent.temperature,
                        min: TEMPERATURE_MIN,
                        max: TEMPERATURE_MAX,
                        step: TEMPERATURE_STEP,
                    },
                ));
            }
            NodeConfig::Tool(tool) => {
                fields.push(FormField::new(
                    "endpoint",
                    "API Endpoint",
                    FieldInput::Url {
                        value: tool.endpoint.clone(),
                        placeholder: "https://api.example.com/endpoint",
                    },
                ));
                fields.push(FormField::new(
                    "timeout_secs",
                    "Timeout (seconds)",
                    FieldInput::Number {
                        value: tool.timeout_secs,
                        min: TIMEOUT_MIN_SECS,
                        max: TIMEOUT_MAX_SECS,
                    },
                ));
            }
            NodeConfig::Trigger(trigger) => {
                fields.push(FormField::new(
                    "trigger_type",
                    "Trigger Type",
                    FieldInput::Select {
                        value: trigger.source.kind().to_string(),
                        options: TriggerKind::iter()
                            .map(|kind| (kind.to_string(), trigger_kind_label(kind)))
                            .collect(),
                    },
                ));
                if let TriggerSource::Schedule { cron_expression } = &trigger.source {
                    fields.push(FormField::new(
                        "cron_expression",
                        "Cron Expression",
                        FieldInput::Text {
                            value: cron_expression.clone(),
                            placeholder: node::config::DEFAULT_CRON_EXPRESSION,
                        },
                    ));
                }
            }
            NodeConfig::Action(action) => {
                fields.push(FormField::new(
                    "action_type",
                    "Action Type",
                    FieldInput::Select {
                        value: action.target.kind().to_string(),
                        options: ActionKind::iter()
                            .map(|kind| (kind.to_string(), action_kind_label(kind)))
                            .collect(),
                    },
                ));
                if let ActionTarget::Email { template } = &action.target {
                    fields.push(FormField::new(
                        "email_template",
                        "Email Template",
                        FieldInput::TextArea {
                            value: template.clone(),
                            placeholder: "Enter email template...",
                        },
                    ));
                }
            }
        }

        fields
    }

    /// Whether anything differs from the node the editor was opened on.
    pub fn is_dirty(&self) -> bool {
        self.save() != self.original
    }

    /// The node with staged edits applied. An empty description is stored as
    /// none.
    pub fn save(&self) -> Node {
        let mut node = self.original.clone();
        node.data.label = self.label.clone();
        node.data.description = if self.description.is_empty() {
            None
        } else {
            Some(self.description.clone())
        };
        node.config = self.config.clone();
        node
    }

    /// Write the staged node back to the canvas. The canvas position is kept,
    /// so a drag made while the editor was open is not undone.
    pub fn apply(&mut self, canvas: &mut Canvas) -> bool {
        let mut node = self.save();
        match canvas.node(node.id) {
            Some(current) => node.position = current.position,
            None => return false,
        }
        let changed = canvas.update_node_data(node.clone());
        self.original = node;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasPoint, NodeKind, Project};

    fn editor_for(kind: NodeKind) -> PropertiesEditor {
        PropertiesEditor::new(&Node::new(kind, CanvasPoint::new(10.0, 10.0), "Node"))
    }

    fn keys(editor: &PropertiesEditor) -> Vec<&'static str> {
        editor.form().iter().map(|f| f.key).collect()
    }

    #[test]
    fn test_agent_form_and_clamping() {
        let mut editor = editor_for(NodeKind::Agent);
        assert_eq!(keys(&editor), ["label", "description", "system_prompt", "temperature"]);

        assert!(editor.set_temperature(1.7));
        assert!(editor.set_system_prompt("Be brief."));
        let NodeConfig::Agent(agent) = editor.config() else {
            panic!("expected agent config");
        };
        assert_eq!(agent.temperature, 1.0);
        assert_eq!(agent.system_prompt, "Be brief.");

        // Fields of other kinds are rejected.
        assert!(!editor.set_endpoint("https://example.com"));
        assert!(!editor.set_cron_expression("* * * * *"));
    }

    #[test]
    fn test_tool_timeout_is_clamped() {
        let mut editor = editor_for(NodeKind::Tool);
        assert_eq!(keys(&editor), ["label", "description", "endpoint", "timeout_secs"]);

        editor.set_timeout_secs(0);
        assert!(matches!(editor.config(), NodeConfig::Tool(t) if t.timeout_secs == 1));
        editor.set_timeout_secs(1000);
        assert!(matches!(editor.config(), NodeConfig::Tool(t) if t.timeout_secs == 300));
    }

    #[test]
    fn test_cron_only_for_schedule() {
        let mut editor = editor_for(NodeKind::Trigger);
        assert_eq!(keys(&editor), ["label", "description", "trigger_type"]);
        assert!(!editor.set_cron_expression("*/5 * * * *"));

        editor.set_trigger_kind(TriggerKind::Schedule);
        assert_eq!(keys(&editor), ["label", "description", "trigger_type", "cron_expression"]);
        let cron = editor.form().pop().unwrap();
        assert_eq!(
            cron.input,
            FieldInput::Text {
                value: "0 */1 * * *".to_string(),
                placeholder: "0 */1 * * *",
            }
        );

        assert!(editor.set_cron_expression("*/5 * * * *"));
        editor.set_trigger_kind(TriggerKind::Schedule);
        assert!(matches!(
            editor.config(),
            NodeConfig::Trigger(t) if t.source == TriggerSource::Schedule { cron_expression: "*/5 * * * *".into() }
        ));
    }

    #[test]
    fn test_template_only_for_email() {
        let mut editor = editor_for(NodeKind::Action);
        assert_eq!(keys(&editor), ["label", "description", "action_type", "email_template"]);

        editor.set_action_kind(ActionKind::Notification);
        assert_eq!(keys(&editor), ["label", "description", "action_type"]);
        assert!(!editor.set_email_template("Hi"));

        let FieldInput::Select { value, options } = &editor.form()[2].input else {
            panic!("expected select");
        };
        assert_eq!(value, "notification");
        assert_eq!(options.len(), 4);
        assert_eq!(options[3], ("webhook".to_string(), "Call Webhook"));
    }

    #[test]
    fn test_staging_does_not_touch_canvas() {
        let mut canvas = Canvas::new(Project::new("Props", ""));
        let id = canvas.add_node_at(NodeKind::Agent, "AI Assistant", "Bot", CanvasPoint::default());
        canvas.select(id);

        let mut editor = PropertiesEditor::for_selection(&canvas).unwrap();
        assert!(!editor.is_dirty());
        editor.set_label("Triage");
        editor.set_description("Routes tickets");
        assert!(editor.is_dirty());
        assert_eq!(canvas.node(id).unwrap().label(), "AI Assistant");

        assert!(editor.apply(&mut canvas));
        let node = canvas.selected_node().unwrap();
        assert_eq!(node.label(), "Triage");
        assert_eq!(node.data.description.as_deref(), Some("Routes tickets"));
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_empty_description_saves_as_none() {
        let node = Node::new(NodeKind::Tool, CanvasPoint::default(), "Scraper")
            .with_description("Old");
        let mut editor = PropertiesEditor::new(&node);
        editor.set_description("");
        assert_eq!(editor.save().data.description, None);
    }

    #[test]
    fn test_apply_keeps_current_position() {
        let mut canvas = Canvas::new(Project::new("Props", ""));
        let id = canvas.add_node_at(NodeKind::Tool, "Scraper", "Globe", CanvasPoint::default());
        let mut editor = PropertiesEditor::new(canvas.node(id).unwrap());

        canvas.begin_drag(id, CanvasPoint::default());
        canvas.update_drag(CanvasPoint::new(50.0, 60.0));
        canvas.end_drag();

        editor.set_endpoint("https://example.com/scrape");
        assert!(editor.apply(&mut canvas));
        assert_eq!(canvas.node(id).unwrap().position, CanvasPoint::new(50.0, 60.0));
    }

    #[test]
    fn test_apply_to_deleted_node_fails() {
        let mut canvas = Canvas::new(Project::new("Props", ""));
        let id = canvas.add_node(NodeKind::Agent, "A", "Bot");
        let mut editor = PropertiesEditor::new(canvas.node(id).unwrap());
        canvas.delete_node(id);
        editor.set_label("B");
        assert!(!editor.apply(&mut canvas));
        assert!(canvas.nodes().is_empty());
    }
}
