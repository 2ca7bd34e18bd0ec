//! The node palette: a static catalog of node templates grouped by kind.

use canvas::Canvas;
use node::{NodeId, NodeKind};

/// A palette entry that spawns a node when picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeTemplate {
    pub kind: NodeKind,
    pub label: &'static str,
    /// Icon tag, e.g. "Bot" or "Database".
    pub icon: &'static str,
    pub description: &'static str,
}

/// A titled group of templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteCategory {
    pub title: &'static str,
    pub templates: &'static [NodeTemplate],
}

const fn template(
    kind: NodeKind,
    label: &'static str,
    icon: &'static str,
    description: &'static str,
) -> NodeTemplate {
    NodeTemplate {
        kind,
        label,
        icon,
        description,
    }
}

const AGENTS: &[NodeTemplate] = &[
    template(NodeKind::Agent, "AI Assistant", "Bot", "Conversational AI agent"),
    template(NodeKind::Agent, "Data Analyst", "Database", "Data analysis agent"),
    template(NodeKind::Agent, "Content Writer", "FileText", "Content generation agent"),
    template(NodeKind::Agent, "Research Agent", "Globe", "Web research agent"),
];

const TOOLS: &[NodeTemplate] = &[
    template(NodeKind::Tool, "Database Query", "Database", "Execute database queries"),
    template(NodeKind::Tool, "Email Sender", "Mail", "Send emails"),
    template(NodeKind::Tool, "File Processor", "FileText", "Process files"),
    template(NodeKind::Tool, "Web Scraper", "Globe", "Extract web data"),
];

const TRIGGERS: &[NodeTemplate] = &[
    template(NodeKind::Trigger, "Webhook", "Zap", "HTTP webhook trigger"),
    template(NodeKind::Trigger, "Schedule", "Calendar", "Time-based trigger"),
    template(NodeKind::Trigger, "Email Received", "Mail", "Email trigger"),
    template(NodeKind::Trigger, "File Upload", "FileText", "File upload trigger"),
];

const ACTIONS: &[NodeTemplate] = &[
    template(NodeKind::Action, "Send Email", "Mail", "Send email action"),
    template(NodeKind::Action, "Save to Database", "Database", "Database save action"),
    template(NodeKind::Action, "Generate Report", "FileText", "Generate report action"),
    template(NodeKind::Action, "Send Notification", "MessageSquare", "Send notification action"),
];

const CATEGORIES: &[PaletteCategory] = &[
    PaletteCategory {
        title: "Agents",
        templates: AGENTS,
    },
    PaletteCategory {
        title: "Tools",
        templates: TOOLS,
    },
    PaletteCategory {
        title: "Triggers",
        templates: TRIGGERS,
    },
    PaletteCategory {
        title: "Actions",
        templates: ACTIONS,
    },
];

pub fn categories() -> &'static [PaletteCategory] {
    CATEGORIES
}

/// Every template, in palette order.
pub fn templates() -> impl Iterator<Item = &'static NodeTemplate> {
    CATEGORIES.iter().flat_map(|category| category.templates.iter())
}

/// Look up a template by its exact label, ignoring case.
pub fn find(label: &str) -> Option<&'static NodeTemplate> {
    templates().find(|t| t.label.eq_ignore_ascii_case(label))
}

/// Templates whose label or description contains `term`, ignoring case.
pub fn search(term: &str) -> Vec<&'static NodeTemplate> {
    let term = term.to_lowercase();
    templates()
        .filter(|t| {
            t.label.to_lowercase().contains(&term) || t.description.to_lowercase().contains(&term)
        })
        .collect()
}

/// Add a node for `template` to the canvas. Closes the palette.
pub fn instantiate(template: &NodeTemplate, canvas: &mut Canvas) -> NodeId {
    canvas.add_node(template.kind, template.label, template.icon)
}
