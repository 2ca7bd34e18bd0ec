//! Typed per-kind node configuration.
//!
//! Each node kind carries its own configuration struct, so the properties
//! editor never inspects a loose key/value blob at runtime.

use crate::NodeKind;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const TEMPERATURE_MIN: f32 = 0.0;
pub const TEMPERATURE_MAX: f32 = 1.0;
pub const TEMPERATURE_STEP: f32 = 0.1;

pub const DEFAULT_TIMEOUT_SECS: u32 = 30;
pub const TIMEOUT_MIN_SECS: u32 = 1;
pub const TIMEOUT_MAX_SECS: u32 = 300;

pub const DEFAULT_CRON_EXPRESSION: &str = "0 */1 * * *";

/// Configuration of a node, tagged by node kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeConfig {
    Agent(AgentConfig),
    Tool(ToolConfig),
    Trigger(TriggerConfig),
    Action(ActionConfig),
}

impl NodeConfig {
    /// Default configuration for a freshly created node of `kind`.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Agent => Self::Agent(AgentConfig::default()),
            NodeKind::Tool => Self::Tool(ToolConfig::default()),
            NodeKind::Trigger => Self::Trigger(TriggerConfig::default()),
            NodeKind::Action => Self::Action(ActionConfig::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Agent(_) => NodeKind::Agent,
            Self::Tool(_) => NodeKind::Tool,
            Self::Trigger(_) => NodeKind::Trigger,
            Self::Action(_) => NodeKind::Action,
        }
    }
}

/// Agent settings: a system prompt and sampling temperature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub system_prompt: String,
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl AgentConfig {
    /// Set the temperature, clamped to [0, 1] and snapped to the 0.1 slider step.
    /// NaN leaves the current value untouched.
    pub fn set_temperature(&mut self, temperature: f32) {
        if temperature.is_nan() {
            return;
        }
        let clamped = temperature.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX);
        self.temperature = (clamped / TEMPERATURE_STEP).round() * TEMPERATURE_STEP;
    }
}

/// Tool settings: the endpoint it calls and a timeout in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub endpoint: String,
    pub timeout_secs: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ToolConfig {
    /// Set the timeout, clamped to [1, 300] seconds.
    pub fn set_timeout_secs(&mut self, secs: u32) {
        self.timeout_secs = secs.clamp(TIMEOUT_MIN_SECS, TIMEOUT_MAX_SECS);
    }
}

/// Trigger kinds offered by the properties editor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TriggerKind {
    Webhook,
    Schedule,
    Email,
    File,
}

/// What fires a trigger. Only schedules carry extra data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerSource {
    Webhook,
    Schedule { cron_expression: String },
    Email,
    File,
}

impl TriggerSource {
    pub fn from_kind(kind: TriggerKind) -> Self {
        match kind {
            TriggerKind::Webhook => Self::Webhook,
            TriggerKind::Schedule => Self::Schedule {
                cron_expression: DEFAULT_CRON_EXPRESSION.to_string(),
            },
            TriggerKind::Email => Self::Email,
            TriggerKind::File => Self::File,
        }
    }

    pub fn kind(&self) -> TriggerKind {
        match self {
            Self::Webhook => TriggerKind::Webhook,
            Self::Schedule { .. } => TriggerKind::Schedule,
            Self::Email => TriggerKind::Email,
            Self::File => TriggerKind::File,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub source: TriggerSource,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            source: TriggerSource::Webhook,
        }
    }
}

/// Action kinds offered by the properties editor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Email,
    Database,
    Notification,
    Webhook,
}

/// Where an action delivers. Only email carries a template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionTarget {
    Email { template: String },
    Database,
    Notification,
    Webhook,
}

impl ActionTarget {
    pub fn from_kind(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Email => Self::Email {
                template: String::new(),
            },
            ActionKind::Database => Self::Database,
            ActionKind::Notification => Self::Notification,
            ActionKind::Webhook => Self::Webhook,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Email { .. } => ActionKind::Email,
            Self::Database => ActionKind::Database,
            Self::Notification => ActionKind::Notification,
            Self::Webhook => ActionKind::Webhook,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub target: ActionTarget,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            target: ActionTarget::from_kind(ActionKind::Email),
        }
    }
}
