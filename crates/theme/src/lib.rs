//! Minimal theming for Flowboard.
//!
//! Provides colors for the canvas, node cards, connectors, and selection.

use node::NodeKind;
use palette::{FromColor, Hsl, Lighten, Srgb};
use serde::{Deserialize, Serialize};

/// An 8-bit sRGB color.
pub type Color = Srgb<u8>;

/// Named theme variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
}

/// Theme colors for the workflow canvas.
#[derive(Clone, Debug)]
pub struct Theme {
    /// Canvas background
    pub canvas_background: Color,

    /// Dots of the background grid
    pub grid: Color,

    /// Node card body
    pub node_background: Color,

    /// Node card border when not selected
    pub node_border: Color,

    /// Selected node border
    pub selection: Color,

    /// Ring around the pending connection source
    pub connecting_ring: Color,

    /// Connector stroke and arrowhead
    pub connector: Color,

    /// Connector delete affordance
    pub danger: Color,

    /// Card body text
    pub text: Color,

    /// Port counts and secondary text
    pub text_muted: Color,

    /// Text on colored headers
    pub header_text: Color,

    /// Port indicator dots
    pub port: Color,

    /// Status dot on each card
    pub status: Color,

    pub agent: Color,
    pub tool: Color,
    pub trigger: Color,
    pub action: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        let selection = rgb(0x3B, 0x82, 0xF6); // Blue
        Self {
            canvas_background: rgb(0xF3, 0xF4, 0xF6),
            grid: rgb(0xD1, 0xD5, 0xDB),
            node_background: rgb(0xFF, 0xFF, 0xFF),
            node_border: rgb(0xE5, 0xE7, 0xEB),
            selection,
            connecting_ring: lighten(selection, 0.2),
            connector: selection,
            danger: rgb(0xEF, 0x44, 0x44),
            text: rgb(0x4B, 0x55, 0x63),
            text_muted: rgb(0x6B, 0x72, 0x80),
            header_text: rgb(0xFF, 0xFF, 0xFF),
            port: rgb(0xD1, 0xD5, 0xDB),
            status: rgb(0x22, 0xC5, 0x5E),
            agent: rgb(0x3B, 0x82, 0xF6),
            tool: rgb(0x22, 0xC5, 0x5E),
            trigger: rgb(0xEA, 0xB3, 0x08),
            action: rgb(0xA8, 0x55, 0xF7),
        }
    }

    pub fn dark() -> Self {
        let selection = rgb(0x60, 0xA5, 0xFA);
        Self {
            canvas_background: hsl(0.0, 0.0, 0.1),
            grid: hsl(0.0, 0.0, 0.2),
            node_background: hsl(0.0, 0.0, 0.14),
            node_border: hsl(0.0, 0.0, 0.25),
            selection,
            connecting_ring: lighten(selection, 0.2),
            connector: selection,
            danger: rgb(0xF8, 0x71, 0x71),
            text: hsl(0.0, 0.0, 0.85),
            text_muted: hsl(0.0, 0.0, 0.55),
            header_text: rgb(0xFF, 0xFF, 0xFF),
            port: hsl(0.0, 0.0, 0.4),
            status: rgb(0x4A, 0xDE, 0x80),
            agent: rgb(0x25, 0x63, 0xEB),
            tool: rgb(0x16, 0xA3, 0x4A),
            trigger: rgb(0xCA, 0x8A, 0x04),
            action: rgb(0x93, 0x33, 0xEA),
        }
    }

    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Light => Self::light(),
            ThemeKind::Dark => Self::dark(),
        }
    }

    /// Header color of a node card.
    pub fn kind_color(&self, kind: NodeKind) -> Color {
        match kind {
            NodeKind::Agent => self.agent,
            NodeKind::Tool => self.tool,
            NodeKind::Trigger => self.trigger,
            NodeKind::Action => self.action,
        }
    }
}

/// Format a color as `#RRGGBB`.
pub fn hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Srgb::new(r, g, b)
}

/// Helper to create a color from h, s, l values (h in 0..1 turns).
fn hsl(h: f32, s: f32, l: f32) -> Color {
    let hsl: Hsl = Hsl::new(h * 360.0, s, l);
    let color: Srgb<f32> = Srgb::from_color(hsl);
    color.into_format()
}

fn lighten(color: Color, amount: f32) -> Color {
    let hsl: Hsl = Hsl::from_color(color.into_format::<f32>());
    let color: Srgb<f32> = Srgb::from_color(hsl.lighten(amount));
    color.into_format()
}
