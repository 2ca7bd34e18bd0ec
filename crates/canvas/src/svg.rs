//! SVG rendering of the canvas.
//!
//! The scene is drawn in canvas coordinates inside a group carrying the
//! viewport transform: connectors first, then node cards in list order, so
//! later nodes paint over earlier ones. The document itself is sized in
//! screen units around the transformed cards.

use crate::Canvas;
use anyhow::Result;
use glam::Vec2;
use node::{CanvasPoint, CanvasSize, Connection, Node};
use std::fmt::Write;
use theme::{hex, Theme};

const GRID_SPACING: f32 = 20.0;
const SCENE_PADDING: f32 = 80.0;
const MIN_SCENE_WIDTH: f32 = 800.0;
const MIN_SCENE_HEIGHT: f32 = 600.0;
const HEADER_HEIGHT: f32 = 28.0;
const CORNER_RADIUS: f32 = 8.0;
const DELETE_RADIUS: f32 = 12.0;

/// Render the canvas as a standalone SVG document.
pub fn render(canvas: &Canvas, theme: &Theme) -> Result<String> {
    let size = canvas.config().node_size;
    let (min, max) = scene_bounds(canvas, size);
    let extent = max - min;
    let viewport = &canvas.viewport;

    let mut svg = String::new();
    write!(
        svg,
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="{x:.0} {y:.0} {w:.0} {h:.0}" font-family="Inter, system-ui, sans-serif">
  <defs>
    <pattern id="grid" width="{g}" height="{g}" patternUnits="userSpaceOnUse">
      <circle cx="1" cy="1" r="1" fill="{grid}" />
    </pattern>
  </defs>
  <rect x="{x:.0}" y="{y:.0}" width="{w:.0}" height="{h:.0}" fill="{background}" />
  <rect x="{x:.0}" y="{y:.0}" width="{w:.0}" height="{h:.0}" fill="url(#grid)" />
  <g transform="scale({zoom}) translate({ox} {oy})">
"##,
        x = min.x,
        y = min.y,
        w = extent.x,
        h = extent.y,
        g = GRID_SPACING,
        grid = hex(theme.grid),
        background = hex(theme.canvas_background),
        zoom = viewport.zoom,
        ox = viewport.offset.x,
        oy = viewport.offset.y,
    )?;

    for connection in canvas.connections() {
        write_connection(&mut svg, canvas, connection, theme)?;
    }

    for node in canvas.nodes() {
        write_node(&mut svg, canvas, node, size, theme)?;
    }

    svg.push_str("  </g>\n</svg>\n");
    Ok(svg)
}

fn write_connection(
    svg: &mut String,
    canvas: &Canvas,
    connection: &Connection,
    theme: &Theme,
) -> Result<()> {
    let path = canvas.connector_path(connection);
    let id = connection.id.to_uuid_string();
    let color = hex(theme.connector);

    write!(
        svg,
        r##"    <g class="connection" data-id="{id}">
      <defs>
        <marker id="arrowhead-{id}" markerWidth="10" markerHeight="7" refX="9" refY="3.5" orient="auto">
          <polygon points="0 0, 10 3.5, 0 7" fill="{color}" />
        </marker>
      </defs>
      <path d="{d}" stroke="{color}" stroke-width="2" fill="none" marker-end="url(#arrowhead-{id})" />
      <circle class="delete" cx="{cx:.1}" cy="{cy:.1}" r="{r}" fill="{danger}" />
      <path d="M {x1:.1} {y1:.1} L {x2:.1} {y2:.1} M {x1:.1} {y2:.1} L {x2:.1} {y1:.1}" stroke="#FFFFFF" stroke-width="2" />
    </g>
"##,
        d = path.to_svg_path(),
        cx = path.midpoint.x(),
        cy = path.midpoint.y(),
        r = DELETE_RADIUS,
        danger = hex(theme.danger),
        x1 = path.midpoint.x() - 4.0,
        y1 = path.midpoint.y() - 4.0,
        x2 = path.midpoint.x() + 4.0,
        y2 = path.midpoint.y() + 4.0,
    )?;
    Ok(())
}

fn write_node(
    svg: &mut String,
    canvas: &Canvas,
    node: &Node,
    size: CanvasSize,
    theme: &Theme,
) -> Result<()> {
    let CanvasPoint(origin) = node.position;
    let (x, y) = (origin.x, origin.y);
    let (w, h) = (size.width(), size.height());
    let selected = canvas.selected() == Some(node.id);
    let connecting = canvas.connecting_source() == Some(node.id);

    let (border, border_width) = if selected {
        (theme.selection, 2)
    } else {
        (theme.node_border, 1)
    };

    writeln!(
        svg,
        r#"    <g class="node {kind}" data-id="{id}">"#,
        kind = node.kind(),
        id = node.id.to_uuid_string(),
    )?;

    if connecting {
        writeln!(
            svg,
            r#"      <rect class="connecting" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{}" fill="none" stroke="{}" stroke-width="2" />"#,
            x - 4.0,
            y - 4.0,
            w + 8.0,
            h + 8.0,
            CORNER_RADIUS + 4.0,
            hex(theme.connecting_ring),
        )?;
    }

    writeln!(
        svg,
        r#"      <rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" rx="{r}" fill="{fill}" stroke="{stroke}" stroke-width="{border_width}" />"#,
        r = CORNER_RADIUS,
        fill = hex(theme.node_background),
        stroke = hex(border),
    )?;

    // Header
    writeln!(
        svg,
        r#"      <path d="M {x:.1} {bottom:.1} V {top:.1} Q {x:.1} {y:.1} {left:.1} {y:.1} H {right:.1} Q {x2:.1} {y:.1} {x2:.1} {top:.1} V {bottom:.1} Z" fill="{fill}" />"#,
        bottom = y + HEADER_HEIGHT,
        top = y + CORNER_RADIUS,
        left = x + CORNER_RADIUS,
        right = x + w - CORNER_RADIUS,
        x2 = x + w,
        fill = hex(theme.kind_color(node.kind())),
    )?;
    writeln!(
        svg,
        r#"      <text x="{:.1}" y="{:.1}" fill="{}" font-size="13" font-weight="600">{}</text>"#,
        x + 12.0,
        y + 18.0,
        hex(theme.header_text),
        escape_xml(node.label()),
    )?;
    writeln!(
        svg,
        r#"      <circle cx="{:.1}" cy="{:.1}" r="3" fill="{}" />"#,
        x + w - 12.0,
        y + HEADER_HEIGHT / 2.0,
        hex(theme.status),
    )?;

    // Body
    writeln!(
        svg,
        r#"      <text x="{:.1}" y="{:.1}" fill="{}" font-size="11">{}</text>"#,
        x + 12.0,
        y + HEADER_HEIGHT + 20.0,
        hex(theme.text),
        escape_xml(&node.display_description()),
    )?;
    writeln!(
        svg,
        r#"      <text x="{:.1}" y="{:.1}" fill="{}" font-size="10">{} inputs</text>"#,
        x + 12.0,
        y + h - 8.0,
        hex(theme.text_muted),
        node.inputs.len(),
    )?;
    writeln!(
        svg,
        r#"      <text x="{:.1}" y="{:.1}" fill="{}" font-size="10" text-anchor="end">{} outputs</text>"#,
        x + w - 12.0,
        y + h - 8.0,
        hex(theme.text_muted),
        node.outputs.len(),
    )?;

    // Ports
    let port_y = y + h / 2.0;
    if !node.inputs.is_empty() {
        writeln!(
            svg,
            r#"      <circle class="port input" cx="{x:.1}" cy="{port_y:.1}" r="4" fill="{}" />"#,
            hex(theme.port),
        )?;
    }
    if !node.outputs.is_empty() {
        writeln!(
            svg,
            r#"      <circle class="port output" cx="{:.1}" cy="{port_y:.1}" r="4" fill="{}" />"#,
            x + w,
            hex(theme.port),
        )?;
    }

    svg.push_str("    </g>\n");
    Ok(())
}

/// Screen-space region (min, max) covering every card after the viewport
/// transform, plus padding. Always includes the default 800x600 scene at the
/// origin.
fn scene_bounds(canvas: &Canvas, size: CanvasSize) -> (Vec2, Vec2) {
    let viewport = &canvas.viewport;
    canvas.nodes().iter().fold(
        (Vec2::ZERO, Vec2::new(MIN_SCENE_WIDTH, MIN_SCENE_HEIGHT)),
        |(min, max), node| {
            let (top_left, bottom_right) = node.bounds(size);
            let top_left = viewport.canvas_to_screen(top_left).0 - SCENE_PADDING;
            let bottom_right = viewport.canvas_to_screen(bottom_right).0 + SCENE_PADDING;
            (min.min(top_left), max.max(bottom_right))
        },
    )
}

fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{NodeKind, Project, ScreenPoint};

    fn sample() -> (Canvas, node::NodeId, node::NodeId) {
        let mut canvas = Canvas::new(Project::new("Render", ""));
        let a = canvas.add_node_at(
            NodeKind::Trigger,
            "Webhook",
            "Zap",
            CanvasPoint::new(100.0, 100.0),
        );
        let b = canvas.add_node_at(
            NodeKind::Agent,
            "AI Assistant",
            "Bot",
            CanvasPoint::new(400.0, 100.0),
        );
        (canvas, a, b)
    }

    #[test]
    fn test_one_connector_per_connection() {
        let (mut canvas, a, b) = sample();
        let c = canvas.add_node_at(NodeKind::Action, "Send Email", "Mail", CanvasPoint::new(700.0, 100.0));
        canvas.connect(a, b);
        canvas.connect(b, c);

        let svg = render(&canvas, &Theme::light()).unwrap();
        assert_eq!(svg.matches(r#"<g class="connection""#).count(), 2);
        assert_eq!(svg.matches("marker-end=\"url(#arrowhead-").count(), 2);
        assert!(svg.contains(r#"d="M 292 140 C 346 140, 346 140, 400 140""#));
        assert!(svg.contains(r#"cx="346.0" cy="140.0" r="12""#));
    }

    #[test]
    fn test_node_cards() {
        let (canvas, _, _) = sample();
        let svg = render(&canvas, &Theme::light()).unwrap();

        assert_eq!(svg.matches(r#"<g class="node "#).count(), 2);
        assert!(svg.contains(r#"class="node trigger""#));
        // Triggers have no inputs.
        assert!(svg.contains(">0 inputs<"));
        assert!(svg.contains(">1 outputs<"));
        assert!(svg.contains(">trigger node<"));
        assert!(svg.contains("#EAB308"));
    }

    #[test]
    fn test_selection_and_connecting_highlights() {
        let (mut canvas, a, b) = sample();
        let theme = Theme::light();

        let selected_border = format!(r#"stroke="{}" stroke-width="2" />"#, hex(theme.selection));

        let plain = render(&canvas, &theme).unwrap();
        assert!(!plain.contains(r#"class="connecting""#));
        assert!(!plain.contains(&selected_border));

        canvas.select(b);
        canvas.start_connection(a);
        let svg = render(&canvas, &theme).unwrap();
        assert_eq!(svg.matches(r#"class="connecting""#).count(), 1);
        assert_eq!(svg.matches(&selected_border).count(), 1);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut canvas = Canvas::new(Project::new("Render", ""));
        let id = canvas.add_node_at(NodeKind::Tool, "Q&A <beta>", "Globe", CanvasPoint::default());
        let mut node = canvas.node(id).unwrap().clone();
        node.data.description = Some("\"quoted\"".to_string());
        canvas.update_node_data(node);

        let svg = render(&canvas, &Theme::dark()).unwrap();
        assert!(svg.contains("Q&amp;A &lt;beta&gt;"));
        assert!(svg.contains("&quot;quoted&quot;"));
        assert!(!svg.contains("<beta>"));
    }

    #[test]
    fn test_scene_grows_with_content() {
        let mut canvas = Canvas::new(Project::new("Render", ""));
        let svg = render(&canvas, &Theme::light()).unwrap();
        assert!(svg.contains(r#"width="800" height="600""#));

        canvas.add_node_at(NodeKind::Agent, "Far", "Bot", CanvasPoint::new(1000.0, 900.0));
        let svg = render(&canvas, &Theme::light()).unwrap();
        assert!(svg.contains(r#"width="1272" height="1060" viewBox="0 0 1272 1060""#));
    }

    #[test]
    fn test_scene_covers_zoomed_cards() {
        let mut canvas = Canvas::new(Project::new("Render", ""));
        canvas.add_node_at(NodeKind::Agent, "Zoomed", "Bot", CanvasPoint::new(700.0, 500.0));
        canvas.viewport.zoom_at(ScreenPoint::default(), 2.0);

        // Card spans (1400, 1000)..(1784, 1160) on screen.
        let svg = render(&canvas, &Theme::light()).unwrap();
        assert!(svg.contains(r#"width="1864" height="1240" viewBox="0 0 1864 1240""#));
        assert!(svg.contains(r#"transform="scale(2) translate(0 0)""#));
    }

    #[test]
    fn test_scene_covers_negative_positions() {
        let mut canvas = Canvas::new(Project::new("Render", ""));
        canvas.add_node_at(NodeKind::Tool, "Left", "Globe", CanvasPoint::new(-300.0, -200.0));

        let svg = render(&canvas, &Theme::light()).unwrap();
        assert!(svg.contains(r#"width="1180" height="880" viewBox="-380 -280 1180 880""#));
        assert!(svg.contains(r#"<rect x="-380" y="-280" width="1180" height="880""#));
    }

    #[test]
    fn test_scene_follows_pan() {
        let mut canvas = Canvas::new(Project::new("Render", ""));
        canvas.add_node_at(NodeKind::Agent, "Panned", "Bot", CanvasPoint::new(100.0, 100.0));
        canvas.viewport.pan(Vec2::new(-500.0, 0.0));

        // Card sits at screen x -400..-208.
        let svg = render(&canvas, &Theme::light()).unwrap();
        assert!(svg.contains(r#"viewBox="-480 0 1280 600""#));
    }
}
