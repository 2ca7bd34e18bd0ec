//! Connector geometry.
//!
//! Connections leave the right-center of their source card and enter the
//! left-center of their target card along a horizontal S-curve: a cubic
//! Bezier whose control points sit halfway between the endpoints on the x
//! axis, at the start and end heights respectively.

use crate::coords::{CanvasPoint, CanvasSize};
use glam::Vec2;

/// Rendered width of a node card.
pub const NODE_WIDTH: f32 = 192.0;
/// Rendered height of a node card.
pub const NODE_HEIGHT: f32 = 80.0;
pub const NODE_SIZE: CanvasSize = CanvasSize(Vec2::new(NODE_WIDTH, NODE_HEIGHT));

/// A cubic Bezier connector between two node cards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorPath {
    pub start: CanvasPoint,
    pub control1: CanvasPoint,
    pub control2: CanvasPoint,
    pub end: CanvasPoint,
    /// Where the delete affordance sits: the mean of start and end.
    pub midpoint: CanvasPoint,
}

impl ConnectorPath {
    /// Connector between cards whose top-left corners are `source` and `target`.
    pub fn between(source: CanvasPoint, target: CanvasPoint) -> Self {
        Self::between_sized(source, target, NODE_SIZE)
    }

    /// Connector for cards of an explicit size.
    pub fn between_sized(source: CanvasPoint, target: CanvasPoint, size: CanvasSize) -> Self {
        let half_height = size.height() / 2.0;
        let start = CanvasPoint::new(source.x() + size.width(), source.y() + half_height);
        let end = CanvasPoint::new(target.x(), target.y() + half_height);

        let control_x = start.x() + (end.x() - start.x()) * 0.5;
        let control1 = CanvasPoint::new(control_x, start.y());
        let control2 = CanvasPoint::new(control_x, end.y());

        Self {
            start,
            control1,
            control2,
            end,
            midpoint: start.midpoint(end),
        }
    }

    /// SVG path data: `M sx sy C c1x c1y, c2x c2y, ex ey`.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x(),
            self.start.y(),
            self.control1.x(),
            self.control1.y(),
            self.control2.x(),
            self.control2.y(),
            self.end.x(),
            self.end.y()
        )
    }
}
