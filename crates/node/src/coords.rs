//! Type-safe coordinate system for Flowboard.
//!
//! Provides distinct types for different coordinate spaces to prevent
//! accidental mixing at compile time.
//!
//! # Coordinate Spaces
//!
//! - **Canvas space**: Where nodes live (infinite, pannable)
//! - **Screen space**: Pixels relative to the canvas element origin (after zoom/pan)

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in canvas space (where nodes live).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint(pub Vec2);

/// Position in screen space (pixels relative to canvas element, after zoom/pan).
///
/// Pointer events arrive in screen space; the viewport converts them to
/// canvas space before they reach the node collection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint(pub Vec2);

/// Size in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize(pub Vec2);

/// Movement/offset in canvas space (not a position).
///
/// The grip offset of a drag is a delta: cursor minus node origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDelta(pub Vec2);

// === CanvasPoint ===

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    /// Arithmetic mean of two points.
    pub fn midpoint(self, other: CanvasPoint) -> CanvasPoint {
        CanvasPoint((self.0 + other.0) / 2.0)
    }
}

impl From<Vec2> for CanvasPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasPoint> for Vec2 {
    fn from(p: CanvasPoint) -> Self {
        p.0
    }
}

impl Add<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, delta: CanvasDelta) -> Self::Output {
        CanvasPoint(self.0 + delta.0)
    }
}

impl Sub<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn sub(self, delta: CanvasDelta) -> Self::Output {
        CanvasPoint(self.0 - delta.0)
    }
}

impl Sub for CanvasPoint {
    type Output = CanvasDelta;

    /// Subtracting two points gives a delta.
    fn sub(self, other: CanvasPoint) -> Self::Output {
        CanvasDelta(self.0 - other.0)
    }
}

// === ScreenPoint ===

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for ScreenPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

// === CanvasSize ===

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.0.x
    }

    pub fn height(&self) -> f32 {
        self.0.y
    }
}

// === CanvasDelta ===

impl CanvasDelta {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn length(&self) -> f32 {
        self.0.length()
    }
}
