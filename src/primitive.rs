//! Drawing primitives and the scene that collects them in painter's order.

use crate::color::Rgb;
use crate::config::Diagnostic;
use crate::geometry::Point;

/// Opacity applied to pruned branches
pub const PRUNED_OPACITY: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Round,
    Butt,
}

/// Dash pattern: painted length then gap length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub on: f64,
    pub off: f64,
}

impl Dash {
    /// Pattern used for pruned branches of the given width
    pub fn pruned(width: f64) -> Self {
        Self { on: width * 2.0, off: width * 1.5 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub width: f64,
    pub color: Rgb,
    pub cap: LineCap,
    pub dash: Option<Dash>,
    pub opacity: Option<f64>,
}

impl Line {
    /// Solid round-capped stroke
    pub fn solid(start: Point, end: Point, width: f64, color: Rgb) -> Self {
        Self {
            start,
            end,
            width,
            color,
            cap: LineCap::Round,
            dash: None,
            opacity: None,
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }
}

/// Radial alpha ramps used for node effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Falloff {
    /// Soft glow around pruned nodes
    Halo,
    /// Inner highlight of branching nodes
    Glow,
}

impl Falloff {
    /// (offset, alpha) stops from center to rim
    pub fn stops(self) -> &'static [(f64, f64)] {
        match self {
            Falloff::Halo => &[(0.0, 128.0 / 255.0), (0.7, 64.0 / 255.0), (1.0, 0.0)],
            Falloff::Glow => &[(0.0, 64.0 / 255.0), (1.0, 0.0)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CirclePaint {
    Fill,
    Outline { width: f64 },
    Falloff(Falloff),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub color: Rgb,
    pub paint: CirclePaint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(Line),
    Circle(Circle),
}

/// Which population a primitive belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Main stem, drawn once before both passes
    Trunk,
    Pruned,
    Surviving,
}

/// A primitive tagged with its layer and the branch that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub layer: Layer,
    /// Sequential id of the branch segment; `None` for trunk and node-only marks
    pub branch: Option<u32>,
    pub primitive: Primitive,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    pub branches: u32,
    pub pruned_branches: u32,
    pub expanded: u32,
    pub cache_hits: u32,
    pub truncated: bool,
}

/// Finished render: everything needed to rasterize or serialize the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub zoom: f64,
    pub marks: Vec<Mark>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: RenderStats,
}

impl Scene {
    pub fn new(width: u32, height: u32, background: Rgb, zoom: f64) -> Self {
        Self {
            width,
            height,
            background,
            zoom,
            marks: Vec::new(),
            diagnostics: Vec::new(),
            stats: RenderStats::default(),
        }
    }

    /// Primitives in painter's order
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.marks.iter().map(|m| &m.primitive)
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &Mark> {
        self.marks.iter().filter(move |m| m.layer == layer)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Map a canvas point through the zoom about the canvas center
    pub fn view(&self, p: Point) -> Point {
        let (tx, ty) = self.zoom_offset();
        Point::new(p.x * self.zoom + tx, p.y * self.zoom + ty)
    }

    pub fn zoom_offset(&self) -> (f64, f64) {
        (
            (1.0 - self.zoom) * self.width as f64 / 2.0,
            (1.0 - self.zoom) * self.height as f64 / 2.0,
        )
    }
}
