//! Tree generation: walks the branching structure depth-first and emits
//! primitives for the trunk, the pruned pass and the surviving pass.

use crate::color::{gradient_color, hex_to_rgb, ColorScheme, Rgb, DEFAULT_BASE, WHITE};
use crate::config::{Diagnostic, TreeConfig};
use crate::geometry::{endpoint, Point};
use crate::primitive::{
    Circle, CirclePaint, Dash, Falloff, Layer, Line, Mark, Primitive, Scene,
    PRUNED_OPACITY,
};
use crate::pruning::prune_children;
use crate::scaling::{accelerated_decay, adaptive_scale, fan_headings, spread_angle};
use crate::schemes::SchemeBook;
use rand::Rng;
use std::collections::HashSet;
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, warn};

/// Depth from which wide nodes only expand every few children
pub const THROTTLE_DEPTH: u32 = 15;

/// Maximum heading jitter of single-child nodes, in degrees either side
pub const JITTER_DEGREES: f64 = 2.5;

const MIN_WIDTH: f64 = 0.5;
const TEXTURE_SPACING: f64 = 10.0;
const TEXTURE_OPACITY: f64 = 0.4;

/// State of one node of the walk
#[derive(Debug, Clone, Copy)]
struct Frame {
    pos: Point,
    length: f64,
    width: f64,
    heading: f64,
    depth: u32,
    pruned: bool,
}

/// A child branch waiting to be drawn
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: Point,
    end: Point,
    width: f64,
    color: Rgb,
    pruned: bool,
}

/// A node circle to draw
#[derive(Debug, Clone, Copy)]
struct Node {
    center: Point,
    radius: f64,
    color: Rgb,
    branching: bool,
    pruned: bool,
}

enum Task {
    Draw(Segment),
    Expand(Frame),
}

/// Rounded geometry identifying an already expanded node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    x: i64,
    y: i64,
    length: i64,
    heading: i64,
}

impl CacheKey {
    fn new(frame: &Frame) -> Self {
        // half-up rounding, so -2.5 and 2.5 land on -2 and 3
        let round = |v: f64| (v + 0.5).floor() as i64;
        Self {
            x: round(frame.pos.x),
            y: round(frame.pos.y),
            length: round(frame.length),
            heading: round(frame.heading),
        }
    }
}

fn layer_of(pruned: bool) -> Layer {
    if pruned {
        Layer::Pruned
    } else {
        Layer::Surviving
    }
}

/// Per-render state. Created by [`render`] and consumed into a [`Scene`].
struct RenderSession<'a, R: Rng + ?Sized> {
    config: &'a TreeConfig,
    scheme: Option<&'a ColorScheme>,
    prune_color: Rgb,
    rng: &'a mut R,
    cache: HashSet<CacheKey>,
    trunk: Vec<Mark>,
    pruned: Vec<Mark>,
    surviving: Vec<Mark>,
    next_branch: u32,
    scene: Scene,
}

/// Generate the tree described by `config`.
///
/// Never fails: configuration anomalies are logged and returned in
/// [`Scene::diagnostics`], and an oversized tree stops at
/// `primitive_budget` with `stats.truncated` set.
pub fn render<R: Rng + ?Sized>(config: &TreeConfig, schemes: &SchemeBook, rng: &mut R) -> Scene {
    let mut scene = Scene::new(
        config.canvas_width,
        config.canvas_height,
        hex_to_rgb(&config.bg_color),
        config.zoom_level,
    );

    scene.diagnostics = config.diagnose();
    let scheme = schemes.get(&config.color_scheme);
    if scheme.is_none() {
        scene
            .diagnostics
            .push(Diagnostic::UnknownScheme(config.color_scheme.clone()));
    }
    for diagnostic in &scene.diagnostics {
        warn!("{}", diagnostic);
    }

    let session = RenderSession {
        config,
        scheme,
        prune_color: hex_to_rgb(&config.prune_color),
        rng,
        cache: HashSet::new(),
        trunk: Vec::new(),
        pruned: Vec::new(),
        surviving: Vec::new(),
        next_branch: 0,
        scene,
    };
    session.run()
}

impl<'a, R: Rng + ?Sized> RenderSession<'a, R> {
    fn run(mut self) -> Scene {
        let config = self.config;
        let scale = adaptive_scale(config.max_depth_render);
        let stem_length = config.stem_length * scale;
        let origin = Point::new(config.start_x, config.start_y);
        let top = Point::new(config.start_x, config.start_y - stem_length);

        self.draw_stem(origin, top);

        let root = Frame {
            pos: top,
            length: config.initial_length * scale,
            width: config.initial_width,
            heading: 0.0,
            depth: 0,
            pruned: false,
        };
        self.walk(root);

        if self.scene.stats.truncated {
            let diagnostic = Diagnostic::Truncated(config.primitive_budget);
            warn!("{}", diagnostic);
            self.scene.diagnostics.push(diagnostic);
        }

        let mut scene = self.scene;
        scene.marks.reserve(self.trunk.len() + self.pruned.len() + self.surviving.len());
        scene.marks.extend(self.trunk);
        scene.marks.extend(self.pruned);
        scene.marks.extend(self.surviving);

        debug!(
            primitives = scene.marks.len(),
            branches = scene.stats.branches,
            pruned = scene.stats.pruned_branches,
            cache_hits = scene.stats.cache_hits,
            "tree rendered"
        );
        scene
    }

    /// Depth-first walk with an explicit stack. Children are pushed in
    /// reverse so each child's segment is drawn right before its subtree.
    fn walk(&mut self, root: Frame) {
        let mut stack: Vec<Task> = Vec::with_capacity(256);
        stack.push(Task::Expand(root));

        while let Some(task) = stack.pop() {
            if self.scene.stats.truncated {
                break;
            }
            match task {
                Task::Draw(segment) => self.draw_segment(segment),
                Task::Expand(frame) => self.expand(frame, &mut stack),
            }
        }
    }

    fn expand(&mut self, frame: Frame, stack: &mut Vec<Task>) {
        let config = self.config;
        if frame.depth >= config.max_depth_render || frame.length < config.min_branch_length {
            return;
        }

        if !self.cache.insert(CacheKey::new(&frame)) {
            self.scene.stats.cache_hits += 1;
            return;
        }
        self.scene.stats.expanded += 1;

        let depth = frame.depth;
        let branch_factor = config.branch_factor(depth);
        let decay = accelerated_decay(config.length_decay, depth, config.accelerated_decay);
        let next_length = frame.length * decay;
        let next_width = (frame.width * config.width_decay).max(MIN_WIDTH);
        let color = gradient_color(depth, config.gradient_depth(), self.scheme);

        let pruned_children = prune_children(
            depth,
            branch_factor,
            config.show_pruning,
            &config.survival_prob,
            &mut *self.rng,
        );

        if branch_factor == 1 {
            let jitter = (self.rng.gen::<f64>() - 0.5) * JITTER_DEGREES * 2.0;
            let heading = frame.heading + jitter;
            let end = endpoint(frame.pos, heading, next_length);

            stack.push(Task::Expand(Frame {
                pos: end,
                length: next_length,
                width: next_width,
                heading,
                depth: depth + 1,
                pruned: frame.pruned,
            }));
            stack.push(Task::Draw(Segment {
                start: frame.pos,
                end,
                width: next_width,
                color,
                pruned: frame.pruned,
            }));
            return;
        }

        let node = Node {
            center: frame.pos,
            radius: (config.node_size * (frame.width / config.initial_width)).max(1.5),
            color: self.branch_node_color(),
            branching: true,
            pruned: frame.pruned,
        };
        self.draw_node(node, layer_of(frame.pruned), None);

        let spread = spread_angle(config.base_angle, branch_factor, depth);
        let stride = (branch_factor as usize / 3).max(1);

        for (i, &heading) in fan_headings(frame.heading, spread, branch_factor)
            .iter()
            .enumerate()
            .rev()
        {
            let end = endpoint(frame.pos, heading, next_length);
            let pruned = frame.pruned || pruned_children[i];

            if depth < THROTTLE_DEPTH || i % stride == 0 {
                stack.push(Task::Expand(Frame {
                    pos: end,
                    length: next_length,
                    width: next_width,
                    heading,
                    depth: depth + 1,
                    pruned,
                }));
            }
            stack.push(Task::Draw(Segment {
                start: frame.pos,
                end,
                width: next_width,
                color,
                pruned,
            }));
        }
    }

    fn draw_segment(&mut self, segment: Segment) {
        let config = self.config;
        let id = self.next_branch;
        self.next_branch += 1;
        self.scene.stats.branches += 1;
        if segment.pruned {
            self.scene.stats.pruned_branches += 1;
        }

        let line = if segment.pruned {
            Line {
                dash: Some(Dash::pruned(segment.width)),
                opacity: Some(PRUNED_OPACITY),
                ..Line::solid(segment.start, segment.end, segment.width, self.prune_color)
            }
        } else {
            Line::solid(segment.start, segment.end, segment.width, segment.color)
        };
        self.emit(layer_of(segment.pruned), Some(id), Primitive::Line(line));

        let node = Node {
            center: segment.end,
            radius: (config.node_size * 0.7 * (segment.width / config.initial_width)).max(1.0),
            color: self.node_color(),
            branching: false,
            pruned: segment.pruned,
        };
        self.draw_node(node, layer_of(segment.pruned), Some(id));
    }

    fn draw_stem(&mut self, origin: Point, top: Point) {
        let config = self.config;
        let width = config.stem_width;

        if config.trunk_texture {
            let base = self.base_color();
            self.emit(
                Layer::Trunk,
                None,
                Primitive::Line(Line::solid(origin, top, width, base)),
            );
            self.draw_bark(origin, top, width, base.darken(20));
        } else {
            let color = gradient_color(0, config.max_depth_render, self.scheme);
            self.emit(
                Layer::Trunk,
                None,
                Primitive::Line(Line::solid(origin, top, width, color)),
            );
        }

        let node = Node {
            center: top,
            radius: config.node_size * 1.2,
            color: self.branch_node_color(),
            branching: true,
            pruned: false,
        };
        self.draw_node(node, Layer::Trunk, None);
    }

    /// Short perpendicular hatch strokes along the stem
    fn draw_bark(&mut self, from: Point, to: Point, width: f64, color: Rgb) {
        let length = from.distance(to);
        let count = (length / TEXTURE_SPACING).floor() as usize;
        let perpendicular = (to.y - from.y).atan2(to.x - from.x) + FRAC_PI_2;

        for i in 0..count {
            let at = from.lerp(to, i as f64 / count as f64);
            let hatch = width * 0.3 * (self.rng.gen::<f64>() * 0.5 + 0.5);
            let sx = if self.rng.gen::<f64>() > 0.5 { 1.0 } else { -1.0 };
            let sy = if self.rng.gen::<f64>() > 0.5 { 1.0 } else { -1.0 };
            let end = Point::new(
                at.x + perpendicular.cos() * hatch * sx,
                at.y + perpendicular.sin() * hatch * sy,
            );

            self.emit(
                Layer::Trunk,
                None,
                Primitive::Line(Line {
                    opacity: Some(TEXTURE_OPACITY),
                    ..Line::solid(at, end, 1.0, color)
                }),
            );
        }
    }

    fn draw_node(&mut self, node: Node, layer: Layer, branch: Option<u32>) {
        let config = self.config;
        if !config.show_nodes {
            return;
        }

        if node.pruned && config.show_pruning {
            self.emit(
                layer,
                branch,
                Primitive::Circle(Circle {
                    center: node.center,
                    radius: node.radius * 2.0,
                    color: self.prune_color,
                    paint: CirclePaint::Falloff(Falloff::Halo),
                }),
            );
        }

        let fill = if node.pruned { self.prune_color } else { node.color };
        self.emit(
            layer,
            branch,
            Primitive::Circle(Circle {
                center: node.center,
                radius: node.radius,
                color: fill,
                paint: CirclePaint::Fill,
            }),
        );

        if node.branching && config.highlight_branch_nodes && !node.pruned {
            for paint in [CirclePaint::Outline { width: 1.0 }, CirclePaint::Falloff(Falloff::Glow)] {
                self.emit(
                    layer,
                    branch,
                    Primitive::Circle(Circle {
                        center: node.center,
                        radius: node.radius,
                        color: WHITE,
                        paint,
                    }),
                );
            }
        }
    }

    fn emit(&mut self, layer: Layer, branch: Option<u32>, primitive: Primitive) {
        let total = self.trunk.len() + self.pruned.len() + self.surviving.len();
        if total >= self.config.primitive_budget {
            self.scene.stats.truncated = true;
            return;
        }

        let mark = Mark { layer, branch, primitive };
        match layer {
            Layer::Trunk => self.trunk.push(mark),
            Layer::Pruned => self.pruned.push(mark),
            Layer::Surviving => self.surviving.push(mark),
        }
    }

    fn base_color(&self) -> Rgb {
        self.scheme.map(|s| s.base).unwrap_or(DEFAULT_BASE)
    }

    fn node_color(&self) -> Rgb {
        self.scheme.map(|s| s.node).unwrap_or(DEFAULT_BASE)
    }

    fn branch_node_color(&self) -> Rgb {
        self.scheme.map(|s| s.branch_node).unwrap_or(DEFAULT_BASE)
    }
}
