use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Depth above which a render is flagged as potentially slow
pub const DEEP_RENDER_WARNING: u32 = 50;

/// Default survival probability per depth
pub const SURVIVAL_PROB: [f64; 127] = [
    0.93, 0.97, 0.89, 0.82, 0.51, 0.63, 0.67, 0.64, 0.84, 0.83, 0.94,
    0.72, 0.64, 0.78, 0.64, 0.87, 0.53, 0.91, 0.58, 0.56, 0.86, 0.91,
    0.94, 0.96, 0.52, 0.78, 0.9, 0.88, 0.86, 0.95, 0.96, 0.8, 0.94,
    0.99, 0.99, 0.83, 0.99, 0.93, 0.94, 0.98, 0.99, 0.83, 0.9, 0.95,
    0.85, 0.99, 0.96, 0.84, 0.92, 1.0, 0.88, 0.98, 0.9, 0.93, 0.86,
    1.0, 0.77, 0.96, 0.8, 1.0, 0.86, 0.9, 0.83, 0.99, 0.73, 0.99,
    0.71, 1.0, 0.82, 0.96, 0.87, 0.97, 0.88, 0.97, 0.99, 0.74, 0.97,
    0.95, 0.86, 0.91, 1.0, 1.0, 0.85, 0.67, 0.89, 1.0, 0.74, 1.0,
    0.82, 1.0, 0.85, 0.79, 0.9, 0.91, 1.0, 0.75, 1.0, 0.67, 0.97,
    0.68, 1.0, 0.81, 0.89, 0.98, 0.73, 0.89, 0.9, 0.77, 0.97, 0.99,
    0.65, 1.0, 0.92, 0.93, 0.64, 0.67, 0.97, 0.82, 0.88, 1.0, 0.85,
    1.0, 0.71, 0.87, 0.98, 0.86, 1.0,
];

/// Default branch factor per depth
pub const BRANCHING_PATTERN: [u32; 127] = [
    4, 9, 1, 3, 1, 3, 1, 3, 1, 1, 1, 1, 1, 3, 1, 1, 1, 3, 1, 1, 1, 1,
    1, 1, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 3,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// Survival table of the bushier alternative tree type
pub const ALT_SURVIVAL_PROB: [f64; 127] = [
    1., 0.99, 1., 1., 0.89, 0.97, 0.87, 0.79, 0.69, 0.63, 0.71,
    0.59, 0.54, 0.49, 0.38, 0.54, 0.33, 0.77, 0.5, 0.59, 0.82, 0.8,
    0.95, 0.39, 0.86, 0.46, 0.74, 0.88, 0.46, 0.74, 0.89, 0.92, 0.8,
    0.47, 0.73, 0.8, 0.79, 0.85, 0.92, 0.78, 0.94, 0.89, 0.96, 1.,
    0.76, 0.3, 0.42, 0.73, 0.91, 0.94, 0.9, 0.78, 0.98, 0.94, 0.84,
    0.25, 0.39, 0.99, 0.65, 0.92, 0.99, 1., 0.81, 0.99, 0.82, 0.97,
    0.83, 0.99, 0.82, 0.97, 0.85, 0.96, 0.72, 0.87, 0.97, 0.7, 1.,
    0.79, 0.96, 0.92, 0.92, 0.81, 0.89, 0.88, 0.78, 0.71, 0.96, 0.79,
    0.69, 0.96, 0.62, 0.95, 1., 0.69, 0.99, 0.6, 0.99, 0.76, 1.,
    0.59, 0.84, 0.86, 0.88, 0.88, 0.97, 1., 0.63, 0.97, 0.94, 0.91,
    0.79, 0.7, 0.84, 0.87, 1., 0.62, 0.96, 0.92, 0.59, 0.99, 0.73,
    0.87, 1., 0.62, 0.85, 0.89, 1.,
];

/// Branching table of the bushier alternative tree type
pub const ALT_BRANCHING_PATTERN: [u32; 127] = [
    4, 9, 1, 3, 3, 3, 1, 9, 1, 1, 3, 1, 1, 9, 1, 3, 1, 3, 3, 1, 1, 1,
    1, 3, 9, 1, 1, 1, 1, 1, 1, 1, 3, 1, 3, 1, 1, 1, 1, 1, 1, 1, 1, 9,
    1, 1, 1, 1, 1, 3, 1, 1, 1, 3, 1, 1, 1, 3, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 3, 1, 1, 3, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 1, 1, 1, 3, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// Parameters of a single tree render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub start_x: f64,
    pub start_y: f64,
    pub stem_length: f64,
    pub stem_width: f64,
    pub initial_length: f64,
    pub initial_width: f64,
    pub length_decay: f64,
    pub width_decay: f64,
    pub node_size: f64,
    pub base_angle: f64,
    pub bg_color: String,
    pub prune_color: String,
    pub color_scheme: String,
    pub show_nodes: bool,
    pub highlight_branch_nodes: bool,
    pub trunk_texture: bool,
    pub accelerated_decay: bool,
    pub min_branch_length: f64,
    pub max_depth_render: u32,
    pub zoom_level: f64,
    pub show_pruning: bool,
    pub survival_prob: Vec<f64>,
    pub branching_pattern: Vec<u32>,
    /// Hard cap on emitted primitives; the walk stops once reached
    pub primitive_budget: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000,
            canvas_height: 800,
            start_x: 500.0,
            start_y: 700.0,
            stem_length: 150.0,
            stem_width: 14.0,
            initial_length: 65.0,
            initial_width: 12.0,
            length_decay: 0.83,
            width_decay: 0.75,
            node_size: 3.0,
            base_angle: 40.0,
            bg_color: "#f8f8f8".to_string(),
            prune_color: "#99a39c".to_string(),
            color_scheme: "autumn".to_string(),
            show_nodes: true,
            highlight_branch_nodes: true,
            trunk_texture: true,
            accelerated_decay: false,
            min_branch_length: 1.0,
            max_depth_render: 50,
            zoom_level: 1.0,
            show_pruning: false,
            survival_prob: SURVIVAL_PROB.to_vec(),
            branching_pattern: BRANCHING_PATTERN.to_vec(),
            primitive_budget: 250_000,
        }
    }
}

/// A non-fatal anomaly found in a configuration or during a render
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("length decay {0} is outside (0, 1)")]
    LengthDecayOutOfRange(f64),

    #[error("width decay {0} is outside (0, 1)")]
    WidthDecayOutOfRange(f64),

    #[error("base angle {0} is outside (0, 90) degrees")]
    BaseAngleOutOfRange(f64),

    #[error("survival probability table length ({survival}) does not match branching pattern length ({branching})")]
    TableLengthMismatch { survival: usize, branching: usize },

    #[error("max render depth {0} may impact performance; consider a larger min branch length or zoom")]
    DeepRender(u32),

    #[error("unknown color scheme {0:?}, using the default base color")]
    UnknownScheme(String),

    #[error("render truncated after {0} primitives")]
    Truncated(usize),
}

impl TreeConfig {
    /// Load a config file; `.json` is parsed as JSON, everything else as TOML.
    /// Missing fields take their default value.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&content).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| Error::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Swap in the alternative survival and branching tables
    pub fn with_alternative_tables(mut self) -> Self {
        self.survival_prob = ALT_SURVIVAL_PROB.to_vec();
        self.branching_pattern = ALT_BRANCHING_PATTERN.to_vec();
        self
    }

    /// Report configuration anomalies. Nothing here stops a render.
    pub fn diagnose(&self) -> Vec<Diagnostic> {
        let mut issues = Vec::new();

        if !(self.length_decay > 0.0 && self.length_decay < 1.0) {
            issues.push(Diagnostic::LengthDecayOutOfRange(self.length_decay));
        }
        if !(self.width_decay > 0.0 && self.width_decay < 1.0) {
            issues.push(Diagnostic::WidthDecayOutOfRange(self.width_decay));
        }
        if !(self.base_angle > 0.0 && self.base_angle < 90.0) {
            issues.push(Diagnostic::BaseAngleOutOfRange(self.base_angle));
        }
        if self.survival_prob.len() != self.branching_pattern.len() {
            issues.push(Diagnostic::TableLengthMismatch {
                survival: self.survival_prob.len(),
                branching: self.branching_pattern.len(),
            });
        }
        if self.max_depth_render > DEEP_RENDER_WARNING {
            issues.push(Diagnostic::DeepRender(self.max_depth_render));
        }

        issues
    }

    /// Branch factor at `depth`, 1 past the end of the table
    pub fn branch_factor(&self, depth: u32) -> u32 {
        self.branching_pattern
            .get(depth as usize)
            .copied()
            .unwrap_or(1)
    }

    /// Depth used to normalize the color gradient
    pub fn gradient_depth(&self) -> u32 {
        (self.branching_pattern.len() as u32).min(self.max_depth_render)
    }
}
