//! Depth-dependent scale factors. All pure functions of (config value, depth).

/// Stem and initial-branch multiplier so deep trees keep a visible trunk
pub fn adaptive_scale(max_depth: u32) -> f64 {
    (1.0 + (max_depth as f64 - 18.0) / 50.0).min(1.5)
}

/// Shrinks angular spread as depth grows, floored at 0.4
pub fn depth_scale_factor(depth: u32) -> f64 {
    (1.0 - depth as f64 * 0.05).max(0.4)
}

pub fn accelerated_decay(base_decay: f64, depth: u32, enabled: bool) -> f64 {
    if !enabled {
        return base_decay;
    }
    let depth_factor = (depth as f64 / 10.0).min(1.0);
    base_decay * (1.0 - 0.3 * depth_factor)
}

/// Half-width of the fan of `branch_factor` children at `depth`.
///
/// Factors above 3 widen the fan logarithmically.
pub fn spread_angle(base_angle: f64, branch_factor: u32, depth: u32) -> f64 {
    let mut spread = base_angle;
    if branch_factor > 3 {
        spread = base_angle * (branch_factor as f64).ln() / 3f64.ln();
    }
    spread * depth_scale_factor(depth)
}

/// Headings of `branch_factor` children fanned across `[heading - spread, heading + spread]`
pub fn fan_headings(heading: f64, spread: f64, branch_factor: u32) -> Vec<f64> {
    match branch_factor {
        0 => Vec::new(),
        1 => vec![heading],
        2 => vec![heading - spread, heading + spread],
        k => {
            let total = spread * 2.0;
            (0..k)
                .map(|i| heading - spread + total * i as f64 / (k - 1) as f64)
                .collect()
        }
    }
}
