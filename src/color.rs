use serde::{Deserialize, Serialize};
use std::fmt;

/// Base color used whenever a scheme lookup fails (autumn trunk brown)
pub const DEFAULT_BASE: Rgb = Rgb::new(0x8b, 0x45, 0x13);

pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Subtract `amount` from every channel, saturating at zero
    pub fn darken(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse `#rgb`, `#rrggbb`, `rgb` or `rrggbb`.
///
/// Malformed input yields black. This is not a validator: callers that need
/// to reject bad input must check it themselves.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Rgb::default();
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);

    match digits.len() {
        3 => {
            let expand = |i: usize| channel(&digits[i..=i].repeat(2));
            Rgb::new(expand(0), expand(1), expand(2))
        }
        6 => Rgb::new(
            channel(&digits[0..2]),
            channel(&digits[2..4]),
            channel(&digits[4..6]),
        ),
        _ => Rgb::default(),
    }
}

/// A (position, color) pair on a gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub pos: f64,
    pub color: Rgb,
}

impl GradientStop {
    pub const fn new(pos: f64, color: Rgb) -> Self {
        Self { pos, color }
    }
}

/// Named palette used to color a tree
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub base: Rgb,
    pub gradient: Vec<GradientStop>,
    pub node: Rgb,
    pub branch_node: Rgb,
}

impl ColorScheme {
    /// Build a scheme from an ordered color list, stops spaced evenly over [0, 1]
    pub fn from_colors(colors: &[Rgb]) -> Self {
        let first = colors.first().copied().unwrap_or(DEFAULT_BASE);
        let gradient = match colors.len() {
            0 | 1 => vec![GradientStop::new(0.0, first), GradientStop::new(1.0, first)],
            n => colors
                .iter()
                .enumerate()
                .map(|(i, &color)| GradientStop::new(i as f64 / (n - 1) as f64, color))
                .collect(),
        };

        Self {
            base: first,
            gradient,
            node: WHITE,
            branch_node: colors.get(1).copied().unwrap_or(first),
        }
    }

    pub fn first_stop(&self) -> Rgb {
        self.gradient.first().map(|s| s.color).unwrap_or(self.base)
    }

    pub fn last_stop(&self) -> Rgb {
        self.gradient.last().map(|s| s.color).unwrap_or(self.base)
    }
}

/// Color at `depth` along the scheme's gradient.
///
/// Depth is normalized by `max_depth` and clamped to [0, 1]; a zero
/// `max_depth` counts as fully deep. A missing scheme falls back to
/// [`DEFAULT_BASE`] instead of failing.
pub fn gradient_color(depth: u32, max_depth: u32, scheme: Option<&ColorScheme>) -> Rgb {
    let Some(scheme) = scheme else {
        return DEFAULT_BASE;
    };

    let stops = &scheme.gradient;
    match stops.len() {
        0 => return scheme.base,
        1 => return stops[0].color,
        _ => {}
    }

    let t = if max_depth == 0 {
        1.0
    } else {
        (depth as f64 / max_depth as f64).clamp(0.0, 1.0)
    };

    let (lower, upper) = stops
        .windows(2)
        .find(|pair| t >= pair[0].pos && t <= pair[1].pos)
        .map(|pair| (pair[0], pair[1]))
        .unwrap_or((stops[stops.len() - 2], stops[stops.len() - 1]));

    let range = upper.pos - lower.pos;
    let frac = if range == 0.0 { 0.0 } else { (t - lower.pos) / range };

    let lerp = |a: u8, b: u8| {
        let v = a as f64 + frac * (b as f64 - a as f64);
        v.round().clamp(0.0, 255.0) as u8
    };

    Rgb::new(
        lerp(lower.color.r, upper.color.r),
        lerp(lower.color.g, upper.color.g),
        lerp(lower.color.b, upper.color.b),
    )
}
