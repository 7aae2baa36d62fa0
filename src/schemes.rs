//! Built-in color schemes and the name → scheme lookup handed to the engine.

use crate::color::{hex_to_rgb, ColorScheme, GradientStop, Rgb};
use std::collections::BTreeMap;

/// Static description of a scheme: base, five gradient stops, node, branch node
struct SchemeSpec {
    name: &'static str,
    base: &'static str,
    stops: [&'static str; 5],
    node: &'static str,
    branch_node: &'static str,
}

const STOP_POSITIONS: [f64; 5] = [0.0, 0.3, 0.6, 0.8, 1.0];

const BUILTIN: &[SchemeSpec] = &[
    SchemeSpec {
        name: "autumn",
        base: "#8B4513",
        stops: ["#8B4513", "#A0522D", "#CD853F", "#DEB887", "#F5DEB3"],
        node: "#FFCC80",
        branch_node: "#FF8F00",
    },
    SchemeSpec {
        name: "forest",
        base: "#2E7D32",
        stops: ["#1B5E20", "#2E7D32", "#388E3C", "#43A047", "#66BB6A"],
        node: "#81C784",
        branch_node: "#2E7D32",
    },
    SchemeSpec {
        name: "ocean",
        base: "#0D47A1",
        stops: ["#0D47A1", "#1976D2", "#2196F3", "#64B5F6", "#90CAF9"],
        node: "#BBDEFB",
        branch_node: "#1976D2",
    },
    SchemeSpec {
        name: "sunset",
        base: "#BF360C",
        stops: ["#BF360C", "#E64A19", "#FF7043", "#FFAB91", "#FFCCBC"],
        node: "#FFCCBC",
        branch_node: "#FF5722",
    },
    SchemeSpec {
        name: "monochrome",
        base: "#212121",
        stops: ["#212121", "#424242", "#616161", "#9E9E9E", "#BDBDBD"],
        node: "#E0E0E0",
        branch_node: "#616161",
    },
    SchemeSpec {
        name: "cherry",
        base: "#4A1D1C",
        stops: ["#4A1D1C", "#7D3633", "#AF4F4B", "#D98C88", "#F7C2C0"],
        node: "#FAE6E5",
        branch_node: "#9A3734",
    },
    SchemeSpec {
        name: "maple",
        base: "#6B4226",
        stops: ["#6B4226", "#8D5B3A", "#BB7F5A", "#D9A989", "#F7E0CB"],
        node: "#F9EDE1",
        branch_node: "#A76C42",
    },
    SchemeSpec {
        name: "emerald",
        base: "#004D40",
        stops: ["#004D40", "#00695C", "#00897B", "#26A69A", "#80CBC4"],
        node: "#B2DFDB",
        branch_node: "#00796B",
    },
    SchemeSpec {
        name: "purple",
        base: "#4A148C",
        stops: ["#4A148C", "#6A1B9A", "#8E24AA", "#AB47BC", "#CE93D8"],
        node: "#E1BEE7",
        branch_node: "#7B1FA2",
    },
    SchemeSpec {
        name: "golden",
        base: "#6D4C41",
        stops: ["#6D4C41", "#8D6E63", "#BF9D7E", "#D4B08C", "#F9CC89"],
        node: "#FFF8E1",
        branch_node: "#FFB300",
    },
    SchemeSpec {
        name: "redwood",
        base: "#5D1B0B",
        stops: ["#5D1B0B", "#7F2B11", "#A23B1A", "#C75C37", "#E69B7B"],
        node: "#FFCCBC",
        branch_node: "#BF360C",
    },
    SchemeSpec {
        name: "spring",
        base: "#558B2F",
        stops: ["#558B2F", "#7CB342", "#9CCC65", "#C5E1A5", "#F1F8E9"],
        node: "#F1F8E9",
        branch_node: "#8BC34A",
    },
];

/// Extra palettes registered as `custom1`..`custom5`
const CUSTOM: &[(&str, [&str; 5])] = &[
    ("Earth", ["#543005", "#8c510a", "#bf812d", "#dfc27d", "#f6e8c3"]),
    ("Blues", ["#0d46a0", "#2171b5", "#4292c6", "#6baed6", "#9ecae1"]),
    ("GreenYellow", ["#276419", "#4d9221", "#7fbc41", "#b8e186", "#e6f5d0"]),
    ("Purples", ["#4a1486", "#6a51a3", "#807dba", "#9e9ac8", "#bcbddc"]),
    ("Reds", ["#7f0000", "#b30000", "#d7301f", "#ef6548", "#fc8d59"]),
];

impl SchemeSpec {
    fn build(&self) -> ColorScheme {
        ColorScheme {
            base: hex_to_rgb(self.base),
            gradient: STOP_POSITIONS
                .iter()
                .zip(self.stops.iter())
                .map(|(&pos, hex)| GradientStop::new(pos, hex_to_rgb(hex)))
                .collect(),
            node: hex_to_rgb(self.node),
            branch_node: hex_to_rgb(self.branch_node),
        }
    }
}

/// Read-only lookup of color schemes by name
#[derive(Debug, Clone, Default)]
pub struct SchemeBook {
    schemes: BTreeMap<String, ColorScheme>,
}

impl SchemeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in schemes plus the `customN` palettes
    pub fn builtin() -> Self {
        let mut book = Self::new();
        for spec in BUILTIN {
            book.insert(spec.name, spec.build());
        }
        for (i, (_, colors)) in CUSTOM.iter().enumerate() {
            let colors: Vec<Rgb> = colors.iter().map(|hex| hex_to_rgb(hex)).collect();
            book.insert(&format!("custom{}", i + 1), ColorScheme::from_colors(&colors));
        }
        book
    }

    pub fn insert(&mut self, name: &str, scheme: ColorScheme) {
        self.schemes.insert(name.to_string(), scheme);
    }

    pub fn get(&self, name: &str) -> Option<&ColorScheme> {
        self.schemes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColorScheme)> {
        self.schemes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

/// Display label of a custom palette, e.g. `custom2` → `Blues`
pub fn custom_label(name: &str) -> Option<&'static str> {
    let index: usize = name.strip_prefix("custom")?.parse().ok()?;
    CUSTOM.get(index.checked_sub(1)?).map(|(label, _)| *label)
}
