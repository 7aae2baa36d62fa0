use crate::config::TreeConfig;
use crate::error::{Error, Result};

/// A named set of overrides applied on top of a base config
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub scheme: &'static str,
    pub stem_length: f64,
    pub initial_length: f64,
    pub length_decay: f64,
    pub base_angle: f64,
    pub trunk_texture: bool,
    pub node_size: Option<f64>,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Classic Tree",
        scheme: "autumn",
        stem_length: 140.0,
        initial_length: 100.0,
        length_decay: 0.62,
        base_angle: 35.0,
        trunk_texture: true,
        node_size: None,
    },
    Preset {
        name: "Tall Pine",
        scheme: "forest",
        stem_length: 160.0,
        initial_length: 90.0,
        length_decay: 0.58,
        base_angle: 30.0,
        trunk_texture: true,
        node_size: None,
    },
    Preset {
        name: "Cherry Blossom",
        scheme: "cherry",
        stem_length: 232.0,
        initial_length: 78.0,
        length_decay: 0.83,
        base_angle: 40.0,
        trunk_texture: true,
        node_size: None,
    },
    Preset {
        name: "Wide Canopy",
        scheme: "sunset",
        stem_length: 100.0,
        initial_length: 120.0,
        length_decay: 0.7,
        base_angle: 45.0,
        trunk_texture: false,
        node_size: None,
    },
    Preset {
        name: "Slender Willow",
        scheme: "ocean",
        stem_length: 180.0,
        initial_length: 80.0,
        length_decay: 0.55,
        base_angle: 25.0,
        trunk_texture: false,
        node_size: None,
    },
    Preset {
        name: "Maple",
        scheme: "maple",
        stem_length: 150.0,
        initial_length: 100.0,
        length_decay: 0.65,
        base_angle: 35.0,
        trunk_texture: true,
        node_size: Some(5.0),
    },
];

impl Preset {
    pub fn apply(&self, config: &mut TreeConfig) {
        config.color_scheme = self.scheme.to_string();
        config.stem_length = self.stem_length;
        config.initial_length = self.initial_length;
        config.length_decay = self.length_decay;
        config.base_angle = self.base_angle;
        config.trunk_texture = self.trunk_texture;
        if let Some(size) = self.node_size {
            config.node_size = size;
        }
    }

    /// Command-line friendly name, e.g. `Tall Pine` → `tall-pine`
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "-")
    }
}

/// Look a preset up by display name or slug, ignoring case
pub fn find(name: &str) -> Result<&'static Preset> {
    let wanted = name.trim().to_lowercase().replace(['_', ' '], "-");
    PRESETS
        .iter()
        .find(|p| p.slug() == wanted)
        .ok_or_else(|| Error::UnknownPreset(name.to_string()))
}
