use crate::color::{hex_to_rgb, ColorScheme, Rgb};
use crate::schemes::SchemeBook;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// User preferences from `<config dir>/yggdrasil/config.toml`
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub default_scheme: Option<String>,
    pub output_dir: Option<PathBuf>,
    #[serde(default, rename = "scheme")]
    pub schemes: Vec<SchemeSettings>,
}

/// A user palette; stops are spread evenly like the built-in custom palettes
#[derive(Debug, Deserialize)]
pub struct SchemeSettings {
    pub name: String,
    pub colors: Vec<String>,
    pub node: Option<String>,
    pub branch_node: Option<String>,
}

impl SchemeSettings {
    pub fn to_scheme(&self) -> ColorScheme {
        let colors: Vec<Rgb> = self.colors.iter().map(|c| hex_to_rgb(c)).collect();
        let mut scheme = ColorScheme::from_colors(&colors);
        if let Some(node) = &self.node {
            scheme.node = hex_to_rgb(node);
        }
        if let Some(branch_node) = &self.branch_node {
            scheme.branch_node = hex_to_rgb(branch_node);
        }
        scheme
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Missing or unreadable files yield defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), "ignoring invalid settings: {}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yggdrasil")
            .join("config.toml")
    }

    /// Built-in schemes plus the user's own, which win on name clashes
    pub fn scheme_book(&self) -> SchemeBook {
        let mut book = SchemeBook::builtin();
        for scheme in &self.schemes {
            book.insert(&scheme.name, scheme.to_scheme());
        }
        book
    }
}
