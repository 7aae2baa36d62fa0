use crate::error::{Error, Result};
use crate::primitive::Scene;
use crate::{raster, svg};
use image::ImageFormat;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG at 1, 2 or 4 times the canvas size
    Png { scale: u32 },
    Svg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Png { scale: 1 },
        ExportFormat::Png { scale: 2 },
        ExportFormat::Png { scale: 4 },
        ExportFormat::Svg,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png { .. } => "png",
            ExportFormat::Svg => "svg",
        }
    }

    /// File name used when the caller gives none
    pub fn default_file_name(self) -> String {
        match self {
            ExportFormat::Svg => "yggdrasil-tree.svg".to_string(),
            png => format!("yggdrasil-tree-{}.png", png),
        }
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::Png { scale: 1 }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Png { scale } => write!(f, "png-{}x", scale),
            ExportFormat::Svg => write!(f, "svg"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "png" | "png-1x" => Ok(ExportFormat::Png { scale: 1 }),
            "png-2x" => Ok(ExportFormat::Png { scale: 2 }),
            "png-4x" => Ok(ExportFormat::Png { scale: 4 }),
            "svg" => Ok(ExportFormat::Svg),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Write `scene` to `path` in `format`
pub fn write(scene: &Scene, format: ExportFormat, path: &Path) -> Result<()> {
    match format {
        ExportFormat::Png { scale } => {
            let image = raster::rasterize(scene, scale)?;
            image.save_with_format(path, ImageFormat::Png)?;
            info!(
                path = %path.display(),
                width = image.width(),
                height = image.height(),
                "wrote png"
            );
        }
        ExportFormat::Svg => {
            fs::write(path, svg::document(scene))?;
            info!(path = %path.display(), primitives = scene.len(), "wrote svg");
        }
    }
    Ok(())
}
