//! Procedural fractal trees.
//!
//! A [`TreeConfig`] goes through [`engine::render`] to become a [`Scene`]:
//! an ordered list of line and circle primitives that can be replayed onto
//! a raster surface ([`raster`]), serialized as SVG ([`svg`]) or written to
//! disk ([`export`]).

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod geometry;
pub mod presets;
pub mod primitive;
pub mod pruning;
pub mod raster;
pub mod scaling;
pub mod schemes;
pub mod settings;
pub mod svg;
pub mod terminal;

pub use color::{ColorScheme, Rgb};
pub use config::{Diagnostic, TreeConfig};
pub use engine::render;
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use primitive::{Layer, Primitive, Scene};
pub use schemes::SchemeBook;
