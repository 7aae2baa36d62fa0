//! Raster replay of a scene onto a drawing surface.

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::primitive::{Circle, CirclePaint, Falloff, Line, LineCap, Primitive, Scene};
use image::{Rgba, RgbaImage};
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, RadialGradient, Shader,
    SpreadMode, Stroke, StrokeDash, Transform,
};

/// Anything the primitive stream can be replayed against
pub trait Surface {
    fn clear(&mut self, color: Rgb);
    fn stroke_line(&mut self, line: &Line);
    fn draw_circle(&mut self, circle: &Circle);
}

/// Replay every primitive of `scene` in painter's order
pub fn replay<S: Surface + ?Sized>(scene: &Scene, surface: &mut S) {
    surface.clear(scene.background);
    for primitive in scene.primitives() {
        match primitive {
            Primitive::Line(line) => surface.stroke_line(line),
            Primitive::Circle(circle) => surface.draw_circle(circle),
        }
    }
}

/// Draw `scene` on a canvas `scale` times its size
pub fn rasterize(scene: &Scene, scale: u32) -> Result<RgbaImage> {
    let mut canvas = Canvas::for_scene(scene, scale.max(1) as f64)?;
    replay(scene, &mut canvas);
    Ok(canvas.into_image())
}

/// `tiny_skia` pixmap plus the transform from canvas space to device pixels
pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let (width, height) = (width.max(1), height.max(1));
        let pixmap = Pixmap::new(width, height).ok_or(Error::Canvas { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
        })
    }

    /// Surface sized `scene × scale` that also applies the scene's zoom
    pub fn for_scene(scene: &Scene, scale: f64) -> Result<Self> {
        let width = (scene.width as f64 * scale).floor() as u32;
        let height = (scene.height as f64 * scale).floor() as u32;
        let (tx, ty) = scene.zoom_offset();
        let zoom = (scale * scene.zoom) as f32;

        let mut canvas = Self::new(width, height)?;
        canvas.transform =
            Transform::from_scale(zoom, zoom).post_translate((tx * scale) as f32, (ty * scale) as f32);
        Ok(canvas)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha copy of the pixels
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width(), self.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    pub fn into_image(self) -> RgbaImage {
        self.to_image()
    }
}

fn solid_paint(color: Rgb, opacity: f64) -> Paint<'static> {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, alpha);
    paint.anti_alias = true;
    paint
}

fn falloff_shader(falloff: Falloff, circle: &Circle) -> Option<Shader<'static>> {
    let stops = falloff
        .stops()
        .iter()
        .map(|&(offset, alpha)| {
            let color = Color::from_rgba8(
                circle.color.r,
                circle.color.g,
                circle.color.b,
                (alpha * 255.0).round() as u8,
            );
            GradientStop::new(offset as f32, color)
        })
        .collect();
    let center = tiny_skia::Point::from_xy(circle.center.x as f32, circle.center.y as f32);

    RadialGradient::new(
        center,
        center,
        circle.radius as f32,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
}

impl Surface for Canvas {
    fn clear(&mut self, color: Rgb) {
        self.pixmap.fill(Color::from_rgba8(color.r, color.g, color.b, 255));
    }

    fn stroke_line(&mut self, line: &Line) {
        let mut pb = PathBuilder::new();
        pb.move_to(line.start.x as f32, line.start.y as f32);
        pb.line_to(line.end.x as f32, line.end.y as f32);
        // degenerate or non-finite geometry yields no path
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke = Stroke {
            width: line.width as f32,
            line_cap: match line.cap {
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Butt => tiny_skia::LineCap::Butt,
            },
            dash: line
                .dash
                .and_then(|d| StrokeDash::new(vec![d.on as f32, d.off as f32], 0.0)),
            ..Stroke::default()
        };
        let paint = solid_paint(line.color, line.opacity());
        self.pixmap.stroke_path(&path, &paint, &stroke, self.transform, None);
    }

    fn draw_circle(&mut self, circle: &Circle) {
        if circle.radius.is_nan() || circle.radius <= 0.0 {
            return;
        }
        let Some(path) = PathBuilder::from_circle(
            circle.center.x as f32,
            circle.center.y as f32,
            circle.radius as f32,
        ) else {
            return;
        };

        match circle.paint {
            CirclePaint::Fill => {
                let paint = solid_paint(circle.color, 1.0);
                self.pixmap
                    .fill_path(&path, &paint, FillRule::Winding, self.transform, None);
            }
            CirclePaint::Outline { width } => {
                let paint = solid_paint(circle.color, 1.0);
                let stroke = Stroke {
                    width: width as f32,
                    ..Stroke::default()
                };
                self.pixmap.stroke_path(&path, &paint, &stroke, self.transform, None);
            }
            CirclePaint::Falloff(falloff) => {
                let Some(shader) = falloff_shader(falloff, circle) else {
                    return;
                };
                let mut paint = Paint::default();
                paint.shader = shader;
                paint.anti_alias = true;
                self.pixmap
                    .fill_path(&path, &paint, FillRule::Winding, self.transform, None);
            }
        }
    }
}
