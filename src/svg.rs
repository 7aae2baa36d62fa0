//! Vector rendition of a scene: one SVG element per primitive, same order,
//! same colors, widths, dashes and opacities as the raster replay.

use crate::color::Rgb;
use crate::primitive::{Circle, CirclePaint, Falloff, Line, LineCap, Primitive, Scene};
use std::collections::BTreeMap;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Id of the radial gradient implementing `falloff` in `color`
pub fn gradient_id(falloff: Falloff, color: Rgb) -> String {
    let kind = match falloff {
        Falloff::Halo => "halo",
        Falloff::Glow => "glow",
    };
    let hex = color.to_string();
    format!("{}-{}", kind, hex.trim_start_matches('#'))
}

pub fn line_element(line: &Line) -> String {
    let cap = match line.cap {
        LineCap::Round => "round",
        LineCap::Butt => "butt",
    };
    let mut el = format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-linecap="{}""#,
        line.start.x, line.start.y, line.end.x, line.end.y, line.color, line.width, cap
    );
    if let Some(dash) = line.dash {
        el.push_str(&format!(r#" stroke-dasharray="{},{}""#, dash.on, dash.off));
    }
    if let Some(opacity) = line.opacity {
        el.push_str(&format!(r#" opacity="{}""#, opacity));
    }
    el.push_str("/>");
    el
}

pub fn circle_element(circle: &Circle) -> String {
    let Circle { center, radius, color, paint } = circle;
    match paint {
        CirclePaint::Fill => format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            center.x, center.y, radius, color
        ),
        CirclePaint::Outline { width } => format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            center.x, center.y, radius, color, width
        ),
        CirclePaint::Falloff(falloff) => format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="url(#{})"/>"#,
            center.x,
            center.y,
            radius,
            gradient_id(*falloff, *color)
        ),
    }
}

/// One markup fragment per primitive, in emission order
pub fn fragments(scene: &Scene) -> Vec<String> {
    scene
        .primitives()
        .map(|primitive| match primitive {
            Primitive::Line(line) => line_element(line),
            Primitive::Circle(circle) => circle_element(circle),
        })
        .collect()
}

fn gradient_defs(scene: &Scene) -> Vec<String> {
    let used: BTreeMap<String, (Falloff, Rgb)> = scene
        .primitives()
        .filter_map(|primitive| match primitive {
            Primitive::Circle(Circle {
                paint: CirclePaint::Falloff(falloff),
                color,
                ..
            }) => Some((gradient_id(*falloff, *color), (*falloff, *color))),
            _ => None,
        })
        .collect();

    used.into_iter()
        .map(|(id, (falloff, color))| {
            let stops: String = falloff
                .stops()
                .iter()
                .map(|(offset, alpha)| {
                    format!(
                        r#"<stop offset="{}" stop-color="{}" stop-opacity="{:.4}"/>"#,
                        offset, color, alpha
                    )
                })
                .collect();
            format!(r#"<radialGradient id="{}">{}</radialGradient>"#, id, stops)
        })
        .collect()
}

/// Self-contained SVG document for `scene`
pub fn document(scene: &Scene) -> String {
    let mut out = format!(
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="{ns}">"#,
        w = scene.width,
        h = scene.height,
        ns = SVG_NS
    );
    out.push('\n');
    out.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        scene.width, scene.height, scene.background
    ));
    out.push('\n');

    let defs = gradient_defs(scene);
    if !defs.is_empty() {
        out.push_str("<defs>\n");
        for def in defs {
            out.push_str(&def);
            out.push('\n');
        }
        out.push_str("</defs>\n");
    }

    let zoomed = scene.zoom != 1.0;
    if zoomed {
        let (tx, ty) = scene.zoom_offset();
        out.push_str(&format!(
            r#"<g transform="translate({} {}) scale({})">"#,
            tx, ty, scene.zoom
        ));
        out.push('\n');
    }

    for fragment in fragments(scene) {
        out.push_str(&fragment);
        out.push('\n');
    }

    if zoomed {
        out.push_str("</g>\n");
    }
    out.push_str("</svg>\n");
    out
}
