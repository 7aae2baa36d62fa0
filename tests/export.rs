use crossterm::style::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;
use yggdrasil::color::Rgb;
use yggdrasil::export::{self, ExportFormat};
use yggdrasil::geometry::Point;
use yggdrasil::primitive::{Circle, CirclePaint, Falloff, Line, Mark};
use yggdrasil::raster::{self, Surface};
use yggdrasil::svg;
use yggdrasil::terminal::Terminal;
use yggdrasil::{render, Error, Layer, Primitive, Scene, SchemeBook, TreeConfig};

const RED: Rgb = Rgb::new(255, 0, 0);
const BLUE: Rgb = Rgb::new(0, 0, 255);
const WHITE: Rgb = Rgb::new(255, 255, 255);

fn scene_with(width: u32, height: u32, zoom: f64, primitives: Vec<Primitive>) -> Scene {
    let mut scene = Scene::new(width, height, WHITE, zoom);
    scene.marks = primitives
        .into_iter()
        .map(|primitive| Mark {
            layer: Layer::Surviving,
            branch: None,
            primitive,
        })
        .collect();
    scene
}

fn dot(x: f64, y: f64, radius: f64, color: Rgb, paint: CirclePaint) -> Primitive {
    Primitive::Circle(Circle {
        center: Point::new(x, y),
        radius,
        color,
        paint,
    })
}

fn pruned_tree() -> Scene {
    let config = TreeConfig {
        max_depth_render: 9,
        show_pruning: true,
        ..TreeConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(21);
    render(&config, &SchemeBook::builtin(), &mut rng)
}

#[test]
fn format_names_parse_and_display() {
    assert_eq!("png".parse::<ExportFormat>().unwrap(), ExportFormat::Png { scale: 1 });
    assert_eq!("PNG-4x".parse::<ExportFormat>().unwrap(), ExportFormat::Png { scale: 4 });
    assert_eq!("svg".parse::<ExportFormat>().unwrap(), ExportFormat::Svg);
    assert!(matches!("png-3x".parse::<ExportFormat>(), Err(Error::UnknownFormat(_))));

    for format in ExportFormat::ALL {
        assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
    }
    assert_eq!(ExportFormat::default().to_string(), "png-1x");
    assert_eq!(
        ExportFormat::Png { scale: 2 }.default_file_name(),
        "yggdrasil-tree-png-2x.png"
    );
    assert_eq!(ExportFormat::Svg.default_file_name(), "yggdrasil-tree.svg");
}

#[test]
fn png_scale_multiplies_canvas_size() {
    let scene = scene_with(40, 30, 1.0, Vec::new());
    for scale in [1, 2, 4] {
        let image = raster::rasterize(&scene, scale).unwrap();
        assert_eq!(image.dimensions(), (40 * scale, 30 * scale));
    }
}

#[test]
fn png_is_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.png");
    let scene = scene_with(40, 30, 1.0, vec![dot(20.0, 15.0, 6.0, RED, CirclePaint::Fill)]);

    export::write(&scene, ExportFormat::Png { scale: 2 }, &path).unwrap();

    let image = image::open(&path).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (80, 60));
    assert_eq!(image.get_pixel(40, 30).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(1, 1).0, [255, 255, 255, 255]);
}

#[test]
fn background_fills_the_canvas() {
    let mut scene = scene_with(10, 10, 1.0, Vec::new());
    scene.background = BLUE;
    let image = raster::rasterize(&scene, 1).unwrap();
    assert!(image.pixels().all(|p| p.0 == [0, 0, 255, 255]));
}

#[test]
fn later_primitives_paint_over_earlier_ones() {
    let scene = scene_with(
        20,
        20,
        1.0,
        vec![
            dot(10.0, 10.0, 6.0, RED, CirclePaint::Fill),
            dot(10.0, 10.0, 3.0, BLUE, CirclePaint::Fill),
        ],
    );
    let image = raster::rasterize(&scene, 1).unwrap();
    assert_eq!(image.get_pixel(10, 10).0, [0, 0, 255, 255]);
    assert_eq!(image.get_pixel(14, 10).0, [255, 0, 0, 255]);
}

#[test]
fn zoom_scales_about_the_canvas_center() {
    let primitives = vec![dot(50.0, 40.0, 5.0, RED, CirclePaint::Fill)];

    let view = scene_with(100, 80, 2.0, Vec::new());
    assert_eq!(view.view(Point::new(50.0, 40.0)), Point::new(50.0, 40.0));
    assert_eq!(view.view(Point::new(60.0, 40.0)), Point::new(70.0, 40.0));

    let flat = raster::rasterize(&scene_with(100, 80, 1.0, primitives.clone()), 1).unwrap();
    let zoomed = raster::rasterize(&scene_with(100, 80, 2.0, primitives), 1).unwrap();

    assert_eq!(flat.get_pixel(58, 40).0, [255, 255, 255, 255]);
    assert_eq!(zoomed.get_pixel(58, 40).0, [255, 0, 0, 255]);
}

#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl Surface for Recorder {
    fn clear(&mut self, color: Rgb) {
        self.calls.push(format!("clear {color}"));
    }

    fn stroke_line(&mut self, line: &Line) {
        self.calls.push(format!("line {}", line.color));
    }

    fn draw_circle(&mut self, circle: &Circle) {
        self.calls.push(format!("circle {}", circle.color));
    }
}

#[test]
fn replay_clears_then_follows_scene_order() {
    let scene = scene_with(
        10,
        10,
        1.0,
        vec![
            Primitive::Line(Line::solid(Point::new(0.0, 0.0), Point::new(5.0, 5.0), 1.0, BLUE)),
            dot(2.0, 2.0, 1.0, RED, CirclePaint::Fill),
        ],
    );
    let mut recorder = Recorder::default();
    raster::replay(&scene, &mut recorder);

    assert_eq!(
        recorder.calls,
        vec!["clear #ffffff", "line #0000ff", "circle #ff0000"]
    );
}

#[test]
fn svg_has_one_fragment_per_primitive() {
    let scene = pruned_tree();
    let fragments = svg::fragments(&scene);
    assert_eq!(fragments.len(), scene.len());

    for (fragment, primitive) in fragments.iter().zip(scene.primitives()) {
        match primitive {
            Primitive::Line(line) => {
                assert!(fragment.starts_with("<line"));
                assert!(fragment.contains(&format!(r#"stroke="{}""#, line.color)));
                assert!(fragment.contains(&format!(r#"stroke-width="{}""#, line.width)));
                if let Some(dash) = line.dash {
                    assert!(fragment.contains(&format!(
                        r#"stroke-dasharray="{},{}""#,
                        dash.on, dash.off
                    )));
                }
                if let Some(opacity) = line.opacity {
                    assert!(fragment.contains(&format!(r#"opacity="{}""#, opacity)));
                }
            }
            Primitive::Circle(circle) => {
                assert!(fragment.starts_with("<circle"));
                assert!(fragment.contains(&format!(r#"r="{}""#, circle.radius)));
            }
        }
    }
}

#[test]
fn svg_document_is_written_in_scene_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.svg");
    let scene = pruned_tree();

    export::write(&scene, ExportFormat::Svg, &path).unwrap();
    let doc = std::fs::read_to_string(&path).unwrap();

    assert!(doc.starts_with(r#"<svg width="1000" height="800" viewBox="0 0 1000 800""#));
    assert!(doc.contains(r##"fill="#f8f8f8""##));
    assert!(doc.trim_end().ends_with("</svg>"));

    let mut cursor = 0;
    for fragment in svg::fragments(&scene) {
        let at = doc[cursor..].find(&fragment).expect("fragment in document");
        cursor += at + fragment.len();
    }
}

#[test]
fn svg_falloffs_reference_shared_gradients() {
    let scene = scene_with(
        20,
        20,
        1.0,
        vec![
            dot(5.0, 5.0, 4.0, Rgb::new(0x99, 0xa3, 0x9c), CirclePaint::Falloff(Falloff::Halo)),
            dot(9.0, 5.0, 4.0, Rgb::new(0x99, 0xa3, 0x9c), CirclePaint::Falloff(Falloff::Halo)),
            dot(9.0, 9.0, 2.0, WHITE, CirclePaint::Outline { width: 1.0 }),
        ],
    );
    let doc = svg::document(&scene);

    assert_eq!(doc.matches(r#"<radialGradient id="halo-99a39c">"#).count(), 1);
    assert_eq!(doc.matches(r#"fill="url(#halo-99a39c)""#).count(), 2);
    assert!(doc.contains(r##"fill="none" stroke="#ffffff" stroke-width="1""##));
}

#[test]
fn svg_zoom_wraps_primitives_in_a_group() {
    let scene = scene_with(100, 80, 2.0, vec![dot(50.0, 40.0, 5.0, RED, CirclePaint::Fill)]);
    let doc = svg::document(&scene);
    assert!(doc.contains(r#"<g transform="translate(-50 -40) scale(2)">"#));
    assert!(doc.contains("</g>"));

    let flat = svg::document(&scene_with(100, 80, 1.0, Vec::new()));
    assert!(!flat.contains("<g"));
    assert!(!flat.contains("<defs>"));
}

#[test]
fn terminal_fits_scene_into_half_blocks() {
    let mut scene = scene_with(40, 40, 1.0, Vec::new());
    scene.background = BLUE;

    let mut term = Terminal::with_size(20, 10);
    term.draw_scene(&scene).unwrap();

    let cell = term.cell(0, 0).expect("cell");
    assert_eq!(cell.ch, '▀');
    assert!(cell.fg == Some(Color::Rgb { r: 0, g: 0, b: 255 }));
    assert!(cell.bg == Some(Color::Rgb { r: 0, g: 0, b: 255 }));
    assert!(term.cell(19, 9).is_some());
    assert!(term.cell(20, 0).is_none());

    let mut out = Vec::new();
    term.write_to(&mut out).unwrap();
    assert_eq!(String::from_utf8_lossy(&out).matches('\n').count(), 10);
}
