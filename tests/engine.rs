use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use yggdrasil::color::DEFAULT_BASE;
use yggdrasil::primitive::{CirclePaint, Falloff, Line, LineCap, PRUNED_OPACITY};
use yggdrasil::{render, Diagnostic, Layer, Primitive, Scene, SchemeBook, TreeConfig};

/// Bare two-level tree: no nodes, no bark, two children at the root
fn forked() -> TreeConfig {
    TreeConfig {
        branching_pattern: vec![2],
        survival_prob: vec![1.0],
        max_depth_render: 2,
        base_angle: 30.0,
        length_decay: 0.6,
        show_pruning: true,
        show_nodes: false,
        trunk_texture: false,
        ..TreeConfig::default()
    }
}

fn render_seeded(config: &TreeConfig, seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    render(config, &SchemeBook::builtin(), &mut rng)
}

fn lines<'a>(scene: &'a Scene, layer: Layer) -> Vec<&'a Line> {
    scene
        .layer(layer)
        .filter_map(|mark| match &mark.primitive {
            Primitive::Line(line) => Some(line),
            Primitive::Circle(_) => None,
        })
        .collect()
}

fn heading_of(line: &Line) -> f64 {
    let dx = line.end.x - line.start.x;
    let dy = line.start.y - line.end.y;
    dx.atan2(dy).to_degrees()
}

#[test]
fn fork_draws_trunk_then_four_surviving_segments() {
    let scene = render_seeded(&forked(), 1);

    assert_eq!(lines(&scene, Layer::Trunk).len(), 1);
    assert!(lines(&scene, Layer::Pruned).is_empty());

    let surviving = lines(&scene, Layer::Surviving);
    assert_eq!(surviving.len(), 4);
    assert_eq!(scene.stats.branches, 4);
    assert_eq!(scene.stats.pruned_branches, 0);

    // depth-first: left child, its continuation, right child, its continuation
    assert!((heading_of(surviving[0]) + 30.0).abs() < 1e-9);
    assert_eq!(surviving[1].start, surviving[0].end);
    assert!((heading_of(surviving[2]) - 30.0).abs() < 1e-9);
    assert_eq!(surviving[3].start, surviving[2].end);
}

#[test]
fn fork_starts_at_stem_top() {
    let config = forked();
    let scene = render_seeded(&config, 1);
    let trunk = lines(&scene, Layer::Trunk)[0];

    // adaptive scale at depth 2 shortens the stem
    let stem = config.stem_length * 0.68;
    assert!((trunk.start.y - config.start_y).abs() < 1e-9);
    assert!((trunk.end.y - (config.start_y - stem)).abs() < 1e-9);
    assert_eq!(lines(&scene, Layer::Surviving)[0].start, trunk.end);
}

#[test]
fn short_initial_branch_leaves_only_the_stem() {
    let config = TreeConfig {
        min_branch_length: 10_000.0,
        ..forked()
    };
    let scene = render_seeded(&config, 3);

    assert_eq!(scene.len(), 1);
    assert_eq!(scene.stats.branches, 0);
    assert_eq!(scene.marks[0].layer, Layer::Trunk);
}

#[test]
fn stem_top_node_is_highlighted() {
    let config = TreeConfig {
        min_branch_length: 10_000.0,
        show_nodes: true,
        ..forked()
    };
    let scene = render_seeded(&config, 3);

    let paints: Vec<CirclePaint> = scene
        .primitives()
        .filter_map(|p| match p {
            Primitive::Circle(circle) => Some(circle.paint),
            Primitive::Line(_) => None,
        })
        .collect();
    assert_eq!(
        paints,
        vec![
            CirclePaint::Fill,
            CirclePaint::Outline { width: 1.0 },
            CirclePaint::Falloff(Falloff::Glow),
        ]
    );
}

#[test]
fn same_seed_same_scene() {
    let config = TreeConfig {
        max_depth_render: 12,
        show_pruning: true,
        ..TreeConfig::default()
    };

    let a = render_seeded(&config, 42);
    let b = render_seeded(&config, 42);
    assert_eq!(a, b);

    let c = render_seeded(&config, 43);
    assert_ne!(a.marks, c.marks);
}

#[test]
fn every_branch_lands_in_exactly_one_pass() {
    let config = TreeConfig {
        max_depth_render: 10,
        show_pruning: true,
        ..TreeConfig::default()
    };
    let scene = render_seeded(&config, 7);

    let ids: Vec<u32> = scene
        .marks
        .iter()
        .filter(|m| matches!(m.primitive, Primitive::Line(_)))
        .filter_map(|m| m.branch)
        .collect();
    let unique: HashSet<u32> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
    assert_eq!(ids.len() as u32, scene.stats.branches);
    assert_eq!(
        lines(&scene, Layer::Pruned).len() as u32,
        scene.stats.pruned_branches
    );

    // trunk, then the pruned pass, then the surviving pass
    let layers: Vec<Layer> = scene.marks.iter().map(|m| m.layer).collect();
    assert!(layers.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn zero_survival_prunes_every_branch() {
    let config = TreeConfig {
        branching_pattern: vec![2, 2],
        survival_prob: vec![0.0, 0.0],
        max_depth_render: 3,
        ..forked()
    };
    let scene = render_seeded(&config, 11);

    assert!(lines(&scene, Layer::Surviving).is_empty());
    let pruned = lines(&scene, Layer::Pruned);
    // 2 + 4 forked segments, then one continuation each
    assert_eq!(pruned.len(), 10);
    for line in pruned {
        assert_eq!(line.opacity, Some(PRUNED_OPACITY));
        assert!(line.dash.is_some());
        assert_eq!(line.color.to_string(), config.prune_color);
    }
}

#[test]
fn pruning_hidden_keeps_everything_alive() {
    let config = TreeConfig {
        branching_pattern: vec![2, 2],
        survival_prob: vec![0.0, 0.0],
        max_depth_render: 3,
        show_pruning: false,
        ..forked()
    };
    let scene = render_seeded(&config, 11);

    assert!(lines(&scene, Layer::Pruned).is_empty());
    assert_eq!(lines(&scene, Layer::Surviving).len(), 10);
}

#[test]
fn deep_requests_terminate_on_length() {
    let config = TreeConfig {
        branching_pattern: vec![3, 3, 3],
        survival_prob: vec![1.0, 1.0, 1.0],
        max_depth_render: 1000,
        ..forked()
    };
    let scene = render_seeded(&config, 5);

    assert!(!scene.stats.truncated);
    assert!(scene.stats.branches > 27);
    assert!(scene.diagnostics.contains(&Diagnostic::DeepRender(1000)));
}

#[test]
fn unknown_scheme_is_diagnosed_and_uses_default_base() {
    let config = TreeConfig {
        color_scheme: "nope".to_string(),
        trunk_texture: true,
        ..forked()
    };
    let scene = render_seeded(&config, 2);

    assert!(scene
        .diagnostics
        .contains(&Diagnostic::UnknownScheme("nope".to_string())));
    assert_eq!(lines(&scene, Layer::Trunk)[0].color, DEFAULT_BASE);
    assert!(lines(&scene, Layer::Surviving)
        .iter()
        .all(|line| line.color == DEFAULT_BASE));
}

#[test]
fn mismatched_tables_still_render() {
    let config = TreeConfig {
        branching_pattern: vec![2, 2],
        survival_prob: vec![1.0],
        max_depth_render: 3,
        ..forked()
    };
    let scene = render_seeded(&config, 2);

    assert!(scene.diagnostics.contains(&Diagnostic::TableLengthMismatch {
        survival: 1,
        branching: 2,
    }));
    assert_eq!(scene.stats.branches, 10);
}

#[test]
fn budget_truncates_the_walk() {
    let config = TreeConfig {
        max_depth_render: 14,
        primitive_budget: 10,
        ..TreeConfig::default()
    };
    let scene = render_seeded(&config, 9);

    assert_eq!(scene.len(), 10);
    assert!(scene.stats.truncated);
    assert!(scene.diagnostics.contains(&Diagnostic::Truncated(10)));
}

#[test]
fn wide_nodes_past_throttle_depth_expand_every_few_children() {
    let mut pattern = vec![1; 15];
    pattern.push(6);
    let config = TreeConfig {
        survival_prob: vec![1.0; pattern.len()],
        branching_pattern: pattern,
        max_depth_render: 17,
        length_decay: 0.99,
        min_branch_length: 0.0,
        show_pruning: false,
        ..forked()
    };
    let scene = render_seeded(&config, 4);

    // 15 single segments, 6 fanned, then 3 expanded children
    assert_eq!(scene.stats.branches, 15 + 6 + 3);
}

#[test]
fn zero_draws_jitter_to_the_left() {
    let config = TreeConfig {
        branching_pattern: vec![1],
        survival_prob: vec![1.0],
        ..forked()
    };
    let mut rng = StepRng::new(0, 0);
    let scene = render(&config, &SchemeBook::builtin(), &mut rng);

    let surviving = lines(&scene, Layer::Surviving);
    assert_eq!(surviving.len(), 2);
    assert!((heading_of(surviving[0]) + 2.5).abs() < 1e-9);
    assert!((heading_of(surviving[1]) + 5.0).abs() < 1e-9);
}

/// Three children fanned so narrowly that their ends round to the same spot
fn coincident() -> TreeConfig {
    TreeConfig {
        branching_pattern: vec![3, 1],
        survival_prob: vec![1.0, 1.0],
        base_angle: 0.4,
        max_depth_render: 3,
        show_pruning: false,
        ..forked()
    }
}

#[test]
fn coincident_children_expand_once() {
    let scene = render_seeded(&coincident(), 0);

    assert_eq!(scene.stats.cache_hits, 2);
    assert_eq!(scene.stats.expanded, 3);
    // three children, then two continuations of the first only
    assert_eq!(lines(&scene, Layer::Surviving).len(), 5);
}

#[test]
fn coincident_children_collapse_regardless_of_pruning() {
    let config = TreeConfig {
        survival_prob: vec![0.5, 1.0],
        show_pruning: true,
        ..coincident()
    };

    let mut mixed = 0;
    for seed in 0..20 {
        let scene = render_seeded(&config, seed);
        assert_eq!(scene.stats.cache_hits, 2, "seed {seed}");
        assert_eq!(scene.stats.branches, 5, "seed {seed}");

        // ids follow the walk: first child, its two continuations, then the siblings
        let layer_of = |id: u32| {
            scene
                .marks
                .iter()
                .find(|m| m.branch == Some(id))
                .map(|m| m.layer)
                .expect("branch id")
        };
        assert_eq!(layer_of(1), layer_of(0), "seed {seed}");
        assert_eq!(layer_of(2), layer_of(0), "seed {seed}");

        let first_level = [layer_of(0), layer_of(3), layer_of(4)];
        if first_level.contains(&Layer::Pruned) && first_level.contains(&Layer::Surviving) {
            mixed += 1;
        }
    }
    assert!(mixed > 0, "no seed produced mixed siblings");
}

#[test]
fn bark_hatches_are_faint_round_strokes() {
    let config = TreeConfig {
        trunk_texture: true,
        ..forked()
    };
    let scene = render_seeded(&config, 8);
    let trunk = lines(&scene, Layer::Trunk);

    assert!(trunk.len() > 1);
    assert_eq!(trunk[0].opacity, None);
    for hatch in &trunk[1..] {
        assert_eq!(hatch.cap, LineCap::Round);
        assert_eq!(hatch.width, 1.0);
        assert_eq!(hatch.opacity, Some(0.4));
    }
}
