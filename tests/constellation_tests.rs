// Host-side tests for constellation layout, routing and hit-testing.

use glam::DVec2;
use intro_core::*;

fn node(id: &str, links: &[&str]) -> ConstellationNode {
    ConstellationNode {
        id: id.to_string(),
        title: id.to_uppercase(),
        links: links.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

fn at(id: &str, x: f64, y: f64) -> ConstellationNode {
    ConstellationNode {
        x: Some(x),
        y: Some(y),
        ..node(id, &[])
    }
}

fn pairs(edges: &[Edge]) -> Vec<(String, String)> {
    edges.iter().map(|e| (e.a.clone(), e.b.clone())).collect()
}

#[test]
fn hash_is_stable_and_in_unit_range() {
    assert_eq!(hash01("a"), 0.222);
    assert_eq!(hash01("ax"), 0.766);
    assert_eq!(hash01("atlas"), 0.8204);
    assert_eq!(hash01("é✓"), 0.0404);
    for i in 0..200 {
        let h = hash01(&format!("node-{i}"));
        assert!((0.0..1.0).contains(&h));
    }
}

#[test]
fn placement_keeps_explicit_coordinates_and_jitters_the_rest() {
    let placed = place_nodes(&[node("a", &[]), at("b", 0.1, 0.9)]);
    assert_eq!(placed[1].position, DVec2::new(0.1, 0.9));

    let single = place_nodes(&[node("a", &[])]);
    let p = single[0].position;
    let jx = (hash01("ax") - 0.5) * JITTER_SPAN;
    let jy = (hash01("ay") - 0.5) * JITTER_SPAN;
    assert!((p.x - (RING_CENTER[0] + jx)).abs() < 1e-9);
    assert!((p.y - (RING_CENTER[1] - RING_RADII[1] + jy)).abs() < 1e-9);

    let many: Vec<_> = (0..12).map(|i| node(&format!("n{i}"), &[])).collect();
    let first = place_nodes(&many);
    assert_eq!(first, place_nodes(&many));
    for n in &first {
        assert!((PLACE_X_RANGE[0]..=PLACE_X_RANGE[1]).contains(&n.position.x));
        assert!((PLACE_Y_RANGE[0]..=PLACE_Y_RANGE[1]).contains(&n.position.y));
    }
}

#[test]
fn declared_links_are_deduplicated_without_self_loops() {
    let placed = place_nodes(&[
        node("a", &["b", "a", "c", "b"]),
        node("b", &["a"]),
        node("c", &["missing"]),
    ]);
    let edges = build_edges(&placed);
    assert_eq!(
        pairs(&edges),
        vec![("a".into(), "b".into()), ("a".into(), "c".into())]
    );
}

#[test]
fn ring_fallback_links_neighbours_and_middle() {
    let placed = place_nodes(&[node("a", &[]), node("b", &[]), node("c", &[]), node("d", &[])]);
    let edges = build_edges(&placed);
    assert_eq!(edges.len(), 5);
    assert!(pairs(&edges).contains(&("a".into(), "c".into())));

    let two = place_nodes(&[node("a", &[]), node("b", &[])]);
    assert_eq!(build_edges(&two).len(), 1);
    let one = place_nodes(&[node("a", &[])]);
    assert!(build_edges(&one).is_empty());
    assert!(build_edges(&[]).is_empty());
}

#[test]
fn segments_are_split_around_the_centre_gap() {
    let c = DVec2::splat(500.0);
    let through = split_around_gap(DVec2::new(300.0, 500.0), DVec2::new(700.0, 500.0), c, 110.0);
    assert_eq!(through.len(), 2);
    assert!((through[0].b - DVec2::new(390.0, 500.0)).length() < 1e-9);
    assert!((through[1].a - DVec2::new(610.0, 500.0)).length() < 1e-9);

    let into = split_around_gap(DVec2::new(300.0, 500.0), c, c, 110.0);
    assert_eq!(into.len(), 1);
    assert!((into[0].b - DVec2::new(390.0, 500.0)).length() < 1e-9);

    let miss = split_around_gap(DVec2::new(0.0, 0.0), DVec2::new(1000.0, 0.0), c, 110.0);
    assert_eq!(miss.len(), 1);
    let tangent = split_around_gap(DVec2::new(0.0, 610.0), DVec2::new(1000.0, 610.0), c, 110.0);
    assert_eq!(tangent.len(), 1);
    let point = split_around_gap(c, c, c, 110.0);
    assert_eq!(point.len(), 1);
}

fn sample() -> Constellation {
    Constellation::new(&[
        ConstellationNode {
            links: vec!["beta".into()],
            ..at("alpha", 0.2, 0.2)
        },
        ConstellationNode {
            links: vec!["gamma".into()],
            ..at("beta", 0.8, 0.2)
        },
        at("gamma", 0.8, 0.8),
        at("delta", 0.2, 0.8),
    ])
}

#[test]
fn hover_activates_touching_edges() {
    let c = sample();
    let idle = Interaction::default();
    assert!(c.edges().iter().all(|e| !c.edge_active(e, &idle)));

    let hover = Interaction {
        hover: Some("alpha".into()),
        ..Default::default()
    };
    let active: Vec<_> = c.edges().iter().filter(|e| c.edge_active(e, &hover)).collect();
    // alpha-beta directly, beta-gamma through alpha's declared link to beta.
    assert_eq!(active.len(), 2);
    let style = c.edge_style(&c.edges()[0], &hover);
    assert!(style.active && style.glow && !style.dashed);
    assert_eq!(style.width, 1.6);
}

#[test]
fn focus_dims_unrelated_nodes() {
    let c = sample();
    let focus = Interaction {
        focus: Some("alpha".into()),
        ..Default::default()
    };
    let style = |id: &str| c.node_style(c.node(id).unwrap(), &focus);
    assert!(!style("alpha").dimmed);
    assert!(!style("beta").dimmed);
    assert!(style("gamma").dimmed);
    assert_eq!(style("delta").opacity, DIMMED_NODE_OPACITY);
    assert_eq!(Constellation::focus_overlay_opacity(&focus), 1.0);
    assert_eq!(Constellation::focus_overlay_opacity(&Interaction::default()), 0.0);

    for e in c.edges() {
        let s = c.edge_style(e, &focus);
        assert_eq!(s.opacity, if s.active { 0.38 } else { 0.12 });
    }
}

#[test]
fn selection_grows_and_raises_node() {
    let c = sample();
    let sel = Interaction {
        selected: Some("gamma".into()),
        ..Default::default()
    };
    let s = c.node_style(c.node("gamma").unwrap(), &sel);
    assert!(s.selected && s.active);
    assert!((s.radius - NODE_RADIUS_SM * NODE_ACTIVE_GROWTH).abs() < 1e-12);
    assert_eq!(s.z_index, 30);
    assert_eq!(c.node_style(c.node("alpha").unwrap(), &sel).z_index, 20);
}

#[test]
fn hit_test_finds_node_under_pointer() {
    let c = sample();
    let canvas = Rect::new(100.0, 50.0, 1000.0, 500.0);
    let idle = Interaction::default();
    let hit = c.hit_test(DVec2::new(300.0, 150.0), canvas, &idle);
    assert_eq!(hit.map(|n| n.id.as_str()), Some("alpha"));
    assert!(c.hit_test(DVec2::new(600.0, 300.0), canvas, &idle).is_none());

    let rect = c.node_rect(c.node("alpha").unwrap(), canvas, false);
    assert!((rect.center() - DVec2::new(300.0, 150.0)).length() < 1e-9);
    assert!((rect.width - NODE_RADIUS_SM * NODE_HIT_FACTOR).abs() < 1e-12);
}

#[test]
fn overlapping_hit_prefers_selected_node() {
    let c = Constellation::new(&[at("near", 0.5, 0.5), at("picked", 0.51, 0.5)]);
    let canvas = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let p = DVec2::new(500.0, 500.0);
    assert_eq!(
        c.hit_test(p, canvas, &Interaction::default()).map(|n| n.id.as_str()),
        Some("near")
    );
    let sel = Interaction {
        selected: Some("picked".into()),
        ..Default::default()
    };
    assert_eq!(c.hit_test(p, canvas, &sel).map(|n| n.id.as_str()), Some("picked"));
}

#[test]
fn routed_edges_use_canvas_units() {
    let c = sample();
    let routed = c.routed_edges(&Interaction::default());
    assert_eq!(routed.len(), c.edges().len());
    let first = &routed[0];
    assert_eq!(first.segments[0].a, DVec2::new(200.0, 200.0));
}

#[test]
fn unknown_ids_are_reported() {
    let c = sample();
    assert!(c.require("alpha").is_ok());
    assert_eq!(
        c.require("omega").unwrap_err(),
        CoreError::UnknownNode("omega".into())
    );
}

#[test]
fn selection_reports_percent_position() {
    let c = sample();
    let n = c.node("beta").unwrap();
    let s = Selection::from_node(n, None);
    assert_eq!(s.id, "beta");
    let pos = s.position.unwrap();
    assert!((pos - DVec2::new(80.0, 20.0)).length() < 1e-9);
}

#[test]
fn dust_is_deterministic_and_on_canvas() {
    let a = dust_field(DUST_COUNT);
    assert_eq!(a.len(), 80);
    assert_eq!(a, dust_field(DUST_COUNT));
    for d in &a {
        assert!(d.position.x >= 0.0 && d.position.x <= CANVAS_UNITS);
        assert!(d.radius > 0.0 && d.opacity > 0.0 && d.opacity < 1.0);
    }
}

#[test]
fn node_sizes_parse() {
    assert_eq!(NodeSize::parse("lg"), Some(NodeSize::Lg));
    assert_eq!(NodeSize::parse("huge"), None);
    assert_eq!(NodeSize::Md.radius_px(), NODE_RADIUS_MD);
}
