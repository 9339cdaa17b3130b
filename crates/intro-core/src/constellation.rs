//! Constellation layout, edge routing and emphasis.
//!
//! Node positions are normalized to `[0, 1]²`; edges and dust are drawn on a
//! 1000x1000 canvas. Layout is recomputed only when the node set changes, while
//! emphasis is derived again on every hover, selection or focus change.

use crate::constants::*;
use crate::error::CoreError;
use crate::math::{clamp01, lerp, Rect};
use fnv::{FnvHashMap, FnvHashSet};
use glam::DVec2;
use smallvec::{smallvec, SmallVec};
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeSize {
    #[default]
    Sm,
    Md,
    Lg,
}

impl NodeSize {
    pub fn radius_px(self) -> f64 {
        match self {
            NodeSize::Sm => NODE_RADIUS_SM,
            NodeSize::Md => NODE_RADIUS_MD,
            NodeSize::Lg => NODE_RADIUS_LG,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sm" => Some(NodeSize::Sm),
            "md" => Some(NodeSize::Md),
            "lg" => Some(NodeSize::Lg),
            _ => None,
        }
    }
}

/// Input node. Missing coordinates are auto-placed on the ring.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstellationNode {
    pub id: String,
    pub title: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub size: NodeSize,
    pub links: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub title: String,
    pub position: DVec2,
    pub size: NodeSize,
    pub links: Vec<String>,
}

/// Undirected edge; `a` and `b` are node ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: String,
    pub b: String,
}

/// Straight segment on the 1000-unit canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
}

/// 32-bit FNV-style hash folded into `[0, 1)`.
///
/// Reproduces JavaScript number semantics: the multiply happens in `f64`, the
/// running value is truncated to a signed 32-bit integer before each xor, and
/// to an unsigned one at the end. Placement is therefore stable per id.
pub fn hash01(s: &str) -> f64 {
    let mut h: f64 = 2_166_136_261.0;
    for unit in s.encode_utf16() {
        let xored = to_int32(h) ^ i32::from(unit);
        h = f64::from(xored) * 16_777_619.0;
    }
    f64::from(to_uint32(h) % 10_000) / 10_000.0
}

fn to_int32(v: f64) -> i32 {
    to_uint32(v) as i32
}

fn to_uint32(v: f64) -> u32 {
    if !v.is_finite() {
        return 0;
    }
    // |v| < 2^63 for every value this hash produces, so the i64 cast is exact.
    (v.trunc() as i64) as u32
}

/// Places nodes: explicit coordinates win, the rest go on an ellipse with per-id jitter.
pub fn place_nodes(nodes: &[ConstellationNode]) -> Vec<PlacedNode> {
    let n = nodes.len().max(1) as f64;
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let angle = PI * 2.0 * i as f64 / n - PI / 2.0;
            let base_x = RING_CENTER[0] + RING_RADII[0] * angle.cos();
            let base_y = RING_CENTER[1] + RING_RADII[1] * angle.sin();
            let jx = (hash01(&format!("{}x", node.id)) - 0.5) * JITTER_SPAN;
            let jy = (hash01(&format!("{}y", node.id)) - 0.5) * JITTER_SPAN;
            let x = node
                .x
                .unwrap_or_else(|| (base_x + jx).clamp(PLACE_X_RANGE[0], PLACE_X_RANGE[1]));
            let y = node
                .y
                .unwrap_or_else(|| (base_y + jy).clamp(PLACE_Y_RANGE[0], PLACE_Y_RANGE[1]));
            PlacedNode {
                id: node.id.clone(),
                title: node.title.clone(),
                position: DVec2::new(x, y),
                size: node.size,
                links: node.links.clone(),
            }
        })
        .collect()
}

/// Edge list without self-loops or repeated undirected pairs.
///
/// Declared links are used when any node has one (dangling targets are dropped);
/// otherwise each node links to its successor and the first node to the middle one.
pub fn build_edges(nodes: &[PlacedNode]) -> Vec<Edge> {
    let ids: FnvHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut candidates: Vec<(&str, &str)> = Vec::new();
    if nodes.iter().any(|n| !n.links.is_empty()) {
        for n in nodes {
            for b in &n.links {
                if ids.contains(b.as_str()) {
                    candidates.push((n.id.as_str(), b.as_str()));
                }
            }
        }
    } else {
        for (i, a) in nodes.iter().enumerate() {
            let b = &nodes[(i + 1) % nodes.len()];
            candidates.push((a.id.as_str(), b.id.as_str()));
        }
        if nodes.len() > 2 {
            candidates.push((nodes[0].id.as_str(), nodes[nodes.len() / 2].id.as_str()));
        }
    }

    let mut seen: FnvHashSet<(&str, &str)> = FnvHashSet::default();
    let mut out = Vec::new();
    for (a, b) in candidates {
        if a == b {
            continue;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if seen.insert(key) {
            out.push(Edge {
                a: a.to_string(),
                b: b.to_string(),
            });
        }
    }
    out
}

/// Splits `a`→`b` so neither piece enters the circle at `center` with radius `r`.
///
/// Tangent, missing, degenerate or negligible intersections return the segment unchanged.
pub fn split_around_gap(a: DVec2, b: DVec2, center: DVec2, r: f64) -> SmallVec<[Segment; 2]> {
    let whole = smallvec![Segment { a, b }];
    let d = b - a;
    let f = a - center;
    let qa = d.dot(d);
    let qb = 2.0 * f.dot(d);
    let qc = f.dot(f) - r * r;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc <= 0.0 || qa == 0.0 || !disc.is_finite() {
        return whole;
    }
    let s = disc.sqrt();
    let t1 = (-qb - s) / (2.0 * qa);
    let t2 = (-qb + s) / (2.0 * qa);
    let (lo, hi) = (t1.min(t2), t1.max(t2));
    if hi <= 0.0 || lo >= 1.0 {
        return whole;
    }
    let t_start = clamp01(lo);
    let t_end = clamp01(hi);
    if t_end - t_start < SPLIT_MIN_SPAN {
        return whole;
    }
    let mut out = SmallVec::new();
    if t_start > 0.0 {
        out.push(Segment {
            a,
            b: a + d * t_start,
        });
    }
    if t_end < 1.0 {
        out.push(Segment {
            a: a + d * t_end,
            b,
        });
    }
    out
}

/// Hover, selection and focus inputs for emphasis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
    pub hover: Option<String>,
    pub selected: Option<String>,
    pub focus: Option<String>,
}

impl Interaction {
    pub fn active_id(&self) -> Option<&str> {
        self.hover.as_deref().or(self.selected.as_deref())
    }

    pub fn has_focus(&self) -> bool {
        self.focus.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub active: bool,
    pub opacity: f64,
    pub width: f64,
    pub dashed: bool,
    pub glow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub active: bool,
    pub selected: bool,
    pub dimmed: bool,
    pub opacity: f64,
    pub radius: f64,
    pub label_offset: f64,
    pub z_index: i32,
}

/// One routed edge with its emphasis.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedEdge {
    pub edge: Edge,
    pub segments: SmallVec<[Segment; 2]>,
    pub style: EdgeStyle,
}

/// Background dust particle on the 1000-unit canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dust {
    pub position: DVec2,
    pub radius: f64,
    pub opacity: f64,
}

pub fn dust_field(count: usize) -> Vec<Dust> {
    (0..count)
        .map(|i| Dust {
            position: DVec2::new(
                (hash01(&format!("dust-x-{i}")) * 0.9 + 0.05) * CANVAS_UNITS,
                (hash01(&format!("dust-y-{i}")) * 0.9 + 0.05) * CANVAS_UNITS,
            ),
            radius: lerp(0.6, 1.8, hash01(&format!("dust-r-{i}"))),
            opacity: lerp(0.08, 0.28, hash01(&format!("dust-o-{i}"))),
        })
        .collect()
}

/// Laid-out constellation: placed nodes, deduplicated edges and an id index.
#[derive(Clone, Debug)]
pub struct Constellation {
    nodes: Vec<PlacedNode>,
    edges: Vec<Edge>,
    index: FnvHashMap<String, usize>,
}

impl Constellation {
    pub fn new(nodes: &[ConstellationNode]) -> Self {
        let nodes = place_nodes(nodes);
        let edges = build_edges(&nodes);
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        log::debug!(
            "[constellation] laid out {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );
        Self {
            nodes,
            edges,
            index,
        }
    }

    pub fn nodes(&self) -> &[PlacedNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn require(&self, id: &str) -> Result<&PlacedNode, CoreError> {
        self.node(id)
            .ok_or_else(|| CoreError::UnknownNode(id.to_string()))
    }

    /// True when the edge `a`–`b` touches `id` or one of `id`'s declared links.
    fn touches(&self, id: &str, a: &str, b: &str) -> bool {
        if id == a || id == b {
            return true;
        }
        self.node(id)
            .map(|n| n.links.iter().any(|l| l == a || l == b))
            .unwrap_or(false)
    }

    pub fn edge_active(&self, edge: &Edge, interaction: &Interaction) -> bool {
        let reference = match &interaction.focus {
            Some(focus) => Some(focus.as_str()),
            None => interaction.active_id(),
        };
        reference
            .map(|id| self.touches(id, &edge.a, &edge.b))
            .unwrap_or(false)
    }

    pub fn edge_style(&self, edge: &Edge, interaction: &Interaction) -> EdgeStyle {
        let active = self.edge_active(edge, interaction);
        let center = DVec2::splat(0.5);
        let dist = |id: &str| {
            self.node(id)
                .map(|n| n.position.distance(center))
                .unwrap_or(0.0)
        };
        let fade = clamp01(dist(&edge.a).min(dist(&edge.b)) / EDGE_FADE_DISTANCE);
        let opacity = if interaction.has_focus() {
            if active {
                0.38
            } else {
                0.12
            }
        } else if active {
            lerp(0.16, 0.52, fade)
        } else {
            lerp(0.08, 0.36, fade)
        };
        EdgeStyle {
            active,
            opacity,
            width: if active { 1.6 } else { 1.0 },
            dashed: !active,
            glow: active,
        }
    }

    pub fn node_style(&self, node: &PlacedNode, interaction: &Interaction) -> NodeStyle {
        let selected = interaction.selected.as_deref() == Some(node.id.as_str());
        let hovered = interaction.hover.as_deref() == Some(node.id.as_str());
        let active = selected || hovered;
        let focus_active = match &interaction.focus {
            Some(focus) => {
                focus == &node.id
                    || self
                        .node(focus)
                        .map(|f| f.links.iter().any(|l| l == &node.id))
                        .unwrap_or(false)
            }
            None => false,
        };
        let dimmed = interaction.has_focus() && !focus_active;
        let base = node.size.radius_px();
        let radius = if active { base * NODE_ACTIVE_GROWTH } else { base };
        NodeStyle {
            active,
            selected,
            dimmed,
            opacity: if dimmed { DIMMED_NODE_OPACITY } else { 1.0 },
            radius,
            label_offset: radius + 12.0,
            z_index: if selected { 30 } else { 20 },
        }
    }

    /// Background overlay opacity target; the view animates toward it.
    pub fn focus_overlay_opacity(interaction: &Interaction) -> f64 {
        if interaction.has_focus() {
            1.0
        } else {
            0.0
        }
    }

    /// Edges split around the centre gap, with emphasis.
    pub fn routed_edges(&self, interaction: &Interaction) -> Vec<RoutedEdge> {
        let center = DVec2::splat(CANVAS_UNITS / 2.0);
        self.edges
            .iter()
            .filter_map(|edge| {
                let a = self.node(&edge.a)?.position * CANVAS_UNITS;
                let b = self.node(&edge.b)?.position * CANVAS_UNITS;
                Some(RoutedEdge {
                    edge: edge.clone(),
                    segments: split_around_gap(a, b, center, CENTER_GAP_RADIUS),
                    style: self.edge_style(edge, interaction),
                })
            })
            .collect()
    }

    /// Screen rect of a node's hit box inside `canvas`.
    pub fn node_rect(&self, node: &PlacedNode, canvas: Rect, active: bool) -> Rect {
        let base = node.size.radius_px();
        let r = if active { base * NODE_ACTIVE_GROWTH } else { base };
        let edge = r * NODE_HIT_FACTOR;
        let c = DVec2::new(
            canvas.left + node.position.x * canvas.width,
            canvas.top + node.position.y * canvas.height,
        );
        Rect::new(c.x - edge / 2.0, c.y - edge / 2.0, edge, edge)
    }

    /// Topmost node whose hit box contains `screen` (the selected node sits above the rest).
    pub fn hit_test(&self, screen: DVec2, canvas: Rect, interaction: &Interaction) -> Option<&PlacedNode> {
        let mut best: Option<(&PlacedNode, i32, f64)> = None;
        for node in &self.nodes {
            let style = self.node_style(node, interaction);
            let rect = self.node_rect(node, canvas, style.active);
            if !rect.contains(screen) {
                continue;
            }
            let d = rect.center().distance(screen);
            match best {
                Some((_, z, bd)) if z > style.z_index || (z == style.z_index && bd <= d) => {}
                _ => best = Some((node, style.z_index, d)),
            }
        }
        best.map(|(n, _, _)| n)
    }
}

/// What a node activation reports to the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub id: String,
    /// Node position in percent of the canvas.
    pub position: Option<DVec2>,
    pub rect: Option<Rect>,
}

impl Selection {
    pub fn from_node(node: &PlacedNode, rect: Option<Rect>) -> Self {
        Self {
            id: node.id.clone(),
            position: Some(node.position * 100.0),
            rect,
        }
    }
}
