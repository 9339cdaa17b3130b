//! Star-to-rectangle shape morph.
//!
//! Both outlines are resampled to the same number of points at equal arc-length
//! spacing, then interpolated point by point. Completion is reported through two
//! one-shot callbacks: `on_morph_done` when the polygon reaches its target, and
//! `on_fade_done` once the overlay has faded out afterwards.

use crate::constants::*;
use crate::lifecycle::Lifecycle;
use crate::math::{clamp01, ease_in_expo, ease_out_expo, Rect, Viewport};
use glam::DVec2;
use std::fmt::Write as _;

/// Eight-point star in normalized `[0, 1]²` space, clockwise from the top tip.
pub const STAR_NORM: [DVec2; 8] = [
    DVec2::new(0.5, 0.0),
    DVec2::new(0.62, 0.38),
    DVec2::new(1.0, 0.5),
    DVec2::new(0.62, 0.62),
    DVec2::new(0.5, 1.0),
    DVec2::new(0.38, 0.62),
    DVec2::new(0.0, 0.5),
    DVec2::new(0.38, 0.38),
];

pub fn star_vertices_in_rect(r: Rect) -> Vec<DVec2> {
    STAR_NORM
        .iter()
        .map(|p| DVec2::new(r.left + p.x * r.width, r.top + p.y * r.height))
        .collect()
}

pub fn rect_vertices(r: Rect) -> Vec<DVec2> {
    r.corners().to_vec()
}

/// Viewport rectangle inset by the paper border, never thinner than 1px.
pub fn inset_target(viewport: Viewport, inset_px: f64) -> Rect {
    Rect::new(
        inset_px,
        inset_px,
        (viewport.width - inset_px * 2.0).max(1.0),
        (viewport.height - inset_px * 2.0).max(1.0),
    )
}

/// `n` points spaced evenly by arc length around the closed loop through `vertices`.
///
/// Fewer than two vertices yields `n` points at the origin; a zero-length loop
/// yields `n` copies of its first vertex.
pub fn sample_closed_polyline(vertices: &[DVec2], n: usize) -> Vec<DVec2> {
    if vertices.len() < 2 {
        return vec![DVec2::ZERO; n];
    }
    let mut pts = vertices.to_vec();
    if pts[0] != pts[pts.len() - 1] {
        pts.push(pts[0]);
    }
    let seg_len: Vec<f64> = pts.windows(2).map(|w| w[0].distance(w[1])).collect();
    let total: f64 = seg_len.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return vec![pts[0]; n];
    }

    let mut out = Vec::with_capacity(n);
    let mut seg = 0usize;
    let mut seg_pos = 0.0;
    for k in 0..n {
        let target = total * k as f64 / n as f64;
        while seg < seg_len.len() && seg_pos + seg_len[seg] < target {
            seg_pos += seg_len[seg];
            seg += 1;
        }
        let i = seg.min(pts.len() - 2);
        let d = match seg_len[i.min(seg_len.len() - 1)] {
            len if len > 0.0 => len,
            _ => 1.0,
        };
        let local = clamp01((target - seg_pos) / d);
        out.push(pts[i].lerp(pts[i + 1], local));
    }
    out
}

/// SVG path data for a closed polygon, two decimals per coordinate.
pub fn points_to_path(points: &[DVec2]) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut d = String::with_capacity(points.len() * 18);
    let _ = write!(d, "M {:.2} {:.2}", first.x, first.y);
    for p in &points[1..] {
        let _ = write!(d, " L {:.2} {:.2}", p.x, p.y);
    }
    d.push_str(" Z");
    d
}

#[derive(Clone, Debug, PartialEq)]
pub struct MorphConfig {
    pub inset_px: f64,
    pub duration_ms: f64,
    pub fade_ms: f64,
    pub samples: usize,
    /// Linear timing and shortened phases.
    pub reduced_motion: bool,
    /// Rectangle back to star instead of star to rectangle.
    pub reverse: bool,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            inset_px: MORPH_INSET_PX,
            duration_ms: MORPH_DURATION_MS,
            fade_ms: MORPH_FADE_MS,
            samples: MORPH_SAMPLES,
            reduced_motion: false,
            reverse: false,
        }
    }
}

impl MorphConfig {
    pub fn morph_ms(&self) -> f64 {
        if self.reduced_motion {
            MORPH_REDUCED_MS
        } else {
            self.duration_ms
        }
    }

    pub fn fade_ms(&self) -> f64 {
        if self.reduced_motion {
            MORPH_REDUCED_MS
        } else {
            self.fade_ms
        }
    }

    fn ease(&self, t: f64) -> f64 {
        if self.reduced_motion {
            t
        } else {
            ease_in_expo(t)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MorphPhase {
    Pending,
    Morphing { start_ms: f64 },
    Fading { start_ms: f64 },
    Done,
}

/// One-shot lifecycle notifications, fired at most once each and in order.
#[derive(Default)]
pub struct MorphCallbacks {
    pub on_morph_done: Option<Box<dyn FnOnce()>>,
    pub on_fade_done: Option<Box<dyn FnOnce()>>,
}

impl MorphCallbacks {
    pub fn new(on_morph_done: impl FnOnce() + 'static, on_fade_done: impl FnOnce() + 'static) -> Self {
        Self {
            on_morph_done: Some(Box::new(on_morph_done)),
            on_fade_done: Some(Box::new(on_fade_done)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MorphFrame {
    pub points: Vec<DVec2>,
    pub overlay_opacity: f64,
    pub phase: MorphPhase,
}

impl MorphFrame {
    pub fn path_d(&self) -> String {
        points_to_path(&self.points)
    }
}

pub struct MorphTransition {
    config: MorphConfig,
    target: Rect,
    start_pts: Vec<DVec2>,
    end_pts: Vec<DVec2>,
    lifecycle: Lifecycle,
    phase: MorphPhase,
    callbacks: MorphCallbacks,
}

impl MorphTransition {
    pub fn new(from_rect: Rect, viewport: Viewport, config: MorphConfig, callbacks: MorphCallbacks) -> Self {
        let target = inset_target(viewport, config.inset_px);
        let star = star_vertices_in_rect(from_rect);
        let rect = rect_vertices(target);
        let (start_verts, end_verts) = if config.reverse {
            (rect, star)
        } else {
            (star, rect)
        };
        let start_pts = sample_closed_polyline(&start_verts, config.samples);
        let end_pts = sample_closed_polyline(&end_verts, config.samples);
        Self {
            config,
            target,
            start_pts,
            end_pts,
            lifecycle: Lifecycle::default(),
            phase: MorphPhase::Pending,
            callbacks,
        }
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// Destination paper rectangle.
    pub fn target(&self) -> Rect {
        self.target
    }

    pub fn start_points(&self) -> &[DVec2] {
        &self.start_pts
    }

    pub fn end_points(&self) -> &[DVec2] {
        &self.end_pts
    }

    pub fn phase(&self) -> MorphPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == MorphPhase::Done
    }

    pub fn start(&mut self, now_ms: f64) {
        if self.lifecycle.start() {
            self.phase = MorphPhase::Morphing { start_ms: now_ms };
            log::debug!(
                "[morph] start reverse={} reduced={} over {:.0}ms",
                self.config.reverse,
                self.config.reduced_motion,
                self.config.morph_ms()
            );
        }
    }

    /// Cancels without firing any remaining callback.
    pub fn stop(&mut self) {
        if self.lifecycle.stop() && self.phase != MorphPhase::Done {
            log::debug!("[morph] cancelled in {:?}", self.phase);
        }
    }

    pub fn frame(&mut self, now_ms: f64) -> Option<MorphFrame> {
        if !self.lifecycle.is_running() {
            return None;
        }
        match self.phase {
            MorphPhase::Pending | MorphPhase::Done => None,
            MorphPhase::Morphing { start_ms } => {
                let t = progress(now_ms - start_ms, self.config.morph_ms());
                let points = if t >= 1.0 {
                    self.end_pts.clone()
                } else {
                    let k = self.config.ease(t);
                    self.start_pts
                        .iter()
                        .zip(&self.end_pts)
                        .map(|(a, b)| a.lerp(*b, k))
                        .collect()
                };
                if t >= 1.0 {
                    self.phase = MorphPhase::Fading { start_ms: now_ms };
                    log::debug!("[morph] shape complete, fading");
                    if let Some(cb) = self.callbacks.on_morph_done.take() {
                        cb();
                    }
                }
                Some(MorphFrame {
                    points,
                    overlay_opacity: 1.0,
                    phase: self.phase,
                })
            }
            MorphPhase::Fading { start_ms } => {
                let t = progress(now_ms - start_ms, self.config.fade_ms());
                if t >= 1.0 {
                    self.phase = MorphPhase::Done;
                    self.lifecycle.stop();
                    log::debug!("[morph] overlay faded");
                    if let Some(cb) = self.callbacks.on_fade_done.take() {
                        cb();
                    }
                }
                Some(MorphFrame {
                    points: self.end_pts.clone(),
                    overlay_opacity: 1.0 - ease_out_expo(t),
                    phase: self.phase,
                })
            }
        }
    }
}

fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms > 0.0 {
        clamp01(elapsed_ms / duration_ms)
    } else {
        1.0
    }
}
