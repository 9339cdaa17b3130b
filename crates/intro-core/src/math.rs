//! Easing curves and small geometry helpers shared by every simulation.

use glam::DVec2;

#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Cubic easing `t²(3-2t)` with zero slope at both ends.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn ease_in_expo(t: f64) -> f64 {
    if t == 0.0 {
        0.0
    } else {
        2f64.powf(10.0 * (t - 1.0))
    }
}

#[inline]
pub fn ease_out_expo(t: f64) -> f64 {
    if t == 1.0 {
        1.0
    } else {
        1.0 - 2f64.powf(-10.0 * t)
    }
}

/// Maps `x` from `[start, end]` onto `[0, 1]`, clamped.
#[inline]
pub fn phase(x: f64, start: f64, end: f64) -> f64 {
    clamp01((x - start) / (end - start))
}

/// Pulls an offset back onto the ellipse `(dx/rx)² + (dy/ry)² = 1` when it lies outside.
pub fn clamp_to_ellipse(d: DVec2, rx: f64, ry: f64) -> DVec2 {
    let nx = d.x / rx;
    let ny = d.y / ry;
    let k = nx * nx + ny * ny;
    if !k.is_finite() {
        return DVec2::ZERO;
    }
    if k <= 1.0 {
        return d;
    }
    d / k.sqrt()
}

/// Axis-aligned rectangle in CSS pixels (top-left origin).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Corners in clockwise order starting top-left.
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.left, self.top),
            DVec2::new(self.right(), self.top),
            DVec2::new(self.right(), self.bottom()),
            DVec2::new(self.left, self.bottom()),
        ]
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Viewport dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn corners(&self) -> [DVec2; 4] {
        Rect::new(0.0, 0.0, self.width, self.height).corners()
    }

    /// Distance from `p` to the farthest viewport corner.
    pub fn farthest_corner_distance(&self, p: DVec2) -> f64 {
        self.corners()
            .iter()
            .map(|c| c.distance(p))
            .fold(0.0, f64::max)
    }
}

/// Uniform-scale mapping between a fixed view box and the element it is drawn into,
/// matching SVG `preserveAspectRatio="xMidYMid meet"`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBoxTransform {
    pub scale: f64,
    pub offset: DVec2,
}

impl ViewBoxTransform {
    pub fn meet(element: Rect, viewbox_w: f64, viewbox_h: f64) -> Option<Self> {
        if viewbox_w <= 0.0 || viewbox_h <= 0.0 || !element.is_finite() {
            return None;
        }
        let scale = (element.width / viewbox_w).min(element.height / viewbox_h);
        if scale <= 0.0 {
            return None;
        }
        let offset = DVec2::new(
            element.left + (element.width - viewbox_w * scale) / 2.0,
            element.top + (element.height - viewbox_h * scale) / 2.0,
        );
        Some(Self { scale, offset })
    }

    pub fn to_local(&self, screen: DVec2) -> DVec2 {
        (screen - self.offset) / self.scale
    }

    pub fn to_screen(&self, local: DVec2) -> DVec2 {
        local * self.scale + self.offset
    }
}
