//! Scroll progress driver.
//!
//! Converts the intro container's scroll offset into a smoothed progress scalar,
//! hands control to a short eased auto-play once the burst would visibly
//! overshoot, and derives every reveal parameter from the resulting progress.

use crate::bus::{BurstSignals, ProgressSignals, PupilSignals};
use crate::constants::*;
use crate::error::CoreError;
use crate::lifecycle::Lifecycle;
use crate::math::{clamp01, phase, smoothstep, Rect, Viewport};
use glam::DVec2;

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollTuning {
    pub smoothing: f64,
    pub direction_deadzone: f64,
    pub auto_play_duration_ms: f64,
    /// Burst scale at which auto-play takes over. Empirically tuned.
    pub auto_play_threshold: f64,
    pub split_end: f64,
    pub split_viewport_fraction: f64,
    pub burst_start: f64,
    pub burst_exponent: f64,
    pub content_start: f64,
    pub pupil_scale: f64,
    pub burst_start_factor: f64,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self {
            smoothing: PROGRESS_SMOOTHING,
            direction_deadzone: SCROLL_DIRECTION_DEADZONE,
            auto_play_duration_ms: AUTO_PLAY_DURATION_MS,
            auto_play_threshold: AUTO_PLAY_BURST_THRESHOLD,
            split_end: SPLIT_END,
            split_viewport_fraction: SPLIT_VIEWPORT_FRACTION,
            burst_start: BURST_START,
            burst_exponent: BURST_EXPONENT,
            content_start: CONTENT_START,
            pupil_scale: PUPIL_SCALE,
            burst_start_factor: BURST_START_FACTOR,
        }
    }
}

impl ScrollTuning {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(CoreError::InvalidTuning("smoothing must be in (0, 1]"));
        }
        if self.auto_play_duration_ms <= 0.0 {
            return Err(CoreError::InvalidTuning("auto-play duration must be positive"));
        }
        if !(self.auto_play_threshold.is_finite() && self.auto_play_threshold > 0.0) {
            return Err(CoreError::InvalidTuning("auto-play threshold must be positive"));
        }
        let breakpoints = [self.split_end, self.burst_start, self.content_start];
        if breakpoints.iter().any(|b| !(*b > 0.0 && *b < 1.0)) {
            return Err(CoreError::InvalidTuning("phase breakpoints must lie inside (0, 1)"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    #[default]
    None,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoPlay {
    pub start_ms: f64,
    pub start_progress: f64,
}

/// Underline and stage rectangles used to locate the split line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSplit {
    pub stage: Rect,
    pub line: Rect,
}

impl LineSplit {
    pub fn line_y(&self) -> f64 {
        self.line.top - self.stage.top + self.line.height / 2.0
    }
}

/// Per-frame measurements handed to the driver.
#[derive(Clone, Copy, Debug)]
pub struct ScrollInput {
    pub now_ms: f64,
    /// Top of the intro container relative to the viewport.
    pub container_top: f64,
    pub viewport: Viewport,
    /// Screen rect of the eye anchor; without it the burst is inactive.
    pub eye_anchor: Option<Rect>,
    /// Last pupil values published by the eye simulator.
    pub pupil: Option<PupilSignals>,
    pub line_split: Option<LineSplit>,
}

/// Reveal phases derived from smoothed progress alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealPhases {
    pub split_px: f64,
    pub iris: f64,
    pub burst: f64,
    pub content: f64,
    pub scroll_hint: f64,
}

pub fn reveal_phases(t: f64, viewport_height: f64, tuning: &ScrollTuning) -> RevealPhases {
    let split = smoothstep(clamp01(t / tuning.split_end));
    RevealPhases {
        split_px: split * viewport_height * tuning.split_viewport_fraction,
        iris: smoothstep(phase(t, tuning.split_end, 1.0)),
        burst: phase(t, tuning.burst_start, 1.0).powf(tuning.burst_exponent),
        content: smoothstep(phase(t, tuning.content_start, 1.0)),
        scroll_hint: clamp01(1.0 - t * SCROLL_HINT_FADE_RATE),
    }
}

/// Where the burst originates and how large its disc starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocalPoint {
    pub center: DVec2,
    pub pupil_size: f64,
}

impl FocalPoint {
    /// Prefers the published pupil, falling back to the anchor's centre and nominal pupil size.
    pub fn resolve(anchor: Rect, pupil: Option<PupilSignals>, tuning: &ScrollTuning) -> Self {
        let fallback_center = anchor.center();
        let fallback_size = anchor.width * tuning.pupil_scale;
        match pupil.filter(PupilSignals::is_finite) {
            Some(p) => Self {
                center: p.center,
                pupil_size: p.size,
            },
            None => Self {
                center: fallback_center,
                pupil_size: fallback_size,
            },
        }
    }

    pub fn burst_start_size(&self, tuning: &ScrollTuning) -> f64 {
        self.pupil_size * tuning.burst_start_factor
    }

    /// Scale at which the burst disc covers the farthest viewport corner.
    pub fn burst_scale_max(&self, viewport: Viewport, tuning: &ScrollTuning) -> f64 {
        let start = self.burst_start_size(tuning);
        if start > 0.0 {
            (viewport.farthest_corner_distance(self.center) * 2.0 / start).max(1.0)
        } else {
            1.0
        }
    }
}

pub struct ScrollDriver {
    tuning: ScrollTuning,
    lifecycle: Lifecycle,
    raw: f64,
    smoothed: f64,
    last_target: f64,
    direction: ScrollDirection,
    auto_play: Option<AutoPlay>,
}

impl ScrollDriver {
    pub fn new(tuning: ScrollTuning) -> Self {
        Self {
            tuning,
            lifecycle: Lifecycle::default(),
            raw: 0.0,
            smoothed: 0.0,
            last_target: 0.0,
            direction: ScrollDirection::None,
            auto_play: None,
        }
    }

    pub fn start(&mut self) {
        if self.lifecycle.start() {
            log::debug!("[scroll] driver started");
        }
    }

    pub fn stop(&mut self) {
        if self.lifecycle.stop() {
            log::debug!("[scroll] driver stopped at progress {:.3}", self.smoothed);
        }
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn tuning(&self) -> &ScrollTuning {
        &self.tuning
    }

    pub fn raw_progress(&self) -> f64 {
        self.raw
    }

    pub fn progress(&self) -> f64 {
        self.smoothed
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn auto_play(&self) -> Option<AutoPlay> {
        self.auto_play
    }

    /// Advances one display frame. Returns `None` unless running.
    pub fn frame(&mut self, input: &ScrollInput) -> Option<ProgressSignals> {
        if !self.lifecycle.is_running() {
            return None;
        }
        let now = input.now_ms;
        let viewport_h = input.viewport.height;
        let target = if viewport_h > 0.0 {
            let raw = -input.container_top / viewport_h;
            if raw.is_finite() {
                clamp01(raw)
            } else {
                self.raw
            }
        } else {
            0.0
        };
        self.raw = target;
        self.track_direction(target);

        if self.auto_play.is_some() && self.direction == ScrollDirection::Up {
            // Upward scroll always takes control back.
            self.auto_play = None;
            self.smoothed = target;
            log::debug!("[scroll] auto-play cancelled by upward scroll at {target:.3}");
        }
        match self.auto_play {
            None => self.smoothed += (target - self.smoothed) * self.tuning.smoothing,
            Some(auto) => {
                let k = clamp01((now - auto.start_ms) / self.tuning.auto_play_duration_ms);
                self.smoothed = auto.start_progress + (1.0 - auto.start_progress) * smoothstep(k);
            }
        }

        let t = self.smoothed;
        let phases = reveal_phases(t, viewport_h, &self.tuning);

        let burst = input.eye_anchor.map(|anchor| {
            let focal = FocalPoint::resolve(anchor, input.pupil, &self.tuning);
            let scale_max = focal.burst_scale_max(input.viewport, &self.tuning);
            BurstSignals {
                origin: focal.center,
                start_size: focal.burst_start_size(&self.tuning),
                scale: 1.0 + phases.burst * (scale_max - 1.0),
            }
        });

        let should_auto = burst
            .map(|b| b.scale >= self.tuning.auto_play_threshold)
            .unwrap_or(false);
        if self.auto_play.is_none() && should_auto && self.direction != ScrollDirection::Up {
            self.auto_play = Some(AutoPlay {
                start_ms: now,
                start_progress: t,
            });
            log::debug!("[scroll] auto-play engaged from {t:.3}");
        }

        Some(ProgressSignals {
            progress: t,
            split_px: phases.split_px,
            scroll_hint_opacity: phases.scroll_hint,
            iris: phases.iris,
            burst_opacity: phases.burst,
            burst,
            content_opacity: phases.content,
            content_scale: CONTENT_SCALE_FROM + (1.0 - CONTENT_SCALE_FROM) * phases.content,
            burst_events: phases.burst > BURST_EVENTS_MIN,
            line_y: input.line_split.map(|l| l.line_y()),
        })
    }

    fn track_direction(&mut self, target: f64) {
        let delta = target - self.last_target;
        if delta > self.tuning.direction_deadzone {
            self.direction = ScrollDirection::Down;
        } else if delta < -self.tuning.direction_deadzone {
            self.direction = ScrollDirection::Up;
        }
        self.last_target = target;
    }
}

/// Eased scroll from the current offset to an anchor, used by in-page links.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorScroll {
    pub start_ms: f64,
    pub from_y: f64,
    pub to_y: f64,
    pub duration_ms: f64,
}

impl AnchorScroll {
    pub fn new(now_ms: f64, from_y: f64, to_y: f64) -> Self {
        Self {
            start_ms: now_ms,
            from_y,
            to_y,
            duration_ms: ANCHOR_SCROLL_MS,
        }
    }

    /// Scroll offset for `now_ms` and whether the tween has finished.
    pub fn sample(&self, now_ms: f64) -> (f64, bool) {
        let t = if self.duration_ms > 0.0 {
            clamp01((now_ms - self.start_ms) / self.duration_ms)
        } else {
            1.0
        };
        let y = self.from_y + (self.to_y - self.from_y) * smoothstep(t);
        (y, t >= 1.0)
    }
}
