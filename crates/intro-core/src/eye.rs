//! Cursor-reactive eye.
//!
//! All geometry is in the eye's 600x300 view box. The pupil follows the pointer
//! inside an elliptical track, blinks on a randomized schedule, twitches with
//! micro-saccades when settled, and squashes with speed.

use crate::bus::PupilSignals;
use crate::constants::*;
use crate::error::CoreError;
use crate::lifecycle::Lifecycle;
use crate::math::{clamp_to_ellipse, lerp, ViewBoxTransform};
use crate::random::RandomSource;
use glam::DVec2;
use std::f64::consts::PI;

#[derive(Clone, Debug, PartialEq)]
pub struct EyeTuning {
    pub center: DVec2,
    pub viewbox: DVec2,
    pub base_radius: f64,
    pub track_rx: f64,
    pub track_ry: f64,
    pub follow_ease: f64,
    pub blink_every_min_ms: f64,
    pub blink_every_max_ms: f64,
    pub blink_min_open: f64,
    pub blink_down_ms: f64,
    pub blink_up_ms: f64,
    pub lid_ease: f64,
    pub lid_open_overshoot: f64,
    pub lid_curve_open: f64,
    pub lid_curve_closed: f64,
    pub saccade_amplitude: f64,
    pub saccade_duration_ms: f64,
    pub stillness_threshold: f64,
    pub still_for_ms: f64,
    pub saccade_cooldown_ms: f64,
    pub saccade_min_open: f64,
    pub speed_norm: f64,
    pub squash_amount: f64,
    pub stretch_amount: f64,
    pub iris_dilation: f64,
}

impl Default for EyeTuning {
    fn default() -> Self {
        Self {
            center: DVec2::from(EYE_CENTER),
            viewbox: DVec2::new(EYE_VIEWBOX_W, EYE_VIEWBOX_H),
            base_radius: PUPIL_BASE_RADIUS,
            track_rx: TRACK_RX,
            track_ry: TRACK_RY,
            follow_ease: FOLLOW_EASE,
            blink_every_min_ms: BLINK_EVERY_MIN_MS,
            blink_every_max_ms: BLINK_EVERY_MAX_MS,
            blink_min_open: BLINK_MIN_OPEN,
            blink_down_ms: BLINK_DOWN_MS,
            blink_up_ms: BLINK_UP_MS,
            lid_ease: LID_EASE,
            lid_open_overshoot: LID_OPEN_OVERSHOOT,
            lid_curve_open: LID_CURVE_OPEN,
            lid_curve_closed: LID_CURVE_CLOSED,
            saccade_amplitude: SACCADE_AMPLITUDE,
            saccade_duration_ms: SACCADE_DURATION_MS,
            stillness_threshold: STILLNESS_THRESHOLD,
            still_for_ms: STILL_FOR_MS,
            saccade_cooldown_ms: SACCADE_COOLDOWN_MS,
            saccade_min_open: SACCADE_MIN_OPEN,
            speed_norm: SPEED_NORM,
            squash_amount: SQUASH_AMOUNT,
            stretch_amount: STRETCH_AMOUNT,
            iris_dilation: IRIS_DILATION,
        }
    }
}

impl EyeTuning {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.track_rx <= 0.0 || self.track_ry <= 0.0 {
            return Err(CoreError::InvalidTuning("tracking ellipse radii must be positive"));
        }
        if self.blink_every_min_ms > self.blink_every_max_ms {
            return Err(CoreError::InvalidTuning("blink interval range is inverted"));
        }
        if self.blink_down_ms <= 0.0 || self.blink_up_ms <= 0.0 || self.saccade_duration_ms <= 0.0 {
            return Err(CoreError::InvalidTuning("blink and saccade durations must be positive"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlinkPhase {
    #[default]
    None,
    Closing,
    Opening,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaccadeState {
    pub last_move_ms: f64,
    pub last_saccade_ms: f64,
    pub offset: DVec2,
    pub end_ms: f64,
}

/// Upper/lower eyelid edges and their shared curvature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LidShape {
    pub top_edge: f64,
    pub bottom_edge: f64,
    pub curve: f64,
}

impl LidShape {
    /// Lid pose for `openness` in `[0, 1]` (1 is fully open).
    pub fn for_openness(openness: f64, tuning: &EyeTuning) -> Self {
        let amount = 1.0 - openness;
        Self {
            top_edge: lerp(-tuning.lid_open_overshoot, tuning.center.y, amount),
            bottom_edge: lerp(
                tuning.viewbox.y + tuning.lid_open_overshoot,
                tuning.center.y,
                amount,
            ),
            curve: lerp(tuning.lid_curve_open, tuning.lid_curve_closed, amount),
        }
    }

    pub fn top_path_d(&self, viewbox: DVec2) -> String {
        let (w, y, c) = (viewbox.x, self.top_edge, self.curve);
        format!(
            "M 0 0 H {w} V {y} C {} {}, {} {}, 0 {y} Z",
            w * 0.75,
            y - c,
            w * 0.25,
            y - c
        )
    }

    pub fn bottom_path_d(&self, viewbox: DVec2) -> String {
        let (w, h, y, c) = (viewbox.x, viewbox.y, self.bottom_edge, self.curve);
        format!(
            "M 0 {h} H {w} V {y} C {} {}, {} {}, 0 {y} Z",
            w * 0.75,
            y + c,
            w * 0.25,
            y + c
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EyeInput {
    pub now_ms: f64,
    /// Pointer in view-box coordinates, if one has been seen.
    pub pointer: Option<DVec2>,
    /// Iris progress published by the scroll driver.
    pub iris: Option<f64>,
    pub reduced_motion: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeFrame {
    pub pupil_center: DVec2,
    pub pupil_rx: f64,
    pub pupil_ry: f64,
    pub openness: f64,
    pub lids: LidShape,
    /// Static rest pose drawn under reduced motion.
    pub at_rest: bool,
}

impl EyeFrame {
    /// Pupil centre and apparent diameter on screen, for the burst origin.
    pub fn pupil_signals(&self, transform: &ViewBoxTransform) -> PupilSignals {
        let center = transform.to_screen(self.pupil_center);
        let edge = transform.to_screen(self.pupil_center + DVec2::new(self.pupil_rx, 0.0));
        PupilSignals {
            center,
            size: edge.distance(center) * 2.0,
        }
    }
}

pub struct EyeSimulator<R: RandomSource> {
    tuning: EyeTuning,
    rng: R,
    lifecycle: Lifecycle,
    center: DVec2,
    last: DVec2,
    open: f64,
    open_target: f64,
    blink: BlinkPhase,
    blink_start_ms: f64,
    next_blink_ms: f64,
    saccade: SaccadeState,
}

impl<R: RandomSource> EyeSimulator<R> {
    pub fn new(tuning: EyeTuning, rng: R) -> Self {
        let rest = tuning.center;
        Self {
            tuning,
            rng,
            lifecycle: Lifecycle::default(),
            center: rest,
            last: rest,
            open: 1.0,
            open_target: 1.0,
            blink: BlinkPhase::None,
            blink_start_ms: 0.0,
            next_blink_ms: f64::INFINITY,
            saccade: SaccadeState {
                last_move_ms: 0.0,
                last_saccade_ms: f64::NEG_INFINITY,
                offset: DVec2::ZERO,
                end_ms: f64::NEG_INFINITY,
            },
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        if !self.lifecycle.start() {
            return;
        }
        self.next_blink_ms = now_ms + self.blink_interval();
        self.saccade.last_move_ms = now_ms;
        log::debug!("[eye] started, first blink at {:.0}ms", self.next_blink_ms);
    }

    pub fn stop(&mut self) {
        if self.lifecycle.stop() {
            log::debug!("[eye] stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn tuning(&self) -> &EyeTuning {
        &self.tuning
    }

    pub fn pupil_center(&self) -> DVec2 {
        self.center
    }

    pub fn openness(&self) -> f64 {
        self.open
    }

    pub fn blink_phase(&self) -> BlinkPhase {
        self.blink
    }

    pub fn next_blink_ms(&self) -> f64 {
        self.next_blink_ms
    }

    pub fn saccade(&self) -> SaccadeState {
        self.saccade
    }

    /// Fully open lids, pupil parked at the anchor, nominal radius.
    pub fn rest_frame(&self) -> EyeFrame {
        EyeFrame {
            pupil_center: self.tuning.center,
            pupil_rx: self.tuning.base_radius,
            pupil_ry: self.tuning.base_radius,
            openness: 1.0,
            lids: LidShape::for_openness(1.0, &self.tuning),
            at_rest: true,
        }
    }

    pub fn frame(&mut self, input: &EyeInput) -> Option<EyeFrame> {
        if !self.lifecycle.is_running() {
            return None;
        }
        if input.reduced_motion {
            return Some(self.rest_frame());
        }
        let now = input.now_ms;
        let rest = self.tuning.center;
        let (rx, ry) = (self.tuning.track_rx, self.tuning.track_ry);

        let target = match input.pointer.filter(|p| p.is_finite()) {
            Some(p) => rest + clamp_to_ellipse(p - rest, rx, ry),
            None => rest,
        };

        self.step_blink(now);
        self.open += (self.open_target - self.open) * self.tuning.lid_ease;
        let lids = LidShape::for_openness(self.open, &self.tuning);

        self.step_saccade(now, target);
        let pulse = self.saccade_pulse(now);
        let aim = rest + clamp_to_ellipse(target + pulse - rest, rx, ry);

        self.center += (aim - self.center) * self.tuning.follow_ease;
        let speed = self.center.distance(self.last);
        self.last = self.center;

        let k = (speed / self.tuning.speed_norm).clamp(0.0, 1.0);
        let squash = 1.0 - self.tuning.squash_amount * k;
        let stretch = 1.0 + self.tuning.stretch_amount * k;
        let iris_scale = input
            .iris
            .filter(|i| i.is_finite())
            .map(|i| 1.0 + i * self.tuning.iris_dilation)
            .unwrap_or(1.0);

        Some(EyeFrame {
            pupil_center: self.center,
            pupil_rx: self.tuning.base_radius * stretch * iris_scale,
            pupil_ry: self.tuning.base_radius * squash * iris_scale,
            openness: self.open,
            lids,
            at_rest: false,
        })
    }

    fn blink_interval(&mut self) -> f64 {
        self.rng
            .range(self.tuning.blink_every_min_ms, self.tuning.blink_every_max_ms)
    }

    fn step_blink(&mut self, now: f64) {
        self.open_target = 1.0;
        if self.blink == BlinkPhase::None && now >= self.next_blink_ms {
            self.blink = BlinkPhase::Closing;
            self.blink_start_ms = now;
            log::debug!("[eye] blink at {now:.0}ms");
        }
        match self.blink {
            BlinkPhase::Closing => {
                let k = ((now - self.blink_start_ms) / self.tuning.blink_down_ms).clamp(0.0, 1.0);
                self.open_target = self.open_target.min(lerp(1.0, self.tuning.blink_min_open, k));
                if k >= 1.0 {
                    self.blink = BlinkPhase::Opening;
                    self.blink_start_ms = now;
                }
            }
            BlinkPhase::Opening => {
                let k = ((now - self.blink_start_ms) / self.tuning.blink_up_ms).clamp(0.0, 1.0);
                self.open_target = self.open_target.min(lerp(self.tuning.blink_min_open, 1.0, k));
                if k >= 1.0 {
                    self.blink = BlinkPhase::None;
                    self.next_blink_ms = now + self.blink_interval();
                }
            }
            BlinkPhase::None => {}
        }
    }

    fn step_saccade(&mut self, now: f64, target: DVec2) {
        let follow_error = target.distance(self.center);
        if follow_error >= self.tuning.stillness_threshold {
            self.saccade.last_move_ms = now;
            return;
        }
        if now - self.saccade.last_move_ms <= self.tuning.still_for_ms {
            return;
        }
        let cooled = now - self.saccade.last_saccade_ms > self.tuning.saccade_cooldown_ms;
        if !cooled || self.open <= self.tuning.saccade_min_open {
            return;
        }
        let angle = self.rng.next_f64() * PI * 2.0;
        let amp = self.tuning.saccade_amplitude;
        let magnitude = self.rng.range(amp * SACCADE_MIN_FRACTION, amp);
        self.saccade.offset = DVec2::new(
            angle.cos() * magnitude,
            angle.sin() * magnitude * SACCADE_VERTICAL_FRACTION,
        );
        self.saccade.end_ms = now + self.tuning.saccade_duration_ms;
        self.saccade.last_saccade_ms = now;
        log::debug!("[eye] saccade {:?}", self.saccade.offset);
    }

    /// Half-sine pulse of the active saccade offset at `now`; zero once it has ended.
    pub fn saccade_pulse(&self, now: f64) -> DVec2 {
        if now >= self.saccade.end_ms {
            return DVec2::ZERO;
        }
        let k = 1.0 - (self.saccade.end_ms - now) / self.tuning.saccade_duration_ms;
        self.saccade.offset * (k * PI).sin()
    }
}
