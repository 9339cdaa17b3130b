//! Published scalar channel between the simulations.
//!
//! Each group of values has exactly one writer, handed out once by
//! [`SignalBus::new`]. Readers may observe values that are one frame stale; there
//! is no ordering guarantee across groups.

use glam::DVec2;
use std::cell::Cell;
use std::rc::Rc;

pub const VAR_PROGRESS: &str = "--progress";
pub const VAR_SPLIT: &str = "--split";
pub const VAR_SCROLL_HINT_OPACITY: &str = "--scrollHintOpacity";
pub const VAR_IRIS: &str = "--iris";
pub const VAR_BURST_OPACITY: &str = "--burstOpacity";
pub const VAR_BURST_X: &str = "--burstX";
pub const VAR_BURST_Y: &str = "--burstY";
pub const VAR_BURST_START: &str = "--burstStart";
pub const VAR_BURST_SCALE: &str = "--burstScale";
pub const VAR_BURST_CONTENT_OPACITY: &str = "--burstContentOpacity";
pub const VAR_BURST_CONTENT_SCALE: &str = "--burstContentScale";
pub const VAR_BURST_EVENTS: &str = "--burstEvents";
pub const VAR_LINE_Y: &str = "--lineY";
pub const VAR_PUPIL_X: &str = "--pupilX";
pub const VAR_PUPIL_Y: &str = "--pupilY";
pub const VAR_PUPIL_SIZE: &str = "--pupilSize";
pub const VAR_EYE_VISIBLE: &str = "--eyeVisible";

/// Burst origin and scale; present only while a focal anchor exists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstSignals {
    pub origin: DVec2,
    pub start_size: f64,
    pub scale: f64,
}

/// Everything the scroll driver publishes in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressSignals {
    pub progress: f64,
    pub split_px: f64,
    pub scroll_hint_opacity: f64,
    pub iris: f64,
    pub burst_opacity: f64,
    pub burst: Option<BurstSignals>,
    pub content_opacity: f64,
    pub content_scale: f64,
    pub burst_events: bool,
    pub line_y: Option<f64>,
}

impl BurstSignals {
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.start_size.is_finite() && self.scale.is_finite()
    }
}

impl ProgressSignals {
    pub fn is_finite(&self) -> bool {
        [
            self.progress,
            self.split_px,
            self.scroll_hint_opacity,
            self.iris,
            self.burst_opacity,
            self.content_opacity,
            self.content_scale,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.burst.map_or(true, |b| b.is_finite())
            && self.line_y.map_or(true, f64::is_finite)
    }

    pub fn content_visible(&self) -> bool {
        self.content_opacity > crate::constants::CONTENT_VISIBLE_MIN
    }

    pub fn style_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::with_capacity(14);
        if let Some(line_y) = self.line_y {
            vars.push((VAR_LINE_Y, format!("{line_y}px")));
        }
        if let Some(burst) = self.burst {
            vars.push((VAR_BURST_X, format!("{}px", burst.origin.x)));
            vars.push((VAR_BURST_Y, format!("{}px", burst.origin.y)));
            vars.push((VAR_BURST_START, format!("{:.2}px", burst.start_size)));
            vars.push((VAR_BURST_SCALE, format!("{:.3}", burst.scale)));
        }
        vars.push((VAR_SPLIT, format!("{}px", self.split_px)));
        vars.push((VAR_PROGRESS, format!("{}", self.progress)));
        vars.push((VAR_SCROLL_HINT_OPACITY, format!("{}", self.scroll_hint_opacity)));
        vars.push((VAR_IRIS, format!("{}", self.iris)));
        vars.push((VAR_BURST_OPACITY, format!("{}", self.burst_opacity)));
        vars.push((VAR_BURST_CONTENT_OPACITY, format!("{}", self.content_opacity)));
        vars.push((VAR_BURST_CONTENT_SCALE, format!("{}", self.content_scale)));
        vars.push((
            VAR_BURST_EVENTS,
            if self.burst_events { "auto" } else { "none" }.to_string(),
        ));
        vars
    }
}

/// Pupil centre and apparent diameter in screen px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PupilSignals {
    pub center: DVec2,
    pub size: f64,
}

impl PupilSignals {
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.size.is_finite()
    }

    pub fn style_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            (VAR_PUPIL_X, format!("{}px", self.center.x)),
            (VAR_PUPIL_Y, format!("{}px", self.center.y)),
            (VAR_PUPIL_SIZE, format!("{}px", self.size)),
        ]
    }
}

#[derive(Default)]
struct BusInner {
    progress: Cell<Option<ProgressSignals>>,
    pupil: Cell<Option<PupilSignals>>,
    eye_visible: Cell<Option<bool>>,
}

/// Read side of the channel. Cheap to clone; all clones see the same values.
#[derive(Clone)]
pub struct SignalBus {
    inner: Rc<BusInner>,
}

/// Sole writer of [`ProgressSignals`].
pub struct ProgressPublisher {
    inner: Rc<BusInner>,
}

/// Sole writer of [`PupilSignals`].
pub struct PupilPublisher {
    inner: Rc<BusInner>,
}

/// Sole writer of scene-level flags.
pub struct ScenePublisher {
    inner: Rc<BusInner>,
}

pub struct BusWriters {
    pub progress: ProgressPublisher,
    pub pupil: PupilPublisher,
    pub scene: ScenePublisher,
}

impl SignalBus {
    pub fn new() -> (Self, BusWriters) {
        let inner = Rc::new(BusInner::default());
        let writers = BusWriters {
            progress: ProgressPublisher {
                inner: inner.clone(),
            },
            pupil: PupilPublisher {
                inner: inner.clone(),
            },
            scene: ScenePublisher {
                inner: inner.clone(),
            },
        };
        (Self { inner }, writers)
    }

    /// Last progress frame; a frame with any non-finite field reads as absent.
    pub fn progress(&self) -> Option<ProgressSignals> {
        self.inner.progress.get().filter(ProgressSignals::is_finite)
    }

    pub fn iris(&self) -> Option<f64> {
        self.progress().map(|p| p.iris)
    }

    pub fn pupil(&self) -> Option<PupilSignals> {
        self.inner.pupil.get().filter(PupilSignals::is_finite)
    }

    pub fn eye_visible(&self) -> Option<bool> {
        self.inner.eye_visible.get()
    }

    /// Snapshot of every published value as style-variable pairs.
    pub fn style_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        if let Some(p) = self.progress() {
            vars.extend(p.style_vars());
        }
        if let Some(p) = self.pupil() {
            vars.extend(p.style_vars());
        }
        if let Some(v) = self.eye_visible() {
            vars.push((VAR_EYE_VISIBLE, if v { "1" } else { "0" }.to_string()));
        }
        vars
    }
}

impl ProgressPublisher {
    pub fn publish(&self, signals: ProgressSignals) {
        self.inner.progress.set(Some(signals));
    }
}

impl PupilPublisher {
    pub fn publish(&self, signals: PupilSignals) {
        self.inner.pupil.set(Some(signals));
    }

    pub fn clear(&self) {
        self.inner.pupil.set(None);
    }
}

impl ScenePublisher {
    pub fn set_eye_visible(&self, visible: bool) {
        self.inner.eye_visible.set(Some(visible));
    }

    pub fn clear(&self) {
        self.inner.eye_visible.set(None);
    }
}
