// Shared tuning constants for the intro, eye, constellation and morph simulations.

// ---------------- Scroll progress driver ----------------
pub const PROGRESS_SMOOTHING: f64 = 0.35; // blend factor toward raw progress per frame
pub const SCROLL_DIRECTION_DEADZONE: f64 = 0.001; // raw delta below this keeps the last direction
pub const AUTO_PLAY_DURATION_MS: f64 = 450.0;
pub const AUTO_PLAY_BURST_THRESHOLD: f64 = 1.1; // burst scale that hands control to auto-play

// Reveal phase breakpoints over smoothed progress
pub const SPLIT_END: f64 = 0.62; // wipe-split runs 0..SPLIT_END, iris takes over after
pub const SPLIT_VIEWPORT_FRACTION: f64 = 0.6; // full split distance as a fraction of viewport height
pub const BURST_START: f64 = 0.78;
pub const BURST_EXPONENT: f64 = 2.4;
pub const CONTENT_START: f64 = 0.9;
pub const SCROLL_HINT_FADE_RATE: f64 = 8.0; // hint is gone by progress 1/8

// Burst sizing
pub const PUPIL_SCALE: f64 = 140.0 / 600.0; // pupil diameter relative to eye anchor width
pub const BURST_START_FACTOR: f64 = 0.7; // burst disc starts at this fraction of pupil size
pub const BURST_EVENTS_MIN: f64 = 0.02; // burst layer accepts pointer events above this
pub const CONTENT_VISIBLE_MIN: f64 = 0.01;
pub const CONTENT_SCALE_FROM: f64 = 0.96;

// ---------------- Eye simulator (600x300 view box) ----------------
pub const EYE_VIEWBOX_W: f64 = 600.0;
pub const EYE_VIEWBOX_H: f64 = 300.0;
pub const EYE_CENTER: [f64; 2] = [300.0, 150.0];
pub const PUPIL_BASE_RADIUS: f64 = 70.0;
pub const TRACK_RX: f64 = 60.0; // allowed pupil-centre travel
pub const TRACK_RY: f64 = 20.0;
pub const FOLLOW_EASE: f64 = 0.10;

// Blink
pub const BLINK_EVERY_MIN_MS: f64 = 3500.0;
pub const BLINK_EVERY_MAX_MS: f64 = 9000.0;
pub const BLINK_MIN_OPEN: f64 = 0.05;
pub const BLINK_DOWN_MS: f64 = 65.0;
pub const BLINK_UP_MS: f64 = 95.0;
pub const LID_EASE: f64 = 0.14;

// Curved lids
pub const LID_OPEN_OVERSHOOT: f64 = 95.0;
pub const LID_CURVE_OPEN: f64 = 85.0;
pub const LID_CURVE_CLOSED: f64 = 18.0;

// Micro-saccades
pub const SACCADE_AMPLITUDE: f64 = 6.0; // view box units
pub const SACCADE_MIN_FRACTION: f64 = 0.55;
pub const SACCADE_VERTICAL_FRACTION: f64 = 0.6;
pub const SACCADE_DURATION_MS: f64 = 65.0;
pub const STILLNESS_THRESHOLD: f64 = 0.55;
pub const STILL_FOR_MS: f64 = 650.0;
pub const SACCADE_COOLDOWN_MS: f64 = 900.0;
pub const SACCADE_MIN_OPEN: f64 = 0.55;

// Squash/stretch
pub const SPEED_NORM: f64 = 6.0;
pub const SQUASH_AMOUNT: f64 = 0.09;
pub const STRETCH_AMOUNT: f64 = 0.05;
pub const IRIS_DILATION: f64 = 0.45; // pupil grows by this fraction at full iris progress

// ---------------- Constellation (1000x1000 canvas) ----------------
pub const CANVAS_UNITS: f64 = 1000.0;
pub const CENTER_GAP_RADIUS: f64 = 110.0;
pub const SPLIT_MIN_SPAN: f64 = 0.02; // gaps shorter than this (in segment t) are ignored
pub const RING_CENTER: [f64; 2] = [0.5, 0.48];
pub const RING_RADII: [f64; 2] = [0.34, 0.22];
pub const JITTER_SPAN: f64 = 0.06;
pub const PLACE_X_RANGE: [f64; 2] = [0.08, 0.92];
pub const PLACE_Y_RANGE: [f64; 2] = [0.10, 0.90];
pub const NODE_RADIUS_SM: f64 = 11.0;
pub const NODE_RADIUS_MD: f64 = 13.0;
pub const NODE_RADIUS_LG: f64 = 16.0;
pub const NODE_ACTIVE_GROWTH: f64 = 1.15;
pub const NODE_HIT_FACTOR: f64 = 4.2; // hit box edge as a multiple of node radius
pub const DUST_COUNT: usize = 80;
pub const EDGE_FADE_DISTANCE: f64 = 0.35;
pub const DIMMED_NODE_OPACITY: f64 = 0.35;

// ---------------- Morph overlay ----------------
pub const MORPH_SAMPLES: usize = 128;
pub const MORPH_INSET_PX: f64 = 16.0; // paper border width
pub const MORPH_DURATION_MS: f64 = 820.0;
pub const MORPH_FADE_MS: f64 = 220.0;
pub const MORPH_REDUCED_MS: f64 = 140.0; // both phases under reduced motion

// ---------------- Anchor scroll ----------------
pub const ANCHOR_SCROLL_MS: f64 = 1500.0;
