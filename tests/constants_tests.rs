// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use intro_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn scroll_phases_are_ordered() {
    assert!(SPLIT_END > 0.0 && SPLIT_END < BURST_START);
    assert!(BURST_START < CONTENT_START && CONTENT_START < 1.0);
    assert!(PROGRESS_SMOOTHING > 0.0 && PROGRESS_SMOOTHING <= 1.0);
    assert!(AUTO_PLAY_BURST_THRESHOLD > 1.0);
    assert!(CONTENT_SCALE_FROM < 1.0);
    assert!(BURST_START_FACTOR > 0.0 && BURST_START_FACTOR < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn eye_geometry_fits_the_view_box() {
    assert_eq!(EYE_CENTER, [EYE_VIEWBOX_W / 2.0, EYE_VIEWBOX_H / 2.0]);
    assert!(TRACK_RX + PUPIL_BASE_RADIUS < EYE_VIEWBOX_W / 2.0);
    assert!(TRACK_RY < EYE_VIEWBOX_H / 2.0);
    assert!(BLINK_EVERY_MIN_MS < BLINK_EVERY_MAX_MS);
    assert!(BLINK_MIN_OPEN > 0.0 && BLINK_MIN_OPEN < SACCADE_MIN_OPEN);
    assert!(LID_CURVE_CLOSED < LID_CURVE_OPEN);
    assert!(SQUASH_AMOUNT < 1.0 && STRETCH_AMOUNT < 1.0);
    assert!((PUPIL_SCALE * EYE_VIEWBOX_W - 2.0 * PUPIL_BASE_RADIUS).abs() < 1e-9);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constellation_ranges_stay_on_canvas() {
    assert!(PLACE_X_RANGE[0] < PLACE_X_RANGE[1] && PLACE_X_RANGE[1] < 1.0);
    assert!(PLACE_Y_RANGE[0] < PLACE_Y_RANGE[1] && PLACE_Y_RANGE[1] < 1.0);
    assert!(RING_CENTER[0] - RING_RADII[0] >= PLACE_X_RANGE[0]);
    assert!(RING_CENTER[0] + RING_RADII[0] <= PLACE_X_RANGE[1]);
    assert!(CENTER_GAP_RADIUS < CANVAS_UNITS / 2.0);
    assert!(NODE_RADIUS_SM < NODE_RADIUS_MD && NODE_RADIUS_MD < NODE_RADIUS_LG);
    assert!(DIMMED_NODE_OPACITY < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn morph_timings_match_the_stylesheet() {
    assert!(MORPH_SAMPLES >= 10);
    assert!(MORPH_REDUCED_MS < MORPH_FADE_MS && MORPH_FADE_MS < MORPH_DURATION_MS);
    // The panel cross-fade runs alongside the overlay fade.
    assert_eq!(VIEW_FADE_MS as f64, MORPH_FADE_MS);
    assert!(ANCHOR_SCROLL_MS > MORPH_DURATION_MS);
}

#[test]
fn dom_contract_names_are_well_formed() {
    for sel in [
        INTRO_SELECTOR,
        STAGE_SELECTOR,
        LINE_SPLIT_SELECTOR,
        EYE_ANCHOR_SELECTOR,
        ABOUT_LINK_SELECTOR,
    ] {
        assert!(sel.starts_with('.'), "{sel}");
    }
    for sel in [NODE_SELECTOR, PROJECT_ITEM_SELECTOR] {
        assert!(sel.starts_with("[data-") && sel.ends_with(']'), "{sel}");
    }
    for attr in [FOCUS_ATTR, ABOUT_VISIBLE_ATTR] {
        assert!(attr.starts_with("data-"), "{attr}");
    }
    let ids = [
        ABOUT_TARGET_ID,
        EYE_SVG_ID,
        EYE_PUPIL_ID,
        EYE_TOP_LID_ID,
        EYE_BOTTOM_LID_ID,
        CONSTELLATION_ID,
        PROJECT_PANEL_ID,
        PROJECT_CLOSE_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.contains(' ') && !a.starts_with('#'));
        assert!(ids[i + 1..].iter().all(|b| a != b), "duplicate id {a}");
    }
    assert!(STAR_FILL.starts_with("rgba(") && STAR_FILL.contains(EDGE_RGB));
}
