// Host-side tests for the eye simulation.
// The main crate is wasm-only; the simulations live in `intro-core`.

use glam::DVec2;
use intro_core::*;
use std::f64::consts::PI;

fn sim_with(values: &[f64]) -> EyeSimulator<ScriptedRandom> {
    EyeSimulator::new(EyeTuning::default(), ScriptedRandom::new(values.iter().copied()))
}

fn input(now_ms: f64, pointer: Option<DVec2>) -> EyeInput {
    EyeInput {
        now_ms,
        pointer,
        iris: None,
        reduced_motion: false,
    }
}

fn ellipse_k(p: DVec2) -> f64 {
    let d = p - DVec2::from(EYE_CENTER);
    (d.x / TRACK_RX).powi(2) + (d.y / TRACK_RY).powi(2)
}

#[test]
fn ellipse_clamp_keeps_inside_points_and_projects_outside_ones() {
    let inside = DVec2::new(10.0, 5.0);
    assert_eq!(clamp_to_ellipse(inside, 60.0, 20.0), inside);

    let far = clamp_to_ellipse(DVec2::new(600.0, 200.0), 60.0, 20.0);
    let k = (far.x / 60.0).powi(2) + (far.y / 20.0).powi(2);
    assert!((k - 1.0).abs() < 1e-9);
    // Direction is preserved.
    assert!((far.y / far.x - 200.0 / 600.0).abs() < 1e-9);

    assert_eq!(clamp_to_ellipse(DVec2::new(f64::NAN, 1.0), 60.0, 20.0), DVec2::ZERO);
    assert_eq!(clamp_to_ellipse(DVec2::new(f64::INFINITY, 1.0), 60.0, 20.0), DVec2::ZERO);
}

#[test]
fn frame_is_none_until_started_and_after_stop() {
    let mut sim = sim_with(&[0.5]);
    assert!(sim.frame(&input(0.0, None)).is_none());
    sim.start(0.0);
    assert!(sim.frame(&input(16.0, None)).is_some());
    sim.stop();
    sim.stop();
    assert!(sim.frame(&input(32.0, None)).is_none());
    // Stopped simulations cannot be restarted.
    sim.start(48.0);
    assert!(!sim.is_running());
}

#[test]
fn pupil_never_leaves_tracking_ellipse() {
    let mut sim = EyeSimulator::new(EyeTuning::default(), SeededRandom::new(7));
    sim.start(0.0);
    let pointers = [
        DVec2::new(5000.0, -3000.0),
        DVec2::new(-400.0, 900.0),
        DVec2::new(300.0, 150.0),
        DVec2::new(f64::NAN, 10.0),
    ];
    for (i, p) in pointers.iter().cycle().take(2000).enumerate() {
        let now = i as f64 * 16.0;
        let f = sim.frame(&input(now, Some(*p))).unwrap();
        assert!(ellipse_k(f.pupil_center) <= 1.0 + 1e-9, "escaped at frame {i}");
    }
}

#[test]
fn pupil_eases_toward_pointer() {
    let mut sim = sim_with(&[0.5]);
    sim.start(0.0);
    let target = DVec2::new(330.0, 150.0);
    let first = sim.frame(&input(16.0, Some(target))).unwrap();
    assert!((first.pupil_center.x - (300.0 + 30.0 * FOLLOW_EASE)).abs() < 1e-9);
    for i in 2..200 {
        sim.frame(&input(i as f64 * 16.0, Some(target)));
    }
    assert!(sim.pupil_center().distance(target) < SACCADE_AMPLITUDE + 0.5);
}

#[test]
fn blink_closes_then_reopens_and_reschedules() {
    let mut sim = sim_with(&[0.0]);
    sim.start(0.0);
    assert_eq!(sim.next_blink_ms(), BLINK_EVERY_MIN_MS);

    sim.frame(&input(3499.0, None));
    assert_eq!(sim.blink_phase(), BlinkPhase::None);
    sim.frame(&input(3500.0, None));
    assert_eq!(sim.blink_phase(), BlinkPhase::Closing);

    let mut now = 3500.0;
    while now < 3500.0 + BLINK_DOWN_MS {
        now += 5.0;
        sim.frame(&input(now, None));
    }
    assert_eq!(sim.blink_phase(), BlinkPhase::Opening);
    assert!(sim.openness() < 0.9);

    let reopen_at = now + BLINK_UP_MS;
    sim.frame(&input(reopen_at, None));
    assert_eq!(sim.blink_phase(), BlinkPhase::None);
    assert_eq!(sim.next_blink_ms(), reopen_at + BLINK_EVERY_MIN_MS);
}

#[test]
fn reduced_motion_draws_rest_pose_without_advancing() {
    let mut sim = sim_with(&[0.5]);
    sim.start(0.0);
    for i in 1..20 {
        sim.frame(&input(i as f64 * 16.0, Some(DVec2::new(360.0, 170.0))));
    }
    let center_before = sim.pupil_center();
    let open_before = sim.openness();

    let reduced = EyeInput {
        now_ms: 20_000.0,
        pointer: Some(DVec2::new(0.0, 0.0)),
        iris: Some(1.0),
        reduced_motion: true,
    };
    let f = sim.frame(&reduced).unwrap();
    assert!(f.at_rest);
    assert_eq!(f, sim.rest_frame());
    assert_eq!(f.pupil_center, DVec2::from(EYE_CENTER));
    assert_eq!(f.pupil_rx, PUPIL_BASE_RADIUS);
    assert_eq!(f.openness, 1.0);
    assert_eq!(sim.pupil_center(), center_before);
    assert_eq!(sim.openness(), open_before);
    assert_eq!(sim.blink_phase(), BlinkPhase::None);
}

#[test]
fn iris_progress_dilates_the_pupil() {
    let mut sim = sim_with(&[0.5]);
    sim.start(0.0);
    let still = sim.frame(&input(16.0, None)).unwrap();
    assert_eq!(still.pupil_rx, PUPIL_BASE_RADIUS);
    let dilated = sim
        .frame(&EyeInput {
            iris: Some(1.0),
            ..input(32.0, None)
        })
        .unwrap();
    assert!((dilated.pupil_rx - PUPIL_BASE_RADIUS * (1.0 + IRIS_DILATION)).abs() < 1e-9);
    let ignored = sim
        .frame(&EyeInput {
            iris: Some(f64::NAN),
            ..input(48.0, None)
        })
        .unwrap();
    assert_eq!(ignored.pupil_rx, PUPIL_BASE_RADIUS);
}

#[test]
fn fast_motion_squashes_and_stretches() {
    let mut sim = sim_with(&[0.5]);
    sim.start(0.0);
    let f = sim.frame(&input(16.0, Some(DVec2::new(360.0, 150.0)))).unwrap();
    assert!(f.pupil_rx > f.pupil_ry);
    assert!(f.pupil_rx <= PUPIL_BASE_RADIUS * (1.0 + STRETCH_AMOUNT) + 1e-9);
    assert!(f.pupil_ry >= PUPIL_BASE_RADIUS * (1.0 - SQUASH_AMOUNT) - 1e-9);
}

#[test]
fn lid_shape_spans_open_to_closed() {
    let tuning = EyeTuning::default();
    let open = LidShape::for_openness(1.0, &tuning);
    assert_eq!(open.top_edge, -LID_OPEN_OVERSHOOT);
    assert_eq!(open.bottom_edge, EYE_VIEWBOX_H + LID_OPEN_OVERSHOOT);
    assert_eq!(open.curve, LID_CURVE_OPEN);

    let shut = LidShape::for_openness(0.0, &tuning);
    assert_eq!(shut.top_edge, EYE_CENTER[1]);
    assert_eq!(shut.bottom_edge, EYE_CENTER[1]);
    assert_eq!(shut.curve, LID_CURVE_CLOSED);

    let d = shut.top_path_d(tuning.viewbox);
    assert!(d.starts_with("M 0 0 H 600 V 150 C"));
    assert!(d.ends_with("0 150 Z"));
    assert!(shut.bottom_path_d(tuning.viewbox).starts_with("M 0 300 H 600 V 150"));
}

#[test]
fn pupil_signals_map_through_view_box() {
    let sim = sim_with(&[0.5]);
    let t = ViewBoxTransform::meet(Rect::new(0.0, 100.0, 1200.0, 800.0), EYE_VIEWBOX_W, EYE_VIEWBOX_H)
        .unwrap();
    assert_eq!(t.scale, 2.0);
    assert_eq!(t.offset, DVec2::new(0.0, 200.0));

    let signals = sim.rest_frame().pupil_signals(&t);
    assert_eq!(signals.center, DVec2::new(600.0, 500.0));
    assert!((signals.size - PUPIL_BASE_RADIUS * 4.0).abs() < 1e-9);
    assert_eq!(t.to_local(signals.center), DVec2::from(EYE_CENTER));

    assert!(ViewBoxTransform::meet(Rect::new(0.0, 0.0, 0.0, 50.0), 600.0, 300.0).is_none());
}

#[test]
fn tuning_validation() {
    assert!(EyeTuning::default().validate().is_ok());
    let inverted = EyeTuning {
        blink_every_min_ms: 10_000.0,
        ..EyeTuning::default()
    };
    assert!(inverted.validate().is_err());
}

/// Steps still frames every 10ms and returns the timestamps at which saccades fired.
fn saccade_times(sim: &mut EyeSimulator<ScriptedRandom>, pointer: Option<DVec2>, until_ms: f64) -> Vec<f64> {
    let mut fired = Vec::new();
    let mut now = 0.0;
    while now < until_ms {
        now += 10.0;
        let before = sim.saccade().last_saccade_ms;
        sim.frame(&input(now, pointer));
        if sim.saccade().last_saccade_ms != before {
            fired.push(now);
        }
    }
    fired
}

#[test]
fn saccades_wait_for_stillness_and_cooldown() {
    // Blink interval draws the first value (pushed out to ~9s), then each saccade
    // draws an angle and a magnitude.
    let mut sim = sim_with(&[1.0, 0.0, 1.0, 0.25, 0.5]);
    sim.start(0.0);
    assert!((sim.next_blink_ms() - BLINK_EVERY_MAX_MS).abs() < 1e-6);

    let fired = saccade_times(&mut sim, None, STILL_FOR_MS);
    assert!(fired.is_empty());
    sim.frame(&input(STILL_FOR_MS + 10.0, None));
    assert_eq!(sim.saccade().last_saccade_ms, STILL_FOR_MS + 10.0);
    assert_eq!(sim.saccade().end_ms, STILL_FOR_MS + 10.0 + SACCADE_DURATION_MS);
    // Angle 0 at full amplitude: purely horizontal.
    assert!((sim.saccade().offset - DVec2::new(SACCADE_AMPLITUDE, 0.0)).length() < 1e-9);

    let first = sim.saccade().last_saccade_ms;
    let mut now = first;
    let second = loop {
        now += 10.0;
        let last_move = sim.saccade().last_move_ms;
        sim.frame(&input(now, None));
        if sim.saccade().last_saccade_ms != first {
            assert!(now - last_move > STILL_FOR_MS);
            break now;
        }
        assert!(now < first + 5_000.0, "no second saccade");
    };
    assert!(second - first > SACCADE_COOLDOWN_MS);
    // Angle pi/2 at half the magnitude range, squeezed vertically.
    let magnitude = SACCADE_AMPLITUDE * (SACCADE_MIN_FRACTION + (1.0 - SACCADE_MIN_FRACTION) * 0.5);
    let expected = DVec2::new(0.0, magnitude * SACCADE_VERTICAL_FRACTION);
    assert!((sim.saccade().offset - expected).length() < 1e-9);
}

#[test]
fn saccade_offset_is_a_half_sine_pulse() {
    let mut sim = sim_with(&[1.0, 0.0, 1.0]);
    sim.start(0.0);
    saccade_times(&mut sim, None, STILL_FOR_MS + 10.0);
    let fired = sim.saccade().last_saccade_ms;
    let offset = sim.saccade().offset;
    let d = SACCADE_DURATION_MS;

    assert!(sim.saccade_pulse(fired).length() < 1e-12);
    assert!((sim.saccade_pulse(fired + d / 4.0) - offset * (PI / 4.0).sin()).length() < 1e-9);
    assert!((sim.saccade_pulse(fired + d / 2.0) - offset).length() < 1e-9);
    assert!((sim.saccade_pulse(fired + d * 0.75) - offset * (PI * 0.75).sin()).length() < 1e-9);
    assert_eq!(sim.saccade_pulse(fired + d), DVec2::ZERO);
    assert_eq!(sim.saccade_pulse(fired + d + 100.0), DVec2::ZERO);
}

#[test]
fn no_saccades_while_lids_are_mostly_closed() {
    // Blink immediately, snap shut, then reopen far too slowly to matter.
    let tuning = EyeTuning {
        blink_every_min_ms: 0.0,
        blink_every_max_ms: 0.0,
        blink_min_open: 0.0,
        blink_down_ms: 1.0,
        blink_up_ms: 1.0e9,
        ..EyeTuning::default()
    };
    let mut sim = EyeSimulator::new(tuning, ScriptedRandom::new([0.0]));
    sim.start(0.0);
    let fired = saccade_times(&mut sim, None, 5_000.0);
    assert!(sim.openness() <= SACCADE_MIN_OPEN);
    assert!(fired.is_empty());
    assert_eq!(sim.saccade().last_saccade_ms, f64::NEG_INFINITY);
}

#[test]
fn outward_saccade_at_the_track_edge_stays_inside() {
    // Pointer far to the right parks the target on the ellipse; angle 0 pushes further out.
    let mut sim = sim_with(&[1.0, 0.0, 1.0]);
    sim.start(0.0);
    let pointer = Some(DVec2::new(5000.0, 150.0));
    let mut now = 0.0;
    let mut fired = 0;
    while now < 4_000.0 {
        now += 16.0;
        let before = sim.saccade().last_saccade_ms;
        let f = sim.frame(&input(now, pointer)).unwrap();
        if sim.saccade().last_saccade_ms != before {
            fired += 1;
        }
        assert!(ellipse_k(f.pupil_center) <= 1.0 + 1e-9, "escaped at {now}ms");
    }
    assert!(fired > 0);
}
