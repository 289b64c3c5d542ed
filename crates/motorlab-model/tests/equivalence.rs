//! Integration test: the transfer-function and state-space views of a motor
//! describe the same input-output map.
//!
//! Checks, over randomly sampled physical parameters:
//! 1. SS → TF of the built state-space model matches the built transfer function
//! 2. TF → SS → TF and SS → TF → SS round trips preserve the input-output map
//! 3. Doubling K raises the constant denominator term by exactly 3K²
//!
//! plus the documented speed-control example end to end.

use motorlab_model::prelude::*;
use motorlab_test_utils::{random_parameters, seeded_rng};

/// Relative tolerance for coefficient comparisons.
const TOL: f64 = 1e-9;

/// Randomized cases per property.
const CASES: usize = 500;

#[test]
fn state_space_derivation_matches_transfer_function() {
    let mut rng = seeded_rng(0x5eed);
    for _ in 0..CASES {
        let p = random_parameters(&mut rng);
        let tf = build_transfer_function(&p);
        let derived = state_space_to_transfer_function(&build_state_space(&p));
        assert!(
            derived.is_equivalent(&tf, TOL),
            "{p:?}: {derived:?} vs {tf:?}"
        );
    }
}

#[test]
fn transfer_function_round_trip() {
    let mut rng = seeded_rng(1);
    for _ in 0..CASES {
        let tf = build_transfer_function(&random_parameters(&mut rng));
        let ss = transfer_function_to_state_space(&tf).unwrap();
        let back = state_space_to_transfer_function(&ss);
        assert!(back.is_equivalent(&tf, TOL), "{back:?} vs {tf:?}");
    }
}

#[test]
fn state_space_round_trip() {
    let mut rng = seeded_rng(2);
    for _ in 0..CASES {
        let ss = build_state_space(&random_parameters(&mut rng));
        let realized = StateSpaceModel::try_from(&TransferFunction::from(&ss)).unwrap();
        assert!(realized.is_equivalent(&ss, TOL));
    }
}

#[test]
fn doubling_k_adds_three_k_squared() {
    let mut rng = seeded_rng(3);
    for _ in 0..CASES {
        let p = random_parameters(&mut rng);
        let k = p.motor_constant();
        let doubled = p.with_motor_constant(2.0 * k).unwrap();

        let before = build_transfer_function(&p).denominator()[2];
        let after = build_transfer_function(&doubled).denominator()[2];
        let expected = 3.0 * k * k;
        assert!(
            ((after - before) - expected).abs() <= 1e-12 * after,
            "K={k}: Δ={} expected {expected}",
            after - before
        );
    }
}

#[test]
fn dc_gains_agree() {
    let mut rng = seeded_rng(4);
    for _ in 0..CASES {
        let p = random_parameters(&mut rng);
        let tf_gain = build_transfer_function(&p).dc_gain().unwrap();
        let ss_gain = build_state_space(&p).dc_gain().unwrap();
        assert!((tf_gain - ss_gain).abs() <= 1e-9 * tf_gain.abs());
    }
}

#[test]
fn poles_agree() {
    let mut rng = seeded_rng(5);
    for _ in 0..CASES {
        let p = random_parameters(&mut rng);
        let tf_poles = build_transfer_function(&p).poles().unwrap();
        let ss_poles = build_state_space(&p).poles();
        for (a, b) in tf_poles.iter().zip(&ss_poles) {
            assert!((a - b).norm() <= 1e-6 * a.norm().max(b.norm()), "{a} vs {b}");
        }
        // A passive motor is always stable.
        assert!(tf_poles.iter().all(|z| z.re < 0.0));
    }
}

#[test]
fn zero_inertia_or_inductance_rejected() {
    let j = MotorModelBuilder::new().with_inertia(0.0).build().unwrap_err();
    assert_eq!(j.name, "J");
    let l = MotorModelBuilder::new().with_inductance(0.0).build().unwrap_err();
    assert_eq!(l.name, "L");
    let err: MotorError = l.into();
    assert!(err.to_string().contains("L = 0"));
}

// ---------------------------------------------------------------------------
// Documented speed-control example
// ---------------------------------------------------------------------------

#[test]
fn speed_example_end_to_end() {
    let model = MotorModelBuilder::from_parameters(&presets::speed_example())
        .build()
        .unwrap();
    let tf = model.transfer_function();
    let ss = model.state_space();

    assert!(tf.is_equivalent(
        &TransferFunction::new([0.01], [0.005, 0.06, 0.1001]).unwrap(),
        1e-12
    ));

    // s² + 12s + 20.02 → -6 ± √15.98
    let poles = tf.poles().unwrap();
    let root = 15.98_f64.sqrt();
    assert!((poles[0].re - (-6.0 - root)).abs() < 1e-9);
    assert!((poles[1].re - (-6.0 + root)).abs() < 1e-9);
    assert!(poles.iter().all(|z| z.im == 0.0));

    let gain = tf.dc_gain().unwrap();
    assert!((gain - 0.01 / 0.1001).abs() < 1e-12);

    let response = ss.step_response(5.0, 0.001, 1.0).unwrap();
    let last = *response.output.last().unwrap();
    assert!((last - gain).abs() < 1e-3 * gain);

    let metrics = response.metrics().unwrap();
    assert!(metrics.overshoot.abs() < f64::EPSILON, "overdamped");
    let rise = metrics.rise_time.unwrap();
    assert!(rise > 1.0 && rise < 1.3, "rise time {rise}");
    let settle = metrics.settling_time.unwrap();
    assert!(settle > 1.9 && settle < 2.2, "settling time {settle}");
}

#[test]
fn realized_model_has_same_step_response() {
    let physical = build_state_space(&presets::speed_example());
    let canonical =
        transfer_function_to_state_space(&build_transfer_function(&presets::speed_example()))
            .unwrap();
    assert_ne!(physical, canonical);

    let a = physical.step_response(3.0, 0.01, 12.0).unwrap();
    let b = canonical.step_response(3.0, 0.01, 12.0).unwrap();
    let scale = a.output.iter().fold(0.0_f64, |m, y| m.max(y.abs()));
    for (ya, yb) in a.output.iter().zip(&b.output) {
        assert!((ya - yb).abs() <= 1e-9 * scale);
    }
}

#[test]
fn position_example_is_well_posed() {
    let p = presets::position_example();
    let tf = build_transfer_function(&p);
    assert_eq!(tf.order(), 2);
    assert!(
        state_space_to_transfer_function(&build_state_space(&p)).is_equivalent(&tf, TOL)
    );
}

#[test]
fn model_serializes_to_json() {
    let model = MotorModelBuilder::new().build().unwrap();
    let text = serde_json::to_string(&model).unwrap();
    assert!(text.contains("\"denominator\""));
    assert!(text.contains("\"state_space\""));
}
