use approx::assert_relative_eq;
use bevy::prelude::*;

use super::pattern::{MovementPattern, MovementState};
use super::*;
use crate::common::rng::SimRng;
use crate::common::tunables::PlayfieldTunables;

fn playfield() -> Playfield {
    Playfield::from_tunables(&PlayfieldTunables::default())
}

fn ctx(playfield: &Playfield, dt: f32, speed: f32, target: Option<Vec2>) -> MoveContext<'_> {
    MoveContext { dt, speed, target, playfield }
}

fn at(position: Vec2) -> Kinematics {
    Kinematics { position, velocity: Vec2::ZERO }
}

#[test]
fn straight_integrates_speed_times_dt() {
    let pf = playfield();
    let mut state = MovementState::at(Vec2::ZERO);
    let next = advance(&MovementPattern::straight_down(), &mut state, at(Vec2::new(100.0, 0.0)), &ctx(&pf, 0.5, 150.0, None));
    assert_relative_eq!(next.position.y, 75.0);
    assert_relative_eq!(next.velocity.y, 150.0);
}

#[test]
fn sine_offsets_from_anchor_and_falls_at_speed() {
    let pf = playfield();
    let (amplitude, period, speed, dt) = (80.0, 0.5, 120.0, 0.05);
    let pattern = MovementPattern::Sine { amplitude, period };
    let anchor = Vec2::new(400.0, -50.0);
    let mut state = MovementState::at(anchor);
    let mut k = at(anchor);

    for step in 1..=40 {
        let y_before = k.position.y;
        k = advance(&pattern, &mut state, k, &ctx(&pf, dt, speed, None));
        let timer = step as f32 * dt;
        assert_relative_eq!(state.timer, timer, epsilon = 1e-4);
        assert_relative_eq!(k.position.x, anchor.x + amplitude * (timer / period).sin(), epsilon = 1e-3);
        assert_relative_eq!(k.position.y - y_before, speed * dt, epsilon = 1e-4);
        assert_eq!(k.velocity, Vec2::new(0.0, speed));
    }
    // Inside the walls the anchor never moves.
    assert_eq!(state.anchor, anchor);
}

#[test]
fn circle_position_depends_only_on_elapsed_time() {
    let pf = playfield();
    let pattern = MovementPattern::Circle { radius: 100.0, vertical_radius: 50.0, angular_speed: 1.0 };
    let anchor = Vec2::new(400.0, 150.0);

    let run = |steps: usize, dt: f32| {
        let mut state = MovementState::at(anchor);
        let mut k = at(anchor);
        for _ in 0..steps {
            k = advance(&pattern, &mut state, k, &ctx(&pf, dt, 80.0, None));
        }
        k.position
    };

    let coarse = run(50, 0.02);
    let fine = run(100, 0.01);
    assert_relative_eq!(coarse.x, fine.x, epsilon = 1e-3);
    assert_relative_eq!(coarse.y, fine.y, epsilon = 1e-3);
}

#[test]
fn hover_is_periodic() {
    let pf = playfield();
    let pattern = MovementPattern::Hover { distance: 200.0, angular_speed: 1.0 };
    let anchor = Vec2::new(400.0, 150.0);
    let mut state = MovementState::at(anchor);
    let mut k = at(anchor);

    let steps = 628;
    let dt = std::f32::consts::TAU / steps as f32;
    for _ in 0..steps {
        k = advance(&pattern, &mut state, k, &ctx(&pf, dt, 60.0, None));
        assert_eq!(k.position.y, anchor.y);
    }
    assert_relative_eq!(k.position.x, anchor.x, epsilon = 1e-2);
}

#[test]
fn anchored_patterns_drift_away_from_walls() {
    let pf = playfield();
    let pattern = MovementPattern::Hover { distance: 200.0, angular_speed: 1.0 };
    let mut state = MovementState::at(Vec2::new(30.0, 150.0));
    state.phase = -std::f32::consts::FRAC_PI_2;
    advance(&pattern, &mut state, at(Vec2::ZERO), &ctx(&pf, 0.0, 60.0, None));
    assert!(state.anchor.x > 30.0);
}

#[test]
fn zigzag_flips_on_timer_and_walls_win() {
    let pf = playfield();
    let pattern = MovementPattern::Zigzag { interval: 1.0, forward_factor: 0.8 };
    let mut state = MovementState::at(Vec2::new(400.0, 0.0));

    let k = advance(&pattern, &mut state, at(Vec2::new(400.0, 0.0)), &ctx(&pf, 0.5, 250.0, None));
    assert!(k.velocity.x > 0.0);
    assert_relative_eq!(k.velocity.y, 200.0);

    let k = advance(&pattern, &mut state, k, &ctx(&pf, 0.5, 250.0, None));
    assert!(k.velocity.x < 0.0, "timer flip after one interval");

    // Right wall forces a leftward heading even right after a timer flip to the right.
    let mut state = MovementState::at(Vec2::ZERO);
    state.direction = -1.0;
    state.timer = 0.99;
    let k = advance(&pattern, &mut state, at(Vec2::new(pf.width - 5.0, 0.0)), &ctx(&pf, 0.02, 250.0, None));
    assert!(k.velocity.x < 0.0);

    let k = advance(&pattern, &mut state, at(Vec2::new(1.0, 0.0)), &ctx(&pf, 0.02, 250.0, None));
    assert!(k.velocity.x > 0.0);
}

#[test]
fn follow_never_exceeds_lateral_cap() {
    let pf = playfield();
    let pattern = MovementPattern::Follow { lateral_factor: 0.5, forward_factor: 0.7 };
    let mut rng = SimRng::seeded(42);
    for _ in 0..200 {
        let mut state = MovementState::at(Vec2::ZERO);
        let pos = Vec2::new(rng.range(0.0, 800.0), rng.range(0.0, 600.0));
        let target = Vec2::new(rng.range(-200.0, 1000.0), 500.0);
        let k = advance(&pattern, &mut state, at(pos), &ctx(&pf, 1.0 / 60.0, 100.0, Some(target)));
        assert!(k.velocity.x.abs() <= 50.0 + 1e-4);
        assert_relative_eq!(k.velocity.y, 70.0);
    }
}

#[test]
fn charge_heads_at_target() {
    let pf = playfield();
    let mut state = MovementState::at(Vec2::ZERO);
    let k = advance(
        &MovementPattern::Charge { speed_factor: 2.0 },
        &mut state,
        at(Vec2::new(0.0, 0.0)),
        &ctx(&pf, 1.0, 100.0, Some(Vec2::new(300.0, 400.0))),
    );
    assert_relative_eq!(k.velocity.length(), 200.0, epsilon = 1e-3);
    assert_relative_eq!(k.velocity.x / k.velocity.y, 0.75, epsilon = 1e-4);
}

#[test]
fn steering_turns_at_most_the_rate_and_keeps_speed() {
    let mut rng = SimRng::seeded(7);
    for _ in 0..500 {
        let heading = rng.range(-3.1, 3.1);
        let v = Vec2::from_angle(heading) * 350.0;
        let desired = Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0));
        if desired.length_squared() < 1e-3 {
            continue;
        }
        let out = steer_towards(v, desired, 0.05);
        assert_relative_eq!(out.length(), 350.0, epsilon = 1e-2);
        assert!(v.angle_to(out).abs() <= 0.05 + 1e-4);
    }
}

#[test]
fn steering_takes_the_short_way_round() {
    let v = Vec2::from_angle(179f32.to_radians()) * 10.0;
    let desired = Vec2::from_angle(-179f32.to_radians());
    let out = steer_towards(v, desired, 0.01);
    // Crossing +pi: heading increases past 179 degrees instead of swinging back.
    assert!(v.angle_to(out) > 0.0);
}

#[test]
fn strafe_sweeps_within_amplitude() {
    let pf = playfield();
    let pattern = MovementPattern::Strafe { amplitude: 120.0, angular_speed: 2.0 };
    let anchor = Vec2::new(400.0, 200.0);
    let mut state = MovementState::at(anchor);
    let mut k = at(anchor);
    for _ in 0..600 {
        k = advance(&pattern, &mut state, k, &ctx(&pf, 1.0 / 60.0, 60.0, None));
        assert!((k.position.x - anchor.x).abs() <= 120.0 + 1e-3);
    }
}
