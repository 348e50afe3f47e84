//! Movement resolver.
//!
//! `advance` is a pure function of (pattern, state, kinematics, context). The system
//! around it only gathers targets and writes results back, which keeps every pattern
//! testable without a `World`.
//!
//! Anchored patterns (sine, circle, hover, strafe) compute position from a phase
//! accumulator, so they stay exactly periodic however the tick length varies. The
//! rest integrate velocity over `dt`.

pub mod pattern;

use std::f32::consts::{FRAC_2_PI, PI, TAU};

use avian2d::prelude::LinearVelocity;
use bevy::prelude::*;
use bevy::time::Fixed;

use crate::common::state::in_game;
use crate::plugins::SimSet;
use crate::plugins::firing::targeting::Candidates;
use crate::plugins::registry::{Kind, Lifecycle, SimId, Speed, Team};
use crate::plugins::world::Playfield;

use pattern::{MovementPattern, MovementState};

/// Pattern-driven motion for enemies and pickups.
#[derive(Component, Debug, Clone)]
pub struct Motion {
    pub pattern: MovementPattern,
    pub state: MovementState,
}

impl Motion {
    pub fn new(pattern: MovementPattern, spawn_at: Vec2) -> Self {
        Self { pattern, state: MovementState::at(spawn_at) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub dt: f32,
    pub speed: f32,
    pub target: Option<Vec2>,
    pub playfield: &'a Playfield,
}

#[inline]
fn integrate(position: Vec2, velocity: Vec2, dt: f32) -> Kinematics {
    Kinematics { position: position + velocity * dt, velocity }
}

/// Push the anchor back toward the centre when the computed x touches a side wall.
#[inline]
fn nudge_anchor(state: &mut MovementState, x: f32, playfield: &Playfield) {
    let (lo, hi) = playfield.side_walls();
    if x < lo {
        state.anchor.x += playfield.anchor_nudge;
    } else if x > hi {
        state.anchor.x -= playfield.anchor_nudge;
    }
}

/// Triangle wave in [-1, 1] with the same period and zero crossings as `sin`.
#[inline]
fn triangle(phase: f32) -> f32 {
    FRAC_2_PI * phase.sin().asin()
}

/// Rotate `velocity` toward `desired` by at most `max_turn` radians, keeping its magnitude.
/// Homing projectiles steer with this every tick.
pub fn steer_towards(velocity: Vec2, desired: Vec2, max_turn: f32) -> Vec2 {
    let speed = velocity.length();
    if speed <= f32::EPSILON || desired.length_squared() <= f32::EPSILON {
        return velocity;
    }
    let current = velocity.to_angle();
    let diff = (desired.to_angle() - current + PI).rem_euclid(TAU) - PI;
    let turn = diff.clamp(-max_turn, max_turn);
    Vec2::from_angle(current + turn) * speed
}

/// Advance one entity by one tick.
pub fn advance(
    pattern: &MovementPattern,
    state: &mut MovementState,
    current: Kinematics,
    ctx: &MoveContext<'_>,
) -> Kinematics {
    let dt = ctx.dt;
    let Kinematics { position, .. } = current;

    match *pattern {
        MovementPattern::Stationary => Kinematics { position, velocity: Vec2::ZERO },

        MovementPattern::Straight { direction } => {
            integrate(position, Vec2::from(direction).normalize_or_zero() * ctx.speed, dt)
        }

        MovementPattern::Sine { amplitude, period } => {
            state.timer += dt;
            let x = state.anchor.x + amplitude * (state.timer / period.max(f32::EPSILON)).sin();
            nudge_anchor(state, x, ctx.playfield);
            Kinematics {
                position: Vec2::new(x, position.y + ctx.speed * dt),
                velocity: Vec2::new(0.0, ctx.speed),
            }
        }

        MovementPattern::Zigzag { interval, forward_factor } => {
            state.timer += dt;
            if state.timer >= interval {
                state.timer = 0.0;
                state.direction = -state.direction;
            }
            // Walls override the timer.
            let (lo, hi) = ctx.playfield.side_walls();
            if position.x <= lo {
                state.direction = 1.0;
            } else if position.x >= hi {
                state.direction = -1.0;
            }
            let v = Vec2::new(state.direction * ctx.speed, ctx.speed * forward_factor);
            integrate(position, v, dt)
        }

        MovementPattern::Circle { radius, vertical_radius, angular_speed } => {
            state.phase += angular_speed * dt;
            let p = state.anchor + Vec2::new(state.phase.cos() * radius, state.phase.sin() * vertical_radius);
            nudge_anchor(state, p.x, ctx.playfield);
            Kinematics { position: p, velocity: Vec2::ZERO }
        }

        MovementPattern::Hover { distance, angular_speed } => {
            state.phase += angular_speed * dt;
            let x = state.anchor.x + state.phase.sin() * distance;
            nudge_anchor(state, x, ctx.playfield);
            Kinematics { position: Vec2::new(x, state.anchor.y), velocity: Vec2::ZERO }
        }

        MovementPattern::Strafe { amplitude, angular_speed } => {
            state.phase += angular_speed * dt;
            let x = state.anchor.x + triangle(state.phase) * amplitude;
            nudge_anchor(state, x, ctx.playfield);
            Kinematics { position: Vec2::new(x, state.anchor.y), velocity: Vec2::ZERO }
        }

        MovementPattern::Follow { lateral_factor, forward_factor } => {
            let max_lateral = ctx.speed * lateral_factor;
            let vx = ctx
                .target
                .map_or(0.0, |t| (t.x - position.x).clamp(-max_lateral, max_lateral));
            integrate(position, Vec2::new(vx, ctx.speed * forward_factor), dt)
        }

        MovementPattern::Charge { speed_factor } => {
            let heading = ctx
                .target
                .map(|t| (t - position).normalize_or_zero())
                .filter(|h| *h != Vec2::ZERO)
                .unwrap_or(Vec2::Y);
            integrate(position, heading * ctx.speed * speed_factor, dt)
        }
    }
}

/// Drive every active `Motion` entity one tick.
pub fn move_actors(
    time: Res<Time<Fixed>>,
    playfield: Res<Playfield>,
    mut q_movers: Query<(&Team, &Speed, &Lifecycle, &mut Motion, &mut Transform, &mut LinearVelocity)>,
    q_targets: Query<(&SimId, &Kind, &Transform, &Lifecycle), Without<Motion>>,
) {
    let dt = time.delta_secs();
    let candidates = Candidates::collect(
        q_targets
            .iter()
            .filter(|(_, _, _, life)| life.is_active())
            .map(|(id, kind, tf, _)| (id.0, *kind, tf.translation.truncate())),
    );

    for (team, speed, life, mut motion, mut tf, mut vel) in &mut q_movers {
        if !life.is_active() {
            continue;
        }
        let position = tf.translation.truncate();
        let ctx = MoveContext {
            dt,
            speed: speed.0,
            target: candidates.nearest_opponent(*team, position).map(|(_, p)| p),
            playfield: &playfield,
        };

        let motion = &mut *motion;
        let next = advance(&motion.pattern, &mut motion.state, Kinematics { position, velocity: vel.0 }, &ctx);
        tf.translation = next.position.extend(tf.translation.z);
        vel.0 = next.velocity;
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, move_actors.in_set(SimSet::Move).run_if(in_game));
}

#[cfg(test)]
mod tests;
