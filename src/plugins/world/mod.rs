//! World plugin: playfield bounds and out-of-bounds culling.

use bevy::prelude::*;

use crate::common::state::in_game;
use crate::common::tunables::{PlayfieldTunables, Tunables};
use crate::plugins::SimSet;
use crate::plugins::projectiles::flight::advance_projectiles;
use crate::plugins::registry::{Kind, Lifecycle};

/// Screen-space rectangle `[0, width] x [0, height]`, +y down.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    pub projectile_margin: f32,
    pub actor_margin: f32,
    pub edge_margin: f32,
    pub anchor_nudge: f32,
}

impl Playfield {
    pub fn from_tunables(t: &PlayfieldTunables) -> Self {
        Self {
            width: t.width,
            height: t.height,
            projectile_margin: t.projectile_margin,
            actor_margin: t.actor_margin,
            edge_margin: t.edge_margin,
            anchor_nudge: t.anchor_nudge,
        }
    }

    /// x range that wall-aware patterns keep to.
    #[inline]
    pub fn side_walls(&self) -> (f32, f32) {
        (self.edge_margin, self.width - self.edge_margin)
    }

    #[inline]
    pub fn contains(&self, p: Vec2, margin: f32) -> bool {
        p.x >= -margin && p.x <= self.width + margin && p.y >= -margin && p.y <= self.height + margin
    }

    /// Clamp a body of half-size `half` so it stays fully inside.
    #[inline]
    pub fn clamp_inside(&self, p: Vec2, half: Vec2) -> Vec2 {
        let lo = half.min(Vec2::new(self.width, self.height) * 0.5);
        let hi = Vec2::new(self.width, self.height) - lo;
        p.clamp(lo, hi)
    }

    fn margin_for(&self, kind: Kind) -> Option<f32> {
        match kind {
            Kind::Projectile => Some(self.projectile_margin),
            Kind::Enemy | Kind::Pickup => Some(self.actor_margin),
            Kind::Player => None,
        }
    }
}

/// Mark anything that left the playfield (plus its margin) for removal.
pub fn cull_out_of_bounds(playfield: Res<Playfield>, mut q: Query<(&Kind, &Transform, &mut Lifecycle)>) {
    for (kind, tf, mut life) in &mut q {
        if !life.is_active() {
            continue;
        }
        let Some(margin) = playfield.margin_for(*kind) else {
            continue;
        };
        if !playfield.contains(tf.translation.truncate(), margin) {
            *life = Lifecycle::PendingRemoval;
        }
    }
}

pub fn plugin(app: &mut App) {
    let playfield = app
        .world()
        .get_resource::<Tunables>()
        .map(|t| Playfield::from_tunables(&t.playfield))
        .unwrap_or_else(|| Playfield::from_tunables(&PlayfieldTunables::default()));
    app.insert_resource(playfield);

    app.add_systems(
        FixedUpdate,
        cull_out_of_bounds
            .after(advance_projectiles)
            .in_set(SimSet::Project)
            .run_if(in_game),
    );
}
