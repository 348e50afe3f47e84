//! Collision layers.
//!
//! Team filtering is expressed as layer memberships/filters only. The combat resolver
//! never compares teams directly: two things can hit each other iff their layers interact.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
    Pickup,
}

#[inline]
pub fn player_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Player, [Layer::Enemy, Layer::EnemyBullet, Layer::Pickup])
}

#[inline]
pub fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::Player, Layer::PlayerBullet])
}

#[inline]
pub fn pickup_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Pickup, [Layer::Player])
}

#[inline]
pub fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}
