//! Tunable gameplay constants.
//!
//! One `Tunables` resource carries every number and pattern the simulation reads.
//! It deserializes from JSON with every field optional (missing fields fall back to
//! the defaults below), and `validate` must pass before a `Simulation` is built.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;
use crate::plugins::boss::BossPhase;
use crate::plugins::combat::hitbox::Hitbox;
use crate::plugins::enemies::EnemyArchetype;
use crate::plugins::firing::pattern::{DOWN, FiringPattern, FiringPatternDescriptor as Fp, UP};
use crate::plugins::firing::targeting::FireGate;
use crate::plugins::movement::pattern::MovementPattern;
use crate::plugins::pickups::PickupKind;
use crate::plugins::player::WeaponType;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tunables {
    pub playfield: PlayfieldTunables,
    pub player: PlayerTunables,
    pub weapons: WeaponTunables,
    pub archetypes: ArchetypeTable,
    pub waves: WaveTunables,
    pub pickups: PickupTunables,
    pub projectiles: ProjectileTunables,
    pub presentation: PresentationTunables,
}

impl Tunables {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tunables: Self = serde_json::from_str(json)?;
        tunables.validate()?;
        Ok(tunables)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.playfield.validate()?;
        self.player.validate()?;
        self.weapons.validate()?;
        self.archetypes.validate()?;
        self.waves.validate()?;
        self.pickups.validate()?;
        self.projectiles.validate()?;
        self.presentation.validate()?;

        if self.waves.spawn_margin * 2.0 > self.playfield.width {
            return Err(ConfigError::Playfield {
                width: self.playfield.width,
                height: self.playfield.height,
                margin: self.waves.spawn_margin,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotAProbability { field, value })
    }
}

fn cost(field: &'static str, value: f32, budget: f32) -> Result<(), ConfigError> {
    if (0.0..=budget).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Cost { field, value, budget })
    }
}

fn non_empty_pattern(field: &'static str, pattern: &FiringPattern) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        Err(ConfigError::MissingPattern { field })
    } else {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Playfield
// -----------------------------------------------------------------------------

/// Screen-space playfield. Origin top-left, +y points down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldTunables {
    pub width: f32,
    pub height: f32,
    /// Projectiles further than this outside the playfield are recycled.
    pub projectile_margin: f32,
    /// Enemies and pickups further than this outside the playfield are removed.
    pub actor_margin: f32,
    /// Patterns that bounce or drift treat this band along the side edges as a wall.
    pub edge_margin: f32,
    /// How far an anchored pattern's anchor is pushed back toward the centre per edge contact.
    pub anchor_nudge: f32,
}

impl Default for PlayfieldTunables {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            projectile_margin: 50.0,
            actor_margin: 100.0,
            edge_margin: 20.0,
            anchor_nudge: 5.0,
        }
    }
}

impl PlayfieldTunables {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("playfield.width", self.width)?;
        positive("playfield.height", self.height)?;
        if self.edge_margin * 2.0 >= self.width {
            return Err(ConfigError::Playfield {
                width: self.width,
                height: self.height,
                margin: self.edge_margin,
            });
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Player
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTunables {
    pub speed: f32,
    /// Multiplier applied while the speed pickup is running.
    pub speed_boost: f32,
    pub starting_lives: u32,
    pub max_lives: u32,
    pub invulnerability_secs: f32,
    pub starting_bombs: u32,
    pub spawn: [f32; 2],
    pub hitbox: Hitbox,
    /// Damage an enemy takes when it rams the player.
    pub ram_damage: i32,
    /// Bomb damage against enemies with boss phases; everything else is wiped outright.
    pub bomb_boss_damage: i32,
    /// Duration of the shield and speed pickups.
    pub power_up_secs: f32,
    pub starting_weapon: WeaponType,
    pub special: SpecialTunables,
}

impl Default for PlayerTunables {
    fn default() -> Self {
        Self {
            speed: 300.0,
            speed_boost: 1.5,
            starting_lives: 3,
            max_lives: 9,
            invulnerability_secs: 2.0,
            starting_bombs: 2,
            spawn: [400.0, 500.0],
            hitbox: Hitbox::aabb(20.0, 20.0),
            ram_damage: 1,
            bomb_boss_damage: 10,
            power_up_secs: 10.0,
            starting_weapon: WeaponType::Basic,
            special: SpecialTunables::default(),
        }
    }
}

impl PlayerTunables {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("player.speed", self.speed)?;
        positive("player.speed_boost", self.speed_boost)?;
        if self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(ConfigError::Lives { starting: self.starting_lives, max: self.max_lives });
        }
        positive("player.invulnerability_secs", self.invulnerability_secs)?;
        positive("player.ram_damage", self.ram_damage as f32)?;
        positive("player.bomb_boss_damage", self.bomb_boss_damage as f32)?;
        positive("player.power_up_secs", self.power_up_secs)?;
        self.special.validate()
    }
}

/// Charged special attack: a timed barrage volley.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialTunables {
    pub max_energy: f32,
    pub activation_cost: f32,
    pub duration_secs: f32,
    pub recharge_per_sec: f32,
    pub fire_interval: f32,
    pub pattern: FiringPattern,
    pub projectile: ProjectileProfile,
}

impl Default for SpecialTunables {
    fn default() -> Self {
        Self {
            max_energy: 100.0,
            activation_cost: 50.0,
            duration_secs: 5.0,
            recharge_per_sec: 10.0,
            fire_interval: 0.5,
            pattern: FiringPattern::single(Fp::barrage(12)),
            projectile: ProjectileProfile {
                speed: 400.0,
                damage: 1,
                penetrating: false,
                hitbox: Hitbox::circle(5.0),
                tracking_rate: 0.0,
            },
        }
    }
}

impl SpecialTunables {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("player.special.max_energy", self.max_energy)?;
        cost("player.special.activation_cost", self.activation_cost, self.max_energy)?;
        positive("player.special.duration_secs", self.duration_secs)?;
        positive("player.special.fire_interval", self.fire_interval)?;
        non_empty_pattern("player.special.pattern", &self.pattern)?;
        self.projectile.validate("player.special.projectile")
    }
}

// -----------------------------------------------------------------------------
// Projectiles and weapons
// -----------------------------------------------------------------------------

/// What a weapon's projectiles look like once they leave the muzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileProfile {
    pub speed: f32,
    pub damage: i32,
    #[serde(default)]
    pub penetrating: bool,
    pub hitbox: Hitbox,
    /// Max heading change per tick, in radians, for homing shots.
    #[serde(default)]
    pub tracking_rate: f32,
}

impl ProjectileProfile {
    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        positive(field, self.speed)?;
        positive(field, self.damage as f32)
    }

    fn bullet(speed: f32, damage: i32) -> Self {
        Self { speed, damage, penetrating: false, hitbox: Hitbox::circle(5.0), tracking_rate: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub fire_interval: f32,
    pub projectile: ProjectileProfile,
    /// Volley per upgrade level; level 1 is `levels[0]`.
    pub levels: Vec<FiringPattern>,
}

impl WeaponSpec {
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Volley for a 1-based level, clamped to the table.
    pub fn pattern_for(&self, level: u32) -> &FiringPattern {
        let index = (level.max(1) as usize - 1).min(self.levels.len().saturating_sub(1));
        &self.levels[index]
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        positive(field, self.fire_interval)?;
        self.projectile.validate(field)?;
        if self.levels.is_empty() {
            return Err(ConfigError::MissingPattern { field });
        }
        self.levels.iter().try_for_each(|p| non_empty_pattern(field, p))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTunables {
    pub basic: WeaponSpec,
    pub spread: WeaponSpec,
    pub laser: WeaponSpec,
    pub homing: WeaponSpec,
}

impl WeaponTunables {
    pub fn get(&self, weapon: WeaponType) -> &WeaponSpec {
        match weapon {
            WeaponType::Basic => &self.basic,
            WeaponType::Spread => &self.spread,
            WeaponType::Laser => &self.laser,
            WeaponType::Homing => &self.homing,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.basic.validate("weapons.basic")?;
        self.spread.validate("weapons.spread")?;
        self.laser.validate("weapons.laser")?;
        self.homing.validate("weapons.homing")
    }
}

impl Default for WeaponTunables {
    fn default() -> Self {
        Self {
            basic: WeaponSpec {
                fire_interval: 0.2,
                projectile: ProjectileProfile::bullet(500.0, 1),
                levels: vec![
                    FiringPattern::single(Fp::straight(1, 0.0, UP)),
                    FiringPattern::single(Fp::straight(2, 20.0, UP)),
                ],
            },
            spread: WeaponSpec {
                fire_interval: 0.3,
                projectile: ProjectileProfile::bullet(450.0, 1),
                levels: vec![
                    FiringPattern::single(Fp::spread(3, 15.0, UP)),
                    FiringPattern::single(Fp::spread(5, 15.0, UP)),
                ],
            },
            laser: WeaponSpec {
                fire_interval: 0.4,
                projectile: ProjectileProfile {
                    speed: 600.0,
                    damage: 2,
                    penetrating: true,
                    hitbox: Hitbox::aabb(4.0, 16.0),
                    tracking_rate: 0.0,
                },
                levels: vec![
                    FiringPattern::single(Fp::straight(1, 0.0, UP)),
                    FiringPattern::single(Fp::straight(2, 24.0, UP)),
                ],
            },
            homing: WeaponSpec {
                fire_interval: 0.5,
                projectile: ProjectileProfile { tracking_rate: 0.05, ..ProjectileProfile::bullet(350.0, 1) },
                levels: vec![
                    FiringPattern::single(Fp::straight(1, 0.0, UP).homing()),
                    FiringPattern::single(Fp::straight(2, 20.0, UP).homing()),
                ],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTunables {
    pub player_pool: usize,
    pub enemy_pool: usize,
    /// Seconds a projectile lives before it is recycled.
    pub lifespan_secs: f32,
}

impl Default for ProjectileTunables {
    fn default() -> Self {
        Self { player_pool: 30, enemy_pool: 50, lifespan_secs: 2.0 }
    }
}

impl ProjectileTunables {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.player_pool == 0 {
            return Err(ConfigError::EmptyPool { pool: "player" });
        }
        if self.enemy_pool == 0 {
            return Err(ConfigError::EmptyPool { pool: "enemy" });
        }
        positive("projectiles.lifespan_secs", self.lifespan_secs)
    }
}

/// Timings the snapshot's visual state is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationTunables {
    /// Flash intensity lost per second after a hit (1.0 is a fresh hit).
    pub hit_flash_decay_per_sec: f32,
}

impl Default for PresentationTunables {
    fn default() -> Self {
        Self { hit_flash_decay_per_sec: 8.0 }
    }
}

impl PresentationTunables {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("presentation.hit_flash_decay_per_sec", self.hit_flash_decay_per_sec)
    }
}

// -----------------------------------------------------------------------------
// Enemy archetypes
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeTunables {
    pub health: i32,
    pub speed: f32,
    pub score: u32,
    pub fire_interval: f32,
    pub drop_chance: f32,
    pub hitbox: Hitbox,
    pub movement: MovementPattern,
    pub firing: FiringPattern,
    pub projectile: ProjectileProfile,
    #[serde(default)]
    pub fire_gate: FireGate,
    /// Non-empty for elites. Phase 0 replaces `movement`/`firing` at spawn.
    #[serde(default)]
    pub phases: Vec<BossPhase>,
}

impl ArchetypeTunables {
    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        positive(name, self.health as f32)?;
        positive(name, self.speed)?;
        positive(name, self.fire_interval)?;
        if let FireGate::LaneAhead { half_width } = self.fire_gate {
            positive(name, half_width)?;
        }
        probability(name, self.drop_chance)?;
        non_empty_pattern(name, &self.firing)?;
        self.projectile.validate(name)?;

        let mut previous = f32::INFINITY;
        for (index, phase) in self.phases.iter().enumerate() {
            let first_ok = index > 0 || phase.health_threshold == 1.0;
            if !first_ok || phase.health_threshold <= 0.0 || phase.health_threshold >= previous {
                return Err(ConfigError::PhaseThresholds { archetype: name, index });
            }
            positive(name, phase.firing_rate_multiplier)?;
            non_empty_pattern(name, &phase.firing)?;
            previous = phase.health_threshold;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    pub basic: ArchetypeTunables,
    pub fast: ArchetypeTunables,
    pub tank: ArchetypeTunables,
    pub mini_boss: ArchetypeTunables,
    pub boss: ArchetypeTunables,
}

impl ArchetypeTable {
    pub fn get(&self, archetype: EnemyArchetype) -> &ArchetypeTunables {
        match archetype {
            EnemyArchetype::Basic => &self.basic,
            EnemyArchetype::Fast => &self.fast,
            EnemyArchetype::Tank => &self.tank,
            EnemyArchetype::MiniBoss => &self.mini_boss,
            EnemyArchetype::Boss => &self.boss,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.basic.validate("archetypes.basic")?;
        self.fast.validate("archetypes.fast")?;
        self.tank.validate("archetypes.tank")?;
        self.mini_boss.validate("archetypes.mini_boss")?;
        self.boss.validate("archetypes.boss")?;
        if self.boss.phases.is_empty() {
            return Err(ConfigError::NoBossPhases { archetype: "archetypes.boss" });
        }
        Ok(())
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        let enemy_bullet = ProjectileProfile::bullet(300.0, 1);

        let mini_boss_circle = MovementPattern::Circle { radius: 100.0, vertical_radius: 50.0, angular_speed: 1.0 };
        let mini_boss_phases = vec![
            BossPhase {
                health_threshold: 1.0,
                movement: mini_boss_circle.clone(),
                firing: FiringPattern::single(Fp::spread(5, 20.0, DOWN)),
                firing_rate_multiplier: 1.0,
            },
            BossPhase {
                health_threshold: 0.5,
                movement: mini_boss_circle.clone(),
                firing: FiringPattern::single(Fp::spiral(8, 45.0, 15.0)),
                firing_rate_multiplier: 0.8,
            },
        ];

        let hover = MovementPattern::Hover { distance: 200.0, angular_speed: 1.0 };
        let hover_fast = MovementPattern::Hover { distance: 200.0, angular_speed: 1.5 };
        let hover_wide = MovementPattern::Hover { distance: 240.0, angular_speed: 1.5 };
        let boss_spiral = Fp::spiral(12, 30.0, 10.0);
        let boss_phases = vec![
            BossPhase {
                health_threshold: 1.0,
                movement: hover.clone(),
                firing: FiringPattern::single(Fp::spread(5, 20.0, DOWN)),
                firing_rate_multiplier: 1.0,
            },
            BossPhase {
                health_threshold: 0.7,
                movement: hover_fast,
                firing: FiringPattern::single(Fp::spread(5, 20.0, DOWN)).with(Fp::aimed(3, 10.0)),
                firing_rate_multiplier: 0.8,
            },
            BossPhase {
                health_threshold: 0.4,
                movement: hover_wide.clone(),
                firing: FiringPattern::single(boss_spiral.clone()),
                firing_rate_multiplier: 0.64,
            },
            BossPhase {
                health_threshold: 0.2,
                movement: hover_wide,
                firing: FiringPattern::single(boss_spiral).with(Fp::scatter(5, 50.0)),
                firing_rate_multiplier: 0.448,
            },
        ];

        Self {
            basic: ArchetypeTunables {
                health: 2,
                speed: 150.0,
                score: 100,
                fire_interval: 2.0,
                drop_chance: 0.2,
                hitbox: Hitbox::circle(16.0),
                movement: MovementPattern::straight_down(),
                firing: FiringPattern::single(Fp::aimed(1, 0.0)),
                projectile: enemy_bullet.clone(),
                fire_gate: FireGate::Always,
                phases: Vec::new(),
            },
            fast: ArchetypeTunables {
                health: 1,
                speed: 250.0,
                score: 150,
                fire_interval: 2.5,
                drop_chance: 0.2,
                hitbox: Hitbox::circle(14.0),
                movement: MovementPattern::Zigzag { interval: 1.0, forward_factor: 0.8 },
                firing: FiringPattern::single(Fp::aimed(1, 0.0)),
                projectile: enemy_bullet.clone(),
                fire_gate: FireGate::Always,
                phases: Vec::new(),
            },
            tank: ArchetypeTunables {
                health: 5,
                speed: 100.0,
                score: 200,
                fire_interval: 3.0,
                drop_chance: 0.2,
                hitbox: Hitbox::circle(22.0),
                movement: MovementPattern::Follow { lateral_factor: 0.5, forward_factor: 0.7 },
                firing: FiringPattern::single(Fp::spread(3, 17.0, DOWN)),
                projectile: enemy_bullet.clone(),
                fire_gate: FireGate::Always,
                phases: Vec::new(),
            },
            mini_boss: ArchetypeTunables {
                health: 30,
                speed: 80.0,
                score: 1000,
                fire_interval: 1.5,
                drop_chance: 1.0,
                hitbox: Hitbox::aabb(40.0, 40.0),
                movement: mini_boss_circle,
                firing: FiringPattern::single(Fp::spread(5, 20.0, DOWN)),
                projectile: enemy_bullet.clone(),
                fire_gate: FireGate::Always,
                phases: mini_boss_phases,
            },
            boss: ArchetypeTunables {
                health: 100,
                speed: 60.0,
                score: 5000,
                fire_interval: 1.0,
                drop_chance: 1.0,
                hitbox: Hitbox::aabb(75.0, 60.0),
                movement: hover,
                firing: FiringPattern::single(Fp::spread(5, 20.0, DOWN)),
                projectile: ProjectileProfile::bullet(300.0, 2),
                fire_gate: FireGate::Always,
                phases: boss_phases,
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Waves
// -----------------------------------------------------------------------------

/// Archetype weights that apply from `from_wave` onward (until a later row takes over).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveWeights {
    pub from_wave: u32,
    #[serde(default)]
    pub basic: f32,
    #[serde(default)]
    pub fast: f32,
    #[serde(default)]
    pub tank: f32,
    #[serde(default)]
    pub mini_boss: f32,
}

impl WaveWeights {
    pub fn table(&self) -> [(EnemyArchetype, f32); 4] {
        [
            (EnemyArchetype::Basic, self.basic),
            (EnemyArchetype::Fast, self.fast),
            (EnemyArchetype::Tank, self.tank),
            (EnemyArchetype::MiniBoss, self.mini_boss),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTunables {
    pub spawn_interval: f32,
    /// Cadence multiplier applied after each cleared wave.
    pub interval_factor: f32,
    pub min_spawn_interval: f32,
    pub boss_countdown_secs: f32,
    pub boss_warning_secs: f32,
    pub clear_bonus: u32,
    pub spawn_y: f32,
    pub spawn_margin: f32,
    /// Elites (boss or anything with phases) appear here instead of at `spawn_y`.
    pub boss_spawn: [f32; 2],
    /// Stop after this many cleared waves. `None` runs forever.
    pub max_waves: Option<u32>,
    pub weights: Vec<WaveWeights>,
}

impl Default for WaveTunables {
    fn default() -> Self {
        Self {
            spawn_interval: 2.0,
            interval_factor: 0.8,
            min_spawn_interval: 0.4,
            boss_countdown_secs: 120.0,
            boss_warning_secs: 3.0,
            clear_bonus: 1000,
            spawn_y: -50.0,
            spawn_margin: 50.0,
            boss_spawn: [400.0, 150.0],
            max_waves: None,
            weights: vec![
                WaveWeights { from_wave: 1, basic: 1.0, fast: 0.0, tank: 0.0, mini_boss: 0.0 },
                WaveWeights { from_wave: 2, basic: 0.7, fast: 0.3, tank: 0.0, mini_boss: 0.0 },
                WaveWeights { from_wave: 3, basic: 0.7, fast: 0.2, tank: 0.1, mini_boss: 0.0 },
            ],
        }
    }
}

impl WaveTunables {
    /// The weight row in force for `wave`.
    pub fn weights_for(&self, wave: u32) -> &WaveWeights {
        self.weights
            .iter()
            .rev()
            .find(|row| row.from_wave <= wave)
            .unwrap_or(&self.weights[0])
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("waves.spawn_interval", self.spawn_interval)?;
        positive("waves.interval_factor", self.interval_factor)?;
        positive("waves.min_spawn_interval", self.min_spawn_interval)?;
        positive("waves.boss_countdown_secs", self.boss_countdown_secs)?;
        positive("waves.boss_warning_secs", self.boss_warning_secs)?;

        let sorted = self.weights.windows(2).all(|w| w[0].from_wave < w[1].from_wave);
        if self.weights.first().map(|row| row.from_wave) != Some(1) || !sorted {
            return Err(ConfigError::WaveTable);
        }
        for row in &self.weights {
            if !row.table().iter().any(|(_, w)| *w > 0.0) {
                return Err(ConfigError::NoPositiveWeight { field: "waves.weights" });
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Pickups
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PickupWeights {
    pub weapon: f32,
    pub shield: f32,
    pub speed: f32,
    pub bomb: f32,
    pub life: f32,
}

impl PickupWeights {
    pub fn table(&self) -> [(PickupKind, f32); 5] {
        [
            (PickupKind::Weapon, self.weapon),
            (PickupKind::Shield, self.shield),
            (PickupKind::Speed, self.speed),
            (PickupKind::Bomb, self.bomb),
            (PickupKind::Life, self.life),
        ]
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.table().iter().any(|(_, w)| *w > 0.0) {
            Ok(())
        } else {
            Err(ConfigError::NoPositiveWeight { field })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTunables {
    pub spawn_interval: f32,
    pub max_active: usize,
    pub fall_speed: f32,
    pub spawn_y: f32,
    pub hitbox: Hitbox,
    /// Kinds for the timed spawner.
    pub periodic: PickupWeights,
    /// Kinds dropped by destroyed enemies.
    pub drops: PickupWeights,
}

impl Default for PickupTunables {
    fn default() -> Self {
        Self {
            spawn_interval: 15.0,
            max_active: 3,
            fall_speed: 100.0,
            spawn_y: -30.0,
            hitbox: Hitbox::circle(15.0),
            periodic: PickupWeights { weapon: 1.0, shield: 1.0, speed: 1.0, bomb: 1.0, life: 1.0 },
            drops: PickupWeights { weapon: 0.6, shield: 0.0, speed: 0.0, bomb: 0.3, life: 0.1 },
        }
    }
}

impl PickupTunables {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("pickups.spawn_interval", self.spawn_interval)?;
        positive("pickups.fall_speed", self.fall_speed)?;
        self.periodic.validate("pickups.periodic")?;
        self.drops.validate("pickups.drops")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Tunables::default().validate().unwrap();
    }

    #[test]
    fn partial_json_overrides_keep_other_defaults() {
        let t = Tunables::from_json_str(r#"{ "waves": { "max_waves": 2, "spawn_interval": 1.0 } }"#).unwrap();
        assert_eq!(t.waves.max_waves, Some(2));
        assert_eq!(t.waves.spawn_interval, 1.0);
        assert_eq!(t.waves.boss_countdown_secs, 120.0);
        assert_eq!(t.player.starting_lives, 3);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Tunables::from_json_str(r#"{ "projectiles": { "enemy_pool": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPool { pool: "enemy" }));

        let err = Tunables::from_json_str(r#"{ "waves": { "spawn_interval": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "waves.spawn_interval", .. }));

        let err = Tunables::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_a_boss_without_phases() {
        let mut t = Tunables::default();
        t.archetypes.boss.phases.clear();
        assert!(matches!(t.validate(), Err(ConfigError::NoBossPhases { archetype: "archetypes.boss" })));

        // Mini-bosses may drop their phases and become plain enemies.
        let mut t = Tunables::default();
        t.archetypes.mini_boss.phases.clear();
        assert!(t.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_archetype_speed() {
        let mut t = Tunables::default();
        t.archetypes.fast.speed = -250.0;
        assert!(matches!(t.validate(), Err(ConfigError::NonPositive { field: "archetypes.fast", .. })));

        let mut t = Tunables::default();
        t.archetypes.tank.speed = 0.0;
        assert!(matches!(t.validate(), Err(ConfigError::NonPositive { field: "archetypes.tank", .. })));
    }

    #[test]
    fn rejects_negative_or_unaffordable_special_cost() {
        let err = Tunables::from_json_str(r#"{ "player": { "special": { "activation_cost": -5.0 } } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Cost { field: "player.special.activation_cost", .. }));

        let err = Tunables::from_json_str(r#"{ "player": { "special": { "activation_cost": 150.0 } } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Cost { budget, .. } if budget == 100.0));

        let free = Tunables::from_json_str(r#"{ "player": { "special": { "activation_cost": 0.0 } } }"#).unwrap();
        assert_eq!(free.player.special.activation_cost, 0.0);
    }

    #[test]
    fn lane_gate_reads_from_json_and_needs_a_width() {
        let t = Tunables::from_json_str(
            r#"{ "archetypes": { "tank": {
                "health": 5, "speed": 100.0, "score": 200, "fire_interval": 3.0, "drop_chance": 0.2,
                "hitbox": { "shape": "circle", "radius": 22.0 },
                "movement": { "kind": "straight", "direction": [0.0, 1.0] },
                "firing": [{ "kind": "straight", "bullet_count": 1 }],
                "projectile": { "speed": 300.0, "damage": 1, "hitbox": { "shape": "circle", "radius": 5.0 } },
                "fire_gate": { "kind": "lane_ahead", "half_width": 30.0 }
            } } }"#,
        )
        .unwrap();
        assert_eq!(t.archetypes.tank.fire_gate, FireGate::LaneAhead { half_width: 30.0 });
        assert_eq!(t.archetypes.basic.fire_gate, FireGate::Always);

        let mut t = Tunables::default();
        t.archetypes.tank.fire_gate = FireGate::LaneAhead { half_width: 0.0 };
        assert!(matches!(t.validate(), Err(ConfigError::NonPositive { field: "archetypes.tank", .. })));
    }

    #[test]
    fn rejects_non_positive_flash_decay() {
        let err = Tunables::from_json_str(r#"{ "presentation": { "hit_flash_decay_per_sec": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "presentation.hit_flash_decay_per_sec", .. }));
    }

    #[test]
    fn rejects_non_decreasing_phase_thresholds() {
        let mut t = Tunables::default();
        t.archetypes.boss.phases[2].health_threshold = 0.9;
        assert!(matches!(
            t.validate(),
            Err(ConfigError::PhaseThresholds { archetype: "archetypes.boss", index: 2 })
        ));
    }

    #[test]
    fn wave_weights_follow_the_latest_row() {
        let waves = WaveTunables::default();
        assert_eq!(waves.weights_for(1).basic, 1.0);
        assert_eq!(waves.weights_for(2).fast, 0.3);
        assert_eq!(waves.weights_for(9).tank, 0.1);
    }

    #[test]
    fn weapon_levels_clamp() {
        let weapons = WeaponTunables::default();
        assert_eq!(weapons.spread.max_level(), 2);
        assert_eq!(weapons.spread.pattern_for(0), &weapons.spread.levels[0]);
        assert_eq!(weapons.spread.pattern_for(7), &weapons.spread.levels[1]);
    }
}
