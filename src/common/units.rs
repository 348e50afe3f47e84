//! Small unit newtypes shared by gameplay state.

/// Value normalized to [0..1]. Clamped on write so readers never re-check.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnitF32(f32);

impl UnitF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    #[inline]
    pub fn new_clamped(v: f32) -> Self {
        Self(v.clamp(0.0, 1.0))
    }
    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
    #[inline]
    pub fn decay_to_zero(&mut self, rate_per_sec: f32, dt: f32) {
        self.0 = (self.0 - rate_per_sec * dt).max(0.0);
    }
    #[inline]
    pub fn is_active(self) -> bool {
        self.0 > 0.001
    }
}

/// Simulation seconds left on a timed effect. Never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Countdown(f32);

impl Countdown {
    #[inline]
    pub fn new(v: f32) -> Self {
        Self(v.max(0.0))
    }
    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
    /// Extend to at least `v`; never shortens a running countdown.
    #[inline]
    pub fn set_max(&mut self, v: f32) {
        self.0 = self.0.max(v.max(0.0));
    }
    #[inline]
    pub fn tick_down(&mut self, dt: f32) {
        self.0 = (self.0 - dt).max(0.0);
    }
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}
