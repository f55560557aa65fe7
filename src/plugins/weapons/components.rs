use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;

/// Marker for pre-spawned pool members; never added or removed at runtime.
#[derive(Component)]
pub struct PooledBullet;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub damage: f32,
    pub ttl: Timer,
}

impl Bullet {
    /// Flight time before an unspent bullet returns to the pool.
    pub const LIFETIME_SECS: f32 = 2.0;

    pub fn idle() -> Self {
        Self {
            damage: 0.0,
            ttl: Timer::from_seconds(Self::LIFETIME_SECS, TimerMode::Once),
        }
    }

    #[inline]
    pub fn reset_for_fire(&mut self, damage: f32) {
        self.damage = damage;
        self.ttl = Timer::from_seconds(Self::LIFETIME_SECS, TimerMode::Once);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    Primary,
    Ember,
}

impl WeaponKind {
    pub fn damage(self) -> f32 {
        match self {
            Self::Primary => 1.0,
            Self::Ember => 2.0,
        }
    }
}

/// A weapon entity: a cooldown timer plus an enable flag.
///
/// The timer runs whether or not the trigger is held, so releasing and
/// re-pressing never shortens the cooldown. Cooldown changes apply from the
/// next shot; a running cooldown keeps its old duration.
#[derive(Component, Debug)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub enabled: bool,
    cooldown: f32,
    timer: Timer,
}

impl Weapon {
    pub fn new(kind: WeaponKind, cooldown: f32, enabled: bool) -> Self {
        let mut timer = Timer::from_seconds(cooldown, TimerMode::Once);
        // Ready immediately.
        let full = timer.duration();
        timer.tick(full);
        Self { kind, enabled, cooldown, timer }
    }

    pub fn set_cooldown(&mut self, secs: f32) {
        self.cooldown = secs;
    }

    /// Tick the cooldown; returns true when a held trigger may fire, and
    /// restarts the cooldown when it does.
    pub fn tick_and_fire(&mut self, delta: std::time::Duration, trigger_held: bool) -> bool {
        self.timer.tick(delta);
        if !self.enabled || !trigger_held || !self.timer.is_finished() {
            return false;
        }
        self.timer = Timer::from_seconds(self.cooldown, TimerMode::Once);
        true
    }
}

/// Last known cursor position in world space; None while the cursor is
/// outside the window.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Aim {
    pub world_cursor: Option<Vec2>,
}

/// The primary weapon starts live; the ember weapon only fires during super
/// mode.
pub fn spawn_weapons(mut commands: Commands, tunables: Res<Tunables>) {
    commands.spawn((
        Name::new("WeaponPrimary"),
        Weapon::new(WeaponKind::Primary, tunables.primary_cooldown, true),
        DespawnOnExit(GameState::InGame),
    ));
    commands.spawn((
        Name::new("WeaponEmber"),
        Weapon::new(WeaponKind::Ember, tunables.ember_cooldown, false),
        DespawnOnExit(GameState::InGame),
    ));
}
