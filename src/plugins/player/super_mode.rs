//! Super mode: a temporary buff with a fixed duration and reversible stat
//! changes.
//!
//! The shared counter reaching zero triggers activation; an explicit `active`
//! guard prevents retriggering while the buff runs, and the counter is reset
//! to its starting value when the buff ends.

use bevy::prelude::*;
use rand::Rng;

use crate::common::tunables::Tunables;
use crate::plugins::audio::AudioCue;
use crate::plugins::core::{HealthReserve, ScoreBoard, ScorePopup, SuperCounter};
use crate::plugins::enemies::{Carried, Enemy, ImpactRequest, Vitality};
use crate::plugins::weapons::components::{Weapon, WeaponKind};
use crate::plugins::world::Pyre;

use super::{Player, PlayerLife, SuperVisual};

#[derive(Resource, Debug, Default)]
pub struct SuperMode {
    active: bool,
    timer: Timer,
}

impl SuperMode {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// (acceleration, speed cap) for the current mode.
    pub fn movement(&self, tunables: &Tunables) -> (f32, f32) {
        if self.active {
            (tunables.move_accel_super, tunables.max_speed_super)
        } else {
            (tunables.move_accel, tunables.max_speed)
        }
    }

    fn activate(&mut self, duration: f32) {
        self.active = true;
        self.timer = Timer::from_seconds(duration, TimerMode::Once);
    }
}

/// Activation, with every effect the buff applies:
/// heal, free pyre fuel, scene-wide knockback + chip damage, a score award at
/// the nearest surviving enemy, weapon cooldown cuts, the second weapon, and
/// raised movement caps (read from [`SuperMode`] by the movement system).
pub fn check_super_trigger(
    tunables: Res<Tunables>,
    counter: Res<SuperCounter>,
    mut mode: ResMut<SuperMode>,
    mut health: ResMut<HealthReserve>,
    mut board: ResMut<ScoreBoard>,
    q_player: Query<(&Transform, &PlayerLife), (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<
        (Entity, &Transform, &mut Vitality),
        (With<Enemy>, Without<Player>, Without<Carried>),
    >,
    mut q_pyre: Query<&mut Pyre>,
    mut q_visual: Query<&mut Visibility, With<SuperVisual>>,
    mut weapons: Query<&mut Weapon>,
    mut impacts: MessageWriter<ImpactRequest>,
    mut popups: MessageWriter<ScorePopup>,
    mut cues: MessageWriter<AudioCue>,
) {
    if counter.0 > 0 || mode.is_active() {
        return;
    }
    let Ok((player_tf, life)) = q_player.single() else {
        return;
    };
    if !life.is_alive() {
        return;
    }

    mode.activate(tunables.super_duration);
    let player_pos = player_tf.translation.truncate();

    for _ in 0..tunables.super_heal {
        health.add();
    }

    // Fuel without consuming a carried enemy.
    for mut pyre in &mut q_pyre {
        pyre.add_fuel();
    }

    // Knock back and chip every enabled enemy; remember the nearest survivor
    // for the score award.
    let mut rng = rand::thread_rng();
    let mut enemy_count: u32 = 0;
    let mut closest: Option<(Vec2, f32)> = None;

    for (entity, tf, mut vitality) in &mut q_enemies {
        if vitality.is_dead() {
            continue;
        }
        enemy_count += 1;

        let enemy_pos = tf.translation.truncate();
        let away = (enemy_pos - player_pos).normalize_or(Vec2::Y);
        impacts.write(ImpactRequest {
            enemy: entity,
            force: away * tunables.super_knockback,
        });

        vitality.take_damage(rng.gen_range(0..2) as f32);
        if vitality.is_dead() {
            continue;
        }

        let distance = enemy_pos.distance(player_pos);
        if closest.is_none_or(|(_, best)| distance < best) {
            closest = Some((enemy_pos, distance));
        }
    }

    if let Some((pos, _)) = closest {
        board.add(tunables.super_score, enemy_count);
        popups.write(ScorePopup {
            amount: tunables.super_score,
            multiplier: enemy_count,
            label: "- SLAYER",
            world_pos: pos,
        });
    }

    for mut weapon in &mut weapons {
        match weapon.kind {
            WeaponKind::Primary => weapon.set_cooldown(tunables.primary_cooldown_super),
            WeaponKind::Ember => {
                weapon.set_cooldown(tunables.ember_cooldown_super);
                weapon.enabled = true;
            }
        }
    }

    if let Ok(mut visual) = q_visual.single_mut() {
        *visual = Visibility::Visible;
    }

    cues.write(AudioCue::PowerUp);
}

/// Scheduled deactivation. The `active` guard means the revert runs exactly
/// once per activation.
pub fn tick_super_mode(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut mode: ResMut<SuperMode>,
    mut counter: ResMut<SuperCounter>,
    mut q_visual: Query<&mut Visibility, With<SuperVisual>>,
    mut weapons: Query<&mut Weapon>,
) {
    if !mode.active {
        return;
    }
    mode.timer.tick(time.delta());
    if !mode.timer.is_finished() {
        return;
    }

    mode.active = false;
    counter.0 = tunables.super_counter_start;

    for mut weapon in &mut weapons {
        match weapon.kind {
            WeaponKind::Primary => weapon.set_cooldown(tunables.primary_cooldown),
            WeaponKind::Ember => {
                weapon.set_cooldown(tunables.ember_cooldown);
                weapon.enabled = false;
            }
        }
    }

    if let Ok(mut visual) = q_visual.single_mut() {
        *visual = Visibility::Hidden;
    }
}
