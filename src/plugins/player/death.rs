//! Player death and the game-over sequence.
//!
//! Death requests are queued as [`PlayerDied`] messages by the health and
//! darkness checks; the resolve step drains them and starts the timed
//! game-over step list. Each step fires once, at a fixed offset from the
//! moment of death, as a [`GameOverStep`] message other plugins react to.

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::audio::{AudioCue, AudioLevels};
use crate::plugins::core::HealthReserve;
use crate::plugins::weapons::components::Weapon;

use super::{LightExposure, Player, PlayerLife};

/// Queued request to kill the player. Multiple writers per frame collapse
/// into one death.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerDied;

/// One step of the game-over sequence, broadcast when its offset elapses.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverStep {
    FadeBackgroundAudio,
    ExtinguishPyre,
    ShowGameOverText,
    ReturnToSplash,
}

/// Seconds after death at which each step fires, in order.
pub const GAME_OVER_STEPS: [(f32, GameOverStep); 4] = [
    (0.0, GameOverStep::FadeBackgroundAudio),
    (1.0, GameOverStep::ExtinguishPyre),
    (1.5, GameOverStep::ShowGameOverText),
    (3.0, GameOverStep::ReturnToSplash),
];

/// Background track fade-out length once the sequence starts.
pub const BACKGROUND_FADE_SECS: f32 = 2.5;

/// Fade-in length for the game-over text.
pub const GAME_OVER_TEXT_FADE_SECS: f32 = 0.25;

/// Present only while a game-over sequence is running.
#[derive(Resource, Debug, Default)]
pub struct GameOverSequence {
    elapsed: f32,
    next_step: usize,
}

pub fn register_messages(app: &mut App) {
    app.init_resource::<Messages<PlayerDied>>();
    app.init_resource::<Messages<GameOverStep>>();
    app.add_systems(PostUpdate, update_death_messages);
}

fn update_death_messages(
    mut died: ResMut<Messages<PlayerDied>>,
    mut steps: ResMut<Messages<GameOverStep>>,
) {
    died.update();
    steps.update();
}

/// Health exhaustion kills, whatever drained it.
pub fn check_health_death(
    health: Res<HealthReserve>,
    q_life: Query<&PlayerLife, With<Player>>,
    mut died: MessageWriter<PlayerDied>,
) {
    let Ok(life) = q_life.single() else {
        return;
    };
    if life.is_alive() && health.current() <= 0 {
        died.write(PlayerDied);
    }
}

/// Standing in darkness past the grace period costs the whole darkness toll
/// at once, then kills. The toll lands even when health would already have
/// run out this frame.
pub fn check_darkness_death(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut health: ResMut<HealthReserve>,
    q_player: Query<(&PlayerLife, &LightExposure), With<Player>>,
    mut died: MessageWriter<PlayerDied>,
) {
    let Ok((life, exposure)) = q_player.single() else {
        return;
    };
    if !life.is_alive() || exposure.in_light() {
        return;
    }
    if time.elapsed_secs() - exposure.exit_time() < tunables.no_light_grace {
        return;
    }

    for _ in 0..tunables.darkness_toll {
        health.remove();
    }
    died.write(PlayerDied);
}

/// Drain queued deaths; the first one this run takes effect.
pub fn begin_death_sequence(
    mut commands: Commands,
    mut died: MessageReader<PlayerDied>,
    mut q_player: Query<
        (Entity, &mut PlayerLife, &mut LinearVelocity, &mut Sprite),
        With<Player>,
    >,
    mut weapons: Query<&mut Weapon>,
    mut cues: MessageWriter<AudioCue>,
) {
    if died.read().next().is_none() {
        return;
    }
    died.clear();

    let Ok((entity, mut life, mut vel, mut sprite)) = q_player.single_mut() else {
        return;
    };
    if !life.is_alive() {
        return;
    }

    *life = PlayerLife::Dead;
    vel.0 = Vec2::ZERO;
    commands.entity(entity).insert(RigidBody::Static);
    sprite.color = Color::srgb(0.35, 0.3, 0.3);

    for mut weapon in &mut weapons {
        weapon.enabled = false;
    }

    cues.write(AudioCue::PlayerDeath);
    info!("player died");
    commands.insert_resource(GameOverSequence::default());
}

/// Advance the step list by elapsed time. A large frame delta can fire
/// several steps at once, still in order.
pub fn advance_game_over(
    mut commands: Commands,
    time: Res<Time>,
    sequence: Option<ResMut<GameOverSequence>>,
    mut levels: ResMut<AudioLevels>,
    mut steps: MessageWriter<GameOverStep>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut sequence) = sequence else {
        return;
    };
    sequence.elapsed += time.delta_secs();

    while let Some(&(offset, step)) = GAME_OVER_STEPS.get(sequence.next_step) {
        if sequence.elapsed < offset {
            break;
        }
        sequence.next_step += 1;
        steps.write(step);

        match step {
            GameOverStep::FadeBackgroundAudio => {
                levels.background.fade_to(0.0, BACKGROUND_FADE_SECS);
            }
            GameOverStep::ReturnToSplash => {
                next_state.set(GameState::Splash);
                commands.remove_resource::<GameOverSequence>();
            }
            _ => {}
        }
    }
}
