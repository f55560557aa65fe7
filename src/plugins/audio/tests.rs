use bevy::prelude::*;

use crate::common::test_utils::{run_system_once, set_time};
use crate::plugins::audio::{tick_levels, AudioCue, AudioLevels, Envelope};

#[test]
fn cue_volumes_match_mix() {
    assert_eq!(AudioCue::EnemyHit.volume(), 0.25);
    assert_eq!(AudioCue::PlayerDeath.volume(), 0.05);
    assert_eq!(AudioCue::Dash.volume(), 0.08);
    assert_eq!(AudioCue::PowerUp.volume(), 0.10);
}

#[test]
fn fade_reaches_target_and_finishes() {
    let mut env = Envelope::new(1.0);
    env.fade_to(0.0, 2.5);
    assert!(env.is_fading());

    // Halfway.
    let mut world = World::new();
    world.insert_resource(AudioLevels {
        background: env,
        darkness: Envelope::new(0.0),
    });
    set_time(&mut world, 1.25, 1.25);
    run_system_once(&mut world, tick_levels);

    let levels = world.resource::<AudioLevels>();
    assert!((levels.background.volume() - 0.5).abs() < 1e-4);

    // Past the end: clamped, fade cleared.
    set_time(&mut world, 3.0, 1.75);
    run_system_once(&mut world, tick_levels);
    let levels = world.resource::<AudioLevels>();
    assert_eq!(levels.background.volume(), 0.0);
    assert!(!levels.background.is_fading());
}

#[test]
fn set_cancels_running_fade() {
    let mut env = Envelope::new(0.0);
    env.fade_to(1.0, 1.0);
    env.set(1.0);
    assert!(!env.is_fading());
    assert_eq!(env.volume(), 1.0);
}

#[test]
fn zero_duration_fade_is_instant() {
    let mut env = Envelope::new(0.7);
    env.fade_to(0.0, 0.0);
    assert_eq!(env.volume(), 0.0);
    assert!(!env.is_fading());
}

#[test]
fn darkness_starts_silent() {
    let levels = AudioLevels::default();
    assert_eq!(levels.darkness.volume(), 0.0);
    assert_eq!(levels.background.volume(), 1.0);
}
