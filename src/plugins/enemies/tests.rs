use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::{run_system_once, set_time};
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{
    apply_impacts, respawn_enemies, Enemy, ImpactRequest, RespawnTimer, Vitality,
};
use crate::plugins::fx::SpawnEffectRequest;
use avian2d::prelude::LinearVelocity;

#[test]
fn damage_latches_death_once() {
    let mut v = Vitality::new(1.0);
    assert!(!v.is_dead());

    // The killing blow reports true; anything after is a no-op.
    assert!(v.take_damage(1.0));
    assert!(v.is_dead());
    assert!(!v.take_damage(5.0));
}

#[test]
fn partial_damage_does_not_kill() {
    let mut v = Vitality::new(2.0);
    assert!(!v.take_damage(1.0));
    assert!(!v.is_dead());
    assert!(v.take_damage(1.0));
}

#[test]
fn zero_damage_is_harmless() {
    let mut v = Vitality::new(1.0);
    assert!(!v.take_damage(0.0));
    assert!(!v.is_dead());
}

#[test]
fn impacts_knock_back_living_enemies_only() {
    let mut world = World::new();
    world.init_resource::<Messages<ImpactRequest>>();
    world.init_resource::<Messages<SpawnEffectRequest>>();

    let alive = world
        .spawn((
            Enemy,
            Vitality::new(1.0),
            Transform::default(),
            LinearVelocity::ZERO,
        ))
        .id();
    let mut dead_vitality = Vitality::new(1.0);
    dead_vitality.take_damage(1.0);
    let dead = world
        .spawn((Enemy, dead_vitality, Transform::default(), LinearVelocity::ZERO))
        .id();

    world.write_message(ImpactRequest { enemy: alive, force: Vec2::new(20.0, 0.0) });
    world.write_message(ImpactRequest { enemy: dead, force: Vec2::new(20.0, 0.0) });

    run_system_once(&mut world, apply_impacts);

    assert_eq!(world.get::<LinearVelocity>(alive).unwrap().0.x, 20.0);
    assert_eq!(world.get::<LinearVelocity>(dead).unwrap().0, Vec2::ZERO);

    // One blood spray, for the enemy that actually took the hit.
    assert_eq!(world.resource::<Messages<SpawnEffectRequest>>().len(), 1);
}

fn enemy_count(world: &mut World) -> usize {
    world.query::<&Enemy>().iter(world).count()
}

#[test]
fn respawn_refills_below_the_target() {
    let mut world = World::new();
    let tunables = Tunables::default();
    world.insert_resource(RespawnTimer::new(tunables.enemy_respawn_secs));
    world.insert_resource(tunables);

    // Population exhausted (all deposited or killed): one replacement per
    // timer tick.
    set_time(&mut world, 4.0, 4.0);
    run_system_once(&mut world, respawn_enemies);
    assert_eq!(enemy_count(&mut world), 1);

    set_time(&mut world, 8.0, 4.0);
    run_system_once(&mut world, respawn_enemies);
    assert_eq!(enemy_count(&mut world), 2);
}

#[test]
fn respawn_waits_out_the_timer() {
    let mut world = World::new();
    let tunables = Tunables::default();
    world.insert_resource(RespawnTimer::new(tunables.enemy_respawn_secs));
    world.insert_resource(tunables);

    set_time(&mut world, 1.0, 1.0);
    run_system_once(&mut world, respawn_enemies);
    assert_eq!(enemy_count(&mut world), 0);
}

#[test]
fn respawn_holds_at_the_target_population() {
    let mut world = World::new();
    let tunables = Tunables::default();
    world.insert_resource(RespawnTimer::new(tunables.enemy_respawn_secs));
    for _ in 0..tunables.enemy_target_count {
        world.spawn(Enemy);
    }
    world.insert_resource(tunables);

    set_time(&mut world, 4.0, 4.0);
    run_system_once(&mut world, respawn_enemies);
    assert_eq!(
        enemy_count(&mut world),
        Tunables::default().enemy_target_count
    );
}
