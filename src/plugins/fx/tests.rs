use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::{run_system_once, set_time};

use super::{
    allocate_effects, expire_effects, init_effect_pool, EffectKind, EffectPool, EffectState,
    PooledEffect, SpawnEffectRequest,
};

fn pool_world(capacity: usize) -> World {
    let mut world = World::new();
    world.insert_resource(EffectPool {
        free: Vec::with_capacity(capacity),
        capacity,
    });
    world.init_resource::<Messages<SpawnEffectRequest>>();
    run_system_once(&mut world, init_effect_pool);
    world
}

#[test]
fn pool_starts_full_and_hidden() {
    let mut world = pool_world(4);

    assert_eq!(world.resource::<EffectPool>().free.len(), 4);

    let mut q = world.query_filtered::<(&EffectState, &Visibility), With<PooledEffect>>();
    for (state, vis) in q.iter(&world) {
        assert_eq!(*state, EffectState::Inactive);
        assert_eq!(*vis, Visibility::Hidden);
    }
}

#[test]
fn allocation_dresses_and_places_the_effect() {
    let mut world = pool_world(1);

    world.write_message(SpawnEffectRequest {
        kind: EffectKind::DashSmoke,
        pos: Vec2::new(2.0, 1.0),
        dir: Vec2::X,
    });
    run_system_once(&mut world, allocate_effects);

    assert!(world.resource::<EffectPool>().free.is_empty());

    let mut q = world.query_filtered::<(&EffectState, &Transform, &Visibility), With<PooledEffect>>();
    let (state, tf, vis) = q.single(&world).unwrap();
    assert_eq!(*state, EffectState::Active);
    assert_eq!(tf.translation.truncate(), Vec2::new(2.0, 1.0));
    assert_eq!(*vis, Visibility::Visible);
}

#[test]
fn requests_beyond_capacity_are_dropped() {
    let mut world = pool_world(1);

    for _ in 0..3 {
        world.write_message(SpawnEffectRequest {
            kind: EffectKind::BloodSpray,
            pos: Vec2::ZERO,
            dir: Vec2::Y,
        });
    }
    run_system_once(&mut world, allocate_effects);

    let mut q = world.query::<&EffectState>();
    let active = q
        .iter(&world)
        .filter(|s| **s == EffectState::Active)
        .count();
    assert_eq!(active, 1);
}

#[test]
fn expired_effects_return_to_the_pool() {
    let mut world = pool_world(1);

    world.write_message(SpawnEffectRequest {
        kind: EffectKind::BloodSpray,
        pos: Vec2::ZERO,
        dir: Vec2::Y,
    });
    run_system_once(&mut world, allocate_effects);

    set_time(&mut world, 0.5, 0.5);
    run_system_once(&mut world, expire_effects);

    assert_eq!(world.resource::<EffectPool>().free.len(), 1);
    let mut q = world.query_filtered::<(&EffectState, &Visibility), With<PooledEffect>>();
    let (state, vis) = q.single(&world).unwrap();
    assert_eq!(*state, EffectState::Inactive);
    assert_eq!(*vis, Visibility::Hidden);
}
