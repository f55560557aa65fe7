//! Weapons plugin tests — deterministic.
//!
//! These tests avoid relying on the full physics pipeline to generate
//! collisions. Instead, they inject `CollisionStart` messages directly and
//! then run the collision system once.

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;
use std::time::Duration;

use crate::common::layers::Layer;
use crate::common::test_utils::{run_system_once, set_time};
use crate::common::tunables::Tunables;
use crate::plugins::audio::AudioCue;
use crate::plugins::core::{ScoreBoard, ScorePopup};
use crate::plugins::enemies::{ImpactRequest, Vitality};

use super::components::{Bullet, BulletState, PooledBullet, Weapon, WeaponKind};
use super::messages::SpawnBulletRequest;
use super::{allocator, collision, commit, pool};

// --------------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------------

fn collision_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(ScoreBoard::default());
    world.init_resource::<Messages<CollisionStart>>();
    world.init_resource::<Messages<ImpactRequest>>();
    world.init_resource::<Messages<ScorePopup>>();
    world.init_resource::<Messages<AudioCue>>();
    world
}

fn spawn_active_bullet(world: &mut World, damage: f32) -> Entity {
    world
        .spawn((
            PooledBullet,
            BulletState::Active,
            Bullet {
                damage,
                ttl: Timer::from_seconds(Bullet::LIFETIME_SECS, TimerMode::Once),
            },
            LinearVelocity(Vec2::new(9.0, 0.0)),
            pool::active_bullet_layers(),
        ))
        .id()
}

fn write_collision_start(world: &mut World, bullet: Entity, other: Entity) {
    world.write_message(CollisionStart {
        collider1: bullet,
        collider2: other,
        body1: Some(bullet),
        body2: Some(other),
    });
}

// --------------------------------------------------------------------------
// Pooling
// --------------------------------------------------------------------------

#[test]
fn init_bullet_pool_spawns_capacity_bullets_inactive() {
    let mut world = World::new();
    world.insert_resource(pool::BulletPool::new(8));

    run_system_once(&mut world, pool::init_bullet_pool);

    let pool_res = world.resource::<pool::BulletPool>();
    assert_eq!(pool_res.free.len(), 8);

    let count = world.query::<&PooledBullet>().iter(&world).count();
    assert_eq!(count, 8);

    let mut q =
        world.query_filtered::<(&BulletState, &Visibility, &CollisionLayers), With<PooledBullet>>();
    for (state, vis, layers) in q.iter(&world) {
        assert_eq!(*state, BulletState::Inactive);
        assert_eq!(*vis, Visibility::Hidden);
        assert!(layers.memberships.has_all(Layer::PlayerBullet));
        // Inactive bullets collide with nothing
        assert!(!layers.filters.has_all(Layer::World));
        assert!(!layers.filters.has_all(Layer::Enemy));
    }
}

#[test]
fn allocator_activates_one_bullet_per_request() {
    let mut world = World::new();
    world.insert_resource(pool::BulletPool::new(2));
    world.init_resource::<Messages<SpawnBulletRequest>>();

    run_system_once(&mut world, pool::init_bullet_pool);

    world.write_message(SpawnBulletRequest {
        pos: Vec2::new(1.0, 2.0),
        vel: Vec2::new(9.0, 0.0),
        damage: 2.0,
    });

    run_system_once(&mut world, allocator::allocate_bullets_from_pool);

    assert_eq!(world.resource::<pool::BulletPool>().free.len(), 1);

    let mut q = world.query::<(&BulletState, &Bullet, &Transform, &LinearVelocity, &Visibility)>();
    let active: Vec<_> = q
        .iter(&world)
        .filter(|(state, ..)| **state == BulletState::Active)
        .collect();
    assert_eq!(active.len(), 1);

    let (_, bullet, tf, vel, vis) = active[0];
    assert_eq!(bullet.damage, 2.0);
    assert_eq!(tf.translation.truncate(), Vec2::new(1.0, 2.0));
    assert_eq!(vel.0, Vec2::new(9.0, 0.0));
    assert_eq!(*vis, Visibility::Visible);
}

#[test]
fn empty_pool_drops_requests() {
    let mut world = World::new();
    world.insert_resource(pool::BulletPool::new(0));
    world.init_resource::<Messages<SpawnBulletRequest>>();

    run_system_once(&mut world, pool::init_bullet_pool);
    world.write_message(SpawnBulletRequest {
        pos: Vec2::ZERO,
        vel: Vec2::Y,
        damage: 1.0,
    });

    // Must not panic; the request is simply dropped.
    run_system_once(&mut world, allocator::allocate_bullets_from_pool);
}

#[test]
fn return_to_pool_commit_deactivates_and_recycles() {
    let mut world = World::new();
    world.insert_resource(pool::BulletPool::new(1));
    world.init_resource::<Messages<SpawnBulletRequest>>();

    run_system_once(&mut world, pool::init_bullet_pool);
    world.write_message(SpawnBulletRequest {
        pos: Vec2::ZERO,
        vel: Vec2::new(9.0, 0.0),
        damage: 1.0,
    });
    run_system_once(&mut world, allocator::allocate_bullets_from_pool);
    assert!(world.resource::<pool::BulletPool>().free.is_empty());

    let e = world
        .query_filtered::<Entity, With<PooledBullet>>()
        .single(&world)
        .unwrap();
    *world.get_mut::<BulletState>(e).unwrap() = BulletState::PendingReturn;

    run_system_once(&mut world, commit::return_to_pool_commit);

    assert_eq!(*world.get::<BulletState>(e).unwrap(), BulletState::Inactive);
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Hidden);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);
    let layers = world.get::<CollisionLayers>(e).unwrap();
    assert!(!layers.filters.has_all(Layer::World));
    assert_eq!(world.resource::<pool::BulletPool>().free.len(), 1);
}

// --------------------------------------------------------------------------
// Collision resolution (injected CollisionStart messages)
// --------------------------------------------------------------------------

#[test]
fn wall_hit_returns_the_bullet() {
    let mut world = collision_world();
    let bullet = spawn_active_bullet(&mut world, 1.0);
    let wall = world
        .spawn(CollisionLayers::new(Layer::World, [Layer::PlayerBullet]))
        .id();

    write_collision_start(&mut world, bullet, wall);
    run_system_once(&mut world, collision::process_bullet_collisions);

    assert_eq!(
        *world.get::<BulletState>(bullet).unwrap(),
        BulletState::PendingReturn
    );
}

#[test]
fn killing_blow_awards_score_and_a_popup() {
    let mut world = collision_world();
    let bullet = spawn_active_bullet(&mut world, 1.0);
    let enemy = world
        .spawn((
            CollisionLayers::new(Layer::Enemy, [Layer::PlayerBullet]),
            Vitality::new(1.0),
            Transform::from_xyz(3.0, 0.0, 1.0),
        ))
        .id();

    write_collision_start(&mut world, bullet, enemy);
    run_system_once(&mut world, collision::process_bullet_collisions);

    assert!(world.get::<Vitality>(enemy).unwrap().is_dead());
    assert_eq!(world.resource::<ScoreBoard>().score(), 10);
    assert_eq!(world.resource::<Messages<ScorePopup>>().len(), 1);
    assert_eq!(world.resource::<Messages<AudioCue>>().len(), 1);
    assert_eq!(
        *world.get::<BulletState>(bullet).unwrap(),
        BulletState::PendingReturn
    );
    // A kill is not also a knockback.
    assert!(world.resource::<Messages<ImpactRequest>>().is_empty());
}

#[test]
fn surviving_enemy_is_knocked_back_without_score() {
    let mut world = collision_world();
    let bullet = spawn_active_bullet(&mut world, 1.0);
    let enemy = world
        .spawn((
            CollisionLayers::new(Layer::Enemy, [Layer::PlayerBullet]),
            Vitality::new(2.0),
            Transform::default(),
        ))
        .id();

    write_collision_start(&mut world, bullet, enemy);
    run_system_once(&mut world, collision::process_bullet_collisions);

    assert!(!world.get::<Vitality>(enemy).unwrap().is_dead());
    assert_eq!(world.resource::<ScoreBoard>().score(), 0);
    assert_eq!(world.resource::<Messages<ImpactRequest>>().len(), 1);
}

#[test]
fn inactive_bullets_ignore_collisions() {
    let mut world = collision_world();
    let bullet = spawn_active_bullet(&mut world, 1.0);
    *world.get_mut::<BulletState>(bullet).unwrap() = BulletState::Inactive;
    let wall = world
        .spawn(CollisionLayers::new(Layer::World, [Layer::PlayerBullet]))
        .id();

    write_collision_start(&mut world, bullet, wall);
    run_system_once(&mut world, collision::process_bullet_collisions);

    assert_eq!(*world.get::<BulletState>(bullet).unwrap(), BulletState::Inactive);
}

#[test]
fn bullets_expire_after_their_flight_time() {
    let mut world = World::new();
    let bullet = spawn_active_bullet(&mut world, 1.0);

    set_time(&mut world, 1.0, 1.0);
    run_system_once(&mut world, collision::expire_bullets);
    assert_eq!(*world.get::<BulletState>(bullet).unwrap(), BulletState::Active);

    set_time(&mut world, 2.5, 1.5);
    run_system_once(&mut world, collision::expire_bullets);
    assert_eq!(
        *world.get::<BulletState>(bullet).unwrap(),
        BulletState::PendingReturn
    );
}

// --------------------------------------------------------------------------
// Weapon cooldowns
// --------------------------------------------------------------------------

#[test]
fn weapon_fires_immediately_then_waits_out_the_cooldown() {
    let mut w = Weapon::new(WeaponKind::Primary, 1.0, true);

    assert!(w.tick_and_fire(Duration::from_millis(16), true));
    assert!(!w.tick_and_fire(Duration::from_millis(500), true));
    assert!(w.tick_and_fire(Duration::from_millis(500), true));
}

#[test]
fn cooldown_runs_while_the_trigger_is_released() {
    let mut w = Weapon::new(WeaponKind::Primary, 1.0, true);
    assert!(w.tick_and_fire(Duration::from_millis(16), true));

    // Held released during the whole cooldown; the next press fires at once.
    assert!(!w.tick_and_fire(Duration::from_secs(1), false));
    assert!(w.tick_and_fire(Duration::from_millis(16), true));
}

#[test]
fn disabled_weapon_never_fires() {
    let mut w = Weapon::new(WeaponKind::Ember, 1.0, false);
    assert!(!w.tick_and_fire(Duration::from_secs(5), true));

    w.enabled = true;
    assert!(w.tick_and_fire(Duration::from_millis(16), true));
}

#[test]
fn cooldown_change_applies_from_the_next_shot() {
    let mut w = Weapon::new(WeaponKind::Primary, 1.0, true);
    assert!(w.tick_and_fire(Duration::from_millis(16), true));

    w.set_cooldown(0.5);
    // The running cooldown keeps its old 1.0 s duration.
    assert!(!w.tick_and_fire(Duration::from_millis(600), true));
    assert!(w.tick_and_fire(Duration::from_millis(400), true));
    // The new 0.5 s cooldown is in effect now.
    assert!(w.tick_and_fire(Duration::from_millis(500), true));
}
