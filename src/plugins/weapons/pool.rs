use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;

use super::components::{Bullet, BulletState, PooledBullet};

#[derive(Resource, Debug)]
pub struct BulletPool {
    pub free: Vec<Entity>,
    pub capacity: usize,
}

impl BulletPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }
}

#[inline]
pub fn active_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [Layer::World, Layer::Enemy])
}

/// "Disabled" without structural changes: empty filters means we collide
/// with nothing.
#[inline]
pub fn inactive_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [] as [Layer; 0])
}

/// Pre-spawn pooled bullets (inactive).
///
/// Physics components stay present; collision layers with empty filters keep
/// inactive bullets out of the narrow phase entirely.
pub fn init_bullet_pool(mut commands: Commands, mut pool: ResMut<BulletPool>) {
    pool.free.clear();
    let cap = pool.capacity;
    pool.free.reserve(cap);

    for _ in 0..cap {
        let e = commands
            .spawn((
                Name::new("Bullet(Pooled)"),
                PooledBullet,
                BulletState::Inactive,
                Bullet::idle(),
                Sprite {
                    color: Color::srgb(1.0, 0.85, 0.3),
                    custom_size: Some(Vec2::splat(0.15)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 2.0),
                Visibility::Hidden,
                RigidBody::Dynamic,
                Collider::circle(0.07),
                inactive_bullet_layers(),
                Friction::ZERO,
                LinearVelocity(Vec2::ZERO),
                // Always on; inactive bullets never collide because their
                // filters are empty.
                CollisionEventsEnabled,
            ))
            .id();

        pool.free.push(e);
    }
}
