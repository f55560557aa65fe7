use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::tunables::Tunables;
use crate::plugins::audio::AudioCue;
use crate::plugins::core::{ScoreBoard, ScorePopup};
use crate::plugins::enemies::{ImpactRequest, Vitality};

use super::components::{Bullet, BulletState, PooledBullet};

/// Surviving enemies get shoved along the bullet's travel direction.
const HIT_KNOCKBACK: f32 = 4.0;

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget {
            collider: ev.collider1,
            body: ev.body1,
        },
        CollisionTarget {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

#[inline]
fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

pub fn process_bullet_collisions(
    tunables: Res<Tunables>,
    mut started: MessageReader<CollisionStart>,
    // Fast "is this a pooled bullet?" check
    q_is_bullet: Query<(), With<PooledBullet>>,
    mut q_bullets: Query<(&Bullet, &mut BulletState, &LinearVelocity), With<PooledBullet>>,
    q_layers: Query<&CollisionLayers>,
    mut q_enemies: Query<(&mut Vitality, &Transform)>,
    mut board: ResMut<ScoreBoard>,
    mut impacts: MessageWriter<ImpactRequest>,
    mut popups: MessageWriter<ScorePopup>,
    mut cues: MessageWriter<AudioCue>,
    // Per-frame dedupe
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (t1, t2) = targets(ev);

        // Identify the bullet side without get_mut probing
        let b1 = q_is_bullet.contains(t1.collider);
        let b2 = q_is_bullet.contains(t2.collider);
        if !(b1 ^ b2) {
            continue; // must be exactly one bullet
        }
        let (bullet_side, other_side) = if b1 { (t1, t2) } else { (t2, t1) };

        // Deduplicate per bullet collider
        if !seen.insert(bullet_side.collider) {
            continue;
        }

        let Ok(other_layers) = q_layers.get(other_side.collider) else {
            continue;
        };

        let Ok((bullet, mut state, vel)) = q_bullets.get_mut(bullet_side.collider) else {
            continue;
        };
        if *state != BulletState::Active {
            continue;
        }

        // WORLD: spent on the wall
        if is_in_layer(other_layers, Layer::World) {
            *state = BulletState::PendingReturn;
            continue;
        }

        // ENEMY: damage, then either a kill award or knockback
        if is_in_layer(other_layers, Layer::Enemy) {
            let enemy = other_side.gameplay_owner();
            let Ok((mut vitality, tf)) = q_enemies.get_mut(enemy) else {
                *state = BulletState::PendingReturn;
                continue;
            };

            if vitality.take_damage(bullet.damage) {
                board.add(tunables.kill_score, 1);
                popups.write(ScorePopup {
                    amount: tunables.kill_score,
                    multiplier: 1,
                    label: "- KILL",
                    world_pos: tf.translation.truncate(),
                });
            } else {
                impacts.write(ImpactRequest {
                    enemy,
                    force: vel.0.normalize_or(Vec2::Y) * HIT_KNOCKBACK,
                });
            }

            cues.write(AudioCue::EnemyHit);
            *state = BulletState::PendingReturn;
        }
    }
}

/// Unspent bullets return to the pool when their flight time runs out.
pub fn expire_bullets(
    time: Res<Time>,
    mut q_bullets: Query<(&mut Bullet, &mut BulletState), With<PooledBullet>>,
) {
    for (mut bullet, mut state) in &mut q_bullets {
        if *state != BulletState::Active {
            continue;
        }
        bullet.ttl.tick(time.delta());
        if bullet.ttl.is_finished() {
            *state = BulletState::PendingReturn;
        }
    }
}
