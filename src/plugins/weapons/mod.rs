//! Weapons plugin: message-based producer -> consumer spawning + pooling.
//!
//! # Data flow
//! ```text
//!   Update schedule (variable dt)
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  (A) Aim update (cursor -> world space)                          │
//! │      - writes: Aim { world_cursor: Option<Vec2> }                │
//! │                                                                  │
//! │  (B) Producer: fire_weapons (in the player's fire step)          │
//! │      - ticks each Weapon cooldown, reads held input + Aim        │
//! │      - writes: SpawnBulletRequest message                        │
//! │                                                                  │
//! │  (C) Consumer: allocate_bullets_from_pool                        │
//! │      - pops BulletPool.free, writes bullet components            │
//! └──────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!  FixedPostUpdate (fixed dt)
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  (D) Physics emits CollisionStart messages (Avian)               │
//! │  (E) Resolve: walls return the bullet, enemies take damage       │
//! │  (F) Commit: PendingReturn bullets go back to the pool           │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Producers never borrow `ResMut<BulletPool>`; they only enqueue intent.
//! The allocator is the single writer that mutates the pool. An empty pool
//! drops the request (a capacity decision, not a correctness failure).

pub mod allocator;
pub mod collision;
pub mod commit;
pub mod components;
pub mod messages;
pub mod pool;
pub mod request;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::PlayerStep;

pub struct WeaponsPlugin;

/// Messages are double-buffered; `update()` advances buffers.
fn update_spawn_messages(mut msgs: ResMut<Messages<messages::SpawnBulletRequest>>) {
    msgs.update();
}

impl Plugin for WeaponsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(pool::BulletPool::new(64))
            .insert_resource(components::Aim::default())
            .add_systems(Startup, pool::init_bullet_pool);

        app.init_resource::<Messages<messages::SpawnBulletRequest>>();
        app.add_systems(PostUpdate, update_spawn_messages);

        app.add_systems(OnEnter(GameState::InGame), components::spawn_weapons);

        app.add_systems(
            Update,
            request::update_aim_from_cursor
                .before(PlayerStep::Fire)
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            Update,
            (
                request::fire_weapons.in_set(PlayerStep::Fire),
                allocator::allocate_bullets_from_pool.after(request::fire_weapons),
                collision::expire_bullets,
            )
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedPostUpdate,
            (
                collision::process_bullet_collisions.after(CollisionEventSystems),
                commit::return_to_pool_commit.after(collision::process_bullet_collisions),
            )
                .run_if(in_state(GameState::InGame)),
        );
    }
}

#[cfg(test)]
mod tests;
