//! Buffered spawn requests.
//!
//! Producers create intent; the allocator applies it (pool pop + component
//! writes). A producer -> queue -> consumer pipeline.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnBulletRequest {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
}
