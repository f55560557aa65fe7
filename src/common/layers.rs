//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    PlayerBullet,
    Pyre,
    LightZone,
    /// The player's interaction sensor. Overlaps enemies, pyres and light
    /// zones without pushing anything around.
    Reach,
}
