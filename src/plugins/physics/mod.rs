use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let ppu = app.world().resource::<Tunables>().pixels_per_unit;
    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppu));
    app.insert_resource(Gravity(Vec2::ZERO));
}
