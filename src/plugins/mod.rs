//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::weapons::WeaponsPlugin;

pub mod audio;
pub mod core;
pub mod enemies;
pub mod fx;
pub mod physics;
pub mod player;
pub mod splash;
pub mod ui;
pub mod weapons;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    audio::plugin(app);
    world::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    fx::plugin(app);
    splash::plugin(app);
    ui::plugin(app);
    app.add_plugins(WeaponsPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    audio::register_output(app);
}
