//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime.
//! - we then call `pyrelight::game::configure_headless` to install gameplay
//!   plugins.

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

use pyrelight::common::state::GameState;

pub fn app_headless() -> App {
    let mut app = App::new();

    // Core ECS + states; AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    pyrelight::game::configure_headless(&mut app);
    app
}

/// Skip the splash screen and settle one frame of gameplay.
#[allow(dead_code)]
pub fn app_in_game() -> App {
    let mut app = app_headless();
    app.update();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    app
}
