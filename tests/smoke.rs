mod common;

use bevy::prelude::*;
use pyrelight::common::state::GameState;
use pyrelight::plugins::core::{HealthReserve, ScoreBoard, SuperCounter};
use pyrelight::plugins::player::Player;
use pyrelight::plugins::world::Pyre;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }
}

#[test]
fn entering_the_game_spawns_the_scene() {
    let mut app = common::app_in_game();

    for _ in 0..5 {
        app.update();
    }

    let players = app
        .world_mut()
        .query::<&Player>()
        .iter(app.world())
        .count();
    assert_eq!(players, 1);

    let pyres = app.world_mut().query::<&Pyre>().iter(app.world()).count();
    assert_eq!(pyres, 1);

    let enemies = app
        .world_mut()
        .query::<&pyrelight::plugins::enemies::Enemy>()
        .iter(app.world())
        .count();
    assert_eq!(enemies, 4);
}

#[test]
fn core_resources_are_available() {
    let app = common::app_headless();

    assert_eq!(app.world().resource::<HealthReserve>().current(), 5);
    assert_eq!(app.world().resource::<ScoreBoard>().score(), 0);
    assert_eq!(app.world().resource::<SuperCounter>().0, 10);
}

#[test]
fn leaving_the_game_clears_the_scene() {
    let mut app = common::app_in_game();
    for _ in 0..3 {
        app.update();
    }

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Splash);
    app.update();

    let players = app
        .world_mut()
        .query::<&Player>()
        .iter(app.world())
        .count();
    assert_eq!(players, 0);
    let pyres = app.world_mut().query::<&Pyre>().iter(app.world()).count();
    assert_eq!(pyres, 0);
}
