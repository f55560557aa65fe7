use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::core::{self, HealthReserve, ScoreBoard, SuperCounter};

#[test]
fn inserts_resources() {
    let mut app = App::new();
    core::plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());
    assert!(app.world().get_resource::<ClearColor>().is_some());
    assert!(app.world().get_resource::<HealthReserve>().is_some());
    assert!(app.world().get_resource::<ScoreBoard>().is_some());

    let counter = app.world().resource::<SuperCounter>();
    assert_eq!(counter.0, app.world().resource::<Tunables>().super_counter_start);
}

#[test]
fn health_reserve_clamps_at_max_only() {
    let mut health = HealthReserve::new(7, 8);
    health.add();
    health.add();
    assert_eq!(health.current(), 8);

    for _ in 0..10 {
        health.remove();
    }
    // The reserve may go negative; death handling reads `<= 0`.
    assert!(health.current() <= 0);
}

#[test]
fn score_multiplier_never_zeroes_the_award() {
    let mut board = ScoreBoard::default();
    board.add(100, 0);
    assert_eq!(board.score(), 100);
    board.add(100, 3);
    assert_eq!(board.score(), 400);
}
