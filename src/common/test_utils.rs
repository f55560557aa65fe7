//! Test helpers.
//!
//! Bevy provides `World::run_system_once` (via the `RunSystemOnce` trait) for quickly
//! executing a system in tests without building a full schedule.
//!
//! Systems that use `Commands` enqueue structural changes; applying them is normally
//! handled by schedule boundaries. We call `world.flush()` after running so queued
//! commands are applied before assertions.

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;
use std::time::Duration;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Insert (or replace) a `Time` resource whose clock reads `elapsed` with a
/// `dt` delta for the next system run.
pub fn set_time(world: &mut World, elapsed: f32, dt: f32) {
    let mut t: Time = Time::default();
    let lead = (elapsed - dt).max(0.0);
    if lead > 0.0 {
        t.advance_by(Duration::from_secs_f32(lead));
    }
    t.advance_by(Duration::from_secs_f32(elapsed.min(dt)));
    world.insert_resource(t);
}

/// A `Time<Fixed>` with a specific delta for a single system run.
pub fn fixed_time_with_delta(dt: f32) -> Time<Fixed> {
    let mut t = Time::<Fixed>::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}
