//! Core plugin: shared resources and global settings.
//!
//! The health reserve, score board and super counter are the collaborators the
//! player state machine reads and writes; they live here so every plugin can
//! reach them without a singleton.

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

/// The player's health pool, displayed by the UI as hearts.
#[derive(Resource, Debug, Clone)]
pub struct HealthReserve {
    current: i32,
    max: i32,
}

impl HealthReserve {
    pub fn new(current: i32, max: i32) -> Self {
        Self { current, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn add(&mut self) {
        self.current = (self.current + 1).min(self.max);
    }

    pub fn remove(&mut self) {
        self.current -= 1;
    }
}

impl Default for HealthReserve {
    fn default() -> Self {
        Self::new(5, 8)
    }
}

/// Accumulated score.
#[derive(Resource, Debug, Default, Clone)]
pub struct ScoreBoard {
    score: u32,
}

impl ScoreBoard {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add(&mut self, amount: u32, multiplier: u32) {
        self.score += amount * multiplier.max(1);
    }
}

/// Floating score label request, consumed by the UI.
#[derive(Message, Debug, Clone)]
pub struct ScorePopup {
    pub amount: u32,
    pub multiplier: u32,
    pub label: &'static str,
    pub world_pos: Vec2,
}

/// Shared countdown toward the next super-mode activation.
///
/// Depositing an enemy into the pyre ticks it down; the player's super-mode
/// check reads it and it is reset to its starting value when super mode ends.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SuperCounter(pub i32);

pub fn plugin(app: &mut App) {
    let tunables = Tunables::default();
    app.insert_resource(SuperCounter(tunables.super_counter_start));
    app.insert_resource(tunables);
    app.insert_resource(HealthReserve::default());
    app.insert_resource(ScoreBoard::default());
    app.insert_resource(ClearColor(Color::srgb(0.04, 0.04, 0.06)));

    app.init_resource::<Messages<ScorePopup>>();
    app.add_systems(PostUpdate, update_popup_messages);
}

/// Messages are double-buffered; `update()` advances buffers.
fn update_popup_messages(mut msgs: ResMut<Messages<ScorePopup>>) {
    msgs.update();
}

#[cfg(test)]
mod tests;
