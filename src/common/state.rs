//! Global state machine.
//!
//! Scene flow: the splash screen hands over to gameplay on a key press,
//! and the game-over sequence hands back to the splash screen.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Splash,
    InGame,
}
