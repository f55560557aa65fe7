//! Splash screen and the "press any key" prompt.
//!
//! The prompt is a small phase machine: invisible for a short beat, fades in,
//! then pulses until any key or mouse button is pressed. The press starts a
//! fixed-length transition during which the prompt fades back out and the
//! background track swells; when it ends, gameplay begins.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use std::time::Duration;

use crate::common::state::GameState;
use crate::plugins::audio::AudioLevels;

const APPEAR_DELAY_SECS: f32 = 0.5;
const FADE_IN_SECS: f32 = 1.0;
const START_TRANSITION_SECS: f32 = 1.5;

/// Background track level while the splash screen idles.
const MENU_VOLUME: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptPhase {
    AppearDelay,
    FadeIn,
    Idle,
    Starting,
}

/// The prompt's phase machine. A press in any pre-start phase jumps straight
/// to `Starting`; once starting, further input is ignored.
#[derive(Component, Debug)]
struct Prompt {
    phase: PromptPhase,
    timer: Timer,
}

impl Prompt {
    fn new() -> Self {
        Self {
            phase: PromptPhase::AppearDelay,
            timer: Timer::from_seconds(APPEAR_DELAY_SECS, TimerMode::Once),
        }
    }

    fn starting(&self) -> bool {
        self.phase == PromptPhase::Starting
    }

    fn enter(&mut self, phase: PromptPhase, secs: f32) {
        self.phase = phase;
        self.timer = Timer::from_seconds(secs, TimerMode::Once);
    }

    /// Returns true when the start transition has finished.
    fn advance(&mut self, dt: Duration, pressed: bool) -> bool {
        if pressed && !self.starting() {
            self.enter(PromptPhase::Starting, START_TRANSITION_SECS);
            return false;
        }

        self.timer.tick(dt);
        match self.phase {
            PromptPhase::AppearDelay => {
                if self.timer.is_finished() {
                    self.enter(PromptPhase::FadeIn, FADE_IN_SECS);
                }
                false
            }
            PromptPhase::FadeIn => {
                if self.timer.is_finished() {
                    self.phase = PromptPhase::Idle;
                }
                false
            }
            PromptPhase::Idle => false,
            PromptPhase::Starting => self.timer.is_finished(),
        }
    }

    fn alpha(&self, elapsed: f32) -> f32 {
        match self.phase {
            PromptPhase::AppearDelay => 0.0,
            PromptPhase::FadeIn => self.timer.fraction(),
            PromptPhase::Idle => 0.75 + 0.25 * (elapsed * 3.0).sin(),
            PromptPhase::Starting => 1.0 - self.timer.fraction(),
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::Splash), spawn_splash);
    app.add_systems(
        Update,
        run_prompt.run_if(in_state(GameState::Splash)),
    );
}

fn spawn_splash(mut commands: Commands, mut levels: ResMut<AudioLevels>) {
    // Coming back from a game over, the background track may be faded out
    // and the darkness layer still up.
    levels.background.set(MENU_VOLUME);
    levels.darkness.set(0.0);

    commands
        .spawn((
            Name::new("Splash"),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            DespawnOnExit(GameState::Splash),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("PYRELIGHT"),
                TextColor(Color::srgb(1.0, 0.7, 0.25)),
            ));
            parent.spawn((
                Prompt::new(),
                Text::new("press any key"),
                TextColor(Color::srgba(0.9, 0.9, 0.9, 0.0)),
            ));
        });
}

fn run_prompt(
    time: Res<Time>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut q_prompt: Query<(&mut Prompt, &mut TextColor)>,
    mut levels: ResMut<AudioLevels>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Ok((mut prompt, mut color)) = q_prompt.single_mut() else {
        return;
    };

    let pressed = keys
        .as_ref()
        .is_some_and(|k| k.get_just_pressed().next().is_some())
        || buttons
            .as_ref()
            .is_some_and(|b| b.get_just_pressed().next().is_some());

    let was_starting = prompt.starting();
    let done = prompt.advance(time.delta(), pressed);

    if prompt.starting() && !was_starting {
        // Menu music out; the game restores it on entry.
        levels.background.fade_to(0.0, START_TRANSITION_SECS);
    }

    color.0 = color.0.with_alpha(prompt.alpha(time.elapsed_secs()));

    if done {
        next_state.set(GameState::InGame);
    }
}
