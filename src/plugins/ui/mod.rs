//! HUD: health and score readouts, floating score popups, and the game-over
//! banner.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::core::{HealthReserve, ScoreBoard, ScorePopup};
use crate::plugins::player::death::{GameOverStep, GAME_OVER_TEXT_FADE_SECS};

const POPUP_LIFETIME_SECS: f32 = 0.9;
const POPUP_RISE_SPEED: f32 = 0.8;

#[derive(Component)]
struct HealthText;

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct GameOverText;

/// Fade-in driver, inserted when the banner is revealed.
#[derive(Component)]
struct GameOverFade {
    timer: Timer,
}

/// A floating world-space score label.
#[derive(Component)]
struct PopupText {
    timer: Timer,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud);
    app.add_systems(
        Update,
        (
            update_health_text,
            update_score_text,
            spawn_popups,
            animate_popups,
            reveal_game_over,
            fade_game_over,
        )
            .run_if(in_state(GameState::InGame)),
    );
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Hud"),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(8.0),
                left: Val::Px(12.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            DespawnOnExit(GameState::InGame),
        ))
        .with_children(|parent| {
            parent.spawn((
                HealthText,
                Text::new("HP 5/8"),
                TextColor(Color::srgb(0.95, 0.4, 0.4)),
            ));
            parent.spawn((
                ScoreText,
                Text::new("SCORE 0"),
                TextColor(Color::srgb(0.9, 0.85, 0.6)),
            ));
        });

    commands.spawn((
        Name::new("GameOverText"),
        GameOverText,
        Text::new("THE LIGHT HAS GONE OUT"),
        TextColor(Color::srgba(0.9, 0.2, 0.2, 0.0)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(42.0),
            justify_self: JustifySelf::Center,
            ..default()
        },
        Visibility::Hidden,
        DespawnOnExit(GameState::InGame),
    ));
}

fn update_health_text(health: Res<HealthReserve>, mut q: Query<&mut Text, With<HealthText>>) {
    if !health.is_changed() {
        return;
    }
    for mut text in &mut q {
        text.0 = format!("HP {}/{}", health.current().max(0), health.max());
    }
}

fn update_score_text(board: Res<ScoreBoard>, mut q: Query<&mut Text, With<ScoreText>>) {
    if !board.is_changed() {
        return;
    }
    for mut text in &mut q {
        text.0 = format!("SCORE {}", board.score());
    }
}

fn spawn_popups(mut commands: Commands, mut popups: MessageReader<ScorePopup>) {
    for popup in popups.read() {
        let total = popup.amount * popup.multiplier.max(1);
        commands.spawn((
            PopupText {
                timer: Timer::from_seconds(POPUP_LIFETIME_SECS, TimerMode::Once),
            },
            Text2d::new(format!("+{total} {}", popup.label)),
            TextColor(Color::srgb(1.0, 0.9, 0.5)),
            Transform::from_translation(popup.world_pos.extend(3.0)).with_scale(Vec3::splat(0.01)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn animate_popups(
    time: Res<Time>,
    mut commands: Commands,
    mut q: Query<(Entity, &mut PopupText, &mut Transform, &mut TextColor)>,
) {
    for (entity, mut popup, mut tf, mut color) in &mut q {
        popup.timer.tick(time.delta());
        tf.translation.y += POPUP_RISE_SPEED * time.delta_secs();
        color.0 = color.0.with_alpha(1.0 - popup.timer.fraction());

        if popup.timer.is_finished() {
            commands.entity(entity).despawn();
        }
    }
}

fn reveal_game_over(
    mut commands: Commands,
    mut steps: MessageReader<GameOverStep>,
    mut q: Query<(Entity, &mut Visibility), With<GameOverText>>,
) {
    for step in steps.read() {
        if *step != GameOverStep::ShowGameOverText {
            continue;
        }
        for (entity, mut vis) in &mut q {
            *vis = Visibility::Visible;
            commands.entity(entity).insert(GameOverFade {
                timer: Timer::from_seconds(GAME_OVER_TEXT_FADE_SECS, TimerMode::Once),
            });
        }
    }
}

fn fade_game_over(
    time: Res<Time>,
    mut q: Query<(&mut GameOverFade, &mut TextColor), With<GameOverText>>,
) {
    for (mut fade, mut color) in &mut q {
        fade.timer.tick(time.delta());
        color.0 = color.0.with_alpha(fade.timer.fraction());
    }
}
