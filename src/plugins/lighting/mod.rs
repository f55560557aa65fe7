//! Lighting plugin (Firefly) (render-only).
//!
//! Light zones are gameplay sensors; this plugin gives each one an actual
//! light, and puts a faint glow on the player so they stay readable in the
//! dark.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::death::GameOverStep;
use crate::plugins::player::Player;
use crate::plugins::world::LightZone;

#[derive(Component)]
pub struct PlayerLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup).add_systems(
        Update,
        (attach_zone_lights, follow_player_light, douse_on_game_over),
    );
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight,
        PointLight2d {
            color: Color::srgb(1.0, 0.9, 0.75),
            radius: 1.5,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

/// Light zones spawn in the world plugin; give each one a light once.
fn attach_zone_lights(
    mut commands: Commands,
    q_zones: Query<(Entity, &LightZone), Without<PointLight2d>>,
) {
    for (entity, zone) in &q_zones {
        commands.entity(entity).insert(PointLight2d {
            color: Color::srgb(1.0, 0.75, 0.4),
            radius: zone.radius,
            ..default()
        });
    }
}

fn follow_player_light(
    q_player: Query<&Transform, (With<Player>, Without<PlayerLight>)>,
    mut q_light: Query<&mut Transform, (With<PlayerLight>, Without<Player>)>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;
}

/// Everything goes dark at the extinguish step of the game-over sequence.
fn douse_on_game_over(
    mut steps: MessageReader<GameOverStep>,
    mut q_lights: Query<&mut PointLight2d>,
) {
    for step in steps.read() {
        if *step != GameOverStep::ExtinguishPyre {
            continue;
        }
        for mut light in &mut q_lights {
            light.color = Color::srgb(0.05, 0.05, 0.08);
        }
    }
}
