use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::camera::MainCamera;
use crate::plugins::player::{Player, PlayerInput};

use super::components::{Aim, Weapon};
use super::messages::SpawnBulletRequest;

/// Normalize the cursor into world space. Headless runs have no window or
/// camera; `Aim` simply stays None.
pub fn update_aim_from_cursor(
    windows: Query<&Window>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut aim: ResMut<Aim>,
) {
    aim.world_cursor = None;

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_tf)) = q_camera.single() else {
        return;
    };
    if let Ok(p) = camera.viewport_to_world_2d(camera_tf, cursor) {
        aim.world_cursor = Some(p);
    }
}

/// Producer: tick every weapon's cooldown and enqueue a spawn request for
/// each that fires this frame.
///
/// This system intentionally does **not** access BulletPool.
pub fn fire_weapons(
    time: Res<Time>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    aim: Res<Aim>,
    q_player: Query<&Transform, With<Player>>,
    mut q_weapons: Query<&mut Weapon>,
    mut writer: MessageWriter<SpawnBulletRequest>,
) {
    let Ok(player_tf) = q_player.single() else {
        return;
    };
    let origin = player_tf.translation.truncate();

    let dir = match aim.world_cursor {
        Some(cursor) if cursor.distance_squared(origin) > 1e-4 => (cursor - origin).normalize(),
        _ => Vec2::Y,
    };

    for mut weapon in &mut q_weapons {
        if !weapon.tick_and_fire(time.delta(), input.fire_held) {
            continue;
        }

        writer.write(SpawnBulletRequest {
            pos: origin + dir * 0.4,
            vel: dir * tunables.bullet_speed,
            damage: weapon.kind.damage(),
        });
    }
}
