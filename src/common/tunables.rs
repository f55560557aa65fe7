//! Tunable gameplay constants.
//!
//! Distances and speeds are in world units (one unit is roughly a body
//! length); the camera projection scales them up for display.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_unit: f32,

    // Movement
    pub move_accel: f32,
    pub move_accel_super: f32,
    pub max_speed: f32,
    pub max_speed_super: f32,

    // Dash
    pub dash_cooldown: f32,
    pub dash_distance: f32,

    // Survival
    pub no_light_grace: f32,
    pub darkness_toll: i32,

    // Super mode
    pub super_duration: f32,
    pub super_heal: i32,
    pub super_knockback: f32,
    pub super_counter_start: i32,
    pub super_score: u32,

    // Weapons
    pub primary_cooldown: f32,
    pub primary_cooldown_super: f32,
    pub ember_cooldown: f32,
    pub ember_cooldown_super: f32,
    pub bullet_speed: f32,

    // Enemies
    pub enemy_health: f32,
    pub enemy_chase_speed: f32,
    pub enemy_contact_damage: i32,
    pub enemy_target_count: usize,
    pub enemy_respawn_secs: f32,
    pub kill_score: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_unit: 48.0,

            move_accel: 50.0,
            move_accel_super: 80.0,
            max_speed: 3.0,
            max_speed_super: 5.0,

            dash_cooldown: 1.5,
            dash_distance: 1.0,

            no_light_grace: 1.5,
            darkness_toll: 8,

            super_duration: 8.5,
            super_heal: 2,
            super_knockback: 20.0,
            super_counter_start: 10,
            super_score: 100,

            primary_cooldown: 1.0,
            primary_cooldown_super: 0.5,
            ember_cooldown: 1.0,
            ember_cooldown_super: 0.75,
            bullet_speed: 9.0,

            enemy_health: 1.0,
            enemy_chase_speed: 1.6,
            enemy_contact_damage: 1,
            enemy_target_count: 4,
            enemy_respawn_secs: 4.0,
            kill_score: 10,
        }
    }
}
