//! World plugin: arena walls, floor, the central pyre and its light zones.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::plugins::player::death::GameOverStep;

/// Arena half extents in world units.
const HALF_W: f32 = 8.0;
const HALF_H: f32 = 4.5;

/// The central scene object that consumes carried enemies as fuel.
#[derive(Component, Debug, Clone)]
pub struct Pyre {
    fuel: u32,
    lit: bool,
}

impl Pyre {
    pub fn new(fuel: u32) -> Self {
        Self { fuel, lit: true }
    }

    pub fn fuel(&self) -> u32 {
        self.fuel
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn add_fuel(&mut self) {
        self.fuel += 1;
    }

    pub fn extinguish(&mut self) {
        self.lit = false;
    }
}

/// Sensor region in which the player counts as standing in light.
#[derive(Component, Debug, Clone, Copy)]
pub struct LightZone {
    pub radius: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(GameState::InGame),
        (spawn_arena, spawn_floor, spawn_pyre),
    );
    app.add_systems(
        Update,
        extinguish_on_game_over.run_if(in_state(GameState::InGame)),
    );
}

fn spawn_arena(mut commands: Commands) {
    let wall_color = Color::srgb(0.25, 0.27, 0.33);
    let thickness = 0.5;

    let wall_layers = CollisionLayers::new(
        Layer::World,
        [Layer::Player, Layer::Enemy, Layer::PlayerBullet],
    );

    let mut spawn_wall = |name: String, pos: Vec3, size: Vec2| {
        commands.spawn((
            Name::new(name),
            Sprite {
                color: wall_color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(pos),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            wall_layers,
            DespawnOnExit(GameState::InGame),
        ));
    };

    spawn_wall(
        "WallTop".into(),
        Vec3::new(0.0, HALF_H + thickness * 0.5, 0.0),
        Vec2::new(HALF_W * 2.0 + thickness * 2.0, thickness),
    );
    spawn_wall(
        "WallBottom".into(),
        Vec3::new(0.0, -HALF_H - thickness * 0.5, 0.0),
        Vec2::new(HALF_W * 2.0 + thickness * 2.0, thickness),
    );
    spawn_wall(
        "WallLeft".into(),
        Vec3::new(-HALF_W - thickness * 0.5, 0.0, 0.0),
        Vec2::new(thickness, HALF_H * 2.0),
    );
    spawn_wall(
        "WallRight".into(),
        Vec3::new(HALF_W + thickness * 0.5, 0.0, 0.0),
        Vec2::new(thickness, HALF_H * 2.0),
    );
}

/// Spawn a simple checkered floor so the arena reads without assets.
fn spawn_floor(mut commands: Commands) {
    (-4..=4)
        .flat_map(|y| (-8..=8).map(move |x| (x, y)))
        .for_each(|(x, y)| {
            let color = if (x + y) % 2 == 0 {
                Color::srgb(0.10, 0.10, 0.12)
            } else {
                Color::srgb(0.08, 0.08, 0.10)
            };

            commands.spawn((
                Sprite::from_color(color, Vec2::splat(1.0)),
                Transform::from_xyz(x as f32, y as f32, -1.0),
                DespawnOnExit(GameState::InGame),
            ));
        });
}

fn spawn_pyre(mut commands: Commands) {
    commands.spawn((
        Name::new("Pyre"),
        Pyre::new(3),
        Sprite {
            color: Color::srgb(1.0, 0.6, 0.15),
            custom_size: Some(Vec2::splat(1.2)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        RigidBody::Static,
        Collider::circle(0.6),
        CollisionLayers::new(Layer::Pyre, [Layer::Player, Layer::Enemy, Layer::Reach]),
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    ));

    // The pyre's own glow plus two lamps near the corners. Everything else
    // is darkness.
    for (name, pos, radius) in [
        ("PyreLight", Vec2::ZERO, 3.0),
        ("LampWest", Vec2::new(-5.5, 2.5), 1.5),
        ("LampEast", Vec2::new(5.5, -2.5), 1.5),
    ] {
        commands.spawn((
            Name::new(name),
            LightZone { radius },
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::circle(radius),
            Sensor,
            CollisionLayers::new(Layer::LightZone, [Layer::Reach]),
            CollisionEventsEnabled,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// The game-over step list extinguishes the pyre at its 1.0 s mark.
fn extinguish_on_game_over(
    mut steps: MessageReader<GameOverStep>,
    mut q_pyre: Query<(&mut Pyre, &mut Sprite)>,
) {
    for step in steps.read() {
        if *step != GameOverStep::ExtinguishPyre {
            continue;
        }
        for (mut pyre, mut sprite) in &mut q_pyre {
            pyre.extinguish();
            sprite.color = Color::srgb(0.2, 0.18, 0.18);
        }
    }
}
