//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input, then the survival/combat steps in a fixed order:
//!   fire -> carry -> super trigger -> health check -> darkness check -> resolve.
//!   The order matters: the darkness check still lands its health toll on the
//!   same frame another step already queued a death, and the resolve step is
//!   the single place a queued death takes effect.
//! - FixedUpdate: accelerate toward the input axis with a speed cap, then dash.
//!
//! Proximity (nearby enemy/pyre, light zones) comes from a sensor collider
//! parented under the player body, fed by Avian's collision messages.

pub mod death;
pub mod super_mode;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::audio::{AudioCue, AudioLevels};
use crate::plugins::core::SuperCounter;
use crate::plugins::enemies::{Carried, ChasePlayer, Enemy};
use crate::plugins::fx::{EffectKind, SpawnEffectRequest};
use crate::plugins::world::{LightZone, Pyre};

#[derive(Component)]
pub struct Player;

/// Sensor collider parented under the player; overlaps what the player can
/// reach without pushing it.
#[derive(Component)]
pub struct ReachSensor;

/// Small marker sprite shown above the player while an enemy is carried.
#[derive(Component)]
pub struct CarryIndicator;

/// Glow sprite shown while super mode is active.
#[derive(Component)]
pub struct SuperVisual;

#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    pub fire_held: bool,
    pub dash_held: bool,
}

/// Terminal life state; once `Dead`, input is permanently disabled.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerLife {
    #[default]
    Alive,
    Dead,
}

impl PlayerLife {
    pub fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// Light-zone overlap tracking.
///
/// Overlaps are counted rather than stored as a single flag so stacked light
/// zones behave: the darkness countdown starts only when the last zone is
/// left, and resets whenever any zone is entered.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct LightExposure {
    zones_inside: u32,
    exit_time: f32,
}

impl LightExposure {
    pub fn in_light(&self) -> bool {
        self.zones_inside > 0
    }

    pub fn exit_time(&self) -> f32 {
        self.exit_time
    }

    /// Returns true if this enter crossed from darkness into light.
    pub fn enter_zone(&mut self) -> bool {
        self.zones_inside += 1;
        self.zones_inside == 1
    }

    /// Returns true if this exit crossed from light into darkness.
    pub fn exit_zone(&mut self, now: f32) -> bool {
        self.zones_inside = self.zones_inside.saturating_sub(1);
        if self.zones_inside == 0 {
            self.exit_time = now;
            true
        } else {
            false
        }
    }
}

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct DashState {
    last_dash_time: Option<f32>,
}

impl DashState {
    pub fn ready(&self, now: f32, cooldown: f32) -> bool {
        match self.last_dash_time {
            None => true,
            Some(last) => now - last >= cooldown,
        }
    }
}

/// Transient carry relation; at most one enemy at a time, never owned.
#[derive(Component, Debug, Default)]
pub struct Carry {
    pub enemy: Option<Entity>,
}

#[derive(Component, Debug, Default)]
pub struct NearbyEnemy(pub Option<Entity>);

#[derive(Component, Debug, Default)]
pub struct NearbyPyre(pub Option<Entity>);

/// Current speed, exposed for the walk animation.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct WalkSpeed(pub f32);

/// The ordered per-frame steps. Later steps are not short-circuited by
/// earlier ones.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerStep {
    Fire,
    Carry,
    SuperTrigger,
    HealthCheck,
    DarknessCheck,
    Resolve,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default());
    app.insert_resource(super_mode::SuperMode::default());
    death::register_messages(app);

    app.add_systems(OnEnter(GameState::InGame), spawn);

    app.configure_sets(
        Update,
        (
            PlayerStep::Fire,
            PlayerStep::Carry,
            PlayerStep::SuperTrigger,
            PlayerStep::HealthCheck,
            PlayerStep::DarknessCheck,
            PlayerStep::Resolve,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        Update,
        (gather_input, track_proximity)
            .before(PlayerStep::Fire)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(Update, handle_carry.in_set(PlayerStep::Carry));
    app.add_systems(
        Update,
        super_mode::check_super_trigger.in_set(PlayerStep::SuperTrigger),
    );
    app.add_systems(Update, death::check_health_death.in_set(PlayerStep::HealthCheck));
    app.add_systems(
        Update,
        death::check_darkness_death.in_set(PlayerStep::DarknessCheck),
    );
    app.add_systems(Update, death::begin_death_sequence.in_set(PlayerStep::Resolve));

    app.add_systems(
        Update,
        (
            super_mode::tick_super_mode,
            death::advance_game_over.after(PlayerStep::Resolve),
            animate_walk,
        )
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedUpdate,
        (apply_movement, dash)
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
}

fn spawn(mut commands: Commands) {
    let layers = CollisionLayers::new(Layer::Player, [Layer::World, Layer::Enemy, Layer::Pyre]);

    commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerLife::Alive,
            LightExposure::default(),
            DashState::default(),
            Carry::default(),
            NearbyEnemy::default(),
            NearbyPyre::default(),
            WalkSpeed::default(),
            Sprite {
                color: Color::srgb(0.9, 0.8, 0.55),
                custom_size: Some(Vec2::splat(0.55)),
                ..default()
            },
            Transform::from_xyz(0.0, -2.0, 1.0),
            (
                RigidBody::Dynamic,
                Collider::circle(0.27),
                layers,
                LinearVelocity::ZERO,
                CollisionEventsEnabled,
                DespawnOnExit(GameState::InGame),
            ),
        ))
        .with_children(|parent| {
            parent.spawn((
                Name::new("ReachSensor"),
                ReachSensor,
                Collider::circle(0.6),
                Sensor,
                CollisionLayers::new(Layer::Reach, [Layer::Enemy, Layer::Pyre, Layer::LightZone]),
                CollisionEventsEnabled,
                Transform::default(),
            ));
            parent.spawn((
                Name::new("CarryIndicator"),
                CarryIndicator,
                Sprite {
                    color: Color::srgb(0.85, 0.2, 0.2),
                    custom_size: Some(Vec2::splat(0.2)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.45, 0.5),
                Visibility::Hidden,
            ));
            parent.spawn((
                Name::new("SuperVisual"),
                SuperVisual,
                Sprite {
                    color: Color::srgba(1.0, 0.9, 0.3, 0.45),
                    custom_size: Some(Vec2::splat(0.9)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, -0.5),
                Visibility::Hidden,
            ));
        });
}

fn gather_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    q_life: Query<&PlayerLife, With<Player>>,
    mut input: ResMut<PlayerInput>,
) {
    // Input is permanently disabled once dead.
    if !q_life.single().is_ok_and(|life| life.is_alive()) {
        *input = PlayerInput::default();
        return;
    }

    let mut axis = Vec2::ZERO;
    if let Some(keys) = &keys {
        if keys.pressed(KeyCode::KeyW) {
            axis.y += 1.0;
        }
        if keys.pressed(KeyCode::KeyS) {
            axis.y -= 1.0;
        }
        if keys.pressed(KeyCode::KeyA) {
            axis.x -= 1.0;
        }
        if keys.pressed(KeyCode::KeyD) {
            axis.x += 1.0;
        }
    }

    input.move_axis = if axis.length_squared() > 0.0 {
        axis.normalize()
    } else {
        Vec2::ZERO
    };

    if let Some(buttons) = &buttons {
        input.fire_held = buttons.pressed(MouseButton::Left);
        input.dash_held = buttons.pressed(MouseButton::Right);
    } else {
        input.fire_held = false;
        input.dash_held = false;
    }
}

#[derive(Clone, Copy, Debug)]
struct ContactSide {
    collider: Entity,
    body: Option<Entity>,
}

impl ContactSide {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn start_sides(ev: &CollisionStart) -> (ContactSide, ContactSide) {
    (
        ContactSide { collider: ev.collider1, body: ev.body1 },
        ContactSide { collider: ev.collider2, body: ev.body2 },
    )
}

#[inline]
fn end_sides(ev: &CollisionEnd) -> (ContactSide, ContactSide) {
    (
        ContactSide { collider: ev.collider1, body: ev.body1 },
        ContactSide { collider: ev.collider2, body: ev.body2 },
    )
}

/// Maintain light-zone overlap and the nearby enemy/pyre references from the
/// reach sensor's collision messages.
fn track_proximity(
    time: Res<Time>,
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    q_reach: Query<(), With<ReachSensor>>,
    q_zone: Query<(), With<LightZone>>,
    q_enemy: Query<(), With<Enemy>>,
    q_pyre: Query<(), With<Pyre>>,
    mut levels: ResMut<AudioLevels>,
    mut q_player: Query<(&mut LightExposure, &mut NearbyEnemy, &mut NearbyPyre), With<Player>>,
) {
    let Ok((mut exposure, mut nearby_enemy, mut nearby_pyre)) = q_player.single_mut() else {
        return;
    };
    let now = time.elapsed_secs();

    for ev in started.read() {
        let (s1, s2) = start_sides(ev);
        let r1 = q_reach.contains(s1.collider);
        let r2 = q_reach.contains(s2.collider);
        if !(r1 ^ r2) {
            continue;
        }
        let other = if r1 { s2 } else { s1 };
        let owner = other.gameplay_owner();

        if q_zone.contains(other.collider) {
            if exposure.enter_zone() {
                debug!("entered light");
                levels.darkness.fade_to(0.0, 0.25);
            }
        } else if q_enemy.contains(owner) {
            if nearby_enemy.0.is_none() {
                nearby_enemy.0 = Some(owner);
            }
        } else if q_pyre.contains(owner) && nearby_pyre.0.is_none() {
            nearby_pyre.0 = Some(owner);
        }
    }

    for ev in ended.read() {
        let (s1, s2) = end_sides(ev);
        let r1 = q_reach.contains(s1.collider);
        let r2 = q_reach.contains(s2.collider);
        if !(r1 ^ r2) {
            continue;
        }
        let other = if r1 { s2 } else { s1 };
        let owner = other.gameplay_owner();

        if q_zone.contains(other.collider) {
            if exposure.exit_zone(now) {
                debug!("left light");
                levels.darkness.set(1.0);
            }
        } else if nearby_enemy.0 == Some(owner) {
            nearby_enemy.0 = None;
        } else if nearby_pyre.0 == Some(owner) {
            nearby_pyre.0 = None;
        }
    }
}

/// Collision filters for a carried enemy: still an enemy, touches nothing.
#[inline]
fn carried_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

/// Pick up a reachable enemy, or deposit the carried one into a reachable
/// pyre.
fn handle_carry(
    mut commands: Commands,
    mut counter: ResMut<SuperCounter>,
    mut q_player: Query<
        (&PlayerLife, &mut Carry, &mut NearbyEnemy, &mut NearbyPyre),
        With<Player>,
    >,
    mut q_indicator: Query<&mut Visibility, (With<CarryIndicator>, Without<Enemy>)>,
    mut q_enemy: Query<
        (&mut ChasePlayer, &mut CollisionLayers, &mut LinearVelocity, &mut Visibility),
        (With<Enemy>, Without<CarryIndicator>),
    >,
    mut q_pyre: Query<&mut Pyre>,
) {
    let Ok((life, mut carry, mut nearby_enemy, mut nearby_pyre)) = q_player.single_mut() else {
        return;
    };
    if !life.is_alive() {
        return;
    }

    if carry.enemy.is_none() {
        let Some(enemy) = nearby_enemy.0 else {
            return;
        };
        let Ok((mut chase, mut layers, mut vel, mut vis)) = q_enemy.get_mut(enemy) else {
            nearby_enemy.0 = None;
            return;
        };

        chase.enabled = false;
        *layers = carried_enemy_layers();
        vel.0 = Vec2::ZERO;
        *vis = Visibility::Hidden;
        commands.entity(enemy).insert(Carried);

        carry.enemy = Some(enemy);
        nearby_enemy.0 = None;

        if let Ok(mut indicator) = q_indicator.single_mut() {
            *indicator = Visibility::Visible;
        }
    } else if let Some(pyre_entity) = nearby_pyre.0 {
        if let Ok(mut indicator) = q_indicator.single_mut() {
            *indicator = Visibility::Hidden;
        }

        // The carried enemy is consumed as fuel.
        if let Some(enemy) = carry.enemy.take() {
            commands.entity(enemy).despawn();
        }
        if let Ok(mut pyre) = q_pyre.get_mut(pyre_entity) {
            pyre.add_fuel();
        }
        counter.0 -= 1;
        nearby_pyre.0 = None;
    }
}

fn apply_movement(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    mode: Res<super_mode::SuperMode>,
    input: Res<PlayerInput>,
    mut q_player: Query<(&mut LinearVelocity, &mut WalkSpeed, &PlayerLife), With<Player>>,
) {
    let Ok((mut vel, mut walk, life)) = q_player.single_mut() else {
        return;
    };
    if !life.is_alive() {
        walk.0 = 0.0;
        return;
    }

    let (accel, max_speed) = mode.movement(&tunables);
    vel.0 += input.move_axis * accel * time.delta_secs();
    vel.0 = vel.0.clamp_length_max(max_speed);
    walk.0 = vel.0.length();
}

/// Instantaneous displacement along the movement direction, gated by a
/// cooldown and nonzero movement input.
fn dash(
    time: Res<Time>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<(&mut Position, &mut DashState, &PlayerLife), With<Player>>,
    mut effects: MessageWriter<SpawnEffectRequest>,
    mut cues: MessageWriter<AudioCue>,
) {
    if !input.dash_held || input.move_axis == Vec2::ZERO {
        return;
    }
    let Ok((mut pos, mut state, life)) = q_player.single_mut() else {
        return;
    };
    if !life.is_alive() {
        return;
    }

    let now = time.elapsed_secs();
    if !state.ready(now, tunables.dash_cooldown) {
        return;
    }
    state.last_dash_time = Some(now);

    effects.write(SpawnEffectRequest {
        kind: EffectKind::DashSmoke,
        pos: pos.0 + input.move_axis * 0.5,
        dir: input.move_axis,
    });

    pos.0 += input.move_axis * tunables.dash_distance;
    cues.write(AudioCue::Dash);
}

/// Squash the sprite a little with speed; stands in for a walk animator.
fn animate_walk(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut q_player: Query<(&WalkSpeed, &mut Transform), With<Player>>,
) {
    let Ok((walk, mut tf)) = q_player.single_mut() else {
        return;
    };
    let s = (walk.0 / tunables.max_speed_super).clamp(0.0, 1.0);
    let bob = (time.elapsed_secs() * 10.0).sin() * 0.05 * s;
    tf.scale = Vec3::new(1.0 - bob, 1.0 + bob, 1.0);
}
