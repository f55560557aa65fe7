//! Enemies: chase movement, impacts, damage and the pooled death animation.
//!
//! An enemy's death is driven by [`Vitality`]: damage flips the `dead` flag
//! exactly once, and the trigger system reacts to the flag rather than to the
//! damage source, so bullets, super-mode chip damage and anything else that
//! calls [`Vitality::take_damage`] all share one death path.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;
use rand::Rng;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::audio::AudioCue;
use crate::plugins::core::HealthReserve;
use crate::plugins::fx::{EffectKind, SpawnEffectRequest};
use crate::plugins::player::{Player, PlayerLife};

/// How long the death animation plays before the body despawns.
const DEATH_ANIM_SECS: f32 = 0.35;

#[derive(Component)]
pub struct Enemy;

/// Present while the player carries this enemy; carried enemies are inert.
#[derive(Component)]
pub struct Carried;

/// Health and a latched death flag.
#[derive(Component, Debug, Clone)]
pub struct Vitality {
    health: f32,
    dead: bool,
}

impl Vitality {
    pub fn new(health: f32) -> Self {
        Self { health, dead: false }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Apply damage; returns true only on the call that crosses into death.
    /// Damage to an already-dead enemy is a no-op.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.dead = true;
            true
        } else {
            false
        }
    }
}

/// Steering toward the player; disabled while carried or dying.
#[derive(Component, Debug, Clone, Copy)]
pub struct ChasePlayer {
    pub speed: f32,
    pub enabled: bool,
}

/// Knockback request aimed at one enemy. Requests against dead enemies are
/// dropped.
#[derive(Message, Debug, Clone, Copy)]
pub struct ImpactRequest {
    pub enemy: Entity,
    pub force: Vec2,
}

/// Ticking death animation; the body despawns when it finishes.
#[derive(Component)]
struct DeathAnim {
    timer: Timer,
}

/// Despawn at the next `PostUpdate`, after every reader this frame.
#[derive(Component)]
struct PendingDespawn;

/// Drip-feeds replacements so the arena population holds at the target
/// count. Deposits and kills both remove enemies for good; without the
/// trickle the super counter could never be run down.
#[derive(Resource, Debug)]
pub struct RespawnTimer(Timer);

impl RespawnTimer {
    pub fn new(secs: f32) -> Self {
        Self(Timer::from_seconds(secs, TimerMode::Repeating))
    }
}

pub fn plugin(app: &mut App) {
    let respawn_secs = app.world().resource::<Tunables>().enemy_respawn_secs;
    app.insert_resource(RespawnTimer::new(respawn_secs));

    app.init_resource::<bevy::ecs::message::Messages<ImpactRequest>>();
    app.add_systems(PostUpdate, update_impact_messages);

    app.add_systems(OnEnter(GameState::InGame), spawn_enemies);
    app.add_systems(
        Update,
        (apply_impacts, contact_damage, death_trigger, death_progress)
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        Update,
        respawn_enemies.run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        FixedUpdate,
        chase.run_if(in_state(GameState::InGame)),
    );
    app.add_systems(PostUpdate, despawn_marked);
}

fn update_impact_messages(mut msgs: ResMut<bevy::ecs::message::Messages<ImpactRequest>>) {
    msgs.update();
}

fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Enemy,
        [
            Layer::World,
            Layer::Player,
            Layer::PlayerBullet,
            Layer::Pyre,
            Layer::Reach,
        ],
    )
}

/// Collision filters for a dying enemy: keeps its membership, touches
/// nothing, so bullets pass through the corpse.
fn dead_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

fn spawn_enemy(commands: &mut Commands, tunables: &Tunables, pos: Vec2) {
    commands.spawn((
        Name::new("Enemy"),
        Enemy,
        Vitality::new(tunables.enemy_health),
        ChasePlayer {
            speed: tunables.enemy_chase_speed,
            enabled: true,
        },
        Sprite {
            color: Color::srgb(0.55, 0.15, 0.6),
            custom_size: Some(Vec2::splat(0.6)),
            ..default()
        },
        Transform::from_translation(pos.extend(1.0)),
        RigidBody::Dynamic,
        Collider::circle(0.3),
        enemy_layers(),
        LinearVelocity::ZERO,
        CollisionEventsEnabled,
        Occluder2d::circle(0.35),
        DespawnOnExit(GameState::InGame),
    ));
}

fn spawn_enemies(mut commands: Commands, tunables: Res<Tunables>) {
    for pos in [
        Vec2::new(-6.0, 3.0),
        Vec2::new(6.0, 3.0),
        Vec2::new(-6.0, -3.0),
        Vec2::new(6.0, -3.0),
    ] {
        spawn_enemy(&mut commands, &tunables, pos);
    }
}

/// Replacement position: a random spot along the arena rim, away from the
/// pyre at the center.
fn respawn_position() -> Vec2 {
    let mut rng = rand::thread_rng();
    let x = rng.gen_range(-7.0..7.0_f32);
    let y = rng.gen_range(-3.5..3.5_f32);
    if rng.gen_range(0..2) == 0 {
        Vec2::new(x.signum() * 7.0, y)
    } else {
        Vec2::new(x, y.signum() * 3.5)
    }
}

/// One replacement per timer tick while below the target population.
fn respawn_enemies(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut timer: ResMut<RespawnTimer>,
    q_enemies: Query<(), With<Enemy>>,
    mut commands: Commands,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    if q_enemies.iter().count() >= tunables.enemy_target_count {
        return;
    }
    spawn_enemy(&mut commands, &tunables, respawn_position());
}

fn chase(
    q_player: Query<(&Transform, &PlayerLife), (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<
        (&Transform, &ChasePlayer, &Vitality, &mut LinearVelocity),
        (With<Enemy>, Without<Carried>, Without<Player>),
    >,
) {
    let Ok((player_tf, life)) = q_player.single() else {
        return;
    };
    let target = player_tf.translation.truncate();

    for (tf, chase, vitality, mut vel) in &mut q_enemies {
        if !chase.enabled || vitality.is_dead() {
            continue;
        }
        if !life.is_alive() {
            vel.0 = Vec2::ZERO;
            continue;
        }
        let dir = (target - tf.translation.truncate()).normalize_or_zero();
        vel.0 = dir * chase.speed;
    }
}

/// Knockback plus a blood spray at the point of impact.
fn apply_impacts(
    mut impacts: MessageReader<ImpactRequest>,
    mut q_enemies: Query<(&Transform, &Vitality, &mut LinearVelocity), With<Enemy>>,
    mut effects: MessageWriter<SpawnEffectRequest>,
) {
    for impact in impacts.read() {
        let Ok((tf, vitality, mut vel)) = q_enemies.get_mut(impact.enemy) else {
            continue;
        };
        if vitality.is_dead() {
            continue;
        }
        vel.0 += impact.force;
        effects.write(SpawnEffectRequest {
            kind: EffectKind::BloodSpray,
            pos: tf.translation.truncate(),
            dir: impact.force.normalize_or(Vec2::Y),
        });
    }
}

/// Touching the player costs health. Carried and dying enemies do not bite.
fn contact_damage(
    tunables: Res<Tunables>,
    mut started: MessageReader<CollisionStart>,
    q_player: Query<&PlayerLife, With<Player>>,
    q_enemies: Query<&Vitality, (With<Enemy>, Without<Carried>)>,
    mut health: ResMut<HealthReserve>,
    mut cues: MessageWriter<AudioCue>,
) {
    let Ok(life) = q_player.single() else {
        return;
    };

    for ev in started.read() {
        let b1 = ev.body1.unwrap_or(ev.collider1);
        let b2 = ev.body2.unwrap_or(ev.collider2);

        let enemy = if q_player.contains(b1) {
            b2
        } else if q_player.contains(b2) {
            b1
        } else {
            continue;
        };
        let Ok(vitality) = q_enemies.get(enemy) else {
            continue;
        };
        if vitality.is_dead() || !life.is_alive() {
            continue;
        }

        for _ in 0..tunables.enemy_contact_damage {
            health.remove();
        }
        cues.write(AudioCue::EnemyHit);
    }
}

/// React to the latched death flag exactly once per enemy.
fn death_trigger(
    mut commands: Commands,
    mut q_enemies: Query<
        (Entity, &Vitality, &mut ChasePlayer, &mut CollisionLayers, &mut Sprite),
        (With<Enemy>, Without<DeathAnim>),
    >,
) {
    for (entity, vitality, mut chase, mut layers, mut sprite) in &mut q_enemies {
        if !vitality.is_dead() {
            continue;
        }
        chase.enabled = false;
        *layers = dead_enemy_layers();
        sprite.color = Color::srgb(0.3, 0.1, 0.32);
        commands.entity(entity).insert(DeathAnim {
            timer: Timer::from_seconds(DEATH_ANIM_SECS, TimerMode::Once),
        });
    }
}

fn death_progress(
    time: Res<Time>,
    mut commands: Commands,
    mut q_dying: Query<(Entity, &mut DeathAnim, &mut Transform, &mut Sprite)>,
) {
    for (entity, mut anim, mut tf, mut sprite) in &mut q_dying {
        anim.timer.tick(time.delta());
        let t = anim.timer.fraction();
        tf.scale = Vec3::splat(1.0 - t * 0.8);
        sprite.color = sprite.color.with_alpha(1.0 - t);

        if anim.timer.is_finished() {
            commands.entity(entity).insert(PendingDespawn);
        }
    }
}

fn despawn_marked(mut commands: Commands, q_marked: Query<Entity, With<PendingDespawn>>) {
    for entity in &q_marked {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests;
