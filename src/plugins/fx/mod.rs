//! Short-lived visual effects (dash smoke, blood sprays) from a fixed pool.
//!
//! Same producer -> queue -> consumer shape as bullets, minus physics: any
//! system writes a [`SpawnEffectRequest`], the allocator pops a pooled sprite
//! and dresses it for the requested kind, and the expiry system fades it out
//! and recycles it.

use bevy::ecs::message::Messages;
use bevy::prelude::*;

const EFFECT_POOL_CAPACITY: usize = 32;
const EFFECT_LIFETIME_SECS: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    DashSmoke,
    BloodSpray,
}

impl EffectKind {
    fn color(self) -> Color {
        match self {
            Self::DashSmoke => Color::srgba(0.8, 0.8, 0.85, 0.7),
            Self::BloodSpray => Color::srgba(0.7, 0.1, 0.12, 0.85),
        }
    }

    fn size(self) -> Vec2 {
        match self {
            Self::DashSmoke => Vec2::new(0.35, 0.5),
            Self::BloodSpray => Vec2::new(0.25, 0.45),
        }
    }
}

#[derive(Message, Debug, Clone, Copy)]
pub struct SpawnEffectRequest {
    pub kind: EffectKind,
    pub pos: Vec2,
    /// Facing; the sprite's long axis is aligned to it.
    pub dir: Vec2,
}

#[derive(Component)]
struct PooledEffect;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum EffectState {
    #[default]
    Inactive,
    Active,
}

#[derive(Component)]
struct EffectAnim {
    timer: Timer,
}

#[derive(Resource, Debug)]
struct EffectPool {
    free: Vec<Entity>,
    capacity: usize,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(EffectPool {
        free: Vec::with_capacity(EFFECT_POOL_CAPACITY),
        capacity: EFFECT_POOL_CAPACITY,
    });
    app.init_resource::<Messages<SpawnEffectRequest>>();
    app.add_systems(Startup, init_effect_pool);
    app.add_systems(Update, (allocate_effects, expire_effects).chain());
    app.add_systems(PostUpdate, update_effect_messages);
}

fn update_effect_messages(mut msgs: ResMut<Messages<SpawnEffectRequest>>) {
    msgs.update();
}

fn init_effect_pool(mut commands: Commands, mut pool: ResMut<EffectPool>) {
    pool.free.clear();
    let cap = pool.capacity;
    pool.free.reserve(cap);

    for _ in 0..cap {
        let e = commands
            .spawn((
                Name::new("Effect(Pooled)"),
                PooledEffect,
                EffectState::Inactive,
                EffectAnim {
                    timer: Timer::from_seconds(EFFECT_LIFETIME_SECS, TimerMode::Once),
                },
                Sprite::default(),
                Transform::from_xyz(0.0, 0.0, 1.5),
                Visibility::Hidden,
            ))
            .id();

        pool.free.push(e);
    }
}

fn allocate_effects(
    mut pool: ResMut<EffectPool>,
    mut reader: MessageReader<SpawnEffectRequest>,
    mut q: Query<
        (&mut EffectState, &mut EffectAnim, &mut Sprite, &mut Transform, &mut Visibility),
        With<PooledEffect>,
    >,
) {
    for req in reader.read() {
        let Some(e) = pool.free.pop() else {
            continue;
        };

        let (mut state, mut anim, mut sprite, mut tf, mut vis) = q
            .get_mut(e)
            .expect("EffectPool contained an entity missing pooled effect components");

        *state = EffectState::Active;
        anim.timer = Timer::from_seconds(EFFECT_LIFETIME_SECS, TimerMode::Once);
        sprite.color = req.kind.color();
        sprite.custom_size = Some(req.kind.size());

        // Long axis along the facing direction.
        let angle = req.dir.y.atan2(req.dir.x) - std::f32::consts::FRAC_PI_2;
        tf.translation = req.pos.extend(1.5);
        tf.rotation = Quat::from_rotation_z(angle);
        tf.scale = Vec3::ONE;
        *vis = Visibility::Visible;
    }
}

fn expire_effects(
    time: Res<Time>,
    mut pool: ResMut<EffectPool>,
    mut q: Query<
        (Entity, &mut EffectState, &mut EffectAnim, &mut Sprite, &mut Visibility),
        With<PooledEffect>,
    >,
) {
    for (e, mut state, mut anim, mut sprite, mut vis) in &mut q {
        if *state != EffectState::Active {
            continue;
        }
        anim.timer.tick(time.delta());
        sprite.color = sprite.color.with_alpha(1.0 - anim.timer.fraction());

        if anim.timer.is_finished() {
            *state = EffectState::Inactive;
            *vis = Visibility::Hidden;
            pool.free.push(e);
        }
    }
}

#[cfg(test)]
mod tests;
