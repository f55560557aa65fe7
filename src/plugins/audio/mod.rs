//! Audio plugin.
//!
//! Split the same way the rest of the game is:
//! - gameplay side: one-shot cue messages plus volume envelopes for the two
//!   looping tracks (background music and the darkness drone). Pure state,
//!   runs headless.
//! - render side (`register_output`): loads the actual sources and applies
//!   envelope volumes to sinks.
//!
//! Producers never touch sinks; they write an `AudioCue` message or ask an
//! envelope to fade. That keeps every survival/death rule testable without
//! an audio device.

use bevy::audio::Volume;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

/// One-shot sound effects, with the mix volume baked in per cue.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    EnemyHit,
    PlayerDeath,
    Dash,
    PowerUp,
}

impl AudioCue {
    pub fn volume(self) -> f32 {
        match self {
            Self::EnemyHit => 0.25,
            Self::PlayerDeath => 0.05,
            Self::Dash => 0.08,
            Self::PowerUp => 0.10,
        }
    }

    fn asset_path(self) -> &'static str {
        match self {
            Self::EnemyHit => "audio/enemy_hit.ogg",
            Self::PlayerDeath => "audio/die.ogg",
            Self::Dash => "audio/dash.ogg",
            Self::PowerUp => "audio/powerup.ogg",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// A volume that can be set instantly or faded over a duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Envelope {
    volume: f32,
    fade: Option<Fade>,
}

impl Envelope {
    pub fn new(volume: f32) -> Self {
        Self { volume, fade: None }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Jump to a volume, cancelling any running fade.
    pub fn set(&mut self, volume: f32) {
        self.volume = volume;
        self.fade = None;
    }

    /// Fade linearly from the current volume to `to` over `duration` seconds.
    pub fn fade_to(&mut self, to: f32, duration: f32) {
        if duration <= 0.0 {
            self.set(to);
            return;
        }
        self.fade = Some(Fade {
            from: self.volume,
            to,
            duration,
            elapsed: 0.0,
        });
    }

    fn tick(&mut self, dt: f32) {
        let Some(fade) = &mut self.fade else {
            return;
        };
        fade.elapsed += dt;
        let t = (fade.elapsed / fade.duration).clamp(0.0, 1.0);
        self.volume = fade.from + (fade.to - fade.from) * t;
        if t >= 1.0 {
            self.fade = None;
        }
    }
}

/// Envelopes for the looping tracks.
///
/// The darkness drone starts silent; the player starts in light.
#[derive(Resource, Debug, Clone, Copy)]
pub struct AudioLevels {
    pub background: Envelope,
    pub darkness: Envelope,
}

impl Default for AudioLevels {
    fn default() -> Self {
        Self {
            background: Envelope::new(1.0),
            darkness: Envelope::new(0.0),
        }
    }
}

pub fn plugin(app: &mut App) {
    app.insert_resource(AudioLevels::default());
    app.init_resource::<Messages<AudioCue>>();
    app.add_systems(OnEnter(crate::common::state::GameState::InGame), reset_levels);
    app.add_systems(Update, tick_levels);
    app.add_systems(PostUpdate, update_cue_messages);
}

/// Gameplay starts with the background track up and the darkness drone down,
/// whatever the splash screen left behind.
fn reset_levels(mut levels: ResMut<AudioLevels>) {
    *levels = AudioLevels::default();
}

fn tick_levels(time: Res<Time>, mut levels: ResMut<AudioLevels>) {
    let dt = time.delta_secs();
    levels.background.tick(dt);
    levels.darkness.tick(dt);
}

/// Messages are double-buffered; `update()` advances buffers.
fn update_cue_messages(mut msgs: ResMut<Messages<AudioCue>>) {
    msgs.update();
}

// -----------------------------------------------------------------------------
// Render-only output
// -----------------------------------------------------------------------------

#[derive(Component)]
struct BackgroundTrack;

#[derive(Component)]
struct DarknessTrack;

/// Register sink-facing systems. Requires DefaultPlugins (audio device).
pub fn register_output(app: &mut App) {
    app.add_systems(Startup, start_tracks);
    app.add_systems(Update, (apply_levels, play_cues));
}

fn start_tracks(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        Name::new("BackgroundTrack"),
        BackgroundTrack,
        AudioPlayer::<AudioSource>(asset_server.load("audio/ember_loop.ogg")),
        PlaybackSettings::LOOP,
    ));
    commands.spawn((
        Name::new("DarknessTrack"),
        DarknessTrack,
        AudioPlayer::<AudioSource>(asset_server.load("audio/darkness_loop.ogg")),
        PlaybackSettings {
            volume: Volume::Linear(0.0),
            ..PlaybackSettings::LOOP
        },
    ));
}

fn apply_levels(
    levels: Res<AudioLevels>,
    mut q_background: Query<&mut AudioSink, (With<BackgroundTrack>, Without<DarknessTrack>)>,
    mut q_darkness: Query<&mut AudioSink, (With<DarknessTrack>, Without<BackgroundTrack>)>,
) {
    if let Ok(mut sink) = q_background.single_mut() {
        sink.set_volume(Volume::Linear(levels.background.volume()));
    }
    if let Ok(mut sink) = q_darkness.single_mut() {
        sink.set_volume(Volume::Linear(levels.darkness.volume()));
    }
}

fn play_cues(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut cues: MessageReader<AudioCue>,
) {
    for cue in cues.read() {
        commands.spawn((
            AudioPlayer::<AudioSource>(asset_server.load(cue.asset_path())),
            PlaybackSettings {
                volume: Volume::Linear(cue.volume()),
                ..PlaybackSettings::DESPAWN
            },
        ));
    }
}

#[cfg(test)]
mod tests;
