//! Audio preloading and playback. Handles are stashed in a resource so the
//! decoded buffers stay alive; playback itself is fire-and-forget. A missing
//! file never reaches game logic — Bevy's asset server logs it and the spawn
//! simply produces silence.

use bevy::prelude::*;

use crate::state::GameState;

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AudioHandles>()
            .add_systems(OnEnter(GameState::Loading), load_audio_handles)
            .add_systems(OnEnter(GameState::Walking), start_ambient);
    }
}

/// Game-wide audio clips. Each `Handle` is a cheap reference into Bevy's
/// asset storage.
#[derive(Resource, Default)]
pub struct AudioHandles {
    pub ambient: Option<Handle<AudioSource>>,
    pub bark: Option<Handle<AudioSource>>,
}

#[derive(Component)]
struct AmbientTrack;

fn load_audio_handles(asset_server: Res<AssetServer>, mut handles: ResMut<AudioHandles>) {
    handles.ambient = Some(asset_server.load("audio/forest_ambience.ogg"));
    handles.bark = Some(asset_server.load("audio/bark.ogg"));
}

/// Starts the looping background track once the walk begins. Starting on the
/// first state transition after input exists also sidesteps browser autoplay
/// rejection on web builds, where audio before a user gesture is muted.
fn start_ambient(
    mut commands: Commands,
    handles: Res<AudioHandles>,
    playing: Query<Entity, With<AmbientTrack>>,
) {
    if !playing.is_empty() {
        return;
    }

    let Some(source) = handles.ambient.clone() else {
        return;
    };

    commands.spawn((
        AmbientTrack,
        Name::new("AmbientTrack"),
        AudioBundle {
            source,
            settings: PlaybackSettings::LOOP,
        },
    ));
}
