//! The finale: a bounded sequence of full-screen clips once the character
//! reaches the end of the path, then a closing card that stays up. Movement
//! never comes back; `GameState::Finale` has no exit transition.

use bevy::prelude::*;

use crate::config::SceneTuning;
use crate::state::{GameSet, GameState};

pub struct FinalePlugin;

impl Plugin for FinalePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Finale), spawn_finale)
            .add_systems(
                Update,
                advance_clips
                    .in_set(GameSet::Effects)
                    .run_if(in_state(GameState::Finale)),
            );
    }
}

const CLIP_PATHS: [&str; 3] = [
    "textures/finale_confetti.png",
    "textures/finale_cake.png",
    "textures/finale_candles.png",
];

#[derive(Component)]
struct FinaleClip;

#[derive(Component)]
struct FinaleOverlay;

/// Progress through the clip sequence. Once `shown` reaches the clip count
/// the timer is disarmed and the closing card remains forever.
#[derive(Resource)]
struct FinaleSequence {
    shown: usize,
    timer: Option<Timer>,
}

fn spawn_finale(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tuning: Res<SceneTuning>,
) {
    commands.insert_resource(FinaleSequence {
        shown: 0,
        timer: Some(Timer::from_seconds(
            tuning.finale_clip_duration,
            TimerMode::Once,
        )),
    });

    commands
        .spawn((
            FinaleOverlay,
            Name::new("FinaleOverlay"),
            NodeBundle {
                background_color: BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                FinaleClip,
                ImageBundle {
                    image: UiImage::new(asset_server.load(CLIP_PATHS[0])),
                    style: Style {
                        max_width: Val::Percent(80.0),
                        max_height: Val::Percent(80.0),
                        ..default()
                    },
                    ..default()
                },
            ));
        });
}

fn advance_clips(
    time: Res<Time>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tuning: Res<SceneTuning>,
    mut sequence: ResMut<FinaleSequence>,
    mut clips: Query<&mut UiImage, With<FinaleClip>>,
    clip_entities: Query<Entity, With<FinaleClip>>,
    overlays: Query<Entity, With<FinaleOverlay>>,
) {
    {
        let Some(timer) = sequence.timer.as_mut() else {
            return;
        };
        if !timer.tick(time.delta()).just_finished() {
            return;
        }
    }

    sequence.shown += 1;
    let clip_count = tuning.finale_clip_count.min(CLIP_PATHS.len());

    if sequence.shown < clip_count {
        for mut image in &mut clips {
            *image = UiImage::new(asset_server.load(CLIP_PATHS[sequence.shown]));
        }
        sequence.timer = Some(Timer::from_seconds(tuning.finale_clip_duration, TimerMode::Once));
        return;
    }

    // Sequence exhausted: swap the clip for the closing card and disarm.
    sequence.timer = None;
    info!("The walk is complete.");

    for entity in &clip_entities {
        commands.entity(entity).despawn_recursive();
    }
    if let Ok(overlay) = overlays.get_single() {
        commands.entity(overlay).with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "Happy birthday, Julie.\nThe end.",
                TextStyle {
                    font_size: 48.0,
                    color: Color::srgba(0.95, 0.9, 0.8, 1.0),
                    ..default()
                },
            ));
        });
    }
}
