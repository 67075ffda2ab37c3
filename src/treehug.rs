//! Fourth vignette: a full-screen tree-hug clip on a fixed timer.

use bevy::prelude::*;

use crate::config::SceneTuning;
use crate::movement::MoveBudget;
use crate::state::{GameSet, VignetteState};

pub struct TreeHugPlugin;

impl Plugin for TreeHugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(VignetteState::TreeHug), spawn_overlay)
            .add_systems(OnExit(VignetteState::TreeHug), despawn_overlay)
            .add_systems(
                Update,
                close_after_delay
                    .in_set(GameSet::Effects)
                    .run_if(in_state(VignetteState::TreeHug)),
            );
    }
}

#[derive(Component)]
struct TreeHugOverlay;

#[derive(Resource)]
struct TreeHugTimer(Timer);

fn spawn_overlay(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tuning: Res<SceneTuning>,
) {
    commands.insert_resource(TreeHugTimer(Timer::from_seconds(
        tuning.tree_hug_duration,
        TimerMode::Once,
    )));

    commands
        .spawn((
            TreeHugOverlay,
            Name::new("TreeHugOverlay"),
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
            parent.spawn(ImageBundle {
                image: UiImage::new(asset_server.load("textures/tree_hug.png")),
                style: Style {
                    max_width: Val::Percent(80.0),
                    max_height: Val::Percent(80.0),
                    ..default()
                },
                ..default()
            });
        });
}

fn close_after_delay(
    time: Res<Time>,
    tuning: Res<SceneTuning>,
    mut timer: ResMut<TreeHugTimer>,
    mut budget: ResMut<MoveBudget>,
    mut next_vignette: ResMut<NextState<VignetteState>>,
) {
    if timer.0.tick(time.delta()).just_finished() {
        budget.refill(tuning.refill_budget);
        next_vignette.set(VignetteState::Idle);
    }
}

fn despawn_overlay(mut commands: Commands, overlays: Query<Entity, With<TreeHugOverlay>>) {
    for entity in &overlays {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<TreeHugTimer>();
}
