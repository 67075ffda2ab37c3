//! Second vignette: a pug sprints across the scene along the path.
//!
//! The dog's sprite frames are driven by a fixed-rate ticker that is
//! independent of the render loop: a repeating timer advances the frame
//! counter at `dog_frame_rate` steps per second only while the dog runs. The
//! run itself is frame-rate independent movement; the vignette completes when
//! the dog leaves the right edge.

use bevy::prelude::*;

use crate::audio::AudioHandles;
use crate::config::SceneTuning;
use crate::geometry::SceneGeometry;
use crate::movement::MoveBudget;
use crate::path::path_y;
use crate::state::{GameSet, GameState, VignetteState};

pub struct DogPlugin;

impl Plugin for DogPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_dog_sheet)
            .add_systems(OnEnter(VignetteState::DogRun), spawn_dog)
            .add_systems(OnExit(VignetteState::DogRun), despawn_dog)
            .add_systems(
                Update,
                (
                    run_dog
                        .in_set(GameSet::Movement)
                        .run_if(in_state(VignetteState::DogRun)),
                    (tick_dog_frames, sync_dog).chain().in_set(GameSet::Effects),
                ),
            );
    }
}

/// Sprite sheet layout: 82x61 cells, five columns, two rows.
pub const DOG_CELL: UVec2 = UVec2::new(82, 61);
pub const DOG_COLS: usize = 5;
pub const DOG_ROWS: usize = 2;

const Z_DOG: f32 = 0.7;
/// How far off-screen the dog starts and ends, in design pixels.
const DOG_OVERSHOOT: f32 = 100.0;
/// Height of the dog above the path centerline, in design pixels.
const DOG_LIFT: f32 = 30.0;

/// Position within the sprite sheet cycle. Wraps the column within a row,
/// moves down a row after each full column sweep, and fully resets after the
/// total frame count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DogFrame {
    col: usize,
    row: usize,
    steps: usize,
}

impl DogFrame {
    pub fn advance(&mut self) {
        self.steps += 1;
        if self.steps >= DOG_COLS * DOG_ROWS {
            *self = Self::default();
            return;
        }
        self.col += 1;
        if self.col >= DOG_COLS {
            self.col = 0;
            self.row = (self.row + 1) % DOG_ROWS;
        }
    }

    pub fn atlas_index(&self) -> usize {
        self.row * DOG_COLS + self.col
    }
}

#[derive(Component)]
pub struct Dog {
    pub scene_x: f32,
    pub scene_y: f32,
    pub frame: DogFrame,
}

/// Preloaded sheet texture and grid layout.
#[derive(Resource, Default)]
pub struct DogSheet {
    texture: Handle<Image>,
    layout: Handle<TextureAtlasLayout>,
}

/// The fixed-rate frame ticker, shared by every run of the vignette.
#[derive(Resource)]
pub struct DogTicker {
    timer: Timer,
}

fn load_dog_sheet(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tuning: Res<SceneTuning>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let layout = layouts.add(TextureAtlasLayout::from_grid(
        DOG_CELL,
        DOG_COLS as u32,
        DOG_ROWS as u32,
        None,
        None,
    ));
    commands.insert_resource(DogSheet {
        texture: asset_server.load("textures/pug_running.png"),
        layout,
    });
    commands.insert_resource(DogTicker {
        timer: Timer::from_seconds(1.0 / tuning.dog_frame_rate, TimerMode::Repeating),
    });
}

fn spawn_dog(
    mut commands: Commands,
    sheet: Res<DogSheet>,
    audio: Res<AudioHandles>,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
    mut ticker: ResMut<DogTicker>,
) {
    let scene_x = -DOG_OVERSHOOT * geometry.scale;
    let scene_y = path_y(scene_x, &geometry, &tuning) - DOG_LIFT * geometry.scale;

    ticker.timer.reset();

    commands.spawn((
        Name::new("Dog"),
        Dog {
            scene_x,
            scene_y,
            frame: DogFrame::default(),
        },
        SpriteBundle {
            texture: sheet.texture.clone(),
            sprite: Sprite {
                custom_size: Some(Vec2::new(DOG_CELL.x as f32, DOG_CELL.y as f32) * geometry.scale),
                ..default()
            },
            transform: Transform::from_translation(geometry.scene_to_world(
                scene_x, scene_y, Z_DOG,
            )),
            ..default()
        },
        TextureAtlas {
            layout: sheet.layout.clone(),
            index: 0,
        },
    ));

    if let Some(bark) = audio.bark.clone() {
        commands.spawn(AudioBundle {
            source: bark,
            settings: PlaybackSettings::DESPAWN,
        });
    }
}

/// Carries the dog rightward along the path. Leaving the right edge completes
/// the vignette: the budget refills and the gate reopens.
fn run_dog(
    time: Res<Time>,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
    mut dogs: Query<&mut Dog>,
    mut budget: ResMut<MoveBudget>,
    mut next_vignette: ResMut<NextState<VignetteState>>,
) {
    for mut dog in &mut dogs {
        dog.scene_x += tuning.dog_speed * geometry.scale * time.delta_seconds();
        dog.scene_y = path_y(dog.scene_x, &geometry, &tuning) - DOG_LIFT * geometry.scale;

        if dog_exited(dog.scene_x, &geometry) {
            budget.refill(tuning.refill_budget);
            next_vignette.set(VignetteState::Idle);
        }
    }
}

pub fn dog_exited(scene_x: f32, geometry: &SceneGeometry) -> bool {
    scene_x > geometry.width + DOG_OVERSHOOT * geometry.scale
}

/// Advances the sprite cycle at the ticker's fixed rate, independent of how
/// often the render loop happens to run.
fn tick_dog_frames(time: Res<Time>, mut ticker: ResMut<DogTicker>, mut dogs: Query<&mut Dog>) {
    ticker.timer.tick(time.delta());
    let steps = ticker.timer.times_finished_this_tick();
    if steps == 0 {
        return;
    }

    for mut dog in &mut dogs {
        for _ in 0..steps {
            dog.frame.advance();
        }
    }
}

fn sync_dog(geometry: Res<SceneGeometry>, mut dogs: Query<(&Dog, &mut Transform, &mut TextureAtlas)>) {
    for (dog, mut transform, mut atlas) in &mut dogs {
        transform.translation = geometry.scene_to_world(dog.scene_x, dog.scene_y, Z_DOG);
        atlas.index = dog.frame.atlas_index();
    }
}

fn despawn_dog(mut commands: Commands, dogs: Query<Entity, With<Dog>>) {
    for entity in &dogs {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_wrap_columns_then_rows_then_reset() {
        let mut frame = DogFrame::default();
        let mut indices = vec![frame.atlas_index()];
        for _ in 0..(DOG_COLS * DOG_ROWS) {
            frame.advance();
            indices.push(frame.atlas_index());
        }

        // One full cycle visits every cell in order, then returns to start.
        let expected: Vec<usize> = (0..DOG_COLS * DOG_ROWS).chain([0]).collect();
        assert_eq!(indices, expected);
        assert_eq!(frame, DogFrame::default());
    }

    #[test]
    fn atlas_index_is_row_major() {
        let mut frame = DogFrame::default();
        for _ in 0..DOG_COLS {
            frame.advance();
        }
        // After a full column sweep the cycle sits at the start of row two.
        assert_eq!(frame.atlas_index(), DOG_COLS);
    }

    #[test]
    fn exit_threshold_scales_with_the_scene() {
        let geometry = SceneGeometry::default();
        assert!(!dog_exited(geometry.width, &geometry));
        assert!(!dog_exited(geometry.width + DOG_OVERSHOOT, &geometry));
        assert!(dog_exited(geometry.width + DOG_OVERSHOOT + 1.0, &geometry));

        let half = SceneGeometry::from_size(640.0, 360.0, 1280.0);
        assert!(dog_exited(half.width + DOG_OVERSHOOT * half.scale + 1.0, &half));
    }
}
