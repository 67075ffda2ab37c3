//! The walking character: spawn, idle animation, sparkle halo, and rescale
//! repositioning.
//!
//! The character's authoritative position lives in scene space on the
//! [`Character`] component; its `Transform` is derived from that every frame
//! after movement has settled.

use bevy::prelude::*;
use bevy::sprite::MaterialMesh2dBundle;
use rand::Rng;

use crate::config::SceneTuning;
use crate::geometry::{SceneGeometry, SceneRescaled};
use crate::path::path_y;
use crate::state::{GameSet, GameState};

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Walking), spawn_character)
            .add_systems(
                Update,
                (
                    rescale_character.in_set(GameSet::Rescale),
                    (animate_character, sync_character_transform, animate_sparkles)
                        .in_set(GameSet::Effects),
                ),
            );
    }
}

const Z_CHARACTER: f32 = 0.8;

/// Sparkle orbit advance per 60 Hz frame-step.
const SPARKLE_STEP: f32 = 0.1;
/// Hair wave advance per 60 Hz frame-step.
const HAIR_WAVE_STEP: f32 = 0.1;
const SPARKLE_COUNT: usize = 10;
const SPARKLE_ORBIT: f32 = 20.0;
const SPARKLE_LIFT: f32 = 30.0;

/// The player avatar. Scene-space position is authoritative; the sprite
/// transform is derived from it.
#[derive(Component)]
pub struct Character {
    pub scene_x: f32,
    pub scene_y: f32,
    /// Unbounded idle-animation phase; only its sine matters.
    pub hair_wave: f32,
}

/// One orbiting sparkle in the character's halo.
#[derive(Component)]
pub struct Sparkle {
    pub angle: f32,
    pub speed: f32,
}

fn spawn_character(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let scene_x = geometry.width * tuning.start_x_fraction;
    let scene_y = path_y(scene_x, &geometry, &tuning);

    let texture = asset_server.load("textures/walker.png");
    let mut rng = rand::thread_rng();

    commands
        .spawn((
            Name::new("Character"),
            Character {
                scene_x,
                scene_y,
                hair_wave: 0.0,
            },
            SpriteBundle {
                texture,
                sprite: Sprite {
                    custom_size: Some(
                        Vec2::new(tuning.character_width, tuning.character_height)
                            * geometry.scale,
                    ),
                    ..default()
                },
                transform: Transform::from_translation(geometry.scene_to_world(
                    scene_x,
                    scene_y,
                    Z_CHARACTER,
                )),
                ..default()
            },
        ))
        .with_children(|parent| {
            for _ in 0..SPARKLE_COUNT {
                let size = rng.gen_range(3.0..7.0);
                let opacity = rng.gen_range(0.3..1.0);
                parent.spawn((
                    Sparkle {
                        angle: rng.gen_range(0.0..std::f32::consts::TAU),
                        speed: rng.gen_range(0.5..1.5),
                    },
                    MaterialMesh2dBundle {
                        mesh: meshes.add(Circle::new(size * geometry.scale)).into(),
                        material: materials
                            .add(Color::srgba(1.0, 0.75, 0.8, opacity)),
                        transform: Transform::from_xyz(0.0, SPARKLE_LIFT, 0.1),
                        ..default()
                    },
                ));
            }
        });
}

/// Advances the hair-wave phase; the bob is applied as a slight roll so the
/// sprite sways in place between steps.
fn animate_character(time: Res<Time>, mut characters: Query<(&mut Character, &mut Transform)>) {
    let step = time.delta_seconds() * 60.0;
    for (mut character, mut transform) in &mut characters {
        character.hair_wave += HAIR_WAVE_STEP * step;
        transform.rotation = Quat::from_rotation_z(character.hair_wave.sin() * 0.03);
    }
}

fn sync_character_transform(
    geometry: Res<SceneGeometry>,
    mut characters: Query<(&Character, &mut Transform)>,
) {
    for (character, mut transform) in &mut characters {
        transform.translation =
            geometry.scene_to_world(character.scene_x, character.scene_y, Z_CHARACTER);
    }
}

fn animate_sparkles(time: Res<Time>, mut sparkles: Query<(&mut Sparkle, &mut Transform)>) {
    let step = time.delta_seconds() * 60.0;
    for (mut sparkle, mut transform) in &mut sparkles {
        let advance = SPARKLE_STEP * sparkle.speed * step;
        sparkle.angle += advance;
        transform.translation.x = sparkle.angle.cos() * SPARKLE_ORBIT;
        transform.translation.y = SPARKLE_LIFT - sparkle.angle.sin() * SPARKLE_ORBIT;
    }
}

/// Keeps the character at the same fractional progress across a resize and
/// re-derives its height from the path.
fn rescale_character(
    mut rescaled: EventReader<SceneRescaled>,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
    mut characters: Query<(&mut Character, &mut Sprite)>,
) {
    let Some(event) = rescaled.read().last() else {
        return;
    };

    for (mut character, mut sprite) in &mut characters {
        let fraction = if event.previous.width > 0.0 {
            character.scene_x / event.previous.width
        } else {
            tuning.start_x_fraction
        };
        character.scene_x = fraction * geometry.width;
        character.scene_y = path_y(character.scene_x, &geometry, &tuning);
        sprite.custom_size = Some(
            Vec2::new(tuning.character_width, tuning.character_height) * geometry.scale,
        );
    }
}
