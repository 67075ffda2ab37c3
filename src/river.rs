//! River backdrop, forest floor, the path ribbon, and the animated waves.
//!
//! The static fills are triangle-strip meshes sampled along the path curve and
//! rebuilt on rescale. The five wave polylines are immediate-mode gizmos drawn
//! every frame from independent phase accumulators; the accumulators grow
//! without bound, which is fine because only their value modulo 2π reaches the
//! sine.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;
use bevy::sprite::MaterialMesh2dBundle;

use crate::config::SceneTuning;
use crate::geometry::{SceneGeometry, SceneRescaled};
use crate::path::path_y;
use crate::state::GameSet;

pub struct RiverPlugin;

impl Plugin for RiverPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveField>().add_systems(
            Update,
            (
                rebuild_layers.in_set(GameSet::Rescale),
                (advance_waves, draw_waves).chain().in_set(GameSet::Effects),
            ),
        );
    }
}

/// Horizontal sampling step for fills and wave polylines, in scene pixels.
const SAMPLE_STEP: f32 = 5.0;

/// Half-width of the walkable path ribbon in design pixels.
const PATH_HALF_WIDTH: f32 = 20.0;

const Z_RIVER: f32 = 0.0;
const Z_FLOOR: f32 = 0.1;
const Z_PATH: f32 = 0.2;

/// Phase advance per 60 Hz frame-step for the base wave.
pub const WAVE_SPEED: f32 = 0.05;
/// Per-wave multiplier on the base speed; all distinct so the bands drift out
/// of phase with each other.
pub const WAVE_RATES: [f32; 5] = [1.0, 1.2, 0.8, 1.1, 0.9];
/// Each wave band sits at this fraction of the water depth above the path.
const WAVE_BANDS: [f32; 5] = [0.1, 0.25, 0.4, 0.55, 0.7];
const WAVE_HEIGHT: f32 = 8.0;
const WAVE_FREQUENCY: f32 = 0.015;

/// The five wave phase accumulators.
#[derive(Resource, Default)]
pub struct WaveField {
    pub phases: [f32; 5],
}

/// Advances every phase by its own rate. `step` is measured in 60 Hz frame
/// equivalents so the drift speed matches the design frame rate regardless of
/// the actual refresh interval.
pub fn advance_phases(phases: &mut [f32; 5], step: f32) {
    for (phase, rate) in phases.iter_mut().zip(WAVE_RATES) {
        *phase += WAVE_SPEED * rate * step;
    }
}

fn advance_waves(time: Res<Time>, mut waves: ResMut<WaveField>) {
    advance_phases(&mut waves.phases, time.delta_seconds() * 60.0);
}

#[derive(Component)]
struct RiverLayer;

fn rebuild_layers(
    mut rescaled: EventReader<SceneRescaled>,
    mut commands: Commands,
    existing: Query<Entity, With<RiverLayer>>,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if rescaled.is_empty() {
        return;
    }
    rescaled.clear();

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let path = |x: f32| path_y(x, &geometry, &tuning);
    let half_ribbon = PATH_HALF_WIDTH * geometry.scale;

    let layers = [
        // Water from the top edge down to the path curve.
        (
            strip_mesh(&geometry, |_| 0.0, &path),
            Color::srgb(0.36, 0.67, 0.93),
            Z_RIVER,
        ),
        // Forest floor from the path curve down to the bottom edge.
        (
            strip_mesh(&geometry, &path, |_| geometry.height),
            Color::srgb(0.82, 0.71, 0.55),
            Z_FLOOR,
        ),
        // The trodden path ribbon along the centerline.
        (
            strip_mesh(
                &geometry,
                |x| path(x) - half_ribbon,
                |x| path(x) + half_ribbon,
            ),
            Color::srgb(0.55, 0.27, 0.07),
            Z_PATH,
        ),
    ];

    for (mesh, color, z) in layers {
        commands.spawn((
            RiverLayer,
            MaterialMesh2dBundle {
                mesh: meshes.add(mesh).into(),
                material: materials.add(color),
                transform: Transform::from_xyz(0.0, 0.0, z),
                ..default()
            },
        ));
    }
}

/// Builds a vertical triangle strip between two scene-space curves, already
/// converted into world coordinates.
fn strip_mesh(
    geometry: &SceneGeometry,
    top: impl Fn(f32) -> f32,
    bottom: impl Fn(f32) -> f32,
) -> Mesh {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();

    let mut x: f32 = 0.0;
    loop {
        let clamped = x.min(geometry.width);
        for y in [top(clamped), bottom(clamped)] {
            let world = geometry.scene_to_world(clamped, y, 0.0);
            positions.push([world.x, world.y, 0.0]);
            uvs.push([clamped / geometry.width, y / geometry.height]);
        }
        if clamped >= geometry.width {
            break;
        }
        x += SAMPLE_STEP;
    }

    Mesh::new(
        PrimitiveTopology::TriangleStrip,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
}

fn draw_waves(
    mut gizmos: Gizmos,
    waves: Res<WaveField>,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
) {
    let colors = [
        Color::srgb(0.29, 0.56, 0.89),
        Color::srgb(0.21, 0.48, 0.74),
        Color::srgb(0.18, 0.36, 0.54),
        Color::srgb(0.29, 0.56, 0.89),
        Color::srgb(0.21, 0.48, 0.74),
    ];

    for ((band, phase), color) in WAVE_BANDS.iter().zip(waves.phases).zip(colors) {
        let mut points = Vec::new();
        let mut x = 0.0;
        while x <= geometry.width {
            let water_depth = path_y(x, &geometry, &tuning);
            let y = water_depth * band
                + (x * WAVE_FREQUENCY + phase).sin() * WAVE_HEIGHT * geometry.scale;
            points.push(geometry.scene_to_world(x, y, 0.0).truncate());
            x += SAMPLE_STEP;
        }
        gizmos.linestrip_2d(points, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_advance_at_distinct_rates() {
        let mut phases = [0.0; 5];
        advance_phases(&mut phases, 1.0);

        for (phase, rate) in phases.iter().zip(WAVE_RATES) {
            assert!((phase - WAVE_SPEED * rate).abs() < 1e-6);
        }

        // No two bands drift at the same speed.
        for i in 0..phases.len() {
            for j in (i + 1)..phases.len() {
                assert_ne!(phases[i], phases[j]);
            }
        }
    }

    #[test]
    fn phases_accumulate_without_wrapping() {
        let mut phases = [0.0; 5];
        for _ in 0..10_000 {
            advance_phases(&mut phases, 1.0);
        }
        for (phase, rate) in phases.iter().zip(WAVE_RATES) {
            assert!((phase - WAVE_SPEED * rate * 10_000.0).abs() < 1e-1);
        }
    }

    #[test]
    fn strip_covers_the_full_width() {
        let geometry = SceneGeometry::default();
        let mesh = strip_mesh(&geometry, |_| 0.0, |_| geometry.height);

        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|values| values.as_float3())
            .expect("strip mesh has positions");

        // Pairs of vertices, first pair at the left edge, last at the right.
        assert!(positions.len() >= 4);
        assert_eq!(positions.len() % 2, 0);
        assert_eq!(positions[0][0], -geometry.width * 0.5);
        assert_eq!(positions[positions.len() - 1][0], geometry.width * 0.5);
    }
}
