//! Decorative forest scenery: randomized trees and shrubs below the path.
//!
//! Placements are expressed in absolute scene coordinates, so a resize throws
//! everything away and samples fresh positions rather than trying to remap the
//! old ones. Overlaps are allowed; there is no spatial deduplication.

use bevy::prelude::*;
use bevy::sprite::MaterialMesh2dBundle;
use rand::Rng;

use crate::config::SceneTuning;
use crate::geometry::{SceneGeometry, SceneRescaled};
use crate::path::path_y;
use crate::state::GameSet;

pub struct SceneryPlugin;

impl Plugin for SceneryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, regenerate_scenery.in_set(GameSet::Rescale));
    }
}

/// Marker for every spawned decoration, so regeneration can sweep them all.
#[derive(Component)]
pub struct SceneryPiece;

const Z_SHRUB: f32 = 0.3;
const Z_TREE: f32 = 0.4;

/// Minimum scaled distance a tree keeps from the path centerline.
const TREE_PATH_MARGIN: f32 = 30.0;
/// Shrubs hug the band just below the path.
const SHRUB_BAND_OFFSET: f32 = 20.0;
const SHRUB_BAND_DEPTH: f32 = 30.0;

/// Fixed tree variants: canopy color plus canopy/trunk dimensions in design
/// pixels.
pub struct TreeKind {
    pub canopy: (f32, f32, f32),
    pub height: f32,
    pub width: f32,
    pub trunk_height: f32,
    pub trunk_width: f32,
}

pub const TREE_KINDS: [TreeKind; 4] = [
    // Forest green
    TreeKind {
        canopy: (0.13, 0.55, 0.13),
        height: 60.0,
        width: 60.0,
        trunk_height: 40.0,
        trunk_width: 10.0,
    },
    // Dark green
    TreeKind {
        canopy: (0.0, 0.39, 0.0),
        height: 50.0,
        width: 50.0,
        trunk_height: 30.0,
        trunk_width: 8.0,
    },
    // Lime green
    TreeKind {
        canopy: (0.2, 0.8, 0.2),
        height: 70.0,
        width: 70.0,
        trunk_height: 45.0,
        trunk_width: 12.0,
    },
    // Hunter green
    TreeKind {
        canopy: (0.21, 0.37, 0.23),
        height: 80.0,
        width: 80.0,
        trunk_height: 50.0,
        trunk_width: 15.0,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct TreePlacement {
    pub x: f32,
    pub y: f32,
    pub kind: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ShrubPlacement {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Per-shrub green jitter in `0.0..1.0`.
    pub shade: f32,
}

/// Samples tree positions: x uniform over the width, y uniform in the band
/// between the path (plus a scaled margin) and the bottom edge.
pub fn generate_trees(
    rng: &mut impl Rng,
    geometry: &SceneGeometry,
    tuning: &SceneTuning,
) -> Vec<TreePlacement> {
    (0..tuning.tree_count)
        .map(|_| {
            let x = rng.gen_range(0.0..geometry.width);
            let min_y = path_y(x, geometry, tuning) + TREE_PATH_MARGIN * geometry.scale;
            let y = if min_y < geometry.height {
                rng.gen_range(min_y..geometry.height)
            } else {
                geometry.height
            };
            TreePlacement {
                x,
                y,
                kind: rng.gen_range(0..TREE_KINDS.len()),
            }
        })
        .collect()
}

/// Samples shrub positions in a narrow strip just below the path.
pub fn generate_shrubs(
    rng: &mut impl Rng,
    geometry: &SceneGeometry,
    tuning: &SceneTuning,
) -> Vec<ShrubPlacement> {
    (0..tuning.shrub_count)
        .map(|_| {
            let x = rng.gen_range(0.0..geometry.width);
            let y = path_y(x, geometry, tuning)
                + (SHRUB_BAND_OFFSET + rng.gen_range(0.0..SHRUB_BAND_DEPTH)) * geometry.scale;
            ShrubPlacement {
                x,
                y,
                size: rng.gen_range(10.0..25.0) * geometry.scale,
                shade: rng.gen_range(0.0..1.0),
            }
        })
        .collect()
}

fn regenerate_scenery(
    mut rescaled: EventReader<SceneRescaled>,
    mut commands: Commands,
    existing: Query<Entity, With<SceneryPiece>>,
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
        commands.entity(entity).despawn_recursive();
    }

    let mut rng = rand::thread_rng();

    // One mesh/material pair per tree variant, shared by all its instances.
    let kind_assets: Vec<_> = TREE_KINDS
        .iter()
        .map(|kind| {
            let canopy_mesh = meshes.add(Triangle2d::new(
                Vec2::new(-kind.width * 0.5 * geometry.scale, 0.0),
                Vec2::new(kind.width * 0.5 * geometry.scale, 0.0),
                Vec2::new(0.0, kind.height * geometry.scale),
            ));
            let trunk_mesh = meshes.add(Rectangle::new(
                kind.trunk_width * geometry.scale,
                kind.trunk_height * geometry.scale,
            ));
            let canopy_material = materials.add(Color::srgb(
                kind.canopy.0,
                kind.canopy.1,
                kind.canopy.2,
            ));
            (canopy_mesh, trunk_mesh, canopy_material)
        })
        .collect();
    let trunk_material = materials.add(Color::srgb(0.55, 0.27, 0.07));

    for tree in generate_trees(&mut rng, &geometry, &tuning) {
        let kind = &TREE_KINDS[tree.kind];
        let (canopy_mesh, trunk_mesh, canopy_material) = &kind_assets[tree.kind];
        commands
            .spawn((
                SceneryPiece,
                SpatialBundle::from_transform(Transform::from_translation(
                    geometry.scene_to_world(tree.x, tree.y, Z_TREE),
                )),
            ))
            .with_children(|parent| {
                parent.spawn(MaterialMesh2dBundle {
                    mesh: canopy_mesh.clone().into(),
                    material: canopy_material.clone(),
                    ..default()
                });
                parent.spawn(MaterialMesh2dBundle {
                    mesh: trunk_mesh.clone().into(),
                    material: trunk_material.clone(),
                    transform: Transform::from_xyz(
                        0.0,
                        -kind.trunk_height * 0.5 * geometry.scale,
                        -0.01,
                    ),
                    ..default()
                });
            });
    }

    for shrub in generate_shrubs(&mut rng, &geometry, &tuning) {
        let green = 0.55 + shrub.shade * 0.08;
        commands.spawn((
            SceneryPiece,
            MaterialMesh2dBundle {
                mesh: meshes.add(Circle::new(shrub.size)).into(),
                material: materials.add(Color::srgb(0.13 + shrub.shade * 0.08, green, 0.13)),
                transform: Transform::from_translation(geometry.scene_to_world(
                    shrub.x,
                    shrub.y,
                    Z_SHRUB,
                )),
                ..default()
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixtures() -> (SceneGeometry, SceneTuning) {
        (SceneGeometry::default(), SceneTuning::default())
    }

    #[test]
    fn trees_stay_in_the_band_below_the_path() {
        let (geometry, tuning) = fixtures();
        let mut rng = StdRng::seed_from_u64(7);

        let trees = generate_trees(&mut rng, &geometry, &tuning);
        assert_eq!(trees.len(), tuning.tree_count);

        for tree in &trees {
            let min_y = path_y(tree.x, &geometry, &tuning) + TREE_PATH_MARGIN * geometry.scale;
            assert!(tree.y >= min_y - 1e-3, "tree above the path band");
            assert!(tree.y <= geometry.height, "tree below the bottom edge");
            assert!(tree.kind < TREE_KINDS.len());
        }
    }

    #[test]
    fn shrubs_hug_the_path() {
        let (geometry, tuning) = fixtures();
        let mut rng = StdRng::seed_from_u64(11);

        let shrubs = generate_shrubs(&mut rng, &geometry, &tuning);
        assert_eq!(shrubs.len(), tuning.shrub_count);

        for shrub in &shrubs {
            let path = path_y(shrub.x, &geometry, &tuning);
            assert!(shrub.y >= path + SHRUB_BAND_OFFSET * geometry.scale - 1e-3);
            assert!(
                shrub.y <= path + (SHRUB_BAND_OFFSET + SHRUB_BAND_DEPTH) * geometry.scale + 1e-3
            );
        }
    }

    #[test]
    fn regeneration_produces_fresh_positions() {
        let (geometry, tuning) = fixtures();
        let mut first_rng = StdRng::seed_from_u64(1);
        let mut second_rng = StdRng::seed_from_u64(2);

        let first: Vec<f32> = generate_trees(&mut first_rng, &geometry, &tuning)
            .iter()
            .map(|t| t.x)
            .collect();
        let second: Vec<f32> = generate_trees(&mut second_rng, &geometry, &tuning)
            .iter()
            .map(|t| t.x)
            .collect();

        assert_ne!(first, second);
    }

    #[test]
    fn degenerate_band_clamps_to_the_bottom_edge() {
        let tuning = SceneTuning::default();
        // A scene so short the path baseline sits at the bottom: the sampling
        // band is empty and placement must not panic.
        let geometry = SceneGeometry::from_size(1280.0, 10.0, tuning.base_width);
        let mut rng = StdRng::seed_from_u64(3);

        let trees = generate_trees(&mut rng, &geometry, &tuning);
        assert_eq!(trees.len(), tuning.tree_count);
        for tree in &trees {
            assert!(tree.y <= geometry.height);
        }
    }
}
