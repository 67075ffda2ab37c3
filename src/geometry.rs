//! Scene-space bookkeeping and resize handling.
//!
//! Gameplay math runs in "scene space": x grows rightward from the left edge,
//! y grows downward from the top edge, exactly the span of the window. The
//! `SceneGeometry` resource owns the conversion into Bevy's centered, y-up
//! world space and the uniform scale factor applied to every design-pixel
//! constant.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::config::SceneTuning;

pub struct GeometryPlugin;

impl Plugin for GeometryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneGeometry>()
            .add_event::<SceneRescaled>()
            .add_systems(Startup, init_geometry)
            // Runs in PreUpdate so every Update system sees this frame's
            // dimensions, never last frame's.
            .add_systems(PreUpdate, watch_resize);
    }
}

/// Current drawable area and the derived scale factor.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct SceneGeometry {
    pub width: f32,
    pub height: f32,
    /// `width / base_width`; multiplies all design-pixel constants.
    pub scale: f32,
}

impl Default for SceneGeometry {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            scale: 1.0,
        }
    }
}

impl SceneGeometry {
    pub fn from_size(width: f32, height: f32, base_width: f32) -> Self {
        Self {
            width,
            height,
            scale: width / base_width,
        }
    }

    /// Converts a scene-space point to a world-space translation at depth `z`.
    pub fn scene_to_world(&self, x: f32, y: f32, z: f32) -> Vec3 {
        Vec3::new(x - self.width * 0.5, self.height * 0.5 - y, z)
    }
}

/// Fired whenever the scene dimensions change. Carries the previous geometry
/// so consumers can remap positions proportionally.
#[derive(Event)]
pub struct SceneRescaled {
    pub previous: SceneGeometry,
}

fn init_geometry(
    windows: Query<&Window, With<PrimaryWindow>>,
    tuning: Res<SceneTuning>,
    mut geometry: ResMut<SceneGeometry>,
    mut rescaled: EventWriter<SceneRescaled>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    let previous = *geometry;
    *geometry = SceneGeometry::from_size(window.width(), window.height(), tuning.base_width);
    rescaled.send(SceneRescaled { previous });
}

fn watch_resize(
    mut resize_events: EventReader<WindowResized>,
    tuning: Res<SceneTuning>,
    mut geometry: ResMut<SceneGeometry>,
    mut rescaled: EventWriter<SceneRescaled>,
) {
    // Coalesce a burst of resize events into one recompute.
    let Some(event) = resize_events.read().last() else {
        return;
    };

    let previous = *geometry;
    *geometry = SceneGeometry::from_size(event.width, event.height, tuning.base_width);

    if *geometry != previous {
        rescaled.send(SceneRescaled { previous });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_tracks_width() {
        let geometry = SceneGeometry::from_size(640.0, 360.0, 1280.0);
        assert_eq!(geometry.scale, 0.5);

        let geometry = SceneGeometry::from_size(2560.0, 1440.0, 1280.0);
        assert_eq!(geometry.scale, 2.0);
    }

    #[test]
    fn scene_to_world_centers_and_flips_y() {
        let geometry = SceneGeometry::default();

        // Scene origin (top-left) maps to the top-left of the world view.
        assert_eq!(
            geometry.scene_to_world(0.0, 0.0, 0.0),
            Vec3::new(-640.0, 360.0, 0.0)
        );
        // Scene center maps to the world origin.
        assert_eq!(
            geometry.scene_to_world(640.0, 360.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0)
        );
        // y grows downward in scene space.
        assert!(geometry.scene_to_world(0.0, 700.0, 0.0).y < 0.0);
    }
}
