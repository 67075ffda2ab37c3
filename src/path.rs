//! The winding path centerline the character walks along.

use crate::config::SceneTuning;
use crate::geometry::SceneGeometry;

/// Vertical position of the path at scene x: a sine wave around a baseline
/// fixed at a fraction of the scene height. The frequency is a constant in
/// scene pixels, so resizing rescales the baseline and amplitude but never the
/// wavelength.
pub fn path_y(x: f32, geometry: &SceneGeometry, tuning: &SceneTuning) -> f32 {
    geometry.height * tuning.path_baseline
        + (x * tuning.path_frequency).sin() * tuning.path_amplitude * geometry.scale
}

/// Scene x past which a walk step ends the stroll and starts the finale.
pub fn walk_end_x(geometry: &SceneGeometry, tuning: &SceneTuning) -> f32 {
    geometry.width - tuning.character_width * geometry.scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_fixed_inputs() {
        let geometry = SceneGeometry::default();
        let tuning = SceneTuning::default();

        for x in [0.0_f32, 1.5, 640.0, 1279.0, 5000.0] {
            assert_eq!(path_y(x, &geometry, &tuning), path_y(x, &geometry, &tuning));
        }
    }

    #[test]
    fn continuous_in_x() {
        let geometry = SceneGeometry::default();
        let tuning = SceneTuning::default();

        // Slope is bounded by amplitude * frequency, so neighbouring samples
        // stay within a tight band; in particular there is no jump at the
        // right edge of the scene.
        let mut x = 0.0_f32;
        while x < geometry.width + 200.0 {
            let step = 0.5;
            let dy = (path_y(x + step, &geometry, &tuning) - path_y(x, &geometry, &tuning)).abs();
            assert!(
                dy <= tuning.path_amplitude * tuning.path_frequency * step * 1.01,
                "discontinuity at x = {x}: dy = {dy}"
            );
            x += step;
        }
    }

    #[test]
    fn baseline_and_amplitude_scale_with_viewport() {
        let tuning = SceneTuning::default();
        let small = SceneGeometry::from_size(640.0, 360.0, tuning.base_width);
        let large = SceneGeometry::from_size(1280.0, 720.0, tuning.base_width);

        // At x = 0 the sine term vanishes, leaving the bare baseline.
        assert!((path_y(0.0, &small, &tuning) / small.height - tuning.path_baseline).abs() < 1e-5);
        assert!((path_y(0.0, &large, &tuning) / large.height - tuning.path_baseline).abs() < 1e-5);

        // The oscillating part grows with the scale factor.
        let x = 100.0;
        let small_swing = path_y(x, &small, &tuning) - small.height * tuning.path_baseline;
        let large_swing = path_y(x, &large, &tuning) - large.height * tuning.path_baseline;
        assert!((small_swing * 2.0 - large_swing).abs() < 1e-3);
    }

    #[test]
    fn walk_end_leaves_room_for_the_character() {
        let geometry = SceneGeometry::default();
        let tuning = SceneTuning::default();

        assert_eq!(
            walk_end_x(&geometry, &tuning),
            geometry.width - tuning.character_width
        );
    }
}
