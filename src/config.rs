//! Scene tuning constants gathered into one runtime resource.
//!
//! Every gameplay constant lives here so the rest of the code never hard-codes
//! pixel values. An optional `assets/tuning.json` file overrides individual
//! fields on native builds; a missing or malformed file falls back to the
//! defaults with a warning.

use bevy::prelude::*;
use serde::Deserialize;

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SceneTuning::load());
    }
}

/// All fixed gameplay constants, expressed at the 1280x720 design resolution.
/// Pixel-valued fields are multiplied by the current scale factor at the point
/// of use.
#[derive(Resource, Clone, Deserialize)]
#[serde(default)]
pub struct SceneTuning {
    /// Reference width the scale factor is computed against.
    pub base_width: f32,
    /// Path centerline as a fraction of scene height, measured from the top.
    pub path_baseline: f32,
    /// Sine amplitude of the path, in design pixels.
    pub path_amplitude: f32,
    /// Sine frequency in radians per scene pixel. Fixed in world units, so
    /// resizing never stretches the wavelength.
    pub path_frequency: f32,
    pub character_width: f32,
    pub character_height: f32,
    /// Horizontal distance covered by one walk press.
    pub step_size: f32,
    /// Character start as a fraction of scene width.
    pub start_x_fraction: f32,
    pub initial_budget: u32,
    /// Budget granted when a vignette completes.
    pub refill_budget: u32,
    /// Spacing between consecutive event spots along x.
    pub spot_spacing: f32,
    pub tree_count: usize,
    pub shrub_count: usize,
    /// Dog run speed in design pixels per second.
    pub dog_speed: f32,
    /// Sprite-frame advances per second while the dog runs.
    pub dog_frame_rate: f32,
    /// Seconds between the last card flip and the overlay closing.
    pub tarot_close_delay: f32,
    /// Seconds between satisfying the cup/book condition and the props hiding.
    pub props_close_delay: f32,
    pub tree_hug_duration: f32,
    pub finale_clip_duration: f32,
    pub finale_clip_count: usize,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            base_width: 1280.0,
            path_baseline: 0.7,
            path_amplitude: 50.0,
            path_frequency: 0.005,
            character_width: 160.0,
            character_height: 240.0,
            step_size: 173.0,
            start_x_fraction: 0.05,
            initial_budget: 3,
            refill_budget: 5,
            spot_spacing: 240.0,
            tree_count: 200,
            shrub_count: 100,
            dog_speed: 300.0,
            dog_frame_rate: 20.0,
            tarot_close_delay: 1.0,
            props_close_delay: 0.5,
            tree_hug_duration: 10.0,
            finale_clip_duration: 3.0,
            finale_clip_count: 3,
        }
    }
}

impl SceneTuning {
    /// Defaults, with field-level overrides from `assets/tuning.json` when the
    /// file is present and parses. Web builds always use the defaults.
    pub fn load() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            match std::fs::read_to_string("assets/tuning.json") {
                Ok(raw) => match serde_json::from_str::<SceneTuning>(&raw) {
                    Ok(tuning) => {
                        info!("Loaded tuning overrides from assets/tuning.json");
                        return tuning;
                    }
                    Err(err) => {
                        warn!("Ignoring malformed assets/tuning.json: {err}");
                    }
                },
                Err(_) => {}
            }
        }

        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_merge_into_defaults() {
        let tuning: SceneTuning =
            serde_json::from_str(r#"{ "step_size": 200.0, "initial_budget": 4 }"#)
                .expect("partial override should parse");

        assert_eq!(tuning.step_size, 200.0);
        assert_eq!(tuning.initial_budget, 4);
        // Untouched fields keep their defaults.
        assert_eq!(tuning.refill_budget, SceneTuning::default().refill_budget);
        assert_eq!(tuning.tree_count, SceneTuning::default().tree_count);
    }
}
