//! The event sequencer: fixed trigger spots along the path and the ordered
//! proximity check that starts each vignette.
//!
//! Spots are an explicit ordered sequence rather than an artifact of iteration
//! order: only the lowest-indexed unfired spot is ever eligible, so spot i+1
//! structurally cannot fire before spot i. Each spot fires exactly once per
//! game session; rescaling repositions spots but never resets their flags.

use bevy::prelude::*;

use crate::character::Character;
use crate::config::SceneTuning;
use crate::geometry::{SceneGeometry, SceneRescaled};
use crate::path::path_y;
use crate::state::{GameSet, GameState, VignetteState};

pub struct EventSequencerPlugin;

impl Plugin for EventSequencerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Walking), spawn_event_spots)
            .add_systems(
                Update,
                (
                    reposition_spots.in_set(GameSet::Rescale),
                    detect_triggers
                        .in_set(GameSet::Triggers)
                        .run_if(in_state(VignetteState::Idle)),
                ),
            );
    }
}

/// A one-shot trigger zone along the path.
#[derive(Component, Debug)]
pub struct EventSpot {
    pub index: usize,
    pub vignette: VignetteState,
    pub scene_x: f32,
    pub scene_y: f32,
    /// Flips to true exactly once, and stays true for the session.
    pub triggered: bool,
    pub message: &'static str,
}

/// The fixed vignette order, first to last.
pub const SPOT_SEQUENCE: [(VignetteState, &str); 4] = [
    (VignetteState::Tarot, "the tarot reader's table"),
    (VignetteState::DogRun, "a pug barrels down the path"),
    (VignetteState::CupAndBook, "a cup of coffee and an open journal"),
    (VignetteState::TreeHug, "an irresistible tree"),
];

/// Scene positions for every spot: cumulative fixed offsets from the
/// character's start, y pinned to the path.
pub fn spot_positions(geometry: &SceneGeometry, tuning: &SceneTuning) -> [(f32, f32); 4] {
    let start_x = geometry.width * tuning.start_x_fraction;
    std::array::from_fn(|i| {
        let x = start_x + tuning.spot_spacing * geometry.scale * (i as f32 + 1.0);
        (x, path_y(x, geometry, tuning))
    })
}

/// Axis-wise proximity test used for firing: the thresholds are the scaled
/// character dimensions.
pub fn within_reach(
    character: (f32, f32),
    spot: (f32, f32),
    geometry: &SceneGeometry,
    tuning: &SceneTuning,
) -> bool {
    (character.0 - spot.0).abs() < tuning.character_width * geometry.scale
        && (character.1 - spot.1).abs() < tuning.character_height * geometry.scale
}

fn spawn_event_spots(
    mut commands: Commands,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
    existing: Query<Entity, With<EventSpot>>,
) {
    // A fresh session replaces any prior sequence wholesale.
    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let positions = spot_positions(&geometry, &tuning);
    for (index, ((vignette, message), (scene_x, scene_y))) in
        SPOT_SEQUENCE.into_iter().zip(positions).enumerate()
    {
        commands.spawn((
            Name::new(format!("EventSpot{index}")),
            EventSpot {
                index,
                vignette,
                scene_x,
                scene_y,
                triggered: false,
                message,
            },
        ));
    }
}

/// Recomputes spot positions from the layout formula after a rescale.
/// Triggered flags are deliberately left alone.
fn reposition_spots(
    mut rescaled: EventReader<SceneRescaled>,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
    mut spots: Query<&mut EventSpot>,
) {
    if rescaled.is_empty() {
        return;
    }
    rescaled.clear();

    let positions = spot_positions(&geometry, &tuning);
    for mut spot in &mut spots {
        let (scene_x, scene_y) = positions[spot.index];
        spot.scene_x = scene_x;
        spot.scene_y = scene_y;
    }
}

/// Fires at most one spot per frame: the lowest-indexed unfired spot, and only
/// if the character is within reach of it.
pub fn detect_triggers(
    mut spots: Query<&mut EventSpot>,
    characters: Query<&Character>,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
    mut next_vignette: ResMut<NextState<VignetteState>>,
) {
    let Ok(character) = characters.get_single() else {
        return;
    };

    let Some(mut spot) = spots
        .iter_mut()
        .filter(|spot| !spot.triggered)
        .min_by_key(|spot| spot.index)
    else {
        return;
    };

    if within_reach(
        (character.scene_x, character.scene_y),
        (spot.scene_x, spot.scene_y),
        &geometry,
        &tuning,
    ) {
        spot.triggered = true;
        info!("Event {} reached: {}", spot.index + 1, spot.message);
        next_vignette.set(spot.vignette);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GameState>();
        app.add_sub_state::<VignetteState>();
        app.insert_resource(SceneGeometry::default());
        app.insert_resource(SceneTuning::default());
        app.add_systems(Update, detect_triggers.run_if(in_state(VignetteState::Idle)));

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Walking);
        app.update();
        app
    }

    fn spawn_spots(app: &mut App) -> Vec<Entity> {
        let geometry = SceneGeometry::default();
        let tuning = SceneTuning::default();
        let positions = spot_positions(&geometry, &tuning);

        SPOT_SEQUENCE
            .into_iter()
            .zip(positions)
            .enumerate()
            .map(|(index, ((vignette, message), (scene_x, scene_y)))| {
                app.world_mut()
                    .spawn(EventSpot {
                        index,
                        vignette,
                        scene_x,
                        scene_y,
                        triggered: false,
                        message,
                    })
                    .id()
            })
            .collect()
    }

    fn place_character(app: &mut App, scene_x: f32, scene_y: f32) -> Entity {
        app.world_mut()
            .spawn(Character {
                scene_x,
                scene_y,
                hair_wave: 0.0,
            })
            .id()
    }

    fn triggered_flags(app: &App, spots: &[Entity]) -> Vec<bool> {
        spots
            .iter()
            .map(|&e| app.world().get::<EventSpot>(e).unwrap().triggered)
            .collect()
    }

    #[test]
    fn spots_are_evenly_spaced_along_the_path() {
        let geometry = SceneGeometry::default();
        let tuning = SceneTuning::default();
        let positions = spot_positions(&geometry, &tuning);

        for (i, (x, y)) in positions.iter().enumerate() {
            assert_eq!(
                *x,
                geometry.width * tuning.start_x_fraction
                    + tuning.spot_spacing * (i as f32 + 1.0)
            );
            assert_eq!(*y, path_y(*x, &geometry, &tuning));
        }
    }

    #[test]
    fn later_spot_cannot_fire_while_an_earlier_one_is_unfired() {
        let mut app = test_app();
        let spots = spawn_spots(&mut app);

        // Drop the character right on spot 1 while spot 0 is still unfired.
        let geometry = SceneGeometry::default();
        let tuning = SceneTuning::default();
        let (x1, y1) = spot_positions(&geometry, &tuning)[1];
        place_character(&mut app, x1, y1);

        app.update();
        assert_eq!(triggered_flags(&app, &spots), vec![false; 4]);
    }

    #[test]
    fn spot_fires_once_and_never_again() {
        let mut app = test_app();
        let spots = spawn_spots(&mut app);
        let geometry = SceneGeometry::default();
        let tuning = SceneTuning::default();
        let (x0, y0) = spot_positions(&geometry, &tuning)[0];
        place_character(&mut app, x0, y0);

        app.update();
        assert_eq!(triggered_flags(&app, &spots), vec![true, false, false, false]);
        assert_eq!(
            *app.world().resource::<State<VignetteState>>().get(),
            VignetteState::Idle,
            "transition applies on the next frame"
        );

        app.update();
        assert_eq!(
            *app.world().resource::<State<VignetteState>>().get(),
            VignetteState::Tarot
        );

        // Complete the vignette, stay in the zone: nothing re-fires.
        app.world_mut()
            .resource_mut::<NextState<VignetteState>>()
            .set(VignetteState::Idle);
        app.update();
        app.update();
        assert_eq!(triggered_flags(&app, &spots), vec![true, false, false, false]);
        assert_eq!(
            *app.world().resource::<State<VignetteState>>().get(),
            VignetteState::Idle
        );
    }

    #[test]
    fn detection_pauses_while_a_vignette_is_active() {
        let mut app = test_app();
        let spots = spawn_spots(&mut app);
        let geometry = SceneGeometry::default();
        let tuning = SceneTuning::default();

        app.world_mut()
            .resource_mut::<NextState<VignetteState>>()
            .set(VignetteState::DogRun);
        app.update();

        let (x0, y0) = spot_positions(&geometry, &tuning)[0];
        place_character(&mut app, x0, y0);
        app.update();

        assert_eq!(triggered_flags(&app, &spots), vec![false; 4]);
    }

    #[test]
    fn rescale_repositions_spots_but_preserves_triggered_flags() {
        let mut app = test_app();
        app.add_event::<SceneRescaled>();
        app.add_systems(Update, reposition_spots);
        let spots = spawn_spots(&mut app);

        app.world_mut()
            .get_mut::<EventSpot>(spots[0])
            .unwrap()
            .triggered = true;

        let previous = SceneGeometry::default();
        let shrunk = SceneGeometry::from_size(640.0, 360.0, 1280.0);
        app.insert_resource(shrunk);
        app.world_mut().send_event(SceneRescaled { previous });
        app.update();

        let tuning = SceneTuning::default();
        let expected = spot_positions(&shrunk, &tuning);
        for (i, &entity) in spots.iter().enumerate() {
            let spot = app.world().get::<EventSpot>(entity).unwrap();
            assert_eq!(spot.scene_x, expected[i].0);
            assert_eq!(spot.scene_y, expected[i].1);
            assert_eq!(spot.triggered, i == 0, "flags survive the rescale");
        }
    }

    #[test]
    fn out_of_reach_does_not_fire() {
        let mut app = test_app();
        let spots = spawn_spots(&mut app);
        let geometry = SceneGeometry::default();
        let tuning = SceneTuning::default();
        let (x0, y0) = spot_positions(&geometry, &tuning)[0];
        place_character(
            &mut app,
            x0 - tuning.character_width * geometry.scale - 1.0,
            y0,
        );

        app.update();
        assert_eq!(triggered_flags(&app, &spots), vec![false; 4]);
    }
}
