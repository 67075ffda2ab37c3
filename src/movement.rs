//! The input gate: press collection, the move budget, and the advance step.
//!
//! Presses are collected into [`AdvanceRequested`] events by lightweight read
//! systems, then applied by a single gated system, mirroring the input →
//! movement split of the chained system sets. A press that fails the gate is
//! a silent no-op, never an error.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use crate::character::Character;
use crate::config::SceneTuning;
use crate::geometry::SceneGeometry;
use crate::path::{path_y, walk_end_x};
use crate::state::{GameSet, GameState, VignetteState};
use crate::ui::WalkButton;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MoveBudget>()
            .add_event::<AdvanceRequested>()
            .add_systems(OnEnter(GameState::Walking), reset_budget)
            .add_systems(
                Update,
                (
                    (read_key_input, read_button_input).in_set(GameSet::Input),
                    apply_advance.in_set(GameSet::Movement),
                ),
            );
    }
}

/// Remaining allowed walk presses. Spending is the only way down, refilling
/// the only way up, and the count can never go negative.
#[derive(Resource, Default)]
pub struct MoveBudget {
    remaining: u32,
}

impl MoveBudget {
    pub fn new(remaining: u32) -> Self {
        Self { remaining }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Consumes one press if any remain.
    pub fn spend(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    pub fn refill(&mut self, amount: u32) {
        self.remaining = amount;
    }
}

/// One discrete press of the advance control, whatever surface it came from.
#[derive(Event, Default)]
pub struct AdvanceRequested;

fn reset_budget(tuning: Res<SceneTuning>, mut budget: ResMut<MoveBudget>) {
    budget.refill(tuning.initial_budget);
}

fn read_key_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<AdvanceRequested>,
) {
    if keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::Enter) {
        requests.send(AdvanceRequested);
    }
}

fn read_button_input(
    interactions: Query<&Interaction, (Changed<Interaction>, With<WalkButton>)>,
    mut requests: EventWriter<AdvanceRequested>,
) {
    for interaction in &interactions {
        if *interaction == Interaction::Pressed {
            requests.send(AdvanceRequested);
        }
    }
}

/// Applies queued presses. Preconditions for each press: budget remaining,
/// no vignette active, and the game still in its walking state. A step that
/// carries the character past the end of the path enters the finale instead
/// of triggering by proximity.
pub fn apply_advance(
    mut requests: EventReader<AdvanceRequested>,
    mut budget: ResMut<MoveBudget>,
    geometry: Res<SceneGeometry>,
    tuning: Res<SceneTuning>,
    vignette: Option<Res<State<VignetteState>>>,
    mut characters: Query<&mut Character>,
    mut next_game: ResMut<NextState<GameState>>,
) {
    let pressed = requests.read().count();
    if pressed == 0 {
        return;
    }

    // The sub-state only exists while walking, so a missing resource means
    // the gate is closed (loading, or the finale has ended movement).
    let idle = vignette
        .as_deref()
        .is_some_and(|state| *state.get() == VignetteState::Idle);
    if !idle {
        return;
    }

    let Ok(mut character) = characters.get_single_mut() else {
        return;
    };

    for _ in 0..pressed {
        if !budget.spend() {
            break;
        }

        character.scene_x += tuning.step_size * geometry.scale;
        character.scene_y = path_y(character.scene_x, &geometry, &tuning);

        if character.scene_x > walk_end_x(&geometry, &tuning) {
            info!("End of the path reached; the walk is over.");
            next_game.set(GameState::Finale);
            break;
        }
    }
}
