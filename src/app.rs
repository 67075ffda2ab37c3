//! High-level plugin composition.
//!
//! `RiversideStrollPlugin` glues together the domain plugins (geometry,
//! scenery, character, vignettes, audio, HUD) and fixes the per-frame system
//! ordering. Each subsystem owns its own state; this orchestrator merely
//! registers them with the Bevy application.

use bevy::prelude::*;

use crate::audio::GameAudioPlugin;
use crate::character::CharacterPlugin;
use crate::config::ConfigPlugin;
use crate::dog::DogPlugin;
use crate::events::EventSequencerPlugin;
use crate::finale::FinalePlugin;
use crate::geometry::GeometryPlugin;
use crate::movement::MovementPlugin;
use crate::props::PropsPlugin;
use crate::river::RiverPlugin;
use crate::scenery::SceneryPlugin;
use crate::state::{finish_loading, GameSet, GameState, VignetteState};
use crate::tarot::TarotPlugin;
use crate::treehug::TreeHugPlugin;
use crate::ui::HudPlugin;

pub struct RiversideStrollPlugin;

impl Plugin for RiversideStrollPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_sub_state::<VignetteState>()
            .add_plugins((
                ConfigPlugin,         // Tuning constants + optional overrides.
                GeometryPlugin,       // Scene space, scale factor, resize fan-out.
                RiverPlugin,          // Backdrop fills and animated waves.
                SceneryPlugin,        // Random trees and shrubs.
                CharacterPlugin,      // The walker and her sparkles.
                MovementPlugin,       // Input gate + move budget.
                EventSequencerPlugin, // Ordered one-shot trigger spots.
                TarotPlugin,          // Vignette 1: card spread.
                DogPlugin,            // Vignette 2: running pug.
                PropsPlugin,          // Vignette 3: cup and book.
                TreeHugPlugin,        // Vignette 4: tree-hug clip.
                FinalePlugin,         // Terminal clip sequence.
                GameAudioPlugin,      // Ambient loop + bark.
                HudPlugin,            // Walk button + budget readout.
            ))
            // Within one frame: rescale reactions settle geometry-dependent
            // positions, input feeds movement, movement feeds trigger
            // detection, and effects observe the final frame state. An event
            // can therefore never fire against a position that is about to be
            // overwritten in the same frame.
            .configure_sets(
                Update,
                (
                    GameSet::Rescale,
                    GameSet::Input,
                    GameSet::Movement,
                    GameSet::Triggers,
                    GameSet::Effects,
                )
                    .chain(),
            )
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                finish_loading.run_if(in_state(GameState::Loading)),
            );
    }
}

/// A fixed camera at the world origin: scene space maps exactly onto the
/// window, so no follow or zoom logic is needed.
fn setup_camera(mut commands: Commands) {
    commands.spawn((Name::new("MainCamera"), Camera2dBundle::default()));
}
