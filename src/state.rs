//! Global game state definitions. The walk itself is one `States` machine;
//! the vignette sequencer is a sub-state that only exists while walking, so
//! entering the finale tears it down and permanently closes the input gate.

use bevy::prelude::*;

/// High-level flow: asset preload, the interactive stroll, and the terminal
/// finale. There is no transition out of `Finale`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GameState {
    #[default]
    Loading,
    Walking,
    Finale,
}

/// Which vignette currently owns the scene. `Idle` is the only state in which
/// the input gate accepts presses; each vignette returns to `Idle` exactly
/// once, when it completes.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, SubStates)]
#[source(GameState = GameState::Walking)]
pub enum VignetteState {
    #[default]
    Idle,
    Tarot,
    DogRun,
    CupAndBook,
    TreeHug,
}

/// Named system sets chained inside `Update`. Rescale reactions run first so
/// geometry-dependent positions are fresh, then input feeds movement, movement
/// feeds trigger detection, and effects (animation phases, transform sync,
/// vignette timers) observe the settled frame state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Rescale,
    Input,
    Movement,
    Triggers,
    Effects,
}

/// The loading state exists to give asset preloading an `OnEnter` hook; the
/// scene needs nothing to finish arriving before it can start, since late
/// images simply render once available.
pub fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Walking);
}
