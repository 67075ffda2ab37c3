//! Application entry point: composes the Bevy runtime, core plugins, and
//! window configuration, then defers to the `RiversideStrollPlugin` defined
//! in `app.rs`.

mod app;
mod audio;
mod character;
mod config;
mod dog;
mod events;
mod finale;
mod geometry;
mod movement;
mod path;
mod props;
mod river;
mod scenery;
mod state;
mod tarot;
mod treehug;
mod ui;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod wasm;

use app::RiversideStrollPlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::render::texture::ImagePlugin;
use bevy::window::{Window, WindowResizeConstraints, WindowResolution};

fn main() {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    wasm::set_panic_hook();

    // The logical resolution matches the 1280x720 design space the scale
    // factor is computed against. Resizing is enabled; constraints prevent
    // collapsing the window to unusable sizes.
    let primary_window = Window {
        title: "Riverside Stroll".to_string(),
        resolution: WindowResolution::new(1280.0, 720.0),
        resizable: true,
        resize_constraints: WindowResizeConstraints {
            min_width: 640.0,
            min_height: 360.0,
            max_width: f32::INFINITY,
            max_height: f32::INFINITY,
        },
        canvas: cfg!(all(target_arch = "wasm32", feature = "web"))
            .then(|| "#bevy-canvas".to_owned()),
        ..default()
    };

    // `DefaultPlugins` spins up rendering, input, audio, etc. Nearest-neighbor
    // sampling keeps the pug's pixel-art sheet crisp; asset settings differ
    // between desktop and web.
    let mut default_plugins = DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(primary_window),
            ..default()
        })
        .set(ImagePlugin::default_nearest());

    #[cfg(not(target_arch = "wasm32"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(true),
            ..default()
        });
    }

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(false),
            ..default()
        });
    }

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.36, 0.67, 0.93)))
        .add_plugins(default_plugins)
        .add_plugins(RiversideStrollPlugin)
        .run();
}
