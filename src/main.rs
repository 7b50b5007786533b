use std::path::Path;

use bevy::prelude::*;

mod config;
mod control;
mod presets;
mod ui;
mod world;

use crate::{control::ControlPlugin, ui::UiPlugin, world::WorldPlugin};

fn main() {
    load_scene_env();

    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Viewpoint Scene".into(),
                    ..default()
                }),
                ..default()
            }),
            WorldPlugin,
            ControlPlugin,
            UiPlugin,
        ))
        .run();
}

fn load_scene_env() {
    const SCENE_ENV_FILE: &str = "scene.env";

    let path = Path::new(SCENE_ENV_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", SCENE_ENV_FILE, err);
    }
}
