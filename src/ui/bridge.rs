// src/ui/bridge.rs
//
// Two-way bridge between the controllers and the display layer: controllers
// push labels in, the display layer pushes selections out.

use bevy::{app::AppExit, ecs::message::Messages, prelude::*};

use crate::control::{camera::set_camera, errors::SceneControlError, time::set_time};
use crate::presets::ViewCollection;

/// Latest labels pushed by the controllers. The display layer only reads these.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionLabels {
    time: String,
    camera: String,
}

impl SelectionLabels {
    pub fn set_time_label(&mut self, label: &str) {
        if self.time != label {
            self.time = label.to_string();
        }
    }

    pub fn set_camera_label(&mut self, label: &str) {
        if self.camera != label {
            self.camera = label.to_string();
        }
    }

    pub fn time_label(&self) -> &str {
        &self.time
    }

    pub fn camera_label(&self) -> &str {
        &self.camera
    }
}

/// A user selection raised by the display layer.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum SelectionRequest {
    Time {
        key: String,
    },
    View {
        key: String,
        collection: ViewCollection,
    },
}

impl SelectionRequest {
    pub fn key(&self) -> &str {
        match self {
            Self::Time { key } | Self::View { key, .. } => key,
        }
    }

    /// True when this request's key is what the labels currently show.
    pub fn is_active(&self, labels: &SelectionLabels) -> bool {
        match self {
            Self::Time { key } => labels.time_label() == key,
            Self::View { key, .. } => labels.camera_label() == key,
        }
    }
}

/// Display-layer callback for a time button.
pub fn on_select_time(world: &mut World, key: &str) -> Result<u32, SceneControlError> {
    set_time(world, key)
}

/// Display-layer callback for a camera or sky view button.
pub fn on_select_view(
    world: &mut World,
    key: &str,
    collection: ViewCollection,
) -> Result<(), SceneControlError> {
    set_camera(world, key, collection)
}

/// Forwards queued selections to the controllers one at a time, in arrival order.
pub fn apply_selection_requests(world: &mut World) {
    let requests: Vec<SelectionRequest> = match world.get_resource_mut::<Messages<SelectionRequest>>()
    {
        Some(mut messages) => messages.drain().collect(),
        None => return,
    };

    for request in requests {
        let outcome = match &request {
            SelectionRequest::Time { key } => on_select_time(world, key).map(|_| ()),
            SelectionRequest::View { key, collection } => on_select_view(world, key, *collection),
        };
        if let Err(err) = outcome {
            report_selection_error(world, &request, err);
        }
    }
}

fn report_selection_error(world: &mut World, request: &SelectionRequest, err: SceneControlError) {
    if err.is_fatal() {
        error!("Selection '{}' hit a fatal engine error: {}", request.key(), err);
        world.write_message(AppExit::error());
    } else {
        warn!("Selection '{}' ignored: {}", request.key(), err);
    }
}
