// src/ui/selection_panel/systems.rs
//
// Systems for building the selection panel, raising selections, and keeping
// the labels and highlights in step with the controllers.

use bevy::{
    ecs::{hierarchy::ChildSpawnerCommands, message::MessageWriter},
    prelude::*,
};

use crate::presets::{PresetRegistry, ViewCollection};
use crate::ui::bridge::{SelectionLabels, SelectionRequest};

use super::components::{
    CameraLabelText, PanelToggleButton, PanelToggleLabel, SelectionButton, SelectionPanel,
    SelectionPanelBody, SelectionPanelSettings, SelectionPanelState, TimeLabelText,
};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.08, 0.08, 0.1, 0.9);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.32);
const TEXT_COLOR: Color = Color::WHITE;
const HEADING_COLOR: Color = Color::srgb(1.0, 0.9, 0.4);
const BUTTON_IDLE: Color = Color::srgba(0.18, 0.18, 0.22, 0.95);
const BUTTON_HOVERED: Color = Color::srgba(0.26, 0.26, 0.32, 0.95);
const BUTTON_ACTIVE: Color = Color::srgb(0.25, 0.45, 0.7);

const TOGGLE_KEY: KeyCode = KeyCode::KeyH;

/// Builds the panel from the preset registry.
pub fn spawn_selection_panel(
    mut commands: Commands,
    registry: Res<PresetRegistry>,
    settings: Res<SelectionPanelSettings>,
) {
    let heading_font = TextFont {
        font_size: settings.heading_font_size,
        ..default()
    };

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(settings.margin),
                left: Val::Px(settings.margin),
                width: Val::Px(settings.panel_width),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(2.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            SelectionPanel,
            Name::new("Selection Panel"),
        ))
        .with_children(|panel| {
            panel
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    justify_content: JustifyContent::SpaceBetween,
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|header| {
                    header.spawn((
                        Text::new("Scene Controls"),
                        heading_font.clone(),
                        TextColor(HEADING_COLOR),
                    ));
                    header
                        .spawn((
                            Node {
                                padding: UiRect::axes(Val::Px(8.0), Val::Px(2.0)),
                                ..default()
                            },
                            Button,
                            BackgroundColor(BUTTON_IDLE),
                            PanelToggleButton,
                        ))
                        .with_children(|button| {
                            button.spawn((
                                Text::new(toggle_caption(false)),
                                TextFont {
                                    font_size: settings.button_font_size,
                                    ..default()
                                },
                                TextColor(TEXT_COLOR),
                                PanelToggleLabel,
                            ));
                        });
                });

            panel.spawn((
                Text::new(time_caption("")),
                heading_font.clone(),
                TextColor(TEXT_COLOR),
                TimeLabelText,
            ));
            panel.spawn((
                Text::new(camera_caption("")),
                heading_font.clone(),
                TextColor(TEXT_COLOR),
                CameraLabelText,
            ));

            panel
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(6.0),
                        ..default()
                    },
                    SelectionPanelBody,
                ))
                .with_children(|body| {
                    let time_requests = registry
                        .time_presets()
                        .iter()
                        .map(|preset| SelectionRequest::Time {
                            key: preset.key.clone(),
                        });
                    spawn_section(body, "Time of day", time_requests, &settings, true);

                    for (title, collection) in [
                        ("Camera views", ViewCollection::Camera),
                        ("Sky views", ViewCollection::Sky),
                    ] {
                        let view_requests =
                            registry
                                .view_keys(collection)
                                .into_iter()
                                .map(|key| SelectionRequest::View {
                                    key: key.to_string(),
                                    collection,
                                });
                        spawn_section(body, title, view_requests, &settings, false);
                    }
                });
        });

    info!(
        "Selection panel spawned ({} time presets)",
        registry.time_presets().len()
    );
}

fn spawn_section(
    parent: &mut ChildSpawnerCommands,
    title: &str,
    requests: impl Iterator<Item = SelectionRequest>,
    settings: &SelectionPanelSettings,
    compact: bool,
) {
    parent.spawn((
        Text::new(title),
        TextFont {
            font_size: settings.heading_font_size,
            ..default()
        },
        TextColor(HEADING_COLOR),
    ));

    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            column_gap: Val::Px(settings.button_gap),
            row_gap: Val::Px(settings.button_gap),
            ..default()
        })
        .with_children(|grid| {
            for request in requests {
                let width = if compact {
                    Val::Px(settings.time_button_width)
                } else {
                    Val::Auto
                };
                let caption = request.key().to_string();
                grid.spawn((
                    Node {
                        width,
                        padding: UiRect::axes(Val::Px(6.0), Val::Px(4.0)),
                        border: UiRect::all(Val::Px(1.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    Button,
                    Interaction::None,
                    BackgroundColor(BUTTON_IDLE),
                    BorderColor::from(BORDER_COLOR),
                    Name::new(format!("Select {}", caption)),
                    SelectionButton(request),
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(caption),
                        TextFont {
                            font_size: settings.button_font_size,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                    ));
                });
            }
        });
}

/// Raises a selection for every preset button pressed this frame.
pub fn handle_selection_buttons(
    buttons: Query<(&Interaction, &SelectionButton), (Changed<Interaction>, With<Button>)>,
    mut selections: MessageWriter<SelectionRequest>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction == Interaction::Pressed {
            debug!("Selection button pressed: {:?}", button.0);
            selections.write(button.0.clone());
        }
    }
}

/// Rewrites the label texts from the latest pushed labels.
pub fn refresh_selection_labels(
    labels: Res<SelectionLabels>,
    mut time_text: Query<&mut Text, (With<TimeLabelText>, Without<CameraLabelText>)>,
    mut camera_text: Query<&mut Text, (With<CameraLabelText>, Without<TimeLabelText>)>,
) {
    if !labels.is_changed() {
        return;
    }
    let time = time_caption(labels.time_label());
    for mut text in time_text.iter_mut() {
        if text.0 != time {
            text.0.clone_from(&time);
        }
    }
    let camera = camera_caption(labels.camera_label());
    for mut text in camera_text.iter_mut() {
        if text.0 != camera {
            text.0.clone_from(&camera);
        }
    }
}

/// Colours the button of each active selection, with hover feedback on the rest.
pub fn highlight_selection_buttons(
    labels: Res<SelectionLabels>,
    mut buttons: Query<(&SelectionButton, &Interaction, &mut BackgroundColor)>,
) {
    for (button, interaction, mut background) in buttons.iter_mut() {
        let color = if button.0.is_active(&labels) {
            BUTTON_ACTIVE
        } else if *interaction == Interaction::Hovered {
            BUTTON_HOVERED
        } else {
            BUTTON_IDLE
        };
        background.set_if_neq(BackgroundColor(color));
    }
}

/// Collapses or expands the panel body from the header button or the H key.
pub fn toggle_selection_panel(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    toggles: Query<&Interaction, (Changed<Interaction>, With<PanelToggleButton>)>,
    mut state: ResMut<SelectionPanelState>,
    mut bodies: Query<&mut Node, With<SelectionPanelBody>>,
    mut captions: Query<&mut Text, With<PanelToggleLabel>>,
) {
    let key_pressed = keyboard.is_some_and(|keyboard| keyboard.just_pressed(TOGGLE_KEY));
    let clicked = toggles
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed);
    if !key_pressed && !clicked {
        return;
    }

    state.collapsed = !state.collapsed;
    let display = if state.collapsed {
        Display::None
    } else {
        Display::Flex
    };
    for mut node in bodies.iter_mut() {
        node.display = display;
    }
    for mut caption in captions.iter_mut() {
        caption.0 = toggle_caption(state.collapsed).to_string();
    }
}

fn time_caption(label: &str) -> String {
    format!("Time: {}", label)
}

fn camera_caption(label: &str) -> String {
    format!("Camera: {}", label)
}

fn toggle_caption(collapsed: bool) -> &'static str {
    if collapsed {
        "Show"
    } else {
        "Hide"
    }
}
