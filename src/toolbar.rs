use egui::{vec2, Align, Layout, Ui};

use crate::state::SessionState;
use crate::theme;
use crate::ui_controls;

/// Pressed flags for the session controls; the app applies the transitions.
#[derive(Default)]
pub struct ToolbarOutput {
    pub select_toggled: bool,
    pub confirm_selection: bool,
    pub sketch_toggled: bool,
    pub confirm_sketch: bool,
    pub skeleton_toggled: bool,
}

pub fn show_toolbar(ui: &mut Ui, state: &SessionState) -> ToolbarOutput {
    let theme = theme::dark_theme();
    let controls = state.controls();
    let button_h = theme.controls.button_height;
    let mut out = ToolbarOutput::default();

    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        ui.spacing_mut().item_spacing = vec2(theme.layout.control_gap, 0.0);

        if controls.select_visible
            && ui_controls::primary_button(ui, &theme, controls.select_label, vec2(88.0, button_h))
                .on_hover_text("Pick a landmark to anchor to")
                .clicked()
        {
            out.select_toggled = true;
        }

        if controls.confirm_selection_visible {
            let response = ui.add_enabled_ui(controls.confirm_selection_enabled, |ui| {
                ui_controls::ghost_button(ui, &theme, "Confirm selection", vec2(134.0, button_h))
            });
            if response
                .inner
                .on_hover_text("Double-click the video first")
                .clicked()
            {
                out.confirm_selection = true;
            }
        }

        if controls.sketch_visible {
            ui.add_space(theme.layout.group_gap - theme.layout.control_gap);
            if ui_controls::primary_button(ui, &theme, controls.sketch_label, vec2(88.0, button_h))
                .on_hover_text("Draw on the video; the drawing will follow the landmark")
                .clicked()
            {
                out.sketch_toggled = true;
            }
        }

        if controls.confirm_sketch_visible
            && ui_controls::ghost_button(ui, &theme, "Confirm sketch", vec2(120.0, button_h))
                .clicked()
        {
            out.confirm_sketch = true;
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui_controls::toggle_chip(ui, &theme, "Skeleton", state.settings.show_skeleton)
                .on_hover_text("Overlay detected keypoints and bones")
                .clicked()
            {
                out.skeleton_toggled = true;
            }
        });
    });

    out
}
