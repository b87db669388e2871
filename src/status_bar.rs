use egui::{Align, Layout, RichText, Ui};

use crate::state::{SelectionPhase, SessionState, SketchPhase};
use crate::theme;
use crate::ui_controls;

/// One line describing what the session is doing right now.
pub fn phase_text(state: &SessionState) -> String {
    match (state.selection, state.sketch) {
        (SelectionPhase::Idle, _) => "Press Select to pick a landmark".to_string(),
        (SelectionPhase::Selecting, _) => "Double-click the video to place the anchor".to_string(),
        (SelectionPhase::Anchored, _) => match state.tracked.as_ref() {
            Some(tracked) => format!("Anchored near {}, confirm to track", tracked.name),
            None => "Anchor fixed, no landmark bound".to_string(),
        },
        (SelectionPhase::Confirmed, SketchPhase::Sketching) => "Sketching: drag to draw".to_string(),
        (SelectionPhase::Confirmed, SketchPhase::Confirmed) => match state.tracked.as_ref() {
            Some(tracked) => format!("Sketch riding on {}", tracked.name),
            None => "Sketch confirmed".to_string(),
        },
        (SelectionPhase::Confirmed, SketchPhase::Hidden) => match state.tracked.as_ref() {
            Some(tracked) => format!("Tracking {}", tracked.name),
            None => "Tracking".to_string(),
        },
    }
}

pub fn show_status_bar(ui: &mut Ui, state: &SessionState, feed_error: Option<&str>) {
    let theme = theme::dark_theme();

    ui.horizontal(|ui| {
        ui.label(
            RichText::new(phase_text(state))
                .color(theme.text.secondary)
                .size(13.0),
        );

        ui.add_space(theme.layout.space_3);
        ui_controls::vertical_divider(ui, &theme, 14.0);
        ui.add_space(theme.layout.space_3);

        let poses = state.poses.len();
        ui.label(
            RichText::new(format!(
                "{poses} pose{} detected",
                if poses == 1 { "" } else { "s" }
            ))
            .color(theme.text.muted)
            .size(12.0),
        );

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.add_space(theme.layout.space_2);

            if let Some(message) = feed_error {
                ui_controls::subtle_badge(ui, &theme, &format!("feed: {message}"));
                ui.add_space(theme.layout.space_2);
            }

            if let Some(notice) = state.notice {
                ui_controls::subtle_badge(ui, &theme, notice.text());
                ui.add_space(theme.layout.space_2);
            }

            if state.tracked.is_some() {
                let delta = state.displacement;
                ui.label(
                    RichText::new(format!("Δ {:+.1}, {:+.1}", delta.dx, delta.dy))
                        .color(theme.text.muted)
                        .size(12.0)
                        .monospace(),
                );
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::phase_text;
    use crate::landmark::{Keypoint, Pose};
    use crate::state::SessionState;
    use egui::Pos2;

    #[test]
    fn phase_text_walks_the_session_lifecycle() {
        let mut state = SessionState::default();
        assert!(phase_text(&state).contains("Select"));

        state.begin_selection();
        assert!(phase_text(&state).contains("Double-click"));

        state.apply_poses(vec![Pose::new(vec![Keypoint::new(
            "leftWrist",
            100.0,
            100.0,
            0.9,
        )])]);
        state.fix_anchor(Pos2::new(101.0, 99.0));
        assert!(phase_text(&state).contains("leftWrist"));

        state.confirm_selection();
        assert_eq!(phase_text(&state), "Tracking leftWrist");

        state.begin_sketch();
        assert!(phase_text(&state).contains("Sketching"));

        state.confirm_sketch();
        assert_eq!(phase_text(&state), "Sketch riding on leftWrist");
    }

    #[test]
    fn phase_text_reports_unbound_anchor() {
        let mut state = SessionState::default();
        state.begin_selection();
        state.fix_anchor(Pos2::new(400.0, 300.0));
        assert_eq!(phase_text(&state), "Anchor fixed, no landmark bound");
    }
}
