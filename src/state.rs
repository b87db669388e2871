use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::landmark::{nearest_keypoint, Pose};
use crate::sketch::SketchLayer;
use crate::tracker::{Displacement, TrackedLandmark};

/// Lifecycle of choosing and confirming a tracked landmark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionPhase {
    #[default]
    Idle,
    Selecting,
    Anchored,
    Confirmed,
}

/// Lifecycle of drawing and confirming a sketch. Reachable only once the
/// selection is confirmed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SketchPhase {
    #[default]
    Hidden,
    Sketching,
    Confirmed,
}

/// User-facing diagnostic for recoverable situations. Shown in the status
/// bar; never fatal, state is left as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    NothingToConfirm,
    NoSketchToConfirm,
    NoPosesDetected,
}

impl Notice {
    pub fn text(self) -> &'static str {
        match self {
            Self::NothingToConfirm => "No landmark selected to confirm",
            Self::NoSketchToConfirm => "No sketch to confirm",
            Self::NoPosesDetected => "No poses detected; anchor is not bound",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub anchor_color: [u8; 4],
    pub sketch_color: [u8; 4],
    pub sketch_stroke_px: f32,
    pub show_skeleton: bool,
    pub overlay_min_confidence: f32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            anchor_color: [0, 255, 0, 255],
            sketch_color: [255, 255, 255, 255],
            sketch_stroke_px: 4.0,
            show_skeleton: false,
            overlay_min_confidence: 0.1,
        }
    }
}

/// Derived visibility and enablement of the four controls. Labels come from
/// the phases, never the other way around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    pub select_visible: bool,
    pub select_label: &'static str,
    pub confirm_selection_visible: bool,
    pub confirm_selection_enabled: bool,
    pub sketch_visible: bool,
    pub sketch_label: &'static str,
    pub confirm_sketch_visible: bool,
}

/// All mutable session state: the current pose list, the two state machines,
/// and the tracking caches. Mutated only on the UI thread; feed events are
/// drained and applied there before anything renders.
pub struct SessionState {
    pub poses: Vec<Pose>,
    pub selection: SelectionPhase,
    pub sketch: SketchPhase,
    pub anchor: Option<Pos2>,
    pub tracked: Option<TrackedLandmark>,
    pub displacement: Displacement,
    pub sketch_layer: Option<SketchLayer>,
    pub base_sketch_position: Option<Pos2>,
    pub notice: Option<Notice>,
    pub settings: UserSettings,
    pending_delta: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            poses: Vec::new(),
            selection: SelectionPhase::Idle,
            sketch: SketchPhase::Hidden,
            anchor: None,
            tracked: None,
            displacement: Displacement::default(),
            sketch_layer: None,
            base_sketch_position: None,
            notice: None,
            settings: UserSettings::load().unwrap_or_default(),
            pending_delta: false,
        }
    }
}

impl SessionState {
    /// The "Select/Reset" control: starts a selection cycle, or cancels the
    /// one in progress back to idle.
    pub fn toggle_selection(&mut self) {
        match self.selection {
            SelectionPhase::Idle | SelectionPhase::Confirmed => self.begin_selection(),
            SelectionPhase::Selecting | SelectionPhase::Anchored => self.reset_selection(),
        }
    }

    pub fn begin_selection(&mut self) {
        self.selection = SelectionPhase::Selecting;
        self.anchor = None;
        self.tracked = None;
        self.notice = None;
        tracing::debug!("selection started");
    }

    pub fn reset_selection(&mut self) {
        self.selection = SelectionPhase::Idle;
        self.anchor = None;
        self.tracked = None;
        self.notice = None;
        tracing::info!("selection reset");
    }

    /// Pointer double-activation while selecting: fixes the anchor at the
    /// pointer position and binds the nearest detected landmark. With no
    /// poses detected the anchor is still fixed, nothing is bound, and
    /// confirmation stays disabled.
    pub fn fix_anchor(&mut self, at: Pos2) {
        if self.selection != SelectionPhase::Selecting {
            return;
        }

        self.anchor = Some(at);
        self.selection = SelectionPhase::Anchored;

        match nearest_keypoint(&self.poses, at) {
            Some(keypoint) => {
                tracing::info!(landmark = %keypoint.name, x = at.x, y = at.y, "anchor fixed");
                self.tracked = Some(TrackedLandmark::new(keypoint.name.clone(), keypoint.pos()));
                self.notice = None;
            }
            None => {
                self.tracked = None;
                self.notice = Some(Notice::NoPosesDetected);
            }
        }
    }

    /// Locks in tracking. A no-op (with a notice) unless a landmark is
    /// bound.
    pub fn confirm_selection(&mut self) {
        let Some(tracked) = self.tracked.as_ref() else {
            self.notice = Some(Notice::NothingToConfirm);
            return;
        };

        tracing::info!(landmark = %tracked.name, "selection confirmed");
        self.selection = SelectionPhase::Confirmed;
        self.notice = None;
    }

    /// The "Sketch/Reset" control: starts a sketch, or discards the one in
    /// progress.
    pub fn toggle_sketch(&mut self) {
        match self.sketch {
            SketchPhase::Hidden | SketchPhase::Confirmed => self.begin_sketch(),
            SketchPhase::Sketching => self.reset_sketch(),
        }
    }

    pub fn begin_sketch(&mut self) {
        if self.selection != SelectionPhase::Confirmed {
            return;
        }

        self.sketch = SketchPhase::Sketching;
        match self.sketch_layer.as_mut() {
            Some(layer) => layer.clear(),
            None => self.sketch_layer = Some(SketchLayer::new()),
        }
        self.base_sketch_position = None;
        self.notice = None;
        tracing::debug!("sketch started");
    }

    pub fn reset_sketch(&mut self) {
        self.sketch = SketchPhase::Hidden;
        self.sketch_layer = None;
        self.base_sketch_position = None;
        self.notice = None;
        tracing::info!("sketch reset");
    }

    /// One pointer-drag sample while sketching. No smoothing, no undo.
    pub fn append_sketch_segment(&mut self, from: Pos2, to: Pos2) {
        if self.sketch != SketchPhase::Sketching {
            return;
        }
        if let Some(layer) = self.sketch_layer.as_mut() {
            layer.append(from, to);
        }
    }

    /// Freezes the sketch and snapshots the anchor as the zero-reference for
    /// landmark-relative translation. A no-op (with a notice) unless a
    /// sketch is in progress.
    pub fn confirm_sketch(&mut self) {
        if self.sketch != SketchPhase::Sketching {
            self.notice = Some(Notice::NoSketchToConfirm);
            return;
        }

        self.sketch = SketchPhase::Confirmed;
        self.base_sketch_position = self.anchor;
        if let Some(layer) = self.sketch_layer.as_mut() {
            layer.freeze();
        }
        self.notice = None;
        tracing::info!("sketch confirmed");
    }

    /// Detection side of the motion tracker: replaces the pose list and
    /// advances the displacement cache. Called once per pose event from the
    /// feed. When the tracked landmark is absent from this detection the
    /// last displacement stays in effect.
    pub fn apply_poses(&mut self, poses: Vec<Pose>) {
        self.poses = poses;

        if let Some(tracked) = self.tracked.as_mut() {
            if let Some(displacement) = tracked.observe(&self.poses) {
                self.displacement = displacement;
            }
            self.pending_delta = true;
        }
    }

    /// Render side of the motion tracker: integrates the displacement into
    /// the anchor, exactly once per drained pose event.
    pub fn apply_motion(&mut self) {
        if !self.pending_delta {
            return;
        }
        self.pending_delta = false;

        if self.selection == SelectionPhase::Confirmed {
            if let Some(anchor) = self.anchor.as_mut() {
                *anchor += self.displacement.as_vec2();
            }
        }
    }

    /// Translation applied to the frozen sketch layer: how far the tracked
    /// landmark has moved from the anchor snapshot taken at confirmation.
    pub fn sketch_offset(&self) -> Vec2 {
        match (self.sketch, self.tracked.as_ref(), self.base_sketch_position) {
            (SketchPhase::Confirmed, Some(tracked), Some(base)) => tracked.previous - base,
            _ => Vec2::ZERO,
        }
    }

    pub fn controls(&self) -> Controls {
        let selecting = matches!(
            self.selection,
            SelectionPhase::Selecting | SelectionPhase::Anchored
        );

        Controls {
            select_visible: self.selection != SelectionPhase::Confirmed
                || self.sketch == SketchPhase::Confirmed,
            select_label: if selecting { "Reset" } else { "Select" },
            confirm_selection_visible: selecting,
            confirm_selection_enabled: self.tracked.is_some(),
            sketch_visible: self.selection == SelectionPhase::Confirmed
                && self.sketch != SketchPhase::Confirmed,
            sketch_label: if self.sketch == SketchPhase::Sketching {
                "Reset"
            } else {
                "Sketch"
            },
            confirm_sketch_visible: self.sketch == SketchPhase::Sketching,
        }
    }

    pub fn toggle_skeleton_overlay(&mut self) {
        self.settings.show_skeleton = !self.settings.show_skeleton;
        let _ = self.settings.save();
    }
}

impl UserSettings {
    fn file_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("com", "posemark", "posemark")?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir).ok()?;
        Some(config_dir.join("settings.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Notice, SelectionPhase, SessionState, SketchPhase};
    use crate::landmark::{Keypoint, Pose};
    use crate::sketch::SketchLayer;
    use egui::{Pos2, Vec2};

    fn two_keypoint_pose() -> Vec<Pose> {
        vec![Pose::new(vec![
            Keypoint::new("nose", 400.0, 300.0, 0.9),
            Keypoint::new("leftEye", 410.0, 290.0, 0.8),
        ])]
    }

    fn confirmed_state() -> SessionState {
        let mut state = SessionState::default();
        state.apply_poses(two_keypoint_pose());
        state.begin_selection();
        state.fix_anchor(Pos2::new(402.0, 301.0));
        state.confirm_selection();
        state
    }

    #[test]
    fn double_click_binds_nearest_landmark() {
        let mut state = SessionState::default();
        state.apply_poses(two_keypoint_pose());
        state.begin_selection();
        state.fix_anchor(Pos2::new(402.0, 301.0));

        assert_eq!(state.selection, SelectionPhase::Anchored);
        assert_eq!(state.anchor, Some(Pos2::new(402.0, 301.0)));
        let tracked = state.tracked.as_ref().expect("landmark bound");
        assert_eq!(tracked.name, "nose");
        assert_eq!(tracked.previous, Pos2::new(400.0, 300.0));
    }

    #[test]
    fn double_click_without_poses_fixes_anchor_unbound() {
        let mut state = SessionState::default();
        state.begin_selection();
        state.fix_anchor(Pos2::new(400.0, 300.0));

        assert_eq!(state.anchor, Some(Pos2::new(400.0, 300.0)));
        assert!(state.tracked.is_none());
        assert_eq!(state.notice, Some(Notice::NoPosesDetected));

        state.confirm_selection();
        assert_eq!(state.selection, SelectionPhase::Anchored);
        assert_eq!(state.notice, Some(Notice::NothingToConfirm));
    }

    #[test]
    fn double_click_ignored_outside_selecting() {
        let mut state = SessionState::default();
        state.apply_poses(two_keypoint_pose());
        state.fix_anchor(Pos2::new(402.0, 301.0));

        assert_eq!(state.selection, SelectionPhase::Idle);
        assert!(state.anchor.is_none());
    }

    #[test]
    fn confirm_without_landmark_is_noop() {
        let mut state = SessionState::default();
        state.begin_selection();
        state.confirm_selection();

        assert_eq!(state.selection, SelectionPhase::Selecting);
        assert_eq!(state.notice, Some(Notice::NothingToConfirm));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut state = confirmed_state();
        state.reset_selection();
        let anchor_once = state.anchor;
        let selection_once = state.selection;
        state.reset_selection();

        assert_eq!(state.anchor, anchor_once);
        assert_eq!(state.selection, selection_once);
        assert!(state.tracked.is_none());
    }

    #[test]
    fn reselecting_after_confirm_clears_anchor_and_landmark() {
        let mut state = confirmed_state();
        state.toggle_selection();

        assert_eq!(state.selection, SelectionPhase::Selecting);
        assert!(state.anchor.is_none());
        assert!(state.tracked.is_none());
    }

    #[test]
    fn displacement_applies_exactly_once_per_pose_event() {
        let mut state = confirmed_state();
        let anchor = state.anchor.expect("anchor fixed");

        state.apply_poses(vec![Pose::new(vec![Keypoint::new(
            "nose", 403.0, 297.0, 0.9,
        )])]);
        state.apply_motion();
        assert_eq!(state.anchor, Some(anchor + Vec2::new(3.0, -3.0)));

        // A second render tick without a new pose event moves nothing.
        state.apply_motion();
        assert_eq!(state.anchor, Some(anchor + Vec2::new(3.0, -3.0)));
    }

    #[test]
    fn stale_displacement_reused_when_landmark_drops_out() {
        let mut state = confirmed_state();
        state.apply_poses(vec![Pose::new(vec![Keypoint::new(
            "nose", 403.0, 297.0, 0.9,
        )])]);
        state.apply_motion();
        let anchor = state.anchor.expect("anchor fixed");

        state.apply_poses(vec![Pose::new(vec![Keypoint::new(
            "leftEye", 0.0, 0.0, 0.9,
        )])]);
        state.apply_motion();

        // The last delta stays in effect and is applied for this event too.
        assert_eq!(state.anchor, Some(anchor + Vec2::new(3.0, -3.0)));
    }

    #[test]
    fn anchor_fixed_before_confirm_does_not_drift() {
        let mut state = SessionState::default();
        state.apply_poses(two_keypoint_pose());
        state.begin_selection();
        state.fix_anchor(Pos2::new(402.0, 301.0));

        state.apply_poses(vec![Pose::new(vec![Keypoint::new(
            "nose", 410.0, 310.0, 0.9,
        )])]);
        state.apply_motion();

        assert_eq!(state.anchor, Some(Pos2::new(402.0, 301.0)));
    }

    #[test]
    fn sketch_unreachable_before_selection_confirmed() {
        let mut state = SessionState::default();
        state.begin_sketch();
        assert_eq!(state.sketch, SketchPhase::Hidden);
        assert!(state.sketch_layer.is_none());
    }

    #[test]
    fn sketch_confirm_snapshots_anchor() {
        let mut state = confirmed_state();
        state.anchor = Some(Pos2::new(120.0, 340.0));
        state.begin_sketch();
        state.append_sketch_segment(Pos2::new(10.0, 10.0), Pos2::new(20.0, 15.0));
        state.confirm_sketch();

        assert_eq!(state.sketch, SketchPhase::Confirmed);
        assert_eq!(state.base_sketch_position, Some(Pos2::new(120.0, 340.0)));
        assert!(state.sketch_layer.as_ref().expect("layer kept").is_frozen());
    }

    #[test]
    fn confirm_sketch_without_sketching_is_noop() {
        let mut state = confirmed_state();
        state.confirm_sketch();

        assert_eq!(state.sketch, SketchPhase::Hidden);
        assert_eq!(state.notice, Some(Notice::NoSketchToConfirm));
        assert!(state.base_sketch_position.is_none());
    }

    #[test]
    fn sketch_reset_round_trip() {
        let mut state = confirmed_state();
        state.begin_sketch();
        state.append_sketch_segment(Pos2::ZERO, Pos2::new(30.0, 30.0));
        state.toggle_sketch();

        assert_eq!(state.sketch, SketchPhase::Hidden);
        assert!(state.sketch_layer.is_none());

        state.toggle_sketch();
        assert_eq!(
            state.sketch_layer.as_ref().expect("recreated"),
            &SketchLayer::new()
        );
    }

    #[test]
    fn segments_only_recorded_while_sketching() {
        let mut state = confirmed_state();
        state.append_sketch_segment(Pos2::ZERO, Pos2::new(1.0, 1.0));
        assert!(state.sketch_layer.is_none());

        state.begin_sketch();
        state.append_sketch_segment(Pos2::ZERO, Pos2::new(1.0, 1.0));
        state.confirm_sketch();
        state.append_sketch_segment(Pos2::new(1.0, 1.0), Pos2::new(2.0, 2.0));

        assert_eq!(
            state.sketch_layer.as_ref().expect("layer").segments().len(),
            1
        );
    }

    #[test]
    fn sketch_offset_follows_tracked_landmark() {
        let mut state = confirmed_state();
        state.anchor = Some(Pos2::new(100.0, 100.0));
        state.begin_sketch();
        state.append_sketch_segment(Pos2::ZERO, Pos2::new(5.0, 5.0));
        state.confirm_sketch();

        let before = state.sketch_offset();
        state.apply_poses(vec![Pose::new(vec![Keypoint::new(
            "nose", 415.0, 310.0, 0.9,
        )])]);
        state.apply_motion();

        assert_eq!(state.sketch_offset() - before, Vec2::new(15.0, 10.0));
    }

    #[test]
    fn sketch_offset_zero_until_confirmed() {
        let mut state = confirmed_state();
        state.begin_sketch();
        assert_eq!(state.sketch_offset(), Vec2::ZERO);
    }

    #[test]
    fn controls_follow_the_transition_table() {
        let mut state = SessionState::default();

        let idle = state.controls();
        assert!(idle.select_visible);
        assert_eq!(idle.select_label, "Select");
        assert!(!idle.confirm_selection_visible);
        assert!(!idle.sketch_visible);

        state.apply_poses(two_keypoint_pose());
        state.begin_selection();
        let selecting = state.controls();
        assert_eq!(selecting.select_label, "Reset");
        assert!(selecting.confirm_selection_visible);
        assert!(!selecting.confirm_selection_enabled);

        state.fix_anchor(Pos2::new(402.0, 301.0));
        assert!(state.controls().confirm_selection_enabled);

        state.confirm_selection();
        let confirmed = state.controls();
        assert!(!confirmed.select_visible);
        assert!(!confirmed.confirm_selection_visible);
        assert!(confirmed.sketch_visible);
        assert_eq!(confirmed.sketch_label, "Sketch");
        assert!(!confirmed.confirm_sketch_visible);

        state.begin_sketch();
        let sketching = state.controls();
        assert_eq!(sketching.sketch_label, "Reset");
        assert!(sketching.confirm_sketch_visible);

        state.confirm_sketch();
        let done = state.controls();
        assert!(done.select_visible);
        assert!(!done.sketch_visible);
        assert!(!done.confirm_sketch_visible);
    }
}
