use eframe::egui::{self, Context as EguiContext, Key, TopBottomPanel};
use eframe::{App, Frame};

use crate::canvas::{self, FrameTexture};
use crate::feed::{FeedEvent, PoseFeed, PoseSource, SyntheticSource};
use crate::state::SessionState;
use crate::status_bar;
use crate::theme;
use crate::toolbar;
use crate::ui_controls;

pub const FRAME_WIDTH: u32 = 960;
pub const FRAME_HEIGHT: u32 = 720;
const FEED_FPS: f32 = 30.0;

pub struct PoseMarkApp {
    pub state: SessionState,
    feed: PoseFeed,
    frame: Option<FrameTexture>,
    feed_error: Option<String>,
    theme: theme::AppTheme,
}

impl PoseMarkApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = theme::dark_theme();
        theme::apply_theme(&cc.egui_ctx, &theme);

        let source: Box<dyn PoseSource> =
            Box::new(SyntheticSource::new(FRAME_WIDTH, FRAME_HEIGHT, FEED_FPS));

        Self {
            state: SessionState::default(),
            feed: PoseFeed::spawn(source),
            frame: None,
            feed_error: None,
            theme,
        }
    }

    /// Drains every pending feed event before anything renders, so the
    /// detection callback and the render tick never interleave mid-frame.
    fn process_feed_events(&mut self) {
        while let Some(event) = self.feed.try_recv() {
            match event {
                FeedEvent::Frame(image) => {
                    self.frame = Some(FrameTexture::new(image));
                }
                FeedEvent::Poses(poses) => {
                    self.state.apply_poses(poses);
                    self.state.apply_motion();
                }
                FeedEvent::Error(message) => {
                    self.feed_error = Some(message);
                }
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &EguiContext) {
        if ctx.input(|input| input.key_pressed(Key::Escape)) {
            self.state.reset_selection();
        }
        if ctx.input(|input| input.key_pressed(Key::K)) {
            self.state.toggle_skeleton_overlay();
        }
    }
}

impl App for PoseMarkApp {
    fn update(&mut self, ctx: &EguiContext, _frame: &mut Frame) {
        self.process_feed_events();
        self.handle_shortcuts(ctx);

        let toolbar_output = TopBottomPanel::top("toolbar")
            .exact_height(self.theme.layout.toolbar_height)
            .frame(ui_controls::toolbar_frame(&self.theme))
            .show(ctx, |ui| toolbar::show_toolbar(ui, &self.state))
            .inner;

        if toolbar_output.select_toggled {
            self.state.toggle_selection();
        }
        if toolbar_output.confirm_selection {
            self.state.confirm_selection();
        }
        if toolbar_output.sketch_toggled {
            self.state.toggle_sketch();
        }
        if toolbar_output.confirm_sketch {
            self.state.confirm_sketch();
        }
        if toolbar_output.skeleton_toggled {
            self.state.toggle_skeleton_overlay();
        }

        TopBottomPanel::bottom("status_bar")
            .exact_height(self.theme.layout.status_bar_height)
            .frame(ui_controls::status_bar_frame(&self.theme))
            .show(ctx, |ui| {
                status_bar::show_status_bar(ui, &self.state, self.feed_error.as_deref());
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.surfaces.app_bg)
                    .inner_margin(egui::Margin::symmetric(
                        self.theme.layout.panel_padding_x,
                        self.theme.layout.panel_padding_y,
                    )),
            )
            .show(ctx, |ui| {
                canvas::show_canvas(ui, ctx, &mut self.state, self.frame.as_mut());
            });

        ctx.request_repaint_after(std::time::Duration::from_millis(
            self.theme.motion.fast_ms as u64,
        ));
    }
}
