use egui::{
    Align2, Color32, ColorImage, Context, FontId, Pos2, Rect, Response, Sense, Stroke,
    TextureHandle, TextureOptions, Ui, Vec2,
};
use image::RgbaImage;

use crate::landmark::SKELETON_CONNECTIONS;
use crate::state::{SelectionPhase, SessionState, SketchPhase};
use crate::theme;

const ANCHOR_RADIUS: f32 = 10.0;
const SKELETON_BONE_COLOR: Color32 = Color32::from_rgb(225, 64, 64);
const SKELETON_JOINT_COLOR: Color32 = Color32::from_rgb(64, 225, 96);

/// Latest video frame plus its lazily-uploaded texture. A fresh value is
/// created per frame event, so the texture uploads at most once per frame.
pub struct FrameTexture {
    image: RgbaImage,
    texture: Option<TextureHandle>,
}

impl FrameTexture {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            texture: None,
        }
    }

    pub fn size_vec2(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32)
    }

    fn ensure_texture(&mut self, ctx: &Context) -> &TextureHandle {
        if self.texture.is_none() {
            let size = [self.image.width() as usize, self.image.height() as usize];
            let color = ColorImage::from_rgba_unmultiplied(size, self.image.as_raw());
            self.texture = Some(ctx.load_texture("video_frame", color, TextureOptions::LINEAR));
        }
        self.texture.as_ref().expect("texture was just created")
    }
}

pub fn show_canvas(
    ui: &mut Ui,
    ctx: &Context,
    state: &mut SessionState,
    frame: Option<&mut FrameTexture>,
) {
    let Some(frame) = frame else {
        empty_canvas(ui);
        return;
    };

    let texture_id = frame.ensure_texture(ctx).id();
    let frame_size = frame.size_vec2();

    let (canvas_rect, response) =
        ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    let origin = canvas_rect.center() - frame_size * 0.5;
    let frame_rect = Rect::from_min_size(origin, frame_size);

    let painter = ui.painter_at(canvas_rect);
    let theme = theme::dark_theme();
    painter.rect_filled(canvas_rect, 12.0, theme.surfaces.canvas_bg);
    painter.image(
        texture_id,
        frame_rect,
        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
        Color32::WHITE,
    );

    if state.settings.show_skeleton {
        draw_skeleton(&painter, state, frame_rect);
    }
    draw_sketch(&painter, state, frame_rect);
    draw_anchor(&painter, state, &response, frame_rect);

    handle_pointer(ctx, state, &response, frame_rect);
}

fn empty_canvas(ui: &mut Ui) {
    let theme = theme::dark_theme();
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 12.0, theme.surfaces.canvas_bg);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "Waiting for the video feed…",
        FontId::proportional(17.0),
        theme.text.secondary,
    );
}

fn draw_skeleton(painter: &egui::Painter, state: &SessionState, frame_rect: Rect) {
    let threshold = state.settings.overlay_min_confidence;

    for pose in &state.poses {
        for (a, b) in SKELETON_CONNECTIONS {
            let (Some(start), Some(end)) = (pose.keypoints.get(a), pose.keypoints.get(b)) else {
                continue;
            };
            if start.is_confident(threshold) && end.is_confident(threshold) {
                painter.line_segment(
                    [
                        frame_to_screen(start.pos(), frame_rect),
                        frame_to_screen(end.pos(), frame_rect),
                    ],
                    Stroke::new(2.0, SKELETON_BONE_COLOR),
                );
            }
        }

        for keypoint in &pose.keypoints {
            if keypoint.is_confident(threshold) {
                painter.circle_filled(
                    frame_to_screen(keypoint.pos(), frame_rect),
                    5.0,
                    SKELETON_JOINT_COLOR,
                );
            }
        }
    }
}

fn draw_anchor(
    painter: &egui::Painter,
    state: &SessionState,
    response: &Response,
    frame_rect: Rect,
) {
    let color = color32(state.settings.anchor_color);

    // While selecting and before the double-click, the marker rides the
    // pointer as a preview.
    if state.selection == SelectionPhase::Selecting && state.anchor.is_none() {
        if let Some(hover) = response.hover_pos() {
            painter.circle_filled(hover, ANCHOR_RADIUS, color);
        }
    }

    if let Some(anchor) = state.anchor {
        painter.circle_filled(frame_to_screen(anchor, frame_rect), ANCHOR_RADIUS, color);
    }
}

fn draw_sketch(painter: &egui::Painter, state: &SessionState, frame_rect: Rect) {
    let Some(layer) = state.sketch_layer.as_ref() else {
        return;
    };

    let offset = state.sketch_offset();
    let stroke = Stroke::new(
        state.settings.sketch_stroke_px,
        color32(state.settings.sketch_color),
    );

    for [from, to] in layer.segments() {
        painter.line_segment(
            [
                frame_to_screen(*from, frame_rect) + offset,
                frame_to_screen(*to, frame_rect) + offset,
            ],
            stroke,
        );
    }
}

fn handle_pointer(ctx: &Context, state: &mut SessionState, response: &Response, frame_rect: Rect) {
    if !response.hovered() && !response.dragged() && !response.clicked() {
        return;
    }

    if response.double_clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            state.fix_anchor(screen_to_frame(pos, frame_rect));
        }
        return;
    }

    if state.sketch == SketchPhase::Sketching && response.dragged() {
        let pointer = ctx.input(|input| input.pointer.clone());
        if let Some(current) = pointer.interact_pos() {
            let previous = current - pointer.delta();
            state.append_sketch_segment(
                screen_to_frame(previous, frame_rect),
                screen_to_frame(current, frame_rect),
            );
        }
    }
}

fn color32(rgba: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn frame_to_screen(pos: Pos2, frame_rect: Rect) -> Pos2 {
    frame_rect.min + pos.to_vec2()
}

fn screen_to_frame(pos: Pos2, frame_rect: Rect) -> Pos2 {
    (pos - frame_rect.min).to_pos2()
}

#[cfg(test)]
mod tests {
    use super::{frame_to_screen, screen_to_frame};
    use egui::{Pos2, Rect, Vec2};

    #[test]
    fn frame_screen_round_trip() {
        let frame_rect = Rect::from_min_size(Pos2::new(24.0, 58.0), Vec2::new(960.0, 720.0));
        let frame_pos = Pos2::new(400.0, 300.0);

        let screen = frame_to_screen(frame_pos, frame_rect);
        assert_eq!(screen, Pos2::new(424.0, 358.0));
        assert_eq!(screen_to_frame(screen, frame_rect), frame_pos);
    }
}
