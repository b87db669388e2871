use egui::epaint::Shadow;
use egui::{vec2, Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

#[derive(Clone, Debug)]
pub struct AppTheme {
    pub surfaces: SurfaceTokens,
    pub text: TextTokens,
    pub controls: ControlTokens,
    pub layout: LayoutTokens,
    pub shadows: ShadowTokens,
    pub motion: MotionTokens,
}

#[derive(Clone, Debug)]
pub struct SurfaceTokens {
    pub app_bg: Color32,
    pub panel_bg: Color32,
    pub card_bg: Color32,
    pub canvas_bg: Color32,
    pub stroke_soft: Color32,
    pub stroke_strong: Color32,
    pub accent: Color32,
    pub accent_soft: Color32,
}

#[derive(Clone, Debug)]
pub struct TextTokens {
    pub primary: Color32,
    pub secondary: Color32,
    pub muted: Color32,
    pub accent: Color32,
}

#[derive(Clone, Debug)]
pub struct ControlTokens {
    pub panel_rounding: f32,
    pub button_rounding: f32,
    pub button_height: f32,
}

#[derive(Clone, Debug)]
pub struct LayoutTokens {
    pub space_1: f32,
    pub space_2: f32,
    pub space_3: f32,
    pub panel_padding_x: f32,
    pub panel_padding_y: f32,
    pub control_gap: f32,
    pub group_gap: f32,
    pub toolbar_height: f32,
    pub status_bar_height: f32,
}

#[derive(Clone, Debug)]
pub struct ShadowTokens {
    pub ambient: Color32,
    pub focus_ring: Color32,
}

#[derive(Clone, Debug)]
pub struct MotionTokens {
    pub fast_ms: u32,
    pub normal_ms: u32,
}

pub fn dark_theme() -> AppTheme {
    AppTheme {
        surfaces: SurfaceTokens {
            app_bg: Color32::from_rgb(0x14, 0x16, 0x1A),
            panel_bg: Color32::from_rgb(0x1A, 0x1C, 0x21),
            card_bg: Color32::from_rgb(0x21, 0x24, 0x2B),
            canvas_bg: Color32::from_rgb(0x0F, 0x11, 0x16),
            stroke_soft: Color32::from_rgba_unmultiplied(255, 255, 255, 24),
            stroke_strong: Color32::from_rgba_unmultiplied(255, 255, 255, 52),
            accent: Color32::from_rgb(0x3E, 0xCF, 0x8E),
            accent_soft: Color32::from_rgba_unmultiplied(62, 207, 142, 72),
        },
        text: TextTokens {
            primary: Color32::from_rgb(0xF2, 0xF6, 0xF4),
            secondary: Color32::from_rgb(0xAD, 0xBA, 0xB4),
            muted: Color32::from_rgb(0x7D, 0x8A, 0x85),
            accent: Color32::from_rgb(0x7F, 0xE3, 0xB6),
        },
        controls: ControlTokens {
            panel_rounding: 10.0,
            button_rounding: 8.0,
            button_height: 30.0,
        },
        layout: LayoutTokens {
            space_1: 4.0,
            space_2: 8.0,
            space_3: 12.0,
            panel_padding_x: 12.0,
            panel_padding_y: 8.0,
            control_gap: 8.0,
            group_gap: 14.0,
            toolbar_height: 46.0,
            status_bar_height: 36.0,
        },
        shadows: ShadowTokens {
            ambient: Color32::from_rgba_unmultiplied(0, 0, 0, 60),
            focus_ring: Color32::from_rgba_unmultiplied(96, 224, 164, 200),
        },
        motion: MotionTokens {
            fast_ms: 16,
            normal_ms: 160,
        },
    }
}

pub fn apply_theme(ctx: &Context, theme: &AppTheme) {
    let mut style: Style = (*ctx.style()).clone();

    style.spacing.item_spacing = vec2(theme.layout.control_gap, theme.layout.space_2);
    style.spacing.button_padding = vec2(theme.layout.space_3, theme.layout.space_1);
    style.animation_time = theme.motion.normal_ms as f32 / 1000.0;

    style.visuals = Visuals::dark();
    style.visuals.override_text_color = Some(theme.text.primary);
    style.visuals.panel_fill = theme.surfaces.panel_bg;
    style.visuals.window_fill = theme.surfaces.panel_bg;
    style.visuals.faint_bg_color = theme.surfaces.panel_bg;
    style.visuals.extreme_bg_color = theme.surfaces.app_bg;
    style.visuals.window_rounding = Rounding::same(theme.controls.panel_rounding);

    style.visuals.widgets.noninteractive.bg_fill = theme.surfaces.panel_bg;
    style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, theme.text.secondary);
    style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke_soft);

    style.visuals.widgets.inactive.bg_fill = theme.surfaces.card_bg;
    style.visuals.widgets.inactive.weak_bg_fill = theme.surfaces.card_bg;
    style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke_soft);
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, theme.text.secondary);

    style.visuals.widgets.hovered.bg_fill = theme.surfaces.card_bg;
    style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke_strong);
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, theme.text.primary);

    style.visuals.widgets.active.bg_fill = theme.surfaces.accent_soft;
    style.visuals.widgets.active.bg_stroke = Stroke::new(1.0, theme.surfaces.accent);
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, theme.text.primary);

    style.visuals.selection.bg_fill = theme.surfaces.accent_soft;
    style.visuals.selection.stroke = Stroke::new(1.0, theme.surfaces.accent);
    style.visuals.popup_shadow = Shadow {
        offset: vec2(0.0, 8.0),
        blur: 18.0,
        spread: 0.0,
        color: theme.shadows.ambient,
    };

    for rounding in [
        &mut style.visuals.widgets.noninteractive.rounding,
        &mut style.visuals.widgets.inactive.rounding,
        &mut style.visuals.widgets.hovered.rounding,
        &mut style.visuals.widgets.active.rounding,
        &mut style.visuals.widgets.open.rounding,
    ] {
        *rounding = Rounding::same(theme.controls.button_rounding);
    }

    style
        .text_styles
        .insert(TextStyle::Body, FontId::new(15.0, FontFamily::Proportional));
    style.text_styles.insert(
        TextStyle::Button,
        FontId::new(14.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Small,
        FontId::new(12.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}
