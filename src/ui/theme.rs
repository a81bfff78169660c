use egui::{Color32, Rounding, Stroke, Style, Visuals};

pub const BG_PANEL: Color32 = Color32::from_rgb(6, 8, 14);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(176, 186, 204);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(112, 120, 138);
pub const TEXT_BRIGHT: Color32 = Color32::from_rgb(226, 232, 240);

pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(214, 140, 48);
pub const BORDER_SUBTLE: Color32 = Color32::from_rgba_premultiplied(40, 60, 110, 77);

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    style.visuals = Visuals {
        override_text_color: Some(TEXT_PRIMARY),
        window_fill: BG_PANEL,
        window_stroke: Stroke::new(1.0, BORDER_SUBTLE),
        window_rounding: Rounding::same(6.0),
        panel_fill: BG_PANEL,
        ..Visuals::dark()
    };
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);

    ctx.set_style(style);
}
