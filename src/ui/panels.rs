use egui::{Color32, Context, RichText};

use crate::ui::state::UiState;
use crate::ui::theme::*;

/// Camera readout shown in the overlay. Angles in degrees.
pub struct CameraReadout {
    pub azimuth: f32,
    pub elevation: f32,
    pub eye: [f32; 3],
    pub horizontal_fov: f32,
    pub dragging: bool,
}

pub fn draw_info_overlay(ctx: &Context, state: &UiState, camera: &CameraReadout) {
    egui::Area::new(egui::Id::new("info_overlay"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.label(RichText::new("Planet Viewer").color(TEXT_BRIGHT).strong());
                    ui.add_space(4.0);

                    ui.style_mut().override_font_id =
                        Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    let drag_color = if camera.dragging { ACCENT_ORANGE } else { TEXT_MUTED };
                    ui.label(
                        RichText::new(format!(
                            "Azimuth {:>6.1}°  Elevation {:>5.1}°",
                            camera.azimuth, camera.elevation
                        ))
                        .color(drag_color),
                    );
                    ui.label(
                        RichText::new(format!(
                            "Eye ({:.2}, {:.2}, {:.2}) | hFOV {:.1}°",
                            camera.eye[0], camera.eye[1], camera.eye[2], camera.horizontal_fov
                        ))
                        .color(TEXT_MUTED),
                    );
                    ui.label(
                        RichText::new(format!(
                            "Icosphere L{}: {} vertices, {} triangles",
                            state.subdivisions,
                            fmt_num(state.vertex_count),
                            fmt_num(state.triangle_count)
                        ))
                        .color(TEXT_PRIMARY),
                    );
                    ui.label(
                        RichText::new(format!(
                            "{:.0} FPS | vsync {}",
                            state.fps,
                            if state.vsync_enabled { "on" } else { "off" }
                        ))
                        .color(TEXT_MUTED),
                    );
                });
        });

    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            ui.label(
                RichText::new("LMB+Drag - Orbit | H - Overlay | V - Vsync | Esc - Quit")
                    .color(TEXT_MUTED)
                    .size(11.0),
            );
        });
}

fn fmt_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 10_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::fmt_num;

    #[test]
    fn formats_mesh_counts() {
        assert_eq!(fmt_num(2562), "2562");
        assert_eq!(fmt_num(81_920), "81.9K");
        assert_eq!(fmt_num(1_310_720), "1.31M");
    }
}
