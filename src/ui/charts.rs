use eframe::egui::{self, Align, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};

use crate::chart::scene::{HAlign, Primitive, Scene, VAlign};
use crate::color::Rgb;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart panel (central panel)
// ---------------------------------------------------------------------------

/// Render both charts stacked in the central panel.
pub fn charts_panel(ui: &mut Ui, state: &AppState) {
    if state.loading {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.spinner();
        });
        return;
    }

    let Some((line, bars)) = &state.charts else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a movie dataset to view charts  (File → Open…)");
        });
        return;
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for scene in [line, bars] {
                let width = ui.available_width();
                let height = width * (scene.height / scene.width.max(1.0)) as f32;
                paint_scene(ui, scene, Vec2::new(width, height));
                ui.add_space(12.0);
            }
        });
}

/// Paint a scene into a freshly allocated area, scaled to fit `size`.
pub fn paint_scene(ui: &mut Ui, scene: &Scene, size: Vec2) {
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 4.0, Color32::WHITE);

    let k = (rect.width() / scene.width.max(1.0) as f32).min(rect.height() / scene.height.max(1.0) as f32);
    let to_screen = |(x, y): (f64, f64)| Pos2::new(rect.min.x + x as f32 * k, rect.min.y + y as f32 * k);

    for primitive in &scene.primitives {
        match primitive {
            Primitive::Line {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [to_screen(*from), to_screen(*to)],
                    Stroke::new(*width as f32 * k, color32(*color)),
                );
            }
            Primitive::Polyline {
                points,
                color,
                width,
            } => {
                let points: Vec<Pos2> = points.iter().copied().map(to_screen).collect();
                painter.add(Shape::line(
                    points,
                    Stroke::new(*width as f32 * k, color32(*color)),
                ));
            }
            Primitive::Circle {
                center,
                radius,
                color,
            } => {
                painter.circle_filled(to_screen(*center), *radius as f32 * k, color32(*color));
            }
            Primitive::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let r = egui::Rect::from_two_pos(to_screen((*x, *y)), to_screen((x + width, y + height)));
                painter.rect_filled(r, 0.0, color32(*color));
            }
            Primitive::Text {
                pos,
                text,
                size,
                color,
                h_align,
                v_align,
            } => {
                painter.text(
                    to_screen(*pos),
                    align2(*h_align, *v_align),
                    text,
                    FontId::proportional(*size as f32 * k),
                    color32(*color),
                );
            }
        }
    }
}

fn color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

fn align2(h: HAlign, v: VAlign) -> Align2 {
    let h = match h {
        HAlign::Left => Align::Min,
        HAlign::Center => Align::Center,
        HAlign::Right => Align::Max,
    };
    let v = match v {
        VAlign::Top => Align::Min,
        VAlign::Middle => Align::Center,
        VAlign::Bottom => Align::Max,
    };
    Align2([h, v])
}
