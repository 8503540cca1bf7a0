use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, pos2, vec2,
};
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::chart::{PieChart, ScatterChart};
use crate::color::CategoryColors;
use crate::state::AppState;

const FAILURE_COLOR: Color32 = Color32::from_rgb(0xd3, 0x54, 0x00);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(0x27, 0xae, 0x60);

/// Wedge resolution: triangles per full turn.
const PIE_SEGMENTS: f32 = 128.0;

// ---------------------------------------------------------------------------
// Pie chart (success launches)
// ---------------------------------------------------------------------------

/// Render the outcome pie. Outcome-class slices get fixed colours, site
/// slices use the per-site palette.
pub fn success_pie(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(pie) = state.figures.pie() else {
        return;
    };
    let colors = &state.site_colors;
    pie_chart(ui, pie, height, |label| slice_color(colors, label));
}

fn slice_color(sites: &CategoryColors, label: &str) -> Color32 {
    match label {
        "0" => FAILURE_COLOR,
        "1" => SUCCESS_COLOR,
        site => sites.color_for(site),
    }
}

fn pie_chart(ui: &mut Ui, pie: &PieChart, height: f32, color_for: impl Fn(&str) -> Color32) {
    ui.strong(pie.title.as_str());
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();

    if pie.is_blank() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No launches match this selection",
            FontId::proportional(14.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let radius = (rect.height() * 0.45).min(rect.width() * 0.3).max(10.0);
    let center = pos2(rect.left() + radius + 24.0, rect.center().y);
    let total = pie.total() as f32;

    let mut start = -FRAC_PI_2;
    for slice in pie.slices.iter().filter(|s| s.value > 0) {
        let sweep = slice.value as f32 / total * TAU;
        let color = color_for(&slice.label);
        let steps = (sweep / TAU * PIE_SEGMENTS).ceil().max(1.0) as usize;
        for k in 0..steps {
            let a0 = start + sweep * k as f32 / steps as f32;
            let a1 = start + sweep * (k + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, on_circle(center, radius, a0), on_circle(center, radius, a1)],
                color,
                Stroke::NONE,
            ));
        }
        start += sweep;
    }

    // Legend, zero-weight slices included so every category is listed.
    let x = center.x + radius + 32.0;
    let mut y = rect.top() + 12.0;
    for slice in &pie.slices {
        painter.circle_filled(pos2(x, y), 6.0, color_for(&slice.label));
        let share = slice.value as f32 / total * 100.0;
        painter.text(
            pos2(x + 14.0, y),
            Align2::LEFT_CENTER,
            format!("{}  {} ({share:.1}%)", slice.label, slice.value),
            FontId::proportional(13.0),
            text_color,
        );
        y += 20.0;
    }
}

fn on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + radius * vec2(angle.cos(), angle.sin())
}

// ---------------------------------------------------------------------------
// Payload vs. outcome scatter
// ---------------------------------------------------------------------------

/// Render the payload scatter, one legend entry per booster category.
pub fn payload_scatter(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(chart) = state.figures.scatter() else {
        return;
    };
    scatter_chart(ui, chart, &state.booster_colors, height);
}

fn scatter_chart(ui: &mut Ui, chart: &ScatterChart, colors: &CategoryColors, height: f32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(chart.title.as_str());
        if chart.points.is_empty() {
            ui.label(egui::RichText::new("(no launches in range)").weak());
        }
    });

    Plot::new("payload_scatter")
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .height(height)
        .include_x(0.0)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in chart.series() {
                let series = Points::new(PlotPoints::from(points))
                    .name(category)
                    .color(colors.color_for(category))
                    .radius(4.0);
                plot_ui.points(series);
            }
        });
}
