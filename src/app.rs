use eframe::egui::{self, Color32, RichText};

use crate::reactive::OutputId;
use crate::state::AppState;
use crate::ui::{panels, plot};

const HEADING_COLOR: Color32 = Color32::from_rgb(0xd3, 0x54, 0x00);

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: site dropdown + payload slider ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: heading, pie, scatter ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let layout = self.state.dashboard.layout();
            let heading = layout.heading.clone();
            let graphs = layout.graphs.clone();

            ui.vertical_centered(|ui| {
                ui.label(RichText::new(heading).size(24.0).color(HEADING_COLOR).strong());
            });
            ui.separator();

            // Stacked charts share what is left, minus their title rows.
            let slots = graphs.len().max(1) as f32;
            let chart_height = ((ui.available_height() - 36.0 * slots) / slots).max(120.0);
            for (i, graph) in graphs.into_iter().enumerate() {
                if i > 0 {
                    ui.separator();
                }
                match graph {
                    OutputId::SuccessPieChart => plot::success_pie(ui, &self.state, chart_height),
                    OutputId::SuccessPayloadScatterChart => {
                        plot::payload_scatter(ui, &self.state, chart_height)
                    }
                }
            }
        });
    }
}
