use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::loader::{self, DataSource};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – site dropdown and payload slider
// ---------------------------------------------------------------------------

/// Render the filter controls described by the dashboard layout.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    site_dropdown(ui, state);
    ui.add_space(12.0);
    payload_slider(ui, state);
}

fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    let dropdown = state.dashboard.layout().site_dropdown.clone();
    let current = state.dashboard.site();

    ui.label(dropdown.label.as_str());

    let selected_text = dropdown
        .options
        .iter()
        .find(|o| o.value == current)
        .map(|o| o.label.clone())
        .unwrap_or_else(|| dropdown.placeholder.clone());

    let mut picked = None;
    egui::ComboBox::from_id_salt(dropdown.id.as_str())
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if dropdown.searchable {
                ui.add(
                    egui::TextEdit::singleline(&mut state.site_query)
                        .hint_text(dropdown.placeholder.as_str()),
                );
            }
            let query = state.site_query.to_lowercase();
            for option in &dropdown.options {
                if !query.is_empty() && !option.label.to_lowercase().contains(&query) {
                    continue;
                }
                if ui
                    .selectable_label(option.value == current, option.label.as_str())
                    .clicked()
                {
                    picked = Some(option.value.clone());
                }
            }
        });

    if let Some(site) = picked {
        state.site_query.clear();
        state.select_site(site);
    }
}

fn payload_slider(ui: &mut Ui, state: &mut AppState) {
    let slider = state.dashboard.layout().payload_slider.clone();
    let range = slider.min..=slider.max;

    ui.label(slider.label.as_str());

    let lo = ui.add(
        egui::Slider::new(&mut state.payload_lo, range.clone())
            .step_by(slider.step)
            .text("min"),
    );
    let hi = ui.add(
        egui::Slider::new(&mut state.payload_hi, range)
            .step_by(slider.step)
            .text("max"),
    );

    let marks: Vec<&str> = slider.marks.iter().map(|(_, label)| label.as_str()).collect();
    ui.label(RichText::new(marks.join(" · ")).small().weak());

    if lo.changed() || hi.changed() {
        state.commit_payload_range();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let visible = state
            .figures
            .scatter()
            .map(|s| s.points.len())
            .unwrap_or_default();
        ui.label(format!(
            "{} launches loaded from {}, {} in payload range",
            state.dashboard.dataset().len(),
            state.source_label,
            visible
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let source = DataSource::Path(path);
        match loader::load_source(&source) {
            Ok(dataset) => state.set_dataset(dataset, source.to_string()),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
