use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::loader::DataSource;
use crate::state::AppState;

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

        if let Some(source) = &state.source {
            ui.label(source.to_string());
            ui.separator();
        }

        if let (Some(ds), Some(analysis)) = (&state.dataset, &state.analysis) {
            ui.label(format!(
                "{} movies loaded, {} years since {}, {} directors ranked",
                ds.len(),
                analysis.yearly.len(),
                state.config.analysis.min_year,
                analysis.directors.len()
            ));
            if !ds.missing.is_empty() {
                let summary: Vec<String> = ds
                    .missing
                    .iter()
                    .map(|(col, n)| format!("{col}: {n}"))
                    .collect();
                ui.label(RichText::new(format!("missing values ({})", summary.join(", "))).weak());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie dataset")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV / TSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.start_loading(DataSource::File(path));
    }
}
