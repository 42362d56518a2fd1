use std::time::Duration;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MovieChartsApp {
    pub state: AppState,
}

impl MovieChartsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for MovieChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_loading();
        if self.state.loading {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::charts_panel(ui, &self.state);
        });
    }
}
