use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DadalApp {
    pub state: AppState,
}

impl DadalApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DadalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Missing data stops everything else ----
        if let Some(msg) = &self.state.fatal_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::fatal_error(ui, msg);
            });
            return;
        }

        // ---- Left side panel: branding + measurement selector ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: 3D view + raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::page_header(ui, &self.state);
                    plot::scatter_3d(ui, &mut self.state);
                    ui.add_space(8.0);
                    panels::data_log(ui, &self.state);
                });
        });
    }
}
