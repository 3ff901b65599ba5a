use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Measurement;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – branding and measurement selector
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (optional, centered; bytes registered at startup) ----
    if let Some(logo) = &state.logo {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(logo.uri())
                    .max_width(ui.available_width())
                    .max_height(160.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("⚙️ Paramètres de Vol et Données");
    ui.label("Veuillez sélectionner l'indicateur météorologique à rendre sur la trajectoire 3D :");
    ui.separator();

    // ---- Colour-by selector ----
    ui.strong("Sélectionner le type de données");
    let current = state.measurement;
    egui::ComboBox::from_id_salt("measurement")
        .selected_text(current.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for m in Measurement::ALL {
                if ui.selectable_label(current == m, m.label()).clicked() {
                    state.set_measurement(m);
                }
            }
        });
    ui.separator();

    // ---- Legend ----
    if let Some(scale) = &state.color_scale {
        ui.strong(scale.measurement.label());
        for (label, color) in scale.legend_entries(6).into_iter().rev() {
            ui.horizontal(|ui: &mut Ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, color);
                ui.label(label);
            });
        }
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

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} records loaded, {} plotted (1 in {})",
                view.dataset.len(),
                view.sample.len(),
                view.sample.stride().get()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel pieces
// ---------------------------------------------------------------------------

pub fn page_header(ui: &mut Ui, state: &AppState) {
    ui.heading("D.Æᵖ.D.A.L. - Plateforme de Diagnostic de l'Air Local 3D");
    ui.label(
        "Ce système présente les données météorologiques et de pollution spatiale \
         multidimensionnelles collectées par le drone à aile pivotante (VTOL) pendant le vol.",
    );
    ui.add_space(6.0);
    ui.strong(format!(
        "Vue actuelle : Cartographie thermique 3D de {}",
        state.measurement.label()
    ));
}

/// Collapsible table with the first rows of the full dataset.
pub fn data_log(ui: &mut Ui, state: &AppState) {
    let Some(preview) = state.preview() else {
        return;
    };

    egui::CollapsingHeader::new("📊 Afficher le journal des données brutes (Data Log)")
        .id_salt("data_log")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto().at_least(150.0))
                .columns(Column::remainder().at_least(90.0), preview.columns.len() - 1)
                .header(20.0, |mut header| {
                    for name in &preview.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(*name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, preview.rows.len(), |mut row| {
                        let cells = &preview.rows[row.index()];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}

/// Blocking message shown instead of the dashboard.
pub fn fatal_error(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(message).color(Color32::RED).heading());
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sensor log")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_source(path);
        state.status_message = state
            .fatal_error
            .as_ref()
            .map(|_| "Error: the selected file could not be loaded".to_string());
    }
}
