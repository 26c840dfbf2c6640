use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Left side panel – column, grouping and bin controls
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut ViewerState) {
    ui.heading("Histogram");
    ui.separator();

    let columns = match &state.table {
        Some(t) => t.columns.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Value column ----
            ui.strong("Column");
            let current = state.config.column.clone();
            egui::ComboBox::from_id_salt("value_column")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &columns {
                        if ui.selectable_label(current == *col, col).clicked() {
                            state.set_column(col.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Split by ----
            ui.strong("Split by");
            let current_group = state.config.group_by.clone();
            egui::ComboBox::from_id_salt("group_column")
                .selected_text(current_group.as_deref().unwrap_or("(none)"))
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(current_group.is_none(), "(none)")
                        .clicked()
                    {
                        state.set_group_by(None);
                    }
                    for col in &columns {
                        let selected = current_group.as_deref() == Some(col.as_str());
                        if ui.selectable_label(selected, col).clicked() {
                            state.set_group_by(Some(col.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- Bins ----
            ui.strong("Bins");
            let mut bins = state.config.bins;
            if ui.add(egui::Slider::new(&mut bins, 1..=100)).changed() {
                state.set_bins(bins);
            }
            ui.separator();

            // ---- Legend swatches ----
            for series in &state.series {
                ui.label(
                    RichText::new(format!("■ {}  ({})", series.name, series.histogram.total()))
                        .color(series.color),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(path)) = (&state.table, &state.source) {
            ui.label(format!(
                "{}: {} rows, {} plotted",
                path.display(),
                table.len(),
                state.plotted()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut ViewerState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
