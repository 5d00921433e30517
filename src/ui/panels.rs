use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, SelectionEvent};

// ---------------------------------------------------------------------------
// Left side panel – year / station selectors
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(current) = state.selection().cloned() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Collect the event and apply it after the widgets release `state`.
    let mut event = None;

    ui.strong("Year");
    egui::ComboBox::from_id_salt("year")
        .selected_text(current.year.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for &year in &state.years {
                if ui
                    .selectable_label(current.year == year, year.to_string())
                    .clicked()
                {
                    event = Some(SelectionEvent::Year(year));
                }
            }
        });
    ui.add_space(8.0);

    ui.strong("Station");
    egui::ComboBox::from_id_salt("station")
        .selected_text(&current.station)
        .show_ui(ui, |ui: &mut Ui| {
            for station in &state.stations {
                if ui
                    .selectable_label(current.station == *station, station)
                    .clicked()
                {
                    event = Some(SelectionEvent::Station(station.clone()));
                }
            }
        });

    if let Some(event) = event {
        state.apply(event);
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
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let visible = state.insights.as_ref().map_or(0, |i| i.rows.len());
            let span = ds
                .period_span()
                .map(|(first, last)| format!(" ({first} to {last})"))
                .unwrap_or_default();
            ui.label(format!(
                "{} rows loaded from {}{span}, {visible} selected",
                ds.len(),
                ds.source().display()
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

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sensor data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
