use std::path::Path;

use eframe::egui::{self, ScrollArea, Ui};

use crate::color::FieldColors;
use crate::state::{AppState, DetailTab, InfoTab};
use crate::ui::{insights, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct EnviroInsightsApp {
    pub state: AppState,
    colors: FieldColors,
}

impl EnviroInsightsApp {
    /// Build the app and try to open `data_path`. A missing file only
    /// shows up in the status bar.
    pub fn new(data_path: &Path) -> Self {
        let mut app = Self::default();
        app.state.open(data_path);
        app
    }
}

impl eframe::App for EnviroInsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state, &self.colors));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState, colors: &FieldColors) {
    let (Some(dataset), Some(view)) = (state.dataset.clone(), state.insights.clone()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to begin  (File → Open…)");
        });
        return;
    };

    ui.heading(format!(
        "Environmental Insights for {}, {}",
        view.selection.station, view.selection.year
    ));

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.info_tab, InfoTab::About, "Fun Facts");
        ui.selectable_value(&mut state.info_tab, InfoTab::DatasetFacts, "Fun Facts About The Data");
        ui.selectable_value(
            &mut state.info_tab,
            InfoTab::StatisticalInsights,
            "Statistical Insights",
        );
    });
    insights::info_tab(ui, state.info_tab, state.facts.as_ref());
    ui.separator();

    ui.columns(2, |cols| {
        plot::monthly_chart(&mut cols[0], &view.monthly, colors);
        plot::category_pie(&mut cols[1], &view.categories);
    });
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(
            &mut state.detail_tab,
            DetailTab::Meteorological,
            "Meteorological Conditions",
        );
        ui.selectable_value(&mut state.detail_tab, DetailTab::DataTable, "Data Overview");
        ui.selectable_value(&mut state.detail_tab, DetailTab::Summary, "Statistical Summary");
    });
    match state.detail_tab {
        DetailTab::Meteorological => plot::scatter_grid(ui, &view.scatter, colors),
        DetailTab::DataTable => table::data_table(ui, &dataset, &view.rows),
        DetailTab::Summary => table::summary_table(ui, &view.summary),
    }
}
