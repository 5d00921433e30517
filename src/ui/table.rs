use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};
use enviro_insights::data::stats::DescriptiveStats;
use enviro_insights::{Dataset, Field};

const ROW_HEIGHT: f32 = 18.0;

/// Cell text for an optional number.
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Filtered rows, one line per record.
pub fn data_table(ui: &mut Ui, dataset: &Dataset, rows: &[usize]) {
    if rows.is_empty() {
        ui.label("No records match this selection.");
        return;
    }
    ui.push_id("data_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(360.0)
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(90.0))
            .columns(Column::auto().at_least(60.0), Field::ALL.len())
            .column(Column::remainder())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("date");
                });
                header.col(|ui| {
                    ui.strong("station");
                });
                for field in Field::ALL {
                    header.col(|ui| {
                        ui.strong(field.column());
                    });
                }
                header.col(|ui| {
                    ui.strong("PM2.5 category");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let Some(record) = dataset.get(rows[row.index()]) else {
                        return;
                    };
                    row.col(|ui| {
                        ui.label(record.date.format("%Y-%m-%d").to_string());
                    });
                    row.col(|ui| {
                        ui.label(&record.station);
                    });
                    for field in Field::ALL {
                        row.col(|ui| {
                            ui.label(fmt_opt(record.value(field)));
                        });
                    }
                    row.col(|ui| {
                        ui.label(record.pm25_category.map_or("", |c| c.label()));
                    });
                });
            });
    });
}

/// Statistic name and accessor, in display order.
const SUMMARY_ROWS: [(&str, fn(&DescriptiveStats) -> Option<f64>); 8] = [
    ("count", |s| Some(s.count as f64)),
    ("mean", |s| s.mean),
    ("std", |s| s.std_dev),
    ("min", |s| s.min),
    ("25%", |s| s.q1),
    ("50%", |s| s.median),
    ("75%", |s| s.q3),
    ("max", |s| s.max),
];

/// Statistics as rows, fields as columns.
pub fn summary_table(ui: &mut Ui, summary: &[(Field, DescriptiveStats)]) {
    ui.push_id("summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(60.0))
            .columns(Column::auto().at_least(80.0), summary.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|_| {});
                for (field, _) in summary {
                    header.col(|ui| {
                        ui.strong(field.column());
                    });
                }
            })
            .body(|mut body| {
                for (name, stat) in SUMMARY_ROWS {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.strong(name);
                        });
                        for (_, stats) in summary {
                            row.col(|ui| {
                                ui.label(fmt_opt(stat(stats)));
                            });
                        }
                    });
                }
            });
    });
}
