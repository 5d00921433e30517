use std::collections::BTreeMap;
use std::f64::consts::TAU;

use eframe::egui::{Color32, Grid, Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, Polygon};
use enviro_insights::data::stats::{MonthlyAverages, ScatterMatrix};
use enviro_insights::{Field, Pm25Category};

use crate::color::{category_color, FieldColors};

// ---------------------------------------------------------------------------
// Monthly averages (line chart)
// ---------------------------------------------------------------------------

/// `[month, mean]` points of one field, months ascending.
pub fn monthly_series(monthly: &MonthlyAverages, field: Field) -> Vec<[f64; 2]> {
    monthly
        .iter()
        .filter_map(|(month, means)| Some([*month as f64, *means.get(&field)?]))
        .collect()
}

pub fn monthly_chart(ui: &mut Ui, monthly: &MonthlyAverages, colors: &FieldColors) {
    ui.strong("Monthly Average PM2.5 and PM10");
    Plot::new("monthly_average")
        .legend(Legend::default())
        .x_axis_label("Month")
        .y_axis_label("Concentration (µg/m³)")
        .include_x(1.0)
        .include_x(12.0)
        .include_y(0.0)
        .height(260.0)
        .show(ui, |plot_ui| {
            for field in Field::POLLUTANTS {
                let points: PlotPoints = monthly_series(monthly, field).into_iter().collect();
                plot_ui.line(
                    Line::new(points)
                        .name(field.column())
                        .color(colors.color_for(field))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Category distribution (pie chart)
// ---------------------------------------------------------------------------

/// Arc segments per full turn.
const PIE_RESOLUTION: usize = 96;

/// Outline of each pie slice on the unit circle, starting at 12 o'clock and
/// running clockwise. Empty categories get no slice.
pub fn pie_slices(counts: &BTreeMap<Pm25Category, usize>) -> Vec<(Pm25Category, f64, Vec<[f64; 2]>)> {
    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }
    let mut start = 0.0;
    counts
        .iter()
        .filter(|(_, n)| **n > 0)
        .map(|(category, n)| {
            let share = *n as f64 / total as f64;
            let sweep = share * TAU;
            let steps = ((share * PIE_RESOLUTION as f64).ceil() as usize).max(1);
            let mut outline = Vec::with_capacity(steps + 2);
            if share < 1.0 {
                outline.push([0.0, 0.0]);
            }
            for k in 0..=steps {
                let angle = start + sweep * k as f64 / steps as f64;
                outline.push([angle.sin(), angle.cos()]);
            }
            start += sweep;
            (*category, share, outline)
        })
        .collect()
}

pub fn category_pie(ui: &mut Ui, counts: &BTreeMap<Pm25Category, usize>) {
    ui.strong("PM2.5 Air Quality Categories");
    if counts.is_empty() {
        ui.label("No PM2.5 readings for this selection.");
        return;
    }
    Plot::new("category_pie")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .height(260.0)
        .show(ui, |plot_ui| {
            for (category, share, outline) in pie_slices(counts) {
                let color = category_color(category);
                let points: PlotPoints = outline.into_iter().collect();
                plot_ui.polygon(
                    Polygon::new(points)
                        .name(format!("{category} ({:.1}%)", share * 100.0))
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Meteorological scatter matrix
// ---------------------------------------------------------------------------

pub fn scatter_grid(ui: &mut Ui, matrix: &ScatterMatrix, colors: &FieldColors) {
    ui.strong("Correlations Between Meteorological Conditions");
    let n = matrix.fields.len();
    let cell = ((ui.available_width() - 16.0 * n as f32) / n.max(1) as f32).clamp(80.0, 220.0);

    Grid::new("scatter_grid")
        .spacing([8.0, 8.0])
        .show(ui, |ui: &mut Ui| {
            for (i, y_field) in matrix.fields.iter().enumerate() {
                for (j, x_field) in matrix.fields.iter().enumerate() {
                    ui.vertical(|ui: &mut Ui| {
                        if i == j {
                            ui.label(y_field.to_string());
                        } else {
                            let r = matrix
                                .pearson(j, i)
                                .map_or_else(|| "r = n/a".to_string(), |r| format!("r = {r:.2}"));
                            ui.label(format!("{x_field} vs {y_field}  {r}"));
                        }
                        let points: PlotPoints = matrix.pairs(j, i).into_iter().collect();
                        Plot::new(("scatter", i, j))
                            .width(cell)
                            .height(cell)
                            .show_axes(i == n - 1 || j == 0)
                            .allow_drag(false)
                            .allow_scroll(false)
                            .show(ui, |plot_ui| {
                                plot_ui.points(
                                    Points::new(points)
                                        .radius(1.5)
                                        .color(colors.color_for(*x_field)),
                                );
                            });
                    });
                }
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_skips_months_without_field() {
        let mut monthly = MonthlyAverages::new();
        monthly.insert(1, BTreeMap::from([(Field::Pm25, 10.0), (Field::Pm10, 20.0)]));
        monthly.insert(3, BTreeMap::from([(Field::Pm10, 5.0)]));
        assert_eq!(monthly_series(&monthly, Field::Pm25), vec![[1.0, 10.0]]);
        assert_eq!(monthly_series(&monthly, Field::Pm10), vec![[1.0, 20.0], [3.0, 5.0]]);
    }

    #[test]
    fn slices_share_the_full_circle() {
        let counts = BTreeMap::from([
            (Pm25Category::Good, 1),
            (Pm25Category::Moderate, 3),
        ]);
        let slices = pie_slices(&counts);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].1, 0.25);
        assert_eq!(slices[1].1, 0.75);
        // first slice starts at 12 o'clock
        assert_eq!(slices[0].2[1], [0.0, 1.0]);
        // last slice closes the circle
        let last = slices[1].2.last().unwrap();
        assert!(last[0].abs() < 1e-9 && (last[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_category_is_a_full_disc() {
        let counts = BTreeMap::from([(Pm25Category::Unhealthy, 4)]);
        let slices = pie_slices(&counts);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].1, 1.0);
        assert_ne!(slices[0].2[0], [0.0, 0.0]);
        assert!(pie_slices(&BTreeMap::new()).is_empty());
    }
}
