//! Reducers over a [`FilteredView`]. One function per chart or panel.

use std::collections::BTreeMap;

use super::category::Pm25Category;
use super::filter::FilteredView;
use super::model::Field;

// ---------------------------------------------------------------------------
// Monthly averages (line chart)
// ---------------------------------------------------------------------------

/// Calendar month (1-12) → per-field mean.
pub type MonthlyAverages = BTreeMap<u32, BTreeMap<Field, f64>>;

/// Mean of each field per calendar month. Missing readings are skipped;
/// months and fields without any reading are left out.
pub fn monthly_average(view: &FilteredView<'_>, fields: &[Field]) -> MonthlyAverages {
    // month → field → (sum, count)
    let mut sums: BTreeMap<u32, BTreeMap<Field, (f64, usize)>> = BTreeMap::new();
    for record in view.iter() {
        for &field in fields {
            if let Some(v) = record.value(field) {
                let slot = sums
                    .entry(record.month())
                    .or_default()
                    .entry(field)
                    .or_insert((0.0, 0));
                slot.0 += v;
                slot.1 += 1;
            }
        }
    }
    sums.into_iter()
        .map(|(month, per_field)| {
            let means = per_field
                .into_iter()
                .map(|(field, (sum, n))| (field, sum / n as f64))
                .collect();
            (month, means)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category distribution (pie chart)
// ---------------------------------------------------------------------------

pub fn category_distribution(view: &FilteredView<'_>) -> BTreeMap<Pm25Category, usize> {
    let mut counts = BTreeMap::new();
    for category in view.iter().filter_map(|r| r.pm25_category) {
        *counts.entry(category).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Scatter matrix (pairwise correlation grid)
// ---------------------------------------------------------------------------

/// Raw readings of several fields, one column per field, row-aligned with
/// the view they came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScatterMatrix {
    pub fields: Vec<Field>,
    pub columns: Vec<Vec<Option<f64>>>,
}

impl ScatterMatrix {
    /// `[x, y]` points where both field `i` and field `j` are present.
    pub fn pairs(&self, i: usize, j: usize) -> Vec<[f64; 2]> {
        let (Some(xs), Some(ys)) = (self.columns.get(i), self.columns.get(j)) else {
            return Vec::new();
        };
        xs.iter()
            .zip(ys)
            .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
            .collect()
    }

    /// Pearson correlation of fields `i` and `j` over their complete pairs.
    pub fn pearson(&self, i: usize, j: usize) -> Option<f64> {
        let pairs = self.pairs(i, j);
        if pairs.len() < 2 {
            return None;
        }
        let n = pairs.len() as f64;
        let mean_x = pairs.iter().map(|p| p[0]).sum::<f64>() / n;
        let mean_y = pairs.iter().map(|p| p[1]).sum::<f64>() / n;
        let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
        for [x, y] in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        let denom = (var_x * var_y).sqrt();
        if denom == 0.0 {
            None
        } else {
            Some(cov / denom)
        }
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

pub fn correlation_matrix(view: &FilteredView<'_>, fields: &[Field]) -> ScatterMatrix {
    let columns = fields
        .iter()
        .map(|&field| view.iter().map(|r| r.value(field)).collect())
        .collect();
    ScatterMatrix {
        fields: fields.to_vec(),
        columns,
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics (summary panel)
// ---------------------------------------------------------------------------

/// Summary of one field. `None` means "not available".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DescriptiveStats {
    /// Number of non-missing values.
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Unbiased (n - 1) sample standard deviation; needs two values.
    pub std_dev: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
}

pub fn descriptive_stats(view: &FilteredView<'_>, field: Field) -> DescriptiveStats {
    let mut values: Vec<f64> = view.iter().filter_map(|r| r.value(field)).collect();
    summarize(&mut values)
}

/// One [`DescriptiveStats`] row per field, in the order given.
pub fn describe(view: &FilteredView<'_>, fields: &[Field]) -> Vec<(Field, DescriptiveStats)> {
    fields
        .iter()
        .map(|&field| (field, descriptive_stats(view, field)))
        .collect()
}

fn summarize(values: &mut [f64]) -> DescriptiveStats {
    let count = values.len();
    if count == 0 {
        return DescriptiveStats::default();
    }
    values.sort_by(f64::total_cmp);

    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std_dev = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    });

    DescriptiveStats {
        count,
        min: values.first().copied(),
        max: values.last().copied(),
        mean: Some(mean),
        median: Some(quantile(values, 0.5)),
        std_dev,
        q1: Some(quantile(values, 0.25)),
        q3: Some(quantile(values, 0.75)),
    }
}

/// Linearly interpolated quantile of sorted, non-empty `values`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter;
    use crate::data::model::{Dataset, Record};
    use chrono::NaiveDate;

    fn rec(m: u32, d: u32, pm25: Option<f64>, pm10: Option<f64>) -> Record {
        Record::new(
            NaiveDate::from_ymd_opt(2017, m, d).unwrap(),
            "Gucheng",
            [pm25, pm10, Some(m as f64), Some(1000.0 + d as f64), None, Some(0.0)],
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn monthly_mean_skips_missing_values() {
        let ds = Dataset::new(
            "m.csv",
            vec![
                rec(1, 1, Some(10.0), Some(1.0)),
                rec(1, 2, None, Some(2.0)),
                rec(1, 3, Some(30.0), None),
                rec(2, 1, Some(5.0), None),
            ],
        );
        let view = filter(&ds, 2017, "Gucheng");
        let avg = monthly_average(&view, &[Field::Pm25, Field::Pm10]);
        assert!(close(avg[&1][&Field::Pm25], 20.0));
        assert!(close(avg[&1][&Field::Pm10], 1.5));
        assert!(close(avg[&2][&Field::Pm25], 5.0));
        assert!(!avg[&2].contains_key(&Field::Pm10));
        assert!(!avg.contains_key(&3));
    }

    #[test]
    fn month_without_values_is_absent() {
        let ds = Dataset::new("m.csv", vec![rec(4, 1, None, None)]);
        let view = filter(&ds, 2017, "Gucheng");
        assert!(monthly_average(&view, &Field::POLLUTANTS).is_empty());
    }

    #[test]
    fn distribution_counts_only_categorised_records() {
        let ds = Dataset::new(
            "c.csv",
            vec![
                rec(1, 1, Some(3.0), None),
                rec(1, 2, Some(12.0), None),
                rec(1, 3, Some(20.0), None),
                rec(1, 4, None, None),
                rec(1, 5, Some(200.0), None),
            ],
        );
        let view = filter(&ds, 2017, "Gucheng");
        let dist = category_distribution(&view);
        assert_eq!(dist[&Pm25Category::Good], 1);
        assert_eq!(dist[&Pm25Category::Moderate], 2);
        assert_eq!(dist[&Pm25Category::VeryUnhealthy], 1);
        assert!(!dist.contains_key(&Pm25Category::Unhealthy));
        let with_pm25 = view.iter().filter(|r| r.pm25.is_some()).count();
        assert_eq!(dist.values().sum::<usize>(), with_pm25);
    }

    #[test]
    fn stats_of_known_values() {
        let ds = Dataset::new(
            "s.csv",
            vec![
                rec(1, 1, Some(2.0), None),
                rec(1, 2, Some(4.0), None),
                rec(1, 3, Some(4.0), None),
                rec(1, 4, Some(4.0), None),
                rec(1, 5, Some(5.0), None),
                rec(1, 6, Some(5.0), None),
                rec(1, 7, Some(7.0), None),
                rec(1, 8, Some(9.0), None),
                rec(1, 9, None, None),
            ],
        );
        let view = filter(&ds, 2017, "Gucheng");
        let s = descriptive_stats(&view, Field::Pm25);
        assert_eq!(s.count, 8);
        assert_eq!(s.min, Some(2.0));
        assert_eq!(s.max, Some(9.0));
        assert!(close(s.mean.unwrap(), 5.0));
        assert!(close(s.median.unwrap(), 4.5));
        // sum of squared deviations is 32, n - 1 = 7
        assert!(close(s.std_dev.unwrap(), (32.0f64 / 7.0).sqrt()));
        assert!(close(s.q1.unwrap(), 4.0));
        assert!(close(s.q3.unwrap(), 5.5));
    }

    #[test]
    fn stats_without_values_are_not_available() {
        let ds = Dataset::new("e.csv", vec![rec(1, 1, None, None)]);
        let view = filter(&ds, 2017, "Gucheng");
        let s = descriptive_stats(&view, Field::Pm25);
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, None);
        assert_eq!(s.median, None);
        assert_eq!(s.std_dev, None);
        assert_eq!(s.min, None);

        let empty = filter(&ds, 1990, "Gucheng");
        assert_eq!(descriptive_stats(&empty, Field::Pm10), DescriptiveStats::default());
    }

    #[test]
    fn single_value_has_no_std_dev() {
        let ds = Dataset::new("one.csv", vec![rec(1, 1, Some(8.0), None)]);
        let view = filter(&ds, 2017, "Gucheng");
        let s = descriptive_stats(&view, Field::Pm25);
        assert_eq!(s.mean, Some(8.0));
        assert_eq!(s.median, Some(8.0));
        assert_eq!(s.std_dev, None);
    }

    #[test]
    fn scatter_matrix_passes_raw_values_through() {
        let ds = Dataset::new(
            "x.csv",
            vec![
                rec(1, 1, None, None),
                rec(2, 2, None, None),
                rec(3, 3, None, None),
            ],
        );
        let view = filter(&ds, 2017, "Gucheng");
        let m = correlation_matrix(&view, &Field::METEOROLOGICAL);
        assert_eq!(m.fields, Field::METEOROLOGICAL.to_vec());
        assert_eq!(m.rows(), 3);
        assert_eq!(m.columns[0], vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(m.columns[2], vec![None, None, None]);
        assert!(m.pairs(0, 2).is_empty());
        assert_eq!(m.pairs(0, 1), vec![[1.0, 1001.0], [2.0, 1002.0], [3.0, 1003.0]]);
        assert!(close(m.pearson(0, 1).unwrap(), 1.0));
        // RAIN is constant
        assert_eq!(m.pearson(0, 3), None);
    }

    #[test]
    fn describe_keeps_field_order() {
        let ds = Dataset::new("d.csv", vec![rec(1, 1, Some(1.0), Some(2.0))]);
        let view = filter(&ds, 2017, "Gucheng");
        let rows = describe(&view, &Field::ALL);
        let fields: Vec<Field> = rows.iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, Field::ALL.to_vec());
        assert_eq!(rows[1].1.mean, Some(2.0));
    }
}
