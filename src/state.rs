use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use enviro_insights::data::stats::{
    category_distribution, correlation_matrix, describe, descriptive_stats, monthly_average,
    DescriptiveStats, MonthlyAverages, ScatterMatrix,
};
use enviro_insights::{
    filter, selectable_stations, selectable_years, Dataset, DatasetCache, Field, Pm25Category,
    Selection,
};

// ---------------------------------------------------------------------------
// Derived, immutable snapshots
// ---------------------------------------------------------------------------

/// Everything the panels draw for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub selection: Selection,
    /// Dataset rows in the filtered view.
    pub rows: Vec<usize>,
    pub monthly: MonthlyAverages,
    pub categories: BTreeMap<Pm25Category, usize>,
    pub scatter: ScatterMatrix,
    pub summary: Vec<(Field, DescriptiveStats)>,
}

impl Insights {
    pub fn compute(dataset: &Dataset, selection: &Selection) -> Self {
        let view = filter(dataset, selection.year, &selection.station);
        Insights {
            selection: selection.clone(),
            monthly: monthly_average(&view, &Field::POLLUTANTS),
            categories: category_distribution(&view),
            scatter: correlation_matrix(&view, &Field::METEOROLOGICAL),
            summary: describe(&view, &Field::ALL),
            rows: view.into_indices(),
        }
    }
}

/// Whole-dataset pollutant figures, independent of the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetFacts {
    pub pm25: DescriptiveStats,
    pub pm10: DescriptiveStats,
}

impl DatasetFacts {
    pub fn compute(dataset: &Dataset) -> Self {
        let all = dataset.full_view();
        DatasetFacts {
            pm25: descriptive_stats(&all, Field::Pm25),
            pm10: descriptive_stats(&all, Field::Pm10),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Year(i32),
    Station(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoTab {
    #[default]
    About,
    DatasetFacts,
    StatisticalInsights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Meteorological,
    DataTable,
    Summary,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub cache: DatasetCache,

    /// Path of the dataset currently shown (or last attempted).
    pub data_path: Option<PathBuf>,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Arc<Dataset>>,

    /// Selection lists, sorted ascending.
    pub years: Vec<i32>,
    pub stations: Vec<String>,

    pub facts: Option<DatasetFacts>,

    /// Snapshot for the current selection.
    pub insights: Option<Insights>,

    /// Number of filter + aggregate passes run so far.
    pub recomputations: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub info_tab: InfoTab,
    pub detail_tab: DetailTab,
}

impl AppState {
    pub fn selection(&self) -> Option<&Selection> {
        self.insights.as_ref().map(|i| &i.selection)
    }

    /// Load `path` through the cache and show it. On failure the previous
    /// dataset stays on screen.
    pub fn open(&mut self, path: &Path) {
        self.data_path = Some(path.to_path_buf());
        match self.cache.get(path) {
            Ok(dataset) => {
                // Only the open file stays cached.
                if let Some(previous) = self.dataset.as_ref().map(|d| d.source().to_path_buf()) {
                    if previous != path {
                        self.cache.invalidate(&previous);
                    }
                }
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current file if it changed on disk.
    pub fn reload(&mut self) {
        let Some(path) = self.data_path.clone() else {
            return;
        };
        if self.dataset.is_some() && self.cache.contains_fresh(&path) {
            log::debug!("{} is unchanged", path.display());
            return;
        }
        self.open(&path);
    }

    /// Ingest a dataset: rebuild selection lists, keep the previous
    /// selection when still available, otherwise pick the first year and
    /// station.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.years = selectable_years(&dataset);
        self.stations = selectable_stations(&dataset);
        self.facts = Some(DatasetFacts::compute(&dataset));

        let previous = self.selection().cloned();
        let selection = previous
            .filter(|s| self.years.contains(&s.year) && self.stations.contains(&s.station))
            .or_else(|| {
                let year = *self.years.first()?;
                let station = self.stations.first()?.clone();
                Some(Selection::new(year, station))
            });

        self.dataset = Some(dataset);
        self.status_message = None;
        self.insights = None;
        if let Some(selection) = selection {
            self.recompute(selection);
        }
    }

    /// Apply a selection change. Recomputes only when the selection
    /// actually changed.
    pub fn apply(&mut self, event: SelectionEvent) {
        let Some(current) = self.selection().cloned() else {
            return;
        };
        let next = match event {
            SelectionEvent::Year(year) => Selection {
                year,
                ..current.clone()
            },
            SelectionEvent::Station(station) => Selection {
                station,
                ..current.clone()
            },
        };
        if next != current {
            self.recompute(next);
        }
    }

    fn recompute(&mut self, selection: Selection) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let insights = Insights::compute(dataset, &selection);
        log::debug!(
            "{} / {}: {} rows",
            selection.station,
            selection.year,
            insights.rows.len()
        );
        self.insights = Some(insights);
        self.recomputations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use enviro_insights::Record;

    fn dataset() -> Arc<Dataset> {
        let mut records = Vec::new();
        for (station, base) in [("Shunyi", 10.0), ("Changping", 100.0)] {
            for year in [2015, 2016] {
                for day in 1..=3 {
                    records.push(Record::new(
                        NaiveDate::from_ymd_opt(year, 1, day).unwrap(),
                        station,
                        [Some(base + day as f64), None, Some(1.0), None, None, None],
                    ));
                }
            }
        }
        Arc::new(Dataset::new("state.csv", records))
    }

    #[test]
    fn set_dataset_selects_first_year_and_station() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.years, vec![2015, 2016]);
        assert_eq!(state.stations, vec!["Changping", "Shunyi"]);
        assert_eq!(state.selection(), Some(&Selection::new(2015, "Changping")));
        assert_eq!(state.recomputations, 1);
        let insights = state.insights.as_ref().unwrap();
        assert_eq!(insights.rows.len(), 3);
        assert_eq!(insights.categories[&Pm25Category::Unhealthy], 3);
    }

    #[test]
    fn each_change_recomputes_once() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.apply(SelectionEvent::Station("Shunyi".into()));
        assert_eq!(state.recomputations, 2);
        assert_eq!(state.selection(), Some(&Selection::new(2015, "Shunyi")));

        state.apply(SelectionEvent::Year(2016));
        assert_eq!(state.recomputations, 3);
        let insights = state.insights.as_ref().unwrap();
        assert_eq!(insights.rows, vec![3, 4, 5]);
        assert_eq!(insights.monthly[&1][&Field::Pm25], 12.0);

        // same value again: no pass
        state.apply(SelectionEvent::Year(2016));
        assert_eq!(state.recomputations, 3);
    }

    #[test]
    fn unknown_selection_gives_empty_insights() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.apply(SelectionEvent::Year(1999));
        let insights = state.insights.as_ref().unwrap();
        assert!(insights.rows.is_empty());
        assert!(insights.monthly.is_empty());
        assert!(insights.categories.is_empty());
        assert!(insights.summary.iter().all(|(_, s)| s.mean.is_none()));
    }

    #[test]
    fn facts_cover_whole_dataset() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        let facts = state.facts.as_ref().unwrap();
        assert_eq!(facts.pm25.max, Some(103.0));
        assert_eq!(facts.pm25.min, Some(11.0));
        assert_eq!(facts.pm10.count, 0);
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.open(Path::new("/nonexistent/enviro-insights.csv"));
        assert!(state.dataset.is_some());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }

    #[test]
    fn opening_another_file_evicts_the_previous_one() {
        let header = "year,month,day,station,PM2.5,PM10,TEMP,PRES,DEWP,RAIN\n";
        let write = |name: &str, station: &str| {
            let path = std::env::temp_dir().join(format!(
                "enviro-insights-state-{}-{name}.csv",
                std::process::id()
            ));
            std::fs::write(&path, format!("{header}2014,5,1,{station},20,30,18,1010,5,0\n"))
                .unwrap();
            path
        };
        let first = write("first", "Dongsi");
        let second = write("second", "Wanliu");

        let mut state = AppState::default();
        state.open(&first);
        assert!(state.cache.contains_fresh(&first));
        state.open(&second);
        assert_eq!(state.stations, vec!["Wanliu"]);
        assert_eq!(state.cache.len(), 1);
        assert!(!state.cache.contains_fresh(&first));
        assert!(state.cache.contains_fresh(&second));

        std::fs::remove_file(first).ok();
        std::fs::remove_file(second).ok();
    }
}
