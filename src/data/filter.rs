use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Selection: the (year, station) pair chosen in the side panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub year: i32,
    pub station: String,
}

impl Selection {
    pub fn new(year: i32, station: impl Into<String>) -> Self {
        Selection {
            year,
            station: station.into(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.year() == self.year && record.station == self.station
    }
}

/// Distinct years, ascending.
pub fn selectable_years(dataset: &Dataset) -> Vec<i32> {
    let years: BTreeSet<i32> = dataset.records().iter().map(Record::year).collect();
    years.into_iter().collect()
}

/// Distinct station identifiers, ascending.
pub fn selectable_stations(dataset: &Dataset) -> Vec<String> {
    let stations: BTreeSet<&str> = dataset
        .records()
        .iter()
        .map(|r| r.station.as_str())
        .collect();
    stations.into_iter().map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subset of a dataset
// ---------------------------------------------------------------------------

/// Row indices into a [`Dataset`], in dataset order.
///
/// `selection` is `None` for the unfiltered view.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    selection: Option<Selection>,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Narrow this view to `(year, station)`.
    pub fn refine(&self, year: i32, station: &str) -> FilteredView<'a> {
        let selection = Selection::new(year, station);
        let records = self.dataset.records();
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| selection.matches(&records[i]))
            .collect();
        FilteredView {
            dataset: self.dataset,
            selection: Some(selection),
            indices,
        }
    }
}

/// Two views are equal when they select the same records of value-equal
/// datasets.
impl PartialEq for FilteredView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.selection == other.selection
            && self.indices == other.indices
            && (std::ptr::eq(self.dataset, other.dataset) || self.dataset == other.dataset)
    }
}

impl Dataset {
    /// View over every record.
    pub fn full_view(&self) -> FilteredView<'_> {
        FilteredView {
            dataset: self,
            selection: None,
            indices: (0..self.len()).collect(),
        }
    }
}

/// Records with `year == year && station == station`. Empty when nothing
/// matches.
pub fn filter<'a>(dataset: &'a Dataset, year: i32, station: &str) -> FilteredView<'a> {
    dataset.full_view().refine(year, station)
}
