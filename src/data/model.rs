use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use super::category::Pm25Category;

// ---------------------------------------------------------------------------
// Field – one numeric measurement column
// ---------------------------------------------------------------------------

/// The numeric readings carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Pm25,
    Pm10,
    Temp,
    Pres,
    Dewp,
    Rain,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Pm25,
        Field::Pm10,
        Field::Temp,
        Field::Pres,
        Field::Dewp,
        Field::Rain,
    ];

    /// Pollutant concentrations, plotted as monthly averages.
    pub const POLLUTANTS: [Field; 2] = [Field::Pm25, Field::Pm10];

    /// Meteorological readings, plotted as a scatter matrix.
    pub const METEOROLOGICAL: [Field; 4] = [Field::Temp, Field::Pres, Field::Dewp, Field::Rain];

    /// Column header in the source file.
    pub fn column(self) -> &'static str {
        match self {
            Field::Pm25 => "PM2.5",
            Field::Pm10 => "PM10",
            Field::Temp => "TEMP",
            Field::Pres => "PRES",
            Field::Dewp => "DEWP",
            Field::Rain => "RAIN",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Field::Pm25 | Field::Pm10 => "µg/m³",
            Field::Temp | Field::Dewp => "°C",
            Field::Pres => "hPa",
            Field::Rain => "mm",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Every column a source file must provide.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "year", "month", "day", "station", "PM2.5", "PM10", "TEMP", "PRES", "DEWP", "RAIN",
];

// ---------------------------------------------------------------------------
// MonthPeriod – (year, month) aggregation key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Record – one station-day observation
// ---------------------------------------------------------------------------

/// A single normalized observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub station: String,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub temp: Option<f64>,
    pub pres: Option<f64>,
    pub dewp: Option<f64>,
    pub rain: Option<f64>,
    /// Derived from `pm25` at load time.
    pub pm25_category: Option<Pm25Category>,
}

impl Record {
    /// Build a record, deriving the PM2.5 category. NaN readings are
    /// stored as missing.
    pub fn new(date: NaiveDate, station: impl Into<String>, readings: [Option<f64>; 6]) -> Self {
        let [pm25, pm10, temp, pres, dewp, rain] = readings.map(|v| v.filter(|x| !x.is_nan()));
        Record {
            date,
            station: station.into(),
            pm25,
            pm10,
            temp,
            pres,
            dewp,
            rain,
            pm25_category: pm25.and_then(Pm25Category::classify),
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn month_period(&self) -> MonthPeriod {
        MonthPeriod {
            year: self.year(),
            month: self.month(),
        }
    }

    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::Pm25 => self.pm25,
            Field::Pm10 => self.pm10,
            Field::Temp => self.temp,
            Field::Pres => self.pres,
            Field::Dewp => self.dewp,
            Field::Rain => self.rain,
        }
    }

    /// Whether any of the six readings is missing.
    pub fn has_missing(&self) -> bool {
        Field::ALL.iter().any(|f| self.value(*f).is_none())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded file
// ---------------------------------------------------------------------------

/// All records of one source file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    source: PathBuf,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(source: impl Into<PathBuf>, records: Vec<Record>) -> Self {
        Dataset {
            source: source.into(),
            records,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last month with a reading, `None` for an empty dataset.
    pub fn period_span(&self) -> Option<(MonthPeriod, MonthPeriod)> {
        let mut periods = self.records.iter().map(Record::month_period);
        let first = periods.next()?;
        Some(periods.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn derives_category_and_period() {
        let r = Record::new(
            date(2016, 3, 9),
            "Aotizhongxin",
            [Some(12.0), Some(40.0), None, None, None, None],
        );
        assert_eq!(r.pm25_category, Some(Pm25Category::Moderate));
        assert_eq!(r.month_period(), MonthPeriod { year: 2016, month: 3 });
        assert_eq!(r.month_period().to_string(), "2016-03");
        assert_eq!((r.year(), r.month(), r.day()), (2016, 3, 9));
        assert!(r.has_missing());
    }

    #[test]
    fn nan_reading_is_missing() {
        let r = Record::new(
            date(2016, 3, 9),
            "Dongsi",
            [Some(f64::NAN), Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(0.0)],
        );
        assert_eq!(r.pm25, None);
        assert_eq!(r.pm25_category, None);
        assert_eq!(r.value(Field::Rain), Some(0.0));
    }

    #[test]
    fn field_columns_match_required_headers() {
        for f in Field::ALL {
            assert!(REQUIRED_COLUMNS.contains(&f.column()));
        }
    }

    #[test]
    fn period_span_ignores_row_order() {
        let readings = [None; 6];
        let ds = Dataset::new(
            "span.csv",
            vec![
                Record::new(date(2014, 6, 1), "Dongsi", readings),
                Record::new(date(2013, 3, 1), "Dongsi", readings),
                Record::new(date(2017, 2, 28), "Wanliu", readings),
                Record::new(date(2015, 12, 31), "Wanliu", readings),
            ],
        );
        let (first, last) = ds.period_span().unwrap();
        assert_eq!(first.to_string(), "2013-03");
        assert_eq!(last.to_string(), "2017-02");
        assert_eq!(Dataset::new("empty.csv", Vec::new()).period_span(), None);
    }
}
