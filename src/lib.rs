//! Environmental sensor dashboard: the data layer is a plain library,
//! the egui front end lives in the `enviro-insights` binary.

pub mod config;
pub mod data;

pub use data::cache::DatasetCache;
pub use data::category::Pm25Category;
pub use data::error::DataError;
pub use data::filter::{filter, selectable_stations, selectable_years, FilteredView, Selection};
pub use data::loader::load_file;
pub use data::model::{Dataset, Field, MonthPeriod, Record};
