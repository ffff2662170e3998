#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Climate and research content for Data Farm: canned regional datasets,
//! satellite map layers, a seeded seven-day weather forecast and the research
//! lab's experiment catalogue.

mod forecast;
mod regions;
mod research;

pub use forecast::{
    generate_forecast, Advice, Condition, ForecastDay, Risk, TemperatureRange, FORECAST_DAYS,
};
pub use regions::{find_region, Band, MapLayer, Region, REGIONS};
pub use research::{
    experiments_in, find_experiment, Experiment, ExperimentCategory, EXPERIMENTS,
};
