//! Shared domain types.

mod types;

pub use types::{
    AnalysisConfig, ArimaOrder, CombinedDataset, DatasetRow, ForecastResult, PricePoint,
    PriceTable, SelectedSeries, StationarityResult, DEFAULT_ORDER, FORECAST_STEPS,
};
