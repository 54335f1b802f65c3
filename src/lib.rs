mod error;
mod fiscal;
mod granularity;
mod reporting_period;
mod split;
mod time_series;
mod unit_of_time;

pub use crate::error::AccountingPeriodError;
pub use crate::granularity::UnitOfTimeGranularity;
pub use crate::reporting_period::{ReportingPeriod, ReportingPeriodComponent};
pub use crate::split::{OverflowStrategy, Split};
pub use crate::time_series::{Datapoint, ReportingPeriodComparison, TimeSeries};
pub use crate::unit_of_time::{
    MonthNumber, QuarterNumber, UnitOfTime, UnitOfTimeKind, Year,
};
