use thiserror::Error;
use time::Month;

use crate::UnitOfTimeGranularity;

/// All the ways the period algebra can reject an input.
///
/// Every failure is deterministic in the input: there is nothing transient to
/// retry and no partial state to roll back, since all types in this crate are
/// immutable values.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccountingPeriodError {
    #[error("an unbounded granularity was passed where a bounded granularity is required")]
    InvalidGranularity,

    #[error("cannot apply {units} units to a {component} component; the adjustment granularity must be the same as or coarser than the component's")]
    GranularityMismatch {
        component: UnitOfTimeGranularity,
        units: UnitOfTimeGranularity,
    },

    #[error("cannot adjust an unbounded unit of time")]
    IllegalAdjustment,

    #[error("the period would have its start after its end")]
    InvalidPeriodOrdering,

    #[error("operation requires a fully bounded reporting period")]
    UnboundedPeriod,

    #[error("day granularity is only defined for calendar units")]
    UnsupportedGranularityForKind,

    #[error("the period does not align to the target granularity's boundaries")]
    SplitOverflow,

    #[error("at least one reporting period is required")]
    EmptyInput,

    #[error("the reporting periods are not all of the same kind")]
    MixedKind,

    #[error("argument is outside its valid range")]
    InvalidArgument,

    #[error("no granularity is finer than a day")]
    NoFinerGranularity,

    #[error("no granularity is coarser than unbounded")]
    NoCoarserGranularity,

    #[error("year {0} is outside the supported range 1..=9999")]
    YearOutOfRange(i32),

    #[error("day {day} does not exist in {month:?} {year}")]
    DayOutOfRange { year: i32, month: Month, day: u8 },

    #[error("operation creates a date out of range")]
    DateOutOfRange,
}
