use core::fmt;
use std::cmp;

use time::{
    util::days_in_year_month,
    Date, Month,
};

use crate::reporting_period::ReportingPeriod;
use crate::{AccountingPeriodError, UnitOfTimeGranularity};

/// The calendar system a unit of time belongs to.
///
/// Calendar units align to the Gregorian calendar and are the only kind with
/// a day granularity, because only calendar months have a well defined day
/// count. Fiscal units belong to a fiscal year that is pinned to the calendar
/// by an anchor quarter (see the conversions in the `fiscal` module); the
/// anchor is supplied at conversion time and is not stored on the unit.
/// Generic units are abstract month/quarter/year buckets with no calendar
/// meaning at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitOfTimeKind {
    Calendar,
    Fiscal,
    Generic,
}

impl fmt::Display for UnitOfTimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnitOfTimeKind::Calendar => "calendar",
            UnitOfTimeKind::Fiscal => "fiscal",
            UnitOfTimeKind::Generic => "generic",
        };
        f.write_str(text)
    }
}

/// A year number, restricted to 1..=9999 so that every arithmetic result in
/// this crate stays inside the range `time::Date` can represent. The field is
/// private: [`Year::new`] is the only way in, so an out of range year is not
/// constructible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(i32);

impl Year {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 9999;

    pub fn new(year: i32) -> Result<Self, AccountingPeriodError> {
        if !(Self::MIN..=Self::MAX).contains(&year) {
            return Err(AccountingPeriodError::YearOutOfRange(year));
        }
        Ok(Self(year))
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Year {
    type Error = AccountingPeriodError;

    fn try_from(year: i32) -> Result<Self, Self::Error> {
        Self::new(year)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four quarters of a (calendar or fiscal or generic) year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum QuarterNumber {
    Q1 = 1,
    Q2 = 2,
    Q3 = 3,
    Q4 = 4,
}

impl QuarterNumber {
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// English ordinal text for the quarter: Q1 is "1st" through Q4 "4th"
    pub const fn ordinal_indicator(self) -> &'static str {
        match self {
            QuarterNumber::Q1 => "1st",
            QuarterNumber::Q2 => "2nd",
            QuarterNumber::Q3 => "3rd",
            QuarterNumber::Q4 => "4th",
        }
    }

    /// First calendar month of the quarter
    pub(crate) const fn first_month(self) -> Month {
        match self {
            QuarterNumber::Q1 => Month::January,
            QuarterNumber::Q2 => Month::April,
            QuarterNumber::Q3 => Month::July,
            QuarterNumber::Q4 => Month::October,
        }
    }

    /// Last calendar month of the quarter
    pub(crate) const fn last_month(self) -> Month {
        match self {
            QuarterNumber::Q1 => Month::March,
            QuarterNumber::Q2 => Month::June,
            QuarterNumber::Q3 => Month::September,
            QuarterNumber::Q4 => Month::December,
        }
    }

    /// The quarter a month (1..=12) falls in
    pub(crate) const fn of_month(month: u8) -> Self {
        match (month - 1) / 3 {
            0 => QuarterNumber::Q1,
            1 => QuarterNumber::Q2,
            2 => QuarterNumber::Q3,
            _ => QuarterNumber::Q4,
        }
    }
}

impl TryFrom<u8> for QuarterNumber {
    type Error = AccountingPeriodError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(QuarterNumber::Q1),
            2 => Ok(QuarterNumber::Q2),
            3 => Ok(QuarterNumber::Q3),
            4 => Ok(QuarterNumber::Q4),
            _ => Err(AccountingPeriodError::InvalidArgument),
        }
    }
}

impl fmt::Display for QuarterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// A month position (1..=12) inside a fiscal or generic year.
///
/// Fiscal and generic months are plain positions, not calendar months: month
/// one of a fiscal year is whichever calendar month the fiscal year happens
/// to start in. Mirrors the shape of [`time::Month`], which plays this role
/// for calendar units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MonthNumber {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Eleven = 11,
    Twelve = 12,
}

impl MonthNumber {
    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MonthNumber {
    type Error = AccountingPeriodError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MonthNumber::One),
            2 => Ok(MonthNumber::Two),
            3 => Ok(MonthNumber::Three),
            4 => Ok(MonthNumber::Four),
            5 => Ok(MonthNumber::Five),
            6 => Ok(MonthNumber::Six),
            7 => Ok(MonthNumber::Seven),
            8 => Ok(MonthNumber::Eight),
            9 => Ok(MonthNumber::Nine),
            10 => Ok(MonthNumber::Ten),
            11 => Ok(MonthNumber::Eleven),
            12 => Ok(MonthNumber::Twelve),
            _ => Err(AccountingPeriodError::InvalidArgument),
        }
    }
}

/// # UnitOfTime
///
/// A single tagged unit of accounting time: one variant per (kind,
/// granularity) pair that actually exists. A calendar day holds a validated
/// [`time::Date`]; every other variant holds a [`Year`] plus a month or
/// quarter position. Because each payload type can only hold valid values,
/// a `UnitOfTime` is calendar-valid by construction: there is no Feb 30, no
/// month 13 and no year zero, however the value was put together.
///
/// Units are ordered chronologically within their kind (see the
/// `PartialOrd` impl); units of different kinds do not compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitOfTime {
    CalendarDay(Date),
    CalendarMonth { year: Year, month_of_year: Month },
    CalendarQuarter { year: Year, quarter: QuarterNumber },
    CalendarYear { year: Year },
    CalendarUnbounded,
    FiscalMonth { year: Year, month_number: MonthNumber },
    FiscalQuarter { year: Year, quarter: QuarterNumber },
    FiscalYear { year: Year },
    FiscalUnbounded,
    GenericMonth { year: Year, month_number: MonthNumber },
    GenericQuarter { year: Year, quarter: QuarterNumber },
    GenericYear { year: Year },
    GenericUnbounded,
}

impl UnitOfTime {
    // region: constructors
    /// Create a calendar day, validating the day against the month and
    /// (leap) year it falls in
    pub fn calendar_day(year: i32, month: Month, day: u8) -> Result<Self, AccountingPeriodError> {
        let year = Year::new(year)?;
        let date = Date::from_calendar_date(year.get(), month, day).map_err(|_| {
            AccountingPeriodError::DayOutOfRange {
                year: year.get(),
                month,
                day,
            }
        })?;
        Ok(Self::CalendarDay(date))
    }

    pub fn calendar_month(year: i32, month_of_year: Month) -> Result<Self, AccountingPeriodError> {
        Ok(Self::CalendarMonth {
            year: Year::new(year)?,
            month_of_year,
        })
    }

    pub fn calendar_quarter(year: i32, quarter: QuarterNumber) -> Result<Self, AccountingPeriodError> {
        Ok(Self::CalendarQuarter {
            year: Year::new(year)?,
            quarter,
        })
    }

    pub fn calendar_year(year: i32) -> Result<Self, AccountingPeriodError> {
        Ok(Self::CalendarYear {
            year: Year::new(year)?,
        })
    }

    pub const fn calendar_unbounded() -> Self {
        Self::CalendarUnbounded
    }

    pub fn fiscal_month(year: i32, month_number: MonthNumber) -> Result<Self, AccountingPeriodError> {
        Ok(Self::FiscalMonth {
            year: Year::new(year)?,
            month_number,
        })
    }

    pub fn fiscal_quarter(year: i32, quarter: QuarterNumber) -> Result<Self, AccountingPeriodError> {
        Ok(Self::FiscalQuarter {
            year: Year::new(year)?,
            quarter,
        })
    }

    pub fn fiscal_year(year: i32) -> Result<Self, AccountingPeriodError> {
        Ok(Self::FiscalYear {
            year: Year::new(year)?,
        })
    }

    pub const fn fiscal_unbounded() -> Self {
        Self::FiscalUnbounded
    }

    pub fn generic_month(year: i32, month_number: MonthNumber) -> Result<Self, AccountingPeriodError> {
        Ok(Self::GenericMonth {
            year: Year::new(year)?,
            month_number,
        })
    }

    pub fn generic_quarter(year: i32, quarter: QuarterNumber) -> Result<Self, AccountingPeriodError> {
        Ok(Self::GenericQuarter {
            year: Year::new(year)?,
            quarter,
        })
    }

    pub fn generic_year(year: i32) -> Result<Self, AccountingPeriodError> {
        Ok(Self::GenericYear {
            year: Year::new(year)?,
        })
    }

    pub const fn generic_unbounded() -> Self {
        Self::GenericUnbounded
    }
    // endregion constructors

    // region: getters
    pub fn kind(&self) -> UnitOfTimeKind {
        match self {
            Self::CalendarDay(_)
            | Self::CalendarMonth { .. }
            | Self::CalendarQuarter { .. }
            | Self::CalendarYear { .. }
            | Self::CalendarUnbounded => UnitOfTimeKind::Calendar,
            Self::FiscalMonth { .. }
            | Self::FiscalQuarter { .. }
            | Self::FiscalYear { .. }
            | Self::FiscalUnbounded => UnitOfTimeKind::Fiscal,
            Self::GenericMonth { .. }
            | Self::GenericQuarter { .. }
            | Self::GenericYear { .. }
            | Self::GenericUnbounded => UnitOfTimeKind::Generic,
        }
    }

    pub fn granularity(&self) -> UnitOfTimeGranularity {
        match self {
            Self::CalendarDay(_) => UnitOfTimeGranularity::Day,
            Self::CalendarMonth { .. } | Self::FiscalMonth { .. } | Self::GenericMonth { .. } => {
                UnitOfTimeGranularity::Month
            }
            Self::CalendarQuarter { .. }
            | Self::FiscalQuarter { .. }
            | Self::GenericQuarter { .. } => UnitOfTimeGranularity::Quarter,
            Self::CalendarYear { .. } | Self::FiscalYear { .. } | Self::GenericYear { .. } => {
                UnitOfTimeGranularity::Year
            }
            Self::CalendarUnbounded | Self::FiscalUnbounded | Self::GenericUnbounded => {
                UnitOfTimeGranularity::Unbounded
            }
        }
    }

    pub fn year(&self) -> Option<Year> {
        match *self {
            // The constructor already vetted the date's year
            Self::CalendarDay(d) => Year::new(d.year()).ok(),
            Self::CalendarMonth { year, .. }
            | Self::CalendarQuarter { year, .. }
            | Self::CalendarYear { year }
            | Self::FiscalMonth { year, .. }
            | Self::FiscalQuarter { year, .. }
            | Self::FiscalYear { year }
            | Self::GenericMonth { year, .. }
            | Self::GenericQuarter { year, .. }
            | Self::GenericYear { year } => Some(year),
            Self::CalendarUnbounded | Self::FiscalUnbounded | Self::GenericUnbounded => None,
        }
    }

    pub fn quarter(&self) -> Option<QuarterNumber> {
        match *self {
            Self::CalendarQuarter { quarter, .. }
            | Self::FiscalQuarter { quarter, .. }
            | Self::GenericQuarter { quarter, .. } => Some(quarter),
            _ => None,
        }
    }

    pub fn month_of_year(&self) -> Option<Month> {
        match *self {
            Self::CalendarDay(d) => Some(d.month()),
            Self::CalendarMonth { month_of_year, .. } => Some(month_of_year),
            _ => None,
        }
    }

    pub fn month_number(&self) -> Option<MonthNumber> {
        match *self {
            Self::FiscalMonth { month_number, .. } | Self::GenericMonth { month_number, .. } => {
                Some(month_number)
            }
            _ => None,
        }
    }

    pub fn day_of_month(&self) -> Option<u8> {
        match *self {
            Self::CalendarDay(d) => Some(d.day()),
            _ => None,
        }
    }
    // endregion getters

    // region: chronology
    /// Chronological key of the first instant this unit covers: the Julian
    /// day for calendar units, the month ordinal (`year * 12 + month - 1`)
    /// for fiscal and generic units, `None` for unbounded ones. Keys of
    /// different kinds never meet because periods never mix kinds.
    pub(crate) fn lower_key(&self) -> Option<i64> {
        match *self {
            Self::CalendarDay(d) => Some(i64::from(d.to_julian_day())),
            Self::CalendarMonth {
                year,
                month_of_year,
            } => Some(julian_day(year, month_of_year, 1)),
            Self::CalendarQuarter { year, quarter } => {
                Some(julian_day(year, quarter.first_month(), 1))
            }
            Self::CalendarYear { year } => Some(julian_day(year, Month::January, 1)),
            Self::FiscalMonth { year, month_number }
            | Self::GenericMonth { year, month_number } => {
                Some(month_ordinal(year, month_number.number()))
            }
            Self::FiscalQuarter { year, quarter } | Self::GenericQuarter { year, quarter } => {
                Some(month_ordinal(year, (quarter.number() - 1) * 3 + 1))
            }
            Self::FiscalYear { year } | Self::GenericYear { year } => {
                Some(month_ordinal(year, 1))
            }
            Self::CalendarUnbounded | Self::FiscalUnbounded | Self::GenericUnbounded => None,
        }
    }

    /// Chronological key of the last instant this unit covers; same key
    /// space as [`Self::lower_key`]
    pub(crate) fn upper_key(&self) -> Option<i64> {
        match *self {
            Self::CalendarDay(d) => Some(i64::from(d.to_julian_day())),
            Self::CalendarMonth {
                year,
                month_of_year,
            } => Some(julian_day(
                year,
                month_of_year,
                days_in_year_month(year.get(), month_of_year),
            )),
            Self::CalendarQuarter { year, quarter } => {
                let month = quarter.last_month();
                Some(julian_day(year, month, days_in_year_month(year.get(), month)))
            }
            Self::CalendarYear { year } => Some(julian_day(year, Month::December, 31)),
            Self::FiscalMonth { year, month_number }
            | Self::GenericMonth { year, month_number } => {
                Some(month_ordinal(year, month_number.number()))
            }
            Self::FiscalQuarter { year, quarter } | Self::GenericQuarter { year, quarter } => {
                Some(month_ordinal(year, quarter.number() * 3))
            }
            Self::FiscalYear { year } | Self::GenericYear { year } => {
                Some(month_ordinal(year, 12))
            }
            Self::CalendarUnbounded | Self::FiscalUnbounded | Self::GenericUnbounded => None,
        }
    }

    /// The calendar date of the first instant of a bounded calendar unit
    pub(crate) fn first_date(&self) -> Option<Date> {
        match *self {
            Self::CalendarDay(d) => Some(d),
            Self::CalendarMonth {
                year,
                month_of_year,
            } => Some(first_day(year, month_of_year)),
            Self::CalendarQuarter { year, quarter } => Some(first_day(year, quarter.first_month())),
            Self::CalendarYear { year } => Some(first_day(year, Month::January)),
            _ => None,
        }
    }

    /// Year and month position (1..=12) of the first month of a bounded
    /// fiscal or generic unit
    pub(crate) fn first_month_position(&self) -> Option<(Year, u8)> {
        match *self {
            Self::FiscalMonth { year, month_number }
            | Self::GenericMonth { year, month_number } => Some((year, month_number.number())),
            Self::FiscalQuarter { year, quarter } | Self::GenericQuarter { year, quarter } => {
                Some((year, (quarter.number() - 1) * 3 + 1))
            }
            Self::FiscalYear { year } | Self::GenericYear { year } => Some((year, 1)),
            _ => None,
        }
    }
    // endregion chronology

    // region: expansion
    /// The reporting period spanning this unit's finest granularity
    /// decomposition: a calendar year becomes its first day to its last day,
    /// a fiscal year its first month to its last month, and so on. Units
    /// already at their kind's finest granularity, and unbounded units,
    /// expand to themselves.
    pub fn to_most_granular(&self) -> ReportingPeriod {
        match *self {
            Self::CalendarMonth {
                year,
                month_of_year,
            } => ReportingPeriod::new_unchecked(
                Self::CalendarDay(first_day(year, month_of_year)),
                Self::CalendarDay(last_day(year, month_of_year)),
            ),
            Self::CalendarQuarter { year, quarter } => ReportingPeriod::new_unchecked(
                Self::CalendarDay(first_day(year, quarter.first_month())),
                Self::CalendarDay(last_day(year, quarter.last_month())),
            ),
            Self::CalendarYear { year } => ReportingPeriod::new_unchecked(
                Self::CalendarDay(first_day(year, Month::January)),
                Self::CalendarDay(last_day(year, Month::December)),
            ),
            Self::FiscalQuarter { year, quarter } => ReportingPeriod::new_unchecked(
                Self::FiscalMonth {
                    year,
                    month_number: month_number_from_position((quarter.number() - 1) * 3 + 1),
                },
                Self::FiscalMonth {
                    year,
                    month_number: month_number_from_position(quarter.number() * 3),
                },
            ),
            Self::FiscalYear { year } => ReportingPeriod::new_unchecked(
                Self::FiscalMonth {
                    year,
                    month_number: MonthNumber::One,
                },
                Self::FiscalMonth {
                    year,
                    month_number: MonthNumber::Twelve,
                },
            ),
            Self::GenericQuarter { year, quarter } => ReportingPeriod::new_unchecked(
                Self::GenericMonth {
                    year,
                    month_number: month_number_from_position((quarter.number() - 1) * 3 + 1),
                },
                Self::GenericMonth {
                    year,
                    month_number: month_number_from_position(quarter.number() * 3),
                },
            ),
            Self::GenericYear { year } => ReportingPeriod::new_unchecked(
                Self::GenericMonth {
                    year,
                    month_number: MonthNumber::One,
                },
                Self::GenericMonth {
                    year,
                    month_number: MonthNumber::Twelve,
                },
            ),
            // Already as granular as the kind supports
            Self::CalendarDay(_)
            | Self::FiscalMonth { .. }
            | Self::GenericMonth { .. }
            | Self::CalendarUnbounded
            | Self::FiscalUnbounded
            | Self::GenericUnbounded => ReportingPeriod::new_unchecked(*self, *self),
        }
    }

    /// The single unit period `[self, self]`
    pub fn to_reporting_period(&self) -> ReportingPeriod {
        ReportingPeriod::new_unchecked(*self, *self)
    }
    // endregion expansion

    // region: arithmetic
    /// Add `units_to_add` units at this unit's own granularity, rolling over
    /// calendar boundaries as needed (month 13 of year Y is month 1 of year
    /// Y+1). Negative values subtract.
    pub fn plus(&self, units_to_add: i32) -> Result<Self, AccountingPeriodError> {
        match *self {
            Self::CalendarDay(d) => {
                let julian = i64::from(d.to_julian_day()) + i64::from(units_to_add);
                let julian =
                    i32::try_from(julian).map_err(|_| AccountingPeriodError::DateOutOfRange)?;
                let date = Date::from_julian_day(julian)
                    .map_err(|_| AccountingPeriodError::DateOutOfRange)?;
                Year::new(date.year())?;
                Ok(Self::CalendarDay(date))
            }
            Self::CalendarMonth {
                year,
                month_of_year,
            } => {
                let (year, month) = add_months(year, month_of_year as u8, units_to_add)?;
                Ok(Self::CalendarMonth {
                    year,
                    month_of_year: month_from_position(month),
                })
            }
            Self::CalendarQuarter { year, quarter } => {
                let (year, quarter) = add_quarters(year, quarter, units_to_add)?;
                Ok(Self::CalendarQuarter { year, quarter })
            }
            Self::CalendarYear { year } => Ok(Self::CalendarYear {
                year: add_years(year, units_to_add)?,
            }),
            Self::FiscalMonth { year, month_number } => {
                let (year, month) = add_months(year, month_number.number(), units_to_add)?;
                Ok(Self::FiscalMonth {
                    year,
                    month_number: month_number_from_position(month),
                })
            }
            Self::FiscalQuarter { year, quarter } => {
                let (year, quarter) = add_quarters(year, quarter, units_to_add)?;
                Ok(Self::FiscalQuarter { year, quarter })
            }
            Self::FiscalYear { year } => Ok(Self::FiscalYear {
                year: add_years(year, units_to_add)?,
            }),
            Self::GenericMonth { year, month_number } => {
                let (year, month) = add_months(year, month_number.number(), units_to_add)?;
                Ok(Self::GenericMonth {
                    year,
                    month_number: month_number_from_position(month),
                })
            }
            Self::GenericQuarter { year, quarter } => {
                let (year, quarter) = add_quarters(year, quarter, units_to_add)?;
                Ok(Self::GenericQuarter { year, quarter })
            }
            Self::GenericYear { year } => Ok(Self::GenericYear {
                year: add_years(year, units_to_add)?,
            }),
            Self::CalendarUnbounded | Self::FiscalUnbounded | Self::GenericUnbounded => {
                Err(AccountingPeriodError::IllegalAdjustment)
            }
        }
    }

    /// Add units expressed at a granularity the same as or coarser than this
    /// unit's own, converting them to the native granularity first (a year is
    /// twelve months or four quarters, a quarter is three months). Adding
    /// month or coarser units to a calendar day clamps to the end of a short
    /// month, so Jan 31 plus one month is Feb 28 (or 29).
    pub(crate) fn plus_at(
        &self,
        units_to_add: i32,
        granularity: UnitOfTimeGranularity,
    ) -> Result<Self, AccountingPeriodError> {
        let own = self.granularity();
        if own.is_least_granular() {
            return Err(AccountingPeriodError::IllegalAdjustment);
        }
        if granularity.is_least_granular() {
            return Err(AccountingPeriodError::InvalidGranularity);
        }
        if granularity.is_more_granular_than(own) {
            return Err(AccountingPeriodError::GranularityMismatch {
                component: own,
                units: granularity,
            });
        }
        if granularity == own {
            return self.plus(units_to_add);
        }
        // The adjustment granularity is strictly coarser than the unit's own
        // from here on
        let converted = match (own, granularity) {
            (UnitOfTimeGranularity::Month, UnitOfTimeGranularity::Quarter)
            | (UnitOfTimeGranularity::Day, UnitOfTimeGranularity::Quarter) => {
                units_to_add.checked_mul(3)
            }
            (UnitOfTimeGranularity::Month, UnitOfTimeGranularity::Year)
            | (UnitOfTimeGranularity::Day, UnitOfTimeGranularity::Year) => {
                units_to_add.checked_mul(12)
            }
            (UnitOfTimeGranularity::Day, UnitOfTimeGranularity::Month) => Some(units_to_add),
            (UnitOfTimeGranularity::Quarter, UnitOfTimeGranularity::Year) => {
                units_to_add.checked_mul(4)
            }
            _ => None,
        };
        let converted = converted.ok_or(AccountingPeriodError::DateOutOfRange)?;
        if own.is_most_granular() {
            // Month or coarser units applied to a day: calendar month
            // arithmetic with end of month clamping
            self.plus_months_clamped(converted)
        } else {
            self.plus(converted)
        }
    }

    /// Month arithmetic on a calendar day, truncating the day to the end of
    /// the month when the landing month is too short
    fn plus_months_clamped(&self, months_to_add: i32) -> Result<Self, AccountingPeriodError> {
        match *self {
            Self::CalendarDay(d) => {
                let year = Year::new(d.year())?;
                let (year, month) = add_months(year, d.month() as u8, months_to_add)?;
                let month = month_from_position(month);
                let day = cmp::min(days_in_year_month(year.get(), month), d.day());
                let date = Date::from_calendar_date(year.get(), month, day)
                    .map_err(|_| AccountingPeriodError::DateOutOfRange)?;
                Ok(Self::CalendarDay(date))
            }
            _ => Err(AccountingPeriodError::IllegalAdjustment),
        }
    }

    /// The unit at `granularity` immediately before the one containing this
    /// unit's first instant. A calendar year's previous quarter is therefore
    /// the last quarter of the prior year, and a mid-quarter day's previous
    /// quarter is the quarter before the one the day sits in.
    pub fn previous(
        &self,
        granularity: UnitOfTimeGranularity,
    ) -> Result<Self, AccountingPeriodError> {
        if granularity.is_least_granular() {
            return Err(AccountingPeriodError::InvalidGranularity);
        }
        if self.granularity().is_least_granular() {
            return Err(AccountingPeriodError::IllegalAdjustment);
        }
        self.containing(granularity)?.plus(-1)
    }

    /// The unit at `granularity` that contains this (bounded) unit's first
    /// instant
    fn containing(
        &self,
        granularity: UnitOfTimeGranularity,
    ) -> Result<Self, AccountingPeriodError> {
        match self.kind() {
            UnitOfTimeKind::Calendar => {
                let start = match self.first_date() {
                    Some(d) => d,
                    None => return Err(AccountingPeriodError::IllegalAdjustment),
                };
                let year = Year::new(start.year())?;
                let unit = match granularity {
                    UnitOfTimeGranularity::Day => Self::CalendarDay(start),
                    UnitOfTimeGranularity::Month => Self::CalendarMonth {
                        year,
                        month_of_year: start.month(),
                    },
                    UnitOfTimeGranularity::Quarter => Self::CalendarQuarter {
                        year,
                        quarter: QuarterNumber::of_month(start.month() as u8),
                    },
                    UnitOfTimeGranularity::Year => Self::CalendarYear { year },
                    UnitOfTimeGranularity::Unbounded => {
                        return Err(AccountingPeriodError::InvalidGranularity)
                    }
                };
                Ok(unit)
            }
            UnitOfTimeKind::Fiscal | UnitOfTimeKind::Generic => {
                if granularity.is_most_granular() {
                    return Err(AccountingPeriodError::UnsupportedGranularityForKind);
                }
                let (year, month) = match self.first_month_position() {
                    Some(position) => position,
                    None => return Err(AccountingPeriodError::IllegalAdjustment),
                };
                let fiscal = self.kind() == UnitOfTimeKind::Fiscal;
                let unit = match granularity {
                    UnitOfTimeGranularity::Month => {
                        let month_number = month_number_from_position(month);
                        if fiscal {
                            Self::FiscalMonth { year, month_number }
                        } else {
                            Self::GenericMonth { year, month_number }
                        }
                    }
                    UnitOfTimeGranularity::Quarter => {
                        let quarter = QuarterNumber::of_month(month);
                        if fiscal {
                            Self::FiscalQuarter { year, quarter }
                        } else {
                            Self::GenericQuarter { year, quarter }
                        }
                    }
                    UnitOfTimeGranularity::Year => {
                        if fiscal {
                            Self::FiscalYear { year }
                        } else {
                            Self::GenericYear { year }
                        }
                    }
                    UnitOfTimeGranularity::Day | UnitOfTimeGranularity::Unbounded => {
                        return Err(AccountingPeriodError::InvalidGranularity)
                    }
                };
                Ok(unit)
            }
        }
    }
    // endregion arithmetic
}

impl PartialOrd for UnitOfTime {
    /// Chronological order within a kind, by first instant; ties between
    /// granularities break towards the finer unit, and an unbounded unit
    /// sorts before every bounded one. Units of different kinds have no
    /// order.
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        if self.kind() != other.kind() {
            return None;
        }
        let key = |u: &Self| (u.lower_key().unwrap_or(i64::MIN), u.granularity().rank());
        Some(key(self).cmp(&key(other)))
    }
}

// region: formatting
impl fmt::Display for UnitOfTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CalendarDay(d) => write!(
                f,
                "{:04}-{:02}-{:02}",
                d.year(),
                d.month() as u8,
                d.day()
            ),
            Self::CalendarMonth {
                year,
                month_of_year,
            } => write!(f, "{:04}-{:02}", year.get(), month_of_year as u8),
            Self::CalendarQuarter { year, quarter } => {
                write!(f, "{:04}-{}", year.get(), quarter)
            }
            Self::CalendarYear { year } => write!(f, "{:04}", year.get()),
            Self::FiscalMonth { year, month_number } => {
                write!(f, "FY{:04}-M{:02}", year.get(), month_number.number())
            }
            Self::FiscalQuarter { year, quarter } => {
                write!(f, "FY{:04}-{}", year.get(), quarter)
            }
            Self::FiscalYear { year } => write!(f, "FY{:04}", year.get()),
            Self::GenericMonth { year, month_number } => {
                write!(f, "GY{:04}-M{:02}", year.get(), month_number.number())
            }
            Self::GenericQuarter { year, quarter } => {
                write!(f, "GY{:04}-{}", year.get(), quarter)
            }
            Self::GenericYear { year } => write!(f, "GY{:04}", year.get()),
            Self::CalendarUnbounded | Self::FiscalUnbounded | Self::GenericUnbounded => {
                f.write_str("unbounded")
            }
        }
    }
}
// endregion formatting

// region: calendar helpers
/// First day of a month as a date. Day one of a valid year and month always
/// exists, so the error arm is unreachable.
pub(crate) fn first_day(year: Year, month: Month) -> Date {
    Date::from_calendar_date(year.get(), month, 1).unwrap_or(Date::MIN)
}

/// Last day of a month as a date; same unreachable error arm as
/// [`first_day`]
pub(crate) fn last_day(year: Year, month: Month) -> Date {
    Date::from_calendar_date(year.get(), month, days_in_year_month(year.get(), month))
        .unwrap_or(Date::MAX)
}

/// Months elapsed since month 1 of year 0; the key space for fiscal and
/// generic units
pub(crate) fn month_ordinal(year: Year, month: u8) -> i64 {
    i64::from(year.get()) * 12 + i64::from(month) - 1
}

fn julian_day(year: Year, month: Month, day: u8) -> i64 {
    i64::from(
        Date::from_calendar_date(year.get(), month, day)
            .unwrap_or(Date::MIN)
            .to_julian_day(),
    )
}

/// Convert a month position (1..=12) into a calendar month. Positions are
/// produced by modular arithmetic and never out of range.
pub(crate) fn month_from_position(month: u8) -> Month {
    Month::try_from(month).unwrap_or(Month::January)
}

/// Convert a month position (1..=12) into a fiscal/generic month number.
/// Same unreachable fallback as [`month_from_position`].
pub(crate) fn month_number_from_position(month: u8) -> MonthNumber {
    MonthNumber::try_from(month).unwrap_or(MonthNumber::One)
}

/// Month arithmetic with year rollover: returns the landing year and month
/// position (1..=12)
pub(crate) fn add_months(
    year: Year,
    month: u8,
    months_to_add: i32,
) -> Result<(Year, u8), AccountingPeriodError> {
    let ordinal = month_ordinal(year, month) + i64::from(months_to_add);
    let landing_year = ordinal.div_euclid(12);
    let landing_month = ordinal.rem_euclid(12) as u8 + 1;
    let landing_year =
        i32::try_from(landing_year).map_err(|_| AccountingPeriodError::DateOutOfRange)?;
    Ok((Year::new(landing_year)?, landing_month))
}

/// Quarter arithmetic with year rollover
pub(crate) fn add_quarters(
    year: Year,
    quarter: QuarterNumber,
    quarters_to_add: i32,
) -> Result<(Year, QuarterNumber), AccountingPeriodError> {
    let ordinal =
        i64::from(year.get()) * 4 + i64::from(quarter.number()) - 1 + i64::from(quarters_to_add);
    let landing_year = ordinal.div_euclid(4);
    let landing_quarter = ordinal.rem_euclid(4) as u8 + 1;
    let landing_year =
        i32::try_from(landing_year).map_err(|_| AccountingPeriodError::DateOutOfRange)?;
    let quarter = QuarterNumber::try_from(landing_quarter)?;
    Ok((Year::new(landing_year)?, quarter))
}

fn add_years(year: Year, years_to_add: i32) -> Result<Year, AccountingPeriodError> {
    let landing = i64::from(year.get()) + i64::from(years_to_add);
    let landing = i32::try_from(landing).map_err(|_| AccountingPeriodError::DateOutOfRange)?;
    Year::new(landing)
}
// endregion calendar helpers
