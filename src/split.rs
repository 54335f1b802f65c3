use time::{
    util::{days_in_year, days_in_year_month},
    Date, Month,
};

use crate::unit_of_time::{month_number_from_position, QuarterNumber, Year};
use crate::{
    AccountingPeriodError, ReportingPeriod, UnitOfTime, UnitOfTimeGranularity, UnitOfTimeKind,
};

/// Governs re-granularisation when a period does not land exactly on the
/// target granularity's boundaries: reject the split outright, or keep only
/// the target units that fit entirely inside the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowStrategy {
    ThrowOnOverflow,
    DiscardOverflow,
}

impl ReportingPeriod {
    /// Re-express the period as a sequence of consecutive units at
    /// `granularity`, in either direction of the lattice: a two year period
    /// splits into 730-ish days, and a run of days covering whole years
    /// splits into those years.
    ///
    /// The boundary check runs up front: under
    /// [`OverflowStrategy::ThrowOnOverflow`] both period bounds must sit
    /// exactly on `granularity` boundaries, while
    /// [`OverflowStrategy::DiscardOverflow`] silently drops partial units at
    /// either end and may legitimately produce an empty sequence. The
    /// returned [`Split`] iterator is lazy, finite and strictly increasing,
    /// with no gaps and no duplicates.
    pub fn split(
        &self,
        granularity: UnitOfTimeGranularity,
        strategy: OverflowStrategy,
    ) -> Result<Split, AccountingPeriodError> {
        if self.has_unbounded_component() {
            return Err(AccountingPeriodError::UnboundedPeriod);
        }
        if granularity.is_least_granular() {
            return Err(AccountingPeriodError::InvalidGranularity);
        }
        let kind = self.kind();
        if kind != UnitOfTimeKind::Calendar && granularity.is_most_granular() {
            return Err(AccountingPeriodError::UnsupportedGranularityForKind);
        }

        // The finest-granularity span of the period: Julian days for
        // calendar periods, month ordinals for the rest
        let most_granular = self.to_most_granular();
        let (span_first, span_last) =
            match (most_granular.start().lower_key(), most_granular.end().upper_key()) {
                (Some(first), Some(last)) => (first, last),
                _ => return Err(AccountingPeriodError::UnboundedPeriod),
            };

        let (mut first, mut last, aligned_first, aligned_last) = match kind {
            UnitOfTimeKind::Calendar => {
                let first_date = date_from_julian(span_first)?;
                let last_date = date_from_julian(span_last)?;
                match granularity {
                    UnitOfTimeGranularity::Day => (span_first, span_last, true, true),
                    UnitOfTimeGranularity::Month => (
                        calendar_month_ordinal(first_date),
                        calendar_month_ordinal(last_date),
                        first_date.day() == 1,
                        last_date.day()
                            == days_in_year_month(last_date.year(), last_date.month()),
                    ),
                    UnitOfTimeGranularity::Quarter => (
                        calendar_month_ordinal(first_date).div_euclid(3),
                        calendar_month_ordinal(last_date).div_euclid(3),
                        first_date.day() == 1 && (first_date.month() as u8 - 1) % 3 == 0,
                        last_date.day() == days_in_year_month(last_date.year(), last_date.month())
                            && (last_date.month() as u8) % 3 == 0,
                    ),
                    UnitOfTimeGranularity::Year => (
                        i64::from(first_date.year()),
                        i64::from(last_date.year()),
                        first_date.ordinal() == 1,
                        last_date.ordinal() == days_in_year(last_date.year()),
                    ),
                    UnitOfTimeGranularity::Unbounded => {
                        return Err(AccountingPeriodError::InvalidGranularity)
                    }
                }
            }
            UnitOfTimeKind::Fiscal | UnitOfTimeKind::Generic => match granularity {
                UnitOfTimeGranularity::Month => (span_first, span_last, true, true),
                UnitOfTimeGranularity::Quarter => (
                    span_first.div_euclid(3),
                    span_last.div_euclid(3),
                    span_first.rem_euclid(3) == 0,
                    span_last.rem_euclid(3) == 2,
                ),
                UnitOfTimeGranularity::Year => (
                    span_first.div_euclid(12),
                    span_last.div_euclid(12),
                    span_first.rem_euclid(12) == 0,
                    span_last.rem_euclid(12) == 11,
                ),
                UnitOfTimeGranularity::Day | UnitOfTimeGranularity::Unbounded => {
                    return Err(AccountingPeriodError::UnsupportedGranularityForKind)
                }
            },
        };

        if !(aligned_first && aligned_last) {
            match strategy {
                OverflowStrategy::ThrowOnOverflow => {
                    return Err(AccountingPeriodError::SplitOverflow)
                }
                OverflowStrategy::DiscardOverflow => {
                    // Trim the partial boundary units; first may end up past
                    // last, which is the legitimate empty split
                    if !aligned_first {
                        first += 1;
                    }
                    if !aligned_last {
                        last -= 1;
                    }
                }
            }
        }

        Ok(Split {
            kind,
            granularity,
            next: first,
            last,
        })
    }
}

/// # Split
///
/// Lazy iterator over the units of a [`ReportingPeriod::split`]. Walks an
/// ordinal cursor (Julian day, month ordinal, quarter ordinal or year,
/// depending on the target granularity) and decodes each position into a
/// unit of time, so the whole sequence never needs to be materialised.
#[derive(Debug, Clone)]
pub struct Split {
    kind: UnitOfTimeKind,
    granularity: UnitOfTimeGranularity,
    next: i64,
    last: i64,
}

impl Iterator for Split {
    type Item = UnitOfTime;

    fn next(&mut self) -> Option<UnitOfTime> {
        if self.next > self.last {
            return None;
        }
        let unit = decode(self.kind, self.granularity, self.next)?;
        self.next += 1;
        Some(unit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next > self.last {
            0
        } else {
            (self.last - self.next + 1) as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Split {}

/// Decode an ordinal cursor position back into a unit of time. Positions
/// come from a validated period, so the fallible conversions only guard the
/// arithmetic edges of the supported year range.
fn decode(
    kind: UnitOfTimeKind,
    granularity: UnitOfTimeGranularity,
    ordinal: i64,
) -> Option<UnitOfTime> {
    match (kind, granularity) {
        (UnitOfTimeKind::Calendar, UnitOfTimeGranularity::Day) => {
            let julian = i32::try_from(ordinal).ok()?;
            Date::from_julian_day(julian).ok().map(UnitOfTime::CalendarDay)
        }
        (UnitOfTimeKind::Calendar, UnitOfTimeGranularity::Month) => {
            let (year, month) = split_month_ordinal(ordinal)?;
            Some(UnitOfTime::CalendarMonth {
                year,
                month_of_year: Month::try_from(month).ok()?,
            })
        }
        (UnitOfTimeKind::Calendar, UnitOfTimeGranularity::Quarter) => {
            let (year, quarter) = split_quarter_ordinal(ordinal)?;
            Some(UnitOfTime::CalendarQuarter { year, quarter })
        }
        (UnitOfTimeKind::Calendar, UnitOfTimeGranularity::Year) => {
            let year = Year::new(i32::try_from(ordinal).ok()?).ok()?;
            Some(UnitOfTime::CalendarYear { year })
        }
        (UnitOfTimeKind::Fiscal, UnitOfTimeGranularity::Month) => {
            let (year, month) = split_month_ordinal(ordinal)?;
            Some(UnitOfTime::FiscalMonth {
                year,
                month_number: month_number_from_position(month),
            })
        }
        (UnitOfTimeKind::Fiscal, UnitOfTimeGranularity::Quarter) => {
            let (year, quarter) = split_quarter_ordinal(ordinal)?;
            Some(UnitOfTime::FiscalQuarter { year, quarter })
        }
        (UnitOfTimeKind::Fiscal, UnitOfTimeGranularity::Year) => {
            let year = Year::new(i32::try_from(ordinal).ok()?).ok()?;
            Some(UnitOfTime::FiscalYear { year })
        }
        (UnitOfTimeKind::Generic, UnitOfTimeGranularity::Month) => {
            let (year, month) = split_month_ordinal(ordinal)?;
            Some(UnitOfTime::GenericMonth {
                year,
                month_number: month_number_from_position(month),
            })
        }
        (UnitOfTimeKind::Generic, UnitOfTimeGranularity::Quarter) => {
            let (year, quarter) = split_quarter_ordinal(ordinal)?;
            Some(UnitOfTime::GenericQuarter { year, quarter })
        }
        (UnitOfTimeKind::Generic, UnitOfTimeGranularity::Year) => {
            let year = Year::new(i32::try_from(ordinal).ok()?).ok()?;
            Some(UnitOfTime::GenericYear { year })
        }
        _ => None,
    }
}

fn split_month_ordinal(ordinal: i64) -> Option<(Year, u8)> {
    let year = Year::new(i32::try_from(ordinal.div_euclid(12)).ok()?).ok()?;
    Some((year, ordinal.rem_euclid(12) as u8 + 1))
}

fn split_quarter_ordinal(ordinal: i64) -> Option<(Year, QuarterNumber)> {
    let year = Year::new(i32::try_from(ordinal.div_euclid(4)).ok()?).ok()?;
    let quarter = QuarterNumber::try_from(ordinal.rem_euclid(4) as u8 + 1).ok()?;
    Some((year, quarter))
}

/// `year * 12 + month - 1`, the same ordinal space fiscal months live in
fn calendar_month_ordinal(date: Date) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month() as u8) - 1
}

fn date_from_julian(julian: i64) -> Result<Date, AccountingPeriodError> {
    let julian = i32::try_from(julian).map_err(|_| AccountingPeriodError::DateOutOfRange)?;
    Date::from_julian_day(julian).map_err(|_| AccountingPeriodError::DateOutOfRange)
}
