use core::fmt;
use std::cmp;

use time::util::days_in_year_month;

use crate::split::OverflowStrategy;
use crate::unit_of_time::QuarterNumber;
use crate::{AccountingPeriodError, UnitOfTime, UnitOfTimeGranularity, UnitOfTimeKind};

/// Selects which bound of a [`ReportingPeriod`] an adjustment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportingPeriodComponent {
    Start,
    End,
    Both,
}

/// # ReportingPeriod
///
/// A span of accounting time: a start unit and an end unit of the same kind,
/// with the start chronologically no later than the end. The two bounds may
/// sit at *different* granularities (a year start with a day end is a valid
/// period), and either may be unbounded, which opens that side of the span
/// entirely.
///
/// A period is an immutable value. Every operation on it returns a new
/// period and leaves the receiver untouched, so failed operations have no
/// partial effects to roll back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportingPeriod {
    start: UnitOfTime,
    end: UnitOfTime,
}

impl ReportingPeriod {
    // region: constructors
    /// Create a period from two bounds of the same kind. The start must be
    /// chronologically on or before the end, comparing the start's first
    /// instant against the end's last instant; an unbounded bound always
    /// satisfies its side of the check.
    pub fn new(start: UnitOfTime, end: UnitOfTime) -> Result<Self, AccountingPeriodError> {
        if start.kind() != end.kind() {
            return Err(AccountingPeriodError::MixedKind);
        }
        let period = Self { start, end };
        if !period.is_well_ordered() {
            return Err(AccountingPeriodError::InvalidPeriodOrdering);
        }
        Ok(period)
    }

    /// Internal constructor for bounds already known to satisfy the
    /// invariants
    pub(crate) fn new_unchecked(start: UnitOfTime, end: UnitOfTime) -> Self {
        Self { start, end }
    }

    fn is_well_ordered(&self) -> bool {
        match (self.start.lower_key(), self.end.upper_key()) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
    // endregion constructors

    // region: getters
    pub fn start(&self) -> UnitOfTime {
        self.start
    }

    pub fn end(&self) -> UnitOfTime {
        self.end
    }

    pub fn kind(&self) -> UnitOfTimeKind {
        self.start.kind()
    }

    /// The granularity the period is representable at: the finer of the two
    /// bounds' granularities. Unbounded only when both bounds are open.
    pub fn granularity(&self) -> UnitOfTimeGranularity {
        let start = self.start.granularity();
        let end = self.end.granularity();
        if start.is_as_granular_or_more_granular_than(end) {
            start
        } else {
            end
        }
    }

    /// Is either bound unbounded?
    pub fn has_unbounded_component(&self) -> bool {
        self.start.granularity().is_least_granular() || self.end.granularity().is_least_granular()
    }
    // endregion getters

    // region: canonicalization
    /// Re-express the period at its kind's finest granularity: the start
    /// bound expands to the first unit it covers and the end bound to the
    /// last. Unbounded bounds carry through. The chronological span is
    /// unchanged.
    pub fn to_most_granular(&self) -> Self {
        Self::new_unchecked(
            self.start.to_most_granular().start(),
            self.end.to_most_granular().end(),
        )
    }

    /// Re-express the period at the coarsest granularity that still denotes
    /// exactly the same span: whole years where the span covers whole years,
    /// else whole quarters, and so on. The inverse of
    /// [`Self::to_most_granular`] in the sense that expanding the result
    /// re-covers the identical span.
    pub fn to_least_granular(&self) -> Self {
        let chain = self.granularity_chain();
        // The chain always holds at least the most granular form
        chain[chain.len() - 1]
    }

    /// Every equivalent representation of this period that is strictly finer
    /// than its own granularity; `include_self` appends the period itself.
    /// Set semantics: no duplicates, no particular order.
    pub fn to_all_more_granular(&self, include_self: bool) -> Vec<Self> {
        let own = self.granularity();
        let mut result: Vec<Self> = self
            .granularity_chain()
            .into_iter()
            .filter(|p| p.granularity().is_more_granular_than(own))
            .collect();
        if include_self && !result.contains(self) {
            result.push(*self);
        }
        result
    }

    /// Every equivalent representation strictly coarser than the period's
    /// own granularity; only exact conversions appear, so a period that does
    /// not sit on coarser boundaries yields nothing here.
    pub fn to_all_less_granular(&self, include_self: bool) -> Vec<Self> {
        let own = self.granularity();
        let mut result: Vec<Self> = self
            .granularity_chain()
            .into_iter()
            .filter(|p| p.granularity().is_less_granular_than(own))
            .collect();
        if include_self && !result.contains(self) {
            result.push(*self);
        }
        result
    }

    /// Every equivalent representation of the period, from the most to the
    /// least granular extreme
    pub fn to_all_granularities(&self, include_self: bool) -> Vec<Self> {
        let mut result = self.granularity_chain();
        if include_self {
            if !result.contains(self) {
                result.push(*self);
            }
        } else {
            result.retain(|p| p != self);
        }
        result
    }

    /// All exact equivalents of this period, finest first: the most granular
    /// form, then one lattice notch coarser at a time for as long as both
    /// bounds still sit exactly on the coarser boundaries
    fn granularity_chain(&self) -> Vec<Self> {
        let mut chain = vec![self.to_most_granular()];
        loop {
            let coarser = match chain[chain.len() - 1].one_notch_less_granular() {
                Some(p) => p,
                None => break,
            };
            chain.push(coarser);
        }
        chain
    }

    /// Collapse both bounds exactly one notch coarser, if the start sits on
    /// a first-of boundary and the end on a last-of boundary at the coarser
    /// granularity. Unbounded bounds carry through untouched.
    fn one_notch_less_granular(&self) -> Option<Self> {
        let start_open = self.start.granularity().is_least_granular();
        let end_open = self.end.granularity().is_least_granular();
        if start_open && end_open {
            return None;
        }
        let start = if start_open {
            self.start
        } else {
            collapse_start(self.start)?
        };
        let end = if end_open {
            self.end
        } else {
            collapse_end(self.end)?
        };
        Some(Self::new_unchecked(start, end))
    }
    // endregion canonicalization

    // region: adjustment
    /// Return a copy of the period with the chosen component(s) shifted by
    /// `units_to_add` units of `granularity_of_units_to_add`. The units are
    /// converted into the component's native granularity first (a year is
    /// twelve months or four quarters), so the adjustment granularity must
    /// be the same as or coarser than the component's own. With
    /// [`ReportingPeriodComponent::Both`], each bound is shifted
    /// independently by the same amount.
    pub fn clone_with_adjustment(
        &self,
        component: ReportingPeriodComponent,
        units_to_add: i32,
        granularity_of_units_to_add: UnitOfTimeGranularity,
    ) -> Result<Self, AccountingPeriodError> {
        if granularity_of_units_to_add.is_least_granular() {
            return Err(AccountingPeriodError::InvalidGranularity);
        }
        let adjust_start = matches!(
            component,
            ReportingPeriodComponent::Start | ReportingPeriodComponent::Both
        );
        let adjust_end = matches!(
            component,
            ReportingPeriodComponent::End | ReportingPeriodComponent::Both
        );

        let start = if adjust_start {
            adjust_bound(self.start, units_to_add, granularity_of_units_to_add)?
        } else {
            self.start
        };
        let end = if adjust_end {
            adjust_bound(self.end, units_to_add, granularity_of_units_to_add)?
        } else {
            self.end
        };

        let adjusted = Self { start, end };
        if !adjusted.is_well_ordered() {
            return Err(AccountingPeriodError::InvalidPeriodOrdering);
        }
        Ok(adjusted)
    }
    // endregion adjustment

    // region: merge
    /// Merge same-kind periods into the single period running from the
    /// earliest start to the latest end. When every bounded bound in the
    /// input shares one granularity the result keeps it; any mixture forces
    /// the result down to the kind's finest granularity, since that is the
    /// only level at which the extremal bounds are exactly representable.
    pub fn merge_into_extremal(periods: &[Self]) -> Result<Self, AccountingPeriodError> {
        let first = match periods.first() {
            Some(p) => *p,
            None => return Err(AccountingPeriodError::EmptyInput),
        };
        if periods.iter().any(|p| p.kind() != first.kind()) {
            return Err(AccountingPeriodError::MixedKind);
        }

        let mut shared: Option<UnitOfTimeGranularity> = None;
        let mut uniform = true;
        for bound in periods.iter().flat_map(|p| [p.start, p.end]) {
            let granularity = bound.granularity();
            if granularity.is_least_granular() {
                // An open bound is representable at any granularity
                continue;
            }
            match shared {
                None => shared = Some(granularity),
                Some(s) if s == granularity => {}
                Some(_) => uniform = false,
            }
        }

        let (start, end) = if uniform {
            let start = periods
                .iter()
                .map(|p| p.start)
                .min_by_key(|u| u.lower_key().unwrap_or(i64::MIN))
                .unwrap_or(first.start);
            let end = periods
                .iter()
                .map(|p| p.end)
                .max_by_key(|u| u.upper_key().unwrap_or(i64::MAX))
                .unwrap_or(first.end);
            (start, end)
        } else {
            let start = periods
                .iter()
                .map(|p| p.to_most_granular().start)
                .min_by_key(|u| u.lower_key().unwrap_or(i64::MIN))
                .unwrap_or(first.start);
            let end = periods
                .iter()
                .map(|p| p.to_most_granular().end)
                .max_by_key(|u| u.upper_key().unwrap_or(i64::MAX))
                .unwrap_or(first.end);
            (start, end)
        };
        Ok(Self::new_unchecked(start, end))
    }
    // endregion merge

    // region: permutations
    /// Every contiguous sub-period of this period spanning at most
    /// `max_units_in_any_reporting_period` units at the period's own
    /// granularity, ordered by start unit first and then by span length
    pub fn create_permutations(
        &self,
        max_units_in_any_reporting_period: usize,
    ) -> Result<Vec<Self>, AccountingPeriodError> {
        if self.has_unbounded_component() {
            return Err(AccountingPeriodError::UnboundedPeriod);
        }
        if max_units_in_any_reporting_period < 1 {
            return Err(AccountingPeriodError::InvalidArgument);
        }
        // Splitting at the period's own granularity is always exact: a
        // coarser bound decomposes exactly into finer units
        let units: Vec<UnitOfTime> = self
            .split(self.granularity(), OverflowStrategy::ThrowOnOverflow)?
            .collect();
        let mut result = Vec::new();
        for i in 0..units.len() {
            let longest = cmp::min(max_units_in_any_reporting_period, units.len() - i);
            for len in 1..=longest {
                result.push(Self::new_unchecked(units[i], units[i + len - 1]));
            }
        }
        Ok(result)
    }
    // endregion permutations

    // region: comparison
    /// Does this period chronologically cover the whole of `other`? Both
    /// periods are normalised to their most granular form first, so the
    /// granularities they happen to be expressed at do not matter.
    pub fn contains(&self, other: &Self) -> Result<bool, AccountingPeriodError> {
        if self.kind() != other.kind() {
            return Err(AccountingPeriodError::MixedKind);
        }
        let ours = self.to_most_granular();
        let theirs = other.to_most_granular();
        let start_covered = ours.start.lower_key().unwrap_or(i64::MIN)
            <= theirs.start.lower_key().unwrap_or(i64::MIN);
        let end_covered = ours.end.upper_key().unwrap_or(i64::MAX)
            >= theirs.end.upper_key().unwrap_or(i64::MAX);
        Ok(start_covered && end_covered)
    }

    /// Do the two periods denote the identical chronological span, whatever
    /// granularities they are expressed at?
    pub fn is_equal_ignoring_granularity(
        &self,
        other: &Self,
    ) -> Result<bool, AccountingPeriodError> {
        if self.kind() != other.kind() {
            return Err(AccountingPeriodError::MixedKind);
        }
        Ok(self.to_most_granular() == other.to_most_granular())
    }
    // endregion comparison
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

// region: collapse helpers
/// One notch coarser for a start bound: exact only when the unit is the
/// first of its containing coarser unit
fn collapse_start(unit: UnitOfTime) -> Option<UnitOfTime> {
    match unit {
        UnitOfTime::CalendarDay(d) if d.day() == 1 => Some(UnitOfTime::CalendarMonth {
            year: unit.year()?,
            month_of_year: d.month(),
        }),
        UnitOfTime::CalendarMonth {
            year,
            month_of_year,
        } if (month_of_year as u8 - 1) % 3 == 0 => Some(UnitOfTime::CalendarQuarter {
            year,
            quarter: QuarterNumber::of_month(month_of_year as u8),
        }),
        UnitOfTime::CalendarQuarter {
            year,
            quarter: QuarterNumber::Q1,
        } => Some(UnitOfTime::CalendarYear { year }),
        UnitOfTime::FiscalMonth { year, month_number }
            if (month_number.number() - 1) % 3 == 0 =>
        {
            Some(UnitOfTime::FiscalQuarter {
                year,
                quarter: QuarterNumber::of_month(month_number.number()),
            })
        }
        UnitOfTime::FiscalQuarter {
            year,
            quarter: QuarterNumber::Q1,
        } => Some(UnitOfTime::FiscalYear { year }),
        UnitOfTime::GenericMonth { year, month_number }
            if (month_number.number() - 1) % 3 == 0 =>
        {
            Some(UnitOfTime::GenericQuarter {
                year,
                quarter: QuarterNumber::of_month(month_number.number()),
            })
        }
        UnitOfTime::GenericQuarter {
            year,
            quarter: QuarterNumber::Q1,
        } => Some(UnitOfTime::GenericYear { year }),
        _ => None,
    }
}

/// One notch coarser for an end bound: exact only when the unit is the last
/// of its containing coarser unit
fn collapse_end(unit: UnitOfTime) -> Option<UnitOfTime> {
    match unit {
        UnitOfTime::CalendarDay(d) if d.day() == days_in_year_month(d.year(), d.month()) => {
            Some(UnitOfTime::CalendarMonth {
                year: unit.year()?,
                month_of_year: d.month(),
            })
        }
        UnitOfTime::CalendarMonth {
            year,
            month_of_year,
        } if (month_of_year as u8) % 3 == 0 => Some(UnitOfTime::CalendarQuarter {
            year,
            quarter: QuarterNumber::of_month(month_of_year as u8),
        }),
        UnitOfTime::CalendarQuarter {
            year,
            quarter: QuarterNumber::Q4,
        } => Some(UnitOfTime::CalendarYear { year }),
        UnitOfTime::FiscalMonth { year, month_number } if month_number.number() % 3 == 0 => {
            Some(UnitOfTime::FiscalQuarter {
                year,
                quarter: QuarterNumber::of_month(month_number.number()),
            })
        }
        UnitOfTime::FiscalQuarter {
            year,
            quarter: QuarterNumber::Q4,
        } => Some(UnitOfTime::FiscalYear { year }),
        UnitOfTime::GenericMonth { year, month_number } if month_number.number() % 3 == 0 => {
            Some(UnitOfTime::GenericQuarter {
                year,
                quarter: QuarterNumber::of_month(month_number.number()),
            })
        }
        UnitOfTime::GenericQuarter {
            year,
            quarter: QuarterNumber::Q4,
        } => Some(UnitOfTime::GenericYear { year }),
        _ => None,
    }
}

/// Shift one bound, enforcing the adjustment preconditions
fn adjust_bound(
    bound: UnitOfTime,
    units_to_add: i32,
    granularity: UnitOfTimeGranularity,
) -> Result<UnitOfTime, AccountingPeriodError> {
    let own = bound.granularity();
    if own.is_least_granular() {
        return Err(AccountingPeriodError::IllegalAdjustment);
    }
    if granularity.is_more_granular_than(own) {
        return Err(AccountingPeriodError::GranularityMismatch {
            component: own,
            units: granularity,
        });
    }
    bound.plus_at(units_to_add, granularity)
}
// endregion collapse helpers

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_of_time::MonthNumber;
    use crate::AccountingPeriodError as Error;
    use proptest::prelude::*;
    use time::Month;

    fn day(year: i32, month: Month, day: u8) -> UnitOfTime {
        UnitOfTime::calendar_day(year, month, day).unwrap()
    }

    fn month(year: i32, month: Month) -> UnitOfTime {
        UnitOfTime::calendar_month(year, month).unwrap()
    }

    fn quarter(year: i32, q: QuarterNumber) -> UnitOfTime {
        UnitOfTime::calendar_quarter(year, q).unwrap()
    }

    fn period(start: UnitOfTime, end: UnitOfTime) -> ReportingPeriod {
        ReportingPeriod::new(start, end).unwrap()
    }

    #[test]
    fn create_period() {
        // Same granularity, mixed granularity, unbounded bounds: all fine
        assert!(ReportingPeriod::new(month(2020, Month::February), month(2020, Month::April)).is_ok());
        assert!(ReportingPeriod::new(
            UnitOfTime::calendar_year(2020).unwrap(),
            day(2020, Month::January, 5)
        )
        .is_ok());
        assert!(ReportingPeriod::new(
            UnitOfTime::calendar_unbounded(),
            UnitOfTime::calendar_unbounded()
        )
        .is_ok());
        assert!(ReportingPeriod::new(
            UnitOfTime::calendar_unbounded(),
            month(2020, Month::April)
        )
        .is_ok());

        // A one day overlap is still well ordered
        assert!(ReportingPeriod::new(day(2020, Month::December, 31), month(2020, Month::December))
            .is_ok());

        // Kinds must match
        assert_eq!(
            ReportingPeriod::new(
                month(2020, Month::February),
                UnitOfTime::fiscal_month(2020, MonthNumber::Four).unwrap()
            ),
            Err(Error::MixedKind)
        );

        // Start after end is rejected
        assert_eq!(
            ReportingPeriod::new(month(2020, Month::April), month(2020, Month::February)),
            Err(Error::InvalidPeriodOrdering)
        );
        assert_eq!(
            ReportingPeriod::new(day(2021, Month::January, 1), quarter(2020, QuarterNumber::Q4)),
            Err(Error::InvalidPeriodOrdering)
        );
    }

    #[test]
    fn period_granularity() {
        let p = period(
            UnitOfTime::calendar_year(2020).unwrap(),
            day(2021, Month::June, 5),
        );
        assert_eq!(p.granularity(), UnitOfTimeGranularity::Day);
        assert!(!p.has_unbounded_component());

        let p = period(UnitOfTime::calendar_unbounded(), month(2020, Month::April));
        assert_eq!(p.granularity(), UnitOfTimeGranularity::Month);
        assert!(p.has_unbounded_component());

        let p = period(
            UnitOfTime::generic_unbounded(),
            UnitOfTime::generic_unbounded(),
        );
        assert_eq!(p.granularity(), UnitOfTimeGranularity::Unbounded);
    }

    #[test]
    fn most_granular() {
        let p = period(
            UnitOfTime::calendar_year(2020).unwrap(),
            UnitOfTime::calendar_year(2020).unwrap(),
        );
        assert_eq!(
            p.to_most_granular(),
            period(day(2020, Month::January, 1), day(2020, Month::December, 31))
        );

        // Bounds expand independently
        let p = period(
            UnitOfTime::calendar_year(2020).unwrap(),
            month(2021, Month::June),
        );
        assert_eq!(
            p.to_most_granular(),
            period(day(2020, Month::January, 1), day(2021, Month::June, 30))
        );

        // Unbounded bounds survive, fiscal periods stop at months
        let p = period(UnitOfTime::fiscal_unbounded(), UnitOfTime::fiscal_year(2019).unwrap());
        assert_eq!(
            p.to_most_granular(),
            period(
                UnitOfTime::fiscal_unbounded(),
                UnitOfTime::fiscal_month(2019, MonthNumber::Twelve).unwrap()
            )
        );
    }

    #[test]
    fn least_granular() {
        // A whole year of days collapses to the year
        let p = period(day(2020, Month::January, 1), day(2020, Month::December, 31));
        assert_eq!(
            p.to_least_granular(),
            period(
                UnitOfTime::calendar_year(2020).unwrap(),
                UnitOfTime::calendar_year(2020).unwrap()
            )
        );

        // Half a year of days only collapses to quarters
        let p = period(day(2020, Month::January, 1), day(2020, Month::June, 30));
        assert_eq!(
            p.to_least_granular(),
            period(quarter(2020, QuarterNumber::Q1), quarter(2020, QuarterNumber::Q2))
        );

        // A single day that is not a whole month stays a day
        let p = period(day(2020, Month::January, 1), day(2020, Month::January, 1));
        assert_eq!(p.to_least_granular(), p);

        // February in a leap year collapses through the day level
        let p = period(day(2020, Month::February, 1), day(2020, Month::February, 29));
        assert_eq!(
            p.to_least_granular(),
            period(month(2020, Month::February), month(2020, Month::February))
        );

        // An open bound stays open while the other side collapses
        let p = period(UnitOfTime::calendar_unbounded(), day(2020, Month::December, 31));
        assert_eq!(
            p.to_least_granular(),
            period(
                UnitOfTime::calendar_unbounded(),
                UnitOfTime::calendar_year(2020).unwrap()
            )
        );

        // Fully open periods come back unchanged
        let p = period(
            UnitOfTime::calendar_unbounded(),
            UnitOfTime::calendar_unbounded(),
        );
        assert_eq!(p.to_least_granular(), p);
    }

    #[test]
    fn round_trip_through_least_granular() {
        // Expanding the collapsed period re-covers the identical span
        for p in [
            period(day(2020, Month::January, 1), day(2020, Month::December, 31)),
            period(day(2020, Month::April, 1), day(2020, Month::June, 30)),
            period(day(2020, Month::June, 5), day(2020, Month::July, 20)),
            period(month(2020, Month::January), month(2021, Month::March)),
        ] {
            assert_eq!(p.to_least_granular().to_most_granular(), p.to_most_granular());
        }
    }

    #[test]
    fn all_granularities() {
        let p = period(quarter(2020, QuarterNumber::Q1), quarter(2020, QuarterNumber::Q2));

        let all = p.to_all_granularities(true);
        assert_eq!(all.len(), 3);
        assert!(all.contains(&p));
        assert!(all.contains(&p.to_most_granular()));
        assert!(all.contains(&period(month(2020, Month::January), month(2020, Month::June))));

        let all = p.to_all_granularities(false);
        assert_eq!(all.len(), 2);
        assert!(!all.contains(&p));

        let finer = p.to_all_more_granular(false);
        assert_eq!(finer.len(), 2);
        let coarser = p.to_all_less_granular(false);
        // Q2 is not a year end, so there is nothing coarser
        assert!(coarser.is_empty());

        let coarser = period(month(2020, Month::January), month(2020, Month::December))
            .to_all_less_granular(false);
        assert_eq!(coarser.len(), 2); // quarters and years
    }

    #[test]
    fn adjustment() {
        // Two quarters back on the start of a fiscal month period
        let p = period(
            UnitOfTime::fiscal_month(2016, MonthNumber::Four).unwrap(),
            UnitOfTime::fiscal_month(2017, MonthNumber::Eleven).unwrap(),
        );
        let adjusted = p
            .clone_with_adjustment(
                ReportingPeriodComponent::Start,
                -2,
                UnitOfTimeGranularity::Quarter,
            )
            .unwrap();
        assert_eq!(
            adjusted.start(),
            UnitOfTime::fiscal_month(2015, MonthNumber::Ten).unwrap()
        );
        assert_eq!(adjusted.end(), p.end());
        // The original is untouched
        assert_eq!(
            p.start(),
            UnitOfTime::fiscal_month(2016, MonthNumber::Four).unwrap()
        );

        // Both components shift by the same amount
        let p = period(month(2020, Month::November), month(2021, Month::February));
        let adjusted = p
            .clone_with_adjustment(
                ReportingPeriodComponent::Both,
                3,
                UnitOfTimeGranularity::Month,
            )
            .unwrap();
        assert_eq!(
            adjusted,
            period(month(2021, Month::February), month(2021, Month::May))
        );
    }

    #[test]
    fn adjustment_preconditions() {
        let p = period(quarter(2020, QuarterNumber::Q1), quarter(2020, QuarterNumber::Q4));

        // Finer units than the component cannot be applied
        assert_eq!(
            p.clone_with_adjustment(
                ReportingPeriodComponent::Start,
                3,
                UnitOfTimeGranularity::Day
            ),
            Err(Error::GranularityMismatch {
                component: UnitOfTimeGranularity::Quarter,
                units: UnitOfTimeGranularity::Day,
            })
        );

        // Unbounded adjustment granularity is meaningless
        assert_eq!(
            p.clone_with_adjustment(
                ReportingPeriodComponent::End,
                1,
                UnitOfTimeGranularity::Unbounded
            ),
            Err(Error::InvalidGranularity)
        );

        // As is adjusting an open bound
        let open = period(UnitOfTime::calendar_unbounded(), quarter(2020, QuarterNumber::Q4));
        assert_eq!(
            open.clone_with_adjustment(
                ReportingPeriodComponent::Start,
                1,
                UnitOfTimeGranularity::Quarter
            ),
            Err(Error::IllegalAdjustment)
        );
        assert_eq!(
            open.clone_with_adjustment(
                ReportingPeriodComponent::Both,
                1,
                UnitOfTimeGranularity::Quarter
            ),
            Err(Error::IllegalAdjustment)
        );

        // An adjustment that would cross the bounds is rejected whole
        assert_eq!(
            p.clone_with_adjustment(
                ReportingPeriodComponent::Start,
                4,
                UnitOfTimeGranularity::Year
            ),
            Err(Error::InvalidPeriodOrdering)
        );
    }

    proptest! {
        /// Adding N months to the start and then taking them away again is
        /// the identity, whenever both steps keep the period well ordered.
        #[test]
        fn prop_adjustment_inverts(n in -36i32..36) {
            let p = period(
                month(2000, Month::June),
                month(2010, Month::June),
            );
            if let Ok(shifted) = p.clone_with_adjustment(
                ReportingPeriodComponent::Start,
                n,
                UnitOfTimeGranularity::Month,
            ) {
                let back = shifted
                    .clone_with_adjustment(
                        ReportingPeriodComponent::Start,
                        -n,
                        UnitOfTimeGranularity::Month,
                    )
                    .unwrap();
                prop_assert_eq!(back, p);
            }
        }
    }

    #[test]
    fn merge() {
        // Mixed granularity inputs force a day level result
        let months = period(month(2020, Month::February), month(2020, Month::April));
        let days = period(day(2020, Month::June, 5), day(2020, Month::July, 20));
        let merged = ReportingPeriod::merge_into_extremal(&[months, days]).unwrap();
        assert_eq!(
            merged,
            period(day(2020, Month::February, 1), day(2020, Month::July, 20))
        );

        // Uniform granularity inputs keep it
        let a = period(quarter(2019, QuarterNumber::Q2), quarter(2019, QuarterNumber::Q4));
        let b = period(quarter(2019, QuarterNumber::Q1), quarter(2019, QuarterNumber::Q2));
        let merged = ReportingPeriod::merge_into_extremal(&[a, b]).unwrap();
        assert_eq!(
            merged,
            period(quarter(2019, QuarterNumber::Q1), quarter(2019, QuarterNumber::Q4))
        );

        // An open bound wins its end of the merge outright
        let open = period(UnitOfTime::calendar_unbounded(), quarter(2019, QuarterNumber::Q1));
        let merged = ReportingPeriod::merge_into_extremal(&[a, open]).unwrap();
        assert_eq!(
            merged,
            period(UnitOfTime::calendar_unbounded(), quarter(2019, QuarterNumber::Q4))
        );
    }

    #[test]
    fn merge_rejects_bad_input() {
        assert_eq!(
            ReportingPeriod::merge_into_extremal(&[]),
            Err(Error::EmptyInput)
        );

        let calendar = period(month(2020, Month::February), month(2020, Month::April));
        let fiscal = period(
            UnitOfTime::fiscal_month(2020, MonthNumber::Two).unwrap(),
            UnitOfTime::fiscal_month(2020, MonthNumber::Four).unwrap(),
        );
        assert_eq!(
            ReportingPeriod::merge_into_extremal(&[calendar, fiscal]),
            Err(Error::MixedKind)
        );
    }

    #[test]
    fn permutations() {
        let p = period(month(2020, Month::January), month(2020, Month::March));
        let permutations = p.create_permutations(2).unwrap();

        // Ordered by start unit, then by span length
        let jan = month(2020, Month::January);
        let feb = month(2020, Month::February);
        let mar = month(2020, Month::March);
        assert_eq!(
            permutations,
            vec![
                period(jan, jan),
                period(jan, feb),
                period(feb, feb),
                period(feb, mar),
                period(mar, mar),
            ]
        );

        // Spanning k units with max m < k yields sum over len of (k - len + 1)
        let p = period(month(2020, Month::January), month(2020, Month::May));
        assert_eq!(p.create_permutations(3).unwrap().len(), 5 + 4 + 3);
        // With max >= k every sub-period appears
        assert_eq!(p.create_permutations(5).unwrap().len(), 5 + 4 + 3 + 2 + 1);

        // A mixed granularity period permutes at its finer granularity
        let p = period(UnitOfTime::calendar_year(2020).unwrap(), month(2021, Month::February));
        assert_eq!(p.create_permutations(14).unwrap().len(), (1..=14).sum::<usize>());
    }

    #[test]
    fn permutations_preconditions() {
        let p = period(month(2020, Month::January), month(2020, Month::March));
        assert_eq!(p.create_permutations(0), Err(Error::InvalidArgument));

        let open = period(UnitOfTime::calendar_unbounded(), month(2020, Month::March));
        assert_eq!(open.create_permutations(2), Err(Error::UnboundedPeriod));
    }

    #[test]
    fn containment() {
        let year = period(
            UnitOfTime::calendar_year(2020).unwrap(),
            UnitOfTime::calendar_year(2020).unwrap(),
        );
        let q2 = period(quarter(2020, QuarterNumber::Q2), quarter(2020, QuarterNumber::Q2));
        assert!(year.contains(&q2).unwrap());
        assert!(!q2.contains(&year).unwrap());
        assert!(year.contains(&year).unwrap());

        // An open period contains everything on its open side
        let open = period(UnitOfTime::calendar_unbounded(), UnitOfTime::calendar_unbounded());
        assert!(open.contains(&year).unwrap());
        assert!(!year.contains(&open).unwrap());

        let fiscal = period(
            UnitOfTime::fiscal_year(2020).unwrap(),
            UnitOfTime::fiscal_year(2020).unwrap(),
        );
        assert_eq!(year.contains(&fiscal), Err(Error::MixedKind));
    }

    #[test]
    fn equality_ignoring_granularity() {
        let year = period(
            UnitOfTime::calendar_year(2020).unwrap(),
            UnitOfTime::calendar_year(2020).unwrap(),
        );
        let days = period(day(2020, Month::January, 1), day(2020, Month::December, 31));
        let quarters = period(quarter(2020, QuarterNumber::Q1), quarter(2020, QuarterNumber::Q4));

        assert!(year.is_equal_ignoring_granularity(&days).unwrap());
        assert!(year.is_equal_ignoring_granularity(&quarters).unwrap());

        let shorter = period(day(2020, Month::January, 1), day(2020, Month::December, 30));
        assert!(!year.is_equal_ignoring_granularity(&shorter).unwrap());
    }

    #[test]
    fn format() {
        let p = period(month(2020, Month::January), month(2020, Month::March));
        assert_eq!(format!("{p}"), "2020-01 to 2020-03");

        let open = period(UnitOfTime::calendar_unbounded(), month(2020, Month::March));
        assert_eq!(format!("{open}"), "unbounded to 2020-03");
    }
}
