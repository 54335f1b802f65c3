//! Fiscal anchoring and kind re-tagging.
//!
//! A fiscal year is pinned to the calendar by its anchor: the calendar
//! quarter in which the fiscal year's first quarter falls. With an anchor of
//! Q2, fiscal 2020 runs from calendar Q2 2020 through calendar Q1 2021.
//! Converting a quarter between the fiscal and calendar worlds is modular
//! arithmetic on the quarter number plus a year carry, and the two
//! directions are exact mutual inverses for every anchor.
//!
//! Generic units carry no calendar meaning, so moving between generic and
//! either other kind is a plain re-tag with no arithmetic at all.

use crate::unit_of_time::{month_from_position, month_number_from_position, QuarterNumber, Year};
use crate::UnitOfTime;

/// Fiscal to calendar: offset the quarter number by the anchor, carrying
/// into the next calendar year when the offset rolls past Q4
pub(crate) fn fiscal_to_calendar(
    year: Year,
    quarter: QuarterNumber,
    anchor: QuarterNumber,
) -> Option<(Year, QuarterNumber)> {
    let offset = i32::from(quarter.number()) - 1 + i32::from(anchor.number()) - 1;
    let quarter = QuarterNumber::try_from((offset % 4) as u8 + 1).ok()?;
    let year = Year::new(year.get() + offset / 4).ok()?;
    Some((year, quarter))
}

/// Calendar to fiscal: the exact inverse of [`fiscal_to_calendar`],
/// borrowing from the prior year when the conversion walks back past Q1
pub(crate) fn calendar_to_fiscal(
    year: Year,
    quarter: QuarterNumber,
    anchor: QuarterNumber,
) -> Option<(Year, QuarterNumber)> {
    let diff = (i32::from(quarter.number()) - i32::from(anchor.number())).rem_euclid(4);
    let fiscal_quarter = QuarterNumber::try_from(diff as u8 + 1).ok()?;
    // Undo the carry the forward direction would have applied
    let carry = (diff + i32::from(anchor.number()) - 1) / 4;
    let year = Year::new(year.get() - carry).ok()?;
    Some((year, fiscal_quarter))
}

impl UnitOfTime {
    // region: kind conversion
    /// Re-anchor a fiscal quarter onto the calendar. `anchor` is the
    /// calendar quarter in which the fiscal year starts. Returns `None`
    /// unless this unit is a fiscal quarter, or when the carried year falls
    /// outside the supported range.
    pub fn to_calendar_quarter(&self, anchor: QuarterNumber) -> Option<Self> {
        match *self {
            Self::FiscalQuarter { year, quarter } => {
                let (year, quarter) = fiscal_to_calendar(year, quarter, anchor)?;
                Some(Self::CalendarQuarter { year, quarter })
            }
            _ => None,
        }
    }

    /// Re-anchor a calendar quarter into the fiscal year whose first quarter
    /// falls in calendar quarter `anchor`. The inverse of
    /// [`Self::to_calendar_quarter`] for every anchor.
    pub fn to_fiscal_quarter(&self, anchor: QuarterNumber) -> Option<Self> {
        match *self {
            Self::CalendarQuarter { year, quarter } => {
                let (year, quarter) = calendar_to_fiscal(year, quarter, anchor)?;
                Some(Self::FiscalQuarter { year, quarter })
            }
            _ => None,
        }
    }

    /// Strip the calendar or fiscal meaning off a unit, keeping its numeric
    /// shape. Lossless for months, quarters, years and unbounded units;
    /// `None` for a calendar day, which has no generic counterpart.
    pub fn to_generic(&self) -> Option<Self> {
        match *self {
            Self::CalendarMonth {
                year,
                month_of_year,
            } => Some(Self::GenericMonth {
                year,
                month_number: month_number_from_position(month_of_year as u8),
            }),
            Self::FiscalMonth { year, month_number } => {
                Some(Self::GenericMonth { year, month_number })
            }
            Self::CalendarQuarter { year, quarter } | Self::FiscalQuarter { year, quarter } => {
                Some(Self::GenericQuarter { year, quarter })
            }
            Self::CalendarYear { year } | Self::FiscalYear { year } => {
                Some(Self::GenericYear { year })
            }
            Self::CalendarUnbounded | Self::FiscalUnbounded => Some(Self::GenericUnbounded),
            Self::GenericMonth { .. }
            | Self::GenericQuarter { .. }
            | Self::GenericYear { .. }
            | Self::GenericUnbounded => Some(*self),
            Self::CalendarDay(_) => None,
        }
    }

    /// Give a generic unit calendar meaning; a generic month number N
    /// becomes the Nth calendar month. Calendar units pass through; fiscal
    /// units need an anchor and are `None` here.
    pub fn to_calendar(&self) -> Option<Self> {
        match *self {
            Self::GenericMonth { year, month_number } => Some(Self::CalendarMonth {
                year,
                month_of_year: month_from_position(month_number.number()),
            }),
            Self::GenericQuarter { year, quarter } => {
                Some(Self::CalendarQuarter { year, quarter })
            }
            Self::GenericYear { year } => Some(Self::CalendarYear { year }),
            Self::GenericUnbounded => Some(Self::CalendarUnbounded),
            Self::CalendarDay(_)
            | Self::CalendarMonth { .. }
            | Self::CalendarQuarter { .. }
            | Self::CalendarYear { .. }
            | Self::CalendarUnbounded => Some(*self),
            Self::FiscalMonth { .. }
            | Self::FiscalQuarter { .. }
            | Self::FiscalYear { .. }
            | Self::FiscalUnbounded => None,
        }
    }

    /// Give a generic unit fiscal meaning. Fiscal units pass through;
    /// calendar units need an anchor and are `None` here.
    pub fn to_fiscal(&self) -> Option<Self> {
        match *self {
            Self::GenericMonth { year, month_number } => {
                Some(Self::FiscalMonth { year, month_number })
            }
            Self::GenericQuarter { year, quarter } => Some(Self::FiscalQuarter { year, quarter }),
            Self::GenericYear { year } => Some(Self::FiscalYear { year }),
            Self::GenericUnbounded => Some(Self::FiscalUnbounded),
            Self::FiscalMonth { .. }
            | Self::FiscalQuarter { .. }
            | Self::FiscalYear { .. }
            | Self::FiscalUnbounded => Some(*self),
            Self::CalendarDay(_)
            | Self::CalendarMonth { .. }
            | Self::CalendarQuarter { .. }
            | Self::CalendarYear { .. }
            | Self::CalendarUnbounded => None,
        }
    }
    // endregion kind conversion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_of_time::MonthNumber;
    use proptest::prelude::*;
    use time::Month;

    fn fiscal_quarter(year: i32, quarter: QuarterNumber) -> UnitOfTime {
        UnitOfTime::fiscal_quarter(year, quarter).unwrap()
    }

    fn calendar_quarter(year: i32, quarter: QuarterNumber) -> UnitOfTime {
        UnitOfTime::calendar_quarter(year, quarter).unwrap()
    }

    #[test]
    fn anchored_on_q1_is_the_identity() {
        for quarter in [
            QuarterNumber::Q1,
            QuarterNumber::Q2,
            QuarterNumber::Q3,
            QuarterNumber::Q4,
        ] {
            let fq = fiscal_quarter(2020, quarter);
            assert_eq!(
                fq.to_calendar_quarter(QuarterNumber::Q1),
                Some(calendar_quarter(2020, quarter))
            );
        }
    }

    #[test]
    fn anchor_shifts_and_carries() {
        // Fiscal 2020 anchored on calendar Q2: Q1->Q2 2020, Q4->Q1 2021
        assert_eq!(
            fiscal_quarter(2020, QuarterNumber::Q1).to_calendar_quarter(QuarterNumber::Q2),
            Some(calendar_quarter(2020, QuarterNumber::Q2))
        );
        assert_eq!(
            fiscal_quarter(2020, QuarterNumber::Q4).to_calendar_quarter(QuarterNumber::Q2),
            Some(calendar_quarter(2021, QuarterNumber::Q1))
        );

        // ... and back again
        assert_eq!(
            calendar_quarter(2021, QuarterNumber::Q1).to_fiscal_quarter(QuarterNumber::Q2),
            Some(fiscal_quarter(2020, QuarterNumber::Q4))
        );

        // Anchored on Q4, only fiscal Q1 stays in the base year
        assert_eq!(
            fiscal_quarter(2020, QuarterNumber::Q2).to_calendar_quarter(QuarterNumber::Q4),
            Some(calendar_quarter(2021, QuarterNumber::Q1))
        );
    }

    #[test]
    fn conversion_only_applies_to_quarters() {
        let month = UnitOfTime::calendar_month(2020, Month::June).unwrap();
        assert_eq!(month.to_calendar_quarter(QuarterNumber::Q1), None);
        assert_eq!(month.to_fiscal_quarter(QuarterNumber::Q1), None);

        // Wrong direction is also None
        let cq = calendar_quarter(2020, QuarterNumber::Q2);
        assert_eq!(cq.to_calendar_quarter(QuarterNumber::Q2), None);
    }

    #[test]
    fn carry_at_the_year_range_edge_is_rejected() {
        assert_eq!(
            fiscal_quarter(9999, QuarterNumber::Q4).to_calendar_quarter(QuarterNumber::Q2),
            None
        );
        assert_eq!(
            calendar_quarter(1, QuarterNumber::Q1).to_fiscal_quarter(QuarterNumber::Q2),
            None
        );
    }

    #[test]
    fn generic_retagging() {
        let month = UnitOfTime::calendar_month(2020, Month::April).unwrap();
        let generic = month.to_generic().unwrap();
        assert_eq!(
            generic,
            UnitOfTime::generic_month(2020, MonthNumber::Four).unwrap()
        );
        assert_eq!(generic.to_calendar(), Some(month));
        assert_eq!(
            generic.to_fiscal(),
            Some(UnitOfTime::fiscal_month(2020, MonthNumber::Four).unwrap())
        );

        // A day has no generic counterpart; fiscal to calendar needs an anchor
        let day = UnitOfTime::calendar_day(2020, Month::April, 5).unwrap();
        assert_eq!(day.to_generic(), None);
        let fy = UnitOfTime::fiscal_year(2020).unwrap();
        assert_eq!(fy.to_calendar(), None);
        assert_eq!(
            fy.to_generic().unwrap(),
            UnitOfTime::generic_year(2020).unwrap()
        );
    }

    proptest! {
        /// For any anchor and any quarter, fiscal -> calendar -> fiscal is
        /// the identity, and so is the reverse chain.
        #[test]
        fn prop_anchor_conversion_round_trips(
            year in 1900i32..2200,
            quarter in 1u8..=4,
            anchor in 1u8..=4,
        ) {
            let quarter = QuarterNumber::try_from(quarter).unwrap();
            let anchor = QuarterNumber::try_from(anchor).unwrap();

            let fq = fiscal_quarter(year, quarter);
            let there_and_back = fq
                .to_calendar_quarter(anchor)
                .and_then(|cq| cq.to_fiscal_quarter(anchor));
            prop_assert_eq!(there_and_back, Some(fq));

            let cq = calendar_quarter(year, quarter);
            let back_and_there = cq
                .to_fiscal_quarter(anchor)
                .and_then(|fq| fq.to_calendar_quarter(anchor));
            prop_assert_eq!(back_and_there, Some(cq));
        }
    }
}
