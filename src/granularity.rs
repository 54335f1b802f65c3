use core::fmt;

use crate::AccountingPeriodError;

/// # UnitOfTimeGranularity
///
/// The precision of a unit of time, ordered on a five position chain:
///
/// `Day < Month < Quarter < Year < Unbounded`
///
/// where "less than" reads as "more granular than". `Unbounded` is the open
/// bound: it carries no numeric fields and stands for "no boundary at all"
/// when used as the start or end of a reporting period.
///
/// All comparisons are resolved by position in the chain, so adding a new
/// granularity means extending [`Self::CHAIN`] rather than touching every
/// pairwise branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitOfTimeGranularity {
    Day,
    Month,
    Quarter,
    Year,
    Unbounded,
}

impl UnitOfTimeGranularity {
    /// The whole chain, finest first.
    pub(crate) const CHAIN: [UnitOfTimeGranularity; 5] = [
        UnitOfTimeGranularity::Day,
        UnitOfTimeGranularity::Month,
        UnitOfTimeGranularity::Quarter,
        UnitOfTimeGranularity::Year,
        UnitOfTimeGranularity::Unbounded,
    ];

    /// Position in the chain: 0 for the finest (day), 4 for unbounded.
    pub(crate) fn rank(self) -> usize {
        self as usize
    }

    // region: comparisons
    /// Is this granularity coarser than `other`?
    pub fn is_less_granular_than(self, other: Self) -> bool {
        self.rank() > other.rank()
    }

    /// Is this granularity finer than `other`?
    pub fn is_more_granular_than(self, other: Self) -> bool {
        self.rank() < other.rank()
    }

    pub fn is_as_granular_or_less_granular_than(self, other: Self) -> bool {
        self.rank() >= other.rank()
    }

    pub fn is_as_granular_or_more_granular_than(self, other: Self) -> bool {
        self.rank() <= other.rank()
    }

    /// True only for [`Self::Day`], the finest granularity there is.
    pub fn is_most_granular(self) -> bool {
        self == UnitOfTimeGranularity::Day
    }

    /// True only for [`Self::Unbounded`], the coarsest granularity there is.
    pub fn is_least_granular(self) -> bool {
        self == UnitOfTimeGranularity::Unbounded
    }
    // endregion comparisons

    // region: stepping
    /// Step exactly one position towards the fine end of the chain
    pub fn one_notch_more_granular(self) -> Result<Self, AccountingPeriodError> {
        if self.is_most_granular() {
            return Err(AccountingPeriodError::NoFinerGranularity);
        }
        Ok(Self::CHAIN[self.rank() - 1])
    }

    /// Step exactly one position towards the coarse end of the chain
    pub fn one_notch_less_granular(self) -> Result<Self, AccountingPeriodError> {
        if self.is_least_granular() {
            return Err(AccountingPeriodError::NoCoarserGranularity);
        }
        Ok(Self::CHAIN[self.rank() + 1])
    }
    // endregion stepping
}

impl fmt::Display for UnitOfTimeGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnitOfTimeGranularity::Day => "day",
            UnitOfTimeGranularity::Month => "month",
            UnitOfTimeGranularity::Quarter => "quarter",
            UnitOfTimeGranularity::Year => "year",
            UnitOfTimeGranularity::Unbounded => "unbounded",
        };
        f.write_str(text)
    }
}
