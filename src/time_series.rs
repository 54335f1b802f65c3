use crate::{AccountingPeriodError, ReportingPeriod};

/// How [`TimeSeries::get_matching_datapoints`] compares a datapoint's period
/// against the query period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportingPeriodComparison {
    /// Match datapoints whose period chronologically covers the whole query
    /// period
    Contains,
    /// Match datapoints whose period denotes exactly the query's span,
    /// whatever granularity either happens to be expressed at
    IsEqualToIgnoringGranularity,
}

/// A reporting period paired with the value reported over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datapoint<T> {
    reporting_period: ReportingPeriod,
    value: T,
}

impl<T> Datapoint<T> {
    pub fn new(reporting_period: ReportingPeriod, value: T) -> Self {
        Self {
            reporting_period,
            value,
        }
    }

    pub fn reporting_period(&self) -> ReportingPeriod {
        self.reporting_period
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

/// # TimeSeries
///
/// An ordered collection of datapoints. The series imposes no uniqueness on
/// the periods it holds: overlapping or duplicate periods are the caller's
/// business. Matching is a linear scan; the series is never indexed or
/// persisted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeries<T> {
    datapoints: Vec<Datapoint<T>>,
}

impl<T> TimeSeries<T> {
    pub fn new(datapoints: Vec<Datapoint<T>>) -> Self {
        Self { datapoints }
    }

    pub fn datapoints(&self) -> &[Datapoint<T>] {
        &self.datapoints
    }

    pub fn len(&self) -> usize {
        self.datapoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datapoints.is_empty()
    }

    /// Every datapoint whose period matches `reporting_period` under the
    /// chosen comparison, in series order. An empty series yields an empty
    /// result; a datapoint of a different kind than the query is an error,
    /// since periods of different kinds have no chronological relation.
    pub fn get_matching_datapoints(
        &self,
        reporting_period: &ReportingPeriod,
        comparison: ReportingPeriodComparison,
    ) -> Result<Vec<&Datapoint<T>>, AccountingPeriodError> {
        let mut matches = Vec::new();
        for datapoint in &self.datapoints {
            let hit = match comparison {
                ReportingPeriodComparison::Contains => {
                    datapoint.reporting_period.contains(reporting_period)?
                }
                ReportingPeriodComparison::IsEqualToIgnoringGranularity => datapoint
                    .reporting_period
                    .is_equal_ignoring_granularity(reporting_period)?,
            };
            if hit {
                matches.push(datapoint);
            }
        }
        Ok(matches)
    }
}
