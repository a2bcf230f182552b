//! Conjunctive filtering over decoded replay records.
//!
//! A [`Criterion`] is a pure predicate over a [`ReplayRecord`]. The
//! [`CriteriaFilter`] applies an ordered list of criteria as a logical AND,
//! short-circuiting on the first failing predicate. Evaluation order never
//! changes membership, and the returned collection preserves the order of
//! the input collection.
//!
//! # Example
//!
//! ```
//! use spyparty_parser::filter::CriteriaFilter;
//! use spyparty_parser::ReplayRecord;
//!
//! let mut filter = CriteriaFilter::new();
//! filter.push(|record: &ReplayRecord| record.venue == "Ballroom");
//! filter.push(|record: &ReplayRecord| record.result.is_spy_win());
//!
//! let records: Vec<ReplayRecord> = Vec::new();
//! let ballroom_spy_wins = filter.apply(records);
//! assert!(ballroom_spy_wins.is_empty());
//! ```

use crate::record::ReplayRecord;

/// A caller-supplied predicate over a decoded record.
///
/// Criteria must be pure: they are evaluated in order with short-circuit
/// semantics and may be skipped entirely once an earlier criterion fails.
pub type Criterion = Box<dyn Fn(&ReplayRecord) -> bool>;

/// An ordered conjunction of criteria.
///
/// An empty filter is the identity: it matches every record.
#[derive(Default)]
pub struct CriteriaFilter {
    criteria: Vec<Criterion>,
}

impl CriteriaFilter {
    /// Creates an empty filter that matches every record.
    #[must_use]
    pub fn new() -> Self {
        CriteriaFilter::default()
    }

    /// Creates a filter from an existing list of criteria.
    #[must_use]
    pub fn with_criteria(criteria: Vec<Criterion>) -> Self {
        CriteriaFilter { criteria }
    }

    /// Appends a criterion to the conjunction.
    pub fn push<F>(&mut self, criterion: F)
    where
        F: Fn(&ReplayRecord) -> bool + 'static,
    {
        self.criteria.push(Box::new(criterion));
    }

    /// Returns the number of criteria in the conjunction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Returns whether the filter has no criteria.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Returns whether a record satisfies every criterion.
    ///
    /// Short-circuits on the first failing criterion.
    #[must_use]
    pub fn matches(&self, record: &ReplayRecord) -> bool {
        self.criteria.iter().all(|criterion| criterion(record))
    }

    /// Returns exactly the records satisfying every criterion, in input
    /// order.
    #[must_use]
    pub fn apply<I>(&self, records: I) -> Vec<ReplayRecord>
    where
        I: IntoIterator<Item = ReplayRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }

    /// Borrowing variant of [`CriteriaFilter::apply`].
    #[must_use]
    pub fn apply_ref<'a, I>(&self, records: I) -> Vec<&'a ReplayRecord>
    where
        I: IntoIterator<Item = &'a ReplayRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

impl std::fmt::Debug for CriteriaFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriteriaFilter")
            .field("criteria", &self.criteria.len())
            .finish()
    }
}
