//! Filtering types to select records from the database
//!
//! The creation of the types should be done with
//! [ScalarCompare](crate::ScalarCompare).

mod compare;
mod scalar;

pub use compare::*;
pub use scalar::*;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Vec<Filter>),
    Scalar(ScalarFilter),
    BoolFilter(bool),
}

impl Filter {
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    pub fn not(filters: Vec<Filter>) -> Self {
        Filter::Not(filters)
    }

    /// A filter matching every record.
    pub fn empty() -> Self {
        Filter::BoolFilter(true)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Filter::BoolFilter(true))
    }

    /// Combines two filters with AND, skipping sides that match everything.
    pub fn and_also(self, other: Filter) -> Self {
        match (self, other) {
            (left, right) if right.is_empty() => left,
            (left, right) if left.is_empty() => right,
            (Filter::And(mut filters), right) => {
                filters.push(right);
                Filter::And(filters)
            }
            (left, right) => Filter::And(vec![left, right]),
        }
    }
}

impl From<ScalarFilter> for Filter {
    fn from(sf: ScalarFilter) -> Self {
        Filter::Scalar(sf)
    }
}

impl From<bool> for Filter {
    fn from(b: bool) -> Self {
        Filter::BoolFilter(b)
    }
}
