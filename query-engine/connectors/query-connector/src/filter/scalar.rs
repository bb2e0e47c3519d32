use query_value::QueryValue;

/// Filtering with a scalar value. From a GraphQL point of view this is in the
/// head of the query:
///
/// ```graphql
/// findManyUser(where: { id: 5 })
/// ```
///
/// This translates to a `ScalarFilter` on the `id` column with
/// `ScalarCondition::Equals(5)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScalarFilter {
    pub field: String,
    pub condition: ScalarCondition,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarCondition {
    Equals(QueryValue),
    NotEquals(QueryValue),
    LessThan(QueryValue),
    GreaterThan(QueryValue),
    In(Vec<QueryValue>),
    NotIn(Vec<QueryValue>),
    IsNull(bool),
}

impl ScalarCondition {
    /// Returns the negated condition.
    pub fn invert(self, invert: bool) -> Self {
        if !invert {
            return self;
        }

        match self {
            Self::Equals(v) => Self::NotEquals(v),
            Self::NotEquals(v) => Self::Equals(v),
            Self::In(v) => Self::NotIn(v),
            Self::NotIn(v) => Self::In(v),
            Self::IsNull(b) => Self::IsNull(!b),
            // Without a total order on nulls these have no clean inverse.
            cond @ (Self::LessThan(_) | Self::GreaterThan(_)) => cond,
        }
    }
}
