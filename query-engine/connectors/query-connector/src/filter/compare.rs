use super::*;
use query_value::QueryValue;

/// A scalar column of a model, the left-hand side of every scalar filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScalarField {
    model: String,
    name: String,
}

impl ScalarField {
    pub fn new(model: impl Into<String>, name: impl Into<String>) -> Self {
        ScalarField {
            model: model.into(),
            name: name.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Comparing methods for scalar fields.
pub trait ScalarCompare {
    fn is_in<I, T>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryValue>;

    fn not_in<I, T>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryValue>;

    fn equals<T>(&self, val: T) -> Filter
    where
        T: Into<QueryValue>;

    fn not_equals<T>(&self, val: T) -> Filter
    where
        T: Into<QueryValue>;

    fn less_than<T>(&self, val: T) -> Filter
    where
        T: Into<QueryValue>;

    fn greater_than<T>(&self, val: T) -> Filter
    where
        T: Into<QueryValue>;

    fn is_null(&self) -> Filter;

    fn is_not_null(&self) -> Filter;
}

impl ScalarField {
    fn filter(&self, condition: ScalarCondition) -> Filter {
        Filter::from(ScalarFilter {
            field: self.name.clone(),
            condition,
        })
    }
}

impl ScalarCompare for ScalarField {
    /// Field is in a given value
    fn is_in<I, T>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryValue>,
    {
        self.filter(ScalarCondition::In(values.into_iter().map(Into::into).collect()))
    }

    /// Field is not in a given value
    fn not_in<I, T>(&self, values: I) -> Filter
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryValue>,
    {
        self.filter(ScalarCondition::NotIn(values.into_iter().map(Into::into).collect()))
    }

    /// Field equals the given value.
    fn equals<T>(&self, val: T) -> Filter
    where
        T: Into<QueryValue>,
    {
        self.filter(ScalarCondition::Equals(val.into()))
    }

    /// Field does not equal the given value.
    fn not_equals<T>(&self, val: T) -> Filter
    where
        T: Into<QueryValue>,
    {
        self.filter(ScalarCondition::NotEquals(val.into()))
    }

    /// Field is less than the given value.
    fn less_than<T>(&self, val: T) -> Filter
    where
        T: Into<QueryValue>,
    {
        self.filter(ScalarCondition::LessThan(val.into()))
    }

    /// Field is greater than the given value.
    fn greater_than<T>(&self, val: T) -> Filter
    where
        T: Into<QueryValue>,
    {
        self.filter(ScalarCondition::GreaterThan(val.into()))
    }

    fn is_null(&self) -> Filter {
        self.filter(ScalarCondition::IsNull(true))
    }

    fn is_not_null(&self) -> Filter {
        self.filter(ScalarCondition::IsNull(false))
    }
}
