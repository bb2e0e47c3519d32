use crate::{
    ast::{Compare, ConditionTree},
    value::to_sql_value,
};
use query_connector::{Filter, ScalarCondition, ScalarFilter};

/// Lowers connector filters into SQL condition trees.
pub(crate) trait FilterVisitorExt {
    fn visit_filter(&mut self, filter: &Filter) -> crate::Result<ConditionTree>;
    fn visit_scalar_filter(&mut self, filter: &ScalarFilter) -> crate::Result<ConditionTree>;
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FilterVisitor;

impl FilterVisitorExt for FilterVisitor {
    fn visit_filter(&mut self, filter: &Filter) -> crate::Result<ConditionTree> {
        let tree = match filter {
            Filter::And(filters) => match filters.as_slice() {
                [] => ConditionTree::NoCondition,
                [single] => self.visit_filter(single)?,
                _ => ConditionTree::And(
                    filters
                        .iter()
                        .map(|f| self.visit_filter(f))
                        .collect::<crate::Result<Vec<_>>>()?,
                ),
            },
            Filter::Or(filters) => match filters.as_slice() {
                [] => ConditionTree::NegativeCondition,
                [single] => self.visit_filter(single)?,
                _ => ConditionTree::Or(
                    filters
                        .iter()
                        .map(|f| self.visit_filter(f))
                        .collect::<crate::Result<Vec<_>>>()?,
                ),
            },
            // NOT [a, b] holds when neither a nor b does.
            Filter::Not(filters) => match filters.as_slice() {
                [] => ConditionTree::NoCondition,
                [single] => self.visit_filter(single)?.not(),
                _ => {
                    let mut exprs = Vec::with_capacity(filters.len());

                    for filter in filters {
                        exprs.push(self.visit_filter(filter)?.not());
                    }

                    ConditionTree::And(exprs)
                }
            },
            Filter::Scalar(filter) => self.visit_scalar_filter(filter)?,
            Filter::BoolFilter(true) => ConditionTree::NoCondition,
            Filter::BoolFilter(false) => ConditionTree::NegativeCondition,
        };

        Ok(tree)
    }

    fn visit_scalar_filter(&mut self, filter: &ScalarFilter) -> crate::Result<ConditionTree> {
        let column = filter.field.clone();

        let compare = match &filter.condition {
            // `NULL = x` is never true, so nulls go through IS NULL instead.
            ScalarCondition::Equals(v) if v.is_null() => Compare::Null(column),
            ScalarCondition::NotEquals(v) if v.is_null() => Compare::NotNull(column),
            ScalarCondition::Equals(v) => Compare::Equals(column, to_sql_value(v)?),
            ScalarCondition::NotEquals(v) => Compare::NotEquals(column, to_sql_value(v)?),
            ScalarCondition::LessThan(v) => Compare::LessThan(column, to_sql_value(v)?),
            ScalarCondition::GreaterThan(v) => Compare::GreaterThan(column, to_sql_value(v)?),
            ScalarCondition::In(values) if values.is_empty() => return Ok(ConditionTree::NegativeCondition),
            ScalarCondition::NotIn(values) if values.is_empty() => return Ok(ConditionTree::NoCondition),
            ScalarCondition::In(values) => Compare::In(column, sql_values(values)?),
            ScalarCondition::NotIn(values) => Compare::NotIn(column, sql_values(values)?),
            ScalarCondition::IsNull(true) => Compare::Null(column),
            ScalarCondition::IsNull(false) => Compare::NotNull(column),
        };

        Ok(ConditionTree::Single(compare))
    }
}

fn sql_values(values: &[query_value::QueryValue]) -> crate::Result<Vec<rusqlite::types::Value>> {
    values.iter().map(to_sql_value).collect()
}
