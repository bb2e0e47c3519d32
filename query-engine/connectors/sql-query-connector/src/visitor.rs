use crate::ast::{Compare, ConditionTree, Select};
use itertools::Itertools;
use rusqlite::types::Value;

/// Renders queries into SQLite flavoured SQL, collecting parameters in order.
pub(crate) struct Sqlite {
    parameters: Vec<Value>,
}

impl Sqlite {
    const C_PARAM: &'static str = "?";
    const C_QUOTE: &'static str = "`";

    pub(crate) fn build(select: Select) -> (String, Vec<Value>) {
        let mut sqlite = Sqlite { parameters: Vec::new() };
        let sql = sqlite.visit_select(select);

        (sql, sqlite.parameters)
    }

    fn add_parameter(&mut self, value: Value) -> &'static str {
        self.parameters.push(value);
        Self::C_PARAM
    }

    fn visit_select(&mut self, select: Select) -> String {
        let mut result = vec![String::from("SELECT *")];
        result.push(format!("FROM {}", Self::quoted(&select.table)));

        if select.conditions != ConditionTree::NoCondition {
            result.push(format!("WHERE {}", self.visit_conditions(select.conditions)));
        }

        result.join(" ")
    }

    fn visit_conditions(&mut self, tree: ConditionTree) -> String {
        match tree {
            ConditionTree::And(exprs) => {
                let rendered = exprs.into_iter().map(|e| self.visit_conditions(e)).join(" AND ");
                format!("({rendered})")
            }
            ConditionTree::Or(exprs) => {
                let rendered = exprs.into_iter().map(|e| self.visit_conditions(e)).join(" OR ");
                format!("({rendered})")
            }
            ConditionTree::Not(expr) => format!("(NOT {})", self.visit_conditions(*expr)),
            ConditionTree::Single(compare) => self.visit_compare(compare),
            ConditionTree::NoCondition => String::from("1=1"),
            ConditionTree::NegativeCondition => String::from("1=0"),
        }
    }

    fn visit_compare(&mut self, compare: Compare) -> String {
        match compare {
            Compare::Equals(column, value) => format!("{} = {}", Self::quoted(&column), self.add_parameter(value)),
            Compare::NotEquals(column, value) => format!("{} <> {}", Self::quoted(&column), self.add_parameter(value)),
            Compare::LessThan(column, value) => format!("{} < {}", Self::quoted(&column), self.add_parameter(value)),
            Compare::GreaterThan(column, value) => {
                format!("{} > {}", Self::quoted(&column), self.add_parameter(value))
            }
            Compare::In(column, values) => format!("{} IN ({})", Self::quoted(&column), self.parameter_list(values)),
            Compare::NotIn(column, values) => {
                format!("{} NOT IN ({})", Self::quoted(&column), self.parameter_list(values))
            }
            Compare::Null(column) => format!("{} IS NULL", Self::quoted(&column)),
            Compare::NotNull(column) => format!("{} IS NOT NULL", Self::quoted(&column)),
        }
    }

    fn parameter_list(&mut self, values: Vec<Value>) -> String {
        values.into_iter().map(|v| self.add_parameter(v)).join(",")
    }

    fn quoted(identifier: &str) -> String {
        let escaped = identifier.replace(Self::C_QUOTE, "``");
        format!("{q}{escaped}{q}", q = Self::C_QUOTE)
    }
}
