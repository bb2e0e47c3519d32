use rusqlite::types::Value;

/// Tree structures and leaves for condition building.
#[derive(Debug, PartialEq, Clone)]
pub(crate) enum ConditionTree {
    /// `(left AND right AND ...)`
    And(Vec<ConditionTree>),
    /// `(left OR right OR ...)`
    Or(Vec<ConditionTree>),
    /// `(NOT expression)`
    Not(Box<ConditionTree>),
    /// A single comparison leaf
    Single(Compare),
    /// A leaf that does nothing to the condition, `1=1`
    NoCondition,
    /// A leaf that cancels the condition, `1=0`
    NegativeCondition,
}

impl ConditionTree {
    pub(crate) fn not(self) -> ConditionTree {
        match self {
            ConditionTree::NoCondition => ConditionTree::NegativeCondition,
            ConditionTree::NegativeCondition => ConditionTree::NoCondition,
            tree => ConditionTree::Not(Box::new(tree)),
        }
    }
}

impl Default for ConditionTree {
    fn default() -> Self {
        ConditionTree::NoCondition
    }
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Compare {
    Equals(String, Value),
    NotEquals(String, Value),
    LessThan(String, Value),
    GreaterThan(String, Value),
    In(String, Vec<Value>),
    NotIn(String, Vec<Value>),
    Null(String),
    NotNull(String),
}

/// `SELECT * FROM table WHERE conditions`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Select {
    pub(crate) table: String,
    pub(crate) conditions: ConditionTree,
}

impl Select {
    pub(crate) fn from_table(table: impl Into<String>) -> Self {
        Select {
            table: table.into(),
            conditions: ConditionTree::NoCondition,
        }
    }

    pub(crate) fn so_that(mut self, conditions: ConditionTree) -> Self {
        self.conditions = conditions;
        self
    }
}
